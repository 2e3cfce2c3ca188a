//! Walks an [`Assembly`] and applies the definite-assignment analyzer
//! (component F) to every method body it finds.

use crate::analyzer::{self, Mode, Verdict};
use crate::cfg;
use crate::container::{Assembly, TypeDef};

/// Counts of everything the driver walked through, independent of whether
/// any optimization fired. Used for the CLI's processed-counts line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessedCounts {
    pub modules: usize,
    pub types: usize,
    pub events: usize,
    pub properties: usize,
    pub methods: usize,
}

/// The result of running one optimization (currently always
/// `striplocalsinit`) over an assembly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimizationReport {
    pub processed: ProcessedCounts,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Applies the definite-assignment analyzer, in `mode`, to every method in
/// `assembly`, clearing `initLocals` wherever it can be proven safe.
///
/// Per method, a CFG-construction or stack-simulator error is caught and
/// counted as `Failed` rather than propagated — matching the driver's
/// "errors inside a single method's analysis do not interrupt the rest of
/// the run" policy. Only the walk itself has no failure mode: assembly
/// container I/O lives entirely outside this function.
pub fn optimize_assembly(assembly: &mut Assembly, mode: Mode) -> OptimizationReport {
    optimize_assembly_filtered(assembly, mode, None)
}

/// As [`optimize_assembly`], but skips any type (and its nested types and
/// methods) whose name does not satisfy `filter`, when one is given.
///
/// `filter` is a plain predicate rather than a `Regex` directly so this
/// crate never needs to depend on a regex engine — the CLI front-end (§6)
/// owns the `filter=<regex>` syntax and passes in the compiled matcher.
/// Filtered-out types are excluded from the processed counts entirely,
/// matching the documented behavior of the CLI's `filter` option: they are
/// not touched, not counted, and not reported.
pub fn optimize_assembly_filtered(
    assembly: &mut Assembly,
    mode: Mode,
    filter: Option<&dyn Fn(&str) -> bool>,
) -> OptimizationReport {
    let mut report = OptimizationReport::default();
    report.processed.modules = assembly.modules.len();
    for module in &mut assembly.modules {
        for ty in &mut module.types {
            if filter.map_or(true, |f| f(&ty.name)) {
                report.processed.types += 1;
                walk_type(ty, mode, filter, &mut report);
            }
        }
    }
    report
}

fn walk_type(
    ty: &mut TypeDef,
    mode: Mode,
    filter: Option<&dyn Fn(&str) -> bool>,
    report: &mut OptimizationReport,
) {
    report.processed.events += ty.events.len();
    report.processed.properties += ty.properties.len();
    report.processed.methods += ty.methods.len();

    for method in &mut ty.methods {
        let Some(body) = method.body.as_mut() else {
            continue;
        };
        let verdict = match cfg::build(body) {
            Ok(cfg) => analyzer::analyze(body, &cfg, mode).unwrap_or_else(|error| {
                log::debug!(
                    "{}: analysis failed: {error}",
                    method.name
                );
                Verdict::Failed
            }),
            Err(error) => {
                log::debug!("{}: CFG construction failed: {error}", method.name);
                Verdict::Failed
            }
        };
        log::debug!("{}: {verdict:?}", method.name);
        match verdict {
            Verdict::Updated => report.updated += 1,
            Verdict::Skipped => report.skipped += 1,
            Verdict::Failed => report.failed += 1,
        }
    }

    for nested in &mut ty.nested_types {
        if filter.map_or(true, |f| f(&nested.name)) {
            report.processed.types += 1;
            walk_type(nested, mode, filter, report);
        }
    }
}

#[cfg(test)]
mod tests;
