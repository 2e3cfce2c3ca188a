//! Per-assembly orchestration: load, optimize, report, save (component K
//! wired to the driver in `ilopt`).

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ilopt::{container, driver, Mode};

use crate::args::CliArgs;
use crate::error::{Error, ErrorKind};
use crate::output;

const OUTPUT_DIR: &str = "optimized";
const OPTIMIZATION_NAME: &str = "StripLocalsInit";

/// Runs the parsed command line to completion, processing every assembly in
/// turn. Stops at the first [`Error`] (assembly I/O and CLI misuse abort the
/// run per §7's propagation policy); a per-method analysis failure never
/// reaches this far; it is already folded into the driver's `Failed` count.
pub fn run(args: &CliArgs, mode: Mode) -> Result<(), Error> {
    let filter = args
        .filter
        .as_ref()
        .map(|re| -> Box<dyn Fn(&str) -> bool> { Box::new(move |name: &str| re.is_match(name)) });

    for input in &args.assemblies {
        if let Err(err) = process_one(input, mode, filter.as_deref()) {
            output::error(&format!("{}: {err}", input.display()));
            return Err(err);
        }
    }
    Ok(())
}

fn process_one(
    input: &Path,
    mode: Mode,
    filter: Option<&dyn Fn(&str) -> bool>,
) -> Result<(), Error> {
    let file_name = input.file_name().ok_or_else(|| {
        ErrorKind::Argument(format!("{}: not a valid file path", input.display()))
    })?;
    let destination = PathBuf::from(OUTPUT_DIR).join(file_name);

    if paths_refer_to_the_same_file(input, &destination) {
        output::warn(&format!(
            "{}: input and output path are the same, skipping",
            input.display()
        ));
        return Ok(());
    }

    if destination.exists() && !confirm_overwrite(&destination)? {
        output::warn(&format!("{}: skipped", destination.display()));
        return Ok(());
    }

    let mut assembly = container::read_assembly(input)?;
    let report = driver::optimize_assembly_filtered(&mut assembly, mode, filter);

    output::line(&format!(
        "{}: Modules {}, Types {}, Events {}, Properties {}, Methods {}",
        input.display(),
        report.processed.modules,
        report.processed.types,
        report.processed.events,
        report.processed.properties,
        report.processed.methods,
    ));
    output::line(&format!(
        "{OPTIMIZATION_NAME}: Updated {} Methods, Skipped {} Methods, Failed {} Methods",
        report.updated, report.skipped, report.failed,
    ));

    container::write_assembly(&destination, &assembly)?;
    Ok(())
}

fn paths_refer_to_the_same_file(input: &Path, output: &Path) -> bool {
    match (input.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => input == output,
    }
}

/// Prompts the user on stdin for whether `destination` should be
/// overwritten. Defaults to "yes" on an empty line, matching the `[Y/n]`
/// convention documented in §6.
fn confirm_overwrite(destination: &Path) -> Result<bool, Error> {
    print!(
        "{} already exists. Overwrite? [Y/n] ",
        destination.display()
    );
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.is_empty() || answer.eq_ignore_ascii_case("y"))
}
