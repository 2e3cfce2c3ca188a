//! Definite-assignment analysis (component E): decides whether a method's
//! `initLocals` flag can be cleared without risking a read of an
//! uninitialized local.

use std::collections::HashMap;

use ilopt_cil::{InstructionFamily, MemberRef, MethodBody};

use crate::cfg::{BlockIdx, Cfg};
use crate::error::Error;
use crate::stack::{self, Consumer};

/// Which kinds of `ldloca`-as-assignment evidence this run is willing to
/// trust. `Csharp` is the union of `Out` and `Stackalloc`, matching the
/// mode the real C# compiler's own codegen is known to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    None,
    Out,
    Stackalloc,
    Csharp,
    All,
}

impl Mode {
    fn includes_out(self) -> bool {
        matches!(self, Mode::Out | Mode::Csharp)
    }

    fn includes_stackalloc(self) -> bool {
        matches!(self, Mode::Stackalloc | Mode::Csharp)
    }
}

/// The outcome of running the analyzer against one method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// `initLocals` was cleared.
    Updated,
    /// The method was ineligible (no body, or already clear) and untouched.
    Skipped,
    /// The method is eligible but assignment could not be proven.
    Failed,
}

/// Per-`(block, local)` bookkeeping built while walking a block's
/// instructions in order.
///
/// Kept in a side-table rather than embedded in [`crate::cfg::BasicBlock`]
/// so the CFG stays a plain, analysis-agnostic graph other passes can reuse.
#[derive(Debug, Clone, Copy, Default)]
struct VariableAccessData {
    /// Whether the first access to this variable in this block was a write.
    assigned_first: bool,
    /// Declared but never written, matching the upstream field this mirrors:
    /// implementers should not invent a semantics for it (see the design
    /// notes on cross-block assignment).
    #[allow(dead_code)]
    assigned_before: bool,
}

/// Runs the definite-assignment analysis described by component E against
/// `method`, using `cfg` (already built for it) and the given `mode`.
///
/// # Errors
///
/// Propagates any error the stack simulator raises while resolving a
/// `ldloca`'s consumer (an unmodeled instruction family, or a malformed
/// operand).
pub fn analyze(method: &mut MethodBody, cfg: &Cfg, mode: Mode) -> Result<Verdict, Error> {
    if method.instructions.is_empty() {
        return Ok(Verdict::Skipped);
    }
    if !method.init_locals {
        return Ok(Verdict::Skipped);
    }

    if mode == Mode::All {
        method.init_locals = false;
        return Ok(Verdict::Updated);
    }

    let mut access: HashMap<(BlockIdx, u16), VariableAccessData> = HashMap::new();
    let mut contains_localloc = false;

    for block_idx in cfg.depth_first() {
        let block = &cfg.blocks[block_idx];
        let mut seen_in_block: std::collections::HashSet<u16> = std::collections::HashSet::new();
        let range = block.range();
        for pos in range.clone() {
            let instr = &method.instructions[pos];
            match instr.family() {
                InstructionFamily::Stloc => {
                    let local = method.local_index(instr)?;
                    record_first_access(&mut access, &mut seen_in_block, block_idx, local, true);
                }
                InstructionFamily::Ldloc => {
                    let local = method.local_index(instr)?;
                    record_first_access(&mut access, &mut seen_in_block, block_idx, local, false);
                }
                InstructionFamily::Ldloca => {
                    let local = method.local_index(instr)?;
                    if seen_in_block.insert(local) {
                        let write = is_assignment(method, mode, pos)?;
                        access
                            .entry((block_idx, local))
                            .or_insert(VariableAccessData {
                                assigned_first: write,
                                assigned_before: false,
                            });
                    }
                }
                InstructionFamily::Localloc => {
                    contains_localloc = true;
                }
                _ => {}
            }
        }
    }

    if contains_localloc && !mode.includes_stackalloc() {
        return Ok(Verdict::Failed);
    }

    let mut unassigned = 0usize;
    for local_index in 0..method.locals.len() as u16 {
        let referencing: Vec<BlockIdx> = access
            .keys()
            .filter(|(_, var)| *var == local_index)
            .map(|(block, _)| *block)
            .collect();

        let chosen = if referencing.contains(&cfg.root) {
            Some(access[&(cfg.root, local_index)])
        } else if referencing.len() == 1 {
            Some(access[&(referencing[0], local_index)])
        } else {
            // Inter-block proof is an acknowledged TODO: defer always reads
            // as unassigned, the conservative behavior the algorithm ships.
            None
        };

        let assigned = matches!(chosen, Some(data) if data.assigned_first);
        if !assigned {
            unassigned += 1;
        }
    }

    if unassigned == 0 {
        method.init_locals = false;
        Ok(Verdict::Updated)
    } else {
        Ok(Verdict::Failed)
    }
}

fn record_first_access(
    access: &mut HashMap<(BlockIdx, u16), VariableAccessData>,
    seen_in_block: &mut std::collections::HashSet<u16>,
    block: BlockIdx,
    local: u16,
    write: bool,
) {
    if seen_in_block.insert(local) {
        access.entry((block, local)).or_insert(VariableAccessData {
            assigned_first: write,
            assigned_before: false,
        });
    }
}

/// Resolves whether the `ldloca` at `pos` is acting as an assignment,
/// per the consumer-classification rule in component E step 2.
fn is_assignment(method: &MethodBody, mode: Mode, pos: usize) -> Result<bool, Error> {
    let Some(next) = method.next_index(pos) else {
        return Ok(false);
    };
    let Some(Consumer {
        instruction,
        stack_index,
    }) = stack::find_consumer(method, next)?
    else {
        return Ok(false);
    };

    match instruction.family() {
        InstructionFamily::Initobj => Ok(stack_index == 0),
        InstructionFamily::Call | InstructionFamily::Callvirt | InstructionFamily::Newobj => {
            let MemberRef::Method(method_ref) = method.method_ref(instruction)? else {
                return Ok(false);
            };
            if stack_index == 0 && method_ref.is_constructor {
                return Ok(true);
            }
            if mode.includes_out() {
                let has_this_pop =
                    u32::from(method_ref.has_this && !method_ref.explicit_this);
                // `stack_index` already counts from the bottom of the call's
                // pop range, i.e. from `this` (when present) through the
                // declared parameters in push order — so it names the
                // parameter position directly, once `this` is accounted for.
                if let Some(param_index) = stack_index.checked_sub(has_this_pop) {
                    if method_ref.is_out_parameter(param_index as usize) {
                        return Ok(true);
                    }
                }
            }
            Ok(false)
        }
        _ => Ok(false),
    }
}
