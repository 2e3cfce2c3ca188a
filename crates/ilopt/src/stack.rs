//! Abstract evaluation-stack simulator (component D).
//!
//! Given the instruction immediately following a `ldloca`, walks forward
//! tracking only evaluation-stack *slot sizes* (never full types) until it
//! finds the instruction that consumes the address `ldloca` pushed, or
//! establishes that no instruction on this straight-line path does.
//!
//! The tracked stack always starts with one synthetic entry representing
//! the `ldloca`-pushed address. An instruction is the consumer the moment
//! it would need to pop at or past that entry — i.e. the number of slots it
//! pops is greater than or equal to the number of slots currently tracked.
//! Everything shallower than that is popped and pushed as ordinary
//! evaluation-stack traffic and never touches the address.

use ilopt_cil::{Instruction, InstructionFamily, MemberRef, MethodBody, Opcode};

use crate::error::{Error, ErrorKind};

/// The instruction that consumed a tracked `ldloca` address, and the
/// address's position among the slots the consumer popped.
///
/// `stack_index` counts from the *bottom* of the consumer's pop range: 0
/// means the address was the earliest-pushed (deepest) of the popped slots
/// — which, for a `Call`-family consumer, makes it directly the position of
/// the corresponding argument (`this` first when present, then declared
/// parameters in order).
#[derive(Debug, Clone, Copy)]
pub struct Consumer<'a> {
    pub instruction: &'a Instruction,
    pub stack_index: u32,
}

/// Finds the consumer of the address pushed by a `ldloca` whose next
/// instruction is `method.instructions[start]`.
///
/// # Errors
///
/// Returns [`ErrorKind::UnsupportedFamily`] if the walk reaches an
/// instruction family the simulator does not model, or a decoding error
/// from the CIL data model (malformed operand for the instruction's family).
pub fn find_consumer<'a>(
    method: &'a MethodBody,
    start: usize,
) -> Result<Option<Consumer<'a>>, Error> {
    let mut stack: Vec<u32> = vec![4];
    let mut index = start;
    loop {
        if stack.is_empty() {
            return Ok(None);
        }
        let Some(instr) = method.instructions.get(index) else {
            return Ok(None);
        };
        let fam = instr.family();
        if is_control_transfer(fam) {
            return Ok(None);
        }
        match step(method, instr, fam, &mut stack)? {
            Some(stack_index) => {
                return Ok(Some(Consumer {
                    instruction: instr,
                    stack_index,
                }))
            }
            None => index += 1,
        }
    }
}

/// Families that unconditionally end the walk without a consumer, per the
/// stack simulator's own flow classification (distinct from the CFG
/// builder's [`ilopt_cil::flow_control`] — `Jmp` in particular is linear for
/// the CFG builder but a dead end for this simulator, since it transfers
/// control away with whatever the real evaluation stack held).
fn is_control_transfer(fam: InstructionFamily) -> bool {
    use InstructionFamily as F;
    matches!(
        fam,
        F::Jmp
            | F::Ret
            | F::Br
            | F::Brfalse
            | F::Brtrue
            | F::Beq
            | F::Bge
            | F::Bgt
            | F::Ble
            | F::Blt
            | F::Bne
            | F::Switch
            | F::Throw
    )
}

/// Applies one instruction's effect to `stack`.
///
/// Returns `Ok(Some(stack_index))` if `instr` consumes the tracked address
/// (`stack_index` measured from the top, 0-based), or `Ok(None)` after
/// mutating `stack` in place for an instruction that stays clear of it.
fn step(
    method: &MethodBody,
    instr: &Instruction,
    fam: InstructionFamily,
    stack: &mut Vec<u32>,
) -> Result<Option<u32>, Error> {
    use InstructionFamily as F;

    /// Checks `pops` against the current stack depth. If `pops` would reach
    /// the tracked address or deeper, returns the consumer's stack index;
    /// otherwise yields `pops` for the caller to apply.
    macro_rules! consume_or_pop {
        ($pops:expr) => {{
            let pops: u32 = $pops;
            let depth = stack.len() as u32;
            if pops >= depth {
                return Ok(Some(pops - depth));
            }
            stack.truncate(stack.len() - pops as usize);
        }};
    }

    match fam {
        F::Nop | F::Break | F::Volatile | F::Constrained => {}
        F::Ldarg => {
            let param = method.parameter(instr)?;
            stack.push(param.ty.slot_size()?);
        }
        F::Ldloc => {
            let local = method.local(instr)?;
            stack.push(local.ty.slot_size()?);
        }
        F::Starg => {
            consume_or_pop!(1);
        }
        F::Stloc => {
            consume_or_pop!(1);
        }
        F::Ldarga | F::Ldloca | F::Ldnull | F::Ldstr | F::Ldsflda | F::Ldtoken | F::Arglist
        | F::Sizeof => {
            stack.push(4);
        }
        F::Ldc => {
            stack.push(ldc_size(instr.opcode));
        }
        F::Dup => {
            let top = *stack.last().expect("stack never empties above a live ldloca");
            stack.push(top);
        }
        F::Pop => {
            consume_or_pop!(1);
        }
        F::Call | F::Callvirt | F::Newobj => {
            let member = method.method_ref(instr)?;
            let MemberRef::Method(method_ref) = member else {
                return Err(ErrorKind::UnsupportedFamily {
                    family: fam,
                    offset: instr.offset,
                }
                .into());
            };
            let has_this_pop = u32::from(method_ref.has_this && !method_ref.explicit_this);
            let required = method_ref.parameters.len() as u32 + has_this_pop;
            consume_or_pop!(required);
            let push = if instr.opcode == Opcode::Newobj {
                Some(4)
            } else {
                method_ref
                    .return_type
                    .as_ref()
                    .map(ilopt_cil::CilType::slot_size)
                    .transpose()?
            };
            if let Some(size) = push {
                stack.push(size);
            }
        }
        F::Calli => {
            let depth = stack.len() as u32;
            if 2 >= depth {
                return Ok(Some(2 - depth));
            }
            let a = stack.pop().expect("depth checked above");
            let b = stack.pop().expect("depth checked above");
            stack.push(a.max(b));
        }
        F::Ldind => {
            consume_or_pop!(1);
            stack.push(ldind_size(instr.opcode));
        }
        F::Stind => {
            consume_or_pop!(2);
        }
        F::Add | F::Sub | F::Mul | F::Div | F::Rem | F::And | F::Or | F::Xor | F::Shl | F::Shr => {
            let depth = stack.len() as u32;
            if 2 >= depth {
                return Ok(Some(2 - depth));
            }
            let a = stack.pop().expect("depth checked above");
            let b = stack.pop().expect("depth checked above");
            stack.push(a.max(b));
        }
        F::Neg | F::Not => {
            let depth = stack.len() as u32;
            if 1 >= depth {
                return Ok(Some(1 - depth));
            }
            // In-place: no net stack change, but the slot is still re-pushed
            // rather than left untouched, matching the table's "pop, push".
            let size = stack.pop().expect("depth checked above");
            stack.push(size);
        }
        F::Conv => {
            consume_or_pop!(1);
            stack.push(conv_size(instr.opcode));
        }
        F::Castclass | F::Isinst | F::Ldflda => {
            consume_or_pop!(1);
            stack.push(4);
        }
        F::Unbox | F::Box => {
            consume_or_pop!(1);
            stack.push(4);
        }
        F::Ldfld => {
            let field = method.field(instr)?;
            let MemberRef::Field(field_ref) = field else {
                return Err(ErrorKind::UnsupportedFamily {
                    family: fam,
                    offset: instr.offset,
                }
                .into());
            };
            let size = field_ref.field_type.slot_size()?;
            consume_or_pop!(1);
            stack.push(size);
        }
        F::Stfld => {
            consume_or_pop!(2);
        }
        F::Ldsfld => {
            let field = method.field(instr)?;
            let MemberRef::Field(field_ref) = field else {
                return Err(ErrorKind::UnsupportedFamily {
                    family: fam,
                    offset: instr.offset,
                }
                .into());
            };
            stack.push(field_ref.field_type.slot_size()?);
        }
        F::Stsfld => {
            consume_or_pop!(1);
        }
        F::Newarr | F::Ldlen => {
            consume_or_pop!(1);
            stack.push(4);
        }
        F::Ldelema => {
            consume_or_pop!(2);
            stack.push(4);
        }
        F::Ldelem => {
            let ty = method.element_type(instr)?;
            let size = ty.slot_size()?;
            consume_or_pop!(2);
            stack.push(size);
        }
        F::Stelem => {
            let _ty = method.element_type(instr)?;
            consume_or_pop!(3);
        }
        F::Ceq | F::Cgt | F::Clt => {
            consume_or_pop!(2);
            stack.push(4);
        }
        F::Initobj => {
            consume_or_pop!(1);
        }
        _ => {
            return Err(ErrorKind::UnsupportedFamily {
                family: fam,
                offset: instr.offset,
            }
            .into())
        }
    }
    Ok(None)
}

fn ldc_size(opcode: Opcode) -> u32 {
    matches!(opcode, Opcode::LdcI8 | Opcode::LdcR8)
        .then_some(8)
        .unwrap_or(4)
}

fn ldind_size(opcode: Opcode) -> u32 {
    matches!(opcode, Opcode::LdindI8 | Opcode::LdindR8)
        .then_some(8)
        .unwrap_or(4)
}

fn conv_size(opcode: Opcode) -> u32 {
    use Opcode::*;
    matches!(
        opcode,
        ConvI8 | ConvU8 | ConvR8 | ConvOvfI8 | ConvOvfU8 | ConvOvfI8Un | ConvOvfU8Un
    )
    .then_some(8)
    .unwrap_or(4)
}

#[cfg(test)]
mod tests;
