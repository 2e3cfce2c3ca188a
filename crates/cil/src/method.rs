use crate::error::{Error, ErrorKind};
use crate::family::{family, InstructionFamily};
use crate::opcode::Opcode;
use crate::operand::Operand;
use crate::refs::MemberRef;
use crate::ty::CilType;

/// A declared local variable slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Local {
    pub ty: CilType,
}

/// A declared parameter (including an explicit `this` when present).
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub ty: CilType,
}

/// A single instruction within a [`MethodBody`].
///
/// `prev`/`next` links (as described by the instruction data model) are
/// realized by position within [`MethodBody::instructions`] rather than an
/// intrusive linked list: the CFG builder only ever needs `next(I)`, which
/// is simply "the following element of this `Vec`".
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub offset: u32,
    pub opcode: Opcode,
    pub operand: Operand,
}

impl Instruction {
    pub fn new(offset: u32, opcode: Opcode, operand: Operand) -> Self {
        Self {
            offset,
            opcode,
            operand,
        }
    }

    /// Returns this instruction's [`InstructionFamily`].
    pub fn family(&self) -> InstructionFamily {
        family(self.opcode)
    }
}

/// An ordered sequence of instructions, locals, and parameters with the
/// mutable `initLocals` flag the core's analyses may clear.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodBody {
    pub instructions: Vec<Instruction>,
    pub locals: Vec<Local>,
    pub this_parameter: Option<Parameter>,
    pub parameters: Vec<Parameter>,
    pub init_locals: bool,
    pub max_stack: u16,
}

impl MethodBody {
    /// Returns whether this method has an implicit `this` receiver.
    pub fn has_this(&self) -> bool {
        self.this_parameter.is_some()
    }

    /// Returns the instruction immediately following `index`, if any.
    pub fn next_index(&self, index: usize) -> Option<usize> {
        let next = index + 1;
        (next < self.instructions.len()).then_some(next)
    }

    /// Resolves the local variable an `Ldloc`/`Ldloca`/`Stloc` instruction
    /// refers to, whether in short (`ldloc.0`) or explicit-operand form.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::FamilyMismatch`] if `instr` is not one of those
    /// families, or if `Operand::LocalIndex` names a local index out of range.
    pub fn local(&self, instr: &Instruction) -> Result<&Local, Error> {
        let index = self.local_index(instr)?;
        self.locals.get(index as usize).ok_or_else(|| {
            ErrorKind::FamilyMismatch {
                expected: "a valid local index",
                opcode: instr.opcode,
            }
            .into()
        })
    }

    /// Resolves only the local-variable index, without requiring the local
    /// to already exist (used while validating malformed input).
    pub fn local_index(&self, instr: &Instruction) -> Result<u16, Error> {
        use Opcode::*;
        let index = match instr.opcode {
            Ldloc0 | Stloc0 => 0,
            Ldloc1 | Stloc1 => 1,
            Ldloc2 | Stloc2 => 2,
            Ldloc3 | Stloc3 => 3,
            LdlocS | LdlocaS | StlocS | Ldloc | Ldloca | Stloc => match instr.operand {
                Operand::LocalIndex(index) => index,
                _ => {
                    return Err(ErrorKind::FamilyMismatch {
                        expected: "Ldloc/Ldloca/Stloc",
                        opcode: instr.opcode,
                    }
                    .into())
                }
            },
            _ => {
                return Err(ErrorKind::FamilyMismatch {
                    expected: "Ldloc/Ldloca/Stloc",
                    opcode: instr.opcode,
                }
                .into())
            }
        };
        Ok(index)
    }

    /// Resolves the parameter an `Ldarg`/`Starg` instruction refers to.
    ///
    /// For the fixed-index short forms (`ldarg.0`..`ldarg.3`), index 0
    /// resolves to the `this` parameter when the method [`MethodBody::has_this`],
    /// and every other index is relative to [`MethodBody::parameters`] shifted
    /// by one when `this` is present — matching the documented
    /// `ldarg.0..3` / `HasThis` mapping exactly.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::FamilyMismatch`] if `instr` is not `Ldarg`/`Starg`,
    /// or if the resolved index is out of range.
    pub fn parameter(&self, instr: &Instruction) -> Result<&Parameter, Error> {
        use Opcode::*;
        let raw_index: u32 = match instr.opcode {
            Ldarg0 => 0,
            Ldarg1 => 1,
            Ldarg2 => 2,
            Ldarg3 => 3,
            LdargS | StargS | Ldarg | Starg => match instr.operand {
                Operand::ArgIndex(index) => u32::from(index),
                _ => {
                    return Err(ErrorKind::FamilyMismatch {
                        expected: "Ldarg/Starg",
                        opcode: instr.opcode,
                    }
                    .into())
                }
            },
            _ => {
                return Err(ErrorKind::FamilyMismatch {
                    expected: "Ldarg/Starg",
                    opcode: instr.opcode,
                }
                .into())
            }
        };

        if self.has_this() {
            if raw_index == 0 {
                return Ok(self
                    .this_parameter
                    .as_ref()
                    .expect("has_this implies this_parameter is Some"));
            }
            let param_index = raw_index - 1;
            return self.parameters.get(param_index as usize).ok_or_else(|| {
                ErrorKind::FamilyMismatch {
                    expected: "a valid parameter index",
                    opcode: instr.opcode,
                }
                .into()
            });
        }
        self.parameters.get(raw_index as usize).ok_or_else(|| {
            ErrorKind::FamilyMismatch {
                expected: "a valid parameter index",
                opcode: instr.opcode,
            }
            .into()
        })
    }

    /// Resolves the `Member` operand of a field-accessing instruction
    /// (`Ldfld`/`Ldflda`/`Stfld`/`Ldsfld`/`Ldsflda`/`Stsfld`).
    pub fn field<'a>(&self, instr: &'a Instruction) -> Result<&'a MemberRef, Error> {
        match &instr.operand {
            Operand::Member(member @ MemberRef::Field(_)) => Ok(member),
            _ => Err(ErrorKind::FamilyMismatch {
                expected: "a field-accessing instruction",
                opcode: instr.opcode,
            }
            .into()),
        }
    }

    /// Resolves the `Member` operand of a call-like instruction
    /// (`Call`/`Calli`/`Callvirt`/`Newobj`/`Jmp`).
    pub fn method_ref<'a>(&self, instr: &'a Instruction) -> Result<&'a MemberRef, Error> {
        match &instr.operand {
            Operand::Member(member @ MemberRef::Method(_)) => Ok(member),
            _ => Err(ErrorKind::FamilyMismatch {
                expected: "a call-like instruction",
                opcode: instr.opcode,
            }
            .into()),
        }
    }

    /// Resolves the element type of a typed `Ldelem`/`Ldelema`/`Stelem`
    /// instruction, either from its explicit [`Operand::ElementType`] or
    /// from its fixed-width short form.
    pub fn element_type(&self, instr: &Instruction) -> Result<CilType, Error> {
        use Opcode::*;
        let ty = match instr.opcode {
            LdelemI1 | StelemI1 => CilType::I1,
            LdelemU1 => CilType::U1,
            LdelemI2 | StelemI2 => CilType::I2,
            LdelemU2 => CilType::U2,
            LdelemI4 | StelemI4 => CilType::I4,
            LdelemU4 => CilType::U4,
            LdelemI8 | StelemI8 => CilType::I8,
            LdelemI | StelemI => CilType::IntPtr,
            LdelemR4 | StelemR4 => CilType::R4,
            LdelemR8 | StelemR8 => CilType::R8,
            LdelemRef | StelemRef => CilType::Object,
            Ldelem | Stelem | Ldelema => match &instr.operand {
                Operand::ElementType(ty) => ty.clone(),
                Operand::Member(MemberRef::Type(type_ref)) => CilType::Class(*type_ref),
                _ => {
                    return Err(ErrorKind::FamilyMismatch {
                        expected: "an element-typed instruction",
                        opcode: instr.opcode,
                    }
                    .into())
                }
            },
            _ => {
                return Err(ErrorKind::FamilyMismatch {
                    expected: "Ldelem/Ldelema/Stelem",
                    opcode: instr.opcode,
                }
                .into())
            }
        };
        Ok(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refs::TypeRef;

    fn int_local_body(instructions: Vec<Instruction>) -> MethodBody {
        MethodBody {
            instructions,
            locals: vec![Local { ty: CilType::I4 }],
            this_parameter: None,
            parameters: vec![],
            init_locals: true,
            max_stack: 2,
        }
    }

    #[test]
    fn ldloc_short_form_resolves_index_zero() {
        let body = int_local_body(vec![Instruction::new(0, Opcode::Ldloc0, Operand::None)]);
        assert_eq!(body.local_index(&body.instructions[0]).unwrap(), 0);
    }

    #[test]
    fn ldloc_long_form_resolves_operand_index() {
        let body = int_local_body(vec![Instruction::new(
            0,
            Opcode::LdlocS,
            Operand::LocalIndex(0),
        )]);
        assert_eq!(body.local_index(&body.instructions[0]).unwrap(), 0);
    }

    #[test]
    fn ldarg_0_resolves_to_this_when_method_has_this() {
        let body = MethodBody {
            instructions: vec![Instruction::new(0, Opcode::Ldarg0, Operand::None)],
            locals: vec![],
            this_parameter: Some(Parameter {
                ty: CilType::Class(TypeRef(1)),
            }),
            parameters: vec![Parameter { ty: CilType::I4 }],
            init_locals: true,
            max_stack: 1,
        };
        let param = body.parameter(&body.instructions[0]).unwrap();
        assert_eq!(param.ty, CilType::Class(TypeRef(1)));
    }

    #[test]
    fn ldarg_1_resolves_to_first_declared_parameter_when_has_this() {
        let body = MethodBody {
            instructions: vec![Instruction::new(0, Opcode::Ldarg1, Operand::None)],
            locals: vec![],
            this_parameter: Some(Parameter {
                ty: CilType::Class(TypeRef(1)),
            }),
            parameters: vec![Parameter { ty: CilType::I4 }],
            init_locals: true,
            max_stack: 1,
        };
        let param = body.parameter(&body.instructions[0]).unwrap();
        assert_eq!(param.ty, CilType::I4);
    }

    #[test]
    fn element_type_resolves_fixed_width_short_forms() {
        let body = int_local_body(vec![Instruction::new(0, Opcode::LdelemI8, Operand::None)]);
        assert_eq!(
            body.element_type(&body.instructions[0]).unwrap(),
            CilType::I8
        );
    }

    #[test]
    fn family_mismatch_on_wrong_instruction() {
        let body = int_local_body(vec![Instruction::new(0, Opcode::Nop, Operand::None)]);
        assert!(body.local_index(&body.instructions[0]).is_err());
    }
}
