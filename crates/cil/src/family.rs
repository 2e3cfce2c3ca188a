use crate::opcode::Opcode;

/// The semantic family of a CIL opcode.
///
/// Every analysis in this workspace dispatches on [`InstructionFamily`]
/// rather than on [`Opcode`] directly, the way `family(opcode)` groups the
/// ~220 ECMA-335 opcodes into this closed, much smaller alphabet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum InstructionFamily {
    Nop,
    Break,
    Ldarg,
    Ldarga,
    Starg,
    Ldloc,
    Ldloca,
    Stloc,
    Ldnull,
    Ldc,
    Dup,
    Pop,
    Jmp,
    Call,
    Calli,
    Callvirt,
    Newobj,
    Ret,
    Br,
    Brfalse,
    Brtrue,
    Beq,
    Bge,
    Bgt,
    Ble,
    Blt,
    Bne,
    Switch,
    Ldind,
    Stind,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    Neg,
    Not,
    Conv,
    Cpobj,
    Ldobj,
    Ldstr,
    Castclass,
    Isinst,
    Unbox,
    Throw,
    Ldfld,
    Ldflda,
    Stfld,
    Ldsfld,
    Ldsflda,
    Stsfld,
    Stobj,
    Box,
    Newarr,
    Ldlen,
    Ldelema,
    Ldelem,
    Stelem,
    Refanyval,
    Ckfinite,
    Mkrefany,
    Ldtoken,
    Endfinally,
    Leave,
    Arglist,
    Ceq,
    Cgt,
    Clt,
    Ldftn,
    Ldvirtftn,
    Localloc,
    Endfilter,
    Unaligned,
    Volatile,
    Tail,
    Initobj,
    Constrained,
    Cpblk,
    Initblk,
    No,
    Rethrow,
    Sizeof,
    Refanytype,
    Readonly,
}

/// Classifies `opcode` into its [`InstructionFamily`].
///
/// This mapping is total over every [`Opcode`] variant; there is no failure
/// case here (unlike resolving an unrecognized *numeric* code from raw
/// bytes, which is a concern of whatever reads a method body off disk, not
/// of this classifier).
pub fn family(opcode: Opcode) -> InstructionFamily {
    use InstructionFamily as F;
    use Opcode::*;
    match opcode {
        Nop => F::Nop,
        Break => F::Break,
        Ldarg0 | Ldarg1 | Ldarg2 | Ldarg3 | LdargS | Ldarg => F::Ldarg,
        LdargaS | Ldarga => F::Ldarga,
        StargS | Starg => F::Starg,
        Ldloc0 | Ldloc1 | Ldloc2 | Ldloc3 | LdlocS | Ldloc => F::Ldloc,
        LdlocaS | Ldloca => F::Ldloca,
        Stloc0 | Stloc1 | Stloc2 | Stloc3 | StlocS | Stloc => F::Stloc,
        Ldnull => F::Ldnull,
        LdcI4M1 | LdcI40 | LdcI41 | LdcI42 | LdcI43 | LdcI44 | LdcI45 | LdcI46 | LdcI47
        | LdcI48 | LdcI4S | LdcI4 | LdcI8 | LdcR4 | LdcR8 => F::Ldc,
        Dup => F::Dup,
        Pop => F::Pop,
        Jmp => F::Jmp,
        Call => F::Call,
        Calli => F::Calli,
        Callvirt => F::Callvirt,
        Newobj => F::Newobj,
        Ret => F::Ret,
        BrS | Br => F::Br,
        BrfalseS | Brfalse => F::Brfalse,
        BrtrueS | Brtrue => F::Brtrue,
        BeqS | Beq => F::Beq,
        BgeS | Bge | BgeUnS | BgeUn => F::Bge,
        BgtS | Bgt | BgtUnS | BgtUn => F::Bgt,
        BleS | Ble | BleUnS | BleUn => F::Ble,
        BltS | Blt | BltUnS | BltUn => F::Blt,
        BneUnS | BneUn => F::Bne,
        Switch => F::Switch,
        LdindI1 | LdindU1 | LdindI2 | LdindU2 | LdindI4 | LdindU4 | LdindI8 | LdindI
        | LdindR4 | LdindR8 | LdindRef => F::Ldind,
        StindRef | StindI1 | StindI2 | StindI4 | StindI8 | StindR4 | StindR8 | StindI => {
            F::Stind
        }
        Add | AddOvf | AddOvfUn => F::Add,
        Sub | SubOvf | SubOvfUn => F::Sub,
        Mul | MulOvf | MulOvfUn => F::Mul,
        Div | DivUn => F::Div,
        Rem | RemUn => F::Rem,
        And => F::And,
        Or => F::Or,
        Xor => F::Xor,
        Shl => F::Shl,
        Shr | ShrUn => F::Shr,
        Neg => F::Neg,
        Not => F::Not,
        ConvI1 | ConvI2 | ConvI4 | ConvI8 | ConvR4 | ConvR8 | ConvU4 | ConvU8 | ConvRUn
        | ConvOvfI1Un | ConvOvfI2Un | ConvOvfI4Un | ConvOvfI8Un | ConvOvfU1Un | ConvOvfU2Un
        | ConvOvfU4Un | ConvOvfU8Un | ConvOvfIUn | ConvOvfUUn | ConvOvfI1 | ConvOvfU1
        | ConvOvfI2 | ConvOvfU2 | ConvOvfI4 | ConvOvfU4 | ConvOvfI8 | ConvOvfU8 | ConvU2
        | ConvU1 | ConvI | ConvOvfI | ConvOvfU | ConvU => F::Conv,
        Cpobj => F::Cpobj,
        Ldobj => F::Ldobj,
        Ldstr => F::Ldstr,
        Castclass => F::Castclass,
        Isinst => F::Isinst,
        Unbox | UnboxAny => F::Unbox,
        Throw => F::Throw,
        Ldfld => F::Ldfld,
        Ldflda => F::Ldflda,
        Stfld => F::Stfld,
        Ldsfld => F::Ldsfld,
        Ldsflda => F::Ldsflda,
        Stsfld => F::Stsfld,
        Stobj => F::Stobj,
        Box => F::Box,
        Newarr => F::Newarr,
        Ldlen => F::Ldlen,
        Ldelema => F::Ldelema,
        LdelemI1 | LdelemU1 | LdelemI2 | LdelemU2 | LdelemI4 | LdelemU4 | LdelemI8 | LdelemI
        | LdelemR4 | LdelemR8 | LdelemRef | Ldelem => F::Ldelem,
        StelemI | StelemI1 | StelemI2 | StelemI4 | StelemI8 | StelemR4 | StelemR8 | StelemRef
        | Stelem => F::Stelem,
        Refanyval => F::Refanyval,
        Ckfinite => F::Ckfinite,
        Mkrefany => F::Mkrefany,
        Ldtoken => F::Ldtoken,
        Endfinally => F::Endfinally,
        Leave | LeaveS => F::Leave,
        Arglist => F::Arglist,
        Ceq => F::Ceq,
        Cgt | CgtUn => F::Cgt,
        Clt | CltUn => F::Clt,
        Ldftn => F::Ldftn,
        Ldvirtftn => F::Ldvirtftn,
        Localloc => F::Localloc,
        Endfilter => F::Endfilter,
        Unaligned => F::Unaligned,
        Volatile => F::Volatile,
        Tail => F::Tail,
        Initobj => F::Initobj,
        Constrained => F::Constrained,
        Cpblk => F::Cpblk,
        Initblk => F::Initblk,
        NoCheck => F::No,
        Rethrow => F::Rethrow,
        Sizeof => F::Sizeof,
        Refanytype => F::Refanytype,
        Readonly => F::Readonly,
    }
}

/// The flow-control category of an [`InstructionFamily`], as used by the
/// CFG builder (component C) to decide how a block's tail instruction
/// grows or terminates the block.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FlowControl {
    /// Falls through unconditionally to the next instruction.
    Next,
    /// A debugger breakpoint; behaves like `Next` for control flow.
    Break,
    /// A call-like instruction; behaves like `Next` for control flow.
    Call,
    /// A prefix instruction consumed together with the instruction it modifies.
    Meta,
    /// An unconditional branch to a single target.
    Branch,
    /// A conditional branch (including multi-way `switch`) with a fall-through.
    CondBranch,
    /// Terminates the method's execution on this path.
    Return,
    /// Terminates the method's execution on this path by raising an exception.
    Throw,
    /// Reserved for tooling-synthesized phi instructions; no real CIL opcode
    /// classifies to this category, but the CFG builder must still reject it.
    Phi,
}

/// Returns the [`FlowControl`] category of `family`, used to drive the CFG
/// builder's block-growing switch.
pub fn flow_control(family: InstructionFamily) -> FlowControl {
    use InstructionFamily as F;
    match family {
        F::Ret => FlowControl::Return,
        F::Throw | F::Rethrow => FlowControl::Throw,
        F::Br | F::Leave => FlowControl::Branch,
        F::Brtrue | F::Brfalse | F::Beq | F::Bge | F::Bgt | F::Ble | F::Blt | F::Bne
        | F::Switch => FlowControl::CondBranch,
        F::Call | F::Calli | F::Callvirt | F::Newobj | F::Jmp => FlowControl::Call,
        F::Unaligned | F::Volatile | F::Tail | F::Constrained | F::No | F::Readonly => {
            FlowControl::Meta
        }
        F::Break => FlowControl::Break,
        _ => FlowControl::Next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_family_members_fall_through() {
        assert_eq!(flow_control(InstructionFamily::Call), FlowControl::Call);
        assert_eq!(flow_control(InstructionFamily::Newobj), FlowControl::Call);
        assert_eq!(flow_control(InstructionFamily::Jmp), FlowControl::Call);
    }

    #[test]
    fn switch_is_a_conditional_branch() {
        assert_eq!(
            flow_control(InstructionFamily::Switch),
            FlowControl::CondBranch
        );
    }

    #[test]
    fn prefixes_are_meta() {
        assert_eq!(flow_control(InstructionFamily::Volatile), FlowControl::Meta);
        assert_eq!(flow_control(InstructionFamily::Readonly), FlowControl::Meta);
    }

    #[test]
    fn short_and_long_local_forms_share_a_family() {
        assert_eq!(family(Opcode::Ldloc0), InstructionFamily::Ldloc);
        assert_eq!(family(Opcode::LdlocS), InstructionFamily::Ldloc);
        assert_eq!(family(Opcode::Ldloc), InstructionFamily::Ldloc);
    }

    #[test]
    fn signed_and_unsigned_comparisons_share_a_family() {
        assert_eq!(family(Opcode::BgtS), InstructionFamily::Bgt);
        assert_eq!(family(Opcode::BgtUnS), InstructionFamily::Bgt);
    }

    #[test]
    fn overflow_checked_arithmetic_shares_a_family_with_unchecked() {
        assert_eq!(family(Opcode::Add), InstructionFamily::Add);
        assert_eq!(family(Opcode::AddOvf), InstructionFamily::Add);
        assert_eq!(family(Opcode::AddOvfUn), InstructionFamily::Add);
    }

    #[test]
    fn ldloca_is_distinct_from_ldloc() {
        assert_eq!(family(Opcode::LdlocaS), InstructionFamily::Ldloca);
        assert_ne!(family(Opcode::LdlocaS), family(Opcode::LdlocS));
    }
}
