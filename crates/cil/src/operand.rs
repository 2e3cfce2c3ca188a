use crate::refs::MemberRef;
use crate::ty::CilType;

/// The decoded operand of an [`crate::Instruction`].
///
/// Short/indexed opcode forms (`ldloc.0`, `ldarg.s`, …) do not carry an
/// explicit [`Operand`] of their own; component B resolves them against
/// the owning [`crate::MethodBody`] instead (see [`crate::Instruction::local`],
/// [`crate::Instruction::parameter`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    None,
    /// A relative branch offset, in instructions, from the branch
    /// instruction's successor to its target.
    BranchTarget(i32),
    ConstI4(i32),
    ConstI8(i64),
    ConstR4(f32),
    ConstR8(f64),
    /// Index into the owning method body's local-variable list.
    LocalIndex(u16),
    /// Index into the owning method body's parameter list (`this`-relative;
    /// see [`crate::Instruction::parameter`]).
    ArgIndex(u16),
    Member(MemberRef),
    /// The element type of a typed array-element opcode, when statically
    /// known (`ldelem.i4`, …); `None` for the generic encoded-type forms
    /// (`ldelem`/`stelem` with a [`Operand::Member`] operand instead).
    ElementType(CilType),
    /// Relative offsets of a `switch` instruction's jump table, in
    /// declaration order.
    SwitchTargets(Vec<i32>),
    /// A string literal's content for `ldstr`.
    String(String),
}
