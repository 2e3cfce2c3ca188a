use crate::ty::CilType;

/// An opaque handle to a type definition or reference.
///
/// Real ECMA-335 metadata tokens are out of scope for this crate (see the
/// assembly container in `ilopt`); this is just enough of a handle for the
/// analyses to compare types for identity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef(pub u32);

/// A reference to a field, resolved enough for the stack simulator's
/// `ldfld`/`stfld`/`ldsfld`/`stsfld` rules (it only needs the field's type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    pub declaring_type: TypeRef,
    pub field_type: CilType,
}

/// A reference to a method, resolved enough for the definite-assignment
/// analyzer to recognize constructors and `out` parameters, and for the
/// stack simulator to compute how many argument slots a call consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRef {
    pub declaring_type: TypeRef,
    pub is_constructor: bool,
    pub has_this: bool,
    pub explicit_this: bool,
    /// Parameter types in declaration order (not including an implicit `this`).
    pub parameters: Vec<CilType>,
    /// Parallel to `parameters`: `true` for parameters declared `out`.
    pub out_parameters: Vec<bool>,
    pub return_type: Option<CilType>,
}

impl MethodRef {
    /// Returns whether the parameter at `index` is declared `out`.
    pub fn is_out_parameter(&self, index: usize) -> bool {
        self.out_parameters.get(index).copied().unwrap_or(false)
    }
}

/// The operand of a `call`/`callvirt`/`newobj`/`jmp`/`ldftn`/`ldvirtftn`,
/// or of a `castclass`/`isinst`/`box`/`unbox`/`newarr`/`ldtoken`/`sizeof`/
/// `initobj`/`cpobj`/`ldobj`/`stobj`/`mkrefany`/`refanyval`/`constrained`
/// instruction — whichever of a method, field, or bare type the opcode calls for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberRef {
    Method(MethodRef),
    Field(FieldRef),
    Type(TypeRef),
}
