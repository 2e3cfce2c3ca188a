use crate::error::{Error, ErrorKind};
use crate::refs::TypeRef;

/// A CIL type reference, reduced to exactly the shape the stack simulator's
/// `sizeOf` table needs to distinguish.
///
/// This is not a full type system: generic instantiation, arrays-of-arrays,
/// and custom modifiers are represented just deeply enough to recurse
/// through [`CilType::slot_size`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CilType {
    Void,
    Bool,
    Char,
    I1,
    U1,
    I2,
    U2,
    I4,
    U4,
    I8,
    U8,
    R4,
    R8,
    IntPtr,
    UIntPtr,
    String,
    Object,
    TypedByReference,
    Sentinel,
    Pointer(Box<CilType>),
    ByReference(Box<CilType>),
    FunctionPointer,
    Array(Box<CilType>),
    Class(TypeRef),
    /// A plain value type, or (when `underlying` is set) an enum whose
    /// storage is the wrapped primitive type.
    ValueType {
        ty: TypeRef,
        underlying: Option<Box<CilType>>,
    },
    GenericVar(u32),
    GenericMVar(u32),
    Pinned(Box<CilType>),
    RequiredModifier(Box<CilType>),
    OptionalModifier(Box<CilType>),
}

impl CilType {
    /// Returns the evaluation-stack slot size in bytes (4 or 8) used by the
    /// abstract stack simulator (component D).
    ///
    /// # Errors
    ///
    /// Returns an error for types that may never occupy an evaluation stack
    /// slot (`void`, `typedref`, `...` sentinel).
    pub fn slot_size(&self) -> Result<u32, Error> {
        let size = match self {
            Self::Void => {
                return Err(ErrorKind::NoSlotSize { ty: "void" }.into());
            }
            Self::TypedByReference => {
                return Err(ErrorKind::NoSlotSize { ty: "typedref" }.into());
            }
            Self::Sentinel => {
                return Err(ErrorKind::NoSlotSize { ty: "..." }.into());
            }
            Self::I8 | Self::U8 | Self::R8 => 8,
            Self::ValueType {
                underlying: Some(underlying),
                ..
            } => underlying.slot_size()?,
            Self::ValueType { .. } => 4,
            Self::RequiredModifier(inner) | Self::OptionalModifier(inner) => inner.slot_size()?,
            Self::Pinned(inner) => inner.slot_size()?,
            Self::Bool
            | Self::Char
            | Self::I1
            | Self::U1
            | Self::I2
            | Self::U2
            | Self::I4
            | Self::U4
            | Self::R4
            | Self::String
            | Self::Object
            | Self::Pointer(_)
            | Self::ByReference(_)
            | Self::Array(_)
            | Self::Class(_)
            | Self::IntPtr
            | Self::UIntPtr
            | Self::FunctionPointer
            | Self::GenericVar(_)
            | Self::GenericMVar(_) => 4,
        };
        Ok(size)
    }
}
