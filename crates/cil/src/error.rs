use std::fmt::{self, Display};

use crate::Opcode;

/// The root error type for this crate.
#[derive(Debug)]
pub struct Error {
    kind: Box<ErrorKind>,
}

impl Error {
    fn from_kind(kind: ErrorKind) -> Self {
        Self {
            kind: Box::new(kind),
        }
    }

    /// Returns the [`ErrorKind`] of this [`Error`].
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

/// The specific kind of an [`Error`].
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An opcode's numeric code does not correspond to any known CIL opcode.
    UnknownOpcode { code: u16 },
    /// An operand decoder was invoked on an instruction of the wrong family.
    FamilyMismatch {
        expected: &'static str,
        opcode: Opcode,
    },
    /// A type has no well-defined evaluation-stack slot size (e.g. `void`).
    NoSlotSize { ty: &'static str },
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&*self.kind, f)
    }
}

impl std::error::Error for ErrorKind {}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOpcode { code } => {
                write!(f, "opcode with numeric code {code:#06x} is not known")
            }
            Self::FamilyMismatch { expected, opcode } => write!(
                f,
                "expected an instruction of family {expected}, found {opcode:?}"
            ),
            Self::NoSlotSize { ty } => write!(f, "type `{ty}` has no evaluation-stack slot size"),
        }
    }
}

macro_rules! impl_from {
    ( $( impl From<$from:ident> for Error::$name:ident );* $(;)? ) => {
        $(
            impl From<$from> for Error {
                #[cold]
                fn from(error: $from) -> Self {
                    Self::from_kind(ErrorKind::$name(error))
                }
            }
        )*
    }
}

impl From<ErrorKind> for Error {
    #[cold]
    fn from(kind: ErrorKind) -> Self {
        Self::from_kind(kind)
    }
}

// No external error sources are wrapped today; the macro is kept around so
// the next one added here follows the same boilerplate as the rest of the
// workspace instead of growing an ad hoc `impl From`.
impl_from! {}
