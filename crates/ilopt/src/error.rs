use std::fmt::{self, Display};
use std::io;

use ilopt_cil::InstructionFamily;

/// The root error type of this crate.
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
    /// CFG construction reached a `Phi` instruction, or a `Meta` opcode
    /// other than a recognized prefix.
    UnsupportedFlow { offset: u32 },
    /// The abstract stack simulator encountered an instruction family it
    /// does not model.
    UnsupportedFamily {
        family: InstructionFamily,
        offset: u32,
    },
    /// The abstract stack simulator tried to pop more slots than are on
    /// the abstract stack.
    StackUnderflow { offset: u32 },
    /// A decoding or resolution error surfaced from the CIL data model.
    Cil(ilopt_cil::Error),
    /// Reading or writing the assembly container failed.
    Io(io::Error),
    /// The container's on-disk format was malformed.
    Container(String),
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
            Self::UnsupportedFlow { offset } => {
                write!(f, "unsupported control flow at offset {offset:#06x}")
            }
            Self::UnsupportedFamily { family, offset } => write!(
                f,
                "stack simulator does not model {family:?} (at offset {offset:#06x})"
            ),
            Self::StackUnderflow { offset } => {
                write!(f, "abstract stack underflow at offset {offset:#06x}")
            }
            Self::Cil(error) => Display::fmt(error, f),
            Self::Io(error) => Display::fmt(error, f),
            Self::Container(message) => write!(f, "malformed assembly container: {message}"),
        }
    }
}

macro_rules! impl_from {
    ( $( impl From<$from:path> for Error::$name:ident );* $(;)? ) => {
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

impl_from! {
    impl From<ilopt_cil::Error> for Error::Cil;
    impl From<io::Error> for Error::Io;
}
