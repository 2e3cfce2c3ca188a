use std::fmt::{self, Display};
use std::io;

/// The root error type of the CLI binary.
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

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

/// The specific kind of an [`Error`].
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The command line did not match the grammar (bad token, missing
    /// assembly path, unknown optimization or parameter).
    Argument(String),
    /// Reading or writing an assembly container failed.
    Assembly(ilopt::Error),
    /// A filesystem operation outside the container layer failed (creating
    /// `./optimized/`, prompting for overwrite, and so on).
    Io(io::Error),
    /// The supplied `filter=` value was not a valid regular expression.
    Filter(regex::Error),
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
            Self::Argument(message) => write!(f, "{message}"),
            Self::Assembly(error) => write!(f, "assembly I/O error: {error}"),
            Self::Io(error) => Display::fmt(error, f),
            Self::Filter(error) => write!(f, "invalid filter regex: {error}"),
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
    impl From<ilopt::Error> for Error::Assembly;
    impl From<io::Error> for Error::Io;
    impl From<regex::Error> for Error::Filter;
}
