use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The crate's error type.
#[derive(Debug)]
pub enum MlErr {
    /// Invalid construction or training parameters, raised before anything is mutated.
    InvalidConfig(String),
    /// An operation was invoked before the network was compiled.
    NotCompiled { op: &'static str },
    /// A metric, activation or gradient produced a NaN or an infinity.
    NonFinite { what: &'static str, epoch: usize },
    SizeMismatch {
        a: &'static str,
        b: &'static str,
        got: usize,
        expected: usize,
    },
    /// The closed-form normal equations are not positive definite.
    Singular,
}

impl MlErr {
    pub(crate) fn config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            MlErr::NotCompiled { op } => {
                write!(f, "tried to {op} before compiling the network")
            }
            MlErr::NonFinite { what, epoch } => {
                write!(f, "non-finite {what} found at epoch {epoch}")
            }
            MlErr::SizeMismatch {
                a,
                b,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch between {a} and {b}, got {got} and expected {expected}"
            ),
            MlErr::Singular => write!(f, "the normal equations matrix is singular"),
        }
    }
}

impl Error for MlErr {}

impl From<serde_json::Error> for MlErr {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidConfig(value.to_string())
    }
}
