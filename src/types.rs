use nix::errno::Errno;
use thiserror::Error;

/// Exit status of a child whose program could not be found anywhere.
pub const EXIT_NOT_FOUND: i32 = 127;
/// Exit status of a child whose program exists but could not be executed.
pub const EXIT_CANNOT_EXECUTE: i32 = 126;
/// Exit status of a child that failed to open a redirection target.
pub const EXIT_REDIRECT_FAILED: i32 = 1;
/// Status reported for a syntax error on the command line.
pub const EXIT_SYNTAX_ERROR: i32 = 2;
/// Added to the signal number when a child is killed by a signal.
pub const EXIT_SIGNAL_BASE: i32 = 128;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("{0}")]
    IoError(#[from] std::io::Error),
    #[error("{1}: {0}")]
    NixError(Errno, String),
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("syntax error: {0}")]
    InvalidSyntax(String),
    #[error("{path}: {source}")]
    Redirect {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cd: {path}: {source}")]
    ChangeDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ShellError {
    /// Status the interpreter records when a line fails with this error.
    pub fn status(&self) -> i32 {
        match self {
            ShellError::ParseError(_) | ShellError::InvalidSyntax(_) => EXIT_SYNTAX_ERROR,
            ShellError::Redirect { .. } => EXIT_REDIRECT_FAILED,
            _ => 1,
        }
    }
}

/// Attaches the name of the failing operation to a `nix` error.
pub trait NixContext<T> {
    fn context(self, what: &str) -> Result<T, ShellError>;
}

impl<T> NixContext<T> for nix::Result<T> {
    fn context(self, what: &str) -> Result<T, ShellError> {
        self.map_err(|errno| ShellError::NixError(errno, what.to_string()))
    }
}

pub type ExecuteResult = Result<i32, ShellError>;
