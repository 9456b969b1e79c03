use std::fmt;

/// Fatal build failure. The builder either returns a complete tree or
/// one of these; there is no recoverable error class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildError {
    pub message: String,
}

impl BuildError {
    pub fn error(msg: &str) -> Self {
        BuildError {
            message: msg.to_string(),
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BuildError {}

impl From<&str> for BuildError {
    fn from(msg: &str) -> Self {
        BuildError::error(msg)
    }
}

impl From<String> for BuildError {
    fn from(message: String) -> Self {
        BuildError { message }
    }
}
