
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Ambiguous specification: {0}")]
    Ambiguous(String),
    #[error("Invalid traversal: {0}")]
    InvalidTraversal(String),
    #[error("Parse error: {message}")]
    Parse { message: String, input: String },
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Edit error: {0}")]
    Edit(String),
}

pub type Result<T> = std::result::Result<T, QueryError>;

// Helper conversions
impl From<config::ConfigError> for QueryError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}

impl QueryError {
    pub(crate) fn parse(message: impl Into<String>, input: &str) -> Self {
        Self::Parse { message: message.into(), input: input.to_string() }
    }
}
