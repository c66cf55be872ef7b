//! Error types for sqlent.

use thiserror::Error;

/// The main error type for sqlent operations.
///
/// Every variant is raised synchronously while resolving metadata or
/// compiling a statement; nothing reaches the execution layer once one of
/// these has been returned.
#[derive(Debug, Error)]
pub enum SqlentError {
    /// Malformed entity, property or join declarations.
    #[error("Metadata error in '{entity}': {message}")]
    Metadata { entity: String, message: String },

    /// A join dependency cycle or a property reference chain that loops.
    #[error("Cycle detected in '{entity}': {message}")]
    Cycle { entity: String, message: String },

    /// A join criterion references a join that is not declared.
    #[error("Unresolvable join [{join}]->[{target}] in '{entity}'")]
    UnresolvableJoin {
        entity: String,
        join: String,
        target: String,
    },

    /// A property path names a property that does not exist.
    #[error("Unresolvable property: '{0}'")]
    UnresolvableProperty(String),

    /// A property path names an entity binding that does not exist.
    #[error("No such entity bound: '{0}'")]
    UnknownEntity(String),

    /// A dialect cannot render a construct. Signals a bug or a misconfigured dialect.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Null, blank or otherwise unusable input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failed to parse textual criteria, ordering, updates or projections.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SqlentError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create a metadata error for an entity.
    pub fn metadata(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Metadata {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Create a cycle error for an entity.
    pub fn cycle(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Cycle {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an unsupported operation error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedOperation(message.into())
    }
}

/// Result type alias for sqlent operations.
pub type SqlentResult<T> = Result<T, SqlentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SqlentError::parse(5, "unexpected character");
        assert_eq!(
            err.to_string(),
            "Parse error at position 5: unexpected character"
        );
    }

    #[test]
    fn test_unresolvable_join_display() {
        let err = SqlentError::UnresolvableJoin {
            entity: "Post".into(),
            join: "joinAuthor".into(),
            target: "joinBlog".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unresolvable join [joinAuthor]->[joinBlog] in 'Post'"
        );
    }
}
