pub mod member;
pub mod project;
pub mod task;

pub use member::*;
pub use project::*;
pub use task::*;

use async_graphql::{Result, ID};

use crate::graphql::errors::StructuredError;

/// Parse a wire identifier into a database key, failing fast with an
/// invalid-argument error that names the bad value.
pub(crate) fn parse_id(field: &str, value: &ID) -> Result<i32> {
    value
        .parse::<i32>()
        .map_err(|_| StructuredError::invalid_argument(field, value.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_accepts_numeric() {
        assert_eq!(parse_id("id", &ID("7".to_string())).unwrap(), 7);
    }

    #[test]
    fn test_parse_id_rejects_malformed() {
        let err = parse_id("projectId", &ID("abc".to_string())).unwrap_err();
        assert!(err.message.contains("projectId"));
        assert!(err.message.contains("abc"));
    }
}
