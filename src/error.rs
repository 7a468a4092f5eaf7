// Error types surfaced by store operations

use thiserror::Error;

/// Errors reported to callers of the store
///
/// Malformed field input is not an error: it is replaced by a default or
/// clamped at the add/update/import boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// An operation referenced an id that is not in the collection
    #[error("no {collection} record with id {id}")]
    NotFound { collection: &'static str, id: u64 },

    /// An import payload was not a JSON array or could not be parsed
    #[error("invalid import document: {0}")]
    Format(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::NotFound {
            collection: "products",
            id: 7,
        };
        assert_eq!(err.to_string(), "no products record with id 7");

        let err = StoreError::Format("expected a JSON array".to_string());
        assert_eq!(err.to_string(), "invalid import document: expected a JSON array");
    }
}
