use serde::{Deserialize, Serialize};

/// A catalogue entry as held by the book store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Identifier assigned when the catalogue is defined
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Creation time in epoch seconds; exposed as `createdAt`
    pub begin_with: i64,
}
