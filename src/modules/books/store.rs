//! Read-only book catalogue shared by every request.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use super::error::StoreError;
use super::models::Book;

/// Creation time shared by the built-in catalogue entries (2022-02-22T09:35:10Z).
const SEED_BEGIN_WITH: i64 = 1_645_522_510;

const SEED_BOOKS: &[(i64, &str, &str)] = &[
    (1, "The Awakening", "Kate Chopin"),
    (2, "City of Glass", "Paul Auster"),
    (3, "Harry Potter", "J.K. Rowling"),
    (4, "Lord of the Rings", "J.R.R. Tolkien"),
    (5, "Noooo", "Joooo"),
    (6, "Book", "from Author"),
];

/// Immutable, ordered collection of books.
///
/// Cloning is cheap; clones share the same records.
#[derive(Debug, Clone)]
pub struct BookStore {
    books: Arc<[Book]>,
}

impl BookStore {
    /// Build a store from `books`, keeping their order.
    ///
    /// Duplicate ids are accepted; lookups return the first one in order.
    pub fn new(books: Vec<Book>) -> Result<Self, StoreError> {
        let mut seen = HashSet::with_capacity(books.len());
        for book in &books {
            if book.id <= 0 {
                return Err(StoreError::NonPositiveId { id: book.id });
            }
            if book.title.trim().is_empty() {
                return Err(StoreError::EmptyField {
                    id: book.id,
                    field: "title",
                });
            }
            if book.author.trim().is_empty() {
                return Err(StoreError::EmptyField {
                    id: book.id,
                    field: "author",
                });
            }
            if !seen.insert(book.id) {
                tracing::warn!(
                    id = book.id,
                    "duplicate book id; lookups return the first entry"
                );
            }
        }

        Ok(Self {
            books: books.into(),
        })
    }

    /// The built-in six-book catalogue.
    pub fn seeded() -> Self {
        let books: Vec<Book> = SEED_BOOKS
            .iter()
            .map(|&(id, title, author)| Book {
                id,
                title: title.to_string(),
                author: author.to_string(),
                begin_with: SEED_BEGIN_WITH,
            })
            .collect();

        Self {
            books: books.into(),
        }
    }

    /// Load a catalogue from a JSON array of book objects.
    pub fn from_json_file(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let books: Vec<Book> = serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Self::new(books)
    }

    /// All books in catalogue order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// First book in catalogue order with the given id
    pub fn find(&self, id: i64) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl Default for BookStore {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: i64, title: &str, author: &str) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: author.to_string(),
            begin_with: 0,
        }
    }

    fn scratch_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "bookshelf-store-{}-{}.json",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn seeded_store_keeps_definition_order() {
        let store = BookStore::seeded();
        let ids: Vec<i64> = store.books().iter().map(|book| book.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert!(store
            .books()
            .iter()
            .all(|book| book.begin_with == SEED_BEGIN_WITH));
    }

    #[test]
    fn find_returns_matching_book() {
        let store = BookStore::seeded();
        let found = store.find(3).unwrap();
        assert_eq!(found.title, "Harry Potter");
        assert_eq!(found.author, "J.K. Rowling");
        assert!(store.find(0).is_none());
        assert!(store.find(999).is_none());
    }

    #[test]
    fn duplicate_ids_resolve_to_first_entry() {
        let store = BookStore::new(vec![
            book(7, "First", "A"),
            book(7, "Second", "B"),
        ])
        .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.find(7).unwrap().title, "First");
    }

    #[test]
    fn empty_fields_are_rejected() {
        let err = BookStore::new(vec![book(1, "  ", "Someone")]).unwrap_err();
        assert!(matches!(err, StoreError::EmptyField { id: 1, field: "title" }));

        let err = BookStore::new(vec![book(2, "Title", "")]).unwrap_err();
        assert!(matches!(err, StoreError::EmptyField { id: 2, field: "author" }));
    }

    #[test]
    fn non_positive_ids_are_rejected() {
        let err = BookStore::new(vec![book(0, "Title", "Author")]).unwrap_err();
        assert!(matches!(err, StoreError::NonPositiveId { id: 0 }));
    }

    #[test]
    fn empty_catalogue_is_allowed() {
        let store = BookStore::new(Vec::new()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn catalogue_loads_from_json() {
        let path = scratch_file(
            "valid",
            r#"[{"id": 10, "title": "Dune", "author": "Frank Herbert", "begin_with": 0}]"#,
        );
        let store = BookStore::from_json_file(&path).unwrap();
        assert_eq!(store.books(), &[book(10, "Dune", "Frank Herbert")]);
    }

    #[test]
    fn catalogue_missing_begin_with_fails_to_parse() {
        let path = scratch_file("missing-field", r#"[{"id": 1, "title": "T", "author": "A"}]"#);
        let err = BookStore::from_json_file(&path).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[test]
    fn missing_catalogue_file_fails_to_read() {
        let path = std::env::temp_dir().join("bookshelf-store-does-not-exist.json");
        let err = BookStore::from_json_file(&path).unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }
}
