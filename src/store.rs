use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Author recorded when a new book does not carry one.
pub const UNKNOWN_AUTHOR: &str = "Desconocido";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    #[schema(example = 2)]
    pub id: i64,
    #[schema(example = "1984")]
    pub name: String,
    #[schema(example = 1949)]
    pub year_of_publication: i64,
    #[schema(example = "George Orwell")]
    pub author: String,
}

/// A book that passed the payload checks and waits for an id.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewBook {
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub name: String,
    pub year_of_publication: i64,
    pub author: String,
}

/// Ordered in-memory collection of books plus the counter minting their ids.
#[derive(Debug, Clone)]
pub struct BookStore {
    books: Vec<Book>,
    next_id: i64,
}

impl BookStore {
    pub fn new(books: Vec<Book>) -> Self {
        let next_id = books.iter().map(|book| book.id).max().unwrap_or(0) + 1;

        Self { books, next_id }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The four records every fresh process starts with.
    pub fn seeded() -> Self {
        let seed = [
            (1, "Cien años de soledad", 1967, "Gabriel García Márquez"),
            (2, "1984", 1949, "George Orwell"),
            (3, "Un Mundo Feliz", 1932, "Aldous Huxley"),
            (4, "El Gran Gatsby", 1925, "F. Scott Fitzgerald"),
        ];

        let books = seed
            .into_iter()
            .map(|(id, name, year_of_publication, author)| Book {
                id,
                name: name.to_string(),
                year_of_publication,
                author: author.to_string(),
            })
            .collect();

        Self::new(books)
    }

    pub fn list(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn next_id(&self) -> i64 {
        self.next_id
    }

    pub fn find_by_id(&self, id: i64) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    /// Case-insensitive substring match on the book name, in store order.
    pub fn search_by_name(&self, term: &str) -> Vec<Book> {
        let term = term.to_lowercase();

        self.books
            .iter()
            .filter(|book| book.name.to_lowercase().contains(&term))
            .cloned()
            .collect()
    }

    /// Mints the next id and appends the book.
    ///
    /// Callers sharing the store must hold exclusive access for the whole call.
    pub fn create(&mut self, new_book: NewBook) -> Book {
        let book = Book {
            id: self.next_id,
            name: new_book.name,
            year_of_publication: new_book.year_of_publication,
            author: new_book.author,
        };

        self.next_id += 1;
        self.books.push(book.clone());

        book
    }
}

impl Default for BookStore {
    fn default() -> Self {
        Self::seeded()
    }
}
