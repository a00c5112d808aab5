use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::store::Book;

pub mod app;
pub mod create_book;
pub mod get_book;
pub mod list_books;
pub mod search_books;

/// A list of books answered with [`StatusCode::OK`].
#[derive(Debug)]
pub struct BooksResponse(pub Vec<Book>);

impl IntoResponse for BooksResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self.0)).into_response()
    }
}

/// A single book answered with [`StatusCode::OK`].
#[derive(Debug)]
pub struct BookResponse(pub Book);

impl IntoResponse for BookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self.0)).into_response()
    }
}
