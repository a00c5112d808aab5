use axum::extract::State;

use crate::{
    error::{
        ApiError, ApiErrorMessage, ErrorVerbosityProvider, NotFoundError, NotFoundErrorType,
        ValidationError, ValidationErrorType,
    },
    extractor::path::ApiPath,
    state::ApiState,
    store::Book,
};

use super::BookResponse;

/// Parses the `:id` segment the lenient way: leading whitespace is skipped, then an optional
/// sign and the leading decimal digits are read and the rest is ignored, so `2abc` is `2`.
/// Only a segment without leading digits, or one that does not fit an `i64`, is rejected.
fn parse_book_id(raw: &str) -> Result<i64, ValidationErrorType> {
    let invalid = || ValidationErrorType::InvalidId {
        raw: raw.to_string(),
    };

    let trimmed = raw.trim_start();
    let unsigned = trimmed.trim_start_matches(|c: char| c == '+' || c == '-');
    let sign_len = trimmed.len() - unsigned.len();

    if sign_len > 1 {
        return Err(invalid());
    }

    let digits_len = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());

    if digits_len == 0 {
        return Err(invalid());
    }

    trimmed[..sign_len + digits_len]
        .parse::<i64>()
        .map_err(|_| invalid())
}

/// Get a book by its id
#[utoipa::path(
    get,
    path = "/libros/{id}",
    tag = "libros",
    params(
        ("id" = i64, Path, description = "Book id")
    ),
    responses(
        (status = 200, description = "The book", body = Book),
        (status = 400, description = "The id is not a number", body = ApiErrorMessage),
        (status = 404, description = "No book has this id", body = ApiErrorMessage)
    )
)]
pub async fn get_book(
    State(state): State<ApiState>,
    ApiPath(raw_id): ApiPath<String>,
) -> Result<BookResponse, ApiError> {
    let verbosity = state.error_verbosity();

    let id = parse_book_id(&raw_id).map_err(|kind| ValidationError::new(verbosity, kind))?;

    let book = state.store().read().await.find_by_id(id).cloned();

    match book {
        Some(book) => Ok(BookResponse(book)),
        None => {
            tracing::debug!(id, "Book not found");

            Err(NotFoundError::new(verbosity, NotFoundErrorType::Book { id }).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_signed_integers() {
        assert_eq!(parse_book_id("2"), Ok(2));
        assert_eq!(parse_book_id("-7"), Ok(-7));
        assert_eq!(parse_book_id("+3"), Ok(3));
    }

    #[test]
    fn reads_leading_integer_and_ignores_the_rest() {
        assert_eq!(parse_book_id("2abc"), Ok(2));
        assert_eq!(parse_book_id("1.5"), Ok(1));
        assert_eq!(parse_book_id(" 1"), Ok(1));
        assert_eq!(parse_book_id("\t-4x"), Ok(-4));
        assert_eq!(parse_book_id("007"), Ok(7));
    }

    #[test]
    fn rejects_segments_without_leading_digits() {
        let rejected = [
            "buscar",
            "abc",
            "",
            " ",
            "-",
            "+-1",
            "--1",
            "x2",
            ".5",
            "99999999999999999999",
        ];

        for raw in rejected {
            assert_eq!(
                parse_book_id(raw),
                Err(ValidationErrorType::InvalidId {
                    raw: raw.to_string()
                }),
                "{raw:?} must be rejected"
            );
        }
    }
}
