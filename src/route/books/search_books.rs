use axum::extract::State;
use schemars::JsonSchema;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::{
        ApiError, ApiErrorMessage, ErrorVerbosityProvider, NotFoundError, NotFoundErrorType,
        ValidationError, ValidationErrorType,
    },
    extractor::query::ApiQuery,
    state::ApiState,
    store::Book,
};

use super::BooksResponse;

/// Repeated keys are allowed, the first `name` wins.
#[derive(Debug, Deserialize, JsonSchema, IntoParams)]
#[serde(from = "Vec<(String, String)>")]
#[into_params(parameter_in = Query)]
pub struct SearchBooksQuery {
    /// Text looked up, ignoring case, inside every book name.
    pub name: Option<String>,
}

impl From<Vec<(String, String)>> for SearchBooksQuery {
    fn from(pairs: Vec<(String, String)>) -> Self {
        let name = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "name").then_some(value));

        SearchBooksQuery { name }
    }
}

/// Search books whose name contains the given text
#[utoipa::path(
    get,
    path = "/libros/buscar",
    tag = "libros",
    params(SearchBooksQuery),
    responses(
        (status = 200, description = "Matching books in insertion order", body = [Book]),
        (status = 400, description = "`name` is missing or empty", body = ApiErrorMessage),
        (status = 404, description = "No book name contains the text", body = ApiErrorMessage)
    )
)]
pub async fn search_books(
    State(state): State<ApiState>,
    ApiQuery(query): ApiQuery<SearchBooksQuery>,
) -> Result<BooksResponse, ApiError> {
    let verbosity = state.error_verbosity();

    let name = match query.name {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(
                ValidationError::new(verbosity, ValidationErrorType::MissingSearchName).into(),
            )
        }
    };

    let found = state.store().read().await.search_by_name(&name);

    tracing::debug!(%name, count = found.len(), "Searched books");

    if found.is_empty() {
        return Err(NotFoundError::new(verbosity, NotFoundErrorType::NoMatches { name }).into());
    }

    Ok(BooksResponse(found))
}
