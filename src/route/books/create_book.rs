use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{
        ApiError, ApiErrorMessage, ErrorVerbosityProvider, ValidationError, ValidationErrorType,
    },
    extractor::json::ApiJson,
    state::ApiState,
    store::{Book, NewBook, UNKNOWN_AUTHOR},
};

/// Book creation body as received.
///
/// Only JSON objects are accepted. Fields are kept untyped so every presence and type check
/// happens in [`NewBook::try_from`]. A `null` field counts as absent.
#[derive(Debug, Default, Deserialize, JsonSchema, ToSchema)]
#[serde(from = "Map<String, Value>")]
pub struct CreateBookPayload {
    #[schema(value_type = String, example = "Pedro Páramo")]
    pub name: Option<Value>,
    #[schema(value_type = i64, example = 1955)]
    pub year_of_publication: Option<Value>,
    #[schema(value_type = Option<String>, example = "Juan Rulfo")]
    pub author: Option<Value>,
}

impl From<Map<String, Value>> for CreateBookPayload {
    fn from(mut fields: Map<String, Value>) -> Self {
        let mut take = |key: &str| fields.remove(key).filter(|value| !value.is_null());

        CreateBookPayload {
            name: take("name"),
            year_of_publication: take("year_of_publication"),
            author: take("author"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookPayloadError {
    #[error("`name` is missing")]
    MissingName,
    #[error("`name` must be a string")]
    NameNotString,
    #[error("`year_of_publication` is missing")]
    MissingYear,
    #[error("`year_of_publication` must be an integer")]
    YearNotInteger,
    #[error("{0}")]
    Invalid(#[from] validator::ValidationErrors),
}

impl TryFrom<CreateBookPayload> for NewBook {
    type Error = BookPayloadError;

    fn try_from(payload: CreateBookPayload) -> Result<Self, Self::Error> {
        let name = match payload.name {
            Some(Value::String(name)) => name,
            Some(_) => return Err(BookPayloadError::NameNotString),
            None => return Err(BookPayloadError::MissingName),
        };

        let year_of_publication = match payload.year_of_publication {
            Some(year) => year.as_i64().ok_or(BookPayloadError::YearNotInteger)?,
            None => return Err(BookPayloadError::MissingYear),
        };

        let author = match payload.author {
            Some(Value::String(author)) if !author.is_empty() => author,
            _ => UNKNOWN_AUTHOR.to_string(),
        };

        let new_book = NewBook {
            name,
            year_of_publication,
            author,
        };

        new_book.validate()?;

        Ok(new_book)
    }
}

/// The created book answered with [`StatusCode::CREATED`].
#[derive(Debug)]
pub struct CreatedBookResponse(pub Book);

impl IntoResponse for CreatedBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

/// Create a book with the next free id
#[utoipa::path(
    post,
    path = "/libros",
    tag = "libros",
    request_body = CreateBookPayload,
    responses(
        (status = 201, description = "The created book", body = Book),
        (status = 400, description = "Missing or mistyped fields", body = ApiErrorMessage)
    )
)]
pub async fn create_book(
    State(state): State<ApiState>,
    ApiJson(payload): ApiJson<CreateBookPayload>,
) -> Result<CreatedBookResponse, ApiError> {
    let verbosity = state.error_verbosity();

    let new_book = NewBook::try_from(payload).map_err(|err| {
        tracing::warn!(%err, "Invalid book");

        ValidationError::new(
            verbosity,
            ValidationErrorType::InvalidBook {
                reason: err.to_string(),
            },
        )
    })?;

    let book = state.store().write().await.create(new_book);

    tracing::info!(id = book.id, name = %book.name, "Book created");

    Ok(CreatedBookResponse(book))
}
