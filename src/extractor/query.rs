use axum::{
    async_trait,
    extract::{FromRequestParts, Query as AxumQuery},
    http::request::Parts,
};
use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::error::{
    ApiError, ErrorVerbosityProvider, InternalServerError, ValidationError, ValidationErrorType,
};

/// A Wrapper around [`axum::extract::Query`] that rejects with an [`ApiError`].
///
/// Extracts query parameters from the request.
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + JsonSchema + Debug + Send,
    S: Send + Sync + ErrorVerbosityProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "query_extractor", skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let query = AxumQuery::<T>::from_request_parts(parts, state).await;

        match query {
            Ok(query) => {
                tracing::trace!(query=?query.0, "Extracted");

                Ok(ApiQuery(query.0))
            }
            Err(query_rejection) => {
                tracing::warn!(rejection=?query_rejection, "Rejection");

                let verbosity = state.error_verbosity();

                // The only query the service reads is the book search.
                let expected_schema = verbosity
                    .should_generate_error_reason()
                    .then(|| serde_yaml::to_string(&schema_for!(T)))
                    .transpose()
                    .map_err(|err| InternalServerError::from_generic_error(verbosity, err))?;

                Err(
                    ValidationError::new(verbosity, ValidationErrorType::MissingSearchName)
                        .with_expected_schema(expected_schema)
                        .into(),
                )
            }
        }
    }
}
