use async_graphql::{Error, ErrorExtensions};
use pipeline::PipelineError;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("login required")]
    Unauthenticated,
    #[error("invalid {0}")]
    BadRequest(&'static str),
    #[error("{0}")]
    Internal(&'static str),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Internal(_) => "INTERNAL",
            ApiError::Pipeline(err) => err.code(),
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> Error {
        let message = match self {
            ApiError::Pipeline(PipelineError::Db(err)) => {
                tracing::error!(error = %err, "database failure");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        let field = match self {
            ApiError::Pipeline(err) => err.field(),
            _ => None,
        };
        let code = self.code();
        Error::new(message).extend_with(|_err, e| {
            e.set("code", code);
            if let Some(field) = field {
                e.set("field", field);
            }
        })
    }
}

/// Converts a core or API failure into a coded GraphQL error.
pub fn gql(err: impl Into<ApiError>) -> Error {
    err.into().extend()
}
