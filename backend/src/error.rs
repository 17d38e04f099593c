use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use log::error;

use crate::db::DbError;

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("Database connection error")]
    DbConnection,
    #[error("Database error: {0}")]
    Database(DbError),
    #[error("{field} is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
    #[error("Worker pool error: {0}")]
    Blocking(#[from] BlockingError),
}

impl From<DbError> for WebError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Connection(_) => WebError::DbConnection,
            other => WebError::Database(other),
        }
    }
}

impl ResponseError for WebError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        error!("{self}");
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}
