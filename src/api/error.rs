use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::borrow::Cow;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Not Found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Internal Server Error")]
    InternalServer,
}

#[derive(serde::Serialize)]
pub struct ErrorBody {
    pub message: Cow<'static, str>,
}

impl Error {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(msg.into())
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match *self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InternalServer => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut res = HttpResponse::build(self.status_code());

        match self {
            Error::BadRequest(msg) | Error::NotFound(msg) => {
                res.json(ErrorBody { message: msg.clone() })
            }
            Error::InternalServer => {
                res.json(ErrorBody { message: "Internal Server Error".into() })
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SystemError {
    // sqlx errors
    #[error("Database Error : {0}")]
    DatabaseError(Cow<'static, str>),
    #[error("Migration Error")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    // Friendship errors
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Forbidden: {0}")]
    Forbidden(Cow<'static, str>),
    #[error("Not Found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Conflict: {0}")]
    Conflict(Cow<'static, str>),
    #[error("Invalid State: {0}")]
    InvalidState(Cow<'static, str>),
    #[error("Internal System Error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug)]
pub struct DbErrorMeta {
    pub code: Option<String>,
    pub constraint: Option<String>,
    pub message: String,
}

fn conflict_message(meta: &DbErrorMeta) -> Cow<'static, str> {
    match meta.constraint.as_deref() {
        Some("uq_friendships_pair") => "Friendship already exists between these users".into(),
        Some("friendships_pkey") => "Friendship id already exists".into(),
        _ => "Duplicate value".into(),
    }
}

fn check_message(meta: &DbErrorMeta) -> Cow<'static, str> {
    match meta.constraint.as_deref() {
        Some("ck_friendships_distinct_users") => "Cannot send friend request to yourself".into(),
        _ => meta.message.clone().into(),
    }
}

impl From<SystemError> for Error {
    fn from(value: SystemError) -> Self {
        match value {
            SystemError::BadRequest(msg)
            | SystemError::Forbidden(msg)
            | SystemError::NotFound(msg)
            | SystemError::Conflict(msg)
            | SystemError::InvalidState(msg) => Error::BadRequest(msg),
            _ => {
                log::error!("Internal Server Error: {:?}", value);
                Error::InternalServer
            }
        }
    }
}

impl From<sqlx::Error> for SystemError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let meta = DbErrorMeta {
                code: db_err.code().map(|s| s.to_string()),
                constraint: db_err.constraint().map(|s| s.to_string()),
                message: db_err.message().to_string(),
            };
            match meta.code.as_deref() {
                Some("23505") => return SystemError::Conflict(conflict_message(&meta)),
                Some("23514") => return SystemError::BadRequest(check_message(&meta)),
                _ => {
                    log::error!("Unhandled DB error: {:?}", meta);
                    return SystemError::DatabaseError(meta.message.into());
                }
            }
        }
        log::error!("{:?}", err);
        SystemError::InternalError(Box::new(err))
    }
}

impl SystemError {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn forbidden(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_state(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        let msg: String = msg.into();
        Self::InternalError(msg.into())
    }

    /// Stable label for the failure, used as a structured field in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SystemError::BadRequest(_) => "invalid_argument",
            SystemError::Forbidden(_) => "forbidden",
            SystemError::NotFound(_) => "not_found",
            SystemError::Conflict(_) => "conflict",
            SystemError::InvalidState(_) => "invalid_state",
            SystemError::DatabaseError(_)
            | SystemError::MigrationError(_)
            | SystemError::InternalError(_) => "internal",
        }
    }
}
