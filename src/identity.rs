use crate::errors::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};

pub const USER_HEADER: &str = "x-user-id";
const USER_ID_MAX: usize = 128;

/// Storage partition for a caller: local-only guest data or a signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    Guest,
    User(String),
}

impl Namespace {
    pub fn key(&self) -> String {
        match self {
            Namespace::Guest => "zenith_habits_guest".to_string(),
            Namespace::User(id) => format!("zenith_habits_user_{id}"),
        }
    }

    pub fn current_user(&self) -> Option<&str> {
        match self {
            Namespace::Guest => None,
            Namespace::User(id) => Some(id),
        }
    }
}

/// Caller identity as asserted by the upstream auth layer in `x-user-id`.
#[derive(Debug, Clone)]
pub struct Identity(pub Namespace);

impl Identity {
    pub fn from_header(value: Option<&str>) -> Result<Self, AppError> {
        let id = match value.map(str::trim) {
            None | Some("") => return Ok(Identity(Namespace::Guest)),
            Some(id) => id,
        };

        let valid = id.len() <= USER_ID_MAX
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AppError::bad_request("invalid user id"));
        }

        Ok(Identity(Namespace::User(id.to_string())))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(USER_HEADER) {
            Some(value) => Some(
                value
                    .to_str()
                    .map_err(|_| AppError::bad_request("invalid user id"))?,
            ),
            None => None,
        };
        Identity::from_header(header)
    }
}
