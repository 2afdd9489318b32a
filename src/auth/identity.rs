use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::api::error::ServiceError;

/// Identity resolved by the authentication middleware.
///
/// Handlers take this as an extractor; extraction fails with 401 when
/// the middleware did not run or rejected the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
    pub read_only: bool,
}

impl AuthUser {
    /// Precondition for mutating endpoints; the demo identity may only read
    pub fn require_writable(&self) -> Result<(), ServiceError> {
        if self.read_only {
            Err(ServiceError::ReadOnly)
        } else {
            Ok(())
        }
    }
}

impl FromRequest for AuthUser {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<AuthUser>().copied();
        ready(user.ok_or_else(|| {
            ServiceError::Unauthorized("No authenticated user on request".to_string())
        }))
    }
}
