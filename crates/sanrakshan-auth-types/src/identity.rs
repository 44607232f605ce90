//! Gateway-injected identity headers extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use sanrakshan_domain::id::UserId;
use sanrakshan_domain::user::UserRole;

/// Header carrying the authenticated account id (UUID).
pub const USER_ID_HEADER: &str = "x-sanrakshan-user-id";

/// Header carrying the authenticated account role (`u8` wire value).
pub const USER_ROLE_HEADER: &str = "x-sanrakshan-user-role";

/// Caller identity injected by the gateway via [`USER_ID_HEADER`] and [`USER_ROLE_HEADER`].
///
/// Returns 401 if either header is absent or unparseable, or the role is unknown.
/// Role enforcement (403) is done by handlers after extraction.
#[derive(Debug, Clone, Copy)]
pub struct IdentityHeaders {
    pub user_id: UserId,
    pub role: UserRole,
}

impl IdentityHeaders {
    /// The caller's id if they hold staff privileges.
    pub fn staff_id(&self) -> Option<UserId> {
        self.role.is_staff().then_some(self.user_id)
    }
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 declares this as `fn -> impl Future + Send`; read the headers
    // synchronously and return a 'static future.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok())
            .map(UserId);

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u8>().ok())
            .and_then(UserRole::from_u8);

        async move {
            let user_id = user_id.ok_or(StatusCode::UNAUTHORIZED)?;
            let role = role.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self { user_id, role })
        }
    }
}
