//! Mock identity for integration tests.
//!
//! Services sit behind a gateway that injects `x-sanrakshan-user-id` and
//! `x-sanrakshan-user-role`. `MockAuth` produces those headers directly so
//! tests need no gateway.

use http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use sanrakshan_auth_types::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
use sanrakshan_domain::id::UserId;
use sanrakshan_domain::user::UserRole;

/// Configurable identity injected into test requests.
#[derive(Debug, Clone, Copy)]
pub struct MockAuth {
    pub user_id: UserId,
    pub role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// A fresh student identity.
    pub fn student() -> Self {
        Self::new(UserId(Uuid::now_v7()), UserRole::Student)
    }

    /// A fresh staff identity.
    pub fn staff() -> Self {
        Self::new(UserId(Uuid::now_v7()), UserRole::Staff)
    }

    /// Header pairs as the gateway would inject them.
    pub fn header_pairs(&self) -> [(HeaderName, HeaderValue); 2] {
        [
            (
                HeaderName::from_static(USER_ID_HEADER),
                HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
            ),
            (
                HeaderName::from_static(USER_ROLE_HEADER),
                HeaderValue::from(u16::from(self.role.as_u8())),
            ),
        ]
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        self.header_pairs().into_iter().collect()
    }
}
