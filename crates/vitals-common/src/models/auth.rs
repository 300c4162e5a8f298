use serde::{Deserialize, Serialize};

use super::user::Role;

/// Session JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Account session version at issue time
    pub ver: i64,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}
