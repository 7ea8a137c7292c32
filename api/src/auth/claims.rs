use serde::{Deserialize, Serialize};
use util::paths::AccountKind;

/// Which account table the token subject lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Teacher,
    Student,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        self.account_kind().as_str()
    }

    pub fn account_kind(&self) -> AccountKind {
        match self {
            UserType::Teacher => AccountKind::Teacher,
            UserType::Student => AccountKind::Student,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: i64,
    pub user_type: UserType,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn id(&self) -> i64 {
        self.0.sub
    }
}
