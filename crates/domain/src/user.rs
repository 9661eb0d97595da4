use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::UserId;

/// 用户公开角色，只用于展示，不参与授权判断。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    JobSeeker,
    Company,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JobSeeker => "JOB_SEEKER",
            Self::Company => "COMPANY",
            Self::Admin => "ADMIN",
        }
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "JOB_SEEKER" => Ok(Self::JobSeeker),
            "COMPANY" => Ok(Self::Company),
            "ADMIN" => Ok(Self::Admin),
            other => Err(DomainError::invalid_argument(
                "role",
                format!("unknown user role {other}"),
            )),
        }
    }
}

/// 消息发送者的公开资料。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
}
