use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// 统一的时间戳类型。
pub type Timestamp = DateTime<Utc>;

/// 单条消息允许的最大字符数。
pub const MAX_MESSAGE_LENGTH: usize = 5000;

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            pub fn value(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

integer_id!(
    /// 用户唯一标识（求职者与企业账号共用）。
    UserId
);

integer_id!(
    /// 职位申请标识，同时也是会话标识。
    ApplicationId
);

integer_id!(
    /// 职位标识。
    VacancyId
);

integer_id!(
    /// 消息标识，由存储层单调分配，决定同一时间戳下的先后顺序。
    MessageId
);

/// 经过验证的消息正文。
///
/// 去除首尾空白后不能为空，长度不超过 [`MAX_MESSAGE_LENGTH`]。
/// 正文按原样保存，不做裁剪。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageText(String);

impl MessageText {
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::invalid_argument("messageText", "cannot be empty"));
        }
        if value.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(DomainError::invalid_argument(
                "messageText",
                format!("must be at most {MAX_MESSAGE_LENGTH} characters"),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for MessageText {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<MessageText> for String {
    fn from(value: MessageText) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_text_rejects_blank_input() {
        assert!(MessageText::parse("").is_err());
        assert!(MessageText::parse("   \n\t").is_err());
    }

    #[test]
    fn message_text_keeps_surrounding_whitespace() {
        let text = MessageText::parse("  hello ").expect("valid text");
        assert_eq!(text.as_str(), "  hello ");
    }

    #[test]
    fn message_text_enforces_length_limit() {
        let at_limit = "a".repeat(MAX_MESSAGE_LENGTH);
        assert!(MessageText::parse(at_limit).is_ok());

        let over_limit = "a".repeat(MAX_MESSAGE_LENGTH + 1);
        let err = MessageText::parse(over_limit).unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument { .. }));
    }

    #[test]
    fn ids_serialize_as_plain_integers() {
        let json = serde_json::to_string(&ApplicationId::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
