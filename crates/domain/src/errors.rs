//! 领域模型错误定义
//!
//! 会话网关对外只暴露三类业务错误：资源不存在、无权访问、输入不合法。
//! 存储层故障单独归入 [`RepositoryError`]，不属于业务错误。

use thiserror::Error;

/// 业务错误分类，供接口层映射状态码使用。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    Validation,
}

/// 领域模型错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// 职位申请（会话）不存在
    #[error("application not found")]
    ApplicationNotFound,

    /// 申请尚未被接受，聊天未开放
    #[error("chat not available")]
    ChatNotAvailable,

    /// 调用者不是该申请的参与方
    #[error("not a participant")]
    NotParticipant,

    /// 输入校验失败
    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: String, reason: String },
}

impl DomainError {
    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ApplicationNotFound => ErrorKind::NotFound,
            Self::ChatNotAvailable | Self::NotParticipant => ErrorKind::Forbidden,
            Self::InvalidArgument { .. } => ErrorKind::Validation,
        }
    }
}

/// 仓储层错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("storage error: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

impl From<DomainError> for RepositoryError {
    // 存储中的数据无法还原为合法的领域对象
    fn from(value: DomainError) -> Self {
        Self::storage(format!("invalid stored data: {value}"))
    }
}
