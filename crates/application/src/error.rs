use domain::{DomainError, ErrorKind, RepositoryError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("repository error: {0}")]
    Repository(RepositoryError),
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl ApplicationError {
    pub fn infrastructure(message: impl Into<String>) -> Self {
        ApplicationError::Infrastructure(message.into())
    }

    /// 业务错误分类；存储与基础设施故障返回 `None`。
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ApplicationError::Domain(err) => Some(err.kind()),
            ApplicationError::Repository(_) | ApplicationError::Infrastructure(_) => None,
        }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        ApplicationError::Repository(value)
    }
}
