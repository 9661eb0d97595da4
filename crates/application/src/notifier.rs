use async_trait::async_trait;
use domain::{ApplicationId, Message, UserId};
use thiserror::Error;

/// 新消息提醒：发给会话中的另一方。具体投递方式不在核心范围内。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NewMessageNotice {
    pub application_id: ApplicationId,
    pub recipient_id: UserId,
    pub message: Message,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notify failed: {0}")]
    Failed(String),
}

impl NotifyError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageNotifier: Send + Sync {
    async fn notify(&self, notice: NewMessageNotice) -> Result<(), NotifyError>;
}
