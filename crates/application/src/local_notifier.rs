// 进程内的提醒通道
use crate::notifier::{MessageNotifier, NewMessageNotice, NotifyError};
use async_trait::async_trait;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct LocalMessageNotifier {
    sender: broadcast::Sender<NewMessageNotice>,
}

impl LocalMessageNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NewMessageNotice> {
        self.sender.subscribe()
    }
}

impl Default for LocalMessageNotifier {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[async_trait]
impl MessageNotifier for LocalMessageNotifier {
    async fn notify(&self, notice: NewMessageNotice) -> Result<(), NotifyError> {
        // 没有订阅者时直接丢弃
        if self.sender.receiver_count() == 0 {
            return Ok(());
        }
        self.sender
            .send(notice)
            .map_err(|err| NotifyError::failed(err.to_string()))?;
        Ok(())
    }
}
