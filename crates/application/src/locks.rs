//! 按会话串行化写入
//!
//! 同一会话的两次发送不会交错执行，保证消息ID顺序与发送时间顺序一致。
//! 不同会话之间互不阻塞。

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use domain::ApplicationId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Default)]
pub struct ConversationLocks {
    inner: Mutex<HashMap<ApplicationId, Arc<AsyncMutex<()>>>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取会话写锁，守卫释放前同一会话的其他写入会等待。
    pub async fn acquire(&self, application_id: ApplicationId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            // 引用计数为 1 说明没有任何持有者或等待者
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            map.entry(application_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// 当前仍被持有或等待的会话数量。
    pub fn active(&self) -> usize {
        let map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        map.values()
            .filter(|lock| Arc::strong_count(lock) > 1)
            .count()
    }
}
