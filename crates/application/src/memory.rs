//! 内存存储实现
//!
//! 用于单元测试、接口测试以及本地开发时的 `memory` 存储后端。

use std::{collections::HashMap, sync::Arc};

use domain::{
    Application, ApplicationId, ApplicationRepository, ApplicationStatus, ConversationStats,
    Message, MessageId, MessageRepository, NewMessage, RepositoryError, RepositoryFuture,
    Timestamp, UserDirectory, UserId, UserProfile,
};
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryApplicationStore {
    data: Arc<RwLock<HashMap<ApplicationId, Application>>>,
}

impl InMemoryApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入或覆盖一条申请。
    pub async fn upsert(&self, application: Application) {
        self.data.write().await.insert(application.id, application);
    }

    /// 模拟招聘子系统修改状态；首次进入 ACCEPTED 时记录接受时间。
    pub async fn set_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
        at: Timestamp,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.data.write().await;
        let application = guard.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        application.status = status;
        if status == ApplicationStatus::Accepted && application.accepted_at.is_none() {
            application.accepted_at = Some(at);
        }
        Ok(())
    }
}

impl ApplicationRepository for InMemoryApplicationStore {
    fn find_by_id(&self, id: ApplicationId) -> RepositoryFuture<Option<Application>> {
        let data = self.data.clone();
        Box::pin(async move {
            let guard = data.read().await;
            Ok(guard.get(&id).cloned())
        })
    }

    fn list_with_conversation(&self, user_id: UserId) -> RepositoryFuture<Vec<Application>> {
        let data = self.data.clone();
        Box::pin(async move {
            let guard = data.read().await;
            let mut items: Vec<Application> = guard
                .values()
                .filter(|app| app.is_participant(user_id) && app.has_conversation())
                .cloned()
                .collect();
            items.sort_by_key(|app| app.id);
            Ok(items)
        })
    }
}

#[derive(Default)]
struct MessageLedger {
    last_id: i64,
    messages: Vec<Message>,
}

#[derive(Clone, Default)]
pub struct InMemoryMessageStore {
    ledger: Arc<RwLock<MessageLedger>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全部消息的快照，按写入顺序。
    pub async fn snapshot(&self) -> Vec<Message> {
        self.ledger.read().await.messages.clone()
    }
}

impl MessageRepository for InMemoryMessageStore {
    fn create(&self, message: NewMessage) -> RepositoryFuture<Message> {
        let ledger = self.ledger.clone();
        Box::pin(async move {
            let mut guard = ledger.write().await;
            let latest = guard
                .messages
                .iter()
                .filter(|m| m.application_id == message.application_id)
                .map(|m| m.sent_at)
                .max();

            let mut message = message;
            if let Some(latest) = latest {
                message.sent_at = message.sent_at.max(latest);
            }

            guard.last_id += 1;
            let stored = Message::from_new(MessageId::new(guard.last_id), message);
            guard.messages.push(stored.clone());
            Ok(stored)
        })
    }

    fn list_by_application(&self, application_id: ApplicationId) -> RepositoryFuture<Vec<Message>> {
        let ledger = self.ledger.clone();
        Box::pin(async move {
            let guard = ledger.read().await;
            let mut items: Vec<Message> = guard
                .messages
                .iter()
                .filter(|m| m.application_id == application_id)
                .cloned()
                .collect();
            items.sort_by_key(Message::order_key);
            Ok(items)
        })
    }

    fn mark_read(
        &self,
        application_id: ApplicationId,
        reader_id: UserId,
        at: Timestamp,
    ) -> RepositoryFuture<u64> {
        let ledger = self.ledger.clone();
        Box::pin(async move {
            let mut guard = ledger.write().await;
            let transitioned = guard
                .messages
                .iter_mut()
                .filter(|m| m.application_id == application_id)
                .map(|m| m.mark_read_by(reader_id, at))
                .filter(|changed| *changed)
                .count();
            Ok(transitioned as u64)
        })
    }

    fn conversation_stats(
        &self,
        application_ids: Vec<ApplicationId>,
        viewer: UserId,
    ) -> RepositoryFuture<Vec<ConversationStats>> {
        let ledger = self.ledger.clone();
        Box::pin(async move {
            let guard = ledger.read().await;
            Ok(application_ids
                .into_iter()
                .map(|id| ConversationStats::reduce(id, viewer, &guard.messages))
                .collect())
        })
    }
}

#[derive(Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<UserId, UserProfile>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, profile: UserProfile) {
        self.users.write().await.insert(profile.id, profile);
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn find_many(&self, ids: Vec<UserId>) -> RepositoryFuture<Vec<UserProfile>> {
        let users = self.users.clone();
        Box::pin(async move {
            let guard = users.read().await;
            Ok(ids.iter().filter_map(|id| guard.get(id).cloned()).collect())
        })
    }
}
