use futures::future::BoxFuture;

use crate::conversation::ConversationStats;
use crate::errors::RepositoryError;
use crate::job_application::Application;
use crate::message::{Message, NewMessage};
use crate::user::UserProfile;
use crate::value_objects::{ApplicationId, Timestamp, UserId};

pub type RepositoryResult<T> = Result<T, RepositoryError>;
pub type RepositoryFuture<T> = BoxFuture<'static, RepositoryResult<T>>;

/// 申请存储（外部协作方，只读）。
pub trait ApplicationRepository: Send + Sync {
    fn find_by_id(&self, id: ApplicationId) -> RepositoryFuture<Option<Application>>;

    /// `user_id` 参与且当前或曾经为 ACCEPTED 的全部申请。
    fn list_with_conversation(&self, user_id: UserId) -> RepositoryFuture<Vec<Application>>;
}

/// 消息存储：只追加，唯一允许的修改是 `read_at` 的一次性转换。
pub trait MessageRepository: Send + Sync {
    /// 追加消息。实现必须保证同一会话内 `sent_at` 单调不减：
    /// 若传入时间早于会话中已有的最大发送时间，以后者为准。
    fn create(&self, message: NewMessage) -> RepositoryFuture<Message>;

    /// 会话内全部消息，按 `(sent_at, id)` 升序。
    fn list_by_application(&self, application_id: ApplicationId) -> RepositoryFuture<Vec<Message>>;

    /// 批量条件更新：对方发送且未读的消息设置 `read_at = at`，返回转换条数。
    fn mark_read(
        &self,
        application_id: ApplicationId,
        reader_id: UserId,
        at: Timestamp,
    ) -> RepositoryFuture<u64>;

    /// 每个会话针对 `viewer` 的统计，结果与 [`ConversationStats::reduce`] 一致。
    /// 没有消息的会话也会返回一条空统计。
    fn conversation_stats(
        &self,
        application_ids: Vec<ApplicationId>,
        viewer: UserId,
    ) -> RepositoryFuture<Vec<ConversationStats>>;
}

/// 用户资料查询（外部协作方，只读）。
pub trait UserDirectory: Send + Sync {
    fn find_many(&self, ids: Vec<UserId>) -> RepositoryFuture<Vec<UserProfile>>;
}
