//! 求职聊天核心领域模型
//!
//! 包含职位申请、消息、会话汇总等实体，参与方授权规则，
//! 以及仓储接口定义。

pub mod conversation;
pub mod errors;
pub mod job_application;
pub mod message;
pub mod repository;
pub mod user;
pub mod value_objects;

pub use conversation::{ConversationStats, ConversationSummary};
pub use errors::{DomainError, ErrorKind, RepositoryError};
pub use job_application::{
    Application, ApplicationStatus, Participant, ParticipantSide, VacancyRef,
};
pub use message::{Message, NewMessage};
pub use repository::{
    ApplicationRepository, MessageRepository, RepositoryFuture, RepositoryResult, UserDirectory,
};
pub use user::{UserProfile, UserRole};
pub use value_objects::{
    ApplicationId, MessageId, MessageText, Timestamp, UserId, VacancyId, MAX_MESSAGE_LENGTH,
};
