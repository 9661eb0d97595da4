//! 应用层实现。
//!
//! 会话网关及其协作者：参与方授权、按会话串行化写入、会话汇总、
//! 新消息提醒，以及用于测试和本地开发的内存存储。

pub mod aggregator;
pub mod clock;
pub mod dto;
pub mod error;
pub mod local_notifier;
pub mod locks;
pub mod memory;
pub mod notifier;
pub mod services;

pub use clock::{Clock, SystemClock};
pub use dto::{MessageView, SenderDescriptor, SentMessageDto};
pub use error::ApplicationError;
pub use local_notifier::LocalMessageNotifier;
pub use locks::ConversationLocks;
pub use memory::{InMemoryApplicationStore, InMemoryMessageStore, InMemoryUserDirectory};
pub use notifier::{MessageNotifier, NewMessageNotice, NotifyError};
pub use services::{MessagingService, MessagingServiceDependencies, SendMessageRequest};
