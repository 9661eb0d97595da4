use domain::{ApplicationId, Message, MessageId, Timestamp, UserId, UserProfile, UserRole};
use serde::{Deserialize, Serialize};

/// 发送成功后返回的消息。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentMessageDto {
    pub id: MessageId,
    pub application_id: ApplicationId,
    pub sender_id: UserId,
    pub message_text: String,
    pub sent_at: Timestamp,
}

impl From<&Message> for SentMessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            application_id: message.application_id,
            sender_id: message.sender_id,
            message_text: message.text.as_str().to_owned(),
            sent_at: message.sent_at,
        }
    }
}

/// 发送者的最小公开信息。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderDescriptor {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
}

impl From<&UserProfile> for SenderDescriptor {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id,
            email: profile.email.clone(),
            role: profile.role,
        }
    }
}

/// 会话历史中的一条消息。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: MessageId,
    pub sender_id: UserId,
    pub message_text: String,
    pub sent_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<Timestamp>,
    pub sender: SenderDescriptor,
}

impl MessageView {
    pub fn new(message: &Message, sender: SenderDescriptor) -> Self {
        Self {
            id: message.id,
            sender_id: message.sender_id,
            message_text: message.text.as_str().to_owned(),
            sent_at: message.sent_at,
            read_at: message.read_at,
            sender,
        }
    }
}
