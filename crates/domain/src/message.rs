use crate::value_objects::{ApplicationId, MessageId, MessageText, Timestamp, UserId};

/// 待写入的消息，ID 由存储层分配。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub application_id: ApplicationId,
    pub sender_id: UserId,
    pub text: MessageText,
    pub sent_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub application_id: ApplicationId,
    pub sender_id: UserId,
    pub text: MessageText,
    pub sent_at: Timestamp,
    /// 只会从 None 变为 Some 一次，之后不再改变。
    pub read_at: Option<Timestamp>,
}

impl Message {
    pub fn from_new(id: MessageId, new: NewMessage) -> Self {
        Self {
            id,
            application_id: new.application_id,
            sender_id: new.sender_id,
            text: new.text,
            sent_at: new.sent_at,
            read_at: None,
        }
    }

    /// 对 `reader` 而言是否为未读消息：对方发送且尚未标记已读。
    pub fn is_unread_by(&self, reader: UserId) -> bool {
        self.sender_id != reader && self.read_at.is_none()
    }

    /// 标记已读；已读消息保持原时间不变，返回是否发生了转换。
    pub fn mark_read_by(&mut self, reader: UserId, at: Timestamp) -> bool {
        if !self.is_unread_by(reader) {
            return false;
        }
        self.read_at = Some(at);
        true
    }

    /// 会话内的排序键：先按发送时间，再按ID。
    pub fn order_key(&self) -> (Timestamp, MessageId) {
        (self.sent_at, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn message(sender: i64) -> Message {
        Message::from_new(
            MessageId::new(1),
            NewMessage {
                application_id: ApplicationId::new(1),
                sender_id: UserId::new(sender),
                text: MessageText::parse("hi").unwrap(),
                sent_at: Utc::now(),
            },
        )
    }

    #[test]
    fn own_messages_are_never_unread() {
        let msg = message(10);
        assert!(!msg.is_unread_by(UserId::new(10)));
        assert!(msg.is_unread_by(UserId::new(20)));
    }

    #[test]
    fn read_transition_happens_once() {
        let mut msg = message(10);
        let first = Utc::now();
        assert!(msg.mark_read_by(UserId::new(20), first));
        assert!(!msg.mark_read_by(UserId::new(20), first + Duration::seconds(5)));
        assert_eq!(msg.read_at, Some(first));
    }

    #[test]
    fn sender_cannot_mark_own_message() {
        let mut msg = message(10);
        assert!(!msg.mark_read_by(UserId::new(10), Utc::now()));
        assert!(msg.read_at.is_none());
    }
}
