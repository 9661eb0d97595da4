//! 会话汇总
//!
//! 会话不单独持久化，每次读取时由申请与消息推导而来。

use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::value_objects::{ApplicationId, Timestamp, UserId, VacancyId};

/// 单个会话针对某位查看者的原始统计：最后一条消息与未读数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationStats {
    pub application_id: ApplicationId,
    pub last_message_text: Option<String>,
    pub last_message_at: Option<Timestamp>,
    pub unread_count: u64,
}

impl ConversationStats {
    pub fn empty(application_id: ApplicationId) -> Self {
        Self {
            application_id,
            last_message_text: None,
            last_message_at: None,
            unread_count: 0,
        }
    }

    /// 内存归约。数据库侧聚合必须得到与此完全一致的结果。
    ///
    /// 只统计属于 `application_id` 的消息；最后一条消息按 `(sent_at, id)` 取最大。
    pub fn reduce<'a, I>(application_id: ApplicationId, viewer: UserId, messages: I) -> Self
    where
        I: IntoIterator<Item = &'a Message>,
    {
        let mut last: Option<&Message> = None;
        let mut unread_count = 0u64;

        for message in messages
            .into_iter()
            .filter(|m| m.application_id == application_id)
        {
            if message.is_unread_by(viewer) {
                unread_count += 1;
            }
            if last.map_or(true, |current| message.order_key() > current.order_key()) {
                last = Some(message);
            }
        }

        Self {
            application_id,
            last_message_text: last.map(|m| m.text.as_str().to_owned()),
            last_message_at: last.map(|m| m.sent_at),
            unread_count,
        }
    }
}

/// 查看者视角下的会话摘要。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub application_id: ApplicationId,
    pub vacancy_id: VacancyId,
    pub vacancy_title: String,
    pub other_party_name: String,
    pub other_party_user_id: UserId,
    pub last_message_text: Option<String>,
    pub last_message_at: Option<Timestamp>,
    pub unread_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::NewMessage;
    use crate::value_objects::{MessageId, MessageText};
    use chrono::{Duration, TimeZone, Utc};

    fn msg(id: i64, app: i64, sender: i64, text: &str, secs: i64, read: bool) -> Message {
        let sent_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::seconds(secs);
        let mut message = Message::from_new(
            MessageId::new(id),
            NewMessage {
                application_id: ApplicationId::new(app),
                sender_id: UserId::new(sender),
                text: MessageText::parse(text).unwrap(),
                sent_at,
            },
        );
        if read {
            message.read_at = Some(sent_at + Duration::seconds(1));
        }
        message
    }

    #[test]
    fn empty_conversation_has_no_preview() {
        let stats = ConversationStats::reduce(ApplicationId::new(1), UserId::new(10), &[]);
        assert_eq!(stats, ConversationStats::empty(ApplicationId::new(1)));
    }

    #[test]
    fn unread_counts_only_counterparty_messages() {
        let messages = vec![
            msg(1, 1, 10, "a", 0, false),
            msg(2, 1, 10, "b", 1, false),
            msg(3, 1, 10, "c", 2, false),
        ];
        let company = ConversationStats::reduce(ApplicationId::new(1), UserId::new(20), &messages);
        let seeker = ConversationStats::reduce(ApplicationId::new(1), UserId::new(10), &messages);
        assert_eq!(company.unread_count, 3);
        assert_eq!(seeker.unread_count, 0);
    }

    #[test]
    fn read_messages_are_not_counted() {
        let messages = vec![msg(1, 1, 20, "a", 0, true), msg(2, 1, 20, "b", 1, false)];
        let stats = ConversationStats::reduce(ApplicationId::new(1), UserId::new(10), &messages);
        assert_eq!(stats.unread_count, 1);
    }

    #[test]
    fn last_message_breaks_timestamp_ties_by_id() {
        let messages = vec![
            msg(5, 1, 10, "later id", 3, false),
            msg(4, 1, 20, "earlier id", 3, false),
            msg(1, 1, 20, "oldest", 0, false),
        ];
        let stats = ConversationStats::reduce(ApplicationId::new(1), UserId::new(10), &messages);
        assert_eq!(stats.last_message_text.as_deref(), Some("later id"));
    }

    #[test]
    fn other_conversations_are_ignored() {
        let messages = vec![msg(1, 1, 20, "mine", 0, false), msg(2, 2, 20, "other", 5, false)];
        let stats = ConversationStats::reduce(ApplicationId::new(1), UserId::new(10), &messages);
        assert_eq!(stats.last_message_text.as_deref(), Some("mine"));
        assert_eq!(stats.unread_count, 1);
    }
}
