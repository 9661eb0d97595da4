//! 会话聚合
//!
//! 纯函数：给定查看者参与的申请与每个会话的统计，生成排好序的会话摘要。
//! 不做任何缓存，每次请求重新计算。

use std::{cmp::Ordering, collections::HashMap};

use domain::{Application, ApplicationId, ConversationStats, ConversationSummary, UserId};

/// 生成会话摘要。
///
/// 排序规则：有消息的会话按最后消息时间倒序排在前面；
/// 没有消息的会话排在后面，按申请创建时间倒序。时间相同时ID大的在前。
pub fn summarize(
    viewer: UserId,
    applications: &[Application],
    stats: Vec<ConversationStats>,
) -> Vec<ConversationSummary> {
    let mut stats: HashMap<ApplicationId, ConversationStats> = stats
        .into_iter()
        .map(|entry| (entry.application_id, entry))
        .collect();

    let mut rows: Vec<(&Application, ConversationSummary)> = applications
        .iter()
        .filter_map(|application| {
            let side = application.participant_side(viewer)?;
            let counterparty = application.counterparty(side);
            let entry = stats
                .remove(&application.id)
                .unwrap_or_else(|| ConversationStats::empty(application.id));

            Some((
                application,
                ConversationSummary {
                    application_id: application.id,
                    vacancy_id: application.vacancy.id,
                    vacancy_title: application.vacancy.title.clone(),
                    other_party_name: counterparty.display_name.clone(),
                    other_party_user_id: counterparty.user_id,
                    last_message_text: entry.last_message_text,
                    last_message_at: entry.last_message_at,
                    unread_count: entry.unread_count,
                },
            ))
        })
        .collect();

    rows.sort_by(|(a_app, a), (b_app, b)| {
        let primary = match (a.last_message_at, b.last_message_at) {
            (Some(a_at), Some(b_at)) => b_at.cmp(&a_at),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => b_app.created_at.cmp(&a_app.created_at),
        };
        primary.then_with(|| b.application_id.cmp(&a.application_id))
    });

    rows.into_iter().map(|(_, summary)| summary).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use domain::{ApplicationStatus, Participant, Timestamp, VacancyId, VacancyRef};

    const SEEKER: UserId = UserId(10);
    const COMPANY: UserId = UserId(20);

    fn at(secs: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn application(id: i64, created_secs: i64) -> Application {
        Application {
            id: ApplicationId::new(id),
            status: ApplicationStatus::Accepted,
            vacancy: VacancyRef {
                id: VacancyId::new(100 + id),
                title: format!("Vacancy {id}"),
            },
            job_seeker: Participant {
                user_id: SEEKER,
                display_name: "Grace Hopper".into(),
            },
            company: Participant {
                user_id: COMPANY,
                display_name: "Compiler Works".into(),
            },
            created_at: at(created_secs),
            accepted_at: Some(at(created_secs)),
        }
    }

    fn stats(id: i64, last_secs: Option<i64>, unread: u64) -> ConversationStats {
        ConversationStats {
            application_id: ApplicationId::new(id),
            last_message_text: last_secs.map(|s| format!("message at {s}")),
            last_message_at: last_secs.map(at),
            unread_count: unread,
        }
    }

    #[test]
    fn counterparty_depends_on_viewer_side() {
        let apps = vec![application(1, 0)];

        let for_seeker = summarize(SEEKER, &apps, vec![]);
        assert_eq!(for_seeker[0].other_party_name, "Compiler Works");
        assert_eq!(for_seeker[0].other_party_user_id, COMPANY);

        let for_company = summarize(COMPANY, &apps, vec![]);
        assert_eq!(for_company[0].other_party_name, "Grace Hopper");
        assert_eq!(for_company[0].other_party_user_id, SEEKER);
    }

    #[test]
    fn missing_stats_yield_empty_summary() {
        let summaries = summarize(SEEKER, &[application(1, 0)], vec![]);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].last_message_text, None);
        assert_eq!(summaries[0].last_message_at, None);
        assert_eq!(summaries[0].unread_count, 0);
    }

    #[test]
    fn sorts_by_activity_then_creation() {
        let apps = vec![
            application(1, 0),
            application(2, 10),
            application(3, 20),
            application(4, 30),
        ];
        let entries = vec![
            stats(1, Some(500), 0),
            stats(2, None, 0),
            stats(3, Some(900), 2),
            stats(4, None, 0),
        ];

        let order: Vec<i64> = summarize(SEEKER, &apps, entries)
            .iter()
            .map(|s| s.application_id.value())
            .collect();
        assert_eq!(order, vec![3, 1, 4, 2]);
    }

    #[test]
    fn empty_conversations_sort_by_creation_then_id() {
        let apps = vec![
            application(5, 10),
            application(7, 40),
            application(6, 10),
        ];

        let order: Vec<i64> = summarize(SEEKER, &apps, Vec::new())
            .iter()
            .map(|s| s.application_id.value())
            .collect();
        assert_eq!(order, vec![7, 6, 5]);
    }

    #[test]
    fn non_participant_applications_are_skipped() {
        let summaries = summarize(UserId::new(99), &[application(1, 0)], vec![]);
        assert!(summaries.is_empty());
    }
}
