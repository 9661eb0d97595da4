//! 并发数据一致性测试
//!
//! 多个会话同时写入、同时标记已读时，会话汇总必须与逐条归约的结果一致。

use std::sync::Arc;

use application::{
    InMemoryApplicationStore, InMemoryMessageStore, InMemoryUserDirectory, LocalMessageNotifier,
    MessagingService, MessagingServiceDependencies, SendMessageRequest, SystemClock,
};
use chrono::Utc;
use domain::{
    Application, ApplicationId, ApplicationStatus, ConversationStats, Participant, UserId,
    UserProfile, UserRole, VacancyId, VacancyRef,
};

const COMPANY: UserId = UserId(1);
const SEEKERS: [UserId; 3] = [UserId(11), UserId(12), UserId(13)];

struct TestServices {
    messages: InMemoryMessageStore,
    service: Arc<MessagingService>,
}

async fn setup() -> TestServices {
    let applications = InMemoryApplicationStore::new();
    let users = InMemoryUserDirectory::new();
    let messages = InMemoryMessageStore::new();
    let now = Utc::now();

    users
        .insert(UserProfile {
            id: COMPANY,
            email: "hr@acme.test".into(),
            role: UserRole::Company,
        })
        .await;

    for (index, seeker) in SEEKERS.into_iter().enumerate() {
        let id = index as i64 + 1;
        users
            .insert(UserProfile {
                id: seeker,
                email: format!("seeker-{seeker}@mail.test"),
                role: UserRole::JobSeeker,
            })
            .await;
        applications
            .upsert(Application {
                id: ApplicationId(id),
                status: ApplicationStatus::Accepted,
                vacancy: VacancyRef {
                    id: VacancyId(id),
                    title: format!("Role {id}"),
                },
                job_seeker: Participant {
                    user_id: seeker,
                    display_name: format!("Seeker {seeker}"),
                },
                company: Participant {
                    user_id: COMPANY,
                    display_name: "Acme".into(),
                },
                created_at: now,
                accepted_at: Some(now),
            })
            .await;
    }

    let service = Arc::new(MessagingService::new(MessagingServiceDependencies {
        application_repository: Arc::new(applications),
        message_repository: Arc::new(messages.clone()),
        user_directory: Arc::new(users),
        clock: Arc::new(SystemClock),
        notifier: Arc::new(LocalMessageNotifier::new(16)),
    }));

    TestServices { messages, service }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_traffic_keeps_summaries_consistent() {
    let services = setup().await;
    let mut tasks = Vec::new();

    for (index, seeker) in SEEKERS.into_iter().enumerate() {
        let application_id = ApplicationId(index as i64 + 1);
        for round in 0..15 {
            let service = services.service.clone();
            let sender = if round % 3 == 0 { seeker } else { COMPANY };
            tasks.push(tokio::spawn(async move {
                service
                    .send_message(SendMessageRequest {
                        caller_id: sender,
                        application_id,
                        text: format!("round {round}"),
                    })
                    .await
                    .map(|_| ())
            }));
        }
        for _ in 0..3 {
            let service = services.service.clone();
            tasks.push(tokio::spawn(async move {
                service.mark_read(seeker, application_id).await.map(|_| ())
            }));
        }
    }

    for task in tasks {
        task.await.expect("task").expect("operation");
    }

    let snapshot = services.messages.snapshot().await;
    assert_eq!(snapshot.len(), SEEKERS.len() * 15);

    for (index, seeker) in SEEKERS.into_iter().enumerate() {
        let application_id = ApplicationId(index as i64 + 1);

        let history = services
            .service
            .list_messages(seeker, application_id)
            .await
            .expect("history");
        assert_eq!(history.len(), 15);
        assert!(history
            .windows(2)
            .all(|w| (w[0].sent_at, w[0].id) < (w[1].sent_at, w[1].id)));

        let summaries = services
            .service
            .list_conversations(seeker)
            .await
            .expect("conversations");
        assert_eq!(summaries.len(), 1);

        let expected = ConversationStats::reduce(application_id, seeker, snapshot.iter());
        assert_eq!(summaries[0].unread_count, expected.unread_count);
        assert_eq!(summaries[0].last_message_at, expected.last_message_at);
        assert_eq!(summaries[0].last_message_text, expected.last_message_text);
    }

    let company_view = services
        .service
        .list_conversations(COMPANY)
        .await
        .expect("company conversations");
    assert_eq!(company_view.len(), SEEKERS.len());
    let unread_for_company: u64 = company_view.iter().map(|c| c.unread_count).sum();
    assert_eq!(
        services.service.unread_total(COMPANY).await.expect("total"),
        unread_for_company
    );
    // 企业从未标记已读，求职者发出的 5 条/会话都应未读
    assert_eq!(unread_for_company, 5 * SEEKERS.len() as u64);
}
