use std::sync::Arc;

use domain::{
    Application, ApplicationId, ApplicationRepository, ConversationStats, Message, MessageId,
    MessageRepository, MessageText, NewMessage, Participant, RepositoryError, RepositoryFuture,
    Timestamp, UserDirectory, UserId, UserProfile, UserRole, VacancyId, VacancyRef,
};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};

fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    tracing::error!(error = %err, "database error");
    RepositoryError::storage(err.to_string())
}

#[derive(Debug, FromRow)]
struct ApplicationRecord {
    id: i64,
    status: String,
    created_at: Timestamp,
    accepted_at: Option<Timestamp>,
    vacancy_id: i64,
    vacancy_title: String,
    job_seeker_user_id: i64,
    job_seeker_name: String,
    company_user_id: i64,
    company_name: String,
}

impl TryFrom<ApplicationRecord> for Application {
    type Error = RepositoryError;

    fn try_from(value: ApplicationRecord) -> Result<Self, Self::Error> {
        Ok(Application {
            id: ApplicationId::from(value.id),
            status: value.status.parse()?,
            vacancy: VacancyRef {
                id: VacancyId::from(value.vacancy_id),
                title: value.vacancy_title,
            },
            job_seeker: Participant {
                user_id: UserId::from(value.job_seeker_user_id),
                display_name: value.job_seeker_name,
            },
            company: Participant {
                user_id: UserId::from(value.company_user_id),
                display_name: value.company_name,
            },
            created_at: value.created_at,
            accepted_at: value.accepted_at,
        })
    }
}

const APPLICATION_SELECT: &str = r#"
    SELECT a.id, a.status, a.created_at, a.accepted_at,
           v.id AS vacancy_id, v.title AS vacancy_title,
           js.user_id AS job_seeker_user_id, js.full_name AS job_seeker_name,
           c.user_id AS company_user_id, c.name AS company_name
    FROM applications a
    JOIN vacancies v ON v.id = a.vacancy_id
    JOIN companies c ON c.id = v.company_id
    JOIN job_seekers js ON js.id = a.job_seeker_id
"#;

#[derive(Debug, FromRow)]
struct MessageRecord {
    id: i64,
    application_id: i64,
    sender_id: i64,
    message_text: String,
    sent_at: Timestamp,
    read_at: Option<Timestamp>,
}

impl TryFrom<MessageRecord> for Message {
    type Error = RepositoryError;

    fn try_from(value: MessageRecord) -> Result<Self, Self::Error> {
        Ok(Message {
            id: MessageId::from(value.id),
            application_id: ApplicationId::from(value.application_id),
            sender_id: UserId::from(value.sender_id),
            text: MessageText::parse(value.message_text)?,
            sent_at: value.sent_at,
            read_at: value.read_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct StatsRecord {
    application_id: i64,
    last_message_text: Option<String>,
    last_message_at: Option<Timestamp>,
    unread_count: i64,
}

impl From<StatsRecord> for ConversationStats {
    fn from(value: StatsRecord) -> Self {
        ConversationStats {
            application_id: ApplicationId::from(value.application_id),
            last_message_text: value.last_message_text,
            last_message_at: value.last_message_at,
            unread_count: u64::try_from(value.unread_count).unwrap_or_default(),
        }
    }
}

#[derive(Debug, FromRow)]
struct UserRecord {
    id: i64,
    email: String,
    role: String,
}

impl TryFrom<UserRecord> for UserProfile {
    type Error = RepositoryError;

    fn try_from(value: UserRecord) -> Result<Self, Self::Error> {
        Ok(UserProfile {
            id: UserId::from(value.id),
            email: value.email,
            role: value.role.parse::<UserRole>()?,
        })
    }
}

#[derive(Clone)]
pub struct PgApplicationRepository {
    pool: PgPool,
}

impl PgApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ApplicationRepository for PgApplicationRepository {
    fn find_by_id(&self, id: ApplicationId) -> RepositoryFuture<Option<Application>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let record = sqlx::query_as::<_, ApplicationRecord>(&format!(
                "{APPLICATION_SELECT} WHERE a.id = $1"
            ))
            .bind(i64::from(id))
            .fetch_optional(&pool)
            .await
            .map_err(map_sqlx_err)?;

            record.map(Application::try_from).transpose()
        })
    }

    fn list_with_conversation(&self, user_id: UserId) -> RepositoryFuture<Vec<Application>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let records = sqlx::query_as::<_, ApplicationRecord>(&format!(
                "{APPLICATION_SELECT}
                 WHERE (js.user_id = $1 OR c.user_id = $1)
                   AND (a.status = 'ACCEPTED' OR a.accepted_at IS NOT NULL)
                 ORDER BY a.id"
            ))
            .bind(i64::from(user_id))
            .fetch_all(&pool)
            .await
            .map_err(map_sqlx_err)?;

            records.into_iter().map(Application::try_from).collect()
        })
    }
}

#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl MessageRepository for PgMessageRepository {
    fn create(&self, message: NewMessage) -> RepositoryFuture<Message> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let application_id = i64::from(message.application_id);
            let mut tx = pool.begin().await.map_err(map_sqlx_err)?;

            // 事务级咨询锁：多实例部署时同一会话的写入也按顺序进行
            sqlx::query("SELECT pg_advisory_xact_lock($1)")
                .bind(application_id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_err)?;

            let record = sqlx::query_as::<_, MessageRecord>(
                r#"
                INSERT INTO messages (application_id, sender_id, message_text, sent_at)
                SELECT $1, $2, $3, GREATEST($4, COALESCE(MAX(sent_at), $4))
                FROM messages
                WHERE application_id = $1
                RETURNING id, application_id, sender_id, message_text, sent_at, read_at
                "#,
            )
            .bind(application_id)
            .bind(i64::from(message.sender_id))
            .bind(message.text.as_str())
            .bind(message.sent_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;

            tx.commit().await.map_err(map_sqlx_err)?;

            Message::try_from(record)
        })
    }

    fn list_by_application(&self, application_id: ApplicationId) -> RepositoryFuture<Vec<Message>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let records = sqlx::query_as::<_, MessageRecord>(
                r#"SELECT id, application_id, sender_id, message_text, sent_at, read_at
                FROM messages
                WHERE application_id = $1
                ORDER BY sent_at ASC, id ASC"#,
            )
            .bind(i64::from(application_id))
            .fetch_all(&pool)
            .await
            .map_err(map_sqlx_err)?;

            records.into_iter().map(Message::try_from).collect()
        })
    }

    fn mark_read(
        &self,
        application_id: ApplicationId,
        reader_id: UserId,
        at: Timestamp,
    ) -> RepositoryFuture<u64> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let result = sqlx::query(
                r#"UPDATE messages
                SET read_at = $3
                WHERE application_id = $1 AND sender_id <> $2 AND read_at IS NULL"#,
            )
            .bind(i64::from(application_id))
            .bind(i64::from(reader_id))
            .bind(at)
            .execute(&pool)
            .await
            .map_err(map_sqlx_err)?;

            Ok(result.rows_affected())
        })
    }

    fn conversation_stats(
        &self,
        application_ids: Vec<ApplicationId>,
        viewer: UserId,
    ) -> RepositoryFuture<Vec<ConversationStats>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            if application_ids.is_empty() {
                return Ok(Vec::new());
            }
            let ids: Vec<i64> = application_ids.into_iter().map(i64::from).collect();

            let records = sqlx::query_as::<_, StatsRecord>(
                r#"
                SELECT conv.application_id,
                       last.message_text AS last_message_text,
                       last.sent_at AS last_message_at,
                       unread.unread_count
                FROM UNNEST($1::BIGINT[]) AS conv(application_id)
                LEFT JOIN LATERAL (
                    SELECT m.message_text, m.sent_at
                    FROM messages m
                    WHERE m.application_id = conv.application_id
                    ORDER BY m.sent_at DESC, m.id DESC
                    LIMIT 1
                ) last ON TRUE
                CROSS JOIN LATERAL (
                    SELECT COUNT(*) AS unread_count
                    FROM messages m
                    WHERE m.application_id = conv.application_id
                      AND m.sender_id <> $2
                      AND m.read_at IS NULL
                ) unread
                "#,
            )
            .bind(ids)
            .bind(i64::from(viewer))
            .fetch_all(&pool)
            .await
            .map_err(map_sqlx_err)?;

            Ok(records.into_iter().map(ConversationStats::from).collect())
        })
    }
}

#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserDirectory for PgUserDirectory {
    fn find_many(&self, ids: Vec<UserId>) -> RepositoryFuture<Vec<UserProfile>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let ids: Vec<i64> = ids.into_iter().map(i64::from).collect();

            let records = sqlx::query_as::<_, UserRecord>(
                r#"SELECT id, email, role FROM users WHERE id = ANY($1)"#,
            )
            .bind(ids)
            .fetch_all(&pool)
            .await
            .map_err(map_sqlx_err)?;

            records.into_iter().map(UserProfile::try_from).collect()
        })
    }
}

#[derive(Clone)]
pub struct PgStorage {
    pub pool: PgPool,
    pub application_repository: Arc<PgApplicationRepository>,
    pub message_repository: Arc<PgMessageRepository>,
    pub user_directory: Arc<PgUserDirectory>,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self {
            application_repository: Arc::new(PgApplicationRepository::new(pool.clone())),
            message_repository: Arc::new(PgMessageRepository::new(pool.clone())),
            user_directory: Arc::new(PgUserDirectory::new(pool.clone())),
            pool,
        }
    }
}

pub async fn create_pg_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
