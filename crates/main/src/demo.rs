//! `memory` 存储后端的演示数据。

use application::{InMemoryApplicationStore, InMemoryUserDirectory};
use chrono::Utc;
use domain::{
    Application, ApplicationId, ApplicationStatus, Participant, UserId, UserProfile, UserRole,
    VacancyId, VacancyRef,
};
use web_api::JwtService;

const COMPANY: UserId = UserId(1);
const JOB_SEEKER: UserId = UserId(2);

pub async fn seed(applications: &InMemoryApplicationStore, users: &InMemoryUserDirectory) {
    users
        .insert(UserProfile {
            id: COMPANY,
            email: "hr@acme.test".into(),
            role: UserRole::Company,
        })
        .await;
    users
        .insert(UserProfile {
            id: JOB_SEEKER,
            email: "ann@mail.test".into(),
            role: UserRole::JobSeeker,
        })
        .await;

    let now = Utc::now();
    for (id, status, title) in [
        (1, ApplicationStatus::Accepted, "Backend Engineer"),
        (2, ApplicationStatus::Applied, "Data Analyst"),
    ] {
        applications
            .upsert(Application {
                id: ApplicationId(id),
                status,
                vacancy: VacancyRef {
                    id: VacancyId(id),
                    title: title.into(),
                },
                job_seeker: Participant {
                    user_id: JOB_SEEKER,
                    display_name: "Ann Lee".into(),
                },
                company: Participant {
                    user_id: COMPANY,
                    display_name: "Acme".into(),
                },
                created_at: now,
                accepted_at: (status == ApplicationStatus::Accepted).then_some(now),
            })
            .await;
    }

    tracing::info!(applications = 2, users = 2, "seeded demo data");
}

pub fn log_tokens(jwt: &JwtService) {
    for (user_id, role) in [(COMPANY, UserRole::Company), (JOB_SEEKER, UserRole::JobSeeker)] {
        match jwt.generate_token(user_id, role) {
            Ok(token) => tracing::info!(
                user_id = %user_id,
                role = role.as_str(),
                token = %token,
                "demo bearer token"
            ),
            Err(err) => {
                tracing::warn!(user_id = %user_id, error = ?err, "failed to issue demo token")
            }
        }
    }
}
