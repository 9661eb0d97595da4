//! 职位申请（外部实体，只读）
//!
//! 会话与申请一一对应。核心只读取申请来确定参与方与聊天是否开放，
//! 申请状态的变更由招聘子系统负责。

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{ApplicationId, Timestamp, UserId, VacancyId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Applied,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "APPLIED",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "APPLIED" => Ok(Self::Applied),
            "ACCEPTED" => Ok(Self::Accepted),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(DomainError::invalid_argument(
                "status",
                format!("unknown application status {other}"),
            )),
        }
    }
}

/// 参与方在会话中的身份，只有两种取值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticipantSide {
    JobSeeker,
    Company,
}

impl ParticipantSide {
    pub fn opposite(self) -> Self {
        match self {
            Self::JobSeeker => Self::Company,
            Self::Company => Self::JobSeeker,
        }
    }
}

/// 申请的一方：用户ID与展示名称（求职者全名或企业名称）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: UserId,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancyRef {
    pub id: VacancyId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub status: ApplicationStatus,
    pub vacancy: VacancyRef,
    pub job_seeker: Participant,
    pub company: Participant,
    pub created_at: Timestamp,
    /// 首次被接受的时间。之后即使状态回退，历史会话仍然保留。
    pub accepted_at: Option<Timestamp>,
}

impl Application {
    /// 只有当前处于 ACCEPTED 才能发送消息。
    pub fn is_chat_unlocked(&self) -> bool {
        self.status == ApplicationStatus::Accepted
    }

    /// 当前或曾经被接受过的申请才拥有会话。
    pub fn has_conversation(&self) -> bool {
        self.status == ApplicationStatus::Accepted || self.accepted_at.is_some()
    }

    /// 按身份判断调用者是哪一方；与角色声明无关。
    pub fn participant_side(&self, user_id: UserId) -> Option<ParticipantSide> {
        if self.job_seeker.user_id == user_id {
            Some(ParticipantSide::JobSeeker)
        } else if self.company.user_id == user_id {
            Some(ParticipantSide::Company)
        } else {
            None
        }
    }

    pub fn is_participant(&self, user_id: UserId) -> bool {
        self.participant_side(user_id).is_some()
    }

    pub fn participant(&self, side: ParticipantSide) -> &Participant {
        match side {
            ParticipantSide::JobSeeker => &self.job_seeker,
            ParticipantSide::Company => &self.company,
        }
    }

    pub fn counterparty(&self, side: ParticipantSide) -> &Participant {
        self.participant(side.opposite())
    }

    /// 校验调用者是参与方，返回其所在一方。
    pub fn ensure_participant(&self, user_id: UserId) -> Result<ParticipantSide, DomainError> {
        self.participant_side(user_id)
            .ok_or(DomainError::NotParticipant)
    }
}
