use std::{collections::HashMap, sync::Arc};

use domain::{
    Application, ApplicationId, ApplicationRepository, ConversationSummary, DomainError, Message,
    MessageRepository, MessageText, NewMessage, UserDirectory, UserId,
};

use crate::{
    aggregator,
    clock::Clock,
    dto::{MessageView, SenderDescriptor},
    error::ApplicationError,
    locks::ConversationLocks,
    notifier::{MessageNotifier, NewMessageNotice},
};

#[derive(Debug, Clone)]
pub struct SendMessageRequest {
    pub caller_id: UserId, // 调用者（从JWT获取）
    pub application_id: ApplicationId,
    pub text: String,
}

pub struct MessagingServiceDependencies {
    pub application_repository: Arc<dyn ApplicationRepository>,
    pub message_repository: Arc<dyn MessageRepository>,
    pub user_directory: Arc<dyn UserDirectory>,
    pub clock: Arc<dyn Clock>,
    pub notifier: Arc<dyn MessageNotifier>,
}

/// 会话网关：控制器访问聊天核心的唯一入口。
///
/// 所有操作都以已认证的调用者ID为输入，参与方身份每次都从申请存储重新加载，
/// 不信任调用方提供的角色信息。
pub struct MessagingService {
    deps: MessagingServiceDependencies,
    locks: ConversationLocks,
}

impl MessagingService {
    pub fn new(deps: MessagingServiceDependencies) -> Self {
        Self {
            deps,
            locks: ConversationLocks::new(),
        }
    }

    async fn load_application(
        &self,
        application_id: ApplicationId,
    ) -> Result<Application, ApplicationError> {
        self.deps
            .application_repository
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| {
                tracing::debug!(application_id = %application_id, "application not found");
                DomainError::ApplicationNotFound.into()
            })
    }

    // 参与方检查，读写共用
    async fn load_as_participant(
        &self,
        caller_id: UserId,
        application_id: ApplicationId,
    ) -> Result<Application, ApplicationError> {
        let application = self.load_application(application_id).await?;
        if let Err(err) = application.ensure_participant(caller_id) {
            tracing::debug!(
                application_id = %application_id,
                user_id = %caller_id,
                "caller is not a participant"
            );
            return Err(err.into());
        }
        Ok(application)
    }

    pub async fn send_message(
        &self,
        request: SendMessageRequest,
    ) -> Result<Message, ApplicationError> {
        let SendMessageRequest {
            caller_id,
            application_id,
            text,
        } = request;

        let guard = self.locks.acquire(application_id).await;

        let application = self.load_application(application_id).await?;
        if !application.is_chat_unlocked() {
            tracing::debug!(
                application_id = %application_id,
                status = application.status.as_str(),
                "chat not available for application status"
            );
            return Err(DomainError::ChatNotAvailable.into());
        }

        let side = application.ensure_participant(caller_id).map_err(|err| {
            tracing::debug!(
                application_id = %application_id,
                user_id = %caller_id,
                "caller is not a participant"
            );
            err
        })?;

        let text = MessageText::parse(text)?;

        let message = self
            .deps
            .message_repository
            .create(NewMessage {
                application_id,
                sender_id: caller_id,
                text,
                sent_at: self.deps.clock.now(),
            })
            .await
            .map_err(|err| {
                tracing::error!(application_id = %application_id, error = %err, "failed to store message");
                err
            })?;
        drop(guard);

        tracing::info!(
            application_id = %application_id,
            message_id = %message.id,
            user_id = %caller_id,
            "message sent"
        );

        let notice = NewMessageNotice {
            application_id,
            recipient_id: application.counterparty(side).user_id,
            message: message.clone(),
        };
        // 提醒失败不影响发送结果
        if let Err(err) = self.deps.notifier.notify(notice).await {
            tracing::warn!(
                application_id = %application_id,
                message_id = %message.id,
                error = %err,
                "message stored but notify failed"
            );
        }

        Ok(message)
    }

    /// 会话历史。只校验参与方身份，不校验当前状态：曾经开放的会话始终可读。
    pub async fn list_messages(
        &self,
        caller_id: UserId,
        application_id: ApplicationId,
    ) -> Result<Vec<MessageView>, ApplicationError> {
        self.load_as_participant(caller_id, application_id).await?;

        let messages = self
            .deps
            .message_repository
            .list_by_application(application_id)
            .await?;

        let mut sender_ids: Vec<UserId> = messages.iter().map(|m| m.sender_id).collect();
        sender_ids.sort_unstable();
        sender_ids.dedup();

        let senders: HashMap<UserId, SenderDescriptor> = self
            .deps
            .user_directory
            .find_many(sender_ids)
            .await?
            .iter()
            .map(|profile| (profile.id, SenderDescriptor::from(profile)))
            .collect();

        messages
            .iter()
            .map(|message| {
                let sender = senders.get(&message.sender_id).cloned().ok_or_else(|| {
                    ApplicationError::infrastructure(format!(
                        "sender {} of message {} has no profile",
                        message.sender_id, message.id
                    ))
                })?;
                Ok(MessageView::new(message, sender))
            })
            .collect()
    }

    pub async fn list_conversations(
        &self,
        caller_id: UserId,
    ) -> Result<Vec<ConversationSummary>, ApplicationError> {
        let applications: Vec<Application> = self
            .deps
            .application_repository
            .list_with_conversation(caller_id)
            .await?
            .into_iter()
            .filter(|app| app.has_conversation() && app.is_participant(caller_id))
            .collect();

        if applications.is_empty() {
            return Ok(Vec::new());
        }

        let ids = applications.iter().map(|app| app.id).collect();
        let stats = self
            .deps
            .message_repository
            .conversation_stats(ids, caller_id)
            .await?;

        Ok(aggregator::summarize(caller_id, &applications, stats))
    }

    /// 将对方发来的未读消息标记为已读，返回转换条数。重复调用返回 0。
    pub async fn mark_read(
        &self,
        caller_id: UserId,
        application_id: ApplicationId,
    ) -> Result<u64, ApplicationError> {
        self.load_as_participant(caller_id, application_id).await?;

        let transitioned = self
            .deps
            .message_repository
            .mark_read(application_id, caller_id, self.deps.clock.now())
            .await?;

        if transitioned > 0 {
            tracing::debug!(
                application_id = %application_id,
                user_id = %caller_id,
                count = transitioned,
                "messages marked read"
            );
        }

        Ok(transitioned)
    }

    /// 调用者全部会话的未读总数。
    pub async fn unread_total(&self, caller_id: UserId) -> Result<u64, ApplicationError> {
        let conversations = self.list_conversations(caller_id).await?;
        Ok(conversations.iter().map(|c| c.unread_count).sum())
    }
}
