//! # 通知ディスパッチャ
//!
//! クライアント宛て・オーナー宛ての 2 通を、この順に 1 通ずつ送信する。
//! 再送はしない。クライアント宛ての失敗がオーナー宛てに影響するかは
//! [`DispatchPolicy`] で決まる。

use std::sync::Arc;

use agenda_domain::{
    notification::{EmailMessage, RecipientRole},
    tenant::TenantId,
};
use agenda_infra::notification::NotificationSender;
use agenda_shared::{
    event_log::{error, event},
    log_business_event,
};
use strum::{EnumString, IntoStaticStr};

use super::report::SendOutcome;

/// 2 通の送信の結合方針
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DispatchPolicy {
    /// クライアント宛てが失敗したらオーナー宛ては送信しない
    #[default]
    FailFast,
    /// 常に両方の送信を試みる
    Independent,
}

/// 通知ディスパッチャ
pub struct NotificationDispatcher {
    sender: Arc<dyn NotificationSender>,
    policy: DispatchPolicy,
}

impl NotificationDispatcher {
    pub fn new(sender: Arc<dyn NotificationSender>, policy: DispatchPolicy) -> Self {
        Self { sender, policy }
    }

    /// クライアント宛て → オーナー宛ての順に送信する
    ///
    /// 返り値は `(クライアント宛ての結果, オーナー宛ての結果)`。
    pub async fn dispatch(
        &self,
        tenant_id: &TenantId,
        client: &EmailMessage,
        owner: &EmailMessage,
    ) -> (SendOutcome, SendOutcome) {
        let client_outcome = self.send(tenant_id, RecipientRole::Client, client).await;

        if self.policy == DispatchPolicy::FailFast && !client_outcome.is_sent() {
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_SKIPPED,
                event.tenant_id = %tenant_id,
                event.entity_type = event::entity_type::EMAIL,
                event.result = event::result::FAILURE,
                notification.recipient_role = %RecipientRole::Owner,
                "クライアント宛ての送信に失敗したため、オーナー宛ての送信を省略"
            );
            return (client_outcome, SendOutcome::Skipped);
        }

        let owner_outcome = self.send(tenant_id, RecipientRole::Owner, owner).await;
        (client_outcome, owner_outcome)
    }

    async fn send(
        &self,
        tenant_id: &TenantId,
        role: RecipientRole,
        email: &EmailMessage,
    ) -> SendOutcome {
        match self.sender.send_email(email).await {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SENT,
                    event.tenant_id = %tenant_id,
                    event.entity_type = event::entity_type::EMAIL,
                    event.result = event::result::SUCCESS,
                    notification.recipient_role = %role,
                    notification.attachments = email.attachments.len(),
                    "通知メール送信成功"
                );
                SendOutcome::Sent
            }
            Err(e) => {
                tracing::error!(
                    error.category = error::category::EXTERNAL_SERVICE,
                    error.kind = error::kind::MAIL_DELIVERY,
                    event.tenant_id = %tenant_id,
                    notification.recipient_role = %role,
                    error = %e,
                    "通知メール送信失敗"
                );
                SendOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}
