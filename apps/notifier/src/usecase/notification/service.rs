//! # 予約通知サービス
//!
//! 予約作成トリガー 1 件につき、テナント情報の取得 → カレンダー招待の生成 →
//! 2 通のメール送信を順に実行する。
//!
//! ## 設計方針
//!
//! - **エラーを返さない**: すべての失敗はログに記録し、[`InvocationOutcome`] として返す
//! - **ステージごとの結果**: 劣化（招待なし、送信失敗）と中断（トリガー不正、ストア障害）を区別する
//! - **依存性注入**: リポジトリ・エンコーダ・送信手段は trait で抽象化し、起動時に 1 度だけ構築する

use std::sync::Arc;

use agenda_domain::tenant::TenantId;
use agenda_infra::{
    calendar::CalendarEncoder,
    notification::NotificationSender,
    repository::TenantProfileRepository,
};
use agenda_shared::{
    event_log::{error, event},
    log_business_event,
};
use chrono_tz::Tz;
use tracing::Instrument;

use super::{
    CalendarArtifactBuilder,
    DispatchPolicy,
    MessageComposer,
    NotificationDispatcher,
    TenantEnricher,
    report::{AttachmentOutcome, InvocationOutcome, NotificationReport, Stage},
};
use crate::trigger::{AppointmentCreated, parse_trigger};

/// 通知処理の設定
#[derive(Debug, Clone)]
pub struct NotificationSettings {
    /// システムの送信元アドレス（SMTP ユーザー）
    pub system_address:  String,
    /// 日時をローカル表示するタイムゾーン
    pub timezone:        Tz,
    pub dispatch_policy: DispatchPolicy,
}

/// 予約通知サービス
pub struct AppointmentNotificationService {
    enricher:         TenantEnricher,
    artifact_builder: CalendarArtifactBuilder,
    composer:         MessageComposer,
    dispatcher:       NotificationDispatcher,
}

impl AppointmentNotificationService {
    pub fn new(
        tenant_repo: Arc<dyn TenantProfileRepository>,
        encoder: Arc<dyn CalendarEncoder>,
        sender: Arc<dyn NotificationSender>,
        settings: NotificationSettings,
    ) -> Self {
        Self {
            enricher:         TenantEnricher::new(tenant_repo, settings.system_address.clone()),
            artifact_builder: CalendarArtifactBuilder::new(encoder, settings.timezone),
            composer:         MessageComposer::new(settings.system_address, settings.timezone),
            dispatcher:       NotificationDispatcher::new(sender, settings.dispatch_policy),
        }
    }

    /// 生のトリガーペイロードを処理する
    ///
    /// 解釈に失敗した場合は 1 通も送信せず `Aborted` を返す。
    pub async fn handle_trigger(&self, body: &[u8]) -> InvocationOutcome {
        match parse_trigger(body) {
            Ok(created) => self.notify(created).await,
            Err(e) => {
                tracing::error!(
                    error.category = error::category::INPUT,
                    error.kind = error::kind::MALFORMED_TRIGGER,
                    error = %e,
                    "トリガーペイロードを解釈できません"
                );
                log_business_event!(
                    event.category = event::category::APPOINTMENT,
                    event.action = event::action::APPOINTMENT_ABORTED,
                    event.entity_type = event::entity_type::APPOINTMENT,
                    event.result = event::result::FAILURE,
                    notification.stage = %Stage::Trigger,
                    "予約通知を中断"
                );
                InvocationOutcome::Aborted {
                    stage:  Stage::Trigger,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// 解釈済みのトリガーを処理する
    pub async fn notify(&self, created: AppointmentCreated) -> InvocationOutcome {
        let span = tracing::info_span!(
            "appointment_notification",
            tenant_id = %created.tenant_id,
            appointment_id = created.appointment_id.as_ref().map_or("", |id| id.as_str())
        );
        self.run(created).instrument(span).await
    }

    async fn run(&self, created: AppointmentCreated) -> InvocationOutcome {
        let AppointmentCreated {
            tenant_id,
            appointment_id,
            appointment,
        } = created;

        log_business_event!(
            event.category = event::category::APPOINTMENT,
            event.action = event::action::APPOINTMENT_RECEIVED,
            event.tenant_id = %tenant_id,
            event.entity_type = event::entity_type::APPOINTMENT,
            event.result = event::result::SUCCESS,
            "予約作成トリガーを受信"
        );

        let (tenant, enrichment) = match self.enricher.enrich(&tenant_id).await {
            Ok(enriched) => enriched,
            Err(e) => {
                tracing::error!(
                    error.category = error::category::INFRASTRUCTURE,
                    error.kind = error::kind::TENANT_LOOKUP,
                    error = %e,
                    "テナントプロフィールの取得に失敗"
                );
                return aborted(&tenant_id, Stage::Enrichment, e.to_string());
            }
        };

        let (attachment, attachment_outcome) = self.artifact_builder.build(&appointment, &tenant);
        if let AttachmentOutcome::Degraded { reason } = &attachment_outcome {
            tracing::warn!(
                error.category = error::category::INPUT,
                error.kind = error::kind::CALENDAR_ARTIFACT,
                reason = %reason,
                "カレンダー招待を生成できないため、添付なしで送信"
            );
        }

        let client_email = self
            .composer
            .client_message(&appointment, &tenant, attachment.as_ref());
        let owner_email = self
            .composer
            .owner_message(&appointment, &tenant, attachment.as_ref());

        let (client, owner) = self
            .dispatcher
            .dispatch(&tenant_id, &client_email, &owner_email)
            .await;

        let report = NotificationReport {
            tenant_id,
            appointment_id,
            enrichment,
            attachment: attachment_outcome,
            client,
            owner,
        };

        let result = if report.is_complete() {
            event::result::SUCCESS
        } else {
            event::result::DEGRADED
        };
        let enrichment_str: &str = report.enrichment.into();
        log_business_event!(
            event.category = event::category::APPOINTMENT,
            event.action = event::action::APPOINTMENT_NOTIFIED,
            event.tenant_id = %report.tenant_id,
            event.entity_type = event::entity_type::APPOINTMENT,
            event.result = result,
            notification.enrichment = enrichment_str,
            notification.sent = report.sent_count(),
            "予約通知の処理を完了"
        );

        InvocationOutcome::Completed(report)
    }
}

fn aborted(tenant_id: &TenantId, stage: Stage, reason: String) -> InvocationOutcome {
    log_business_event!(
        event.category = event::category::APPOINTMENT,
        event.action = event::action::APPOINTMENT_ABORTED,
        event.tenant_id = %tenant_id,
        event.entity_type = event::entity_type::APPOINTMENT,
        event.result = event::result::FAILURE,
        notification.stage = %stage,
        "予約通知を中断"
    );
    InvocationOutcome::Aborted { stage, reason }
}

#[cfg(test)]
mod tests {
    use agenda_domain::{
        calendar::CALENDAR_FILENAME,
        tenant::{DEFAULT_BUSINESS_NAME, TenantProfile},
    };
    use agenda_infra::{
        calendar::IcsCalendarEncoder,
        mock::{MockNotificationSender, MockTenantProfileRepository},
    };
    use pretty_assertions::assert_eq;
    use serde_json::{Value as JsonValue, json};

    use super::*;
    use crate::usecase::notification::report::{EnrichmentOutcome, SendOutcome};

    const SYSTEM_ADDRESS: &str = "reservas@agenda.example.com";

    struct TestContext {
        repo:    MockTenantProfileRepository,
        sender:  MockNotificationSender,
        service: AppointmentNotificationService,
    }

    fn setup(repo: MockTenantProfileRepository, policy: DispatchPolicy) -> TestContext {
        let sender = MockNotificationSender::new();
        let service = AppointmentNotificationService::new(
            Arc::new(repo.clone()),
            Arc::new(IcsCalendarEncoder::new()),
            Arc::new(sender.clone()),
            NotificationSettings {
                system_address:  SYSTEM_ADDRESS.to_string(),
                timezone:        Tz::UTC,
                dispatch_policy: policy,
            },
        );
        TestContext {
            repo,
            sender,
            service,
        }
    }

    fn repo_with_salon_x() -> MockTenantProfileRepository {
        let repo = MockTenantProfileRepository::new();
        repo.add_profile(
            TenantId::new("salon-x").unwrap(),
            TenantProfile {
                business_name: Some("Salon X".to_string()),
                owner_email:   Some("owner@x.com".to_string()),
                address:       None,
            },
        );
        repo
    }

    fn trigger(start: &str, end: &str) -> Vec<u8> {
        let body: JsonValue = json!({
            "document": "negocios/salon-x/citas/cita-1",
            "data": {
                "clienteNombre": "Ana",
                "clienteEmail": "ana@x.com",
                "staffNombre": "Luis",
                "servicioNombre": "Corte",
                "fechaInicio": start,
                "fechaFin": end
            }
        });
        body.to_string().into_bytes()
    }

    fn valid_trigger() -> Vec<u8> {
        trigger("2024-05-01T10:00:00Z", "2024-05-01T10:30:00Z")
    }

    #[tokio::test]
    async fn テナントがあれば招待付きで2通送信する() {
        let ctx = setup(repo_with_salon_x(), DispatchPolicy::FailFast);

        let outcome = ctx.service.handle_trigger(&valid_trigger()).await;

        let report = outcome.report().unwrap();
        assert_eq!(report.enrichment, EnrichmentOutcome::Found);
        assert_eq!(report.attachment, AttachmentOutcome::Attached);
        assert!(report.is_complete());

        let sent = ctx.sender.sent_emails();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "ana@x.com");
        assert_eq!(sent[1].to, "owner@x.com");
        for email in &sent {
            assert_eq!(email.from.name, "Salon X");
            assert_eq!(email.from.address, SYSTEM_ADDRESS);
            assert_eq!(email.attachments.len(), 1);
            assert_eq!(email.attachments[0].filename, CALENDAR_FILENAME);
            let ics = String::from_utf8(email.attachments[0].content.clone()).unwrap();
            assert!(ics.contains("SUMMARY:Corte con Luis - Salon X"));
        }
        assert_eq!(ctx.repo.lookup_count(), 1);
    }

    #[tokio::test]
    async fn テナントがなければ既定値で2通送信する() {
        let ctx = setup(MockTenantProfileRepository::new(), DispatchPolicy::FailFast);

        let outcome = ctx.service.handle_trigger(&valid_trigger()).await;

        let report = outcome.report().unwrap();
        assert_eq!(report.enrichment, EnrichmentOutcome::Defaulted);
        assert_eq!(report.sent_count(), 2);

        let sent = ctx.sender.sent_emails();
        assert_eq!(sent[0].from.name, DEFAULT_BUSINESS_NAME);
        assert_eq!(sent[0].subject, "Tu cita en Tu Empresa está confirmada");
        assert_eq!(sent[1].to, SYSTEM_ADDRESS);
        let ics = String::from_utf8(sent[1].attachments[0].content.clone()).unwrap();
        assert!(ics.contains("Tu Empresa"));
    }

    #[tokio::test]
    async fn 開始と終了が逆転していれば添付なしで2通送信する() {
        let ctx = setup(repo_with_salon_x(), DispatchPolicy::FailFast);

        let outcome = ctx
            .service
            .handle_trigger(&trigger("2024-05-01T10:30:00Z", "2024-05-01T10:00:00Z"))
            .await;

        let report = outcome.report().unwrap();
        assert!(matches!(report.attachment, AttachmentOutcome::Degraded { .. }));
        assert_eq!(report.client, SendOutcome::Sent);
        assert_eq!(report.owner, SendOutcome::Sent);

        let sent = ctx.sender.sent_emails();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|email| email.attachments.is_empty()));
    }

    #[tokio::test]
    async fn fail_fastではクライアント宛て失敗時にオーナー宛てを送信しない() {
        let ctx = setup(repo_with_salon_x(), DispatchPolicy::FailFast);
        ctx.sender.fail_for("ana@x.com");

        let outcome = ctx.service.handle_trigger(&valid_trigger()).await;

        let report = outcome.report().unwrap();
        assert!(matches!(report.client, SendOutcome::Failed { .. }));
        assert_eq!(report.owner, SendOutcome::Skipped);
        assert_eq!(ctx.sender.attempted_emails().len(), 1);
        assert!(ctx.sender.sent_emails().is_empty());
    }

    #[tokio::test]
    async fn independentではクライアント宛て失敗時もオーナー宛てを送信する() {
        let ctx = setup(repo_with_salon_x(), DispatchPolicy::Independent);
        ctx.sender.fail_for("ana@x.com");

        let outcome = ctx.service.handle_trigger(&valid_trigger()).await;

        let report = outcome.report().unwrap();
        assert!(matches!(report.client, SendOutcome::Failed { .. }));
        assert_eq!(report.owner, SendOutcome::Sent);
        assert_eq!(ctx.sender.sent_emails()[0].to, "owner@x.com");
    }

    #[tokio::test]
    async fn 同じトリガーを2回受けると4通送信する() {
        let ctx = setup(repo_with_salon_x(), DispatchPolicy::FailFast);

        ctx.service.handle_trigger(&valid_trigger()).await;
        ctx.service.handle_trigger(&valid_trigger()).await;

        assert_eq!(ctx.sender.sent_emails().len(), 4);
        assert_eq!(ctx.repo.lookup_count(), 2);
    }

    #[tokio::test]
    async fn ストア障害では中断し1通も送信しない() {
        let ctx = setup(
            MockTenantProfileRepository::failing("接続拒否"),
            DispatchPolicy::FailFast,
        );

        let outcome = ctx.service.handle_trigger(&valid_trigger()).await;

        assert!(matches!(
            outcome,
            InvocationOutcome::Aborted {
                stage: Stage::Enrichment,
                ..
            }
        ));
        assert!(ctx.sender.attempted_emails().is_empty());
    }

    #[tokio::test]
    async fn 解釈できない日時では中断し1通も送信しない() {
        let ctx = setup(repo_with_salon_x(), DispatchPolicy::FailFast);

        let outcome = ctx
            .service
            .handle_trigger(&trigger("ayer", "2024-05-01T10:30:00Z"))
            .await;

        assert!(matches!(
            outcome,
            InvocationOutcome::Aborted {
                stage: Stage::Trigger,
                ..
            }
        ));
        assert!(ctx.sender.attempted_emails().is_empty());
        assert_eq!(ctx.repo.lookup_count(), 0);
    }
}
