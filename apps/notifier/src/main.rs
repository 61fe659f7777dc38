//! # Notifier サーバー
//!
//! 予約作成トリガーを HTTP で受け、クライアントとオーナーにメールを送信する。
//!
//! ## 起動方法
//!
//! ```bash
//! SMTP_HOST=smtp.example.com SMTP_USER=reservas@agenda.example.com SMTP_PASS=... \
//!     cargo run -p agenda-notifier
//! ```
//!
//! ローカル開発では `NOTIFICATION_BACKEND=noop` と `DYNAMODB_ENDPOINT` を指定する。

use std::{net::SocketAddr, sync::Arc};

use agenda_infra::{
    calendar::IcsCalendarEncoder,
    dynamodb,
    notification::{NoopNotificationSender, NotificationSender, SmtpNotificationSender},
    repository::DynamoDbTenantProfileRepository,
};
use agenda_notifier::{
    config::{NotificationBackend, NotifierConfig},
    handler::TriggerState,
    router,
    usecase::AppointmentNotificationService,
};
use agenda_shared::observability::{TracingConfig, init_tracing};
use anyhow::Context;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing(&TracingConfig::from_env("agenda-notifier"));

    let config = NotifierConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Notifier サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    let dynamodb_client = dynamodb::create_client(config.dynamodb_endpoint.as_deref()).await;
    if config.dynamodb_endpoint.is_some() {
        dynamodb::ensure_tenant_profile_table(&dynamodb_client, &config.tenant_profile_table)
            .await
            .context("テナントプロフィールテーブルの準備に失敗しました")?;
    }
    let tenant_repo =
        DynamoDbTenantProfileRepository::new(dynamodb_client, config.tenant_profile_table.clone());

    let sender: Arc<dyn NotificationSender> = match &config.notification.backend {
        NotificationBackend::Smtp(settings) => {
            tracing::info!(host = %settings.host, port = settings.port, "SMTP で送信します");
            Arc::new(
                SmtpNotificationSender::new(settings)
                    .context("SMTP トランスポートの構築に失敗しました")?,
            )
        }
        NotificationBackend::Noop => {
            tracing::info!("通知送信は無効です（noop）");
            Arc::new(NoopNotificationSender)
        }
    };

    let service = AppointmentNotificationService::new(
        Arc::new(tenant_repo),
        Arc::new(IcsCalendarEncoder::new()),
        sender,
        config.notification.settings(),
    );
    let app = router(Arc::new(TriggerState { service }));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("バインドアドレスが不正です")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Notifier サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
