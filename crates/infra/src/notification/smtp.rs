//! SMTP 通知送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//!
//! - `secure = true`（既定）: 暗黙 TLS（ポート 465 の SMTPS）で接続し、認証する
//! - `secure = false`: TLS なしで接続する（Mailpit 等のローカル SMTP 向け）。
//!   認証情報も平文で送られるため、ローカルのリレー以外では使わないこと

use std::fmt;

use agenda_domain::notification::{EmailMessage, NotificationError};
use async_trait::async_trait;
use lettre::{
    Address,
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Attachment, Mailbox, Message, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use super::NotificationSender;

/// SMTP 接続設定
///
/// 資格情報は外部から注入される不透明な設定として扱う。
#[derive(Clone)]
pub struct SmtpSettings {
    /// SMTP サーバーのホスト名
    pub host:     String,
    /// ポート番号（既定 465）
    pub port:     u16,
    /// 暗黙 TLS を使うか
    ///
    /// `false` では AUTH も平文になる。ローカルのリレー専用。
    pub secure:   bool,
    /// ログインユーザー（システムの送信元アドレスを兼ねる）
    pub user:     String,
    /// パスワード
    pub password: String,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// SMTP 通知送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
/// トランスポートは内部でコネクションプールを持ち、並行する送信から共有できる。
pub struct SmtpNotificationSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotificationSender {
    /// 新しい SMTP 送信インスタンスを作成
    ///
    /// 接続はこの時点では張らず、最初の送信時に確立される。
    pub fn new(settings: &SmtpSettings) -> Result<Self, NotificationError> {
        let builder = if settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host).map_err(|e| {
                NotificationError::BuildFailed(format!("SMTP トランスポート構築失敗: {e}"))
            })?
        } else {
            tracing::warn!(
                host = %settings.host,
                "TLS なしで SMTP に接続します。認証情報は平文で送信されます"
            );
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
        };

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.user.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let message = build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        Ok(())
    }
}

/// ドメインのメールを lettre のメッセージに変換する
///
/// 本文はプレーンテキスト 1 パート。添付がある場合は `multipart/mixed` に続けて並べる。
fn build_message(email: &EmailMessage) -> Result<Message, NotificationError> {
    let from_address: Address = email.from.address.parse().map_err(|e| {
        NotificationError::InvalidAddress(format!("送信元 {}: {e}", email.from.address))
    })?;
    let from = Mailbox::new(Some(email.from.name.clone()), from_address);

    let to: Mailbox = email
        .to
        .parse()
        .map_err(|e| NotificationError::InvalidAddress(format!("宛先 {}: {e}", email.to)))?;

    let mut body = MultiPart::mixed().singlepart(SinglePart::plain(email.text_body.clone()));
    for attachment in &email.attachments {
        let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
            NotificationError::BuildFailed(format!(
                "Content-Type 不正 {}: {e}",
                attachment.content_type
            ))
        })?;
        body = body.singlepart(
            Attachment::new(attachment.filename.clone())
                .body(attachment.content.clone(), content_type),
        );
    }

    Message::builder()
        .from(from)
        .to(to)
        .subject(&email.subject)
        .multipart(body)
        .map_err(|e| NotificationError::BuildFailed(format!("メッセージ構築失敗: {e}")))
}

#[cfg(test)]
mod tests {
    use agenda_domain::notification::{EmailAttachment, SenderIdentity};

    use super::*;

    fn make_email(to: &str, attachments: Vec<EmailAttachment>) -> EmailMessage {
        EmailMessage {
            from: SenderIdentity {
                name:    "Salon X".to_string(),
                address: "reservas@agenda.example.com".to_string(),
            },
            to: to.to_string(),
            subject: "Nueva cita agendada - Corte".to_string(),
            text_body: "Cliente: Ana (ana@x.com)".to_string(),
            attachments,
        }
    }

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SmtpNotificationSender>();
    }

    #[test]
    fn 添付付きメッセージにカレンダー招待が含まれる() {
        let email = make_email(
            "ana@x.com",
            vec![EmailAttachment::calendar(b"BEGIN:VCALENDAR".to_vec())],
        );

        let message = build_message(&email).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();

        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("text/calendar"));
        assert!(raw.contains("cita.ics"));
        assert!(raw.contains("ana@x.com"));
        assert!(raw.contains("reservas@agenda.example.com"));
    }

    #[test]
    fn 添付なしでもメッセージを構築できる() {
        let email = make_email("ana@x.com", Vec::new());

        let message = build_message(&email).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();

        assert!(!raw.contains("cita.ics"));
    }

    #[test]
    fn 不正な宛先はinvalid_addressになる() {
        let email = make_email("no-es-un-correo", Vec::new());

        let result = build_message(&email);

        assert!(matches!(result, Err(NotificationError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn tlsなしの設定でも送信インスタンスを構築できる() {
        let settings = SmtpSettings {
            host:     "localhost".to_string(),
            port:     1025,
            secure:   false,
            user:     "reservas@agenda.example.com".to_string(),
            password: "local".to_string(),
        };

        assert!(SmtpNotificationSender::new(&settings).is_ok());
    }

    #[test]
    fn パスワードはdebug出力に含まれない() {
        let settings = SmtpSettings {
            host:     "smtp.example.com".to_string(),
            port:     465,
            secure:   true,
            user:     "reservas@agenda.example.com".to_string(),
            password: "super-secret".to_string(),
        };

        let debug = format!("{settings:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
