//! # 通知送信
//!
//! メール通知の送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール送信を抽象化
//! - **2 つの実装**: SMTP（本番・開発）、Noop（送信無効化時）
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択
//! - **プロセス内で 1 つ**: 起動時に 1 度だけ生成し `Arc` で共有する。
//!   接続の再利用はトランスポート側（lettre のコネクションプール）の責務

mod noop;
mod smtp;

use agenda_domain::notification::{EmailMessage, NotificationError};
use async_trait::async_trait;
pub use noop::NoopNotificationSender;
pub use smtp::{SmtpNotificationSender, SmtpSettings};

/// メール送信トレイト
///
/// 複数の呼び出しから同時に使われるため `Send + Sync` を要求する。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを送信する
    ///
    /// リトライは行わない。
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;
}
