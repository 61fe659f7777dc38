//! # Agenda ドメイン層
//!
//! 予約（cita）作成時の通知に関わるドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **値オブジェクト**: 識別子・カレンダー日時フィールドは検証済みの Newtype で表現する
//! - **明示的なデフォルト**: テナント情報の欠損は Option で受け、既定値の適用は
//!   [`tenant::TenantProfile::resolve`] の一箇所に集約する
//! - **構造化エラー**: カレンダー構築や通知の失敗は panic ではなく列挙型で返す
//!
//! ## 依存関係の方向
//!
//! ```text
//! notifier → infra → domain
//!     ↘                ↑
//!       ───────────────
//! ```
//!
//! ドメイン層はインフラ層（DynamoDB、SMTP、iCalendar エンコーダ）に一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`appointment`] - 予約レコード
//! - [`calendar`] - カレンダー招待（イベント記述とバリデーション）
//! - [`error`] - ドメイン層エラー
//! - [`notification`] - 送信メールのモデルと送信エラー
//! - [`tenant`] - テナント（事業者）識別子とプロフィール

#[macro_use]
mod macros;

pub mod appointment;
pub mod calendar;
pub mod error;
pub mod notification;
pub mod tenant;

pub use error::DomainError;
