//! # ドメイン層エラー定義
//!
//! ビジネスルール違反やドメイン固有の例外状態を表現するエラー型。
//!
//! ## 設計方針
//!
//! - **型による分類**: エラーの種類を列挙型で明示し、パターンマッチで処理可能に
//! - **thiserror 活用**: `#[error(...)]` マクロでエラーメッセージを自動生成
//!
//! カレンダー構築と通知送信の失敗はそれぞれ専用のエラー型
//! （[`CalendarError`](crate::calendar::CalendarError)、
//! [`NotificationError`](crate::notification::NotificationError)）で表現する。
//!
//! ## 使用例
//!
//! ```rust
//! use agenda_domain::DomainError;
//!
//! fn validate_email(email: &str) -> Result<(), DomainError> {
//!     if email.is_empty() {
//!         return Err(DomainError::Validation("メールアドレスは必須です".to_string()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_email("").is_err());
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 入力値がビジネスルールに違反している場合に使用する。
    ///
    /// # 例
    ///
    /// - 必須フィールドが未入力
    /// - 不正なフォーマット
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
