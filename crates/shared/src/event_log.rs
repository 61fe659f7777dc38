//! # ビジネスイベントログとエラーコンテキストの構造化ヘルパー
//!
//! `jq` で効率的に調査できるよう、ログフィールドの命名規約とヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"` マーカーが
//! 自動付与され、`jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! ## エラーコンテキスト
//!
//! `tracing::error!` / `tracing::warn!` に `error.category` + `error.kind` フィールドを直接追加する。
//! 定数は [`error`] モジュールで提供。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.category`、`error.kind`）を使用。tracing の
//! `$($field:ident).+` パターンでサポートされ、JSON 出力でフラットなキーになる。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.tenant_id`: テナント ID
/// - `event.result`: 結果（[`event::result`] の定数を使用）
///
/// ## 推奨フィールド
///
/// - `event.entity_type`: エンティティ種別（[`event::entity_type`] の定数を使用）
/// - `event.entity_id`: エンティティ ID
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const APPOINTMENT: &str = "appointment";
        pub const NOTIFICATION: &str = "notification";
    }

    /// イベントアクション
    pub mod action {
        // 予約
        pub const APPOINTMENT_RECEIVED: &str = "appointment.received";
        pub const APPOINTMENT_NOTIFIED: &str = "appointment.notified";
        pub const APPOINTMENT_ABORTED: &str = "appointment.aborted";

        // 通知
        pub const NOTIFICATION_SENT: &str = "notification.sent";
        pub const NOTIFICATION_FAILED: &str = "notification.failed";
        pub const NOTIFICATION_SKIPPED: &str = "notification.skipped";
    }

    /// エンティティ種別
    pub mod entity_type {
        pub const APPOINTMENT: &str = "appointment";
        pub const EMAIL: &str = "email";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const DEGRADED: &str = "degraded";
        pub const FAILURE: &str = "failure";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// インフラストラクチャ（DynamoDB）
        pub const INFRASTRUCTURE: &str = "infrastructure";
        /// 外部サービス呼び出し（SMTP）
        pub const EXTERNAL_SERVICE: &str = "external_service";
        /// 入力データ（トリガーペイロード、予約内容）
        pub const INPUT: &str = "input";
    }

    /// エラー種別
    pub mod kind {
        pub const TENANT_LOOKUP: &str = "tenant_lookup";
        pub const CALENDAR_ARTIFACT: &str = "calendar_artifact";
        pub const MAIL_DELIVERY: &str = "mail_delivery";
        pub const MALFORMED_TRIGGER: &str = "malformed_trigger";
    }
}
