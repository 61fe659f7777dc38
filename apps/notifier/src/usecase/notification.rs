//! # 予約通知ユースケース
//!
//! 予約作成トリガーから 2 通のメール送信までを統合する。
//!
//! ## モジュール構成
//!
//! - [`enrichment`] - テナントプロフィールの取得と既定値の適用
//! - [`calendar_artifact`] - カレンダー招待の生成
//! - [`message_composer`] - クライアント宛て・オーナー宛てメールの組み立て
//! - [`dispatcher`] - 送信順序と失敗時の結合方針
//! - [`report`] - ステージごとの結果型
//! - [`service`] - 上記を順に実行する統合サービス

pub mod calendar_artifact;
pub mod dispatcher;
pub mod enrichment;
pub mod message_composer;
pub mod report;
pub mod service;

pub use calendar_artifact::CalendarArtifactBuilder;
pub use dispatcher::{DispatchPolicy, NotificationDispatcher};
pub use enrichment::TenantEnricher;
pub use message_composer::MessageComposer;
pub use report::{
    AttachmentOutcome,
    EnrichmentOutcome,
    InvocationOutcome,
    NotificationReport,
    SendOutcome,
    Stage,
};
pub use service::{AppointmentNotificationService, NotificationSettings};
