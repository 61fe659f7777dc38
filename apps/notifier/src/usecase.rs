//! # ユースケース層
//!
//! Notifier のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリ・送信手段を `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約

pub mod notification;

pub use notification::{AppointmentNotificationService, NotificationSettings};
