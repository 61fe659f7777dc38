//! # Agenda インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! ドメイン層のモデルを入出力とするトレイトと、その具体的な実装を提供する。
//! 外部システムの詳細をカプセル化し、ユースケースをインフラの変更から保護する。
//!
//! ## 責務
//!
//! - **テナントプロフィール参照**: DynamoDB へのポイントルックアップ
//! - **メール送信**: SMTP（lettre）/ Noop
//! - **カレンダー招待のエンコード**: iCalendar（icalendar クレート）
//!
//! ## モジュール構成
//!
//! - [`calendar`] - カレンダー招待のエンコーダ
//! - [`dynamodb`] - DynamoDB クライアント生成とテーブル準備
//! - [`error`] - インフラ層エラー定義
//! - [`notification`] - メール送信
//! - [`repository`] - リポジトリ実装

pub mod calendar;
pub mod dynamodb;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod notification;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
