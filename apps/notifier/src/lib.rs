//! # Notifier ライブラリ
//!
//! 予約作成トリガーを受けてメール通知を送信するサービスの構成要素を公開する。
//! 統合テスト用に内部モジュールへのアクセスを提供する。

pub mod config;
pub mod error;
pub mod handler;
pub mod trigger;
pub mod usecase;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use handler::{TriggerState, appointment_created, health_check};
use tower_http::trace::TraceLayer;

/// ルーターを構築する
pub fn router(state: Arc<TriggerState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/events/appointment-created", post(appointment_created))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
