//! # 予約作成トリガーハンドラ
//!
//! ```text
//! POST /events/appointment-created
//! ```
//!
//! ボディを受け取った後は、処理結果にかかわらず `200 OK` と結果の要約を返す。
//! 不正なペイロードでプラットフォームの再送が繰り返されないようにするため、
//! ボディは `Bytes` のまま受け取り、解釈はユースケース側で行う。

use std::sync::Arc;

use axum::{Json, extract::State};
use bytes::Bytes;

use crate::usecase::{AppointmentNotificationService, notification::InvocationOutcome};

/// トリガーハンドラーの State
pub struct TriggerState {
    pub service: AppointmentNotificationService,
}

/// 予約作成トリガーを処理する
pub async fn appointment_created(
    State(state): State<Arc<TriggerState>>,
    body: Bytes,
) -> Json<InvocationOutcome> {
    Json(state.service.handle_trigger(&body).await)
}
