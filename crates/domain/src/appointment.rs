//! # 予約（cita）
//!
//! 新規作成された予約レコードのモデル。通知処理の間は不変として扱う。
//!
//! 必須なのはクライアントのメールアドレスと開始・終了時刻のみ。
//! 名前系のフィールドは欠損していても空文字として扱い、処理を止めない。
//! 開始 < 終了 の検証はここでは行わない（カレンダー招待の構築時に検証し、
//! 失敗しても通知は添付なしで続行するため）。

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::DomainError;

define_document_id! {
    /// 予約の一意識別子
    ///
    /// ドキュメントパス `negocios/{tenantId}/citas/{appointmentId}` の末尾セグメント。
    pub struct AppointmentId {
        label: "予約 ID",
    }
}

/// 予約レコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appointment {
    /// クライアント名
    pub client_name:  String,
    /// クライアントのメールアドレス（送信先として必須）
    pub client_email: String,
    /// 担当スタッフ名
    pub staff_name:   String,
    /// サービス名
    pub service_name: String,
    /// 開始時刻
    pub start:        DateTime<Utc>,
    /// 終了時刻
    pub end:          DateTime<Utc>,
}

impl Appointment {
    /// 必須フィールドを検証して予約を作成する
    ///
    /// 任意フィールドの `None` は空文字になる。
    pub fn new(
        client_name: Option<String>,
        client_email: String,
        staff_name: Option<String>,
        service_name: Option<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let client_email = client_email.trim().to_string();
        if client_email.is_empty() {
            return Err(DomainError::Validation(
                "クライアントのメールアドレスは必須です".to_string(),
            ));
        }

        Ok(Self {
            client_name: client_name.unwrap_or_default(),
            client_email,
            staff_name: staff_name.unwrap_or_default(),
            service_name: service_name.unwrap_or_default(),
            start,
            end,
        })
    }
}
