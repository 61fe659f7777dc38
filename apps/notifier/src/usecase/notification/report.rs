//! # 通知処理の結果
//!
//! 各ステージの結果を判別可能な型で表現する。呼び出し境界はこれらを集約した
//! [`InvocationOutcome`] を返し、「劣化しつつ完了」と「中断」を区別できるようにする。

use agenda_domain::{appointment::AppointmentId, tenant::TenantId};
use serde::Serialize;
use strum::IntoStaticStr;

/// テナント情報の取得結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EnrichmentOutcome {
    /// プロフィールが見つかった（欠損属性には既定値を適用済み）
    Found,
    /// プロフィールが存在せず、すべて既定値
    Defaulted,
}

/// カレンダー招待の生成結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttachmentOutcome {
    /// 招待を生成し、両方のメールに添付した
    Attached,
    /// 生成に失敗し、添付なしで続行した
    Degraded { reason: String },
}

/// 1 通のメール送信結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SendOutcome {
    Sent,
    Failed { error: String },
    /// 送信を試みなかった
    Skipped,
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent)
    }
}

/// 完了した呼び出しの集約結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationReport {
    pub tenant_id:      TenantId,
    pub appointment_id: Option<AppointmentId>,
    pub enrichment:     EnrichmentOutcome,
    pub attachment:     AttachmentOutcome,
    pub client:         SendOutcome,
    pub owner:          SendOutcome,
}

impl NotificationReport {
    /// 送信に成功したメールの数
    pub fn sent_count(&self) -> usize {
        [&self.client, &self.owner]
            .into_iter()
            .filter(|outcome| outcome.is_sent())
            .count()
    }

    /// 完全に成功したか（招待を添付し、両方のメールを送信した）
    pub fn is_complete(&self) -> bool {
        self.attachment == AttachmentOutcome::Attached && self.sent_count() == 2
    }
}

/// 中断したステージ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, IntoStaticStr, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    /// トリガーペイロードの解釈
    Trigger,
    /// テナント情報の取得
    Enrichment,
}

/// 1 回の呼び出しの結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InvocationOutcome {
    /// 最後まで処理した（個々の送信は失敗している可能性がある）
    Completed(NotificationReport),
    /// 途中で中断し、メールは 1 通も送信していない
    Aborted { stage: Stage, reason: String },
}

impl InvocationOutcome {
    pub fn report(&self) -> Option<&NotificationReport> {
        match self {
            InvocationOutcome::Completed(report) => Some(report),
            InvocationOutcome::Aborted { .. } => None,
        }
    }
}
