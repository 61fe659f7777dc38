//! # 通知
//!
//! 予約作成時に送信するメールのドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`EmailMessage`] | 送信メール | 送信元・宛先・件名・本文・添付 |
//! | [`SenderIdentity`] | 送信者 | テナント表示名 + システムの送信元アドレス |
//! | [`RecipientRole`] | 受信者種別 | クライアント / オーナー |
//!
//! ## 設計方針
//!
//! - **ベストエフォート**: 送信失敗は予約作成の成否に影響しない
//! - **添付の共有**: 1 回の通知で生成したカレンダー招待を両方のメールで使い回す

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;

use crate::calendar::{CALENDAR_CONTENT_TYPE, CALENDAR_FILENAME};

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メールアドレスが不正
    #[error("メールアドレスが不正: {0}")]
    InvalidAddress(String),

    /// メッセージの組み立てに失敗
    #[error("メッセージ構築に失敗: {0}")]
    BuildFailed(String),

    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),
}

/// 受信者種別
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecipientRole {
    /// 予約したクライアント（確認メール）
    Client,
    /// 事業者のオーナー（新規予約の通知）
    Owner,
}

/// 送信者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderIdentity {
    /// 表示名（テナント表示名）
    pub name:    String,
    /// 送信元アドレス（システムの SMTP ユーザー）
    pub address: String,
}

/// 添付ファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    pub filename:     String,
    pub content_type: String,
    pub content:      Vec<u8>,
}

impl EmailAttachment {
    /// カレンダー招待の添付を作成する
    pub fn calendar(content: Vec<u8>) -> Self {
        Self {
            filename: CALENDAR_FILENAME.to_string(),
            content_type: CALENDAR_CONTENT_TYPE.to_string(),
            content,
        }
    }
}

/// 送信メール
///
/// `NotificationSender` に渡される。本文はプレーンテキストのみ。
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// 送信者
    pub from:        SenderIdentity,
    /// 送信先メールアドレス
    pub to:          String,
    /// 件名
    pub subject:     String,
    /// プレーンテキスト本文
    pub text_body:   String,
    /// 添付ファイル（カレンダー招待の生成に失敗した場合は空）
    pub attachments: Vec<EmailAttachment>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn recipient_roleの文字列変換が正しい() {
        assert_eq!(RecipientRole::Client.to_string(), "client");
        assert_eq!(RecipientRole::Owner.to_string(), "owner");

        let name: &str = RecipientRole::Owner.into();
        assert_eq!(name, "owner");
    }

    #[test]
    fn カレンダー添付のファイル名とcontent_type() {
        let attachment = EmailAttachment::calendar(b"BEGIN:VCALENDAR".to_vec());

        assert_eq!(attachment.filename, "cita.ics");
        assert_eq!(attachment.content_type, "text/calendar");
        assert_eq!(attachment.content, b"BEGIN:VCALENDAR".to_vec());
    }
}
