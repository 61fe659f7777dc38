//! # Notifier エラー定義
//!
//! トリガーの解釈と起動時設定の読み込みで発生するエラーを定義する。
//!
//! どちらも HTTP エラーレスポンスには変換しない。トリガーエラーは
//! 呼び出し境界でログに記録して握りつぶし、設定エラーは起動を中止する。

use agenda_domain::DomainError;
use thiserror::Error;

/// トリガーペイロードの解釈エラー
#[derive(Debug, Error)]
pub enum TriggerError {
    /// ペイロードが JSON として不正
    #[error("トリガーペイロードが不正です: {0}")]
    InvalidPayload(String),

    /// 必須フィールドが欠落
    #[error("必須フィールド {0} がありません")]
    MissingField(&'static str),

    /// 日時を解釈できない
    #[error("{field} の日時を解釈できません: {reason}")]
    InvalidTimestamp { field: &'static str, reason: String },

    /// ドキュメントパスからテナント ID を導出できない
    #[error("ドキュメントパスが不正です: {0}")]
    InvalidDocumentPath(String),

    /// ドメインの検証エラー
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// 環境変数の値が不正
    #[error("{name} の値が不正です: {value} ({reason})")]
    Invalid {
        name:   &'static str,
        value:  String,
        reason: String,
    },
}
