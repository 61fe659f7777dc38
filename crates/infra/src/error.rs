//! # インフラ層エラー定義
//!
//! テナントプロフィールストアなど外部サービスとの通信で発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **エラーの変換**: AWS SDK のエラーは文字列にマップしてラップ
//! - **ドメインエラーとの分離**: インフラ固有のエラーを明示
//! - **SpanTrace 自動捕捉**: convenience constructor でエラー生成時の呼び出し経路を記録する
//!
//! ## 構造
//!
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別（[`InfraErrorKind`]）と [`SpanTrace`]（呼び出し経路）を保持する。
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// DynamoDB エラー
    ///
    /// AWS SDK のエラー型はジェネリクスが深く `#[from]` が困難なため、
    /// 手動で String にマップする。
    #[error("DynamoDB エラー: {0}")]
    DynamoDb(String),

    /// 保存データの形式が不正
    ///
    /// 属性の型が想定と異なる場合など。
    #[error("データ形式エラー: {0}")]
    InvalidData(String),
}

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    fn with_kind(kind: InfraErrorKind) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }

    /// DynamoDB エラーを生成する
    pub fn dynamo_db(msg: impl Into<String>) -> Self {
        Self::with_kind(InfraErrorKind::DynamoDb(msg.into()))
    }

    /// データ形式エラーを生成する
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::with_kind(InfraErrorKind::InvalidData(msg.into()))
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::layer::SubscriberExt as _;

    use super::*;

    /// テスト用に ErrorLayer 付き subscriber を設定する
    fn with_error_layer(f: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
        let _guard = tracing::subscriber::set_default(subscriber);
        f();
    }

    #[test]
    fn dynamo_dbは生成時のスパンを記録する() {
        with_error_layer(|| {
            let span = tracing::info_span!("test_tenant_lookup", tenant_id = "salon-x");
            let _enter = span.enter();

            let err = InfraError::dynamo_db("接続失敗");

            assert!(matches!(err.kind(), InfraErrorKind::DynamoDb(msg) if msg == "接続失敗"));
            let trace_str = format!("{}", err.span_trace());
            assert!(
                trace_str.contains("test_tenant_lookup"),
                "SpanTrace がスパン名を含むこと: {trace_str}",
            );
        });
    }

    #[test]
    fn invalid_dataは属性名を含むメッセージになる() {
        let err = InfraError::invalid_data("businessName が文字列ではありません");

        assert!(matches!(err.kind(), InfraErrorKind::InvalidData(_)));
        assert_eq!(
            err.to_string(),
            "データ形式エラー: businessName が文字列ではありません"
        );
    }
}
