//! # テナント
//!
//! 予約を受け付ける事業者（negocio）のモデル。
//!
//! ## 用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`TenantId`] | テナント ID | ドキュメントパス `negocios/{tenantId}` のセグメント |
//! | [`TenantProfile`] | テナントプロフィール | ストアに保存された表示用情報（欠損しうる） |
//! | [`TenantPresentation`] | 表示用テナント情報 | 既定値を適用済みの、通知組み立てに使う値 |
//!
//! ## 既定値
//!
//! プロフィールが存在しない、または属性が未設定・空文字の場合は以下を使う:
//!
//! | 属性 | 既定値 |
//! |------|--------|
//! | 表示名 | [`DEFAULT_BUSINESS_NAME`]（`"Tu Empresa"`） |
//! | オーナー連絡先 | システムの送信元アドレス |
//! | 住所 | 空文字 |

use serde::{Deserialize, Serialize};

/// 表示名が未設定のテナントに使う汎用ラベル
pub const DEFAULT_BUSINESS_NAME: &str = "Tu Empresa";

define_document_id! {
    /// テナント（事業者）の一意識別子
    ///
    /// 予約レコードの格納パスから取り出される。
    pub struct TenantId {
        label: "テナント ID",
    }
}

/// テナントプロフィール（ストアに保存された値そのもの）
///
/// すべての属性は欠損しうる。既定値の適用は [`TenantProfile::resolve`] で行う。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantProfile {
    /// 表示名
    pub business_name: Option<String>,
    /// オーナーの連絡先メールアドレス
    pub owner_email:   Option<String>,
    /// 所在地
    pub address:       Option<String>,
}

/// 既定値を適用済みのテナント情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantPresentation {
    pub display_name: String,
    pub owner_email:  String,
    pub address:      String,
}

impl TenantProfile {
    /// 既定値を適用して表示用テナント情報に変換する
    ///
    /// 空文字・空白のみの属性は未設定として扱う。
    ///
    /// # 引数
    ///
    /// - `system_address`: システムの送信元アドレス（オーナー連絡先の既定値）
    pub fn resolve(&self, system_address: &str) -> TenantPresentation {
        TenantPresentation {
            display_name: non_blank(self.business_name.as_deref())
                .unwrap_or(DEFAULT_BUSINESS_NAME)
                .to_string(),
            owner_email:  non_blank(self.owner_email.as_deref())
                .unwrap_or(system_address)
                .to_string(),
            address:      non_blank(self.address.as_deref())
                .unwrap_or_default()
                .to_string(),
        }
    }
}

impl TenantPresentation {
    /// プロフィールが存在しないテナント向けの既定値
    pub fn defaults(system_address: &str) -> Self {
        TenantProfile::default().resolve(system_address)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
