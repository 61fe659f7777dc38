//! # TenantProfileRepository
//!
//! テナントプロフィールの取得を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **ポイントルックアップ**: テナント ID をキーに 1 回だけ `GetItem` する
//! - **不在は正常系**: アイテムが存在しない場合は `Ok(None)` を返す（エラーではない）
//! - **属性の欠損を許容**: 未設定の属性は `None` のまま返し、既定値の適用はドメイン層で行う

use std::collections::HashMap;

use agenda_domain::tenant::{TenantId, TenantProfile};
use async_trait::async_trait;
use aws_sdk_dynamodb::{Client, types::AttributeValue};

use crate::{InfraError, dynamodb::TENANT_ID_KEY};

/// 保存属性名: 表示名
const ATTR_BUSINESS_NAME: &str = "businessName";
/// 保存属性名: オーナー連絡先
const ATTR_OWNER_EMAIL: &str = "ownerEmail";
/// 保存属性名: 所在地
const ATTR_ADDRESS: &str = "address";

/// テナントプロフィールリポジトリトレイト
#[async_trait]
pub trait TenantProfileRepository: Send + Sync {
    /// ID でテナントプロフィールを検索
    ///
    /// テナントが存在しない場合は `Ok(None)`。
    async fn find_by_id(&self, id: &TenantId) -> Result<Option<TenantProfile>, InfraError>;
}

/// DynamoDB 実装の TenantProfileRepository
#[derive(Debug, Clone)]
pub struct DynamoDbTenantProfileRepository {
    client:     Client,
    table_name: String,
}

impl DynamoDbTenantProfileRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl TenantProfileRepository for DynamoDbTenantProfileRepository {
    #[tracing::instrument(skip_all, fields(tenant_id = %id))]
    async fn find_by_id(&self, id: &TenantId) -> Result<Option<TenantProfile>, InfraError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(TENANT_ID_KEY, AttributeValue::S(id.as_str().to_string()))
            .send()
            .await
            .map_err(|e| {
                InfraError::dynamo_db(format!("テナントプロフィールの取得に失敗: {e}"))
            })?;

        let Some(item) = output.item() else {
            tracing::debug!("テナントプロフィールが存在しません");
            return Ok(None);
        };

        item_to_profile(item).map(Some)
    }
}

/// DynamoDB アイテムをテナントプロフィールに変換する
///
/// 文字列以外の型で保存されている属性はデータ不整合としてエラーにする。
/// `NULL` 型は未設定と同じ扱い。
fn item_to_profile(item: &HashMap<String, AttributeValue>) -> Result<TenantProfile, InfraError> {
    Ok(TenantProfile {
        business_name: optional_string(item, ATTR_BUSINESS_NAME)?,
        owner_email:   optional_string(item, ATTR_OWNER_EMAIL)?,
        address:       optional_string(item, ATTR_ADDRESS)?,
    })
}

fn optional_string(
    item: &HashMap<String, AttributeValue>,
    name: &str,
) -> Result<Option<String>, InfraError> {
    match item.get(name) {
        None | Some(AttributeValue::Null(_)) => Ok(None),
        Some(AttributeValue::S(value)) => Ok(Some(value.clone())),
        Some(other) => Err(InfraError::invalid_data(format!(
            "{name} が文字列ではありません: {other:?}"
        ))),
    }
}
