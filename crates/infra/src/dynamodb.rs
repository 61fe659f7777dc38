//! # DynamoDB 接続管理
//!
//! テナントプロフィールを格納する Amazon DynamoDB への接続管理を行う。
//!
//! ## 設計方針
//!
//! - **ローカル開発**: DynamoDB Local を使用（エンドポイント指定時）
//! - **本番環境**: 標準の認証情報プロバイダチェーン（IAM ロール等）で接続
//! - **テーブル自動作成**: ローカル開発用。テーブルが存在しなければ作成（冪等）
//!
//! ## テーブルスキーマ
//!
//! - PK: `tenant_id` (String)
//! - 属性: `businessName`, `ownerEmail`, `address`（すべて任意の String）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use agenda_infra::dynamodb;
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = dynamodb::create_client(Some("http://localhost:18000")).await;
//!     dynamodb::ensure_tenant_profile_table(&client, "negocios").await?;
//!     Ok(())
//! }
//! ```

use aws_sdk_dynamodb::{
    Client,
    types::{AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType},
};

use crate::InfraError;

/// テナントプロフィールテーブルのパーティションキー名
pub const TENANT_ID_KEY: &str = "tenant_id";

/// DynamoDB クライアントを作成する
///
/// # 引数
///
/// * `endpoint` - DynamoDB Local のエンドポイント URL（例: `http://localhost:18000`）。
///   `None` の場合は環境の既定設定（リージョン・認証情報）で AWS に接続する。
pub async fn create_client(endpoint: Option<&str>) -> Client {
    let loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

    let config = match endpoint {
        Some(endpoint) => {
            loader
                .endpoint_url(endpoint)
                .region(aws_config::Region::new("us-east-1"))
                // DynamoDB Local はクレデンシャルを検証しないが、SDK はプロバイダが必要
                .credentials_provider(aws_sdk_dynamodb::config::Credentials::new(
                    "local", "local", None, None, "local",
                ))
                .load()
                .await
        }
        None => loader.load().await,
    };

    Client::new(&config)
}

/// テナントプロフィールテーブルが存在しなければ作成する（冪等）
///
/// ローカル開発時の起動処理から呼ばれる。本番のテーブルは IaC で管理する。
pub async fn ensure_tenant_profile_table(
    client: &Client,
    table_name: &str,
) -> Result<(), InfraError> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(_) => {
            tracing::debug!("テーブル '{}' は既に存在します", table_name);
            return Ok(());
        }
        Err(err) => {
            // ResourceNotFoundException の場合のみテーブル作成に進む
            let not_found = err
                .as_service_error()
                .map(|e| e.is_resource_not_found_exception())
                .unwrap_or(false);
            if !not_found {
                return Err(InfraError::dynamo_db(format!(
                    "テーブル '{table_name}' の確認に失敗: {err}"
                )));
            }
        }
    }

    tracing::info!("テーブル '{}' を作成します", table_name);

    let create_result = client
        .create_table()
        .table_name(table_name)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(TENANT_ID_KEY)
                .key_type(KeyType::Hash)
                .build()
                .map_err(|e| InfraError::dynamo_db(format!("KeySchema 構築エラー: {e}")))?,
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(TENANT_ID_KEY)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .map_err(|e| {
                    InfraError::dynamo_db(format!("AttributeDefinition 構築エラー: {e}"))
                })?,
        )
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;

    if let Err(err) = create_result {
        // ResourceInUseException は並行起動時に発生しうる（テーブルが作成中）
        let is_resource_in_use = err
            .as_service_error()
            .map(|e| e.is_resource_in_use_exception())
            .unwrap_or(false);
        if !is_resource_in_use {
            return Err(InfraError::dynamo_db(format!(
                "テーブル '{table_name}' の作成に失敗: {err}"
            )));
        }
        tracing::debug!(
            "テーブル '{}' は既に作成中または存在します（ResourceInUseException）",
            table_name
        );
        return Ok(());
    }

    tracing::info!("テーブル '{}' を作成しました", table_name);

    Ok(())
}
