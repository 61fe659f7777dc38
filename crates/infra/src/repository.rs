//! # リポジトリ実装
//!
//! ドメインモデルの読み取りを担当するリポジトリトレイトと、その具体的な実装を提供する。
//!
//! ## 設計方針
//!
//! - **読み取り専用**: 通知処理はレコードを変更しない
//! - **テスタビリティ**: トレイト経由でモック可能な設計

pub mod tenant_profile_repository;

pub use tenant_profile_repository::{DynamoDbTenantProfileRepository, TenantProfileRepository};
