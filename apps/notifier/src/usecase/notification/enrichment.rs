//! # テナント情報の取得
//!
//! テナント ID でプロフィールを 1 回だけ取得し、既定値を適用する。
//!
//! - 存在しない → すべて既定値（[`EnrichmentOutcome::Defaulted`]）
//! - ストア障害 → エラーを返す（存在しない場合とは区別する）

use std::sync::Arc;

use agenda_domain::tenant::{TenantId, TenantPresentation};
use agenda_infra::{InfraError, repository::TenantProfileRepository};

use super::report::EnrichmentOutcome;

pub struct TenantEnricher {
    repo:           Arc<dyn TenantProfileRepository>,
    /// オーナー連絡先の既定値
    system_address: String,
}

impl TenantEnricher {
    pub fn new(repo: Arc<dyn TenantProfileRepository>, system_address: impl Into<String>) -> Self {
        Self {
            repo,
            system_address: system_address.into(),
        }
    }

    pub async fn enrich(
        &self,
        tenant_id: &TenantId,
    ) -> Result<(TenantPresentation, EnrichmentOutcome), InfraError> {
        let profile = self.repo.find_by_id(tenant_id).await?;

        Ok(match profile {
            Some(profile) => (
                profile.resolve(&self.system_address),
                EnrichmentOutcome::Found,
            ),
            None => {
                tracing::debug!(tenant_id = %tenant_id, "テナントプロフィールがないため既定値を使用");
                (
                    TenantPresentation::defaults(&self.system_address),
                    EnrichmentOutcome::Defaulted,
                )
            }
        })
    }
}
