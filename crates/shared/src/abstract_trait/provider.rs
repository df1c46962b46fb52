use crate::errors::ProviderError;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub type DynSettlementProvider = Arc<dyn SettlementProviderTrait + Send + Sync>;

/// Synchronous settlement call against the third-party purchase API. The
/// response body is returned as-is; callers extract status and transaction
/// fields defensively because the provider nests them at arbitrary depth.
#[async_trait]
pub trait SettlementProviderTrait {
    async fn settle(
        &self,
        produk_id: &str,
        msisdn: &str,
        metode_pembayaran: &str,
    ) -> Result<Value, ProviderError>;
}
