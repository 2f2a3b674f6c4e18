//! Solana JSON-RPC client with timeout and failover.
//!
//! # Responsibilities
//! - Post JSON-RPC 2.0 requests to the primary endpoint, then failovers
//! - Read balances, request devnet airdrops, track signature status
//! - Bound every request with a timeout

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, timeout};
use url::Url;

use crate::blockchain::address::Pubkey;
use crate::blockchain::types::{
    BlockchainError, BlockchainResult, Commitment, RpcConfig, SignatureStatus,
};
use crate::observability::metrics;

/// Read-only source of account balances in minor units.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn get_balance(&self, address: &Pubkey) -> BlockchainResult<u64>;
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSignatureStatus {
    err: Option<Value>,
    confirmation_status: Option<Commitment>,
}

impl From<Option<RawSignatureStatus>> for SignatureStatus {
    fn from(raw: Option<RawSignatureStatus>) -> Self {
        let Some(raw) = raw else {
            return SignatureStatus::Pending;
        };
        if let Some(err) = raw.err {
            return SignatureStatus::Failed(err.to_string());
        }
        match raw.confirmation_status {
            Some(Commitment::Finalized) => SignatureStatus::Finalized,
            Some(Commitment::Confirmed) => SignatureStatus::Confirmed,
            Some(Commitment::Processed) | None => SignatureStatus::Processed,
        }
    }
}

/// JSON-RPC client wrapper with failover support.
#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    /// Primary endpoint first, then failovers.
    endpoints: Vec<Url>,
    config: RpcConfig,
    timeout_duration: Duration,
    next_id: Arc<AtomicU64>,
}

impl RpcClient {
    /// Create a new client. Only the primary URL is required to parse;
    /// invalid failover URLs are skipped with a warning.
    pub fn new(config: RpcConfig) -> BlockchainResult<Self> {
        let primary: Url = config.url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.url, e))
        })?;
        let mut endpoints = vec![primary];

        for url_str in &config.failover_urls {
            match url_str.parse() {
                Ok(url) => endpoints.push(url),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| BlockchainError::Rpc(format!("HTTP client: {}", e)))?;

        tracing::debug!(
            rpc_url = %config.url,
            endpoints = endpoints.len(),
            commitment = config.commitment.as_str(),
            "RPC client initialized"
        );

        Ok(Self {
            http,
            endpoints,
            timeout_duration: Duration::from_secs(config.timeout_secs),
            config,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Issue one JSON-RPC call, trying each endpoint in turn.
    ///
    /// A JSON-RPC error object is the node's answer and is returned as-is;
    /// only transport failures and timeouts move on to the next endpoint.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
    ) -> BlockchainResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        for (i, endpoint) in self.endpoints.iter().enumerate() {
            match timeout(self.timeout_duration, self.post(endpoint, &body)).await {
                Ok(Ok(result)) => {
                    metrics::record_rpc_request(method, true);
                    return Ok(result);
                }
                Ok(Err(e @ BlockchainError::RpcResponse { .. })) => {
                    metrics::record_rpc_request(method, false);
                    return Err(e);
                }
                Ok(Err(e)) => {
                    tracing::warn!(endpoint_idx = i, method, error = %e, "RPC error, trying next endpoint");
                }
                Err(_) => {
                    tracing::warn!(endpoint_idx = i, method, "RPC timeout, trying next endpoint");
                }
            }
        }

        metrics::record_rpc_request(method, false);
        Err(BlockchainError::Rpc(format!(
            "All RPC endpoints failed for {}",
            method
        )))
    }

    async fn post<T: DeserializeOwned>(&self, endpoint: &Url, body: &Value) -> BlockchainResult<T> {
        let response = self
            .http
            .post(endpoint.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| BlockchainError::Rpc(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BlockchainError::Rpc(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        let parsed: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| BlockchainError::MalformedResponse(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(BlockchainError::RpcResponse {
                code: error.code,
                message: error.message,
            });
        }
        parsed
            .result
            .ok_or_else(|| BlockchainError::MalformedResponse("missing result".to_string()))
    }

    /// Get the balance of an account in lamports.
    pub async fn get_balance(&self, address: &Pubkey) -> BlockchainResult<u64> {
        let response: WithContext<u64> = self
            .call(
                "getBalance",
                json!([address.to_string(), { "commitment": self.config.commitment }]),
            )
            .await?;
        Ok(response.value)
    }

    /// Request an airdrop (devnet/testnet only). Returns the signature.
    pub async fn request_airdrop(&self, address: &Pubkey, lamports: u64) -> BlockchainResult<String> {
        let signature: String = self
            .call(
                "requestAirdrop",
                json!([address.to_string(), lamports, { "commitment": self.config.commitment }]),
            )
            .await?;
        tracing::info!(address = %address, lamports, signature = %signature, "Airdrop requested");
        Ok(signature)
    }

    /// Get the current status of a transaction signature.
    pub async fn get_signature_status(&self, signature: &str) -> BlockchainResult<SignatureStatus> {
        let response: WithContext<Vec<Option<RawSignatureStatus>>> = self
            .call(
                "getSignatureStatuses",
                json!([[signature], { "searchTransactionHistory": true }]),
            )
            .await?;

        let status = response.value.into_iter().next().ok_or_else(|| {
            BlockchainError::MalformedResponse("empty signature status list".to_string())
        })?;
        Ok(status.into())
    }

    /// Wait until `signature` reaches the configured commitment.
    ///
    /// # Arguments
    /// * `signature` - Transaction signature to monitor
    /// * `timeout_secs` - Maximum time to wait
    pub async fn wait_for_confirmation(
        &self,
        signature: &str,
        timeout_secs: u64,
    ) -> BlockchainResult<SignatureStatus> {
        let commitment = self.config.commitment;
        let poll_interval = Duration::from_millis(self.config.confirmation_poll_ms.max(1));

        let result = timeout(Duration::from_secs(timeout_secs), async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                match self.get_signature_status(signature).await? {
                    SignatureStatus::Failed(err) => {
                        return Err(BlockchainError::TransactionFailed(err));
                    }
                    status if status.satisfies(commitment) => return Ok(status),
                    status => {
                        tracing::debug!(
                            signature,
                            status = ?status,
                            required = commitment.as_str(),
                            "Waiting for confirmation"
                        );
                    }
                }
            }
        })
        .await;

        match result {
            Ok(status) => status,
            Err(_) => Err(BlockchainError::ConfirmationTimeout(timeout_secs)),
        }
    }

    /// Check if the node reports itself healthy.
    pub async fn is_healthy(&self) -> bool {
        matches!(self.call::<String>("getHealth", json!([])).await, Ok(s) if s == "ok")
    }

    /// Get the configuration.
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }
}

#[async_trait]
impl BalanceSource for RpcClient {
    async fn get_balance(&self, address: &Pubkey) -> BlockchainResult<u64> {
        RpcClient::get_balance(self, address).await
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("rpc_url", &self.config.url)
            .field("endpoints", &self.endpoints.len())
            .field("timeout_secs", &self.config.timeout_secs)
            .finish()
    }
}
