//! Solana RPC service for PoolWatch (read-only, no wallet)

use async_trait::async_trait;
use solana_account_decoder::parse_token::UiTokenAmount;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::FetchError;
use crate::modules::Snapshot;
use crate::utils::raydium::LiquidityStateV4;

/// Source of pool reserve observations
#[async_trait]
pub trait PoolStateFetcher: Send + Sync {
    /// Fetch the pool's current reserves. `Ok(None)` when the pool account does not exist.
    async fn fetch(&self, pool_id: &Pubkey) -> Result<Option<Snapshot>, FetchError>;
}

/// Solana service for RPC interactions
pub struct SolanaService {
    pub client: Arc<RpcClient>,
    pub market_program_id: Pubkey,
}

impl SolanaService {
    /// Create a new Solana service
    pub fn new(config: &Config) -> Self {
        let client = Arc::new(RpcClient::new_with_timeout_and_commitment(
            config.rpc_url.clone(),
            config.rpc_timeout,
            CommitmentConfig::confirmed(),
        ));

        info!(target: "SOLANA", "Connected to Solana RPC (monitor-only mode)");

        Self {
            client,
            market_program_id: config.market_program_id,
        }
    }

    /// Vault balance in ui units
    async fn get_vault_balance(&self, vault: &Pubkey) -> Result<f64, FetchError> {
        let amount = self
            .client
            .get_token_account_balance(vault)
            .await
            .map_err(|e| FetchError::Network(format!("getTokenAccountBalance {}: {}", vault, e)))?;

        ui_amount(&amount).ok_or_else(|| {
            FetchError::Decode(format!("vault {} returned no ui amount", vault))
        })
    }

    /// Shorten an address for display
    pub fn shorten_address(address: &str, chars: usize) -> String {
        if address.len() <= chars * 2 {
            return address.to_string();
        }
        format!("{}...{}", &address[..chars], &address[address.len() - chars..])
    }
}

#[async_trait]
impl PoolStateFetcher for SolanaService {
    async fn fetch(&self, pool_id: &Pubkey) -> Result<Option<Snapshot>, FetchError> {
        let response = self
            .client
            .get_account_with_commitment(pool_id, CommitmentConfig::confirmed())
            .await
            .map_err(|e| FetchError::Network(format!("getAccountInfo {}: {}", pool_id, e)))?;

        let slot = response.context.slot;
        let account = match response.value {
            Some(account) => account,
            None => return Ok(None),
        };

        let state = LiquidityStateV4::decode(&account.data)?;
        debug!(
            target: "SOLANA",
            "Pool status={} market={} base_mint={} ({} dp) quote_mint={} ({} dp) lp_reserve={}",
            state.status,
            state.market_id,
            state.base_mint,
            state.base_decimal,
            state.quote_mint,
            state.quote_decimal,
            state.lp_reserve
        );

        if state.market_program_id != self.market_program_id {
            warn!(
                target: "SOLANA",
                "Pool {} is bound to market program {}, expected {}",
                Self::shorten_address(&pool_id.to_string(), 4),
                state.market_program_id,
                self.market_program_id
            );
        }

        let base_amount = self.get_vault_balance(&state.base_vault).await?;
        let quote_amount = self.get_vault_balance(&state.quote_vault).await?;

        debug!(
            target: "SOLANA",
            "Pool {} @ slot {}: base={} quote={}",
            Self::shorten_address(&pool_id.to_string(), 4),
            slot,
            base_amount,
            quote_amount
        );

        Ok(Some(Snapshot::new(base_amount, quote_amount, slot)))
    }
}

/// `uiAmount` is deprecated upstream and may be null; fall back to the string form
fn ui_amount(amount: &UiTokenAmount) -> Option<f64> {
    amount
        .ui_amount
        .or_else(|| amount.ui_amount_string.parse().ok())
}
