//! Raydium AMM v4 liquidity-state account decoding

use solana_sdk::pubkey::Pubkey;

use crate::error::FetchError;

/// Size of an AMM v4 liquidity-state account
pub const LIQUIDITY_STATE_V4_LEN: usize = 752;

const STATUS_OFFSET: usize = 0;
const BASE_DECIMAL_OFFSET: usize = 32;
const QUOTE_DECIMAL_OFFSET: usize = 40;
const BASE_VAULT_OFFSET: usize = 336;
const QUOTE_VAULT_OFFSET: usize = 368;
const BASE_MINT_OFFSET: usize = 400;
const QUOTE_MINT_OFFSET: usize = 432;
const MARKET_ID_OFFSET: usize = 528;
const MARKET_PROGRAM_ID_OFFSET: usize = 560;
const LP_RESERVE_OFFSET: usize = 720;

/// Fields of the AMM v4 pool state used by the watcher
#[derive(Debug, Clone, PartialEq)]
pub struct LiquidityStateV4 {
    pub status: u64,
    pub base_decimal: u64,
    pub quote_decimal: u64,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub market_id: Pubkey,
    pub market_program_id: Pubkey,
    pub lp_reserve: u64,
}

impl LiquidityStateV4 {
    /// Decode raw account data. Any length other than 752 bytes is rejected.
    pub fn decode(data: &[u8]) -> Result<Self, FetchError> {
        if data.len() != LIQUIDITY_STATE_V4_LEN {
            return Err(FetchError::Decode(format!(
                "expected {} bytes of AMM v4 state, got {}",
                LIQUIDITY_STATE_V4_LEN,
                data.len()
            )));
        }

        Ok(Self {
            status: read_u64(data, STATUS_OFFSET)?,
            base_decimal: read_u64(data, BASE_DECIMAL_OFFSET)?,
            quote_decimal: read_u64(data, QUOTE_DECIMAL_OFFSET)?,
            base_vault: read_pubkey(data, BASE_VAULT_OFFSET)?,
            quote_vault: read_pubkey(data, QUOTE_VAULT_OFFSET)?,
            base_mint: read_pubkey(data, BASE_MINT_OFFSET)?,
            quote_mint: read_pubkey(data, QUOTE_MINT_OFFSET)?,
            market_id: read_pubkey(data, MARKET_ID_OFFSET)?,
            market_program_id: read_pubkey(data, MARKET_PROGRAM_ID_OFFSET)?,
            lp_reserve: read_u64(data, LP_RESERVE_OFFSET)?,
        })
    }
}

fn read_u64(data: &[u8], offset: usize) -> Result<u64, FetchError> {
    data.get(offset..offset + 8)
        .and_then(|bytes| bytes.try_into().ok())
        .map(u64::from_le_bytes)
        .ok_or_else(|| FetchError::Decode(format!("u64 at offset {} out of bounds", offset)))
}

fn read_pubkey(data: &[u8], offset: usize) -> Result<Pubkey, FetchError> {
    data.get(offset..offset + 32)
        .and_then(|bytes| Pubkey::try_from(bytes).ok())
        .ok_or_else(|| FetchError::Decode(format!("pubkey at offset {} out of bounds", offset)))
}
