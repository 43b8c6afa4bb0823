//! Devnet/testnet airdrops to the connected account.

use tracing::info;

use crate::error::BatuaError;
use crate::session::WalletSession;
use crate::types::{format_sol, parse_sol_amount};

pub const MIN_AIRDROP_LAMPORTS: u64 = 100_000_000;
pub const MAX_AIRDROP_LAMPORTS: u64 = 5_000_000_000;

/// Parse and bound-check an airdrop amount given in SOL.
pub fn airdrop_lamports(sol_amount: &str) -> Result<u64, BatuaError> {
    let lamports = parse_sol_amount(sol_amount)?;
    if !(MIN_AIRDROP_LAMPORTS..=MAX_AIRDROP_LAMPORTS).contains(&lamports) {
        return Err(BatuaError::Validation(format!(
            "Airdrop amount must be between {} and {} SOL",
            format_sol(MIN_AIRDROP_LAMPORTS),
            format_sol(MAX_AIRDROP_LAMPORTS)
        )));
    }
    Ok(lamports)
}

/// Request `sol_amount` SOL for the connected account and wait for it to land.
pub async fn request_airdrop(session: &WalletSession, sol_amount: &str) -> Result<String, BatuaError> {
    let lamports = airdrop_lamports(sol_amount)?;
    let account = session.pubkey();
    let rpc = session.rpc();

    let signature = rpc.request_airdrop(&account, lamports).await?;
    rpc.confirm_transaction(&signature, session.commitment()).await?;
    info!(%account, lamports, %signature, "airdrop confirmed");
    Ok(signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(airdrop_lamports("0.1").unwrap(), MIN_AIRDROP_LAMPORTS);
        assert_eq!(airdrop_lamports("5").unwrap(), MAX_AIRDROP_LAMPORTS);
        assert_eq!(airdrop_lamports("1").unwrap(), 1_000_000_000);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let err = airdrop_lamports("0.09").unwrap_err();
        assert_eq!(err.to_string(), "Airdrop amount must be between 0.1 and 5 SOL");
        assert!(airdrop_lamports("5.000000001").is_err());
        assert!(airdrop_lamports("").is_err());
    }
}
