//! Native SOL transfers and balance lookups.

use chain_sol::{system, Pubkey, Signer, Transaction};
use tracing::info;

use crate::error::BatuaError;
use crate::rpc::SendOptions;
use crate::session::WalletSession;
use crate::types::parse_sol_amount;

/// Parse a recipient, rejecting blanks with the page's wording.
pub fn parse_recipient(recipient: &str) -> Result<Pubkey, BatuaError> {
    let recipient = recipient.trim();
    if recipient.is_empty() {
        return Err(BatuaError::Validation("Please enter a recipient address".into()));
    }
    recipient
        .parse()
        .map_err(|_| BatuaError::Validation(format!("Invalid recipient address: {recipient}")))
}

/// Send `sol_amount` SOL from the connected account to `recipient`.
///
/// Returns the transaction signature once it reaches the session commitment.
pub async fn send_sol(
    session: &WalletSession,
    recipient: &str,
    sol_amount: &str,
) -> Result<String, BatuaError> {
    let to = parse_recipient(recipient)?;
    let lamports = parse_sol_amount(sol_amount)?;
    if lamports == 0 {
        return Err(BatuaError::Validation("Please enter a valid amount".into()));
    }

    let from = session.pubkey();
    let rpc = session.rpc();
    let ix = system::transfer(&from, &to, lamports)?;
    let blockhash = rpc.get_latest_blockhash().await?;
    let wallet: &dyn Signer = session.wallet();
    let tx = Transaction::new_signed(&[ix], &from, &blockhash, &[wallet])?;

    let signature = rpc.send_transaction(&tx, SendOptions::default()).await?;
    rpc.confirm_transaction(&signature, session.commitment()).await?;
    info!(%from, %to, lamports, %signature, "transfer confirmed");
    Ok(signature)
}

/// Balance of the connected account in lamports.
pub async fn balance(session: &WalletSession) -> Result<u64, BatuaError> {
    session.rpc().get_balance(&session.pubkey()).await
}

/// `6 chars...4 chars` form used in notifications.
pub fn shorten_address(address: &str) -> String {
    if address.chars().count() <= 10 {
        return address.to_string();
    }
    let head: String = address.chars().take(6).collect();
    let tail: String = address.chars().skip(address.chars().count() - 4).collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_parsing() {
        let err = parse_recipient("  ").unwrap_err();
        assert_eq!(err.to_string(), "Please enter a recipient address");
        assert!(parse_recipient("not-base58!").is_err());
        assert_eq!(
            parse_recipient(" 11111111111111111111111111111111 ").unwrap(),
            Pubkey::default()
        );
    }

    #[test]
    fn addresses_are_shortened() {
        assert_eq!(
            shorten_address("HAgk14JpMQLgt6rVgv7cBQFJWFto5Dqxi472uT3DKpqk"),
            "HAgk14...Kpqk"
        );
        assert_eq!(shorten_address("short"), "short");
    }
}
