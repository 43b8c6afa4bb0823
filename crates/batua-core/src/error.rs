use thiserror::Error;

use crate::launchpad::LaunchStep;

/// Every failure a page can surface to the user.
///
/// `Validation`, `Configuration`, `Capability` and `Busy` are raised locally
/// before any network call is made.
#[derive(Debug, Error)]
pub enum BatuaError {
    #[error("{0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("wallet capability missing: {0}")]
    Capability(String),

    #[error("an operation is already in progress")]
    Busy,

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("metadata publish failed: {0}")]
    Publish(String),

    #[error("simulation failed at {step}: {reason}")]
    Simulation { step: LaunchStep, reason: String },

    #[error("submission failed: {0}")]
    Submission(String),

    #[error("confirmation failed: {0}")]
    Confirmation(String),

    #[error("rpc error: {0}")]
    Rpc(String),

    #[error("wallet error: {0}")]
    Wallet(String),

    #[error(transparent)]
    Chain(#[from] chain_sol::SolError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_verbatim() {
        let err = BatuaError::Validation("Please fill in all required fields".into());
        assert_eq!(err.to_string(), "Please fill in all required fields");
    }

    #[test]
    fn simulation_names_the_step() {
        let err = BatuaError::Simulation {
            step: LaunchStep::CreateMintAccount,
            reason: "insufficient funds".into(),
        };
        assert_eq!(
            err.to_string(),
            "simulation failed at create mint account: insufficient funds"
        );
    }

    #[test]
    fn chain_errors_convert() {
        let err: BatuaError = chain_sol::SolError::InvalidAddress("bad".into()).into();
        assert_eq!(err.to_string(), "invalid address: bad");
    }
}
