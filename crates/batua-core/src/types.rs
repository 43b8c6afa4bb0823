use chain_sol::{pad_symbol, ui_amount_to_base_units, Pubkey, LAMPORTS_PER_SOL};
use serde::{Deserialize, Serialize};

use crate::error::BatuaError;

/// Longest symbol the form accepts; the on-chain value is padded to six.
pub const MAX_SYMBOL_INPUT_LEN: usize = 5;
/// Longest token name, in characters, that still leaves room for the
/// metadata URI in a single transaction.
pub const MAX_NAME_LEN: usize = 32;
pub const DEFAULT_DECIMALS: &str = "9";
pub const DEFAULT_SUPPLY: &str = "1000000";

const MISSING_FIELDS: &str = "Please fill in all required fields";

/// Raw launchpad form fields, edited one at a time as the user types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenForm {
    pub name: String,
    symbol: String,
    pub decimals: String,
    pub supply: String,
    pub description: String,
    pub logo_url: Option<String>,
}

impl Default for TokenForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            symbol: String::new(),
            decimals: DEFAULT_DECIMALS.into(),
            supply: DEFAULT_SUPPLY.into(),
            description: String::new(),
            logo_url: None,
        }
    }
}

impl TokenForm {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Uppercase and cap the symbol at five characters, like the input box.
    pub fn set_symbol(&mut self, symbol: &str) {
        self.symbol = symbol
            .trim()
            .to_uppercase()
            .chars()
            .take(MAX_SYMBOL_INPUT_LEN)
            .collect();
    }

    /// All required fields hold something. Enables the create button.
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.symbol, &self.decimals, &self.supply]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A validated token description, ready for the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDescriptor {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub supply: u64,
    pub description: String,
    pub logo_url: Option<String>,
}

impl TokenDescriptor {
    /// The six-character symbol stored on-chain.
    pub fn onchain_symbol(&self) -> String {
        pad_symbol(&self.symbol)
    }

    /// `supply * 10^decimals`, the amount minted to the creator.
    pub fn base_units(&self) -> Result<u64, BatuaError> {
        Ok(ui_amount_to_base_units(self.supply, self.decimals)?)
    }
}

impl TryFrom<&TokenForm> for TokenDescriptor {
    type Error = BatuaError;

    fn try_from(form: &TokenForm) -> Result<Self, Self::Error> {
        if !form.is_complete() {
            return Err(BatuaError::Validation(MISSING_FIELDS.into()));
        }

        let name = form.name.trim();
        if name.chars().count() > MAX_NAME_LEN {
            return Err(BatuaError::Validation(format!(
                "Name must be at most {MAX_NAME_LEN} characters"
            )));
        }

        let symbol = form.symbol.trim();
        if symbol.chars().count() > MAX_SYMBOL_INPUT_LEN {
            return Err(BatuaError::Validation(format!(
                "Symbol must be at most {MAX_SYMBOL_INPUT_LEN} characters"
            )));
        }

        let decimals: u8 = form
            .decimals
            .trim()
            .parse()
            .ok()
            .filter(|d| *d <= chain_sol::token_2022::MAX_DECIMALS)
            .ok_or_else(|| BatuaError::Validation("Decimals must be a whole number from 0 to 9".into()))?;

        let supply: u64 = form
            .supply
            .trim()
            .parse()
            .ok()
            .filter(|s| *s > 0)
            .ok_or_else(|| BatuaError::Validation("Supply must be a positive whole number".into()))?;

        let descriptor = Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals,
            supply,
            description: form.description.trim().to_string(),
            logo_url: form.logo_url.clone(),
        };

        // Reject supplies whose base-unit amount cannot be minted.
        descriptor
            .base_units()
            .map_err(|_| BatuaError::Validation("Supply is too large for the chosen decimals".into()))?;

        Ok(descriptor)
    }
}

/// Outcome of an image upload, kept for the current form session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadResult {
    pub secure_url: Option<String>,
    pub success: bool,
    pub error: Option<String>,
}

impl UploadResult {
    pub fn succeeded(secure_url: String) -> Self {
        Self {
            secure_url: Some(secure_url),
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            secure_url: None,
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Off-chain token metadata as published to the pinning service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub mint: String,
    pub name: String,
    pub description: String,
    pub symbol: String,
    pub image: String,
}

impl MetadataRecord {
    pub fn new(mint: &Pubkey, descriptor: &TokenDescriptor, image_url: Option<&str>) -> Self {
        Self {
            mint: mint.to_string(),
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            symbol: descriptor.symbol.clone(),
            image: image_url.unwrap_or_default().to_string(),
        }
    }
}

/// A signed off-chain message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRecord {
    pub message: Vec<u8>,
    pub signature: [u8; 64],
    pub encoded: String,
}

/// Parse a decimal SOL amount ("1", "0.25", "1.000000001") into lamports
/// without going through floating point.
pub fn parse_sol_amount(input: &str) -> Result<u64, BatuaError> {
    let invalid = || BatuaError::Validation("Please enter a valid amount".into());
    let input = input.trim();

    let (whole, frac) = match input.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (input, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if frac.len() > 9 {
        return Err(BatuaError::Validation(
            "SOL amounts have at most 9 decimal places".into(),
        ));
    }

    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
    let frac_lamports: u64 = if frac.is_empty() {
        0
    } else {
        format!("{frac:0<9}").parse().map_err(|_| invalid())?
    };

    whole
        .checked_mul(LAMPORTS_PER_SOL)
        .and_then(|l| l.checked_add(frac_lamports))
        .ok_or_else(invalid)
}

/// Render lamports as a SOL amount with trailing zeros trimmed.
pub fn format_sol(lamports: u64) -> String {
    let whole = lamports / LAMPORTS_PER_SOL;
    let frac = lamports % LAMPORTS_PER_SOL;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:09}");
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> TokenForm {
        let mut form = TokenForm::default();
        form.name = "My Awesome Token".into();
        form.set_symbol("mat");
        form
    }

    #[test]
    fn form_defaults() {
        let form = TokenForm::default();
        assert_eq!(form.decimals, "9");
        assert_eq!(form.supply, "1000000");
        assert!(!form.is_complete());
    }

    #[test]
    fn symbol_is_uppercased_and_capped() {
        let mut form = TokenForm::default();
        form.set_symbol("abcdefg");
        assert_eq!(form.symbol(), "ABCDE");
    }

    #[test]
    fn valid_form_converts() {
        let descriptor = TokenDescriptor::try_from(&filled_form()).unwrap();
        assert_eq!(descriptor.symbol, "MAT");
        assert_eq!(descriptor.onchain_symbol(), "MAT   ");
        assert_eq!(descriptor.decimals, 9);
        assert_eq!(descriptor.supply, 1_000_000);
        assert_eq!(descriptor.base_units().unwrap(), 1_000_000_000_000_000);
    }

    #[test]
    fn each_missing_field_is_rejected() {
        let blank: [fn(&mut TokenForm); 4] = [
            |f| f.name.clear(),
            |f| f.set_symbol(""),
            |f| f.decimals.clear(),
            |f| f.supply = "  ".into(),
        ];
        for clear in blank {
            let mut form = filled_form();
            clear(&mut form);
            let err = TokenDescriptor::try_from(&form).unwrap_err();
            assert_eq!(err.to_string(), "Please fill in all required fields");
        }
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        for (decimals, supply) in [("10", "1"), ("-1", "1"), ("x", "1"), ("9", "0"), ("9", "-5"), ("9", "1.5")] {
            let mut form = filled_form();
            form.decimals = decimals.into();
            form.supply = supply.into();
            assert!(
                matches!(TokenDescriptor::try_from(&form), Err(BatuaError::Validation(_))),
                "decimals={decimals} supply={supply}"
            );
        }
    }

    #[test]
    fn overlong_name_is_rejected() {
        let mut form = filled_form();
        form.name = "N".repeat(MAX_NAME_LEN);
        assert!(TokenDescriptor::try_from(&form).is_ok());

        form.name.push('N');
        let err = TokenDescriptor::try_from(&form).unwrap_err();
        assert_eq!(err.to_string(), "Name must be at most 32 characters");
    }

    #[test]
    fn unmintable_supply_is_rejected() {
        let mut form = filled_form();
        form.supply = u64::MAX.to_string();
        assert!(TokenDescriptor::try_from(&form).is_err());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut form = filled_form();
        form.logo_url = Some("https://img".into());
        form.reset();
        assert_eq!(form, TokenForm::default());
    }

    #[test]
    fn metadata_record_uses_fixed_keys() {
        let descriptor = TokenDescriptor::try_from(&filled_form()).unwrap();
        let mint = Pubkey::new([0u8; 32]);
        let record = MetadataRecord::new(&mint, &descriptor, None);

        let json = serde_json::to_value(&record).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["description", "image", "mint", "name", "symbol"]);
        assert_eq!(json["image"], "");
        assert_eq!(json["mint"], "11111111111111111111111111111111");
    }

    #[test]
    fn sol_amounts_parse_exactly() {
        assert_eq!(parse_sol_amount("1").unwrap(), 1_000_000_000);
        assert_eq!(parse_sol_amount("0.1").unwrap(), 100_000_000);
        assert_eq!(parse_sol_amount(".5").unwrap(), 500_000_000);
        assert_eq!(parse_sol_amount("2.").unwrap(), 2_000_000_000);
        assert_eq!(parse_sol_amount("0.000000001").unwrap(), 1);
        assert_eq!(parse_sol_amount(" 1.25 ").unwrap(), 1_250_000_000);
    }

    #[test]
    fn bad_sol_amounts_are_rejected() {
        for input in ["", ".", "-1", "1e3", "abc", "0.0000000001", "1.2.3", "99999999999999999999"] {
            assert!(parse_sol_amount(input).is_err(), "input {input:?}");
        }
    }

    #[test]
    fn format_trims_zeros() {
        assert_eq!(format_sol(1_500_000_000), "1.5");
        assert_eq!(format_sol(2_000_000_000), "2");
        assert_eq!(format_sol(1), "0.000000001");
    }
}
