//! Token metadata

use serde::{Deserialize, Serialize};

/// Display metadata for the confidential token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self {
            name: "ConfidentialZama".to_string(),
            symbol: "cZama".to_string(),
            decimals: 6,
        }
    }
}

impl TokenMetadata {
    /// Render base units with the token's decimals, e.g. `1250000` -> `1.25`
    pub fn format_units(&self, amount: u64) -> String {
        if self.decimals == 0 {
            return amount.to_string();
        }
        let (whole, frac) = match 10u128.checked_pow(u32::from(self.decimals)) {
            Some(scale) => (amount as u128 / scale, amount as u128 % scale),
            // Every u64 is below 10^39
            None => (0, amount as u128),
        };
        if frac == 0 {
            return whole.to_string();
        }
        let frac = format!("{:0width$}", frac, width = self.decimals as usize);
        format!("{}.{}", whole, frac.trim_end_matches('0'))
    }
}
