use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::U256;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::constants::WEI_PER_ETHER_DECIMALS;
use crate::error::{FundsError, FundsResult};

pub fn wei_per_ether() -> U256 {
    U256::from(10u64).pow(U256::from(WEI_PER_ETHER_DECIMALS as u64))
}

/// Whole ether amount in wei.
pub fn ether(amount: u64) -> U256 {
    U256::from(amount) * wei_per_ether()
}

/// Parse a decimal ether amount ("0.5", "12", ".25") into wei.
///
/// Only plain unsigned decimals with at most 18 fractional digits are
/// accepted; the conversion itself is alloy's `parse_units`.
pub fn parse_ether(input: &str) -> FundsResult<U256> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FundsError::InvalidInput("Amount is required".to_string()));
    }
    if trimmed.starts_with('-') {
        return Err(FundsError::InvalidInput(format!(
            "Amount must not be negative: {}",
            trimmed
        )));
    }

    let (whole, frac) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !is_digits(whole) || !is_digits(frac) {
        return Err(FundsError::InvalidInput(format!(
            "'{}' is not a valid ether amount",
            trimmed
        )));
    }
    if frac.len() > WEI_PER_ETHER_DECIMALS {
        return Err(FundsError::InvalidInput(format!(
            "'{}' has more than {} decimal places",
            trimmed, WEI_PER_ETHER_DECIMALS
        )));
    }

    // "2." and ".5" in the form parse_units expects
    let whole = if whole.is_empty() { "0" } else { whole };
    let normalized = if frac.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, frac)
    };

    parse_units(&normalized, "ether")
        .map(|parsed| parsed.get_absolute())
        .map_err(|e| FundsError::InvalidInput(format!("'{}' is out of range: {}", trimmed, e)))
}

/// Parse an ether amount that must be strictly positive.
pub fn parse_positive_ether(input: &str) -> FundsResult<U256> {
    let wei = parse_ether(input)?;
    if wei.is_zero() {
        return Err(FundsError::InvalidInput(
            "Please enter an amount greater than zero".to_string(),
        ));
    }
    Ok(wei)
}

/// Render wei as ether without trailing zeros.
pub fn format_ether(wei: U256) -> String {
    let formatted = format_units(wei, "ether").unwrap_or_else(|_| wei.to_string());
    match formatted.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                whole.to_string()
            } else {
                format!("{}.{}", whole, frac)
            }
        }
        None => formatted,
    }
}

/// Accepts unix seconds, `YYYY-MM-DD` (midnight UTC) or RFC 3339.
pub fn parse_timestamp(input: &str) -> FundsResult<u64> {
    let trimmed = input.trim();
    if let Ok(seconds) = trimmed.parse::<u64>() {
        return Ok(seconds);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return non_negative(Utc.from_utc_datetime(&midnight).timestamp(), trimmed);
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return non_negative(parsed.timestamp(), trimmed);
    }
    Err(FundsError::ParseError(format!(
        "'{}' is not a unix timestamp, YYYY-MM-DD date or RFC 3339 time",
        trimmed
    )))
}

fn non_negative(seconds: i64, raw: &str) -> FundsResult<u64> {
    u64::try_from(seconds)
        .map_err(|_| FundsError::ParseError(format!("'{}' is before the unix epoch", raw)))
}

pub fn format_timestamp(seconds: u64) -> String {
    if seconds == 0 {
        return "not set".to_string();
    }
    i64::try_from(seconds)
        .ok()
        .and_then(|s| Utc.timestamp_opt(s, 0).single())
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| seconds.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ether() {
        assert_eq!(parse_ether("1").unwrap(), wei_per_ether());
        assert_eq!(parse_ether("0.000012").unwrap(), U256::from(12_000_000_000_000u64));
        assert_eq!(parse_ether(".5").unwrap(), U256::from(500_000_000_000_000_000u64));
        assert_eq!(parse_ether(" 2. ").unwrap(), ether(2));
        assert_eq!(parse_ether("0.000000000000000001").unwrap(), U256::from(1u64));
        assert_eq!(parse_ether("1000000000.5").unwrap(), ether(1_000_000_000) + ether(1) / U256::from(2));
    }

    #[test]
    fn test_parse_ether_rejects_bad_input() {
        for bad in ["", "-1", "abc", "1.2.3", "1e18", ".", "0.0000000000000000001", "+1"] {
            assert!(
                matches!(parse_ether(bad), Err(FundsError::InvalidInput(_))),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_positive_ether_rejects_zero() {
        assert!(parse_positive_ether("0").is_err());
        assert!(parse_positive_ether("0.0").is_err());
        assert!(parse_positive_ether("0.01").is_ok());
    }

    #[test]
    fn test_format_ether() {
        assert_eq!(format_ether(U256::ZERO), "0");
        assert_eq!(format_ether(wei_per_ether()), "1");
        assert_eq!(format_ether(U256::from(12_000_000_000_000u64)), "0.000012");
        assert_eq!(format_ether(U256::from(1u64)), "0.000000000000000001");
        assert_eq!(format_ether(ether(1500) + U256::from(250_000_000_000_000_000u64)), "1500.25");
        assert_eq!(format_ether(ether(1_000_000_000)), "1000000000");
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("1700000000").unwrap(), 1_700_000_000);
        assert_eq!(parse_timestamp("2024-01-01").unwrap(), 1_704_067_200);
        assert_eq!(parse_timestamp("2024-01-01T00:00:00Z").unwrap(), 1_704_067_200);
        assert!(parse_timestamp("next tuesday").is_err());
        assert!(parse_timestamp("1960-01-01").is_err());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "not set");
        assert_eq!(format_timestamp(1_704_067_200), "2024-01-01");
    }
}
