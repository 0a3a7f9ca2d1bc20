use alloy::primitives::{Address, U256};
use colored::*;

use crate::units::format_ether;

pub fn format_eth(wei: U256) -> String {
    format!("{} ETH", format_ether(wei))
}

/// `0x1234…abcd` form for narrow columns.
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}

pub fn format_contractor_address(address: &Address) -> ColoredString {
    if address.is_zero() {
        "Unassigned".dimmed()
    } else {
        address.to_checksum(None).green()
    }
}

pub fn format_flag(value: bool) -> ColoredString {
    if value {
        "Yes".green()
    } else {
        "No".normal()
    }
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// First non-empty line of a free-text description.
pub fn first_line(desc: &str) -> &str {
    desc.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}
