use alloy_primitives::{Address, TxHash};

/// Balance as shown next to a token: four decimals, with tiny non-zero
/// amounts collapsed to `<0.0001`.
pub fn format_balance(value: &str) -> String {
    let Ok(parsed) = value.parse::<f64>() else {
        return "0.0".to_owned();
    };
    if parsed == 0.0 {
        "0.0".to_owned()
    } else if parsed < 0.0001 {
        "<0.0001".to_owned()
    } else {
        format!("{parsed:.4}")
    }
}

/// `0x1234...abcd` form of a checksummed address.
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// First ten characters of the hash, `0x` included.
pub fn short_hash(hash: &TxHash) -> String {
    hash.to_string().chars().take(10).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};

    #[test]
    fn balances() {
        assert_eq!(format_balance(""), "0.0");
        assert_eq!(format_balance("0.000000"), "0.0");
        assert_eq!(format_balance("0.000000000000000001"), "<0.0001");
        assert_eq!(format_balance("12.340000"), "12.3400");
        assert_eq!(format_balance("2.500000000000000000"), "2.5000");
        assert_eq!(format_balance("0.00015"), "0.0001");
    }

    #[test]
    fn addresses() {
        let addr = address!("0x89B50855Aa3bE2F677cD6303Cec089B5F319D72a");
        assert_eq!(short_address(&addr), "0x89B5...D72a");
    }

    #[test]
    fn hashes() {
        let hash = b256!("0xabcdef0123456789abcdef0123456789abcdef0123456789abcdef0123456789");
        assert_eq!(short_hash(&hash), "0xabcdef01");
    }
}
