use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ScanError;

/// Commonly scanned ports, used whenever the caller supplies no port spec.
///
/// Ranges here are half-open (see `parse_ports`), so e.g. `20-23` selects
/// 20, 21 and 22.
pub const DEFAULT_PORT_SPEC: &str = "9,20-23,25,37,41,42,53,67-70,79-82,88,101,102,107,109-111,\
    113,115,117-119,123,135,137-139,143,152,153,156,158,161,162,170,179,\
    194,201,209,213,218,220,259,264,311,318,323,383,366,369,371,384,387,\
    389,401,411,427,443-445,464,465,500,512,512,513,513-515,517,518,520,\
    513,524,525,530,531,532,533,540,542,543,544,546,547,548,550,554,556,\
    560,561,563,587,591,593,604,631,636,639,646,647,648,652,654,665,666,\
    674,691,692,695,698,699,700,701,702,706,711,712,720,749,750,782,829,\
    860,873,901,902,911,981,989,990,991,992,993,995,8080,2222,4444,1234,\
    12345,54321,2020,2121,2525,65535,666,1337,31337,8181,6969";

static SPEC_CHARSET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9\-,\s]+$").unwrap());

/// Parse a port spec into a deduplicated set of ports.
///
/// Grammar: comma-separated tokens, each a single port or a hyphenated range
/// `a-b`; whitespace around tokens is ignored and empty tokens are skipped.
/// Range bounds normalize to `min..max` and the upper bound is excluded, so
/// `8080-8082` selects 8080 and 8081.
pub fn parse_ports(spec: &str) -> Result<BTreeSet<u16>, ScanError> {
    if !SPEC_CHARSET.is_match(spec) {
        log::debug!("[ports] parse_rejected: spec={:?}", spec);
        return Err(ScanError::InvalidFormat(format!(
            "invalid port string: {spec:?}"
        )));
    }

    let mut ports = BTreeSet::new();

    for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if token.contains('-') {
            let bounds: Vec<i64> = token
                .split('-')
                .map(parse_bound)
                .collect::<Result<_, _>>()?;

            // A reversed range is accepted and normalized.
            let start = bounds[0].min(bounds[bounds.len() - 1]);
            let end = bounds[0].max(bounds[bounds.len() - 1]);

            for value in start..end {
                ports.insert(checked(value)?);
            }
        } else {
            ports.insert(checked(parse_bound(token)?)?);
        }
    }

    log::debug!("[ports] parsed: spec_len={} ports={}", spec.len(), ports.len());
    Ok(ports)
}

fn parse_bound(token: &str) -> Result<i64, ScanError> {
    token
        .parse::<i64>()
        .map_err(|_| ScanError::InvalidFormat(format!("invalid port token: {token:?}")))
}

fn checked(value: i64) -> Result<u16, ScanError> {
    if (0..=65535).contains(&value) {
        Ok(value as u16)
    } else {
        Err(ScanError::InvalidValue(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_ports() {
        let ports = parse_ports("80,443").unwrap();
        assert_eq!(ports.into_iter().collect::<Vec<_>>(), vec![80, 443]);
    }

    #[test]
    fn test_range_excludes_upper_bound() {
        let ports = parse_ports("80,443,8080-8082").unwrap();
        assert_eq!(
            ports.into_iter().collect::<Vec<_>>(),
            vec![80, 443, 8080, 8081]
        );
    }

    #[test]
    fn test_reversed_range_normalizes() {
        assert_eq!(
            parse_ports("8082-8080").unwrap(),
            parse_ports("8080-8082").unwrap()
        );
    }

    #[test]
    fn test_whitespace_and_empty_tokens_ignored() {
        let ports = parse_ports(" 80 , 443 ,, 22 ").unwrap();
        assert_eq!(ports.into_iter().collect::<Vec<_>>(), vec![22, 80, 443]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let ports = parse_ports("512,512,513,510-514").unwrap();
        assert_eq!(
            ports.into_iter().collect::<Vec<_>>(),
            vec![510, 511, 512, 513]
        );
    }

    #[test]
    fn test_port_zero_is_valid() {
        assert!(parse_ports("0").unwrap().contains(&0));
    }

    #[test]
    fn test_invalid_characters() {
        assert!(matches!(
            parse_ports("abc"),
            Err(ScanError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_ports("80;443"),
            Err(ScanError::InvalidFormat(_))
        ));
        assert!(matches!(parse_ports(""), Err(ScanError::InvalidFormat(_))));
    }

    #[test]
    fn test_out_of_range_value() {
        assert!(matches!(
            parse_ports("70000"),
            Err(ScanError::InvalidValue(70000))
        ));
        assert!(matches!(
            parse_ports("22,65536-65540"),
            Err(ScanError::InvalidValue(65536))
        ));
    }

    #[test]
    fn test_leading_hyphen_is_a_format_error() {
        // "-5" splits into an empty lower bound, which is not a number.
        assert!(matches!(parse_ports("-5"), Err(ScanError::InvalidFormat(_))));
    }

    #[test]
    fn test_default_spec_parses() {
        let ports = parse_ports(DEFAULT_PORT_SPEC).unwrap();
        assert!(ports.len() > 100);
        for port in [9, 22, 80, 443, 8080, 1337, 31337, 65535] {
            assert!(ports.contains(&port), "expected default port {port}");
        }
        // Half-open ranges: 20-23 covers 20..23, so 23 is absent.
        assert!(ports.contains(&22));
        assert!(!ports.contains(&23));
        assert!(!ports.contains(&70));
    }
}
