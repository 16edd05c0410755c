use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;

use crate::error::ScanError;

/// Expand a host spec into the concrete list of target addresses.
///
/// Accepts a single IPv4 address or a CIDR block; a trailing `/32` is stripped
/// first. Blocks larger than two hosts exclude their network and broadcast
/// addresses; /31 and /32 yield all of their addresses.
pub fn expand_hosts(spec: &str) -> Result<Vec<Ipv4Addr>, ScanError> {
    let trimmed = spec.trim();
    let bare = trimmed.strip_suffix("/32").unwrap_or(trimmed);

    let network: Ipv4Network = bare.parse().map_err(|_| {
        ScanError::InvalidFormat(format!("invalid ip address or cidr block: {spec:?}"))
    })?;

    // ipnetwork tolerates host bits below the prefix; a network spec must not
    // carry them.
    if network.prefix() < 32 && network.ip() != network.network() {
        return Err(ScanError::InvalidFormat(format!(
            "host bits set in cidr block: {spec:?}"
        )));
    }

    let hosts: Vec<Ipv4Addr> = match network.prefix() {
        31 | 32 => network.iter().collect(),
        _ => {
            let (network_addr, broadcast) = (network.network(), network.broadcast());
            network
                .iter()
                .filter(|addr| *addr != network_addr && *addr != broadcast)
                .collect()
        }
    };

    log::debug!(
        "[hosts] expanded: spec={} prefix={} hosts={}",
        trimmed,
        network.prefix(),
        hosts.len()
    );
    Ok(hosts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_address() {
        let hosts = expand_hosts("10.0.0.5").unwrap();
        assert_eq!(hosts, vec![Ipv4Addr::new(10, 0, 0, 5)]);
    }

    #[test]
    fn test_slash_32_is_stripped() {
        let hosts = expand_hosts("10.0.0.5/32").unwrap();
        assert_eq!(hosts, vec![Ipv4Addr::new(10, 0, 0, 5)]);
    }

    #[test]
    fn test_slash_31_keeps_both_addresses() {
        let hosts = expand_hosts("10.0.0.0/31").unwrap();
        assert_eq!(
            hosts,
            vec![Ipv4Addr::new(10, 0, 0, 0), Ipv4Addr::new(10, 0, 0, 1)]
        );
    }

    #[test]
    fn test_slash_30_excludes_network_and_broadcast() {
        let hosts = expand_hosts("192.168.1.0/30").unwrap();
        assert_eq!(
            hosts,
            vec![Ipv4Addr::new(192, 168, 1, 1), Ipv4Addr::new(192, 168, 1, 2)]
        );
    }

    #[test]
    fn test_slash_24_has_254_usable_hosts() {
        let hosts = expand_hosts("192.168.1.0/24").unwrap();
        assert_eq!(hosts.len(), 254);
        assert_eq!(hosts.first(), Some(&Ipv4Addr::new(192, 168, 1, 1)));
        assert_eq!(hosts.last(), Some(&Ipv4Addr::new(192, 168, 1, 254)));
    }

    #[test]
    fn test_invalid_specs() {
        for spec in ["999.1.1.1", "abc", "10.0.0.1/33", "10.0.0.1/-1", ""] {
            assert!(
                matches!(expand_hosts(spec), Err(ScanError::InvalidFormat(_))),
                "expected format error for {spec:?}"
            );
        }
    }

    #[test]
    fn test_host_bits_below_prefix_rejected() {
        assert!(matches!(
            expand_hosts("10.0.0.5/24"),
            Err(ScanError::InvalidFormat(_))
        ));
    }
}
