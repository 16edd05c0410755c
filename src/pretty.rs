use crate::types::OpenEndpoint;

const IP_COLUMN_WIDTH: usize = 18;
const PORT_COLUMN_WIDTH: usize = 6;

/// Print open endpoints as a two-column table. Endpoints arrive sorted, so
/// each address is printed on its first row only and its remaining ports line
/// up underneath.
pub fn print_endpoints(endpoints: &[OpenEndpoint]) {
    if endpoints.is_empty() {
        println!("No open ports found");
        return;
    }

    println!();
    println!("Open Ports");
    println!("{:-<width$}", "", width = IP_COLUMN_WIDTH + PORT_COLUMN_WIDTH);
    println!("{:<width$}{}", "IP", "Ports", width = IP_COLUMN_WIDTH);

    for (ip, port) in rows(endpoints) {
        println!("{:<width$}{}", ip, port, width = IP_COLUMN_WIDTH);
    }
}

/// Table rows with the address blanked after its first occurrence.
fn rows(endpoints: &[OpenEndpoint]) -> Vec<(String, u16)> {
    let mut last_addr = None;
    endpoints
        .iter()
        .map(|endpoint| {
            let ip = if last_addr == Some(endpoint.addr) {
                String::new()
            } else {
                endpoint.addr.to_string()
            };
            last_addr = Some(endpoint.addr);
            (ip, endpoint.port)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_rows_blank_repeated_addresses() {
        let endpoints = vec![
            OpenEndpoint { addr: Ipv4Addr::new(10, 0, 0, 1), port: 80 },
            OpenEndpoint { addr: Ipv4Addr::new(10, 0, 0, 1), port: 443 },
            OpenEndpoint { addr: Ipv4Addr::new(10, 0, 0, 2), port: 22 },
        ];

        assert_eq!(
            rows(&endpoints),
            vec![
                ("10.0.0.1".to_string(), 80),
                (String::new(), 443),
                ("10.0.0.2".to_string(), 22),
            ]
        );
    }
}
