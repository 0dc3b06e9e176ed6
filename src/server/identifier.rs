use std::net::IpAddr;

/// Canonical form of a ban identifier, or `None` when it's neither a player id nor an IP.
///
/// Player ids keep their decimal form. IPv4 addresses become IPv4-mapped IPv6 so
/// that a ban on `1.2.3.4` also matches a server reporting `::ffff:1.2.3.4`.
pub fn format_identifier(identifier: &str) -> Option<String> {
    let identifier = identifier.trim();
    if let Ok(id) = identifier.parse::<u64>() {
        return Some(id.to_string());
    }
    format_ip(identifier)
}

pub fn format_ip(ip: &str) -> Option<String> {
    let ip = ip.trim().parse::<IpAddr>().ok()?;
    let ip = match ip {
        IpAddr::V4(ip) => ip.to_ipv6_mapped(),
        IpAddr::V6(ip) => ip,
    };
    Some(ip.to_string())
}
