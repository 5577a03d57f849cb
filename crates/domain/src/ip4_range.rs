use crate::DomainError;
use ipnetwork::Ipv4Network;
use smallvec::SmallVec;
use std::net::Ipv4Addr;

/// Inclusive IPv4 interval as host-order integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ip4Range {
    pub lower: u32,
    pub upper: u32,
}

impl Ip4Range {
    #[inline]
    pub fn host_count(&self) -> u64 {
        u64::from(self.upper) - u64::from(self.lower) + 1
    }

    #[inline]
    pub fn contains(&self, addr: u32) -> bool {
        self.lower <= addr && addr <= self.upper
    }
}

fn octets(part: &str) -> Result<SmallVec<[u8; 4]>, DomainError> {
    let mut out: SmallVec<[u8; 4]> = SmallVec::new();
    for piece in part.split('.').filter(|p| !p.is_empty()) {
        if out.len() == 4 {
            return Err(DomainError::InvalidAddress(part.to_string()));
        }
        let octet = piece
            .parse::<u8>()
            .map_err(|_| DomainError::InvalidAddress(part.to_string()))?;
        out.push(octet);
    }
    if out.is_empty() {
        return Err(DomainError::InvalidAddress(part.to_string()));
    }
    Ok(out)
}

/// Completes a partial address (`127`, `127.0.0`, `192.168.10.`), filling the
/// missing octets with 0 or, when `fill_upper` is set, with 255.
pub fn pad_partial(part: &str, fill_upper: bool) -> Result<Ipv4Addr, DomainError> {
    let mut quads = octets(part)?;
    let fill = if fill_upper { 255 } else { 0 };
    while quads.len() < 4 {
        quads.push(fill);
    }
    Ok(Ipv4Addr::new(quads[0], quads[1], quads[2], quads[3]))
}

fn parse_prefix_len(mask: &str, spec: &str) -> Result<u8, DomainError> {
    match mask.parse::<u8>() {
        Ok(len) if len <= 32 => Ok(len),
        _ => Err(DomainError::InvalidRange(spec.to_string())),
    }
}

fn cidr_network(ip_part: &str, mask: &str, spec: &str) -> Result<Ipv4Network, DomainError> {
    let addr = pad_partial(ip_part, false)?;
    let len = parse_prefix_len(mask, spec)?;
    let net = Ipv4Network::new(addr, len).map_err(|_| DomainError::InvalidRange(spec.to_string()))?;
    // normalise host bits away
    Ipv4Network::new(net.network(), len).map_err(|_| DomainError::InvalidRange(spec.to_string()))
}

/// Converts any supported range notation into an inclusive interval.
///
/// Accepted forms: CIDR (`10.0.0.0/8`, `127.16/12`), partial prefix
/// (`127.0.0`), dash range (`127.0.0.0-127.0.0.255`, `127.16-31`) and exact
/// addresses. In a dash range whose second bound is a single octet, that
/// octet replaces the last octet given in the first bound.
pub fn parse_ip4_range(spec: &str) -> Result<Ip4Range, DomainError> {
    let spec = spec.trim();
    if spec.contains('/') && spec.contains('-') {
        return Err(DomainError::InvalidRange(spec.to_string()));
    }

    if let Some((ip_part, mask)) = spec.split_once('/') {
        let net = cidr_network(ip_part, mask, spec)?;
        return Ok(Ip4Range {
            lower: u32::from(net.network()),
            upper: u32::from(net.broadcast()),
        });
    }

    if let Some((lpart, upart)) = spec.split_once('-') {
        let lower = pad_partial(lpart, false)?;
        let upper = if upart.contains('.') {
            pad_partial(upart, true)?
        } else {
            let mut borrowed: SmallVec<[&str; 4]> =
                lpart.split('.').filter(|p| !p.is_empty()).collect();
            match borrowed.last_mut() {
                Some(last) => *last = upart,
                None => return Err(DomainError::InvalidRange(spec.to_string())),
            }
            pad_partial(&borrowed.join("."), true)?
        };

        let range = Ip4Range {
            lower: u32::from(lower),
            upper: u32::from(upper),
        };
        if range.lower > range.upper {
            return Err(DomainError::InvalidRange(spec.to_string()));
        }
        return Ok(range);
    }

    Ok(Ip4Range {
        lower: u32::from(pad_partial(spec, false)?),
        upper: u32::from(pad_partial(spec, true)?),
    })
}

/// Parses a key for the prefix trie into (network, prefix length).
///
/// Dash ranges are rejected: a trie node can only describe a CIDR block.
/// A bare partial prefix like `127.0.0` gets a length of 8 bits per octet given.
pub fn parse_ip4_prefix(spec: &str) -> Result<(u32, u8), DomainError> {
    let spec = spec.trim();
    if spec.contains('-') {
        return Err(DomainError::InvalidRange(spec.to_string()));
    }

    if let Some((ip_part, mask)) = spec.split_once('/') {
        let net = cidr_network(ip_part, mask, spec)?;
        return Ok((u32::from(net.network()), net.prefix()));
    }

    let given = octets(spec)?.len() as u8;
    let addr = pad_partial(spec, false)?;
    Ok((u32::from(addr), given * 8))
}

/// Turns a reversed-IP query label (`4.3.2.1`) back into the address `1.2.3.4`.
pub fn unreverse_ipv4(label: &str) -> Option<Ipv4Addr> {
    let parts: SmallVec<[&str; 4]> = label.split('.').collect();
    if parts.len() != 4 {
        return None;
    }
    let mut quads = [0u8; 4];
    for (slot, part) in quads.iter_mut().zip(parts.iter().rev()) {
        *slot = part.parse().ok()?;
    }
    Some(Ipv4Addr::from(quads))
}

/// Builds the reversed-IP label a DNSBL client would query for `addr`.
pub fn reverse_ipv4(addr: Ipv4Addr) -> String {
    let [a, b, c, d] = addr.octets();
    format!("{d}.{c}.{b}.{a}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> u32 {
        u32::from(s.parse::<Ipv4Addr>().unwrap())
    }

    fn range(spec: &str) -> (u32, u32) {
        let r = parse_ip4_range(spec).unwrap();
        (r.lower, r.upper)
    }

    #[test]
    fn test_all_forms_of_127_0_0_0_slash_24() {
        let expected = (ip("127.0.0.0"), ip("127.0.0.255"));
        assert_eq!(range("127.0.0.0/24"), expected);
        assert_eq!(range("127.0.0"), expected);
        assert_eq!(range("127/24"), expected);
        assert_eq!(range("127-127.0.0"), expected);
        assert_eq!(range("127.0.0.0-127.0.0.255"), expected);
    }

    #[test]
    fn test_all_forms_of_127_16_slash_12() {
        let expected = (ip("127.16.0.0"), ip("127.31.255.255"));
        assert_eq!(range("127.16.0.0-127.31.255.255"), expected);
        assert_eq!(range("127.16.0-127.31.255"), expected);
        assert_eq!(range("127.16-127.31"), expected);
        assert_eq!(range("127.16-31"), expected);
        assert_eq!(range("127.16.0.0/12"), expected);
        assert_eq!(range("127.16.0/12"), expected);
        assert_eq!(range("127.16/12"), expected);
    }

    #[test]
    fn test_single_octet_suffix_replaces_last_given_octet() {
        assert_eq!(range("127.0.0.1-255"), (ip("127.0.0.1"), ip("127.0.0.255")));
        assert_eq!(range("127.16.0-31"), (ip("127.16.0.0"), ip("127.16.31.255")));
    }

    #[test]
    fn test_exact_address_and_trailing_dot() {
        assert_eq!(range("1.2.3.4"), (ip("1.2.3.4"), ip("1.2.3.4")));
        assert_eq!(range("192.168.10."), (ip("192.168.10.0"), ip("192.168.10.255")));
    }

    #[test]
    fn test_cidr_host_bits_are_masked() {
        assert_eq!(range("10.1.2.3/8"), (ip("10.0.0.0"), ip("10.255.255.255")));
        assert_eq!(parse_ip4_range("0.0.0.0/0").unwrap().host_count(), 1 << 32);
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(parse_ip4_range("1.2.3.4/33").is_err());
        assert!(parse_ip4_range("1.2.3.4/8-9").is_err());
        assert!(parse_ip4_range("1.2.3.300").is_err());
        assert!(parse_ip4_range("1.2.3.4.5").is_err());
        assert!(parse_ip4_range("10.0.0.5-10.0.0.1").is_err());
        assert!(parse_ip4_range("spam.example").is_err());
        assert!(parse_ip4_range("").is_err());
    }

    #[test]
    fn test_prefix_keys() {
        assert_eq!(parse_ip4_prefix("10.0.0.0/8").unwrap(), (ip("10.0.0.0"), 8));
        assert_eq!(parse_ip4_prefix("127.0.0").unwrap(), (ip("127.0.0.0"), 24));
        assert_eq!(parse_ip4_prefix("1.2.3.4").unwrap(), (ip("1.2.3.4"), 32));
        assert!(parse_ip4_prefix("1.2.3.4-5").is_err());
    }

    #[test]
    fn test_reverse_roundtrip_labels() {
        assert_eq!(unreverse_ipv4("4.0.0.127"), Some("127.0.0.4".parse().unwrap()));
        assert_eq!(reverse_ipv4("127.0.0.4".parse().unwrap()), "4.0.0.127");
        assert_eq!(unreverse_ipv4("0.0.127"), None);
        assert_eq!(unreverse_ipv4("spam.example.com.org"), None);
    }
}
