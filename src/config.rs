use anyhow::{bail, Context, Result};
use regex::Regex;
use std::io::BufRead;
use std::net::IpAddr;
use std::time::Duration;

use crate::resolver::Resolver;

const IPV4_WITH_OPTIONAL_PORT: &str =
    r"^(([0-9]|[1-9][0-9]|1[0-9]{2}|2[0-4][0-9]|25[0-5])\.){3}([0-9]|[1-9][0-9]|1[0-9]{2}|2[0-4][0-9]|25[0-5])(:[0-9]+)?$";

// The 255-character bound is enforced separately; the regex crate has no
// lookahead.
const HOSTNAME: &str =
    r"^[0-9A-Za-z](?:[0-9A-Za-z-]{0,61}[0-9A-Za-z])?(?:\.[0-9A-Za-z](?:[0-9A-Za-z-]{0,61}[0-9A-Za-z])?)*\.?$";

/// Validated startup inputs: the resolved target and the probe period. The
/// monitor core consumes these as-is and performs no validation of its own.
pub struct StartupConfig {
    pub target: IpAddr,
    pub period: Duration,
}

/// Returns the resolvable portion of a host entry: the address with any
/// `:port` suffix stripped for an IPv4 form (ICMP has no port), the entry
/// unchanged for a hostname, or `None` when it is neither.
pub fn validate_host(entry: &str) -> Option<String> {
    let ipv4 = Regex::new(IPV4_WITH_OPTIONAL_PORT).expect("valid pattern");
    if ipv4.is_match(entry) {
        let address = entry.split(':').next().unwrap_or(entry);
        return Some(address.to_string());
    }
    let hostname = Regex::new(HOSTNAME).expect("valid pattern");
    if entry.len() <= 255 && hostname.is_match(entry) {
        return Some(entry.to_string());
    }
    None
}

/// Prompts on the console until the operator supplies a resolvable host and
/// a positive probe period in seconds. Resolution failures are printed and
/// the host prompt repeats; there is no automatic retry.
pub async fn from_console(resolver: &Resolver) -> Result<StartupConfig> {
    let stdin = std::io::stdin();

    let target = loop {
        println!("host:");
        let entry = read_trimmed_line(&mut stdin.lock())?;
        let Some(host) = validate_host(&entry) else {
            continue;
        };
        match resolver.resolve(&host).await {
            Ok(address) => break address,
            Err(e) => println!("{}", e),
        }
    };

    let period = loop {
        println!("probe period in seconds:");
        let entry = read_trimmed_line(&mut stdin.lock())?;
        match entry.parse::<u64>() {
            Ok(seconds) if seconds > 0 => break Duration::from_secs(seconds),
            _ => continue,
        }
    };

    Ok(StartupConfig { target, period })
}

fn read_trimmed_line(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    let bytes = input
        .read_line(&mut line)
        .context("Failed to read console input")?;
    if bytes == 0 {
        bail!("Console input closed before configuration completed");
    }
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_ipv4() {
        assert_eq!(validate_host("192.168.0.1").as_deref(), Some("192.168.0.1"));
    }

    #[test]
    fn strips_port_from_ipv4() {
        assert_eq!(validate_host("10.0.0.1:8080").as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn out_of_range_octets_fall_through_to_hostname_syntax() {
        // Not IPv4, so no port stripping; resolution rejects them later.
        assert_eq!(validate_host("256.1.1.1").as_deref(), Some("256.1.1.1"));
        assert!(validate_host("256.1.1.1:80").is_none());
    }

    #[test]
    fn accepts_hostnames() {
        assert_eq!(validate_host("example.com").as_deref(), Some("example.com"));
        assert_eq!(validate_host("localhost").as_deref(), Some("localhost"));
        assert_eq!(
            validate_host("a-b.example.org.").as_deref(),
            Some("a-b.example.org.")
        );
    }

    #[test]
    fn rejects_malformed_hostnames() {
        assert!(validate_host("-leading-dash.com").is_none());
        assert!(validate_host("trailing-.com").is_none());
        assert!(validate_host("spaces are bad").is_none());
        assert!(validate_host("").is_none());
    }

    #[test]
    fn rejects_overlong_hostnames() {
        let label = "a".repeat(63);
        let long = [label.as_str(); 5].join(".");
        assert!(long.len() > 255);
        assert!(validate_host(&long).is_none());
    }

    #[test]
    fn label_length_is_bounded() {
        assert!(validate_host(&"a".repeat(63)).is_some());
        assert!(validate_host(&"a".repeat(64)).is_none());
    }

    #[test]
    fn read_trimmed_line_strips_whitespace() {
        let mut input = "  example.com \n".as_bytes();
        assert_eq!(read_trimmed_line(&mut input).unwrap(), "example.com");
    }

    #[test]
    fn read_trimmed_line_fails_on_eof() {
        let mut input = "".as_bytes();
        assert!(read_trimmed_line(&mut input).is_err());
    }
}
