//! Extracts `IP:PORT` candidates from free-form proxy list text

use crate::proxy::models::{Candidate, ProxyType};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Regex pattern to match IP:PORT patterns in text
static IP_PORT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+\.\d+\.\d+\.\d+):(\d+)")
        .expect("Invalid IP:PORT regex")
});

/// Parser for proxy list bodies
pub struct ProxyParser;

impl ProxyParser {
    /// Parse a single line, returning the first valid `IP:PORT` found in it.
    ///
    /// Lists come as plain text, CSV or HTML, so the match is not anchored:
    /// `"1.2.3.4:8080 foo"` yields a candidate while `"bad-line"` does not.
    /// The host is kept as written; a bogus address simply fails the connect.
    /// Ports outside 1..=65535 are skipped.
    pub fn parse_line(line: &str, protocol: ProxyType) -> Option<Candidate> {
        IP_PORT_REGEX.captures_iter(line).find_map(|caps| {
            let host = caps.get(1)?.as_str();
            let port: u16 = caps.get(2)?.as_str().parse().ok()?;
            if port == 0 {
                return None;
            }
            Some(Candidate::new(host, port, protocol))
        })
    }

    /// Parse every line of a list body into a deduplicated set
    pub fn parse_string(content: &str, protocol: ProxyType) -> BTreeSet<Candidate> {
        content
            .lines()
            .filter_map(|line| Self::parse_line(line, protocol))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_format() {
        let candidate = ProxyParser::parse_line("192.168.1.1:8080", ProxyType::Http).unwrap();
        assert_eq!(candidate.host, "192.168.1.1");
        assert_eq!(candidate.port, 8080);
        assert_eq!(candidate.protocol, ProxyType::Http);
    }

    #[test]
    fn test_parse_embedded_in_text() {
        let candidate = ProxyParser::parse_line("1.2.3.4:8080 foo", ProxyType::Socks5).unwrap();
        assert_eq!(candidate, Candidate::new("1.2.3.4", 8080, ProxyType::Socks5));

        let candidate =
            ProxyParser::parse_line("<td>proxy</td><td>10.0.0.1:3128</td>", ProxyType::Http)
                .unwrap();
        assert_eq!(candidate, Candidate::new("10.0.0.1", 3128, ProxyType::Http));
    }

    #[test]
    fn test_parse_takes_first_match() {
        let candidate =
            ProxyParser::parse_line("10.0.0.1:80 10.0.0.2:81", ProxyType::Http).unwrap();
        assert_eq!((candidate.host.as_str(), candidate.port), ("10.0.0.1", 80));
    }

    #[test]
    fn test_parse_invalid_format() {
        assert!(ProxyParser::parse_line("bad-line", ProxyType::Http).is_none());
        assert!(ProxyParser::parse_line("", ProxyType::Http).is_none());
        assert!(ProxyParser::parse_line("192.168.1.1", ProxyType::Http).is_none());
        assert!(ProxyParser::parse_line("192.168.1.1:abc", ProxyType::Http).is_none());
    }

    #[test]
    fn test_parse_invalid_port() {
        assert!(ProxyParser::parse_line("192.168.1.1:0", ProxyType::Http).is_none());
        assert!(ProxyParser::parse_line("192.168.1.1:70000", ProxyType::Http).is_none());
    }

    #[test]
    fn test_parse_unanchored_matches() {
        let candidate = ProxyParser::parse_line("abc1.2.3.4:80", ProxyType::Http).unwrap();
        assert_eq!(candidate, Candidate::new("1.2.3.4", 80, ProxyType::Http));

        let candidate = ProxyParser::parse_line("1.2.3.4:8080abc", ProxyType::Http).unwrap();
        assert_eq!(candidate, Candidate::new("1.2.3.4", 8080, ProxyType::Http));

        let candidate = ProxyParser::parse_line("010.0.0.1:80", ProxyType::Http).unwrap();
        assert_eq!(candidate.host, "010.0.0.1");
    }

    #[test]
    fn test_parse_skips_bad_port_and_keeps_looking() {
        let candidate =
            ProxyParser::parse_line("10.0.0.1:99999 10.0.0.2:3128", ProxyType::Http).unwrap();
        assert_eq!(candidate, Candidate::new("10.0.0.2", 3128, ProxyType::Http));
    }

    #[test]
    fn test_parse_string_deduplicates() {
        let content = r#"
192.168.1.1:8080
192.168.1.1:8080
# comment
192.168.1.2:3128 elite
bad-line
"#;
        let candidates = ProxyParser::parse_string(content, ProxyType::Http);
        assert_eq!(candidates.len(), 2);
    }
}
