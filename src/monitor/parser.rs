//! Line-level classification of ping output
//!
//! Handles the reply formats of Windows (`time=42ms`, `time<1ms`) and
//! Linux/macOS (`time=42.123 ms`), plus the timeout phrasing of each.

use regex::Regex;
use std::sync::OnceLock;

/// Classification of a single line of ping output
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedLine {
    Reply(f64),
    Timeout,
}

/// Substrings (already lowercase) that mark a timeout line on their own
const TIMEOUT_PHRASES: [&str; 3] = ["request timed out", "request timeout", "no answer yet"];

fn latency_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)time[=<]([\d.]+)\s*ms").expect("valid latency pattern"))
}

/// Classify one line of ping output.
///
/// A latency marker takes precedence over any timeout phrase on the same line.
/// Banner and statistics lines yield `None`.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    if let Some(latency) = parse_latency(line) {
        return Some(ParsedLine::Reply(latency));
    }
    if is_timeout_line(line) {
        return Some(ParsedLine::Timeout);
    }
    None
}

/// Extract the latency in milliseconds from a reply line.
///
/// `time<1ms` yields 1.0: the bound is reported as its literal value.
pub fn parse_latency(line: &str) -> Option<f64> {
    latency_pattern()
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| m.as_str().parse::<f64>().ok())
}

pub fn is_timeout_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    TIMEOUT_PHRASES.iter().any(|phrase| lower.contains(phrase))
        || (lower.contains("icmp_seq") && lower.contains("timeout"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_reply() {
        let line = "Reply from 142.250.79.35: bytes=32 time=42ms TTL=117";
        assert_eq!(parse_line(line), Some(ParsedLine::Reply(42.0)));
    }

    #[test]
    fn test_windows_sub_millisecond_reply() {
        let line = "Reply from 192.168.0.1: bytes=32 time<1ms TTL=64";
        assert_eq!(parse_line(line), Some(ParsedLine::Reply(1.0)));
    }

    #[test]
    fn test_unix_reply() {
        let line = "64 bytes from 1.1.1.1: icmp_seq=1 ttl=57 time=42.123 ms";
        assert_eq!(parse_line(line), Some(ParsedLine::Reply(42.123)));
    }

    #[test]
    fn test_reply_is_case_insensitive() {
        assert_eq!(parse_line("TIME=7 MS"), Some(ParsedLine::Reply(7.0)));
    }

    #[test]
    fn test_timeout_variants() {
        let lines = [
            "Request timed out.",
            "Request timeout for icmp_seq 4",
            "no answer yet for icmp_seq=12",
            "From 10.0.0.1 icmp_seq=3 Timeout",
        ];
        for line in lines {
            assert_eq!(parse_line(line), Some(ParsedLine::Timeout), "{}", line);
        }
    }

    #[test]
    fn test_icmp_seq_alone_is_not_timeout() {
        assert_eq!(parse_line("From 10.0.0.1 icmp_seq=3 Destination Host Unreachable"), None);
    }

    #[test]
    fn test_reply_takes_precedence_over_timeout() {
        let line = "icmp_seq=9 timeout recovered time=12.5 ms";
        assert_eq!(parse_line(line), Some(ParsedLine::Reply(12.5)));
    }

    #[test]
    fn test_banner_lines_ignored() {
        let lines = [
            "PING 1.1.1.1 (1.1.1.1) 56(84) bytes of data.",
            "--- 1.1.1.1 ping statistics ---",
            "Pinging www.google.com.br [142.250.79.35] with 32 bytes of data:",
            "",
            "time is relative",
        ];
        for line in lines {
            assert_eq!(parse_line(line), None, "{}", line);
        }
    }

    #[test]
    fn test_unparseable_number_is_not_a_reply() {
        assert_eq!(parse_latency("time=1.2.3ms"), None);
        assert_eq!(parse_latency("time=.ms"), None);
    }

    #[test]
    fn test_statistics_summary_is_not_a_reply() {
        let line = "rtt min/avg/max/mdev = 10.1/12.2/15.3/1.1 ms";
        assert_eq!(parse_line(line), None);
    }
}
