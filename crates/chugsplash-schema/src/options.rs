//! Validator options: the variable depth cap and the address format.

use regex::Regex;

/// Default cap on `ConfigVariable` nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Accepted format for `contracts.<name>.address`.
#[derive(Debug, Clone, Default)]
pub enum AddressFormat {
    /// `0x` followed by 40 hex digits, either case.
    #[default]
    Evm,
    /// A caller-supplied pattern. Always matched against the whole string.
    Pattern(Regex),
}

impl AddressFormat {
    /// Build a pattern-based format. The pattern is anchored at both ends.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error if `pattern` is not a valid regex.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::Pattern(Regex::new(&format!("^(?:{pattern})$"))?))
    }

    /// Whether `address` is acceptable.
    pub fn matches(&self, address: &str) -> bool {
        match self {
            Self::Evm => {
                address.len() == 42
                    && address.starts_with("0x")
                    && address[2..].chars().all(|c| c.is_ascii_hexdigit())
            }
            Self::Pattern(re) => re.is_match(address),
        }
    }

    /// Human-readable description for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Evm => "0x followed by 40 hex digits".to_string(),
            Self::Pattern(re) => format!("pattern {}", re.as_str()),
        }
    }
}

/// Options controlling a [`Validator`](crate::Validator).
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Deepest allowed variable nesting. A value at exactly this depth is valid.
    pub max_depth: usize,
    /// Format every `address` must match.
    pub address_format: AddressFormat,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            address_format: AddressFormat::Evm,
        }
    }
}

impl ValidationOptions {
    /// Replace the depth cap.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Replace the address format.
    pub fn with_address_format(mut self, address_format: AddressFormat) -> Self {
        self.address_format = address_format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evm_format_accepts_checksummed_and_lowercase() {
        let f = AddressFormat::Evm;
        assert!(f.matches("0x00000000000000000000000000000000000000aa"));
        assert!(f.matches("0xAbCdEf0123456789aBcDeF0123456789AbCdEf01"));
    }

    #[test]
    fn evm_format_rejects_bad_lengths_and_prefixes() {
        let f = AddressFormat::Evm;
        assert!(!f.matches("0x1"));
        assert!(!f.matches("00000000000000000000000000000000000000000aa"));
        assert!(!f.matches("0xZZ000000000000000000000000000000000000aa"));
        assert!(!f.matches(""));
    }

    #[test]
    fn evm_format_rejects_multibyte_input_without_panicking() {
        let f = AddressFormat::Evm;
        assert!(!f.matches("0x\u{00e9}00000000000000000000000000000000000000"));
    }

    #[test]
    fn pattern_format_is_anchored() {
        let f = AddressFormat::pattern("[a-z]+\\.eth").unwrap();
        assert!(f.matches("vitalik.eth"));
        assert!(!f.matches("xx vitalik.eth"));
        assert!(!f.matches("vitalik.eth.com"));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(AddressFormat::pattern("(").is_err());
    }

    #[test]
    fn defaults() {
        let o = ValidationOptions::default();
        assert_eq!(o.max_depth, 64);
        assert!(matches!(o.address_format, AddressFormat::Evm));
        assert_eq!(o.with_max_depth(3).max_depth, 3);
    }
}
