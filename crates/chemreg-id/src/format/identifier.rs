use core::fmt::{self, Write as _};

use regex::Regex;

use crate::{
    Domain,
    error::{ConfigError, FormatError},
    format::weighted_digit_checksum,
};

/// Literal written between the checksum digit and the payload.
pub const SEPARATOR: char = '0';

/// The two numeric parts of a well-formed identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParsedIdentifier {
    /// Embedded checksum digit.
    pub checksum: u8,
    /// Sequence integer the identifier was minted from.
    pub payload: u64,
}

/// The identifier layout of one domain: `{prefix}{tag}{checksum}0{payload}`.
///
/// This type holds no store handles; it is all an application needs to mint
/// identifiers for known payloads or to validate identifiers received from
/// outside.
///
/// ```
/// use chemreg_id::{Domain, IdentifierFormat};
///
/// let format = IdentifierFormat::new("DTX", Domain::Compound).unwrap();
/// let id = format.build(2_345_678);
///
/// assert_eq!(id, "DTXCID802345678");
/// assert_eq!(format.extract_payload(&id), Some(2_345_678));
/// assert_eq!(format.extract_checksum(&id), Some(8));
/// assert_eq!(format.extract_payload("FOO8"), None);
/// ```
#[derive(Clone, Debug)]
pub struct IdentifierFormat {
    prefix: String,
    domain: Domain,
    /// Byte length of `prefix + tag`; the checksum digit sits at this offset.
    head_len: usize,
    pattern: Regex,
}

impl IdentifierFormat {
    /// Creates the layout for `prefix` and `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPrefix`] when the prefix is empty or is
    /// not uppercase ASCII letters and digits.
    pub fn new(prefix: impl Into<String>, domain: Domain) -> Result<Self, ConfigError> {
        let prefix = prefix.into();
        if !is_valid_prefix(&prefix) {
            return Err(ConfigError::InvalidPrefix { prefix });
        }

        let source = format!(
            "^{}{}[0-9]{SEPARATOR}[0-9]+$",
            regex::escape(&prefix),
            domain.tag()
        );
        let pattern = Regex::new(&source).map_err(|_| ConfigError::InvalidPrefix {
            prefix: prefix.clone(),
        })?;

        Ok(Self {
            head_len: prefix.len() + domain.tag().len(),
            prefix,
            domain,
            pattern,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Anchored regular expression a well-formed identifier matches.
    ///
    /// Identifier sources backed by a database can push this down into their
    /// query to skip rows the recovery scan would discard anyway.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Formats `payload` as an identifier.
    ///
    /// The caller owns the uniqueness of `payload`.
    pub fn build(&self, payload: u64) -> String {
        let mut out = String::with_capacity(self.head_len + 22);
        // Writing into a `String` cannot fail.
        let _ = write!(
            out,
            "{}{}{}{SEPARATOR}{payload}",
            self.prefix,
            self.domain.tag(),
            weighted_digit_checksum(payload)
        );
        out
    }

    /// Reads the payload following the fixed-length `prefix + tag + digit +
    /// separator` head.
    ///
    /// The head itself is skipped by length, not compared. Returns `None` when
    /// the remainder is empty, contains anything but ASCII digits, or
    /// overflows `u64`.
    pub fn extract_payload(&self, identifier: &str) -> Option<u64> {
        let rest = identifier.get(self.head_len + 2..)?;
        if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        rest.parse().ok()
    }

    /// Reads the checksum digit right after `prefix + tag`.
    pub fn extract_checksum(&self, identifier: &str) -> Option<u8> {
        identifier
            .as_bytes()
            .get(self.head_len)
            .filter(|b| b.is_ascii_digit())
            .map(|b| b - b'0')
    }

    /// Checks that `identifier` has this domain's shape.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::MalformedIdentifier`] on mismatch.
    pub fn validate_format(&self, identifier: &str) -> Result<(), FormatError> {
        if self.pattern.is_match(identifier) {
            Ok(())
        } else {
            Err(malformed(identifier))
        }
    }

    /// Checks the embedded checksum digit against the payload.
    ///
    /// # Errors
    ///
    /// - [`FormatError::InvalidChecksum`] when the digits disagree.
    /// - [`FormatError::MalformedIdentifier`] when either the checksum or the
    ///   payload cannot be read at all.
    pub fn validate_checksum(&self, identifier: &str) -> Result<(), FormatError> {
        let (Some(found), Some(payload)) = (
            self.extract_checksum(identifier),
            self.extract_payload(identifier),
        ) else {
            return Err(malformed(identifier));
        };
        let expected = weighted_digit_checksum(payload);
        if found == expected {
            Ok(())
        } else {
            Err(FormatError::InvalidChecksum {
                identifier: identifier.to_owned(),
                expected,
                found,
            })
        }
    }

    /// Runs both checks and returns the parts.
    ///
    /// # Errors
    ///
    /// See [`Self::validate_format`] and [`Self::validate_checksum`].
    pub fn parse(&self, identifier: &str) -> Result<ParsedIdentifier, FormatError> {
        self.validate_format(identifier)?;
        self.validate_checksum(identifier)?;
        match (
            self.extract_checksum(identifier),
            self.extract_payload(identifier),
        ) {
            (Some(checksum), Some(payload)) => Ok(ParsedIdentifier { checksum, payload }),
            _ => Err(malformed(identifier)),
        }
    }

    /// Payload of `identifier` if it passes both checks, otherwise `None`.
    ///
    /// This is the filter applied by sequence recovery: anything legacy or
    /// corrupt is skipped rather than reported.
    pub fn verified_payload(&self, identifier: &str) -> Option<u64> {
        self.parse(identifier).ok().map(|p| p.payload)
    }
}

impl PartialEq for IdentifierFormat {
    fn eq(&self, other: &Self) -> bool {
        self.prefix == other.prefix && self.domain == other.domain
    }
}

impl Eq for IdentifierFormat {}

impl fmt::Display for IdentifierFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.domain.tag())
    }
}

/// Prefixes are non-empty runs of uppercase ASCII letters and digits.
pub(crate) fn is_valid_prefix(prefix: &str) -> bool {
    !prefix.is_empty()
        && prefix
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

fn malformed(identifier: &str) -> FormatError {
    FormatError::MalformedIdentifier {
        identifier: identifier.to_owned(),
    }
}
