//! Externally assigned registry numbers (`NNNNNNN-NN-R`).
//!
//! These use a different check digit from ChemReg identifiers: digits are
//! weighted by position counted from the **right**. The two algorithms are
//! deliberately separate functions so one cannot silently stand in for the
//! other.

use core::{fmt, str::FromStr};

use crate::{error::FormatError, format::MAX_DIGITS, format::decimal_digits};

/// Check digit of a registry number body.
///
/// `body` is the number formed by the first two groups with the dashes
/// removed. Its digits, read least-significant first, are weighted 1, 2, 3,
/// and so on; the check digit is the weighted sum modulo 10.
///
/// ```
/// use chemreg_id::registry_checksum;
///
/// // water, 7732-18-5: 8*1 + 1*2 + 2*3 + 3*4 + 7*5 + 7*6 = 105
/// assert_eq!(registry_checksum(773_218), 5);
/// ```
#[allow(clippy::cast_possible_truncation)]
pub fn registry_checksum(body: u64) -> u8 {
    let mut buf = [0; MAX_DIGITS];
    let sum = decimal_digits(body, &mut buf)
        .iter()
        .rev()
        .zip(1_u32..)
        .fold(0_u32, |acc, (&d, weight)| acc + weight * u32::from(d));
    (sum % 10) as u8
}

/// A registry number whose check digit has been verified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistryNumber {
    head: u32,
    middle: u8,
    check: u8,
}

impl RegistryNumber {
    /// Leading group, two to seven digits.
    pub const fn head(&self) -> u32 {
        self.head
    }

    /// Middle group, always two digits.
    pub const fn middle(&self) -> u8 {
        self.middle
    }

    pub const fn check_digit(&self) -> u8 {
        self.check
    }

    /// The checksummed body: `head` and `middle` concatenated.
    pub fn body(&self) -> u64 {
        u64::from(self.head) * 100 + u64::from(self.middle)
    }
}

impl fmt::Display for RegistryNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}-{}", self.head, self.middle, self.check)
    }
}

impl FromStr for RegistryNumber {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_registry_number(s)
    }
}

/// Parses `value` as `NNNNNNN-NN-R` and verifies its check digit.
///
/// # Errors
///
/// - [`FormatError::MalformedRegistryNumber`] when the groups are missing,
///   have the wrong length, or contain non-digits.
/// - [`FormatError::InvalidRegistryChecksum`] when the check digit is wrong.
///
/// ```
/// use chemreg_id::{FormatError, validate_registry_number};
///
/// assert_eq!(validate_registry_number("71-43-2").unwrap().to_string(), "71-43-2");
/// assert!(matches!(
///     validate_registry_number("71-43-3"),
///     Err(FormatError::InvalidRegistryChecksum { expected: 2, .. })
/// ));
/// ```
pub fn validate_registry_number(value: &str) -> Result<RegistryNumber, FormatError> {
    let malformed = || FormatError::MalformedRegistryNumber {
        value: value.to_owned(),
    };

    let mut groups = value.split('-');
    let (Some(head), Some(middle), Some(check), None) =
        (groups.next(), groups.next(), groups.next(), groups.next())
    else {
        return Err(malformed());
    };

    let digits = |group: &str, lengths: core::ops::RangeInclusive<usize>| {
        lengths.contains(&group.len()) && group.bytes().all(|b| b.is_ascii_digit())
    };
    if !digits(head, 2..=7) || !digits(middle, 2..=2) || !digits(check, 1..=1) {
        return Err(malformed());
    }

    let number = RegistryNumber {
        head: head.parse().map_err(|_| malformed())?,
        middle: middle.parse().map_err(|_| malformed())?,
        check: check.parse().map_err(|_| malformed())?,
    };

    let expected = registry_checksum(number.body());
    if expected != number.check {
        return Err(FormatError::InvalidRegistryChecksum {
            value: value.to_owned(),
            expected,
            found: number.check,
        });
    }
    Ok(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weighted_digit_checksum;

    #[test]
    fn known_registry_numbers_validate() {
        for rn in ["7732-18-5", "50-00-0", "71-43-2", "64-17-5", "7440-44-0", "1336-21-6"] {
            let parsed = validate_registry_number(rn).unwrap();
            assert_eq!(parsed.to_string(), rn);
        }
    }

    #[test]
    fn parts_are_exposed() {
        let rn: RegistryNumber = "7732-18-5".parse().unwrap();
        assert_eq!(rn.head(), 7732);
        assert_eq!(rn.middle(), 18);
        assert_eq!(rn.check_digit(), 5);
        assert_eq!(rn.body(), 773_218);
    }

    #[test]
    fn wrong_check_digit_is_reported() {
        assert_eq!(
            validate_registry_number("7732-18-4"),
            Err(FormatError::InvalidRegistryChecksum {
                value: "7732-18-4".to_owned(),
                expected: 5,
                found: 4,
            })
        );
    }

    #[test]
    fn malformed_shapes_are_rejected() {
        for bad in [
            "",
            "7732185",
            "7732-18",
            "7732-18-5-1",
            "7-18-5",
            "12345678-18-5",
            "7732-1-5",
            "7732-180-5",
            "7732-18-55",
            "77a2-18-5",
            "+732-18-5",
            " 7732-18-5",
        ] {
            assert_eq!(
                validate_registry_number(bad),
                Err(FormatError::MalformedRegistryNumber {
                    value: bad.to_owned()
                }),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn differs_from_identifier_checksum() {
        // 1*1 + 2*2 = 5 left to right; 2*1 + 1*2 = 4 right to left
        assert_eq!(weighted_digit_checksum(12), 5);
        assert_eq!(registry_checksum(12), 4);
    }
}
