/// Longest decimal rendering of a `u64`.
pub(crate) const MAX_DIGITS: usize = 20;

/// Writes the decimal digits of `n` most-significant first into `buf` and
/// returns the filled tail.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn decimal_digits(mut n: u64, buf: &mut [u8; MAX_DIGITS]) -> &[u8] {
    let mut start = MAX_DIGITS;
    loop {
        start -= 1;
        buf[start] = (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    &buf[start..]
}

/// Checksum digit embedded in ChemReg identifiers.
///
/// Each decimal digit of `n`, read most-significant first, is weighted by its
/// 1-based position; the result is the weighted sum modulo 10.
///
/// ```
/// use chemreg_id::weighted_digit_checksum;
///
/// // 1*2 + 2*3 + 3*4 + 4*5 + 5*6 + 6*7 + 7*8 = 168
/// assert_eq!(weighted_digit_checksum(2_345_678), 8);
/// assert_eq!(weighted_digit_checksum(0), 0);
/// ```
#[allow(clippy::cast_possible_truncation)]
pub fn weighted_digit_checksum(n: u64) -> u8 {
    let mut buf = [0; MAX_DIGITS];
    let sum = decimal_digits(n, &mut buf)
        .iter()
        .zip(1_u32..)
        .fold(0_u32, |acc, (&d, weight)| acc + weight * u32::from(d));
    (sum % 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_are_most_significant_first() {
        let mut buf = [0; MAX_DIGITS];
        assert_eq!(decimal_digits(0, &mut buf), &[0]);
        assert_eq!(decimal_digits(907, &mut buf), &[9, 0, 7]);
        assert_eq!(decimal_digits(u64::MAX, &mut buf).len(), MAX_DIGITS);
    }

    #[test]
    fn matches_hand_computed_values() {
        assert_eq!(weighted_digit_checksum(2_345_678), 8);
        // 1*2 = 2
        assert_eq!(weighted_digit_checksum(2), 2);
        // 1*2 + 7*1 = 9
        assert_eq!(weighted_digit_checksum(2_000_001), 9);
        // 1*2 = 2, rest zero
        assert_eq!(weighted_digit_checksum(2_000_000), 2);
        // 1*1 + 2*2 = 5
        assert_eq!(weighted_digit_checksum(12), 5);
        // 1*2 + 2*1 = 4; order matters
        assert_eq!(weighted_digit_checksum(21), 4);
    }

    #[test]
    fn stays_in_digit_range() {
        let samples = (0..10_000)
            .chain(2_000_000..2_010_000)
            .chain([u64::MAX, u64::MAX - 1, 10_u64.pow(19)]);
        for n in samples {
            assert!(weighted_digit_checksum(n) <= 9, "checksum out of range for {n}");
        }
    }
}
