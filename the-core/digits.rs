//! Decimal digit arithmetic on machine integers.
//!
//! Everything here is checked or saturating: a power of ten or a digit
//! count is never allowed to wrap.

/// Number of decimal digits needed to print `n`. Zero needs one digit.
pub const fn digit_count(mut n: u64) -> usize {
  let mut count = 1;
  while n >= 10 {
    n /= 10;
    count += 1;
  }
  count
}

/// `10^exp`, or `None` when it does not fit in an `i64`.
#[inline]
pub const fn checked_pow10(exp: u32) -> Option<i64> {
  10i64.checked_pow(exp)
}

/// The largest number with `digits` decimal digits (`10^digits - 1`).
#[inline]
pub const fn all_nines(digits: u32) -> Option<i64> {
  match checked_pow10(digits) {
    Some(pow) => Some(pow - 1),
    None => None,
  }
}

/// Renders `value` left-padded with zeros to `width` digits. Values wider
/// than `width` are rendered in full.
pub fn zero_padded(value: u64, width: usize) -> String {
  format!("{value:0>width$}")
}

/// Replaces the digit at `index` (left to right) of the zero-padded
/// rendering of `value` and parses the result back.
///
/// Returns `None` if `index` is outside `width`, `value` does not fit in
/// `width` digits, `digit` is not `0..=9`, or the result overflows a `u64`.
pub fn replace_digit(value: u64, width: usize, index: usize, digit: u8) -> Option<u64> {
  if index >= width || digit > 9 || digit_count(value) > width {
    return None;
  }
  zero_padded(value, width)
    .bytes()
    .enumerate()
    .try_fold(0u64, |acc, (i, byte)| {
      let d = if i == index { digit } else { byte - b'0' };
      acc.checked_mul(10)?.checked_add(u64::from(d))
    })
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn counts_digits() {
    assert_eq!(digit_count(0), 1);
    assert_eq!(digit_count(9), 1);
    assert_eq!(digit_count(59), 2);
    assert_eq!(digit_count(180), 3);
    assert_eq!(digit_count(u64::MAX), 20);
  }

  #[test]
  fn powers_of_ten() {
    assert_eq!(checked_pow10(0), Some(1));
    assert_eq!(checked_pow10(18), Some(1_000_000_000_000_000_000));
    assert_eq!(checked_pow10(19), None);
    assert_eq!(all_nines(3), Some(999));
    assert_eq!(all_nines(19), None);
  }

  #[test]
  fn pads_with_zeros() {
    assert_eq!(zero_padded(5, 2), "05");
    assert_eq!(zero_padded(0, 3), "000");
    assert_eq!(zero_padded(1234, 2), "1234");
  }

  #[test]
  fn replaces_digits() {
    assert_eq!(replace_digit(85, 2, 0, 9), Some(95));
    assert_eq!(replace_digit(5, 3, 1, 7), Some(75));
    assert_eq!(replace_digit(5, 3, 0, 1), Some(105));
    assert_eq!(replace_digit(5, 3, 3, 1), None);
    assert_eq!(replace_digit(5, 3, 0, 10), None);
  }
}
