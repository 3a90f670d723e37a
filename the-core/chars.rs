//! Character classification for segmented numeric text.

/// Only ASCII `0..=9` count as digits; other numeric scripts are never
/// accepted into an integer field.
#[inline]
pub fn char_is_digit(ch: char) -> bool {
  ch.is_ascii_digit()
}

#[inline]
pub fn digit_value(ch: char) -> Option<u8> {
  char_is_digit(ch).then(|| ch as u8 - b'0')
}

#[inline]
pub fn char_is_punctuation(ch: char) -> bool {
  use unicode_general_category::{
    GeneralCategory,
    get_general_category,
  };

  matches!(
    get_general_category(ch),
    GeneralCategory::OtherPunctuation
      | GeneralCategory::OpenPunctuation
      | GeneralCategory::ClosePunctuation
      | GeneralCategory::InitialPunctuation
      | GeneralCategory::FinalPunctuation
      | GeneralCategory::ConnectorPunctuation
      | GeneralCategory::DashPunctuation
      | GeneralCategory::MathSymbol
      | GeneralCategory::CurrencySymbol
      | GeneralCategory::ModifierSymbol
  )
}

/// Case-insensitive comparison of two single characters.
#[inline]
pub fn char_eq_ignore_case(a: char, b: char) -> bool {
  a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Drops every punctuation or symbol character, e.g. `+1 (555) 010-9999`
/// becomes `1 555 0109999`.
pub fn strip_punctuation(text: &str) -> String {
  text.chars().filter(|&ch| !char_is_punctuation(ch)).collect()
}
