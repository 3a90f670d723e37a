//! Typed segments of a field chain.
//!
//! A [`Field`] is one fixed-width piece of the rendered text. There are three
//! variants:
//!
//! - **Sign** - a single character showing the polarity of the whole value
//!   (`'N'`/`'S'`, `'E'`/`'W'`, `'+'`/`'-'`)
//! - **Integer** - a bounded signed integer rendered zero-padded to the width
//!   of its range, weighted by a divisor when the chain is summed
//! - **Constant** - an immutable separator (`"°"`, `"."`, `"''"`)
//!
//! ```text
//! N 45 ° 30 ' 30 . 00 ''
//! ^ ^^ ^ ^^ ^ ^^ ^ ^^ ^^
//! S I  C I  C I  C I  C
//! ```
//!
//! Fields only know about themselves. Anything involving a neighbour (carry,
//! borrow, sign synchronisation) lives on [`FieldChain`](crate::chain::FieldChain).
//!
//! # Error Handling
//!
//! Edits return [`Result<T, EditError>`]. A rejected edit never mutates the
//! field.

use the_core::{
  chars::{
    char_eq_ignore_case,
    digit_value,
  },
  digits::{
    digit_count,
    replace_digit,
    zero_padded,
  },
};
use thiserror::Error;

use crate::Tendril;

pub type Result<T> = std::result::Result<T, EditError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EditError {
  #[error("'{0}' is not a digit")]
  NotADigit(char),
  #[error("index {index} is outside a field of width {width}")]
  IndexOutOfField { index: usize, width: usize },
  #[error("{value} exceeds the field range {range}")]
  OutOfRange { value: u64, range: i64 },
  #[error("'{ch}' is neither '{negative}' nor '{positive}'")]
  NotASignChar {
    ch:       char,
    negative: char,
    positive: char,
  },
  #[error("sign already shows '{0}'")]
  SignUnchanged(char),
  #[error("constant fields cannot be edited")]
  ConstantField,
  #[error("'{0}' is not a decimal number")]
  NotANumber(String),
  #[error("'{0}' does not contain only digits")]
  NotDigits(String),
  #[error("chain has no fields")]
  EmptyChain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
  Sign,
  Integer,
  Constant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
  Sign(SignField),
  Integer(IntegerField),
  Constant(ConstantField),
}

impl Field {
  pub fn kind(&self) -> FieldKind {
    match self {
      Self::Sign(_) => FieldKind::Sign,
      Self::Integer(_) => FieldKind::Integer,
      Self::Constant(_) => FieldKind::Constant,
    }
  }

  /// Whether the cursor may rest on this field.
  #[inline]
  pub fn is_editable(&self) -> bool {
    !matches!(self, Self::Constant(_))
  }

  /// Rendered width in chars. Constant for the lifetime of the field.
  pub fn width(&self) -> usize {
    match self {
      Self::Sign(_) => 1,
      Self::Integer(int) => int.width(),
      Self::Constant(constant) => constant.width(),
    }
  }

  /// Width of the current value without padding.
  pub fn value_len(&self) -> usize {
    match self {
      Self::Sign(_) => 1,
      Self::Integer(int) => int.value_len(),
      Self::Constant(constant) => constant.width(),
    }
  }

  pub fn render(&self) -> Tendril {
    match self {
      Self::Sign(sign) => sign.render(),
      Self::Integer(int) => int.render(),
      Self::Constant(constant) => constant.text.clone(),
    }
  }

  /// Replaces the char at `index` (field-local, left to right).
  pub fn set_digit_at(&mut self, ch: char, index: usize) -> Result<()> {
    match self {
      Self::Sign(sign) => sign.set_char_at(ch, index),
      Self::Integer(int) => int.set_digit_at(ch, index),
      Self::Constant(_) => Err(EditError::ConstantField),
    }
  }

  pub fn as_integer(&self) -> Option<&IntegerField> {
    match self {
      Self::Integer(int) => Some(int),
      _ => None,
    }
  }

  pub fn as_integer_mut(&mut self) -> Option<&mut IntegerField> {
    match self {
      Self::Integer(int) => Some(int),
      _ => None,
    }
  }

  pub fn as_sign(&self) -> Option<&SignField> {
    match self {
      Self::Sign(sign) => Some(sign),
      _ => None,
    }
  }

  pub fn as_sign_mut(&mut self) -> Option<&mut SignField> {
    match self {
      Self::Sign(sign) => Some(sign),
      _ => None,
    }
  }
}

/// Two-state polarity character. Starts out positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignField {
  negative: char,
  positive: char,
  current:  char,
}

impl SignField {
  pub fn new(negative: char, positive: char) -> Self {
    Self {
      negative,
      positive,
      current: positive,
    }
  }

  pub fn negative_char(&self) -> char {
    self.negative
  }

  pub fn positive_char(&self) -> char {
    self.positive
  }

  pub fn current(&self) -> char {
    self.current
  }

  pub fn is_positive(&self) -> bool {
    char_eq_ignore_case(self.current, self.positive)
  }

  /// Returns whether the polarity actually changed.
  pub fn set_positive(&mut self, positive: bool) -> bool {
    if self.is_positive() == positive {
      return false;
    }
    self.current = if positive { self.positive } else { self.negative };
    true
  }

  pub fn increment(&mut self) -> bool {
    self.set_positive(true)
  }

  pub fn decrement(&mut self) -> bool {
    self.set_positive(false)
  }

  pub fn render(&self) -> Tendril {
    let mut buf = [0u8; 4];
    Tendril::from(&*self.current.encode_utf8(&mut buf))
  }

  /// Accepts either polarity character, case-insensitively. The configured
  /// character is what gets shown.
  pub fn set_char_at(&mut self, ch: char, index: usize) -> Result<()> {
    if index != 0 {
      return Err(EditError::IndexOutOfField { index, width: 1 });
    }
    if char_eq_ignore_case(ch, self.current) {
      return Err(EditError::SignUnchanged(self.current));
    }
    if !char_eq_ignore_case(ch, self.positive) && !char_eq_ignore_case(ch, self.negative) {
      return Err(EditError::NotASignChar {
        ch,
        negative: self.negative,
        positive: self.positive,
      });
    }
    self.current = if char_eq_ignore_case(ch, self.positive) {
      self.positive
    } else {
      self.negative
    };
    Ok(())
  }
}

/// Bounded integer segment.
///
/// The value lives in `[-range, range]`. Its contribution to the chain's
/// decimal value is `value / divisor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerField {
  value:   i64,
  range:   i64,
  divisor: i64,
  carry:   bool,
}

impl IntegerField {
  /// `range` and `divisor` must be positive; the chain validates both before
  /// constructing a field.
  pub(crate) fn new(range: i64, divisor: i64, carry: bool) -> Self {
    debug_assert!(range > 0 && divisor > 0);
    Self {
      value: 0,
      range,
      divisor,
      carry,
    }
  }

  pub fn value(&self) -> i64 {
    self.value
  }

  pub fn magnitude(&self) -> u64 {
    self.value.unsigned_abs()
  }

  pub fn range(&self) -> i64 {
    self.range
  }

  pub fn divisor(&self) -> i64 {
    self.divisor
  }

  /// Whether overflow and underflow are forwarded to the left neighbour.
  pub fn carries(&self) -> bool {
    self.carry
  }

  /// Clamps `value` into `[-range, range]`. Returns whether the stored value
  /// changed.
  pub fn set_value(&mut self, value: i64) -> bool {
    let clamped = value.clamp(-self.range, self.range);
    let changed = clamped != self.value;
    self.value = clamped;
    changed
  }

  pub(crate) fn set_range(&mut self, range: i64) {
    debug_assert!(range > 0);
    self.range = range;
    self.set_value(self.value);
  }

  pub fn value_len(&self) -> usize {
    digit_count(self.magnitude())
  }

  pub fn width(&self) -> usize {
    digit_count(self.range.unsigned_abs())
  }

  /// Absolute contribution of this field to the chain's value.
  pub fn weight(&self) -> f64 {
    let magnitude = self.magnitude() as f64;
    // Dividing by one still costs a rounding step on some platforms.
    if self.divisor == 1 {
      magnitude
    } else {
      magnitude / self.divisor as f64
    }
  }

  pub fn render(&self) -> Tendril {
    zero_padded(self.magnitude(), self.width()).into()
  }

  /// Replaces one rendered digit and re-derives the value, keeping its sign.
  pub fn set_digit_at(&mut self, ch: char, index: usize) -> Result<()> {
    let digit = digit_value(ch).ok_or(EditError::NotADigit(ch))?;
    let width = self.width();
    let magnitude = replace_digit(self.magnitude(), width, index, digit)
      .ok_or(EditError::IndexOutOfField { index, width })?;
    if magnitude > self.range.unsigned_abs() {
      return Err(EditError::OutOfRange {
        value: magnitude,
        range: self.range,
      });
    }
    // Bounded by `range`, so the cast cannot wrap.
    let magnitude = magnitude as i64;
    self.value = if self.value < 0 { -magnitude } else { magnitude };
    Ok(())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantField {
  text:  Tendril,
  width: usize,
}

impl ConstantField {
  pub(crate) fn new(text: &str) -> Self {
    Self {
      text:  Tendril::from(text),
      width: text.chars().count(),
    }
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn width(&self) -> usize {
    self.width
  }
}
