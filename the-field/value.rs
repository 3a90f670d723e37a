//! Conversion between a chain and a decimal value.
//!
//! The value of a chain is the sum of `|value| / divisor` over its integers,
//! plus the undisplayed remainder, negated when the sign shows negative.
//! [`FieldChain::from_value`] inverts this by peeling off one field at a time
//! and keeps whatever the last field cannot show as undisplayed precision, so
//! a value survives a round trip even when it is rendered rounded.

use the_core::chars::{
  char_is_digit,
  strip_punctuation,
};

use crate::{
  carry::Step,
  chain::{
    FieldChain,
    Notification,
  },
  field::{
    EditError,
    Field,
    IntegerField,
    Result,
  },
};

impl FieldChain {
  /// Sum of the displayed integers, ignoring the sign.
  pub fn magnitude(&self) -> f64 {
    self
      .fields
      .iter()
      .filter_map(Field::as_integer)
      .map(IntegerField::weight)
      .sum()
  }

  pub fn to_value(&self) -> f64 {
    let total = self.magnitude() + self.undisplayed;
    if self.is_positive() { total } else { -total }
  }

  /// Smallest step the rendered text can show.
  pub fn minimum_unit(&self) -> f64 {
    self
      .last_integer()
      .and_then(|index| self.fields[index].as_integer())
      .map_or(1.0, |int| 1.0 / int.divisor() as f64)
  }

  /// Part of the value too small to be rendered.
  pub fn undisplayed(&self) -> f64 {
    if self.is_positive() {
      self.undisplayed
    } else {
      -self.undisplayed
    }
  }

  /// Largest magnitude the integers can show, each at its full range.
  pub fn capacity(&self) -> f64 {
    self
      .fields
      .iter()
      .filter_map(Field::as_integer)
      .map(|int| int.range() as f64 / int.divisor() as f64)
      .sum()
  }

  /// Distributes `value` over the fields.
  ///
  /// NaN is ignored. Infinities and values beyond the maximum or the
  /// capacity clamp to the smaller of the two. Chains without a sign clamp
  /// negative values to zero. A remainder of a whole unit or more cannot be
  /// shown and is dropped rather than kept as undisplayed precision.
  pub fn from_value(&mut self, value: f64) {
    if value.is_nan() {
      tracing::warn!("ignoring NaN value");
      return;
    }
    let previous = self.to_value();
    let negative = value < 0.0 && self.sign().is_some();
    if value < 0.0 && !negative {
      tracing::debug!(value, "unsigned chain clamps negative value to zero");
    }
    let magnitude = if negative { -value } else { value.max(0.0) };
    let magnitude = magnitude.min(self.maximum as f64).min(self.capacity());

    self.set_polarity(true);
    self.decompose(magnitude);

    let unit = self.minimum_unit();
    let mut residual = magnitude - self.magnitude();
    if residual >= unit {
      tracing::debug!(residual, "dropping remainder the fields cannot show");
      residual = 0.0;
    } else if residual > unit / 10.0 {
      let stepped = self
        .last_integer()
        .and_then(|last| self.step_field(last, Step::Up, 0));
      if let Some(dirty) = stepped {
        for index in dirty {
          self.mark_dirty(index);
        }
        residual -= unit;
      }
    }
    self.undisplayed = residual;

    if negative {
      self.set_polarity(false);
    }
    self.sync_signs();
    self.clamp_to_maximum();

    if !self.render_dirty(false) {
      let current = self.to_value();
      if current != previous {
        self.notify(Notification::ValueChanged(current));
      }
    }
  }

  /// Floors `magnitude` into each integer in turn, scaling the remainder by
  /// the ratio of consecutive divisors.
  fn decompose(&mut self, magnitude: f64) {
    let mut remainder = magnitude;
    let mut previous: Option<f64> = None;
    for index in 0..self.fields.len() {
      let Some(int) = self.fields[index].as_integer_mut() else {
        continue;
      };
      let divisor = int.divisor() as f64;
      let scaled = match previous {
        Some(previous) => remainder * (divisor / previous),
        None => remainder * divisor,
      };
      let whole = scaled.floor();
      // Saturating cast; the field clamps to its range.
      int.set_value(whole as i64);
      remainder = scaled - whole;
      previous = Some(divisor);
      self.mark_dirty(index);
    }
  }

  /// The value printed with exactly as many decimals as the chain shows.
  pub fn value_string(&self) -> String {
    format!("{:.*}", self.config.decimals as usize, self.to_value())
  }

  /// Parses a decimal number, as pasted from the clipboard, into the chain.
  pub fn paste_value(&mut self, text: &str) -> Result<()> {
    let value = text
      .trim()
      .parse::<f64>()
      .ok()
      .filter(|value| value.is_finite())
      .ok_or_else(|| EditError::NotANumber(text.to_owned()))?;
    self.from_value(value);
    Ok(())
  }

  /// Concatenated integer digits, as shown, without signs or separators.
  pub fn digits(&self) -> String {
    let mut digits = String::new();
    for int in self.fields.iter().filter_map(Field::as_integer) {
      digits.push_str(&int.render());
    }
    digits
  }

  /// Fills the integers from a digit string such as `"(555) 010-9999"`.
  ///
  /// Punctuation and whitespace are dropped. Surplus digits are cut from the
  /// left and missing ones are treated as leading zeros.
  pub fn set_digits(&mut self, text: &str) -> Result<()> {
    let digits: String = strip_punctuation(text)
      .chars()
      .filter(|ch| !ch.is_whitespace())
      .collect();
    if digits.is_empty() || !digits.chars().all(char_is_digit) {
      return Err(EditError::NotDigits(text.to_owned()));
    }

    let total: usize = self
      .fields
      .iter()
      .filter_map(Field::as_integer)
      .map(IntegerField::width)
      .sum();
    // ASCII digits only, so byte offsets are char offsets.
    let tail = &digits[digits.len().saturating_sub(total)..];
    let padded = format!("{tail:0>total$}");

    let previous = self.to_value();
    let mut offset = 0;
    for index in 0..self.fields.len() {
      let Some(int) = self.fields[index].as_integer_mut() else {
        continue;
      };
      let width = int.width();
      let chunk = &padded[offset..offset + width];
      let value = chunk
        .parse::<u64>()
        .ok()
        .and_then(|value| i64::try_from(value).ok())
        .unwrap_or(i64::MAX);
      int.set_value(value);
      offset += width;
      self.mark_dirty(index);
    }

    self.undisplayed = 0.0;
    self.sync_signs();
    self.clamp_to_maximum();
    if !self.render_dirty(false) {
      let current = self.to_value();
      if current != previous {
        self.notify(Notification::ValueChanged(current));
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod test {
  use quickcheck::TestResult;

  use super::*;
  use crate::{
    config::{
      ChainConfig,
      FieldSpec,
      PrefixSpec,
    },
    input::Key,
  };

  fn latitude(decimals: u32) -> FieldChain {
    FieldChain::new(ChainConfig::latitude(decimals)).unwrap()
  }

  #[test]
  fn negative_latitude() {
    let mut chain = latitude(0);
    chain.from_value(-45.5083333);
    assert_eq!(chain.rendered_text(), "S45°30'30''");
    assert_eq!(chain.integer_values(), [-45, -30, -30]);
    assert!((chain.to_value() + 45.5083333).abs() < 1.0 / 3600.0);
  }

  #[test]
  fn undisplayed_precision_survives() {
    let mut chain = latitude(0);
    chain.from_value(10.00001);
    assert_eq!(chain.rendered_text(), "N10°00'00''");
    assert!((chain.to_value() - 10.00001).abs() < 1e-9);
    assert!(chain.undisplayed() > 0.0);
  }

  #[test]
  fn rounding_correction_steps_last_field() {
    let mut chain = latitude(0);
    chain.from_value(10.0001);
    assert_eq!(chain.rendered_text(), "N10°00'01''");
    assert!(chain.undisplayed() < 0.0);
    assert!((chain.to_value() - 10.0001).abs() < 1e-12);
  }

  #[test]
  fn editing_drops_undisplayed_precision() {
    let mut chain = latitude(0);
    chain.from_value(10.00001);
    chain.try_set_digit_at('2', 1).unwrap();
    assert_eq!(chain.to_value(), 20.0);
  }

  #[test]
  fn hidden_change_reports_value() {
    let mut chain = latitude(0);
    chain.from_value(10.0);
    chain.drain_notifications();
    chain.from_value(10.00001);
    let notifications = chain.drain_notifications();
    assert_eq!(notifications.len(), 1);
    assert!(matches!(notifications[0], Notification::ValueChanged(_)));
  }

  #[test]
  fn value_clamps_to_maximum() {
    let mut chain = latitude(2);
    chain.from_value(1000.0);
    assert_eq!(chain.rendered_text(), "N90°00'00.00''");
    assert_eq!(chain.to_value(), 90.0);
    chain.from_value(f64::NEG_INFINITY);
    assert_eq!(chain.to_value(), -90.0);
  }

  #[test]
  fn maximum_beyond_capacity_saturates_display() {
    let mut chain = FieldChain::new(
      ChainConfig::new(vec![
        FieldSpec::integer(9, 1),
        FieldSpec::constant(":"),
        FieldSpec::integer(59, 60),
      ])
      .with_maximum(100),
    )
    .unwrap();
    chain.from_value(50.0);
    assert_eq!(chain.rendered_text(), "9:59");
    assert!(chain.undisplayed().abs() < 1e-9);
    assert!((chain.to_value() - chain.magnitude()).abs() < 1e-9);
  }

  #[test]
  fn phone_value_keeps_text_and_value_in_step() {
    let mut chain = FieldChain::new(ChainConfig::phone_number(None)).unwrap();
    chain.from_value(5_550_109_999.0);
    assert_eq!(chain.rendered_text(), "999-000-0000");
    assert_eq!(chain.undisplayed(), 0.0);
    assert_eq!(chain.to_value(), chain.magnitude());
    assert_eq!(chain.to_value(), 999.0);
  }

  #[test]
  fn nan_is_ignored() {
    let mut chain = latitude(0);
    chain.from_value(12.5);
    chain.drain_notifications();
    chain.from_value(f64::NAN);
    assert_eq!(chain.to_value(), 12.5);
    assert!(chain.drain_notifications().is_empty());
  }

  #[test]
  fn unsigned_chain_clamps_negative_to_zero() {
    let mut chain = FieldChain::new(ChainConfig::unsigned_decimal(2)).unwrap();
    chain.from_value(-3.5);
    assert_eq!(chain.to_value(), 0.0);
  }

  #[test]
  fn decimal_value_string() {
    let mut chain = FieldChain::new(ChainConfig::signed_decimal(2)).unwrap();
    chain.from_value(-12.25);
    assert_eq!(chain.rendered_text(), "-00000000012.25");
    assert_eq!(chain.value_string(), "-12.25");
    chain.from_value(3.0);
    assert_eq!(chain.value_string(), "3.00");
  }

  #[test]
  fn paste_parses_decimals() {
    let mut chain = FieldChain::new(ChainConfig::signed_decimal(1)).unwrap();
    chain.paste_value(" -7.5 ").unwrap();
    assert_eq!(chain.to_value(), -7.5);
    assert_eq!(
      chain.paste_value("seven"),
      Err(EditError::NotANumber("seven".into()))
    );
    assert!(chain.paste_value("inf").is_err());
    assert_eq!(chain.to_value(), -7.5);
  }

  #[test]
  fn phone_digits() {
    let mut chain = FieldChain::new(ChainConfig::phone_number(None)).unwrap();
    chain.set_digits("(555) 010-9999").unwrap();
    assert_eq!(chain.rendered_text(), "555-010-9999");
    assert_eq!(chain.digits(), "5550109999");
    chain.set_digits("12").unwrap();
    assert_eq!(chain.rendered_text(), "000-000-0012");
    assert_eq!(
      chain.set_digits("555-CALL"),
      Err(EditError::NotDigits("555-CALL".into()))
    );
  }

  #[test]
  fn phone_digits_with_country_code() {
    let mut chain = FieldChain::new(ChainConfig::phone_number(Some(2))).unwrap();
    chain.set_digits("+44 555 010 9999").unwrap();
    assert_eq!(chain.rendered_text(), "44-555-010-9999");
    chain.set_prefix(None).unwrap();
    chain.set_digits("+44 555 010 9999").unwrap();
    assert_eq!(chain.rendered_text(), "555-010-9999");
    chain.set_prefix(Some(PrefixSpec::new(1, "-"))).unwrap();
    assert_eq!(chain.rendered_text(), "0-000-000-0000");
  }

  fn signs_consistent(chain: &FieldChain) -> bool {
    let positive = chain.is_positive();
    chain
      .integer_values()
      .iter()
      .all(|&value| if positive { value >= 0 } else { value <= 0 })
  }

  quickcheck::quickcheck! {
    fn latitude_round_trip(raw: f64) -> TestResult {
      if !raw.is_finite() {
        return TestResult::discard();
      }
      let value = raw % 90.0;
      let mut chain = latitude(2);
      chain.from_value(value);
      TestResult::from_bool((chain.to_value() - value).abs() <= chain.minimum_unit())
    }

    fn decimal_round_trip(raw: i32, decimals: u8) -> bool {
      let decimals = u32::from(decimals % 6);
      let mut chain = FieldChain::new(ChainConfig::signed_decimal(decimals)).unwrap();
      let value = f64::from(raw) / 1000.0;
      chain.from_value(value);
      (chain.to_value() - value).abs() <= chain.minimum_unit()
    }

    fn edits_keep_invariants(ops: Vec<u8>) -> bool {
      let mut chain = latitude(1);
      let width = chain.text().len_chars();
      for op in ops {
        let key = match op % 8 {
          0 => Key::Up,
          1 => Key::Down,
          2 => Key::Left,
          3 => Key::Right,
          4 => Key::Char(char::from(b'0' + op % 10)),
          5 => Key::Char('S'),
          6 => Key::Char('N'),
          _ => Key::Backspace,
        };
        chain.handle_key(key);
        let text_ok = chain.text().len_chars() == width;
        let cursor_ok = chain.field_for(chain.cursor()).is_some_and(Field::is_editable);
        if !text_ok || !cursor_ok || !signs_consistent(&chain) || chain.to_value().abs() > 90.0 {
          return false;
        }
      }
      true
    }
  }
}
