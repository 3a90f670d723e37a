//! An ordered chain of fields rendered into one line of text.
//!
//! The chain owns its [`Field`]s, the char [`Span`] each one occupies in the
//! rendered text and the text itself (a [`Rope`]). Fields are addressed by
//! index; the left and right neighbours of field `i` are simply `i - 1` and
//! `i + 1`.
//!
//! # Rendering
//!
//! Mutating operations collect the indices of the fields they touched into a
//! [`DirtySet`]. The chain accumulates those and [`FieldChain::render_dirty`]
//! splices only the affected spans back into the text, then reports a single
//! [`Notification::TextChanged`] if anything differs.
//!
//! # Signs
//!
//! A chain may start with one [`SignField`]. Its polarity is authoritative:
//! after every edit, each integer is forced to carry the sign's polarity.
//! Integers in a chain without a sign are never negative.
//!
//! # Maximum
//!
//! The absolute value of the chain may not exceed its maximum (by default
//! the range of the leading integer). Reaching it pins the leading integer to
//! the maximum and zeroes the rest.

use ropey::Rope;
use smallvec::SmallVec;
use the_core::digits::{
  all_nines,
  checked_pow10,
};
use thiserror::Error;

use crate::{
  config::{
    ChainConfig,
    FieldSpec,
    PrefixSpec,
  },
  cursor::Direction,
  field::{
    self,
    ConstantField,
    EditError,
    Field,
    IntegerField,
    SignField,
  },
};

pub type Result<T> = std::result::Result<T, ChainError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChainError {
  #[error("field {index} has non-positive range {range}")]
  InvalidRange { index: usize, range: i64 },
  #[error("field {index} has non-positive divisor {divisor}")]
  InvalidDivisor { index: usize, divisor: i64 },
  #[error("sign field at {index} must be the leftmost field")]
  MisplacedSign { index: usize },
  #[error("sign characters '{negative}' and '{positive}' are indistinguishable")]
  AmbiguousSign { negative: char, positive: char },
  #[error("constant field {index} is empty")]
  EmptyConstant { index: usize },
  #[error("chain has no integer field")]
  NoIntegerField,
  #[error("{decimals} decimals cannot be represented")]
  InvalidPrecision { decimals: u32 },
  #[error("a prefix of {digits} digits cannot be represented")]
  InvalidPrefix { digits: u32 },
  #[error("maximum {maximum} must be positive")]
  InvalidMaximum { maximum: i64 },
}

/// Inclusive char interval a field occupies in the rendered text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
  pub start: usize,
  pub end:   usize,
}

impl Span {
  pub fn new(start: usize, end: usize) -> Self {
    debug_assert!(start <= end);
    Self { start, end }
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.end + 1 - self.start
  }

  #[inline]
  pub fn contains(&self, index: usize) -> bool {
    (self.start..=self.end).contains(&index)
  }
}

/// Field indices touched by a mutation, in the order they were first touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtySet(SmallVec<[usize; 8]>);

impl DirtySet {
  pub fn insert(&mut self, index: usize) {
    if !self.contains(index) {
      self.0.push(index);
    }
  }

  pub fn contains(&self, index: usize) -> bool {
    self.0.contains(&index)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
    self.0.iter().copied()
  }
}

impl Extend<usize> for DirtySet {
  fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
    for index in iter {
      self.insert(index);
    }
  }
}

impl FromIterator<usize> for DirtySet {
  fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
    let mut set = Self::default();
    set.extend(iter);
    set
  }
}

impl IntoIterator for DirtySet {
  type Item = usize;
  type IntoIter = smallvec::IntoIter<[usize; 8]>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.into_iter()
  }
}

/// Observable changes, queued until [`FieldChain::drain_notifications`].
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
  TextChanged(String),
  /// The value moved without the rendered text changing, e.g. through
  /// undisplayed precision.
  ValueChanged(f64),
  ClampedToMaximum,
}

#[derive(Debug, Clone)]
pub struct FieldChain {
  pub(crate) config:      ChainConfig,
  pub(crate) fields:      Vec<Field>,
  pub(crate) spans:       Vec<Span>,
  pub(crate) maximum:     i64,
  pub(crate) text:        Rope,
  pub(crate) cursor:      usize,
  /// Magnitude below the last integer's resolution.
  pub(crate) undisplayed: f64,
  pending:                DirtySet,
  notifications:          Vec<Notification>,
}

struct Layout {
  fields:  Vec<Field>,
  maximum: i64,
}

/// Validates `config` and expands it into concrete fields: the country-code
/// style prefix, the precision-derived leading range and the fractional
/// field are all applied here.
fn layout(config: &ChainConfig) -> Result<Layout> {
  let mut fields = config
    .fields
    .iter()
    .enumerate()
    .map(|(index, spec)| spec.to_field(index))
    .collect::<Result<Vec<_>>>()?;

  if let Some(index) = fields
    .iter()
    .enumerate()
    .skip(1)
    .find_map(|(index, field)| matches!(field, Field::Sign(_)).then_some(index))
  {
    return Err(ChainError::MisplacedSign { index });
  }

  if let Some(prefix) = &config.prefix {
    insert_prefix(&mut fields, prefix)?;
  }

  if config.bounded_by_precision {
    let range = precision_bounded_range(config.decimals)?;
    if let Some(leading) = fields.iter_mut().find_map(Field::as_integer_mut) {
      leading.set_range(range);
    }
  }

  if config.decimals > 0 {
    insert_fraction(&mut fields, config.decimals, config.decimal_separator)?;
  }

  let leading = fields
    .iter()
    .find_map(Field::as_integer)
    .ok_or(ChainError::NoIntegerField)?;
  let maximum = config.maximum.unwrap_or(leading.range());
  if maximum <= 0 {
    return Err(ChainError::InvalidMaximum { maximum });
  }

  Ok(Layout { fields, maximum })
}

pub(crate) fn validate(config: &ChainConfig) -> Result<()> {
  layout(config).map(|_| ())
}

fn insert_prefix(fields: &mut Vec<Field>, prefix: &PrefixSpec) -> Result<()> {
  let invalid = ChainError::InvalidPrefix {
    digits: prefix.digits,
  };
  let range = all_nines(prefix.digits)
    .filter(|&range| range > 0)
    .ok_or_else(|| invalid.clone())?;
  if prefix.separator.is_empty() {
    return Err(invalid);
  }
  let at = usize::from(matches!(fields.first(), Some(Field::Sign(_))));
  fields.insert(at, Field::Constant(ConstantField::new(&prefix.separator)));
  fields.insert(at, Field::Integer(IntegerField::new(range, 1, false)));
  Ok(())
}

/// Largest leading integer that still leaves room for `decimals` fractional
/// digits without losing precision in an `f64` round trip.
pub(crate) fn precision_bounded_range(decimals: u32) -> Result<i64> {
  let scale = decimals
    .checked_add(1)
    .and_then(checked_pow10)
    .and_then(|pow| pow.checked_mul(100_000))
    .ok_or(ChainError::InvalidPrecision { decimals })?;
  match i64::MAX / scale {
    0 => Err(ChainError::InvalidPrecision { decimals }),
    range => Ok(range),
  }
}

/// Inserts a decimal separator and a fractional integer before a trailing
/// constant (a unit suffix), or at the end otherwise.
fn insert_fraction(fields: &mut Vec<Field>, decimals: u32, separator: char) -> Result<()> {
  let invalid = ChainError::InvalidPrecision { decimals };
  let range = all_nines(decimals).ok_or_else(|| invalid.clone())?;
  let previous = fields
    .iter()
    .rev()
    .find_map(Field::as_integer)
    .map_or(1, IntegerField::divisor);
  let divisor = checked_pow10(decimals)
    .and_then(|pow| pow.checked_mul(previous))
    .ok_or(invalid)?;
  let at = match fields.last() {
    Some(Field::Constant(_)) => fields.len() - 1,
    _ => fields.len(),
  };
  let mut buf = [0u8; 4];
  fields.insert(at, Field::Integer(IntegerField::new(range, divisor, true)));
  fields.insert(
    at,
    Field::Constant(ConstantField::new(separator.encode_utf8(&mut buf))),
  );
  Ok(())
}

impl FieldChain {
  pub fn new(config: ChainConfig) -> Result<Self> {
    let Layout { fields, maximum } = layout(&config)?;
    let mut chain = Self {
      config,
      fields,
      spans: Vec::new(),
      maximum,
      text: Rope::new(),
      cursor: 0,
      undisplayed: 0.0,
      pending: DirtySet::default(),
      notifications: Vec::new(),
    };
    chain.sync_edges();
    chain.render_dirty(true);
    chain.set_cursor(0);
    chain.notifications.clear();
    Ok(chain)
  }

  /// Replaces the whole configuration. All values reset to zero.
  pub fn configure(&mut self, config: ChainConfig) -> Result<()> {
    let layout = layout(&config)?;
    self.install(config, layout);
    self.render_dirty(true);
    self.set_cursor(self.cursor);
    Ok(())
  }

  /// Replaces the field list, keeping precision, prefix and maximum.
  pub fn configure_fields(&mut self, fields: Vec<FieldSpec>) -> Result<()> {
    let config = ChainConfig {
      fields,
      ..self.config.clone()
    };
    self.configure(config)
  }

  fn install(&mut self, config: ChainConfig, layout: Layout) {
    tracing::debug!(
      fields = layout.fields.len(),
      decimals = config.decimals,
      maximum = layout.maximum,
      "configured field chain"
    );
    self.config = config;
    self.fields = layout.fields;
    self.maximum = layout.maximum;
    self.undisplayed = 0.0;
    self.sync_edges();
  }

  /// Recomputes every field's span from the field widths and marks all fields
  /// dirty.
  pub fn sync_edges(&mut self) {
    self.spans.clear();
    let mut offset = 0;
    for field in &self.fields {
      let width = field.width();
      self.spans.push(Span::new(offset, offset + width - 1));
      offset += width;
    }
    self.pending = (0..self.fields.len()).collect();
  }

  /// Splices the rendering of pending fields (all fields if `force`) into the
  /// text. Returns whether the text changed.
  pub fn render_dirty(&mut self, force: bool) -> bool {
    let dirty = std::mem::take(&mut self.pending);
    let total = self.spans.last().map_or(0, |span| span.end + 1);
    let mut changed = false;

    if self.text.len_chars() != total {
      let mut rendered = String::with_capacity(total);
      for field in &self.fields {
        rendered.push_str(&field.render());
      }
      self.text = Rope::from(rendered);
      changed = true;
    } else {
      for (index, field) in self.fields.iter().enumerate() {
        if !force && !dirty.contains(index) {
          continue;
        }
        let span = self.spans[index];
        let rendered = field.render();
        if self
          .text
          .slice(span.start..=span.end)
          .chars()
          .eq(rendered.chars())
        {
          continue;
        }
        self.text.remove(span.start..=span.end);
        self.text.insert(span.start, &rendered);
        changed = true;
      }
    }

    if changed {
      self
        .notifications
        .push(Notification::TextChanged(self.text.to_string()));
    }
    changed
  }

  /// Applies a batch of field changes: syncs signs, enforces the maximum and
  /// renders. Drops undisplayed precision since the value was edited.
  pub(crate) fn commit(&mut self, dirty: DirtySet) {
    self.pending.extend(dirty);
    self.undisplayed = 0.0;
    self.sync_signs();
    self.clamp_to_maximum();
    self.render_dirty(false);
  }

  pub(crate) fn mark_dirty(&mut self, index: usize) {
    self.pending.insert(index);
  }

  /// Index of the field under char `index`. Indices past the end resolve to
  /// the last field.
  pub fn field_index_for(&self, index: usize) -> Option<usize> {
    self
      .spans
      .iter()
      .position(|span| span.contains(index))
      .or_else(|| self.fields.len().checked_sub(1))
  }

  pub fn field_for(&self, index: usize) -> Option<&Field> {
    self.field_index_for(index).map(|i| &self.fields[i])
  }

  pub fn cursor_field_range(&self, index: usize) -> Option<Span> {
    self.field_index_for(index).map(|i| self.spans[i])
  }

  pub fn sign(&self) -> Option<&SignField> {
    self.fields.first().and_then(Field::as_sign)
  }

  /// Positive unless the chain has a sign field showing negative.
  pub fn is_positive(&self) -> bool {
    self.sign().is_none_or(SignField::is_positive)
  }

  /// Forces every integer to the polarity of the sign field.
  pub fn sync_signs(&mut self) {
    let positive = self.is_positive();
    for (index, field) in self.fields.iter_mut().enumerate() {
      let Some(int) = field.as_integer_mut() else {
        continue;
      };
      let magnitude = int.value().abs();
      if int.set_value(if positive { magnitude } else { -magnitude }) {
        self.pending.insert(index);
      }
    }
  }

  pub(crate) fn set_polarity(&mut self, positive: bool) -> bool {
    let changed = self
      .fields
      .first_mut()
      .and_then(Field::as_sign_mut)
      .is_some_and(|sign| sign.set_positive(positive));
    if changed {
      self.pending.insert(0);
    }
    changed
  }

  /// Pins the chain to its maximum once the absolute value reaches it.
  /// Returns whether anything had to change.
  pub fn clamp_to_maximum(&mut self) -> bool {
    let maximum = self.maximum;
    if self.to_value().abs() < maximum as f64 {
      return false;
    }
    let pinned = if self.is_positive() { maximum } else { -maximum };
    let mut changed = self.undisplayed != 0.0;
    let mut leading = true;
    for (index, field) in self.fields.iter_mut().enumerate() {
      let Some(int) = field.as_integer_mut() else {
        continue;
      };
      if int.set_value(if leading { pinned } else { 0 }) {
        self.pending.insert(index);
        changed = true;
      }
      leading = false;
    }
    self.undisplayed = 0.0;
    if changed {
      tracing::debug!(maximum, "value clamped to maximum");
      self.notifications.push(Notification::ClampedToMaximum);
    }
    changed
  }

  /// Types `ch` at char `index`. Returns the reason if the edit is rejected;
  /// a rejected edit leaves the chain untouched.
  pub fn try_set_digit_at(&mut self, ch: char, index: usize) -> field::Result<()> {
    let field = self.field_index_for(index).ok_or(EditError::EmptyChain)?;
    let local = index.saturating_sub(self.spans[field].start);
    self.fields[field].set_digit_at(ch, local)?;
    let mut dirty = DirtySet::default();
    dirty.insert(field);
    self.commit(dirty);
    self.set_cursor(index);
    Ok(())
  }

  pub fn set_digit_at(&mut self, ch: char, index: usize) -> bool {
    match self.try_set_digit_at(ch, index) {
      Ok(()) => true,
      Err(err) => {
        tracing::trace!(%err, index, "rejected edit");
        false
      },
    }
  }

  /// Zeroes every integer. Signs and the cursor are kept.
  pub fn clear(&mut self) {
    let dirty = self
      .fields
      .iter_mut()
      .enumerate()
      .filter_map(|(index, field)| field.as_integer_mut().map(|int| (index, int)))
      .filter_map(|(index, int)| int.set_value(0).then_some(index))
      .collect();
    self.commit(dirty);
  }

  /// Changes the number of fractional digits, keeping the value as closely
  /// as the new precision allows.
  pub fn set_precision(&mut self, decimals: u32) -> Result<()> {
    if decimals == self.config.decimals {
      return Ok(());
    }
    let value = self.to_value();
    let config = ChainConfig {
      decimals,
      ..self.config.clone()
    };
    let layout = layout(&config)?;
    self.install(config, layout);
    self.from_value(value);
    self.set_cursor(self.cursor);
    Ok(())
  }

  pub fn precision(&self) -> u32 {
    self.config.decimals
  }

  /// Adds, resizes or removes the leading prefix field. Values are reset.
  pub fn set_prefix(&mut self, prefix: Option<PrefixSpec>) -> Result<()> {
    if prefix == self.config.prefix {
      return Ok(());
    }
    let config = ChainConfig {
      prefix,
      ..self.config.clone()
    };
    let layout = layout(&config)?;
    self.install(config, layout);
    self.render_dirty(true);
    self.set_cursor(self.cursor);
    Ok(())
  }

  pub fn config(&self) -> &ChainConfig {
    &self.config
  }

  pub fn fields(&self) -> &[Field] {
    &self.fields
  }

  pub fn spans(&self) -> &[Span] {
    &self.spans
  }

  pub fn span(&self, field: usize) -> Span {
    self.spans[field]
  }

  pub fn len(&self) -> usize {
    self.fields.len()
  }

  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }

  pub fn maximum(&self) -> i64 {
    self.maximum
  }

  pub fn text(&self) -> &Rope {
    &self.text
  }

  pub fn rendered_text(&self) -> String {
    self.text.to_string()
  }

  /// Current values of the integer fields, left to right.
  pub fn integer_values(&self) -> Vec<i64> {
    self
      .fields
      .iter()
      .filter_map(Field::as_integer)
      .map(IntegerField::value)
      .collect()
  }

  pub(crate) fn last_integer(&self) -> Option<usize> {
    self.fields.iter().rposition(|field| field.as_integer().is_some())
  }

  /// Text to put on the clipboard: the whole rendering.
  pub fn copy_text(&self) -> String {
    self.rendered_text()
  }

  pub fn drain_notifications(&mut self) -> Vec<Notification> {
    std::mem::take(&mut self.notifications)
  }

  pub(crate) fn notify(&mut self, notification: Notification) {
    self.notifications.push(notification);
  }

  pub(crate) fn notification_mark(&self) -> usize {
    self.notifications.len()
  }

  /// Drops notifications queued after `mark` was taken.
  pub(crate) fn discard_notifications_since(&mut self, mark: usize) {
    self.notifications.truncate(mark);
  }

  pub(crate) fn adjacent(&self, field: usize, direction: Direction) -> Option<usize> {
    match direction {
      Direction::Backward => (0..field).rev().find(|&i| self.fields[i].is_editable()),
      Direction::Forward => (field + 1..self.fields.len()).find(|&i| self.fields[i].is_editable()),
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn latitude(decimals: u32) -> FieldChain {
    FieldChain::new(ChainConfig::latitude(decimals)).unwrap()
  }

  #[test]
  fn renders_latitude() {
    let chain = latitude(0);
    assert_eq!(chain.rendered_text(), "N00°00'00''");
    assert_eq!(chain.len(), 7);
    assert_eq!(chain.span(1), Span::new(1, 2));
    assert_eq!(chain.span(6), Span::new(9, 10));
  }

  #[test]
  fn fraction_goes_before_trailing_constant() {
    let chain = latitude(2);
    assert_eq!(chain.rendered_text(), "N00°00'00.00''");
    let fraction = chain.fields()[chain.last_integer().unwrap()]
      .as_integer()
      .unwrap();
    assert_eq!(fraction.range(), 99);
    assert_eq!(fraction.divisor(), 360_000);
  }

  #[test]
  fn fraction_appends_without_trailing_constant() {
    let chain = FieldChain::new(ChainConfig::signed_decimal(3)).unwrap();
    assert_eq!(chain.rendered_text(), "+0000000000.000");
    assert_eq!(chain.maximum(), 9_223_372_036);
  }

  #[test]
  fn spans_cover_text() {
    let chain = latitude(3);
    let mut next = 0;
    for (field, span) in chain.fields().iter().zip(chain.spans()) {
      assert_eq!(span.start, next);
      assert_eq!(span.len(), field.width());
      next = span.end + 1;
    }
    assert_eq!(next, chain.text().len_chars());
  }

  #[test]
  fn field_lookup_past_end_is_last_field() {
    let chain = latitude(0);
    assert_eq!(chain.field_index_for(3), Some(2));
    assert_eq!(chain.field_index_for(100), Some(6));
    assert_eq!(chain.cursor_field_range(5), Some(Span::new(4, 5)));
  }

  #[test]
  fn rejects_invalid_layouts() {
    let misplaced = ChainConfig::new(vec![
      FieldSpec::integer(9, 1),
      FieldSpec::sign('-', '+'),
    ]);
    assert_eq!(
      FieldChain::new(misplaced).unwrap_err(),
      ChainError::MisplacedSign { index: 1 }
    );
    let no_integer = ChainConfig::new(vec![FieldSpec::constant("x")]);
    assert_eq!(
      FieldChain::new(no_integer).unwrap_err(),
      ChainError::NoIntegerField
    );
    let zero_range = ChainConfig::new(vec![FieldSpec::integer(0, 1)]);
    assert_eq!(
      FieldChain::new(zero_range).unwrap_err(),
      ChainError::InvalidRange { index: 0, range: 0 }
    );
    let ambiguous = ChainConfig::new(vec![
      FieldSpec::sign('n', 'N'),
      FieldSpec::integer(9, 1),
    ]);
    assert!(matches!(
      FieldChain::new(ambiguous),
      Err(ChainError::AmbiguousSign { .. })
    ));
    assert_eq!(
      FieldChain::new(ChainConfig::latitude(20)).unwrap_err(),
      ChainError::InvalidPrecision { decimals: 20 }
    );
  }

  #[test]
  fn rejected_digit_leaves_chain_untouched() {
    let mut chain = latitude(0);
    chain.set_digits("850000").unwrap();
    chain.drain_notifications();
    assert!(!chain.set_digit_at('9', 1));
    assert_eq!(chain.integer_values(), [85, 0, 0]);
    assert!(chain.drain_notifications().is_empty());
  }

  #[test]
  fn typing_sign_syncs_integers() {
    let mut chain = latitude(0);
    chain.set_digits("123456").unwrap();
    assert!(chain.set_digit_at('s', 0));
    assert_eq!(chain.rendered_text(), "S12°34'56''");
    assert_eq!(chain.integer_values(), [-12, -34, -56]);
  }

  #[test]
  fn typed_digit_below_maximum_keeps_rest() {
    let mut chain = latitude(0);
    chain.set_digits("801530").unwrap();
    chain.try_set_digit_at('9', 2).unwrap();
    assert_eq!(chain.integer_values(), [89, 15, 30]);
    assert_eq!(chain.rendered_text(), "N89°15'30''");
  }

  #[test]
  fn reaching_maximum_zeroes_the_rest() {
    let mut chain = latitude(0);
    chain.set_digits("801530").unwrap();
    chain.drain_notifications();
    chain.try_set_digit_at('9', 1).unwrap();
    assert_eq!(chain.integer_values(), [90, 0, 0]);
    assert_eq!(chain.rendered_text(), "N90°00'00''");
    assert_eq!(
      chain.drain_notifications(),
      [
        Notification::ClampedToMaximum,
        Notification::TextChanged("N90°00'00''".into()),
      ]
    );
  }

  #[test]
  fn render_is_idempotent() {
    let mut chain = latitude(2);
    chain.set_digits("12345678").unwrap();
    chain.drain_notifications();
    assert!(!chain.render_dirty(false));
    assert!(!chain.render_dirty(true));
    assert!(chain.drain_notifications().is_empty());
  }

  #[test]
  fn one_text_notification_per_edit() {
    let mut chain = latitude(0);
    chain.try_set_digit_at('4', 1).unwrap();
    assert_eq!(
      chain.drain_notifications(),
      [Notification::TextChanged("N40°00'00''".into())]
    );
  }

  #[test]
  fn clear_keeps_sign() {
    let mut chain = latitude(0);
    chain.set_digits("123456").unwrap();
    chain.try_set_digit_at('S', 0).unwrap();
    chain.clear();
    assert_eq!(chain.rendered_text(), "S00°00'00''");
    assert_eq!(chain.to_value(), 0.0);
  }

  #[test]
  fn set_precision_keeps_value() {
    let mut chain = latitude(0);
    chain.set_digits("453030").unwrap();
    chain.set_precision(2).unwrap();
    assert_eq!(chain.rendered_text(), "N45°30'30.00''");
    assert_eq!(chain.integer_values(), [45, 30, 30, 0]);
    chain.set_precision(0).unwrap();
    assert_eq!(chain.rendered_text(), "N45°30'30''");
  }

  #[test]
  fn bounded_decimal_range_follows_precision() {
    let mut chain = FieldChain::new(ChainConfig::signed_decimal(0)).unwrap();
    assert_eq!(chain.fields()[1].as_integer().unwrap().range(), 9_223_372_036_854);
    chain.set_precision(4).unwrap();
    assert_eq!(chain.fields()[1].as_integer().unwrap().range(), 922_337_203);
    assert_eq!(chain.maximum(), 922_337_203);
  }

  #[test]
  fn prefix_inserts_after_sign() {
    let mut chain = FieldChain::new(ChainConfig::phone_number(None)).unwrap();
    assert_eq!(chain.rendered_text(), "000-000-0000");
    chain
      .set_prefix(Some(PrefixSpec::new(2, "-")))
      .unwrap();
    assert_eq!(chain.rendered_text(), "00-000-000-0000");
    chain.set_prefix(None).unwrap();
    assert_eq!(chain.rendered_text(), "000-000-0000");
  }

  #[test]
  fn configure_fields_resets_values() {
    let mut chain = latitude(0);
    chain.set_digits("123456").unwrap();
    chain
      .configure_fields(vec![
        FieldSpec::sign('W', 'E'),
        FieldSpec::integer(180, 1),
        FieldSpec::constant("°"),
      ])
      .unwrap();
    assert_eq!(chain.rendered_text(), "E000°");
    assert_eq!(chain.maximum(), 180);
    assert!(chain.cursor() < chain.text().len_chars());
  }

  #[test]
  fn dirty_set_deduplicates() {
    let mut dirty: DirtySet = [3, 1, 3].into_iter().collect();
    dirty.insert(1);
    assert_eq!(dirty.len(), 2);
    assert_eq!(dirty.iter().collect::<Vec<_>>(), [3, 1]);
  }
}
