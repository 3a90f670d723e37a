//! Increment and decrement with carry and borrow.
//!
//! Stepping an integer by `10^k` may overflow its range. When the field
//! carries, the overflow is handed to the nearest non-constant field on the
//! left, which steps by one and may overflow in turn. Whether the leftmost
//! lender succeeded decides every value on the way back: a granted carry
//! wraps, a refused one saturates.
//!
//! The walk is an explicit loop. First every affected field is *planned*
//! from right to left, then the plans are applied from left to right so each
//! field learns whether its lender changed.
//!
//! # Polarity
//!
//! A field counts as negative when its value is below zero, or when it is
//! zero and the chain's sign shows negative. Stepping towards zero never
//! leaves the current polarity unless every integer on the left is already
//! zero. Then the sign flips and the field mirrors its value, so `S03` stepped
//! up by ten reads `N03`. A field sitting at zero takes the step instead.

use smallvec::SmallVec;
use the_core::digits::checked_pow10;

use crate::{
  chain::{
    DirtySet,
    FieldChain,
  },
  field::{
    Field,
    IntegerField,
  },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
  Up,
  Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Plan {
  Settle(i64),
  /// Cross zero by flipping the chain's sign.
  Flip { positive: bool, value: i64 },
  /// Depends on the lender: `granted` if it changed, `refused` otherwise.
  Carry { granted: i64, refused: i64 },
}

enum Lender {
  Integer(usize),
  Sign(usize),
  /// Only constants on the left. The carry is granted for free.
  Head,
}

impl FieldChain {
  /// Steps the field under the cursor up by the place value of the cursor
  /// digit.
  pub fn increment(&mut self) -> bool {
    self.step_at_cursor(Step::Up)
  }

  pub fn decrement(&mut self) -> bool {
    self.step_at_cursor(Step::Down)
  }

  fn step_at_cursor(&mut self, step: Step) -> bool {
    let cursor = self.cursor;
    let Some(index) = self.field_index_for(cursor) else {
      return false;
    };
    if !self.fields[index].is_editable() {
      return false;
    }
    let digit = self.spans[index].end.saturating_sub(cursor);
    let before = self.snapshot();
    let Some(dirty) = self.step_field(index, step, digit) else {
      return false;
    };
    let mark = self.notification_mark();
    self.commit(dirty);
    if self.snapshot() == before {
      // Stepped and clamped straight back, e.g. pinned at the maximum.
      self.discard_notifications_since(mark);
      return false;
    }
    true
  }

  fn snapshot(&self) -> (Vec<i64>, bool, u64) {
    (
      self.integer_values(),
      self.is_positive(),
      self.undisplayed.to_bits(),
    )
  }

  /// Steps field `index` by `10^digit` (one for signs). Constants forward the
  /// step to their left neighbour.
  ///
  /// Returns the fields that changed, or `None` if nothing could change. An
  /// empty set means the step was absorbed at the head of the chain.
  pub fn step_field(&mut self, index: usize, step: Step, digit: usize) -> Option<DirtySet> {
    let mut dirty = DirtySet::default();
    let (mut index, mut digit) = (index, digit);
    let changed = loop {
      match self.fields.get(index)? {
        Field::Sign(_) => break self.step_sign(index, step, &mut dirty),
        Field::Integer(_) => break self.step_integer(index, step, digit, &mut dirty),
        Field::Constant(_) => match index.checked_sub(1) {
          Some(left) => (index, digit) = (left, 0),
          None => break true,
        },
      }
    };
    changed.then_some(dirty)
  }

  fn step_sign(&mut self, index: usize, step: Step, dirty: &mut DirtySet) -> bool {
    let Some(sign) = self.fields[index].as_sign_mut() else {
      return false;
    };
    let changed = match step {
      Step::Up => sign.increment(),
      Step::Down => sign.decrement(),
    };
    if changed {
      dirty.insert(index);
    }
    changed
  }

  fn step_integer(&mut self, start: usize, step: Step, digit: usize, dirty: &mut DirtySet) -> bool {
    let mut delta = match u32::try_from(digit).ok().and_then(checked_pow10) {
      Some(delta) => delta,
      None => {
        tracing::debug!(digit, "step saturated");
        i64::MAX
      },
    };
    let mut plans: SmallVec<[(usize, Plan); 8]> = SmallVec::new();
    let mut index = start;

    let mut granted = loop {
      let Some(int) = self.fields[index].as_integer().copied() else {
        break false;
      };
      let plan = self.plan(index, int, step, delta);
      plans.push((index, plan));
      if !matches!(plan, Plan::Carry { .. }) {
        break false;
      }
      match self.lender(index) {
        Lender::Integer(left) => {
          index = left;
          delta = 1;
        },
        Lender::Sign(sign) => break self.step_sign(sign, step, dirty),
        Lender::Head => break true,
      }
    };

    for &(index, plan) in plans.iter().rev() {
      let value = match plan {
        Plan::Settle(value) => value,
        Plan::Flip { positive, value } => {
          self.flip_sign(positive, dirty);
          value
        },
        Plan::Carry {
          granted: wrapped,
          refused,
        } => {
          if granted {
            wrapped
          } else {
            refused
          }
        },
      };
      granted = self.set_integer(index, value, dirty);
    }
    granted
  }

  fn plan(&self, index: usize, int: IntegerField, step: Step, delta: i64) -> Plan {
    let (value, range) = (int.value(), int.range());
    let carry = int.carries() && index > 0;
    let negative = value < 0 || (value == 0 && !self.is_positive());
    let can_flip = self.sign().is_some() && self.all_left_zero(index);

    match (step, negative) {
      (Step::Up, false) => {
        let next = value.saturating_add(delta);
        if next <= range {
          Plan::Settle(next)
        } else if carry {
          Plan::Carry {
            granted: next.saturating_sub(range).saturating_sub(1).clamp(0, range),
            refused: range,
          }
        } else {
          Plan::Settle(range)
        }
      },
      (Step::Up, true) => {
        let next = value.saturating_add(delta);
        if next <= 0 {
          Plan::Settle(next)
        } else if can_flip {
          Plan::Flip {
            positive: true,
            value:    mirrored(value, next).min(range),
          }
        } else if carry {
          Plan::Carry {
            granted: next.saturating_sub(1).saturating_sub(range).clamp(-range, 0),
            refused: 0,
          }
        } else {
          Plan::Settle(0)
        }
      },
      (Step::Down, true) => {
        let next = value.saturating_sub(delta);
        if next >= -range {
          Plan::Settle(next)
        } else if carry {
          Plan::Carry {
            granted: next.saturating_add(range).saturating_add(1).clamp(-range, 0),
            refused: -range,
          }
        } else {
          Plan::Settle(-range)
        }
      },
      (Step::Down, false) => {
        let next = value.saturating_sub(delta);
        if next >= 0 {
          Plan::Settle(next)
        } else if can_flip {
          Plan::Flip {
            positive: false,
            value:    mirrored(value, next).max(-range),
          }
        } else if carry {
          Plan::Carry {
            granted: next.saturating_add(range).saturating_add(1).clamp(0, range),
            refused: 0,
          }
        } else {
          Plan::Settle(0)
        }
      },
    }
  }

  /// Nearest field on the left that is not a constant.
  fn lender(&self, index: usize) -> Lender {
    let mut current = index;
    while let Some(left) = current.checked_sub(1) {
      match &self.fields[left] {
        Field::Constant(_) => current = left,
        Field::Sign(_) => return Lender::Sign(left),
        Field::Integer(_) => return Lender::Integer(left),
      }
    }
    Lender::Head
  }

  fn all_left_zero(&self, index: usize) -> bool {
    self.fields[..index]
      .iter()
      .filter_map(Field::as_integer)
      .all(|int| int.value() == 0)
  }

  fn flip_sign(&mut self, positive: bool, dirty: &mut DirtySet) {
    let flipped = self
      .fields
      .first_mut()
      .and_then(Field::as_sign_mut)
      .is_some_and(|sign| sign.set_positive(positive));
    if flipped {
      dirty.insert(0);
    }
  }

  fn set_integer(&mut self, index: usize, value: i64, dirty: &mut DirtySet) -> bool {
    let changed = self.fields[index]
      .as_integer_mut()
      .is_some_and(|int| int.set_value(value));
    if changed {
      dirty.insert(index);
    }
    changed
  }
}

/// Value of a field whose sign flips while it crosses zero.
fn mirrored(value: i64, next: i64) -> i64 {
  if value == 0 { next } else { value.saturating_neg() }
}
