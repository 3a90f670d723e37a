//! Cursor placement.
//!
//! The cursor is a char index into the rendered text that only ever rests on
//! an editable field. Moving onto a constant skips to the nearest editable
//! char in the direction of travel; if there is none, the cursor stays put.

use crate::chain::FieldChain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
  Forward,
  Backward,
}

impl FieldChain {
  pub fn cursor(&self) -> usize {
    self.cursor
  }

  /// Nearest editable field strictly before or after `field`.
  pub fn adjacent_editable_field(&self, field: usize, direction: Direction) -> Option<usize> {
    self.adjacent(field, direction)
  }

  /// Places the cursor at `index`, clamped to the text and snapped off
  /// constants (to the end of the editable field on the left, or else the
  /// start of the one on the right). Returns the resulting position.
  pub fn set_cursor(&mut self, index: usize) -> usize {
    let len = self.text.len_chars();
    if len == 0 {
      self.cursor = 0;
      return 0;
    }
    let mut index = index.min(len - 1);
    if let Some(field) = self.field_index_for(index) {
      if !self.fields[field].is_editable() {
        if let Some(left) = self.adjacent(field, Direction::Backward) {
          index = self.spans[left].end;
        } else if let Some(right) = self.adjacent(field, Direction::Forward) {
          index = self.spans[right].start;
        }
      }
    }
    self.cursor = index;
    index
  }

  /// Moves the cursor one char, hopping over constants. Returns whether it
  /// moved.
  pub fn seek(&mut self, direction: Direction) -> bool {
    let focus = self.cursor;
    let Some(field) = self.field_index_for(focus) else {
      return false;
    };
    let span = self.spans[field];
    let target = match direction {
      Direction::Backward => match focus.checked_sub(1) {
        Some(next) if next >= span.start => Some(next),
        _ => self
          .adjacent(field, Direction::Backward)
          .map(|left| self.spans[left].end),
      },
      Direction::Forward => match focus + 1 {
        next if next <= span.end => Some(next),
        _ => self
          .adjacent(field, Direction::Forward)
          .map(|right| self.spans[right].start),
      },
    };
    match target {
      Some(target) if target != focus => {
        self.set_cursor(target);
        true
      },
      _ => false,
    }
  }

  pub fn move_to_start(&mut self) -> bool {
    let focus = self.cursor;
    self.set_cursor(0) != focus
  }

  pub fn move_to_end(&mut self) -> bool {
    let focus = self.cursor;
    self.set_cursor(usize::MAX) != focus
  }
}
