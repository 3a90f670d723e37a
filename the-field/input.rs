//! Primitive key input.
//!
//! Hosts translate their own key events into [`Key`] and feed them to
//! [`FieldChain::handle_key`]. Modifier handling, clipboard access and focus
//! stay with the host.

use std::cmp::Ordering;

use crate::{
  chain::FieldChain,
  cursor::Direction,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
  Up,
  Down,
  Left,
  Right,
  Backspace,
  Delete,
  Home,
  End,
  Char(char),
}

impl FieldChain {
  /// Applies one key press. Returns whether the text or the cursor changed.
  pub fn handle_key(&mut self, key: Key) -> bool {
    match key {
      Key::Up => self.increment(),
      Key::Down => self.decrement(),
      Key::Left => self.seek(Direction::Backward),
      Key::Right => self.seek(Direction::Forward),
      Key::Backspace => self.erase(Direction::Backward),
      Key::Delete => self.erase(Direction::Forward),
      Key::Home => self.move_to_start(),
      Key::End => self.move_to_end(),
      Key::Char(ch) => {
        let typed = self.set_digit_at(ch, self.cursor());
        if typed {
          self.seek(Direction::Forward);
        }
        typed
      },
    }
  }

  /// Wheel or trackpad scroll. Positive deltas increment.
  pub fn scroll(&mut self, delta: i32) -> bool {
    match delta.cmp(&0) {
      Ordering::Greater => self.increment(),
      Ordering::Less => self.decrement(),
      Ordering::Equal => false,
    }
  }

  /// Zeroes the digit under the cursor, then moves.
  fn erase(&mut self, direction: Direction) -> bool {
    let erased = self.set_digit_at('0', self.cursor());
    let moved = self.seek(direction);
    erased || moved
  }
}
