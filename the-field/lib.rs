//! Segmented numeric text editing.
//!
//! A [`FieldChain`] renders a number as a fixed-width line of text made of
//! typed fields, for example `N45°30'30.00''` or `555-010-9999`, and edits
//! it one digit at a time. Stepping a digit past its field's range carries
//! into the field on the left, the sign field governs the polarity of every
//! integer, and a decimal value can be written in and read back without
//! losing the precision the text cannot show.
//!
//! ```
//! use the_field::{ChainConfig, FieldChain, Key};
//!
//! let mut chain = FieldChain::new(ChainConfig::latitude(0)).unwrap();
//! chain.from_value(-45.5083333);
//! assert_eq!(chain.rendered_text(), "S45°30'30''");
//!
//! chain.set_cursor(8);
//! chain.handle_key(Key::Down);
//! assert_eq!(chain.rendered_text(), "S45°30'31''");
//! ```

use smartstring::{LazyCompact, SmartString};

pub mod carry;
pub mod chain;
pub mod config;
pub mod cursor;
pub mod field;
pub mod input;
pub mod value;

pub use chain::{
  ChainError,
  FieldChain,
  Notification,
};
pub use config::{
  ChainConfig,
  FieldSpec,
  PrefixSpec,
};
pub use field::EditError;
pub use input::Key;

pub type Tendril = SmartString<LazyCompact>;
