//! Chain configuration.
//!
//! A [`ChainConfig`] lists the fields of a chain and the knobs applied on
//! top of them (fractional digits, a numeric prefix, a maximum). It can be
//! written in code, taken from one of the built-in formats, or read from
//! TOML:
//!
//! ```toml
//! decimals = 2
//!
//! [[fields]]
//! kind = "sign"
//! negative = "S"
//! positive = "N"
//!
//! [[fields]]
//! kind = "integer"
//! range = 90
//!
//! [[fields]]
//! kind = "constant"
//! text = "°"
//! ```

use serde::{
  Deserialize,
  Serialize,
};
use the_core::chars::char_eq_ignore_case;
use thiserror::Error;

use crate::{
  chain::{
    self,
    ChainError,
  },
  field::{
    ConstantField,
    Field,
    IntegerField,
    SignField,
  },
};

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
  #[error("failed to parse chain config: {0}")]
  Parse(#[from] toml::de::Error),
  #[error("invalid chain config: {0}")]
  Chain(#[from] ChainError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldSpec {
  Sign {
    negative: char,
    positive: char,
  },
  Integer {
    range:   i64,
    #[serde(default = "default_divisor")]
    divisor: i64,
    #[serde(default = "default_carry")]
    carry:   bool,
  },
  Constant {
    text: String,
  },
}

fn default_divisor() -> i64 {
  1
}

fn default_carry() -> bool {
  true
}

fn default_decimal_separator() -> char {
  '.'
}

impl FieldSpec {
  pub fn sign(negative: char, positive: char) -> Self {
    Self::Sign { negative, positive }
  }

  /// A carrying integer in `[-range, range]` worth `value / divisor`.
  pub fn integer(range: i64, divisor: i64) -> Self {
    Self::Integer {
      range,
      divisor,
      carry: true,
    }
  }

  pub fn constant(text: impl Into<String>) -> Self {
    Self::Constant { text: text.into() }
  }

  /// Integers saturate instead of carrying into their left neighbour.
  pub fn without_carry(self) -> Self {
    match self {
      Self::Integer { range, divisor, .. } => Self::Integer {
        range,
        divisor,
        carry: false,
      },
      other => other,
    }
  }

  pub(crate) fn to_field(&self, index: usize) -> chain::Result<Field> {
    match self {
      Self::Sign { negative, positive } => {
        if char_eq_ignore_case(*negative, *positive) {
          return Err(ChainError::AmbiguousSign {
            negative: *negative,
            positive: *positive,
          });
        }
        Ok(Field::Sign(SignField::new(*negative, *positive)))
      },
      Self::Integer {
        range,
        divisor,
        carry,
      } => {
        if *range <= 0 {
          return Err(ChainError::InvalidRange {
            index,
            range: *range,
          });
        }
        if *divisor <= 0 {
          return Err(ChainError::InvalidDivisor {
            index,
            divisor: *divisor,
          });
        }
        Ok(Field::Integer(IntegerField::new(*range, *divisor, *carry)))
      },
      Self::Constant { text } => {
        if text.is_empty() {
          return Err(ChainError::EmptyConstant { index });
        }
        Ok(Field::Constant(ConstantField::new(text)))
      },
    }
  }
}

/// A numeric prefix field inserted before the first integer, such as a
/// country code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixSpec {
  pub digits:    u32,
  pub separator: String,
}

impl PrefixSpec {
  pub fn new(digits: u32, separator: impl Into<String>) -> Self {
    Self {
      digits,
      separator: separator.into(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
  pub fields:               Vec<FieldSpec>,
  /// Fractional digits appended after the last integer.
  #[serde(default)]
  pub decimals:             u32,
  #[serde(default = "default_decimal_separator")]
  pub decimal_separator:    char,
  #[serde(default)]
  pub prefix:               Option<PrefixSpec>,
  /// Overrides the leading integer's range as the largest absolute value.
  #[serde(default)]
  pub maximum:              Option<i64>,
  /// Derive the leading integer's range from `decimals` so that the value
  /// never needs more precision than an `f64` holds.
  #[serde(default)]
  pub bounded_by_precision: bool,
}

impl ChainConfig {
  pub fn new(fields: Vec<FieldSpec>) -> Self {
    Self {
      fields,
      decimals: 0,
      decimal_separator: default_decimal_separator(),
      prefix: None,
      maximum: None,
      bounded_by_precision: false,
    }
  }

  pub fn with_decimals(mut self, decimals: u32) -> Self {
    self.decimals = decimals;
    self
  }

  pub fn with_prefix(mut self, prefix: PrefixSpec) -> Self {
    self.prefix = Some(prefix);
    self
  }

  pub fn with_maximum(mut self, maximum: i64) -> Self {
    self.maximum = Some(maximum);
    self
  }

  pub fn from_toml(text: &str) -> Result<Self> {
    let config: Self = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> chain::Result<()> {
    chain::validate(self)
  }

  /// `N45°30'30''`
  pub fn latitude(decimals: u32) -> Self {
    Self::degrees('S', 'N', 90).with_decimals(decimals)
  }

  /// `E122°15'00''`
  pub fn longitude(decimals: u32) -> Self {
    Self::degrees('W', 'E', 180).with_decimals(decimals)
  }

  fn degrees(negative: char, positive: char, range: i64) -> Self {
    Self::new(vec![
      FieldSpec::sign(negative, positive),
      FieldSpec::integer(range, 1),
      FieldSpec::constant("°"),
      FieldSpec::integer(59, 60),
      FieldSpec::constant("'"),
      FieldSpec::integer(59, 3600),
      FieldSpec::constant("''"),
    ])
  }

  /// `+00000000012.50`
  pub fn signed_decimal(decimals: u32) -> Self {
    Self {
      bounded_by_precision: true,
      ..Self::new(vec![FieldSpec::sign('-', '+'), FieldSpec::integer(1, 1)]).with_decimals(decimals)
    }
  }

  pub fn unsigned_decimal(decimals: u32) -> Self {
    Self {
      bounded_by_precision: true,
      ..Self::new(vec![FieldSpec::integer(1, 1)]).with_decimals(decimals)
    }
  }

  /// `555-010-9999`, optionally with a country code of `country_code` digits
  /// in front.
  pub fn phone_number(country_code: Option<u32>) -> Self {
    let mut config = Self::new(vec![
      FieldSpec::integer(999, 1).without_carry(),
      FieldSpec::constant("-"),
      FieldSpec::integer(999, 1).without_carry(),
      FieldSpec::constant("-"),
      FieldSpec::integer(9999, 1).without_carry(),
    ])
    .with_maximum(9_999_999_999);
    config.prefix = country_code.map(|digits| PrefixSpec::new(digits, "-"));
    config
  }
}
