//! Format strategies that convert values to display text and back.
//!
//! Text fields and formatted steppers take a [`ParseableFormat`]. The library
//! ships a few simple strategies; anything locale-aware belongs in the
//! application and only needs to implement the trait.

use crate::error::ParseError;
use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;

/// Converts values of [`Input`](Self::Input) to text and parses text back.
///
/// For every value `x` the format accepts, `parse(&format(&x))` should yield
/// `x` (or the value `x` rounds to, for lossy formats).
pub trait ParseableFormat: Send + Sync + 'static {
    /// The value type being formatted.
    type Input: Clone + Send + Sync + 'static;

    /// Render `value` as text.
    fn format(&self, value: &Self::Input) -> String;

    /// Parse `text` into a value.
    fn parse(&self, text: &str) -> Result<Self::Input, ParseError>;
}

/// The identity format for plain strings. Parsing never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFormat;

impl ParseableFormat for IdentityFormat {
    type Input = String;

    fn format(&self, value: &String) -> String {
        value.clone()
    }

    fn parse(&self, text: &str) -> Result<String, ParseError> {
        Ok(text.to_string())
    }
}

/// Formats any `Display + FromStr` type using those impls.
///
/// Surrounding whitespace is ignored when parsing; empty input is
/// [`ParseError::Empty`].
pub struct NumberFormat<T> {
    expected: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> NumberFormat<T> {
    /// A format whose errors describe the accepted input as `expected`.
    pub fn new(expected: &'static str) -> Self {
        Self {
            expected,
            _marker: PhantomData,
        }
    }
}

impl<T> Default for NumberFormat<T> {
    fn default() -> Self {
        Self::new("number")
    }
}

impl<T> Clone for NumberFormat<T> {
    fn clone(&self) -> Self {
        Self::new(self.expected)
    }
}

impl<T> ParseableFormat for NumberFormat<T>
where
    T: Display + FromStr + Clone + Send + Sync + 'static,
{
    type Input = T;

    fn format(&self, value: &T) -> String {
        value.to_string()
    }

    fn parse(&self, text: &str) -> Result<T, ParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }
        trimmed.parse().map_err(|_| ParseError::Invalid {
            input: text.to_string(),
            expected: self.expected,
        })
    }
}

/// Fixed-precision decimal format for `f64`.
///
/// Formatting rounds to `precision` fractional digits, so a value run
/// through `parse(format(x))` is snapped to that precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalFormat {
    precision: usize,
}

impl DecimalFormat {
    /// A format with `precision` fractional digits.
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }

    /// Number of fractional digits.
    pub fn precision(&self) -> usize {
        self.precision
    }
}

impl Default for DecimalFormat {
    fn default() -> Self {
        Self::new(2)
    }
}

impl ParseableFormat for DecimalFormat {
    type Input = f64;

    fn format(&self, value: &f64) -> String {
        format!("{:.*}", self.precision, value)
    }

    fn parse(&self, text: &str) -> Result<f64, ParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ParseError::Invalid {
                input: text.to_string(),
                expected: "decimal number",
            }),
        }
    }
}
