//! Result line classification.
//!
//! The calculator answers with a decimal number or one of the error tokens
//! `ERR` and `DIV0`. Everything else it prints (boot banners, `READY`,
//! debug output) is noise and must not be mistaken for an answer.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Optional sign, at least one digit, optional point with trailing digits.
static NUMERIC_GRAMMAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-]?)([0-9]+)(?:\.([0-9]*))?$").expect("numeric grammar regex is valid")
});

/// Explicit sign in front of a numeric result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

/// Error tokens the device reports instead of a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// The device could not parse or evaluate the request.
    Err,
    /// Division by zero.
    Div0,
}

impl DeviceError {
    /// Wire form of the token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Err => "ERR",
            Self::Div0 => "DIV0",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "ERR" => Some(Self::Err),
            "DIV0" => Some(Self::Div0),
            _ => None,
        }
    }
}

/// Structured form of an accepted result line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultValue {
    /// A number, kept as the digit strings the device sent.
    Numeric {
        sign: Option<Sign>,
        integer: String,
        /// Digits after the point; `Some("")` for a trailing point such as `5.`.
        fraction: Option<String>,
    },
    /// One of the device error tokens.
    Error(DeviceError),
}

/// A candidate line accepted as a genuine protocol response.
///
/// Displays exactly as received; nothing is normalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLine {
    text: String,
    value: ResultValue,
}

impl ResultLine {
    /// The line as received, after trimming.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> &ResultValue {
        &self.value
    }

    /// True for `ERR` and `DIV0`.
    pub fn is_device_error(&self) -> bool {
        matches!(self.value, ResultValue::Error(_))
    }
}

impl fmt::Display for ResultLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Classify a trimmed candidate line.
///
/// Returns `None` for anything that is not a complete result line.
pub fn classify(line: &str) -> Option<ResultLine> {
    if let Some(code) = DeviceError::from_token(line) {
        return Some(ResultLine {
            text: line.to_string(),
            value: ResultValue::Error(code),
        });
    }

    let caps = NUMERIC_GRAMMAR.captures(line)?;
    let sign = match caps.get(1).map(|m| m.as_str()) {
        Some("+") => Some(Sign::Plus),
        Some("-") => Some(Sign::Minus),
        _ => None,
    };
    Some(ResultLine {
        text: line.to_string(),
        value: ResultValue::Numeric {
            sign,
            integer: caps[2].to_string(),
            fraction: caps.get(3).map(|m| m.as_str().to_string()),
        },
    })
}

/// True iff `line` is a valid result line.
pub fn is_result_line(line: &str) -> bool {
    DeviceError::from_token(line).is_some() || NUMERIC_GRAMMAR.is_match(line)
}
