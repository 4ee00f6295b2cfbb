//! Typed grep patterns.
//!
//! A pattern holds up to four typed sub-patterns plus an optional key filter.
//! A record matches if any set sub-pattern matches any value the key filter
//! authorizes.

use memchr::memmem::Finder;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    /// Whole-string, byte-exact equality.
    Exact,
    /// Occurrence anywhere in the string.
    Substring,
}

/// String sub-pattern with a prebuilt substring searcher.
#[derive(Clone, Debug)]
pub struct StringPattern {
    text: String,
    mode: MatchMode,
    finder: Finder<'static>,
}

impl StringPattern {
    pub fn new(text: impl Into<String>, mode: MatchMode) -> Self {
        let text = text.into();
        let finder = Finder::new(text.as_bytes()).into_owned();
        Self { text, mode, finder }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    #[inline]
    pub fn matches(&self, s: &str) -> bool {
        match self.mode {
            MatchMode::Exact => self.text == s,
            MatchMode::Substring => self.finder.find(s.as_bytes()).is_some(),
        }
    }
}

/// Compiled grep query. Immutable once built.
#[derive(Clone, Debug, Default)]
pub struct Pattern {
    key: Option<String>,
    string: Option<StringPattern>,
    signed: Option<i64>,
    unsigned: Option<u64>,
    double: Option<f64>,
}

impl Pattern {
    pub fn builder() -> PatternBuilder {
        PatternBuilder::default()
    }

    /// Build a pattern from command-line style input.
    ///
    /// With no type selected, the string sub-pattern is always set and every
    /// numeric sub-pattern the literal parses as is added. An explicitly
    /// selected numeric type must parse.
    pub fn from_literal(
        literal: &str,
        key: Option<&str>,
        selection: TypeSelection,
    ) -> Result<Self, PatternError> {
        if selection.substring && (selection.integer || selection.double) {
            return Err(PatternError::SubstringConflict);
        }

        let mut builder = Pattern::builder();
        if let Some(key) = key {
            builder = builder.key(key);
        }

        let default = selection.is_default();
        if default || selection.string || selection.substring {
            let mode = if selection.substring {
                MatchMode::Substring
            } else {
                MatchMode::Exact
            };
            builder = builder.string(literal, mode);
        }

        if default || selection.integer {
            let signed = parse_signed(literal);
            let unsigned = parse_unsigned(literal);
            if signed.is_none() && unsigned.is_none() && selection.integer {
                return Err(PatternError::NotAnInteger(literal.to_owned()));
            }
            builder.pattern.signed = signed;
            builder.pattern.unsigned = unsigned;
        }

        if default || selection.double {
            let double = parse_double(literal);
            if double.is_none() && selection.double {
                return Err(PatternError::NotADouble(literal.to_owned()));
            }
            builder.pattern.double = double;
        }

        Ok(builder.build())
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn string(&self) -> Option<&StringPattern> {
        self.string.as_ref()
    }

    pub fn signed(&self) -> Option<i64> {
        self.signed
    }

    pub fn unsigned(&self) -> Option<u64> {
        self.unsigned
    }

    pub fn double(&self) -> Option<f64> {
        self.double
    }

    /// True when no typed sub-pattern is set, so nothing can match.
    pub fn is_empty(&self) -> bool {
        self.string.is_none()
            && self.signed.is_none()
            && self.unsigned.is_none()
            && self.double.is_none()
    }
}

#[derive(Default)]
pub struct PatternBuilder {
    pattern: Pattern,
}

impl PatternBuilder {
    /// Only match values under this object key, at any depth below it.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.pattern.key = Some(key.into());
        self
    }

    pub fn string(mut self, text: impl Into<String>, mode: MatchMode) -> Self {
        self.pattern.string = Some(StringPattern::new(text, mode));
        self
    }

    pub fn exact(self, text: impl Into<String>) -> Self {
        self.string(text, MatchMode::Exact)
    }

    pub fn substring(self, text: impl Into<String>) -> Self {
        self.string(text, MatchMode::Substring)
    }

    pub fn signed(mut self, value: i64) -> Self {
        self.pattern.signed = Some(value);
        self
    }

    pub fn unsigned(mut self, value: u64) -> Self {
        self.pattern.unsigned = Some(value);
        self
    }

    pub fn double(mut self, value: f64) -> Self {
        self.pattern.double = Some(value);
        self
    }

    pub fn build(self) -> Pattern {
        self.pattern
    }
}

/// Which interpretations of the literal were requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TypeSelection {
    pub integer: bool,
    pub double: bool,
    pub string: bool,
    /// Substring string matching; implies `string`.
    pub substring: bool,
}

impl TypeSelection {
    /// No explicit type: try every interpretation.
    pub fn is_default(&self) -> bool {
        !(self.integer || self.double || self.string || self.substring)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("-i specified, but pattern '{0}' is not an integer.")]
    NotAnInteger(String),
    #[error("-d specified, but pattern '{0}' is not a double-precision number.")]
    NotADouble(String),
    #[error("-u cannot be combined with -i or -d")]
    SubstringConflict,
}

fn starts_with_digit(literal: &str) -> bool {
    literal.as_bytes().first().is_some_and(u8::is_ascii_digit)
}

fn parse_signed(literal: &str) -> Option<i64> {
    literal.parse().ok()
}

/// Negative literals are never unsigned, even `-0`.
fn parse_unsigned(literal: &str) -> Option<u64> {
    if !starts_with_digit(literal) {
        return None;
    }
    literal.parse().ok()
}

/// Decimal or `0x` hexadecimal literal starting with a digit.
///
/// Results out of range are rejected: overflow to infinity, and underflow to
/// zero or a subnormal from a mantissa that is not zero.
fn parse_double(literal: &str) -> Option<f64> {
    if !starts_with_digit(literal) {
        return None;
    }
    let (value, nonzero_mantissa) = match literal
        .strip_prefix("0x")
        .or_else(|| literal.strip_prefix("0X"))
    {
        Some(hex) => parse_hex_double(hex)?,
        None => {
            let value = literal.parse::<f64>().ok()?;
            let mantissa = literal.split(['e', 'E']).next().unwrap_or(literal);
            (value, mantissa.bytes().any(|b| matches!(b, b'1'..=b'9')))
        }
    };

    let in_range = if value == 0.0 {
        !nonzero_mantissa
    } else {
        value.is_normal()
    };
    in_range.then_some(value)
}

/// Hex digits with an optional point, then an optional binary exponent
/// `p[+-]N`. Returns the value and whether any mantissa digit was non-zero.
fn parse_hex_double(hex: &str) -> Option<(f64, bool)> {
    let (mantissa, exponent) = match hex.find(['p', 'P']) {
        Some(at) => (&hex[..at], hex[at + 1..].parse::<i32>().ok()?),
        None => (hex, 0),
    };
    let (int_digits, frac_digits) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    // Keep the leading 60 bits; later digits only shift the scale.
    let mut bits: u64 = 0;
    let mut scale = i64::from(exponent);
    let mut nonzero = false;
    for (i, byte) in int_digits.bytes().chain(frac_digits.bytes()).enumerate() {
        let digit = u64::from(char::from(byte).to_digit(16)?);
        nonzero |= digit != 0;
        let fractional = i >= int_digits.len();
        if bits >> 56 == 0 {
            bits = bits << 4 | digit;
            if fractional {
                scale -= 4;
            }
        } else if !fractional {
            scale += 4;
        }
    }

    if !nonzero {
        return Some((0.0, false));
    }
    let scale = i32::try_from(scale.clamp(-4000, 4000)).ok()?;
    let half = scale / 2;
    let value = bits as f64 * 2f64.powi(half) * 2f64.powi(scale - half);
    Some((value, nonzero))
}
