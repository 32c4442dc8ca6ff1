//! Fixed-point lengths.
//!
//! Every length and kerf in the crate is a [`Length`]: an `i64` count of
//! micro-units (six decimal places). Fractional shop notation (`1/8`,
//! `3 1/2`) and decimal notation (`0.125`) land on the same integer, so fit
//! decisions never depend on floating point rounding. One micro-unit is the
//! comparison epsilon.

use crate::error::{CfResult, CutForgeError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Length(i64);

impl Length {
    pub const DECIMALS: usize = 6;
    pub const SCALE: i64 = 1_000_000;
    pub const ZERO: Length = Length(0);

    pub const fn from_micros(micros: i64) -> Self {
        Length(micros)
    }

    pub const fn from_whole(units: i64) -> Self {
        Length(units.saturating_mul(Self::SCALE))
    }

    /// Converts a numeric cell value, rounding to the nearest micro-unit.
    pub fn from_f64(value: f64) -> CfResult<Self> {
        if !value.is_finite() {
            return Err(CutForgeError::Parse(format!(
                "Length '{}' is not a finite number",
                value
            )));
        }
        if value < 0.0 {
            return Err(CutForgeError::Parse(format!(
                "Length '{}' cannot be negative",
                value
            )));
        }
        let micros = (value * Self::SCALE as f64).round();
        if micros >= i64::MAX as f64 {
            return Err(CutForgeError::Parse(format!(
                "Length '{}' is too large",
                value
            )));
        }
        Ok(Length(micros as i64))
    }

    pub const fn micros(self) -> i64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// `self * n`, saturating.
    pub fn times(self, n: usize) -> Self {
        let n = i64::try_from(n).unwrap_or(i64::MAX);
        Length(self.0.saturating_mul(n))
    }

    /// `self / other` as a plain ratio. Zero when `other` is zero.
    pub fn ratio(self, other: Length) -> f64 {
        if other.0 == 0 {
            0.0
        } else {
            self.0 as f64 / other.0 as f64
        }
    }
}

impl Add for Length {
    type Output = Length;

    fn add(self, rhs: Length) -> Length {
        Length(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Length {
    fn add_assign(&mut self, rhs: Length) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Length {
    type Output = Length;

    fn sub(self, rhs: Length) -> Length {
        Length(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Length {
    fn sum<I: Iterator<Item = Length>>(iter: I) -> Length {
        iter.fold(Length::ZERO, |acc, l| acc + l)
    }
}

impl<'a> Sum<&'a Length> for Length {
    fn sum<I: Iterator<Item = &'a Length>>(iter: I) -> Length {
        iter.copied().sum()
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = Self::SCALE as u64;
        let whole = abs / scale;
        let frac = abs % scale;
        if frac == 0 {
            write!(f, "{}{}", sign, whole)
        } else {
            let digits = format!("{:06}", frac);
            write!(f, "{}{}.{}", sign, whole, digits.trim_end_matches('0'))
        }
    }
}

impl FromStr for Length {
    type Err = CutForgeError;

    fn from_str(s: &str) -> CfResult<Self> {
        parse_length(s)
    }
}

impl Serialize for Length {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Length {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(f64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => parse_length(&s).map_err(serde::de::Error::custom),
            Raw::Number(n) => Length::from_f64(n).map_err(serde::de::Error::custom),
        }
    }
}

fn invalid(text: &str) -> CutForgeError {
    CutForgeError::Parse(format!(
        "Invalid length '{}'. Use a decimal like 0.125 or a fraction like 1/8.",
        text
    ))
}

/// Parses decimal (`0.125`), fractional (`1/8`) or mixed (`3 1/2`, `3-1/2`)
/// notation.
pub fn parse_length(text: &str) -> CfResult<Length> {
    let t = text.trim();
    if t.is_empty() {
        return Err(CutForgeError::Parse("Length value is required.".into()));
    }
    if t.starts_with('-') {
        return Err(CutForgeError::Parse(format!(
            "Length '{}' cannot be negative",
            t
        )));
    }

    let micros = match t.split_once('/') {
        Some((head, den)) => {
            let (whole, num) = split_mixed(head);
            let den = parse_decimal(den, t)?;
            if den == 0 {
                return Err(CutForgeError::Parse(format!(
                    "Length '{}' divides by zero",
                    t
                )));
            }
            let num = parse_decimal(num, t)?;
            let frac = divide_round(num, den).ok_or_else(|| invalid(t))?;
            let whole = match whole {
                Some(w) => parse_decimal(w, t)?,
                None => 0,
            };
            whole.checked_add(frac).ok_or_else(|| invalid(t))?
        }
        None => parse_decimal(t, t)?,
    };

    Ok(Length(micros))
}

/// Kerf may be zero; the error names the setting rather than the value.
pub fn parse_kerf(text: &str) -> CfResult<Length> {
    if text.trim().is_empty() {
        return Err(CutForgeError::Parse("Kerf width is required.".into()));
    }
    parse_length(text).map_err(|_| {
        CutForgeError::Parse(format!(
            "Invalid kerf '{}'. Use decimal like 0.125 or fraction like 1/8.",
            text.trim()
        ))
    })
}

/// Splits the whole-number part off `3 1` or `3-1`.
fn split_mixed(head: &str) -> (Option<&str>, &str) {
    let head = head.trim();
    if let Some((whole, num)) = head.rsplit_once(char::is_whitespace) {
        return (Some(whole), num);
    }
    match head.rsplit_once('-') {
        Some((whole, num)) if !whole.is_empty() => (Some(whole), num),
        _ => (None, head),
    }
}

/// Unsigned decimal to micro-units, half-up rounding past the sixth place.
fn parse_decimal(token: &str, original: &str) -> CfResult<i64> {
    let token = token.trim();
    let token = token.strip_prefix('+').unwrap_or(token);
    if token.starts_with('-') {
        return Err(CutForgeError::Parse(format!(
            "Length '{}' cannot be negative",
            original
        )));
    }

    let (int_part, frac_part) = token.split_once('.').unwrap_or((token, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part)
    {
        return Err(invalid(original));
    }

    let mut whole: i64 = 0;
    for b in int_part.bytes() {
        whole = whole
            .checked_mul(10)
            .and_then(|w| w.checked_add(i64::from(b - b'0')))
            .ok_or_else(|| invalid(original))?;
    }

    let digits = frac_part.as_bytes();
    let mut frac: i64 = 0;
    for i in 0..Length::DECIMALS {
        let d = digits.get(i).map_or(0, |b| i64::from(b - b'0'));
        frac = frac * 10 + d;
    }
    if digits.get(Length::DECIMALS).is_some_and(|b| *b >= b'5') {
        frac += 1;
    }

    whole
        .checked_mul(Length::SCALE)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(|| invalid(original))
}

/// `num / den` in micro-units, both operands already in micro-units.
fn divide_round(num: i64, den: i64) -> Option<i64> {
    let num = i128::from(num) * i128::from(Length::SCALE);
    let den = i128::from(den);
    i64::try_from((num * 2 + den) / (den * 2)).ok()
}
