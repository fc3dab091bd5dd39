//! Route Identifiers
//!
//! Novel and chapter ids arrive as raw route parameters. Everything
//! downstream only ever sees an `Identifier`; invalid input degrades to
//! `Identifier::INVALID` instead of failing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Non-negative integer key for a novel or chapter, `-1` when absent/invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier(i64);

impl Identifier {
    pub const INVALID: Identifier = Identifier(-1);

    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> i64 {
        self.0
    }

    /// Non-negative and small enough to be a key
    pub fn is_valid(self) -> bool {
        self.get().is_some()
    }

    /// The id as a chapter/novel key, `None` for the sentinel or any out-of-range value
    pub fn get(self) -> Option<u32> {
        u32::try_from(self.0).ok()
    }

    /// Validate a raw route parameter.
    pub fn from_param(param: RouteParam<'_>) -> Self {
        match param {
            RouteParam::Single(s) => parse_int_prefix(s).map(Self).unwrap_or(Self::INVALID),
            RouteParam::Repeated(_) | RouteParam::Absent => Self::INVALID,
        }
    }
}

impl Default for Identifier {
    fn default() -> Self {
        Self::INVALID
    }
}

impl From<u32> for Identifier {
    fn from(id: u32) -> Self {
        Self(i64::from(id))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A route parameter as the router hands it over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteParam<'a> {
    Absent,
    Single(&'a str),
    Repeated(&'a [String]),
}

impl<'a> From<Option<&'a str>> for RouteParam<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(RouteParam::Absent, RouteParam::Single)
    }
}

impl<'a> From<&'a str> for RouteParam<'a> {
    fn from(value: &'a str) -> Self {
        RouteParam::Single(value)
    }
}

impl<'a> From<&'a [String]> for RouteParam<'a> {
    fn from(value: &'a [String]) -> Self {
        RouteParam::Repeated(value)
    }
}

/// Base-10 integer prefix parse, browser `parseInt` style:
/// leading whitespace and one sign are skipped, parsing stops at the first
/// non-digit. No digits (or i64 overflow) yields `None`.
fn parse_int_prefix(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
