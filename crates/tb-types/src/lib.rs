#![forbid(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reserved literal marking a missing `Text` element.
pub const TEXT_MISSING: &str = "NaN";

/// Reserved value marking a missing `Integer` element.
pub const INTEGER_MISSING: i64 = i64::MIN;

const TEXT_MISSING_ALIASES: [&str; 5] = ["", "NaN", "nan", "null", "Null"];
const FALSE_LITERALS: [&str; 3] = ["false", "0", "f"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Text,
    Integer,
    Real,
    Boolean,
}

impl ElementKind {
    pub const ALL: [Self; 4] = [Self::Text, Self::Integer, Self::Real, Self::Boolean];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown element kind: {0:?}")]
pub struct UnknownKind(pub String);

impl FromStr for ElementKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "string" | "str" | "utf8" => Ok(Self::Text),
            "integer" | "int" | "i64" | "int64" => Ok(Self::Integer),
            "real" | "float" | "float64" | "f64" => Ok(Self::Real),
            "boolean" | "bool" => Ok(Self::Boolean),
            _ => Err(UnknownKind(s.to_owned())),
        }
    }
}

/// A scalar tagged with its kind.
///
/// Conversion between kinds never fails: anything that cannot be represented
/// in the target kind becomes that kind's missing sentinel (see
/// [`Element::missing`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Element {
    Text(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
}

impl Element {
    /// Missing sentinel for `kind`. `Boolean` has no missing state and yields `false`.
    #[must_use]
    pub fn missing(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Text => Self::Text(TEXT_MISSING.to_owned()),
            ElementKind::Integer => Self::Integer(INTEGER_MISSING),
            ElementKind::Real => Self::Real(f64::NAN),
            ElementKind::Boolean => Self::Boolean(false),
        }
    }

    /// Text element with missing-value aliases folded into the sentinel.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(normalize_text(value.into()))
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Text(_) => ElementKind::Text,
            Self::Integer(_) => ElementKind::Integer,
            Self::Real(_) => ElementKind::Real,
            Self::Boolean(_) => ElementKind::Boolean,
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Text(v) => v == TEXT_MISSING,
            Self::Integer(v) => *v == INTEGER_MISSING,
            Self::Real(v) => v.is_nan(),
            Self::Boolean(_) => false,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(v) => v.clone(),
            Self::Integer(v) => integer_to_text(*v),
            Self::Real(v) => real_to_text(*v),
            Self::Boolean(v) => v.to_string(),
        }
    }

    #[must_use]
    pub fn as_int(&self) -> i64 {
        match self {
            Self::Text(v) => text_to_integer(v),
            Self::Integer(v) => *v,
            Self::Real(v) => real_to_integer(*v),
            Self::Boolean(v) => i64::from(*v),
        }
    }

    #[must_use]
    pub fn as_real(&self) -> f64 {
        match self {
            Self::Text(v) => text_to_real(v),
            Self::Integer(v) => integer_to_real(*v),
            Self::Real(v) => *v,
            Self::Boolean(v) => {
                if *v {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Text(v) => text_to_bool(v),
            Self::Integer(v) => *v != INTEGER_MISSING && *v != 0,
            Self::Real(v) => !v.is_nan() && *v != 0.0,
            Self::Boolean(v) => *v,
        }
    }

    /// Convert through the natural representation of `self` into `kind`.
    #[must_use]
    pub fn convert(&self, kind: ElementKind) -> Self {
        match kind {
            ElementKind::Text => Self::text(self.as_text()),
            ElementKind::Integer => Self::Integer(self.as_int()),
            ElementKind::Real => Self::Real(self.as_real()),
            ElementKind::Boolean => Self::Boolean(self.as_bool()),
        }
    }

    /// Owned variant of [`Element::convert`]; avoids a clone when the kind already matches.
    #[must_use]
    pub fn into_kind(self, kind: ElementKind) -> Self {
        match self {
            Self::Text(v) if kind == ElementKind::Text => Self::text(v),
            other if other.kind() == kind => other,
            other => other.convert(kind),
        }
    }

    /// Replace the value, keeping this element's kind.
    pub fn set(&mut self, value: impl Into<Element>) {
        let kind = self.kind();
        *self = value.into().into_kind(kind);
    }

    /// Re-derive this element's value from `other`, keeping this element's kind.
    pub fn update(&mut self, other: &Element) {
        *self = other.convert(self.kind());
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

// ── Scalar conversions ─────────────────────────────────────────────────

fn normalize_text(value: String) -> String {
    if TEXT_MISSING_ALIASES.contains(&value.as_str()) {
        TEXT_MISSING.to_owned()
    } else {
        value
    }
}

fn integer_to_text(value: i64) -> String {
    if value == INTEGER_MISSING {
        TEXT_MISSING.to_owned()
    } else {
        value.to_string()
    }
}

fn real_to_text(value: f64) -> String {
    if value.is_nan() {
        TEXT_MISSING.to_owned()
    } else {
        // `Display` for f64 is the shortest round-trip form and never uses an exponent.
        value.to_string()
    }
}

fn text_to_integer(value: &str) -> i64 {
    if value == TEXT_MISSING {
        return INTEGER_MISSING;
    }
    value.parse::<i64>().unwrap_or_else(|_| {
        log::trace!("text {value:?} is not an integer; using the missing sentinel");
        INTEGER_MISSING
    })
}

fn text_to_real(value: &str) -> f64 {
    if value == TEXT_MISSING {
        return f64::NAN;
    }
    value.parse::<f64>().unwrap_or_else(|_| {
        log::trace!("text {value:?} is not a real number; using NaN");
        f64::NAN
    })
}

fn text_to_bool(value: &str) -> bool {
    !FALSE_LITERALS.contains(&value.to_ascii_lowercase().as_str())
}

fn real_to_integer(value: f64) -> i64 {
    if value.is_nan() {
        INTEGER_MISSING
    } else {
        // `as` truncates toward zero and saturates at the i64 bounds; the low
        // bound is the missing sentinel, so present values stop one above it.
        (value.trunc() as i64).max(INTEGER_MISSING + 1)
    }
}

fn integer_to_real(value: i64) -> f64 {
    if value == INTEGER_MISSING {
        f64::NAN
    } else {
        value as f64
    }
}

// ── Typed inputs ───────────────────────────────────────────────────────

mod sealed {
    pub trait Sealed {}

    impl Sealed for String {}
    impl Sealed for &str {}
    impl Sealed for i64 {}
    impl Sealed for i32 {}
    impl Sealed for f64 {}
    impl Sealed for bool {}
}

/// Rust primitives accepted wherever a column of a known kind is built.
pub trait ElementType: sealed::Sealed + Clone + Into<Element> {
    const KIND: ElementKind;
}

impl ElementType for String {
    const KIND: ElementKind = ElementKind::Text;
}

impl ElementType for &str {
    const KIND: ElementKind = ElementKind::Text;
}

impl ElementType for i64 {
    const KIND: ElementKind = ElementKind::Integer;
}

impl ElementType for i32 {
    const KIND: ElementKind = ElementKind::Integer;
}

impl ElementType for f64 {
    const KIND: ElementKind = ElementKind::Real;
}

impl ElementType for bool {
    const KIND: ElementKind = ElementKind::Boolean;
}

/// Storage representation of one kind; the buffer element type of a column.
pub trait NativeType: ElementType + PartialEq {
    /// Coerce any element into this storage type.
    fn from_element(element: &Element) -> Self;

    fn is_missing(&self) -> bool;
}

impl NativeType for String {
    fn from_element(element: &Element) -> Self {
        match element {
            Element::Text(v) => normalize_text(v.clone()),
            other => normalize_text(other.as_text()),
        }
    }

    fn is_missing(&self) -> bool {
        self == TEXT_MISSING
    }
}

impl NativeType for i64 {
    fn from_element(element: &Element) -> Self {
        element.as_int()
    }

    fn is_missing(&self) -> bool {
        *self == INTEGER_MISSING
    }
}

impl NativeType for f64 {
    fn from_element(element: &Element) -> Self {
        element.as_real()
    }

    fn is_missing(&self) -> bool {
        self.is_nan()
    }
}

impl NativeType for bool {
    fn from_element(element: &Element) -> Self {
        element.as_bool()
    }

    fn is_missing(&self) -> bool {
        false
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<&String> for Element {
    fn from(value: &String) -> Self {
        Self::text(value.as_str())
    }
}

impl From<i64> for Element {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Element {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Element {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for Element {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}
