#![forbid(unsafe_code)]

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tb_types::{Element, ElementKind, ElementType, NativeType};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColumnError {
    #[error("expected {expected} values but found {found}")]
    TypeMismatch {
        expected: ElementKind,
        found: ElementKind,
    },
    #[error("operator '{op}' is not supported for {kind} columns")]
    UnsupportedOperator { op: Operator, kind: ElementKind },
    #[error("{kind} columns cannot be sorted")]
    UnsortableKind { kind: ElementKind },
    #[error("operator '{op}' requires a {expected} operand")]
    OperandShape { op: Operator, expected: &'static str },
    #[error("position {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Runs `$body` against the typed buffer of any variant.
macro_rules! with_buffer {
    ($data:expr, $buf:ident => $body:expr) => {
        match $data {
            ColumnData::Text($buf) => $body,
            ColumnData::Integer($buf) => $body,
            ColumnData::Real($buf) => $body,
            ColumnData::Boolean($buf) => $body,
        }
    };
}

/// Like `with_buffer!`, but rewraps the produced buffer in the same variant.
macro_rules! map_buffer {
    ($data:expr, $buf:ident => $body:expr) => {
        match $data {
            ColumnData::Text($buf) => ColumnData::Text($body),
            ColumnData::Integer($buf) => ColumnData::Integer($body),
            ColumnData::Real($buf) => ColumnData::Real($body),
            ColumnData::Boolean($buf) => ColumnData::Boolean($body),
        }
    };
}

/// Homogeneous column storage: one contiguous buffer per kind.
///
/// Elements are addressed by position only; callers never hold references
/// into the buffer across a mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ColumnData {
    Text(Vec<String>),
    Integer(Vec<i64>),
    Real(Vec<f64>),
    Boolean(Vec<bool>),
}

impl ColumnData {
    #[must_use]
    pub fn empty(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Text => Self::Text(Vec::new()),
            ElementKind::Integer => Self::Integer(Vec::new()),
            ElementKind::Real => Self::Real(Vec::new()),
            ElementKind::Boolean => Self::Boolean(Vec::new()),
        }
    }

    /// Build a column of `kind`, coercing every element into it.
    pub fn from_elements<'a, I>(kind: ElementKind, elements: I) -> Self
    where
        I: IntoIterator<Item = &'a Element>,
    {
        let mut data = Self::empty(kind);
        data.extend(elements);
        data
    }

    /// Build a column of `kind` from text records, coercing each one.
    pub fn from_records<I, S>(kind: ElementKind, records: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut data = Self::empty(kind);
        for record in records {
            data.push(&Element::text(record.as_ref()));
        }
        data
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
    pub fn len(&self) -> usize {
        with_buffer!(self, buf => buf.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<Element> {
        with_buffer!(self, buf => buf.get(position).cloned().map(Into::into))
    }

    pub fn iter(&self) -> impl Iterator<Item = Element> + '_ {
        (0..self.len()).filter_map(move |position| self.get(position))
    }

    #[must_use]
    pub fn elements(&self) -> Vec<Element> {
        self.iter().collect()
    }

    /// Overwrite one slot, coercing `value` into the column's kind.
    pub fn set(&mut self, position: usize, value: &Element) -> Result<(), ColumnError> {
        let len = self.len();
        with_buffer!(self, buf => {
            let slot = buf
                .get_mut(position)
                .ok_or(ColumnError::IndexOutOfRange { index: position, len })?;
            *slot = NativeType::from_element(value);
        });
        Ok(())
    }

    pub fn push(&mut self, value: &Element) {
        with_buffer!(self, buf => buf.push(NativeType::from_element(value)));
    }

    pub fn extend<'a, I>(&mut self, values: I)
    where
        I: IntoIterator<Item = &'a Element>,
    {
        for value in values {
            self.push(value);
        }
    }

    /// Insert `values` so that the first one lands at `at`.
    pub fn insert(&mut self, at: usize, values: &[Element]) -> Result<(), ColumnError> {
        let len = self.len();
        if at > len {
            return Err(ColumnError::IndexOutOfRange { index: at, len });
        }
        with_buffer!(self, buf => {
            let converted = values.iter().map(NativeType::from_element).collect::<Vec<_>>();
            buf.splice(at..at, converted);
        });
        Ok(())
    }

    /// Remove the given positions. Duplicates are ignored; removal runs from
    /// the highest position down so earlier positions stay valid.
    pub fn remove_positions(&mut self, positions: &[usize]) -> Result<(), ColumnError> {
        let len = self.len();
        if let Some(&bad) = positions.iter().find(|&&position| position >= len) {
            return Err(ColumnError::IndexOutOfRange { index: bad, len });
        }
        let mut ordered = positions.to_vec();
        ordered.sort_unstable_by(|a, b| b.cmp(a));
        ordered.dedup();
        with_buffer!(self, buf => {
            for position in ordered {
                buf.remove(position);
            }
        });
        Ok(())
    }

    /// Copy the requested positions, in the requested order.
    pub fn take(&self, positions: &[usize]) -> Result<Self, ColumnError> {
        let len = self.len();
        if let Some(&bad) = positions.iter().find(|&&position| position >= len) {
            return Err(ColumnError::IndexOutOfRange { index: bad, len });
        }
        Ok(map_buffer!(self, buf => take_positions(buf, positions)))
    }

    /// Keep the first `len` elements.
    pub fn truncate(&mut self, len: usize) {
        with_buffer!(self, buf => buf.truncate(len));
    }

    /// Append every element of `other`, converted into this column's kind.
    pub fn append_column(&mut self, other: &Self) {
        for element in other.iter() {
            self.push(&element);
        }
    }

    /// Rebuild the column as `kind`, converting each element through its
    /// natural representation.
    #[must_use]
    pub fn convert(&self, kind: ElementKind) -> Self {
        if self.kind() == kind {
            return self.clone();
        }
        let mut out = Self::empty(kind);
        for element in self.iter() {
            out.push(&element);
        }
        out
    }

    #[must_use]
    pub fn has_missing(&self) -> bool {
        with_buffer!(self, buf => buf.iter().any(NativeType::is_missing))
    }

    #[must_use]
    pub fn records(&self) -> Vec<String> {
        self.iter().map(|element| element.as_text()).collect()
    }

    #[must_use]
    pub fn to_ints(&self) -> Vec<i64> {
        self.iter().map(|element| element.as_int()).collect()
    }

    #[must_use]
    pub fn to_reals(&self) -> Vec<f64> {
        self.iter().map(|element| element.as_real()).collect()
    }

    #[must_use]
    pub fn to_bools(&self) -> Vec<bool> {
        self.iter().map(|element| element.as_bool()).collect()
    }
}

fn take_positions<T: Clone>(buf: &[T], positions: &[usize]) -> Vec<T> {
    positions.iter().map(|&position| buf[position].clone()).collect()
}

impl<T: ElementType> From<Vec<T>> for ColumnData {
    fn from(values: Vec<T>) -> Self {
        let elements = values.into_iter().map(Into::into).collect::<Vec<Element>>();
        Self::from_elements(T::KIND, &elements)
    }
}

/// A scalar or a list of scalars: the payload of appends, inserts and
/// filter operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Values {
    One(Element),
    Many(Vec<Element>),
}

impl Values {
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::Many(_))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Element] {
        match self {
            Self::One(element) => std::slice::from_ref(element),
            Self::Many(elements) => elements,
        }
    }

    #[must_use]
    pub fn into_elements(self) -> Vec<Element> {
        match self {
            Self::One(element) => vec![element],
            Self::Many(elements) => elements,
        }
    }

    /// Every element must already be of `kind`.
    pub fn ensure_kind(&self, kind: ElementKind) -> Result<(), ColumnError> {
        match self.as_slice().iter().find(|element| element.kind() != kind) {
            Some(element) => Err(ColumnError::TypeMismatch {
                expected: kind,
                found: element.kind(),
            }),
            None => Ok(()),
        }
    }
}

macro_rules! impl_values_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Values {
                fn from(value: $ty) -> Self {
                    Self::One(value.into())
                }
            }

            impl From<Vec<$ty>> for Values {
                fn from(values: Vec<$ty>) -> Self {
                    Self::Many(values.into_iter().map(Into::into).collect())
                }
            }
        )*
    };
}

impl_values_from!(Element, i64, i32, f64, bool);

// Text operands are matched as written; only stored values fold missing aliases.
impl From<String> for Values {
    fn from(value: String) -> Self {
        Self::One(Element::Text(value))
    }
}

impl From<&str> for Values {
    fn from(value: &str) -> Self {
        Self::One(Element::Text(value.to_owned()))
    }
}

impl From<Vec<String>> for Values {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values.into_iter().map(Element::Text).collect())
    }
}

impl From<Vec<&str>> for Values {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(
            values
                .into_iter()
                .map(|value| Element::Text(value.to_owned()))
                .collect(),
        )
    }
}

// ── Filter engine ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    Contains,
    StartsWith,
    EndsWith,
    In,
    NotIn,
}

impl Operator {
    pub const ALL: [Self; 11] = [
        Self::Equal,
        Self::NotEqual,
        Self::LessThan,
        Self::LessOrEqual,
        Self::GreaterThan,
        Self::GreaterOrEqual,
        Self::Contains,
        Self::StartsWith,
        Self::EndsWith,
        Self::In,
        Self::NotIn,
    ];

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterOrEqual => ">=",
            Self::Contains => "contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::In => "in",
            Self::NotIn => "not_in",
        }
    }

    /// Whether this operator may be applied to a column of `kind`.
    #[must_use]
    pub fn allowed_for(self, kind: ElementKind) -> bool {
        match kind {
            ElementKind::Text => matches!(
                self,
                Self::Equal
                    | Self::NotEqual
                    | Self::Contains
                    | Self::StartsWith
                    | Self::EndsWith
                    | Self::In
                    | Self::NotIn
            ),
            ElementKind::Integer | ElementKind::Real => matches!(
                self,
                Self::Equal
                    | Self::NotEqual
                    | Self::LessThan
                    | Self::LessOrEqual
                    | Self::GreaterThan
                    | Self::GreaterOrEqual
                    | Self::In
                    | Self::NotIn
            ),
            ElementKind::Boolean => matches!(self, Self::Equal | Self::NotEqual),
        }
    }

    #[must_use]
    pub fn takes_list(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown filter operator: {0:?}")]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|op| op.symbol() == wanted)
            .ok_or_else(|| UnknownOperator(s.to_owned()))
    }
}

/// Positions of `data` whose element satisfies `op` against `operand`, in
/// ascending order.
pub fn filter_positions(
    data: &ColumnData,
    op: Operator,
    operand: &Values,
) -> Result<Vec<usize>, ColumnError> {
    let kind = data.kind();
    if !op.allowed_for(kind) {
        return Err(ColumnError::UnsupportedOperator { op, kind });
    }
    if op.takes_list() != operand.is_list() {
        return Err(ColumnError::OperandShape {
            op,
            expected: if op.takes_list() { "list" } else { "scalar" },
        });
    }
    operand.ensure_kind(kind)?;

    let candidates = operand.as_slice();
    Ok(data
        .iter()
        .enumerate()
        .filter(|(_, element)| element_matches(element, op, candidates))
        .map(|(position, _)| position)
        .collect())
}

fn element_matches(element: &Element, op: Operator, operand: &[Element]) -> bool {
    if op.takes_list() {
        let found = operand.contains(element);
        return if op == Operator::In { found } else { !found };
    }
    let Some(target) = operand.first() else {
        return false;
    };
    match op {
        Operator::Equal | Operator::In => element == target,
        Operator::NotEqual | Operator::NotIn => element != target,
        Operator::Contains => element.as_text().contains(&target.as_text()),
        Operator::StartsWith => element.as_text().starts_with(&target.as_text()),
        Operator::EndsWith => element.as_text().ends_with(&target.as_text()),
        Operator::LessThan => ordered(element, target).is_some_and(Ordering::is_lt),
        Operator::LessOrEqual => ordered(element, target).is_some_and(Ordering::is_le),
        Operator::GreaterThan => ordered(element, target).is_some_and(Ordering::is_gt),
        Operator::GreaterOrEqual => ordered(element, target).is_some_and(Ordering::is_ge),
    }
}

/// Numeric ordering of two non-missing elements; `None` when either side is
/// missing or the kinds are not comparable.
fn ordered(left: &Element, right: &Element) -> Option<Ordering> {
    if left.is_missing() || right.is_missing() {
        return None;
    }
    match (left, right) {
        (Element::Integer(a), Element::Integer(b)) => Some(a.cmp(b)),
        (Element::Real(a), Element::Real(b)) => a.partial_cmp(b),
        _ => None,
    }
}

// ── Sort engine ────────────────────────────────────────────────────────

/// Stable ordering permutation of `data`, expressed as positions.
///
/// Equal keys keep their original relative order in both directions.
/// Missing values compare below every present value.
pub fn sort_positions(data: &ColumnData, reverse: bool) -> Result<Vec<usize>, ColumnError> {
    match data {
        ColumnData::Text(buf) => Ok(stable_permutation(buf, reverse, |a, b| a.cmp(b))),
        ColumnData::Integer(buf) => Ok(stable_permutation(buf, reverse, |a, b| a.cmp(b))),
        ColumnData::Real(buf) => Ok(stable_permutation(buf, reverse, compare_reals)),
        ColumnData::Boolean(_) => Err(ColumnError::UnsortableKind {
            kind: ElementKind::Boolean,
        }),
    }
}

fn stable_permutation<T, F>(buf: &[T], reverse: bool, compare: F) -> Vec<usize>
where
    F: Fn(&T, &T) -> Ordering,
{
    let mut positions = (0..buf.len()).collect::<Vec<_>>();
    positions.sort_by(|&a, &b| {
        let order = compare(&buf[a], &buf[b]);
        if reverse { order.reverse() } else { order }
    });
    positions
}

fn compare_reals(left: &f64, right: &f64) -> Ordering {
    match (left.is_nan(), right.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => left.partial_cmp(right).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use tb_types::{Element, ElementKind, INTEGER_MISSING};

    use super::{ColumnData, ColumnError, Operator, Values, filter_positions, sort_positions};

    fn ints(values: &[i64]) -> ColumnData {
        ColumnData::from(values.to_vec())
    }

    #[test]
    fn vectors_build_typed_buffers() {
        assert_eq!(ints(&[1, 2]), ColumnData::Integer(vec![1, 2]));
        assert_eq!(
            ColumnData::from(vec!["a", "null"]),
            ColumnData::Text(vec!["a".to_owned(), "NaN".to_owned()])
        );
        assert_eq!(ColumnData::from(vec![true]).kind(), ElementKind::Boolean);
    }

    #[test]
    fn records_coerce_into_declared_kind() {
        let data = ColumnData::from_records(ElementKind::Real, ["1.5", "x", "2"]);
        let reals = data.to_reals();
        assert_eq!(reals[0], 1.5);
        assert!(reals[1].is_nan());
        assert_eq!(reals[2], 2.0);
        assert!(data.has_missing());
    }

    #[test]
    fn set_coerces_and_checks_bounds() {
        let mut data = ints(&[1, 2, 3]);
        data.set(1, &Element::from("20")).expect("in range");
        assert_eq!(data.to_ints(), vec![1, 20, 3]);
        let err = data.set(3, &Element::Integer(0)).expect_err("out of range");
        assert_eq!(err, ColumnError::IndexOutOfRange { index: 3, len: 3 });
    }

    #[test]
    fn insert_and_remove_positions() {
        let mut data = ints(&[1, 4]);
        data.insert(1, &[Element::Integer(2), Element::from("3")])
            .expect("insert");
        assert_eq!(data.to_ints(), vec![1, 2, 3, 4]);
        data.insert(4, &[Element::Integer(5)]).expect("insert at end");
        assert!(data.insert(9, &[Element::Integer(0)]).is_err());

        data.remove_positions(&[0, 3, 3]).expect("remove");
        assert_eq!(data.to_ints(), vec![2, 3, 5]);
        let err = data.remove_positions(&[1, 7]).expect_err("out of range");
        assert_eq!(err, ColumnError::IndexOutOfRange { index: 7, len: 3 });
        assert_eq!(data.len(), 3, "failed removal must not touch the buffer");
    }

    #[test]
    fn take_copies_requested_order() {
        let data = ColumnData::from(vec!["a", "b", "c"]);
        let taken = data.take(&[2, 0, 2]).expect("take");
        assert_eq!(taken.records(), vec!["c", "a", "c"]);
        assert!(data.take(&[3]).is_err());
        assert!(data.take(&[]).expect("empty take").is_empty());
    }

    #[test]
    fn convert_goes_through_natural_representation() {
        let reals = ColumnData::from(vec![1.5, 2.0]);
        let text = reals.convert(ElementKind::Text);
        assert_eq!(text.records(), vec!["1.5", "2"]);
        let back = text.convert(ElementKind::Integer);
        assert_eq!(back.to_ints(), vec![INTEGER_MISSING, 2]);
    }

    #[test]
    fn filter_equal_keeps_original_order() {
        let data = ints(&[1, 2, 3, 4, 5, 3]);
        let hits = filter_positions(&data, Operator::Equal, &Values::from(3_i64)).expect("filter");
        assert_eq!(hits, vec![2, 5]);
    }

    #[test]
    fn ordering_never_matches_missing() {
        let data = ColumnData::from(vec![1.0, f64::NAN, 3.0]);
        let hits =
            filter_positions(&data, Operator::GreaterOrEqual, &Values::from(0.0)).expect("filter");
        assert_eq!(hits, vec![0, 2]);
        let hits = filter_positions(&data, Operator::LessThan, &Values::from(10.0)).expect("filter");
        assert_eq!(hits, vec![0, 2]);

        let data = ints(&[INTEGER_MISSING, 5]);
        let hits = filter_positions(&data, Operator::LessThan, &Values::from(9_i64)).expect("filter");
        assert_eq!(hits, vec![1]);
    }

    #[test]
    fn text_operators_use_rendered_form() {
        let data = ColumnData::from(vec!["Andy", "Dan", "Bob", "Ann"]);
        let contains =
            filter_positions(&data, Operator::Contains, &Values::from("an")).expect("contains");
        assert_eq!(contains, vec![1]);
        let starts =
            filter_positions(&data, Operator::StartsWith, &Values::from("An")).expect("starts");
        assert_eq!(starts, vec![0, 3]);
        let ends = filter_positions(&data, Operator::EndsWith, &Values::from("b")).expect("ends");
        assert_eq!(ends, vec![2]);
    }

    #[test]
    fn text_operands_are_not_folded_into_missing() {
        let data = ColumnData::from(vec!["banana", "nullable", "xyz"]);
        let nan = filter_positions(&data, Operator::Contains, &Values::from("nan")).expect("nan");
        assert_eq!(nan, vec![0]);
        let null =
            filter_positions(&data, Operator::Contains, &Values::from("null")).expect("null");
        assert_eq!(null, vec![1]);
        let empty =
            filter_positions(&data, Operator::StartsWith, &Values::from("")).expect("empty");
        assert_eq!(empty, vec![0, 1, 2]);
        let listed = filter_positions(&data, Operator::In, &Values::from(vec!["xyz", "Null"]))
            .expect("membership");
        assert_eq!(listed, vec![2]);
    }

    #[test]
    fn membership_operators_require_lists() {
        let data = ints(&[1, 2, 3]);
        let inside =
            filter_positions(&data, Operator::In, &Values::from(vec![1_i64, 3])).expect("in");
        assert_eq!(inside, vec![0, 2]);
        let outside =
            filter_positions(&data, Operator::NotIn, &Values::from(vec![1_i64, 3])).expect("not in");
        assert_eq!(outside, vec![1]);

        let err = filter_positions(&data, Operator::In, &Values::from(1_i64)).expect_err("scalar");
        assert_eq!(err.to_string(), "operator 'in' requires a list operand");
        let err = filter_positions(&data, Operator::Equal, &Values::from(vec![1_i64]))
            .expect_err("list");
        assert_eq!(err.to_string(), "operator '==' requires a scalar operand");
    }

    #[test]
    fn operator_legality_follows_kind() {
        let flags = ColumnData::from(vec![true, false]);
        let err = filter_positions(&flags, Operator::GreaterThan, &Values::from(true))
            .expect_err("bool ordering");
        assert_eq!(
            err,
            ColumnError::UnsupportedOperator {
                op: Operator::GreaterThan,
                kind: ElementKind::Boolean
            }
        );
        let text = ColumnData::from(vec!["a"]);
        assert!(filter_positions(&text, Operator::LessThan, &Values::from("b")).is_err());
        let numbers = ints(&[1]);
        assert!(filter_positions(&numbers, Operator::Contains, &Values::from(1_i64)).is_err());

        for op in Operator::ALL {
            assert_eq!(op.allowed_for(ElementKind::Boolean), matches!(op, Operator::Equal | Operator::NotEqual));
        }
    }

    #[test]
    fn operand_kind_must_match_column() {
        let data = ints(&[1, 2]);
        let err = filter_positions(&data, Operator::Equal, &Values::from(1.0)).expect_err("kind");
        assert_eq!(
            err,
            ColumnError::TypeMismatch {
                expected: ElementKind::Integer,
                found: ElementKind::Real
            }
        );
    }

    #[test]
    fn sort_is_stable_first_occurrence_wins() {
        let data = ints(&[3, 1, 2, 1]);
        assert_eq!(sort_positions(&data, false).expect("asc"), vec![1, 3, 2, 0]);
        assert_eq!(sort_positions(&data, true).expect("desc"), vec![0, 2, 1, 3]);
    }

    #[test]
    fn sort_places_missing_first_ascending() {
        let data = ColumnData::from(vec![2.0, f64::NAN, -1.0]);
        assert_eq!(sort_positions(&data, false).expect("asc"), vec![1, 2, 0]);
        let text = ColumnData::from(vec!["pear", "apple", "fig"]);
        assert_eq!(sort_positions(&text, false).expect("asc"), vec![1, 2, 0]);
    }

    #[test]
    fn boolean_columns_are_not_sortable() {
        let data = ColumnData::from(vec![true, false]);
        let err = sort_positions(&data, false).expect_err("bool");
        assert_eq!(err.to_string(), "boolean columns cannot be sorted");
    }

    #[test]
    fn operators_parse_from_symbols() {
        for op in Operator::ALL {
            assert_eq!(op.symbol().parse::<Operator>().expect("parse"), op);
        }
        assert!("~=".parse::<Operator>().is_err());
        let json = serde_json::to_string(&Operator::StartsWith).expect("serialize");
        assert_eq!(json, "\"starts_with\"");
    }
}
