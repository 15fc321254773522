#![forbid(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
pub use tb_columnar::{ColumnData, ColumnError, Operator, Values};
use tb_columnar::{filter_positions, sort_positions};
pub use tb_types::{Element, ElementKind, ElementType};
use thiserror::Error;

/// Frames longer than this are shortened by `Display`.
const DISPLAY_MAX_ROWS: usize = 50;
const DISPLAY_HEAD_ROWS: usize = 15;
const DISPLAY_TAIL_ROWS: usize = 6;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FrameError {
    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("column '{name}' not found")]
    UnknownColumn { name: String },
    #[error("row {index} out of range for {len} rows")]
    IndexOutOfRange { index: usize, len: usize },
    #[error(
        "column '{name}' has {found} values for {expected} rows and no default value was supplied"
    )]
    MissingDefault {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
    #[error(transparent)]
    Column(#[from] ColumnError),
}

fn identity_index(len: usize) -> Vec<usize> {
    (0..len).collect()
}

/// A named, homogeneous column plus the origin position of every element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesRepr")]
pub struct Series {
    name: String,
    data: ColumnData,
    index: Vec<usize>,
}

/// Wire form of [`Series`], checked before it becomes one.
#[derive(Deserialize)]
struct SeriesRepr {
    name: String,
    data: ColumnData,
    #[serde(default)]
    index: Option<Vec<usize>>,
}

impl TryFrom<SeriesRepr> for Series {
    type Error = FrameError;

    fn try_from(repr: SeriesRepr) -> Result<Self, Self::Error> {
        let Some(index) = repr.index else {
            return Ok(Self::from_data(repr.name, repr.data));
        };
        if index.len() != repr.data.len() {
            return Err(FrameError::LengthMismatch {
                expected: repr.data.len(),
                found: index.len(),
            });
        }
        Ok(Self {
            name: repr.name,
            data: repr.data,
            index,
        })
    }
}

impl Series {
    /// Build from a typed vector, rejecting it when `T` is not of `kind`.
    pub fn new<T: ElementType>(
        name: impl Into<String>,
        values: Vec<T>,
        kind: ElementKind,
    ) -> Result<Self, FrameError> {
        if T::KIND != kind {
            return Err(ColumnError::TypeMismatch {
                expected: kind,
                found: T::KIND,
            }
            .into());
        }
        Ok(Self::from_data(name, ColumnData::from(values)))
    }

    /// Build from a typed vector, taking the kind from `T`.
    pub fn from_vec<T: ElementType>(name: impl Into<String>, values: Vec<T>) -> Self {
        Self::from_data(name, ColumnData::from(values))
    }

    #[must_use]
    pub fn empty(name: impl Into<String>, kind: ElementKind) -> Self {
        Self::from_data(name, ColumnData::empty(kind))
    }

    pub fn from_data(name: impl Into<String>, data: ColumnData) -> Self {
        let index = identity_index(data.len());
        Self {
            name: name.into(),
            data,
            index,
        }
    }

    /// Build a column of `kind`, coercing every element into it.
    pub fn from_elements(name: impl Into<String>, kind: ElementKind, elements: &[Element]) -> Self {
        Self::from_data(name, ColumnData::from_elements(kind, elements))
    }

    /// Build a column of `kind` from text records (e.g. one CSV column).
    pub fn load_records<S: AsRef<str>>(
        name: impl Into<String>,
        records: &[S],
        kind: ElementKind,
    ) -> Self {
        Self::from_data(name, ColumnData::from_records(kind, records))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Origin row position of each held element.
    #[must_use]
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    #[must_use]
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn reset_index(&mut self) {
        self.index = identity_index(self.data.len());
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<Element> {
        self.data.get(position)
    }

    /// Overwrite the element at `position`, coercing `value` into this kind.
    pub fn set(&mut self, position: usize, value: impl Into<Element>) -> Result<(), FrameError> {
        self.data.set(position, &value.into())?;
        Ok(())
    }

    #[must_use]
    pub fn elements(&self) -> Vec<Element> {
        self.data.elements()
    }

    /// Append a scalar or a list; each value is coerced into this kind.
    /// Any filter/sort view is discarded.
    pub fn append(&mut self, values: impl Into<Values>) {
        self.data.extend(values.into().as_slice());
        self.reset_index();
    }

    pub fn insert(&mut self, at: usize, values: impl Into<Values>) -> Result<(), FrameError> {
        self.data.insert(at, values.into().as_slice())?;
        self.reset_index();
        Ok(())
    }

    /// Remove the elements at `positions`; nothing is removed if any is out of range.
    pub fn drop_positions(&mut self, positions: &[usize]) -> Result<(), FrameError> {
        self.data.remove_positions(positions)?;
        self.reset_index();
        Ok(())
    }

    /// Keep only the first `len` elements.
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
        self.index.truncate(len);
    }

    /// Append every element of `other`, converted into this Series' kind.
    pub fn concat(&mut self, other: &Self) {
        if other.kind() != self.kind() {
            log::debug!(
                "concat: converting '{}' from {} to {}",
                other.name,
                other.kind(),
                self.kind()
            );
        }
        self.data.append_column(&other.data);
        self.reset_index();
    }

    /// Rebuild the column as `kind` through each element's rendered value.
    pub fn set_type(&mut self, kind: ElementKind) {
        if self.kind() != kind {
            self.data = self.data.convert(kind);
        }
    }

    /// Replace element `i` with `f(i, element_i)`, coerced into this kind.
    pub fn format<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, Element) -> Element,
    {
        let formatted = self
            .data
            .iter()
            .enumerate()
            .map(|(position, element)| f(position, element))
            .collect::<Vec<_>>();
        self.data = ColumnData::from_elements(self.kind(), &formatted);
    }

    /// Positions whose element satisfies `operator` against `operand`.
    pub fn filter_positions(
        &self,
        operator: Operator,
        operand: &Values,
    ) -> Result<Vec<usize>, FrameError> {
        Ok(filter_positions(&self.data, operator, operand)?)
    }

    /// Matching elements in original order; the index keeps their origins.
    pub fn filter(&self, operator: Operator, operand: impl Into<Values>) -> Result<Self, FrameError> {
        let positions = self.filter_positions(operator, &operand.into())?;
        self.subset(&positions)
    }

    /// Stable ordering permutation as positions into this Series.
    pub fn sort_positions(&self, reverse: bool) -> Result<Vec<usize>, FrameError> {
        Ok(sort_positions(&self.data, reverse)?)
    }

    /// Stable ordering permutation expressed in index labels.
    pub fn sort_index(&self, reverse: bool) -> Result<Vec<usize>, FrameError> {
        let positions = self.sort_positions(reverse)?;
        Ok(positions.iter().map(|&position| self.index[position]).collect())
    }

    /// Copy the requested positions in the requested order.
    pub fn subset(&self, positions: &[usize]) -> Result<Self, FrameError> {
        let data = self.data.take(positions)?;
        let index = positions.iter().map(|&position| self.index[position]).collect();
        Ok(Self {
            name: self.name.clone(),
            data,
            index,
        })
    }

    #[must_use]
    pub fn has_missing(&self) -> bool {
        self.data.has_missing()
    }

    #[must_use]
    pub fn records(&self) -> Vec<String> {
        self.data.records()
    }

    #[must_use]
    pub fn to_ints(&self) -> Vec<i64> {
        self.data.to_ints()
    }

    #[must_use]
    pub fn to_reals(&self) -> Vec<f64> {
        self.data.to_reals()
    }

    #[must_use]
    pub fn to_bools(&self) -> Vec<bool> {
        self.data.to_bools()
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "name: {}", self.name)?;
        writeln!(f, "values: [{}]", self.records().join(", "))?;
        let index = self.index.iter().map(usize::to_string).collect::<Vec<_>>();
        writeln!(f, "index: [{}]", index.join(", "))?;
        write!(f, "kind: {}", self.kind())
    }
}

/// One sort key for [`DataFrame::arrange`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub column: String,
    pub reverse: bool,
}

impl Order {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            reverse: false,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            reverse: true,
        }
    }
}

/// One predicate for [`DataFrame::filter`]. `or` selects how its matches
/// combine with the conditions before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub column: String,
    pub operator: Operator,
    pub operand: Values,
    pub or: bool,
}

impl Condition {
    /// Intersect with the previous conditions.
    pub fn new(column: impl Into<String>, operator: Operator, operand: impl Into<Values>) -> Self {
        Self {
            column: column.into(),
            operator,
            operand: operand.into(),
            or: false,
        }
    }

    /// Union with the previous conditions.
    pub fn or(column: impl Into<String>, operator: Operator, operand: impl Into<Values>) -> Self {
        Self {
            or: true,
            ..Self::new(column, operator, operand)
        }
    }
}

/// Values for one row passed to [`DataFrame::set`].
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// One value per column, in column order.
    Positional(Vec<Element>),
    /// Values keyed by column name.
    Named(BTreeMap<String, Element>),
}

impl From<Vec<Element>> for RowValues {
    fn from(values: Vec<Element>) -> Self {
        Self::Positional(values)
    }
}

impl From<BTreeMap<String, Element>> for RowValues {
    fn from(values: BTreeMap<String, Element>) -> Self {
        Self::Named(values)
    }
}

impl From<Vec<(&str, Element)>> for RowValues {
    fn from(values: Vec<(&str, Element)>) -> Self {
        Self::Named(
            values
                .into_iter()
                .map(|(name, value)| (name.to_owned(), value))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcatAxis {
    Columns,
    Rows,
}

/// An ordered set of equal-length Series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FrameRepr")]
pub struct DataFrame {
    columns: Vec<Series>,
    rows: usize,
}

/// Wire form of [`DataFrame`]; `rows` is re-derived from the columns.
#[derive(Deserialize)]
struct FrameRepr {
    columns: Vec<Series>,
    #[serde(default)]
    rows: Option<usize>,
}

impl TryFrom<FrameRepr> for DataFrame {
    type Error = FrameError;

    fn try_from(repr: FrameRepr) -> Result<Self, Self::Error> {
        let frame = Self::from_series(repr.columns)?;
        match repr.rows {
            Some(rows) if rows != frame.rows => Err(FrameError::LengthMismatch {
                expected: frame.rows,
                found: rows,
            }),
            _ => Ok(frame),
        }
    }
}

impl DataFrame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_series(series_list: Vec<Series>) -> Result<Self, FrameError> {
        let mut frame = Self::new();
        let Some(expected) = series_list.first().map(Series::len) else {
            return Ok(frame);
        };
        for series in series_list {
            if series.len() != expected {
                return Err(FrameError::LengthMismatch {
                    expected,
                    found: series.len(),
                });
            }
            frame.upsert_column(series);
        }
        frame.refresh_shape();
        Ok(frame)
    }

    /// One column per `(name, values)` pair, in the given order.
    pub fn from_columns<I, N>(columns: I) -> Result<Self, FrameError>
    where
        I: IntoIterator<Item = (N, ColumnData)>,
        N: Into<String>,
    {
        Self::from_series(
            columns
                .into_iter()
                .map(|(name, data)| Series::from_data(name, data))
                .collect(),
        )
    }

    /// One column per map entry, in key order.
    pub fn from_map(columns: BTreeMap<String, ColumnData>) -> Result<Self, FrameError> {
        Self::from_columns(columns)
    }

    /// Build from a row-major matrix of text records.
    ///
    /// When `names` is `None` the first row is taken as the header. Each
    /// column's records are coerced into the matching entry of `kinds`.
    pub fn load_records<S: AsRef<str>>(
        rows: &[Vec<S>],
        names: Option<&[&str]>,
        kinds: &[ElementKind],
    ) -> Result<Self, FrameError> {
        if rows.is_empty() {
            return Err(FrameError::UnsupportedOperation(
                "cannot load an empty record matrix".to_owned(),
            ));
        }
        let width = kinds.len();
        if let Some(bad) = rows.iter().find(|row| row.len() != width) {
            return Err(FrameError::LengthMismatch {
                expected: width,
                found: bad.len(),
            });
        }

        let (names, body): (Vec<String>, &[Vec<S>]) = match names {
            Some(names) => {
                if names.len() != width {
                    return Err(FrameError::LengthMismatch {
                        expected: width,
                        found: names.len(),
                    });
                }
                (names.iter().map(|&name| name.to_owned()).collect(), rows)
            }
            None => (
                rows[0].iter().map(|name| name.as_ref().to_owned()).collect(),
                &rows[1..],
            ),
        };

        let series_list = names
            .into_iter()
            .zip(kinds)
            .enumerate()
            .map(|(col, (name, &kind))| {
                let data = ColumnData::from_records(kind, body.iter().map(|row| row[col].as_ref()));
                Series::from_data(name, data)
            })
            .collect();
        Self::from_series(series_list)
    }

    fn refresh_shape(&mut self) {
        self.rows = self.columns.first().map_or(0, Series::len);
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|series| series.name == name)
    }

    fn require_position(&self, name: &str) -> Result<usize, FrameError> {
        self.position_of(name).ok_or_else(|| FrameError::UnknownColumn {
            name: name.to_owned(),
        })
    }

    fn upsert_column(&mut self, series: Series) {
        match self.position_of(&series.name) {
            Some(position) => self.columns[position] = series,
            None => self.columns.push(series),
        }
    }

    fn check_row(&self, row: usize) -> Result<(), FrameError> {
        if row >= self.rows {
            return Err(FrameError::IndexOutOfRange {
                index: row,
                len: self.rows,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    #[must_use]
    pub fn columns(&self) -> &[Series] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Series> {
        self.columns.iter().find(|series| series.name == name)
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Series::name).collect()
    }

    #[must_use]
    pub fn column_kinds(&self) -> Vec<ElementKind> {
        self.columns.iter().map(Series::kind).collect()
    }

    /// `(column name, element)` pairs of one row, in column order.
    pub fn row(&self, row: usize) -> Result<Vec<(&str, Element)>, FrameError> {
        self.check_row(row)?;
        Ok(self
            .columns
            .iter()
            .filter_map(|series| series.get(row).map(|element| (series.name(), element)))
            .collect())
    }

    pub fn cell(&self, row: usize, name: &str) -> Result<Element, FrameError> {
        self.check_row(row)?;
        let position = self.require_position(name)?;
        self.columns[position]
            .get(row)
            .ok_or(FrameError::IndexOutOfRange {
                index: row,
                len: self.rows,
            })
    }

    pub fn set_cell(
        &mut self,
        row: usize,
        name: &str,
        value: impl Into<Element>,
    ) -> Result<(), FrameError> {
        self.check_row(row)?;
        let position = self.require_position(name)?;
        self.columns[position].set(row, value)
    }

    /// Update row `row` in place, or append one row when `row >= n_rows()`.
    ///
    /// Appending a named row fills unnamed columns with their missing value.
    /// Input is validated before anything is written.
    pub fn set(&mut self, row: usize, values: impl Into<RowValues>) -> Result<(), FrameError> {
        let append = row >= self.rows;
        match values.into() {
            RowValues::Positional(values) => {
                if values.len() != self.columns.len() {
                    return Err(FrameError::LengthMismatch {
                        expected: self.columns.len(),
                        found: values.len(),
                    });
                }
                for (series, value) in self.columns.iter_mut().zip(values) {
                    if append {
                        series.append(value);
                    } else {
                        series.set(row, value)?;
                    }
                }
            }
            RowValues::Named(values) => {
                let mut targets = BTreeMap::new();
                for (name, value) in values {
                    targets.insert(self.require_position(&name)?, value);
                }
                if append {
                    for (position, series) in self.columns.iter_mut().enumerate() {
                        let value = targets
                            .remove(&position)
                            .unwrap_or_else(|| Element::missing(series.kind()));
                        series.append(value);
                    }
                } else {
                    for (position, value) in targets {
                        self.columns[position].set(row, value)?;
                    }
                }
            }
        }
        self.refresh_shape();
        Ok(())
    }

    /// Append rows in order; stops at the first invalid row.
    pub fn add_rows<I, R>(&mut self, rows: I) -> Result<(), FrameError>
    where
        I: IntoIterator<Item = R>,
        R: Into<RowValues>,
    {
        for values in rows {
            self.set(self.rows, values)?;
        }
        Ok(())
    }

    /// Insert or replace (by name) a column built from `values`.
    pub fn add_col(
        &mut self,
        name: impl Into<String>,
        values: impl Into<ColumnData>,
        default: Option<Element>,
    ) -> Result<(), FrameError> {
        self.add_series(Series::from_data(name, values.into()), default)
    }

    /// Insert or replace (by name) `series`, fitted to the current row count.
    ///
    /// Short input is padded with `default`; long input is truncated. On a
    /// frame without columns the series defines the row count.
    pub fn add_series(
        &mut self,
        mut series: Series,
        default: Option<Element>,
    ) -> Result<(), FrameError> {
        if !self.columns.is_empty() {
            let rows = self.rows;
            let found = series.len();
            if found < rows {
                let Some(default) = default else {
                    return Err(FrameError::MissingDefault {
                        name: series.name,
                        expected: rows,
                        found,
                    });
                };
                series.append(vec![default; rows - found]);
            } else if found > rows {
                series.truncate(rows);
            }
        }
        self.upsert_column(series);
        self.refresh_shape();
        Ok(())
    }

    /// Remove the named columns; unknown names are ignored.
    pub fn drop_cols(&mut self, names: &[&str]) {
        self.columns
            .retain(|series| !names.contains(&series.name.as_str()));
        self.refresh_shape();
    }

    /// Rename columns by `(from, to)` pairs and return the `from` names that
    /// matched nothing.
    pub fn rename(&mut self, mapping: &[(&str, &str)]) -> Vec<String> {
        let mut unmatched = Vec::new();
        for &(from, to) in mapping {
            match self.position_of(from) {
                Some(position) => self.columns[position].rename(to),
                None => {
                    log::warn!("rename: column '{from}' not found");
                    unmatched.push(from.to_owned());
                }
            }
        }
        unmatched
    }

    /// Convert the named columns to new kinds.
    pub fn set_types(&mut self, mapping: &[(&str, ElementKind)]) -> Result<(), FrameError> {
        let targets = mapping
            .iter()
            .map(|&(name, kind)| Ok((self.require_position(name)?, kind)))
            .collect::<Result<Vec<_>, FrameError>>()?;
        for (position, kind) in targets {
            self.columns[position].set_type(kind);
        }
        Ok(())
    }

    /// Apply [`Series::format`] to one column.
    pub fn format_col<F>(&mut self, name: &str, f: F) -> Result<(), FrameError>
    where
        F: FnMut(usize, Element) -> Element,
    {
        let position = self.require_position(name)?;
        self.columns[position].format(f);
        Ok(())
    }

    /// Sort rows by each key in turn with a stable sort.
    ///
    /// Every key re-sorts the whole frame, so the last key decides the
    /// primary order and earlier keys only survive as tie-breaks. The frame
    /// is left unchanged if any key fails.
    pub fn arrange(&mut self, orders: &[Order]) -> Result<(), FrameError> {
        let mut working = self.clone();
        for order in orders {
            let position = working.require_position(&order.column)?;
            let permutation = working.columns[position].sort_positions(order.reverse)?;
            log::debug!(
                "arrange: key '{}' reverse={} over {} rows",
                order.column,
                order.reverse,
                permutation.len()
            );
            working = working.subset(&permutation)?;
        }
        *self = working;
        Ok(())
    }

    /// Rows at `positions`, in that order, with their index labels.
    pub fn subset(&self, positions: &[usize]) -> Result<Self, FrameError> {
        if let Some(&bad) = positions.iter().find(|&&position| position >= self.rows) {
            return Err(FrameError::IndexOutOfRange {
                index: bad,
                len: self.rows,
            });
        }
        let columns = self
            .columns
            .iter()
            .map(|series| series.subset(positions))
            .collect::<Result<Vec<_>, _>>()?;
        let mut frame = Self { columns, rows: 0 };
        frame.refresh_shape();
        Ok(frame)
    }

    /// Rows matching `conditions`.
    ///
    /// The first condition seeds the selection; each later one is unioned
    /// (`or`) or intersected with it. Rows keep their original order and
    /// appear at most once.
    pub fn filter(&self, conditions: &[Condition]) -> Result<Self, FrameError> {
        let mut selected: Option<BTreeSet<usize>> = None;
        for condition in conditions {
            let position = self.require_position(&condition.column)?;
            let hits = self.columns[position]
                .filter_positions(condition.operator, &condition.operand)?
                .into_iter()
                .collect::<BTreeSet<_>>();
            selected = Some(match selected {
                None => hits,
                Some(current) if condition.or => current.union(&hits).copied().collect(),
                Some(current) => current.intersection(&hits).copied().collect(),
            });
        }
        let positions = match selected {
            Some(set) => set.into_iter().collect::<Vec<_>>(),
            None => identity_index(self.rows),
        };
        log::debug!("filter: kept {} of {} rows", positions.len(), self.rows);
        self.subset(&positions)
    }

    /// Combine with `other` side by side (`Columns`) or stacked (`Rows`).
    ///
    /// Column-wise concatenation adds or overwrites columns by name.
    /// Row-wise concatenation is not implemented.
    pub fn concat(&mut self, other: &Self, axis: ConcatAxis) -> Result<(), FrameError> {
        match axis {
            ConcatAxis::Columns => {
                if !self.columns.is_empty() && self.rows != other.rows {
                    return Err(FrameError::LengthMismatch {
                        expected: self.rows,
                        found: other.rows,
                    });
                }
                for series in &other.columns {
                    self.upsert_column(series.clone());
                }
                self.refresh_shape();
                Ok(())
            }
            ConcatAxis::Rows => {
                if self.columns.len() != other.columns.len() {
                    return Err(FrameError::LengthMismatch {
                        expected: self.columns.len(),
                        found: other.columns.len(),
                    });
                }
                Err(FrameError::UnsupportedOperation(
                    "row-wise concatenation is not implemented".to_owned(),
                ))
            }
        }
    }

    /// Text records, row-major when `as_rows` and column-major otherwise.
    ///
    /// With `include_header`, row-major output starts with the names row and
    /// column-major output starts each column with its name.
    #[must_use]
    pub fn records(&self, as_rows: bool, include_header: bool) -> Vec<Vec<String>> {
        if as_rows {
            let mut out = Vec::with_capacity(self.rows + 1);
            if include_header {
                out.push(self.columns.iter().map(|s| s.name.clone()).collect());
            }
            let columns = self.columns.iter().map(Series::records).collect::<Vec<_>>();
            for row in 0..self.rows {
                out.push(columns.iter().map(|column| column[row].clone()).collect());
            }
            out
        } else {
            self.columns
                .iter()
                .map(|series| {
                    let mut column = Vec::with_capacity(series.len() + 1);
                    if include_header {
                        column.push(series.name.clone());
                    }
                    column.extend(series.records());
                    column
                })
                .collect()
        }
    }
}

impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() || self.rows == 0 {
            return write!(f, "DataFrame is empty ({} columns)", self.columns.len());
        }
        writeln!(f, "DataFrame: {} rows x {} columns", self.rows, self.columns.len())?;

        let shown: Vec<Option<usize>> = if self.rows > DISPLAY_MAX_ROWS {
            (0..DISPLAY_HEAD_ROWS)
                .map(Some)
                .chain(std::iter::once(None))
                .chain((self.rows - DISPLAY_TAIL_ROWS..self.rows).map(Some))
                .collect()
        } else {
            (0..self.rows).map(Some).collect()
        };

        let columns = self.columns.iter().map(Series::records).collect::<Vec<_>>();
        let mut lines: Vec<Vec<String>> = Vec::with_capacity(shown.len() + 2);
        lines.push(
            std::iter::once(String::new())
                .chain(self.columns.iter().map(|s| s.name.clone()))
                .collect(),
        );
        for slot in &shown {
            lines.push(match slot {
                Some(row) => std::iter::once(row.to_string())
                    .chain(columns.iter().map(|column| column[*row].clone()))
                    .collect(),
                None => vec!["...".to_owned(); self.columns.len() + 1],
            });
        }
        lines.push(
            std::iter::once(String::new())
                .chain(self.columns.iter().map(|s| s.kind().to_string()))
                .collect(),
        );

        let widths = (0..=self.columns.len())
            .map(|col| lines.iter().map(|line| line[col].chars().count()).max().unwrap_or(0))
            .collect::<Vec<_>>();
        for (n, line) in lines.iter().enumerate() {
            let cells = line
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>();
            write!(f, "{}", cells.join("  ").trim_end())?;
            if n + 1 < lines.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
