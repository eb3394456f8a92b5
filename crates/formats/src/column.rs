use std::marker::PhantomData;

use serde_json::Value;

use crate::data_frame::{ColumnSet, Field};

/// Field name hosts use for the single value field of a named series.
pub const VALUE_FIELD: &str = "Value";

/// One place a logical column may live inside a [`ColumnSet`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColumnSource<'a> {
    /// Field `field` of the series called `series`.
    Series { series: &'a str, field: &'a str },
    /// Field `field` of the first series, whatever its name.
    FirstSeries { field: &'a str },
}

impl<'a> ColumnSource<'a> {
    pub fn locate<'s>(&self, set: &'s ColumnSet) -> Option<&'s Field> {
        match *self {
            ColumnSource::Series { series, field } => {
                set.series_named(series)?.field_named(field)
            }
            ColumnSource::FirstSeries { field } => set.first_series()?.field_named(field),
        }
    }
}

/// Lookup order for a logical column called `name`:
/// 1. the `Value` field of the series named `name`;
/// 2. the field named `name` in the first series.
pub fn default_sources(name: &str) -> [ColumnSource<'_>; 2] {
    [
        ColumnSource::Series {
            series: name,
            field: VALUE_FIELD,
        },
        ColumnSource::FirstSeries { field: name },
    ]
}

/// Returns the field behind the first source that resolves.
pub fn resolve_field<'s>(set: &'s ColumnSet, sources: &[ColumnSource<'_>]) -> Option<&'s Field> {
    sources.iter().find_map(|s| s.locate(set))
}

/// Conversion from a raw cell. Cells of the wrong JSON type convert to `None`.
pub trait FromCell<'a>: Sized {
    fn from_cell(value: &'a Value) -> Option<Self>;
}

impl<'a> FromCell<'a> for &'a str {
    fn from_cell(value: &'a Value) -> Option<Self> {
        value.as_str()
    }
}

impl FromCell<'_> for f64 {
    fn from_cell(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl<'a> FromCell<'a> for &'a Value {
    fn from_cell(value: &'a Value) -> Option<Self> {
        Some(value)
    }
}

/// Typed, read-only view over one resolved field.
#[derive(Debug)]
pub struct Column<'a, T> {
    field: &'a Field,
    _cell: PhantomData<fn() -> T>,
}

impl<T> Clone for Column<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Column<'_, T> {}

impl<'a, T: FromCell<'a>> Column<'a, T> {
    pub fn new(field: &'a Field) -> Self {
        Self {
            field,
            _cell: PhantomData,
        }
    }

    /// Resolves the column through `sources`, in order.
    pub fn resolve(set: &'a ColumnSet, sources: &[ColumnSource<'_>]) -> Option<Self> {
        resolve_field(set, sources).map(Self::new)
    }

    /// Resolves the column with [`default_sources`].
    pub fn named(set: &'a ColumnSet, name: &str) -> Option<Self> {
        Self::resolve(set, &default_sources(name))
    }

    pub fn field_name(&self) -> &'a str {
        &self.field.name
    }

    pub fn len(&self) -> usize {
        self.field.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field.values.is_empty()
    }

    /// Typed cell at `row`. Out of range rows and mistyped cells are `None`.
    pub fn get(&self, row: usize) -> Option<T> {
        let field: &'a Field = self.field;
        field.values.get(row).and_then(T::from_cell)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<T>> + use<'a, T> {
        let field: &'a Field = self.field;
        field.values.iter().map(T::from_cell)
    }
}
