//! Mapping an incoming JSON object onto an ordered spreadsheet row.
//!
//! The column table decides which payload field lands in which column. Fields
//! the payload omits become empty cells; fields the table does not name are
//! ignored.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Prefix that makes the backend store a cell as literal text.
pub const LITERAL_TEXT_PREFIX: char = '\'';

/// How a column's value is derived from its source field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Copied through unchanged
    #[default]
    Value,
    /// The row identifier: the payload's value, or the generated one if absent
    Identifier,
    /// A date/time column, written as literal text when literal dates are forced
    Date,
}

/// One entry of the column-mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnSpec {
    /// Name of the payload field feeding this column
    pub field: String,
    #[serde(default)]
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn new(field: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

/// The delivery-ticket layout: identifier, date/time, volume, grade, mixer,
/// pump, driver, client, site, invoice.
pub fn default_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("ID", ColumnKind::Identifier),
        ColumnSpec::new("DATE_TIME", ColumnKind::Date),
        ColumnSpec::new("CONCRETE_VOLUME_m3", ColumnKind::Value),
        ColumnSpec::new("GRADE", ColumnKind::Value),
        ColumnSpec::new("MIXER_NUMBER", ColumnKind::Value),
        ColumnSpec::new("PUMP_NUMBER", ColumnKind::Value),
        ColumnSpec::new("DRIVER_NAME", ColumnKind::Value),
        ColumnSpec::new("CLIENT_NAME", ColumnKind::Value),
        ColumnSpec::new("SITE_NAME", ColumnKind::Value),
        ColumnSpec::new("INVOICE_NUMBER", ColumnKind::Value),
    ]
}

/// A row ready to be appended, plus the identifier it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRow {
    pub identifier: String,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Copy)]
pub struct RowLayout<'a> {
    columns: &'a [ColumnSpec],
    force_literal_date: bool,
}

impl<'a> RowLayout<'a> {
    pub fn new(columns: &'a [ColumnSpec], force_literal_date: bool) -> Self {
        Self {
            columns,
            force_literal_date,
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Build the row for `payload`. `generated_id` fills identifier columns the
    /// payload leaves empty, and is reported when the layout has none.
    pub fn build(&self, payload: &Map<String, Value>, generated_id: &str) -> BuiltRow {
        let mut identifier = None;

        let values = self
            .columns
            .iter()
            .map(|column| {
                let source = payload.get(&column.field);
                match column.kind {
                    ColumnKind::Value => cell(source),
                    ColumnKind::Identifier => {
                        let id = scalar_text(source).unwrap_or_else(|| generated_id.to_string());
                        identifier.get_or_insert_with(|| id.clone());
                        Value::String(id)
                    }
                    ColumnKind::Date if self.force_literal_date => match scalar_text(source) {
                        Some(text) => Value::String(format!("{}{}", LITERAL_TEXT_PREFIX, text)),
                        None => empty_cell(),
                    },
                    ColumnKind::Date => cell(source),
                }
            })
            .collect();

        BuiltRow {
            identifier: identifier.unwrap_or_else(|| generated_id.to_string()),
            values,
        }
    }
}

fn empty_cell() -> Value {
    Value::String(String::new())
}

fn cell(value: Option<&Value>) -> Value {
    match value {
        None | Some(Value::Null) => empty_cell(),
        Some(scalar @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => scalar.clone(),
        Some(nested) => Value::String(nested.to_string()),
    }
}

/// Text form of a non-empty value, or `None` for missing, null and "".
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
