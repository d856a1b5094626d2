//! Filter layer
//!
//! Each resource declares a table of `FilterField`s: query parameter name,
//! match kind, and target column (possibly on a joined table). `FilterSet`
//! turns request query parameters into a conjunction of predicates that can
//! be rendered as SQL or evaluated against in-memory rows.

use std::collections::HashMap;

use sqlx::{Postgres, QueryBuilder};

use crate::utils::validation::parse_integral;

/// How a parameter value is compared against its column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Case-insensitive substring
    Contains,
    Exact,
}

/// Type of the target column, which also decides how the value is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Integer,
}

/// Declarative filter entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub param: &'static str,
    pub column: &'static str,
    pub kind: MatchKind,
    pub value: ValueKind,
}

impl FilterField {
    pub const fn text(param: &'static str, column: &'static str, kind: MatchKind) -> Self {
        Self { param, column, kind, value: ValueKind::Text }
    }

    pub const fn integer(param: &'static str, column: &'static str) -> Self {
        Self { param, column, kind: MatchKind::Exact, value: ValueKind::Integer }
    }
}

pub const VEHICLE_FILTERS: &[FilterField] = &[
    FilterField::text("registration_number", "v.registration_number", MatchKind::Contains),
    FilterField::text("make", "v.make", MatchKind::Contains),
    FilterField::text("model", "v.model", MatchKind::Contains),
    FilterField::integer("year", "v.year"),
];

pub const MAINTENANCE_TASK_FILTERS: &[FilterField] = &[
    FilterField::text("registration_number", "v.registration_number", MatchKind::Contains),
    FilterField::text("vehicle__registration_number", "v.registration_number", MatchKind::Exact),
    FilterField::text("task_type", "t.task_type", MatchKind::Contains),
    FilterField::text("status", "t.status", MatchKind::Contains),
];

/// Parsed filter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
}

/// Borrowed column value of a row being filtered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnValue<'a> {
    Text(&'a str),
    Integer(i64),
}

/// Rows the in-memory back-end can filter
pub trait Filterable {
    /// Value of a column named like in the filter tables, e.g. `v.make`.
    fn column(&self, column: &str) -> Option<ColumnValue<'_>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub field: FilterField,
    pub value: FilterValue,
}

impl Predicate {
    pub fn matches<R: Filterable + ?Sized>(&self, row: &R) -> bool {
        match (row.column(self.field.column), &self.value) {
            (Some(ColumnValue::Text(actual)), FilterValue::Text(wanted)) => match self.field.kind {
                MatchKind::Contains => actual.to_lowercase().contains(&wanted.to_lowercase()),
                MatchKind::Exact => actual == wanted,
            },
            (Some(ColumnValue::Integer(actual)), FilterValue::Integer(wanted)) => actual == *wanted,
            _ => false,
        }
    }

    fn push_sql(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder.push(self.field.column);
        match (&self.value, self.field.kind) {
            (FilterValue::Text(text), MatchKind::Contains) => {
                builder.push(" ILIKE ");
                builder.push_bind(format!("%{}%", escape_like(text)));
            }
            (FilterValue::Text(text), MatchKind::Exact) => {
                builder.push(" = ");
                builder.push_bind(text.clone());
            }
            (FilterValue::Integer(number), _) => {
                builder.push(" = ");
                builder.push_bind(*number);
            }
        }
    }
}

/// Conjunction of predicates; empty means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    predicates: Vec<Predicate>,
}

impl FilterSet {
    /// Builds predicates from query parameters. Unknown parameters, blank
    /// values and values that do not parse for their column are ignored.
    pub fn from_query(table: &[FilterField], params: &HashMap<String, String>) -> Self {
        let predicates = table
            .iter()
            .filter_map(|field| {
                let raw = params.get(field.param)?.trim();
                if raw.is_empty() {
                    return None;
                }
                let value = match field.value {
                    ValueKind::Text => FilterValue::Text(raw.to_string()),
                    ValueKind::Integer => FilterValue::Integer(parse_integral(raw)?),
                };
                Some(Predicate { field: *field, value })
            })
            .collect();

        Self { predicates }
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn matches<R: Filterable + ?Sized>(&self, row: &R) -> bool {
        self.predicates.iter().all(|p| p.matches(row))
    }

    /// Appends ` WHERE a AND b ...` (nothing when empty).
    pub fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        for (index, predicate) in self.predicates.iter().enumerate() {
            builder.push(if index == 0 { " WHERE " } else { " AND " });
            predicate.push_sql(builder);
        }
    }
}

/// Escapes LIKE metacharacters so the value matches literally.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
