//! Filter predicate builder
//!
//! Criteria are resolved against the entity schema and their values coerced
//! once, when the predicate is built. Matching a record afterwards is
//! infallible.

use std::cmp::Ordering;

use crate::core::entity::Entity;
use crate::core::error::QueryError;
use crate::core::field::{FieldKind, FieldValue};
use crate::core::query::{FilterCriteria, FilterOperator};
use crate::core::schema::FieldDescriptor;

enum Test {
    Equal(FieldValue),
    NotEqual(FieldValue),
    Compare(FilterOperator, FieldValue),
    Text(FilterOperator, String),
    In(Vec<FieldValue>),
    NotIn(Vec<FieldValue>),
}

struct Clause<T: 'static> {
    field: &'static FieldDescriptor<T>,
    test: Test,
}

/// Conjunction of filter criteria plus an optional free-text search
pub struct Predicate<T: 'static> {
    clauses: Vec<Clause<T>>,
    search: Option<String>,
}

impl<T: Entity> Predicate<T> {
    /// Build a predicate, failing on unknown properties, operators that do
    /// not fit the property kind, and values that cannot be coerced
    pub fn build(criteria: &[FilterCriteria], search_term: Option<&str>) -> Result<Self, QueryError> {
        let schema = T::schema();
        let clauses = criteria
            .iter()
            .map(|criterion| {
                let field = schema.field(&criterion.property_name).ok_or_else(|| {
                    QueryError::UnknownField {
                        entity_type: schema.entity_name().to_string(),
                        field: criterion.property_name.clone(),
                    }
                })?;
                Ok(Clause {
                    field,
                    test: build_test(field.name(), field.kind(), criterion)?,
                })
            })
            .collect::<Result<Vec<_>, QueryError>>()?;

        let search = search_term
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase);

        Ok(Self { clauses, search })
    }

    pub fn matches(&self, record: &T) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.test.matches(&clause.field.get(record)))
            && self.matches_search(record)
    }

    fn matches_search(&self, record: &T) -> bool {
        let Some(term) = &self.search else {
            return true;
        };
        T::schema().string_fields().any(|field| match field.get(record) {
            FieldValue::String(value) => value.to_lowercase().contains(term.as_str()),
            _ => false,
        })
    }
}

/// Keep only the records matching every criterion and the search term
pub fn apply<T: Entity>(
    records: Vec<T>,
    criteria: &[FilterCriteria],
    search_term: Option<&str>,
) -> Result<Vec<T>, QueryError> {
    let predicate = Predicate::<T>::build(criteria, search_term)?;
    Ok(records
        .into_iter()
        .filter(|record| predicate.matches(record))
        .collect())
}

fn build_test(field: &str, kind: FieldKind, criterion: &FilterCriteria) -> Result<Test, QueryError> {
    let operator = criterion.operator;
    let unsupported = || QueryError::UnsupportedOperator {
        field: field.to_string(),
        operator: operator.to_string(),
        kind: kind.to_string(),
    };
    let invalid = |value: &serde_json::Value| QueryError::InvalidValue {
        field: field.to_string(),
        kind: kind.to_string(),
        value: value.to_string(),
    };
    let coerce = |value: &serde_json::Value| FieldValue::coerce(kind, value).ok_or_else(|| invalid(value));

    match operator {
        FilterOperator::Equal => Ok(Test::Equal(coerce(&criterion.value)?)),
        FilterOperator::NotEqual => Ok(Test::NotEqual(coerce(&criterion.value)?)),
        FilterOperator::GreaterThan
        | FilterOperator::LessThan
        | FilterOperator::GreaterOrEqual
        | FilterOperator::LessOrEqual => {
            if !kind.is_orderable() {
                return Err(unsupported());
            }
            let bound = coerce(&criterion.value)?;
            if bound.is_null() {
                return Err(invalid(&criterion.value));
            }
            Ok(Test::Compare(operator, bound))
        }
        FilterOperator::Contains | FilterOperator::StartsWith | FilterOperator::EndsWith => {
            if kind != FieldKind::String {
                return Err(unsupported());
            }
            match coerce(&criterion.value)? {
                FieldValue::String(text) => Ok(Test::Text(operator, text.to_lowercase())),
                _ => Err(invalid(&criterion.value)),
            }
        }
        FilterOperator::In | FilterOperator::NotIn => {
            let items = criterion
                .value
                .as_array()
                .ok_or_else(|| invalid(&criterion.value))?
                .iter()
                .map(coerce)
                .collect::<Result<Vec<_>, _>>()?;
            if operator == FilterOperator::In {
                Ok(Test::In(items))
            } else {
                Ok(Test::NotIn(items))
            }
        }
    }
}

fn values_equal(actual: &FieldValue, expected: &FieldValue) -> bool {
    match (actual, expected) {
        (FieldValue::Null, FieldValue::Null) => true,
        (FieldValue::Null, _) | (_, FieldValue::Null) => false,
        _ => actual.compare(expected) == Some(Ordering::Equal),
    }
}

impl Test {
    fn matches(&self, actual: &FieldValue) -> bool {
        match self {
            Test::Equal(expected) => values_equal(actual, expected),
            Test::NotEqual(expected) => !values_equal(actual, expected),
            Test::Compare(operator, bound) => match actual.compare(bound) {
                None => false,
                Some(ordering) => match operator {
                    FilterOperator::GreaterThan => ordering == Ordering::Greater,
                    FilterOperator::LessThan => ordering == Ordering::Less,
                    FilterOperator::GreaterOrEqual => ordering != Ordering::Less,
                    FilterOperator::LessOrEqual => ordering != Ordering::Greater,
                    _ => false,
                },
            },
            Test::Text(operator, needle) => match actual {
                FieldValue::String(value) => {
                    let haystack = value.to_lowercase();
                    match operator {
                        FilterOperator::Contains => haystack.contains(needle.as_str()),
                        FilterOperator::StartsWith => haystack.starts_with(needle.as_str()),
                        FilterOperator::EndsWith => haystack.ends_with(needle.as_str()),
                        _ => false,
                    }
                }
                _ => false,
            },
            Test::In(items) => items.iter().any(|item| values_equal(actual, item)),
            Test::NotIn(items) => !items.iter().any(|item| values_equal(actual, item)),
        }
    }
}
