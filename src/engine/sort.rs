//! Dynamic sort comparator

use std::cmp::Ordering;
use std::str::FromStr;

use crate::core::entity::Entity;
use crate::core::error::QueryError;
use crate::core::field::FieldValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Asc)
        } else if trimmed.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Err(QueryError::InvalidSortOrder {
                value: s.to_string(),
            })
        }
    }
}

/// Order `records` by `sort_field`.
///
/// The order string is validated even when no sort field is given. Without a
/// field the input order is kept. Ties keep their input order, nulls sort
/// first ascending and last descending.
pub fn apply<T: Entity>(
    records: Vec<T>,
    sort_field: Option<&str>,
    sort_order: &str,
) -> Result<Vec<T>, QueryError> {
    let order: SortOrder = sort_order.parse()?;

    let Some(name) = sort_field.map(str::trim).filter(|name| !name.is_empty()) else {
        return Ok(records);
    };
    let schema = T::schema();
    let field = schema.field(name).ok_or_else(|| QueryError::UnknownField {
        entity_type: schema.entity_name().to_string(),
        field: name.to_string(),
    })?;

    let mut keyed: Vec<(FieldValue, T)> = records
        .into_iter()
        .map(|record| (field.get(&record), record))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare(a, b, order));

    Ok(keyed.into_iter().map(|(_, record)| record).collect())
}

fn compare(a: &FieldValue, b: &FieldValue, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => a.sort_cmp(b),
        SortOrder::Desc => b.sort_cmp(a),
    }
}
