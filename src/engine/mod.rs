//! Generic listing and projection engine shared by every entity service
//!
//! A listing request runs [`filter`] → [`sort`] → [`paginate`]; a
//! single-record read with a field list runs [`projection`]. Every stage is a
//! pure function of its inputs.

pub mod filter;
pub mod paginate;
pub mod projection;
pub mod sort;

pub use filter::Predicate;
pub use projection::{ProjectedValue, Projection, ensure_id_field, map_to_fields};
pub use sort::SortOrder;

use crate::core::entity::Entity;
use crate::core::error::QueryError;
use crate::core::query::{ListQuery, Page};

/// Run the full listing pipeline over a snapshot of records
pub fn run_listing<T: Entity>(records: Vec<T>, query: &ListQuery) -> Result<Page<T>, QueryError> {
    let scanned = records.len();
    let filtered = filter::apply(records, &query.filters, query.search_term.as_deref())?;
    tracing::debug!(
        entity = T::resource_name(),
        scanned,
        matched = filtered.len(),
        criteria = query.filters.len(),
        "filtered records"
    );

    let ordered = sort::apply(filtered, query.sort_field.as_deref(), &query.sort_order)?;
    tracing::debug!(
        entity = T::resource_name(),
        sort_field = query.sort_field.as_deref().unwrap_or(""),
        sort_order = %query.sort_order,
        "sorted records"
    );

    let page = paginate::apply(ordered, query.page);
    tracing::debug!(
        entity = T::resource_name(),
        page = page.number,
        size = page.size,
        returned = page.items.len(),
        "paginated records"
    );
    Ok(page)
}
