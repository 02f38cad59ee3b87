//! Query parameters, filter criteria and pagination utilities

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::config::PagingConfig;
use crate::core::error::{CrudError, ValidationError};

/// Query parameters accepted by every listing endpoint
///
/// # Example
/// ```text
/// GET /api/author?pageNumber=2&pageSize=10
/// GET /api/author?searchTerm=ali&sortField=Name&sortOrder=desc
/// GET /api/books?filters=[{"PropertyName":"Price","Operator":"GreaterThan","Value":10}]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListParams {
    /// Filter criteria as a JSON array
    pub filters: Option<String>,

    /// Free-text search across string properties
    pub search_term: Option<String>,

    /// Page number (starts at 1)
    pub page_number: i64,

    /// Number of items per page, defaults to the configured page size
    pub page_size: Option<i64>,

    pub sort_field: Option<String>,

    /// `asc` or `desc`, case-insensitive
    pub sort_order: Option<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            filters: None,
            search_term: None,
            page_number: 1,
            page_size: None,
            sort_field: None,
            sort_order: None,
        }
    }
}

impl ListParams {
    /// Validate paging inputs and parse the filters into a [`ListQuery`]
    pub fn into_query(self, paging: &PagingConfig) -> Result<ListQuery, CrudError> {
        let size = self.page_size.unwrap_or(paging.default_page_size as i64);
        if size < 1 {
            return Err(ValidationError::InvalidPageSize { value: size }.into());
        }
        if size > paging.max_page_size as i64 {
            return Err(ValidationError::PageSizeTooLarge {
                value: size,
                max: paging.max_page_size as i64,
            }
            .into());
        }
        if self.page_number < 1 {
            return Err(ValidationError::InvalidPageNumber {
                value: self.page_number,
            }
            .into());
        }

        let filters = match self.filters.as_deref().map(str::trim) {
            None | Some("") => Vec::new(),
            Some(raw) => serde_json::from_str::<Vec<FilterCriteria>>(raw).map_err(|e| {
                ValidationError::InvalidFilters {
                    message: e.to_string(),
                }
            })?,
        };

        Ok(ListQuery {
            filters,
            search_term: self.search_term.filter(|s| !s.trim().is_empty()),
            sort_field: self.sort_field.filter(|s| !s.trim().is_empty()),
            sort_order: self.sort_order.unwrap_or_else(|| "asc".to_string()),
            page: PageRequest::new(self.page_number as usize, size as usize),
        })
    }
}

/// A validated listing request
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub filters: Vec<FilterCriteria>,
    pub search_term: Option<String>,
    pub sort_field: Option<String>,
    /// Unparsed sort order; validated by the sort stage
    pub sort_order: String,
    pub page: PageRequest,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            search_term: None,
            sort_field: None,
            sort_order: "asc".to_string(),
            page: PageRequest::new(1, 10),
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, criteria: FilterCriteria) -> Self {
        self.filters.push(criteria);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, order: impl Into<String>) -> Self {
        self.sort_field = Some(field.into());
        self.sort_order = order.into();
        self
    }

    pub fn page(mut self, number: usize, size: usize) -> Self {
        self.page = PageRequest::new(number, size);
        self
    }
}

/// Comparison operator of a filter criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    #[serde(alias = "GreaterThanOrEqual")]
    GreaterOrEqual,
    #[serde(alias = "LessThanOrEqual")]
    LessOrEqual,
    Contains,
    StartsWith,
    EndsWith,
    In,
    NotIn,
}

impl FilterOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOperator::Equal => "Equal",
            FilterOperator::NotEqual => "NotEqual",
            FilterOperator::GreaterThan => "GreaterThan",
            FilterOperator::LessThan => "LessThan",
            FilterOperator::GreaterOrEqual => "GreaterOrEqual",
            FilterOperator::LessOrEqual => "LessOrEqual",
            FilterOperator::Contains => "Contains",
            FilterOperator::StartsWith => "StartsWith",
            FilterOperator::EndsWith => "EndsWith",
            FilterOperator::In => "In",
            FilterOperator::NotIn => "NotIn",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `{PropertyName, Operator, Value}` filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(rename = "PropertyName", alias = "propertyName")]
    pub property_name: String,

    #[serde(rename = "Operator", alias = "operator")]
    pub operator: FilterOperator,

    /// Scalar for comparisons, array for `In`/`NotIn`
    #[serde(rename = "Value", alias = "value", default)]
    pub value: Value,
}

impl FilterCriteria {
    pub fn new(property_name: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            property_name: property_name.into(),
            operator,
            value,
        }
    }
}

/// A validated page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number (starts at 1)
    pub number: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(number: usize, size: usize) -> Self {
        Self { number, size }
    }

    /// Records to skip before this page
    pub fn skip(&self) -> usize {
        self.number.saturating_sub(1).saturating_mul(self.size)
    }
}

/// One page of records with the filtered total
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Total number of items (after filters)
    pub total: usize,

    pub number: usize,
    pub size: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            number: self.number,
            size: self.size,
        }
    }
}
