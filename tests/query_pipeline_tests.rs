//! Listing pipeline: filter → sort → paginate over entity snapshots

use crudkit::core::entity::Entity;
use crudkit::core::error::QueryError;
use crudkit::core::field::FieldValue;
use crudkit::core::query::{FilterCriteria, FilterOperator, ListQuery, PageRequest};
use crudkit::engine::{self, filter, paginate, sort};
use crudkit::entities::{Author, Books};
use serde_json::json;
use uuid::Uuid;

fn author(name: &str) -> Author {
    Author {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        ..Default::default()
    }
}

fn names(records: &[Author]) -> Vec<&str> {
    records.iter().map(|a| a.name.as_str()).collect()
}

fn book(title: &str, price: f64, pages: i32) -> Books {
    Books {
        id: Uuid::new_v4(),
        title: title.to_string(),
        price,
        page_count: pages,
        ..Default::default()
    }
}

fn library() -> Vec<Books> {
    vec![
        book("Dune", 10.99, 412),
        book("Kindred", 12.5, 264),
        book("Emma", 5.0, 474),
        book("Beloved", 12.5, 324),
        book("Ubik", 7.25, 202),
        book("Solaris", 9.0, 204),
    ]
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_filter_equal_selects_matching_record() {
    let records = vec![author("Alice"), author("Bob")];
    let query = ListQuery::new().filter(FilterCriteria::new("Name", FilterOperator::Equal, json!("Alice")));

    let page = engine::run_listing(records, &query).unwrap();
    assert_eq!(names(&page.items), vec!["Alice"]);
    assert_eq!(page.total, 1);
}

#[test]
fn test_sort_descending_by_name() {
    let sorted = sort::apply(vec![author("Bob"), author("Alice")], Some("Name"), "desc").unwrap();
    assert_eq!(names(&sorted), vec!["Bob", "Alice"]);

    let sorted = sort::apply(vec![author("Alice"), author("Bob")], Some("Name"), "desc").unwrap();
    assert_eq!(names(&sorted), vec!["Bob", "Alice"]);
}

#[test]
fn test_second_page_of_single_items() {
    let records = vec![author("Alice"), author("Bob"), author("Carol")];
    let query = ListQuery::new().page(2, 1);

    let page = engine::run_listing(records, &query).unwrap();
    assert_eq!(names(&page.items), vec!["Bob"]);
    assert_eq!(page.total, 3);
}

#[test]
fn test_invalid_sort_order_returns_no_records() {
    let records = vec![author("Alice"), author("Bob")];
    let query = ListQuery::new().sort_by("Name", "ascending");

    let err = engine::run_listing(records, &query).unwrap_err();
    assert_eq!(
        err,
        QueryError::InvalidSortOrder {
            value: "ascending".to_string()
        }
    );
}

#[test]
fn test_invalid_sort_order_without_sort_field() {
    let query = ListQuery {
        sort_order: "sideways".to_string(),
        ..ListQuery::new()
    };
    assert!(engine::run_listing(vec![author("Alice")], &query).is_err());
}

#[test]
fn test_search_then_sort_then_page() {
    let query = ListQuery::new()
        .filter(FilterCriteria::new("Price", FilterOperator::GreaterOrEqual, json!(9)))
        .search("E")
        .sort_by("PageCount", "DESC")
        .page(1, 2);

    let page = engine::run_listing(library(), &query).unwrap();
    let titles: Vec<&str> = page.items.iter().map(|b| b.title.as_str()).collect();
    // Dune, Kindred and Beloved contain an "e"; Solaris does not
    assert_eq!(page.total, 3);
    assert_eq!(titles, vec!["Dune", "Beloved"]);
}

#[test]
fn test_unknown_sort_field_fails() {
    let err = sort::apply(library(), Some("Publisher"), "asc").unwrap_err();
    assert!(matches!(err, QueryError::UnknownField { ref field, .. } if field == "Publisher"));
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_filter_is_conjunction_of_criteria() {
    let criteria = [
        FilterCriteria::new("Price", FilterOperator::LessThan, json!(12)),
        FilterCriteria::new("PageCount", FilterOperator::GreaterThan, json!(203)),
        FilterCriteria::new("Title", FilterOperator::Contains, json!("u")),
    ];

    let combined = filter::apply(library(), &criteria, None).unwrap();
    let expected: Vec<Books> = criteria.iter().fold(library(), |records, criterion| {
        filter::apply(records, std::slice::from_ref(criterion), None).unwrap()
    });

    let ids = |records: &[Books]| records.iter().map(|b| b.id).collect::<Vec<_>>();
    assert_eq!(ids(&combined), ids(&expected));
    assert_eq!(
        combined.iter().map(|b| b.title.as_str()).collect::<Vec<_>>(),
        vec!["Dune"]
    );
}

#[test]
fn test_sort_is_monotonic_and_stable_permutation() {
    for (field, order) in [("Price", "asc"), ("Price", "desc"), ("Title", "asc"), ("PageCount", "desc")] {
        let input = library();
        let sorted = sort::apply(input.clone(), Some(field), order).unwrap();
        assert_eq!(sorted.len(), input.len());

        let descriptor = Books::schema().field(field).unwrap();
        for pair in sorted.windows(2) {
            let (a, b) = (descriptor.get(&pair[0]), descriptor.get(&pair[1]));
            let ordering = a.sort_cmp(&b);
            if order == "asc" {
                assert!(ordering.is_le(), "{field} {order}");
            } else {
                assert!(ordering.is_ge(), "{field} {order}");
            }
            if ordering.is_eq() {
                let position = |id| input.iter().position(|r| r.id == id).unwrap();
                assert!(position(pair[0].id) < position(pair[1].id), "ties keep input order");
            }
        }
    }
}

#[test]
fn test_sort_ties_keep_input_order() {
    let sorted = sort::apply(library(), Some("Price"), "desc").unwrap();
    let titles: Vec<&str> = sorted.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles[..2], ["Kindred", "Beloved"]);
}

#[test]
fn test_pages_are_disjoint_and_consecutive() {
    let records: Vec<Books> = library();
    let total = records.len();

    for size in 1..=total + 1 {
        let mut seen = Vec::new();
        for number in 1..=total + 2 {
            let page = paginate::apply(records.clone(), PageRequest::new(number, size));
            let expected_len = size.min(total.saturating_sub((number - 1) * size));
            assert_eq!(page.items.len(), expected_len, "page {number} size {size}");
            assert_eq!(page.total, total);
            seen.extend(page.items.into_iter().map(|b| b.id));
        }
        let all: Vec<Uuid> = records.iter().map(|b| b.id).collect();
        assert_eq!(seen, all, "pages of size {size} cover the input once");
    }
}

#[test]
fn test_listing_filters_before_paging() {
    let query = ListQuery::new()
        .filter(FilterCriteria::new("Price", FilterOperator::Equal, json!("12.5")))
        .page(1, 1);

    let page = engine::run_listing(library(), &query).unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].title, "Kindred");
}

#[test]
fn test_filter_values_are_coerced_to_field_kind() {
    let id = Uuid::new_v4();
    let mut records = library();
    records[2].author_id = Some(id);

    let found = filter::apply(
        records,
        &[FilterCriteria::new("AuthorId", FilterOperator::Equal, json!(id.to_string()))],
        None,
    )
    .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(Books::schema().field("authorid").unwrap().get(&found[0]), FieldValue::Uuid(id));
}
