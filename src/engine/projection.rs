//! Field projection mapper
//!
//! Reshapes a record graph into a sparse, ordered map holding only the
//! requested fields. Field lists are comma-separated; `.` descends into a
//! related record, e.g. `Title,AuthorId_Author.Name`.

use indexmap::IndexMap;
use serde::Serialize;

use crate::core::entity::{Member, Record};
use crate::core::field::FieldValue;

/// Sparse projection of a record: requested key to value, in request order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Projection(IndexMap<String, ProjectedValue>);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProjectedValue {
    Scalar(FieldValue),
    Nested(Projection),
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ProjectedValue) {
        self.0.insert(key.into(), value);
    }

    /// Value stored under exactly `key`
    pub fn get(&self, key: &str) -> Option<&ProjectedValue> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProjectedValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field list that reproduces this projection's shape
    pub fn field_list(&self) -> String {
        let mut paths = Vec::new();
        collect_paths(self, "", &mut paths);
        paths.join(",")
    }

    fn find(&self, name: &str) -> Option<&ProjectedValue> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name.trim()))
            .map(|(_, value)| value)
    }
}

fn collect_paths(projection: &Projection, prefix: &str, paths: &mut Vec<String>) {
    for (key, value) in projection.iter() {
        let path = format!("{prefix}{key}");
        match value {
            ProjectedValue::Scalar(_) => paths.push(path),
            ProjectedValue::Nested(nested) if nested.is_empty() => paths.push(path),
            ProjectedValue::Nested(nested) => collect_paths(nested, &format!("{path}."), paths),
        }
    }
}

impl Record for Projection {
    fn member(&self, name: &str) -> Option<Member<'_>> {
        self.find(name).map(|value| match value {
            ProjectedValue::Scalar(value) => Member::Scalar(value.clone()),
            ProjectedValue::Nested(nested) => Member::Related(Some(nested as &dyn Record)),
        })
    }

    fn scalar_names(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, value)| matches!(value, ProjectedValue::Scalar(_)))
            .map(|(key, _)| key)
            .collect()
    }
}

/// Split a field list into trimmed paths, dropping empty segments
fn parse_fields(fields: &str) -> Vec<Vec<&str>> {
    fields
        .split(',')
        .map(|segment| {
            segment
                .split('.')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|path| !path.is_empty())
        .collect()
}

/// Project `record` onto a comma-separated field list
pub fn map_to_fields(record: &dyn Record, fields: &str) -> Projection {
    let paths = parse_fields(fields);
    project(record, &paths)
}

struct Group<'f> {
    key: &'f str,
    whole: bool,
    suffixes: Vec<Vec<&'f str>>,
}

fn project(record: &dyn Record, paths: &[Vec<&str>]) -> Projection {
    // Group by head segment, keeping the first requested casing
    let mut groups: IndexMap<String, Group<'_>> = IndexMap::new();
    for path in paths {
        let Some((head, rest)) = path.split_first() else {
            continue;
        };
        let group = groups
            .entry(head.to_ascii_lowercase())
            .or_insert_with(|| Group {
                key: *head,
                whole: false,
                suffixes: Vec::new(),
            });
        if rest.is_empty() {
            group.whole = true;
        } else {
            group.suffixes.push(rest.to_vec());
        }
    }

    let mut projection = Projection::new();
    for group in groups.values() {
        match record.member(group.key) {
            None => {}
            Some(Member::Scalar(value)) => {
                projection.insert(group.key, ProjectedValue::Scalar(value));
            }
            Some(Member::Related(None)) => {}
            Some(Member::Related(Some(related))) => {
                let mut nested_paths: Vec<Vec<&str>> = Vec::new();
                if group.whole {
                    nested_paths.extend(related.scalar_names().into_iter().map(|name| vec![name]));
                }
                nested_paths.extend(group.suffixes.iter().cloned());
                projection.insert(
                    group.key,
                    ProjectedValue::Nested(project(related, &nested_paths)),
                );
            }
        }
    }
    projection
}

/// Prepend `Id` to a non-empty field list unless it is already requested
pub fn ensure_id_field(fields: &str) -> String {
    let has_id = fields
        .split(',')
        .any(|segment| segment.trim().eq_ignore_ascii_case("id"));
    if has_id || fields.trim().is_empty() {
        fields.to_string()
    } else {
        format!("Id,{fields}")
    }
}

/// Top-level segments of a field list, in request order
pub fn head_segments(fields: &str) -> Vec<&str> {
    parse_fields(fields)
        .into_iter()
        .filter_map(|path| path.first().copied())
        .collect()
}
