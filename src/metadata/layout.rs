//! Form layout model served to the admin UI

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single UI field of a form layout.
///
/// Layout files use PascalCase keys (`FieldName`, `DataType`); camelCase keys
/// are accepted as well. Responses use camelCase and omit unset options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all(serialize = "camelCase", deserialize = "PascalCase"),
    default
)]
pub struct Field {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_close: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_button: Option<bool>,
    /// Grid width, 1 to 12
    pub column: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<Vec<Value>>,
    /// `string`, `guid`, `numeric`, ... or a container (`section`, `tab`, `groupfield`)
    pub data_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filterable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_multi_select_checkbox: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_spinners_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_value_primitive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxlength: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minlength: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_for_search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resizable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_default_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_horizontal: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_individual: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_numeric_format: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggest: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_field: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    #[serde(alias = "Type")]
    pub field_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_field: Option<String>,
    /// Children of a container field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<Field>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_title: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_extended_entity: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_view_template: Option<Vec<Field>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_many_to_many_entity: Option<bool>,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            auto_close: None,
            clear_button: None,
            column: 12,
            data_source: None,
            data_type: "string".to_string(),
            entity_name: None,
            field_name: None,
            default_value: None,
            hint: None,
            filterable: None,
            format: None,
            icon: None,
            is_multi_select_checkbox: None,
            is_spinners_required: None,
            is_value_primitive: None,
            label: None,
            length: None,
            max: None,
            max_date: None,
            maxlength: None,
            min: None,
            min_date: None,
            minlength: None,
            operator_for_search: None,
            read_only: None,
            required: None,
            resizable: None,
            scale: None,
            show_default_value: None,
            show_horizontal: None,
            show_individual: None,
            show_numeric_format: None,
            suggest: None,
            text_field: None,
            field_type: None,
            value: None,
            value_field: None,
            fields: None,
            show_title: None,
            api_url: None,
            is_extended_entity: None,
            lookup_view: None,
            lookup_view_template: None,
            is_many_to_many_entity: None,
        }
    }
}

const CONTAINER_TYPES: [&str; 3] = ["section", "tab", "groupfield"];

impl Field {
    pub fn new(data_type: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            field_name: Some(field_name.into()),
            ..Default::default()
        }
    }

    /// Whether this field only groups other fields
    pub fn is_container(&self) -> bool {
        CONTAINER_TYPES
            .iter()
            .any(|t| self.data_type.eq_ignore_ascii_case(t))
    }

    /// Field list a form built from `layout` requests for a single record.
    ///
    /// Containers are flattened. A `guid` field linked to an entity also
    /// requests the lookup's value and text fields through the
    /// `{FieldName}_{EntityName}` navigation property.
    pub fn requested_fields(layout: &[Field]) -> Vec<String> {
        let mut fields = Vec::new();
        collect_requested(layout, &mut fields);
        fields
    }
}

fn collect_requested(layout: &[Field], out: &mut Vec<String>) {
    for field in layout {
        if field.is_container() {
            if let Some(children) = &field.fields {
                collect_requested(children, out);
            }
            continue;
        }
        let Some(name) = field.field_name.as_deref().filter(|n| !n.trim().is_empty()) else {
            continue;
        };
        if out.iter().any(|existing| existing.eq_ignore_ascii_case(name)) {
            continue;
        }
        out.push(name.to_string());

        if field.data_type.eq_ignore_ascii_case("guid") {
            if let Some(entity) = field.entity_name.as_deref() {
                let value_field = field.value_field.as_deref().unwrap_or("Id");
                let text_field = field.text_field.as_deref().unwrap_or("Name");
                out.push(format!("{name}_{entity}.{value_field}"));
                out.push(format!("{name}_{entity}.{text_field}"));
            }
        }
    }
}

/// A layout file available for an entity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDetails {
    /// File name up to the first `.`
    pub id: String,
    pub name: String,
    /// Extension without the dot
    pub file_type: String,
}

impl FileDetails {
    pub fn from_file_name(name: &str) -> Self {
        let id = name.split('.').next().unwrap_or_default().to_string();
        let file_type = std::path::Path::new(name)
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            id,
            name: name.to_string(),
            file_type,
        }
    }
}

/// Upper-case the first letter of every field key so camelCase layout files
/// deserialize like PascalCase ones. Free-form values are left untouched.
pub(crate) fn normalize_layout_keys(value: &mut Value) {
    let Value::Array(items) = value else {
        return;
    };
    for item in items {
        let Value::Object(map) = item else {
            continue;
        };
        let entries = std::mem::take(map);
        for (key, mut child) in entries {
            let key = pascal_key(&key);
            if key == "Fields" || key == "LookupViewTemplate" {
                normalize_layout_keys(&mut child);
            }
            map.insert(key, child);
        }
    }
}

fn pascal_key(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
