//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error responses are properly formatted
//! - Error conversions work correctly

use axum::http::StatusCode;
use axum::response::IntoResponse;
use crudkit::core::error::FieldValidationError;
use crudkit::prelude::*;
use std::sync::Arc;

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_entity_not_found_returns_404() {
        let err = CrudError::Entity(EntityError::not_found("author", Uuid::new_v4()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_entity_already_exists_returns_409() {
        let err = CrudError::Entity(EntityError::AlreadyExists {
            entity_type: "author".to_string(),
            id: Uuid::new_v4(),
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_query_errors_return_400() {
        let errors = [
            QueryError::UnknownField {
                entity_type: "Author".to_string(),
                field: "Age".to_string(),
            },
            QueryError::InvalidSortOrder {
                value: "up".to_string(),
            },
            QueryError::UnsupportedOperator {
                field: "Price".to_string(),
                operator: "Contains".to_string(),
                kind: "float".to_string(),
            },
            QueryError::InvalidValue {
                field: "PageCount".to_string(),
                kind: "integer".to_string(),
                value: "\"many\"".to_string(),
            },
        ];
        for err in errors {
            assert_eq!(CrudError::Query(err).status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_validation_errors_return_400() {
        let errors = [
            ValidationError::InvalidPageSize { value: 0 },
            ValidationError::InvalidPageNumber { value: -1 },
            ValidationError::MissingPatchDocument,
            ValidationError::MismatchedId {
                path: Uuid::new_v4(),
                body: Uuid::new_v4(),
            },
            ValidationError::InvalidQuery {
                message: "pageSize: invalid digit".to_string(),
            },
            ValidationError::InvalidId {
                message: "UUID parsing failed".to_string(),
            },
            ValidationError::ForeignReference {
                field: "AuthorId".to_string(),
                id: Uuid::new_v4(),
            },
        ];
        for err in errors {
            assert_eq!(CrudError::Validation(err).status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_metadata_error_statuses() {
        assert_eq!(
            CrudError::from(MetadataError::DirectoryNotFound {
                path: "Layout/x".to_string()
            })
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CrudError::from(MetadataError::FileNotFound {
                path: "Layout/x/list.yaml".to_string()
            })
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CrudError::from(MetadataError::Parse {
                path: "Layout/x/list.yaml".to_string(),
                message: "bad indent".to_string()
            })
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_error_returns_500() {
        let err = CrudError::Storage(StorageError::lock("in-memory", "poisoned"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }
}

// =============================================================================
// Error Response Format Tests
// =============================================================================

mod error_response_tests {
    use super::*;

    #[test]
    fn test_not_found_message_and_details() {
        let id = Uuid::new_v4();
        let response = CrudError::from(EntityError::not_found("author", id)).to_response();

        assert_eq!(response.code, "ENTITY_NOT_FOUND");
        assert_eq!(
            response.message,
            format!("No data found! author with id '{id}' not found")
        );
        let details = response.details.expect("should have details");
        assert_eq!(details["id"], id.to_string());
    }

    #[test]
    fn test_page_messages() {
        assert_eq!(
            ValidationError::InvalidPageSize { value: 0 }.to_string(),
            "Page size invalid."
        );
        assert_eq!(
            ValidationError::InvalidPageNumber { value: 0 }.to_string(),
            "Page mumber invalid."
        );
    }

    #[test]
    fn test_validation_errors_include_field_details() {
        let err = CrudError::Validation(ValidationError::FieldErrors(vec![
            FieldValidationError {
                field: "email".to_string(),
                message: "Email is not valid".to_string(),
            },
            FieldValidationError {
                field: "name".to_string(),
                message: "Name is required".to_string(),
            },
        ]));

        let response = err.to_response();
        assert_eq!(response.code, "VALIDATION_ERROR");
        assert_eq!(
            response.message,
            "Validation errors: email: Email is not valid, name: Name is required"
        );
        let details = response.details.expect("should have details");
        assert_eq!(details["fields"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_details_are_omitted_when_absent() {
        let response = CrudError::from(ValidationError::MissingPatchDocument).to_response();
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("details").is_none());
        assert_eq!(json["message"], "Patch document is missing.");
    }
}

// =============================================================================
// Error Conversion Tests
// =============================================================================

mod error_conversion_tests {
    use super::*;

    #[test]
    fn test_validator_errors_convert_to_field_errors() {
        let author = Author {
            name: String::new(),
            email: "nope".to_string(),
            ..Default::default()
        };
        let err: CrudError = author.validate().unwrap_err().into();

        match err {
            CrudError::Validation(ValidationError::FieldErrors(fields)) => {
                let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["email", "name"]);
                assert_eq!(fields[1].message, "Name is required");
            }
            other => panic!("Expected FieldErrors, got: {other:?}"),
        }
    }

    #[test]
    fn test_anyhow_error_converts_to_internal() {
        let err: CrudError = anyhow::anyhow!("fetcher exploded").into();
        assert!(matches!(err, CrudError::Internal(ref m) if m == "fetcher exploded"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

// =============================================================================
// IntoResponse Tests
// =============================================================================

mod into_response_tests {
    use super::*;

    #[test]
    fn test_crud_error_into_response_status() {
        let response = CrudError::from(EntityError::not_found("books", Uuid::new_v4())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_query_error_into_response_status() {
        let response = CrudError::from(QueryError::InvalidSortOrder {
            value: "ascending".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

// =============================================================================
// Service Error Tests
// =============================================================================

mod service_error_tests {
    use super::*;

    fn service() -> CrudService<Books> {
        CrudService::standalone(Arc::new(InMemoryStore::<Books>::new()))
    }

    #[tokio::test]
    async fn test_missing_record_operations_return_not_found() {
        let service = service();
        let ctx = RequestContext::default();
        let id = Uuid::new_v4();

        let err = service.get_by_id(&ctx, id, None).await.unwrap_err();
        assert!(matches!(err, CrudError::Entity(EntityError::NotFound { .. })));

        let book = Books {
            id,
            title: "Dune".to_string(),
            ..Default::default()
        };
        let err = service.update(&ctx, id, book).await.unwrap_err();
        assert!(matches!(err, CrudError::Entity(EntityError::NotFound { .. })));

        let err = service.delete(&ctx, id).await.unwrap_err();
        assert!(matches!(err, CrudError::Entity(EntityError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_id_is_a_conflict() {
        let service = service();
        let ctx = RequestContext::default();
        let book = Books {
            id: Uuid::new_v4(),
            title: "Dune".to_string(),
            ..Default::default()
        };

        service.create(&ctx, book.clone()).await.unwrap();
        let err = service.create(&ctx, book).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_patch_producing_invalid_entity_is_rejected() {
        let service = service();
        let ctx = RequestContext::default();
        let id = service
            .create(
                &ctx,
                Books {
                    title: "Dune".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let document = PatchDocument::from_slice(br#"[{"op":"replace","path":"/price","value":-1}]"#).unwrap();
        let err = service.patch(&ctx, id, &document).await.unwrap_err();
        assert!(matches!(err, CrudError::Validation(ValidationError::FieldErrors(_))));

        let document = PatchDocument::from_slice(br#"[{"op":"replace","path":"/pageCount","value":"many"}]"#).unwrap();
        let err = service.patch(&ctx, id, &document).await.unwrap_err();
        assert!(matches!(err, CrudError::Validation(ValidationError::InvalidPayload { .. })));
    }
}
