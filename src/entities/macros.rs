//! Macros for reducing boilerplate when defining entities
//!
//! The struct itself is written by hand (serde and validator attributes stay
//! visible); the macro generates the [`Entity`](crate::core::entity::Entity)
//! and [`Record`](crate::core::entity::Record) implementations and the schema.

/// Implement `Entity` and `Record` for a struct with the standard
/// `id` / audit layout.
///
/// Every entity must have the fields `id: Uuid`, `created_by: Option<Uuid>`,
/// `created_on: DateTime<Utc>`, `updated_by: Option<Uuid>` and
/// `updated_on: Option<DateTime<Utc>>`. They are added to the schema as
/// `Id`, `CreatedBy`, `CreatedOn`, `UpdatedBy` and `UpdatedOn`. A `tenant:`
/// entry names the `Uuid` field holding the owning tenant, exposed as
/// `TenantId`.
///
/// # Example
/// ```rust,ignore
/// impl_crud_entity!(Books {
///     resource: "books",
///     name: "Books",
///     tenant: tenant_id,
///     fields: {
///         "Title" => title: String,
///         "AuthorId" => author_id: Option<Uuid>,
///     },
///     relations: {
///         "AuthorId_Author" => author_id_author: Author ["AuthorId"],
///     },
/// });
/// ```
#[macro_export]
macro_rules! impl_crud_entity {
    (
        $type:ident {
            resource: $resource:literal,
            name: $name:literal,
            $( tenant: $tenant:ident, )?
            fields: { $( $fname:literal => $field:ident : $fty:ty ),* $(,)? },
            relations: { $( $rname:literal => $rfield:ident : $target:ty [ $fk:literal ] ),* $(,)? } $(,)?
        }
    ) => {
        impl $crate::core::entity::Record for $type {
            fn member(&self, name: &str) -> Option<$crate::core::entity::Member<'_>> {
                <Self as $crate::core::entity::Entity>::schema().member(self, name)
            }

            fn scalar_names(&self) -> Vec<&str> {
                <Self as $crate::core::entity::Entity>::schema().scalar_names()
            }
        }

        impl $crate::core::entity::Entity for $type {
            fn resource_name() -> &'static str {
                $resource
            }

            fn schema() -> &'static $crate::core::schema::EntitySchema<Self> {
                use $crate::core::field::{FieldKind, FieldType};
                use $crate::core::schema::{EntitySchema, FieldDescriptor, RelationDescriptor};

                static SCHEMA: ::std::sync::OnceLock<EntitySchema<$type>> =
                    ::std::sync::OnceLock::new();

                SCHEMA.get_or_init(|| {
                    let mut fields: Vec<FieldDescriptor<$type>> = vec![FieldDescriptor::new(
                        "Id",
                        FieldKind::Uuid,
                        |e: &$type| e.id.to_field_value(),
                    )];
                    $(
                        fields.push(FieldDescriptor::new(
                            "TenantId",
                            FieldKind::Uuid,
                            |e: &$type| e.$tenant.to_field_value(),
                        ));
                    )?
                    $(
                        fields.push(FieldDescriptor::new(
                            $fname,
                            <$fty as FieldType>::KIND,
                            |e: &$type| e.$field.to_field_value(),
                        ));
                    )*
                    fields.push(FieldDescriptor::new(
                        "CreatedBy",
                        FieldKind::Uuid,
                        |e: &$type| e.created_by.to_field_value(),
                    ));
                    fields.push(FieldDescriptor::new(
                        "CreatedOn",
                        FieldKind::DateTime,
                        |e: &$type| e.created_on.to_field_value(),
                    ));
                    fields.push(FieldDescriptor::new(
                        "UpdatedBy",
                        FieldKind::Uuid,
                        |e: &$type| e.updated_by.to_field_value(),
                    ));
                    fields.push(FieldDescriptor::new(
                        "UpdatedOn",
                        FieldKind::DateTime,
                        |e: &$type| e.updated_on.to_field_value(),
                    ));

                    let relations: Vec<RelationDescriptor<$type>> = vec![
                        $(
                            RelationDescriptor::new(
                                $rname,
                                $fk,
                                <$target as $crate::core::entity::Entity>::resource_name(),
                                |e: &$type| {
                                    e.$rfield
                                        .as_deref()
                                        .map(|r| r as &dyn $crate::core::entity::Record)
                                },
                                |e: &mut $type, value: ::serde_json::Value| {
                                    let related: $target = ::serde_json::from_value(value)?;
                                    e.$rfield = Some(::std::boxed::Box::new(related));
                                    Ok(())
                                },
                                |e: &mut $type| e.$rfield = None,
                            ),
                        )*
                    ];

                    EntitySchema::new($name, fields, relations)
                })
            }

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn set_id(&mut self, id: ::uuid::Uuid) {
                self.id = id;
            }

            $(
                fn tenant_id(&self) -> Option<::uuid::Uuid> {
                    Some(self.$tenant)
                }

                fn assign_tenant(&mut self, tenant_id: ::uuid::Uuid) {
                    self.$tenant = tenant_id;
                }
            )?

            fn stamp_created(
                &mut self,
                user: Option<::uuid::Uuid>,
                at: ::chrono::DateTime<::chrono::Utc>,
            ) {
                self.created_by = user;
                self.created_on = at;
            }

            fn stamp_updated(
                &mut self,
                user: Option<::uuid::Uuid>,
                at: ::chrono::DateTime<::chrono::Utc>,
            ) {
                self.updated_by = user;
                self.updated_on = Some(at);
            }

            fn carry_created_from(&mut self, stored: &Self) {
                self.created_by = stored.created_by;
                self.created_on = stored.created_on;
            }
        }
    };
}
