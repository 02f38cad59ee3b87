//! Demo data loaded by the server binary

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use super::{AppEntity, Author, Books, EntityStores, Role, RoleEntitlement, Tenant, User, UserInRole};
use crate::storage::InMemoryStore;

/// Stores holding one demo tenant with its users, roles and a small library
pub fn demo_stores() -> EntityStores {
    let now = Utc::now();
    let tenant = Tenant {
        id: Uuid::new_v4(),
        name: "Demo Library".to_string(),
        code: "DEMO".to_string(),
        is_active: true,
        created_on: now,
        ..Default::default()
    };
    let tenant_id = tenant.id;

    let admin = User {
        id: Uuid::new_v4(),
        tenant_id,
        user_name: "admin".to_string(),
        email: "admin@example.com".to_string(),
        first_name: Some("Ada".to_string()),
        last_name: Some("Admin".to_string()),
        is_active: true,
        created_on: now,
        ..Default::default()
    };
    let audit = Some(admin.id);

    let role = Role {
        id: Uuid::new_v4(),
        tenant_id,
        name: "Librarian".to_string(),
        description: Some("Manages the catalogue".to_string()),
        created_by: audit,
        created_on: now,
        ..Default::default()
    };
    let books_entity = AppEntity {
        id: Uuid::new_v4(),
        tenant_id,
        name: "Books".to_string(),
        description: Some("Catalogue entries".to_string()),
        created_by: audit,
        created_on: now,
        ..Default::default()
    };
    let membership = UserInRole {
        id: Uuid::new_v4(),
        tenant_id,
        user_id: admin.id,
        role_id: role.id,
        created_by: audit,
        created_on: now,
        ..Default::default()
    };
    let entitlement = RoleEntitlement {
        id: Uuid::new_v4(),
        tenant_id,
        role_id: role.id,
        entity_id: books_entity.id,
        can_create: true,
        can_read: true,
        can_update: true,
        can_delete: false,
        created_by: audit,
        created_on: now,
        ..Default::default()
    };

    let authors: Vec<Author> = [
        ("Ursula K. Le Guin", "ursula@example.com", "Novelist of Earthsea and Hainish worlds"),
        ("Frank Herbert", "frank@example.com", "Author of the Dune saga"),
        ("Octavia E. Butler", "octavia@example.com", "Writer of the Patternist series"),
    ]
    .into_iter()
    .map(|(name, email, biography)| Author {
        id: Uuid::new_v4(),
        tenant_id,
        name: name.to_string(),
        email: email.to_string(),
        biography: Some(biography.to_string()),
        created_by: audit,
        created_on: now,
        ..Default::default()
    })
    .collect();

    let books: Vec<Books> = [
        ("A Wizard of Earthsea", "978-0553383041", 8.99, 183, 1968, 0),
        ("The Left Hand of Darkness", "978-0441478125", 9.99, 304, 1969, 0),
        ("Dune", "978-0441172719", 10.99, 412, 1965, 1),
        ("Kindred", "978-0807083697", 12.50, 264, 1979, 2),
    ]
    .into_iter()
    .map(|(title, isbn, price, page_count, year, author)| Books {
        id: Uuid::new_v4(),
        tenant_id,
        title: title.to_string(),
        isbn: Some(isbn.to_string()),
        price,
        page_count,
        published_on: Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single(),
        author_id: authors.get(author).map(|a| a.id),
        created_by: audit,
        created_on: now,
        ..Default::default()
    })
    .collect();

    EntityStores {
        tenants: InMemoryStore::with_records([tenant]),
        authors: InMemoryStore::with_records(authors),
        books: InMemoryStore::with_records(books),
        users: InMemoryStore::with_records([admin]),
        roles: InMemoryStore::with_records([role]),
        entities: InMemoryStore::with_records([books_entity]),
        user_roles: InMemoryStore::with_records([membership]),
        role_entitlements: InMemoryStore::with_records([entitlement]),
    }
}
