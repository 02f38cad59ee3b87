//! Entity definitions of the admin backend and the module serving them

pub mod macros;

mod app_entity;
mod author;
mod books;
mod role;
mod role_entitlement;
mod tenant;
mod user;
mod user_in_role;

pub mod seed;

pub use app_entity::AppEntity;
pub use author::Author;
pub use books::Books;
pub use role::Role;
pub use role_entitlement::RoleEntitlement;
pub use tenant::Tenant;
pub use user::User;
pub use user_in_role::UserInRole;

use std::sync::Arc;

use crate::core::entity::Entity;
use crate::core::module::{EntityFetcher, EntityFetchers, Module};
use crate::core::service::CrudService;
use crate::server::{CrudDescriptor, EntityRegistry};
use crate::storage::InMemoryStore;

/// One in-memory store per entity type
#[derive(Clone, Default)]
pub struct EntityStores {
    pub tenants: InMemoryStore<Tenant>,
    pub authors: InMemoryStore<Author>,
    pub books: InMemoryStore<Books>,
    pub users: InMemoryStore<User>,
    pub roles: InMemoryStore<Role>,
    pub entities: InMemoryStore<AppEntity>,
    pub user_roles: InMemoryStore<UserInRole>,
    pub role_entitlements: InMemoryStore<RoleEntitlement>,
}

/// Module exposing every admin entity under `/api/{resource}`
pub struct AdminModule {
    stores: EntityStores,
}

impl AdminModule {
    pub fn new(stores: EntityStores) -> Self {
        Self { stores }
    }
}

fn register<T: Entity>(registry: &mut EntityRegistry, store: &InMemoryStore<T>, fetchers: &EntityFetchers) {
    let service = CrudService::<T>::new(Arc::new(store.clone()), Arc::clone(fetchers));
    registry.register(Box::new(CrudDescriptor::new(service)));
}

fn fetcher<T: Entity>(store: &InMemoryStore<T>) -> Arc<dyn EntityFetcher> {
    Arc::new(store.clone())
}

impl Module for AdminModule {
    fn name(&self) -> &str {
        "admin"
    }

    fn entity_types(&self) -> Vec<&str> {
        vec![
            Tenant::resource_name(),
            Author::resource_name(),
            Books::resource_name(),
            User::resource_name(),
            Role::resource_name(),
            AppEntity::resource_name(),
            UserInRole::resource_name(),
            RoleEntitlement::resource_name(),
        ]
    }

    fn register_entities(&self, registry: &mut EntityRegistry, fetchers: EntityFetchers) {
        let stores = &self.stores;
        register(registry, &stores.tenants, &fetchers);
        register(registry, &stores.authors, &fetchers);
        register(registry, &stores.books, &fetchers);
        register(registry, &stores.users, &fetchers);
        register(registry, &stores.roles, &fetchers);
        register(registry, &stores.entities, &fetchers);
        register(registry, &stores.user_roles, &fetchers);
        register(registry, &stores.role_entitlements, &fetchers);
    }

    fn get_entity_fetcher(&self, entity_type: &str) -> Option<Arc<dyn EntityFetcher>> {
        let stores = &self.stores;
        match entity_type {
            "tenant" => Some(fetcher(&stores.tenants)),
            "author" => Some(fetcher(&stores.authors)),
            "books" => Some(fetcher(&stores.books)),
            "user" => Some(fetcher(&stores.users)),
            "role" => Some(fetcher(&stores.roles)),
            "entity" => Some(fetcher(&stores.entities)),
            "userinrole" => Some(fetcher(&stores.user_roles)),
            "roleentitlement" => Some(fetcher(&stores.role_entitlements)),
            _ => None,
        }
    }
}
