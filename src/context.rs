//! Per-session application context.
//!
//! DESIGN
//! ======
//! One `AppContext` is built at startup and handed by `&mut` to the guard and
//! to UI consumers. It owns every store, so there is exactly one instance per
//! session without global state, and the exclusive borrow keeps guard passes
//! from overlapping.

use std::sync::Arc;

use crate::net::types::SessionService;
use crate::state::app::PreferenceStore;
use crate::state::auth::AuthStore;
use crate::state::user::UserStore;
use crate::storage::Storage;

pub struct AppContext {
    pub auth: AuthStore,
    pub app: PreferenceStore,
    pub user: UserStore,
}

impl AppContext {
    /// Build every store over a shared service and storage scope.
    pub fn new(service: Arc<dyn SessionService>, storage: Arc<dyn Storage>) -> Self {
        Self {
            auth: AuthStore::new(service, storage.clone()),
            app: PreferenceStore::new(storage.clone()),
            user: UserStore::new(storage),
        }
    }
}
