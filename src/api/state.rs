use std::sync::Arc;

use chrono::Duration;

use crate::{
    auth::SessionIdentityProvider,
    db::{
        EntityStore, FavoriteRepository, MemoryStore, SessionRepository, UserRepository,
        WatchRepository,
    },
    services::{Accounts, Catalog, FavoritesLedger, WatchLedger},
};

/// Shared application state
///
/// Holds the services only; every service reaches the shared store through
/// its repository traits, so nothing here is cached between requests.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Accounts,
    pub catalog: Catalog,
    pub favorites: FavoritesLedger,
    pub watches: WatchLedger,
}

impl AppState {
    /// Wires every service to one store implementing all repository traits
    pub fn from_store<S>(store: Arc<S>, session_ttl: Duration) -> Self
    where
        S: FavoriteRepository
            + WatchRepository
            + EntityStore
            + UserRepository
            + SessionRepository
            + 'static,
    {
        let entities: Arc<dyn EntityStore> = store.clone();
        let identity = SessionIdentityProvider::new(store.clone(), session_ttl);

        Self {
            accounts: Accounts::new(store.clone(), Arc::new(identity)),
            catalog: Catalog::new(entities.clone()),
            favorites: FavoritesLedger::new(store.clone(), entities.clone()),
            watches: WatchLedger::new(store, entities),
        }
    }

    /// State over a fresh `MemoryStore`
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()), Duration::hours(24))
    }
}
