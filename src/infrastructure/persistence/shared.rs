//! Process-wide store accessor.

use sqlx::AnyPool;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

use super::cached_route_store::{CachedRouteStore, StoreOptions};

static SHARED_STORE: OnceLock<Arc<CachedRouteStore>> = OnceLock::new();

/// Returns the process-wide store, building it on the first call.
///
/// Later calls return the original instance whatever their arguments; a call
/// whose options would produce a different configuration is logged at `warn`
/// and otherwise ignored. Code that needs an isolated store, such as tests,
/// should use [`CachedRouteStore::new`] instead.
pub fn shared_store(pool: AnyPool, options: StoreOptions) -> Arc<CachedRouteStore> {
    let requested = options.settings();

    let store = SHARED_STORE.get_or_init(|| {
        info!(
            "Initializing shared route store ({}, {} cache)",
            requested.dialect, requested.cache
        );
        Arc::new(CachedRouteStore::new(pool, options))
    });

    if store.settings() != requested {
        warn!(
            "Shared route store already initialized with {:?}; ignoring requested {:?}",
            store.settings(),
            requested
        );
    }

    Arc::clone(store)
}
