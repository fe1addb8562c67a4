use std::sync::Arc;

use axum::Router;

pub mod api;
pub mod applications;
pub mod catalog;
pub mod error;
pub mod session;
pub mod status;
pub mod store;

use applications::ApplicationRepo;
use catalog::Catalog;
use session::SessionStore;
use store::SharedStore;

/// Everything a handler needs, injected explicitly instead of living in
/// module-level globals like the prototype did.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub sessions: SessionStore,
    pub applications: ApplicationRepo,
}

impl AppState {
    /// Builds both stores over one shared persistence backend and restores
    /// the persisted session, dropping it if it no longer parses.
    pub async fn init(catalog: Catalog, store: SharedStore) -> AppState {
        let catalog = Arc::new(catalog);
        let sessions = SessionStore::new(Arc::clone(&store), Arc::clone(&catalog));
        let applications = ApplicationRepo::new(store, Arc::clone(&catalog));
        let _ = sessions.restore().await;
        AppState {
            catalog,
            sessions,
            applications,
        }
    }
}

pub fn app() -> Router {
    Router::new().nest("/api", api::app())
}
