use std::path::PathBuf;
use std::sync::Arc;

use ansxtra::{catalog::Catalog, store::JsonFileStore, store::SharedStore, AppState};
use axum::{http::Method, Extension};
use envconfig::Envconfig;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Envconfig)]
struct Config {
    #[envconfig(from = "PORT", default = "8080")]
    pub port: u16,
    #[envconfig(from = "DATA_DIR", default = "data")]
    pub data_dir: String,
    #[envconfig(from = "STORE_PATH", default = "ansxtra-store.json")]
    pub store_path: String,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::init_from_env().unwrap();
    let catalog = Catalog::load(&PathBuf::from(&config.data_dir))
        .expect("failed to load reference catalogs");
    let store: SharedStore = Arc::new(JsonFileStore::new(PathBuf::from(&config.store_path)));
    let state = AppState::init(catalog, store).await;

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .allow_origin(Any);
    let app = ansxtra::app().layer(Extension(state)).layer(cors);

    axum::Server::bind(&([0, 0, 0, 0], config.port).into())
        .serve(app.into_make_service())
        .await
        .unwrap();
}
