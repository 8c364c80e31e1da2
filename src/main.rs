use anyhow::{Context, Result};
use collection_details::{
    config,
    models::collection::NewCollection,
    routes,
    services::{
        collection_store::{CollectionStore, StoreError},
        details_service::DetailsService,
        sqlite_store::SqliteCollectionStore,
    },
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{fs, io::ErrorKind, path::Path, str::FromStr, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config + migrate flag ---
    let (cfg, migrate) = config::AppConfig::from_env_and_args()?;

    tracing::info!("Starting collection-details with config: {:?}", cfg);

    // --- Initialize SQLite connection ---
    let db_url = &cfg.database_url;
    let db_path = db_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .trim_start_matches("file:");
    tracing::debug!("Interpreted SQLite path => {}", db_path);

    // Create parent directory if needed
    if !db_path.starts_with(":memory:") {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                tracing::info!("Created missing directory {:?}", parent);
            }
        }
    }

    let options = SqliteConnectOptions::from_str(db_url)
        .with_context(|| format!("parsing database url `{}`", db_url))?
        .create_if_missing(true);
    let db = Arc::new(
        SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?,
    );
    let store = SqliteCollectionStore::new(db);

    // --- Schema (idempotent) + migration mode ---
    store.migrate().await?;
    tracing::info!("Database migration complete.");
    if migrate {
        return Ok(()); // exit after migration
    }

    if let Some(seed) = cfg.seed_file.as_deref() {
        seed_collections(&store, seed).await?;
    }

    // --- Initialize core service ---
    let service =
        DetailsService::new(Arc::new(store)).with_require_if_match(cfg.require_if_match);

    // --- Build router ---
    let app = routes::routes::app(service);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Insert the collections listed in a JSON array file.
///
/// Collections that already exist are skipped so the same file can be passed
/// on every start. A new id whose handle belongs to another collection fails
/// the seed.
async fn seed_collections(store: &SqliteCollectionStore, path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading seed file {}", path.display()))?;
    let collections: Vec<NewCollection> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing seed file {}", path.display()))?;

    tracing::info!("Seeding {} collections from {}", collections.len(), path.display());

    for collection in collections {
        let id = collection.id.clone();
        match store.insert(collection).await {
            Ok(_) => tracing::debug!("seeded collection {}", id),
            Err(StoreError::CollectionAlreadyExists(_)) => {
                tracing::debug!("collection {} already present, skipping", id)
            }
            Err(err) => {
                return Err(err).with_context(|| format!("seeding collection {}", id));
            }
        }
    }
    Ok(())
}
