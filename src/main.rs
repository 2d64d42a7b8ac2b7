use std::net::SocketAddr;
use std::sync::Arc;

use todo_web::application::account_service::AccountServiceImpl;
use todo_web::application::task_service::TaskServiceImpl;
use todo_web::http::routes::{self, AppState};
use todo_web::infrastructure::avatar::AvatarStore;
use todo_web::infrastructure::sqlite_store::SqliteStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://todo.db".to_string());
    // Ensure SQLite file can be created/opened when using a file-backed URL
    prepare_sqlite_file(&database_url)?;
    let store = SqliteStore::connect(&database_url).await?;
    store.init().await?;

    let avatar_dir = std::env::var("AVATAR_DIR").unwrap_or_else(|_| "static/img".to_string());
    let state = AppState {
        accounts: Arc::new(AccountServiceImpl::new(store.clone())),
        tasks: Arc::new(TaskServiceImpl::new(store)),
        avatars: Arc::new(AvatarStore::new(avatar_dir)?),
    };
    let router = routes::app(state);

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()?;
    tracing::info!(%addr, "listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}

fn prepare_sqlite_file(database_url: &str) -> anyhow::Result<()> {
    // Skip in-memory
    if database_url.starts_with("sqlite::memory:") {
        return Ok(());
    }
    if let Some(path) = database_url.strip_prefix("sqlite://") {
        use std::fs::{self, OpenOptions};
        use std::path::Path;
        let p = Path::new(path);
        if let Some(parent) = p.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        if !p.exists() {
            let _ = OpenOptions::new().create(true).append(true).open(p)?;
        }
    }
    Ok(())
}
