//! Profile UI server - hosts one editable profile form session over HTTP.

mod routes;
mod sse;
mod state;

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use chrono::NaiveDate;
use clap::Parser;
use profile::core::session::SessionState;
use profile::io::config::load_config;
use profile::io::init::ProfilePaths;
use profile::io::profile_store::load_profile;
use profile::record::default_profile;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "profile-ui")]
#[command(about = "Web session server for the editable profile form")]
struct Args {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Port to listen on
    #[arg(long, default_value = "3001")]
    port: u16,

    /// Project directory (contains .profile/)
    #[arg(long, default_value = ".")]
    project_dir: PathBuf,

    /// Static form UI to serve; without it only the API is exposed
    #[arg(long)]
    ui_dir: Option<PathBuf>,

    /// Fixed evaluation date for age rules (defaults to the local date)
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("profile_ui=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let state = session_state(&args.project_dir)?.with_today(args.today);

    let mut app = Router::new()
        .nest("/api", routes::api_router())
        .route("/events", get(sse::events_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);
    if let Some(ui_dir) = args.ui_dir {
        info!(ui_dir = %ui_dir.display(), "serving form UI");
        app = app.fallback_service(ServeDir::new(ui_dir).append_index_html_on_directories(true));
    }

    let addr = SocketAddr::new(args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(%addr, "profile-ui listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Seed the session from the committed snapshot, or from the sample profile
/// (kept in memory) when the project has no `.profile/`.
fn session_state(project_dir: &Path) -> anyhow::Result<AppState> {
    let paths = ProfilePaths::new(project_dir);
    let validation = load_config(&paths.config_path)
        .context("load config.toml")?
        .validation();
    if !paths.is_initialized() {
        info!(project_dir = %project_dir.display(), "no .profile/ found, session is in-memory only");
        return Ok(AppState::new(SessionState::new(default_profile()), validation, None));
    }
    let committed =
        load_profile(&paths.schema_path, &paths.profile_path).context("load committed profile")?;
    info!(path = %paths.profile_path.display(), "loaded committed profile");
    Ok(AppState::new(SessionState::new(committed), validation, Some(paths)))
}
