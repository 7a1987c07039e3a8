mod app;
mod auth;
mod common;
mod config;
mod error;
mod ingredients;
mod recipes;
mod state;
mod tags;
mod users;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "recipebox=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = state::AppState::init().await?;
    sqlx::migrate!("./migrations").run(&state.db).await?;

    if let Some(bootstrap) = state.config.superuser.clone() {
        users::repo::ensure_superuser(&state.db, &bootstrap.email, &bootstrap.password).await?;
    }

    let app = app::build_app(state);
    app::serve(app).await
}
