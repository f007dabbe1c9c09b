use sea_orm::Database;
use tracing::info;

use staffdesk_directory::config::DirectoryConfig;
use staffdesk_directory::infra::feed::ChangeFeed;
use staffdesk_directory::router::build_router;
use staffdesk_directory::state::AppState;

#[tokio::main]
async fn main() {
    staffdesk_core::tracing::init_tracing();

    let config = DirectoryConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db: std::sync::Arc::new(db),
        feed: ChangeFeed::new(256),
        jwt_secret: config.jwt_secret,
        email_domain: config.email_domain,
        password_convention: config.password_convention,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.directory_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("directory service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
