use self::config::Config;
use self::error::GenericError;
use self::handlers::AppState;
use self::store::PgStore;
use dotenv::dotenv;
use hyper::service::{make_service_fn, service_fn};
use hyper::Server;
use std::sync::Arc;

#[macro_use]
extern crate diesel;
#[macro_use]
extern crate log;
extern crate dotenv;

mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod schema;
mod store;

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for ctrl-c: {}", err);
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<(), GenericError> {
    pretty_env_logger::init();
    dotenv().ok();

    let config = Config::from_env()?;
    let store = PgStore::connect(&config.database_url, config.pool_size)?;
    info!("database pool ready ({} connections)", config.pool_size);
    let state = AppState::new(Arc::new(store), config.max_body_size);

    let addr = config.resolve_addr().await?;

    let new_service = make_service_fn(move |_| {
        // Each connection gets its own handle on the shared pool.
        let state = state.clone();
        async move {
            Ok::<_, GenericError>(service_fn(move |req| routes::route(req, state.clone())))
        }
    });

    let server = Server::try_bind(&addr)?
        .serve(new_service)
        .with_graceful_shutdown(shutdown_signal());

    info!("Listening on http://{}", addr);

    server.await?;

    info!("server stopped, database pool closed");

    Ok(())
}
