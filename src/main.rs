use std::{net::SocketAddr, sync::Arc, time::Duration};

use log::{error, info};
use ms_panel::{
    env::{self, Environment},
    logger,
    models::auth::Keys,
    Context, SessionSettings,
};
use rand::RngCore;
use tokio::time::interval;

const SCRUB_PERIOD: Duration = Duration::from_secs(5);

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logger::init_logger(&Environment::log_file(), true)
        .expect("Couldn't create logger, shutting down...");

    let (username, password) = match env::load_credentials() {
        Ok((u, p)) => (u, p),
        Err(e) => {
            error!("Couldn't load credentials: {}", &e);
            return;
        }
    };

    if username.is_empty() || password.is_empty() {
        error!("Username and password must not be empty!");
        return;
    }

    let env = Environment::load();

    let mut secret = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut secret);
    let keys = Keys::new(&secret);

    let session = SessionSettings {
        max_age: cookie::time::Duration::minutes(i64::from(env.session_minutes.get())),
        secure: env.secure_cookie,
    };
    let server_timeout = Duration::from_secs(u64::from(env.server_timeout.get()));
    let context = Arc::new(Context::new(username, password, keys, session, server_timeout));

    tokio::spawn(scrub_servers(context.clone()));

    info!("Starting web server on {}...", &env.bind_addr);
    let router = ms_panel::router(context);
    let result = axum::Server::bind(&env.bind_addr)
        .serve(router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(_r) => info!("Closing web server..."),
                Err(e) => error!("Couldn't listen for shutdown signal: {}", &e),
            }
        })
        .await;

    match result {
        Ok(_r) => {}
        Err(e) => error!("Error while waiting for the web server to shutdown: {}", &e),
    };
}

async fn scrub_servers(context: Arc<Context>) {
    let mut ticker = interval(SCRUB_PERIOD);
    loop {
        ticker.tick().await;
        let removed = context.servers.scrub().await;
        if removed > 0 {
            info!("Removed {} expired server(s)", removed);
        }
    }
}
