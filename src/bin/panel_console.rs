use std::io;

use log::{error, info};
use ms_panel::{
    client::{console, console::ConsolePage, HttpTransport, PanelActions, RequestGateway},
    env::ClientEnvironment,
    logger,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = logger::init_logger(&ClientEnvironment::log_file(), false) {
        eprintln!("Couldn't create logger, shutting down: {}", &e);
        return;
    }

    let env = ClientEnvironment::load();
    let transport = match HttpTransport::new(env.origin.clone(), env.accept_invalid_certs) {
        Ok(transport) => transport,
        Err(e) => {
            error!("Couldn't create HTTP client: {}", &e);
            eprintln!("Couldn't create HTTP client: {}", &e);
            return;
        }
    };

    info!("Starting panel console for {}", &env.origin);
    let actions = PanelActions::new(RequestGateway::new(env.origin, transport));
    let mut page = ConsolePage::new(io::stdin().lock(), io::stdout());
    if let Err(e) = console::run(&actions, &mut page).await {
        error!("Console closed with an error: {}", &e);
    }
    info!("Panel console closed");
}
