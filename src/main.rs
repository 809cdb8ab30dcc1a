use clap::Parser;
use log::error;
use std::process;

use timetable_engine::config::Config;
use timetable_engine::server;

#[tokio::main]
async fn main() {
    let config = Config::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    let catalog = match config.load_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    if let Err(e) = server::run_server(config.bind, catalog).await {
        error!("Server stopped: {}", e);
        process::exit(1);
    }
}
