mod app;
mod config;
mod debug;
mod ecs;
mod events;
mod farm;
mod fence;
mod field;
mod input;
mod render;
mod session;

use config::FarmConfig;

fn main() {
    env_logger::init();
    log::info!("Farm Ride starting up");

    let config = match FarmConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Bad config: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = app::run(config) {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
