use driftfield::{Backdrop, BackdropConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match BackdropConfig::load(&path) {
            Ok(config) => {
                log::info!("loaded config from {}", path);
                config
            }
            Err(e) => {
                log::error!("{}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => BackdropConfig::default(),
    };

    if let Err(e) = Backdrop::new().with_config(config).run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
