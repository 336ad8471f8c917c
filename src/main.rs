use windglobe::{app, AppConfig};

fn main() {
    env_logger::init();

    if let Err(err) = app::run(AppConfig::default()) {
        log::error!("startup failed: {err}");
        eprintln!("{}", app::FALLBACK_MESSAGE);
        std::process::exit(1);
    }
}
