use log::info;
use matan::Utils::config::Config;
use matan::Utils::logger::{default_log_file_name, init_logger};
use matan::tasks::run_and_archive;
use std::path::PathBuf;

fn run(config_path: &str) -> Result<(), String> {
    let cfg = Config::load(config_path)?;
    let log_file = cfg.logging.log_file.as_ref().map(|name| {
        if name.eq_ignore_ascii_case("auto") {
            default_log_file_name()
        } else {
            PathBuf::from(name)
        }
    });
    init_logger(&cfg.logging.level, log_file.as_deref())?;
    info!("configuration loaded from {}", config_path);
    run_and_archive(&cfg)?;
    info!(" \n \n Program ended");
    Ok(())
}

fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.txt".to_string());
    if let Err(e) = run(&config_path) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
