use std::path::PathBuf;
use std::process::ExitCode;

use festive_particles::SceneConfig;

/// Config file from the first argument, else `FESTIVE_CONFIG`.
fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os("FESTIVE_CONFIG"))
        .map(PathBuf::from)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match config_path() {
        Some(path) => match SceneConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => SceneConfig::default(),
    };

    match festive_particles::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
