mod normalize;

use anyhow::{Context, Result};
use markdown_composer_config::Settings;
use std::{env, io, path::PathBuf, process};

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} <markdown-file> [--config <config-path>]");
    process::exit(1);
}

fn load_settings(config_arg: Option<PathBuf>) -> Result<Settings> {
    match config_arg {
        Some(path) => match Settings::load_from_path(&path)? {
            Some(settings) => Ok(settings),
            None => anyhow::bail!("config file '{}' not found", path.display()),
        },
        None => {
            let config_path = Settings::config_path();
            log::debug!("Config path: {}", config_path.display());
            Ok(Settings::load()?.unwrap_or_default())
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("markdown-composer-cli", String::as_str);

    let (input, config_arg) = match args.as_slice() {
        [_, input] => (PathBuf::from(input), None),
        [_, input, flag, config] if flag == "--config" => {
            (PathBuf::from(input), Some(PathBuf::from(config)))
        }
        _ => usage(program),
    };

    let settings = load_settings(config_arg)?;
    log::debug!("Settings: {settings:?}");

    let source = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read '{}'", input.display()))?;

    let writer = normalize::compose(&source, &settings, Some(Box::new(io::stdout())));
    log::debug!("Normalized {} into {} line(s)", input.display(), writer.line_count());
    writer.finish()?;
    Ok(())
}
