mod app;
mod renderer;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use scrollwork_core::MotionConfig;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: scrollwork [--config <motion.json>] [--log <file>] [--narrow] [--reduced-motion]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    log: Option<PathBuf>,
    narrow: bool,
    reduced_motion: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                parsed.config = Some(args.next().context("--config needs a path")?.into());
            }
            "--log" => parsed.log = Some(args.next().context("--log needs a path")?.into()),
            "--narrow" => parsed.narrow = true,
            "--reduced-motion" => parsed.reduced_motion = true,
            other => bail!("unknown argument `{other}`\n{USAGE}"),
        }
    }
    Ok(parsed)
}

/// The terminal belongs to the preview, so logs only go to a file.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    if let Some(path) = &args.log {
        init_logging(path)?;
    }

    let config = match &args.config {
        Some(path) => {
            let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            MotionConfig::from_json(&data).with_context(|| format!("loading {}", path.display()))?
        }
        None => MotionConfig::default(),
    };

    let app = app::App::new(config, args.narrow, args.reduced_motion)?;
    renderer::run(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| (*s).to_owned()))
    }

    #[test]
    fn parses_flags_and_paths() {
        let parsed = args(&["--narrow", "--log", "out.log"]).unwrap_or_default();
        assert_eq!(
            parsed,
            Args {
                log: Some(PathBuf::from("out.log")),
                narrow: true,
                ..Args::default()
            }
        );
    }

    #[test]
    fn rejects_unknown_and_dangling() {
        assert!(args(&["--frobnicate"]).is_err());
        assert!(args(&["--config"]).is_err());
    }
}
