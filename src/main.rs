//! `orb-viewer`: show the orb in a window, or render a PNG snapshot.
//!
//! ```text
//! orb-viewer [--config FILE] [--snapshot OUT.png [--ticks N] [--size WxH]]
//! ```

mod window;

use std::path::PathBuf;

use winit::event_loop::{ControlFlow, EventLoop};

use energy_orb::{Canvas, Engine, EngineConfig, ViewerError};

const DEFAULT_SNAPSHOT_TICKS: u32 = 300;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    snapshot: Option<PathBuf>,
    ticks: Option<u32>,
    size: Option<(u32, u32)>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, ViewerError> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| ViewerError::Usage(format!("{flag} needs a value")))
        };
        match arg.as_str() {
            "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
            "--snapshot" => parsed.snapshot = Some(PathBuf::from(value("--snapshot")?)),
            "--ticks" => {
                let raw = value("--ticks")?;
                let ticks = raw
                    .parse()
                    .map_err(|_| ViewerError::Usage(format!("invalid tick count '{raw}'")))?;
                parsed.ticks = Some(ticks);
            }
            "--size" => {
                let raw = value("--size")?;
                parsed.size = Some(parse_size(&raw)?);
            }
            other => return Err(ViewerError::Usage(format!("unknown argument '{other}'"))),
        }
    }
    if parsed.snapshot.is_none() && (parsed.ticks.is_some() || parsed.size.is_some()) {
        return Err(ViewerError::Usage("--ticks and --size need --snapshot".into()));
    }
    Ok(parsed)
}

fn parse_size(raw: &str) -> Result<(u32, u32), ViewerError> {
    let bad = || ViewerError::Usage(format!("invalid size '{raw}', expected WxH"));
    let (w, h) = raw.split_once('x').ok_or_else(bad)?;
    Ok((w.parse().map_err(|_| bad())?, h.parse().map_err(|_| bad())?))
}

/// Run `ticks` steps on a CPU canvas and write the last frame.
fn snapshot(config: EngineConfig, out: PathBuf, ticks: u32, (width, height): (u32, u32)) -> Result<(), ViewerError> {
    let mut engine = Engine::create(Canvas::new(width, height), config)?;
    for _ in 0..ticks {
        engine.tick();
    }
    engine.surface().save(&out)?;

    let stats = engine.stats();
    log::info!(
        "wrote {} after {} ticks ({} particles, {} drawn)",
        out.display(),
        stats.tick,
        stats.active,
        stats.rendered
    );
    Ok(())
}

fn main() -> Result<(), ViewerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1))?;
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    if let Some(out) = args.snapshot {
        let ticks = args.ticks.unwrap_or(DEFAULT_SNAPSHOT_TICKS);
        return snapshot(config, out, ticks, args.size.unwrap_or((400, 400)));
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = window::App::new(config);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, ViewerError> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_snapshot_args() {
        let parsed = args(&["--snapshot", "orb.png", "--ticks", "120", "--size", "320x240"]).expect("valid");
        assert_eq!(parsed.snapshot, Some(PathBuf::from("orb.png")));
        assert_eq!(parsed.ticks, Some(120));
        assert_eq!(parsed.size, Some((320, 240)));
        assert!(parsed.config.is_none());
    }

    #[test]
    fn test_parse_rejects_bad_args() {
        assert!(matches!(args(&["--ticks"]), Err(ViewerError::Usage(_))));
        assert!(matches!(args(&["--bogus"]), Err(ViewerError::Usage(_))));
        assert!(matches!(args(&["--ticks", "10"]), Err(ViewerError::Usage(_))));
        assert!(matches!(args(&["--snapshot", "a.png", "--size", "40by40"]), Err(ViewerError::Usage(_))));
    }

    #[test]
    fn test_snapshot_writes_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("orb.png");
        snapshot(EngineConfig::default().with_seed(1), out.clone(), 60, (120, 120)).expect("snapshot");

        let image = image::open(&out).expect("png").to_rgba8();
        assert_eq!(image.dimensions(), (120, 120));
        assert!(image.pixels().any(|p| p[3] > 0));
    }
}
