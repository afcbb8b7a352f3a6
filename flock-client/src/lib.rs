use anyhow::{Context, Result};
use flock_core::{create_rng, rng::entropy_rng, FlockStd};
use flock_shared::{AgentSnapshot, FlockSettings, FrameRecord};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

/// How a headless run is driven
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Frames to advance
    pub frames: u64,
    /// Write a record every `every` frames; must be at least 1
    pub every: u64,
    /// Read peers as they were before each frame instead of in-place
    pub simultaneous: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            frames: 100,
            every: 1,
            simultaneous: false,
        }
    }
}

/// What a finished run looked like
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub records: u64,
    /// Birds outside the world box after the last frame
    pub outside: usize,
    pub elapsed: Duration,
}

/// Loads settings from a JSON file, or the defaults when no path is given.
pub fn load_settings(path: Option<&Path>) -> Result<FlockSettings> {
    let Some(path) = path else {
        return Ok(FlockSettings::default());
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    FlockSettings::from_json(&json)
        .with_context(|| format!("Invalid settings in {}", path.display()))
}

pub fn build_flock(settings: &FlockSettings) -> Result<FlockStd> {
    let rng = match settings.seed {
        Some(seed) => create_rng(seed),
        None => entropy_rng(),
    };

    let flock = FlockStd::initialize_with_config(
        settings.population,
        settings.bounds(),
        settings.agent_config(),
        rng,
    )
    .context("Failed to spawn flock")?;

    log::debug!("Spawned {} birds in {:?}", flock.len(), settings.bounds());
    Ok(flock)
}

pub fn record(flock: &FlockStd) -> FrameRecord {
    FrameRecord {
        frame: flock.frame(),
        birds: flock.snapshot().map(AgentSnapshot::from).collect(),
    }
}

/// Advances `flock` and writes one JSON line per recorded frame to `out`.
pub fn run<W: Write>(flock: &mut FlockStd, options: &RunOptions, out: &mut W) -> Result<RunSummary> {
    anyhow::ensure!(options.every > 0, "Record stride must be at least 1");

    let start = Instant::now();
    let mut records = 0;

    for _ in 0..options.frames {
        if options.simultaneous {
            flock.advance_frame_simultaneous();
        } else {
            flock.advance_frame();
        }

        if flock.frame() % options.every == 0 {
            serde_json::to_writer(&mut *out, &record(flock)).context("Failed to encode frame")?;
            writeln!(out).context("Failed to write frame")?;
            records += 1;
        }

        if flock.frame() % 1000 == 0 {
            log::debug!("Frame {}", flock.frame());
        }
    }
    out.flush().context("Failed to flush output")?;

    let outside = flock
        .agents()
        .iter()
        .filter(|agent| !agent.bounds().contains(agent.position()))
        .count();
    if outside > 0 {
        log::warn!("{} birds ended outside the world box", outside);
    }

    Ok(RunSummary {
        frames: options.frames,
        records,
        outside,
        elapsed: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(population: usize, seed: u64) -> FlockSettings {
        FlockSettings {
            population,
            seed: Some(seed),
            ..FlockSettings::default()
        }
    }

    #[test]
    fn test_record_covers_every_bird() {
        let flock = build_flock(&seeded(7, 1)).unwrap();
        let record = record(&flock);
        assert_eq!(record.frame, 0);
        assert_eq!(record.birds.len(), 7);
        assert!(record.birds.iter().enumerate().all(|(i, b)| b.index == i));
    }

    #[test]
    fn test_stride_controls_record_count() {
        let mut flock = build_flock(&seeded(5, 2)).unwrap();
        let options = RunOptions {
            frames: 10,
            every: 3,
            simultaneous: false,
        };
        let mut out = Vec::new();

        let summary = run(&mut flock, &options, &mut out).unwrap();

        assert_eq!(summary.frames, 10);
        assert_eq!(summary.records, 3);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_zero_stride_rejected() {
        let mut flock = build_flock(&seeded(5, 2)).unwrap();
        let options = RunOptions {
            every: 0,
            ..RunOptions::default()
        };
        assert!(run(&mut flock, &options, &mut Vec::new()).is_err());
    }

    #[test]
    fn test_invalid_settings_fail() {
        assert!(build_flock(&seeded(0, 1)).is_err());
    }

    #[test]
    fn test_missing_settings_file() {
        let err = load_settings(Some(Path::new("/nonexistent/flock.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read settings"));
    }
}
