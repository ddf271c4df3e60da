use std::time::Duration;

/// Length of the precomputed angle sequence, in seconds of camera time.
pub const SAMPLE_DURATION_SECS: f64 = 60.0;
/// Wall-clock limit after which a run is stopped unconditionally.
pub const SAFETY_TIMEOUT: Duration = Duration::from_secs(60);
/// Upper bound on the number of precomputed samples (1 kHz for a full minute).
pub const MAX_SAMPLES: usize = 60_000;

pub const RADIUS_FRACTION: f64 = 0.4;
pub const MAX_BLADES: u32 = 360;

pub const DEFAULT_BLADES: u32 = 4;
pub const DEFAULT_FREQUENCY_HZ: f64 = 10.0;
pub const DEFAULT_FRAMERATE_HZ: f64 = 9.9;

pub const INPUT_MAX_LEN: usize = 12;

pub const POLL_INTERVAL: Duration = Duration::from_millis(1);
pub const IDLE_REDRAW: Duration = Duration::from_millis(250);

pub const RANDOM_BLADES_MIN: u32 = 2;
pub const RANDOM_BLADES_MAX: u32 = 6;
pub const RANDOM_FRAMERATE_MIN: f64 = 4.0;
pub const RANDOM_FRAMERATE_MAX: f64 = 10.0;
pub const RANDOM_DETUNE_MAX: f64 = 0.5;

#[derive(clap::Parser, Debug, Clone)]
#[command(name = "fan-strobe")]
#[command(about = "Stroboscopic fan: a rotor sampled at a camera framerate")]
pub struct Args {
    /// Number of fan blades
    #[arg(long, default_value_t = DEFAULT_BLADES)]
    pub blades: u32,

    /// True rotation frequency in revolutions per second
    #[arg(long, default_value_t = DEFAULT_FREQUENCY_HZ)]
    pub frequency: f64,

    /// Camera framerate in frames per second
    #[arg(long, default_value_t = DEFAULT_FRAMERATE_HZ)]
    pub framerate: f64,

    /// Start the simulation immediately
    #[arg(long)]
    pub autostart: bool,

    /// Skip the welcome popup
    #[arg(long)]
    pub no_help: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<std::path::PathBuf>,
}
