use std::{
    error::Error,
    fmt,
    ops::{Add, Mul, Sub},
};

use rand::Rng;

use crate::config;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `angle` radians.
    pub fn from_angle(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, sin)
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorId {
    Blade,
    MarkedBlade,
    Running,
    Stopped,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SimError {
    InvalidParameters(String),
    /// The framerate yields fewer than one sample over the sampling window.
    DegenerateSampling { framerate_hz: f64, samples: f64 },
}

impl SimError {
    pub fn is_invalid_parameters(&self) -> bool {
        matches!(
            self,
            SimError::InvalidParameters(_) | SimError::DegenerateSampling { .. }
        )
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidParameters(reason) => write!(f, "{reason}"),
            SimError::DegenerateSampling {
                framerate_hz,
                samples,
            } => write!(
                f,
                "Framerate {framerate_hz} fps yields {samples:.3} samples in {}s; at least one is required!",
                config::SAMPLE_DURATION_SECS
            ),
        }
    }
}

impl Error for SimError {}

pub const INVALID_INPUT: &str = "Invalid Input!";
pub const NOT_POSITIVE: &str = "Blades, frequency, and framerate must be positive values!";

/// Inputs of one run. Construct through [`SimulationParameters::new`] or
/// [`SimulationParameters::parse`] so the positivity invariant holds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParameters {
    blade_count: u32,
    rotation_hz: f64,
    framerate_hz: f64,
}

impl SimulationParameters {
    pub fn new(blade_count: u32, rotation_hz: f64, framerate_hz: f64) -> Result<Self, SimError> {
        if !rotation_hz.is_finite() || !framerate_hz.is_finite() {
            return Err(SimError::InvalidParameters(INVALID_INPUT.to_string()));
        }
        if blade_count == 0 || rotation_hz <= 0.0 || framerate_hz <= 0.0 {
            return Err(SimError::InvalidParameters(NOT_POSITIVE.to_string()));
        }
        if blade_count > config::MAX_BLADES {
            return Err(SimError::InvalidParameters(format!(
                "At most {} blades are supported!",
                config::MAX_BLADES
            )));
        }
        Ok(Self {
            blade_count,
            rotation_hz,
            framerate_hz,
        })
    }

    /// Parses the three raw input fields.
    pub fn parse(blades: &str, frequency: &str, framerate: &str) -> Result<Self, SimError> {
        let invalid = || SimError::InvalidParameters(INVALID_INPUT.to_string());
        let blades: i64 = blades.trim().parse().map_err(|_| invalid())?;
        let rotation_hz: f64 = frequency.trim().parse().map_err(|_| invalid())?;
        let framerate_hz: f64 = framerate.trim().parse().map_err(|_| invalid())?;
        if blades <= 0 {
            return Err(SimError::InvalidParameters(NOT_POSITIVE.to_string()));
        }
        let blades = u32::try_from(blades).map_err(|_| invalid())?;
        Self::new(blades, rotation_hz, framerate_hz)
    }

    /// Picks a blade count and a framerate/frequency pair less than half a
    /// hertz apart, where the aliasing is easiest to see.
    pub fn near_resonance<R: Rng>(rng: &mut R) -> Self {
        let blade_count = rng.gen_range(config::RANDOM_BLADES_MIN..=config::RANDOM_BLADES_MAX);
        let framerate_hz = round_to(
            rng.gen_range(config::RANDOM_FRAMERATE_MIN..config::RANDOM_FRAMERATE_MAX),
            10.0,
        );
        let detune = round_to(rng.gen_range(0.05..=config::RANDOM_DETUNE_MAX), 100.0);
        let rotation_hz = if rng.gen_bool(0.5) {
            framerate_hz + detune
        } else {
            framerate_hz - detune
        };
        Self {
            blade_count,
            rotation_hz: round_to(rotation_hz, 100.0),
            framerate_hz,
        }
    }

    pub fn blade_count(&self) -> u32 {
        self.blade_count
    }

    pub fn rotation_hz(&self) -> f64 {
        self.rotation_hz
    }

    pub fn framerate_hz(&self) -> f64 {
        self.framerate_hz
    }
}

fn round_to(value: f64, scale: f64) -> f64 {
    (value * scale).round() / scale
}
