use std::{f64::consts::TAU, time::Duration};

use log::debug;

use crate::{config, types::SimError};

/// Unwrapped rotation angles, one per camera sample.
pub type AngleSequence = Vec<f64>;

/// Angle of the rotor at every sample instant `i / framerate_hz` over
/// `duration_secs`. Angles grow linearly and are never reduced mod 2π.
pub fn compute_angles(
    framerate_hz: f64,
    rotation_hz: f64,
    duration_secs: f64,
) -> Result<AngleSequence, SimError> {
    let samples = (duration_secs * framerate_hz).floor();
    if !(samples >= 1.0) {
        return Err(SimError::DegenerateSampling {
            framerate_hz,
            samples: duration_secs * framerate_hz,
        });
    }
    if samples > config::MAX_SAMPLES as f64 {
        return Err(SimError::InvalidParameters(format!(
            "Framerate too high: at most {} samples per run are supported!",
            config::MAX_SAMPLES
        )));
    }

    let count = samples as usize;
    debug!("sampling {count} frames at {framerate_hz} fps for a {rotation_hz} rps rotor");
    Ok((0..count)
        .map(|i| {
            let t = i as f64 / framerate_hz;
            TAU * rotation_hz * t
        })
        .collect())
}

/// Delay between frame ticks, rounded to whole milliseconds.
pub fn sample_interval(framerate_hz: f64) -> Duration {
    Duration::from_millis((1000.0 / framerate_hz).round() as u64)
}

/// Per-frame rotation as it appears on screen, wrapped into (-π, π].
/// Negative values read as reversed rotation, values near zero as a frozen fan.
pub fn apparent_step(rotation_hz: f64, framerate_hz: f64) -> f64 {
    let step = TAU * rotation_hz / framerate_hz;
    let wrapped = step.rem_euclid(TAU);
    if wrapped > std::f64::consts::PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

pub fn apparent_frequency_hz(rotation_hz: f64, framerate_hz: f64) -> f64 {
    apparent_step(rotation_hz, framerate_hz) * framerate_hz / TAU
}
