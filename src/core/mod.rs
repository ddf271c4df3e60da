use std::time::{Duration, Instant};

use log::{info, trace};

use crate::{
    config,
    geometry,
    sampler::{self, AngleSequence},
    types::{ColorId, SimError, SimulationParameters, Vec2},
};

/// Tag under which blade segments are drawn and cleared.
pub const FAN_TAG: &str = "fan";

pub const RUNNING_TEXT: &str = "Simulation Running...";
pub const STOPPED_TEXT: &str = "Simulation Stopped.";

pub trait RenderSurface {
    fn clear(&mut self, tag: &str);
    fn draw_line(&mut self, tag: &str, from: Vec2, to: Vec2, color: ColorId);
    fn dimensions(&self) -> (f64, f64);
}

pub trait StatusSink {
    fn show_status(&mut self, text: &str, color: ColorId);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Stopped,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub current_index: usize,
    pub running: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Timer {
    Tick,
    SafetyTimeout,
}

/// The two cancellable deadlines a run can have pending.
#[derive(Debug, Default)]
struct Timers {
    tick: Option<Instant>,
    safety: Option<Instant>,
}

impl Timers {
    fn cancel_all(&mut self) {
        self.tick = None;
        self.safety = None;
    }

    /// Earliest timer due at `now`. The safety timeout wins ties.
    fn next_due(&self, now: Instant) -> Option<Timer> {
        match (self.safety, self.tick) {
            (Some(safety), Some(tick)) if safety <= tick && safety <= now => {
                Some(Timer::SafetyTimeout)
            }
            (_, Some(tick)) if tick <= now => Some(Timer::Tick),
            (Some(safety), _) if safety <= now => Some(Timer::SafetyTimeout),
            _ => None,
        }
    }
}

/// Drives one fan run: owns the angle sequence, the playback position and
/// the pending deadlines. Every method takes the current time so the
/// scheduling is fully deterministic.
pub struct PlaybackController {
    phase: Phase,
    state: PlaybackState,
    params: Option<SimulationParameters>,
    angles: AngleSequence,
    interval: Duration,
    mark_first: bool,
    timers: Timers,
}

impl PlaybackController {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            state: PlaybackState::default(),
            params: None,
            angles: Vec::new(),
            interval: Duration::ZERO,
            mark_first: false,
            timers: Timers::default(),
        }
    }

    pub fn start<D>(
        &mut self,
        params: SimulationParameters,
        now: Instant,
        display: &mut D,
    ) -> Result<(), SimError>
    where
        D: RenderSurface + StatusSink,
    {
        let angles = sampler::compute_angles(
            params.framerate_hz(),
            params.rotation_hz(),
            config::SAMPLE_DURATION_SECS,
        )?;

        self.timers.cancel_all();
        self.interval = sampler::sample_interval(params.framerate_hz());
        self.angles = angles;
        self.params = Some(params);
        self.state = PlaybackState {
            current_index: 0,
            running: true,
        };
        self.phase = Phase::Running;
        info!(
            "start: {} blades, {} rps, {} fps, {} frames every {:?}",
            params.blade_count(),
            params.rotation_hz(),
            params.framerate_hz(),
            self.angles.len(),
            self.interval
        );

        self.tick(now, display);
        self.timers.safety = Some(now + config::SAFETY_TIMEOUT);
        display.show_status(RUNNING_TEXT, ColorId::Running);
        Ok(())
    }

    pub fn stop<D>(&mut self, display: &mut D)
    where
        D: RenderSurface + StatusSink,
    {
        if self.phase != Phase::Stopped {
            info!("stop at frame {}", self.state.current_index);
        }
        self.state.running = false;
        self.phase = Phase::Stopped;
        self.timers.cancel_all();
        display.clear(FAN_TAG);
        display.show_status(STOPPED_TEXT, ColorId::Stopped);
    }

    /// Flips the first-blade marker and redraws the current frame in place.
    pub fn toggle_marker<R: RenderSurface>(&mut self, surface: &mut R) {
        self.mark_first = !self.mark_first;
        self.render(surface);
    }

    /// Fires every deadline that has passed by `now`.
    pub fn poll<D>(&mut self, now: Instant, display: &mut D)
    where
        D: RenderSurface + StatusSink,
    {
        while let Some(timer) = self.timers.next_due(now) {
            match timer {
                Timer::SafetyTimeout => {
                    info!("safety timeout reached");
                    self.stop(display);
                }
                Timer::Tick => {
                    self.timers.tick = None;
                    self.tick(now, display);
                }
            }
        }
    }

    fn tick<R: RenderSurface>(&mut self, now: Instant, surface: &mut R) {
        if !self.state.running {
            return;
        }
        self.render(surface);
        if self.state.current_index + 1 < self.angles.len() {
            self.state.current_index += 1;
            self.timers.tick = Some(now + self.interval);
        } else {
            trace!("angle sequence exhausted at frame {}", self.state.current_index);
        }
    }

    fn render<R: RenderSurface>(&self, surface: &mut R) {
        surface.clear(FAN_TAG);
        let blade_count = self.params.map_or(0, |p| p.blade_count());
        let angle = self.current_angle();
        let (width, height) = surface.dimensions();
        let (center, radius) = geometry::fan_layout(width, height);
        trace!("frame {} at {angle:.4} rad", self.state.current_index);
        for segment in geometry::blade_segments(center, radius, blade_count, angle, self.mark_first)
        {
            let color = if segment.marked {
                ColorId::MarkedBlade
            } else {
                ColorId::Blade
            };
            surface.draw_line(FAN_TAG, segment.from, segment.to, color);
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn parameters(&self) -> Option<SimulationParameters> {
        self.params
    }

    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    pub fn current_angle(&self) -> f64 {
        self.angles
            .get(self.state.current_index)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn marker(&self) -> bool {
        self.mark_first
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_tick_due(&self) -> Option<Instant> {
        self.timers.tick
    }

    /// Running, but with no further frames to show.
    pub fn is_exhausted(&self) -> bool {
        self.state.running && self.timers.tick.is_none()
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new()
    }
}
