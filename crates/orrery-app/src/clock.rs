//! Simulation clock: scaled, pausable elapsed time for the frame loop.

use std::time::Instant;

use tracing::{info, warn};

/// Maximum frame time clamp. Longer frames (a debugger stop, a stalled
/// host) advance the simulation by this much only.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Lower bound of the time scale.
pub const MIN_TIME_SCALE: f64 = 0.1;

/// Upper bound of the time scale.
pub const MAX_TIME_SCALE: f64 = 100.0;

/// Tracks simulation time for the frame loop.
///
/// Each tick advances `elapsed` by `frame_time * time_scale` unless paused.
/// Kinematics read [`elapsed`](Self::elapsed), so a paused clock freezes
/// every body.
#[derive(Debug)]
pub struct SimulationClock {
    previous_time: Instant,
    elapsed: f64,
    time_scale: f64,
    paused: bool,
    tick_count: u64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            elapsed: 0.0,
            time_scale: 1.0,
            paused: false,
            tick_count: 0,
        }
    }

    /// Start with the given time scale (clamped).
    pub fn with_time_scale(mut self, scale: f64) -> Self {
        self.set_time_scale(scale);
        self
    }

    /// Measure the wall time since the previous tick and advance.
    /// Returns the simulation delta.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.tick_with(frame_time)
    }

    /// Advance by an explicit frame time in seconds. Returns the simulation
    /// delta: `0` while paused.
    pub fn tick_with(&mut self, frame_time: f64) -> f64 {
        self.tick_count += 1;

        let mut frame_time = if frame_time.is_finite() {
            frame_time.max(0.0)
        } else {
            0.0
        };
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        if self.paused {
            return 0.0;
        }
        let delta = frame_time * self.time_scale;
        self.elapsed += delta;
        delta
    }

    /// Pause or resume. Resuming restarts wall-clock measurement so the
    /// paused interval is not replayed.
    pub fn set_paused(&mut self, paused: bool) {
        if paused == self.paused {
            return;
        }
        self.paused = paused;
        if !paused {
            self.previous_time = Instant::now();
        }
        info!(
            "Simulation {} at t={:.3}s",
            if paused { "paused" } else { "resumed" },
            self.elapsed
        );
    }

    pub fn pause(&mut self) {
        self.set_paused(true);
    }

    pub fn resume(&mut self) {
        self.set_paused(false);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Set the time multiplier, clamped to `[MIN_TIME_SCALE, MAX_TIME_SCALE]`.
    /// Non-finite values are ignored. Returns the scale in effect.
    pub fn set_time_scale(&mut self, scale: f64) -> f64 {
        if !scale.is_finite() {
            warn!("Ignoring non-finite time scale {scale}");
            return self.time_scale;
        }
        let clamped = scale.clamp(MIN_TIME_SCALE, MAX_TIME_SCALE);
        if clamped != scale {
            warn!("Time scale {scale} clamped to {clamped}");
        }
        if clamped != self.time_scale {
            info!("Time scale {} -> {}", self.time_scale, clamped);
            self.time_scale = clamped;
        }
        self.time_scale
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Scaled, pause-aware simulation time in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of ticks so far, paused ones included.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}
