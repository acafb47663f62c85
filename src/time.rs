//! Simulation clock.
//!
//! The scene itself is driven by absolute simulation time: every animated
//! quantity (node wobble, field positions, breathing, twinkle) is a function of
//! it. [`SimulationClock`] produces that time either from the wall clock, for
//! interactive hosts, or by fixed steps, for headless and deterministic runs.
//!
//! # Example
//!
//! ```ignore
//! use orbshell::time::SimulationClock;
//!
//! let mut clock = SimulationClock::fixed_step(Duration::from_secs_f32(1.0 / 60.0));
//!
//! loop {
//!     let now = clock.advance();
//!     scene.tick(now);
//! }
//! ```

use std::time::{Duration, Instant};

/// How the clock measures time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClockMode {
    /// Real elapsed time since the clock was created, minus paused spans.
    Wall,
    /// Every [`SimulationClock::advance`] moves time forward by exactly `step`.
    Fixed { step: Duration },
}

/// Source of simulation time and frame counts.
#[derive(Debug)]
pub struct SimulationClock {
    mode: ClockMode,
    /// When the clock was created or last reset.
    start: Instant,
    /// Wall time spent paused.
    paused_total: Duration,
    /// Set while paused.
    paused_at: Option<Instant>,
    /// Accumulated time in fixed-step mode.
    stepped: Duration,
    /// Frames advanced while running.
    frame_count: u64,
}

impl SimulationClock {
    /// Wall-clock time starting now.
    pub fn new() -> Self {
        Self::with_mode(ClockMode::Wall)
    }

    /// Deterministic clock advancing by `step` per frame.
    pub fn fixed_step(step: Duration) -> Self {
        Self::with_mode(ClockMode::Fixed { step })
    }

    pub fn with_mode(mode: ClockMode) -> Self {
        Self {
            mode,
            start: Instant::now(),
            paused_total: Duration::ZERO,
            paused_at: None,
            stepped: Duration::ZERO,
            frame_count: 0,
        }
    }

    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    /// Mark the start of a new frame. Returns the simulation time in seconds
    /// to pass to [`Scene::tick`](crate::Scene::tick).
    ///
    /// While paused, time does not move and frames are not counted.
    pub fn advance(&mut self) -> f32 {
        if !self.is_paused() {
            if let ClockMode::Fixed { step } = self.mode {
                self.stepped += step;
            }
            self.frame_count += 1;
        }
        self.now()
    }

    /// Current simulation time in seconds.
    #[inline]
    pub fn now(&self) -> f32 {
        self.elapsed().as_secs_f32()
    }

    /// Current simulation time.
    pub fn elapsed(&self) -> Duration {
        match self.mode {
            ClockMode::Fixed { .. } => self.stepped,
            ClockMode::Wall => {
                let until = self.paused_at.unwrap_or_else(Instant::now);
                until
                    .saturating_duration_since(self.start)
                    .saturating_sub(self.paused_total)
            }
        }
    }

    /// Frames advanced while running.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Freeze simulation time.
    pub fn pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(Instant::now());
        }
    }

    /// Continue after [`pause`](Self::pause); the paused span is not counted.
    pub fn resume(&mut self) {
        if let Some(at) = self.paused_at.take() {
            self.paused_total += at.elapsed();
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Restart from zero, keeping the mode.
    pub fn reset(&mut self) {
        *self = Self::with_mode(self.mode);
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = SimulationClock::new();
        assert_eq!(clock.frame(), 0);
        assert!(!clock.is_paused());
        assert_eq!(clock.mode(), ClockMode::Wall);
    }

    #[test]
    fn test_wall_clock_advances() {
        let mut clock = SimulationClock::new();
        thread::sleep(Duration::from_millis(10));
        let now = clock.advance();
        assert!(now > 0.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_fixed_step_is_exact() {
        let mut clock = SimulationClock::fixed_step(Duration::from_millis(250));
        for _ in 0..4 {
            clock.advance();
        }
        assert_eq!(clock.elapsed(), Duration::from_secs(1));
        assert_eq!(clock.now(), 1.0);
        assert_eq!(clock.frame(), 4);
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut clock = SimulationClock::fixed_step(Duration::from_millis(100));
        clock.advance();
        clock.pause();
        let before = clock.now();
        clock.advance();
        clock.advance();
        assert_eq!(clock.now(), before);
        assert_eq!(clock.frame(), 1);

        clock.resume();
        clock.advance();
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_wall_pause_excludes_paused_span() {
        let mut clock = SimulationClock::new();
        clock.pause();
        let frozen = clock.elapsed();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(clock.elapsed(), frozen);
        clock.resume();
        assert!(clock.elapsed() < frozen + Duration::from_millis(20));
    }

    #[test]
    fn test_reset() {
        let mut clock = SimulationClock::fixed_step(Duration::from_millis(16));
        clock.advance();
        clock.toggle_pause();
        clock.reset();
        assert_eq!(clock.frame(), 0);
        assert!(!clock.is_paused());
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }
}
