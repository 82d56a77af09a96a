//! Frame clock producing the application time fed to scene updates.

#[cfg(feature = "web")]
use web_sys::window;

#[cfg(not(feature = "web"))]
use std::time::Instant;

/// Measures wall time and accumulates a scaled application time.
///
/// Application time only moves through [`Clock::tick`] and
/// [`Clock::advance`], so a paused or manually stepped scene sees exactly
/// the times it was given.
#[derive(Debug)]
pub struct Clock {
    running: bool,
    start_time: f64,
    old_time: f64,
    elapsed_time: f64,
    time_scale: f64,
    application_time: f64,

    #[cfg(not(feature = "web"))]
    instant: Option<Instant>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Create a stopped clock at application time zero.
    pub fn new() -> Self {
        Self {
            running: false,
            start_time: 0.0,
            old_time: 0.0,
            elapsed_time: 0.0,
            time_scale: 1.0,
            application_time: 0.0,
            #[cfg(not(feature = "web"))]
            instant: None,
        }
    }

    /// Create and start a clock.
    pub fn start_new() -> Self {
        let mut clock = Self::new();
        clock.start();
        clock
    }

    /// Wall time in seconds.
    fn now(&self) -> f64 {
        #[cfg(feature = "web")]
        {
            window()
                .and_then(|w| w.performance())
                .map(|p| p.now() / 1000.0)
                .unwrap_or(0.0)
        }

        #[cfg(not(feature = "web"))]
        {
            self.instant
                .map(|i| i.elapsed().as_secs_f64())
                .unwrap_or(0.0)
        }
    }

    /// Start measuring wall time. Application time is kept.
    pub fn start(&mut self) {
        #[cfg(not(feature = "web"))]
        {
            self.instant = Some(Instant::now());
        }

        self.start_time = self.now();
        self.old_time = self.start_time;
        self.elapsed_time = 0.0;
        self.running = true;
    }

    /// Stop measuring wall time.
    pub fn stop(&mut self) {
        self.get_delta();
        self.running = false;
    }

    /// Wall time elapsed while running, in seconds.
    #[inline]
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    /// Wall time since the previous call, in seconds. Starts a stopped
    /// clock and returns zero.
    pub fn get_delta(&mut self) -> f64 {
        if !self.running {
            self.start();
            return 0.0;
        }

        let new_time = self.now();
        let diff = new_time - self.old_time;
        self.old_time = new_time;
        self.elapsed_time += diff;

        diff
    }

    /// Advance application time by the scaled wall delta and return it.
    pub fn tick(&mut self) -> f64 {
        let delta = self.get_delta();
        self.advance(delta)
    }

    /// Advance application time by `seconds` of wall time, scaled by the
    /// time scale. Returns the new application time.
    pub fn advance(&mut self, seconds: f64) -> f64 {
        self.application_time += seconds * self.time_scale;
        self.application_time
    }

    /// Application time in seconds.
    #[inline]
    pub fn application_time(&self) -> f64 {
        self.application_time
    }

    /// Jump to an application time.
    #[inline]
    pub fn set_application_time(&mut self, time: f64) {
        self.application_time = time;
    }

    /// Multiplier from wall time to application time.
    #[inline]
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Set the time scale. Zero pauses animation. Negative or non-finite
    /// scales are replaced by zero.
    pub fn set_time_scale(&mut self, scale: f64) {
        if scale.is_finite() && scale >= 0.0 {
            self.time_scale = scale;
        } else {
            log::warn!("Clock: invalid time scale {scale}, pausing instead");
            self.time_scale = 0.0;
        }
    }

    /// Check if the clock is running.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Restart wall time and rewind application time to zero.
    pub fn reset(&mut self) {
        self.start_time = self.now();
        self.old_time = self.start_time;
        self.elapsed_time = 0.0;
        self.application_time = 0.0;
    }
}
