//! Progress accent driver
//!
//! While a generation is in flight the widget border shows a full-circle
//! gradient sweep that rotates a fixed step every frame. [`AccentDriver`] is
//! the state machine behind it:
//!
//! - **Idle**: angle pinned at 0, nothing scheduled
//! - **Spinning**: a frame callback advances the angle by `step` degrees
//!   (mod 360) on every tick
//!
//! The angle shares one atomic word with an activation epoch. Each start and
//! stop moves to a new epoch, and a frame callback only advances the angle
//! while its own epoch is current. A callback that a concurrent tick has
//! already picked up when the driver stops therefore leaves the angle at 0.
//! Dropping the driver stops it, which ties the frame loop to the widget's
//! lifetime.
//!
//! Rotation speed follows the host's frame rate; there is no fixed duration.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use sparkle_core::{AccentConfig, Color, ConfigError, SPARKLE_GLOW, SPARKLE_PALETTE};

use crate::scheduler::{FrameCallbackId, SchedulerHandle};

/// Default rotation per frame, in degrees
pub const DEFAULT_STEP_DEGREES: u16 = 2;

/// Epoch in the high half, angle in the low half
fn pack(epoch: u32, angle: u16) -> u64 {
    (u64::from(epoch) << 32) | u64::from(angle)
}

fn epoch_of(state: u64) -> u32 {
    (state >> 32) as u32
}

fn angle_of(state: u64) -> u16 {
    (state & 0xFFFF) as u16
}

/// Frame-driven rotation of the accent sweep
pub struct AccentDriver {
    scheduler: Option<SchedulerHandle>,
    state: Arc<AtomicU64>,
    epoch: u32,
    step: u16,
    accented: bool,
    callback: Option<FrameCallbackId>,
}

impl AccentDriver {
    /// Create an idle driver
    ///
    /// Without a scheduler the driver still tracks the accented flag but the
    /// angle never leaves 0.
    pub fn new(scheduler: Option<SchedulerHandle>, step: u16) -> Self {
        Self {
            scheduler,
            state: Arc::new(AtomicU64::new(0)),
            epoch: 0,
            step: step % 360,
            accented: false,
            callback: None,
        }
    }

    /// Enter the spinning state (no-op if already accented)
    pub fn start(&mut self) {
        if self.accented {
            return;
        }
        self.accented = true;
        let epoch = self.advance_epoch();

        let state = Arc::downgrade(&self.state);
        let step = self.step;
        self.callback = self.scheduler.as_ref().and_then(|scheduler| {
            scheduler.add_frame_callback(move |_dt| {
                if let Some(state) = state.upgrade() {
                    // Fails only once this activation has ended.
                    let _ = state.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                        (epoch_of(current) == epoch)
                            .then(|| pack(epoch, (angle_of(current) + step) % 360))
                    });
                }
            })
        });

        if self.callback.is_none() {
            tracing::debug!("AccentDriver: no live scheduler, accent will not rotate");
        } else {
            tracing::trace!("AccentDriver: spinning");
        }
    }

    /// Return to idle: cancel the frame callback and reset the angle
    pub fn stop(&mut self) {
        if let Some(id) = self.callback.take() {
            if let Some(scheduler) = &self.scheduler {
                scheduler.remove_frame_callback(id);
            }
        }
        if self.accented {
            tracing::trace!("AccentDriver: stopped at {}°", self.angle());
        }
        self.accented = false;
        self.advance_epoch();
    }

    /// Move to a fresh epoch with the angle reset to 0
    fn advance_epoch(&mut self) -> u32 {
        self.epoch = self.epoch.wrapping_add(1);
        self.state.store(pack(self.epoch, 0), Ordering::SeqCst);
        self.epoch
    }

    /// Current start angle of the sweep, 0..360
    pub fn angle(&self) -> u16 {
        angle_of(self.state.load(Ordering::SeqCst))
    }

    pub fn is_accented(&self) -> bool {
        self.accented
    }

    /// True while a frame callback is registered
    pub fn is_spinning(&self) -> bool {
        self.callback.is_some()
    }

    pub fn step(&self) -> u16 {
        self.step
    }
}

impl Drop for AccentDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for AccentDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccentDriver")
            .field("accented", &self.accented)
            .field("angle", &self.angle())
            .field("step", &self.step)
            .field("spinning", &self.is_spinning())
            .finish()
    }
}

// ============================================================================
// Accent Rendering
// ============================================================================

/// A gradient stop along the sweep
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position around the circle, 0.0 (start angle) to 1.0 (full turn)
    pub offset: f32,
    pub color: Color,
}

/// A glow shadow around the accented border
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlowShadow {
    pub color: Color,
    pub blur_radius: f32,
}

/// Everything a renderer needs to draw one frame of the accent
#[derive(Clone, Debug, PartialEq)]
pub struct AccentFrame {
    /// Start angle of the conic sweep, in degrees
    pub start_angle: u16,
    pub stops: Vec<GradientStop>,
    pub glow: Vec<GlowShadow>,
}

/// Parsed accent palette
#[derive(Clone, Debug, PartialEq)]
pub struct AccentStyle {
    palette: Arc<[Color]>,
    glow: Arc<[GlowShadow]>,
}

impl AccentStyle {
    pub fn from_config(config: &AccentConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let palette: Vec<Color> = config.palette()?;
        let glow: Vec<GlowShadow> = config
            .glow_colors()?
            .into_iter()
            .map(|(color, blur_radius)| GlowShadow { color, blur_radius })
            .collect();
        Ok(Self {
            palette: palette.into(),
            glow: glow.into(),
        })
    }

    /// Build the frame for a given start angle
    pub fn frame(&self, start_angle: u16) -> AccentFrame {
        let last = (self.palette.len().max(2) - 1) as f32;
        AccentFrame {
            start_angle,
            stops: self
                .palette
                .iter()
                .enumerate()
                .map(|(i, &color)| GradientStop {
                    offset: i as f32 / last,
                    color,
                })
                .collect(),
            glow: self.glow.to_vec(),
        }
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }
}

impl Default for AccentStyle {
    fn default() -> Self {
        Self {
            palette: SPARKLE_PALETTE.iter().map(|&hex| Color::from_hex(hex)).collect(),
            glow: SPARKLE_GLOW
                .iter()
                .map(|&(hex, blur_radius)| GlowShadow {
                    color: Color::from_hex(hex >> 8).with_alpha((hex & 0xFF) as f32 / 255.0),
                    blur_radius,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::FrameScheduler;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn test_idle_driver_is_pinned_at_zero() {
        let scheduler = FrameScheduler::new();
        let driver = AccentDriver::new(Some(scheduler.handle()), DEFAULT_STEP_DEGREES);

        scheduler.tick(FRAME);
        assert_eq!(driver.angle(), 0);
        assert!(!driver.is_accented());
        assert_eq!(scheduler.frame_callback_count(), 0);
    }

    #[test]
    fn test_spinning_advances_two_degrees_per_frame() {
        let scheduler = FrameScheduler::new();
        let mut driver = AccentDriver::new(Some(scheduler.handle()), DEFAULT_STEP_DEGREES);

        driver.start();
        assert!(driver.is_accented());
        assert!(driver.is_spinning());

        for expected in [2, 4, 6, 8] {
            scheduler.tick(FRAME);
            assert_eq!(driver.angle(), expected);
        }
    }

    #[test]
    fn test_angle_wraps_at_360() {
        let scheduler = FrameScheduler::new();
        let mut driver = AccentDriver::new(Some(scheduler.handle()), DEFAULT_STEP_DEGREES);
        driver.start();

        for _ in 0..179 {
            scheduler.tick(FRAME);
        }
        assert_eq!(driver.angle(), 358);
        scheduler.tick(FRAME);
        assert_eq!(driver.angle(), 0);
        scheduler.tick(FRAME);
        assert_eq!(driver.angle(), 2);
    }

    #[test]
    fn test_stop_cancels_callback_and_resets() {
        let scheduler = FrameScheduler::new();
        let mut driver = AccentDriver::new(Some(scheduler.handle()), DEFAULT_STEP_DEGREES);
        driver.start();
        scheduler.tick(FRAME);
        scheduler.tick(FRAME);

        driver.stop();
        assert_eq!(driver.angle(), 0);
        assert!(!driver.is_spinning());
        assert_eq!(scheduler.frame_callback_count(), 0);

        scheduler.tick(FRAME);
        assert_eq!(driver.angle(), 0);
    }

    #[test]
    fn test_restart_begins_from_zero() {
        let scheduler = FrameScheduler::new();
        let mut driver = AccentDriver::new(Some(scheduler.handle()), DEFAULT_STEP_DEGREES);
        driver.start();
        scheduler.tick(FRAME);
        driver.stop();
        driver.start();
        assert_eq!(driver.angle(), 0);
        scheduler.tick(FRAME);
        assert_eq!(driver.angle(), 2);
        assert_eq!(scheduler.frame_callback_count(), 1);
    }

    #[test]
    fn test_drop_deregisters_frame_callback() {
        let scheduler = FrameScheduler::new();
        let mut driver = AccentDriver::new(Some(scheduler.handle()), DEFAULT_STEP_DEGREES);
        driver.start();
        assert_eq!(scheduler.frame_callback_count(), 1);

        drop(driver);
        assert_eq!(scheduler.frame_callback_count(), 0);
        assert!(!scheduler.tick(FRAME));
    }

    #[test]
    fn test_stop_during_concurrent_ticks_resets_angle() {
        let scheduler = FrameScheduler::new();
        let mut driver = AccentDriver::new(Some(scheduler.handle()), DEFAULT_STEP_DEGREES);
        let done = AtomicBool::new(false);
        let mut moved_after_stop = 0;

        std::thread::scope(|scope| {
            scope.spawn(|| {
                while !done.load(Ordering::SeqCst) {
                    scheduler.tick(FRAME);
                }
            });

            for _ in 0..1000 {
                driver.start();
                std::thread::yield_now();
                driver.stop();
                if driver.angle() != 0 {
                    moved_after_stop += 1;
                }
            }
            done.store(true, Ordering::SeqCst);
        });

        assert_eq!(moved_after_stop, 0);
        assert!(!driver.is_accented());
        scheduler.tick(FRAME);
        assert_eq!(driver.angle(), 0);
    }

    #[test]
    fn test_without_scheduler_accent_tracks_flag_only() {
        let mut driver = AccentDriver::new(None, DEFAULT_STEP_DEGREES);
        driver.start();
        assert!(driver.is_accented());
        assert!(!driver.is_spinning());
        assert_eq!(driver.angle(), 0);
        driver.stop();
        assert!(!driver.is_accented());
    }

    #[test]
    fn test_default_style_matches_default_config() {
        let from_config = AccentStyle::from_config(&AccentConfig::default()).unwrap();
        assert_eq!(from_config, AccentStyle::default());
    }

    #[test]
    fn test_frame_spreads_stops_over_full_turn() {
        let frame = AccentStyle::default().frame(90);
        assert_eq!(frame.start_angle, 90);
        assert_eq!(frame.stops.len(), 8);
        assert_eq!(frame.stops[0].offset, 0.0);
        assert_eq!(frame.stops[7].offset, 1.0);
        assert_eq!(frame.stops[0].color, frame.stops[7].color);
        assert_eq!(frame.glow.len(), 2);
        assert_eq!(frame.glow[1].blur_radius, 20.0);
    }
}
