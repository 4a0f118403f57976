//! Sparkle Animation System
//!
//! Frame-driven scheduling and the progress accent.
//!
//! # Features
//!
//! - **FrameScheduler**: Host-ticked per-frame callbacks and one-shot timers,
//!   shared with widgets through weak handles
//! - **AccentDriver**: The rotating gradient sweep shown while a generation
//!   is in flight, bound to the widget's lifetime
//! - **AccentStyle**: Palette and glow used to render accent frames

pub mod accent;
pub mod scheduler;

pub use accent::{
    AccentDriver, AccentFrame, AccentStyle, GlowShadow, GradientStop, DEFAULT_STEP_DEGREES,
};
pub use scheduler::{
    is_scheduler_initialized, set_global_scheduler, try_get_scheduler, FrameCallback,
    FrameCallbackId, FrameScheduler, SchedulerHandle, TimerId,
};
