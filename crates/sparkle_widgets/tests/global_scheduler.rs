//! Widgets built without an explicit scheduler use the global one
//!
//! Kept in its own test binary: the global handle can be installed once per
//! process.

use std::time::Duration;

use sparkle_animation::{is_scheduler_initialized, try_get_scheduler};
use sparkle_widgets::prelude::*;

#[tokio::test]
async fn test_global_scheduler_drives_accent() {
    let scheduler = FrameScheduler::new();
    assert!(!is_scheduler_initialized());
    assert!(set_global_scheduler(scheduler.handle()));
    assert!(!set_global_scheduler(scheduler.handle()));
    assert!(try_get_scheduler().is_some());

    let name = SharedValue::new("");
    let textbox = ai_textbox(name.binding()).build();

    let generation = textbox.trigger_generation();
    scheduler.tick(Duration::from_millis(16));
    scheduler.tick(Duration::from_millis(16));
    assert_eq!(textbox.accent_angle(), 4);

    generation.await;
    assert_eq!(textbox.accent_angle(), 0);
    assert!(!scheduler.has_pending_work());
}
