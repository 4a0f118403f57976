//! Sparkle Core
//!
//! Foundational types shared by the Sparkle widget crates:
//!
//! - **Value Bindings**: Controlled values owned by the host, read on every
//!   render and changed only through a change-notification handler
//! - **Generators**: Host-supplied asynchronous content-generation callbacks
//! - **Configuration**: Accent palette, animation step and selector timing,
//!   loadable from TOML
//! - **Errors**: Generation failures and configuration errors
//!
//! # Example
//!
//! ```rust
//! use sparkle_core::SharedValue;
//!
//! let name = SharedValue::new("");
//! let binding = name.binding();
//!
//! binding.emit("Quantum Flux Capacitor");
//! assert_eq!(name.get(), "Quantum Flux Capacitor");
//! assert_eq!(binding.value(), "Quantum Flux Capacitor");
//! ```

pub mod binding;
pub mod color;
pub mod config;
pub mod error;
pub mod generator;
pub mod sync;

pub use binding::{ChangeEvent, ChangeHandler, Notification, SharedValue, ValueBinding};
pub use color::Color;
pub use config::{
    AccentConfig, GlowConfig, SelectorConfig, SparkleConfig, SPARKLE_GLOW, SPARKLE_PALETTE,
};
pub use error::{ConfigError, GenerationError, Result};
pub use generator::{GenerateFuture, GenerationResult, Generator};
