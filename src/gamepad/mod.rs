//! Gamepad identity: vendor classification, glyph sheet selection and the
//! gilrs monitor feeding both.
//!
//! ```text
//! gilrs ──► GamepadMonitor ──► trigger bus (Gamepad / Handheld)
//!                │
//!                └──► connected() ──► GamepadSpriteRepository ──► category_changed
//!                                      (polled on an interval)  └─► asset_changed
//! ```

pub mod monitor;
pub mod repository;
pub mod vendor;

pub use monitor::{GamepadMonitor, MonitorError, MonitorSettings};
pub use repository::{GamepadSpriteRepository, RepositorySettings, VendorSheets};
pub use vendor::{ConnectedControllers, ControllerDescriptor, GamepadVendorCategory};
