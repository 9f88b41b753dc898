//! Control-scheme state and notification
//!
//! ```text
//! Input sources ──► trigger bus ──► ControlSchemeSwapper ──► scheme_changed
//!                   (context)                                 (context)
//! ```

pub mod context;
pub mod scheme;
pub mod signal;
pub mod swapper;

pub use context::InputModeContext;
pub use scheme::{ControlScheme, PlatformCapabilities, TriggerSignal};
pub use signal::{ListenerId, Signal};
pub use swapper::ControlSchemeSwapper;
