//! Per-label glyph binding
//!
//! An [`IconLabel`] owns a `{Action}` template and writes the resolved text
//! into a [`TextTarget`]. See [`icon_label`] for the lifecycle.

pub mod icon_label;
pub mod template;
pub mod text;

pub use icon_label::{Attached, Detached, IconLabel, IconLabelBuilder};
pub use text::{LabelText, TextTarget};
