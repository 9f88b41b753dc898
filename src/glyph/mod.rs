//! Glyph sheets, sprite markup and action → physical control resolution

pub mod bindings;
pub mod markup;
pub mod physical;
pub mod sheet;

pub use bindings::{ActionBindings, ActionMap};
pub use markup::{expand_markup, sprite_markup};
pub use physical::{resolve_physical_control, PhysicalControl};
pub use sheet::{glyph_hash, GlyphAssetHandle, GlyphSheet, GlyphSprite};
