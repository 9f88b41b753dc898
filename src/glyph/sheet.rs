//! Glyph sheets: vendor-specific sprite tables addressed by name
//!
//! A sheet's lookup table is built and queried through the same
//! [`glyph_hash`], so a name that was indexed is always found again.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphSprite {
    pub name: String,
    /// Text shown in place of the sprite by hosts without sprite rendering
    pub display: String,
}

impl GlyphSprite {
    pub fn new(name: &str, display: &str) -> Self {
        Self {
            name: name.to_string(),
            display: display.to_string(),
        }
    }
}

/// Case-insensitive djb2-xor hash over the ASCII bytes of `key`
pub fn glyph_hash(key: &str) -> u32 {
    key.bytes().fold(0u32, |hash, byte| {
        ((hash << 5).wrapping_add(hash)) ^ u32::from(byte.to_ascii_uppercase())
    })
}

#[derive(Debug)]
pub struct GlyphSheet {
    name: String,
    sprites: Vec<GlyphSprite>,
    // Hash → indices of every sprite with that hash, in sheet order
    lookup: HashMap<u32, Vec<usize>>,
}

impl GlyphSheet {
    pub fn new(name: impl Into<String>, sprites: Vec<GlyphSprite>) -> Self {
        let name = name.into();
        let mut lookup: HashMap<u32, Vec<usize>> = HashMap::with_capacity(sprites.len());
        for (index, sprite) in sprites.iter().enumerate() {
            let bucket = lookup.entry(glyph_hash(&sprite.name)).or_default();
            if let Some(&existing) = bucket
                .iter()
                .find(|&&other| sprites[other].name.eq_ignore_ascii_case(&sprite.name))
            {
                warn!(
                    "Sheet '{}': sprite '{}' shadowed by index {}",
                    name, sprite.name, existing
                );
                continue;
            }
            bucket.push(index);
        }
        debug!("Built glyph sheet '{}' with {} sprites", name, sprites.len());

        Self {
            name,
            sprites,
            lookup,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Index of the sprite called `key`, matched case-insensitively
    pub fn sprite_index(&self, key: &str) -> Option<usize> {
        // Equal hashes do not guarantee equal names
        self.lookup
            .get(&glyph_hash(key))?
            .iter()
            .copied()
            .find(|&index| self.sprites[index].name.eq_ignore_ascii_case(key))
    }

    pub fn sprite(&self, index: usize) -> Option<&GlyphSprite> {
        self.sprites.get(index)
    }
}

/// Shared reference to a glyph sheet. Two handles are equal only when they
/// point at the same sheet instance.
#[derive(Clone)]
pub struct GlyphAssetHandle(Rc<GlyphSheet>);

impl GlyphAssetHandle {
    pub fn new(sheet: GlyphSheet) -> Self {
        Self(Rc::new(sheet))
    }

    pub fn sheet(&self) -> &GlyphSheet {
        &self.0
    }
}

impl PartialEq for GlyphAssetHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for GlyphAssetHandle {}

impl fmt::Debug for GlyphAssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GlyphAssetHandle({})", self.0.name)
    }
}
