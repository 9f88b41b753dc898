//! Inline sprite markup embedded into label text

use crate::glyph::sheet::GlyphSheet;

const MARKUP_OPEN: &str = "<sprite index=";
const MARKUP_CLOSE: char = '>';

pub fn sprite_markup(index: usize) -> String {
    format!("{MARKUP_OPEN}{index}{MARKUP_CLOSE}")
}

/// Replaces every sprite directive with the sheet's display text.
/// Indices outside the sheet become `?`; malformed directives stay verbatim.
pub fn expand_markup(text: &str, sheet: &GlyphSheet) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(MARKUP_OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + MARKUP_OPEN.len()..];

        let parsed = after_open.find(MARKUP_CLOSE).and_then(|end| {
            after_open[..end]
                .trim()
                .parse::<usize>()
                .ok()
                .map(|index| (index, end))
        });

        match parsed {
            Some((index, end)) => {
                match sheet.sprite(index) {
                    Some(sprite) => out.push_str(&sprite.display),
                    None => out.push('?'),
                }
                rest = &after_open[end + MARKUP_CLOSE.len_utf8()..];
            }
            None => {
                out.push_str(MARKUP_OPEN);
                rest = after_open;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::sheet::GlyphSprite;

    fn sheet() -> GlyphSheet {
        GlyphSheet::new(
            "ps",
            vec![GlyphSprite::new("btn_a_0", "(X)"), GlyphSprite::new("btn_b_0", "(O)")],
        )
    }

    #[test]
    fn expands_known_indices() {
        let text = format!("Press {} or {}", sprite_markup(0), sprite_markup(1));
        assert_eq!(expand_markup(&text, &sheet()), "Press (X) or (O)");
    }

    #[test]
    fn unknown_index_and_malformed_markup() {
        let text = format!("{} then <sprite index=abc> end", sprite_markup(9));
        assert_eq!(expand_markup(&text, &sheet()), "? then <sprite index=abc> end");
    }
}
