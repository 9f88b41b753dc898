//! Device-agnostic physical controls and their binding-path suffixes

use crate::glyph::bindings::ActionBindings;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Variant suffix every sprite name carries in the glyph sheets
pub const GLYPH_VARIANT_SUFFIX: &str = "_0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhysicalControl {
    South,
    East,
    West,
    North,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    LeftStick,
    RightStick,
    Start,
    Select,
}

// Binding-path suffix → control. Matched case-insensitively, first hit wins.
const PATH_SUFFIXES: [(&str, PhysicalControl); 12] = [
    ("buttonsouth", PhysicalControl::South),
    ("buttoneast", PhysicalControl::East),
    ("buttonwest", PhysicalControl::West),
    ("buttonnorth", PhysicalControl::North),
    ("dpad/up", PhysicalControl::DPadUp),
    ("dpad/down", PhysicalControl::DPadDown),
    ("dpad/left", PhysicalControl::DPadLeft),
    ("dpad/right", PhysicalControl::DPadRight),
    ("leftstick", PhysicalControl::LeftStick),
    ("rightstick", PhysicalControl::RightStick),
    ("start", PhysicalControl::Start),
    ("select", PhysicalControl::Select),
];

impl PhysicalControl {
    /// Used when none of an action's bindings names a known control
    pub const FALLBACK: PhysicalControl = PhysicalControl::South;

    pub const ALL: [PhysicalControl; 12] = [
        PhysicalControl::South,
        PhysicalControl::East,
        PhysicalControl::West,
        PhysicalControl::North,
        PhysicalControl::DPadUp,
        PhysicalControl::DPadDown,
        PhysicalControl::DPadLeft,
        PhysicalControl::DPadRight,
        PhysicalControl::LeftStick,
        PhysicalControl::RightStick,
        PhysicalControl::Start,
        PhysicalControl::Select,
    ];

    pub fn glyph_name(self) -> &'static str {
        match self {
            PhysicalControl::South => "btn_a",
            PhysicalControl::East => "btn_b",
            PhysicalControl::West => "btn_x",
            PhysicalControl::North => "btn_y",
            PhysicalControl::DPadUp => "dpad_up",
            PhysicalControl::DPadDown => "dpad_down",
            PhysicalControl::DPadLeft => "dpad_left",
            PhysicalControl::DPadRight => "dpad_right",
            PhysicalControl::LeftStick => "lstick",
            PhysicalControl::RightStick => "rstick",
            PhysicalControl::Start => "btn_start",
            PhysicalControl::Select => "btn_select",
        }
    }

    /// Sprite name looked up in a glyph sheet
    pub fn glyph_key(self) -> String {
        format!("{}{}", self.glyph_name(), GLYPH_VARIANT_SUFFIX)
    }

    pub fn from_binding_path(path: &str) -> Option<PhysicalControl> {
        let lowered = path.to_ascii_lowercase();
        PATH_SUFFIXES
            .iter()
            .find(|(suffix, _)| lowered.ends_with(suffix))
            .map(|(_, control)| *control)
    }
}

/// Control bound to `action`, or [`PhysicalControl::FALLBACK`] with a warning
pub fn resolve_physical_control(bindings: &dyn ActionBindings, action: &str) -> PhysicalControl {
    let paths = bindings.binding_paths(action);
    match paths
        .iter()
        .find_map(|path| PhysicalControl::from_binding_path(path))
    {
        Some(control) => {
            debug!("Action '{}' resolved to {:?}", action, control);
            control
        }
        None => {
            warn!(
                "No gamepad binding found for action '{}' in {:?}, using {:?}",
                action,
                paths,
                PhysicalControl::FALLBACK
            );
            PhysicalControl::FALLBACK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::bindings::ActionMap;

    #[test]
    fn suffixes_map_to_controls() {
        assert_eq!(
            PhysicalControl::from_binding_path("<Gamepad>/buttonSouth"),
            Some(PhysicalControl::South)
        );
        assert_eq!(
            PhysicalControl::from_binding_path("<Gamepad>/dpad/left"),
            Some(PhysicalControl::DPadLeft)
        );
        assert_eq!(
            PhysicalControl::from_binding_path("<Gamepad>/select"),
            Some(PhysicalControl::Select)
        );
        assert_eq!(PhysicalControl::from_binding_path("<Keyboard>/enter"), None);
    }

    #[test]
    fn first_matching_binding_wins() {
        let map = ActionMap::from_pairs([(
            "Undo",
            vec!["<Keyboard>/z", "<Gamepad>/buttonNorth", "<Gamepad>/buttonWest"],
        )]);
        assert_eq!(resolve_physical_control(&map, "Undo"), PhysicalControl::North);
    }

    #[test]
    fn unmatched_action_falls_back() {
        let map = ActionMap::from_pairs([("Hint", vec!["<Keyboard>/h"])]);
        assert_eq!(resolve_physical_control(&map, "Hint"), PhysicalControl::South);
        assert_eq!(resolve_physical_control(&map, "Missing"), PhysicalControl::South);
    }

    #[test]
    fn glyph_keys_carry_variant_suffix() {
        assert_eq!(PhysicalControl::South.glyph_key(), "btn_a_0");
        assert_eq!(PhysicalControl::RightStick.glyph_key(), "rstick_0");
    }
}
