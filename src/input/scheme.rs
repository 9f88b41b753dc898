use serde::{Deserialize, Serialize};
use std::fmt;

// Active input modality driving the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlScheme {
    KeyboardAndMouse,
    Gamepad,
    // Built-in controls of a handheld or docked hybrid device
    Handheld,
    Touch,
}

impl ControlScheme {
    /// Gamepad and Handheld both show controller glyphs
    pub fn is_gamepad_family(self) -> bool {
        matches!(self, ControlScheme::Gamepad | ControlScheme::Handheld)
    }
}

impl fmt::Display for ControlScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlScheme::KeyboardAndMouse => write!(f, "Keyboard+Mouse"),
            ControlScheme::Gamepad => write!(f, "Gamepad"),
            ControlScheme::Handheld => write!(f, "Handheld"),
            ControlScheme::Touch => write!(f, "Touch"),
        }
    }
}

// Discrete input signal delivered by the host's input sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerSignal {
    Gamepad,
    Handheld,
    KeyboardMouse,
    Touch,
}

// What the running platform can deliver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlatformCapabilities {
    pub gamepad: bool,
    pub touch: bool,
    pub handheld: bool,
}

impl PlatformCapabilities {
    /// Scheme chosen at startup: gamepad first, then touch, else keyboard+mouse
    pub fn initial_scheme(&self) -> ControlScheme {
        if self.gamepad {
            if self.handheld {
                ControlScheme::Handheld
            } else {
                ControlScheme::Gamepad
            }
        } else if self.touch {
            ControlScheme::Touch
        } else {
            ControlScheme::KeyboardAndMouse
        }
    }

    /// Touch capability of the compile target when no override is configured
    pub fn target_has_touch() -> bool {
        cfg!(any(target_os = "android", target_os = "ios"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_scheme_prefers_gamepad_over_touch() {
        let caps = PlatformCapabilities {
            gamepad: true,
            touch: true,
            handheld: false,
        };
        assert_eq!(caps.initial_scheme(), ControlScheme::Gamepad);
    }

    #[test]
    fn initial_scheme_falls_back_to_keyboard() {
        assert_eq!(
            PlatformCapabilities::default().initial_scheme(),
            ControlScheme::KeyboardAndMouse
        );
        let touch_only = PlatformCapabilities {
            touch: true,
            ..Default::default()
        };
        assert_eq!(touch_only.initial_scheme(), ControlScheme::Touch);
    }

    #[test]
    fn handheld_platform_starts_in_handheld() {
        let caps = PlatformCapabilities {
            gamepad: true,
            touch: false,
            handheld: true,
        };
        assert_eq!(caps.initial_scheme(), ControlScheme::Handheld);
        assert!(ControlScheme::Handheld.is_gamepad_family());
        assert!(!ControlScheme::Touch.is_gamepad_family());
    }
}
