use serde::{Deserialize, Serialize};
use std::fmt;

// Manufacturer family of a connected controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamepadVendorCategory {
    Xbox,
    PlayStation,
    Nintendo,
    Steam,
    Generic,
}

// Keyword sets in classification priority order
const VENDOR_KEYWORDS: [(GamepadVendorCategory, &[&str]); 4] = [
    (GamepadVendorCategory::Xbox, &["xbox", "xinput"]),
    (
        GamepadVendorCategory::PlayStation,
        &["playstation", "ps4", "ps5", "dualshock", "dualsense"],
    ),
    (
        GamepadVendorCategory::Nintendo,
        &["nintendo", "switch", "joycon", "pro controller"],
    ),
    (GamepadVendorCategory::Steam, &["steam", "valve"]),
];

impl GamepadVendorCategory {
    pub const ALL: [GamepadVendorCategory; 5] = [
        GamepadVendorCategory::Xbox,
        GamepadVendorCategory::PlayStation,
        GamepadVendorCategory::Nintendo,
        GamepadVendorCategory::Steam,
        GamepadVendorCategory::Generic,
    ];

    /// Classifies a device name; total and deterministic
    pub fn classify(device_name: &str) -> Self {
        let name = device_name.to_lowercase();
        VENDOR_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| name.contains(keyword)))
            .map(|(category, _)| *category)
            .unwrap_or(GamepadVendorCategory::Generic)
    }
}

impl fmt::Display for GamepadVendorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamepadVendorCategory::Xbox => write!(f, "Xbox"),
            GamepadVendorCategory::PlayStation => write!(f, "PlayStation"),
            GamepadVendorCategory::Nintendo => write!(f, "Nintendo"),
            GamepadVendorCategory::Steam => write!(f, "Steam"),
            GamepadVendorCategory::Generic => write!(f, "Generic"),
        }
    }
}

// Identity of one connected controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerDescriptor {
    pub name: String,
    pub vendor_id: Option<u16>,
    pub product_id: Option<u16>,
}

impl ControllerDescriptor {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            vendor_id: None,
            product_id: None,
        }
    }
}

/// Always-current list of connected controllers, first entry is the primary one
pub trait ConnectedControllers {
    fn connected(&self) -> Vec<ControllerDescriptor>;
}

impl ConnectedControllers for Vec<ControllerDescriptor> {
    fn connected(&self) -> Vec<ControllerDescriptor> {
        self.clone()
    }
}
