//! # Configuration
//!
//! TOML file holding everything the prompt components need at setup:
//! detection policy, platform overrides, glyph sheets, the vendor → sheet
//! table, action bindings and the labels shown by the preview window.
//!
//! The file lives at `<config_dir>/controlprompt/config.toml` unless
//! `CONTROLPROMPT_CONFIG` points elsewhere. A missing file is created with
//! the defaults below so the application always starts.

use crate::gamepad::monitor::MonitorSettings;
use crate::gamepad::repository::{RepositorySettings, VendorSheets};
use crate::gamepad::vendor::GamepadVendorCategory;
use crate::glyph::bindings::ActionMap;
use crate::glyph::physical::PhysicalControl;
use crate::glyph::sheet::{GlyphAssetHandle, GlyphSheet, GlyphSprite};
use crate::input::scheme::PlatformCapabilities;
use color_eyre::eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const CONFIG_ENV: &str = "CONTROLPROMPT_CONFIG";

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub detection: DetectionConfig,
    pub platform: PlatformConfig,
    pub vendors: VendorSheetNames,
    pub actions: BTreeMap<String, Vec<String>>,
    pub sheets: Vec<SheetConfig>,
    pub labels: Vec<LabelConfig>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(default)]
pub struct DetectionConfig {
    pub auto_detect: bool,
    pub interval_secs: f64,
    pub stick_deadzone: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            auto_detect: true,
            interval_secs: 1.0,
            stick_deadzone: 0.2,
        }
    }
}

/// Unset values are probed at startup
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(default)]
pub struct PlatformConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamepad: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub touch: Option<bool>,
    pub handheld: bool,
}

// Sheet name per vendor category; several categories may share a sheet
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct VendorSheetNames {
    pub xbox: String,
    pub playstation: String,
    pub nintendo: String,
    pub steam: String,
    pub generic: String,
}

impl VendorSheetNames {
    pub fn sheet_for(&self, category: GamepadVendorCategory) -> &str {
        match category {
            GamepadVendorCategory::Xbox => &self.xbox,
            GamepadVendorCategory::PlayStation => &self.playstation,
            GamepadVendorCategory::Nintendo => &self.nintendo,
            GamepadVendorCategory::Steam => &self.steam,
            GamepadVendorCategory::Generic => &self.generic,
        }
    }
}

impl Default for VendorSheetNames {
    fn default() -> Self {
        Self {
            xbox: "xbox".to_string(),
            playstation: "playstation".to_string(),
            nintendo: "nintendo".to_string(),
            steam: "steam".to_string(),
            generic: "xbox".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct SheetConfig {
    pub name: String,
    pub sprites: Vec<GlyphSprite>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct LabelConfig {
    pub action: String,
    pub template: String,
}

impl Config {
    /// Bundled defaults: four vendor sheets, the menu actions and a few labels
    pub fn with_defaults() -> Self {
        let sheets = vec![
            default_sheet(
                "xbox",
                [
                    "[A]", "[B]", "[X]", "[Y]", "[Up]", "[Down]", "[Left]", "[Right]", "[LS]",
                    "[RS]", "[Menu]", "[View]",
                ],
            ),
            default_sheet(
                "playstation",
                [
                    "[Cross]",
                    "[Circle]",
                    "[Square]",
                    "[Triangle]",
                    "[Up]",
                    "[Down]",
                    "[Left]",
                    "[Right]",
                    "[L3]",
                    "[R3]",
                    "[Options]",
                    "[Share]",
                ],
            ),
            default_sheet(
                "nintendo",
                [
                    "[B]", "[A]", "[Y]", "[X]", "[Up]", "[Down]", "[Left]", "[Right]", "[LS]",
                    "[RS]", "[+]", "[-]",
                ],
            ),
            default_sheet(
                "steam",
                [
                    "[A]", "[B]", "[X]", "[Y]", "[Up]", "[Down]", "[Left]", "[Right]", "[L3]",
                    "[R3]", "[Menu]", "[View]",
                ],
            ),
        ];

        let actions = [
            ("Back", vec!["<Keyboard>/escape", "<Gamepad>/buttonEast"]),
            ("Confirm", vec!["<Keyboard>/enter", "<Gamepad>/buttonSouth"]),
            ("Undo", vec!["<Keyboard>/z", "<Gamepad>/buttonNorth"]),
            ("ToggleEditMode", vec!["<Keyboard>/tab", "<Gamepad>/buttonWest"]),
            ("CursorMove", vec!["<Mouse>/delta", "<Gamepad>/leftStick"]),
            ("NudgeUp", vec!["<Keyboard>/upArrow", "<Gamepad>/dpad/up"]),
            ("NudgeDown", vec!["<Keyboard>/downArrow", "<Gamepad>/dpad/down"]),
            ("NudgeLeft", vec!["<Keyboard>/leftArrow", "<Gamepad>/dpad/left"]),
            ("NudgeRight", vec!["<Keyboard>/rightArrow", "<Gamepad>/dpad/right"]),
            ("Hint", vec!["<Keyboard>/h", "<Gamepad>/start"]),
        ]
        .into_iter()
        .map(|(action, paths)| {
            (
                action.to_string(),
                paths.into_iter().map(str::to_string).collect(),
            )
        })
        .collect();

        let labels = [
            ("Confirm", "Press {Confirm} to continue"),
            ("Back", "{Back} Back"),
            ("Undo", "{Undo} Undo"),
            ("ToggleEditMode", "Hold {ToggleEditMode} to edit"),
            ("CursorMove", "Move the cursor with {CursorMove}"),
            ("NudgeUp", "{NudgeUp} Nudge up"),
            ("Hint", "{Hint} Show hint"),
        ]
        .into_iter()
        .map(|(action, template)| LabelConfig {
            action: action.to_string(),
            template: template.to_string(),
        })
        .collect();

        Self {
            detection: DetectionConfig::default(),
            platform: PlatformConfig::default(),
            vendors: VendorSheetNames::default(),
            actions,
            sheets,
            labels,
        }
    }

    /// `CONTROLPROMPT_CONFIG` or the per-user config directory
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let base = dirs::config_dir().ok_or_else(|| eyre!("No config directory on this platform"))?;
        Ok(base.join("controlprompt").join("config.toml"))
    }

    /// Reads `path`, writing the defaults there first if it does not exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config at {}, writing defaults", path.display());
            let config = Self::with_defaults();
            config.save(path)?;
            return Ok(config);
        }

        let raw = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .wrap_err_with(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        info!(
            "Loaded config from {} ({} sheets, {} labels)",
            path.display(),
            config.sheets.len(),
            config.labels.len()
        );
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(self).wrap_err("Failed to serialize config")?;
        fs::write(path, raw).wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        debug!("Config written to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.detection.interval_secs > 0.0) {
            return Err(eyre!(
                "detection.interval_secs must be positive, got {}",
                self.detection.interval_secs
            ));
        }

        let mut names = HashSet::new();
        for sheet in &self.sheets {
            if !names.insert(sheet.name.as_str()) {
                return Err(eyre!("Glyph sheet '{}' defined twice", sheet.name));
            }
        }
        for category in GamepadVendorCategory::ALL {
            let name = self.vendors.sheet_for(category);
            if !names.contains(name) {
                return Err(eyre!("{} uses unknown glyph sheet '{}'", category, name));
            }
        }

        for label in &self.labels {
            if !self.actions.contains_key(&label.action) {
                warn!("Label '{}' uses unbound action '{}'", label.template, label.action);
            }
        }
        Ok(())
    }

    pub fn capabilities(&self, gamepad_backend_available: bool) -> PlatformCapabilities {
        PlatformCapabilities {
            gamepad: self.platform.gamepad.unwrap_or(gamepad_backend_available),
            touch: self
                .platform
                .touch
                .unwrap_or_else(PlatformCapabilities::target_has_touch),
            handheld: self.platform.handheld,
        }
    }

    pub fn repository_settings(&self) -> RepositorySettings {
        RepositorySettings::new(self.detection.auto_detect, self.detection.interval_secs)
    }

    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            stick_deadzone: self.detection.stick_deadzone,
            handheld: self.platform.handheld,
        }
    }

    /// One handle per sheet name, shared by every category that names it
    pub fn vendor_sheets(&self) -> Result<VendorSheets> {
        let handles: HashMap<&str, GlyphAssetHandle> = self
            .sheets
            .iter()
            .map(|sheet| {
                let handle =
                    GlyphAssetHandle::new(GlyphSheet::new(sheet.name.clone(), sheet.sprites.clone()));
                (sheet.name.as_str(), handle)
            })
            .collect();

        let mut table = HashMap::new();
        for category in GamepadVendorCategory::ALL {
            let name = self.vendors.sheet_for(category);
            let handle = handles
                .get(name)
                .ok_or_else(|| eyre!("{} uses unknown glyph sheet '{}'", category, name))?;
            table.insert(category, handle.clone());
        }
        Ok(VendorSheets::new(table)?)
    }

    pub fn action_map(&self) -> ActionMap {
        ActionMap::new(self.actions.clone().into_iter().collect())
    }
}

fn default_sheet(name: &str, displays: [&str; 12]) -> SheetConfig {
    SheetConfig {
        name: name.to_string(),
        sprites: PhysicalControl::ALL
            .iter()
            .zip(displays)
            .map(|(control, display)| GlyphSprite::new(&control.glyph_key(), display))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::bindings::ActionBindings;

    #[test]
    fn defaults_validate_and_share_generic_sheet() {
        let config = Config::with_defaults();
        config.validate().unwrap();

        let sheets = config.vendor_sheets().unwrap();
        assert_eq!(
            sheets.handle(GamepadVendorCategory::Generic),
            sheets.handle(GamepadVendorCategory::Xbox)
        );
        assert_ne!(
            sheets.handle(GamepadVendorCategory::PlayStation),
            sheets.handle(GamepadVendorCategory::Xbox)
        );
    }

    #[test]
    fn default_sheets_cover_every_control() {
        let config = Config::with_defaults();
        let sheets = config.vendor_sheets().unwrap();
        for category in GamepadVendorCategory::ALL {
            let sheet = sheets.handle(category).sheet();
            for control in PhysicalControl::ALL {
                assert!(
                    sheet.sprite_index(&control.glyph_key()).is_some(),
                    "{} lacks {:?}",
                    sheet.name(),
                    control
                );
            }
        }
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let created = Config::load_or_create(&path).unwrap();
        assert!(path.exists());

        let loaded = Config::load_or_create(&path).unwrap();
        assert_eq!(loaded.sheets.len(), created.sheets.len());
        assert_eq!(loaded.vendors.generic, "xbox");
        assert_eq!(
            loaded.action_map().binding_paths("Confirm"),
            ["<Keyboard>/enter", "<Gamepad>/buttonSouth"]
        );
    }

    #[test]
    fn unknown_vendor_sheet_is_rejected() {
        let mut config = Config::with_defaults();
        config.vendors.steam = "deck".to_string();
        assert!(config.validate().is_err());
        assert!(config.vendor_sheets().is_err());
    }

    #[test]
    fn partial_file_falls_back_to_field_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[detection]
interval_secs = 2.5

[vendors]
xbox = "pad"
playstation = "pad"
nintendo = "pad"
steam = "pad"
generic = "pad"

[[sheets]]
name = "pad"
sprites = [{ name = "btn_a_0", display = "(A)" }]
"#,
        )
        .unwrap();

        let config = Config::load_or_create(&path).unwrap();
        assert!(config.detection.auto_detect);
        assert_eq!(config.detection.interval_secs, 2.5);
        assert!(config.labels.is_empty());
        assert_eq!(
            config.repository_settings().detection_interval.num_milliseconds(),
            2500
        );
    }

    #[test]
    fn platform_overrides_win_over_probe() {
        let mut config = Config::with_defaults();
        config.platform.gamepad = Some(false);
        config.platform.touch = Some(true);
        let caps = config.capabilities(true);
        assert!(!caps.gamepad);
        assert!(caps.touch);

        config.platform.gamepad = None;
        assert!(config.capabilities(true).gamepad);
    }
}
