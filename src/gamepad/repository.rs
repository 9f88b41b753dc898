//! Gamepad glyph repository
//!
//! Decides which vendor glyph sheet is active. The primary connected
//! controller is classified by name on a polling interval; when the
//! classification maps to a different sheet, `category_changed` and then
//! `asset_changed` are emitted.
//!
//! Only one repository may be live per [`InputModeContext`]. A second
//! [`GamepadSpriteRepository::install`] is rejected and the new instance dropped.

use crate::error::PromptError;
use crate::gamepad::vendor::{ConnectedControllers, GamepadVendorCategory};
use crate::glyph::sheet::GlyphAssetHandle;
use crate::input::context::InputModeContext;
use crate::input::signal::Signal;
use chrono::{DateTime, Duration, Local};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info};

// One day; far beyond any sensible polling period
const MAX_INTERVAL_MS: f64 = 86_400_000.0;

#[derive(Clone, Debug)]
pub struct RepositorySettings {
    pub auto_detect: bool,
    pub detection_interval: Duration,
}

impl RepositorySettings {
    /// Non-finite or negative intervals clamp to zero, i.e. detect every tick
    pub fn new(auto_detect: bool, interval_secs: f64) -> Self {
        let millis = if interval_secs.is_finite() {
            (interval_secs * 1000.0).round().clamp(0.0, MAX_INTERVAL_MS)
        } else {
            0.0
        };
        Self {
            auto_detect,
            detection_interval: Duration::milliseconds(millis as i64),
        }
    }
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self::new(true, 1.0)
    }
}

/// Immutable vendor category → glyph sheet table
#[derive(Clone, Debug)]
pub struct VendorSheets {
    handles: HashMap<GamepadVendorCategory, GlyphAssetHandle>,
}

impl VendorSheets {
    /// Every category needs a handle; categories may share one
    pub fn new(
        handles: HashMap<GamepadVendorCategory, GlyphAssetHandle>,
    ) -> Result<Self, PromptError> {
        if let Some(missing) = GamepadVendorCategory::ALL
            .iter()
            .find(|category| !handles.contains_key(*category))
        {
            return Err(PromptError::MissingDependency(format!(
                "no glyph sheet configured for {missing}"
            )));
        }
        Ok(Self { handles })
    }

    pub fn handle(&self, category: GamepadVendorCategory) -> &GlyphAssetHandle {
        // Completeness is checked in `new`
        &self.handles[&category]
    }
}

#[derive(Debug)]
struct DetectionState {
    category: GamepadVendorCategory,
    asset: GlyphAssetHandle,
    last_check: DateTime<Local>,
}

pub struct GamepadSpriteRepository {
    settings: RepositorySettings,
    sheets: VendorSheets,
    state: RefCell<DetectionState>,
    category_changed: Signal<GamepadVendorCategory>,
    asset_changed: Signal<GlyphAssetHandle>,
}

impl GamepadSpriteRepository {
    /// Creates the repository and makes it the context's live instance
    pub fn install(
        context: &InputModeContext,
        settings: RepositorySettings,
        sheets: VendorSheets,
        controllers: &dyn ConnectedControllers,
        now: DateTime<Local>,
    ) -> Result<Rc<Self>, PromptError> {
        let initial = GamepadVendorCategory::Generic;
        let repository = Rc::new(Self {
            state: RefCell::new(DetectionState {
                category: initial,
                asset: sheets.handle(initial).clone(),
                last_check: now,
            }),
            settings,
            sheets,
            category_changed: Signal::new("category_changed"),
            asset_changed: Signal::new("asset_changed"),
        });

        context.install_repository(Rc::clone(&repository))?;
        info!(
            "Glyph repository installed (auto_detect: {}, interval: {}ms)",
            repository.settings.auto_detect,
            repository.settings.detection_interval.num_milliseconds()
        );

        if repository.settings.auto_detect {
            repository.detect_now(controllers);
        }
        Ok(repository)
    }

    /// Frame hook: re-runs detection once the interval has elapsed.
    /// Returns true if detection ran.
    pub fn tick(&self, now: DateTime<Local>, controllers: &dyn ConnectedControllers) -> bool {
        if !self.settings.auto_detect {
            return false;
        }
        let due = now - self.state.borrow().last_check >= self.settings.detection_interval;
        if !due {
            return false;
        }
        self.detect_now(controllers);
        self.state.borrow_mut().last_check = now;
        true
    }

    /// Classifies the primary controller. Returns true if the active sheet changed.
    pub fn detect_now(&self, controllers: &dyn ConnectedControllers) -> bool {
        let connected = controllers.connected();
        let Some(primary) = connected.first() else {
            debug!("No controller connected, keeping current glyph sheet");
            return false;
        };

        let category = GamepadVendorCategory::classify(&primary.name);
        let new_asset = {
            let mut state = self.state.borrow_mut();
            if category == state.category {
                return false;
            }
            info!(
                "Controller '{}' classified as {} (was {})",
                primary.name, category, state.category
            );
            state.category = category;

            let handle = self.sheets.handle(category);
            if *handle == state.asset {
                debug!("{} shares the active glyph sheet, no notification", category);
                None
            } else {
                state.asset = handle.clone();
                Some(handle.clone())
            }
        };

        match new_asset {
            Some(asset) => {
                info!("Active glyph sheet is now '{}'", asset.sheet().name());
                self.category_changed.emit(&category);
                self.asset_changed.emit(&asset);
                true
            }
            None => false,
        }
    }

    pub fn current_asset(&self) -> GlyphAssetHandle {
        self.state.borrow().asset.clone()
    }

    pub fn current_category(&self) -> GamepadVendorCategory {
        self.state.borrow().category
    }

    pub fn category_changed(&self) -> &Signal<GamepadVendorCategory> {
        &self.category_changed
    }

    pub fn asset_changed(&self) -> &Signal<GlyphAssetHandle> {
        &self.asset_changed
    }
}

impl fmt::Debug for GamepadSpriteRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GamepadSpriteRepository")
            .field("settings", &self.settings)
            .field("state", &self.state.borrow())
            .finish()
    }
}
