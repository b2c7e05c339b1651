//! Settings providers
//!
//! The engine reads settings at the point of use through a provider instead
//! of holding a copy. The provider also exposes a generation counter that
//! changes whenever the settings are replaced, so caches derived from the
//! settings know when to refresh.

use std::cell::Cell;
use std::rc::Rc;

use kwyd_types::LootSettings;

/// Read-only access to the current loot settings.
pub trait SettingsProvider {
    /// Current settings, or `None` if the settings store is unavailable.
    fn settings(&self) -> Option<LootSettings>;

    /// Changes every time the settings are replaced.
    fn generation(&self) -> u64 {
        0
    }

    /// Current settings, sanitized. Falls back to
    /// [`LootSettings::fallback`] when unavailable.
    fn resolve(&self) -> LootSettings {
        self.settings()
            .map(LootSettings::sanitized)
            .unwrap_or_else(LootSettings::fallback)
    }
}

/// Fixed settings.
impl SettingsProvider for LootSettings {
    fn settings(&self) -> Option<LootSettings> {
        Some(*self)
    }
}

impl<T: SettingsProvider + ?Sized> SettingsProvider for Rc<T> {
    fn settings(&self) -> Option<LootSettings> {
        (**self).settings()
    }

    fn generation(&self) -> u64 {
        (**self).generation()
    }
}

/// Settings shared between the settings UI and the loot engine.
///
/// Single-threaded: share it with `Rc`, edit it with
/// [`SharedSettings::set`] from the thread that owns the engine.
#[derive(Debug, Default)]
pub struct SharedSettings {
    current: Cell<Option<LootSettings>>,
    generation: Cell<u64>,
}

impl SharedSettings {
    pub fn new(settings: LootSettings) -> Self {
        Self {
            current: Cell::new(Some(settings)),
            generation: Cell::new(0),
        }
    }

    /// A provider with no settings loaded yet.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn set(&self, settings: LootSettings) {
        self.current.set(Some(settings));
        self.bump();
    }

    /// Apply an edit to the current settings (defaults if none are loaded).
    pub fn update(&self, edit: impl FnOnce(&mut LootSettings)) {
        let mut settings = self.current.get().unwrap_or_default();
        edit(&mut settings);
        self.set(settings);
    }

    pub fn clear(&self) {
        self.current.set(None);
        self.bump();
    }

    fn bump(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }
}

impl SettingsProvider for SharedSettings {
    fn settings(&self) -> Option<LootSettings> {
        self.current.get()
    }

    fn generation(&self) -> u64 {
        self.generation.get()
    }
}
