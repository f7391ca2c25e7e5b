//! Which locale is being edited, and how that survives reloads.

use crate::i18n::Locale;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveTab {
    current: Locale,
}

impl Default for ActiveTab {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveTab {
    pub fn new() -> Self {
        Self {
            current: Locale::canonical(),
        }
    }

    pub fn current(&self) -> Locale {
        self.current
    }

    pub fn select(&mut self, locale: Locale) {
        self.current = locale;
    }

    /// Pick the tab after a load.
    ///
    /// A `preserve` locale (the tab active when a save triggered the
    /// reload) always wins. Otherwise the first existing locale, or the
    /// canonical one when nothing exists yet.
    pub fn after_load(&mut self, existing: &[Locale], preserve: Option<Locale>) {
        self.current = preserve
            .or_else(|| existing.first().copied())
            .unwrap_or_else(Locale::canonical);
        debug!("Active locale after load: {}", self.current);
    }

    /// A freshly created record stays on the canonical tab.
    pub fn after_create(&mut self) {
        self.current = Locale::canonical();
    }

    pub fn reset(&mut self) {
        self.current = Locale::canonical();
    }
}
