//! The locale → translation map and its shared-field synchronization.
//!
//! All mutation funnels through here: shared fields are written into every
//! locale at once and only when the edit comes from the canonical locale,
//! so divergent shared values cannot be introduced.

use crate::error::{Result, SyncError};
use crate::i18n::Locale;
use crate::model::{Field, LocaleTranslation, SharedValues};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationStore {
    entries: Vec<LocaleTranslation>,
}

impl Default for TranslationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationStore {
    /// Empty entries for every supported locale.
    pub fn new() -> Self {
        Self {
            entries: Locale::supported()
                .into_iter()
                .map(LocaleTranslation::empty)
                .collect(),
        }
    }

    /// Build a store from already reconciled entries. Supported locales
    /// missing from `entries` get empty values.
    pub(crate) fn from_entries(entries: Vec<LocaleTranslation>) -> Self {
        let mut store = Self::new();
        for entry in entries {
            if let Some(slot) = store.entries.iter_mut().find(|e| e.locale == entry.locale) {
                *slot = entry;
            }
        }
        store
    }

    pub fn get(&self, locale: Locale) -> Option<&LocaleTranslation> {
        self.entries.iter().find(|e| e.locale == locale)
    }

    pub(crate) fn require(&self, locale: Locale) -> Result<&LocaleTranslation> {
        self.get(locale)
            .ok_or_else(|| not_in_record(locale))
    }

    fn require_mut(&mut self, locale: Locale) -> Result<&mut LocaleTranslation> {
        self.entries
            .iter_mut()
            .find(|e| e.locale == locale)
            .ok_or_else(|| not_in_record(locale))
    }

    pub fn canonical(&self) -> Option<&LocaleTranslation> {
        self.get(Locale::canonical())
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocaleTranslation> {
        self.entries.iter()
    }

    /// Locales whose variant has been persisted, in registry order.
    pub fn existing_locales(&self) -> Vec<Locale> {
        self.entries
            .iter()
            .filter(|e| e.exists)
            .map(|e| e.locale)
            .collect()
    }

    /// Write `value` into `field` as edited from `editor`.
    ///
    /// Shared fields go to every locale and require a canonical editor;
    /// per-locale fields touch only the editor's entry.
    pub fn update_field(&mut self, editor: Locale, field: Field, value: &str) -> Result<()> {
        match field {
            Field::Shared(shared) => {
                ensure_canonical(editor, shared.label())?;
                for entry in &mut self.entries {
                    *shared.slot(entry) = value.to_string();
                }
                debug!("Shared field '{}' updated across all locales", shared.label());
            }
            Field::PerLocale(per_locale) => {
                *per_locale.slot(self.require_mut(editor)?) = value.to_string();
            }
        }
        Ok(())
    }

    /// Replace the shared phone list in every locale.
    pub(crate) fn set_phones(&mut self, editor: Locale, phones: Vec<String>) -> Result<()> {
        ensure_canonical(editor, "phones")?;
        for entry in &mut self.entries {
            entry.phones = phones.clone();
        }
        Ok(())
    }

    pub(crate) fn mark_exists(&mut self, locale: Locale) -> Result<()> {
        self.require_mut(locale)?.exists = true;
        Ok(())
    }

    /// True when every shared field is identical across all locales.
    pub fn is_consistent(&self) -> bool {
        let mut shared = self.entries.iter().map(LocaleTranslation::shared_values);
        match shared.next() {
            Some(first) => shared.all(|values| values == first),
            None => true,
        }
    }

    /// Copy the canonical locale's shared values over every other locale.
    pub(crate) fn reconcile_from_canonical(&mut self) {
        let Some(shared): Option<SharedValues> =
            self.canonical().map(LocaleTranslation::shared_values)
        else {
            return;
        };
        for entry in &mut self.entries {
            entry.apply_shared(&shared);
        }
    }
}

fn not_in_record(locale: Locale) -> SyncError {
    SyncError::state(format!("Locale '{}' is not part of this record", locale))
}

fn ensure_canonical(editor: Locale, what: &str) -> Result<()> {
    if editor.is_canonical() {
        return Ok(());
    }
    Err(SyncError::permission(format!(
        "The {} field can only be edited from the {} tab; it is shared by all languages",
        what,
        Locale::canonical().name()
    )))
}
