//! Phone ledger: validation and mutation of the shared phone list.
//!
//! A phone number is compared by its normalized form, the digit string with
//! every other character removed. Length checks and duplicate detection use
//! that same form, so "+1 (555) 123-4567", "+15551234567" and "15551234567"
//! are all the same number.

use crate::error::{Result, SyncError};
use crate::i18n::Locale;
use crate::store::TranslationStore;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

pub const MIN_PHONE_DIGITS: usize = 7;
pub const MAX_PHONE_DIGITS: usize = 15;

fn phone_format() -> &'static Regex {
    static FORMAT: OnceLock<Regex> = OnceLock::new();
    FORMAT.get_or_init(|| Regex::new(r"^\+?[0-9 ()\-]+$").expect("phone format regex is valid"))
}

/// Digits only.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Validate a raw phone entry and return its trimmed display form.
pub fn validate_phone(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SyncError::validation("Phone number cannot be empty"));
    }
    if !phone_format().is_match(trimmed) {
        return Err(SyncError::Format(trimmed.to_string()));
    }

    let digits = normalize_phone(trimmed).len();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        return Err(SyncError::Length {
            digits,
            min: MIN_PHONE_DIGITS,
            max: MAX_PHONE_DIGITS,
        });
    }

    Ok(trimmed.to_string())
}

/// Pending phone input plus the add/remove operations on the shared list.
#[derive(Debug, Clone, Default)]
pub struct PhoneLedger {
    input: String,
}

impl PhoneLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    /// Validate `raw` and append it to every locale's phone list.
    ///
    /// Clears the pending input on success; leaves everything untouched on
    /// failure.
    pub fn add_phone(
        &mut self,
        store: &mut TranslationStore,
        editor: Locale,
        raw: &str,
    ) -> Result<()> {
        ensure_editor(editor)?;
        let phone = validate_phone(raw)?;

        let mut phones = store.require(editor)?.phones.clone();
        let normalized = normalize_phone(&phone);
        if phones.iter().any(|existing| normalize_phone(existing) == normalized) {
            return Err(SyncError::Duplicate(phone));
        }

        phones.push(phone);
        store.set_phones(editor, phones)?;
        self.input.clear();
        debug!("Phone added ({} digits)", normalized.len());
        Ok(())
    }

    /// Add whatever is in the pending input buffer.
    pub fn add_pending(&mut self, store: &mut TranslationStore, editor: Locale) -> Result<()> {
        let raw = self.input.clone();
        self.add_phone(store, editor, &raw)
    }

    /// Remove the entry at `index`, returning it.
    pub fn remove_phone(
        &self,
        store: &mut TranslationStore,
        editor: Locale,
        index: usize,
    ) -> Result<String> {
        ensure_editor(editor)?;
        let mut phones = store.require(editor)?.phones.clone();
        if index >= phones.len() {
            return Err(SyncError::validation(format!(
                "No phone number at position {}",
                index + 1
            )));
        }
        let removed = phones.remove(index);
        store.set_phones(editor, phones)?;
        Ok(removed)
    }
}

fn ensure_editor(editor: Locale) -> Result<()> {
    if editor.is_canonical() {
        Ok(())
    } else {
        Err(SyncError::permission(format!(
            "Phone numbers can only be changed from the {} tab",
            Locale::canonical().name()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn phones(store: &TranslationStore) -> Vec<String> {
        store.get(Locale::ENGLISH).unwrap().phones.clone()
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("+1 (555) 123-4567"), "15551234567");
        assert_eq!(normalize_phone("15551234567"), "15551234567");
        assert_eq!(normalize_phone(""), "");
    }

    #[test]
    fn test_validate_empty() {
        assert!(matches!(validate_phone("   "), Err(SyncError::Validation(_))));
    }

    #[test]
    fn test_validate_format() {
        assert!(matches!(validate_phone("555-CALL-NOW"), Err(SyncError::Format(_))));
        assert!(matches!(validate_phone("12+34567890"), Err(SyncError::Format(_))));
        assert!(matches!(validate_phone("++1234567890"), Err(SyncError::Format(_))));
        assert!(matches!(validate_phone("123.456.7890"), Err(SyncError::Format(_))));
    }

    #[test]
    fn test_validate_length_boundaries() {
        assert!(matches!(
            validate_phone("123456"),
            Err(SyncError::Length { digits: 6, .. })
        ));
        assert_eq!(validate_phone("1234567").unwrap(), "1234567");
        assert_eq!(validate_phone("123456789012345").unwrap(), "123456789012345");
        assert!(matches!(
            validate_phone("1234567890123456"),
            Err(SyncError::Length { digits: 16, .. })
        ));
    }

    #[test]
    fn test_validate_trims() {
        assert_eq!(validate_phone("  +34 600 123 456 ").unwrap(), "+34 600 123 456");
    }

    #[test]
    fn test_add_phone_propagates_and_clears_input() {
        let mut store = TranslationStore::new();
        let mut ledger = PhoneLedger::new();
        ledger.set_input("+1 (555) 123-4567");

        ledger.add_pending(&mut store, Locale::ENGLISH).unwrap();

        assert_eq!(ledger.input(), "");
        assert!(store.iter().all(|e| e.phones == vec!["+1 (555) 123-4567"]));
    }

    #[test]
    fn test_duplicate_rejected_across_formatting() {
        let mut store = TranslationStore::new();
        let mut ledger = PhoneLedger::new();
        ledger
            .add_phone(&mut store, Locale::ENGLISH, "+1 (555) 123-4567")
            .unwrap();

        ledger.set_input("15551234567");
        let err = ledger.add_pending(&mut store, Locale::ENGLISH).unwrap_err();

        assert!(matches!(err, SyncError::Duplicate(_)));
        assert_eq!(ledger.input(), "15551234567");
        assert_eq!(phones(&store).len(), 1);
    }

    #[test]
    fn test_plus_prefix_is_not_a_different_number() {
        let mut store = TranslationStore::new();
        let mut ledger = PhoneLedger::new();
        ledger
            .add_phone(&mut store, Locale::ENGLISH, "+15551234567")
            .unwrap();
        let err = ledger
            .add_phone(&mut store, Locale::ENGLISH, "15551234567")
            .unwrap_err();
        assert!(matches!(err, SyncError::Duplicate(_)));
    }

    #[test]
    fn test_non_canonical_editor_is_rejected() {
        let mut store = TranslationStore::new();
        let mut ledger = PhoneLedger::new();
        ledger.set_input("1234567");

        let err = ledger.add_pending(&mut store, Locale::ITALIAN).unwrap_err();
        assert!(matches!(err, SyncError::Permission(_)));
        assert!(phones(&store).is_empty());
        assert_eq!(ledger.input(), "1234567");
    }

    #[test]
    fn test_remove_phone() {
        let mut store = TranslationStore::new();
        let mut ledger = PhoneLedger::new();
        ledger.add_phone(&mut store, Locale::ENGLISH, "1111111").unwrap();
        ledger.add_phone(&mut store, Locale::ENGLISH, "2222222").unwrap();

        let err = ledger
            .remove_phone(&mut store, Locale::SPANISH, 0)
            .unwrap_err();
        assert!(matches!(err, SyncError::Permission(_)));

        let removed = ledger.remove_phone(&mut store, Locale::ENGLISH, 0).unwrap();
        assert_eq!(removed, "1111111");
        assert!(store.iter().all(|e| e.phones == vec!["2222222"]));

        assert!(matches!(
            ledger.remove_phone(&mut store, Locale::ENGLISH, 5),
            Err(SyncError::Validation(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_formatting_does_not_change_normalized_form(digits in "[0-9]{7,15}") {
            let spaced: String = digits
                .chars()
                .enumerate()
                .flat_map(|(i, c)| if i % 3 == 2 { vec![c, '-'] } else { vec![c] })
                .collect();
            let decorated = format!("+({})", spaced);
            prop_assert_eq!(normalize_phone(&decorated), digits.clone());
            prop_assert!(validate_phone(&decorated).is_ok());
        }
    }
}
