//! Remote synchronization: loading, reconciling and persisting translations.
//!
//! The canonical locale's stored shared values are authoritative. Whatever
//! the backend returns for other locales' shared fields is overwritten on
//! load; only their address and existence survive.

use crate::api::{ContactApi, RemoteTranslation, TranslateRequest, TranslationPayload};
use crate::error::{Result, SyncError};
use crate::i18n::Locale;
use crate::model::{LocaleTranslation, SharedValues};
use crate::phone::validate_phone;
use crate::store::TranslationStore;
use tracing::{debug, info, warn};

/// A record's translations as reconciled after a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRecord {
    pub id: String,
    pub store: TranslationStore,
    /// Locales persisted server-side, in registry order
    pub existing: Vec<Locale>,
}

/// Build the in-memory view of a record from the backend's translations.
pub fn reconcile(id: &str, remote: Vec<RemoteTranslation>) -> LoadedRecord {
    let canonical = Locale::canonical();
    let shared = remote
        .iter()
        .find(|t| t.locale == canonical.code())
        .map(shared_from_remote)
        .unwrap_or_default();

    let mut entries = Vec::new();
    for locale in Locale::supported() {
        let mut entry = LocaleTranslation::empty(locale);
        if let Some(stored) = remote.iter().find(|t| t.locale == locale.code()) {
            if !locale.is_canonical() && diverges(stored, &shared) {
                warn!(
                    "Record {}: stored shared fields for '{}' differ from '{}', using '{}' values",
                    id, locale, canonical, canonical
                );
            }
            entry.address = stored.address.clone();
            entry.exists = true;
        }
        entry.apply_shared(&shared);
        entries.push(entry);
    }

    for stored in &remote {
        if Locale::from_code(&stored.locale).is_err() {
            warn!(
                "Record {}: ignoring translation for unsupported locale '{}'",
                id, stored.locale
            );
        }
    }

    let store = TranslationStore::from_entries(entries);
    let existing = store.existing_locales();
    debug!("Record {} reconciled, existing locales: {:?}", id, existing);

    LoadedRecord {
        id: id.to_string(),
        store,
        existing,
    }
}

fn shared_from_remote(remote: &RemoteTranslation) -> SharedValues {
    SharedValues {
        country: remote.country.clone(),
        place: remote.place.clone(),
        email: remote.email.clone(),
        whatsapp: remote.whatsapp.clone(),
        phones: remote.phones.clone(),
    }
}

/// Only values actually present count as divergent; a locale that simply
/// never stored shared fields is the normal case.
fn diverges(stored: &RemoteTranslation, canonical: &SharedValues) -> bool {
    let differs = |value: &str, expected: &str| !value.is_empty() && value != expected;
    differs(&stored.country, &canonical.country)
        || differs(&stored.place, &canonical.place)
        || differs(&stored.email, &canonical.email)
        || differs(&stored.whatsapp, &canonical.whatsapp)
        || (!stored.phones.is_empty() && stored.phones != canonical.phones)
}

/// Resolve and validate the payload for saving `active`.
///
/// Shared fields come from the canonical locale when it has a value and
/// fall back to the active locale's own copy otherwise. Runs entirely
/// locally so invalid input never reaches the network.
pub fn resolve_payload(store: &TranslationStore, active: Locale) -> Result<TranslationPayload> {
    let own = store.require(active)?;
    let canonical = store.canonical().unwrap_or(own);

    let pick = |preferred: &str, fallback: &str| -> String {
        let value = if preferred.trim().is_empty() { fallback } else { preferred };
        value.to_string()
    };

    let payload = TranslationPayload {
        country: pick(&canonical.country, &own.country),
        place: pick(&canonical.place, &own.place),
        address: own.address.clone(),
        email: pick(&canonical.email, &own.email),
        whatsapp: pick(&canonical.whatsapp, &own.whatsapp),
        phones: if canonical.phones.is_empty() {
            own.phones.clone()
        } else {
            canonical.phones.clone()
        },
        locale: active,
    };

    for (label, value) in [
        ("Country", &payload.country),
        ("Address", &payload.address),
        ("Email", &payload.email),
    ] {
        if value.trim().is_empty() {
            return Err(SyncError::validation(format!("{} is required", label)));
        }
    }
    for phone in &payload.phones {
        validate_phone(phone)?;
    }

    Ok(payload)
}

/// Network side of synchronization, over any `ContactApi`.
#[derive(Debug, Clone)]
pub struct RemoteSync<A> {
    api: A,
}

impl<A: ContactApi> RemoteSync<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Fetch and reconcile every translation of `id`.
    pub async fn load_all(&self, id: &str) -> Result<LoadedRecord> {
        let remote = self.api.fetch_translations(id).await?;
        Ok(reconcile(id, remote))
    }

    /// Create the record from its canonical translation.
    pub async fn create(&self, payload: &TranslationPayload) -> Result<String> {
        if !payload.locale.is_canonical() {
            return Err(SyncError::state(format!(
                "Save the {} version first",
                Locale::canonical().name()
            )));
        }
        let id = self.api.create(payload).await?;
        info!("Created contact record {}", id);
        Ok(id)
    }

    /// Create or update one locale's translation of an existing record.
    pub async fn update(&self, id: &str, payload: &TranslationPayload) -> Result<String> {
        let returned = self.api.update(id, payload).await?;
        info!("Saved '{}' translation of record {}", payload.locale, id);
        Ok(returned)
    }

    pub async fn translate(&self, text: &str, target: Locale) -> Result<String> {
        self.api
            .translate(&TranslateRequest {
                text: text.to_string(),
                source_locale: Locale::canonical(),
                target_locale: target,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;

    fn remote(locale: &str) -> RemoteTranslation {
        RemoteTranslation {
            locale: locale.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_reconcile_copies_canonical_shared_fields() {
        let en = RemoteTranslation {
            country: "India".to_string(),
            phones: vec!["+911234567890".to_string()],
            address: "1 Marine Drive".to_string(),
            ..remote("en")
        };
        let es = RemoteTranslation {
            address: "Calle Falsa 123".to_string(),
            ..remote("es")
        };

        let loaded = reconcile("7", vec![en, es]);
        let es = loaded.store.get(Locale::SPANISH).unwrap();

        assert_eq!(es.country, "India");
        assert_eq!(es.phones, vec!["+911234567890"]);
        assert_eq!(es.address, "Calle Falsa 123");
        assert!(es.exists);
        assert_eq!(loaded.existing, vec![Locale::ENGLISH, Locale::SPANISH]);
        assert!(loaded.store.is_consistent());
    }

    #[test]
    fn test_reconcile_overwrites_divergent_values() {
        let en = RemoteTranslation {
            email: "en@example.com".to_string(),
            ..remote("en")
        };
        let de = RemoteTranslation {
            email: "legacy@example.com".to_string(),
            country: "Deutschland".to_string(),
            ..remote("de")
        };

        let loaded = reconcile("7", vec![de, en]);
        let de = loaded.store.get(Locale::GERMAN).unwrap();
        assert_eq!(de.email, "en@example.com");
        assert_eq!(de.country, "");
    }

    #[test]
    fn test_reconcile_without_canonical_uses_empty_shared_values() {
        let it = RemoteTranslation {
            country: "Italia".to_string(),
            address: "Via Roma 1".to_string(),
            ..remote("it")
        };

        let loaded = reconcile("7", vec![it]);
        let it = loaded.store.get(Locale::ITALIAN).unwrap();
        assert_eq!(it.country, "");
        assert_eq!(it.address, "Via Roma 1");
        assert_eq!(loaded.existing, vec![Locale::ITALIAN]);
        assert!(!loaded.store.get(Locale::ENGLISH).unwrap().exists);
    }

    #[test]
    fn test_reconcile_ignores_unknown_locales() {
        let loaded = reconcile("7", vec![remote("en"), remote("fr")]);
        assert_eq!(loaded.existing, vec![Locale::ENGLISH]);
        assert_eq!(loaded.store.iter().count(), Locale::supported().len());
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let input = vec![
            RemoteTranslation {
                country: "India".to_string(),
                ..remote("en")
            },
            RemoteTranslation {
                address: "Calle 1".to_string(),
                country: "Other".to_string(),
                ..remote("es")
            },
        ];
        assert_eq!(reconcile("7", input.clone()), reconcile("7", input));
    }

    fn filled_store() -> TranslationStore {
        let mut store = TranslationStore::new();
        store.update_field(Locale::ENGLISH, Field::COUNTRY, "India").unwrap();
        store.update_field(Locale::ENGLISH, Field::EMAIL, "ops@example.com").unwrap();
        store.update_field(Locale::ENGLISH, Field::ADDRESS, "1 Marine Drive").unwrap();
        store
    }

    #[test]
    fn test_resolve_payload_requires_fields() {
        let store = TranslationStore::new();
        let err = resolve_payload(&store, Locale::ENGLISH).unwrap_err();
        assert_eq!(err, SyncError::validation("Country is required"));

        let mut store = filled_store();
        let err = resolve_payload(&store, Locale::SPANISH).unwrap_err();
        assert_eq!(err, SyncError::validation("Address is required"));

        store.update_field(Locale::SPANISH, Field::ADDRESS, "Calle 1").unwrap();
        let payload = resolve_payload(&store, Locale::SPANISH).unwrap();
        assert_eq!(payload.country, "India");
        assert_eq!(payload.address, "Calle 1");
        assert_eq!(payload.locale, Locale::SPANISH);
    }

    #[test]
    fn test_resolve_payload_validates_phones() {
        let mut store = filled_store();
        store
            .set_phones(Locale::ENGLISH, vec!["12345".to_string()])
            .unwrap();
        assert!(matches!(
            resolve_payload(&store, Locale::ENGLISH),
            Err(SyncError::Length { digits: 5, .. })
        ));
    }
}
