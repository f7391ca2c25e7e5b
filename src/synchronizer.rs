//! Record synchronizer: one contact record's edit session.
//!
//! Owns the translation map, the active tab, the pending phone input and
//! the record lifecycle. The record starts `Uncreated`; saving the
//! canonical locale creates it, after which any locale may be saved. Only
//! `clear_selection` goes back to `Uncreated`.
//!
//! Loads and translate-assist are split into a ticket (`begin_load`,
//! `begin_translate`) and an apply step (`apply_load`,
//! `apply_translation`). Every state change bumps a generation counter, and a
//! ticket whose generation or record id no longer matches is discarded, so
//! a late response can never overwrite newer edits or another record.

use crate::api::ContactApi;
use crate::error::{Result, SyncError};
use crate::i18n::Locale;
use crate::model::{Field, LocaleTranslation, RecordState};
use crate::phone::PhoneLedger;
use crate::remote::{resolve_payload, LoadedRecord, RemoteSync};
use crate::store::TranslationStore;
use crate::tabs::ActiveTab;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Identifies an in-flight load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    record_id: String,
    generation: u64,
    preserve: Option<Locale>,
}

impl LoadTicket {
    pub fn record_id(&self) -> &str {
        &self.record_id
    }
}

/// Identifies an in-flight translate-assist request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateTicket {
    text: String,
    target: Locale,
    generation: u64,
}

impl TranslateTicket {
    /// Canonical address to translate.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn target(&self) -> Locale {
        self.target
    }
}

/// Whether a response was applied or discarded as out of date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The canonical locale was saved and the record now exists.
    Created { id: String },
    /// A translation was saved and the record reloaded.
    Updated { id: String, reload: Applied },
    /// The backend stored the translation under a different id; the
    /// session switched to it without reloading.
    Moved { id: String },
}

pub struct RecordSynchronizer<A> {
    remote: RemoteSync<A>,
    store: TranslationStore,
    tab: ActiveTab,
    phones: PhoneLedger,
    state: RecordState,
    generation: u64,
}

impl<A: ContactApi> RecordSynchronizer<A> {
    pub fn new(api: A) -> Self {
        Self {
            remote: RemoteSync::new(api),
            store: TranslationStore::new(),
            tab: ActiveTab::new(),
            phones: PhoneLedger::new(),
            state: RecordState::Uncreated,
            generation: 0,
        }
    }

    pub fn remote(&self) -> &RemoteSync<A> {
        &self.remote
    }

    pub fn store(&self) -> &TranslationStore {
        &self.store
    }

    pub fn translation(&self, locale: Locale) -> Option<&LocaleTranslation> {
        self.store.get(locale)
    }

    pub fn state(&self) -> &RecordState {
        &self.state
    }

    pub fn record_id(&self) -> Option<&str> {
        self.state.id()
    }

    pub fn active_locale(&self) -> Locale {
        self.tab.current()
    }

    pub fn phone_input(&self) -> &str {
        self.phones.input()
    }

    pub fn set_phone_input(&mut self, value: impl Into<String>) {
        self.phones.set_input(value);
    }

    fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn select_locale(&mut self, locale: Locale) {
        if self.tab.current() != locale {
            self.tab.select(locale);
            self.bump();
        }
    }

    /// The external "clear selected record" action: back to an empty,
    /// uncreated record on the canonical tab.
    pub fn clear_selection(&mut self) {
        self.store = TranslationStore::new();
        self.tab.reset();
        self.phones = PhoneLedger::new();
        self.state = RecordState::Uncreated;
        self.bump();
        info!("Record selection cleared");
    }

    /// React to the externally selected record id changing. `None` clears
    /// the session; `Some` loads that record.
    pub async fn select_record(&mut self, id: Option<&str>) -> Result<Applied> {
        match id {
            Some(id) => self.load_all(id).await,
            None => {
                self.clear_selection();
                Ok(Applied::Applied)
            }
        }
    }

    /// Edit `field` as `locale`. Shared fields require the canonical locale.
    pub fn update_field(&mut self, locale: Locale, field: Field, value: &str) -> Result<()> {
        self.store.update_field(locale, field, value)?;
        self.bump();
        Ok(())
    }

    /// Edit `field` from the active tab.
    pub fn edit(&mut self, field: Field, value: &str) -> Result<()> {
        self.update_field(self.tab.current(), field, value)
    }

    pub fn add_phone(&mut self, raw: &str) -> Result<()> {
        self.phones.add_phone(&mut self.store, self.tab.current(), raw)?;
        self.bump();
        Ok(())
    }

    /// Add the pending phone input.
    pub fn add_pending_phone(&mut self) -> Result<()> {
        self.phones.add_pending(&mut self.store, self.tab.current())?;
        self.bump();
        Ok(())
    }

    pub fn remove_phone(&mut self, index: usize) -> Result<String> {
        let removed = self
            .phones
            .remove_phone(&mut self.store, self.tab.current(), index)?;
        self.bump();
        Ok(removed)
    }

    /// Start a load of `id`. `preserve` keeps that tab active once applied.
    pub fn begin_load(&mut self, id: &str, preserve: Option<Locale>) -> LoadTicket {
        self.bump();
        LoadTicket {
            record_id: id.to_string(),
            generation: self.generation,
            preserve,
        }
    }

    /// Apply a load started with `ticket`, unless something changed since.
    pub fn apply_load(&mut self, ticket: LoadTicket, loaded: LoadedRecord) -> Applied {
        if ticket.generation != self.generation || loaded.id != ticket.record_id {
            debug!(
                "Discarding stale load of record {} (generation {} != {})",
                ticket.record_id, ticket.generation, self.generation
            );
            return Applied::Stale;
        }

        let saved_locales: BTreeSet<Locale> = loaded.existing.iter().copied().collect();
        self.tab.after_load(&loaded.existing, ticket.preserve);
        self.store = loaded.store;
        self.state = RecordState::Created {
            id: loaded.id,
            saved_locales,
        };
        self.bump();
        Applied::Applied
    }

    /// Load every translation of `id`, replacing the in-memory record.
    pub async fn load_all(&mut self, id: &str) -> Result<Applied> {
        self.load_preserving(id, None).await
    }

    async fn load_preserving(&mut self, id: &str, preserve: Option<Locale>) -> Result<Applied> {
        let ticket = self.begin_load(id, preserve);
        let loaded = self.remote.load_all(ticket.record_id()).await?;
        Ok(self.apply_load(ticket, loaded))
    }

    /// Save the active locale's translation.
    ///
    /// Without a record id only the canonical locale may save, which
    /// creates the record. With an id, the active translation is saved and
    /// the record reloaded on the same tab. On any failure the in-memory
    /// record is left as it was.
    pub async fn save_active_locale(&mut self) -> Result<SaveOutcome> {
        let active = self.tab.current();
        let canonical = Locale::canonical();

        let Some(id) = self.state.id().map(str::to_string) else {
            if !active.is_canonical() {
                return Err(SyncError::state(format!(
                    "Save the {} version before adding translations",
                    canonical.name()
                )));
            }
            let payload = resolve_payload(&self.store, active)?;
            let id = self.remote.create(&payload).await?;

            self.store.mark_exists(canonical)?;
            self.state = RecordState::Created {
                id: id.clone(),
                saved_locales: [canonical].into_iter().collect(),
            };
            self.tab.after_create();
            self.bump();
            return Ok(SaveOutcome::Created { id });
        };

        if !active.is_canonical() && !self.state.is_saved(canonical) {
            return Err(SyncError::state(format!(
                "Save the {} version before adding translations",
                canonical.name()
            )));
        }

        let payload = resolve_payload(&self.store, active)?;
        let returned = self.remote.update(&id, &payload).await?;

        self.store.mark_exists(active)?;
        let mut saved_locales = match &self.state {
            RecordState::Created { saved_locales, .. } => saved_locales.clone(),
            RecordState::Uncreated => BTreeSet::new(),
        };
        saved_locales.insert(active);

        if returned != id {
            info!("Record {} now stored as {}", id, returned);
            self.state = RecordState::Created {
                id: returned.clone(),
                saved_locales,
            };
            self.bump();
            return Ok(SaveOutcome::Moved { id: returned });
        }

        self.state = RecordState::Created {
            id: id.clone(),
            saved_locales,
        };
        let reload = self.load_preserving(&id, Some(active)).await?;
        Ok(SaveOutcome::Updated { id, reload })
    }

    /// Start a translate-assist request for the active locale.
    ///
    /// Only non-canonical locales can be filled, and only once the
    /// canonical address has text to translate.
    pub fn begin_translate(&self) -> Result<TranslateTicket> {
        let target = self.tab.current();
        if target.is_canonical() {
            return Err(SyncError::permission(format!(
                "The {} address is the translation source",
                target.name()
            )));
        }
        let text = self
            .store
            .canonical()
            .map(|t| t.address.trim().to_string())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(SyncError::validation(format!(
                "Enter the {} address first",
                Locale::canonical().name()
            )));
        }

        Ok(TranslateTicket {
            text,
            target,
            generation: self.generation,
        })
    }

    /// Write a translation into the ticket's locale, unless the record,
    /// the tab or any field changed since the request was issued.
    pub fn apply_translation(
        &mut self,
        ticket: TranslateTicket,
        translated: &str,
    ) -> Result<Applied> {
        if ticket.generation != self.generation || self.tab.current() != ticket.target {
            debug!("Discarding stale translation for '{}'", ticket.target);
            return Ok(Applied::Stale);
        }
        self.update_field(ticket.target, Field::ADDRESS, translated)?;
        Ok(Applied::Applied)
    }

    /// Fill the active locale's address with a machine translation of the
    /// canonical address.
    pub async fn translate_address(&mut self) -> Result<Applied> {
        let ticket = self.begin_translate()?;
        let translated = self.remote.translate(ticket.text(), ticket.target()).await?;
        self.apply_translation(ticket, &translated)
    }
}
