//! Reconciliation engine for multi-locale contact records.
//!
//! One record carries fields shared by every locale (country, place,
//! email, WhatsApp, phone list) plus a per-locale address. The engine keeps
//! the shared fields identical across locales, only lets the canonical
//! locale change them, and refuses to persist a translation before the
//! canonical entry exists.

pub mod api;
pub mod config;
pub mod error;
pub mod i18n;
pub mod model;
pub mod phone;
pub mod remote;
pub mod retry;
pub mod store;
pub mod synchronizer;
pub mod tabs;

pub use api::{ContactApi, HttpContactApi};
pub use error::SyncError;
pub use i18n::Locale;
pub use model::{Field, LocaleTranslation, PerLocaleField, RecordState, SharedField};
pub use synchronizer::{Applied, LoadTicket, RecordSynchronizer, SaveOutcome};
