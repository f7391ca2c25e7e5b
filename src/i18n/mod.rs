//! Supported locales for contact records.
//!
//! The locale list is fixed configuration: adding a locale means extending
//! the registry, never changing the engine.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported locales and their metadata
//! - `locale`: Type-safe `Locale` validated against the registry
//!
//! # Example
//!
//! ```rust,ignore
//! use contact_locale_sync::i18n::{Locale, LocaleRegistry};
//!
//! let canonical = Locale::canonical();
//! let spanish = Locale::from_code("es")?;
//! let all = LocaleRegistry::get().list_enabled();
//! ```

mod locale;
mod registry;

pub use locale::Locale;
pub use registry::{LocaleConfig, LocaleRegistry};
