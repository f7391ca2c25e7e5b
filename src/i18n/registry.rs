//! Locale registry: Single source of truth for all supported locales.
//!
//! Uses a `OnceLock` singleton so the list is built once and shared
//! immutably for the rest of the process.

use std::sync::OnceLock;

/// Configuration for a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// ISO 639-1 language code (e.g., "en", "es")
    pub code: &'static str,

    /// English name of the locale (e.g., "Spanish")
    pub name: &'static str,

    /// Native name of the locale (e.g., "Español")
    pub native_name: &'static str,

    /// Whether this is the canonical locale (exactly one must be true)
    pub is_canonical: bool,

    /// Whether this locale takes part in editing sessions
    pub enabled: bool,
}

/// Global locale registry singleton.
///
/// The order of entries is the tab order of the editor and the order used
/// when picking "the first locale found to exist" after a load.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global registry, initializing it on first access.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Get a locale configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// All enabled locales, in registry order.
    pub fn list_enabled(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().filter(|locale| locale.enabled).collect()
    }

    /// Get the canonical locale configuration.
    ///
    /// # Panics
    /// Panics if the registry does not define exactly one canonical locale.
    /// The list is static, so this is a programming error caught by tests.
    pub fn canonical(&self) -> &LocaleConfig {
        let canonical: Vec<_> = self
            .locales
            .iter()
            .filter(|locale| locale.is_canonical)
            .collect();

        match canonical.len() {
            0 => panic!("No canonical locale found in registry"),
            1 => canonical[0],
            _ => panic!("Multiple canonical locales found in registry"),
        }
    }
}

fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "en",
            name: "English",
            native_name: "English",
            is_canonical: true,
            enabled: true,
        },
        LocaleConfig {
            code: "es",
            name: "Spanish",
            native_name: "Español",
            is_canonical: false,
            enabled: true,
        },
        LocaleConfig {
            code: "it",
            name: "Italian",
            native_name: "Italiano",
            is_canonical: false,
            enabled: true,
        },
        LocaleConfig {
            code: "de",
            name: "German",
            native_name: "Deutsch",
            is_canonical: false,
            enabled: true,
        },
        LocaleConfig {
            code: "pt",
            name: "Portuguese",
            native_name: "Português",
            is_canonical: false,
            enabled: true,
        },
        LocaleConfig {
            code: "zh",
            name: "Chinese",
            native_name: "中文",
            is_canonical: false,
            enabled: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LocaleRegistry::get();
        let registry2 = LocaleRegistry::get();
        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_get_by_code_english() {
        let config = LocaleRegistry::get().get_by_code("en").unwrap();
        assert_eq!(config.name, "English");
        assert!(config.is_canonical);
        assert!(config.enabled);
    }

    #[test]
    fn test_get_by_code_nonexistent() {
        assert!(LocaleRegistry::get().get_by_code("fr").is_none());
    }

    #[test]
    fn test_list_enabled_order() {
        let codes: Vec<_> = LocaleRegistry::get()
            .list_enabled()
            .iter()
            .map(|l| l.code)
            .collect();
        assert_eq!(codes, vec!["en", "es", "it", "de", "pt", "zh"]);
    }

    #[test]
    fn test_exactly_one_canonical() {
        let registry = LocaleRegistry::get();
        assert_eq!(registry.canonical().code, "en");
        assert_eq!(
            registry.list_enabled().iter().filter(|l| l.is_canonical).count(),
            1
        );
    }
}
