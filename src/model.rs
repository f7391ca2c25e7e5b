//! Contact record data model.

use crate::i18n::Locale;
use serde::Serialize;
use std::collections::BTreeSet;

/// One locale's variant of a contact record.
///
/// `address` belongs to this locale alone; every other field is a copy of
/// the record's shared values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleTranslation {
    pub locale: Locale,
    pub country: String,
    pub place: String,
    pub address: String,
    pub phones: Vec<String>,
    pub whatsapp: String,
    pub email: String,
    /// True once this variant has been persisted server-side
    pub exists: bool,
}

impl LocaleTranslation {
    pub fn empty(locale: Locale) -> Self {
        Self {
            locale,
            country: String::new(),
            place: String::new(),
            address: String::new(),
            phones: Vec::new(),
            whatsapp: String::new(),
            email: String::new(),
            exists: false,
        }
    }

    pub fn shared_values(&self) -> SharedValues {
        SharedValues {
            country: self.country.clone(),
            place: self.place.clone(),
            email: self.email.clone(),
            whatsapp: self.whatsapp.clone(),
            phones: self.phones.clone(),
        }
    }

    pub fn apply_shared(&mut self, shared: &SharedValues) {
        self.country = shared.country.clone();
        self.place = shared.place.clone();
        self.email = shared.email.clone();
        self.whatsapp = shared.whatsapp.clone();
        self.phones = shared.phones.clone();
    }
}

/// The values that must be identical across every locale of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedValues {
    pub country: String,
    pub place: String,
    pub email: String,
    pub whatsapp: String,
    pub phones: Vec<String>,
}

/// Text fields shared across all locales. Phones are shared too but are
/// only mutated through the phone ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedField {
    Country,
    Place,
    Email,
    Whatsapp,
}

impl SharedField {
    pub fn label(self) -> &'static str {
        match self {
            SharedField::Country => "country",
            SharedField::Place => "place",
            SharedField::Email => "email",
            SharedField::Whatsapp => "whatsapp",
        }
    }

    pub(crate) fn slot(self, translation: &mut LocaleTranslation) -> &mut String {
        match self {
            SharedField::Country => &mut translation.country,
            SharedField::Place => &mut translation.place,
            SharedField::Email => &mut translation.email,
            SharedField::Whatsapp => &mut translation.whatsapp,
        }
    }
}

/// Fields that legitimately differ by locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerLocaleField {
    Address,
}

impl PerLocaleField {
    pub(crate) fn slot(self, translation: &mut LocaleTranslation) -> &mut String {
        match self {
            PerLocaleField::Address => &mut translation.address,
        }
    }
}

/// An editable text field, tagged with its sharing scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Shared(SharedField),
    PerLocale(PerLocaleField),
}

impl Field {
    pub const COUNTRY: Field = Field::Shared(SharedField::Country);
    pub const PLACE: Field = Field::Shared(SharedField::Place);
    pub const EMAIL: Field = Field::Shared(SharedField::Email);
    pub const WHATSAPP: Field = Field::Shared(SharedField::Whatsapp);
    pub const ADDRESS: Field = Field::PerLocale(PerLocaleField::Address);
}

/// Record lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordState {
    /// Nothing persisted yet; only the canonical locale may be saved.
    Uncreated,
    Created {
        id: String,
        saved_locales: BTreeSet<Locale>,
    },
}

impl RecordState {
    pub fn id(&self) -> Option<&str> {
        match self {
            RecordState::Uncreated => None,
            RecordState::Created { id, .. } => Some(id),
        }
    }

    pub fn is_saved(&self, locale: Locale) -> bool {
        match self {
            RecordState::Uncreated => false,
            RecordState::Created { saved_locales, .. } => saved_locales.contains(&locale),
        }
    }
}
