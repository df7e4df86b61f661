#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Crime category taxonomy and marker color definitions.
//!
//! This crate defines the fixed set of crime categories reported by the
//! Bogotá open-data portal. Raw source descriptions are classified into
//! [`CrimeCategory`] by keyword containment; descriptions that match no
//! keyword are carried verbatim as [`IncidentCategory::Unrecognized`].

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Neutral marker color for categories outside the fixed taxonomy.
pub const UNRECOGNIZED_COLOR: &str = "#95a5a6";

/// The fixed crime categories, in keyword-matching priority order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum CrimeCategory {
    /// Homicide
    #[serde(rename = "Homicidio")]
    #[strum(serialize = "Homicidio")]
    Homicidio,
    /// Theft from persons
    #[serde(rename = "Hurto a Personas")]
    #[strum(serialize = "Hurto a Personas")]
    HurtoAPersonas,
    /// Personal injury
    #[serde(rename = "Lesiones Personales")]
    #[strum(serialize = "Lesiones Personales")]
    LesionesPersonales,
    /// Kidnapping
    #[serde(rename = "Secuestro")]
    #[strum(serialize = "Secuestro")]
    Secuestro,
    /// Residential burglary
    #[serde(rename = "Hurto a Residencias")]
    #[strum(serialize = "Hurto a Residencias")]
    HurtoAResidencias,
    /// Commercial burglary
    #[serde(rename = "Hurto a Comercios")]
    #[strum(serialize = "Hurto a Comercios")]
    HurtoAComercios,
    /// Motor vehicle theft
    #[serde(rename = "Hurto a Automotores")]
    #[strum(serialize = "Hurto a Automotores")]
    HurtoAAutomotores,
}

impl CrimeCategory {
    /// Returns all variants in keyword-matching priority order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Homicidio,
            Self::HurtoAPersonas,
            Self::LesionesPersonales,
            Self::Secuestro,
            Self::HurtoAResidencias,
            Self::HurtoAComercios,
            Self::HurtoAAutomotores,
        ]
    }

    /// The uppercase keyword searched for in raw source descriptions.
    #[must_use]
    pub const fn source_key(self) -> &'static str {
        match self {
            Self::Homicidio => "HOMICIDIO",
            Self::HurtoAPersonas => "HURTO A PERSONAS",
            Self::LesionesPersonales => "LESIONES PERSONALES",
            Self::Secuestro => "SECUESTRO",
            Self::HurtoAResidencias => "HURTO A RESIDENCIAS",
            Self::HurtoAComercios => "HURTO A COMERCIOS",
            Self::HurtoAAutomotores => "HURTO A AUTOMOTORES",
        }
    }

    /// Marker color used on the map for this category.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Homicidio => "#e74c3c",
            Self::HurtoAPersonas => "#f39c12",
            Self::LesionesPersonales => "#e67e22",
            Self::Secuestro => "#8e44ad",
            Self::HurtoAResidencias => "#3498db",
            Self::HurtoAComercios => "#2ecc71",
            Self::HurtoAAutomotores => "#9b59b6",
        }
    }
}

/// The category attached to a normalized incident.
///
/// Serializes as its display name, so a `Known` category and an
/// `Unrecognized` label with the same text are indistinguishable on the
/// wire. Deserializing maps canonical names back to `Known`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IncidentCategory {
    /// One of the fixed taxonomy categories.
    Known(CrimeCategory),
    /// A raw source description that matched no category keyword.
    Unrecognized(String),
}

impl IncidentCategory {
    /// Display name: the canonical category name or the raw text.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Known(category) => category.as_ref(),
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Marker color, falling back to [`UNRECOGNIZED_COLOR`].
    #[must_use]
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Known(category) => category.color(),
            Self::Unrecognized(_) => UNRECOGNIZED_COLOR,
        }
    }

    /// Returns `true` when this is exactly the given taxonomy category.
    #[must_use]
    pub fn is(&self, category: CrimeCategory) -> bool {
        matches!(self, Self::Known(c) if *c == category)
    }
}

impl std::fmt::Display for IncidentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<CrimeCategory> for IncidentCategory {
    fn from(category: CrimeCategory) -> Self {
        Self::Known(category)
    }
}

impl From<String> for IncidentCategory {
    fn from(name: String) -> Self {
        name.parse::<CrimeCategory>()
            .map_or(Self::Unrecognized(name), Self::Known)
    }
}

impl From<IncidentCategory> for String {
    fn from(category: IncidentCategory) -> Self {
        match category {
            IncidentCategory::Known(c) => c.to_string(),
            IncidentCategory::Unrecognized(raw) => raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_roundtrip_through_from_str() {
        for category in CrimeCategory::all() {
            let parsed: CrimeCategory = category.to_string().parse().unwrap();
            assert_eq!(parsed, *category);
        }
    }

    #[test]
    fn source_keys_are_uppercase_names() {
        for category in CrimeCategory::all() {
            assert_eq!(category.source_key(), category.as_ref().to_uppercase());
        }
    }

    #[test]
    fn unrecognized_gets_neutral_color() {
        let category = IncidentCategory::Unrecognized("VANDALISMO".to_string());
        assert_eq!(category.color(), UNRECOGNIZED_COLOR);
        assert_eq!(category.name(), "VANDALISMO");
    }

    #[test]
    fn known_category_uses_table_color() {
        let category = IncidentCategory::from(CrimeCategory::Secuestro);
        assert_eq!(category.color(), "#8e44ad");
        assert!(category.is(CrimeCategory::Secuestro));
        assert!(!category.is(CrimeCategory::Homicidio));
    }

    #[test]
    fn serializes_as_display_name() {
        let known = serde_json::to_string(&IncidentCategory::from(CrimeCategory::HurtoAPersonas))
            .unwrap();
        assert_eq!(known, "\"Hurto a Personas\"");

        let back: IncidentCategory = serde_json::from_str(&known).unwrap();
        assert_eq!(back, IncidentCategory::Known(CrimeCategory::HurtoAPersonas));

        let other: IncidentCategory = serde_json::from_str("\"Estafa\"").unwrap();
        assert_eq!(other, IncidentCategory::Unrecognized("Estafa".to_string()));
    }
}
