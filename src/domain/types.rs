//! Shared types for the collection point registry

use serde::{Deserialize, Serialize};

/// Dropdown placeholder value meaning "no selection yet" for UF and city
pub const NO_SELECTION: &str = "0";

/// Newtype wrapper for catalog item IDs to provide type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct ItemId(pub i64);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Waste category accepted by collection points
///
/// Sourced entirely from the catalog endpoint; never mutated client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub title: String,
    pub image_url: String,
}

/// Latitude/longitude pair
///
/// Defaults to the origin (0,0) until a position resolves.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.latitude, self.longitude)
    }
}

/// Free-text registration fields, no format constraints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
}

/// Editable contact field names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Whatsapp,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Whatsapp => "whatsapp",
        }
    }
}

/// IBGE `/estados` response entry
#[derive(Debug, Deserialize)]
pub struct UfRecord {
    pub sigla: String,
}

/// IBGE `/estados/{uf}/municipios` response entry
#[derive(Debug, Deserialize)]
pub struct CityRecord {
    pub nome: String,
}
