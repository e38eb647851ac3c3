//! Catalog domain: workshops and engine rectifiers with their owned
//! address/contact sub-records.
//!
//! The two record kinds are structurally identical, so a single set of
//! domain types serves both; the per-kind pieces (category vocabulary,
//! tag field naming) live at the API boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// =============================================================================
// Category vocabularies
// =============================================================================

/// Workshop categories from the Lima directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkshopType {
    Mecanico,
    Multimarca,
    Diagnostico,
    Direccion,
    Llantas,
    ADomicilio,
    GnvGlp,
    Oficial,
}

impl WorkshopType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkshopType::Mecanico => "MECANICO",
            WorkshopType::Multimarca => "MULTIMARCA",
            WorkshopType::Diagnostico => "DIAGNOSTICO",
            WorkshopType::Direccion => "DIRECCION",
            WorkshopType::Llantas => "LLANTAS",
            WorkshopType::ADomicilio => "A_DOMICILIO",
            WorkshopType::GnvGlp => "GNV_GLP",
            WorkshopType::Oficial => "OFICIAL",
        }
    }
}

/// Engine-rectifier categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RectifierType {
    Rectificadora,
    Torneria,
    Diesel,
    Compresores,
}

impl RectifierType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RectifierType::Rectificadora => "RECTIFICADORA",
            RectifierType::Torneria => "TORNERIA",
            RectifierType::Diesel => "DIESEL",
            RectifierType::Compresores => "COMPRESORES",
        }
    }
}

// =============================================================================
// Sub-records
// =============================================================================

/// Address owned by exactly one workshop or rectifier
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    pub street: Option<String>,
    #[schema(example = "Miraflores")]
    pub district: String,
    #[schema(example = "Lima")]
    pub province: String,
    #[schema(example = "Perú")]
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Contact details owned by exactly one workshop or rectifier
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub phone: Option<String>,
    pub phone_alt: Option<String>,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
}

/// Address fragment supplied on create/update. The whole fragment replaces
/// the stored sub-record; province and country fall back to the Lima
/// defaults when omitted.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub street: Option<String>,
    #[validate(length(min = 1, message = "District is required"))]
    #[schema(example = "Miraflores")]
    pub district: String,
    pub province: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Contact fragment supplied on create/update, full-replace like the address
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    pub phone: Option<String>,
    pub phone_alt: Option<String>,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
}

// =============================================================================
// Catalog records
// =============================================================================

/// A directory entry with its sub-record graph. `category` holds the stored
/// vocabulary string; `tags` backs `services` (workshops) or `specialties`
/// (rectifiers).
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub rating: Option<f64>,
    pub checked: bool,
    pub tenant_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub address: Option<Address>,
    pub contact: Option<Contact>,
}

/// Fields accepted when creating a directory entry
#[derive(Debug, Clone)]
pub struct CatalogDraft {
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub address: Option<AddressInput>,
    pub contact: Option<ContactInput>,
}

/// Partial update of a directory entry. `None` fields are left untouched;
/// an absent `address`/`contact` fragment never deletes the stored
/// sub-record.
#[derive(Debug, Clone, Default)]
pub struct CatalogPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub rating: Option<f64>,
    pub checked: Option<bool>,
    pub tenant_id: Option<String>,
    pub address: Option<AddressInput>,
    pub contact: Option<ContactInput>,
}

// =============================================================================
// Listing vocabulary
// =============================================================================

/// Closed set of supported list filters, AND-combined by the query builder
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogFilter {
    /// Case-insensitive substring match on the entry name
    NameContains(String),
    /// Exact match on the review flag
    CheckedEquals(bool),
    /// Case-insensitive substring match on the related address district
    DistrictContains(String),
}

/// Sortable fields for catalog listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    /// Category column, exposed as `type` in the query string
    #[serde(rename = "type")]
    Category,
    District,
    Checked,
    #[default]
    CreatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// A fully resolved listing request: filters, sort and page window
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    pub filters: Vec<CatalogFilter>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub page: u64,
    pub limit: u64,
}

impl CatalogQuery {
    pub fn offset(&self) -> u64 {
        (self.page.max(1) - 1) * self.limit
    }
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            page: crate::config::DEFAULT_PAGE_NUMBER,
            limit: crate::config::DEFAULT_PAGE_SIZE,
        }
    }
}
