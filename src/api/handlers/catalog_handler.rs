//! Directory handlers for workshops and engine rectifiers.
//!
//! The two surfaces are the same screen twice, so one generic handler core
//! serves both. [`CatalogApi`] supplies the per-entity pieces: request and
//! response DTOs (workshops expose `services`, rectifiers `specialties`)
//! and the service instance wired in [`AppState`]. The thin named wrappers
//! below exist for routing and OpenAPI documentation.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::domain::{
    Address, AddressInput, CatalogDraft, CatalogEntry, CatalogFilter, CatalogPatch, CatalogQuery,
    Contact, ContactInput, RectifierType, SortField, SortOrder, WorkshopType,
};
use crate::errors::AppResult;
use crate::services::CatalogService;
use crate::types::{ApiResponse, PageParams, Paginated};

// =============================================================================
// Listing parameters
// =============================================================================

/// Directory listing query parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogListParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Substring match on the entry name
    pub search: Option<String>,
    /// Exact match on the review flag
    pub checked: Option<bool>,
    /// Substring match on the related address district
    pub district: Option<String>,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub sort_order: SortOrder,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl CatalogListParams {
    /// Fold present parameters into the closed filter set; absent ones
    /// impose no constraint. Page and limit are clamped here.
    fn into_query(self) -> CatalogQuery {
        let mut filters = Vec::new();
        if let Some(search) = self.search.filter(|s| !s.is_empty()) {
            filters.push(CatalogFilter::NameContains(search));
        }
        if let Some(checked) = self.checked {
            filters.push(CatalogFilter::CheckedEquals(checked));
        }
        if let Some(district) = self.district.filter(|s| !s.is_empty()) {
            filters.push(CatalogFilter::DistrictContains(district));
        }

        let window = PageParams {
            page: self.page,
            limit: self.limit,
        };
        CatalogQuery {
            filters,
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            page: window.page(),
            limit: window.limit(),
        }
    }
}

// =============================================================================
// Generic handler core
// =============================================================================

/// Per-entity API descriptor: DTO mapping plus the service to call.
pub trait CatalogApi: Send + Sync + 'static {
    type CreateBody: DeserializeOwned + Validate + Send + 'static;
    type UpdateBody: DeserializeOwned + Validate + Send + 'static;
    type Response: Serialize + Send + 'static;

    fn service(state: &AppState) -> Arc<dyn CatalogService>;
    fn draft(body: Self::CreateBody) -> CatalogDraft;
    fn patch(body: Self::UpdateBody) -> CatalogPatch;
    fn response(entry: CatalogEntry) -> Self::Response;
}

async fn list_entries<A: CatalogApi>(
    State(state): State<AppState>,
    Query(params): Query<CatalogListParams>,
) -> AppResult<Json<Paginated<A::Response>>> {
    let query = params.into_query();
    let (page, limit) = (query.page, query.limit);

    let (entries, total) = A::service(&state).list(query).await?;

    let data = entries.into_iter().map(A::response).collect();
    Ok(Json(Paginated::new(data, page, limit, total)))
}

async fn create_entry<A: CatalogApi>(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<A::CreateBody>,
) -> AppResult<Json<A::Response>> {
    let entry = A::service(&state).create(A::draft(body)).await?;
    Ok(Json(A::response(entry)))
}

async fn get_entry<A: CatalogApi>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<A::Response>> {
    let entry = A::service(&state).get(id).await?;
    Ok(Json(A::response(entry)))
}

async fn update_entry<A: CatalogApi>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<A::UpdateBody>,
) -> AppResult<Json<A::Response>> {
    let entry = A::service(&state).update(id, A::patch(body)).await?;
    Ok(Json(A::response(entry)))
}

async fn delete_entry<A: CatalogApi>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse>> {
    A::service(&state).delete(id).await?;
    Ok(Json(ApiResponse::ok()))
}

// =============================================================================
// Workshop surface
// =============================================================================

/// Workshop creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkshopRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Taller Automotriz Kaisal")]
    pub name: String,
    #[serde(rename = "type")]
    pub category: WorkshopType,
    pub description: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
    #[validate(nested)]
    pub address: Option<AddressInput>,
    #[validate(nested)]
    pub contact: Option<ContactInput>,
}

/// Workshop update request; omitted fields stay untouched and an absent
/// `address`/`contact` fragment leaves the stored sub-record alone
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkshopRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<WorkshopType>,
    pub description: Option<String>,
    pub services: Option<Vec<String>>,
    pub rating: Option<f64>,
    pub checked: Option<bool>,
    pub tenant_id: Option<String>,
    #[validate(nested)]
    pub address: Option<AddressInput>,
    #[validate(nested)]
    pub contact: Option<ContactInput>,
}

/// Workshop with its sub-record graph
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkshopResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    #[schema(example = "MECANICO")]
    pub category: String,
    pub description: Option<String>,
    pub services: Vec<String>,
    pub rating: Option<f64>,
    pub checked: bool,
    pub tenant_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub address: Option<Address>,
    pub contact: Option<Contact>,
}

impl From<CatalogEntry> for WorkshopResponse {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            category: entry.category,
            description: entry.description,
            services: entry.tags,
            rating: entry.rating,
            checked: entry.checked,
            tenant_id: entry.tenant_id,
            created_at: entry.created_at,
            address: entry.address,
            contact: entry.contact,
        }
    }
}

/// Workshop API descriptor
pub struct WorkshopApi;

impl CatalogApi for WorkshopApi {
    type CreateBody = CreateWorkshopRequest;
    type UpdateBody = UpdateWorkshopRequest;
    type Response = WorkshopResponse;

    fn service(state: &AppState) -> Arc<dyn CatalogService> {
        state.workshop_service.clone()
    }

    fn draft(body: CreateWorkshopRequest) -> CatalogDraft {
        CatalogDraft {
            name: body.name,
            category: body.category.as_str().to_string(),
            description: body.description,
            tags: body.services,
            address: body.address,
            contact: body.contact,
        }
    }

    fn patch(body: UpdateWorkshopRequest) -> CatalogPatch {
        CatalogPatch {
            name: body.name,
            category: body.category.map(|c| c.as_str().to_string()),
            description: body.description,
            tags: body.services,
            rating: body.rating,
            checked: body.checked,
            tenant_id: body.tenant_id,
            address: body.address,
            contact: body.contact,
        }
    }

    fn response(entry: CatalogEntry) -> WorkshopResponse {
        WorkshopResponse::from(entry)
    }
}

/// Create workshop routes
pub fn workshop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_workshops).post(create_workshop))
        .route(
            "/:id",
            get(get_workshop)
                .patch(update_workshop)
                .delete(delete_workshop),
        )
}

/// List workshops with filters, sort and pagination
#[utoipa::path(
    get,
    path = "/workshops",
    tag = "Workshops",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u64>, Query, description = "1-indexed page number"),
        ("limit" = Option<u64>, Query, description = "Items per page"),
        ("search" = Option<String>, Query, description = "Substring match on name"),
        ("checked" = Option<bool>, Query, description = "Review flag filter"),
        ("district" = Option<String>, Query, description = "Substring match on address district"),
        ("sortBy" = Option<String>, Query, description = "name | type | district | checked | createdAt"),
        ("sortOrder" = Option<String>, Query, description = "asc | desc")
    ),
    responses(
        (status = 200, description = "Paginated workshop list"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_workshops(
    state: State<AppState>,
    params: Query<CatalogListParams>,
) -> AppResult<Json<Paginated<WorkshopResponse>>> {
    list_entries::<WorkshopApi>(state, params).await
}

/// Create a workshop with optional address and contact
#[utoipa::path(
    post,
    path = "/workshops",
    tag = "Workshops",
    security(("bearer_auth" = [])),
    request_body = CreateWorkshopRequest,
    responses(
        (status = 200, description = "Workshop created", body = WorkshopResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_workshop(
    state: State<AppState>,
    body: ValidatedJson<CreateWorkshopRequest>,
) -> AppResult<Json<WorkshopResponse>> {
    create_entry::<WorkshopApi>(state, body).await
}

/// Get workshop by ID
#[utoipa::path(
    get,
    path = "/workshops/{id}",
    tag = "Workshops",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Workshop ID")),
    responses(
        (status = 200, description = "Workshop with sub-records", body = WorkshopResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Workshop not found")
    )
)]
pub async fn get_workshop(
    state: State<AppState>,
    id: Path<Uuid>,
) -> AppResult<Json<WorkshopResponse>> {
    get_entry::<WorkshopApi>(state, id).await
}

/// Update a workshop and reconcile provided sub-record fragments
#[utoipa::path(
    patch,
    path = "/workshops/{id}",
    tag = "Workshops",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Workshop ID")),
    request_body = UpdateWorkshopRequest,
    responses(
        (status = 200, description = "Updated workshop", body = WorkshopResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Workshop not found")
    )
)]
pub async fn update_workshop(
    state: State<AppState>,
    id: Path<Uuid>,
    body: ValidatedJson<UpdateWorkshopRequest>,
) -> AppResult<Json<WorkshopResponse>> {
    update_entry::<WorkshopApi>(state, id, body).await
}

/// Delete a workshop; its address and contact cascade
#[utoipa::path(
    delete,
    path = "/workshops/{id}",
    tag = "Workshops",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Workshop ID")),
    responses(
        (status = 200, description = "Workshop deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Workshop not found")
    )
)]
pub async fn delete_workshop(
    state: State<AppState>,
    id: Path<Uuid>,
) -> AppResult<Json<ApiResponse>> {
    delete_entry::<WorkshopApi>(state, id).await
}

// =============================================================================
// Rectifier surface
// =============================================================================

/// Rectifier creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRectifierRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Rectificaciones Lima Norte")]
    pub name: String,
    #[serde(rename = "type")]
    pub category: RectifierType,
    pub description: Option<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[validate(nested)]
    pub address: Option<AddressInput>,
    #[validate(nested)]
    pub contact: Option<ContactInput>,
}

/// Rectifier update request, mirroring the workshop semantics
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRectifierRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<RectifierType>,
    pub description: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub rating: Option<f64>,
    pub checked: Option<bool>,
    pub tenant_id: Option<String>,
    #[validate(nested)]
    pub address: Option<AddressInput>,
    #[validate(nested)]
    pub contact: Option<ContactInput>,
}

/// Rectifier with its sub-record graph
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RectifierResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    #[schema(example = "RECTIFICADORA")]
    pub category: String,
    pub description: Option<String>,
    pub specialties: Vec<String>,
    pub rating: Option<f64>,
    pub checked: bool,
    pub tenant_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub address: Option<Address>,
    pub contact: Option<Contact>,
}

impl From<CatalogEntry> for RectifierResponse {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            category: entry.category,
            description: entry.description,
            specialties: entry.tags,
            rating: entry.rating,
            checked: entry.checked,
            tenant_id: entry.tenant_id,
            created_at: entry.created_at,
            address: entry.address,
            contact: entry.contact,
        }
    }
}

/// Rectifier API descriptor
pub struct RectifierApi;

impl CatalogApi for RectifierApi {
    type CreateBody = CreateRectifierRequest;
    type UpdateBody = UpdateRectifierRequest;
    type Response = RectifierResponse;

    fn service(state: &AppState) -> Arc<dyn CatalogService> {
        state.rectifier_service.clone()
    }

    fn draft(body: CreateRectifierRequest) -> CatalogDraft {
        CatalogDraft {
            name: body.name,
            category: body.category.as_str().to_string(),
            description: body.description,
            tags: body.specialties,
            address: body.address,
            contact: body.contact,
        }
    }

    fn patch(body: UpdateRectifierRequest) -> CatalogPatch {
        CatalogPatch {
            name: body.name,
            category: body.category.map(|c| c.as_str().to_string()),
            description: body.description,
            tags: body.specialties,
            rating: body.rating,
            checked: body.checked,
            tenant_id: body.tenant_id,
            address: body.address,
            contact: body.contact,
        }
    }

    fn response(entry: CatalogEntry) -> RectifierResponse {
        RectifierResponse::from(entry)
    }
}

/// Create rectifier routes
pub fn rectifier_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rectifiers).post(create_rectifier))
        .route(
            "/:id",
            get(get_rectifier)
                .patch(update_rectifier)
                .delete(delete_rectifier),
        )
}

/// List rectifiers with filters, sort and pagination
#[utoipa::path(
    get,
    path = "/rectifiers",
    tag = "Rectifiers",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u64>, Query, description = "1-indexed page number"),
        ("limit" = Option<u64>, Query, description = "Items per page"),
        ("search" = Option<String>, Query, description = "Substring match on name"),
        ("checked" = Option<bool>, Query, description = "Review flag filter"),
        ("district" = Option<String>, Query, description = "Substring match on address district"),
        ("sortBy" = Option<String>, Query, description = "name | type | district | checked | createdAt"),
        ("sortOrder" = Option<String>, Query, description = "asc | desc")
    ),
    responses(
        (status = 200, description = "Paginated rectifier list"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_rectifiers(
    state: State<AppState>,
    params: Query<CatalogListParams>,
) -> AppResult<Json<Paginated<RectifierResponse>>> {
    list_entries::<RectifierApi>(state, params).await
}

/// Create a rectifier with optional address and contact
#[utoipa::path(
    post,
    path = "/rectifiers",
    tag = "Rectifiers",
    security(("bearer_auth" = [])),
    request_body = CreateRectifierRequest,
    responses(
        (status = 200, description = "Rectifier created", body = RectifierResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_rectifier(
    state: State<AppState>,
    body: ValidatedJson<CreateRectifierRequest>,
) -> AppResult<Json<RectifierResponse>> {
    create_entry::<RectifierApi>(state, body).await
}

/// Get rectifier by ID
#[utoipa::path(
    get,
    path = "/rectifiers/{id}",
    tag = "Rectifiers",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Rectifier ID")),
    responses(
        (status = 200, description = "Rectifier with sub-records", body = RectifierResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Rectifier not found")
    )
)]
pub async fn get_rectifier(
    state: State<AppState>,
    id: Path<Uuid>,
) -> AppResult<Json<RectifierResponse>> {
    get_entry::<RectifierApi>(state, id).await
}

/// Update a rectifier and reconcile provided sub-record fragments
#[utoipa::path(
    patch,
    path = "/rectifiers/{id}",
    tag = "Rectifiers",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Rectifier ID")),
    request_body = UpdateRectifierRequest,
    responses(
        (status = 200, description = "Updated rectifier", body = RectifierResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Rectifier not found")
    )
)]
pub async fn update_rectifier(
    state: State<AppState>,
    id: Path<Uuid>,
    body: ValidatedJson<UpdateRectifierRequest>,
) -> AppResult<Json<RectifierResponse>> {
    update_entry::<RectifierApi>(state, id, body).await
}

/// Delete a rectifier; its address and contact cascade
#[utoipa::path(
    delete,
    path = "/rectifiers/{id}",
    tag = "Rectifiers",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Rectifier ID")),
    responses(
        (status = 200, description = "Rectifier deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Rectifier not found")
    )
)]
pub async fn delete_rectifier(
    state: State<AppState>,
    id: Path<Uuid>,
) -> AppResult<Json<ApiResponse>> {
    delete_entry::<RectifierApi>(state, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_PAGE_SIZE;

    #[test]
    fn create_request_parses_original_payload_shape() {
        let body: CreateWorkshopRequest = serde_json::from_str(
            r#"{
                "name": "Test Taller",
                "type": "MECANICO",
                "services": ["mecánica", "frenos"],
                "address": {"district": "Miraflores", "street": "Av. José Pardo 1167"},
                "contact": {"phone": "555"}
            }"#,
        )
        .unwrap();

        assert_eq!(body.category, WorkshopType::Mecanico);
        assert_eq!(body.services.len(), 2);

        let draft = WorkshopApi::draft(body);
        assert_eq!(draft.category, "MECANICO");
        assert_eq!(draft.address.unwrap().district, "Miraflores");
        assert_eq!(draft.contact.unwrap().phone.as_deref(), Some("555"));
    }

    #[test]
    fn create_request_rejects_unknown_category() {
        let result = serde_json::from_str::<CreateWorkshopRequest>(
            r#"{"name": "X", "type": "PINTURA"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn services_default_to_empty_when_absent() {
        let body: CreateWorkshopRequest =
            serde_json::from_str(r#"{"name": "Test Taller", "type": "MECANICO"}"#).unwrap();
        assert!(body.services.is_empty());
        assert!(body.address.is_none());
        assert!(body.contact.is_none());
    }

    #[test]
    fn checked_toggle_is_a_one_field_patch() {
        let body: UpdateWorkshopRequest = serde_json::from_str(r#"{"checked": true}"#).unwrap();
        let patch = WorkshopApi::patch(body);

        assert_eq!(patch.checked, Some(true));
        assert!(patch.name.is_none());
        assert!(patch.category.is_none());
        assert!(patch.tags.is_none());
        assert!(patch.address.is_none());
        assert!(patch.contact.is_none());
    }

    #[test]
    fn response_uses_the_dashboard_field_names() {
        let entry = CatalogEntry {
            id: Uuid::new_v4(),
            name: "Test Taller".to_string(),
            category: "MECANICO".to_string(),
            description: None,
            tags: vec!["frenos".to_string()],
            rating: None,
            checked: false,
            tenant_id: None,
            created_at: Utc::now(),
            address: None,
            contact: None,
        };

        let json = serde_json::to_value(WorkshopResponse::from(entry.clone())).unwrap();
        assert_eq!(json["type"], "MECANICO");
        assert!(json["services"].is_array());
        assert!(json.get("tenantId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json["address"].is_null());
        assert!(json["contact"].is_null());

        let json = serde_json::to_value(RectifierResponse::from(entry)).unwrap();
        assert!(json["specialties"].is_array());
        assert!(json.get("services").is_none());
    }

    #[test]
    fn list_params_fold_into_the_closed_filter_set() {
        let params = CatalogListParams {
            page: 0,
            limit: 500,
            search: Some("motor".to_string()),
            checked: Some(true),
            district: Some("Lince".to_string()),
            sort_by: SortField::District,
            sort_order: SortOrder::Asc,
        };

        let query = params.into_query();
        assert_eq!(
            query.filters,
            vec![
                CatalogFilter::NameContains("motor".to_string()),
                CatalogFilter::CheckedEquals(true),
                CatalogFilter::DistrictContains("Lince".to_string()),
            ]
        );
        // Open-question resolution: page 0 clamps, limit is capped
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn empty_search_imposes_no_constraint() {
        let params = CatalogListParams {
            page: 1,
            limit: 10,
            search: Some(String::new()),
            checked: None,
            district: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        };

        assert!(params.into_query().filters.is_empty());
    }
}
