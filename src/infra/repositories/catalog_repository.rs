//! Generic catalog repository shared by workshops and rectifiers.
//!
//! The two directory tables are structurally identical, so a single store
//! implements list/create/update/delete for both. [`CatalogDef`] describes
//! the per-table pieces: the SeaORM entity, the owner columns on the
//! sub-record tables and the mapping between drafts/patches and the
//! entity's active model. The store is instantiated once per table.

use std::collections::HashMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Condition, Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, IntoActiveModel, JoinType, ModelTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Related, Select, Set,
};
use uuid::Uuid;

use super::entities::{address, contact, rectifier, workshop};
use crate::config::{DEFAULT_COUNTRY, DEFAULT_PROVINCE};
use crate::domain::{
    Address, AddressInput, CatalogDraft, CatalogEntry, CatalogFilter, CatalogPatch, CatalogQuery,
    Contact, ContactInput, SortField, SortOrder,
};
use crate::errors::{AppError, AppResult};

/// Per-table descriptor consumed by [`CatalogStore`].
pub trait CatalogDef: Send + Sync + 'static {
    type Entity: EntityTrait<Model = Self::Model, Column = Self::Column>
        + Related<address::Entity>
        + Related<contact::Entity>
        + Default;
    type Model: ModelTrait<Entity = Self::Entity>
        + FromQueryResult
        + IntoActiveModel<Self::ActiveModel>
        + Into<CatalogEntry>
        + Send
        + Sync;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + Send
        + 'static;
    type Column: ColumnTrait;

    /// Record kind label used in tracing output
    const LABEL: &'static str;

    fn id_col() -> Self::Column;
    fn name_col() -> Self::Column;
    fn checked_col() -> Self::Column;

    /// Column backing a sort field. District never reaches this point: it
    /// sorts on the joined address table and is handled by the store.
    fn sort_col(field: SortField) -> Self::Column;

    /// Owner foreign-key column on the addresses table
    fn address_owner_col() -> address::Column;
    /// Owner foreign-key column on the contacts table
    fn contact_owner_col() -> contact::Column;

    fn address_owner(model: &address::Model) -> Option<Uuid>;
    fn contact_owner(model: &contact::Model) -> Option<Uuid>;

    /// Point a fresh sub-record at its parent
    fn bind_address(active: &mut address::ActiveModel, owner: Uuid);
    fn bind_contact(active: &mut contact::ActiveModel, owner: Uuid);

    fn insert_model(id: Uuid, now: DateTime<Utc>, draft: &CatalogDraft) -> Self::ActiveModel;
    fn apply_patch(model: Self::Model, patch: &CatalogPatch) -> Self::ActiveModel;
}

/// Catalog repository trait for dependency injection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Filtered, sorted, windowed listing plus the unwindowed match count
    async fn search(&self, query: CatalogQuery) -> AppResult<(Vec<CatalogEntry>, u64)>;

    /// Fetch one entry with its sub-record graph
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<CatalogEntry>>;

    /// Insert a new entry and its optional sub-records
    async fn create(&self, draft: CatalogDraft) -> AppResult<CatalogEntry>;

    /// Patch an entry, reconcile provided sub-record fragments and return
    /// the re-fetched graph
    async fn update(&self, id: Uuid, patch: CatalogPatch) -> AppResult<CatalogEntry>;

    /// Delete an entry; owned sub-records go with it via FK cascade
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete store over a SeaORM connection, instantiated per table.
pub struct CatalogStore<D: CatalogDef> {
    db: DatabaseConnection,
    _def: PhantomData<D>,
}

impl<D: CatalogDef> CatalogStore<D> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _def: PhantomData,
        }
    }

    /// Attach owned sub-records to already-fetched entries with one query
    /// per sub-record table.
    async fn attach_sub_records(&self, entries: &mut [CatalogEntry]) -> AppResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = entries.iter().map(|e| e.id).collect();

        let addresses = address::Entity::find()
            .filter(D::address_owner_col().is_in(ids.clone()))
            .all(&self.db)
            .await?;
        let contacts = contact::Entity::find()
            .filter(D::contact_owner_col().is_in(ids))
            .all(&self.db)
            .await?;

        attach_graph::<D>(entries, addresses, contacts);
        Ok(())
    }

    async fn reconcile_address(&self, owner: Uuid, input: &AddressInput) -> AppResult<()> {
        let existing = address::Entity::find()
            .filter(D::address_owner_col().eq(owner))
            .one(&self.db)
            .await?;

        match existing {
            Some(model) => {
                let mut active = model.into_active_model();
                apply_address(&mut active, input);
                active.update(&self.db).await?;
            }
            None => {
                let mut active = address::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    ..Default::default()
                };
                apply_address(&mut active, input);
                D::bind_address(&mut active, owner);
                active.insert(&self.db).await?;
            }
        }
        Ok(())
    }

    async fn reconcile_contact(&self, owner: Uuid, input: &ContactInput) -> AppResult<()> {
        let existing = contact::Entity::find()
            .filter(D::contact_owner_col().eq(owner))
            .one(&self.db)
            .await?;

        match existing {
            Some(model) => {
                let mut active = model.into_active_model();
                apply_contact(&mut active, input);
                active.update(&self.db).await?;
            }
            None => {
                let mut active = contact::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    ..Default::default()
                };
                apply_contact(&mut active, input);
                D::bind_contact(&mut active, owner);
                active.insert(&self.db).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<D: CatalogDef> CatalogRepository for CatalogStore<D> {
    async fn search(&self, query: CatalogQuery) -> AppResult<(Vec<CatalogEntry>, u64)> {
        let count_select = base_select::<D>(&query);
        let page_select = data_select::<D>(&query);

        // Count and window run concurrently; they are not snapshot-isolated
        // against each other.
        let (total, models) =
            tokio::try_join!(count_select.count(&self.db), page_select.all(&self.db))?;

        let mut entries: Vec<CatalogEntry> = models.into_iter().map(Into::into).collect();
        self.attach_sub_records(&mut entries).await?;
        Ok((entries, total))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<CatalogEntry>> {
        let Some(model) = D::Entity::find()
            .filter(D::id_col().eq(id))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut entries = vec![model.into()];
        self.attach_sub_records(&mut entries).await?;
        Ok(entries.pop())
    }

    async fn create(&self, draft: CatalogDraft) -> AppResult<CatalogEntry> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        D::insert_model(id, now, &draft).insert(&self.db).await?;

        if let Some(input) = &draft.address {
            self.reconcile_address(id, input).await?;
        }
        if let Some(input) = &draft.contact {
            self.reconcile_contact(id, input).await?;
        }

        tracing::debug!(kind = D::LABEL, %id, "catalog entry created");

        // Return the persisted graph, not the in-memory draft
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal("created entry could not be re-read"))
    }

    async fn update(&self, id: Uuid, patch: CatalogPatch) -> AppResult<CatalogEntry> {
        let model = D::Entity::find()
            .filter(D::id_col().eq(id))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let active = D::apply_patch(model, &patch);
        if active.is_changed() {
            active.update(&self.db).await?;
        }

        if let Some(input) = &patch.address {
            self.reconcile_address(id, input).await?;
        }
        if let Some(input) = &patch.contact {
            self.reconcile_contact(id, input).await?;
        }

        // Re-fetch so the response reflects persisted state
        self.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = D::Entity::delete_many()
            .filter(D::id_col().eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        tracing::debug!(kind = D::LABEL, %id, "catalog entry deleted");
        Ok(())
    }
}

// =============================================================================
// Query building
// =============================================================================

/// Fold the closed filter set into one AND-combined condition.
fn filter_condition<D: CatalogDef>(filters: &[CatalogFilter]) -> Condition {
    let mut condition = Condition::all();
    for filter in filters {
        condition = match filter {
            CatalogFilter::NameContains(needle) => condition.add(contains_insensitive(
                Expr::col((D::Entity::default(), D::name_col())),
                needle,
            )),
            CatalogFilter::CheckedEquals(value) => condition.add(D::checked_col().eq(*value)),
            CatalogFilter::DistrictContains(needle) => condition.add(contains_insensitive(
                Expr::col((address::Entity, address::Column::District)),
                needle,
            )),
        };
    }
    condition
}

/// Case-insensitive substring match: LOWER(col) LIKE '%needle%'
pub(crate) fn contains_insensitive(col: Expr, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(col)).like(format!("%{}%", needle.to_lowercase()))
}

fn needs_address_join(query: &CatalogQuery) -> bool {
    query.sort_by == SortField::District
        || query
            .filters
            .iter()
            .any(|f| matches!(f, CatalogFilter::DistrictContains(_)))
}

/// Filtered selection without ordering or window; used as-is for the count.
fn base_select<D: CatalogDef>(query: &CatalogQuery) -> Select<D::Entity> {
    let mut select = D::Entity::find();
    if needs_address_join(query) {
        select = select.join(
            JoinType::LeftJoin,
            <D::Entity as Related<address::Entity>>::to(),
        );
    }
    select.filter(filter_condition::<D>(&query.filters))
}

/// Ordered, windowed selection for the page fetch.
fn data_select<D: CatalogDef>(query: &CatalogQuery) -> Select<D::Entity> {
    let order = match query.sort_order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    };

    let select = base_select::<D>(query);
    let select = match query.sort_by {
        SortField::District => select.order_by(address::Column::District, order),
        field => select.order_by(D::sort_col(field), order),
    };

    select.offset(query.offset()).limit(query.limit)
}

// =============================================================================
// Graph assembly
// =============================================================================

/// Zip fetched sub-records onto their owning entries.
fn attach_graph<D: CatalogDef>(
    entries: &mut [CatalogEntry],
    addresses: Vec<address::Model>,
    contacts: Vec<contact::Model>,
) {
    let mut address_by_owner: HashMap<Uuid, Address> = addresses
        .into_iter()
        .filter_map(|m| D::address_owner(&m).map(|owner| (owner, Address::from(m))))
        .collect();
    let mut contact_by_owner: HashMap<Uuid, Contact> = contacts
        .into_iter()
        .filter_map(|m| D::contact_owner(&m).map(|owner| (owner, Contact::from(m))))
        .collect();

    for entry in entries {
        entry.address = address_by_owner.remove(&entry.id);
        entry.contact = contact_by_owner.remove(&entry.id);
    }
}

/// Full replace of the address fields; Lima defaults fill omitted
/// province/country.
fn apply_address(active: &mut address::ActiveModel, input: &AddressInput) {
    active.street = Set(input.street.clone());
    active.district = Set(input.district.clone());
    active.province = Set(input
        .province
        .clone()
        .unwrap_or_else(|| DEFAULT_PROVINCE.to_string()));
    active.country = Set(input
        .country
        .clone()
        .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()));
    active.latitude = Set(input.latitude);
    active.longitude = Set(input.longitude);
}

fn apply_contact(active: &mut contact::ActiveModel, input: &ContactInput) {
    active.phone = Set(input.phone.clone());
    active.phone_alt = Set(input.phone_alt.clone());
    active.email = Set(input.email.clone());
    active.whatsapp = Set(input.whatsapp.clone());
    active.website = Set(input.website.clone());
    active.facebook = Set(input.facebook.clone());
    active.instagram = Set(input.instagram.clone());
}

// =============================================================================
// Table descriptors
// =============================================================================

/// Descriptor for the workshops table
pub struct Workshops;

impl CatalogDef for Workshops {
    type Entity = workshop::Entity;
    type Model = workshop::Model;
    type ActiveModel = workshop::ActiveModel;
    type Column = workshop::Column;

    const LABEL: &'static str = "workshop";

    fn id_col() -> workshop::Column {
        workshop::Column::Id
    }

    fn name_col() -> workshop::Column {
        workshop::Column::Name
    }

    fn checked_col() -> workshop::Column {
        workshop::Column::Checked
    }

    fn sort_col(field: SortField) -> workshop::Column {
        match field {
            SortField::Name => workshop::Column::Name,
            SortField::Category => workshop::Column::Category,
            SortField::Checked => workshop::Column::Checked,
            SortField::District | SortField::CreatedAt => workshop::Column::CreatedAt,
        }
    }

    fn address_owner_col() -> address::Column {
        address::Column::WorkshopId
    }

    fn contact_owner_col() -> contact::Column {
        contact::Column::WorkshopId
    }

    fn address_owner(model: &address::Model) -> Option<Uuid> {
        model.workshop_id
    }

    fn contact_owner(model: &contact::Model) -> Option<Uuid> {
        model.workshop_id
    }

    fn bind_address(active: &mut address::ActiveModel, owner: Uuid) {
        active.workshop_id = Set(Some(owner));
    }

    fn bind_contact(active: &mut contact::ActiveModel, owner: Uuid) {
        active.workshop_id = Set(Some(owner));
    }

    fn insert_model(id: Uuid, now: DateTime<Utc>, draft: &CatalogDraft) -> workshop::ActiveModel {
        workshop::ActiveModel {
            id: Set(id),
            name: Set(draft.name.clone()),
            category: Set(draft.category.clone()),
            description: Set(draft.description.clone()),
            services: Set(draft.tags.clone()),
            rating: Set(None),
            checked: Set(false),
            tenant_id: Set(None),
            created_at: Set(now),
        }
    }

    fn apply_patch(model: workshop::Model, patch: &CatalogPatch) -> workshop::ActiveModel {
        let mut active = model.into_active_model();
        if let Some(name) = &patch.name {
            active.name = Set(name.clone());
        }
        if let Some(category) = &patch.category {
            active.category = Set(category.clone());
        }
        if let Some(description) = &patch.description {
            active.description = Set(Some(description.clone()));
        }
        if let Some(tags) = &patch.tags {
            active.services = Set(tags.clone());
        }
        if let Some(rating) = patch.rating {
            active.rating = Set(Some(rating));
        }
        if let Some(checked) = patch.checked {
            active.checked = Set(checked);
        }
        if let Some(tenant_id) = &patch.tenant_id {
            active.tenant_id = Set(Some(tenant_id.clone()));
        }
        active
    }
}

/// Descriptor for the rectifiers table
pub struct Rectifiers;

impl CatalogDef for Rectifiers {
    type Entity = rectifier::Entity;
    type Model = rectifier::Model;
    type ActiveModel = rectifier::ActiveModel;
    type Column = rectifier::Column;

    const LABEL: &'static str = "rectifier";

    fn id_col() -> rectifier::Column {
        rectifier::Column::Id
    }

    fn name_col() -> rectifier::Column {
        rectifier::Column::Name
    }

    fn checked_col() -> rectifier::Column {
        rectifier::Column::Checked
    }

    fn sort_col(field: SortField) -> rectifier::Column {
        match field {
            SortField::Name => rectifier::Column::Name,
            SortField::Category => rectifier::Column::Category,
            SortField::Checked => rectifier::Column::Checked,
            SortField::District | SortField::CreatedAt => rectifier::Column::CreatedAt,
        }
    }

    fn address_owner_col() -> address::Column {
        address::Column::RectifierId
    }

    fn contact_owner_col() -> contact::Column {
        contact::Column::RectifierId
    }

    fn address_owner(model: &address::Model) -> Option<Uuid> {
        model.rectifier_id
    }

    fn contact_owner(model: &contact::Model) -> Option<Uuid> {
        model.rectifier_id
    }

    fn bind_address(active: &mut address::ActiveModel, owner: Uuid) {
        active.rectifier_id = Set(Some(owner));
    }

    fn bind_contact(active: &mut contact::ActiveModel, owner: Uuid) {
        active.rectifier_id = Set(Some(owner));
    }

    fn insert_model(id: Uuid, now: DateTime<Utc>, draft: &CatalogDraft) -> rectifier::ActiveModel {
        rectifier::ActiveModel {
            id: Set(id),
            name: Set(draft.name.clone()),
            category: Set(draft.category.clone()),
            description: Set(draft.description.clone()),
            specialties: Set(draft.tags.clone()),
            rating: Set(None),
            checked: Set(false),
            tenant_id: Set(None),
            created_at: Set(now),
        }
    }

    fn apply_patch(model: rectifier::Model, patch: &CatalogPatch) -> rectifier::ActiveModel {
        let mut active = model.into_active_model();
        if let Some(name) = &patch.name {
            active.name = Set(name.clone());
        }
        if let Some(category) = &patch.category {
            active.category = Set(category.clone());
        }
        if let Some(description) = &patch.description {
            active.description = Set(Some(description.clone()));
        }
        if let Some(tags) = &patch.tags {
            active.specialties = Set(tags.clone());
        }
        if let Some(rating) = patch.rating {
            active.rating = Set(Some(rating));
        }
        if let Some(checked) = patch.checked {
            active.checked = Set(checked);
        }
        if let Some(tenant_id) = &patch.tenant_id {
            active.tenant_id = Set(Some(tenant_id.clone()));
        }
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn render<D: CatalogDef>(query: &CatalogQuery) -> String {
        data_select::<D>(query).build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn default_listing_sorts_newest_first() {
        let sql = render::<Workshops>(&CatalogQuery::default());
        assert!(sql.contains(r#"ORDER BY "workshops"."created_at" DESC"#), "{sql}");
        assert!(sql.contains("LIMIT 10"), "{sql}");
        assert!(sql.contains("OFFSET 0"), "{sql}");
        assert!(!sql.contains("JOIN"), "{sql}");
    }

    #[test]
    fn filters_are_and_combined_and_case_insensitive() {
        let query = CatalogQuery {
            filters: vec![
                CatalogFilter::NameContains("Motor".to_string()),
                CatalogFilter::CheckedEquals(true),
            ],
            ..Default::default()
        };
        let sql = render::<Workshops>(&query);
        assert!(
            sql.contains(r#"LOWER("workshops"."name") LIKE '%motor%'"#),
            "{sql}"
        );
        assert!(sql.contains(r#""workshops"."checked" = TRUE"#), "{sql}");
        assert!(sql.contains(" AND "), "{sql}");
    }

    #[test]
    fn district_filter_joins_the_address_table() {
        let query = CatalogQuery {
            filters: vec![CatalogFilter::DistrictContains("Lince".to_string())],
            ..Default::default()
        };
        let sql = render::<Workshops>(&query);
        assert!(sql.contains(r#"LEFT JOIN "addresses""#), "{sql}");
        assert!(
            sql.contains(r#"LOWER("addresses"."district") LIKE '%lince%'"#),
            "{sql}"
        );
    }

    #[test]
    fn district_sort_orders_on_the_joined_relation() {
        let query = CatalogQuery {
            sort_by: SortField::District,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let sql = render::<Rectifiers>(&query);
        assert!(sql.contains(r#"LEFT JOIN "addresses""#), "{sql}");
        assert!(sql.contains(r#"ORDER BY "addresses"."district" ASC"#), "{sql}");
    }

    #[test]
    fn page_window_matches_offset_arithmetic() {
        let query = CatalogQuery {
            page: 3,
            limit: 25,
            ..Default::default()
        };
        let sql = render::<Workshops>(&query);
        assert!(sql.contains("LIMIT 25"), "{sql}");
        assert!(sql.contains("OFFSET 50"), "{sql}");
    }

    #[test]
    fn count_select_carries_the_same_predicate_without_window() {
        let query = CatalogQuery {
            filters: vec![CatalogFilter::NameContains("taller".to_string())],
            page: 4,
            limit: 10,
            ..Default::default()
        };
        let sql = base_select::<Workshops>(&query)
            .build(DbBackend::Postgres)
            .to_string();
        assert!(
            sql.contains(r#"LOWER("workshops"."name") LIKE '%taller%'"#),
            "{sql}"
        );
        assert!(!sql.contains("OFFSET"), "{sql}");
        assert!(!sql.contains("ORDER BY"), "{sql}");
    }

    #[test]
    fn rectifier_descriptor_targets_its_own_owner_columns() {
        let query = CatalogQuery {
            filters: vec![CatalogFilter::NameContains("diesel".to_string())],
            ..Default::default()
        };
        let sql = render::<Rectifiers>(&query);
        assert!(
            sql.contains(r#"LOWER("rectifiers"."name") LIKE '%diesel%'"#),
            "{sql}"
        );

        assert!(matches!(
            Rectifiers::address_owner_col(),
            address::Column::RectifierId
        ));
        assert!(matches!(
            Workshops::address_owner_col(),
            address::Column::WorkshopId
        ));
    }

    #[test]
    fn attach_graph_pairs_sub_records_with_their_owner() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut entries = vec![
            CatalogEntry {
                id: owner,
                name: "Taller Uno".to_string(),
                category: "MECANICO".to_string(),
                description: None,
                tags: vec![],
                rating: None,
                checked: false,
                tenant_id: None,
                created_at: Utc::now(),
                address: None,
                contact: None,
            },
            CatalogEntry {
                id: other,
                name: "Taller Dos".to_string(),
                category: "MECANICO".to_string(),
                description: None,
                tags: vec![],
                rating: None,
                checked: false,
                tenant_id: None,
                created_at: Utc::now(),
                address: None,
                contact: None,
            },
        ];

        let addresses = vec![address::Model {
            id: Uuid::new_v4(),
            street: None,
            district: "Miraflores".to_string(),
            province: "Lima".to_string(),
            country: "Perú".to_string(),
            latitude: None,
            longitude: None,
            workshop_id: Some(owner),
            rectifier_id: None,
        }];
        let contacts = vec![contact::Model {
            id: Uuid::new_v4(),
            phone: Some("555".to_string()),
            phone_alt: None,
            email: None,
            whatsapp: None,
            website: None,
            facebook: None,
            instagram: None,
            workshop_id: Some(owner),
            rectifier_id: None,
        }];

        attach_graph::<Workshops>(&mut entries, addresses, contacts);

        assert_eq!(
            entries[0].address.as_ref().map(|a| a.district.as_str()),
            Some("Miraflores")
        );
        assert_eq!(
            entries[0].contact.as_ref().map(|c| c.phone.as_deref()),
            Some(Some("555"))
        );
        assert!(entries[1].address.is_none());
        assert!(entries[1].contact.is_none());
    }
}
