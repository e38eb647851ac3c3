//! Catalog store tests against a mock database.
//!
//! These exercise the sub-record reconciler and the re-fetch contract
//! without a running PostgreSQL: every query result is stubbed in the
//! exact order the store issues them.

use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use talleres_api::domain::{AddressInput, CatalogDraft, CatalogPatch, ContactInput};
use talleres_api::errors::AppError;
use talleres_api::infra::repositories::entities::{address, contact, workshop};
use talleres_api::infra::{CatalogRepository, CatalogStore, Workshops};

fn workshop_model(id: Uuid, checked: bool) -> workshop::Model {
    workshop::Model {
        id,
        name: "Test Taller".to_string(),
        category: "MECANICO".to_string(),
        description: None,
        services: vec!["mecánica".to_string()],
        rating: None,
        checked,
        tenant_id: None,
        created_at: Utc::now(),
    }
}

fn address_model(owner: Uuid, district: &str) -> address::Model {
    address::Model {
        id: Uuid::new_v4(),
        street: None,
        district: district.to_string(),
        province: "Lima".to_string(),
        country: "Perú".to_string(),
        latitude: None,
        longitude: None,
        workshop_id: Some(owner),
        rectifier_id: None,
    }
}

fn contact_model(owner: Uuid, phone: &str) -> contact::Model {
    contact::Model {
        id: Uuid::new_v4(),
        phone: Some(phone.to_string()),
        phone_alt: None,
        email: None,
        whatsapp: None,
        website: None,
        facebook: None,
        instagram: None,
        workshop_id: Some(owner),
        rectifier_id: None,
    }
}

#[tokio::test]
async fn update_replaces_an_existing_address_in_place() {
    let id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // find parent
        .append_query_results([vec![workshop_model(id, false)]])
        // parent update (checked toggled)
        .append_query_results([vec![workshop_model(id, true)]])
        // reconciler finds the existing address
        .append_query_results([vec![address_model(id, "Miraflores")]])
        // address update
        .append_query_results([vec![address_model(id, "Lince")]])
        // re-fetch: parent, addresses, contacts
        .append_query_results([vec![workshop_model(id, true)]])
        .append_query_results([vec![address_model(id, "Lince")]])
        .append_query_results([Vec::<contact::Model>::new()])
        .into_connection();

    let store = CatalogStore::<Workshops>::new(db.clone());
    let entry = store
        .update(
            id,
            CatalogPatch {
                checked: Some(true),
                address: Some(AddressInput {
                    district: "Lince".to_string(),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(entry.checked);
    assert_eq!(entry.address.unwrap().district, "Lince");
    assert!(entry.contact.is_none());

    // Idempotent upsert: the existing row is updated, never duplicated
    let log = format!("{:?}", db.into_transaction_log());
    assert!(!log.contains("INSERT"), "no insert expected:\n{log}");
}

#[tokio::test]
async fn update_creates_the_address_when_the_parent_has_none() {
    let id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // find parent; the patch carries no scalar fields, so no parent
        // update statement follows
        .append_query_results([vec![workshop_model(id, false)]])
        // reconciler finds no address
        .append_query_results([Vec::<address::Model>::new()])
        // address insert
        .append_query_results([vec![address_model(id, "Lince")]])
        // re-fetch: parent, addresses, contacts
        .append_query_results([vec![workshop_model(id, false)]])
        .append_query_results([vec![address_model(id, "Lince")]])
        .append_query_results([Vec::<contact::Model>::new()])
        .into_connection();

    let store = CatalogStore::<Workshops>::new(db.clone());
    let entry = store
        .update(
            id,
            CatalogPatch {
                address: Some(AddressInput {
                    district: "Lince".to_string(),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(entry.address.unwrap().district, "Lince");

    // The insert carries the Lima defaults for the omitted province/country
    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("INSERT"), "insert expected:\n{log}");
    assert!(log.contains("Lima"), "province default expected:\n{log}");
    assert!(log.contains("Perú"), "country default expected:\n{log}");
}

#[tokio::test]
async fn update_without_fragments_leaves_sub_records_untouched() {
    let id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // find parent
        .append_query_results([vec![workshop_model(id, false)]])
        // parent update
        .append_query_results([vec![workshop_model(id, true)]])
        // re-fetch: parent, addresses, contacts
        .append_query_results([vec![workshop_model(id, true)]])
        .append_query_results([vec![address_model(id, "Miraflores")]])
        .append_query_results([vec![contact_model(id, "555")]])
        .into_connection();

    let store = CatalogStore::<Workshops>::new(db.clone());
    let entry = store
        .update(
            id,
            CatalogPatch {
                checked: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // The stored sub-records come back even though the patch never
    // mentioned them
    assert_eq!(entry.address.unwrap().district, "Miraflores");
    assert_eq!(entry.contact.unwrap().phone.as_deref(), Some("555"));

    let log = format!("{:?}", db.into_transaction_log());
    assert!(
        !log.contains(r#"UPDATE \"addresses\""#),
        "address must stay untouched:\n{log}"
    );
    assert!(
        !log.contains(r#"UPDATE \"contacts\""#),
        "contact must stay untouched:\n{log}"
    );
}

#[tokio::test]
async fn create_persists_sub_records_and_returns_the_stored_graph() {
    let id = Uuid::new_v4();

    // The store generates its own id, so stub rows are keyed loosely: the
    // re-fetch at the end is what the caller sees.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // parent insert
        .append_query_results([vec![workshop_model(id, false)]])
        // address reconcile: none found, then insert
        .append_query_results([Vec::<address::Model>::new()])
        .append_query_results([vec![address_model(id, "Miraflores")]])
        // contact reconcile: none found, then insert
        .append_query_results([Vec::<contact::Model>::new()])
        .append_query_results([vec![contact_model(id, "555")]])
        // re-fetch: parent, addresses, contacts
        .append_query_results([vec![workshop_model(id, false)]])
        .append_query_results([vec![address_model(id, "Miraflores")]])
        .append_query_results([vec![contact_model(id, "555")]])
        .into_connection();

    let store = CatalogStore::<Workshops>::new(db.clone());
    let entry = store
        .create(CatalogDraft {
            name: "Test Taller".to_string(),
            category: "MECANICO".to_string(),
            description: None,
            tags: vec!["mecánica".to_string()],
            address: Some(AddressInput {
                district: "Miraflores".to_string(),
                ..Default::default()
            }),
            contact: Some(ContactInput {
                phone: Some("555".to_string()),
                ..Default::default()
            }),
        })
        .await
        .unwrap();

    let address = entry.address.unwrap();
    assert_eq!(address.district, "Miraflores");
    assert_eq!(address.province, "Lima");
    assert_eq!(address.country, "Perú");
    assert_eq!(entry.contact.unwrap().phone.as_deref(), Some("555"));

    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("Lima"), "province default expected:\n{log}");
}

#[tokio::test]
async fn get_returns_none_for_a_missing_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<workshop::Model>::new()])
        .into_connection();

    let store = CatalogStore::<Workshops>::new(db);
    let result = store.find_by_id(Uuid::new_v4()).await.unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn delete_maps_zero_affected_rows_to_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let store = CatalogStore::<Workshops>::new(db);
    let result = store.delete(Uuid::new_v4()).await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn delete_succeeds_when_a_row_was_removed() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let store = CatalogStore::<Workshops>::new(db);
    assert!(store.delete(Uuid::new_v4()).await.is_ok());
}
