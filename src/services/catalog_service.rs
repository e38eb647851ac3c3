//! Catalog service - directory entry use cases.
//!
//! One implementation serves workshops and rectifiers; each gets its own
//! instance wired to the matching store.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{CatalogDraft, CatalogEntry, CatalogPatch, CatalogQuery};
use crate::errors::{AppError, AppResult};
use crate::infra::CatalogRepository;

/// Catalog service trait for dependency injection.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Filtered, sorted, windowed listing plus total match count
    async fn list(&self, query: CatalogQuery) -> AppResult<(Vec<CatalogEntry>, u64)>;

    /// Get one entry with its sub-records
    async fn get(&self, id: Uuid) -> AppResult<CatalogEntry>;

    /// Create an entry with optional sub-records
    async fn create(&self, draft: CatalogDraft) -> AppResult<CatalogEntry>;

    /// Patch an entry and reconcile provided sub-record fragments
    async fn update(&self, id: Uuid, patch: CatalogPatch) -> AppResult<CatalogEntry>;

    /// Delete an entry and its owned sub-records
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of CatalogService using the repository.
pub struct CatalogManager {
    repo: Arc<dyn CatalogRepository>,
}

impl CatalogManager {
    /// Create new catalog service instance
    pub fn new(repo: Arc<dyn CatalogRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl CatalogService for CatalogManager {
    async fn list(&self, query: CatalogQuery) -> AppResult<(Vec<CatalogEntry>, u64)> {
        self.repo.search(query).await
    }

    async fn get(&self, id: Uuid) -> AppResult<CatalogEntry> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    async fn create(&self, draft: CatalogDraft) -> AppResult<CatalogEntry> {
        self.repo.create(draft).await
    }

    async fn update(&self, id: Uuid, patch: CatalogPatch) -> AppResult<CatalogEntry> {
        self.repo.update(id, patch).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::CatalogFilter;
    use crate::infra::MockCatalogRepository;

    fn sample_entry(id: Uuid) -> CatalogEntry {
        CatalogEntry {
            id,
            name: "Test Taller".to_string(),
            category: "MECANICO".to_string(),
            description: None,
            tags: vec!["mecánica".to_string()],
            rating: None,
            checked: false,
            tenant_id: None,
            created_at: Utc::now(),
            address: None,
            contact: None,
        }
    }

    #[tokio::test]
    async fn get_maps_missing_row_to_not_found() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = CatalogManager::new(Arc::new(repo));
        let result = service.get(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn get_returns_the_entry_graph() {
        let id = Uuid::new_v4();
        let mut repo = MockCatalogRepository::new();
        repo.expect_find_by_id()
            .returning(move |id| Ok(Some(sample_entry(id))));

        let service = CatalogManager::new(Arc::new(repo));
        let entry = service.get(id).await.unwrap();

        assert_eq!(entry.id, id);
    }

    #[tokio::test]
    async fn list_passes_filters_through_unchanged() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_search()
            .withf(|query| {
                query.filters
                    == vec![
                        CatalogFilter::NameContains("motor".to_string()),
                        CatalogFilter::CheckedEquals(true),
                    ]
            })
            .returning(|_| Ok((vec![], 0)));

        let service = CatalogManager::new(Arc::new(repo));
        let (entries, total) = service
            .list(CatalogQuery {
                filters: vec![
                    CatalogFilter::NameContains("motor".to_string()),
                    CatalogFilter::CheckedEquals(true),
                ],
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(entries.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn delete_propagates_not_found() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_delete().returning(|_| Err(AppError::NotFound));

        let service = CatalogManager::new(Arc::new(repo));
        let result = service.delete(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
