//! Generic CRUD service shared by every administrable resource.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use shared::pagination::{Page, PageRequest};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::error::{DomainError, DomainResult};
use crate::models::{DeletionPolicy, Record, Resource, ResourceFilter};
use crate::store::ResourceStore;

/// List/create/update/delete/show over one resource type.
pub struct ResourceService<R: Resource> {
    store: Arc<dyn ResourceStore<R>>,
}

impl<R: Resource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(store: Arc<dyn ResourceStore<R>>) -> Self {
        Self { store }
    }

    /// Lists records matching the resource's declared filters. Unknown keys
    /// in `params` are ignored.
    pub async fn list(
        &self,
        params: &HashMap<String, String>,
        page: PageRequest,
        with_inactive: bool,
    ) -> DomainResult<Page<Record<R>>> {
        let filter = ResourceFilter::from_params::<R>(params, with_inactive);
        debug!(kind = R::KIND, conditions = filter.conditions.len(), "Listing resources");
        self.store.list(&filter, page).await
    }

    /// Active record by id.
    pub async fn show(&self, id: Uuid) -> DomainResult<Record<R>> {
        match self.store.find(id).await? {
            Some(record) if record.is_active => Ok(record),
            _ => Err(DomainError::not_found(R::KIND, id)),
        }
    }

    pub async fn create(&self, input: R::Create) -> DomainResult<Record<R>> {
        input.validate()?;
        let data = R::create(input);
        data.check()?;

        let record = Record::new(data, Utc::now());
        self.store.insert(&record).await?;

        info!(kind = R::KIND, id = %record.id, "Resource created");
        Ok(record)
    }

    pub async fn update(&self, id: Uuid, patch: R::Update) -> DomainResult<Record<R>> {
        patch.validate()?;
        let mut record = self.show(id).await?;
        record.data.apply(patch);
        record.data.check()?;
        record.updated_at = Utc::now();

        self.store.update(&record).await?;

        info!(kind = R::KIND, id = %id, "Resource updated");
        Ok(record)
    }

    /// Deletes according to `R::DELETION`. Returns false when there was
    /// nothing to delete.
    pub async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let deleted = match R::DELETION {
            DeletionPolicy::Hard => self.store.remove(id).await?,
            DeletionPolicy::Soft => match self.store.find(id).await? {
                Some(mut record) if record.is_active => {
                    let now = Utc::now();
                    record.is_active = false;
                    record.deleted_at = Some(now);
                    record.updated_at = now;
                    self.store.update(&record).await?;
                    true
                }
                _ => false,
            },
        };

        if deleted {
            info!(kind = R::KIND, id = %id, policy = ?R::DELETION, "Resource deleted");
        }
        Ok(deleted)
    }

    /// Persists a record whose data was changed by a domain workflow.
    pub(crate) async fn save(&self, record: &Record<R>) -> DomainResult<()> {
        self.store.update(record).await
    }
}
