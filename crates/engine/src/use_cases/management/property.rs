//! Property listing management operations.

use std::sync::Arc;

use serde_json::{Map, Value};

use realtor_domain::{NewProperty, Page, PageRequest, Property, PropertyId, PropertyUpdate};

use crate::infrastructure::ports::PropertyRepo;

use super::ManagementError;

pub struct PropertyCrud {
    property: Arc<dyn PropertyRepo>,
}

impl PropertyCrud {
    pub fn new(property: Arc<dyn PropertyRepo>) -> Self {
        Self { property }
    }

    /// One page of listings in insertion order.
    ///
    /// A page past the end is an empty page, not an error.
    pub async fn list(&self, request: PageRequest) -> Result<Page<Property>, ManagementError> {
        let slice = self
            .property
            .list(request.offset(), request.limit())
            .await?;
        Ok(Page::new(slice.items, slice.total, request))
    }

    pub async fn get(&self, id: PropertyId) -> Result<Property, ManagementError> {
        self.property
            .get(id)
            .await?
            .ok_or(ManagementError::NotFound)
    }

    /// Validate a raw JSON body and persist it as a new listing.
    ///
    /// Nothing reaches the store unless every required field is present.
    pub async fn create(&self, payload: Map<String, Value>) -> Result<Property, ManagementError> {
        let draft = NewProperty::from_payload(payload)?;
        let property = self.property.insert(draft).await?;

        tracing::info!(property_id = %property.id, "Property created");
        Ok(property)
    }

    /// Apply a partial update to an existing listing.
    ///
    /// An unknown id is reported before the body is looked at.
    pub async fn update(
        &self,
        id: PropertyId,
        payload: Map<String, Value>,
    ) -> Result<Property, ManagementError> {
        if self.property.get(id).await?.is_none() {
            return Err(ManagementError::NotFound);
        }

        let update = PropertyUpdate::from_payload(payload)?;
        let property = self
            .property
            .update(id, update)
            .await?
            // Deleted between the lookup and the write
            .ok_or(ManagementError::NotFound)?;

        tracing::info!(property_id = %id, "Property updated");
        Ok(property)
    }

    pub async fn delete(&self, id: PropertyId) -> Result<(), ManagementError> {
        if self.property.get(id).await?.is_none() {
            return Err(ManagementError::NotFound);
        }

        if !self.property.delete(id).await? {
            return Err(ManagementError::NotFound);
        }

        tracing::info!(property_id = %id, "Property deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockPropertyRepo, PropertySlice, RepoError};
    use chrono::{TimeZone, Utc};
    use mockall::predicate::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn valid_payload() -> Map<String, Value> {
        object(json!({
            "title": "T",
            "description": "D",
            "price": 100000,
            "address": "A",
            "city": "C",
            "state": "S",
            "zip_code": "00000"
        }))
    }

    fn stored(id: i64) -> Property {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 10, 30, 0).unwrap();
        let draft = NewProperty::from_payload(valid_payload()).unwrap();
        Property::from_draft(PropertyId::new(id), draft, now)
    }

    fn crud(repo: MockPropertyRepo) -> PropertyCrud {
        PropertyCrud::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn list_translates_page_to_offset_and_limit() {
        let mut repo = MockPropertyRepo::new();
        repo.expect_list()
            .with(eq(10), eq(5))
            .times(1)
            .returning(|_, _| {
                Ok(PropertySlice {
                    items: vec![stored(11)],
                    total: 11,
                })
            });

        let page = crud(repo).list(PageRequest::new(3, 5)).await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, 11);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let mut repo = MockPropertyRepo::new();
        repo.expect_get().returning(|_| Ok(None));

        let err = crud(repo).get(PropertyId::new(999)).await.unwrap_err();
        assert!(matches!(err, ManagementError::NotFound));
    }

    #[tokio::test]
    async fn create_with_missing_fields_never_touches_store() {
        let mut repo = MockPropertyRepo::new();
        repo.expect_insert().never();

        let mut payload = valid_payload();
        payload.remove("price");
        payload.insert("city".into(), json!(""));

        let err = crud(repo).create(payload).await.unwrap_err();
        match err {
            ManagementError::MissingFields(mut fields) => {
                fields.sort();
                assert_eq!(fields, vec!["city", "price"]);
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_with_wrong_type_is_invalid_input() {
        let mut repo = MockPropertyRepo::new();
        repo.expect_insert().never();

        let mut payload = valid_payload();
        payload.insert("price".into(), json!("a lot"));

        let err = crud(repo).create(payload).await.unwrap_err();
        assert!(matches!(err, ManagementError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn create_persists_valid_draft() {
        let mut repo = MockPropertyRepo::new();
        repo.expect_insert()
            .withf(|draft| draft.title == "T" && draft.price == 100000.0)
            .times(1)
            .returning(|_| Ok(stored(1)));

        let property = crud(repo).create(valid_payload()).await.unwrap();
        assert_eq!(property.id, PropertyId::new(1));
    }

    #[tokio::test]
    async fn create_surfaces_store_failure() {
        let mut repo = MockPropertyRepo::new();
        repo.expect_insert()
            .returning(|_| Err(RepoError::database("insert_property", "disk I/O error")));

        let err = crud(repo).create(valid_payload()).await.unwrap_err();
        assert!(matches!(err, ManagementError::Repo(RepoError::Database { .. })));
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found_before_validation() {
        let mut repo = MockPropertyRepo::new();
        repo.expect_get().returning(|_| Ok(None));
        repo.expect_update().never();

        let err = crud(repo)
            .update(PropertyId::new(7), object(json!({"title": ""})))
            .await
            .unwrap_err();
        assert!(matches!(err, ManagementError::NotFound));
    }

    #[tokio::test]
    async fn update_rejects_blanked_required_field() {
        let mut repo = MockPropertyRepo::new();
        repo.expect_get().returning(|id| Ok(Some(stored(id.as_i64()))));
        repo.expect_update().never();

        let err = crud(repo)
            .update(PropertyId::new(1), object(json!({"price": null})))
            .await
            .unwrap_err();
        assert!(matches!(err, ManagementError::MissingFields(ref f) if f == &vec!["price".to_string()]));
    }

    #[tokio::test]
    async fn update_passes_only_allow_listed_fields() {
        let mut repo = MockPropertyRepo::new();
        repo.expect_get().returning(|id| Ok(Some(stored(id.as_i64()))));
        repo.expect_update()
            .withf(|id, update| {
                *id == PropertyId::new(1)
                    && update.title.as_deref() == Some("Updated Title")
                    && update.bedrooms == Some(None)
                    && update.price.is_none()
            })
            .times(1)
            .returning(|id, _| Ok(Some(stored(id.as_i64()))));

        let payload = object(json!({
            "title": "Updated Title",
            "bedrooms": null,
            "id": 99,
            "created_at": "1999-01-01T00:00:00Z",
            "favourite_colour": "green"
        }));
        crud(repo).update(PropertyId::new(1), payload).await.unwrap();
    }

    #[tokio::test]
    async fn update_racing_a_delete_is_not_found() {
        let mut repo = MockPropertyRepo::new();
        repo.expect_get().returning(|id| Ok(Some(stored(id.as_i64()))));
        repo.expect_update().returning(|_, _| Ok(None));

        let err = crud(repo)
            .update(PropertyId::new(1), Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ManagementError::NotFound));
    }

    #[tokio::test]
    async fn update_surfaces_store_failure() {
        let mut repo = MockPropertyRepo::new();
        repo.expect_get().returning(|id| Ok(Some(stored(id.as_i64()))));
        repo.expect_update()
            .returning(|_, _| Err(RepoError::database("update_property", "database is locked")));

        let err = crud(repo)
            .update(PropertyId::new(1), object(json!({"title": "New"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ManagementError::Repo(RepoError::Database { .. })));
    }

    #[tokio::test]
    async fn delete_surfaces_store_failure() {
        let mut repo = MockPropertyRepo::new();
        repo.expect_get().returning(|id| Ok(Some(stored(id.as_i64()))));
        repo.expect_delete()
            .returning(|_| Err(RepoError::database("delete_property", "database is locked")));

        let err = crud(repo).delete(PropertyId::new(1)).await.unwrap_err();
        assert!(matches!(err, ManagementError::Repo(RepoError::Database { .. })));
    }

    #[tokio::test]
    async fn delete_missing_id_is_not_found() {
        let mut repo = MockPropertyRepo::new();
        repo.expect_get().returning(|_| Ok(None));
        repo.expect_delete().never();

        let err = crud(repo).delete(PropertyId::new(3)).await.unwrap_err();
        assert!(matches!(err, ManagementError::NotFound));
    }

    #[tokio::test]
    async fn delete_existing_removes_it() {
        let mut repo = MockPropertyRepo::new();
        repo.expect_get().returning(|id| Ok(Some(stored(id.as_i64()))));
        repo.expect_delete()
            .with(eq(PropertyId::new(3)))
            .times(1)
            .returning(|_| Ok(true));

        crud(repo).delete(PropertyId::new(3)).await.unwrap();
    }
}
