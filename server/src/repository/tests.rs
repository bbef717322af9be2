//! Repository Integration Tests
//!
//! Tests for the SQLite repositories with in-memory databases.

#[cfg(test)]
mod tests {
    use crate::domain::{hosted_url, DomainError, Item, List, UserIdentity};
    use crate::repository::{
        init_db, ItemListOperations, ItemRepository, ListCategoryOperations, ListRepository,
        OwnedRepository, Repository, SessionRepository, SharedConnection, UnusedImageRepository,
    };
    use std::path::PathBuf;

    struct Repos {
        conn: SharedConnection,
        lists: ListRepository,
        items: ItemRepository,
        images: UnusedImageRepository,
        sessions: SessionRepository,
    }

    async fn setup_test_db() -> Repos {
        // Use in-memory database for tests
        let db_path = PathBuf::from(":memory:");
        let db_state = init_db(&db_path).await.expect("Failed to init test DB");
        Repos {
            conn: db_state.conn.clone(),
            lists: ListRepository::new(db_state.conn.clone()),
            items: ItemRepository::new(db_state.conn.clone()),
            images: UnusedImageRepository::new(db_state.conn.clone()),
            sessions: SessionRepository::new(db_state.conn.clone(), 3600),
        }
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    async fn seed_list(repos: &Repos, owner: &str) -> (List, Vec<crate::domain::Category>) {
        let list = List::new(0, "Camping".to_string(), owner.to_string());
        repos
            .lists
            .create_with_categories(&list, &names(&["Shelter", "Kitchen"]))
            .await
            .expect("Failed to create list")
    }

    #[tokio::test]
    async fn test_create_list_with_categories() {
        let repos = setup_test_db().await;
        let (list, categories) = seed_list(&repos, "alice").await;

        assert!(list.id > 0);
        assert!(list.created_at.is_some());
        assert_eq!(categories.len(), 2);
        assert!(categories.iter().all(|c| c.list_id == list.id));

        let found = repos.lists.find_by_id(list.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Camping");
        assert_eq!(found.owner, "alice");
    }

    #[tokio::test]
    async fn test_list_by_owner_filters() {
        let repos = setup_test_db().await;
        seed_list(&repos, "alice").await;
        seed_list(&repos, "bob").await;
        seed_list(&repos, "alice").await;

        let mine = repos.lists.list_by_owner("alice").await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|l| l.owner == "alice"));
        assert_eq!(repos.lists.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_categories_adds_and_removes() {
        let repos = setup_test_db().await;
        let (list, _) = seed_list(&repos, "alice").await;

        let (updated, categories) = repos
            .lists
            .update_with_categories(list.id, "Alpine", &names(&["Clothes"]), &names(&["Kitchen"]))
            .await
            .expect("update failed");

        assert_eq!(updated.name, "Alpine");
        let category_names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(category_names, vec!["Shelter", "Clothes"]);
    }

    #[tokio::test]
    async fn test_cannot_remove_category_in_use() {
        let repos = setup_test_db().await;
        let (list, categories) = seed_list(&repos, "alice").await;
        let kitchen = categories.iter().find(|c| c.name == "Kitchen").unwrap();

        let item = Item::new(0, "Stove".to_string(), list.id, kitchen.id, "alice".to_string());
        repos.items.create(&item).await.unwrap();

        let err = repos
            .lists
            .update_with_categories(list.id, "Camping", &names(&["Clothes"]), &names(&["Kitchen", "Shelter"]))
            .await
            .unwrap_err();
        match err {
            DomainError::Conflict(msg) => {
                assert!(msg.contains("Kitchen"));
                assert!(!msg.contains("Shelter"));
            }
            other => panic!("expected conflict, got {:?}", other),
        }

        // Nothing was applied
        let after = repos.lists.get_categories(list.id).await.unwrap();
        let after_names: Vec<&str> = after.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(after_names, vec!["Shelter", "Kitchen"]);
    }

    #[tokio::test]
    async fn test_update_rejects_existing_name_and_empty_result() {
        let repos = setup_test_db().await;
        let (list, _) = seed_list(&repos, "alice").await;

        let dup = repos
            .lists
            .update_with_categories(list.id, "Camping", &names(&["shelter"]), &[])
            .await;
        assert!(matches!(dup, Err(DomainError::InvalidInput(_))));

        let empty = repos
            .lists
            .update_with_categories(list.id, "Camping", &[], &names(&["Shelter", "Kitchen"]))
            .await;
        assert!(matches!(empty, Err(DomainError::InvalidInput(_))));
        assert_eq!(repos.lists.get_categories(list.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_list_cascades() {
        let repos = setup_test_db().await;
        let (list, categories) = seed_list(&repos, "alice").await;
        let mut item = Item::new(0, "Tent".to_string(), list.id, categories[0].id, "alice".to_string());
        item.image = hosted_url("tent.jpg");
        repos.items.create(&item).await.unwrap();

        let (deleted, items, released) = repos.lists.delete_with_items(list.id).await.unwrap().unwrap();
        assert_eq!(deleted.id, list.id);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].image, hosted_url("tent.jpg"));
        assert_eq!(released, names(&["tent.jpg"]));

        assert!(repos.lists.find_by_id(list.id).await.unwrap().is_none());
        assert!(repos.lists.get_categories(list.id).await.unwrap().is_empty());
        assert!(repos.items.list().await.unwrap().is_empty());
        assert!(repos.lists.delete_with_items(list.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_and_update_item() {
        let repos = setup_test_db().await;
        let (list, categories) = seed_list(&repos, "alice").await;

        let mut item = Item::new(0, "Tent".to_string(), list.id, categories[0].id, "alice".to_string());
        item.quantity = 2;
        item.bag = 3;
        let mut created = repos.items.create(&item).await.expect("Failed to create");
        assert!(created.id > 0);

        created.name = "Tarp".to_string();
        created.category_id = categories[1].id;
        created.packed = true;
        repos.items.update(&created).await.expect("Update failed");

        let found = repos.items.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Tarp");
        assert_eq!(found.quantity, 2);
        assert_eq!(found.bag, 3);
        assert_eq!(found.category_id, categories[1].id);
        assert!(found.packed);
    }

    #[tokio::test]
    async fn test_update_missing_item_is_not_found() {
        let repos = setup_test_db().await;
        let ghost = Item::new(42, "Ghost".to_string(), 1, 1, "alice".to_string());
        assert!(matches!(repos.items.update(&ghost).await, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_toggle_and_unpack() {
        let repos = setup_test_db().await;
        let (list, categories) = seed_list(&repos, "alice").await;
        let a = repos
            .items
            .create(&Item::new(0, "A".to_string(), list.id, categories[0].id, "alice".to_string()))
            .await
            .unwrap();
        let b = repos
            .items
            .create(&Item::new(0, "B".to_string(), list.id, categories[0].id, "alice".to_string()))
            .await
            .unwrap();

        assert!(repos.items.toggle_packed(a.id).await.unwrap().packed);
        assert!(repos.items.toggle_packed(b.id).await.unwrap().packed);
        assert!(!repos.items.toggle_packed(b.id).await.unwrap().packed);

        assert_eq!(repos.items.unpack_all(list.id).await.unwrap(), 1);
        let items = repos.items.list_by_list(list.id).await.unwrap();
        assert!(items.iter().all(|i| !i.packed));

        assert!(matches!(repos.items.toggle_packed(999).await, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_item_creation_claims_unused_image() {
        let repos = setup_test_db().await;
        let (list, categories) = seed_list(&repos, "alice").await;
        repos.images.record("tent.jpg").await.unwrap();
        repos.images.record("spare.jpg").await.unwrap();

        let mut item = Item::new(0, "Tent".to_string(), list.id, categories[0].id, "alice".to_string());
        item.image = hosted_url("tent.jpg");
        repos.items.create(&item).await.unwrap();

        let left: Vec<String> = repos.images.list().await.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(left, vec!["spare.jpg".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_returning_item() {
        let repos = setup_test_db().await;
        let (list, categories) = seed_list(&repos, "alice").await;
        let created = repos
            .items
            .create(&Item::new(0, "Tent".to_string(), list.id, categories[0].id, "alice".to_string()))
            .await
            .unwrap();

        let (deleted, released) = repos.items.delete_returning(created.id).await.unwrap().unwrap();
        assert_eq!(deleted.id, created.id);
        assert!(released.is_empty());
        assert!(repos.items.find_by_id(created.id).await.unwrap().is_none());
        assert!(repos.items.delete_returning(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_items_by_owner() {
        let repos = setup_test_db().await;
        let (alice_list, alice_cats) = seed_list(&repos, "alice").await;
        let (bob_list, bob_cats) = seed_list(&repos, "bob").await;
        repos
            .items
            .create(&Item::new(0, "A".to_string(), alice_list.id, alice_cats[0].id, "alice".to_string()))
            .await
            .unwrap();
        repos
            .items
            .create(&Item::new(0, "B".to_string(), bob_list.id, bob_cats[0].id, "bob".to_string()))
            .await
            .unwrap();

        let mine = repos.items.list_by_owner("alice").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].name, "A");
    }

    #[tokio::test]
    async fn test_unused_images_age_and_removal() {
        let repos = setup_test_db().await;
        repos.images.record_at("old", 1_000).await.unwrap();
        repos.images.record_at("new", 5_000).await.unwrap();
        // First record wins
        let again = repos.images.record_at("old", 9_000).await.unwrap();
        assert_eq!(again.created_at, 1_000);

        assert_eq!(repos.images.claim_older_than(2_000).await.unwrap(), names(&["old"]));
        // Already claimed
        assert!(repos.images.claim_older_than(2_000).await.unwrap().is_empty());

        assert_eq!(repos.images.remove(&names(&["old", "missing"])).await.unwrap(), 1);
        assert_eq!(repos.images.list().await.unwrap().len(), 1);

        assert!(matches!(repos.images.record(" ").await, Err(DomainError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_claimed_upload_cannot_be_attached() {
        let repos = setup_test_db().await;
        let (list, categories) = seed_list(&repos, "alice").await;
        repos.images.record_at("tent.jpg", 1_000).await.unwrap();
        assert_eq!(repos.images.claim_older_than(2_000).await.unwrap(), names(&["tent.jpg"]));

        let mut item = Item::new(0, "Tent".to_string(), list.id, categories[0].id, "alice".to_string());
        item.image = hosted_url("tent.jpg");
        assert!(matches!(repos.items.create(&item).await, Err(DomainError::Conflict(_))));
        assert!(repos.items.list().await.unwrap().is_empty());

        // Once the host gives up the upload is back in the queue and claimable
        repos.images.unclaim(&names(&["tent.jpg"])).await.unwrap();
        repos.items.create(&item).await.unwrap();
        assert!(repos.images.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_attached_upload_is_not_recorded() {
        let repos = setup_test_db().await;
        let (list, categories) = seed_list(&repos, "alice").await;
        let mut item = Item::new(0, "Tent".to_string(), list.id, categories[0].id, "alice".to_string());
        item.image = hosted_url("tent.jpg");
        repos.items.create(&item).await.unwrap();

        assert!(matches!(repos.images.record("tent.jpg").await, Err(DomainError::Conflict(_))));
        assert!(repos.images.claim_older_than(i64::MAX).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shared_image_released_with_last_item() {
        let repos = setup_test_db().await;
        let (list, categories) = seed_list(&repos, "alice").await;
        let mut item = Item::new(0, "Tent".to_string(), list.id, categories[0].id, "alice".to_string());
        item.image = hosted_url("shared.jpg");
        let first = repos.items.create(&item).await.unwrap();
        let second = repos.items.create(&item).await.unwrap();

        let (_, released) = repos.items.delete_returning(first.id).await.unwrap().unwrap();
        assert!(released.is_empty());
        assert!(repos.images.list().await.unwrap().is_empty());

        let (_, released) = repos.items.delete_returning(second.id).await.unwrap().unwrap();
        assert_eq!(released, names(&["shared.jpg"]));
        // Queued but claimed, so a sweep does not pick it up twice
        assert_eq!(repos.images.list().await.unwrap().len(), 1);
        assert!(repos.images.claim_older_than(i64::MAX).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_plain_delete_leaves_image_for_sweeper() {
        let repos = setup_test_db().await;
        let (list, categories) = seed_list(&repos, "alice").await;
        let mut item = Item::new(0, "Tent".to_string(), list.id, categories[0].id, "alice".to_string());
        item.image = hosted_url("tent.jpg");
        let created = repos.items.create(&item).await.unwrap();

        repos.items.delete(created.id).await.unwrap();
        assert_eq!(repos.images.claim_older_than(i64::MAX).await.unwrap(), names(&["tent.jpg"]));
    }

    #[tokio::test]
    async fn test_sessions_resolve_and_expire() {
        let repos = setup_test_db().await;
        let user = UserIdentity::new("discord:1", "alice");

        let token = repos.sessions.create(&user).await.unwrap();
        assert_eq!(repos.sessions.resolve(&token).await.unwrap(), Some(user.clone()));
        assert_eq!(repos.sessions.resolve("bogus").await.unwrap(), None);

        let short_lived = SessionRepository::new(repos.conn.clone(), 0);
        let expired = short_lived.create(&user).await.unwrap();
        assert_eq!(repos.sessions.resolve(&expired).await.unwrap(), None);
        assert_eq!(repos.sessions.purge_expired().await.unwrap(), 1);

        repos.sessions.revoke(&token).await.unwrap();
        assert_eq!(repos.sessions.resolve(&token).await.unwrap(), None);
    }
}
