//! Typed client against a live in-process server backed by an on-disk database.

use packlist_client::commands::{self, ItemArgs, ItemQuery};
use packlist_client::models::CategoryChanges;
use packlist_client::RpcClient;
use packlist_lib::config::AppConfig;
use packlist_lib::domain::{hosted_url, UserIdentity};
use packlist_lib::files::FakeFileHost;
use packlist_lib::repository::init_db;
use packlist_lib::{serve, AppState};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;

struct Harness {
    _dir: TempDir,
    base: String,
    state: Arc<AppState>,
}

impl Harness {
    async fn start() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = init_db(&dir.path().join("packlist.db")).await.expect("db init");
        let config = AppConfig {
            cleanup_interval_secs: 0,
            cleanup_grace_secs: 0,
            ..AppConfig::default()
        };
        let state = Arc::new(AppState::new(db, Arc::new(FakeFileHost::default()), config));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let base = format!("http://{}", listener.local_addr().expect("addr"));
        tokio::spawn(serve(listener, state.clone(), std::future::pending()));

        Self { _dir: dir, base, state }
    }

    async fn client_for(&self, user: &str) -> RpcClient {
        let token = self
            .state
            .sessions
            .create(&UserIdentity::new(user, user))
            .await
            .expect("session");
        RpcClient::new(&self.base).with_token(token)
    }
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn pack_a_list_end_to_end() {
    let harness = Harness::start().await;
    let client = harness.client_for("alice").await;

    let list = commands::create_list(&client, "Weekend", &names(&["Clothes", "Food"]))
        .await
        .unwrap();
    let detail = commands::get_list(&client, list.id, false, true).await.unwrap();
    let categories = detail.categories.unwrap();
    let clothes = categories.iter().find(|c| c.name == "Clothes").unwrap().id;
    let food = categories.iter().find(|c| c.name == "Food").unwrap().id;

    let mut jacket = ItemArgs::new("Jacket", list.id, clothes);
    jacket.bag = 2;
    let jacket = commands::add_item(&client, &jacket, &hosted_url("jacket.png")).await.unwrap();
    let apples = commands::add_item(&client, &ItemArgs::new("Apples", list.id, food), &hosted_url("apples.png"))
        .await
        .unwrap();

    assert!(commands::toggle_packed(&client, jacket.id).await.unwrap().packed);
    let packed = commands::filter_items(&client, list.id, &ItemQuery { packed: Some(true), ..ItemQuery::default() })
        .await
        .unwrap();
    assert_eq!(packed.iter().map(|i| i.id).collect::<Vec<_>>(), vec![jacket.id]);

    let mut edit = ItemArgs::new("Green apples", list.id, food);
    edit.quantity = 6;
    let apples = commands::update_item(&client, apples.id, &edit).await.unwrap();
    assert_eq!(apples.quantity, 6);

    assert_eq!(commands::unpack_all(&client, list.id).await.unwrap(), 1);
    assert_eq!(commands::get_items(&client).await.unwrap().len(), 2);

    let with_items = commands::get_list(&client, list.id, true, false).await.unwrap();
    assert_eq!(with_items.items.unwrap().len(), 2);
    assert!(with_items.categories.is_none());
}

#[tokio::test]
async fn editing_categories_reports_conflicts() {
    let harness = Harness::start().await;
    let client = harness.client_for("alice").await;

    let list = commands::create_list(&client, "Trip", &names(&["Clothes", "Food", "Tools"]))
        .await
        .unwrap();
    let current = commands::get_list(&client, list.id, false, true)
        .await
        .unwrap()
        .categories
        .unwrap();
    let food = current.iter().find(|c| c.name == "Food").unwrap().id;
    commands::add_item(&client, &ItemArgs::new("Bread", list.id, food), &hosted_url("bread.png"))
        .await
        .unwrap();

    // Dropping Food is refused while Bread uses it
    let changes = CategoryChanges::between(&current, &names(&["Clothes", "Snacks"]));
    let err = commands::update_list(&client, list.id, "Trip", &changes).await.unwrap_err();
    assert_eq!(err.code, "CONFLICT");
    assert!(err.message.contains("Food"));
    assert!(!err.message.contains("Tools"));

    let changes = CategoryChanges::between(&current, &names(&["Clothes", "Food", "Snacks"]));
    let detail = commands::update_list(&client, list.id, "Road trip", &changes).await.unwrap();
    assert_eq!(detail.list.name, "Road trip");
    let after: Vec<String> = detail.categories.unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(after, names(&["Clothes", "Food", "Snacks"]));
}

#[tokio::test]
async fn lists_are_private() {
    let harness = Harness::start().await;
    let alice = harness.client_for("alice").await;
    let bob = harness.client_for("bob").await;

    let list = commands::create_list(&alice, "Secret", &names(&["Misc"])).await.unwrap();
    assert!(commands::get_lists(&bob).await.unwrap().is_empty());

    let err = commands::delete_list(&bob, list.id).await.unwrap_err();
    assert_eq!(err.code, "FORBIDDEN");

    let anonymous = RpcClient::new(&harness.base);
    let err = commands::get_lists(&anonymous).await.unwrap_err();
    assert_eq!(err.code, "UNAUTHORIZED");
}

#[tokio::test]
async fn uploads_and_cleanup() {
    let harness = Harness::start().await;
    let client = harness.client_for("alice").await;
    let list = commands::create_list(&client, "Photos", &names(&["Gear"])).await.unwrap();
    let gear = commands::get_list(&client, list.id, false, true)
        .await
        .unwrap()
        .categories
        .unwrap()[0]
        .id;

    commands::record_upload_key(&client, "kept.png").await.unwrap();
    let orphan = commands::record_upload_url(&client, &hosted_url("orphan.png")).await.unwrap();
    assert_eq!(orphan.id, "orphan.png");

    let camera = commands::add_item(&client, &ItemArgs::new("Camera", list.id, gear), &hosted_url("kept.png"))
        .await
        .unwrap();
    assert_eq!(camera.image, hosted_url("kept.png"));

    let report = commands::run_cleanup(&client).await.unwrap();
    assert!(report.success);
    assert_eq!(report.deleted, names(&["orphan.png"]));

    let deleted = commands::delete_list(&client, list.id).await.unwrap();
    assert_eq!(deleted.id, list.id);
    let err = commands::get_list(&client, list.id, false, false).await.unwrap_err();
    assert_eq!(err.code, "NOT_FOUND");
}
