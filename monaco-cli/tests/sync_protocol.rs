mod common;

use common::{FakeFamily, client_for};
use monaco_cli::{Api, DynatraceClient};
use wiremock::MockServer;

const PROFILES: &str = "/api/config/v1/alertingProfiles";

fn profiles() -> Api {
    Api::new("alerting-profile", PROFILES)
}

async fn environment() -> (MockServer, FakeFamily) {
    let server = MockServer::start().await;
    let family = FakeFamily::default();
    family.mount(&server, PROFILES).await;
    (server, family)
}

#[tokio::test]
async fn absent_name_is_negative_lookup() {
    let (server, family) = environment().await;
    family.insert("Other", r#"{"name":"Other"}"#);
    let client = client_for(&server);

    let (exists, id) = client.exists_by_name(&profiles(), "Team A").await.unwrap();
    assert!(!exists);
    assert_eq!(id, "");

    let err = client.read_by_name(&profiles(), "Team A").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn upsert_of_absent_name_is_visible_by_name() {
    let (server, _family) = environment().await;
    let client = client_for(&server);

    let entity = client
        .upsert_by_name(&profiles(), "Team A", r#"{"name":"Team A","rules":[]}"#)
        .await
        .unwrap();

    let (exists, id) = client.exists_by_name(&profiles(), "Team A").await.unwrap();
    assert!(exists);
    assert_eq!(id, entity.id);
    assert_eq!(entity.name, "Team A");
}

#[tokio::test]
async fn repeated_upsert_updates_in_place() {
    let (server, family) = environment().await;
    let client = client_for(&server);
    let body_a = r#"{"name":"Team A","severity":"ERROR"}"#;
    let body_b = r#"{"name":"Team A","severity":"WARNING"}"#;

    let first = client.upsert_by_name(&profiles(), "Team A", body_a).await.unwrap();
    let second = client.upsert_by_name(&profiles(), "Team A", body_b).await.unwrap();

    assert_eq!(first.id, second.id);

    let objects = family.objects();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].name, "Team A");
    assert_eq!(objects[0].body, body_b);

    let read = client.read_by_name(&profiles(), "Team A").await.unwrap();
    assert_eq!(read, body_b.as_bytes());
}

#[tokio::test]
async fn delete_after_upsert_leaves_name_absent() {
    let (server, family) = environment().await;
    let client = client_for(&server);

    client
        .upsert_by_name(&profiles(), "Team A", r#"{"name":"Team A"}"#)
        .await
        .unwrap();
    client.delete_by_name(&profiles(), "Team A").await.unwrap();

    let (exists, _) = client.exists_by_name(&profiles(), "Team A").await.unwrap();
    assert!(!exists);
    assert!(family.objects().is_empty());

    // Deleting again is a no-op
    client.delete_by_name(&profiles(), "Team A").await.unwrap();
}

#[tokio::test]
async fn names_differing_in_case_or_whitespace_are_distinct() {
    let (server, family) = environment().await;
    let client = client_for(&server);

    client
        .upsert_by_name(&profiles(), "Foo", r#"{"name":"Foo"}"#)
        .await
        .unwrap();
    client
        .upsert_by_name(&profiles(), "foo", r#"{"name":"foo"}"#)
        .await
        .unwrap();
    client
        .upsert_by_name(&profiles(), "Foo ", r#"{"name":"Foo "}"#)
        .await
        .unwrap();

    let mut names: Vec<String> = family.objects().into_iter().map(|o| o.name).collect();
    names.sort();
    assert_eq!(names, vec!["Foo", "Foo ", "foo"]);
}

#[tokio::test]
async fn operations_on_other_names_leave_object_untouched() {
    let (server, family) = environment().await;
    let keep_id = family.insert("Keep", r#"{"name":"Keep"}"#);
    let client = client_for(&server);

    client
        .upsert_by_name(&profiles(), "New", r#"{"name":"New"}"#)
        .await
        .unwrap();
    client.delete_by_name(&profiles(), "New").await.unwrap();

    let objects = family.objects();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].id, keep_id);
    assert_eq!(objects[0].body, r#"{"name":"Keep"}"#);
}
