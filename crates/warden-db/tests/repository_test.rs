//! Integration tests for the resource server and client repositories
//! using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;
use warden_core::error::WardenError;
use warden_core::models::client::CreateClient;
use warden_core::models::owner::Owner;
use warden_core::models::resource_server::{NewResourceServer, ResourceServer};
use warden_core::repository::{
    ClientRepository, ResourceServerRepository, Transaction, TransactionManager,
};
use warden_db::SurrealTransactionManager;
use warden_db::repository::{SurrealClientRepository, SurrealResourceServerRepository};

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    warden_db::run_migrations(&db).await.unwrap();
    db
}

fn owner(name: &str) -> Owner {
    Owner::new(name).unwrap()
}

fn new_server(owner: &Owner, name: &str, scopes: &[&str]) -> NewResourceServer {
    NewResourceServer {
        key: format!("key-{}", Uuid::new_v4().simple()),
        secret: format!("secret-{}", Uuid::new_v4().simple()),
        owner: owner.clone(),
        name: name.into(),
        description: Some(format!("{name} API")),
        contact_name: None,
        contact_email: Some("ops@example.com".into()),
        thumbnail_url: None,
        scopes: scopes.iter().map(|s| s.to_string()).collect(),
    }
}

async fn create_server(db: &Surreal<Db>, input: NewResourceServer) -> ResourceServer {
    let tm = SurrealTransactionManager::new(db.clone());
    let mut tx = tm.begin().await.unwrap();
    let server = tx.create_resource_server(input).await.unwrap();
    tx.commit().await.unwrap();
    server
}

// ---------------------------------------------------------------------------
// Resource server tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn created_server_round_trips_through_lookup() {
    let db = setup().await;
    let repo = SurrealResourceServerRepository::new(db.clone());
    let alice = owner("alice");

    let created = create_server(&db, new_server(&alice, "photos", &["read", "write"])).await;
    assert_eq!(created.version, 1);

    let fetched = repo
        .find_by_id_and_owner(created.id, &alice)
        .await
        .unwrap()
        .expect("server should exist");

    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.key, created.key);
    assert_eq!(fetched.secret, created.secret);
    assert_eq!(fetched.owner, alice);
    assert_eq!(fetched.name, "photos");
    assert_eq!(fetched.description.as_deref(), Some("photos API"));
    assert_eq!(fetched.contact_name, None);
    assert_eq!(fetched.contact_email.as_deref(), Some("ops@example.com"));
    assert_eq!(fetched.scopes, vec!["read", "write"]);
    assert_eq!(fetched.version, 1);
}

#[tokio::test]
async fn lookup_by_other_owner_finds_nothing() {
    let db = setup().await;
    let repo = SurrealResourceServerRepository::new(db.clone());
    let alice = owner("alice");

    let created = create_server(&db, new_server(&alice, "photos", &["read"])).await;

    let other = repo
        .find_by_id_and_owner(created.id, &owner("mallory"))
        .await
        .unwrap();
    assert!(other.is_none());

    let missing = repo
        .find_by_id_and_owner(Uuid::new_v4(), &alice)
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn find_by_owner_filters_and_orders() {
    let db = setup().await;
    let repo = SurrealResourceServerRepository::new(db.clone());
    let alice = owner("alice");
    let bob = owner("bob");

    let first = create_server(&db, new_server(&alice, "first", &[])).await;
    create_server(&db, new_server(&bob, "bobs", &[])).await;
    let second = create_server(&db, new_server(&alice, "second", &[])).await;

    let servers = repo.find_by_owner(&alice).await.unwrap();
    let ids: Vec<Uuid> = servers.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);

    let nobody = repo.find_by_owner(&owner("carol")).await.unwrap();
    assert!(nobody.is_empty());
}

#[tokio::test]
async fn count_spans_all_owners() {
    let db = setup().await;
    let repo = SurrealResourceServerRepository::new(db.clone());

    assert_eq!(repo.count().await.unwrap(), 0);

    create_server(&db, new_server(&owner("alice"), "a", &[])).await;
    create_server(&db, new_server(&owner("bob"), "b", &[])).await;

    assert_eq!(repo.count().await.unwrap(), 2);
}

#[tokio::test]
async fn duplicate_key_is_a_conflict() {
    let db = setup().await;
    let alice = owner("alice");

    let mut input = new_server(&alice, "one", &[]);
    input.key = "fixed-key".into();
    create_server(&db, input).await;

    let mut clash = new_server(&alice, "two", &[]);
    clash.key = "fixed-key".into();

    let tm = SurrealTransactionManager::new(db.clone());
    let mut tx = tm.begin().await.unwrap();
    tx.create_resource_server(clash).await.unwrap();
    let err = tx.commit().await.unwrap_err();
    assert!(matches!(err, WardenError::Conflict(_)), "got {err:?}");

    let repo = SurrealResourceServerRepository::new(db);
    assert_eq!(repo.count().await.unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Client tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_and_list_clients() {
    let db = setup().await;
    let clients = SurrealClientRepository::new(db.clone());
    let server = create_server(&db, new_server(&owner("alice"), "photos", &["a", "b"])).await;
    let unrelated = create_server(&db, new_server(&owner("alice"), "other", &["a"])).await;

    let web = clients
        .create(CreateClient {
            resource_server_id: server.id,
            client_id: "web".into(),
            name: "Web".into(),
            scopes: vec!["a".into(), "b".into()],
        })
        .await
        .unwrap();
    clients
        .create(CreateClient {
            resource_server_id: unrelated.id,
            client_id: "cli".into(),
            name: "CLI".into(),
            scopes: vec!["a".into()],
        })
        .await
        .unwrap();

    assert_eq!(web.resource_server_id, server.id);
    assert_eq!(web.scopes, vec!["a", "b"]);

    let listed = clients.list_by_resource_server(server.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, web.id);

    let fetched = clients.get_by_id(web.id).await.unwrap();
    assert_eq!(fetched.client_id, "web");
}

#[tokio::test]
async fn missing_client_is_not_found() {
    let db = setup().await;
    let clients = SurrealClientRepository::new(db);

    let err = clients.get_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, WardenError::NotFound { .. }));
}

#[tokio::test]
async fn duplicate_client_id_is_a_conflict() {
    let db = setup().await;
    let clients = SurrealClientRepository::new(db.clone());
    let server = create_server(&db, new_server(&owner("alice"), "photos", &["a"])).await;

    let input = CreateClient {
        resource_server_id: server.id,
        client_id: "web".into(),
        name: "Web".into(),
        scopes: vec!["a".into()],
    };
    clients.create(input.clone()).await.unwrap();

    let err = clients.create(input).await.unwrap_err();
    assert!(matches!(err, WardenError::Conflict(_)), "got {err:?}");
}
