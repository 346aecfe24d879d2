//! End-to-end tests of the index operations facade over the in-memory
//! backend

mod common;

use bson::doc;
use common::mem_index_ops;
use docstore_core::Error;
use docstore_storage::{Direction, Index, IndexOptions};
use futures::FutureExt;
use pretty_assertions::assert_eq;
use std::time::Duration;

#[tokio::test]
async fn create_index_registers_a_default_named_index() {
    common::init_tracing();
    let (_client, ops) = mem_index_ops("users");

    ops.create_index(&Index::on("user_id", Direction::Ascending))
        .await
        .unwrap();

    let infos = ops.index_info().await.unwrap();
    let names: Vec<&str> = infos.iter().map(|info| info.name.as_str()).collect();
    assert_eq!(names, vec!["_id_", "user_id_1"]);
    assert_eq!(infos[1].key, doc! { "user_id": 1 });
}

#[tokio::test]
async fn create_index_with_options_carries_them_to_the_listing() {
    let (_client, ops) = mem_index_ops("sessions");

    let index = Index::on("session_key", Direction::Ascending)
        .named("session_ttl")
        .unique()
        .sparse()
        .expire_after(Duration::from_secs(3600));
    ops.create_index(&index).await.unwrap();

    let infos = ops.index_info().await.unwrap();
    let info = infos
        .iter()
        .find(|info| info.name == "session_ttl")
        .unwrap();

    assert_eq!(info.key, doc! { "session_key": 1 });
    assert!(info.unique);
    assert!(info.sparse);
    assert_eq!(info.expire_after_seconds, Some(3600));
}

#[tokio::test]
async fn compound_keys_survive_in_definition_order() {
    let (_client, ops) = mem_index_ops("events");

    let index = Index::on("tenant", Direction::Ascending).and("created_at", Direction::Descending);
    ops.create_index(&index).await.unwrap();

    let infos = ops.index_info().await.unwrap();
    assert_eq!(infos[1].name, "tenant_1_created_at_-1");
    let fields: Vec<&str> = infos[1].key.keys().map(String::as_str).collect();
    assert_eq!(fields, vec!["tenant", "created_at"]);
}

#[tokio::test]
async fn index_info_on_an_absent_collection_is_empty() {
    let (_client, ops) = mem_index_ops("never_written");

    let infos = ops.index_info().await.unwrap();
    assert!(infos.is_empty());
}

#[tokio::test]
async fn drop_all_indexes_retains_the_primary_index() {
    let (_client, ops) = mem_index_ops("users");

    ops.create_index(&Index::on("email", Direction::Ascending))
        .await
        .unwrap();
    ops.create_index(&Index::on("phone", Direction::Ascending))
        .await
        .unwrap();

    ops.drop_all_indexes().await.unwrap();

    let infos = ops.index_info().await.unwrap();
    let names: Vec<&str> = infos.iter().map(|info| info.name.as_str()).collect();
    assert_eq!(names, vec!["_id_"]);
}

#[tokio::test]
async fn dropping_an_unknown_index_surfaces_the_server_code() {
    let (_client, ops) = mem_index_ops("users");

    ops.create_index(&Index::on("email", Direction::Ascending))
        .await
        .unwrap();

    let err = ops.drop_index("no_such_index").await.unwrap_err();
    match err {
        Error::OperationFailed { code, .. } => assert_eq!(code, Some(27)),
        other => panic!("expected OperationFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn dropping_the_primary_index_is_invalid_api_usage() {
    let (_client, ops) = mem_index_ops("users");

    ops.create_index(&Index::on("email", Direction::Ascending))
        .await
        .unwrap();

    let err = ops.drop_index("_id_").await.unwrap_err();
    assert!(matches!(err, Error::InvalidApiUsage(_)));
}

#[tokio::test]
async fn recreating_an_identical_index_is_idempotent() {
    let (_client, ops) = mem_index_ops("users");
    let index = Index::on("email", Direction::Ascending);

    ops.create_index(&index).await.unwrap();
    ops.create_index(&index).await.unwrap();

    assert_eq!(ops.index_info().await.unwrap().len(), 2);
}

#[tokio::test]
async fn conflicting_definitions_translate_to_operation_failures() {
    let (_client, ops) = mem_index_ops("users");

    ops.create_index(&Index::on("email", Direction::Ascending).named("lookup"))
        .await
        .unwrap();

    // Same name, different keys
    let err = ops
        .create_index(&Index::on("phone", Direction::Ascending).named("lookup"))
        .await
        .unwrap_err();
    match err {
        Error::OperationFailed { code, .. } => assert_eq!(code, Some(86)),
        other => panic!("expected OperationFailed, got {other:?}"),
    }

    // Same keys, different name
    let err = ops
        .create_index(&Index::on("email", Direction::Ascending).named("lookup2"))
        .await
        .unwrap_err();
    match err {
        Error::OperationFailed { code, .. } => assert_eq!(code, Some(85)),
        other => panic!("expected OperationFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn an_empty_options_container_still_creates_the_index() {
    let (_client, ops) = mem_index_ops("users");

    let index =
        Index::on("email", Direction::Ascending).with_options(IndexOptions::default());
    ops.create_index(&index).await.unwrap();

    let infos = ops.index_info().await.unwrap();
    assert!(infos.iter().any(|info| info.name == "email_1"));
}

#[tokio::test]
async fn listing_releases_its_cursor() {
    let (client, ops) = mem_index_ops("users");

    ops.create_index(&Index::on("email", Direction::Ascending))
        .await
        .unwrap();

    ops.index_info().await.unwrap();
    assert_eq!(client.open_cursors(), 0);
}

#[tokio::test]
async fn execute_gives_direct_collection_access() {
    let (_client, ops) = mem_index_ops("users");

    ops.create_index(&Index::on("email", Direction::Ascending))
        .await
        .unwrap();

    // Count raw index documents without going through IndexInfo
    let count = ops
        .execute(|collection| {
            async move {
                let mut cursor = collection.list_indexes().await?;
                let mut count = 0;
                while cursor.advance().await?.is_some() {
                    count += 1;
                }
                Ok(count)
            }
            .boxed()
        })
        .await
        .unwrap();

    assert_eq!(count, 2);
}

#[tokio::test]
async fn facades_share_a_provider_without_interfering() {
    let client = docstore_storage::MemClient::new("testdb");
    let provider = std::sync::Arc::new(client.clone());

    let users = docstore_storage::IndexOperations::new(provider.clone(), "users").unwrap();
    let orders = docstore_storage::IndexOperations::new(provider, "orders").unwrap();

    users
        .create_index(&Index::on("email", Direction::Ascending))
        .await
        .unwrap();
    orders
        .create_index(&Index::on("placed_at", Direction::Descending))
        .await
        .unwrap();

    assert_eq!(users.index_info().await.unwrap().len(), 2);
    assert_eq!(orders.index_info().await.unwrap().len(), 2);
}
