#![allow(clippy::expect_used, clippy::panic)]
//! Integration tests for fail-point injection.
//!
//! These tests require the `failpoints` feature:
//! ```bash
//! cargo test -p oauth-channel-storage --features failpoints --test failpoint_tests
//! ```
#![cfg(feature = "failpoints")]

use oauth_channel_storage::{
    ChannelStore, MemoryChannelStore, StorageError,
    testutil::{populated_store, sample_channel},
};

#[tokio::test]
async fn find_failpoint_returns_internal_error() {
    let scenario = fail::FailScenario::setup();
    let store = populated_store(&[sample_channel("fp", "2222222222222222")]).await;
    fail::cfg("channel-store-find", "return").expect("failed to configure fail point");

    let result = store.find_one("2222222222222222").await;

    assert!(
        matches!(result, Err(StorageError::Internal { .. })),
        "find should fail when fail point is active, got: {result:?}"
    );

    scenario.teardown();
}

#[tokio::test]
async fn insert_failpoint_leaves_store_empty() {
    let scenario = fail::FailScenario::setup();
    fail::cfg("channel-store-insert", "return").expect("failed to configure fail point");

    let store = MemoryChannelStore::new();
    let result = store.insert_one(&sample_channel("fp", "3333333333333333")).await;

    assert!(result.is_err(), "insert should fail when fail point is active");
    assert!(store.is_empty());

    scenario.teardown();
}

#[tokio::test]
async fn find_without_failpoint_succeeds() {
    let scenario = fail::FailScenario::setup();
    // No fail point configured, so the lookup succeeds

    let store = populated_store(&[sample_channel("fp", "4444444444444444")]).await;
    let result = store.find_one("4444444444444444").await;

    assert!(result.is_ok(), "find should succeed without fail point");

    scenario.teardown();
}
