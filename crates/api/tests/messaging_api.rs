//! Integration tests for conversations and messages over HTTP.
//!
//! Covers opening threads against approved listings, the participant
//! boundary, read-state, unread counts, and inbox hiding.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    expect_status, get_auth, post_auth, post_empty_auth, request, seed_user, token_for,
};
use serde_json::{json, Value};
use sqlx::PgPool;

fn product_body(title: &str) -> Value {
    json!({
        "title": title,
        "attributes": {
            "kind": "product",
            "category": "ceramics",
            "price_cents": 2800
        }
    })
}

/// Submit and approve a listing for `owner_token`, returning its id.
async fn approved_listing(app: &axum::Router, owner_token: &str, moderator_token: &str) -> i64 {
    let created = expect_status(
        post_auth(app, "/api/v1/listings", owner_token, product_body("Mug")).await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["id"].as_i64().unwrap();
    expect_status(
        post_empty_auth(
            app,
            &format!("/api/v1/moderation/listings/{id}/approve"),
            moderator_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    id
}

// ---------------------------------------------------------------------------
// Opening conversations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn opening_requires_an_approved_listing(pool: PgPool) {
    let seller = seed_user(&pool, "seller@example.com", "inserzionista").await;
    let buyer = seed_user(&pool, "buyer@example.com", "viewer").await;
    let app = common::build_test_app(pool);
    let seller_token = token_for(seller);
    let buyer_token = token_for(buyer);

    let created = expect_status(
        post_auth(&app, "/api/v1/listings", &seller_token, product_body("Mug")).await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    // Still pending: no contact.
    let response = post_auth(
        &app,
        "/api/v1/conversations",
        &buyer_token,
        json!({"listing_id": id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../migrations")]
async fn owner_cannot_contact_their_own_listing(pool: PgPool) {
    let seller = seed_user(&pool, "seller@example.com", "inserzionista").await;
    let moderator = seed_user(&pool, "mod@example.com", "editor").await;
    let app = common::build_test_app(pool);
    let seller_token = token_for(seller);
    let listing = approved_listing(&app, &seller_token, &token_for(moderator)).await;

    let response = post_auth(
        &app,
        "/api/v1/conversations",
        &seller_token,
        json!({"listing_id": listing}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../migrations")]
async fn reopening_returns_the_same_thread(pool: PgPool) {
    let seller = seed_user(&pool, "seller@example.com", "inserzionista").await;
    let buyer = seed_user(&pool, "buyer@example.com", "viewer").await;
    let moderator = seed_user(&pool, "mod@example.com", "editor").await;
    let app = common::build_test_app(pool);
    let buyer_token = token_for(buyer);
    let listing = approved_listing(&app, &token_for(seller), &token_for(moderator)).await;

    let first = expect_status(
        post_auth(&app, "/api/v1/conversations", &buyer_token, json!({"listing_id": listing})).await,
        StatusCode::CREATED,
    )
    .await;
    let second = expect_status(
        post_auth(&app, "/api/v1/conversations", &buyer_token, json!({"listing_id": listing})).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(first["id"], second["id"]);
}

// ---------------------------------------------------------------------------
// Messaging flow
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn full_messaging_flow(pool: PgPool) {
    let seller = seed_user(&pool, "seller@example.com", "inserzionista").await;
    let buyer = seed_user(&pool, "buyer@example.com", "viewer").await;
    let moderator = seed_user(&pool, "mod@example.com", "editor").await;
    let outsider = seed_user(&pool, "nosy@example.com", "viewer").await;
    let app = common::build_test_app(pool);
    let seller_token = token_for(seller);
    let buyer_token = token_for(buyer);
    let listing = approved_listing(&app, &seller_token, &token_for(moderator)).await;

    // Buyer opens the thread and writes.
    let conversation = expect_status(
        post_auth(&app, "/api/v1/conversations", &buyer_token, json!({"listing_id": listing})).await,
        StatusCode::CREATED,
    )
    .await;
    let cid = conversation["id"].as_i64().unwrap();

    let sent = expect_status(
        post_auth(
            &app,
            &format!("/api/v1/conversations/{cid}/messages"),
            &buyer_token,
            json!({"body": "Is the mug still available?"}),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(sent["body"], "Is the mug still available?");
    assert_eq!(sent["is_read"], false);

    // The seller sees it in history and in the unread count.
    let history = expect_status(
        get_auth(&app, &format!("/api/v1/conversations/{cid}/messages"), &seller_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(history.as_array().unwrap().len(), 1);

    let unread = expect_status(
        get_auth(&app, "/api/v1/conversations/unread-count", &seller_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(unread["data"]["count"], 1);

    // An outsider cannot read or write.
    let response = get_auth(
        &app,
        &format!("/api/v1/conversations/{cid}/messages"),
        &token_for(outsider),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Seller marks the thread read.
    let marked = expect_status(
        post_empty_auth(&app, &format!("/api/v1/conversations/{cid}/read"), &seller_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(marked["data"]["marked_read"], 1);

    let unread = expect_status(
        get_auth(&app, "/api/v1/conversations/unread-count", &seller_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(unread["data"]["count"], 0);

    // The inbox carries the listing title and preview.
    let inbox = expect_status(
        get_auth(&app, "/api/v1/conversations", &seller_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(inbox[0]["listing_title"], "Mug");
    assert_eq!(inbox[0]["last_message_body"], "Is the mug still available?");
}

#[sqlx::test(migrations = "../../migrations")]
async fn blank_message_bodies_are_rejected(pool: PgPool) {
    let seller = seed_user(&pool, "seller@example.com", "inserzionista").await;
    let buyer = seed_user(&pool, "buyer@example.com", "viewer").await;
    let moderator = seed_user(&pool, "mod@example.com", "editor").await;
    let app = common::build_test_app(pool);
    let buyer_token = token_for(buyer);
    let listing = approved_listing(&app, &token_for(seller), &token_for(moderator)).await;

    let conversation = expect_status(
        post_auth(&app, "/api/v1/conversations", &buyer_token, json!({"listing_id": listing})).await,
        StatusCode::CREATED,
    )
    .await;
    let cid = conversation["id"].as_i64().unwrap();

    let response = post_auth(
        &app,
        &format!("/api/v1/conversations/{cid}/messages"),
        &buyer_token,
        json!({"body": "   \n  "}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../migrations")]
async fn hide_removes_the_thread_from_one_inbox_only(pool: PgPool) {
    let seller = seed_user(&pool, "seller@example.com", "inserzionista").await;
    let buyer = seed_user(&pool, "buyer@example.com", "viewer").await;
    let moderator = seed_user(&pool, "mod@example.com", "editor").await;
    let app = common::build_test_app(pool);
    let seller_token = token_for(seller);
    let buyer_token = token_for(buyer);
    let listing = approved_listing(&app, &seller_token, &token_for(moderator)).await;

    let conversation = expect_status(
        post_auth(&app, "/api/v1/conversations", &buyer_token, json!({"listing_id": listing})).await,
        StatusCode::CREATED,
    )
    .await;
    let cid = conversation["id"].as_i64().unwrap();
    post_auth(
        &app,
        &format!("/api/v1/conversations/{cid}/messages"),
        &buyer_token,
        json!({"body": "hello"}),
    )
    .await;

    let response = request(
        &app,
        Method::POST,
        &format!("/api/v1/conversations/{cid}/hide"),
        Some(&seller_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let seller_inbox = expect_status(
        get_auth(&app, "/api/v1/conversations", &seller_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(seller_inbox.as_array().unwrap().len(), 0);

    let buyer_inbox = expect_status(
        get_auth(&app, "/api/v1/conversations", &buyer_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(buyer_inbox.as_array().unwrap().len(), 1);
}
