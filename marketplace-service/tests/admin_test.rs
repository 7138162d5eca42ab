//! Admin seller-moderation and dashboard integration tests.

mod common;

use common::TestApp;
use serde_json::{json, Value};
use uuid::Uuid;

async fn verify_seller(
    app: &TestApp,
    user_id: Uuid,
    status: &str,
    reason: Option<&str>,
) -> reqwest::Response {
    let mut body = json!({ "userId": user_id, "status": status });
    if let Some(reason) = reason {
        body["rejectionReason"] = json!(reason);
    }

    app.client
        .post(format!("{}/admin/verify-seller", app.address))
        .bearer_auth(app.admin_token())
        .json(&body)
        .send()
        .await
        .expect("Failed to execute verify-seller request")
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn pending_sellers_carry_document_counts() {
    let app = TestApp::spawn().await;
    let user_id = app.register_seller("admin-counts@example.com").await;
    app.upload_document(user_id, "pan").await;
    app.upload_document(user_id, "gst").await;

    let response = app
        .client
        .get(format!("{}/admin/pending-sellers", app.address))
        .bearer_auth(app.admin_token())
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 200);

    let sellers: Vec<Value> = response.json().await.expect("Failed to parse response");
    let entry = sellers
        .iter()
        .find(|s| s["id"] == user_id.to_string())
        .expect("registered seller must be pending");
    assert_eq!(entry["pending_docs"], 2);
    assert_eq!(entry["approved_docs"], 0);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn directly_verifying_a_seller() {
    let app = TestApp::spawn().await;
    let user_id = app.register_seller("admin-verify@example.com").await;

    let response = verify_seller(&app, user_id, "verified", None).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Seller verified");

    assert_eq!(app.user_status(user_id).await, "verified");
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn rejecting_a_seller_cascades_over_pending_documents_only() {
    let app = TestApp::spawn().await;
    let user_id = app.register_seller("admin-cascade@example.com").await;

    let approved = app.upload_document(user_id, "pan").await;
    app.upload_document(user_id, "gst").await;
    app.upload_document(user_id, "aadhaar").await;

    // Approve one document before the seller-level rejection
    let response = app
        .client
        .post(format!("{}/kyc/verify", app.address))
        .bearer_auth(app.admin_token())
        .json(&json!({ "documentId": approved, "status": "approved" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 200);

    let response = verify_seller(&app, user_id, "rejected", Some("Incomplete records")).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Seller rejected");

    assert_eq!(app.user_status(user_id).await, "rejected");

    let response = app
        .client
        .get(format!("{}/kyc/user/{}", app.address, user_id))
        .send()
        .await
        .expect("Failed to execute request");
    let docs: Vec<Value> = response.json().await.expect("Failed to parse response");
    assert_eq!(docs.len(), 3);

    for doc in &docs {
        if doc["id"] == approved.to_string() {
            assert_eq!(doc["status"], "approved");
            assert!(doc["rejection_reason"].is_null());
        } else {
            assert_eq!(doc["status"], "rejected");
            assert_eq!(doc["rejection_reason"], "Incomplete records");
        }
    }
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn verifying_unknown_seller_is_not_found() {
    let app = TestApp::spawn().await;

    let response = verify_seller(&app, Uuid::new_v4(), "verified", None).await;
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn seller_listing_filters_by_status() {
    let app = TestApp::spawn().await;
    let verified = app.register_seller("admin-list-v@example.com").await;
    app.register_seller("admin-list-p@example.com").await;

    let response = verify_seller(&app, verified, "verified", None).await;
    assert_eq!(response.status(), 200);

    let response = app
        .client
        .get(format!("{}/admin/sellers?status=verified", app.address))
        .bearer_auth(app.admin_token())
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 200);

    let sellers: Vec<Value> = response.json().await.expect("Failed to parse response");
    assert!(sellers.iter().any(|s| s["id"] == verified.to_string()));
    assert!(sellers.iter().all(|s| s["status"] == "verified"));
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn dashboard_counts_exclude_cancelled_revenue() {
    let app = TestApp::spawn().await;
    let buyer = app.register_seller("admin-dash@example.com").await;
    let category = app.create_category("Grains").await;
    let rice = app.create_product(category, "Rice", 100.0, 10, 0.0).await;

    // One kept order, one cancelled
    for _ in 0..2 {
        let response = app
            .client
            .post(format!("{}/orders", app.address))
            .json(&json!({
                "userId": buyer,
                "items": [{ "productId": rice, "quantity": 1 }]
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), 201);
    }

    let response = app
        .client
        .get(format!("{}/orders?userId={}", app.address, buyer))
        .send()
        .await
        .expect("Failed to execute request");
    let orders: Vec<Value> = response.json().await.expect("Failed to parse response");
    let cancelled: Uuid = orders[0]["id"].as_str().unwrap().parse().unwrap();

    let response = app
        .client
        .put(format!("{}/orders/{}/status", app.address, cancelled))
        .bearer_auth(app.admin_token())
        .json(&json!({ "status": "cancelled" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 200);

    let response = app
        .client
        .get(format!("{}/admin/dashboard", app.address))
        .bearer_auth(app.admin_token())
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 200);

    let stats: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(stats["totalSellers"], 1);
    assert_eq!(stats["totalOrders"], 2);
    assert_eq!(stats["pendingOrders"], 1);
    assert!((stats["totalRevenue"].as_f64().unwrap() - 100.0).abs() < 1e-9);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn admin_routes_require_admin_role() {
    let app = TestApp::spawn().await;
    let seller = app.register_seller("admin-authz@example.com").await;

    let response = app
        .client
        .get(format!("{}/admin/dashboard", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 401);

    let response = app
        .client
        .get(format!("{}/admin/dashboard", app.address))
        .bearer_auth(app.seller_token(seller))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 403);
}
