//! Order placement and status workflow integration tests.

mod common;

use common::TestApp;
use serde_json::{json, Value};
use uuid::Uuid;

async fn set_status(app: &TestApp, order_id: Uuid, status: &str) -> reqwest::Response {
    app.client
        .put(format!("{}/orders/{}/status", app.address, order_id))
        .bearer_auth(app.admin_token())
        .json(&json!({ "status": status }))
        .send()
        .await
        .expect("Failed to execute status request")
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn order_totals_discounted_prices_and_decrements_stock() {
    let app = TestApp::spawn().await;
    let buyer = app.register_seller("order-total@example.com").await;
    let category = app.create_category("Grains").await;
    let rice = app.create_product(category, "Rice", 100.0, 5, 10.0).await;
    let dal = app.create_product(category, "Dal", 50.0, 5, 0.0).await;

    let response = app
        .client
        .post(format!("{}/orders", app.address))
        .json(&json!({
            "userId": buyer,
            "items": [
                { "productId": rice, "quantity": 2 },
                { "productId": dal, "quantity": 1 }
            ]
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Order created successfully");
    // 100 * 0.9 * 2 + 50 = 230
    assert!((body["totalAmount"].as_f64().unwrap() - 230.0).abs() < 1e-9);

    assert_eq!(app.product_stock(rice).await, 3);
    assert_eq!(app.product_stock(dal).await, 4);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn order_detail_freezes_item_prices() {
    let app = TestApp::spawn().await;
    let buyer = app.register_seller("order-detail@example.com").await;
    let category = app.create_category("Grains").await;
    let rice = app.create_product(category, "Rice", 100.0, 5, 10.0).await;

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
    let order_id: Uuid = response.json::<Value>().await.unwrap()["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    // Later price change must not affect the recorded item price
    let response = app
        .client
        .put(format!("{}/products/{}", app.address, rice))
        .bearer_auth(app.admin_token())
        .json(&json!({
            "categoryId": category,
            "name": "Rice",
            "description": "A test product",
            "price": 500.0,
            "unit": "kg",
            "imageUrl": "http://img.test/product.png",
            "stock": 4,
            "discount": 0.0
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 200);

    let response = app
        .client
        .get(format!("{}/orders/{}", app.address, order_id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "pending");
    let items = body["items"].as_array().expect("order must carry items");
    assert_eq!(items.len(), 1);
    assert!((items[0]["price"].as_f64().unwrap() - 90.0).abs() < 1e-9);
    assert_eq!(items[0]["product_name"], "Rice");
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn insufficient_stock_rejects_whole_order() {
    let app = TestApp::spawn().await;
    let buyer = app.register_seller("order-stock@example.com").await;
    let category = app.create_category("Grains").await;
    let rice = app.create_product(category, "Rice", 100.0, 5, 0.0).await;
    let dal = app.create_product(category, "Dal", 50.0, 1, 0.0).await;

    let response = app
        .client
        .post(format!("{}/orders", app.address))
        .json(&json!({
            "userId": buyer,
            "items": [
                { "productId": rice, "quantity": 2 },
                { "productId": dal, "quantity": 3 }
            ]
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Insufficient stock for Dal");

    // The first line's decrement must have rolled back with the order
    assert_eq!(app.product_stock(rice).await, 5);
    assert_eq!(app.product_stock(dal).await, 1);

    let response = app
        .client
        .get(format!("{}/orders?userId={}", app.address, buyer))
        .send()
        .await
        .expect("Failed to execute request");
    let orders: Vec<Value> = response.json().await.expect("Failed to parse response");
    assert!(orders.is_empty());
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn unknown_product_rejects_whole_order() {
    let app = TestApp::spawn().await;
    let buyer = app.register_seller("order-unknown@example.com").await;
    let category = app.create_category("Grains").await;
    let rice = app.create_product(category, "Rice", 100.0, 5, 0.0).await;
    let ghost = Uuid::new_v4();

    let response = app
        .client
        .post(format!("{}/orders", app.address))
        .json(&json!({
            "userId": buyer,
            "items": [
                { "productId": rice, "quantity": 1 },
                { "productId": ghost, "quantity": 1 }
            ]
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], format!("Product {} not found", ghost));

    assert_eq!(app.product_stock(rice).await, 5);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn empty_or_nonpositive_carts_are_rejected() {
    let app = TestApp::spawn().await;
    let buyer = app.register_seller("order-empty@example.com").await;
    let category = app.create_category("Grains").await;
    let rice = app.create_product(category, "Rice", 100.0, 5, 0.0).await;

    let response = app
        .client
        .post(format!("{}/orders", app.address))
        .json(&json!({ "userId": buyer, "items": [] }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 400);

    let response = app
        .client
        .post(format!("{}/orders", app.address))
        .json(&json!({
            "userId": buyer,
            "items": [{ "productId": rice, "quantity": 0 }]
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn concurrent_orders_never_oversell() {
    let app = TestApp::spawn().await;
    let buyer = app.register_seller("order-race@example.com").await;
    let category = app.create_category("Grains").await;
    let rice = app.create_product(category, "Rice", 100.0, 3, 0.0).await;

    let place = |app: &TestApp| {
        app.client
            .post(format!("{}/orders", app.address))
            .json(&json!({
                "userId": buyer,
                "items": [{ "productId": rice, "quantity": 2 }]
            }))
            .send()
    };

    let (a, b) = tokio::join!(place(&app), place(&app));
    let a = a.expect("Failed to execute request");
    let b = b.expect("Failed to execute request");

    let successes = [a.status(), b.status()]
        .iter()
        .filter(|s| s.as_u16() == 201)
        .count();
    assert_eq!(successes, 1, "exactly one of two racing orders must win");

    assert_eq!(app.product_stock(rice).await, 1);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn status_machine_is_forward_only() {
    let app = TestApp::spawn().await;
    let buyer = app.register_seller("order-status@example.com").await;
    let category = app.create_category("Grains").await;
    let rice = app.create_product(category, "Rice", 100.0, 5, 0.0).await;

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
    let order_id: Uuid = response.json::<Value>().await.unwrap()["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let response = set_status(&app, order_id, "shipped").await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Order status updated to shipped");

    // Backwards move is refused
    let response = set_status(&app, order_id, "pending").await;
    assert_eq!(response.status(), 409);

    let response = set_status(&app, order_id, "delivered").await;
    assert_eq!(response.status(), 200);

    // Delivered is terminal
    let response = set_status(&app, order_id, "cancelled").await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn racing_status_updates_cannot_skip_the_machine() {
    let app = TestApp::spawn().await;
    let buyer = app.register_seller("order-status-race@example.com").await;
    let category = app.create_category("Grains").await;
    let rice = app.create_product(category, "Rice", 100.0, 5, 0.0).await;

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
    let order_id: Uuid = response.json::<Value>().await.unwrap()["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let response = set_status(&app, order_id, "shipped").await;
    assert_eq!(response.status(), 200);

    // Both moves are individually legal from shipped; together they would
    // commit a delivered -> cancelled (or reverse) net transition
    let (delivered, cancelled) = tokio::join!(
        set_status(&app, order_id, "delivered"),
        set_status(&app, order_id, "cancelled")
    );

    let statuses = [delivered.status().as_u16(), cancelled.status().as_u16()];
    let successes = statuses.iter().filter(|s| **s == 200).count();
    assert_eq!(successes, 1, "exactly one racing update must win");
    assert!(statuses.contains(&409));

    let winner = if delivered.status().as_u16() == 200 {
        "delivered"
    } else {
        "cancelled"
    };

    let response = app
        .client
        .get(format!("{}/orders/{}", app.address, order_id))
        .send()
        .await
        .expect("Failed to execute request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], winner);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn cancellation_does_not_restock() {
    let app = TestApp::spawn().await;
    let buyer = app.register_seller("order-cancel@example.com").await;
    let category = app.create_category("Grains").await;
    let rice = app.create_product(category, "Rice", 100.0, 5, 0.0).await;

    let response = app
        .client
        .post(format!("{}/orders", app.address))
        .json(&json!({
            "userId": buyer,
            "items": [{ "productId": rice, "quantity": 2 }]
        }))
        .send()
        .await
        .expect("Failed to execute request");
    let order_id: Uuid = response.json::<Value>().await.unwrap()["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let response = set_status(&app, order_id, "cancelled").await;
    assert_eq!(response.status(), 200);

    assert_eq!(app.product_stock(rice).await, 3);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn status_update_requires_admin_and_known_status() {
    let app = TestApp::spawn().await;
    let buyer = app.register_seller("order-authz@example.com").await;
    let category = app.create_category("Grains").await;
    let rice = app.create_product(category, "Rice", 100.0, 5, 0.0).await;

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
    let order_id: Uuid = response.json::<Value>().await.unwrap()["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let response = app
        .client
        .put(format!("{}/orders/{}/status", app.address, order_id))
        .json(&json!({ "status": "shipped" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 401);

    let response = set_status(&app, order_id, "returned").await;
    assert_eq!(response.status(), 400);

    let response = set_status(&app, Uuid::new_v4(), "shipped").await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn order_for_unknown_user_is_not_found() {
    let app = TestApp::spawn().await;
    let category = app.create_category("Grains").await;
    let rice = app.create_product(category, "Rice", 100.0, 5, 0.0).await;

    let response = app
        .client
        .post(format!("{}/orders", app.address))
        .json(&json!({
            "userId": Uuid::new_v4(),
            "items": [{ "productId": rice, "quantity": 1 }]
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "User not found");
}
