//! HTTP-level tests for checkout, the payment page, the M-Pesa callback and
//! status polling.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    add_to_cart, body_json, get, get_with_cookie, money, place_order, post_json,
    post_json_with_cookie, seed_product, set_cookie_header, FakeGateway,
};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crave_core::order_status::OrderStatus;
use crave_core::types::{DbId, Money};
use crave_db::models::product::UpdateProduct;
use crave_db::repositories::{OrderRepo, ProductRepo};

fn paid_callback(checkout_request_id: &str, phone: i64, receipt: &str) -> serde_json::Value {
    serde_json::json!({
        "Body": { "stkCallback": {
            "MerchantRequestID": "29115-34620561-1",
            "CheckoutRequestID": checkout_request_id,
            "ResultCode": 0,
            "ResultDesc": "The service request is processed successfully.",
            "CallbackMetadata": { "Item": [
                { "Name": "Amount", "Value": 2500.00 },
                { "Name": "MpesaReceiptNumber", "Value": receipt },
                { "Name": "TransactionDate", "Value": 20240101120000_i64 },
                { "Name": "PhoneNumber", "Value": phone }
            ]}
        }}
    })
}

fn cancelled_callback(checkout_request_id: &str) -> serde_json::Value {
    serde_json::json!({
        "Body": { "stkCallback": {
            "MerchantRequestID": "29115-34620561-1",
            "CheckoutRequestID": checkout_request_id,
            "ResultCode": 1032,
            "ResultDesc": "Request cancelled by user"
        }}
    })
}

async fn status_of(pool: &PgPool, order_id: DbId) -> String {
    OrderRepo::find_status(pool, order_id).await.unwrap().unwrap()
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn two_line_checkout_totals_2500(pool: PgPool) {
    let (_, a) = seed_product(&pool, "Chocolate Fudge", 1000).await;
    let (_, b) = seed_product(&pool, "Vanilla Cupcakes", 500).await;
    let app = common::build_test_app(pool.clone());

    let cart = add_to_cart(app.clone(), None, a, 2).await;
    let cart = add_to_cart(app.clone(), Some(&cart), b, 1).await;

    let summary = get_with_cookie(app.clone(), "/checkout", &cart).await;
    assert_eq!(summary.status(), StatusCode::OK);
    assert_eq!(money(&body_json(summary).await["data"]["total"]), Decimal::from(2500));

    let response = post_json_with_cookie(
        app,
        "/checkout",
        serde_json::json!({
            "first_name": "Jane",
            "last_name": "Wanjiku",
            "email": "jane@example.com",
            "whatsapp_number": "0700111222",
            "phone": "0712345678",
        }),
        &cart,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let cleared = set_cookie_header(&response, "crave_cart").unwrap();
    assert!(cleared.contains("Max-Age=0"), "cart cookie must be cleared: {cleared}");

    let json = body_json(response).await;
    let order_id = json["data"]["order_id"].as_i64().unwrap();
    assert_eq!(money(&json["data"]["total"]), Decimal::from(2500));
    assert_eq!(json["data"]["status"], "PENDING");
    assert_eq!(
        json["data"]["payment_url"],
        format!("/payment?order_id={order_id}")
    );

    let order = OrderRepo::find_by_id(&pool, order_id).await.unwrap().unwrap();
    assert_eq!(order.customer_phone, "254712345678");
    let items = OrderRepo::list_items(&pool, order_id).await.unwrap();
    assert_eq!(items.len(), 2);
    let mut prices: Vec<Money> = items.iter().map(|i| i.price_at_purchase).collect();
    prices.sort();
    assert_eq!(prices, vec![Money::from(500), Money::from(1000)]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn empty_cart_cannot_check_out(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/checkout").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app,
        "/checkout",
        serde_json::json!({ "first_name": "Jane", "phone": "0712345678" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "EMPTY_CART");
    assert_eq!(json["error"], "Cart is empty");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn checkout_requires_name_and_phone(pool: PgPool) {
    let (_, variant_id) = seed_product(&pool, "Banana Bread", 800).await;
    let app = common::build_test_app(pool.clone());
    let cart = add_to_cart(app.clone(), None, variant_id, 1).await;

    let response = post_json_with_cookie(
        app,
        "/checkout",
        serde_json::json!({ "first_name": "", "phone": "" }),
        &cart,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(OrderRepo::list(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unavailable_variant_fails_checkout_without_side_effects(pool: PgPool) {
    let (product_id, variant_id) = seed_product(&pool, "Seasonal Cake", 2000).await;
    let app = common::build_test_app(pool.clone());
    let cart = add_to_cart(app.clone(), None, variant_id, 1).await;

    ProductRepo::update(
        &pool,
        product_id,
        &UpdateProduct {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let response = post_json_with_cookie(
        app,
        "/checkout",
        serde_json::json!({ "first_name": "Jane", "phone": "0712345678" }),
        &cart,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VARIANT_UNAVAILABLE");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains(&format!("variant {variant_id}")));
    assert!(OrderRepo::list(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn checkout_uses_stored_price_not_cart_price(pool: PgPool) {
    let (_, variant_id) = seed_product(&pool, "Cheesecake", 1000).await;
    let app = common::build_test_app(pool.clone());
    let cart = add_to_cart(app.clone(), None, variant_id, 2).await;

    ProductRepo::update_variant_price(&pool, variant_id, Money::from(1200))
        .await
        .unwrap();

    let order_id = place_order(app, &cart, "0712345678").await;
    let order = OrderRepo::find_by_id(&pool, order_id).await.unwrap().unwrap();
    assert_eq!(order.total_amount, Money::from(2400));
}

// ---------------------------------------------------------------------------
// Payment page
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn payment_page_pushes_for_pending_order(pool: PgPool) {
    let (_, variant_id) = seed_product(&pool, "Red Velvet", 2500).await;
    let gateway = Arc::new(FakeGateway::accepting("ws_CO_191220191020363925"));
    let app = common::build_test_app_with(pool.clone(), gateway.clone());

    let cart = add_to_cart(app.clone(), None, variant_id, 1).await;
    let order_id = place_order(app.clone(), &cart, "0712345678").await;

    let response = get(app, &format!("/payment?order_id={order_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["push_sent"], true);
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 1);

    assert_eq!(
        gateway.calls(),
        vec![("254712345678".to_string(), Money::from(2500), order_id)]
    );
    let order = OrderRepo::find_by_id(&pool, order_id).await.unwrap().unwrap();
    assert_eq!(
        order.checkout_request_id.as_deref(),
        Some("ws_CO_191220191020363925")
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn gateway_failure_still_renders_payment_page(pool: PgPool) {
    let (_, variant_id) = seed_product(&pool, "Red Velvet", 2500).await;
    let gateway = Arc::new(FakeGateway::failing());
    let app = common::build_test_app_with(pool.clone(), gateway.clone());

    let cart = add_to_cart(app.clone(), None, variant_id, 1).await;
    let order_id = place_order(app.clone(), &cart, "0712345678").await;

    let response = get(app, &format!("/payment?order_id={order_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["push_sent"], false);
    assert_eq!(json["data"]["order"]["status"], "PENDING");
    assert_eq!(gateway.calls().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn paid_order_is_not_pushed_again(pool: PgPool) {
    let (_, variant_id) = seed_product(&pool, "Red Velvet", 2500).await;
    let gateway = Arc::new(FakeGateway::accepting("ws_CO_1"));
    let app = common::build_test_app_with(pool.clone(), gateway.clone());

    let cart = add_to_cart(app.clone(), None, variant_id, 1).await;
    let order_id = place_order(app.clone(), &cart, "0712345678").await;
    OrderRepo::update_status(&pool, order_id, OrderStatus::Paid)
        .await
        .unwrap();

    let response = get(app, &format!("/payment?order_id={order_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["push_sent"], false);
    assert!(gateway.calls().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn payment_page_for_unknown_order_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/payment?order_id=31337").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Callback
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn callback_matches_checkout_request_id(pool: PgPool) {
    let (_, variant_id) = seed_product(&pool, "Red Velvet", 2500).await;
    let gateway = Arc::new(FakeGateway::accepting("ws_CO_EXACT"));
    let app = common::build_test_app_with(pool.clone(), gateway);

    // Two pending orders from the same phone; only the first gets a push.
    let cart = add_to_cart(app.clone(), None, variant_id, 1).await;
    let first = place_order(app.clone(), &cart, "0712345678").await;
    get(app.clone(), &format!("/payment?order_id={first}")).await;
    let second = place_order(app.clone(), &cart, "0712345678").await;

    let response = post_json(
        app,
        "/api/callback/mpesa",
        paid_callback("ws_CO_EXACT", 254712345678, "NLJ7RT61SV"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!({ "ResultCode": 0, "ResultDesc": "Accepted" }));

    assert_eq!(status_of(&pool, first).await, "PAID");
    assert_eq!(status_of(&pool, second).await, "PENDING");
    let order = OrderRepo::find_by_id(&pool, first).await.unwrap().unwrap();
    assert_eq!(order.mpesa_receipt.as_deref(), Some("NLJ7RT61SV"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn callback_falls_back_to_latest_pending_order_for_phone(pool: PgPool) {
    let (_, variant_id) = seed_product(&pool, "Red Velvet", 2500).await;
    let app = common::build_test_app(pool.clone());

    let cart = add_to_cart(app.clone(), None, variant_id, 1).await;
    let older = place_order(app.clone(), &cart, "0712345678").await;
    let newer = place_order(app.clone(), &cart, "+254 712 345 678").await;

    let response = post_json(
        app,
        "/api/callback/mpesa",
        paid_callback("ws_CO_UNKNOWN", 254712345678, "QKX1ABC2DE"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(status_of(&pool, newer).await, "PAID");
    assert_eq!(status_of(&pool, older).await, "PENDING");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn callback_with_bare_subscriber_number_pays_matching_order(pool: PgPool) {
    let (_, variant_id) = seed_product(&pool, "Red Velvet", 2500).await;
    let app = common::build_test_app(pool.clone());

    let cart = add_to_cart(app.clone(), None, variant_id, 1).await;
    let other = place_order(app.clone(), &cart, "0722000000").await;
    let order_id = place_order(app.clone(), &cart, "712345678").await;
    let stored = OrderRepo::find_by_id(&pool, order_id).await.unwrap().unwrap();
    assert_eq!(stored.customer_phone, "712345678");

    let response = post_json(
        app,
        "/api/callback/mpesa",
        paid_callback("", 712345678, "RBA4XYZ9QP"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["ResultCode"], 0);

    assert_eq!(status_of(&pool, order_id).await, "PAID");
    assert_eq!(status_of(&pool, other).await, "PENDING");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn rejected_callback_leaves_order_pending(pool: PgPool) {
    let (_, variant_id) = seed_product(&pool, "Red Velvet", 2500).await;
    let gateway = Arc::new(FakeGateway::accepting("ws_CO_CANCEL"));
    let app = common::build_test_app_with(pool.clone(), gateway);

    let cart = add_to_cart(app.clone(), None, variant_id, 1).await;
    let order_id = place_order(app.clone(), &cart, "0712345678").await;
    get(app.clone(), &format!("/payment?order_id={order_id}")).await;

    let response = post_json(app, "/api/callback/mpesa", cancelled_callback("ws_CO_CANCEL")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["ResultCode"], 0);
    assert_eq!(status_of(&pool, order_id).await, "PENDING");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_callback_is_still_acknowledged(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::send(
        app,
        axum::http::Method::POST,
        "/api/callback/mpesa",
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["ResultDesc"], "Accepted");
}

// ---------------------------------------------------------------------------
// Status polling
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn status_reports_current_order_status(pool: PgPool) {
    let (_, variant_id) = seed_product(&pool, "Red Velvet", 2500).await;
    let app = common::build_test_app(pool.clone());
    let cart = add_to_cart(app.clone(), None, variant_id, 1).await;
    let order_id = place_order(app.clone(), &cart, "0712345678").await;

    let json = body_json(get(app.clone(), &format!("/api/order/status?id={order_id}")).await).await;
    assert_eq!(json, serde_json::json!({ "status": "PENDING" }));

    OrderRepo::update_status(&pool, order_id, OrderStatus::Failed)
        .await
        .unwrap();
    let json = body_json(get(app, &format!("/api/order/status?id={order_id}")).await).await;
    assert_eq!(json["status"], "FAILED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn status_reports_error_for_bad_or_unknown_ids(pool: PgPool) {
    let app = common::build_test_app(pool);

    for uri in [
        "/api/order/status",
        "/api/order/status?id=",
        "/api/order/status?id=abc",
        "/api/order/status?id=999999",
    ] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(body_json(response).await["status"], "ERROR", "{uri}");
    }
}
