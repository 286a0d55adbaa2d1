use actix_web::{http::StatusCode, test, App};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use subscription_payment_engine::db_types::Order;

use super::helpers::{app_config, count_rows, prepare_db, seed_order, API_KEY, HMAC_SECRET};
use crate::auth::calculate_hmac;

fn dmy_in(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days)).format("%d/%m/%Y").to_string()
}

#[actix_web::test]
async fn webhook_info_is_public() {
    let db = prepare_db().await;
    let app = test::init_service(App::new().configure(app_config(db.clone()))).await;
    let req = test::TestRequest::get().uri("/webhook/payment").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    db.close().await;
}

#[actix_web::test]
async fn unauthenticated_webhook_is_rejected_without_writes() {
    let db = prepare_db().await;
    let app = test::init_service(App::new().configure(app_config(db.clone()))).await;
    let body = json!({"content": "NGUYEN VAN A CTV1234", "transferAmount": "150000"}).to_string();
    let req = test::TestRequest::post().uri("/webhook/payment").set_payload(body).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let response: Value = test::read_body_json(res).await;
    assert_eq!(response["message"], "Invalid Signature");
    assert_eq!(count_rows(db.pool(), "payment_receipts").await, 0);
    db.close().await;
}

#[actix_web::test]
async fn garbage_signature_is_rejected() {
    let db = prepare_db().await;
    let app = test::init_service(App::new().configure(app_config(db.clone()))).await;
    let body = json!({"content": "CTV1234", "transferAmount": "150000"}).to_string();
    let req = test::TestRequest::post()
        .uri("/webhook/payment")
        .insert_header(("X-SEPAY-SIGNATURE", "deadbeef"))
        .set_payload(body)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    db.close().await;
}

#[actix_web::test]
async fn unusable_payload_is_a_bad_request() {
    let db = prepare_db().await;
    let app = test::init_service(App::new().configure(app_config(db.clone()))).await;
    for body in ["{}", "not json at all", r#"{"transaction": {}}"#] {
        let req = test::TestRequest::post()
            .uri("/webhook/payment")
            .insert_header(("Authorization", format!("Apikey {API_KEY}")))
            .set_payload(body)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body {body:?} should be rejected");
        let response: Value = test::read_body_json(res).await;
        assert_eq!(response["message"], "Missing transaction");
    }
    assert_eq!(count_rows(db.pool(), "payment_receipts").await, 0);
    db.close().await;
}

#[actix_web::test]
async fn signed_payment_records_receipt_books_and_renews() {
    let db = prepare_db().await;
    seed_order(db.pool(), "CTV9001", "NETFLIX-3THANG", "Acme", 100_000, &dmy_in(2), "Cần gia hạn").await;
    let app = test::init_service(App::new().configure(app_config(db.clone()))).await;

    let body = json!({
        "content": "NGUYEN VAN A GIA HAN CTV9001",
        "transferAmount": "120000.00",
        "transactionDate": Utc::now().date_naive().format("%Y-%m-%d").to_string(),
    })
    .to_string();
    let req = test::TestRequest::post()
        .uri("/webhook/payment")
        .insert_header(("X-SEPAY-SIGNATURE", calculate_hmac(HMAC_SECRET, body.as_bytes())))
        .set_payload(body)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let response: Value = test::read_body_json(res).await;
    assert_eq!(response["message"], "OK");
    assert_eq!(response["renewal"]["outcome"], "renewed");
    assert_eq!(response["renewal"]["code"], "CTV9001");

    // The receipt trail holds the payment.
    let (order_code, amount): (String, i64) =
        sqlx::query_as("SELECT order_code, amount FROM payment_receipts").fetch_one(db.pool()).await.unwrap();
    assert_eq!(order_code, "CTV9001");
    assert_eq!(amount, 120_000);

    // Reconciliation created master data and an open payable round seeded with the order's cost.
    assert_eq!(count_rows(db.pool(), "product_prices").await, 1);
    assert_eq!(count_rows(db.pool(), "supplies").await, 1);
    let (import_value,): (i64,) =
        sqlx::query_as("SELECT import_value FROM supply_ledger WHERE status = 'Unpaid' AND paid IS NULL")
            .fetch_one(db.pool())
            .await
            .unwrap();
    assert_eq!(import_value, 100_000);

    // The order rolled into a fresh 90-day cycle and is awaiting its next payment.
    let order: Order =
        sqlx::query_as("SELECT * FROM orders WHERE code = 'CTV9001'").fetch_one(db.pool()).await.unwrap();
    assert_eq!(order.status, subscription_payment_engine::db_types::OrderStatus::Unpaid);
    assert_eq!(order.check_flag, Some(false));
    assert_eq!(order.cycle_days, 90);
    assert_eq!(order.start_date.as_deref(), Some(dmy_in(3).as_str()));
    db.close().await;
}

#[actix_web::test]
async fn receipt_keeps_the_last_token_while_bookkeeping_follows_the_matched_code() {
    let db = prepare_db().await;
    seed_order(db.pool(), "CTV9001", "NETFLIX-3THANG", "Acme", 100_000, &dmy_in(2), "Cần gia hạn").await;
    let app = test::init_service(App::new().configure(app_config(db.clone()))).await;

    let body = json!({"content": "NGUYEN chuyen CTV9001 cam on ban", "transferAmount": "120000"}).to_string();
    let req = test::TestRequest::post()
        .uri("/webhook/payment")
        .insert_header(("X-SEPAY-SIGNATURE", calculate_hmac(HMAC_SECRET, body.as_bytes())))
        .set_payload(body)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let response: Value = test::read_body_json(res).await;
    assert_eq!(response["renewal"]["code"], "CTV9001");

    // The stored receipt carries the raw last-token code and first-token sender, while the
    // pattern-matched code drove reconciliation and renewal.
    let (order_code, sender): (String, Option<String>) =
        sqlx::query_as("SELECT order_code, sender FROM payment_receipts").fetch_one(db.pool()).await.unwrap();
    assert_eq!(order_code, "BAN");
    assert_eq!(sender.as_deref(), Some("NGUYEN"));
    assert_eq!(count_rows(db.pool(), "supply_ledger").await, 1);
    db.close().await;
}

#[actix_web::test]
async fn api_key_payment_with_unknown_code_still_records_a_receipt() {
    let db = prepare_db().await;
    let app = test::init_service(App::new().configure(app_config(db.clone()))).await;
    let body = json!({"content": "ai do chuyen khoan vu vo", "transferAmount": 50000}).to_string();
    let req = test::TestRequest::post()
        .uri("/webhook/payment")
        .insert_header(("X-API-KEY", API_KEY))
        .set_payload(body)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let response: Value = test::read_body_json(res).await;
    assert_eq!(response["renewal"], Value::Null);
    assert_eq!(count_rows(db.pool(), "payment_receipts").await, 1);
    // No order matched, so nothing else moved.
    assert_eq!(count_rows(db.pool(), "supply_ledger").await, 0);
    db.close().await;
}
