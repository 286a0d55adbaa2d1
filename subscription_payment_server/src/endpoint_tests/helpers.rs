use actix_web::web;
use sps_common::Secret;
use subscription_payment_engine::{
    test_utils::{prepare_test_env, random_db_path},
    ReceiptsApi,
    ReconciliationApi,
    RenewalApi,
    SqliteDatabase,
};

use crate::{
    auth::WebhookVerifier,
    config::WebhookAuthConfig,
    notifier::TelegramNotifier,
    routes::{health, payment_webhook, payment_webhook_info},
};

pub const HMAC_SECRET: &str = "test-hmac-secret";
pub const API_KEY: &str = "test-api-key";

pub async fn prepare_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating test database")
}

pub fn webhook_auth() -> WebhookAuthConfig {
    WebhookAuthConfig {
        hmac_secret: Some(Secret::new(HMAC_SECRET.to_string())),
        api_key: Some(Secret::new(API_KEY.to_string())),
    }
}

/// Wires up the same app data and routes as the production server, minus notifications.
pub fn app_config(db: SqliteDatabase) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(ReceiptsApi::new(db.clone())))
            .app_data(web::Data::new(ReconciliationApi::new(db.clone())))
            .app_data(web::Data::new(RenewalApi::new(db.clone())))
            .app_data(web::Data::new(db))
            .app_data(web::Data::new(WebhookVerifier::new(webhook_auth())))
            .app_data(web::Data::new(None::<TelegramNotifier>))
            .service(health)
            .service(payment_webhook_info)
            .service(payment_webhook);
    }
}

pub async fn seed_order(
    pool: &sqlx::SqlitePool,
    code: &str,
    product: &str,
    supplier: &str,
    cost: i64,
    expiry: &str,
    status: &str,
) {
    sqlx::query(
        "INSERT INTO orders (code, product, supplier, cost, price, cycle_days, expiry_date, status) VALUES ($1, $2, \
         $3, $4, $4, 30, $5, $6)",
    )
    .bind(code)
    .bind(product)
    .bind(supplier)
    .bind(cost)
    .bind(expiry)
    .bind(status)
    .execute(pool)
    .await
    .expect("Error seeding order");
}

pub async fn count_rows(pool: &sqlx::SqlitePool, table: &str) -> i64 {
    let (count,): (i64,) =
        sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}")).fetch_one(pool).await.expect("Error counting rows");
    count
}
