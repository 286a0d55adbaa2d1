#![allow(dead_code)]
pub mod prepare_env;

use chrono::NaiveDate;
use sqlx::SqlitePool;

/// Inserts an order row the way the admin UI would, free-text status and all.
#[allow(clippy::too_many_arguments)]
pub async fn seed_order(
    pool: &SqlitePool,
    code: &str,
    product: &str,
    supplier: Option<&str>,
    cost: i64,
    price: i64,
    expiry: Option<&str>,
    status: &str,
    check_flag: Option<bool>,
) {
    sqlx::query(
        r#"
            INSERT INTO orders (code, product, supplier, cost, price, cycle_days, start_date, expiry_date, status,
                check_flag)
            VALUES ($1, $2, $3, $4, $5, 30, NULL, $6, $7, $8)
        "#,
    )
    .bind(code)
    .bind(product)
    .bind(supplier)
    .bind(cost)
    .bind(price)
    .bind(expiry)
    .bind(status)
    .bind(check_flag)
    .execute(pool)
    .await
    .expect("Error seeding order");
}

pub async fn seed_product_price(pool: &SqlitePool, name: &str, pct_ctv: Option<f64>, pct_khach: Option<f64>) -> i64 {
    let (id,): (i64,) =
        sqlx::query_as("INSERT INTO product_prices (name, pct_ctv, pct_khach) VALUES ($1, $2, $3) RETURNING id")
            .bind(name)
            .bind(pct_ctv)
            .bind(pct_khach)
            .fetch_one(pool)
            .await
            .expect("Error seeding product price");
    id
}

pub async fn seed_supply(pool: &SqlitePool, name: &str) -> i64 {
    let (id,): (i64,) = sqlx::query_as("INSERT INTO supplies (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("Error seeding supply");
    id
}

pub async fn seed_supply_price(pool: &SqlitePool, product_id: i64, supply_id: i64, price: i64) {
    sqlx::query("INSERT INTO supply_prices (product_id, supply_id, price) VALUES ($1, $2, $3)")
        .bind(product_id)
        .bind(supply_id)
        .bind(price)
        .execute(pool)
        .await
        .expect("Error seeding supply price");
}

pub fn dmy(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
