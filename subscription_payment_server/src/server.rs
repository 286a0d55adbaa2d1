use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::info;
use subscription_payment_engine::{ReceiptsApi, ReconciliationApi, RenewalApi, SqliteDatabase};

use crate::{
    auth::WebhookVerifier,
    config::ServerConfig,
    errors::ServerError,
    notifier::TelegramNotifier,
    routes::{health, payment_webhook, payment_webhook_info},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let notifier = TelegramNotifier::try_new(config.telegram.clone());
    if notifier.is_some() {
        info!("📣️ Renewal notifications are enabled.");
    }
    let (host, port) = (config.host.clone(), config.port);
    let srv = HttpServer::new(move || {
        let receipts_api = ReceiptsApi::new(db.clone());
        let reconciliation_api = ReconciliationApi::new(db.clone());
        let renewal_api = RenewalApi::new(db.clone());
        let verifier = WebhookVerifier::new(config.webhook.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("sps::access_log"))
            .app_data(web::Data::new(receipts_api))
            .app_data(web::Data::new(reconciliation_api))
            .app_data(web::Data::new(renewal_api))
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(verifier))
            .app_data(web::Data::new(notifier.clone()))
            .service(health)
            .service(payment_webhook_info)
            .service(payment_webhook)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
