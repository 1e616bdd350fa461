use std::env;
use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;

use storefront_service::domain::export::ExportLimits;
use storefront_service::domain::invoice::TextInvoiceRenderer;
use storefront_service::domain::order::PricingAdjustments;
use storefront_service::infrastructure::cart_store::JsonFileCartStore;
use storefront_service::infrastructure::export_source::DieselExportSource;
use storefront_service::infrastructure::order_repo::DieselOrderRepository;
use storefront_service::{build_server, create_pool, run_migrations, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .expect("PORT must be a valid number");
    let cart_dir = env::var("CART_DIR").unwrap_or_else(|_| "./carts".to_string());
    let export_limits = ExportLimits {
        size_ceiling: env_i64("EXPORT_CEILING", 10_000),
        chunk_size: env_i64("EXPORT_CHUNK_SIZE", 1_000),
    };
    let render_timeout = Duration::from_millis(env_i64("INVOICE_TIMEOUT_MS", 5_000) as u64);

    let pool = create_pool(&database_url);
    run_migrations(&pool);

    let state = AppState::new(
        Arc::new(DieselOrderRepository::new(pool.clone())),
        Arc::new(JsonFileCartStore::new(cart_dir)),
        Arc::new(DieselExportSource::new(pool)),
        Arc::new(TextInvoiceRenderer::default()),
        PricingAdjustments::default(),
        export_limits,
        render_timeout,
    );

    log::info!("Starting server at http://{}:{}", host, port);

    build_server(state, &host, port)?.await
}

fn env_i64(key: &str, default: i64) -> i64 {
    env::var(key)
        .ok()
        .map(|v| v.parse().unwrap_or_else(|_| panic!("{key} must be a valid number")))
        .unwrap_or(default)
}
