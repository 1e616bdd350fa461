pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;
use std::time::Duration;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::cart_service::CartService;
use application::checkout_service::CheckoutService;
use application::export_service::ExportService;
use application::invoice_service::InvoiceService;
use domain::export::ExportLimits;
use domain::invoice::DocumentRenderer;
use domain::order::PricingAdjustments;
use domain::ports::{CartStore, ExportSource, OrderRepository};

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// Shared application state: every collaborator sits behind its port so
/// the whole HTTP surface can be exercised against fakes.
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderRepository>,
    pub carts: CartService<Arc<dyn CartStore>>,
    pub checkout: CheckoutService<Arc<dyn OrderRepository>>,
    pub exports: ExportService<Arc<dyn ExportSource>>,
    pub invoices: InvoiceService,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        carts: Arc<dyn CartStore>,
        export_source: Arc<dyn ExportSource>,
        renderer: Arc<dyn DocumentRenderer>,
        pricing: PricingAdjustments,
        export_limits: ExportLimits,
        render_timeout: Duration,
    ) -> Self {
        Self {
            checkout: CheckoutService::new(orders.clone(), pricing),
            carts: CartService::new(carts),
            exports: ExportService::new(export_source, export_limits),
            invoices: InvoiceService::new(renderer, render_timeout),
            orders,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::cart::get_cart,
        handlers::cart::add_item,
        handlers::cart::set_quantity,
        handlers::cart::remove_item,
        handlers::cart::clear_cart,
        handlers::orders::checkout,
        handlers::orders::get_order,
        handlers::invoice::download_invoice,
        handlers::export::export,
    ),
    components(schemas(
        handlers::cart::AddCartItemRequest,
        handlers::cart::SetQuantityRequest,
        handlers::cart::CartLineResponse,
        handlers::cart::CartSnapshotResponse,
        handlers::orders::CheckoutItemRequest,
        handlers::orders::CheckoutRequest,
        handlers::orders::OrderItemResponse,
        handlers::orders::OrderResponse,
        handlers::export::ExportRequest,
        handlers::export::ExportResponse,
        domain::order::BillingInfo,
        domain::order::OrderStatus,
        domain::export::ExportEntity,
    )),
    tags(
        (name = "cart", description = "Pre-order staging area"),
        (name = "orders", description = "Checkout and order retrieval"),
        (name = "admin", description = "Administrative bulk export"),
    )
)]
pub struct ApiDoc;

/// Mounts the full route tree. Shared with the integration tests so
/// they drive the exact production routing over fake ports.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cart")
            .route("", web::get().to(handlers::cart::get_cart))
            .route("", web::delete().to(handlers::cart::clear_cart))
            .route("/items", web::post().to(handlers::cart::add_item))
            .route("/items/{line_id}", web::put().to(handlers::cart::set_quantity))
            .route("/items/{line_id}", web::delete().to(handlers::cart::remove_item)),
    )
    .route("/checkout", web::post().to(handlers::orders::checkout))
    .service(
        web::scope("/orders")
            .route("/{id}", web::get().to(handlers::orders::get_order))
            .route("/{id}/invoice", web::get().to(handlers::invoice::download_invoice)),
    )
    .service(web::scope("/admin").route("/export", web::post().to(handlers::export::export)));
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .configure(configure_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
