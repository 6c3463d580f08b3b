use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

use totem_kiosk::config::AppConfig;
use totem_kiosk::handlers;
use totem_kiosk::openapi_config::{configure_openapi, ApiDoc};
use totem_kiosk::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(?config, "Configuration loaded");

    let state = AppState::from_config(&config)
        .map_err(|e| anyhow::anyhow!("Failed to initialise kiosk: {}", e))?;

    tracing::info!("Totem kiosk listening on http://{}", config.bind_address);
    tracing::info!("API documentation: http://{}/swagger-ui/", config.bind_address);

    // Configure OpenAPI spec with Bearer auth (do this once, outside the closure)
    let openapi_spec = configure_openapi(ApiDoc::openapi());

    HttpServer::new(move || {
        App::new()
            .configure(|cfg| state.register(cfg))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .wrap(Logger::default())
            .service(
                utoipa_swagger_ui::SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi_spec.clone()),
            )
            .configure(handlers::configure)
            .default_service(web::route().to(handlers::not_found))
    })
    .bind(config.bind_address)?
    .run()
    .await?;

    Ok(())
}
