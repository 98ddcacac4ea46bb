use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use ramen_fit::config::{CorsSettings, LoggingSettings, Settings};
use ramen_fit::core::{Analyzer, Recommender};
use ramen_fit::errors::handle_json_payload_error;
use ramen_fit::routes::{self, AppState};
use ramen_fit::services::{MySqlStore, OpenAiClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn build_cors(settings: &CorsSettings) -> Cors {
    if settings.is_permissive() {
        return Cors::permissive();
    }

    settings
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

fn io_error(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_logging(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return Err(io_error(format!("Configuration error: {}", e)));
        }
    };

    init_logging(&settings.logging);

    info!("Starting Ramen Fit analysis service...");

    let store = MySqlStore::from_settings(
        &settings.database.url,
        settings.database.max_connections,
        settings.database.min_connections,
        settings.database.acquire_timeout_secs,
        settings.database.idle_timeout_secs,
    )
    .await
    .map_err(|e| {
        error!("Failed to connect to MySQL: {}", e);
        io_error(format!("MySQL connection error: {}", e))
    })?;

    info!("MySQL store initialized");

    let generation = &settings.generation;
    if generation.api_key.is_empty() {
        error!("No text-generation API key configured, explanations will use the fallback text");
    }

    let generator = OpenAiClient::new(
        generation.base_url.clone(),
        generation.api_key.clone(),
        generation.model.clone(),
        Duration::from_secs(generation.timeout_secs),
    )
    .map_err(|e| io_error(format!("Text-generation client error: {}", e)))?;

    info!(
        "Text generation via {} (timeout {}s)",
        generation.model, generation.timeout_secs
    );

    let recommender = Recommender::new(
        settings.recommendation.top_k,
        settings.recommendation.default_serving_size,
    );
    let analyzer = Analyzer::new(recommender, generation.temperature);

    let app_state = AppState {
        store: Arc::new(store),
        generator: Arc::new(generator),
        analyzer,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let cors_settings = settings.cors.clone();

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(build_cors(&cors_settings))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
