use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use log::info;
use std::io;

use taskflow::{config::Settings, db, routes};

fn cors(settings: &Settings) -> Cors {
    settings
        .backend_cors_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .expose_headers([header::WWW_AUTHENTICATE])
        .supports_credentials()
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let settings = Settings::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(settings.log_filter()))
        .init();

    let pool = db::create_pool(&settings.database_url)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    db::run_migrations(&pool)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let bind_addr = (settings.server_host.clone(), settings.server_port);
    info!(
        "Starting {} {} at {}",
        settings.project_name,
        settings.version,
        settings.server_url()
    );

    let settings = web::Data::new(settings);
    let pool = web::Data::new(pool);

    HttpServer::new(move || {
        App::new()
            .app_data(settings.clone())
            .app_data(pool.clone())
            .wrap(cors(&settings))
            .wrap(Logger::default())
            .route("/", web::get().to(routes::health::root))
            .service(web::scope(&settings.api_v1_str).configure(routes::config))
    })
    .bind(bind_addr)?
    .run()
    .await
}
