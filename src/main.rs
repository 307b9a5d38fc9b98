use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use leitner_server::{
    app_state::AppState,
    auth::{AuthMiddleware, JwtService},
    config::Config,
    db::Database,
    handlers,
    middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        config.validate_for_production();
    }

    let db = Database::connect(&config)
        .await
        .expect("failed to connect to MongoDB");

    let jwt_service = JwtService::new(
        &config.jwt_secret,
        config.jwt_expiration_hours,
        config.refresh_expiration_hours,
    );

    let bind_addr = (config.web_server_host.clone(), config.web_server_port);
    let state = AppState::new(config, &db, jwt_service.clone())
        .await
        .expect("failed to initialize application state");

    log::info!("Starting HTTP server on {}:{}", bind_addr.0, bind_addr.1);

    let state = Arc::new(state);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            .app_data(web::Data::new(db.clone()))
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .wrap(cors)
            // Public surface: registration, login and health probes.
            .service(handlers::register)
            .service(handlers::login)
            .service(handlers::refresh_token)
            .service(handlers::logout)
            .service(handlers::health_check)
            .service(handlers::health_check_live)
            .service(handlers::health_check_ready)
            // Everything else requires a bearer token.
            .service(
                web::scope("")
                    .wrap(AuthMiddleware)
                    .service(handlers::current_question)
                    .service(handlers::submit_answer)
                    .service(handlers::get_user),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
