//! Server construction and middleware wiring.

mod config;

pub use config::{AppSettings, ServerConfig};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::accounts::{login, register};
use backend::inbound::http::complaints::{
    assign, get_by_id, list, remove, submit, update_status, vote,
};
use backend::inbound::http::error::{json_config, query_config};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{DieselAccountRepository, DieselComplaintRepository};
use backend::outbound::security::{BcryptPasswordHasher, JwtTokenCodec};
use mockable::DefaultClock;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Wire the five HTTP ports onto their production adapters.
fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock = Arc::new(DefaultClock);
    HttpState {
        accounts: Arc::new(DieselAccountRepository::new(config.db_pool.clone())),
        complaints: Arc::new(DieselComplaintRepository::new(config.db_pool.clone())),
        hasher: Arc::new(BcryptPasswordHasher),
        tokens: Arc::new(JwtTokenCodec::new(
            config.token_secret.as_bytes(),
            clock.clone(),
        )),
        clock,
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api/v1")
        .service(register)
        .service(login)
        .service(submit)
        .service(list)
        .service(get_by_id)
        .service(update_status)
        .service(assign)
        .service(remove)
        .service(vote);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .app_data(query_config())
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] containing the pool, binding, and signing secret.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
