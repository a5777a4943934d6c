//! Actix Web HTTP server.
//!
//! Exposes:
//! - `POST <endpoint>`: formula generation
//! - `OPTIONS <endpoint>`: CORS preflight
//! - `GET /health`

use crate::{
    config::ProxyConfig,
    error::ProxyError,
    proxy::FormulaProxy,
    types::{ErrorResponse, FormulaRequest},
};
use actix_web::{
    http::{header, Method},
    middleware::DefaultHeaders,
    web, App, HttpResponse, HttpServer,
};
use anyhow::{Context, Result};
use tracing::{error, info};

pub async fn serve(config: ProxyConfig) -> Result<()> {
    let addr = config.listen_addr();
    let path = config.server.endpoint_path.clone();

    let proxy = FormulaProxy::new(config).context("failed to build completion client")?;
    let proxy = web::Data::new(proxy);

    info!(addr = %addr, path = %path, "formula-proxy listening");

    HttpServer::new(move || App::new().configure(configure(proxy.clone())))
        .bind(&addr)
        .with_context(|| format!("failed to bind {}", addr))?
        .run()
        .await
        .context("server error")?;

    Ok(())
}

/// Register the proxy's routes; shared by [`serve`] and tests.
pub fn configure(proxy: web::Data<FormulaProxy>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let path = proxy.config().server.endpoint_path.clone();

        cfg.app_data(proxy)
            .route("/health", web::get().to(health_check))
            .service(
                web::resource(path)
                    .app_data(json_config())
                    .route(web::post().to(handle_formula))
                    .route(web::method(Method::OPTIONS).to(handle_preflight))
                    .default_service(web::to(method_not_allowed))
                    .wrap(DefaultHeaders::new().add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))),
            );
    }
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| {
            ProxyError::InvalidRequest(format!("Invalid request body: {}", err)).into()
        })
}

async fn health_check() -> &'static str {
    "OK"
}

async fn handle_preflight() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"))
        .finish()
}

async fn handle_formula(
    proxy: web::Data<FormulaProxy>,
    body: web::Json<FormulaRequest>,
) -> Result<HttpResponse, ProxyError> {
    let req = body.into_inner();

    match proxy.generate(&req.query).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(resp)),
        Err(e) => {
            if e.is_internal() {
                error!(error = %e, "formula request failed");
            }
            Err(e)
        }
    }
}

async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed()
        .insert_header((header::ALLOW, "POST, OPTIONS"))
        .json(ErrorResponse {
            error: "Method not allowed".to_string(),
        })
}
