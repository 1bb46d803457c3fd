// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use actix_web::{
    get,
    http::header::AUTHORIZATION,
    middleware::Logger,
    post,
    error::QueryPayloadError,
    web::{self, Bytes, Data, Query},
    App, HttpRequest, HttpResponse, HttpServer,
};
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    api::errors::ApiError,
    classify::Classifier,
    config::Settings,
    credential::{bearer_token, Credential},
    gmail::{MailSource, MAX_LIST_RESULTS},
};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub classifier: Arc<Classifier>,
    pub mail_source: Arc<dyn MailSource>,
}

// --- Route Configuration ---

pub fn configure_rest_service(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .service(health)
            .service(classify_emails)
            .service(fetch_gmail),
    );
}

// --- Helper Functions ---

/// Reports unparseable query strings in the standard error body.
fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(err.to_string()).into()
}

fn authorization_header(req: &HttpRequest) -> Option<&str> {
    req.headers().get(AUTHORIZATION).and_then(|hv| hv.to_str().ok())
}

// --- Route Handlers ---

#[get("/health")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `POST /api/classify` with body `{ "emails": [...] }` and
/// `Authorization: Bearer <model key>`.
#[post("/classify")]
async fn classify_emails(
    state: Data<AppState>,
    req: HttpRequest,
    body: Bytes,
) -> Result<HttpResponse, ApiError> {
    info!("Handling POST /api/classify");

    // A body that is not JSON is reported as an invalid request, after the
    // credential check.
    let payload: Value = serde_json::from_slice(&body).unwrap_or_else(|e| {
        debug!("Classify body is not JSON: {}", e);
        Value::Null
    });
    let credential = authorization_header(&req).and_then(bearer_token);

    let response = state
        .classifier
        .classify_payload(&payload, credential)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[derive(Debug, Deserialize)]
struct FetchQuery {
    #[serde(rename = "maxResults")]
    max_results: Option<u32>,
}

/// `GET /api/gmail/fetch?maxResults=N` with `Authorization: Bearer <gmail token>`.
#[get("/gmail/fetch")]
async fn fetch_gmail(
    state: Data<AppState>,
    req: HttpRequest,
    query: Query<FetchQuery>,
) -> Result<HttpResponse, ApiError> {
    info!("Handling GET /api/gmail/fetch");

    let access_token =
        Credential::from_authorization(authorization_header(&req)).ok_or(ApiError::NotAuthenticated)?;

    let max_results = query
        .max_results
        .unwrap_or(state.settings.gmail.default_max_results);
    if max_results == 0 || max_results > MAX_LIST_RESULTS {
        return Err(ApiError::BadRequest(format!(
            "maxResults must be between 1 and {}",
            MAX_LIST_RESULTS
        )));
    }

    let emails = state
        .mail_source
        .fetch_summaries(&access_token, max_results)
        .await?;

    Ok(HttpResponse::Ok().json(emails))
}

// --- Main Server Setup ---

pub async fn run_server(
    settings: Settings,
    classifier: Arc<Classifier>,
    mail_source: Arc<dyn MailSource>,
) -> std::io::Result<()> {
    let bind_address = settings.bind_address();
    let max_body_bytes = settings.rest.max_body_bytes;
    info!("Starting REST API server at {}", bind_address);

    let app_state = Data::new(AppState {
        settings: Arc::new(settings),
        classifier,
        mail_source,
    });

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .app_data(web::PayloadConfig::new(max_body_bytes))
            .configure(configure_rest_service)
    })
    .bind(bind_address)?
    .run()
    .await
}
