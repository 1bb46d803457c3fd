// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::Parser;
use env_logger::Env;
use log::{error, info};
use serde_json::{json, Value};
use std::path::Path;
use std::process::exit;
use std::sync::Arc;

use mailtriage::api::rest::run_server;
use mailtriage::classify::{join_classifications, ClassificationBatchRequest, ClassifyError, Classifier};
use mailtriage::cli::{Cli, Command};
use mailtriage::config::Settings;
use mailtriage::credential::Credential;
use mailtriage::gmail::GmailClient;
use mailtriage::provider::GeminiProvider;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut settings = Settings::new(cli.config.as_deref()).unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {}", err);
        exit(1);
    });

    env_logger::Builder::from_env(Env::default().default_filter_or(settings.log.level.as_str())).init();

    let http_client = reqwest::Client::new();
    let provider = GeminiProvider::new(&settings.gemini, http_client.clone());
    let model = provider.model().to_string();
    let classifier = Arc::new(Classifier::new(Arc::new(provider)));
    info!("Using {} model {}", classifier.provider_name(), model);

    match cli.command() {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.rest.host = host;
            }
            if let Some(port) = port {
                settings.rest.port = port;
            }

            let gmail = GmailClient::new(&settings.gmail, http_client).unwrap_or_else(|err| {
                error!("Invalid Gmail configuration: {}", err);
                exit(1);
            });

            run_server(settings, classifier, Arc::new(gmail)).await
        }
        Command::Classify { file, api_key } => {
            if let Err(err) = classify_file(&classifier, &file, api_key.as_deref()).await {
                error!("Classification failed: {}", err);
                eprintln!("{}", err);
                exit(1);
            }
            Ok(())
        }
    }
}

/// Classifies the emails in `path` and prints `id, category, subject` per line.
async fn classify_file(
    classifier: &Classifier,
    path: &Path,
    api_key: Option<&str>,
) -> Result<(), ClassifyError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        ClassifyError::invalid_request(format!("cannot read {}: {}", path.display(), e))
    })?;
    let parsed: Value = serde_json::from_str(&raw)
        .map_err(|e| ClassifyError::invalid_request(format!("{} is not JSON: {}", path.display(), e)))?;
    let payload = if parsed.is_array() { json!({ "emails": parsed }) } else { parsed };

    let credential = api_key
        .and_then(Credential::new)
        .ok_or(ClassifyError::MissingCredential)?;
    let request = ClassificationBatchRequest::from_payload(&payload, credential)?;
    let emails = request.emails().to_vec();

    let response = classifier.classify(request).await?;

    for item in join_classifications(emails, response.results()) {
        let label = item.category.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string());
        println!("{}\t{}\t{}", item.email.id, label, item.email.subject);
    }
    Ok(())
}
