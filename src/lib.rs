//! Library core for mailtriage.

// --- Modules ---
pub mod api;
pub mod classify;
pub mod cli;
pub mod config;
pub mod credential;
pub mod gmail;
pub mod provider;

pub mod prelude {
    // Config
    pub use crate::config::Settings;

    // Classification
    pub use crate::classify::{
        join_classifications, Category, ClassificationBatchRequest, ClassificationBatchResponse,
        ClassificationResult, ClassifiedEmail, Classifier, ClassifyError, EmailSummary,
    };
    pub use crate::credential::Credential;
    pub use crate::provider::{GeminiProvider, ModelProvider, StaticProvider};

    // Mail
    pub use crate::gmail::{GmailClient, GmailError, MailSource};

    // Common Libs
    pub use log::{debug, error, info, trace, warn};
    pub use std::sync::Arc;
}
