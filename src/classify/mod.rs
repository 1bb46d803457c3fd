// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Email classification: batch of summaries in, one category per email out.

pub mod error;
pub mod join;
pub mod prompt;
pub mod service;
pub mod types;
pub mod validate;

pub use error::ClassifyError;
pub use join::{join_classifications, ClassifiedEmail};
pub use service::Classifier;
pub use types::{
    Category, ClassificationBatchRequest, ClassificationBatchResponse, ClassificationResult,
    EmailSummary,
};
