use serde::{Deserialize, Serialize};

/// Payload for inserting a new quote. Both fields are required and non-empty
/// by the time a `QuoteCreate` is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteCreate {
    pub text: String,
    pub author: String,
}

/// Partial update for an existing quote. `None` leaves the stored field
/// unchanged; empty strings are normalized to `None` so they never overwrite.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuotePatch {
    pub text: Option<String>,
    pub author: Option<String>,
}

impl QuotePatch {
    pub fn new(text: Option<String>, author: Option<String>) -> Self {
        Self {
            text: text.filter(|t| !t.is_empty()),
            author: author.filter(|a| !a.is_empty()),
        }
    }
}
