//! Caption domain type

use serde::{Deserialize, Serialize};

/// A timed caption fragment, relative to the start of its scene's narration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caption {
    pub text: String,
    pub start_ms: u64,
    pub end_ms: u64,
}
