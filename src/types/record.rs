use serde::{Deserialize, Serialize};

use crate::service::intent::Intent;

/// Everything one interaction produced; lives for a single request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryRecord {
    pub query: String,
    pub schema: String,
    pub intent: Intent,
    pub agent_name: String,
    pub sql: String,
    pub result: String,
}
