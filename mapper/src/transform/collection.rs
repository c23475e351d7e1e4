//! Collections for the fund. There is no collection data to map yet.

use serde_json::Value;
use tracing::debug;

/// Always empty.
pub fn collection() -> Vec<Value> {
    debug!("No GCF collection data to wrangle");
    Vec::new()
}
