//! Company directory entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub symbol: String,
    pub name: String,
    pub last_updated: DateTime<Utc>,
}

impl Company {
    /// "Name (SYMBOL)" as shown in selectors.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.symbol)
    }
}
