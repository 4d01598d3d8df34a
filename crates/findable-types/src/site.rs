//! Site row shape.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub domain: String,
    pub user_id: String,
    pub business_model: Option<String>,
    pub name: Option<String>,
}
