use serde::{Deserialize, Serialize};

/// Liveness probe body for `GET /health`.
#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}
