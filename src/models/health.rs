use serde::Serialize;
use chrono::{DateTime, Utc};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String, // "up" si le ping du pool répond
    pub time: DateTime<Utc>,
}
