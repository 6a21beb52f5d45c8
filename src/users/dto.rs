use serde::{Deserialize, Serialize};

use crate::users::model::User;

/// Raw pagination query parameters. Kept as strings so a non-numeric value
/// surfaces as a validation error instead of an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserList {
    pub count: i64,
    pub data: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}
