use serde::{Deserialize, Serialize};

/// Request body for adding a company
#[derive(Debug, Deserialize)]
pub struct ReqAddCompany {
    /// Name of the company
    pub name: String,
    /// Status of the company
    pub status: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyAdded {
    /// Example: 42
    pub company_id: u64,
    pub company_name: String,
    #[serde(skip)]
    pub internal_ref: Option<String>,
    pub created_at: String, // Example: "2024-01-01T00:00:00Z"
}
