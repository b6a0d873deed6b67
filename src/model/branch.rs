use super::BranchId;
use serde::{Deserialize, Serialize};

/// A physical store holding its own stock.
///
/// Branches are maintained by catalog management; the checkout core only reads them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
    pub region: String,
}

/// Payload for creating a new branch.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchCreate {
    pub name: String,
    pub region: String,
}

/// Payload for updating an existing branch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BranchUpdate {
    pub name: Option<String>,
    pub region: Option<String>,
}
