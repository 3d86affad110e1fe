//! Record types held by the mock data store.
//!
//! Field names serialize in camelCase and enum values as their display
//! strings, matching the JSON the lending platform front-end consumes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealStatus {
    Pending,
    Approved,
    Rejected,
    Funded,
    #[serde(rename = "Under Review")]
    UnderReview,
    Draft,
    Expired,
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Funded => "Funded",
            Self::UnderReview => "Under Review",
            Self::Draft => "Draft",
            Self::Expired => "Expired",
        };
        f.write_str(label)
    }
}

/// A financial transaction tracked by the lending platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub name: String,
    pub originator: String,
    pub amount: f64,
    pub currency: String,
    pub status: DealStatus,
    /// Submission date as `YYYY-MM-DD`.
    pub submission_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
}

/// Kind of credit facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacilityType {
    Revolving,
    #[serde(rename = "Term Loan")]
    TermLoan,
    Warehouse,
}

/// Operational status of a facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacilityStatus {
    Active,
    #[serde(rename = "Pending Approval")]
    PendingApproval,
    Closed,
}

/// Compliance state of a covenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CovenantStatus {
    Compliant,
    Warning,
    Breached,
}

/// A compliance condition attached to a facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Covenant {
    pub name: String,
    pub threshold: String,
    pub current: String,
    pub status: CovenantStatus,
}

/// A credit facility (funding line). Read-only in the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub facility_type: FacilityType,
    pub limit: f64,
    pub utilized: f64,
    pub currency: String,
    pub originator: String,
    pub status: FacilityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub covenants: Option<Vec<Covenant>>,
}
