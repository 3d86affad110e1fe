//! Seed data loaded into the store at startup.

use std::fmt;
use std::str::FromStr;

use super::types::{
    Covenant, CovenantStatus, Deal, DealStatus, Facility, FacilityStatus, FacilityType,
};

/// Named set of records a fresh store starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedSet {
    /// Eight deals across four originators and three facilities.
    Demo,
    /// No records at all.
    Empty,
}

impl SeedSet {
    /// Available seed set names.
    pub const NAMES: &[&str] = &["demo", "empty"];

    /// Deals in this seed set.
    pub fn deals(self) -> Vec<Deal> {
        match self {
            Self::Demo => demo_deals(),
            Self::Empty => Vec::new(),
        }
    }

    /// Facilities in this seed set.
    pub fn facilities(self) -> Vec<Facility> {
        match self {
            Self::Demo => demo_facilities(),
            Self::Empty => Vec::new(),
        }
    }
}

impl FromStr for SeedSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "demo" => Ok(Self::Demo),
            "empty" => Ok(Self::Empty),
            other => Err(format!(
                "unknown seed set \"{other}\", available: {}",
                Self::NAMES.join(", ")
            )),
        }
    }
}

impl fmt::Display for SeedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Demo => f.write_str("demo"),
            Self::Empty => f.write_str("empty"),
        }
    }
}

#[expect(clippy::too_many_arguments)]
fn deal(
    id: &str,
    name: &str,
    originator: &str,
    amount: f64,
    status: DealStatus,
    submission_date: &str,
    credit_score: Option<u32>,
    facility_id: Option<&str>,
    risk_score: Option<f64>,
) -> Deal {
    Deal {
        id: id.to_string(),
        name: name.to_string(),
        originator: originator.to_string(),
        amount,
        currency: "USD".to_string(),
        status,
        submission_date: submission_date.to_string(),
        credit_score,
        facility_id: facility_id.map(str::to_string),
        risk_score,
    }
}

fn demo_deals() -> Vec<Deal> {
    vec![
        deal(
            "D001",
            "Harbor Auto Receivables 2024-1",
            "FinCorp",
            12_500_000.0,
            DealStatus::Approved,
            "2024-01-15",
            Some(742),
            Some("F001"),
            Some(2.4),
        ),
        deal(
            "D002",
            "Northwind Equipment Lease Pool",
            "Acme Lending",
            8_750_000.0,
            DealStatus::Pending,
            "2024-02-03",
            Some(701),
            Some("F002"),
            Some(3.1),
        ),
        deal(
            "D003",
            "Summit Consumer Loans Q1",
            "Summit Credit",
            4_200_000.0,
            DealStatus::UnderReview,
            "2024-02-11",
            Some(668),
            None,
            Some(4.6),
        ),
        deal(
            "D004",
            "Bayside SME Working Capital",
            "FinCorp",
            6_000_000.0,
            DealStatus::Funded,
            "2024-02-20",
            Some(755),
            Some("F001"),
            Some(1.9),
        ),
        deal(
            "D005",
            "Cedar Student Loan Tranche",
            "FinCorp Capital",
            3_300_000.0,
            DealStatus::Rejected,
            "2024-03-02",
            Some(612),
            None,
            Some(6.8),
        ),
        deal(
            "D006",
            "Granite Fleet Finance",
            "Acme Lending",
            15_000_000.0,
            DealStatus::Draft,
            "2024-03-09",
            None,
            Some("F002"),
            None,
        ),
        deal(
            "D007",
            "Riverstone Credit Card Trust",
            "FinCorp",
            21_000_000.0,
            DealStatus::Expired,
            "2023-11-28",
            Some(688),
            Some("F003"),
            Some(3.7),
        ),
        deal(
            "D008",
            "Meridian Solar Loan Pool",
            "Summit Credit",
            5_600_000.0,
            DealStatus::Pending,
            "2024-03-18",
            Some(719),
            None,
            None,
        ),
    ]
}

fn covenant(name: &str, threshold: &str, current: &str, status: CovenantStatus) -> Covenant {
    Covenant {
        name: name.to_string(),
        threshold: threshold.to_string(),
        current: current.to_string(),
        status,
    }
}

fn demo_facilities() -> Vec<Facility> {
    vec![
        Facility {
            id: "F001".to_string(),
            name: "FinCorp Senior Revolver".to_string(),
            facility_type: FacilityType::Revolving,
            limit: 50_000_000.0,
            utilized: 18_500_000.0,
            currency: "USD".to_string(),
            originator: "FinCorp".to_string(),
            status: FacilityStatus::Active,
            covenants: Some(vec![
                covenant("Advance Rate", "<= 85%", "78%", CovenantStatus::Compliant),
                covenant("Excess Spread", ">= 2.0%", "2.3%", CovenantStatus::Warning),
            ]),
        },
        Facility {
            id: "F002".to_string(),
            name: "Acme Warehouse Line".to_string(),
            facility_type: FacilityType::Warehouse,
            limit: 30_000_000.0,
            utilized: 23_750_000.0,
            currency: "USD".to_string(),
            originator: "Acme Lending".to_string(),
            status: FacilityStatus::Active,
            covenants: Some(vec![covenant(
                "Delinquency Ratio",
                "<= 5%",
                "6.2%",
                CovenantStatus::Breached,
            )]),
        },
        Facility {
            id: "F003".to_string(),
            name: "Riverstone Term Facility".to_string(),
            facility_type: FacilityType::TermLoan,
            limit: 25_000_000.0,
            utilized: 0.0,
            currency: "USD".to_string(),
            originator: "FinCorp".to_string(),
            status: FacilityStatus::PendingApproval,
            covenants: None,
        },
    ]
}
