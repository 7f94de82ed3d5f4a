// TecaiKids API - Data Model
// Programs are static catalog values; enrollments and consultations are documents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default status of every persisted record. Nothing transitions it yet.
pub const STATUS_PENDING: &str = "pending";

/// Marketing baseline added to the live enrollment count.
pub const BASE_STUDENT_COUNT: u64 = 10_000;
pub const SUCCESS_RATE: &str = "99%";
pub const EXPERT_EDUCATORS: u32 = 25;
pub const SUPPORT_HOURS: &str = "24/7";

// ============================================================================
// CLOSED ENUMERATIONS
// ============================================================================

/// Error returned when a wire tag does not name any variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownTag {}

/// Tuition program / age group tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramType {
    LittleLearners,
    YoungExplorers,
    SmartKids,
    TechTeens,
    FutureLeaders,
}

impl ProgramType {
    /// All tags, in catalog order
    pub const ALL: [ProgramType; 5] = [
        ProgramType::LittleLearners,
        ProgramType::YoungExplorers,
        ProgramType::SmartKids,
        ProgramType::TechTeens,
        ProgramType::FutureLeaders,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramType::LittleLearners => "little_learners",
            ProgramType::YoungExplorers => "young_explorers",
            ProgramType::SmartKids => "smart_kids",
            ProgramType::TechTeens => "tech_teens",
            ProgramType::FutureLeaders => "future_leaders",
        }
    }
}

impl FromStr for ProgramType {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProgramType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTag {
                kind: "program type",
                value: s.to_string(),
            })
    }
}

/// Billing cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPlan {
    Monthly,
    Quarterly,
}

impl PaymentPlan {
    pub const ALL: [PaymentPlan; 2] = [PaymentPlan::Monthly, PaymentPlan::Quarterly];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentPlan::Monthly => "monthly",
            PaymentPlan::Quarterly => "quarterly",
        }
    }

    /// Price this plan charges for the given program
    pub fn price_for(&self, program: &Program) -> i64 {
        match self {
            PaymentPlan::Quarterly => program.quarterly_price,
            PaymentPlan::Monthly => program.monthly_price,
        }
    }
}

impl FromStr for PaymentPlan {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentPlan::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownTag {
                kind: "payment plan",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    BankTransfer,
    EzCash,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Card,
        PaymentMethod::BankTransfer,
        PaymentMethod::EzCash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::EzCash => "ez_cash",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownTag {
                kind: "payment method",
                value: s.to_string(),
            })
    }
}

// ============================================================================
// PROGRAM (static catalog entry)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: String,
    pub name: String,
    pub age_range: String,
    pub description: String,
    pub monthly_price: i64,
    pub quarterly_price: i64,
    pub features: Vec<String>,
    pub program_type: ProgramType,
}

// ============================================================================
// ENROLLMENT
// ============================================================================

/// Validated enrollment submission.
///
/// `program_type` stays a raw tag here: an unknown program is a lookup miss
/// (404), not a malformed payload.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentCreate {
    pub student_full_name: String,
    pub parent_guardian_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub program_type: String,
    pub payment_plan: PaymentPlan,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: String,
    pub student_full_name: String,
    pub parent_guardian_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub program_type: ProgramType,
    pub payment_plan: PaymentPlan,
    pub payment_method: PaymentMethod,
    pub amount: i64,
    pub enrollment_date: DateTime<Utc>,
    #[serde(default = "default_status")]
    pub status: String,
}

impl Enrollment {
    /// Build a new pending enrollment priced against `program`
    pub fn new(input: EnrollmentCreate, program: &Program) -> Self {
        Enrollment {
            id: uuid::Uuid::new_v4().to_string(),
            student_full_name: input.student_full_name,
            parent_guardian_name: input.parent_guardian_name,
            email: input.email,
            phone: input.phone,
            address: input.address,
            program_type: program.program_type,
            payment_plan: input.payment_plan,
            payment_method: input.payment_method,
            amount: input.payment_plan.price_for(program),
            enrollment_date: Utc::now(),
            status: default_status(),
        }
    }
}

// ============================================================================
// CONSULTATION REQUEST
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ConsultationCreate {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub child_age_group: ProgramType,
    pub learning_goals: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultationRequest {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub child_age_group: ProgramType,
    pub learning_goals: String,
    pub request_date: DateTime<Utc>,
    #[serde(default = "default_status")]
    pub status: String,
}

impl ConsultationRequest {
    pub fn new(input: ConsultationCreate) -> Self {
        ConsultationRequest {
            id: uuid::Uuid::new_v4().to_string(),
            full_name: input.full_name,
            email: input.email,
            phone: input.phone,
            child_age_group: input.child_age_group,
            learning_goals: input.learning_goals,
            request_date: Utc::now(),
            status: default_status(),
        }
    }
}

fn default_status() -> String {
    STATUS_PENDING.to_string()
}

// ============================================================================
// STATISTICS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformStats {
    pub total_students: u64,
    pub success_rate: String,
    pub expert_educators: u32,
    pub support_hours: String,
    pub total_enrollments: u64,
    pub total_consultations: u64,
}

impl PlatformStats {
    /// Combine the live counts with the fixed marketing figures
    pub fn from_counts(total_enrollments: u64, total_consultations: u64) -> Self {
        PlatformStats {
            total_students: BASE_STUDENT_COUNT + total_enrollments,
            success_rate: SUCCESS_RATE.to_string(),
            expert_educators: EXPERT_EDUCATORS,
            support_hours: SUPPORT_HOURS.to_string(),
            total_enrollments,
            total_consultations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_program() -> Program {
        Program {
            id: "p-1".to_string(),
            name: "Smart Kids Mastery".to_string(),
            age_range: "Ages 10-12".to_string(),
            description: "Mastery Excellence".to_string(),
            monthly_price: 1500,
            quarterly_price: 5250,
            features: vec![],
            program_type: ProgramType::SmartKids,
        }
    }

    fn sample_input(plan: PaymentPlan) -> EnrollmentCreate {
        EnrollmentCreate {
            student_full_name: "Kavindu Perera".to_string(),
            parent_guardian_name: "Nimal Perera".to_string(),
            email: "nimal@example.com".to_string(),
            phone: "+94771234567".to_string(),
            address: "12 Galle Road, Colombo".to_string(),
            program_type: "smart_kids".to_string(),
            payment_plan: plan,
            payment_method: PaymentMethod::Card,
        }
    }

    #[test]
    fn test_enum_tags_round_trip_through_from_str() {
        for t in ProgramType::ALL {
            assert_eq!(t.as_str().parse::<ProgramType>().unwrap(), t);
        }
        for p in PaymentPlan::ALL {
            assert_eq!(p.as_str().parse::<PaymentPlan>().unwrap(), p);
        }
        for m in PaymentMethod::ALL {
            assert_eq!(m.as_str().parse::<PaymentMethod>().unwrap(), m);
        }
        assert!("unknown_program".parse::<ProgramType>().is_err());
        assert!("SmartKids".parse::<ProgramType>().is_err());
    }

    #[test]
    fn test_enum_serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_value(PaymentMethod::BankTransfer).unwrap(),
            serde_json::json!("bank_transfer")
        );
        let t: ProgramType = serde_json::from_value(serde_json::json!("future_leaders")).unwrap();
        assert_eq!(t, ProgramType::FutureLeaders);
    }

    #[test]
    fn test_price_for_plan() {
        let program = sample_program();
        assert_eq!(PaymentPlan::Monthly.price_for(&program), 1500);
        assert_eq!(PaymentPlan::Quarterly.price_for(&program), 5250);
    }

    #[test]
    fn test_new_enrollment_is_pending_and_priced() {
        let program = sample_program();
        let enrollment = Enrollment::new(sample_input(PaymentPlan::Quarterly), &program);

        assert_eq!(enrollment.amount, 5250);
        assert_eq!(enrollment.status, "pending");
        assert_eq!(enrollment.program_type, ProgramType::SmartKids);
        assert!(uuid::Uuid::parse_str(&enrollment.id).is_ok());
    }

    #[test]
    fn test_identical_enrollments_get_distinct_ids() {
        let program = sample_program();
        let a = Enrollment::new(sample_input(PaymentPlan::Monthly), &program);
        let b = Enrollment::new(sample_input(PaymentPlan::Monthly), &program);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_stored_document_without_status_defaults_to_pending() {
        let doc = serde_json::json!({
            "id": "c-1",
            "full_name": "Amara Silva",
            "email": "amara@example.com",
            "child_age_group": "tech_teens",
            "learning_goals": "Coding",
            "request_date": "2024-05-01T10:00:00Z"
        });
        let request: ConsultationRequest = serde_json::from_value(doc).unwrap();
        assert_eq!(request.status, "pending");
        assert_eq!(request.phone, None);
    }

    #[test]
    fn test_stats_from_counts() {
        let stats = PlatformStats::from_counts(3, 7);
        assert_eq!(stats.total_students, 10_003);
        assert_eq!(stats.total_enrollments, 3);
        assert_eq!(stats.total_consultations, 7);
        assert_eq!(stats.success_rate, "99%");
        assert_eq!(stats.expert_educators, 25);
        assert_eq!(stats.support_hours, "24/7");
    }
}
