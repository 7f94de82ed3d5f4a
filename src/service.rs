// TecaiKids API - Core Operations
// Catalog lookup, enrollment/consultation creation, listings and stats.
// Each operation touches at most one collection per step; nothing is retried.

use serde_json::Value;
use tracing::{debug, info};

use crate::catalog::ProgramCatalog;
use crate::error::{ApiError, ApiResult};
use crate::models::{ConsultationRequest, Enrollment, PlatformStats, Program};
use crate::store::{self, DocumentStore, CONSULTATIONS, ENROLLMENTS, LIST_LIMIT};
use crate::validation;

// ============================================================================
// PROGRAMS
// ============================================================================

pub fn get_program<'a>(catalog: &'a ProgramCatalog, tag: &str) -> ApiResult<&'a Program> {
    catalog.find_by_tag(tag).ok_or_else(ApiError::program_not_found)
}

// ============================================================================
// ENROLLMENTS
// ============================================================================

/// Validate, price and persist an enrollment.
///
/// Validation and the program lookup both happen before anything is written.
pub fn create_enrollment(
    catalog: &ProgramCatalog,
    store: &dyn DocumentStore,
    body: &Value,
) -> ApiResult<Enrollment> {
    let input = validation::parse_enrollment(body).map_err(ApiError::Validation)?;
    let program = get_program(catalog, &input.program_type)?;

    let enrollment = Enrollment::new(input, program);
    store::insert_record(store, ENROLLMENTS, &enrollment)?;

    info!(
        id = %enrollment.id,
        program_type = enrollment.program_type.as_str(),
        payment_plan = enrollment.payment_plan.as_str(),
        amount = enrollment.amount,
        "enrollment created"
    );
    Ok(enrollment)
}

pub fn list_enrollments(store: &dyn DocumentStore) -> ApiResult<Vec<Enrollment>> {
    let enrollments: Vec<Enrollment> = store::find_records(store, ENROLLMENTS, LIST_LIMIT)?;
    debug!(count = enrollments.len(), "listed enrollments");
    Ok(enrollments)
}

// ============================================================================
// CONSULTATIONS
// ============================================================================

pub fn create_consultation(
    store: &dyn DocumentStore,
    body: &Value,
) -> ApiResult<ConsultationRequest> {
    let input = validation::parse_consultation(body).map_err(ApiError::Validation)?;

    let consultation = ConsultationRequest::new(input);
    store::insert_record(store, CONSULTATIONS, &consultation)?;

    info!(
        id = %consultation.id,
        child_age_group = consultation.child_age_group.as_str(),
        "consultation request created"
    );
    Ok(consultation)
}

pub fn list_consultations(store: &dyn DocumentStore) -> ApiResult<Vec<ConsultationRequest>> {
    let consultations: Vec<ConsultationRequest> =
        store::find_records(store, CONSULTATIONS, LIST_LIMIT)?;
    debug!(count = consultations.len(), "listed consultations");
    Ok(consultations)
}

// ============================================================================
// STATISTICS
// ============================================================================

pub fn platform_stats(store: &dyn DocumentStore) -> ApiResult<PlatformStats> {
    let total_enrollments = store.count_documents(ENROLLMENTS)?;
    let total_consultations = store.count_documents(CONSULTATIONS)?;

    Ok(PlatformStats::from_counts(total_enrollments, total_consultations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProgramType;
    use crate::store::{MemoryStore, SqliteStore};
    use serde_json::json;

    fn enrollment_body(program_type: &str, plan: &str) -> Value {
        json!({
            "student_full_name": "Kavindu Perera",
            "parent_guardian_name": "Nimal Perera",
            "email": "nimal@example.com",
            "phone": "+94771234567",
            "address": "12 Galle Road, Colombo",
            "program_type": program_type,
            "payment_plan": plan,
            "payment_method": "bank_transfer"
        })
    }

    fn consultation_body() -> Value {
        json!({
            "full_name": "Amara Silva",
            "email": "amara@example.com",
            "child_age_group": "little_learners",
            "learning_goals": "Early reading"
        })
    }

    #[test]
    fn test_get_program_hit_and_miss() {
        let catalog = ProgramCatalog::new();

        let program = get_program(&catalog, "future_leaders").unwrap();
        assert_eq!(program.program_type, ProgramType::FutureLeaders);

        let err = get_program(&catalog, "unknown_program").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_enrollment_amount_follows_plan() {
        let catalog = ProgramCatalog::new();
        let store = MemoryStore::new();

        let monthly = create_enrollment(&catalog, &store, &enrollment_body("smart_kids", "monthly")).unwrap();
        let quarterly = create_enrollment(&catalog, &store, &enrollment_body("smart_kids", "quarterly")).unwrap();

        assert_eq!(monthly.amount, 1500);
        assert_eq!(quarterly.amount, 5250);
    }

    #[test]
    fn test_enrollment_amount_matches_catalog_for_every_program() {
        let catalog = ProgramCatalog::new();
        let store = MemoryStore::new();

        for program in catalog.all() {
            let tag = program.program_type.as_str();
            let monthly = create_enrollment(&catalog, &store, &enrollment_body(tag, "monthly")).unwrap();
            let quarterly = create_enrollment(&catalog, &store, &enrollment_body(tag, "quarterly")).unwrap();

            assert_eq!(monthly.amount, program.monthly_price);
            assert_eq!(quarterly.amount, program.quarterly_price);
        }
        assert_eq!(store.count_documents(ENROLLMENTS).unwrap(), 10);
    }

    #[test]
    fn test_unknown_program_persists_nothing() {
        let catalog = ProgramCatalog::new();
        let store = MemoryStore::new();

        let err = create_enrollment(&catalog, &store, &enrollment_body("unknown_program", "monthly"))
            .unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(store.count_documents(ENROLLMENTS).unwrap(), 0);
    }

    #[test]
    fn test_invalid_email_persists_nothing() {
        let catalog = ProgramCatalog::new();
        let store = MemoryStore::new();

        let mut enrollment = enrollment_body("smart_kids", "monthly");
        enrollment["email"] = json!("not-an-email");
        let mut consultation = consultation_body();
        consultation["email"] = json!("not-an-email");

        assert!(matches!(
            create_enrollment(&catalog, &store, &enrollment),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            create_consultation(&store, &consultation),
            Err(ApiError::Validation(_))
        ));
        assert_eq!(store.count_documents(ENROLLMENTS).unwrap(), 0);
        assert_eq!(store.count_documents(CONSULTATIONS).unwrap(), 0);
    }

    #[test]
    fn test_identical_submissions_are_not_deduplicated() {
        let catalog = ProgramCatalog::new();
        let store = SqliteStore::open_in_memory().unwrap();
        let body = enrollment_body("tech_teens", "monthly");

        let first = create_enrollment(&catalog, &store, &body).unwrap();
        let second = create_enrollment(&catalog, &store, &body).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(list_enrollments(&store).unwrap().len(), 2);
    }

    #[test]
    fn test_listing_returns_persisted_records() {
        let catalog = ProgramCatalog::new();
        let store = SqliteStore::open_in_memory().unwrap();

        let created = create_enrollment(&catalog, &store, &enrollment_body("young_explorers", "quarterly")).unwrap();
        let consultation = create_consultation(&store, &consultation_body()).unwrap();

        assert_eq!(list_enrollments(&store).unwrap(), vec![created]);
        assert_eq!(list_consultations(&store).unwrap(), vec![consultation]);
    }

    #[test]
    fn test_enrollment_listing_is_capped_at_limit() {
        let catalog = ProgramCatalog::new();
        let store = MemoryStore::new();
        let total = LIST_LIMIT + 5;

        for _ in 0..total {
            create_enrollment(&catalog, &store, &enrollment_body("little_learners", "monthly")).unwrap();
        }

        assert_eq!(list_enrollments(&store).unwrap().len(), LIST_LIMIT);

        let stats = platform_stats(&store).unwrap();
        assert_eq!(stats.total_enrollments, total as u64);
        assert_eq!(stats.total_students, 10_000 + total as u64);
    }

    #[test]
    fn test_consultation_listing_is_capped_at_limit() {
        let store = SqliteStore::open_in_memory().unwrap();
        let total = LIST_LIMIT + 1;

        let mut first_id = String::new();
        for i in 0..total {
            let created = create_consultation(&store, &consultation_body()).unwrap();
            if i == 0 {
                first_id = created.id;
            }
        }

        let listed = list_consultations(&store).unwrap();
        assert_eq!(listed.len(), LIST_LIMIT);
        // oldest records come first
        assert_eq!(listed[0].id, first_id);
        assert_eq!(platform_stats(&store).unwrap().total_consultations, total as u64);
    }

    #[test]
    fn test_stats_track_live_counts() {
        let catalog = ProgramCatalog::new();
        let store = MemoryStore::new();

        let empty = platform_stats(&store).unwrap();
        assert_eq!(empty.total_students, 10_000);
        assert_eq!(empty.total_enrollments, 0);

        for _ in 0..3 {
            create_enrollment(&catalog, &store, &enrollment_body("smart_kids", "monthly")).unwrap();
        }
        create_consultation(&store, &consultation_body()).unwrap();

        let stats = platform_stats(&store).unwrap();
        assert_eq!(stats.total_enrollments, 3);
        assert_eq!(stats.total_consultations, 1);
        assert_eq!(stats.total_students, 10_000 + stats.total_enrollments);
    }
}
