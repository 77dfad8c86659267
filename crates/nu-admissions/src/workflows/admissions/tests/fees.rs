use std::sync::Arc;

use super::common::*;
use crate::workflows::admissions::catalog::Catalog;
use crate::workflows::admissions::fees::{
    compute_fee, FeeApplication, FeeBasis, FeeBreakdown, FeeCalculator, FeeError,
    FirstSemesterFee,
};

fn application(program_id: &str, package_id: Option<&str>, policies: &[&str]) -> FeeApplication {
    FeeApplication {
        program_id: program_id.to_string(),
        package_id: package_id.map(str::to_string),
        waiver_policy_ids: policies.iter().map(|id| id.to_string()).collect(),
    }
}

#[test]
fn ninety_percent_waiver_on_one_lakh() {
    let percentage = resolver().resolve(["result_100", "sibling"]);
    let breakdown = compute_fee(100_000, percentage);

    assert_eq!(
        breakdown,
        FeeBreakdown {
            base_amount: 100_000,
            waiver_percentage: 90,
            waiver_amount: 90_000,
            final_amount: 10_000,
        }
    );
}

#[test]
fn full_waiver_leaves_nothing_payable() {
    let percentage = resolver().resolve(["result_100", "sibling", "freedom_fighter"]);
    let breakdown = compute_fee(50_000, percentage);

    assert_eq!(breakdown.waiver_amount, 50_000);
    assert_eq!(breakdown.final_amount, 0);
}

#[test]
fn repeated_calls_are_identical() {
    assert_eq!(compute_fee(123_457, 35), compute_fee(123_457, 35));
}

#[test]
fn waiver_rounds_half_up() {
    let below_half = compute_fee(999, 15);
    assert_eq!(below_half.waiver_amount, 150);
    assert_eq!(below_half.final_amount, 849);

    let exact_half = compute_fee(1_001, 50);
    assert_eq!(exact_half.waiver_amount, 501);
    assert_eq!(exact_half.final_amount, 500);
}

#[test]
fn out_of_range_percentage_is_treated_as_full_waiver() {
    let breakdown = compute_fee(1_000, 150);
    assert_eq!(breakdown.waiver_percentage, 100);
    assert_eq!(breakdown.final_amount, 0);
}

#[test]
fn zero_base_amount_yields_zero_bill() {
    assert_eq!(
        compute_fee(0, 70),
        FeeBreakdown {
            base_amount: 0,
            waiver_percentage: 70,
            waiver_amount: 0,
            final_amount: 0,
        }
    );
}

#[test]
fn applied_package_takes_precedence_over_cost_structure() {
    let quote = calculator()
        .quote(&application(
            "bsc-cse",
            Some("bsc-cse-spring-2025"),
            &["result_100", "sibling"],
        ))
        .expect("quote builds");

    assert_eq!(
        quote.basis,
        FeeBasis::Package {
            package_id: "bsc-cse-spring-2025".to_string(),
            amount: 100_000,
        }
    );
    assert_eq!(quote.breakdown.base_amount, 100_000);
    assert_eq!(quote.breakdown.final_amount, 10_000);
}

#[test]
fn cost_structure_total_is_used_without_package() {
    let quote = calculator()
        .quote(&application("bba", None, &["female"]))
        .expect("quote builds");

    assert_eq!(
        quote.basis,
        FeeBasis::CostStructure {
            program_id: "bba".to_string(),
            amount: 550_000,
        }
    );
    assert_eq!(quote.breakdown.waiver_amount, 55_000);
    assert_eq!(quote.breakdown.final_amount, 495_000);
}

#[test]
fn quote_rejects_unknown_lookups() {
    let calculator = calculator();

    assert!(matches!(
        calculator.quote(&application("bsc-physics", None, &[])),
        Err(FeeError::UnknownProgram(id)) if id == "bsc-physics"
    ));
    assert!(matches!(
        calculator.quote(&application("bsc-cse", Some("summer-2030"), &[])),
        Err(FeeError::UnknownPackage(id)) if id == "summer-2030"
    ));
    assert!(matches!(
        calculator.quote(&application("bsc-cse", Some("bba-fall-2025"), &[])),
        Err(FeeError::PackageProgramMismatch { .. })
    ));
}

#[test]
fn first_semester_fee_follows_syllabus_schedule() {
    let fee = calculator()
        .first_semester("bsc-cse", 0)
        .expect("fee computes");

    assert_eq!(fee.admission_fee, 25_000);
    assert_eq!(fee.tuition_fee, 14 * 5_500);
    assert_eq!(fee.lab_fee, 2 * 3_000);
    assert_eq!(fee.other_fees, 5_000);
    assert_eq!(fee.subtotal, 113_000);
    assert_eq!(fee.waiver_amount, 0);
    assert_eq!(fee.grand_total, 113_000);
    assert_eq!(fee.courses.len(), 6);
    assert_eq!(fee.package_code.as_deref(), Some("CSE-T1"));
}

#[test]
fn first_semester_fee_applies_waiver_to_subtotal() {
    let fee = calculator()
        .first_semester("bsc-cse", 20)
        .expect("fee computes");

    assert_eq!(fee.waiver_percentage, 20);
    assert_eq!(fee.waiver_amount, 22_600);
    assert_eq!(fee.grand_total, 90_400);
}

#[test]
fn first_semester_fee_is_zero_without_syllabus() {
    assert_eq!(
        calculator().first_semester("bba", 50).expect("fee computes"),
        FirstSemesterFee::default()
    );
    assert_eq!(
        calculator()
            .first_semester("unknown-program", 0)
            .expect("fee computes"),
        FirstSemesterFee::default()
    );
}

#[test]
fn first_semester_fee_reports_overflowing_schedule() {
    // Built by hand, so the load-time overflow check never ran.
    let mut catalog = Catalog::standard();
    catalog.syllabi[0].lab_fee_per_course = u64::MAX;
    let calculator = FeeCalculator::new(Arc::new(catalog));

    assert!(matches!(
        calculator.first_semester("bsc-cse", 0),
        Err(FeeError::AmountOverflow(id)) if id == "bsc-cse"
    ));
}
