use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::catalog::{Catalog, SyllabusCourse};
use super::waiver::{WaiverResolver, MAX_WAIVER_PERCENTAGE};

/// Derived bill for a base amount and a resolved waiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub base_amount: u64,
    pub waiver_percentage: u8,
    pub waiver_amount: u64,
    pub final_amount: u64,
}

/// Applies a waiver percentage to a base amount.
///
/// Amounts are whole taka. The waiver is rounded half up:
/// `(base * pct + 50) / 100`. Percentages above 100 are treated as 100 so
/// the payable amount never goes below zero.
pub fn compute_fee(base_amount: u64, waiver_percentage: u8) -> FeeBreakdown {
    let waiver_percentage = waiver_percentage.min(MAX_WAIVER_PERCENTAGE);
    let scaled = u128::from(base_amount) * u128::from(waiver_percentage) + 50;
    let waiver_amount = (scaled / 100) as u64;

    FeeBreakdown {
        base_amount,
        waiver_percentage,
        waiver_amount,
        final_amount: base_amount - waiver_amount,
    }
}

/// Fee request for a single application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeApplication {
    pub program_id: String,
    /// Registration package applied to the application, if any.
    #[serde(default)]
    pub package_id: Option<String>,
    #[serde(default)]
    pub waiver_policy_ids: BTreeSet<String>,
}

/// Where the base amount of a quote came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum FeeBasis {
    Package { package_id: String, amount: u64 },
    CostStructure { program_id: String, amount: u64 },
}

impl FeeBasis {
    pub fn amount(&self) -> u64 {
        match self {
            FeeBasis::Package { amount, .. } | FeeBasis::CostStructure { amount, .. } => *amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeQuote {
    pub program_id: String,
    pub basis: FeeBasis,
    pub breakdown: FeeBreakdown,
}

/// First-semester bill derived from a syllabus fee schedule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FirstSemesterFee {
    pub admission_fee: u64,
    pub tuition_fee: u64,
    pub lab_fee: u64,
    pub other_fees: u64,
    pub subtotal: u64,
    pub waiver_percentage: u8,
    pub waiver_amount: u64,
    pub grand_total: u64,
    pub courses: Vec<SyllabusCourse>,
    pub package_code: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum FeeError {
    #[error("unknown program {0}")]
    UnknownProgram(String),
    #[error("unknown registration package {0}")]
    UnknownPackage(String),
    #[error("registration package {package_id} belongs to program {package_program}, not {program_id}")]
    PackageProgramMismatch {
        package_id: String,
        package_program: String,
        program_id: String,
    },
    #[error("fee amounts for program {0} overflow")]
    AmountOverflow(String),
}

const FIRST_TERM: u8 = 1;

/// Fee calculator bound to a catalog snapshot.
#[derive(Debug, Clone)]
pub struct FeeCalculator {
    catalog: Arc<Catalog>,
    resolver: WaiverResolver,
}

impl FeeCalculator {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let resolver = WaiverResolver::new(catalog.clone());
        Self { catalog, resolver }
    }

    pub fn resolver(&self) -> &WaiverResolver {
        &self.resolver
    }

    /// Picks the base amount for an application. An applied package always
    /// wins over the program cost structure.
    pub fn basis_for(&self, application: &FeeApplication) -> Result<FeeBasis, FeeError> {
        let program = self
            .catalog
            .program(&application.program_id)
            .ok_or_else(|| FeeError::UnknownProgram(application.program_id.clone()))?;

        if let Some(package_id) = &application.package_id {
            let package = self
                .catalog
                .package(package_id)
                .ok_or_else(|| FeeError::UnknownPackage(package_id.clone()))?;
            if package.program_id != program.id {
                return Err(FeeError::PackageProgramMismatch {
                    package_id: package.id.clone(),
                    package_program: package.program_id.clone(),
                    program_id: program.id.clone(),
                });
            }
            return Ok(FeeBasis::Package {
                package_id: package.id.clone(),
                amount: package.total_estimated,
            });
        }

        Ok(FeeBasis::CostStructure {
            program_id: program.id.clone(),
            amount: program.cost_structure.total,
        })
    }

    pub fn quote(&self, application: &FeeApplication) -> Result<FeeQuote, FeeError> {
        let basis = self.basis_for(application)?;
        let percentage = self.resolver.resolve(&application.waiver_policy_ids);
        let breakdown = compute_fee(basis.amount(), percentage);

        Ok(FeeQuote {
            program_id: application.program_id.clone(),
            basis,
            breakdown,
        })
    }

    /// Bills the first term of a program from its syllabus. A program without
    /// a syllabus yields an all-zero bill.
    pub fn first_semester(
        &self,
        program_id: &str,
        waiver_percentage: u8,
    ) -> Result<FirstSemesterFee, FeeError> {
        let Some(syllabus) = self.catalog.syllabus_for(program_id) else {
            warn!(program_id, "no syllabus found, returning zero first-semester fee");
            return Ok(FirstSemesterFee::default());
        };

        let courses = syllabus
            .term(FIRST_TERM)
            .map(|term| term.courses.clone())
            .unwrap_or_default();

        let charges = syllabus
            .term_charges(&courses)
            .ok_or_else(|| FeeError::AmountOverflow(program_id.to_string()))?;
        let breakdown = compute_fee(charges.subtotal, waiver_percentage);

        Ok(FirstSemesterFee {
            admission_fee: syllabus.admission_fee,
            tuition_fee: charges.tuition_fee,
            lab_fee: charges.lab_fee,
            other_fees: syllabus.other_fees,
            subtotal: charges.subtotal,
            waiver_percentage: breakdown.waiver_percentage,
            waiver_amount: breakdown.waiver_amount,
            grand_total: breakdown.final_amount,
            courses,
            package_code: Some(syllabus.package_code.clone()),
        })
    }
}
