use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Grouping used when waiver policies are presented to applicants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaiverCategory {
    Result,
    Special,
    Additional,
}

/// A named, stackable tuition discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaiverPolicy {
    pub id: String,
    pub percentage: u8,
    pub category: WaiverCategory,
}

/// Itemised program cost. `total` is checked against the items at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostStructure {
    pub admission_fee: u64,
    pub course_fee: u64,
    pub lab_fee: u64,
    pub others: u64,
    pub total: u64,
}

impl CostStructure {
    /// Sum of the line items, or `None` if it does not fit in a `u64`.
    pub fn itemised_sum(&self) -> Option<u64> {
        self.admission_fee
            .checked_add(self.course_fee)?
            .checked_add(self.lab_fee)?
            .checked_add(self.others)
    }
}

/// Pre-priced term bundle that replaces the program cost structure once applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPackage {
    pub id: String,
    pub program_id: String,
    pub credits: u32,
    pub per_credit: u64,
    pub fixed_fees: u64,
    pub total_estimated: u64,
}

/// A degree offering an applicant can be admitted into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramOffering {
    pub id: String,
    pub name: String,
    /// Program level key, e.g. `bachelor` or `masters`.
    pub level: String,
    pub department: String,
    pub cost_structure: CostStructure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyllabusCourse {
    pub code: String,
    pub title: String,
    pub credits: u32,
    #[serde(default)]
    pub is_lab: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyllabusTerm {
    pub term: u8,
    pub courses: Vec<SyllabusCourse>,
}

/// Per-credit fee schedule and term plan for a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Syllabus {
    pub program_id: String,
    pub package_code: String,
    pub admission_fee: u64,
    pub per_credit_fee: u64,
    pub lab_fee_per_course: u64,
    pub other_fees: u64,
    pub terms: Vec<SyllabusTerm>,
}

/// Charges for one term of a syllabus, before any waiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TermCharges {
    pub tuition_fee: u64,
    pub lab_fee: u64,
    pub subtotal: u64,
}

impl Syllabus {
    pub fn term(&self, term: u8) -> Option<&SyllabusTerm> {
        self.terms.iter().find(|candidate| candidate.term == term)
    }

    /// Tuition is credits times the per-credit fee, lab is lab courses times
    /// the lab fee. `None` when any amount overflows.
    pub fn term_charges(&self, courses: &[SyllabusCourse]) -> Option<TermCharges> {
        let credits = courses
            .iter()
            .try_fold(0u64, |total, course| total.checked_add(u64::from(course.credits)))?;
        let lab_courses = courses.iter().filter(|course| course.is_lab).count() as u64;

        let tuition_fee = credits.checked_mul(self.per_credit_fee)?;
        let lab_fee = lab_courses.checked_mul(self.lab_fee_per_course)?;
        let subtotal = self
            .admission_fee
            .checked_add(tuition_fee)?
            .checked_add(lab_fee)?
            .checked_add(self.other_fees)?;

        Some(TermCharges {
            tuition_fee,
            lab_fee,
            subtotal,
        })
    }
}

/// Single-letter code and nominal length for a program level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramLevelCode {
    pub code: String,
    pub duration_years: u16,
}

/// Read-only registry shared by every engine component.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub policies: Vec<WaiverPolicy>,
    #[serde(default)]
    pub programs: Vec<ProgramOffering>,
    #[serde(default)]
    pub packages: Vec<RegistrationPackage>,
    #[serde(default)]
    pub syllabi: Vec<Syllabus>,
    #[serde(default)]
    pub program_levels: BTreeMap<String, ProgramLevelCode>,
    #[serde(default)]
    pub departments: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("cost structure for program {program_id} totals {declared}, items sum to {itemised}")]
    CostStructureMismatch {
        program_id: String,
        declared: u64,
        itemised: u64,
    },
    #[error("waiver policy {id} grants {percentage}%, maximum is 100%")]
    PolicyPercentageOutOfRange { id: String, percentage: u8 },
    #[error("waiver policy {0} is defined more than once")]
    DuplicatePolicy(String),
    #[error("amounts for {0} overflow")]
    AmountOverflow(String),
    #[error("{kind} key '{key}' must be trimmed lowercase")]
    InvalidKey { kind: &'static str, key: String },
    #[error("{kind} code '{code}' for {key} must be {expected} uppercase ASCII letter(s)")]
    InvalidCode {
        kind: &'static str,
        key: String,
        code: String,
        expected: usize,
    },
}

impl Catalog {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_reader(reader)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Checks the invariants every catalog entry must satisfy before use.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = BTreeSet::new();
        for policy in &self.policies {
            if policy.percentage > 100 {
                return Err(CatalogError::PolicyPercentageOutOfRange {
                    id: policy.id.clone(),
                    percentage: policy.percentage,
                });
            }
            if !seen.insert(policy.id.as_str()) {
                return Err(CatalogError::DuplicatePolicy(policy.id.clone()));
            }
        }

        for program in &self.programs {
            let itemised = program
                .cost_structure
                .itemised_sum()
                .ok_or_else(|| CatalogError::AmountOverflow(program.id.clone()))?;
            if itemised != program.cost_structure.total {
                return Err(CatalogError::CostStructureMismatch {
                    program_id: program.id.clone(),
                    declared: program.cost_structure.total,
                    itemised,
                });
            }
        }

        for syllabus in &self.syllabi {
            for term in &syllabus.terms {
                if syllabus.term_charges(&term.courses).is_none() {
                    return Err(CatalogError::AmountOverflow(format!(
                        "{} term {}",
                        syllabus.program_id, term.term
                    )));
                }
            }
        }

        for (level, entry) in &self.program_levels {
            check_key("program", level)?;
            check_code("program", level, &entry.code, 1)?;
        }
        for (department, code) in &self.departments {
            check_key("department", department)?;
            check_code("department", department, code, 2)?;
        }

        Ok(())
    }

    pub fn policy(&self, id: &str) -> Option<&WaiverPolicy> {
        self.policies.iter().find(|policy| policy.id == id)
    }

    pub fn program(&self, id: &str) -> Option<&ProgramOffering> {
        self.programs.iter().find(|program| program.id == id)
    }

    pub fn package(&self, id: &str) -> Option<&RegistrationPackage> {
        self.packages.iter().find(|package| package.id == id)
    }

    pub fn syllabus_for(&self, program_id: &str) -> Option<&Syllabus> {
        self.syllabi
            .iter()
            .find(|syllabus| syllabus.program_id == program_id)
    }

    pub fn program_level(&self, level: &str) -> Option<&ProgramLevelCode> {
        self.program_levels.get(&level.to_ascii_lowercase())
    }

    pub fn department_code(&self, department: &str) -> Option<&str> {
        self.departments
            .get(&department.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Catalog shipped with the service when no override file is configured.
    pub fn standard() -> Self {
        Self {
            policies: standard_policies(),
            programs: standard_programs(),
            packages: vec![
                RegistrationPackage {
                    id: "bsc-cse-spring-2025".to_string(),
                    program_id: "bsc-cse".to_string(),
                    credits: 15,
                    per_credit: 5_500,
                    fixed_fees: 17_500,
                    total_estimated: 100_000,
                },
                RegistrationPackage {
                    id: "bba-fall-2025".to_string(),
                    program_id: "bba".to_string(),
                    credits: 12,
                    per_credit: 5_000,
                    fixed_fees: 15_000,
                    total_estimated: 75_000,
                },
            ],
            syllabi: vec![bsc_cse_syllabus()],
            program_levels: [
                ("bachelor", "B", 4),
                ("masters", "M", 2),
                ("mba", "A", 2),
                ("diploma", "D", 1),
            ]
            .into_iter()
            .map(|(level, code, duration_years)| {
                (
                    level.to_string(),
                    ProgramLevelCode {
                        code: code.to_string(),
                        duration_years,
                    },
                )
            })
            .collect(),
            departments: [
                ("cse", "CS"),
                ("eee", "EE"),
                ("civil", "CE"),
                ("bba", "BA"),
                ("english", "EN"),
                ("law", "LW"),
                ("pharmacy", "PH"),
                ("economics", "EC"),
            ]
            .into_iter()
            .map(|(department, code)| (department.to_string(), code.to_string()))
            .collect(),
        }
    }
}

// Lookups lowercase their input, so a key in any other form is unreachable.
fn check_key(kind: &'static str, key: &str) -> Result<(), CatalogError> {
    if !key.is_empty() && key.trim() == key && key.to_ascii_lowercase() == key {
        Ok(())
    } else {
        Err(CatalogError::InvalidKey {
            kind,
            key: key.to_string(),
        })
    }
}

fn check_code(
    kind: &'static str,
    key: &str,
    code: &str,
    expected: usize,
) -> Result<(), CatalogError> {
    if code.len() == expected && code.bytes().all(|byte| byte.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(CatalogError::InvalidCode {
            kind,
            key: key.to_string(),
            code: code.to_string(),
            expected,
        })
    }
}

fn standard_policies() -> Vec<WaiverPolicy> {
    use WaiverCategory::{Additional, Result, Special};

    [
        ("result_100", 70, Result),
        ("result_90", 50, Result),
        ("result_80", 30, Result),
        ("result_70", 15, Result),
        ("freedom_fighter", 50, Special),
        ("tribal", 25, Special),
        ("disability", 50, Special),
        ("sibling", 20, Additional),
        ("spouse", 15, Additional),
        ("female", 10, Additional),
    ]
    .into_iter()
    .map(|(id, percentage, category)| WaiverPolicy {
        id: id.to_string(),
        percentage,
        category,
    })
    .collect()
}

fn standard_programs() -> Vec<ProgramOffering> {
    vec![
        ProgramOffering {
            id: "bsc-cse".to_string(),
            name: "B.Sc. in Computer Science & Engineering".to_string(),
            level: "bachelor".to_string(),
            department: "cse".to_string(),
            cost_structure: CostStructure {
                admission_fee: 25_000,
                course_fee: 650_000,
                lab_fee: 60_000,
                others: 15_000,
                total: 750_000,
            },
        },
        ProgramOffering {
            id: "bsc-eee".to_string(),
            name: "B.Sc. in Electrical & Electronic Engineering".to_string(),
            level: "bachelor".to_string(),
            department: "eee".to_string(),
            cost_structure: CostStructure {
                admission_fee: 25_000,
                course_fee: 600_000,
                lab_fee: 55_000,
                others: 15_000,
                total: 695_000,
            },
        },
        ProgramOffering {
            id: "bba".to_string(),
            name: "Bachelor of Business Administration".to_string(),
            level: "bachelor".to_string(),
            department: "bba".to_string(),
            cost_structure: CostStructure {
                admission_fee: 20_000,
                course_fee: 520_000,
                lab_fee: 0,
                others: 10_000,
                total: 550_000,
            },
        },
        ProgramOffering {
            id: "mba".to_string(),
            name: "Master of Business Administration".to_string(),
            level: "mba".to_string(),
            department: "bba".to_string(),
            cost_structure: CostStructure {
                admission_fee: 15_000,
                course_fee: 280_000,
                lab_fee: 0,
                others: 5_000,
                total: 300_000,
            },
        },
        ProgramOffering {
            id: "ma-english".to_string(),
            name: "M.A. in English".to_string(),
            level: "masters".to_string(),
            department: "english".to_string(),
            cost_structure: CostStructure {
                admission_fee: 12_000,
                course_fee: 150_000,
                lab_fee: 0,
                others: 3_000,
                total: 165_000,
            },
        },
    ]
}

fn bsc_cse_syllabus() -> Syllabus {
    let course = |code: &str, title: &str, credits: u32, is_lab: bool| SyllabusCourse {
        code: code.to_string(),
        title: title.to_string(),
        credits,
        is_lab,
    };

    Syllabus {
        program_id: "bsc-cse".to_string(),
        package_code: "CSE-T1".to_string(),
        admission_fee: 25_000,
        per_credit_fee: 5_500,
        lab_fee_per_course: 3_000,
        other_fees: 5_000,
        terms: vec![
            SyllabusTerm {
                term: 1,
                courses: vec![
                    course("CSE101", "Structured Programming", 3, false),
                    course("CSE102", "Structured Programming Lab", 1, true),
                    course("MAT101", "Differential Calculus", 3, false),
                    course("PHY101", "Physics I", 3, false),
                    course("PHY102", "Physics I Lab", 1, true),
                    course("ENG101", "English Composition", 3, false),
                ],
            },
            SyllabusTerm {
                term: 2,
                courses: vec![
                    course("CSE103", "Discrete Mathematics", 3, false),
                    course("CSE104", "Data Structures", 3, false),
                    course("CSE105", "Data Structures Lab", 1, true),
                ],
            },
        ],
    }
}
