use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::Args;
use nu_admissions::config::AppConfig;
use nu_admissions::error::AppError;
use nu_admissions::workflows::admissions::{
    combine, finalize_all, AcademicRecord, AdmissionsServiceError, Catalog, FeeApplication,
    FeeCalculator, GradeScale, IdentifierIssuer, IssueRequest, TranscriptImporter,
    ValidationView,
};

use crate::infra::parse_date;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Program identifier, e.g. bsc-cse
    #[arg(long)]
    pub(crate) program: String,
    /// Registration package applied to the application
    #[arg(long)]
    pub(crate) package: Option<String>,
    /// Waiver policy identifier (repeatable)
    #[arg(long = "policy")]
    pub(crate) policies: Vec<String>,
}

#[derive(Args, Debug)]
pub(crate) struct FirstSemesterArgs {
    /// Program identifier with a published syllabus
    #[arg(long)]
    pub(crate) program: String,
    /// Waiver policy identifier (repeatable)
    #[arg(long = "policy")]
    pub(crate) policies: Vec<String>,
}

#[derive(Args, Debug)]
pub(crate) struct IssueArgs {
    #[arg(long)]
    pub(crate) name: String,
    /// Program level, e.g. bachelor or masters
    #[arg(long)]
    pub(crate) program: String,
    #[arg(long)]
    pub(crate) department: String,
    #[arg(long)]
    pub(crate) year: u16,
    /// Sequence number within the program/department/year
    #[arg(long)]
    pub(crate) sequence: u32,
    /// Issue date (YYYY-MM-DD); defaults to today
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Identifier to check
    pub(crate) value: String,
}

#[derive(Args, Debug)]
pub(crate) struct TransferArgs {
    /// Transcript export with Code,Title,Credits,Grade,GPA columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    #[arg(long, default_value_t = 0)]
    pub(crate) completed_credits: u32,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) previous_cgpa: f64,
    /// Fill missing grade points from the UGC grade scale
    #[arg(long)]
    pub(crate) infer_grade_points: bool,
}

fn load_catalog() -> Result<Arc<Catalog>, AppError> {
    let config = AppConfig::load()?;
    Ok(Arc::new(config.catalog.load()?))
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let calculator = FeeCalculator::new(load_catalog()?);
    let application = FeeApplication {
        program_id: args.program,
        package_id: args.package,
        waiver_policy_ids: args.policies.into_iter().collect(),
    };

    let quote = calculator
        .quote(&application)
        .map_err(AdmissionsServiceError::from)?;

    println!("Fee quote for {}", quote.program_id);
    println!("  Base amount:  {} BDT", quote.breakdown.base_amount);
    println!("  Waiver:       {}%", quote.breakdown.waiver_percentage);
    println!("  Waiver value: {} BDT", quote.breakdown.waiver_amount);
    println!("  Payable:      {} BDT", quote.breakdown.final_amount);
    println!();
    println!("{}", serde_json::to_string_pretty(&quote)?);
    Ok(())
}

pub(crate) fn run_first_semester(args: FirstSemesterArgs) -> Result<(), AppError> {
    let calculator = FeeCalculator::new(load_catalog()?);
    let percentage = calculator.resolver().resolve(&args.policies);
    let fee = calculator
        .first_semester(&args.program, percentage)
        .map_err(AdmissionsServiceError::from)?;

    match &fee.package_code {
        Some(code) => println!("First semester for {} ({code})", args.program),
        None => println!("No syllabus published for {}", args.program),
    }
    for course in &fee.courses {
        let lab = if course.is_lab { " [lab]" } else { "" };
        println!("  {:<8} {:<40} {} cr{lab}", course.code, course.title, course.credits);
    }
    println!("  Subtotal:    {} BDT", fee.subtotal);
    println!("  Waiver:      {}% ({} BDT)", fee.waiver_percentage, fee.waiver_amount);
    println!("  Grand total: {} BDT", fee.grand_total);
    println!();
    println!("{}", serde_json::to_string_pretty(&fee)?);
    Ok(())
}

pub(crate) fn run_issue_identifiers(args: IssueArgs) -> Result<(), AppError> {
    let issuer = IdentifierIssuer::new(load_catalog()?);
    let issued_on = args.date.unwrap_or_else(|| Local::now().date_naive());
    let pair = issuer
        .issue(
            &IssueRequest {
                student_name: args.name,
                program: args.program,
                department: args.department,
                year: args.year,
                sequence: args.sequence,
            },
            issued_on,
        )
        .map_err(AdmissionsServiceError::from)?;

    println!("University ID: {}", pair.university_id);
    println!("UGC ID:        {}", pair.ugc_id);
    println!("Batch:         {}", pair.batch);
    println!();
    println!("{}", serde_json::to_string_pretty(&pair)?);
    Ok(())
}

pub(crate) fn run_check_identifier(args: CheckArgs) -> Result<(), AppError> {
    let view = ValidationView::inspect(args.value.trim());
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

pub(crate) fn run_transfer_combine(args: TransferArgs) -> Result<(), AppError> {
    let existing = AcademicRecord {
        completed_credits: args.completed_credits,
        previous_cgpa: args.previous_cgpa,
    };
    existing.validate().map_err(AdmissionsServiceError::from)?;

    let staged = TranscriptImporter::from_path(&args.csv)?;
    let scale = args.infer_grade_points.then(GradeScale::ugc);
    let courses =
        finalize_all(&staged, scale.as_ref()).map_err(AdmissionsServiceError::from)?;
    let summary = combine(&courses, &existing).map_err(AdmissionsServiceError::from)?;

    println!(
        "Transferred {} credits across {} courses",
        summary.transfer_credits,
        courses.len()
    );
    println!(
        "Combined: {} credits, CGPA {:.2}",
        summary.combined_credits, summary.combined_cgpa
    );
    println!();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
