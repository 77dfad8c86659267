use crate::commands::{
    run_check_identifier, run_first_semester, run_issue_identifiers, run_quote,
    run_transfer_combine, CheckArgs, FirstSemesterArgs, IssueArgs, QuoteArgs, TransferArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use nu_admissions::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Admissions Engine",
    about = "Serve or exercise the admissions fee, waiver and identifier engine",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Waiver and tuition calculations
    Fees {
        #[command(subcommand)]
        command: FeesCommand,
    },
    /// Student identifier issuance and checks
    Ids {
        #[command(subcommand)]
        command: IdsCommand,
    },
    /// Transfer-credit processing
    Transcript {
        #[command(subcommand)]
        command: TranscriptCommand,
    },
}

#[derive(Subcommand, Debug)]
enum FeesCommand {
    /// Quote an application against its package or program cost structure
    Quote(QuoteArgs),
    /// Bill the first term of a program from its syllabus
    FirstSemester(FirstSemesterArgs),
}

#[derive(Subcommand, Debug)]
enum IdsCommand {
    /// Mint a university/UGC identifier pair for an explicit sequence number
    Issue(IssueArgs),
    /// Check the format (and UGC checksum) of an identifier
    Check(CheckArgs),
}

#[derive(Subcommand, Debug)]
enum TranscriptCommand {
    /// Combine a transfer transcript CSV with an existing record
    Combine(TransferArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Fees {
            command: FeesCommand::Quote(args),
        } => run_quote(args),
        Command::Fees {
            command: FeesCommand::FirstSemester(args),
        } => run_first_semester(args),
        Command::Ids {
            command: IdsCommand::Issue(args),
        } => run_issue_identifiers(args),
        Command::Ids {
            command: IdsCommand::Check(args),
        } => run_check_identifier(args),
        Command::Transcript {
            command: TranscriptCommand::Combine(args),
        } => run_transfer_combine(args),
    }
}
