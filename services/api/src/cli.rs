use crate::commands::{run_audit, run_prepare, AuditArgs, PrepareArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fair_lending::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "fair-lending-api",
    about = "Score loan applications and audit approval decisions for group fairness",
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
    /// Fit the feature transformer on a labelled CSV and persist it
    Prepare(PrepareArgs),
    /// Score a labelled CSV with the persisted artifacts and print a fairness report
    Audit(AuditArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Directory holding the model and preprocessor artifacts
    #[arg(long)]
    pub(crate) model_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Prepare(args) => run_prepare(args),
        Command::Audit(args) => run_audit(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["fair-lending-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn audit_accepts_threshold_override() {
        let cli = Cli::try_parse_from([
            "fair-lending-api",
            "audit",
            "--data",
            "loans.csv",
            "--threshold",
            "0.1",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Audit(args)) => {
                assert_eq!(args.data, PathBuf::from("loans.csv"));
                assert_eq!(args.threshold, Some(0.1));
            }
            other => panic!("expected audit command, got {other:?}"),
        }
    }

    #[test]
    fn audit_rejects_negative_threshold() {
        let result = Cli::try_parse_from([
            "fair-lending-api",
            "audit",
            "--data",
            "loans.csv",
            "--threshold",
            "-0.5",
        ]);
        assert!(result.is_err());
    }
}
