use crate::demo::{run_demo, run_shortlist, DemoArgs, ShortlistArgs};
use crate::server;
use bench_match::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "bench-match",
    about = "Score and rank bench candidates against client requirements",
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
    /// Rank candidates from HR CSV exports against an ad-hoc requirement
    Shortlist(ShortlistArgs),
    /// Walk through intake, shortlisting and the dashboard with sample candidates
    Demo(DemoArgs),
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
        Command::Shortlist(args) => run_shortlist(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["bench-match"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_shortlist_arguments() {
        let cli = Cli::try_parse_from([
            "bench-match",
            "shortlist",
            "--data-dir",
            "data",
            "--skills",
            "React,Node.js",
            "--min-years",
            "5",
            "--certs",
            "AWS Solutions Architect",
            "--start",
            "2026-01-10",
            "--top-n",
            "3",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Shortlist(args)) => {
                assert_eq!(args.skills, vec!["React".to_string(), "Node.js".to_string()]);
                assert_eq!(args.min_years, 5);
                assert_eq!(args.top_n, Some(3));
                assert!(args.json);
                assert_eq!(args.start.to_string(), "2026-01-10");
            }
            other => panic!("expected shortlist command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_start_date() {
        let result = Cli::try_parse_from([
            "bench-match",
            "shortlist",
            "--skills",
            "React",
            "--min-years",
            "2",
            "--start",
            "10/01/2026",
        ]);
        assert!(result.is_err());
    }
}
