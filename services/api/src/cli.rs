use crate::quote::{run_check, run_quote, CheckArgs, QuoteArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use printshop::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Print Storefront Pricing",
    about = "Serve the storefront pricing API or price selections from the command line",
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
    /// Price one selection against a catalog or CSV rate card
    Quote(QuoteArgs),
    /// Validate a catalog or rate card without serving it
    Check(CheckArgs),
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
        Command::Quote(args) => run_quote(args),
        Command::Check(args) => run_check(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_conflicts_with_rate_cards() {
        let parsed = Cli::try_parse_from([
            "printshop-api",
            "quote",
            "--rates",
            "rates.csv",
            "--kind",
            "paper",
            "--binding",
            "Spiral Binding",
        ]);
        assert_eq!(
            parsed.map(|_| ()).map_err(|err| err.kind()),
            Err(clap::error::ErrorKind::ArgumentConflict)
        );

        let parsed = Cli::try_parse_from([
            "printshop-api",
            "quote",
            "--catalog",
            "catalog.json",
            "--binding",
            "Spiral Binding",
            "--custom-copies",
            "2",
        ]);
        assert!(matches!(parsed.map(|cli| cli.command), Ok(Some(Command::Quote(_)))));
    }
}
