use crate::demo::{run_demo, run_invoice, run_report, DemoArgs, InvoiceArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use writerdesk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Writer Desk",
    about = "Run the writing-services back office or work with order sheets from the command line",
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
    /// Summarise an order sheet: counts, completion rate, overdue work and budgets
    Report(ReportArgs),
    /// Invoice a writer's projects for one season from an order sheet
    Invoice(InvoiceArgs),
    /// Walk through staff, orders, payments, invoicing and the dashboard on seeded data
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
        Command::Report(args) => run_report(args),
        Command::Invoice(args) => run_invoice(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use writerdesk::workflows::orders::OrderKind;

    #[test]
    fn command_definitions_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["writerdesk-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn invoice_arguments_parse_labels() {
        let cli = Cli::try_parse_from([
            "writerdesk-api",
            "invoice",
            "--csv",
            "orders.csv",
            "--writer",
            "Wanjiru",
            "--season",
            "2025",
            "--project-type",
            "Dissertation",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Invoice(args)) => {
                assert_eq!(args.kind, OrderKind::Normal);
                assert_eq!(args.project_type, Some(OrderKind::Dissertation));
                assert!(args.out.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
