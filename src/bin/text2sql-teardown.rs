use clap::Parser;
use text2sql_teardown::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    text2sql_teardown::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => commands::execute_init(args, &cli.config)?,
        Commands::Destroy(args) => commands::execute_destroy(args, &cli.config)?,
        Commands::Status(args) => commands::execute_status(args, &cli.config)?,
    }

    Ok(())
}
