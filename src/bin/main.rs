//! Constellation CLI - Compile a star-schema model to SQL
//!
//! Usage:
//!   constellation <model.toml> star <fact> [--dialect <dialect>]
//!   constellation <model.toml> view <view>
//!   constellation <model.toml> schema
//!   constellation <model.toml> filters <fact>
//!
//! Examples:
//!   constellation shop.toml star orders --dialect postgres
//!   constellation shop.toml filters orders

use clap::{Parser, Subcommand, ValueEnum};
use constellation::sql::Dialect;
use constellation::{Constellation, ConstellationConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "constellation")]
#[command(about = "Constellation - compile star-schema models to multi-dialect SQL")]
#[command(version)]
struct Cli {
    /// Path to the TOML model
    config: PathBuf,

    /// SQL dialect to generate (defaults to the model's setting)
    #[arg(short, long, global = true)]
    dialect: Option<DialectArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the composed query of a fact's star
    Star {
        /// Fact table name
        fact: String,
    },

    /// Print the composed query of a view
    View {
        /// View name
        view: String,
    },

    /// Print CREATE TABLE statements for every table
    Schema,

    /// List the filters of a fact's star
    Filters {
        /// Fact table name
        fact: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Duckdb,
    Postgres,
    Sqlite,
    Mysql,
    Tsql,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Duckdb => Dialect::DuckDb,
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Sqlite => Dialect::Sqlite,
            DialectArg::Mysql => Dialect::MySql,
            DialectArg::Tsql => Dialect::TSql,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> constellation::Result<()> {
    let config = ConstellationConfig::from_file(&cli.config)?;
    let model = Constellation::from_config(&config)?;
    let dialect = cli
        .dialect
        .map(Dialect::from)
        .unwrap_or(model.settings().dialect);

    match cli.command {
        Commands::Star { fact } => {
            println!("{}", model.compose_star(&fact)?.to_sql(dialect));
        }
        Commands::View { view } => {
            println!("{}", model.compose_view(&view)?.to_sql(dialect));
        }
        Commands::Schema => {
            for statement in model.create_statements() {
                println!("{};", statement.to_sql(dialect));
                println!();
            }
        }
        Commands::Filters { fact } => {
            let star = model.star(&fact)?;
            for filter in star.filters() {
                println!(
                    "{}\t{}\t{}",
                    filter.display_name(),
                    filter.operator().name(),
                    filter.dtype()
                );
            }
        }
    }
    Ok(())
}
