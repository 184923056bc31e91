use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use schemabridge::compare::report::render_report;
use schemabridge::{
    compare_schemas, migrate_schemas, render_schema, CompareOptions, ComparisonPolicy,
    DialectKind, RenderOptions,
};

#[derive(Parser)]
#[command(name = "schemabridge")]
#[command(author, version, about = "Compare table schemas and render DDL across database dialects")]
struct Cli {
    /// Log catalog activity (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the tables and views in DDL files for a dialect
    Render {
        /// Dialect the files are written in (oracle, postgres, hana, sqlite, sqlserver)
        #[arg(short, long)]
        dialect: DialectKind,

        /// Dialect to render (defaults to --dialect)
        #[arg(short, long)]
        target: Option<DialectKind>,

        /// Skip COMMENT ON statements for remarks
        #[arg(long)]
        no_comments: bool,

        /// DDL files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Compare the schema in source DDL files against target DDL files
    Compare {
        /// Source DDL file(s)
        #[arg(short, long, required = true)]
        source: Vec<PathBuf>,

        /// Target DDL file(s)
        #[arg(short, long, required = true)]
        target: Vec<PathBuf>,

        /// Comparison preset (table, view)
        #[arg(short, long, default_value = "table")]
        policy: String,

        /// Dialect the files are written in
        #[arg(short, long, default_value = "postgres")]
        dialect: DialectKind,
    },

    /// Print the script that migrates the target schema to the source
    Migrate {
        /// Source DDL file(s)
        #[arg(short, long, required = true)]
        source: Vec<PathBuf>,

        /// Target DDL file(s)
        #[arg(short, long, required = true)]
        target: Vec<PathBuf>,

        /// Dialect of the files and of the generated script
        #[arg(short, long)]
        dialect: DialectKind,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();

    match cli.command {
        Commands::Render {
            dialect,
            target,
            no_comments,
            files,
        } => {
            let sql = render_schema(RenderOptions {
                files,
                dialect,
                target,
                emit_comments: !no_comments,
            })?;
            print!("{}", sql);
        }
        Commands::Compare {
            source,
            target,
            policy,
            dialect,
        } => {
            let Some(policy) = ComparisonPolicy::preset(&policy) else {
                bail!("Unknown policy preset: {} (expected table or view)", policy);
            };
            let results = compare_schemas(CompareOptions {
                source,
                target,
                dialect,
                policy,
            })?;
            print!("{}", render_report(&results));
            if results.iter().any(|r| !r.passed()) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Migrate {
            source,
            target,
            dialect,
        } => {
            print!("{}", migrate_schemas(&source, &target, dialect)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
