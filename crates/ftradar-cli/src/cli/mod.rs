use clap::{Parser, Subcommand};

mod args;
mod parsers;


pub use args::{AddArgs, DigestArgs, ListArgs, PathArg, ServeArgs, SubsidyArgs};

#[derive(Debug, Parser)]
#[command(name = "ftradar")]
#[command(about = "Funding & tariff radar: item ingestion, digests and subsidy estimates", version)]
pub struct Cli {
    /// Emit debug logs on stderr.
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the item table and indexes when absent.
    #[command(alias = "init_db")]
    InitDb,
    /// Insert one item.
    Add(AddArgs),
    /// Print matching items, newest first.
    List(ListArgs),
    /// Insert or replace items from a JSON array file.
    #[command(alias = "import_json")]
    ImportJson(PathArg),
    /// Write every item to a JSON array file.
    #[command(alias = "export_json")]
    ExportJson(PathArg),
    /// Render the digest files and mail them when SMTP is configured.
    Digest(DigestArgs),
    /// Estimate matching funding programs for a project.
    Subsidies(SubsidyArgs),
    /// Serve the dashboard.
    Serve(ServeArgs),
}
