//! tse seed - Load companies into the SQLite document store

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_formatted};
use crate::error::Result;
use crate::storage::{BuiltinSource, CompanySource, Database, JsonFileSource};

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// JSON file of companies (default: the built-in sample)
    #[arg(long, value_name = "FILE")]
    pub from: Option<PathBuf>,

    /// Delete stored companies before writing
    #[arg(long)]
    pub reset: bool,

    /// Documents per transaction (default from [source] seed_batch_size)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Database to write (default from [source] path)
    #[arg(long, value_name = "FILE")]
    pub path: Option<PathBuf>,
}

#[derive(Serialize)]
struct SeedReport {
    database: String,
    from: String,
    removed: usize,
    written: usize,
    stored: usize,
}

pub fn run(ctx: &AppContext, args: &SeedArgs) -> Result<()> {
    let path = match &args.path {
        Some(path) => path.clone(),
        None => ctx.config.source.sqlite_path()?,
    };
    let input: Box<dyn CompanySource> = match &args.from {
        Some(file) => Box::new(JsonFileSource::new(file)),
        None => Box::new(BuiltinSource),
    };
    let companies = input.fetch_all()?;

    let mut db = Database::open(&path)?;
    let removed = if args.reset { db.reset()? } else { 0 };
    let batch_size = args
        .batch_size
        .unwrap_or(ctx.config.source.seed_batch_size);
    let written = db.seed(&companies, batch_size)?;

    let report = SeedReport {
        database: path.display().to_string(),
        from: input.describe(),
        removed,
        written,
        stored: db.count()?,
    };
    emit_formatted(
        &report,
        ctx.output_format,
        |r| {
            let mut layout = HumanLayout::new();
            layout
                .title("Seeded company directory")
                .kv("database", &r.database)
                .kv("from", &r.from)
                .kv("written", &r.written.to_string())
                .kv("stored", &r.stored.to_string());
            if r.removed > 0 {
                layout.kv("removed", &r.removed.to_string());
            }
            layout.build()
        },
        |r| format!("{} {}", r.written, r.database),
        |r| format!("written\tstored\n{}\t{}", r.written, r.stored),
    )
}
