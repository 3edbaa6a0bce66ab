//! tse export - Write a filtered result set as CSV or JSON

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::info;

use super::search::{FilterArgs, SortArgs};
use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_formatted};
use crate::error::Result;
use crate::export::{ExportField, ExportFormat, render};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Free-text query
    pub query: Option<String>,

    #[command(flatten)]
    pub filters: FilterArgs,

    #[command(flatten)]
    pub sort: SortArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,

    /// CSV columns in order (default: all)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub fields: Vec<ExportField>,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Serialize)]
struct ExportReport {
    path: String,
    format: ExportFormat,
    companies: usize,
    total: usize,
}

pub fn run(ctx: &AppContext, args: &ExportArgs) -> Result<()> {
    let spec = args.filters.to_spec(args.query.as_deref())?;
    let results = ctx.load_catalog()?.search(&spec)?;
    let page = args.sort.apply(results, ctx.config.search.default_limit);
    let rendered = render(&page.results, args.format, &args.fields)?;

    let Some(path) = &args.output else {
        print!("{rendered}");
        if !rendered.ends_with('\n') {
            println!();
        }
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &rendered)?;
    info!(path = %path.display(), companies = page.results.len(), "exported companies");

    let report = ExportReport {
        path: path.display().to_string(),
        format: args.format,
        companies: page.results.len(),
        total: page.total,
    };
    emit_formatted(
        &report,
        ctx.output_format,
        |r| {
            let mut layout = HumanLayout::new();
            layout
                .title("Export complete")
                .kv("file", &r.path)
                .kv("companies", &r.companies.to_string());
            if r.companies < r.total {
                layout.kv("matched", &r.total.to_string());
            }
            layout.build()
        },
        |r| r.path.clone(),
        |r| format!("path\tcompanies\n{}\t{}", r.path, r.companies),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::config::{Config, SourceBackend};

    fn make_ctx() -> AppContext {
        let mut config = Config::default();
        config.source.backend = SourceBackend::Builtin;
        AppContext::with_config(config, OutputFormat::Json)
    }

    #[test]
    fn writes_selected_columns_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("uk.csv");
        let args = ExportArgs {
            query: None,
            filters: FilterArgs {
                country: vec!["UK".into()],
                ..FilterArgs::default()
            },
            sort: SortArgs::default(),
            format: ExportFormat::Csv,
            fields: vec![ExportField::Id, ExportField::Name],
            output: Some(path.clone()),
        };
        run(&make_ctx(), &args).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(lines.next(), Some("id,name"));
        assert!(lines.all(|line| line.split(',').count() == 2));
        assert!(written.contains("FinSecure"));
    }

    #[test]
    fn json_export_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all.json");
        let args = ExportArgs {
            query: None,
            filters: FilterArgs::default(),
            sort: SortArgs::default(),
            format: ExportFormat::Json,
            fields: Vec::new(),
            output: Some(path.clone()),
        };
        run(&make_ctx(), &args).unwrap();

        let parsed: Vec<crate::core::Company> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 12);
    }
}
