//! tse search - Filter and rank companies
//!
//! Builds a filter spec from flags (optionally on top of a JSON spec file),
//! runs it against the configured source or a remote query service, then
//! sorts and pages the results for display.

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use tracing::debug;

use crate::app::AppContext;
use crate::cli::formatters::CompanyResults;
use crate::cli::output;
use crate::core::Company;
use crate::error::{MsError, Result};
use crate::search::{
    FilterSpec, Page, Range, RevenueBound, SortDirection, SortKey, SortSpec, paginate,
    sort_companies,
};
use crate::server::SearchResponse;

/// Filter flags shared by `search`, `ask` and `export`
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Industry to include (repeatable, comma-separated)
    #[arg(long, value_name = "NAME", value_delimiter = ',')]
    pub industry: Vec<String>,

    /// Category to include
    #[arg(long, value_name = "NAME", value_delimiter = ',')]
    pub category: Vec<String>,

    /// Headquarters country to include
    #[arg(long, value_name = "NAME", value_delimiter = ',')]
    pub country: Vec<String>,

    /// Office location; matches companies with an office in any of them
    #[arg(long, value_name = "CITY", value_delimiter = ',')]
    pub office: Vec<String>,

    /// Technology the company must use (all of them)
    #[arg(long, value_name = "TECH", value_delimiter = ',')]
    pub tech: Vec<String>,

    /// Technology of which the company must use at least one
    #[arg(long, value_name = "TECH", value_delimiter = ',')]
    pub any_tech: Vec<String>,

    /// Technology the company must not use
    #[arg(long, value_name = "TECH", value_delimiter = ',')]
    pub not_tech: Vec<String>,

    /// Inclusive technology count range; a max of 50 means no upper bound
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    pub tech_count: Option<Vec<u64>>,

    /// Inclusive office count range; a max of 50 means no upper bound
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    pub office_count: Option<Vec<u64>>,

    /// Inclusive employee count range
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    pub employees: Option<Vec<u64>>,

    /// Minimum revenue, e.g. 100m or 1.5b
    #[arg(long, value_name = "AMOUNT")]
    pub min_revenue: Option<String>,

    /// Maximum revenue, e.g. 500m
    #[arg(long, value_name = "AMOUNT")]
    pub max_revenue: Option<String>,

    /// Founding year
    #[arg(long, value_name = "YEAR")]
    pub founded: Option<i32>,

    /// JSON filter spec to start from ("-" reads stdin)
    #[arg(long, value_name = "FILE")]
    pub spec: Option<PathBuf>,
}

fn range_arg(values: &[u64], flag: &str) -> Result<Range> {
    match values {
        [min, max] => Ok(Range::new(*min, *max)),
        _ => Err(MsError::InvalidSpecification(format!(
            "--{flag} takes MIN and MAX"
        ))),
    }
}

impl FilterArgs {
    /// Base spec from `--spec`, or the default spec.
    fn base_spec(&self) -> Result<FilterSpec> {
        let Some(path) = &self.spec else {
            return Ok(FilterSpec::default());
        };
        let raw = if path.as_os_str() == "-" {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            raw
        } else {
            std::fs::read_to_string(path).map_err(|err| {
                MsError::NotFound(format!("spec file {}: {err}", path.display()))
            })?
        };
        FilterSpec::from_json(&raw)
    }

    /// Flags layered over the base spec. List flags extend, ranges and
    /// bounds replace.
    pub fn to_spec(&self, query: Option<&str>) -> Result<FilterSpec> {
        let mut spec = self.base_spec()?;

        if let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) {
            spec.search = Some(query.to_string());
        }
        spec.industries.extend(self.industry.iter().cloned());
        spec.categories.extend(self.category.iter().cloned());
        spec.countries.extend(self.country.iter().cloned());
        spec.office_locations.extend(self.office.iter().cloned());
        spec.technologies_and.extend(self.tech.iter().cloned());
        spec.technologies_or.extend(self.any_tech.iter().cloned());
        spec.technologies_not.extend(self.not_tech.iter().cloned());

        if let Some(values) = &self.tech_count {
            spec.tech_count = range_arg(values, "tech-count")?;
        }
        if let Some(values) = &self.office_count {
            spec.office_location_count = range_arg(values, "office-count")?;
        }
        if let Some(values) = &self.employees {
            spec.employee_count = Some(range_arg(values, "employees")?);
        }
        if let Some(raw) = &self.min_revenue {
            spec.min_revenue = Some(RevenueBound::parse(raw)?);
        }
        if let Some(raw) = &self.max_revenue {
            spec.max_revenue = Some(RevenueBound::parse(raw)?);
        }
        if let Some(year) = self.founded {
            spec.founded_year = (year != 0).then_some(year);
        }

        spec.validate()?;
        Ok(spec)
    }
}

/// Presentation flags shared by commands that list companies
#[derive(Args, Debug, Clone, Default)]
pub struct SortArgs {
    /// Sort column; without it results keep rank order
    #[arg(long, value_enum)]
    pub sort: Option<SortKey>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Skip this many results
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Maximum results to show (0 = all; default from [search] default_limit)
    #[arg(long)]
    pub limit: Option<usize>,
}

impl SortArgs {
    pub fn sort_spec(&self) -> Option<SortSpec> {
        if self.sort.is_none() && !self.desc {
            return None;
        }
        let direction = if self.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        Some(SortSpec::new(self.sort.unwrap_or_default(), direction))
    }

    pub fn apply(&self, mut companies: Vec<Company>, default_limit: usize) -> Page {
        if let Some(sort) = self.sort_spec() {
            sort_companies(&mut companies, sort);
        }
        paginate(companies, self.offset, self.limit.unwrap_or(default_limit))
    }
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text query matched with prefix and typo tolerance
    pub query: Option<String>,

    #[command(flatten)]
    pub filters: FilterArgs,

    #[command(flatten)]
    pub sort: SortArgs,

    /// Query a running `tse serve` instead of the local source
    #[arg(long, value_name = "URL")]
    pub remote: Option<String>,
}

pub fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let spec = args.filters.to_spec(args.query.as_deref())?;

    let results = match &args.remote {
        Some(url) => search_remote(ctx, url, &spec)?,
        None => ctx.load_catalog()?.search(&spec)?,
    };

    let page = args.sort.apply(results, ctx.config.search.default_limit);
    let results = CompanyResults::new(spec.text_query().map(str::to_string), page);
    output::emit(&results, ctx.output_format);
    Ok(())
}

fn search_remote(ctx: &AppContext, base_url: &str, spec: &FilterSpec) -> Result<Vec<Company>> {
    let url = format!("{}/api/search", base_url.trim_end_matches('/'));
    debug!(url = %url, "remote search");

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(ctx.config.translator.timeout_secs))
        .build()?;
    let response = client.post(&url).json(spec).send()?;

    let status = response.status();
    let body = response.bytes()?;
    if !status.is_success() {
        let message = serde_json::from_slice::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned());
        return Err(if status.as_u16() == 400 {
            MsError::InvalidSpecification(message)
        } else {
            MsError::SourceUnavailable {
                backend: "remote".to_string(),
                path: Some(url),
                reason: format!("{status}: {message}"),
            }
        });
    }

    Ok(SearchResponse::from_slice(&body)?.results)
}
