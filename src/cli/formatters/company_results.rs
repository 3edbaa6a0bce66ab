//! Company result list formatter

use console::style;
use serde::Serialize;

use super::describe_spec;
use crate::cli::output::{Formattable, OutputFormat, tsv_cell};
use crate::core::Company;
use crate::export::format_revenue;
use crate::search::{FilterSpec, Page};

/// One page of companies plus the context needed to describe it
#[derive(Debug, Clone)]
pub struct CompanyResults {
    /// Free-text query, when one was given
    pub query: Option<String>,
    pub page: Page,
    /// Filters to echo back, set when they came from a translation
    pub filters: Option<FilterSpec>,
    /// Non-fatal problems to surface next to the results
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
struct CompanyResultsJson<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<&'a str>,
    count: usize,
    total: usize,
    offset: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    filters: Option<&'a FilterSpec>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    warnings: &'a [String],
    results: &'a [Company],
}

impl CompanyResults {
    pub fn new(query: Option<String>, page: Page) -> Self {
        Self {
            query,
            page,
            filters: None,
            warnings: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_filters(mut self, filters: FilterSpec) -> Self {
        self.filters = Some(filters);
        self
    }

    #[must_use]
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    fn to_json(&self) -> CompanyResultsJson<'_> {
        CompanyResultsJson {
            status: "ok",
            query: self.query.as_deref(),
            count: self.page.results.len(),
            total: self.page.total,
            offset: self.page.offset,
            filters: self.filters.as_ref(),
            warnings: &self.warnings,
            results: &self.page.results,
        }
    }

    fn format_human(&self) -> String {
        let mut out = String::new();
        for warning in &self.warnings {
            out.push_str(&format!("{} {warning}\n", style("!").yellow()));
        }
        if let Some(filters) = &self.filters {
            let lines = describe_spec(filters);
            if lines.is_empty() {
                out.push_str(&format!("{}\n", style("Filters: none").dim()));
            } else {
                out.push_str(&format!("{}\n", style("Filters:").bold()));
                for line in lines {
                    out.push_str(&format!("  {line}\n"));
                }
            }
            out.push('\n');
        }

        if self.page.results.is_empty() {
            out.push_str(&format!("{} No companies match", style("!").yellow()));
            if let Some(query) = &self.query {
                out.push_str(&format!(" '{}'", style(query).cyan()));
            }
            out.push_str("\n\nTry:\n");
            out.push_str("  - Removing a technology or location filter\n");
            out.push_str("  - Widening --tech-count, --employees or the revenue bounds\n");
            out.push_str("  - A shorter search term\n");
            return out;
        }

        let shown = self.page.results.len();
        out.push_str(&format!("{} companies", style(shown.to_string()).bold()));
        if shown < self.page.total {
            out.push_str(&format!(
                " ({}-{} of {})",
                self.page.offset + 1,
                self.page.offset + shown,
                self.page.total
            ));
        }
        if let Some(query) = &self.query {
            out.push_str(&format!(" for '{}'", style(query).cyan()));
        }
        out.push_str(":\n\n");

        for (i, company) in self.page.results.iter().enumerate() {
            out.push_str(&format!(
                "{}. {} {}\n",
                style(self.page.offset + i + 1).dim(),
                style(&company.name).cyan().bold(),
                style(&company.domain).dim()
            ));

            let mut facts = vec![
                company.industry.clone(),
                company.hq_country.clone(),
                format_revenue(company.revenue),
                format!("{} employees", company.employees),
            ];
            if let Some(year) = company.founded {
                facts.push(format!("founded {year}"));
            }
            facts.retain(|fact| !fact.is_empty());
            out.push_str(&format!("   {}\n", facts.join(" | ")));

            out.push_str(&format!(
                "   {} {}\n",
                style(format!("[{} tech]", company.tech_count())).dim(),
                company.technologies.join(", ")
            ));
            if !company.office_locations.is_empty() {
                out.push_str(&format!(
                    "   {} {}\n",
                    style("offices:").dim(),
                    company.office_locations.join(", ")
                ));
            }
            out.push('\n');
        }

        out
    }

    fn format_plain(&self) -> String {
        self.page
            .results
            .iter()
            .map(|c| format!("{}: {} ({})", c.id, c.name, c.domain))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_tsv(&self) -> String {
        let mut out = String::from(
            "id\tname\tdomain\tindustry\thq_country\trevenue_usd\temployees\ttech_count\ttechnologies\n",
        );
        for c in &self.page.results {
            out.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                c.id,
                tsv_cell(&c.name),
                tsv_cell(&c.domain),
                tsv_cell(&c.industry),
                tsv_cell(&c.hq_country),
                c.revenue,
                c.employees,
                c.tech_count(),
                tsv_cell(&c.technologies.join(", "))
            ));
        }
        out
    }

    fn format_jsonl(&self) -> String {
        self.page
            .results
            .iter()
            .filter_map(|c| serde_json::to_string(c).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Formattable for CompanyResults {
    fn format(&self, fmt: OutputFormat) -> String {
        match fmt {
            OutputFormat::Human => self.format_human(),
            OutputFormat::Json => serde_json::to_string_pretty(&self.to_json()).unwrap_or_default(),
            OutputFormat::Jsonl => self.format_jsonl(),
            OutputFormat::Plain => self.format_plain(),
            OutputFormat::Tsv => self.format_tsv(),
        }
    }
}
