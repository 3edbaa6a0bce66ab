//! tse suggest - Suggest filters related to a partial search

use clap::Args;
use serde::Serialize;

use super::search::FilterArgs;
use crate::app::AppContext;
use crate::cli::formatters::describe_spec;
use crate::cli::output::{HumanLayout, emit_formatted, tsv_cell};
use crate::error::Result;
use crate::search::FilterSpec;
use crate::translate::{FilterSuggestions, Translator};

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// What has been typed so far
    #[arg(required = true, num_args = 1..)]
    pub input: Vec<String>,

    /// Current filters the suggestions are merged into
    #[command(flatten)]
    pub filters: FilterArgs,
}

#[derive(Serialize)]
struct SuggestReport {
    input: String,
    suggestions: FilterSuggestions,
    /// Current filters with the suggestions applied
    filters: FilterSpec,
}

pub fn run(ctx: &AppContext, args: &SuggestArgs) -> Result<()> {
    let input = args.input.join(" ");
    let mut filters = args.filters.to_spec(None)?;
    let options = ctx.load_catalog()?.options();

    let translator = ctx.translator()?;
    let suggestions = translator.suggest(&input, &options)?;
    suggestions.apply_to(&mut filters);

    let report = SuggestReport {
        input,
        suggestions,
        filters,
    };
    emit_formatted(&report, ctx.output_format, format_human, format_plain, format_tsv)
}

fn groups(suggestions: &FilterSuggestions) -> [(&'static str, &[String]); 4] {
    [
        ("technology", &suggestions.technologies),
        ("country", &suggestions.countries),
        ("industry", &suggestions.industries),
        ("office", &suggestions.office_locations),
    ]
}

fn format_human(report: &SuggestReport) -> String {
    let mut layout = HumanLayout::new();
    layout.title(&format!("Suggestions for '{}'", report.input));
    if report.suggestions.is_empty() {
        layout.push_line("No related filters found");
        return layout.build();
    }
    for (label, values) in groups(&report.suggestions) {
        if !values.is_empty() {
            layout.kv(label, &values.join(", "));
        }
    }
    layout.blank().section("Filters with suggestions applied");
    for line in describe_spec(&report.filters) {
        layout.bullet(&line);
    }
    layout.build()
}

fn format_plain(report: &SuggestReport) -> String {
    groups(&report.suggestions)
        .iter()
        .flat_map(|(label, values)| values.iter().map(move |v| format!("{label}: {v}")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_tsv(report: &SuggestReport) -> String {
    let mut out = String::from("kind\tvalue");
    for (label, values) in groups(&report.suggestions) {
        for value in values {
            out.push_str(&format!("\n{label}\t{}", tsv_cell(value)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_report() -> SuggestReport {
        let suggestions = FilterSuggestions {
            technologies: vec!["AWS".into()],
            countries: vec!["USA".into()],
            ..FilterSuggestions::default()
        };
        let mut filters = FilterSpec::default();
        suggestions.apply_to(&mut filters);
        SuggestReport {
            input: "cloud".into(),
            suggestions,
            filters,
        }
    }

    #[test]
    fn plain_lists_each_value() {
        assert_eq!(
            format_plain(&make_report()),
            "technology: AWS\ncountry: USA"
        );
    }

    #[test]
    fn tsv_has_header() {
        let out = format_tsv(&make_report());
        assert!(out.starts_with("kind\tvalue\ntechnology\tAWS"));
    }

    #[test]
    fn human_shows_applied_filters() {
        let out = format_human(&make_report());
        assert!(out.contains("uses all of: AWS"));
        assert!(out.contains("country: USA"));
    }
}
