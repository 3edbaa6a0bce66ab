//! tse options - List the facet values available for filtering

use clap::{Args, ValueEnum};

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_formatted, tsv_cell};
use crate::core::FilterOptions;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Facet {
    Technologies,
    Industries,
    Categories,
    Countries,
    Offices,
}

#[derive(Args, Debug)]
pub struct OptionsArgs {
    /// Only list one facet
    #[arg(long, value_enum)]
    pub facet: Option<Facet>,
}

fn facets(options: &FilterOptions) -> [(Facet, &'static str, &[String]); 5] {
    [
        (Facet::Industries, "industries", &options.industries),
        (Facet::Categories, "categories", &options.categories),
        (Facet::Countries, "countries", &options.countries),
        (Facet::Offices, "office_locations", &options.office_locations),
        (Facet::Technologies, "technologies", &options.technologies),
    ]
}

pub fn run(ctx: &AppContext, args: &OptionsArgs) -> Result<()> {
    let mut options = ctx.load_catalog()?.options();
    if let Some(only) = args.facet {
        options = FilterOptions {
            technologies: keep(only, Facet::Technologies, options.technologies),
            industries: keep(only, Facet::Industries, options.industries),
            categories: keep(only, Facet::Categories, options.categories),
            countries: keep(only, Facet::Countries, options.countries),
            office_locations: keep(only, Facet::Offices, options.office_locations),
        };
    }
    emit_formatted(&options, ctx.output_format, format_human, format_plain, format_tsv)
}

fn keep(only: Facet, facet: Facet, values: Vec<String>) -> Vec<String> {
    if only == facet { values } else { Vec::new() }
}

fn format_human(options: &FilterOptions) -> String {
    let mut layout = HumanLayout::new();
    for (_, label, values) in facets(options) {
        if values.is_empty() {
            continue;
        }
        layout.section(&format!("{label} ({})", values.len()));
        layout.push_line(values.join(", ")).blank();
    }
    layout.build()
}

fn format_plain(options: &FilterOptions) -> String {
    facets(options)
        .iter()
        .flat_map(|(_, _, values)| values.iter().cloned())
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_tsv(options: &FilterOptions) -> String {
    let mut out = String::from("facet\tvalue");
    for (_, label, values) in facets(options) {
        for value in values {
            out.push_str(&format!("\n{label}\t{}", tsv_cell(value)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_options() -> FilterOptions {
        FilterOptions {
            technologies: vec!["AWS".into(), "Go".into()],
            countries: vec!["UK".into()],
            ..FilterOptions::default()
        }
    }

    #[test]
    fn keep_filters_one_facet() {
        assert!(keep(Facet::Countries, Facet::Technologies, vec!["Go".into()]).is_empty());
        assert_eq!(
            keep(Facet::Technologies, Facet::Technologies, vec!["Go".into()]),
            vec!["Go"]
        );
    }

    #[test]
    fn tsv_rows_name_facet() {
        assert_eq!(
            format_tsv(&make_options()),
            "facet\tvalue\ncountries\tUK\ntechnologies\tAWS\ntechnologies\tGo"
        );
    }

    #[test]
    fn human_skips_empty_facets() {
        let out = format_human(&make_options());
        assert!(out.contains("technologies (2)"));
        assert!(!out.contains("industries"));
    }
}
