//! Translation boundary: model output to canonical filters, and fallback.

use techstack::MsError;
use techstack::core::FilterOptions;
use techstack::search::{FilterSpec, Range};
use techstack::storage::sample::sample_companies;
use techstack::translate::{
    FilterSuggestions, TranslatedFilters, Translator, translate_or_keep,
};

fn sample_options() -> FilterOptions {
    FilterOptions::from_companies(&sample_companies())
}

struct Unreachable;

impl Translator for Unreachable {
    fn translate(&self, _query: &str, _options: &FilterOptions) -> techstack::Result<FilterSpec> {
        Err(MsError::TranslatorUnavailable("connection refused".into()))
    }

    fn suggest(
        &self,
        _input: &str,
        _options: &FilterOptions,
    ) -> techstack::Result<FilterSuggestions> {
        Err(MsError::TranslatorUnavailable("connection refused".into()))
    }
}

#[test]
fn model_output_is_canonicalized() {
    let raw = r#"{
        "countries": ["uk", "Narnia"],
        "technologies": [
            {"value": "azure", "condition": "AND"},
            {"value": "java", "condition": "NOT"},
            {"value": "Cobol", "condition": "OR"}
        ],
        "techCount": [2.4, 80]
    }"#;
    let filters: TranslatedFilters = serde_json::from_str(raw).unwrap();
    let spec = filters.into_spec(&sample_options()).unwrap();

    assert_eq!(spec.countries, vec!["UK"]);
    assert_eq!(spec.technologies_and, vec!["Azure"]);
    assert_eq!(spec.technologies_not, vec!["Java"]);
    assert!(spec.technologies_or.is_empty());
    assert_eq!(spec.tech_count, Range::new(2, 50));
}

#[test]
fn failed_translation_keeps_prior_filters() {
    let prior = FilterSpec::new().with_countries(vec!["Japan".into()]);
    let outcome = translate_or_keep(&Unreachable, "games", &sample_options(), &prior);

    assert!(!outcome.is_translated());
    assert_eq!(outcome.spec, prior);
    assert!(matches!(
        outcome.error,
        Some(MsError::TranslatorUnavailable(_))
    ));
}

#[test]
fn suggestions_merge_into_current_filters() {
    let suggestions = FilterSuggestions {
        technologies: vec!["AWS".into(), "React".into()],
        countries: vec!["USA".into()],
        ..FilterSuggestions::default()
    }
    .restricted_to(&sample_options());

    let mut spec = FilterSpec::new().with_technologies_not(vec!["React".into()]);
    suggestions.apply_to(&mut spec);

    assert_eq!(spec.countries, vec!["USA"]);
    assert_eq!(spec.technologies_and, vec!["AWS"]);
    assert_eq!(spec.technologies_not, vec!["React"]);
}
