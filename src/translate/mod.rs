//! Natural-language to filter translation
//!
//! A [`Translator`] turns free text into a [`FilterSpec`] using a generative
//! model. It can fail at any time; callers go through [`translate_or_keep`]
//! so a failure leaves the previous filters in place. The filter engine never
//! calls a translator itself.

mod ollama;
mod prompt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::FilterOptions;
use crate::error::{MsError, Result};
use crate::search::filters::{COUNT_CEILING, FilterSpec, Range, TechnologyFilter, TechnologySets};

pub use ollama::OllamaTranslator;
pub use prompt::{suggestion_prompt, translation_prompt};

/// Text in, structured filters out.
pub trait Translator: Send + Sync {
    /// Translate a request into a validated filter spec restricted to `options`.
    fn translate(&self, query: &str, options: &FilterOptions) -> Result<FilterSpec>;

    /// Suggest facet values related to a partial search input.
    fn suggest(&self, input: &str, options: &FilterOptions) -> Result<FilterSuggestions>;
}

/// Raw model output for a translation request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedFilters {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub office_locations: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<TechnologyFilter>,
    /// Models sometimes emit floats here
    #[serde(default)]
    pub tech_count: Option<[f64; 2]>,
}

impl TranslatedFilters {
    /// Convert to a canonical spec, dropping values outside `options`.
    pub fn into_spec(self, options: &FilterOptions) -> Result<FilterSpec> {
        let known_technologies: Vec<TechnologyFilter> = self
            .technologies
            .into_iter()
            .filter_map(|filter| {
                FilterOptions::canonical(&options.technologies, &filter.value).map(|value| {
                    TechnologyFilter {
                        value: value.to_string(),
                        condition: filter.condition,
                    }
                })
            })
            .collect();

        let mut spec = FilterSpec {
            search: self
                .search
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
            industries: self.industries,
            categories: self.categories,
            countries: self.countries,
            office_locations: self.office_locations,
            tech_count: self.tech_count.map_or_else(Range::default_count, count_range),
            ..FilterSpec::default()
        }
        .restricted_to(options);
        TechnologySets::from_conditions(&known_technologies).apply_to(&mut spec);

        spec.validate()
            .map_err(|err| MsError::TranslationFailed(format!("model produced {err}")))?;
        Ok(spec)
    }
}

fn count_range([min, max]: [f64; 2]) -> Range {
    let clamp = |value: f64| {
        if value.is_finite() && value > 0.0 {
            value.round().min(f64::from(COUNT_CEILING)) as u64
        } else {
            0
        }
    };
    Range::new(clamp(min), clamp(max))
}

/// Facet values suggested for a partial search input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSuggestions {
    #[serde(default, alias = "suggestedTechnologies")]
    pub technologies: Vec<String>,
    #[serde(default, alias = "suggestedCountries")]
    pub countries: Vec<String>,
    #[serde(default, alias = "suggestedIndustries")]
    pub industries: Vec<String>,
    #[serde(default, alias = "suggestedOfficeLocations")]
    pub office_locations: Vec<String>,
}

impl FilterSuggestions {
    /// Keep only values present in `options`, in canonical spelling.
    #[must_use]
    pub fn restricted_to(self, options: &FilterOptions) -> Self {
        let spec = FilterSpec {
            technologies_and: self.technologies,
            countries: self.countries,
            industries: self.industries,
            office_locations: self.office_locations,
            ..FilterSpec::default()
        }
        .restricted_to(options);
        Self {
            technologies: spec.technologies_and,
            countries: spec.countries,
            industries: spec.industries,
            office_locations: spec.office_locations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.technologies.is_empty()
            && self.countries.is_empty()
            && self.industries.is_empty()
            && self.office_locations.is_empty()
    }

    /// Fold the suggestions into `spec`.
    ///
    /// Suggested industries, countries and office locations replace the
    /// current ones when non-empty. Suggested technologies join the AND set
    /// unless the spec already names them under any condition.
    pub fn apply_to(&self, spec: &mut FilterSpec) {
        if !self.industries.is_empty() {
            spec.industries.clone_from(&self.industries);
        }
        if !self.countries.is_empty() {
            spec.countries.clone_from(&self.countries);
        }
        if !self.office_locations.is_empty() {
            spec.office_locations.clone_from(&self.office_locations);
        }
        for technology in &self.technologies {
            let present = spec
                .technologies_and
                .iter()
                .chain(&spec.technologies_or)
                .chain(&spec.technologies_not)
                .any(|t| t == technology);
            if !present {
                spec.technologies_and.push(technology.clone());
            }
        }
    }
}

/// Result of a translation attempt that never loses the previous filters.
#[derive(Debug)]
pub struct TranslationOutcome {
    /// The translated spec, or the prior one when translation failed
    pub spec: FilterSpec,
    pub error: Option<MsError>,
}

impl TranslationOutcome {
    pub const fn is_translated(&self) -> bool {
        self.error.is_none()
    }
}

/// Translate `query`, falling back to `prior` unchanged on failure.
pub fn translate_or_keep(
    translator: &dyn Translator,
    query: &str,
    options: &FilterOptions,
    prior: &FilterSpec,
) -> TranslationOutcome {
    match translator.translate(query, options) {
        Ok(spec) => TranslationOutcome { spec, error: None },
        Err(err) => {
            warn!(error = %err, query, "translation failed, keeping previous filters");
            TranslationOutcome {
                spec: prior.clone(),
                error: Some(err),
            }
        }
    }
}
