//! Prompt text for the generative model

use crate::core::FilterOptions;

fn option_line(label: &str, values: &[String]) -> String {
    if values.is_empty() {
        format!("- {label}: (none)")
    } else {
        format!("- {label}: {}", values.join(", "))
    }
}

fn option_block(options: &FilterOptions, include_offices: bool) -> String {
    let mut lines = vec![
        option_line("Industries", &options.industries),
        option_line("Categories", &options.categories),
        option_line("Countries", &options.countries),
        option_line("Technologies", &options.technologies),
    ];
    if include_offices {
        lines.push(option_line("Office locations", &options.office_locations));
    }
    lines.join("\n")
}

/// Prompt asking the model to turn `query` into filter JSON.
pub fn translation_prompt(query: &str, options: &FilterOptions) -> String {
    format!(
        r#"Convert a request for companies into JSON filters for a company directory.

Request: "{query}"

Allowed values (use these spellings, never invent others):
{options}

Rules:
1. Put every industry, category, country, office location and technology the request mentions into the matching list. Skip anything not in the allowed values.
2. Give each technology a condition:
   - "AND" when the company must use it ("uses React and Node.js", "React, Node.js").
   - "OR" when any one of a group is enough ("React or Angular").
   - "NOT" when it must be absent ("no Java", "anything but Java").
   When unsure, use "AND".
3. techCount is [min, max] technologies. "at least 5" is [5, 50], "fewer than 8" is [0, 7], "between 5 and 10" is [5, 10]. Use [0, 50] when the request says nothing about stack size.
4. Words that name no filter value (such as a company name) go into "search". Otherwise "search" is "".

Reply with one JSON object and nothing else, shaped like:
{{"search": "", "industries": [], "categories": [], "countries": [], "officeLocations": [], "technologies": [{{"value": "React", "condition": "AND"}}], "techCount": [0, 50]}}

Example: "fintech firms in the UK on Azure but not Java, at least 4 technologies"
{{"search": "", "industries": ["Finance"], "categories": [], "countries": ["UK"], "officeLocations": [], "technologies": [{{"value": "Azure", "condition": "AND"}}, {{"value": "Java", "condition": "NOT"}}], "techCount": [4, 50]}}"#,
        options = option_block(options, true),
    )
}

/// Prompt asking the model for filters related to a partial search input.
pub fn suggestion_prompt(input: &str, options: &FilterOptions) -> String {
    format!(
        r#"A user started searching a company directory with: "{input}"

Allowed values:
{options}

Suggest the technologies, countries, industries and office locations most likely to narrow this search. Only use allowed values.

Reply with one JSON object and nothing else:
{{"suggestedTechnologies": [], "suggestedCountries": [], "suggestedIndustries": [], "suggestedOfficeLocations": []}}"#,
        options = option_block(options, true),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_options() -> FilterOptions {
        FilterOptions {
            technologies: vec!["AWS".into(), "React".into()],
            countries: vec!["UK".into()],
            ..FilterOptions::default()
        }
    }

    #[test]
    fn test_translation_prompt_lists_options() {
        let prompt = translation_prompt("react shops", &make_options());
        assert!(prompt.contains("\"react shops\""));
        assert!(prompt.contains("- Technologies: AWS, React"));
        assert!(prompt.contains("- Industries: (none)"));
        assert!(prompt.contains("\"techCount\": [0, 50]"));
    }

    #[test]
    fn test_suggestion_prompt_names_keys() {
        let prompt = suggestion_prompt("cloud", &make_options());
        assert!(prompt.contains("suggestedTechnologies"));
        assert!(prompt.contains("- Countries: UK"));
    }
}
