//! One-line descriptions of an active filter spec

use crate::search::{COUNT_CEILING, FilterSpec, Range, RevenueBound, RevenueUnit};

fn range_text(range: Range) -> String {
    if range.max >= u64::from(COUNT_CEILING) {
        format!("{}+", range.min)
    } else {
        format!("{}-{}", range.min, range.max)
    }
}

fn revenue_text(bound: &RevenueBound) -> String {
    let suffix = match bound.unit {
        RevenueUnit::Millions => "M",
        RevenueUnit::Billions => "B",
    };
    format!("${}{suffix}", bound.value)
}

/// Human-readable lines for every active constraint in `spec`.
pub fn describe_spec(spec: &FilterSpec) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(text) = spec.text_query() {
        lines.push(format!("search: {text}"));
    }
    let lists = [
        ("industry", &spec.industries),
        ("category", &spec.categories),
        ("country", &spec.countries),
        ("office", &spec.office_locations),
        ("uses all of", &spec.technologies_and),
        ("uses any of", &spec.technologies_or),
        ("uses none of", &spec.technologies_not),
    ];
    for (label, values) in lists {
        if !values.is_empty() {
            lines.push(format!("{label}: {}", values.join(", ")));
        }
    }
    if spec.tech_count != Range::default_count() {
        lines.push(format!("technologies: {}", range_text(spec.tech_count)));
    }
    if spec.office_location_count != Range::default_count() {
        lines.push(format!("offices: {}", range_text(spec.office_location_count)));
    }
    if let Some(range) = spec.employee_count {
        lines.push(format!("employees: {}-{}", range.min, range.max));
    }
    if let Some(bound) = &spec.min_revenue {
        lines.push(format!("revenue at least {}", revenue_text(bound)));
    }
    if let Some(bound) = &spec.max_revenue {
        lines.push(format!("revenue at most {}", revenue_text(bound)));
    }
    if let Some(year) = spec.founded_filter() {
        lines.push(format!("founded: {year}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spec_has_no_lines() {
        assert!(describe_spec(&FilterSpec::default()).is_empty());
    }

    #[test]
    fn lists_each_active_constraint() {
        let spec = FilterSpec::new()
            .with_countries(vec!["UK".into()])
            .with_technologies_not(vec!["Java".into()])
            .with_tech_count(5, 50)
            .with_min_revenue(RevenueBound::millions(100.0));
        assert_eq!(
            describe_spec(&spec),
            vec![
                "country: UK",
                "uses none of: Java",
                "technologies: 5+",
                "revenue at least $100M",
            ]
        );
    }
}
