//! Property tests for filter engine laws.

use proptest::prelude::*;

use techstack::core::Company;
use techstack::search::{FilterSpec, Range, RevenueBound, search};

const TECHS: [&str; 6] = ["React", "AWS", "Go", "Python", "Java", "Azure"];
const COUNTRIES: [&str; 3] = ["UK", "USA", "Japan"];

fn arb_company() -> impl Strategy<Value = Company> {
    (
        1u64..10_000,
        "[A-Z][a-z]{2,10}",
        prop::sample::select(&COUNTRIES[..]),
        0u64..5_000,
        0u64..500_000_000,
        prop::sample::subsequence(&TECHS[..], 0..=TECHS.len()),
    )
        .prop_map(|(id, name, country, employees, revenue, techs)| {
            Company::new(id, name.clone(), format!("{}.test", name.to_lowercase()))
                .with_country(country)
                .with_employees(employees)
                .with_revenue(revenue)
                .with_technologies(techs)
        })
}

/// Companies with unique ids, as a loaded collection would hold.
fn arb_collection() -> impl Strategy<Value = Vec<Company>> {
    prop::collection::vec(arb_company(), 0..25).prop_map(|companies| {
        let mut seen = std::collections::HashSet::new();
        companies
            .into_iter()
            .filter(|c| seen.insert(c.id))
            .collect()
    })
}

fn arb_techs() -> impl Strategy<Value = Vec<String>> {
    prop::sample::subsequence(&TECHS[..], 0..=3)
        .prop_map(|techs| techs.into_iter().map(str::to_string).collect())
}

fn arb_spec() -> impl Strategy<Value = FilterSpec> {
    (
        arb_techs(),
        arb_techs(),
        arb_techs(),
        prop::option::of(prop::sample::select(&COUNTRIES[..])),
        prop::option::of((0u64..3_000, 0u64..3_000)),
        prop::option::of(0.0f64..400.0),
    )
        .prop_map(|(and, or, not, country, employees, min_revenue)| {
            let mut spec = FilterSpec::new()
                .with_technologies_and(and)
                .with_technologies_or(or)
                .with_technologies_not(not);
            if let Some(country) = country {
                spec = spec.with_countries(vec![country.to_string()]);
            }
            if let Some((a, b)) = employees {
                spec = spec.with_employee_count(a.min(b), a.max(b));
            }
            if let Some(millions) = min_revenue {
                spec = spec.with_min_revenue(RevenueBound::millions(millions));
            }
            spec
        })
}

fn ids(companies: &[Company]) -> Vec<u64> {
    companies.iter().map(|c| c.id).collect()
}

proptest! {
    #[test]
    fn empty_spec_is_identity(collection in arb_collection()) {
        let results = search(&collection, &FilterSpec::default()).unwrap();
        prop_assert_eq!(results, collection);
    }

    #[test]
    fn results_are_ordered_subset(collection in arb_collection(), spec in arb_spec()) {
        let results = search(&collection, &spec).unwrap();
        let all = ids(&collection);
        let mut cursor = 0;
        for id in ids(&results) {
            let pos = all[cursor..].iter().position(|x| *x == id);
            prop_assert!(pos.is_some(), "result {} missing or out of order", id);
            cursor += pos.unwrap_or(0) + 1;
        }
    }

    #[test]
    fn every_result_satisfies_every_predicate(collection in arb_collection(), spec in arb_spec()) {
        for company in search(&collection, &spec).unwrap() {
            prop_assert!(spec.technologies_and.iter().all(|t| company.has_technology(t)));
            prop_assert!(!spec.technologies_not.iter().any(|t| company.has_technology(t)));
            prop_assert!(
                spec.technologies_or.is_empty()
                    || spec.technologies_or.iter().any(|t| company.has_technology(t))
            );
            if let Some(range) = spec.employee_count {
                prop_assert!(range.contains(company.employees));
            }
            if let Some(bound) = spec.min_revenue {
                prop_assert!(company.revenue >= bound.absolute());
            }
        }
    }

    #[test]
    fn company_is_retained_iff_it_matches(collection in arb_collection(), spec in arb_spec()) {
        prop_assume!(spec.search.is_none());
        let results = search(&collection, &spec).unwrap();
        for company in &collection {
            prop_assert_eq!(
                results.contains(company),
                spec.matches(company),
                "company {} retained/matches disagree",
                company.id
            );
        }
    }

    #[test]
    fn filtering_is_idempotent(collection in arb_collection(), spec in arb_spec()) {
        let once = search(&collection, &spec).unwrap();
        let twice = search(&once, &spec).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn adding_a_predicate_never_grows_results(
        collection in arb_collection(),
        spec in arb_spec(),
        extra in prop::sample::select(&TECHS[..]),
    ) {
        let base = search(&collection, &spec).unwrap();
        let narrowed = spec.clone().with_technologies_not(
            spec.technologies_not.iter().cloned().chain([extra.to_string()]).collect(),
        );
        let narrowed = search(&collection, &narrowed).unwrap();
        prop_assert!(narrowed.len() <= base.len());
        prop_assert!(ids(&narrowed).iter().all(|id| ids(&base).contains(id)));
    }

    #[test]
    fn range_bounds_are_inclusive(employees in 0u64..10_000) {
        let company = Company::new(1, "Edge", "edge.test").with_employees(employees);
        let spec = FilterSpec::new().with_employee_count(employees, employees);
        prop_assert!(spec.matches(&company));
        prop_assert!(Range::new(employees, employees).contains(employees));
    }
}
