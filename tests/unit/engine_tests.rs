//! Filter engine scenarios over the sample directory.

use techstack::MsError;
use techstack::search::{FilterSpec, RevenueBound, SortDirection, SortKey, SortSpec, sort_companies};
use techstack::test_utils::fixtures::sample_catalog;
use techstack::test_utils::logging::ScenarioLogger;
use techstack::test_utils::{id_set, ids};

fn run(name: &str, spec: &FilterSpec) -> Vec<techstack::core::Company> {
    let log = ScenarioLogger::new(name);
    log.log_input("spec", spec);
    let results = sample_catalog().search(spec).unwrap();
    log.log_results(&results);
    log.pass();
    results
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

#[test]
fn empty_spec_returns_collection_order() {
    let results = run("empty spec", &FilterSpec::default());
    assert_eq!(ids(&results), (1..=12).collect::<Vec<u64>>());
}

#[test]
fn country_and_required_technology() {
    let spec = FilterSpec::new()
        .with_countries(strings(&["UK"]))
        .with_technologies_and(strings(&["Azure"]));
    assert_eq!(ids(&run("uk azure", &spec)), vec![3]);
}

#[test]
fn excluded_technology_removes_match() {
    let spec = FilterSpec::new()
        .with_countries(strings(&["UK"]))
        .with_technologies_and(strings(&["Azure"]))
        .with_technologies_not(strings(&["Java"]));
    assert!(run("uk azure not java", &spec).is_empty());
}

#[test]
fn any_of_technologies_is_a_hard_constraint() {
    let spec = FilterSpec::new().with_technologies_or(strings(&["Go", "Unity"]));
    assert_eq!(ids(&run("go or unity", &spec)), vec![9, 10]);
}

#[test]
fn none_of_technologies() {
    let spec = FilterSpec::new().with_technologies_not(strings(&["React", "Python", "AWS"]));
    assert_eq!(ids(&run("no react python aws", &spec)), vec![3, 11, 12]);
}

#[test]
fn tech_count_at_ceiling_is_open_ended() {
    let spec = FilterSpec::new().with_tech_count(5, 50);
    assert_eq!(
        ids(&run("five or more technologies", &spec)),
        vec![1, 2, 3, 4, 6, 7, 9, 10]
    );

    let spec = FilterSpec::new().with_tech_count(0, 4);
    assert_eq!(ids(&run("at most four", &spec)), vec![5, 8, 11, 12]);
}

#[test]
fn minimum_revenue_is_inclusive() {
    let spec = FilterSpec::new().with_min_revenue(RevenueBound::millions(120.0));
    assert_eq!(ids(&run("revenue >= 120M", &spec)), vec![1, 3, 7, 10]);
}

#[test]
fn revenue_window() {
    let spec = FilterSpec::new()
        .with_min_revenue(RevenueBound::millions(50.0))
        .with_max_revenue(RevenueBound::millions(90.0));
    assert_eq!(ids(&run("50M-90M", &spec)), vec![2, 4, 6, 9]);
}

#[test]
fn employee_range() {
    let spec = FilterSpec::new().with_employee_count(500, 1000);
    assert_eq!(ids(&run("500-1000 employees", &spec)), vec![2, 4, 8, 9]);
}

#[test]
fn office_location_and_count() {
    let spec = FilterSpec::new().with_office_locations(strings(&["London"]));
    assert_eq!(ids(&run("london office", &spec)), vec![1, 3, 11]);

    let spec = FilterSpec::new().with_office_location_count(3, 50);
    assert_eq!(ids(&run("three or more offices", &spec)), vec![1, 3, 7, 10]);
}

#[test]
fn founded_year_zero_is_unset() {
    let spec = FilterSpec::new().with_founded_year(2008);
    assert_eq!(ids(&run("founded 2008", &spec)), vec![3]);

    let spec = FilterSpec::new().with_founded_year(0);
    assert_eq!(run("founded 0", &spec).len(), 12);
}

#[test]
fn prefix_text_query_combines_with_filters() {
    let spec = FilterSpec::new().with_search("fin");
    let matched = id_set(&run("fin prefix", &spec));
    assert!(matched.contains(&3));
    assert!(matched.contains(&8));

    let spec = FilterSpec::new()
        .with_search("fin")
        .with_countries(strings(&["UK"]));
    assert_eq!(ids(&run("fin prefix in uk", &spec)), vec![3]);
}

#[test]
fn misspelled_name_still_matches() {
    let spec = FilterSpec::new().with_search("HelthWell");
    assert!(ids(&run("typo", &spec)).contains(&2));
}

#[test]
fn results_are_a_subset_of_unfiltered_text_matches() {
    let text_only = FilterSpec::new().with_search("travel");
    let filtered = FilterSpec::new()
        .with_search("travel")
        .with_countries(strings(&["Australia"]));

    let all = id_set(&run("travel", &text_only));
    let some = id_set(&run("travel in australia", &filtered));
    assert_eq!(some, vec![5]);
    assert!(some.iter().all(|id| all.contains(id)));
}

#[test]
fn unknown_spec_key_is_rejected() {
    let err = FilterSpec::from_json(r#"{"technologies": ["Go"]}"#).unwrap_err();
    assert!(matches!(err, MsError::InvalidSpecification(_)));
}

#[test]
fn inverted_revenue_bounds_are_rejected() {
    let spec = FilterSpec::new()
        .with_min_revenue(RevenueBound::billions(1.0))
        .with_max_revenue(RevenueBound::millions(10.0));
    assert!(matches!(
        spec.validate(),
        Err(MsError::InvalidSpecification(_))
    ));
}

#[test]
fn sort_by_revenue_descending() {
    let mut results = run("everything", &FilterSpec::default());
    sort_companies(
        &mut results,
        SortSpec::new(SortKey::Revenue, SortDirection::Desc),
    );
    assert_eq!(ids(&results[..3]), vec![10, 3, 7]);
}

#[test]
fn sort_ties_break_by_name() {
    let mut results = run("advertising", &FilterSpec::new().with_categories(strings(&["AdTech"])));
    sort_companies(
        &mut results,
        SortSpec::new(SortKey::Category, SortDirection::Asc),
    );
    assert_eq!(ids(&results), vec![6, 12]);
}
