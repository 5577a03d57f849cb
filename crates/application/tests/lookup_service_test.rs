use rbldns_application::services::{LookupService, Zone};
use rbldns_domain::DomainError;
use std::sync::Arc;

mod helpers;
use helpers::MockDataset;

fn zone(name: &str, dataset: MockDataset) -> Arc<Zone> {
    Arc::new(Zone::new(name).with_dataset(Arc::new(dataset)))
}

#[test]
fn test_longest_suffix_wins() {
    let service = LookupService::new(vec![
        zone(
            "example.org",
            MockDataset::new("outer").with_answer("2.0.0.127.bl", "127.0.0.9", None),
        ),
        zone(
            "bl.example.org",
            MockDataset::new("inner").with_answer("2.0.0.127", "127.0.0.2", None),
        ),
    ]);

    let result = service.lookup("2.0.0.127.bl.example.org").unwrap();

    assert_eq!(&*result.first_answer().unwrap().a, "127.0.0.2");
}

#[test]
fn test_trailing_dot_and_case_are_ignored() {
    let service = LookupService::new(vec![zone(
        "bl.example.org",
        MockDataset::new("a").with_answer("spam.example", "127.0.0.2", None),
    )]);

    let result = service.lookup("SPAM.example.BL.example.org.").unwrap();

    assert!(result.is_listed());
}

#[test]
fn test_apex_query_resolves_authority_only() {
    let service = LookupService::new(vec![zone(
        "bl.example.org",
        MockDataset::new("a").with_soa("7m a. b. 1 1h 10m 5d 30s"),
    )]);

    let result = service.lookup("bl.example.org").unwrap();

    assert!(result.soa.is_some());
    assert!(result.results.is_empty());
}

#[test]
fn test_unknown_zone_returns_empty_result() {
    let service = LookupService::new(vec![zone("bl.example.org", MockDataset::new("a"))]);

    let result = service.lookup("2.0.0.127.other.example.org").unwrap();

    assert!(result.is_empty());
}

#[test]
fn test_partial_label_is_not_a_suffix_match() {
    let service = LookupService::new(vec![zone(
        "example.org",
        MockDataset::new("a").with_answer("x", "127.0.0.2", None),
    )]);

    assert!(service.lookup("xexample.org").unwrap().is_empty());
}

#[test]
fn test_unavailable_zone_is_an_error() {
    let service = LookupService::new(vec![zone(
        "bl.example.org",
        MockDataset::new("a").unavailable(),
    )]);

    let result = service.lookup("2.0.0.127.bl.example.org");

    assert_eq!(
        result,
        Err(DomainError::ZoneUnavailable("bl.example.org".to_string()))
    );
}

#[test]
fn test_replace_zones_swaps_table() {
    let service = LookupService::new(vec![zone("old.example.org", MockDataset::new("a"))]);
    assert_eq!(service.zones().len(), 1);

    service.replace_zones(vec![
        zone("new.example.org", MockDataset::new("b")),
        zone("bl.new.example.org", MockDataset::new("c")),
    ]);

    assert!(service.lookup("x.old.example.org").unwrap().is_empty());
    assert_eq!(service.zones()[0].name(), "bl.new.example.org");
}
