//! Scraping realistic tool output end to end.

use pliptab_report::{MarkerPair, ReportError, ReportLocator, scrape};
use pliptab_types::InteractionCategory;

fn fixture(name: &str) -> String {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name);
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn quiet_run_fixture_tallies_every_category() {
    let raw = fixture("quiet_run.txt");

    let report = scrape(&MarkerPair::default(), &raw).unwrap();

    let expected = [
        (InteractionCategory::HydrophobicInteractions, 1),
        (InteractionCategory::HydrogenBonds, 5),
        (InteractionCategory::SaltBridges, 2),
        (InteractionCategory::PiCationInteractions, 0),
        (InteractionCategory::WaterBridges, 0),
        (InteractionCategory::PiStacks, 0),
        (InteractionCategory::HalogenBonds, 0),
        (InteractionCategory::MetalComplexes, 1),
    ];
    for (category, count) in expected {
        assert_eq!(report.get(category), count, "{category}");
    }
}

#[test]
fn located_text_starts_and_ends_on_markers() {
    let raw = fixture("quiet_run.txt");

    let text = MarkerPair::default().locate(&raw).unwrap();

    assert!(text.starts_with("<report>"));
    assert!(text.ends_with("</report>"));
    assert!(!text.contains("<?xml"));
    assert!(!text.contains("[INFO]"));
}

#[test]
fn truncated_output_is_an_extraction_failure() {
    let raw = fixture("quiet_run.txt");
    let cut = raw.find("</interactions>").unwrap();

    let err = scrape(&MarkerPair::default(), &raw[..cut]).unwrap_err();

    assert!(err.is_missing_report());
    match err {
        ReportError::Extract(e) => assert!(e.preview().starts_with("2024-05-02")),
        other => panic!("expected extraction failure, got {other:?}"),
    }
}

#[test]
fn report_without_binding_sites_fails_the_tally() {
    let raw = "[INFO] no ligands\n<report><plipversion>1.4.2</plipversion></report>\n";

    let err = scrape(&MarkerPair::default(), raw).unwrap_err();

    assert!(matches!(err, ReportError::Tally(_)));
    assert_eq!(err.to_string(), "No <interactions> element found in report");
}

#[test]
fn custom_markers_are_honored() {
    let locator = MarkerPair::new("<plip>", "</plip>");
    let raw = "log <plip><interactions><pi_stacks><pi_stack/></pi_stacks></interactions></plip> log";

    let report = scrape(&locator, raw).unwrap();

    assert_eq!(report.get(InteractionCategory::PiStacks), 1);
}
