//! Integration tests over the embedded RAL classic chart.

use pretty_assertions::assert_eq;

use devis_data::{POPULAR_CODES, RalCategory, RalChart, RalFilter};

#[test]
fn builtin_chart_loads_the_full_catalog() {
    let chart = RalChart::builtin();

    assert_eq!(chart.len(), 165);
}

#[test]
fn builtin_chart_covers_every_category() {
    let chart = RalChart::builtin();

    for category in RalCategory::ALL {
        let filtered = chart.filter(&RalFilter {
            category: Some(category),
            ..RalFilter::default()
        });
        assert!(
            !filtered.is_empty(),
            "no colors in category {}",
            category.as_str()
        );
    }
}

#[test]
fn whites_and_blacks_have_expected_counts() {
    let chart = RalChart::builtin();

    let blancs = chart.filter(&RalFilter {
        category: Some(RalCategory::Blancs),
        ..RalFilter::default()
    });
    assert_eq!(blancs.len(), 5);

    let noirs = chart.filter(&RalFilter {
        category: Some(RalCategory::Noirs),
        ..RalFilter::default()
    });
    assert_eq!(noirs.len(), 4);
}

#[test]
fn every_popular_code_exists_in_the_chart() {
    let chart = RalChart::builtin();

    let popular = chart.filter(&RalFilter {
        popular_only: true,
        ..RalFilter::default()
    });

    assert_eq!(popular.len(), POPULAR_CODES.len());
    for code in POPULAR_CODES {
        assert!(chart.by_code(code).is_some(), "missing popular code {code}");
    }
}

#[test]
fn searching_anthracite_finds_the_facade_classic() {
    let chart = RalChart::builtin();

    let hits = chart.filter(&RalFilter {
        search: "anthracite".to_string(),
        ..RalFilter::default()
    });

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].code, "RAL 7016");
    assert_eq!(hits[0].category, RalCategory::Gris);
}

#[test]
fn every_swatch_has_a_computable_luminance() {
    let chart = RalChart::builtin();

    for color in chart.colors() {
        let luminance = color
            .luminance()
            .unwrap_or_else(|e| panic!("{}: {e}", color.code));
        assert!((0.0..=1.0).contains(&luminance), "{} out of range", color.code);
    }
}

#[test]
fn pure_white_is_light_and_deep_black_is_not() {
    let chart = RalChart::builtin();

    assert!(chart.by_code("RAL 9010").unwrap().is_light().unwrap());
    assert!(!chart.by_code("RAL 9005").unwrap().is_light().unwrap());
}
