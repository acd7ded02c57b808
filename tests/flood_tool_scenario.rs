use approx::assert_abs_diff_eq;
use flood_tool::constants::AngleUnit;
use flood_tool::projection::lat_long_to_easting_northing;
use flood_tool::risk_zone::ProbabilityBand;

mod common;
use common::{assert_risk_rows_close, test_tool};

const MESSY_QUERY: [&str; 7] = [
    "tosin", "Ct14 7Pf", "DA1 1PT", "tosin", "DA99nT", "cT147PF", "da11Pt",
];

#[test]
fn test_sorted_flood_probability_end_to_end() {
    let tool = test_tool();
    let report = tool.sorted_flood_probability(&MESSY_QUERY);

    let rows: Vec<(&str, ProbabilityBand)> = report
        .rows()
        .iter()
        .map(|row| (row.postcode.as_str(), row.band))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("DA1 1PT", ProbabilityBand::Medium),
            ("DA9 9NT", ProbabilityBand::Low),
            ("CT147PF", ProbabilityBand::Zero),
        ]
    );
}

#[test]
fn test_sorted_annual_flood_risk_end_to_end() {
    let tool = test_tool();

    let report = tool.sorted_annual_flood_risk(&MESSY_QUERY);
    assert_risk_rows_close(
        &report,
        &[("DA1 1PT", 1406.25017), ("CT147PF", 0.0), ("DA9 9NT", 0.0)],
        1e-6,
    );

    let report = tool.sorted_annual_flood_risk(&["DA1 1PT", "DA9 9NT", "CT147PF", "tosin"]);
    assert_eq!(
        report.postcodes().collect::<Vec<_>>(),
        vec!["DA1 1PT", "CT147PF", "DA9 9NT"]
    );
}

#[test]
fn test_sorted_annual_flood_risk_is_non_increasing() {
    let tool = test_tool();
    let report = tool.sorted_annual_flood_risk(&[
        "DA2 6LL", "CT3 3EL", "DA1 1PT", "DA9 9NT", "CT147PF", "ct33el",
    ]);

    assert_risk_rows_close(
        &report,
        &[
            ("DA1 1PT", 1406.25017),
            ("CT3 3EL", 1250.0),
            ("CT147PF", 0.0),
            ("DA2 6LL", 0.0),
            ("DA9 9NT", 0.0),
        ],
        1e-6,
    );
    for pair in report.rows().windows(2) {
        assert!(pair[0].risk >= pair[1].risk);
        if pair[0].risk == pair[1].risk {
            assert!(pair[0].postcode < pair[1].postcode);
        }
    }
}

#[test]
fn test_lat_long_then_classify() {
    let tool = test_tool();
    let coords = tool.lat_long(&["DA1 1PT", "tosin", "cT3 3eL"]);
    assert_eq!(coords.len(), 3);
    assert!(coords[1].is_nan());

    let grid: Vec<_> = coords
        .iter()
        .map(|c| lat_long_to_easting_northing(c.latitude, c.longitude, AngleUnit::Degrees))
        .collect();
    let eastings: Vec<f64> = grid.iter().map(|g| g.easting).collect();
    let northings: Vec<f64> = grid.iter().map(|g| g.northing).collect();

    let bands = tool
        .easting_northing_flood_probability(&eastings, &northings)
        .unwrap();
    assert_eq!(
        bands,
        vec![
            ProbabilityBand::Medium,
            ProbabilityBand::Zero,
            ProbabilityBand::High
        ]
    );

    let risk = tool
        .annual_flood_risk(&["DA1 1PT", "tosin", "cT3 3eL"], &bands)
        .unwrap();
    assert!(risk[1].is_nan());
    assert_abs_diff_eq!(risk[2], 1250.0, epsilon = 1e-9);
}

#[test]
fn test_report_rendering() {
    let tool = test_tool();
    let report = tool.sorted_flood_probability(&["CT3 3EL", "DA1 1PT"]);

    let mut csv = Vec::new();
    report.write_csv(&mut csv).unwrap();
    assert_eq!(
        String::from_utf8(csv).unwrap(),
        "Postcode,Probability Band\nCT3 3EL,High\nDA1 1PT,Medium\n"
    );
    assert!(report.to_string().contains("CT3 3EL"));
}
