use approx::assert_abs_diff_eq;
use camino::Utf8PathBuf;
use flood_tool::flood_tool::{DataSources, FloodTool};
use flood_tool::report::RiskReport;

pub fn test_data_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data")
}

pub fn test_sources() -> DataSources {
    DataSources::from_dir(test_data_dir())
}

pub fn test_tool() -> FloodTool {
    FloodTool::from_sources(&test_sources()).expect("test CSV fixtures should load")
}

pub fn assert_risk_rows_close(actual: &RiskReport, expected: &[(&str, f64)], epsilon: f64) {
    assert_eq!(actual.len(), expected.len(), "row count differs: {actual:?}");
    for (row, (postcode, risk)) in actual.rows().iter().zip(expected) {
        assert_eq!(row.postcode, *postcode);
        assert_abs_diff_eq!(row.risk, *risk, epsilon = epsilon);
    }
}
