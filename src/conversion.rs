use crate::constants::{ArcSec, Degree, Radian, RADEG};

/// Estimate the accuracy of a numeric string based on its decimal precision.
///
/// Arguments
/// ---------------
/// * `field`: a string slice containing the numeric value (e.g., `"27.2531"`), typically the seconds component of an angle
/// * `factor`: a scale factor to apply to the accuracy (e.g., `1.0 / 3600.0` to express seconds in degrees)
///
/// Return
/// ----------
/// * `f64`: the estimated accuracy scaled by `factor`
fn compute_accuracy(field: &str, factor: f64) -> f64 {
    match field.find('.') {
        Some(dot_pos) => {
            let digits_after_dot = field.trim().len() - dot_pos - 1;
            10f64.powi(-(digits_after_dot as i32)) * factor
        }
        None => factor,
    }
}

/// Convert a degrees/minutes/seconds triple to radians.
///
/// The sign of the angle is carried by `deg`; `min` and `sec` are taken as magnitudes.
pub fn dms_to_rad(deg: f64, min: f64, sec: f64) -> Radian {
    let sign = if deg.is_sign_negative() { -1.0 } else { 1.0 };
    sign * (deg.abs() + min / 60.0 + sec / 3600.0) * RADEG
}

/// Split an angle in radians into whole degrees, whole minutes and seconds.
///
/// Seconds are rounded to four decimals. Negative angles carry the sign on the
/// degree component only.
pub fn rad_to_dms(angle: Radian) -> (f64, f64, f64) {
    let d = angle / RADEG;
    let sign = if d < 0.0 { -1.0 } else { 1.0 };

    // round once on the total so the carry into minutes and degrees is exact
    let total_sec = (d.abs() * 3600.0 * 1e4).round() / 1e4;

    let deg = (total_sec / 3600.0).floor();
    let min = ((total_sec - deg * 3600.0) / 60.0).floor();
    let sec = ((total_sec - deg * 3600.0 - min * 60.0) * 1e4).round() / 1e4;

    (sign * deg, min, sec)
}

/// Parse a latitude or longitude written in degrees, minutes and seconds.
///
/// Two notations are accepted:
/// * space separated with a signed degree field, `"-01 30 00"`;
/// * symbol separated with a hemisphere suffix, `52°39'27.2531"N` or `1°43'4.5177"W`.
///
/// Returns
/// -------
/// * `Some((degrees, accuracy))` where the accuracy of the seconds field is in arcseconds,
///   `None` when the text is not a three-field DMS angle.
pub fn parse_dms_to_deg(angle: &str) -> Option<(Degree, ArcSec)> {
    let trimmed = angle.trim();
    let (body, hemisphere_sign) = match trimmed.chars().last()? {
        'N' | 'E' => (&trimmed[..trimmed.len() - 1], 1.0),
        'S' | 'W' => (&trimmed[..trimmed.len() - 1], -1.0),
        _ => (trimmed, 1.0),
    };

    let fields: Vec<&str> = body
        .split(|c: char| c.is_whitespace() || matches!(c, '°' | '\'' | '"'))
        .filter(|f| !f.is_empty())
        .collect();
    let [deg_raw, min_raw, sec_raw] = fields.as_slice() else {
        return None;
    };

    let sign = (if deg_raw.starts_with('-') { -1.0 } else { 1.0 }) * hemisphere_sign;
    let deg: f64 = deg_raw.trim_start_matches(['-', '+']).parse().ok()?;
    let min: f64 = min_raw.parse().ok()?;
    let sec: f64 = sec_raw.parse().ok()?;

    Some((
        sign * (deg + min / 60.0 + sec / 3600.0),
        compute_accuracy(sec_raw, 1.0),
    ))
}

#[cfg(test)]
mod conversion_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dms_to_rad() {
        assert_relative_eq!(dms_to_rad(49.0, 0.0, 0.0), 49.0_f64.to_radians());
        assert_relative_eq!(dms_to_rad(-2.0, 0.0, 0.0), -2.0_f64.to_radians());
        assert_relative_eq!(
            dms_to_rad(52.0, 39.0, 27.2531),
            52.657570305555556_f64.to_radians(),
            max_relative = 1e-14
        );
        assert_relative_eq!(
            dms_to_rad(-1.0, 30.0, 0.0),
            -1.5_f64.to_radians(),
            max_relative = 1e-14
        );
    }

    #[test]
    fn test_rad_to_dms() {
        let (d, m, s) = rad_to_dms(dms_to_rad(52.0, 39.0, 27.2531));
        assert_eq!((d, m), (52.0, 39.0));
        assert_relative_eq!(s, 27.2531, epsilon = 1e-6);

        let (d, m, s) = rad_to_dms(dms_to_rad(-2.0, 15.0, 0.0));
        assert_eq!((d, m), (-2.0, 15.0));
        assert_relative_eq!(s, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_parse_dms_to_deg() {
        let (deg, acc) = parse_dms_to_deg("52 39 27.2531").unwrap();
        assert_relative_eq!(deg, 52.657570305555556, max_relative = 1e-14);
        assert_relative_eq!(acc, 1e-4, max_relative = 1e-12);

        let (deg, acc) = parse_dms_to_deg("-01 30 00").unwrap();
        assert_relative_eq!(deg, -1.5);
        assert_eq!(acc, 1.0);

        let (deg, _) = parse_dms_to_deg("52°39'27.2531\"N").unwrap();
        assert_relative_eq!(deg, 52.657570305555556, max_relative = 1e-14);
        let (deg, _) = parse_dms_to_deg("1°43'4.5177\"W").unwrap();
        assert_relative_eq!(deg, -1.717921583333333, max_relative = 1e-12);

        assert_eq!(parse_dms_to_deg("52 39"), None);
        assert_eq!(parse_dms_to_deg(""), None);
        assert_eq!(parse_dms_to_deg("52 39 27.2.1"), None);
    }

    #[test]
    fn test_estimate_accuracy() {
        assert_relative_eq!(compute_accuracy("23.3", 1.), 0.1, max_relative = 1e-12);
        assert_eq!(compute_accuracy("23", 1.), 1.0);
        assert_relative_eq!(compute_accuracy("23.370", 1.), 1e-3, max_relative = 1e-12);
    }
}
