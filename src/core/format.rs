//! Display formatting for clicked coordinates.
//!
//! Nothing here feeds back into viewer state; the strings only end up in the
//! popup.

use crate::core::geo::{LatLng, Point};

/// Formats a projected (EPSG:3857) coordinate as `"<lat> <lon>"` in
/// hemisphere/degrees/minutes/seconds form, e.g. `30° 02′ 40″ N 31° 14′ 09″ E`.
///
/// Seconds are rounded to `fraction_digits` decimals.
pub fn format_hdms(coordinate: Point, fraction_digits: u32) -> String {
    let lat_lng = LatLng::from_mercator(coordinate);
    format_lat_lng_hdms(lat_lng, fraction_digits)
}

/// Same as [`format_hdms`] for an already unprojected coordinate.
pub fn format_lat_lng_hdms(lat_lng: LatLng, fraction_digits: u32) -> String {
    format!(
        "{} {}",
        degrees_to_hdms(['N', 'S'], lat_lng.lat, fraction_digits),
        degrees_to_hdms(['E', 'W'], lat_lng.lng, fraction_digits)
    )
}

/// Raw projected coordinate as the popup prints it: `("X: …", "Y: …")`.
pub fn format_xy(coordinate: Point) -> (String, String) {
    (
        format!("X: {:.6}", coordinate.x),
        format!("Y: {:.6}", coordinate.y),
    )
}

fn degrees_to_hdms(hemispheres: [char; 2], degrees: f64, fraction_digits: u32) -> String {
    let normalized = (degrees + 180.0).rem_euclid(360.0) - 180.0;
    let total_seconds = (3600.0 * normalized).abs();

    let mut deg = (total_seconds / 3600.0).floor();
    let mut min = ((total_seconds - deg * 3600.0) / 60.0).floor();
    let mut sec = round_half_up(total_seconds - deg * 3600.0 - min * 60.0, fraction_digits);

    if sec >= 60.0 {
        sec = 0.0;
        min += 1.0;
    }
    if min >= 60.0 {
        min = 0.0;
        deg += 1.0;
    }

    let mut hdms = format!("{}\u{00b0}", deg as u32);
    if min != 0.0 || sec != 0.0 {
        hdms.push_str(&format!(" {:02}\u{2032}", min as u32));
    }
    if sec != 0.0 {
        let precision = fraction_digits as usize;
        let width = if precision > 0 { 3 + precision } else { 2 };
        hdms.push_str(&format!(" {:0width$.precision$}\u{2033}", sec));
    }
    if normalized != 0.0 {
        let hemisphere = if normalized < 0.0 { hemispheres[1] } else { hemispheres[0] };
        hdms.push(' ');
        hdms.push(hemisphere);
    }
    hdms
}

// `f64::round` rounds halves away from zero, which is what display code
// expects for non-negative seconds; formatting precision alone rounds to even.
fn round_half_up(value: f64, fraction_digits: u32) -> f64 {
    let factor = 10_f64.powi(fraction_digits as i32);
    (value * factor).round() / factor
}
