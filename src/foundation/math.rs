use std::f64::consts::{PI, TAU};

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Normalize an angle in radians into `(-PI, PI]`.
pub fn wrap_angle(rad: f64) -> f64 {
    let r = rad.rem_euclid(TAU);
    if r > PI { r - TAU } else { r }
}

/// Shortest signed angular difference `to - from`, in `(-PI, PI]`.
pub fn angle_delta(from: f64, to: f64) -> f64 {
    wrap_angle(to - from)
}

/// Median of a set of angles, computed after unwrapping every sample around the last one.
///
/// Returns `None` for an empty slice. Even-length inputs average the two middle samples.
pub fn circular_median(angles: &[f64]) -> Option<f64> {
    let reference = *angles.last()?;
    let mut unwrapped: Vec<f64> = angles
        .iter()
        .map(|&a| reference + angle_delta(reference, a))
        .collect();
    unwrapped.sort_by(f64::total_cmp);

    let mid = unwrapped.len() / 2;
    let median = if unwrapped.len() % 2 == 1 {
        unwrapped[mid]
    } else {
        0.5 * (unwrapped[mid - 1] + unwrapped[mid])
    };
    Some(wrap_angle(median))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
