// the collection of small numeric helpers shared by the engine and the analysis code

/// `num_values` evenly spaced points from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    if num_values == 0 {
        return Vec::new();
    }
    if num_values == 1 {
        return vec![start];
    }
    let mut values = Vec::with_capacity(num_values);
    let step = (end - start) / (num_values as f64 - 1.0);

    for i in 0..num_values {
        let value = start + (i as f64 * step);
        values.push(value);
    }
    // pin the last point so the window edge is sampled exactly
    values[num_values - 1] = end;
    values
}

/// Rounds `value` to `digits` decimal places; `-0.0` is normalised to `0.0`.
pub fn round_to(value: f64, digits: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(digits);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Replaces `value` by the nearest integer when it lies within `tol` (relative for large
/// magnitudes) of it.
pub fn snap_to_integer(value: f64, tol: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let nearest = value.round();
    if (value - nearest).abs() <= tol * value.abs().max(1.0) {
        if nearest == 0.0 { 0.0 } else { nearest }
    } else {
        value
    }
}

/// Like [`snap_to_integer`], but also recognises simple multiples of pi (`k*pi/q`, q <= 6),
/// so numerically found roots of trigonometric functions come back as `pi/2`, `3*pi/2`, ...
pub fn snap_nice(value: f64, tol: f64) -> f64 {
    let snapped = snap_to_integer(value, tol);
    if snapped != value || !value.is_finite() {
        return snapped;
    }
    for q in [1.0, 2.0, 3.0, 4.0, 6.0] {
        let k = (value * q / std::f64::consts::PI).round();
        if k == 0.0 || k.abs() > 1000.0 {
            continue;
        }
        let candidate = k * std::f64::consts::PI / q;
        if (value - candidate).abs() <= tol * value.abs().max(1.0) {
            return candidate;
        }
    }
    value
}

/// Sorts `values` and merges points closer than `tol`, keeping the first of each cluster.
pub fn sorted_unique(mut values: Vec<f64>, tol: f64) -> Vec<f64> {
    values.retain(|v| !v.is_nan());
    values.sort_by(|a, b| a.total_cmp(b));
    let mut out: Vec<f64> = Vec::with_capacity(values.len());
    for v in values {
        match out.last() {
            Some(last) if (v - last).abs() <= tol * last.abs().max(1.0) => {}
            _ => out.push(v),
        }
    }
    out
}
