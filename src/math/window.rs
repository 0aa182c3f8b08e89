//! Window primitives over fixed-size numeric sequences.
//!
//! These are the three operations the estimator needs from a data-frame
//! library, written as plain index arithmetic:
//!
//! - first difference (with the first element kept as-is)
//! - rolling sum whose window shrinks near index 0
//! - fixed lag with a fill value
//!
//! All functions return a new vector of the same length as the input.

/// First difference with `out[0] = values[0]`, clipped to `>= 0`.
///
/// ```text
/// out[0] = max(0, v[0])
/// out[i] = max(0, v[i] - v[i-1])
/// ```
pub fn clipped_diff(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    for (i, &v) in values.iter().enumerate() {
        let d = if i == 0 { v } else { v - values[i - 1] };
        out.push(d.max(0.0));
    }
    out
}

/// Rolling sum over the trailing `window` observations.
///
/// `out[i] = Σ values[max(0, i+1-window) ..= i]`. Near the start the window
/// shrinks instead of producing a missing value. `window == 0` yields zeros;
/// callers validate the window before getting here.
pub fn rolling_sum(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if window == 0 {
            out.push(0.0);
            continue;
        }
        let start = (i + 1).saturating_sub(window);
        out.push(values[start..=i].iter().sum());
    }
    out
}

/// Shift a sequence forward by `periods`, filling the vacated slots.
///
/// `out[i] = values[i - periods]` for `i >= periods`, else `fill`.
pub fn lag(values: &[f64], periods: usize, fill: f64) -> Vec<f64> {
    (0..values.len())
        .map(|i| if i >= periods { values[i - periods] } else { fill })
        .collect()
}

/// Clip every element to be at least `floor`.
pub fn clip_lower(values: &mut [f64], floor: f64) {
    for v in values.iter_mut() {
        if *v < floor {
            *v = floor;
        }
    }
}
