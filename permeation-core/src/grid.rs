//! Evenly spaced sample helpers. Both endpoints are reproduced exactly.

pub fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (points - 1) as f64;
            let mut values: Vec<f64> = (0..points).map(|i| start + step * i as f64).collect();
            values[points - 1] = end;
            values
        }
    }
}

/// Log-spaced samples between two values of the same sign.
pub fn geomspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    let log_start = start.abs().log10();
    let log_end = end.abs().log10();
    let sign = start.signum();
    let mut values: Vec<f64> = linspace(log_start, log_end, points)
        .into_iter()
        .map(|exponent| sign * 10f64.powf(exponent))
        .collect();
    if let Some(first) = values.first_mut() {
        *first = start;
    }
    if points > 1 {
        values[points - 1] = end;
    }
    values
}
