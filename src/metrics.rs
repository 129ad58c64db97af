use time::OffsetDateTime;

/// Smoothing window applied to the request rate unless overridden.
pub const DEFAULT_RPS_WINDOW: usize = 10;

/// Requests per second from a counter series, smoothed with a centered moving
/// average of `window` points.
///
/// Counter decreases (resets) yield a rate of 0 rather than a negative value,
/// as do steps with no elapsed time.
pub fn calculate_rps(timestamps: &[OffsetDateTime], counts: &[f64], window: usize) -> Vec<f64> {
    if counts.len() < 2 {
        return vec![0.0; timestamps.len()];
    }

    let mut rate = Vec::with_capacity(counts.len());
    rate.push(0.0);
    for (ts, cs) in timestamps.windows(2).zip(counts.windows(2)) {
        let dt = (ts[1] - ts[0]).as_seconds_f64();
        if dt > 0.0 {
            rate.push((cs[1] - cs[0]).max(0.0) / dt);
        } else {
            rate.push(0.0);
        }
    }

    if window > 1 {
        moving_average(&rate, window)
    } else {
        rate
    }
}

/// Centered moving average; the half window is `window / 2` on each side,
/// truncated at the series ends.
fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let half = window / 2;
    let n = values.len();
    (0..n)
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(n);
            let slice = &values[start..end];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Failed requests as a percentage of requests, per step. Steps with no
/// requests report 0.
pub fn calculate_error_rate(failed: &[f64], reqs: &[f64]) -> Vec<f64> {
    reqs.iter()
        .enumerate()
        .map(|(i, &r)| {
            if r > 0.0 {
                failed.get(i).copied().unwrap_or(0.0) / r * 100.0
            } else {
                0.0
            }
        })
        .collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Percentile `p` (0..=100) with linear interpolation between closest ranks.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64))
}
