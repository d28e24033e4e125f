use statrs::statistics::Statistics;

/// Applies `reducer` to every full window of `period` consecutive defined values.
/// A window containing any `None` yields `None`, as do the first `period - 1` slots.
pub(crate) fn rolling_apply<F>(values: &[Option<f64>], period: usize, reducer: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let mut window = Vec::with_capacity(period);
    for end in (period - 1)..values.len() {
        window.clear();
        window.extend(values[end + 1 - period..=end].iter().map_while(|v| *v));
        if window.len() == period {
            out[end] = finite(reducer(&window));
        }
    }
    out
}

/// Rolling arithmetic mean.
pub(crate) fn rolling_mean(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling_apply(values, period, |w| w.iter().mean())
}

/// Rolling sample standard deviation (n - 1 denominator).
pub(crate) fn rolling_std_dev(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling_apply(values, period, |w| w.iter().std_dev())
}

/// Recursive EMA seeded with the first value, `alpha = 2 / (span + 1)`.
/// Undefined inputs leave a gap and the recursion resumes from the last defined EMA.
pub(crate) fn ema(values: &[Option<f64>], span: usize) -> Vec<Option<f64>> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for value in values {
        let next = match (*value, prev) {
            (Some(v), Some(p)) => Some(alpha * v + (1.0 - alpha) * p),
            (Some(v), None) => Some(v),
            (None, _) => None,
        };
        if next.is_some() {
            prev = next;
        }
        out.push(next);
    }
    out
}

/// Least-squares line through `(0, y0) .. (n-1, yn-1)` evaluated at the last x.
pub(crate) fn linreg_last_value(ys: &[f64]) -> f64 {
    let n = ys.len() as f64;
    if ys.len() < 2 {
        return f64::NAN;
    }
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = ys.iter().mean();
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (i, y) in ys.iter().enumerate() {
        let dx = i as f64 - mean_x;
        sxy += dx * (y - mean_y);
        sxx += dx * dx;
    }
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    intercept + slope * (n - 1.0)
}

/// `a / b * 100`, or `None` when the result would not be a finite number.
#[inline]
pub(crate) fn pct_of(a: f64, b: f64) -> Option<f64> {
    if b.abs() <= f64::EPSILON {
        return None;
    }
    finite(a / b * 100.0)
}

#[inline]
pub(crate) fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(v: &[f64]) -> Vec<Option<f64>> {
        v.iter().copied().map(Some).collect()
    }

    #[test]
    fn rolling_mean_waits_for_a_full_window() {
        let out = rolling_mean(&some(&[1.0, 2.0, 3.0, 4.0]), 3);
        assert_eq!(out, vec![None, None, Some(2.0), Some(3.0)]);
    }

    #[test]
    fn window_with_a_gap_is_undefined() {
        let values = vec![Some(1.0), None, Some(3.0), Some(4.0), Some(5.0)];
        let out = rolling_mean(&values, 2);
        assert_eq!(out, vec![None, None, None, Some(3.5), Some(4.5)]);
    }

    #[test]
    fn std_dev_uses_sample_denominator() {
        let out = rolling_std_dev(&some(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 8);
        let sd = out[7].expect("defined");
        assert!((sd - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn ema_is_seeded_with_first_value() {
        let out = ema(&some(&[10.0, 20.0]), 3);
        assert_eq!(out[0], Some(10.0));
        assert!((out[1].expect("defined") - 15.0).abs() < 1e-12);
    }

    #[test]
    fn linreg_of_a_straight_line_returns_its_last_point() {
        let ys = [1.0, 3.0, 5.0, 7.0, 9.0];
        assert!((linreg_last_value(&ys) - 9.0).abs() < 1e-12);
    }

    #[test]
    fn pct_of_guards_zero_divisor() {
        assert_eq!(pct_of(1.0, 0.0), None);
        assert_eq!(pct_of(1.0, 4.0), Some(25.0));
    }
}
