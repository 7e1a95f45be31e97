//! Indicator Math Module
//! Series calculations backing the chart's indicator panes: simple and
//! exponential moving averages, MACD, and the multi-period MA overlay.
//! Warmup samples of windowed indicators are NaN so plots skip them.

use rayon::prelude::*;

/// Simple moving average over `period` samples. The first `period - 1`
/// outputs are NaN.
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return vec![f64::NAN; values.len()];
    }

    let mut results = vec![f64::NAN; period - 1];
    let mut sum: f64 = values.iter().take(period).sum();
    results.push(sum / period as f64);

    for i in period..values.len() {
        sum = sum - values[i - period] + values[i];
        results.push(sum / period as f64);
    }
    results
}

/// Exponential moving average seeded from the first sample, defined for
/// every index. Chart indicators want a value from bar one, not a warmup
/// gap.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    if values.is_empty() || period == 0 {
        return vec![f64::NAN; values.len()];
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut results = Vec::with_capacity(values.len());
    let mut previous = values[0];
    results.push(previous);

    for &value in &values[1..] {
        previous = (value - previous) * multiplier + previous;
        results.push(previous);
    }
    results
}

/// MACD output series, one value per input sample.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub dif: Vec<f64>,
    pub dea: Vec<f64>,
    pub hist: Vec<f64>,
}

/// MACD over closes: DIF = EMA(fast) − EMA(slow), DEA = EMA(signal) of
/// DIF, histogram = 2 × (DIF − DEA), the kline-chart convention.
pub fn macd(values: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);
    let dif: Vec<f64> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| f - s)
        .collect();
    let dea = ema(&dif, signal);
    let hist = dif
        .iter()
        .zip(dea.iter())
        .map(|(d, e)| 2.0 * (d - e))
        .collect();
    MacdSeries { dif, dea, hist }
}

/// One SMA line per requested period, computed in parallel, returned in
/// the requested order.
pub fn ma_lines(values: &[f64], periods: &[usize]) -> Vec<(usize, Vec<f64>)> {
    periods
        .par_iter()
        .map(|&period| (period, sma(values, period)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_f64_vec_eq(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len(), "vectors differ in length");
        for (i, (va, vb)) in a.iter().zip(b.iter()).enumerate() {
            if va.is_nan() && vb.is_nan() {
                continue;
            }
            assert!((va - vb).abs() < 1e-9, "mismatch at {i}: {va} != {vb}");
        }
    }

    #[test]
    fn sma_sliding_window() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_f64_vec_eq(&sma(&values, 3), &[f64::NAN, f64::NAN, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn sma_insufficient_data_is_all_nan() {
        let values = [1.0, 2.0];
        assert_f64_vec_eq(&sma(&values, 3), &[f64::NAN, f64::NAN]);
        assert!(sma(&[], 3).is_empty());
    }

    #[test]
    fn ema_seeds_from_first_sample() {
        let values = [10.0, 11.0, 12.0];
        let result = ema(&values, 3); // multiplier = 0.5
        // 10, (11-10)*0.5+10 = 10.5, (12-10.5)*0.5+10.5 = 11.25
        assert_f64_vec_eq(&result, &[10.0, 10.5, 11.25]);
    }

    #[test]
    fn macd_histogram_relation_holds() {
        let values: Vec<f64> = (1..=40).map(|v| v as f64).collect();
        let series = macd(&values, 12, 26, 9);
        assert_eq!(series.dif.len(), values.len());
        for i in 0..values.len() {
            let expected = 2.0 * (series.dif[i] - series.dea[i]);
            assert!((series.hist[i] - expected).abs() < 1e-9);
        }
        // a monotone rise keeps the fast EMA above the slow one
        assert!(series.dif[values.len() - 1] > 0.0);
    }

    #[test]
    fn ma_lines_preserve_requested_order() {
        let values: Vec<f64> = (1..=10).map(|v| v as f64).collect();
        let lines = ma_lines(&values, &[5, 2]);
        assert_eq!(lines[0].0, 5);
        assert_eq!(lines[1].0, 2);
        assert_eq!(lines[0].1.len(), values.len());
        assert_f64_vec_eq(&lines[1].1[..3], &[f64::NAN, 1.5, 2.5]);
    }
}
