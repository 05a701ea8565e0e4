// File: crates/stream-core/src/stack.rs
// Summary: Stack layout with a wiggle-minimizing baseline (streamgraph offset).

use crate::record::Record;

/// Vertical extent of one series at one time point, after the baseline offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackedBand {
    pub low: f64,
    pub high: f64,
}

impl StackedBand {
    #[inline]
    pub fn thickness(&self) -> f64 {
        self.high - self.low
    }

    #[inline]
    pub fn contains(&self, y: f64) -> bool {
        y >= self.low && y <= self.high
    }
}

/// All bands of one series, one per record, in record order.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub key: String,
    pub index: usize,
    pub bands: Vec<StackedBand>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StackLayout {
    /// One layer per key, in stack (key) order.
    pub layers: Vec<Layer>,
    /// Baseline (low of the bottom layer) per record.
    pub baseline: Vec<f64>,
}

impl StackLayout {
    pub fn is_empty(&self) -> bool {
        self.baseline.is_empty()
    }

    pub fn len(&self) -> usize {
        self.baseline.len()
    }

    pub fn layer(&self, key: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.key == key)
    }

    pub fn band_count(&self) -> usize {
        self.layers.iter().map(|l| l.bands.len()).sum()
    }

    /// `(min low, max high)` over all bands, `None` when there are no bands.
    pub fn extent(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for b in self.layers.iter().flat_map(|l| l.bands.iter()) {
            lo = lo.min(b.low);
            hi = hi.max(b.high);
        }
        if lo.is_finite() && hi.is_finite() { Some((lo, hi)) } else { None }
    }

    /// Bands of every layer at record `j`, bottom to top.
    pub fn column(&self, j: usize) -> Vec<StackedBand> {
        self.layers.iter().filter_map(|l| l.bands.get(j).copied()).collect()
    }
}

/// Wiggle baseline per record.
///
/// Starting from 0, each step moves the baseline by the value-weighted mean slope of the
/// layer midlines, so that the sum of squared slopes across layers is minimized:
/// `y[j] = y[j-1] - Σ_i v_ij (d_ij / 2 + Σ_{k<i} d_kj) / Σ_i v_ij` with `d_ij = v_ij - v_i(j-1)`.
/// A record whose values sum to zero keeps the previous baseline.
pub fn wiggle_baseline(records: &[Record], series: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(records.len());
    if records.is_empty() {
        return out;
    }
    let mut y = 0.0;
    out.push(y);
    for pair in records.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let mut total = 0.0;
        let mut weighted = 0.0;
        let mut below = 0.0;
        for i in 0..series {
            let v = cur.value(i);
            let d = v - prev.value(i);
            weighted += v * (d / 2.0 + below);
            total += v;
            below += d;
        }
        if total != 0.0 {
            y -= weighted / total;
        }
        out.push(y);
    }
    out
}

/// Stack `records` in `keys` order over a wiggle baseline.
#[tracing::instrument(skip_all, fields(records = records.len(), keys = keys.len()))]
pub fn stack(records: &[Record], keys: &[String]) -> StackLayout {
    let baseline = wiggle_baseline(records, keys.len());
    let mut layers: Vec<Layer> = keys
        .iter()
        .enumerate()
        .map(|(index, key)| Layer { key: key.clone(), index, bands: Vec::with_capacity(records.len()) })
        .collect();

    for (rec, &base) in records.iter().zip(&baseline) {
        let mut low = base;
        for (i, layer) in layers.iter_mut().enumerate() {
            let high = low + rec.value(i);
            layer.bands.push(StackedBand { low, high });
            low = high;
        }
    }

    let layout = StackLayout { layers, baseline };
    tracing::debug!(bands = layout.band_count(), extent = ?layout.extent(), "stacked layers");
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn rec(day: u32, values: &[f64]) -> Record {
        Record::new(Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(), values.to_vec())
    }

    fn keys(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("s{i}")).collect()
    }

    #[test]
    fn first_baseline_is_zero() {
        let layout = stack(&[rec(1, &[3.0, 4.0])], &keys(2));
        assert_eq!(layout.column(0), vec![
            StackedBand { low: 0.0, high: 3.0 },
            StackedBand { low: 3.0, high: 7.0 },
        ]);
    }

    #[test]
    fn wiggle_matches_hand_computation() {
        // j=1: v=[20,5], d=[10,5]; weighted = 20*(5+0) + 5*(2.5+10) = 162.5; total = 25
        let recs = [rec(1, &[10.0, 0.0]), rec(2, &[20.0, 5.0])];
        let base = wiggle_baseline(&recs, 2);
        assert_eq!(base[0], 0.0);
        assert!((base[1] - (-6.5)).abs() < 1e-12);
    }

    #[test]
    fn constant_series_keep_flat_baseline() {
        let recs = [rec(1, &[2.0, 3.0]), rec(2, &[2.0, 3.0]), rec(3, &[2.0, 3.0])];
        assert_eq!(wiggle_baseline(&recs, 2), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn all_zero_record_keeps_previous_baseline() {
        let recs = [rec(1, &[1.0]), rec(2, &[4.0]), rec(3, &[0.0])];
        let base = wiggle_baseline(&recs, 1);
        assert_eq!(base[2], base[1]);
    }

    #[test]
    fn empty_records_give_empty_layout() {
        let layout = stack(&[], &keys(3));
        assert!(layout.is_empty());
        assert_eq!(layout.band_count(), 0);
        assert_eq!(layout.layers.len(), 3);
        assert_eq!(layout.extent(), None);
    }

    #[test]
    fn layers_follow_key_order_not_value() {
        let layout = stack(&[rec(1, &[1.0, 100.0, 10.0])], &keys(3));
        let order: Vec<&str> = layout.layers.iter().map(|l| l.key.as_str()).collect();
        assert_eq!(order, ["s0", "s1", "s2"]);
        assert_eq!(layout.layer("s1").map(|l| l.bands[0].low), Some(1.0));
    }
}
