// File: crates/stream-core/src/scale.rs
// Summary: Time (X), value (Y) and band scales mapping data domains to pixel ranges.

use chrono::{DateTime, Utc};

use crate::grid::{linear_ticks, month_starts};

/// Domain used when there is no data to derive one from.
pub const FALLBACK_DOMAIN: (f64, f64) = (0.0, 1.0);

/// General scale operations shared by the continuous scales.
pub trait ScaleTransform {
    fn to_px(&self, v: f64) -> f64;
    fn from_px(&self, px: f64) -> f64;
}

/// Continuous linear mapping from `domain` to `range`.
///
/// A degenerate domain (`d0 == d1`) maps every value to the middle of the range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let domain = if domain.0.is_finite() && domain.1.is_finite() { domain } else { FALLBACK_DOMAIN };
        Self { domain, range }
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        linear_ticks(self.domain.0, self.domain.1, count)
    }
}

impl ScaleTransform for LinearScale {
    #[inline]
    fn to_px(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (v - d0) / span };
        r0 + t * (r1 - r0)
    }

    #[inline]
    fn from_px(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        if span == 0.0 {
            return d0;
        }
        d0 + (px - r0) / span * (d1 - d0)
    }
}

/// Horizontal time scale over epoch milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    pub linear: LinearScale,
}

impl TimeScale {
    /// Domain in epoch milliseconds, range `[0, width]`.
    pub fn new(domain_ms: (f64, f64), width: f64) -> Self {
        Self { linear: LinearScale::new(domain_ms, (0.0, width)) }
    }

    /// Domain `[min, max]` of the given timestamps, range `[0, width]`.
    pub fn from_dates<I>(dates: I, width: f64) -> Self
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for d in dates {
            let ms = d.timestamp_millis() as f64;
            lo = lo.min(ms);
            hi = hi.max(ms);
        }
        let domain = if lo.is_finite() && hi.is_finite() { (lo, hi) } else { FALLBACK_DOMAIN };
        Self::new(domain, width)
    }

    #[inline]
    pub fn date_to_px(&self, d: DateTime<Utc>) -> f64 {
        self.to_px(d.timestamp_millis() as f64)
    }

    pub fn domain_dates(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let (d0, d1) = self.linear.domain;
        Some((
            DateTime::from_timestamp_millis(d0 as i64)?,
            DateTime::from_timestamp_millis(d1 as i64)?,
        ))
    }

    /// Month-start ticks within the domain.
    pub fn month_ticks(&self) -> Vec<DateTime<Utc>> {
        match self.domain_dates() {
            Some((a, b)) => month_starts(a, b),
            None => Vec::new(),
        }
    }
}

impl ScaleTransform for TimeScale {
    #[inline]
    fn to_px(&self, ms: f64) -> f64 { self.linear.to_px(ms) }
    #[inline]
    fn from_px(&self, px: f64) -> f64 { self.linear.from_px(px) }
}

/// Vertical value scale; range is inverted so larger values plot higher.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueScale {
    pub linear: LinearScale,
}

impl ValueScale {
    /// Domain from `extent` (or the fallback), range `[height, 0]`.
    pub fn new(extent: Option<(f64, f64)>, height: f64) -> Self {
        Self { linear: LinearScale::new(extent.unwrap_or(FALLBACK_DOMAIN), (height, 0.0)) }
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        self.linear.ticks(count)
    }
}

impl ScaleTransform for ValueScale {
    #[inline]
    fn to_px(&self, v: f64) -> f64 { self.linear.to_px(v) }
    #[inline]
    fn from_px(&self, px: f64) -> f64 { self.linear.from_px(px) }
}

/// Ordinal band scale: equal-width bands with inner and outer padding, centered in range.
/// Duplicate domain entries collapse into the first occurrence.
#[derive(Clone, Debug, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new<I, S>(domain: I, range: (f64, f64), padding: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut uniq: Vec<String> = Vec::new();
        for s in domain {
            let s = s.into();
            if !uniq.contains(&s) {
                uniq.push(s);
            }
        }
        let padding = padding.clamp(0.0, 1.0);
        let n = uniq.len() as f64;
        let (lo, hi) = if range.1 < range.0 { (range.1, range.0) } else { range };
        let step = (hi - lo) / (n - padding + 2.0 * padding).max(1.0);
        let start = lo + (hi - lo - step * (n - padding)) * 0.5;
        Self { domain: uniq, start, step, bandwidth: step * (1.0 - padding) }
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Left edge of the band for `label`.
    pub fn position(&self, label: &str) -> Option<f64> {
        self.domain.iter().position(|d| d == label).map(|i| self.start + self.step * i as f64)
    }
}

/// The pair of scales used for one render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scales {
    pub x: TimeScale,
    pub y: ValueScale,
}
