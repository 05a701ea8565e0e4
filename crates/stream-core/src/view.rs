// File: crates/stream-core/src/view.rs
// Data domains of a stacked dataset and derivation of the render scales from them.

use crate::record::Record;
use crate::scale::{Scales, TimeScale, ValueScale, FALLBACK_DOMAIN};
use crate::stack::StackLayout;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    /// Time domain in epoch milliseconds.
    pub x_min: f64,
    pub x_max: f64,
    /// Value domain: lowest band low to highest band high.
    pub y_min: f64,
    pub y_max: f64,
    /// False when derived from an empty dataset; the domains are then the fallback.
    pub has_data: bool,
}

impl ViewState {
    pub fn from_layout(records: &[Record], layout: &StackLayout) -> Self {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        for r in records {
            let t = r.timestamp_ms();
            x_min = x_min.min(t);
            x_max = x_max.max(t);
        }
        let (fx0, fx1) = FALLBACK_DOMAIN;
        let extent = layout.extent();
        if !x_min.is_finite() || !x_max.is_finite() || extent.is_none() {
            return Self { x_min: fx0, x_max: fx1, y_min: fx0, y_max: fx1, has_data: false };
        }
        let (y_min, y_max) = extent.unwrap_or(FALLBACK_DOMAIN);
        Self { x_min, x_max, y_min, y_max, has_data: true }
    }

    /// Time scale over `[0, width]`, value scale over `[height, 0]`.
    pub fn scales(&self, width: f64, height: f64) -> Scales {
        let scales = Scales {
            x: TimeScale::new((self.x_min, self.x_max), width),
            y: ValueScale::new(Some((self.y_min, self.y_max)), height),
        };
        tracing::debug!(
            x = ?scales.x.linear.domain,
            y = ?scales.y.linear.domain,
            has_data = self.has_data,
            "derived scales"
        );
        scales
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::ScaleTransform;
    use crate::stack::stack;
    use chrono::{TimeZone, Utc};

    #[test]
    fn domains_cover_wiggle_extent() {
        let keys = vec!["A".to_string(), "B".to_string()];
        let recs = vec![
            Record::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), vec![10.0, 0.0]),
            Record::new(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(), vec![20.0, 5.0]),
        ];
        let layout = stack(&recs, &keys);
        let v = ViewState::from_layout(&recs, &layout);
        assert!(v.has_data);
        assert!((v.y_min - (-6.5)).abs() < 1e-12);
        assert!((v.y_max - 18.5).abs() < 1e-12);
        let s = v.scales(320.0, 330.0);
        assert_eq!(s.y.to_px(v.y_max), 0.0);
        assert_eq!(s.y.to_px(v.y_min), 330.0);
        assert_eq!(s.x.date_to_px(recs[1].date), 320.0);
    }

    #[test]
    fn empty_data_uses_fallback() {
        let layout = stack(&[], &["A".to_string()]);
        let v = ViewState::from_layout(&[], &layout);
        assert!(!v.has_data);
        assert_eq!((v.y_min, v.y_max), FALLBACK_DOMAIN);
        let s = v.scales(320.0, 330.0);
        assert!(s.x.to_px(0.5).is_finite());
        assert!(s.y.to_px(0.5).is_finite());
    }
}
