// File: crates/stream-core/src/grid.rs
// Summary: Tick layout helpers (nice linear ticks, UTC month boundaries).

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Round-number ticks covering `[start, stop]`, roughly `count` of them.
/// Steps are 1, 2 or 5 times a power of ten; ticks never fall outside the interval.
pub fn linear_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let (lo, hi, reverse) = if stop < start { (stop, start, true) } else { (start, stop, false) };

    let raw_step = (hi - lo) / count as f64;
    let power = raw_step.log10().floor();
    let error = raw_step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    // Integer tick indices keep decimal steps like 0.1 exact.
    let mut ticks = Vec::new();
    if power < 0.0 {
        let inc = 10f64.powf(-power) / factor;
        let mut i1 = (lo * inc).round();
        let mut i2 = (hi * inc).round();
        if i1 / inc < lo { i1 += 1.0; }
        if i2 / inc > hi { i2 -= 1.0; }
        let mut i = i1;
        while i <= i2 {
            ticks.push(i / inc);
            i += 1.0;
        }
    } else {
        let inc = 10f64.powf(power) * factor;
        let mut i1 = (lo / inc).round();
        let mut i2 = (hi / inc).round();
        if i1 * inc < lo { i1 += 1.0; }
        if i2 * inc > hi { i2 -= 1.0; }
        let mut i = i1;
        while i <= i2 {
            ticks.push(i * inc);
            i += 1.0;
        }
    }
    if reverse {
        ticks.reverse();
    }
    ticks
}

/// First instant of every UTC month in `[start, stop]`, both ends inclusive.
pub fn month_starts(start: DateTime<Utc>, stop: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let mut out = Vec::new();
    if stop < start {
        return out;
    }
    let mut year = start.year();
    let mut month = start.month();
    let Some(mut cur) = month_start(year, month) else { return out };
    if cur < start {
        (year, month) = next_month(year, month);
        match month_start(year, month) {
            Some(t) => cur = t,
            None => return out,
        }
    }
    while cur <= stop {
        out.push(cur);
        (year, month) = next_month(year, month);
        match month_start(year, month) {
            Some(t) => cur = t,
            None => break,
        }
    }
    out
}

fn month_start(year: i32, month: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// Compact tick label: integers without decimals, otherwise trailing zeros trimmed.
pub fn format_tick(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        return format!("{}", v as i64);
    }
    let s = format!("{v:.6}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
