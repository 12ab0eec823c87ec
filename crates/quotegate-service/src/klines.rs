//! Kline row transformation.

use quotegate_core::traits::RawKline;
use quotegate_core::types::Point;
use tracing::debug;

/// Points and volume extracted from a batch of kline rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KlineSeries {
    /// Oldest first
    pub points: Vec<Point>,
    /// Sum of the quote volume column, `None` if no row carried one
    pub quote_volume: Option<f64>,
}

/// Turn raw rows into `(open_time, close)` points and a summed quote volume.
///
/// Rows without a usable open time or close price are skipped.
pub fn klines_to_series(rows: &[RawKline]) -> KlineSeries {
    let mut series = KlineSeries::default();
    let mut skipped = 0usize;

    for row in rows {
        let (Some(t), Some(price)) = (row.open_time(), row.close()) else {
            skipped += 1;
            continue;
        };
        series.points.push(Point { t, price });

        if let Some(volume) = row.quote_volume() {
            *series.quote_volume.get_or_insert(0.0) += volume;
        }
    }

    if skipped > 0 {
        debug!(skipped, kept = series.points.len(), "skipped malformed kline rows");
    }

    series.points.sort_by_key(|p| p.t);
    series
}
