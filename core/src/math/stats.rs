pub struct StatsHelper;

impl StatsHelper {
    /// Returns `(min, max)` over the given values, or `None` when empty.
    pub fn extent<I>(values: I) -> Option<(u32, u32)>
    where
        I: IntoIterator<Item = u32>,
    {
        values.into_iter().fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
    }

    /// Clamps `value / full_scale` into `[0, 1]`; a non-positive scale yields 1.
    pub fn unit_ratio(value: f64, full_scale: f64) -> f64 {
        if full_scale <= 0.0 || !full_scale.is_finite() {
            return 1.0;
        }
        (value / full_scale).clamp(0.0, 1.0)
    }
}
