/// Continuous area scale for label sizes.
///
/// The domain is trained on the values it will map; the output range is
/// `[lo, hi]`. Values are mapped by area, so `sqrt` of the rescaled value is
/// spread over the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeScale {
    pub lo: f64,
    pub hi: f64,
    domain: Option<(f64, f64)>,
}

impl SizeScale {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self {
            lo,
            hi,
            domain: None,
        }
    }

    /// Extends the domain with every finite value.
    pub fn train(&mut self, values: impl IntoIterator<Item = f64>) {
        for v in values.into_iter().filter(|v| v.is_finite()) {
            self.domain = Some(match self.domain {
                Some((min, max)) => (min.min(v), max.max(v)),
                None => (v, v),
            });
        }
    }

    pub fn domain(&self) -> Option<(f64, f64)> {
        self.domain
    }

    /// Maps `v` by area into `[lo, hi]`.
    ///
    /// An untrained scale or one trained on a single value maps everything to
    /// `hi`, so a scale whose inputs are all pinned to `hi` returns exactly `hi`.
    pub fn map(&self, v: f64) -> f64 {
        let Some((min, max)) = self.domain else {
            return self.hi;
        };
        let span = max - min;
        if span.abs() < 1e-12 {
            return self.hi;
        }
        let t = ((v - min) / span).clamp(0.0, 1.0);
        self.lo + t.sqrt() * (self.hi - self.lo)
    }
}
