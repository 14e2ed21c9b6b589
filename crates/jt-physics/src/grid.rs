// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — Time Grid
// ─────────────────────────────────────────────────────────────────────

use jt_types::{JtConfig, JtError, JtResult};

/// Uniform, strictly increasing sample times over `[t_start, t_end]`,
/// both endpoints included exactly. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    t: Vec<f64>,
}

impl TimeGrid {
    /// Fails before allocating if the bounds or size are unusable.
    pub fn new(t_start: f64, t_end: f64, n: usize) -> JtResult<Self> {
        if !(t_start.is_finite() && t_end.is_finite()) || t_end <= t_start {
            return Err(JtError::Config(format!(
                "t_end must be greater than t_start, got [{t_start}, {t_end}]"
            )));
        }
        if n < 2 {
            return Err(JtError::Config(format!("grid_size must be >= 2, got {n}")));
        }
        let step = (t_end - t_start) / (n - 1) as f64;
        let mut t: Vec<f64> = (0..n).map(|i| t_start + i as f64 * step).collect();
        t[n - 1] = t_end;
        Ok(Self { t })
    }

    pub fn from_config(config: &JtConfig) -> JtResult<Self> {
        Self::new(config.t_start, config.t_end, config.grid_size)
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.t
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.t.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    #[inline]
    pub fn start(&self) -> f64 {
        self.t[0]
    }

    #[inline]
    pub fn end(&self) -> f64 {
        self.t[self.t.len() - 1]
    }

    #[inline]
    pub fn span(&self) -> f64 {
        self.end() - self.start()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.t
    }
}
