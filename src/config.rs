/// Per-session decode policy, passed into every decode call.
///
/// Carrying the policy as a value object keeps concurrent decodes independent:
/// nothing here is process-wide state.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeConfig {
    /// Force every missing point to NaN, even when the record encodes a
    /// numeric substitute (missing value management 1 or 2).
    pub force_nan: bool,
}

impl DecodeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_force_nan(mut self, force_nan: bool) -> Self {
        self.force_nan = force_nan;
        self
    }
}
