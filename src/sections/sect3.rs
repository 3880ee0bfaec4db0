/// Grid metadata the data-section decoders need, extracted from Section 3 by
/// the caller. Projection geometry stays with the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridDescriptor {
    /// Number of data points in the full grid.
    pub num_points: usize,
    /// Points per row in the first (or only) scanning direction.
    pub nx: usize,
    /// Flag table 3.4 scanning mode byte.
    pub scan_mode: u8,
    /// Rows of varying length (thinned grid); row reordering is skipped.
    pub quasi_regular: bool,
}

impl GridDescriptor {
    pub fn new(num_points: usize, nx: usize, scan_mode: u8) -> Self {
        Self {
            num_points,
            nx,
            scan_mode,
            quasi_regular: false,
        }
    }

    pub fn quasi_regular(mut self) -> Self {
        self.quasi_regular = true;
        self
    }
}
