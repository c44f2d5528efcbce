/// Bracketed bisection state shared by the calibration and ELCC searches.
///
/// Starts at the midpoint of `[lo, hi]`. `raise` moves the guess halfway to
/// the upper bound and makes the old guess the new lower bound; `lower` does
/// the mirror image.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Bisection {
    lo: f64,
    hi: f64,
    x: f64,
}

impl Bisection {
    pub(crate) fn new(lo: f64, hi: f64) -> Self {
        Self {
            lo,
            hi,
            x: lo + (hi - lo) / 2.0,
        }
    }

    pub(crate) fn current(&self) -> f64 {
        self.x
    }

    pub(crate) fn raise(&mut self) {
        self.lo = self.x;
        self.x += (self.hi - self.x) / 2.0;
    }

    pub(crate) fn lower(&mut self) {
        self.hi = self.x;
        self.x -= (self.x - self.lo) / 2.0;
    }
}
