//! 2D vector helpers on top of nalgebra.
//!
//! Arithmetic (add, sub, scalar mul/div) comes from nalgebra directly. This adds
//! the handful of named operations the physics uses, with a normalization that
//! refuses zero-length input instead of handing back NaNs.

use super::states::NVec2;
use crate::error::{Error, Result};

pub trait VectorExt {
    /// Euclidean norm
    fn size(&self) -> f64;

    /// Unit vector in the same direction.
    /// Fails with `Error::DegenerateVector` for a zero size and `Error::NonFinite`
    /// when the size is NaN or infinite.
    fn unit(&self) -> Result<NVec2>;

    fn dot_product(&self, other: &NVec2) -> f64;
}

impl VectorExt for NVec2 {
    #[inline]
    fn size(&self) -> f64 {
        self.norm()
    }

    #[inline]
    fn unit(&self) -> Result<NVec2> {
        let size = self.norm();
        if !size.is_finite() {
            return Err(Error::NonFinite(format!("vector {:?} has norm {size}", [self.x, self.y])));
        }
        if size == 0.0 {
            return Err(Error::DegenerateVector);
        }
        Ok(self / size)
    }

    #[inline]
    fn dot_product(&self, other: &NVec2) -> f64 {
        self.dot(other)
    }
}
