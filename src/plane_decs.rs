use crate::BoundsCheckError;

/// Description for a plane which can be used to implement bounds checks, stride calculation and buffer sizes.
///
/// Not used by the conversion loop itself, only by the utility functions around it.
#[derive(Clone, Copy)]
pub(crate) struct PlaneDesc {
    pub(crate) width_op: Op,
    pub(crate) height_op: Op,
}

impl PlaneDesc {
    /// Number of bytes a single row of this plane occupies for an image of `width`
    pub(crate) fn packed_stride(&self, width: usize) -> usize {
        self.width_op.op(width)
    }

    /// Number of rows this plane has for an image of `height`
    pub(crate) fn rows(&self, height: usize) -> usize {
        self.height_op.op(height)
    }

    /// Smallest slice that can hold this plane with the given stride.
    ///
    /// The last row only needs to be as long as its visible part.
    pub(crate) fn min_len(&self, stride: usize, width: usize, height: usize) -> usize {
        match self.rows(height) {
            0 => 0,
            rows => stride
                .saturating_mul(rows - 1)
                .saturating_add(self.packed_stride(width)),
        }
    }

    pub(crate) fn bounds_check(
        &self,
        plane: usize,
        len: usize,
        stride: usize,
        width: usize,
        height: usize,
    ) -> Result<(), BoundsCheckError> {
        // Ensure stride is not smaller than the width would allow
        let min_stride = self.packed_stride(width);

        if min_stride > stride {
            return Err(BoundsCheckError::InvalidStride {
                plane,
                minimum: min_stride,
                got: stride,
            });
        }

        // Ensure slice is large enough
        let min_len = self.min_len(stride, width, height);

        if min_len > len {
            return Err(BoundsCheckError::InvalidPlaneSize {
                plane,
                minimum: min_len,
                got: len,
            });
        }

        Ok(())
    }
}

/// Plane's number of samples in relation to width / height
#[derive(Clone, Copy)]
pub(crate) enum Op {
    Mul(usize),
    /// Right shift, rounding up so odd dimensions keep their last sample
    ShrCeil(u32),
    Identity,
}

impl Op {
    pub(crate) fn op(self, lhs: usize) -> usize {
        match self {
            Op::Mul(rhs) => lhs.saturating_mul(rhs),
            Op::ShrCeil(rhs) => lhs.div_ceil(1 << rhs),
            Op::Identity => lhs,
        }
    }
}

pub(crate) const I420_PLANES: [PlaneDesc; 3] = [
    PlaneDesc {
        width_op: Op::Identity,
        height_op: Op::Identity,
    },
    PlaneDesc {
        width_op: Op::ShrCeil(1),
        height_op: Op::ShrCeil(1),
    },
    PlaneDesc {
        width_op: Op::ShrCeil(1),
        height_op: Op::ShrCeil(1),
    },
];

pub(crate) const I422_PLANES: [PlaneDesc; 3] = [
    PlaneDesc {
        width_op: Op::Identity,
        height_op: Op::Identity,
    },
    PlaneDesc {
        width_op: Op::ShrCeil(1),
        height_op: Op::Identity,
    },
    PlaneDesc {
        width_op: Op::ShrCeil(1),
        height_op: Op::Identity,
    },
];

pub(crate) const I444_PLANES: [PlaneDesc; 3] = [
    PlaneDesc {
        width_op: Op::Identity,
        height_op: Op::Identity,
    },
    PlaneDesc {
        width_op: Op::Identity,
        height_op: Op::Identity,
    },
    PlaneDesc {
        width_op: Op::Identity,
        height_op: Op::Identity,
    },
];

pub(crate) const RGBA_PLANE: PlaneDesc = PlaneDesc {
    width_op: Op::Mul(4),
    height_op: Op::Identity,
};

pub(crate) const RGB_PLANE: PlaneDesc = PlaneDesc {
    width_op: Op::Mul(3),
    height_op: Op::Identity,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_dimensions_round_up() {
        let [_, cb, _] = I420_PLANES;

        assert_eq!(cb.packed_stride(5), 3);
        assert_eq!(cb.rows(3), 2);
        assert_eq!(I422_PLANES[1].rows(3), 3);
    }

    #[test]
    fn last_row_may_be_short() {
        // 3 rows of 4 bytes with a 16 byte stride only need 2 * 16 + 4 bytes
        assert_eq!(I444_PLANES[0].min_len(16, 4, 3), 36);
        assert!(I444_PLANES[0].bounds_check(0, 36, 16, 4, 3).is_ok());
        assert!(I444_PLANES[0].bounds_check(0, 35, 16, 4, 3).is_err());
    }

    #[test]
    fn stride_smaller_than_row() {
        let err = RGB_PLANE.bounds_check(0, 1024, 8, 4, 2).unwrap_err();

        assert!(matches!(
            err,
            BoundsCheckError::InvalidStride {
                plane: 0,
                minimum: 12,
                got: 8
            }
        ));
    }
}
