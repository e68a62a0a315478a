/// Factors of a YCbCr to RGB transform with unscaled luma
///
/// Chroma samples are centered around 128 before they are multiplied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YCbCrCoefficients {
    pub cr_to_r: f64,
    pub cb_to_g: f64,
    pub cr_to_g: f64,
    pub cb_to_b: f64,
}

impl YCbCrCoefficients {
    /// Full range Rec. ITU-R BT.601, derived from the luma weights Kr = 0.299, Kb = 0.114
    pub const BT601: Self = Self {
        cr_to_r: 1.402,
        cb_to_g: 0.344136,
        cr_to_g: 0.714136,
        cb_to_b: 1.772,
    };

    /// Convert a single sample triple.
    ///
    /// Every channel is truncated towards zero and then clamped into 0..=255.
    #[inline(always)]
    pub fn to_rgb(&self, y: u8, cb: u8, cr: u8) -> [u8; 3] {
        let y = f64::from(y);
        let cb = f64::from(i32::from(cb) - 128);
        let cr = f64::from(i32::from(cr) - 128);

        let r = y + self.cr_to_r * cr;
        let g = y - self.cb_to_g * cb - self.cr_to_g * cr;
        let b = y + self.cb_to_b * cb;

        [clamp(r), clamp(g), clamp(b)]
    }

    /// Inverse of [`to_rgb`](Self::to_rgb), rounded to the nearest sample
    pub fn from_rgb(&self, [r, g, b]: [u8; 3]) -> [u8; 3] {
        let (r, g, b) = (f64::from(r), f64::from(g), f64::from(b));

        // Kr and Kb fall out of the red and blue factors
        let kr = 1.0 - self.cr_to_r / 2.0;
        let kb = 1.0 - self.cb_to_b / 2.0;
        let kg = 1.0 - kr - kb;

        let y = kr * r + kg * g + kb * b;
        let cb = (b - y) / self.cb_to_b + 128.0;
        let cr = (r - y) / self.cr_to_r + 128.0;

        [round(y), round(cb), round(cr)]
    }
}

#[inline(always)]
fn clamp(v: f64) -> u8 {
    (v as i32).clamp(0, 255) as u8
}

fn round(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
