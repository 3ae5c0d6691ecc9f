use core::fmt::{Display, Formatter, Result as FmtResult};

/// Percentage with one decimal place for log output.
#[derive(Default, PartialEq, Eq, Debug)]
pub struct Rate {
    whole: u64,
    decimal: u64,
}

impl Rate {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::float_arithmetic,
        reason = "The ratio is clamped to [0, 1] before scaling."
    )]
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if !ratio.is_finite() {
            return Self::default();
        }

        // Scale to preserve 1 decimal place: e.g., 0.956 becomes 956
        let scaled = (ratio.clamp(0.0, 1.0) * 1000.0).round() as u64;
        let whole = scaled / 10;
        let decimal = scaled % 10;

        Self { whole, decimal }
    }
}

impl Display for Rate {
    fn fmt(&self, formatter: &mut Formatter) -> FmtResult {
        let Self { whole, decimal } = self;

        if *decimal == 0 {
            write!(formatter, "{whole}%")
        } else {
            write!(formatter, "{whole}.{decimal}%")
        }
    }
}
