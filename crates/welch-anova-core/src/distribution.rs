//! Upper-tail probabilities of the F distribution, backed by statrs

use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor};

/// Beyond this many denominator degrees of freedom F(d1, d2) is replaced by
/// its limit χ²(d1)/d1; the relative difference is O(1/d2).
const CHI_SQUARED_LIMIT_DF: f64 = 1e10;

/// Survival function P(X > f) for X ~ F(d1, d2).
///
/// `d2` may be `+∞`. Returns NaN when either degrees of freedom is not
/// positive or `f` is NaN.
pub fn f_survival(f: f64, d1: f64, d2: f64) -> f64 {
    if f.is_nan() || d2.is_nan() || !d1.is_finite() || d1 <= 0.0 || d2 <= 0.0 {
        return f64::NAN;
    }
    if f <= 0.0 {
        return 1.0;
    }
    if f.is_infinite() {
        return 0.0;
    }

    let p = if d2 > CHI_SQUARED_LIMIT_DF {
        ChiSquared::new(d1).ok().map(|dist| dist.sf(d1 * f))
    } else {
        FisherSnedecor::new(d1, d2).ok().map(|dist| dist.sf(f))
    };

    p.map(|p| p.clamp(0.0, 1.0)).unwrap_or(f64::NAN)
}
