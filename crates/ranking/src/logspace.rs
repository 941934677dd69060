//! Weighted sums of products evaluated through `ln`/`exp`
//!
//! Every factor is nonnegative. A zero factor maps to `-inf` in log space and
//! exponentiates back to exactly `0.0`, so empty channels and zero scores
//! need no special casing.

/// `a * b` as `exp(ln a + ln b)`
#[inline]
pub fn product(a: f64, b: f64) -> f64 {
    (a.ln() + b.ln()).exp()
}

/// `Σ a·b` over `(a, b)` pairs
pub fn sum_of_products<I>(terms: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    terms.into_iter().map(|(a, b)| product(a, b)).sum()
}

/// Convex combination `weight·first + (1 - weight)·second`
#[inline]
pub fn mix(weight: f64, first: f64, second: f64) -> f64 {
    product(weight, first) + product(1.0 - weight, second)
}

/// `1 / degree`, or zero for a node without edges of that kind
#[inline]
pub fn uniform_share(degree: usize) -> f64 {
    if degree == 0 {
        0.0
    } else {
        1.0 / degree as f64
    }
}
