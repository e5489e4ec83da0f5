use rayon::prelude::*;
use std::f64::consts::PI;
use std::iter::Sum;
use std::ops::Mul;

/// Round a subdivision count up to the next even number, so that every other
/// node forms the half-resolution grid.
pub fn even_subdivisions(n: usize) -> usize {
    if n % 2 == 0 {
        n
    } else {
        n + 1
    }
}

/// `n` equally spaced nodes `-π + 2πi/n` covering one period.
pub fn periodic_nodes(n: usize) -> Vec<f64> {
    let h = 2.0 * PI / n as f64;
    (0..n).map(|i| -PI + i as f64 * h).collect()
}

/// An average together with the same average taken on every other node.
///
/// The nodes of the coarse rule are a subset of the fine ones, so the
/// difference between the two is an error estimate for the coarse value
/// that costs no extra integrand evaluations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate<T> {
    pub value: T,
    pub coarse: T,
}

/// Combine per-row sums into an `Estimate` for an `n` x `n` periodic grid.
///
/// `rows[i]` holds the full sum over row `i` and, for even `i`, the sum over
/// its even columns.
pub(crate) fn combine_rows<T>(rows: Vec<(T, Option<T>)>, n: usize) -> Estimate<T>
where
    T: Copy + Sum<T> + Mul<f64, Output = T>,
{
    let fine: T = rows.iter().map(|r| r.0).sum();
    let coarse: T = rows.iter().filter_map(|r| r.1).sum();
    let norm = 1.0 / (n * n) as f64;
    Estimate {
        value: fine * norm,
        coarse: coarse * (4.0 * norm),
    }
}

/// Sum one row of samples, and its even entries when the row itself is even.
pub(crate) fn row_sums<T>(row: usize, samples: &[T]) -> (T, Option<T>)
where
    T: Copy + Sum<T>,
{
    let full = samples.iter().copied().sum();
    let even = (row % 2 == 0).then(|| samples.iter().step_by(2).copied().sum());
    (full, even)
}

/// Parallel trapezoid average of a 2π-periodic function over `[-π, π]^2`.
///
/// For periodic analytic integrands the trapezoid rule converges
/// exponentially in `n`. `n` is rounded up to an even number. The integrand
/// may be any value that can be scaled by a real weight and summed, so
/// complex integrands are averaged in a single pass.
pub fn periodic_average_2d<T, F>(f: F, n: usize) -> Estimate<T>
where
    F: Fn(f64, f64) -> T + Sync,
    T: Copy + Send + Sum<T> + Mul<f64, Output = T>,
{
    let n = even_subdivisions(n.max(2));
    let nodes = periodic_nodes(n);

    let rows: Vec<(T, Option<T>)> = (0..n)
        .into_par_iter()
        .map(|i| {
            let x = nodes[i];
            let samples: Vec<T> = nodes.iter().map(|&y| f(x, y)).collect();
            row_sums(i, &samples)
        })
        .collect();

    combine_rows(rows, n)
}
