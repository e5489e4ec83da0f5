#[cfg(test)]
mod tests {

    #[test]
    fn test_periodic_nodes() {
        let nodes = periodic_nodes(4);
        assert_eq!(nodes.len(), 4);
        assert_abs_diff_eq!(nodes[0], -PI, epsilon = 1e-15);
        assert_abs_diff_eq!(nodes[2], 0.0, epsilon = 1e-15);
        assert!(nodes[3] < PI);
    }

    #[test]
    fn test_trigonometric_polynomial_exact() {
        // <cos²x cos²y> = 1/4, exact once n exceeds the degree
        let estimate: Estimate<f64> =
            periodic_average_2d(|x, y| x.cos().powi(2) * y.cos().powi(2), 8);
        assert_abs_diff_eq!(estimate.value, 0.25, epsilon = 1e-14);
        assert_abs_diff_eq!(estimate.coarse, 0.25, epsilon = 1e-14);
    }

    #[test]
    fn test_odd_subdivisions_rounded_up() {
        let even: Estimate<f64> = periodic_average_2d(|x, y| (x + 2.0 * y).sin().exp(), 12);
        let odd: Estimate<f64> = periodic_average_2d(|x, y| (x + 2.0 * y).sin().exp(), 11);
        assert_eq!(even, odd);
    }

    #[test]
    fn test_analytic_integrand_converges_exponentially() {
        // <1/(2 + cos x)> = 1/sqrt(3)
        let exact = 1.0 / 3.0_f64.sqrt();
        let estimate: Estimate<f64> = periodic_average_2d(|x, _| 1.0 / (2.0 + x.cos()), 32);
        assert_abs_diff_eq!(estimate.value, exact, epsilon = 1e-14);
        // the half-resolution rule has a visible error that bounds the fine one
        let coarse_error = (estimate.coarse - exact).abs();
        assert!(coarse_error > 1e-12);
        assert!(coarse_error < 1e-6);
    }

    #[test]
    fn test_complex_matches_split_integration() {
        let z = Complex64::new(0.1, 0.7);
        let integrand = |x: f64, y: f64| (z - square_lattice_dispersion(x, y, -1.0)).inv();

        let combined: Estimate<Complex64> = periodic_average_2d(integrand, 64);
        let re: Estimate<f64> = periodic_average_2d(|x, y| integrand(x, y).re, 64);
        let im: Estimate<f64> = periodic_average_2d(|x, y| integrand(x, y).im, 64);

        assert_abs_diff_eq!(combined.value.re, re.value, epsilon = 1e-12);
        assert_abs_diff_eq!(combined.value.im, im.value, epsilon = 1e-12);
        assert_abs_diff_eq!(combined.coarse.im, im.coarse, epsilon = 1e-12);
    }

    #[test]
    fn test_kgrid_average_matches_direct_quadrature() {
        let lattice = SquareLattice::new(-1.0);
        let grid = KGrid::new(&lattice, 48);
        let z = Complex64::new(0.0, 0.3);

        let cached = grid.average_with_estimate(|e| (z - e).inv());
        let direct = periodic_average_2d(|x, y| (z - lattice.energy(x, y)).inv(), 48);

        assert_abs_diff_eq!(cached.value.re, direct.value.re, epsilon = 1e-12);
        assert_abs_diff_eq!(cached.value.im, direct.value.im, epsilon = 1e-12);
        assert_abs_diff_eq!(cached.coarse.im, direct.coarse.im, epsilon = 1e-12);
    }

    use crate::dispersion::{square_lattice_dispersion, Dispersion, SquareLattice};
    use crate::helper::*;
    use crate::kgrid::KGrid;
    use approx::assert_abs_diff_eq;
    use num_complex::Complex64;
    use std::f64::consts::PI;
}
