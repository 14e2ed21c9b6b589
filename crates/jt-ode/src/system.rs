// ─────────────────────────────────────────────────────────────────────
// JT Boundary Kernel — ODE System Interface
// ─────────────────────────────────────────────────────────────────────

use nalgebra::DMatrix;

/// A first-order system dy/dt = F(t, y) of fixed dimension.
pub trait OdeSystem {
    /// Number of state components.
    fn dim(&self) -> usize;

    /// Write F(t, y) into `dydt`.
    fn rhs(&self, t: f64, y: &[f64], dydt: &mut [f64]);

    /// Write ∂F/∂y at (t, y) into `jac` (dim × dim, row = equation).
    ///
    /// Defaults to one-sided finite differences, one extra RHS call per
    /// column.
    fn jacobian(&self, t: f64, y: &[f64], jac: &mut DMatrix<f64>) {
        finite_difference_jacobian(self, t, y, jac);
    }
}

/// Forward-difference Jacobian with the usual √ε relative perturbation.
pub fn finite_difference_jacobian<S: OdeSystem + ?Sized>(
    system: &S,
    t: f64,
    y: &[f64],
    jac: &mut DMatrix<f64>,
) {
    let n = system.dim();
    let mut f0 = vec![0.0; n];
    let mut f1 = vec![0.0; n];
    let mut yp = y.to_vec();
    system.rhs(t, y, &mut f0);

    let sqrt_eps = f64::EPSILON.sqrt();
    for j in 0..n {
        let step = sqrt_eps * y[j].abs().max(1.0);
        yp[j] = y[j] + step;
        // Use the representable increment, not the requested one.
        let dy = yp[j] - y[j];
        system.rhs(t, &yp, &mut f1);
        for i in 0..n {
            jac[(i, j)] = (f1[i] - f0[i]) / dy;
        }
        yp[j] = y[j];
    }
}
