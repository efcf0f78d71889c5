//! Krylov solvers for [`LinearOperator`]s.
//!
//! Solvers only rely on the action of the operator on vectors.
//! Residuals $r = b - A x$ are formed in place with [`Assign::Sub`].

use crate::operator::{Assign, LinearOperator};

/// Stopping criteria of an iterative solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
  /// Relative tolerance on the residual norm, with respect to the initial residual.
  pub rtol: f64,
  /// Absolute tolerance on the residual norm.
  pub atol: f64,
  pub max_iter: usize,
}

impl Default for SolverConfig {
  fn default() -> Self {
    Self {
      rtol: 1e-10,
      atol: 1e-14,
      max_iter: 10_000,
    }
  }
}

impl SolverConfig {
  pub fn new(rtol: f64, max_iter: usize) -> Self {
    Self {
      rtol,
      max_iter,
      ..Default::default()
    }
  }

  pub fn with_atol(mut self, atol: f64) -> Self {
    self.atol = atol;
    self
  }

  fn is_converged(&self, residual_norm: f64, initial_residual_norm: f64) -> bool {
    residual_norm <= self.atol || residual_norm <= self.rtol * initial_residual_norm
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
  Converged,
  MaxIterationsReached,
  /// A scalar the recurrence divides by vanished.
  Breakdown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
  pub status: SolverStatus,
  pub iterations: usize,
  pub residual_norm: f64,
  pub initial_residual_norm: f64,
}

impl SolverResult {
  pub fn is_converged(&self) -> bool {
    self.status == SolverStatus::Converged
  }

  pub fn relative_residual(&self) -> f64 {
    if self.initial_residual_norm == 0.0 {
      0.0
    } else {
      self.residual_norm / self.initial_residual_norm
    }
  }
}

pub trait IterativeSolver {
  /// Solves $A x = b$, using `x` as initial guess.
  fn solve<A: LinearOperator>(
    &self,
    a: &A,
    b: &na::DVector<f64>,
    x: &mut na::DVector<f64>,
  ) -> SolverResult;

  fn name(&self) -> &'static str;
}

const BREAKDOWN_TOL: f64 = 1e-300;

/// $r = b - A x$
fn residual<A: LinearOperator>(
  a: &A,
  b: &na::DVector<f64>,
  x: &na::DVector<f64>,
  r: &mut na::DVector<f64>,
) {
  r.copy_from(b);
  a.apply(x, r, Assign::Sub);
}

fn check_shapes<A: LinearOperator>(a: &A, b: &na::DVector<f64>, x: &na::DVector<f64>) {
  assert_eq!(a.nrows(), a.ncols(), "operator must be square");
  assert_eq!(a.nrows(), b.len(), "rhs has wrong dimension");
  assert_eq!(a.ncols(), x.len(), "solution has wrong dimension");
}

/// Conjugate gradient method.
///
/// Requires a symmetric definite operator.
#[derive(Debug, Clone, Default)]
pub struct ConjugateGradient {
  pub config: SolverConfig,
}

impl ConjugateGradient {
  pub fn new(config: SolverConfig) -> Self {
    Self { config }
  }
}

impl IterativeSolver for ConjugateGradient {
  fn solve<A: LinearOperator>(
    &self,
    a: &A,
    b: &na::DVector<f64>,
    x: &mut na::DVector<f64>,
  ) -> SolverResult {
    check_shapes(a, b, x);
    let n = b.len();

    let mut r = na::DVector::zeros(n);
    residual(a, b, x, &mut r);
    let initial_norm = r.norm();
    let result = |status, iterations, residual_norm| SolverResult {
      status,
      iterations,
      residual_norm,
      initial_residual_norm: initial_norm,
    };
    if initial_norm <= self.config.atol {
      return result(SolverStatus::Converged, 0, initial_norm);
    }

    let mut p = r.clone();
    let mut ap = na::DVector::zeros(n);
    let mut rr = r.dot(&r);

    for iter in 0..self.config.max_iter {
      a.apply(&p, &mut ap, Assign::Set);

      let pap = p.dot(&ap);
      if pap.abs() < BREAKDOWN_TOL {
        return result(SolverStatus::Breakdown, iter, r.norm());
      }
      let alpha = rr / pap;

      x.axpy(alpha, &p, 1.0);
      r.axpy(-alpha, &ap, 1.0);

      let res_norm = r.norm();
      tracing::trace!("CG iter {}: residual = {:.6e}", iter + 1, res_norm);
      if self.config.is_converged(res_norm, initial_norm) {
        return result(SolverStatus::Converged, iter + 1, res_norm);
      }

      let rr_new = r.dot(&r);
      let beta = rr_new / rr;
      rr = rr_new;

      // p = r + beta p
      p.axpy(1.0, &r, beta);
    }

    result(SolverStatus::MaxIterationsReached, self.config.max_iter, r.norm())
  }

  fn name(&self) -> &'static str {
    "CG"
  }
}

/// Stabilized bi-conjugate gradient method.
///
/// Works for nonsymmetric and indefinite operators.
#[derive(Debug, Clone, Default)]
pub struct BiCgStab {
  pub config: SolverConfig,
}

impl BiCgStab {
  pub fn new(config: SolverConfig) -> Self {
    Self { config }
  }
}

impl IterativeSolver for BiCgStab {
  fn solve<A: LinearOperator>(
    &self,
    a: &A,
    b: &na::DVector<f64>,
    x: &mut na::DVector<f64>,
  ) -> SolverResult {
    check_shapes(a, b, x);
    let n = b.len();

    let mut r = na::DVector::zeros(n);
    residual(a, b, x, &mut r);
    let initial_norm = r.norm();
    let result = |status, iterations, residual_norm| SolverResult {
      status,
      iterations,
      residual_norm,
      initial_residual_norm: initial_norm,
    };
    if initial_norm <= self.config.atol {
      return result(SolverStatus::Converged, 0, initial_norm);
    }

    // Shadow residual, fixed for the whole iteration.
    let r0 = r.clone();

    let mut rho_old = 1.0;
    let mut alpha = 1.0;
    let mut omega = 1.0;
    let mut p = na::DVector::<f64>::zeros(n);
    let mut v = na::DVector::zeros(n);
    let mut s = na::DVector::<f64>::zeros(n);
    let mut t = na::DVector::zeros(n);

    for iter in 0..self.config.max_iter {
      let rho = r0.dot(&r);
      if rho.abs() < BREAKDOWN_TOL {
        return result(SolverStatus::Breakdown, iter, r.norm());
      }

      if iter == 0 {
        p.copy_from(&r);
      } else {
        let beta = (rho / rho_old) * (alpha / omega);
        // p = r + beta (p - omega v)
        p.axpy(-omega, &v, 1.0);
        p.axpy(1.0, &r, beta);
      }
      rho_old = rho;

      a.apply(&p, &mut v, Assign::Set);
      let r0v = r0.dot(&v);
      if r0v.abs() < BREAKDOWN_TOL {
        return result(SolverStatus::Breakdown, iter, r.norm());
      }
      alpha = rho / r0v;

      // s = r - alpha v
      s.copy_from(&r);
      s.axpy(-alpha, &v, 1.0);

      let s_norm = s.norm();
      if self.config.is_converged(s_norm, initial_norm) {
        x.axpy(alpha, &p, 1.0);
        return result(SolverStatus::Converged, iter + 1, s_norm);
      }

      a.apply(&s, &mut t, Assign::Set);
      let tt = t.dot(&t);
      if tt < BREAKDOWN_TOL {
        x.axpy(alpha, &p, 1.0);
        return result(SolverStatus::Breakdown, iter + 1, s_norm);
      }
      omega = t.dot(&s) / tt;

      x.axpy(alpha, &p, 1.0);
      x.axpy(omega, &s, 1.0);

      // r = s - omega t
      r.copy_from(&s);
      r.axpy(-omega, &t, 1.0);

      let res_norm = r.norm();
      tracing::trace!("BiCGStab iter {}: residual = {:.6e}", iter + 1, res_norm);
      if self.config.is_converged(res_norm, initial_norm) {
        return result(SolverStatus::Converged, iter + 1, res_norm);
      }
      if omega.abs() < BREAKDOWN_TOL {
        return result(SolverStatus::Breakdown, iter + 1, res_norm);
      }
    }

    result(SolverStatus::MaxIterationsReached, self.config.max_iter, r.norm())
  }

  fn name(&self) -> &'static str {
    "BiCGStab"
  }
}
