//! The Poisson problem on the holey box, from loaded mesh to solution.

use crate::{
  boundary::DomainSetup,
  carve::{characteristic_edge_length, remove_box},
  geometry::Point,
  graph::{Graph, MeshGraph},
  linalg,
  operator::GraphSymmetricMatrix,
  rhs::assemble_rhs,
  solver::{BiCgStab, ConjugateGradient, IterativeSolver, SolverConfig, SolverResult},
  Result,
};

use itertools::Itertools;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SolveMethod {
  #[default]
  BiCgStab,
  ConjugateGradient,
  DirectLu,
}

#[derive(Debug, Clone)]
pub struct PoissonConfig {
  pub setup: DomainSetup,
  pub solver: SolverConfig,
  pub method: SolveMethod,
  /// Solve by sparse LU if the iterative method does not converge.
  pub fallback_to_direct: bool,
}

impl Default for PoissonConfig {
  fn default() -> Self {
    Self {
      setup: DomainSetup::default(),
      solver: SolverConfig::default(),
      method: SolveMethod::default(),
      fallback_to_direct: true,
    }
  }
}

#[derive(Debug, Clone)]
pub struct PoissonSolution {
  /// Nodal values, indexed like the carved graph.
  pub values: na::DVector<f64>,
  pub mesh_width: f64,
  pub nconstrained: usize,
  /// `None` if solved directly.
  pub iterative: Option<SolverResult>,
}

impl PoissonSolution {
  pub fn value_range(&self) -> Option<(f64, f64)> {
    self.values.iter().copied().minmax().into_option()
  }
}

/// Carves the holes into `graph`, then assembles and solves the system.
///
/// The graph is left in its carved state, matching the solution's indexing.
pub fn solve_poisson(graph: &mut Graph, config: &PoissonConfig) -> Result<PoissonSolution> {
  let h = characteristic_edge_length(graph)?;
  tracing::info!("mesh width h = {h:.6}");

  let nremoved: usize = config
    .setup
    .carving_boxes(h)
    .iter()
    .map(|bb| remove_box(graph, bb))
    .sum();
  tracing::info!(
    "carved {nremoved} nodes, {} nodes and {} edges remain",
    graph.nnodes(),
    graph.nedges()
  );

  solve_carved(graph, config, h)
}

/// Assembles and solves on an already carved graph.
pub fn solve_carved<G: MeshGraph>(
  graph: &G,
  config: &PoissonConfig,
  h: f64,
) -> Result<PoissonSolution> {
  let setup = &config.setup;
  let classify = |x: &Point| setup.classify(x);
  let forcing = |x: &Point| setup.forcing(x);

  let a = GraphSymmetricMatrix::new(graph, classify);
  let b = assemble_rhs(graph, classify, forcing, h * h);
  let nconstrained = a.nconstrained();
  tracing::info!(
    "system with {} unknowns, {nconstrained} of them fixed",
    a.dim()
  );

  let mut values = na::DVector::zeros(a.dim());
  let iterative = match config.method {
    SolveMethod::BiCgStab => Some(solve_iterative(
      &BiCgStab::new(config.solver),
      &a,
      &b,
      &mut values,
    )),
    SolveMethod::ConjugateGradient => Some(solve_iterative(
      &ConjugateGradient::new(config.solver),
      &a,
      &b,
      &mut values,
    )),
    SolveMethod::DirectLu => None,
  };

  let converged = iterative.map_or(true, |r| r.is_converged());
  if iterative.is_none() || (!converged && config.fallback_to_direct) {
    if !converged {
      tracing::warn!("iterative solve did not converge, falling back to sparse LU");
    }
    values = linalg::solve_direct(&a.to_sparse(), &b)?;
  }

  Ok(PoissonSolution {
    values,
    mesh_width: h,
    nconstrained,
    iterative,
  })
}

fn solve_iterative<S, G>(
  solver: &S,
  a: &GraphSymmetricMatrix<'_, G>,
  b: &na::DVector<f64>,
  x: &mut na::DVector<f64>,
) -> SolverResult
where
  S: IterativeSolver,
  G: MeshGraph,
{
  let result = solver.solve(a, b, x);
  if result.is_converged() {
    tracing::info!(
      "{} converged in {} iterations, residual {:.3e}",
      solver.name(),
      result.iterations,
      result.residual_norm
    );
  } else {
    tracing::warn!(
      "{} stopped with {:?} after {} iterations, relative residual {:.3e}",
      solver.name(),
      result.status,
      result.iterations,
      result.relative_residual()
    );
  }
  result
}
