use crate::{
  boundary::Boundary,
  geometry::Point,
  graph::{MeshGraph, NodeIdx},
};

/// Assembles the load vector of the eliminated Dirichlet problem.
///
/// Free rows get the weighted source term, minus the contributions of fixed
/// neighbors that were moved over from the left-hand side:
/// $b_i = w f(x_i) - sum_(j "fixed") L_(i j) g_j$.
/// Fixed rows get their prescribed value $b_i = g_i$.
///
/// For the graph Laplacian $L = h^2 Delta_h$, the weight is $w = h^2$.
pub fn assemble_rhs<G, B, F>(graph: &G, classify: B, forcing: F, weight: f64) -> na::DVector<f64>
where
  G: MeshGraph,
  B: Fn(&Point) -> Boundary,
  F: Fn(&Point) -> f64,
{
  let boundary: Vec<Boundary> = graph
    .node_indices()
    .map(|inode| classify(graph.position(inode)))
    .collect();

  let rhs = na::DVector::from_iterator(
    graph.nnodes(),
    graph.node_indices().map(|i| match boundary[i] {
      Boundary::Dirichlet(g) => g,
      Boundary::Interior => {
        weight * forcing(graph.position(i)) - boundary_correction(graph, &boundary, i)
      }
    }),
  );

  tracing::debug!(
    "assembled rhs for {} nodes, {} fixed",
    graph.nnodes(),
    boundary.iter().filter(|b| b.is_dirichlet()).count()
  );
  rhs
}

/// $sum_(j "fixed") L_(i j) g_j$, where every neighbor has $L_(i j) = 1$.
fn boundary_correction<G: MeshGraph>(graph: &G, boundary: &[Boundary], i: NodeIdx) -> f64 {
  graph
    .neighbors(i)
    .filter_map(|j| boundary[j].dirichlet_value())
    .sum()
}
