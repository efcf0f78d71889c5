//! Matrix-free linear operators.
//!
//! [`GraphSymmetricMatrix`] lets a mesh graph act as the system matrix of the
//! discrete Poisson problem, without ever storing this matrix.

use crate::{
  boundary::Boundary,
  geometry::Point,
  graph::{MeshGraph, NodeIdx},
  linalg::SparseMatrix,
};

/// How the result of a product gets combined into the output vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assign {
  /// $y = A x$
  Set,
  /// $y = y + A x$
  Add,
  /// $y = y - A x$
  Sub,
}

impl Assign {
  pub fn apply(self, target: &mut f64, value: f64) {
    match self {
      Self::Set => *target = value,
      Self::Add => *target += value,
      Self::Sub => *target -= value,
    }
  }
}

/// A square matrix that is only accessible through its action on vectors.
pub trait LinearOperator {
  fn nrows(&self) -> usize;
  fn ncols(&self) -> usize;

  /// Computes $A x$ and combines it into `y` according to `assign`.
  fn apply(&self, x: &na::DVector<f64>, y: &mut na::DVector<f64>, assign: Assign);

  fn mul(&self, x: &na::DVector<f64>) -> na::DVector<f64> {
    let mut y = na::DVector::zeros(self.nrows());
    self.apply(x, &mut y, Assign::Set);
    y
  }
}

impl LinearOperator for na::DMatrix<f64> {
  fn nrows(&self) -> usize {
    self.nrows()
  }
  fn ncols(&self) -> usize {
    self.ncols()
  }

  fn apply(&self, x: &na::DVector<f64>, y: &mut na::DVector<f64>, assign: Assign) {
    assert_eq!(x.len(), self.ncols());
    assert_eq!(y.len(), self.nrows());
    match assign {
      Assign::Set => self.mul_to(x, y),
      Assign::Add => y.gemv(1.0, self, x, 1.0),
      Assign::Sub => y.gemv(-1.0, self, x, 1.0),
    }
  }
}

/// System matrix of the graph Laplacian with Dirichlet rows eliminated.
///
/// Rows and columns of constrained (Dirichlet) nodes are decoupled from the rest
/// and their diagonal is set to one:
/// $mat(L_0, 0; 0, I) vec(u_0, u_diff) = vec(b_0, g)$.
///
/// The boundary classification is evaluated once per node on construction.
/// The graph is borrowed for the whole lifetime of the operator,
/// so it cannot change underneath the solver.
///
/// An unconstrained node without any edges gives a zero row,
/// which makes the system singular. Meshes must not contain such nodes.
pub struct GraphSymmetricMatrix<'g, G: MeshGraph> {
  graph: &'g G,
  boundary: Vec<Boundary>,
}

impl<'g, G: MeshGraph> GraphSymmetricMatrix<'g, G> {
  pub fn new<F>(graph: &'g G, classify: F) -> Self
  where
    F: Fn(&Point) -> Boundary,
  {
    let boundary = graph
      .node_indices()
      .map(|inode| classify(graph.position(inode)))
      .collect();
    Self { graph, boundary }
  }

  pub fn dim(&self) -> usize {
    self.boundary.len()
  }

  /// Number of stored entries a dense matrix would need.
  pub fn size(&self) -> usize {
    self.dim() * self.dim()
  }

  pub fn boundary(&self, inode: NodeIdx) -> Boundary {
    self.boundary[inode]
  }
  pub fn is_constrained(&self, inode: NodeIdx) -> bool {
    self.boundary[inode].is_dirichlet()
  }
  pub fn nconstrained(&self) -> usize {
    self.boundary.iter().filter(|b| b.is_dirichlet()).count()
  }

  /// Graph Laplacian $L_(i j)$.
  pub fn laplacian(&self, i: NodeIdx, j: NodeIdx) -> f64 {
    if i == j {
      -(self.graph.degree(i) as f64)
    } else if self.graph.has_edge(i, j) || self.graph.has_edge(j, i) {
      1.0
    } else {
      0.0
    }
  }

  /// System matrix entry $A_(i j)$.
  pub fn entry(&self, i: NodeIdx, j: NodeIdx) -> f64 {
    match (i == j, self.is_constrained(i), self.is_constrained(j)) {
      (true, true, _) => 1.0,
      (true, false, _) => self.laplacian(i, i),
      (false, false, false) => self.laplacian(i, j),
      (false, _, _) => 0.0,
    }
  }

  pub fn diagonal(&self) -> na::DVector<f64> {
    na::DVector::from_iterator(self.dim(), (0..self.dim()).map(|i| self.entry(i, i)))
  }

  /// Matrix-free product $y op A x$.
  ///
  /// Visits every incident edge of every node once.
  pub fn multiply(&self, x: &na::DVector<f64>, y: &mut na::DVector<f64>, assign: Assign) {
    assert_eq!(x.len(), self.dim(), "input vector has wrong dimension");
    assert_eq!(y.len(), self.dim(), "output vector has wrong dimension");

    for i in 0..self.dim() {
      let mut acc = self.entry(i, i) * x[i];
      // Constrained rows are identity rows.
      if !self.is_constrained(i) {
        for j in self.graph.neighbors(i) {
          acc += self.entry(i, j) * x[j];
        }
      }
      assign.apply(&mut y[i], acc);
    }
  }

  /// Stores the operator explicitly.
  pub fn to_sparse(&self) -> SparseMatrix {
    let mut mat = SparseMatrix::zeros(self.dim(), self.dim());
    for i in 0..self.dim() {
      mat.push(i, i, self.entry(i, i));
      if !self.is_constrained(i) {
        for j in self.graph.neighbors(i) {
          mat.push(i, j, self.entry(i, j));
        }
      }
    }
    mat
  }
}

impl<G: MeshGraph> LinearOperator for GraphSymmetricMatrix<'_, G> {
  fn nrows(&self) -> usize {
    self.dim()
  }
  fn ncols(&self) -> usize {
    self.dim()
  }
  fn apply(&self, x: &na::DVector<f64>, y: &mut na::DVector<f64>, assign: Assign) {
    self.multiply(x, y, assign)
  }
}
