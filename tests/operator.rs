//! Verify the implicit system matrix against handchecked matrices
//! and against its own entry-wise definition.

extern crate nalgebra as na;

use graph_poisson::{
  boundary::Boundary,
  geometry::Point,
  graph::{Graph, MeshGraph},
  operator::{Assign, GraphSymmetricMatrix, LinearOperator},
};

use approx::assert_relative_eq;

use std::sync::LazyLock;

/// Square `0-1-2-3` with diagonal `0-2`.
fn square_with_diagonal() -> Graph {
  let mut g = Graph::new();
  for p in [[0., 0., 0.], [1., 0., 0.], [1., 1., 0.], [0., 1., 0.]] {
    g.add_node(Point::from(p));
  }
  for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)] {
    g.add_edge(a, b);
  }
  g
}

/// Fixes the node at $(0,1,0)$.
fn fix_node3(x: &Point) -> Boundary {
  if x.x == 0.0 && x.y == 1.0 {
    Boundary::Dirichlet(0.5)
  } else {
    Boundary::Interior
  }
}

#[rustfmt::skip]
static LAPLACIAN: LazyLock<na::DMatrix<f64>> = LazyLock::new(|| na::DMatrix::from_row_slice(4, 4, &[
  -3., 1., 1., 1.,
   1.,-2., 1., 0.,
   1., 1.,-3., 1.,
   1., 0., 1.,-2.,
]));

#[rustfmt::skip]
static SYSTEM_MATRIX: LazyLock<na::DMatrix<f64>> = LazyLock::new(|| na::DMatrix::from_row_slice(4, 4, &[
  -3., 1., 1., 0.,
   1.,-2., 1., 0.,
   1., 1.,-3., 0.,
   0., 0., 0., 1.,
]));

fn dense<F>(n: usize, f: F) -> na::DMatrix<f64>
where
  F: Fn(usize, usize) -> f64,
{
  na::DMatrix::from_fn(n, n, f)
}

#[test]
fn laplacian_handchecked() {
  let g = square_with_diagonal();
  let a = GraphSymmetricMatrix::new(&g, fix_node3);
  assert_eq!(dense(4, |i, j| a.laplacian(i, j)), *LAPLACIAN);
}

#[test]
fn system_matrix_handchecked() {
  let g = square_with_diagonal();
  let a = GraphSymmetricMatrix::new(&g, fix_node3);
  assert_eq!(a.nconstrained(), 1);
  assert_eq!(dense(4, |i, j| a.entry(i, j)), *SYSTEM_MATRIX);
  assert_eq!(a.to_sparse().to_nalgebra_dense(), *SYSTEM_MATRIX);
}

#[test]
fn multiply_matches_entries() {
  let g = square_with_diagonal();
  let a = GraphSymmetricMatrix::new(&g, fix_node3);
  let x = na::dvector![0.3, -1.2, 2.0, 0.7];

  let expected = &*SYSTEM_MATRIX * &x;
  let mut y = na::DVector::from_element(4, f64::NAN);
  a.multiply(&x, &mut y, Assign::Set);
  assert_relative_eq!(y, expected, epsilon = 1e-14);

  let mut y = na::DVector::from_element(4, 1.0);
  a.apply(&x, &mut y, Assign::Add);
  assert_relative_eq!(y, expected.add_scalar(1.0), epsilon = 1e-14);
}

/// Grid graph with some nodes removed, fixed on one side.
fn irregular_graph() -> Graph {
  let n = 6;
  let mut g = Graph::new();
  for j in 0..n {
    for i in 0..n {
      g.add_node(Point::new(i as f64, j as f64, 0.0));
    }
  }
  for j in 0..n {
    for i in 0..n {
      let k = j * n + i;
      if i + 1 < n {
        g.add_edge(k, k + 1);
      }
      if j + 1 < n {
        g.add_edge(k, k + n);
      }
    }
  }
  g.remove_node(14);
  g.remove_node(3);
  g
}

fn fix_left(x: &Point) -> Boundary {
  if x.x == 0.0 {
    Boundary::Dirichlet(x.y)
  } else {
    Boundary::Interior
  }
}

#[test]
fn properties_on_irregular_graph() {
  let g = irregular_graph();
  let a = GraphSymmetricMatrix::new(&g, fix_left);
  let n = a.dim();
  assert_eq!(n, g.nnodes());

  for i in 0..n {
    assert_eq!(a.laplacian(i, i), -(g.degree(i) as f64));
    if a.is_constrained(i) {
      assert_eq!(a.entry(i, i), 1.0);
    }
    for j in 0..n {
      assert_eq!(a.laplacian(i, j), a.laplacian(j, i));
      if i != j && (a.is_constrained(i) || a.is_constrained(j)) {
        assert_eq!(a.entry(i, j), 0.0);
      }
    }
  }

  let x = na::DVector::from_fn(n, |i, _| (i as f64 * 0.37).sin());
  let expected = dense(n, |i, j| a.entry(i, j)) * &x;
  let mut y = na::DVector::zeros(n);
  a.multiply(&x, &mut y, Assign::Set);
  assert!((y - expected).amax() < 1e-14);
}

#[test]
fn constrained_rows_are_identity() {
  let g = irregular_graph();
  let a = GraphSymmetricMatrix::new(&g, fix_left);
  let x = na::DVector::from_fn(a.dim(), |i, _| i as f64);
  let y = a.mul(&x);
  for i in g.node_indices().filter(|&i| a.is_constrained(i)) {
    assert_eq!(y[i], x[i]);
  }
}
