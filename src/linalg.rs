//! Explicitly stored sparse matrices and a direct sparse solver.

use faer::solvers::SpSolver;

use crate::{
  operator::{Assign, LinearOperator},
  Error, Result,
};

/// Sparse matrix in triplet (COO) format.
#[derive(Debug, Clone, Default)]
pub struct SparseMatrix {
  nrows: usize,
  ncols: usize,
  triplets: Vec<(usize, usize, f64)>,
}

impl SparseMatrix {
  pub fn zeros(nrows: usize, ncols: usize) -> Self {
    Self::new(nrows, ncols, Vec::new())
  }
  pub fn new(nrows: usize, ncols: usize, triplets: Vec<(usize, usize, f64)>) -> Self {
    Self {
      nrows,
      ncols,
      triplets,
    }
  }

  pub fn nrows(&self) -> usize {
    self.nrows
  }
  pub fn ncols(&self) -> usize {
    self.ncols
  }
  pub fn nnz(&self) -> usize {
    self.triplets.len()
  }

  pub fn push(&mut self, r: usize, c: usize, v: f64) {
    assert!(r < self.nrows && c < self.ncols);
    if v != 0.0 {
      self.triplets.push((r, c, v));
    }
  }

  pub fn to_nalgebra_coo(&self) -> nas::CooMatrix<f64> {
    let mut coo = nas::CooMatrix::new(self.nrows, self.ncols);
    for &(r, c, v) in &self.triplets {
      coo.push(r, c, v);
    }
    coo
  }

  pub fn to_nalgebra_csc(&self) -> nas::CscMatrix<f64> {
    (&self.to_nalgebra_coo()).into()
  }

  pub fn to_nalgebra_dense(&self) -> na::DMatrix<f64> {
    (&self.to_nalgebra_coo()).into()
  }
}

impl LinearOperator for SparseMatrix {
  fn nrows(&self) -> usize {
    self.nrows
  }
  fn ncols(&self) -> usize {
    self.ncols
  }

  fn apply(&self, x: &na::DVector<f64>, y: &mut na::DVector<f64>, assign: Assign) {
    assert_eq!(x.len(), self.ncols);
    assert_eq!(y.len(), self.nrows);
    let mut ax = na::DVector::zeros(self.nrows);
    for &(r, c, v) in &self.triplets {
      ax[r] += v * x[c];
    }
    for (yi, axi) in y.iter_mut().zip(ax.iter()) {
      assign.apply(yi, *axi);
    }
  }
}

type SparseMatrixFaer = faer::sparse::SparseColMat<usize, f64>;

pub fn nalgebra2faer(m: nas::CscMatrix<f64>) -> SparseMatrixFaer {
  let nrows = m.nrows();
  let ncols = m.ncols();
  let (col_ptrs, row_indices, values) = m.disassemble();

  let symbolic =
    faer::sparse::SymbolicSparseColMat::new_checked(nrows, ncols, col_ptrs, None, row_indices);
  faer::sparse::SparseColMat::new(symbolic, values)
}

/// Sparse LU factorization.
pub struct FaerLu {
  raw: faer::sparse::linalg::solvers::Lu<usize, f64>,
}
impl FaerLu {
  pub fn new(a: nas::CscMatrix<f64>) -> Result<Self> {
    let raw = nalgebra2faer(a)
      .sp_lu()
      .map_err(|err| Error::Factorization(format!("{err:?}")))?;
    Ok(Self { raw })
  }

  pub fn solve(&self, b: &na::DVector<f64>) -> na::DVector<f64> {
    let b = faer::col::from_slice(b.as_slice());
    na::DVector::from_vec(self.raw.solve(b).as_slice().to_vec())
  }
}

/// Solves $A x = b$ by sparse LU.
pub fn solve_direct(a: &SparseMatrix, b: &na::DVector<f64>) -> Result<na::DVector<f64>> {
  assert_eq!(a.nrows(), b.len());
  Ok(FaerLu::new(a.to_nalgebra_csc())?.solve(b))
}
