extern crate nalgebra as na;
extern crate nalgebra_sparse as nas;

pub mod boundary;
pub mod carve;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod io;
pub mod linalg;
pub mod operator;
pub mod problem;
pub mod rhs;
pub mod solver;

pub use error::{Error, Result};
