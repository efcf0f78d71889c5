pub type Point = na::Vector3<f64>;

pub fn norm_inf(p: &Point) -> f64 {
  p.amax()
}

pub fn norm_1(p: &Point) -> f64 {
  p.lp_norm(1)
}

/// Axis-aligned box in 3D.
///
/// The corners are normalized on construction, so any two opposite corners
/// describe the same box. Containment is inclusive on all faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box3D {
  min: Point,
  max: Point,
}

impl Box3D {
  pub fn new(a: Point, b: Point) -> Self {
    Self {
      min: a.inf(&b),
      max: a.sup(&b),
    }
  }

  pub fn min(&self) -> &Point {
    &self.min
  }
  pub fn max(&self) -> &Point {
    &self.max
  }

  pub fn contains(&self, p: &Point) -> bool {
    (0..3).all(|i| self.min[i] <= p[i] && p[i] <= self.max[i])
  }
}
