//! Boundary conditions and source term of the holey box problem.
//!
//! The domain is the box $[-1,1]^3$ with four square holes around $(±0.6, ±0.6)$
//! and a central slab, both extending through the whole $z$ range.
//! Besides the outer boundary, only the slab walls and the part of the holes near $z = 0$
//! carry Dirichlet data: the hole test is a 3D infinity norm around centers at $z = 0$,
//! so hole walls with $abs(z) >= 0.2$ stay free.

use crate::geometry::{norm_1, norm_inf, Box3D, Point};

/// Whether a node is a Dirichlet constraint, and with which value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Boundary {
  Dirichlet(f64),
  Interior,
}

impl Boundary {
  pub fn is_dirichlet(&self) -> bool {
    matches!(self, Self::Dirichlet(_))
  }

  pub fn dirichlet_value(&self) -> Option<f64> {
    match *self {
      Self::Dirichlet(value) => Some(value),
      Self::Interior => None,
    }
  }
}

/// Constants describing the holey box domain.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainSetup {
  /// Half width (infinity norm) of the region around a hole center that is fixed.
  pub hole_radius: f64,
  pub hole_centers: Vec<Point>,
  pub slab: Box3D,

  pub outer_value: f64,
  pub hole_value: f64,
  pub slab_value: f64,

  pub forcing_amplitude: f64,
}

impl Default for DomainSetup {
  fn default() -> Self {
    Self {
      hole_radius: 0.2,
      hole_centers: vec![
        Point::new(0.6, 0.6, 0.0),
        Point::new(-0.6, 0.6, 0.0),
        Point::new(0.6, -0.6, 0.0),
        Point::new(-0.6, -0.6, 0.0),
      ],
      slab: Box3D::new(Point::new(-0.6, -0.2, -1.0), Point::new(0.6, 0.2, 1.0)),
      outer_value: 0.0,
      hole_value: -0.2,
      slab_value: 1.0,
      forcing_amplitude: 5.0,
    }
  }
}

/// Absolute tolerance of the region tests, absorbing rounding of mesh coordinates.
const REGION_TOL: f64 = 1e-12;

impl DomainSetup {
  /// Classifies a position. The first matching region wins:
  /// outer boundary, then holes, then slab.
  ///
  /// Points at distance `hole_radius` from a hole center, up to rounding,
  /// are outside of the hole.
  pub fn classify(&self, x: &Point) -> Boundary {
    if (norm_inf(x) - 1.0).abs() <= REGION_TOL {
      Boundary::Dirichlet(self.outer_value)
    } else if self
      .hole_centers
      .iter()
      .any(|c| norm_inf(&(x - c)) < self.hole_radius - REGION_TOL)
    {
      Boundary::Dirichlet(self.hole_value)
    } else if self.slab.contains(x) {
      Boundary::Dirichlet(self.slab_value)
    } else {
      Boundary::Interior
    }
  }

  /// $f(x) = 5 cos(norm(x)_1)$
  pub fn forcing(&self, x: &Point) -> f64 {
    self.forcing_amplitude * norm_1(x).cos()
  }

  /// Boxes whose nodes get removed to carve out the holes and the slab.
  ///
  /// Each box is shrunk by the mesh width `h` in $x$ and $y$,
  /// such that a layer of nodes remains around every cut-out.
  /// The layer around the slab lies on the slab and gets fixed by [`Self::classify`].
  /// The layer around a hole lies at distance `hole_radius` from its center
  /// and stays free, as do all hole walls with $abs(z) >= 0.2$.
  pub fn carving_boxes(&self, h: f64) -> Vec<Box3D> {
    let r = self.hole_radius - h;
    let holes = self.hole_centers.iter().map(|c| {
      Box3D::new(
        Point::new(c.x - r, c.y - r, -1.0),
        Point::new(c.x + r, c.y + r, 1.0),
      )
    });

    let shrink = Point::new(h, h, 0.0);
    let slab = Box3D::new(self.slab.min() + shrink, self.slab.max() - shrink);

    holes.chain(std::iter::once(slab)).collect()
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::io::transform_point;

  use approx::assert_relative_eq;

  #[test]
  fn outer_boundary_is_zero() {
    let setup = DomainSetup::default();
    assert_eq!(setup.classify(&Point::new(1.0, 0.0, 0.0)), Boundary::Dirichlet(0.0));
    assert_eq!(setup.classify(&Point::new(0.3, -1.0, 0.5)), Boundary::Dirichlet(0.0));
    assert_eq!(setup.classify(&Point::new(0.0, 0.0, 1.0)), Boundary::Dirichlet(0.0));
  }

  #[test]
  fn origin_is_slab() {
    // The origin lies inside the central slab, which is fixed to one.
    let setup = DomainSetup::default();
    assert_eq!(setup.classify(&Point::zeros()), Boundary::Dirichlet(1.0));
  }

  #[test]
  fn origin_is_interior_without_slab() {
    let setup = DomainSetup {
      slab: Box3D::new(Point::new(5.0, 5.0, 5.0), Point::new(6.0, 6.0, 6.0)),
      ..Default::default()
    };
    let x = Point::zeros();
    assert_eq!(setup.classify(&x), Boundary::Interior);
    assert_relative_eq!(setup.forcing(&x), 5.0);
  }

  #[test]
  fn holes() {
    let setup = DomainSetup::default();
    for c in &setup.hole_centers {
      assert_eq!(setup.classify(c), Boundary::Dirichlet(-0.2));
      let near = c + Point::new(0.19, -0.19, 0.0);
      assert_eq!(setup.classify(&near), Boundary::Dirichlet(-0.2));
      let far = c + Point::new(0.2, 0.0, 0.0);
      assert_ne!(setup.classify(&far), Boundary::Dirichlet(-0.2));
    }
  }

  #[test]
  fn hole_ring_classified_symmetrically() {
    // Layer left around the hole at (0.6, 0.6, 0) on a grid of width 0.1,
    // with coordinates computed by the loader transform.
    let setup = DomainSetup::default();
    let n = 20.0;
    let node = |i: usize, j: usize| {
      transform_point(&Point::new(i as f64 / n, j as f64 / n, 0.0))
    };
    let ring = (14..=18)
      .flat_map(|k| [node(14, k), node(18, k), node(k, 14), node(k, 18)])
      .collect::<Vec<_>>();
    assert_eq!(ring.len(), 20);
    for x in &ring {
      assert_eq!(setup.classify(x), Boundary::Interior, "at {x:?}");
    }
    assert_eq!(
      setup.classify(&node(15, 15)),
      Boundary::Dirichlet(setup.hole_value)
    );
  }

  #[test]
  fn hole_wall_free_away_from_center_plane() {
    let setup = DomainSetup::default();
    assert_eq!(setup.classify(&Point::new(0.6, 0.6, 0.1)), Boundary::Dirichlet(-0.2));
    assert_eq!(setup.classify(&Point::new(0.6, 0.6, 0.2)), Boundary::Interior);
    assert_eq!(setup.classify(&Point::new(0.6, 0.6, -0.5)), Boundary::Interior);
  }

  #[test]
  fn outer_boundary_wins_over_slab() {
    // On the top face inside the slab footprint.
    let setup = DomainSetup::default();
    assert_eq!(setup.classify(&Point::new(0.0, 0.0, -1.0)), Boundary::Dirichlet(0.0));
  }

  #[test]
  fn interior_away_from_regions() {
    let setup = DomainSetup::default();
    let x = Point::new(0.0, 0.6, 0.3);
    assert_eq!(setup.classify(&x), Boundary::Interior);
    assert_relative_eq!(setup.forcing(&x), 5.0 * 0.9f64.cos());
  }

  #[test]
  fn carving_boxes_stay_inside_fixed_regions() {
    let setup = DomainSetup::default();
    let h = 0.05;
    let boxes = setup.carving_boxes(h);
    assert_eq!(boxes.len(), 5);

    assert_relative_eq!(boxes[3].min().x, -0.8 + h);
    assert_relative_eq!(boxes[3].max().y, -0.4 - h);
    assert_relative_eq!(boxes[4].min().x, -0.6 + h);
    assert_relative_eq!(boxes[4].max().y, 0.2 - h);
    assert_eq!(boxes[4].min().z, -1.0);
    assert_eq!(boxes[4].max().z, 1.0);
  }
}
