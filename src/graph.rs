//! Mesh represented as an undirected graph of positioned nodes.

use crate::geometry::Point;

use indexmap::IndexSet;

pub type NodeIdx = usize;

/// Adjacency capability of a mesh, as needed for assembling and solving.
///
/// Nodes are identified by the dense indices `0..nnodes()`.
pub trait MeshGraph {
  fn nnodes(&self) -> usize;
  fn nedges(&self) -> usize;

  fn position(&self, inode: NodeIdx) -> &Point;
  fn degree(&self, inode: NodeIdx) -> usize;

  /// Must be symmetric: `has_edge(a, b) == has_edge(b, a)`.
  fn has_edge(&self, a: NodeIdx, b: NodeIdx) -> bool;

  /// Yields every neighbor of `inode` exactly once.
  fn neighbors(&self, inode: NodeIdx) -> impl Iterator<Item = NodeIdx> + '_;

  /// Removes the node together with all its incident edges.
  ///
  /// The node that previously had the largest index takes over `inode`.
  /// All other indices stay valid.
  fn remove_node(&mut self, inode: NodeIdx);

  fn node_indices(&self) -> std::ops::Range<NodeIdx> {
    0..self.nnodes()
  }
}

/// Adjacency list graph.
#[derive(Debug, Clone, Default)]
pub struct Graph {
  positions: Vec<Point>,
  adjacency: Vec<IndexSet<NodeIdx>>,
  nedges: usize,
}

impl Graph {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_node(&mut self, position: Point) -> NodeIdx {
    let inode = self.positions.len();
    self.positions.push(position);
    self.adjacency.push(IndexSet::new());
    inode
  }

  /// Returns `false` if the edge already existed or is a self-loop.
  pub fn add_edge(&mut self, a: NodeIdx, b: NodeIdx) -> bool {
    assert!(a < self.nnodes() && b < self.nnodes(), "node out of range");
    if a == b || self.adjacency[a].contains(&b) {
      return false;
    }
    self.adjacency[a].insert(b);
    self.adjacency[b].insert(a);
    self.nedges += 1;
    true
  }

  /// Every undirected edge once, as `(a, b)` with `a < b`.
  pub fn edges(&self) -> impl Iterator<Item = (NodeIdx, NodeIdx)> + '_ {
    self
      .adjacency
      .iter()
      .enumerate()
      .flat_map(|(a, neighbors)| neighbors.iter().filter(move |&&b| a < b).map(move |&b| (a, b)))
  }

  pub fn positions(&self) -> &[Point] {
    &self.positions
  }

  pub fn edge_length(&self, a: NodeIdx, b: NodeIdx) -> f64 {
    (self.positions[a] - self.positions[b]).norm()
  }
}

impl MeshGraph for Graph {
  fn nnodes(&self) -> usize {
    self.positions.len()
  }
  fn nedges(&self) -> usize {
    self.nedges
  }

  fn position(&self, inode: NodeIdx) -> &Point {
    &self.positions[inode]
  }
  fn degree(&self, inode: NodeIdx) -> usize {
    self.adjacency[inode].len()
  }

  fn has_edge(&self, a: NodeIdx, b: NodeIdx) -> bool {
    self.adjacency[a].contains(&b)
  }

  fn neighbors(&self, inode: NodeIdx) -> impl Iterator<Item = NodeIdx> + '_ {
    self.adjacency[inode].iter().copied()
  }

  fn remove_node(&mut self, inode: NodeIdx) {
    assert!(inode < self.nnodes(), "node out of range");

    let neighbors = std::mem::take(&mut self.adjacency[inode]);
    for &ineighbor in &neighbors {
      self.adjacency[ineighbor].swap_remove(&inode);
    }
    self.nedges -= neighbors.len();

    let ilast = self.nnodes() - 1;
    self.positions.swap_remove(inode);
    self.adjacency.swap_remove(inode);

    // Relabel the moved node in the lists of its neighbors.
    if inode != ilast {
      for i in 0..self.adjacency[inode].len() {
        let ineighbor = self.adjacency[inode][i];
        let list = &mut self.adjacency[ineighbor];
        list.swap_remove(&ilast);
        list.insert(inode);
      }
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn square() -> Graph {
    let mut g = Graph::new();
    for p in [[0., 0., 0.], [1., 0., 0.], [1., 1., 0.], [0., 1., 0.]] {
      g.add_node(Point::from(p));
    }
    for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
      assert!(g.add_edge(a, b));
    }
    g
  }

  #[test]
  fn edges_are_deduplicated() {
    let mut g = square();
    assert!(!g.add_edge(1, 0));
    assert!(!g.add_edge(2, 2));
    assert_eq!(g.nedges(), 4);
    assert_eq!(g.edges().count(), 4);
    assert!(g.edges().all(|(a, b)| a < b));
  }

  #[test]
  fn adjacency_symmetric() {
    let g = square();
    for a in g.node_indices() {
      for b in g.node_indices() {
        assert_eq!(g.has_edge(a, b), g.has_edge(b, a));
      }
      assert_eq!(g.degree(a), 2);
    }
  }

  #[test]
  fn remove_relabels_last_node() {
    let mut g = square();
    g.remove_node(1);

    assert_eq!(g.nnodes(), 3);
    assert_eq!(g.nedges(), 2);
    // Former node 3 now lives at index 1.
    assert_eq!(g.position(1), &Point::new(0., 1., 0.));
    assert!(g.has_edge(1, 0));
    assert!(g.has_edge(1, 2));
    assert!(!g.has_edge(0, 2));
    assert_eq!(g.edges().count(), g.nedges());
  }

  #[test]
  fn remove_last_node() {
    let mut g = square();
    g.remove_node(3);
    assert_eq!(g.nnodes(), 3);
    assert_eq!(g.nedges(), 2);
    assert_eq!(g.degree(0), 1);
    assert_eq!(g.degree(2), 1);
  }
}
