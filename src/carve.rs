use crate::{
  geometry::Box3D,
  graph::{Graph, MeshGraph},
  Error, Result,
};

/// Removes all nodes of `graph` whose position lies within `bb`.
///
/// Returns the number of removed nodes.
/// Afterwards no node position is contained in `bb`.
///
/// Removal reassigns the last index to the removed node,
/// so the cursor only advances past nodes that are kept.
pub fn remove_box<G: MeshGraph>(graph: &mut G, bb: &Box3D) -> usize {
  let mut nremoved = 0;
  let mut inode = 0;
  while inode < graph.nnodes() {
    if bb.contains(graph.position(inode)) {
      graph.remove_node(inode);
      nremoved += 1;
    } else {
      inode += 1;
    }
  }
  tracing::debug!(
    "removed {nremoved} nodes in box {:?}..{:?}",
    bb.min().as_slice(),
    bb.max().as_slice()
  );
  nremoved
}

/// Length of the first edge of the mesh.
///
/// For the structured meshes this program is fed with,
/// all edges have this length.
pub fn characteristic_edge_length(graph: &Graph) -> Result<f64> {
  let (a, b) = graph.edges().next().ok_or(Error::EmptyEdgeSet)?;
  Ok(graph.edge_length(a, b))
}
