//! Reading point/tetrahedron lists and writing solutions for visualization.

use crate::{
  geometry::Point,
  graph::{Graph, MeshGraph},
  Error, Result,
};

use vtkio::{
  model::{
    Attribute, Attributes, ByteOrder, CellType, Cells, DataArray, ElementType,
    UnstructuredGridPiece, Version, VertexNumbers, Vtk,
  },
  IOBuffer,
};

use std::{
  fs::File,
  io::{BufRead, BufReader},
  path::Path,
  str::FromStr,
};

/// Edges induced by a tetrahedron `[t0, t1, t2, t3]`.
pub const TET_EDGES: [(usize, usize); 4] = [(0, 1), (0, 2), (1, 3), (2, 3)];

fn open(path: &Path) -> Result<BufReader<File>> {
  File::open(path)
    .map(BufReader::new)
    .map_err(|source| Error::Io {
      path: path.to_path_buf(),
      source,
    })
}

/// Parses exactly `N` whitespace separated fields.
fn parse_fields<T: FromStr, const N: usize>(line: &str) -> Option<[T; N]> {
  let fields: Vec<T> = line
    .split_whitespace()
    .map(|s| s.parse().ok())
    .collect::<Option<_>>()?;
  fields.try_into().ok()
}

/// Yields the 1-based line number and content of all lines
/// that are neither empty nor comments.
fn content_lines<'a, R: BufRead + 'a>(
  reader: R,
  path: &'a Path,
) -> impl Iterator<Item = Result<(usize, String)>> + 'a {
  reader
    .lines()
    .enumerate()
    .map(move |(i, line)| {
      line.map(|line| (i + 1, line)).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
      })
    })
    .filter(|line| match line {
      Ok((_, content)) => {
        let content = content.trim();
        !content.is_empty() && !content.starts_with('#')
      }
      Err(_) => true,
    })
}

/// Reads one point per line, given by three coordinates.
pub fn read_points<R: BufRead>(reader: R, path: &Path) -> Result<Vec<Point>> {
  content_lines(reader, path)
    .map(|line| -> Result<Point> {
      let (iline, content) = line?;
      let [x, y, z] = parse_fields::<f64, 3>(&content).ok_or_else(|| Error::Parse {
        path: path.to_path_buf(),
        line: iline,
        message: format!("expected three coordinates, got `{content}`"),
      })?;
      Ok(Point::new(x, y, z))
    })
    .collect()
}

/// Reads one tetrahedron per line, given by four indices into a point list of
/// length `npoints`.
pub fn read_tets<R: BufRead>(reader: R, path: &Path, npoints: usize) -> Result<Vec<[usize; 4]>> {
  content_lines(reader, path)
    .map(|line| -> Result<[usize; 4]> {
      let (iline, content) = line?;
      let parse_error = |message| Error::Parse {
        path: path.to_path_buf(),
        line: iline,
        message,
      };
      let tet = parse_fields::<usize, 4>(&content)
        .ok_or_else(|| parse_error(format!("expected four indices, got `{content}`")))?;
      if let Some(&i) = tet.iter().find(|&&i| i >= npoints) {
        return Err(parse_error(format!(
          "index {i} out of range for {npoints} points"
        )));
      }
      Ok(tet)
    })
    .collect()
}

/// Maps input coordinates from $[0,1]^2 times RR$ onto $[-1,1]^2 times RR$.
pub fn transform_point(p: &Point) -> Point {
  p * 2.0 - Point::new(1.0, 1.0, 0.0)
}

/// Builds the graph of points and tetrahedron edges.
///
/// Points are inserted as they are. Edges shared by multiple tets are only added once.
pub fn graph_from_tets(points: &[Point], tets: &[[usize; 4]]) -> Graph {
  let mut graph = Graph::new();
  for p in points {
    graph.add_node(*p);
  }
  for tet in tets {
    for (a, b) in TET_EDGES {
      graph.add_edge(tet[a], tet[b]);
    }
  }
  graph
}

/// Loads the mesh graph from a points file and a tets file.
pub fn load_graph(nodes_path: impl AsRef<Path>, tets_path: impl AsRef<Path>) -> Result<Graph> {
  let nodes_path = nodes_path.as_ref();
  let tets_path = tets_path.as_ref();

  let points: Vec<Point> = read_points(open(nodes_path)?, nodes_path)?
    .iter()
    .map(transform_point)
    .collect();
  let tets = read_tets(open(tets_path)?, tets_path, points.len())?;

  let graph = graph_from_tets(&points, &tets);
  tracing::info!(
    "loaded mesh with {} nodes, {} edges from {} tets",
    graph.nnodes(),
    graph.nedges(),
    tets.len()
  );
  Ok(graph)
}

/// Mesh edges as line cells, with the nodal values as point scalars.
pub fn graph_to_vtk(graph: &Graph, values: &na::DVector<f64>) -> Vtk {
  assert_eq!(graph.nnodes(), values.len());

  let points = IOBuffer::F64(graph.positions().iter().flat_map(|p| p.iter().copied()).collect());

  let vertices = graph
    .edges()
    .flat_map(|(a, b)| [2, a as u32, b as u32])
    .collect();
  let cell_verts = VertexNumbers::Legacy {
    num_cells: graph.nedges() as u32,
    vertices,
  };
  let types = vec![CellType::Line; graph.nedges()];
  let cells = Cells { cell_verts, types };

  let solution = Attribute::DataArray(DataArray {
    name: String::from("u"),
    elem: ElementType::Scalars {
      num_comp: 1,
      lookup_table: None,
    },
    data: IOBuffer::F64(values.iter().copied().collect()),
  });

  let grid = UnstructuredGridPiece {
    points,
    cells,
    data: Attributes {
      point: vec![solution],
      cell: Vec::new(),
    },
  };
  let data = grid.into();

  Vtk {
    version: Version::new((4, 2)),
    title: String::from("Graph Poisson Solution"),
    byte_order: ByteOrder::native(),
    data,
    file_path: None,
  }
}

/// Writes a legacy ASCII VTK file.
pub fn write_vtk(graph: &Graph, values: &na::DVector<f64>, path: impl AsRef<Path>) -> Result<()> {
  let path = path.as_ref();
  graph_to_vtk(graph, values)
    .export_ascii(path)
    .map_err(|err| Error::Vtk(format!("{}: {err:?}", path.display())))?;
  tracing::info!("wrote solution to {}", path.display());
  Ok(())
}
