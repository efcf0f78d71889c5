//! Solves the Poisson equation on a holey box mesh given as point and tet lists.
//!
//! Usage: `graph-poisson NODES_FILE TETS_FILE [OUTPUT_VTK]`

use graph_poisson::{
  graph::MeshGraph,
  io,
  problem::{self, PoissonConfig},
};

use std::process::ExitCode;

fn main() -> ExitCode {
  tracing_subscriber::fmt::init();

  let args: Vec<String> = std::env::args().collect();
  if args.len() < 3 {
    let program = args.first().map_or("graph-poisson", String::as_str);
    eprintln!("Usage: {program} NODES_FILE TETS_FILE [OUTPUT_VTK]");
    return ExitCode::from(1);
  }

  match run(&args[1], &args[2], args.get(3).map(String::as_str)) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("error: {err}");
      ExitCode::from(1)
    }
  }
}

fn run(nodes_file: &str, tets_file: &str, output: Option<&str>) -> graph_poisson::Result<()> {
  let mut graph = io::load_graph(nodes_file, tets_file)?;

  let config = PoissonConfig::default();
  let solution = problem::solve_poisson(&mut graph, &config)?;

  if let Some((min, max)) = solution.value_range() {
    tracing::info!(
      "solution on {} nodes ({} fixed): min {min:.6}, max {max:.6}",
      graph.nnodes(),
      solution.nconstrained
    );
  }

  if let Some(path) = output {
    io::write_vtk(&graph, &solution.values, path)?;
  }
  Ok(())
}
