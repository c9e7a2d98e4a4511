use crate::cli::GridArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::io::xyzr::read_xyzr;
use espsurf::core::grid::Grid;
use espsurf::workflows;
use tracing::info;

pub fn run(args: GridArgs) -> Result<()> {
    let config = build_config(&args.surface)?;
    let atoms = read_xyzr(&args.surface.input)?;
    let grid = workflows::surface::plan_grid(&atoms, &config)?;
    info!(dims = %grid.dims(), points = grid.len(), "Lattice planned.");

    println!("Atoms:      {}", atoms.len());
    print!("{}", describe_grid(&grid));
    Ok(())
}

/// A human-readable summary of `grid`, one `Label: value` pair per line.
pub fn describe_grid(grid: &Grid) -> String {
    let (lower, upper) = grid.bounds();
    let center = grid.center();
    format!(
        "Dimensions: {}\n\
         Points:     {}\n\
         Spacing:    {}\n\
         Origin:     [{:.4}, {:.4}, {:.4}]\n\
         Far corner: [{:.4}, {:.4}, {:.4}]\n\
         Center:     [{:.4}, {:.4}, {:.4}]\n",
        grid.dims(),
        grid.len(),
        grid.spacing(),
        lower.x,
        lower.y,
        lower.z,
        upper.x,
        upper.y,
        upper.z,
        center.x,
        center.y,
        center.z,
    )
}
