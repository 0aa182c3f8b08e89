//! Read/write trajectory JSON files.
//!
//! Trajectory JSON is the portable representation of one integration run:
//! - method + parameters (β, γ, N, initial state)
//! - the full S/I/R series on its time grid
//!
//! The schema is defined by `domain::TrajectoryFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{SirParams, SirState, SirTrajectory, TrajectoryFile};
use crate::error::AppError;

/// Bundle a trajectory with the inputs that produced it.
pub fn trajectory_file(
    params: SirParams,
    population: f64,
    initial: SirState,
    trajectory: &SirTrajectory,
) -> TrajectoryFile {
    TrajectoryFile {
        tool: "sir".to_string(),
        method: "euler".to_string(),
        params,
        population,
        initial,
        trajectory: trajectory.clone(),
    }
}

/// Write a trajectory JSON file.
pub fn write_trajectory_json(path: &Path, file: &TrajectoryFile) -> Result<(), AppError> {
    let out = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create trajectory JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(out, file)
        .map_err(|e| AppError::new(2, format!("Failed to write trajectory JSON: {e}")))?;
    Ok(())
}

/// Read a trajectory JSON file.
pub fn read_trajectory_json(path: &Path) -> Result<TrajectoryFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open trajectory JSON '{}': {e}", path.display())))?;
    let parsed: TrajectoryFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid trajectory JSON: {e}")))?;

    let tr = &parsed.trajectory;
    if tr.s.len() != tr.len() || tr.i.len() != tr.len() || tr.r.len() != tr.len() {
        return Err(AppError::new(
            2,
            "Invalid trajectory JSON: t, s, i, r must have the same length.",
        ));
    }
    Ok(parsed)
}
