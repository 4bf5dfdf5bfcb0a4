// src/export.rs

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::body::Body;
use crate::config::GenerationConfig;
use crate::error::Result;
use crate::trajectory::ScatterPoint;

/// Scatter tables shorter than this are written without a progress bar.
const PROGRESS_THRESHOLD: usize = 250_000;

/// Sidecar describing how an initial-conditions file was produced.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRecord {
    pub date: String,
    pub output: String,
    pub count: usize,
    pub total_mass: f64,
    pub config: GenerationConfig,
}

impl GenerationRecord {
    pub fn new(config: &GenerationConfig, bodies: &[Body], output: &Path) -> Self {
        Self {
            date: Utc::now().to_rfc3339(),
            output: output.display().to_string(),
            count: bodies.len(),
            total_mass: bodies.iter().map(|b| b.mass).sum(),
            config: *config,
        }
    }
}

pub fn export_metadata(path: &Path, record: &GenerationRecord) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, record)?;
    Ok(())
}

pub fn write_bodies_csv<W: Write>(writer: W, bodies: &[Body]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record([
        "Object",
        "Mass",
        "Position X",
        "Position Y",
        "Position Z",
        "Velocity X",
        "Velocity Y",
        "Velocity Z",
    ])?;

    for (i, body) in bodies.iter().enumerate() {
        wtr.write_record(&[
            i.to_string(),
            body.mass.to_string(),
            body.position.x.to_string(),
            body.position.y.to_string(),
            body.position.z.to_string(),
            body.velocity.x.to_string(),
            body.velocity.y.to_string(),
            body.velocity.z.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn save_bodies_csv(path: &Path, bodies: &[Body]) -> Result<()> {
    write_bodies_csv(File::create(path)?, bodies)
}

/// Writes `body,step,x,y,z,size,color` rows.
pub fn write_scatter_csv<W: Write>(writer: W, points: &[ScatterPoint]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let pb = if points.len() >= PROGRESS_THRESHOLD {
        let pb = ProgressBar::new(points.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    for (i, point) in points.iter().enumerate() {
        wtr.serialize(point)?;
        if i % 10_000 == 0 {
            pb.set_position(i as u64);
        }
    }

    wtr.flush()?;
    pb.finish_and_clear();
    Ok(())
}
