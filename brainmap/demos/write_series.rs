//! Write a small dense series file to disk

use brainmap::{
    BrainModelsDescriptor, MappedMatrixFile, MatrixHeader, SeriesDescriptor, SeriesUnit,
    Structure, VolumeSpace,
};
use std::time::Instant;

const LEFT_NODES: usize = 2000;
const RIGHT_NODES: usize = 2000;
const TIME_POINTS: usize = 120;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filename = "example_series.bmat";

    let models = BrainModelsDescriptor::new()
        .with_full_surface(Structure::CortexLeft, LEFT_NODES)
        .with_full_surface(Structure::CortexRight, RIGHT_NODES)
        .with_volume(
            Structure::ThalamusLeft,
            (0..4).flat_map(|i| (0..4).map(move |j| [i, j, 2])).collect(),
        )
        .with_volume_space(VolumeSpace::identity([8, 8, 4]));
    let header = MatrixHeader::new(
        models,
        SeriesDescriptor::new(TIME_POINTS, 0.0, 0.72, SeriesUnit::Seconds),
    );
    let rows = LEFT_NODES + RIGHT_NODES + 16;

    println!("Generating {rows} x {TIME_POINTS} series...");
    let data: Vec<f32> = (0..rows * TIME_POINTS)
        .map(|n| {
            let (row, t) = (n / TIME_POINTS, n % TIME_POINTS);
            ((row as f32 * 0.01) + (t as f32 * 0.2)).sin()
        })
        .collect();

    let start = Instant::now();
    let file = MappedMatrixFile::create(filename, &header, rows, TIME_POINTS, &data)?;
    file.flush()?;
    println!(
        "Wrote '{}' in {:.3}ms",
        file.path().display(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    println!("   Run 'cargo run --example read_series' next");
    Ok(())
}
