//! Open a series file, query values and color one map

use brainmap::{
    BrainordinateMatrixFile, MappedMatrixFile, Palette, PaletteCatalog, PalettePoint,
    StatisticsKind, Structure,
};
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filename = "example_series.bmat";

    if !std::path::Path::new(filename).exists() {
        println!("File '{filename}' not found!");
        println!("   Run 'cargo run --example write_series' first");
        return Ok(());
    }

    let start = Instant::now();
    let file = BrainordinateMatrixFile::open(MappedMatrixFile::open(filename)?)?;
    println!(
        "Opened {} file in {:.3}ms",
        file.kind(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    println!("   Maps: {}", file.number_of_maps());
    println!("   Brainordinates: {}", file.brainordinate_count());

    let range = file.data_range_from_all_maps();
    println!("   Data range: [{}, {}]", range.minimum, range.maximum);

    println!("\nMap names:");
    for map in [0, 1, 5, file.number_of_maps() - 1] {
        println!("   {map}: {}", file.map_name(map)?);
    }

    println!("\nValues at map 5:");
    let value = file.surface_node_value(5, Structure::CortexLeft, 100, 2000)?;
    println!("   CortexLeft node 100 → {}", value.text);
    match file.surface_node_value(5, Structure::CortexLeft, 100, 32492) {
        Ok(value) => println!("   CortexLeft node 100 (32492) → {}", value.text),
        Err(e) if e.is_no_data() => println!("   CortexLeft with 32492 nodes → no data"),
        Err(e) => return Err(e.into()),
    }
    let voxel = file.volume_voxel_value(5, [1.0, 2.0, 2.0])?;
    println!("   Voxel {:?} → {}", voxel.ijk, voxel.value.text);

    let series = file.series_data_for_surface_node(Structure::CortexRight, 10)?;
    println!("   CortexRight node 10 series: {} points", series.len());

    let stats = file.map_statistics(5, StatisticsKind::Descriptive, None)?;
    if let Some(stats) = stats.as_descriptive() {
        println!(
            "\nMap 5 statistics: mean {:.4}, median {:.4}, sd {:.4}",
            stats.mean(),
            stats.median(),
            stats.sample_std_dev()
        );
    }

    let catalog = PaletteCatalog::new().with_palette(Palette::new(
        "ROY-BIG-BL",
        vec![
            PalettePoint::new(1.0, [1.0, 1.0, 0.0]),
            PalettePoint::new(0.0, [0.0, 0.0, 0.0]),
            PalettePoint::new(-1.0, [0.0, 1.0, 1.0]),
        ],
    ));
    let start = Instant::now();
    file.update_coloring(5, &catalog)?;
    let rgba = file.map_rgba_bytes(5)?;
    println!(
        "\nColored {} brainordinates in {:.3}ms",
        rgba.len() / 4,
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}
