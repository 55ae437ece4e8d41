use anyhow::Result;
use std::path::Path;
use wayfinder::dataset::Compression;

use super::load_dataset;

pub fn run(chargers: &Path) -> Result<()> {
    let dataset = load_dataset(chargers)?;
    let stats = dataset.stats();
    let file_size = std::fs::metadata(chargers)?.len();

    println!("Dataset: {}", chargers.display());
    println!("{:-<40}", "");
    println!("File size:       {} bytes", file_size);
    println!("Compression:     {:?}", Compression::from_path(chargers));
    println!("Sites:           {}", stats.total_sites);
    println!(
        "With location:   {} ({:.1}%)",
        stats.located_sites,
        percentage(stats.located_sites, stats.total_sites)
    );
    println!(
        "Without location: {}",
        stats.total_sites - stats.located_sites
    );

    if !stats.by_status.is_empty() {
        println!();
        println!("By status:");
        let mut by_count: Vec<_> = stats.by_status.iter().collect();
        by_count.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (status, count) in by_count {
            println!("  {:<20} {:>8}", status, count);
        }
    }

    Ok(())
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}
