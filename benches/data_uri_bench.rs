//! Benchmark of turning a result set's raw payloads into displayable images.
//!
//! Each generation returns four JPEGs of roughly 1 MB. Wrapping them as
//! `GeneratedImage` base64-encodes every payload into a `data:` URI once; this
//! measures that cost against the network and model time of a generation.
//!
//! Run with: cargo bench --bench data_uri_bench

use ai_wallpaper::image_generation::{GeneratedImage, ProviderImage, ResultSet};
use std::time::Instant;

const PAYLOAD_BYTES: usize = 1024 * 1024;

fn fake_jpeg(seed: u8) -> ProviderImage {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.extend((0..PAYLOAD_BYTES).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)));
    ProviderImage::jpeg(bytes)
}

fn main() {
    let payloads: Vec<ProviderImage> = (0..4).map(fake_jpeg).collect();

    println!("Data URI Conversion Benchmark");
    println!("=============================\n");
    println!("Images per result set: {}", payloads.len());
    println!(
        "Total payload size: {} bytes\n",
        payloads.iter().map(|p| p.bytes.len()).sum::<usize>()
    );

    let iterations = 50;

    let start = Instant::now();
    let mut uri_len = 0;
    for _ in 0..iterations {
        let images: Vec<GeneratedImage> =
            payloads.iter().cloned().map(GeneratedImage::from).collect();
        let results = ResultSet::new("benchmark prompt", images);
        uri_len = results.images().iter().map(|i| i.data_uri().len()).sum();
    }
    let duration = start.elapsed();

    println!("Build result set (4 images, encode to data URIs):");
    println!("  {} iterations", iterations);
    println!("  Total time: {:?}", duration);
    println!(
        "  Per result set: {:.2}ms",
        duration.as_micros() as f64 / iterations as f64 / 1000.0
    );
    println!("  Data URI bytes per result set: {}", uri_len);

    let start = Instant::now();
    let images: Vec<GeneratedImage> = payloads.iter().cloned().map(GeneratedImage::from).collect();
    for _ in 0..iterations {
        let snapshot = images.clone();
        assert_eq!(snapshot.len(), 4);
    }
    let clone_duration = start.elapsed();

    println!("\nClone for a UI snapshot (shared buffers):");
    println!("  Total time: {:?}", clone_duration);

    println!("\n\nContext:");
    println!("========");
    println!("Image generation round trip: ~5,000ms-15,000ms");
    println!(
        "Conversion as % of a 5s generation: {:.4}%",
        (duration.as_micros() as f64 / iterations as f64) / 5_000_000.0 * 100.0
    );
}
