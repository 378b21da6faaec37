// SPDX-License-Identifier: MIT
//! Basic usage example for blob archives
//!
//! Run with `RUST_LOG=blob_archive=debug` to see the library's log events.

use blob_archive::{Blob, ReadLimits, StreamingBlob};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .init();

    println!("=== Blob Archive - Basic Usage ===\n");

    // Step 1: Bundle assets
    println!("1. Bundling assets...");
    let mut blob = Blob::new();
    blob.append("textures/player.rgba", vec![0x7Fu8; 64 * 64 * 4]);
    blob.append("sounds/jump.pcm", (0..4096u32).map(|i| (i % 256) as u8).collect::<Vec<_>>());
    blob.append("tables/levels.csv", b"level,par\n1,30\n2,45\n3,60\n");

    for (id, data) in blob.iter() {
        println!("   {}: {} bytes", String::from_utf8_lossy(id), data.len());
    }

    // Step 2: Write to file
    println!("\n2. Writing archive...");
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("assets.blob");
    let mut writer = BufWriter::new(File::create(&path)?);
    blob.write(&mut writer)?;
    writer.flush()?;

    let stats = blob.stats();
    println!(
        "   {} items, header {} bytes, data {} bytes, overhead {:.3}%",
        stats.item_count,
        stats.header_len,
        stats.data_len,
        stats.overhead_ratio() * 100.0
    );

    // Step 3: Eager read
    println!("\n3. Reading everything into memory...");
    let limits = ReadLimits::from_env();
    let eager = Blob::read_with_limits(BufReader::new(File::open(&path)?), &limits)?;
    let levels = eager.get_by_id("tables/levels.csv").unwrap_or_default();
    println!("   levels.csv:\n{}", String::from_utf8_lossy(levels));

    // Step 4: Streaming read
    println!("4. Opening lazily and seeking inside one item...");
    let streaming = StreamingBlob::open_with_limits(File::open(&path)?, &limits)?;
    if let Some(mut sound) = streaming.get_by_id("sounds/jump.pcm") {
        sound.seek(SeekFrom::End(-4))?;
        let mut tail = [0u8; 4];
        sound.read_exact(&mut tail)?;
        println!("   last samples of jump.pcm: {:?}", tail);
    }

    for index in 0..streaming.item_count() {
        let id = streaming.get_id_at_index(index).unwrap_or_default();
        let len = streaming.get_by_index(index).map_or(0, |item| item.len());
        println!("   [{}] {} ({} bytes)", index, String::from_utf8_lossy(id), len);
    }

    println!("\nDone.");
    Ok(())
}
