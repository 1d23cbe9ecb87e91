//! Generate configuration files from typed producers, then read them back
//! the way a starting application would.
//!
//! Run with `RUST_LOG=info cargo run --example generate_and_load`.

use anyhow::Result;
use inistore::cache::DocumentCache;
use inistore::config::StorageConfig;
use inistore::producer::IniProducer;
use inistore::repository::ConfigRepository;
use inistore::values::{BoolConfig, ConfigFile, FloatConfig, IntConfig, Vec3, Vec3Config};

fn main() -> Result<()> {
    env_logger::init();

    let asset_root = tempfile::tempdir()?;
    let config = StorageConfig {
        verbose: true,
        ..StorageConfig::default()
    };

    // Packaging time: every producer contributes its section.
    let shake = FloatConfig::new("ShakeDetector", 2.5)
        .with_description("Acceleration needed to count as a shake");
    let tutorial = BoolConfig::new("TutorialEnabled", true);
    let offset = Vec3Config::new("CameraOffset", Vec3::new(0.0, 1.5, -3.0));
    let seed = IntConfig::new("Seed", 42).in_file(ConfigFile::Testing);
    let producers: [&dyn IniProducer; 4] = [&shake, &tutorial, &offset, &seed];

    let mut generator = ConfigRepository::new(
        config.clone(),
        asset_root.path(),
        DocumentCache::new(),
    );
    let target = generator.runtime_dir().to_path_buf();
    let report = generator.generate(&producers, &target)?;
    println!("Wrote {} file(s):", report.written_count());
    for path in &report.written {
        println!("  {}", path.display());
        println!("{}", std::fs::read_to_string(path)?);
    }

    // Startup: a fresh repository reads the deployed files once.
    let mut runtime = ConfigRepository::new(config, asset_root.path(), DocumentCache::new());
    let mut loaded_shake = FloatConfig::new("ShakeDetector", 0.0);
    let mut loaded_seed = IntConfig::new("Seed", 0).in_file(ConfigFile::Testing);
    runtime.load_producer(&mut loaded_shake)?;
    runtime.load_producer(&mut loaded_seed)?;
    println!(
        "{} = {} ({})",
        loaded_shake.section_name(),
        loaded_shake.value(),
        shake.description()
    );
    println!("{} = {}", loaded_seed.section_name(), loaded_seed.value());

    match runtime.read_section("Config", "Missing")? {
        Some(section) => println!("Unexpected section: {:?}", section),
        None => println!("Section 'Missing' not found; defaults apply"),
    }

    Ok(())
}
