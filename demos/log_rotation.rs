use std::{thread, time::Duration};

use sclog::{RotationConfig, RotationWhen, logger_config, rmall};

fn main() -> Result<(), sclog::Error> {
    let dir = std::path::PathBuf::from("/tmp/sclog_demo_rotation");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let mut logger = logger_config("rotation-demo")
        .with_filename(&dir)
        .with_rotation(RotationConfig {
            when: RotationWhen::Second,
            interval: 1,
            backup_count: 3,
            ..RotationConfig::default()
        })
        .build()?;

    for i in 0..5 {
        logger.info(&format!("log message number {i}"));
        thread::sleep(Duration::from_millis(400));
    }
    logger.flush();

    let mut files: Vec<String> = std::fs::read_dir(&dir)
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    files.sort();

    println!("\n--- Rotation Summary ---");
    println!("Log directory: {}", dir.display());
    for f in &files {
        println!("  {f}");
    }

    drop(logger);
    rmall(&[dir.to_str().unwrap()], true)?;
    Ok(())
}
