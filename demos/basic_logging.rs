use sclog::{Level, logger_config, rmall};

fn main() -> Result<(), sclog::Error> {
    let mut logger = logger_config("basic_demo")
        .with_level(Level::Debug)
        .with_filename("basic_demo")
        .build()?;

    logger.debug("debug message");
    logger.info("info message");
    logger.warning("warning message");
    logger.error("error message");
    logger.critical("critical message");

    let err = std::io::Error::other("exception message");
    logger.exception("here comes the raise", &err);

    let path = logger.filename().unwrap().to_path_buf();
    drop(logger); // flushes both sinks

    println!(
        "\n--- {} ---\n{}",
        path.display(),
        std::fs::read_to_string(&path).unwrap()
    );

    // remove the generated logs directory again
    rmall(&["logs"], true)?;
    Ok(())
}
