use std::sync::LazyLock;

use derive_from_env::FromEnv;

#[derive(FromEnv)]
#[from_env(prefix = "SCLOG")]
#[allow(non_snake_case)]
pub struct SclogConfig {
    /// Directory name created under the working directory when a bare
    /// filename has to be resolved to a log path.
    #[from_env(default = "logs")]
    pub LOG_DIR: String,
    /// Default number of rotated backups to keep. 0 keeps everything.
    #[from_env(default = "0")]
    pub BACKUP_COUNT: u32,
}

pub static SCLOG_CONFIG: LazyLock<SclogConfig> =
    LazyLock::new(|| SclogConfig::from_env().unwrap());
