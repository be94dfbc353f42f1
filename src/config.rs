use std::env;
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_DB_FILE: &str = "shawaya_pos.db";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub database_file: String,
    /// Where backup files are written. `None` disables automatic backups.
    pub backup_dir: Option<PathBuf>,
    pub auto_backup_on_advance: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from(DEFAULT_DATA_DIR);
        AppConfig {
            backup_dir: Some(data_dir.join("backups")),
            data_dir,
            database_file: DEFAULT_DB_FILE.to_string(),
            auto_backup_on_advance: true,
        }
    }
}

impl AppConfig {
    /// Reads `SHAWAYA_*` variables, loading a `.env` file first if one exists.
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "no .env file loaded");
        }

        let data_dir = env::var("SHAWAYA_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let database_file =
            env::var("SHAWAYA_DB_FILE").unwrap_or_else(|_| DEFAULT_DB_FILE.to_string());

        let backup_dir = match env::var("SHAWAYA_BACKUP_DIR") {
            Ok(dir) if dir.trim().is_empty() => None,
            Ok(dir) => Some(PathBuf::from(dir)),
            Err(_) => Some(data_dir.join("backups")),
        };

        let auto_backup_on_advance = env::var("SHAWAYA_AUTO_BACKUP")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        AppConfig {
            data_dir,
            database_file,
            backup_dir,
            auto_backup_on_advance,
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
