use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use phonesift_core::domain::phone::{DEFAULT_COUNTRY_CODE, DEFAULT_TERMINATOR};
use phonesift_core::rules::validation::{
    DEFAULT_ACCOUNT_ID_COLUMN, DEFAULT_CONTACT_ID_COLUMN, DEFAULT_DISPLAY_NAME_ALIASES,
    DEFAULT_DISPLAY_NAME_COLUMN, DEFAULT_PHONE_COLUMN,
};
use phonesift_core::{CleanerOptions, ColumnSchema, CoreError, PhoneNormalizer};
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "phonesift";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub phone: PhoneConfig,
    pub columns: ColumnsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneConfig {
    pub country_code: String,
    pub terminator: char,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnsConfig {
    pub contact_id: String,
    pub account_id: String,
    pub phone: String,
    pub display_name: String,
    pub display_name_aliases: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            phone: PhoneConfig {
                country_code: DEFAULT_COUNTRY_CODE.to_string(),
                terminator: DEFAULT_TERMINATOR,
            },
            columns: ColumnsConfig {
                contact_id: DEFAULT_CONTACT_ID_COLUMN.to_string(),
                account_id: DEFAULT_ACCOUNT_ID_COLUMN.to_string(),
                phone: DEFAULT_PHONE_COLUMN.to_string(),
                display_name: DEFAULT_DISPLAY_NAME_COLUMN.to_string(),
                display_name_aliases: DEFAULT_DISPLAY_NAME_ALIASES
                    .iter()
                    .map(|alias| alias.to_string())
                    .collect(),
            },
        }
    }
}

impl AppConfig {
    pub fn cleaner_options(&self) -> Result<CleanerOptions> {
        let normalizer = PhoneNormalizer::new(&self.phone.country_code, self.phone.terminator)
            .map_err(|err| match err {
                CoreError::InvalidTerminator(ch) => ConfigError::InvalidTerminator(ch.to_string()),
                _ => ConfigError::InvalidCountryCode(self.phone.country_code.clone()),
            })?;
        let columns = ColumnSchema::new(
            &self.columns.contact_id,
            &self.columns.account_id,
            &self.columns.phone,
            &self.columns.display_name,
            &self.columns.display_name_aliases,
        )
        .map_err(|_| ConfigError::InvalidColumnName)?;
        Ok(CleanerOptions {
            normalizer,
            columns,
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid phone.country_code value: {0}")]
    InvalidCountryCode(String),
    #[error("invalid phone.terminator value: {0:?}")]
    InvalidTerminator(String),
    #[error("column names cannot be empty")]
    InvalidColumnName,
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    phone: Option<PhoneFile>,
    columns: Option<ColumnsFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PhoneFile {
    country_code: Option<String>,
    terminator: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ColumnsFile {
    contact_id: Option<String>,
    account_id: Option<String>,
    phone: Option<String>,
    display_name: Option<String>,
    display_name_aliases: Option<Vec<String>>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(phone) = parsed.phone {
        if let Some(country_code) = phone.country_code {
            config.phone.country_code = country_code.trim().to_string();
        }
        if let Some(terminator) = phone.terminator {
            config.phone.terminator = parse_terminator(&terminator)?;
        }
    }

    if let Some(columns) = parsed.columns {
        if let Some(contact_id) = columns.contact_id {
            config.columns.contact_id = contact_id;
        }
        if let Some(account_id) = columns.account_id {
            config.columns.account_id = account_id;
        }
        if let Some(phone) = columns.phone {
            config.columns.phone = phone;
        }
        if let Some(display_name) = columns.display_name {
            config.columns.display_name = display_name;
        }
        if let Some(aliases) = columns.display_name_aliases {
            config.columns.display_name_aliases = aliases;
        }
    }

    config.cleaner_options()?;
    Ok(config)
}

fn parse_terminator(raw: &str) -> Result<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(ConfigError::InvalidTerminator(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        load_at_path, merge_config, AppConfig, ColumnsFile, ConfigError, ConfigFile, PhoneFile,
    };
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            phone: Some(PhoneFile {
                country_code: Some("44".to_string()),
                terminator: Some("|".to_string()),
            }),
            columns: Some(ColumnsFile {
                display_name: Some("Contact".to_string()),
                display_name_aliases: Some(vec!["Client".to_string()]),
                ..ColumnsFile::default()
            }),
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.phone.country_code, "44");
        assert_eq!(merged.phone.terminator, '|');
        assert_eq!(merged.columns.contact_id, "CID");

        let options = merged.cleaner_options().expect("options");
        assert_eq!(options.normalizer.country_code(), "44");
        assert_eq!(options.columns.display_name(), "Contact");
        assert_eq!(options.columns.display_name_aliases(), ["Contact", "Client"]);
    }

    #[test]
    fn merge_config_defaults_when_empty() {
        let merged = merge_config(ConfigFile::default()).expect("merge");
        assert_eq!(merged, AppConfig::default());
    }

    #[test]
    fn merge_config_rejects_bad_terminator() {
        let parsed = ConfigFile {
            phone: Some(PhoneFile {
                country_code: None,
                terminator: Some(";;".to_string()),
            }),
            columns: None,
        };
        assert!(matches!(
            merge_config(parsed),
            Err(ConfigError::InvalidTerminator(_))
        ));

        let parsed = ConfigFile {
            phone: Some(PhoneFile {
                country_code: None,
                terminator: Some(",".to_string()),
            }),
            columns: None,
        };
        assert!(matches!(
            merge_config(parsed),
            Err(ConfigError::InvalidTerminator(_))
        ));
    }

    #[test]
    fn merge_config_rejects_bad_country_code() {
        let parsed = ConfigFile {
            phone: Some(PhoneFile {
                country_code: Some("+855".to_string()),
                terminator: None,
            }),
            columns: None,
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(err.to_string().contains("country_code"));
    }

    #[test]
    fn merge_config_rejects_blank_column() {
        let parsed = ConfigFile {
            phone: None,
            columns: Some(ColumnsFile {
                phone: Some("  ".to_string()),
                ..ColumnsFile::default()
            }),
        };
        assert!(matches!(
            merge_config(parsed),
            Err(ConfigError::InvalidColumnName)
        ));
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
        assert!(load_at_path(&missing, false).expect("optional").is_none());
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[phone]\ncountry_code = \"66\"\n[columns]\nphone = \"Mobile\"\n",
        )
        .expect("write config");

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.phone.country_code, "66");
        assert_eq!(config.phone.terminator, ';');
        assert_eq!(config.columns.phone, "Mobile");
    }

    #[test]
    fn load_at_path_rejects_unknown_fields() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[phone]\nprefix = \"0\"\n").expect("write config");
        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
