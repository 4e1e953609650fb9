use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CANDIDATES: [&str; 4] = [
    "pipetree.toml",
    "pipetree.json",
    "pipetree.yaml",
    "pipetree.yml",
];

/// Configuration file structure for pipetree.
///
/// Lets users keep input/output settings for recurring conversions.
/// Command-line flags take precedence over anything loaded here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Input parsing settings
    #[serde(default)]
    pub input: InputConfig,

    /// Output document settings
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InputConfig {
    /// Path to the usage export
    pub path: Option<PathBuf>,

    /// Field delimiter (single ASCII character)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Where to write the document; stdout when unset
    pub path: Option<PathBuf>,

    /// Document format
    #[serde(default)]
    pub format: OutputFormat,

    /// Indent the document
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Summary,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: None,
            delimiter: default_delimiter(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: None,
            format: OutputFormat::Json,
            pretty: default_pretty(),
        }
    }
}

fn default_delimiter() -> char {
    ','
}

fn default_pretty() -> bool {
    true
}

/// Converts a delimiter character to the byte the CSV reader expects.
pub fn delimiter_byte(delimiter: char) -> Result<u8> {
    if !delimiter.is_ascii() {
        bail!("Delimiter must be a single ASCII character, got {delimiter:?}");
    }
    Ok(delimiter as u8)
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path (must exist)
    /// 2. ./pipetree.toml
    /// 3. ./pipetree.json
    /// 4. ./pipetree.yaml
    /// 5. ./pipetree.yml
    /// 6. `<user config dir>/pipetree/config.toml`
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let user_config = dirs::config_dir().map(|dir| dir.join("pipetree").join("config.toml"));
        Self::discover(Path::new("."), user_config.as_deref())
    }

    fn discover(dir: &Path, user_config: Option<&Path>) -> Result<Self> {
        let local = CANDIDATES.iter().map(|candidate| dir.join(candidate));

        for path in local.chain(user_config.map(Path::to_path_buf)) {
            if path.is_file() {
                return Self::load_from_path(&path);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        debug!("Loading config from: {}", path.display());

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("yaml" | "yml") => serde_yaml::to_string(self)?,
            _ => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.delimiter, ',');
        assert!(config.input.path.is_none());
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_load_toml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        let toml_content = r#"
[input]
path = "usage.csv"
delimiter = ";"

[output]
path = "usage.json"
format = "yaml"
pretty = false
"#;
        write!(temp_file, "{}", toml_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.input.path, Some(PathBuf::from("usage.csv")));
        assert_eq!(config.input.delimiter, ';');
        assert_eq!(config.output.path, Some(PathBuf::from("usage.json")));
        assert_eq!(config.output.format, OutputFormat::Yaml);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_load_json_config() {
        let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
        let json_content = r#"{
  "output": {
    "format": "summary"
  }
}"#;
        write!(temp_file, "{}", json_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.output.format, OutputFormat::Summary);
        assert!(config.output.pretty);
        assert_eq!(config.input.delimiter, ',');
    }

    #[test]
    fn test_load_yaml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".yml").unwrap();
        write!(temp_file, "input:\n  delimiter: \"|\"\n").unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.input.delimiter, '|');
    }

    #[test]
    fn test_load_missing_explicit_config_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nonexistent.toml");

        let err = Config::load(Some(path.as_path())).unwrap_err();
        assert!(err.to_string().contains("nonexistent.toml"));
    }

    #[test]
    fn test_discover_prefers_local_candidates() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join("pipetree.yaml"),
            "output:\n  format: yaml\n",
        )
        .unwrap();
        std::fs::write(
            temp_dir.path().join("pipetree.toml"),
            "[output]\nformat = \"summary\"\n",
        )
        .unwrap();
        let user_config = temp_dir.path().join("user.toml");
        std::fs::write(&user_config, "[output]\nformat = \"json\"\n").unwrap();

        let config = Config::discover(temp_dir.path(), Some(&user_config)).unwrap();
        assert_eq!(config.output.format, OutputFormat::Summary);
    }

    #[test]
    fn test_discover_falls_back_to_user_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let user_config = temp_dir.path().join("config.toml");
        std::fs::write(&user_config, "[input]\ndelimiter = \"\\t\"\n").unwrap();

        let config = Config::discover(temp_dir.path(), Some(&user_config)).unwrap();
        assert_eq!(config.input.delimiter, '\t');
    }

    #[test]
    fn test_discover_without_files_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config::discover(temp_dir.path(), None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config {
            input: InputConfig {
                path: Some(PathBuf::from("in.csv")),
                delimiter: ';',
            },
            output: OutputConfig {
                path: None,
                format: OutputFormat::Yaml,
                pretty: false,
            },
        };

        for name in ["saved.toml", "saved.json", "saved.yaml"] {
            let path = temp_dir.path().join(name);
            config.save(&path).unwrap();
            assert_eq!(Config::load_from_path(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_delimiter_byte() {
        assert_eq!(delimiter_byte(',').unwrap(), b',');
        assert_eq!(delimiter_byte('\t').unwrap(), b'\t');
        assert!(delimiter_byte('§').is_err());
    }
}
