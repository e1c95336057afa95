use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use serde::{Deserialize, Serialize};

use crate::core::{
    EntrySetting, ExtractorOptions, JsonFormat, OutputSetting,
    extractor::DEFAULT_FUNCTION_NAME,
};

pub const CONFIG_FILE_NAME: &str = ".transkeyrc.json";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_entry")]
    pub entry: EntrySetting,
    #[serde(default = "default_function_name")]
    pub function_name: String,
    #[serde(default)]
    pub mangle: bool,
    #[serde(default)]
    pub output: OutputSetting,
    #[serde(default)]
    pub merge: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent: Option<usize>,
    #[serde(default)]
    pub trailing_newline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,
}

fn default_entry() -> EntrySetting {
    EntrySetting::Single("./src/index.js".to_string())
}

fn default_function_name() -> String {
    DEFAULT_FUNCTION_NAME.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entry: default_entry(),
            function_name: default_function_name(),
            mangle: false,
            output: OutputSetting::default(),
            merge: false,
            indent: None,
            trailing_newline: false,
            out_dir: None,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if the function name is not an identifier, if no entry
    /// root is declared, or if `output` is `true` or contains empty paths.
    pub fn validate(&self) -> Result<()> {
        if !is_identifier(&self.function_name) {
            bail!(
                "Invalid 'functionName': \"{}\" is not a valid identifier",
                self.function_name
            );
        }

        let roots_ok = match &self.entry {
            EntrySetting::Single(root) => !root.trim().is_empty(),
            EntrySetting::List(roots) => non_empty_roots(roots),
            EntrySetting::Named(named) => {
                !named.is_empty() && named.values().all(|roots| non_empty_roots(&roots.to_vec()))
            }
        };
        if !roots_ok {
            bail!("Invalid 'entry': every entry needs at least one non-empty root");
        }

        self.output
            .validate()
            .context("Invalid 'output' in configuration")?;

        Ok(())
    }

    /// Engine options for a build rooted at `root`.
    pub fn extractor_options(&self, root: &Path) -> ExtractorOptions {
        ExtractorOptions {
            function_name: self.function_name.clone(),
            mangle: self.mangle,
            output: self.output.clone(),
            merge: self.merge,
            format: JsonFormat {
                indent: self.indent,
                trailing_newline: self.trailing_newline,
            },
            root: root.to_path_buf(),
        }
    }
}

fn non_empty_roots(roots: &[String]) -> bool {
    !roots.is_empty() && roots.iter().all(|root| !root.trim().is_empty())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first == '$' || first.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c == '$' || c.is_alphanumeric())
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Where the config was found; `None` when using defaults.
    pub path: Option<PathBuf>,
}

impl ConfigLoadResult {
    pub fn from_file(&self) -> bool {
        self.path.is_some()
    }

    /// Directory relative paths in the config are resolved against.
    pub fn root<'a>(&'a self, start_dir: &'a Path) -> &'a Path {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(start_dir)
    }
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.function_name, "__");
        assert!(!config.mangle);
        assert!(!config.merge);
        assert_eq!(config.output, OutputSetting::Flag(false));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "entry": { "app": "./src/app.js", "admin": ["./src/admin.js"] },
              "functionName": "t",
              "mangle": true,
              "output": "keys/[name].json",
              "merge": true,
              "indent": 2,
              "trailingNewline": true,
              "outDir": "dist"
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.function_name, "t");
        assert!(config.mangle);
        assert!(config.merge);
        assert!(config.output.is_per_entry());
        assert_eq!(config.indent, Some(2));
        assert!(config.trailing_newline);
        assert_eq!(config.out_dir.as_deref(), Some("dist"));
        assert!(matches!(config.entry, EntrySetting::Named(_)));
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{ "mangle": true }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert!(config.mangle);
        assert_eq!(config.function_name, default_function_name());
        assert_eq!(config.entry, default_entry());
        assert_eq!(config.output, OutputSetting::Flag(false));
    }

    #[test]
    fn test_output_list() {
        let json = r#"{ "output": ["all.json", "[name].json"] }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.output.paths(), vec!["all.json", "[name].json"]);
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("src").join("components");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        let found = find_config_file(&sub_dir);
        assert!(found.is_some());
        assert_eq!(found.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let found = find_config_file(dir.path());
        assert!(found.is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&config_path, r#"{ "functionName": "translate" }"#).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(result.from_file());
        assert_eq!(result.config.function_name, "translate");
        assert_eq!(result.root(Path::new("/elsewhere")), dir.path());
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file());
        assert_eq!(result.root(dir.path()), dir.path());
        assert_eq!(result.config.function_name, "__");
    }

    #[test]
    fn test_validate_rejects_output_true() {
        let config: Config = serde_json::from_str(r#"{ "output": true }"#).unwrap();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("output"));
    }

    #[test]
    fn test_validate_rejects_bad_function_name() {
        for name in ["", "1abc", "a-b", "t.raw"] {
            let config = Config {
                function_name: name.to_string(),
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{name} should be rejected");
        }
        let config = Config {
            function_name: "$t".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_entry() {
        let config: Config = serde_json::from_str(r#"{ "entry": [] }"#).unwrap();
        assert!(config.validate().unwrap_err().to_string().contains("entry"));

        let config: Config = serde_json::from_str(r#"{ "entry": { "app": [] } }"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_with_invalid_value_fails() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&config_path, r#"{ "functionName": "not valid" }"#).unwrap();

        let result = load_config(dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_extractor_options() {
        let config = Config {
            mangle: true,
            indent: Some(4),
            ..Default::default()
        };
        let options = config.extractor_options(Path::new("/project"));
        assert!(options.mangle);
        assert_eq!(options.format.indent, Some(4));
        assert_eq!(options.root, PathBuf::from("/project"));
    }

    #[test]
    fn test_default_config_json_round_trips() {
        let json = default_config_json().unwrap();
        assert!(json.contains("functionName"));
        assert!(json.contains("trailingNewline"));
        let config: Config = serde_json::from_str(&json).unwrap();
        assert!(config.validate().is_ok());
    }
}
