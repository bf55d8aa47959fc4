//! Configuration for the `bladefn` tool.
//!
//! Settings are read from `bladefn.toml`, either given explicitly or
//! discovered in the working directory and its parents. Every key is
//! optional:
//!
//! ```toml
//! [emit]
//! target = "php"
//! context_var = "$__env"
//!
//! [directives]
//! function = "function"
//! endfunction = "endfunction"
//! return = "return"   # "" disables @return
//! ```

use crate::transpiler::codegen::{FragmentEmitter, Target};
use crate::transpiler::extract::is_identifier;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "bladefn.toml";

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub target: Option<Target>,
    pub context_var: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub emit: EmitConfig,
    pub directives: DirectivesConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Fragment output settings.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    pub target: Target,
    /// Name of the implicit context parameter. Defaults per target.
    pub context_var: Option<String>,
}

/// Names under which the function directives are registered.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DirectivesConfig {
    pub function: String,
    pub endfunction: String,
    #[serde(rename = "return")]
    pub return_name: String,
}

impl Default for DirectivesConfig {
    fn default() -> Self {
        Self {
            function: "function".to_string(),
            endfunction: "endfunction".to_string(),
            return_name: "return".to_string(),
        }
    }
}

impl DirectivesConfig {
    /// The `@return` directive name, or `None` when it is disabled.
    pub fn return_directive(&self) -> Option<&str> {
        if self.return_name.is_empty() {
            None
        } else {
            Some(&self.return_name)
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut names = vec![
            ("directives.function", self.function.as_str()),
            ("directives.endfunction", self.endfunction.as_str()),
        ];
        if let Some(name) = self.return_directive() {
            names.push(("directives.return", name));
        }

        for (field, name) in &names {
            if !is_identifier(name) {
                return Err(ConfigError::Validation(format!(
                    "{field} must be a valid directive name, got '{name}'"
                )));
            }
        }
        for (i, (field, name)) in names.iter().enumerate() {
            if let Some((other, _)) = names[i + 1..].iter().find(|(_, n)| n == name) {
                return Err(ConfigError::Validation(format!(
                    "{field} and {other} both use the name '{name}'"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from an explicit path, or discover `bladefn.toml`
    /// from the current directory upwards, falling back to defaults.
    ///
    /// CLI settings are applied last and take precedence.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let discovered = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Some(path.to_path_buf())
            }
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| Self::discover_from(&cwd)),
        };

        let mut config = match discovered {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Search for the config file in `start` and its parents.
    pub fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(target) = settings.target {
            self.emit.target = target;
        }
        if let Some(context_var) = &settings.context_var {
            self.emit.context_var = Some(context_var.clone());
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .emit
            .context_var
            .as_deref()
            .is_some_and(|var| var.trim().is_empty())
        {
            return Err(ConfigError::Validation(
                "emit.context_var cannot be empty".into(),
            ));
        }
        self.directives.validate()
    }

    /// Fragment emitter for the configured target and context variable.
    pub fn emitter(&self) -> FragmentEmitter {
        let emitter = FragmentEmitter::new(self.emit.target);
        match &self.emit.context_var {
            Some(var) => emitter.with_context_var(var.clone()),
            None => emitter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.emit.target, Target::Php);
        assert_eq!(config.directives, DirectivesConfig::default());
        assert_eq!(config.emitter().context_var(), "$__env");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.directives.function, "function");
        assert_eq!(config.directives.return_directive(), Some("return"));
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml(
            r#"
[emit]
target = "pseudo"
context_var = "env"

[directives]
function = "macro"
endfunction = "endmacro"
return = ""
"#,
        )
        .unwrap();

        assert_eq!(config.emit.target, Target::Pseudo);
        assert_eq!(config.emitter().context_var(), "env");
        assert_eq!(config.directives.function, "macro");
        assert_eq!(config.directives.return_directive(), None);
    }

    #[test]
    fn test_pseudo_target_default_context_var() {
        let config = Config::from_toml("[emit]\ntarget = \"pseudo\"\n").unwrap();
        assert_eq!(config.emitter().context_var(), "ctx");
    }

    #[test]
    fn test_unknown_target_is_parse_error() {
        let err = Config::from_toml("[emit]\ntarget = \"python\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_invalid_directive_name() {
        let err = Config::from_toml("[directives]\nfunction = \"my-func\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "got {err:?}");
        assert!(err.to_string().contains("directives.function"));
    }

    #[test]
    fn test_duplicate_directive_names() {
        let err = Config::from_toml("[directives]\nendfunction = \"function\"\n").unwrap_err();
        assert!(
            err.to_string()
                .contains("directives.function and directives.endfunction")
        );
    }

    #[test]
    fn test_empty_context_var_rejected() {
        let err = Config::from_toml("[emit]\ncontext_var = \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_explicit_missing_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = Config::load(Some(&missing), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_explicit_path_with_cli_override() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[emit]\ncontext_var = \"$env\"\n").unwrap();

        let settings = CliSettings {
            target: Some(Target::Pseudo),
            context_var: None,
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.emit.target, Target::Pseudo);
        assert_eq!(config.emitter().context_var(), "$env");
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_discover_from_parent_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("resources").join("views");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_from(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILENAME));
    }
}
