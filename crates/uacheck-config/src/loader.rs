// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Reading a [`CheckConfig`] from disk.
//!
//! A file goes through these steps, in order:
//!
//! 1. pick YAML, TOML or JSON from the extension;
//! 2. expand `${VAR}` and `${VAR:default}` placeholders;
//! 3. deserialize;
//! 4. apply `UACHECK_*` overrides;
//! 5. make `output.dump` and `server.pki_dir` absolute, relative to the file;
//! 6. validate.
//!
//! Recognised overrides (the prefix can be changed with
//! [`ConfigLoader::with_env_prefix`]):
//!
//! ```text
//! UACHECK_ENDPOINT=opc.tcp://plc:4840
//! UACHECK_PROFILE=lenient
//! UACHECK_MAX_NODES=500
//! UACHECK_MAX_DEPTH=3
//! UACHECK_DUMP=/tmp/dump.txt
//! UACHECK_LOG_LEVEL=debug
//! UACHECK_LOG_FORMAT=json
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult, INLINE_SOURCE};
use crate::schema::{CheckConfig, LogFormat, LogLevel};

/// Loads configuration files.
///
/// ```no_run
/// use uacheck_config::loader::ConfigLoader;
///
/// let config = ConfigLoader::new().load("uacheck.yaml")?;
/// # Ok::<(), uacheck_config::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    env_prefix: String,
    use_env: bool,
}

impl ConfigLoader {
    /// Loader reading `UACHECK_*` overrides.
    pub fn new() -> Self {
        Self {
            env_prefix: "UACHECK".to_string(),
            use_env: true,
        }
    }

    /// Reads `<prefix>_*` overrides instead.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Turns placeholder expansion and overrides on or off.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.use_env = enabled;
        self
    }

    /// Loads and validates the file at `path`.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<CheckConfig> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading configuration");

        let format = ConfigFormat::from_path(path)?;
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;

        let mut config = self.parse(&content, format, path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        make_paths_absolute(&mut config, base);
        config.validate()?;

        debug!(
            endpoint = %config.server.endpoint,
            start_nodes = config.validation.start_nodes.len(),
            profile = %config.validation.profile,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Loads and validates a document held in memory.
    ///
    /// Relative paths are kept as they are.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<CheckConfig> {
        let config = self.parse(content, format, Path::new(INLINE_SOURCE))?;
        config.validate()?;
        Ok(config)
    }

    fn parse(&self, content: &str, format: ConfigFormat, origin: &Path) -> ConfigResult<CheckConfig> {
        if !self.use_env {
            return format
                .deserialize(content)
                .map_err(|message| ConfigError::parse(origin, message));
        }

        let expanded = self.resolve_env_placeholders(content)?;
        let mut config: CheckConfig = format
            .deserialize(&expanded)
            .map_err(|message| ConfigError::parse(origin, message))?;
        self.apply_overrides_from(&mut config, |name| env::var(name).ok())?;
        Ok(config)
    }

    /// Expands `${VAR}` and `${VAR:default}` from the process environment.
    ///
    /// An unset variable without a default, and an unterminated `${`, are
    /// copied through unchanged.
    pub fn resolve_env_placeholders(&self, content: &str) -> ConfigResult<String> {
        let mut out = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                out.push_str(&rest[start..]);
                return Ok(out);
            };

            let inner = &after[..end];
            let (name, default) = match inner.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (inner, None),
            };
            match (env::var(name), default) {
                (Ok(value), _) => out.push_str(&value),
                (Err(_), Some(default)) => out.push_str(default),
                (Err(_), None) => {
                    warn!(variable = name, "Placeholder refers to an unset variable");
                    out.push_str(&rest[start..start + end + 3]);
                }
            }
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        Ok(out)
    }

    /// Applies `<prefix>_*` overrides, reading variables through `lookup`.
    pub fn apply_overrides_from<F>(&self, config: &mut CheckConfig, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let name = |suffix: &str| format!("{}_{}", self.env_prefix, suffix);
        let get = |suffix: &str| lookup(&name(suffix));

        if let Some(endpoint) = get("ENDPOINT") {
            config.server.endpoint = endpoint;
        }
        if let Some(profile) = get("PROFILE") {
            config.validation.profile = profile
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(name("PROFILE"), "expected strict or lenient"))?;
        }
        if let Some(max_nodes) = get("MAX_NODES") {
            config.validation.max_nodes = max_nodes
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(name("MAX_NODES"), "expected an integer"))?;
        }
        if let Some(max_depth) = get("MAX_DEPTH") {
            config.validation.max_depth = max_depth
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(name("MAX_DEPTH"), "expected an integer"))?;
        }
        if let Some(dump) = get("DUMP") {
            config.output.dump = Some(PathBuf::from(dump));
        }
        if let Some(level) = get("LOG_LEVEL") {
            match LogLevel::parse(&level) {
                Some(level) => config.logging.level = level,
                None => warn!(level = %level, "Ignoring unknown log level"),
            }
        }
        if let Some(format) = get("LOG_FORMAT") {
            config.logging.format = LogFormat::parse(&format).ok_or_else(|| {
                ConfigError::invalid_env_var(name("LOG_FORMAT"), "expected text, compact or json")
            })?;
        }
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn make_paths_absolute(config: &mut CheckConfig, base: &Path) {
    if let Some(dump) = config.output.dump.as_mut().filter(|p| p.is_relative()) {
        *dump = base.join(&*dump);
    }
    if let Some(pki_dir) = config.server.pki_dir.as_mut() {
        if Path::new(pki_dir.as_str()).is_relative() {
            *pki_dir = base.join(pki_dir.as_str()).to_string_lossy().into_owned();
        }
    }
}

/// Configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` or `.yml`, read through the `config` crate.
    Yaml,
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Picks the format from the extension of `path`, ignoring case.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| ConfigError::unsupported_format("(no extension)"))?;

        match ext.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::unsupported_format(ext)),
        }
    }

    fn deserialize<T: DeserializeOwned>(self, content: &str) -> Result<T, String> {
        match self {
            Self::Yaml => config::Config::builder()
                .add_source(config::File::from_str(content, config::FileFormat::Yaml))
                .build()
                .and_then(|c| c.try_deserialize())
                .map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Loads `path` with a default [`ConfigLoader`].
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<CheckConfig> {
    ConfigLoader::new().load(path)
}

/// Parses `content` with a default [`ConfigLoader`].
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<CheckConfig> {
    ConfigLoader::new().load_from_str(content, format)
}
