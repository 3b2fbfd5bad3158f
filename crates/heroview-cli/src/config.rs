// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use heroview_api::DEFAULT_SOURCE_URL;
use heroview_app::{DEFAULT_PAGE_SIZE, PageSize, default_page_size_options};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub const APP_NAME: &str = "heroview";
const CONFIG_VERSION: i64 = 1;
const CONFIG_PATH_ENV: &str = "HEROVIEW_CONFIG_PATH";
const SOURCE_URL_ENV: &str = "HEROVIEW_SOURCE_URL";
const DEFAULT_TIMEOUT: &str = "10s";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub view: View,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            source: Source::default(),
            view: View::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Source {
    pub url: Option<String>,
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct View {
    pub page_size: Option<PageSizeValue>,
    pub page_size_options: Option<Vec<PageSizeValue>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

/// A page size as written in TOML: a row count or `"all"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PageSizeValue {
    Rows(i64),
    Named(String),
}

impl PageSizeValue {
    fn resolve(&self) -> Result<PageSize> {
        match self {
            Self::Rows(rows) => usize::try_from(*rows)
                .ok()
                .and_then(PageSize::rows)
                .ok_or_else(|| anyhow!("page size must be positive, got {rows}")),
            Self::Named(name) => PageSize::parse(name),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [source], [view], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(url) = &self.source.url
            && url.trim().is_empty()
        {
            bail!(
                "source.url in {} must not be empty; remove it to use the default",
                path.display()
            );
        }

        if let Some(timeout) = &self.source.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "source.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        let options = self
            .page_size_options()
            .with_context(|| format!("invalid view.page_size_options in {}", path.display()))?;
        if options.is_empty() {
            bail!(
                "view.page_size_options in {} must list at least one size",
                path.display()
            );
        }
        let page_size = self
            .page_size()
            .with_context(|| format!("invalid view.page_size in {}", path.display()))?;
        if !options.contains(&page_size) {
            bail!(
                "view.page_size {} in {} is not one of view.page_size_options",
                page_size,
                path.display()
            );
        }

        EnvFilter::try_new(self.log_level()).with_context(|| {
            format!(
                "log.level {:?} in {} is not a valid filter directive",
                self.log_level(),
                path.display()
            )
        })?;

        Ok(())
    }

    /// `HEROVIEW_SOURCE_URL` wins over `[source].url`.
    pub fn source_url(&self) -> String {
        if let Ok(url) = env::var(SOURCE_URL_ENV)
            && !url.trim().is_empty()
        {
            return url;
        }
        self.source
            .url
            .clone()
            .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_owned())
    }

    pub fn source_timeout(&self) -> Result<Duration> {
        parse_duration(self.source.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn page_size(&self) -> Result<PageSize> {
        match &self.view.page_size {
            Some(value) => value.resolve(),
            None => Ok(DEFAULT_PAGE_SIZE),
        }
    }

    pub fn page_size_options(&self) -> Result<Vec<PageSize>> {
        match &self.view.page_size_options {
            Some(values) => values.iter().map(PageSizeValue::resolve).collect(),
            None => Ok(default_page_size_options()),
        }
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        if let Some(file) = &self.log.file {
            return Ok(PathBuf::from(file));
        }
        let data_root = dirs::data_local_dir()
            .ok_or_else(|| anyhow!("cannot resolve data directory; set [log].file"))?;
        Ok(data_root.join(APP_NAME).join(format!("{APP_NAME}.log")))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# heroview config\n# Place this file at: {}\n\nversion = 1\n\n[source]\n# Overridden by {SOURCE_URL_ENV} when set\nurl = \"{DEFAULT_SOURCE_URL}\"\n# <N>ms, <N>s or <N>m\ntimeout = \"{DEFAULT_TIMEOUT}\"\n\n[view]\npage_size = 20\npage_size_options = [10, 20, 50, 100, \"all\"]\n\n[log]\n# tracing filter directive; HEROVIEW_LOG takes precedence\nlevel = \"{DEFAULT_LOG_LEVEL}\"\n# Optional. Default is the platform data dir (for example ~/.local/share/heroview/heroview.log)\n# file = \"/absolute/path/to/heroview.log\"\n",
            path.display(),
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    let (digits, unit): (&str, fn(u64) -> Duration) = if let Some(value) = raw.strip_suffix("ms")
    {
        (value, Duration::from_millis)
    } else if let Some(value) = raw.strip_suffix('s') {
        (value, Duration::from_secs)
    } else if let Some(value) = raw.strip_suffix('m') {
        (value, |mins| Duration::from_secs(mins.saturating_mul(60)))
    } else {
        bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 10s)")
    };

    let amount: u64 = digits
        .trim()
        .parse()
        .with_context(|| format!("invalid timeout duration {raw:?}"))?;
    Ok(unit(amount))
}
