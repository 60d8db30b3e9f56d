//! Configuration management and loading for treetrace.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use treetrace_error::{ErrorCategory, Result, TreeError, config_error};
use treetrace_logging::LoggingConfig;

/// Configuration file formats supported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Json,
    #[default]
    Yaml,
}

impl ConfigFormat {
    /// Detect format from a file extension; anything unknown is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Which balanced tree a session drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TreeKind {
    #[default]
    Avl,
    RedBlack,
}

impl TreeKind {
    pub const ALL: [TreeKind; 2] = [TreeKind::Avl, TreeKind::RedBlack];

    pub fn as_str(self) -> &'static str {
        match self {
            TreeKind::Avl => "avl",
            TreeKind::RedBlack => "red-black",
        }
    }

    /// Logging component name for this kind.
    pub fn component(self) -> &'static str {
        match self {
            TreeKind::Avl => "avl",
            TreeKind::RedBlack => "rbtree",
        }
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TreeKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "avl" => Ok(TreeKind::Avl),
            "red-black" | "redblack" | "rb" | "rbtree" => Ok(TreeKind::RedBlack),
            other => Err(format!("unknown tree kind: {other}")),
        }
    }
}

/// How traces are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Jsonl,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "jsonl" => Ok(OutputFormat::Jsonl),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Main treetrace session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Tree variant to build
    #[serde(default)]
    pub tree: TreeKind,

    /// Keys inserted when the session starts
    #[serde(default)]
    pub keys: Vec<i64>,

    /// Validate invariants after every insertion
    #[serde(default = "default_true")]
    pub verify: bool,

    /// Trace output format
    #[serde(default)]
    pub output: OutputFormat,

    /// Only render the last step of each trace
    #[serde(default)]
    pub final_only: bool,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tree: TreeKind::default(),
            keys: Vec::new(),
            verify: true,
            output: OutputFormat::default(),
            final_only: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn for_tree(tree: TreeKind) -> Self {
        Self {
            tree,
            ..Self::default()
        }
    }
}

/// Check values that decode fine but cannot drive a session.
///
/// Every `logging.component_levels` key must name a tree component
/// (`avl` or `rbtree`); anything else would silently never match.
pub fn validate_config(config: &SessionConfig) -> Result<()> {
    let mut components: Vec<&String> = config.logging.component_levels.keys().collect();
    components.sort();
    for component in components {
        if !TreeKind::ALL.iter().any(|kind| kind.component() == component) {
            return Err(config_error("unknown logging component")
                .with_context("component", component)
                .with_context("expected", "avl, rbtree"));
        }
    }
    Ok(())
}

/// Load configuration from a file
pub fn load_config(path: impl AsRef<Path>) -> Result<SessionConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .map_err(|e| TreeError::from(e).with_context("path", path.display()))?;

    let config: SessionConfig = match ConfigFormat::from_path(path) {
        ConfigFormat::Json => serde_json::from_str(&contents).map_err(|e| {
            TreeError::with_source("parse JSON config", ErrorCategory::Parse, Box::new(e))
                .with_context("path", path.display())
        })?,
        ConfigFormat::Yaml => serde_yaml::from_str(&contents).map_err(|e| {
            TreeError::with_source("parse YAML config", ErrorCategory::Parse, Box::new(e))
                .with_context("path", path.display())
        })?,
    };

    validate_config(&config).map_err(|e| e.with_context("path", path.display()))?;
    Ok(config)
}

/// Save configuration to a file
pub fn save_config(config: &SessionConfig, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let contents = match ConfigFormat::from_path(path) {
        ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| {
            TreeError::with_source("serialize JSON config", ErrorCategory::Config, Box::new(e))
        })?,
        ConfigFormat::Yaml => serde_yaml::to_string(config).map_err(|e| {
            TreeError::with_source("serialize YAML config", ErrorCategory::Config, Box::new(e))
        })?,
    };

    std::fs::write(path, contents)
        .map_err(|e| TreeError::from(e).with_context("path", path.display()))?;
    Ok(())
}
