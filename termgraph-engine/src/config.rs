//! Configuration types for the engine
//!
//! Every field has a default, so an empty TOML file is a valid
//! configuration. Relative paths resolve against the directory of the
//! configuration file they were read from.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use termgraph_core::{RelationPolicy, TermPattern};

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// View ids read and written by the engine
    #[serde(default)]
    pub views: ViewConfig,

    /// Term pattern source
    #[serde(default)]
    pub matcher: MatcherConfig,

    /// Path length limits for relation pairs
    #[serde(default)]
    pub relations: RelationPolicy,

    /// Lexicon files
    #[serde(default)]
    pub lexicons: LexiconConfig,

    /// Technology classification
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Output options
    #[serde(default)]
    pub output: OutputConfig,

    /// Batch execution
    #[serde(default)]
    pub performance: PerformanceConfig,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// View ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Tokens and sentences
    pub tokens: String,
    /// Noun chunks
    pub chunks: String,
    /// Dependency edges
    pub dependencies: String,
    /// Terms, written by term extraction
    pub terms: String,
    /// Technologies, written by classification
    pub technologies: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            tokens: "tokens".to_string(),
            chunks: "chunks".to_string(),
            dependencies: "dependencies".to_string(),
            terms: "terms".to_string(),
            technologies: "technologies".to_string(),
        }
    }
}

/// Term pattern source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Pattern file, the built-in pattern when unset
    pub pattern: Option<PathBuf>,
}

/// Lexicon files, each optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    /// Tab-separated lines, the state word in the first field
    pub states: Option<PathBuf>,
    /// Tab-separated lines, a space separated verb list in the second field
    pub verbnet: Option<PathBuf>,
    /// Trigger lines starting with `*`, holding a comma separated verb list
    pub wordnet: Option<PathBuf>,
    /// `label<TAB>frequency<TAB>term` lines, terms labelled `-` are stopped
    pub stoplist: Option<PathBuf>,
}

/// Technology classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Classify terms when extracting them
    pub enabled: bool,
    /// Lists of known technologies, one term per line
    pub technologies: Vec<PathBuf>,
    /// Labelled lists, `label<TAB>freq<TAB>term`
    pub labels: Vec<PathBuf>,
}

/// Output options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Write feature vectors onto term annotations
    pub vectors: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            vectors: true,
        }
    }
}

/// Batch execution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Worker threads, 0 uses every core
    pub threads: usize,
    /// Process documents one at a time
    pub sequential: bool,
}

impl EngineConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&text)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Configuration for classifying terms against lists
    pub fn with_classifier(mut self, technologies: Vec<PathBuf>, labels: Vec<PathBuf>) -> Self {
        self.classifier = ClassifierConfig {
            enabled: true,
            technologies,
            labels,
        };
        self
    }

    /// Configuration running batches on a single thread
    pub fn sequential() -> Self {
        Self {
            performance: PerformanceConfig {
                threads: 1,
                sequential: true,
            },
            ..Self::default()
        }
    }

    /// Check the configuration for consistency
    pub fn validate(&self) -> Result<()> {
        let views = [
            &self.views.tokens,
            &self.views.chunks,
            &self.views.dependencies,
            &self.views.terms,
            &self.views.technologies,
        ];
        if views.iter().any(|id| id.trim().is_empty()) {
            return Err(EngineError::ConfigError("view ids cannot be empty".into()));
        }
        if self.views.terms == self.views.technologies {
            return Err(EngineError::ConfigError(
                "terms and technologies need separate views".into(),
            ));
        }
        let policy = &self.relations;
        if policy.min_term_state_distance > policy.max_term_state_distance {
            return Err(EngineError::ConfigError(format!(
                "min_term_state_distance {} exceeds max_term_state_distance {}",
                policy.min_term_state_distance, policy.max_term_state_distance
            )));
        }
        Ok(())
    }

    /// Resolve a configured path against the configuration directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// The configured term pattern
    pub fn term_pattern(&self) -> Result<TermPattern> {
        match &self.matcher.pattern {
            Some(path) => Ok(TermPattern::from_file(&self.resolve(path))?),
            None => Ok(TermPattern::builtin()?.clone()),
        }
    }
}
