//! Loading lexicon files

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use termgraph_core::lexicon::{
    parse_states, parse_stoplist, parse_verbnet_verbs, parse_wordnet_verbs,
};
use termgraph_core::Lexicon;
use tracing::debug;

/// Read a text file, naming the file in the error
pub(crate) fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| EngineError::IoError(format!("cannot read {}: {e}", path.display())))
}

fn load(
    config: &EngineConfig,
    path: Option<&Path>,
    parse: fn(&str) -> HashSet<String>,
) -> Result<HashSet<String>> {
    let Some(path) = path else {
        return Ok(HashSet::new());
    };
    let path = config.resolve(path);
    let entries = parse(&read_text(&path)?);
    debug!("loaded {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Build the lexicon from the configured files
///
/// Unconfigured files contribute nothing. The VerbNet and WordNet verb
/// lists are merged.
pub fn load_lexicon(config: &EngineConfig) -> Result<Lexicon> {
    let files = &config.lexicons;
    let lexicon = Lexicon::new()
        .with_states(load(config, files.states.as_deref(), parse_states)?)
        .with_verbs(load(config, files.verbnet.as_deref(), parse_verbnet_verbs)?)
        .with_verbs(load(config, files.wordnet.as_deref(), parse_wordnet_verbs)?)
        .with_stoplist(load(config, files.stoplist.as_deref(), parse_stoplist)?);
    Ok(lexicon)
}
