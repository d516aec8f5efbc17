//! State and change-of-state verb lexicons
//!
//! The parsers take already-read text; loading files is left to the caller.

use crate::annotation::{Annotation, AnnotationKind};
use crate::ids::IdentifierAllocator;
use std::collections::HashSet;

/// Characters skipped at the start of a WordNet trigger line
const WORDNET_PREFIX: usize = 9;

/// State words: the first tab-separated field of each line
pub fn parse_states(text: &str) -> HashSet<String> {
    text.lines()
        .filter_map(|line| line.trim_end().split('\t').next())
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// VerbNet change-of-state verbs: the space separated second field
pub fn parse_verbnet_verbs(text: &str) -> HashSet<String> {
    text.lines()
        .filter_map(|line| line.trim_end().split('\t').nth(1))
        .flat_map(str::split_whitespace)
        .map(str::to_string)
        .collect()
}

/// WordNet state-change triggers
///
/// Only lines starting with `*` count. After a fixed-width prefix the line
/// holds a comma separated verb list, optionally followed by a gloss in
/// parentheses. Multi-word entries are dropped.
pub fn parse_wordnet_verbs(text: &str) -> HashSet<String> {
    text.lines()
        .filter(|line| line.starts_with('*'))
        .flat_map(|line| {
            let line: String = line.trim().chars().skip(WORDNET_PREFIX).collect();
            let list = match line.find('(') {
                Some(idx) => line[..idx].trim().to_string(),
                None => line,
            };
            list.split(',')
                .map(|verb| verb.trim().to_string())
                .filter(|verb| !verb.is_empty() && !verb.contains(' '))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Stopped terms: `label<TAB>frequency<TAB>term` lines labelled `-`, lower-cased
///
/// Blank lines, `#` comments and malformed lines are skipped.
pub fn parse_stoplist(text: &str) -> HashSet<String> {
    text.lines()
        .map(|line| line.trim_matches(|c| c == '\n' || c == ' '))
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let mut fields = line.split('\t');
            match (fields.next(), fields.next(), fields.next(), fields.next()) {
                (Some(label), Some(_), Some(term), None) if label.trim() == "-" => {
                    Some(term.to_lowercase())
                }
                _ => None,
            }
        })
        .collect()
}

/// Token annotations derived from the lexicons
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedTokens {
    /// State annotations, one per matching token
    pub states: Vec<Annotation>,
    /// Relation annotations, one per matching verb token
    pub relations: Vec<Annotation>,
}

/// State words, change-of-state verbs and stopped terms
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    /// State words, compared with lower-cased token text
    pub states: HashSet<String>,
    /// Verb lemmas
    pub verbs: HashSet<String>,
    /// Lower-cased terms to ignore
    pub stoplist: HashSet<String>,
}

impl Lexicon {
    /// Create an empty lexicon
    pub fn new() -> Self {
        Self::default()
    }

    /// Add state words
    pub fn with_states(mut self, states: HashSet<String>) -> Self {
        self.states.extend(states);
        self
    }

    /// Add verb lemmas
    pub fn with_verbs(mut self, verbs: HashSet<String>) -> Self {
        self.verbs.extend(verbs);
        self
    }

    /// Add stopped terms
    pub fn with_stoplist(mut self, stoplist: HashSet<String>) -> Self {
        self.stoplist.extend(stoplist);
        self
    }

    /// Whether the term is stopped
    pub fn is_stopped(&self, term: &str) -> bool {
        self.stoplist.contains(&term.to_lowercase())
    }

    /// Tag tokens as states and relations
    ///
    /// A token is a state when its lower-cased word is a state word, and a
    /// relation when its tag starts with `V` and its lemma is a known verb.
    /// Tokens without a lemma use the lower-cased word. One token can be
    /// both. New ids come from `ids` with the `state` and `rel` prefixes.
    pub fn tag_tokens(&self, tokens: &[Annotation], ids: &mut IdentifierAllocator) -> TaggedTokens {
        let mut tagged = TaggedTokens::default();
        for token in tokens.iter().filter(|t| t.kind == AnnotationKind::Token) {
            let word = token.surface();
            let lower = word.to_lowercase();
            if self.states.contains(&lower) {
                tagged.states.push(
                    Annotation::new(ids.next_id("state"), AnnotationKind::State, token.start, token.end)
                        .with_text(word),
                );
            }
            let lemma = token.lemma().map_or_else(|| lower.clone(), str::to_string);
            if token.pos().starts_with('V') && self.verbs.contains(&lemma) {
                tagged.relations.push(
                    Annotation::new(
                        ids.next_id("rel"),
                        AnnotationKind::Relation,
                        token.start,
                        token.end,
                    )
                    .with_text(lower),
                );
            }
        }
        tagged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_states() {
        let states = parse_states("temperature\tnoun\npressure\n\n");
        assert_eq!(states.len(), 2);
        assert!(states.contains("temperature"));
    }

    #[test]
    fn test_parse_verbnet() {
        let verbs = parse_verbnet_verbs("break-45.1\tbreak crack shatter\nother-1\n");
        assert_eq!(verbs.len(), 3);
        assert!(verbs.contains("crack"));
    }

    #[test]
    fn test_parse_wordnet() {
        let text = "* 0126264 alter, change, modify (cause to change)\n\
                    not a trigger\n\
                    * 0140123 heat up, warm, cool\n";
        let verbs = parse_wordnet_verbs(text);
        let mut sorted: Vec<_> = verbs.into_iter().collect();
        sorted.sort();
        assert_eq!(sorted, vec!["alter", "change", "cool", "modify", "warm"]);
    }

    #[test]
    fn test_parse_stoplist() {
        let text = "# stoplist\n-\t120\tpresent invention\n+\t80\tlaser\n-\t9\n\n-\t50\tsystem\n";
        let stoplist = parse_stoplist(text);
        assert_eq!(stoplist.len(), 2);
        assert!(stoplist.contains("present invention"));
        assert!(!stoplist.contains("laser"));
    }

    #[test]
    fn test_tag_tokens() {
        let lexicon = Lexicon::new()
            .with_states(parse_states("temperature\n"))
            .with_verbs(parse_verbnet_verbs("x\tincrease heat\n"));
        let tokens = vec![
            Annotation::token("t1", 0, 11, "Temperature", "NN"),
            Annotation::token("t2", 12, 21, "increases", "VBZ").with_feature("lemma", "increase"),
            Annotation::token("t3", 22, 26, "heat", "NN"),
            Annotation::token("t4", 27, 32, "Heats", "VBZ"),
        ];
        let mut ids = IdentifierAllocator::new();
        let tagged = lexicon.tag_tokens(&tokens, &mut ids);
        assert_eq!(tagged.states.len(), 1);
        assert_eq!(tagged.states[0].id, "state1");
        assert_eq!(tagged.states[0].text, "Temperature");
        let rels: Vec<(&str, &str)> = tagged
            .relations
            .iter()
            .map(|r| (r.id.as_str(), r.text.as_str()))
            .collect();
        // "heat" is a noun here and "Heats" has no lemma
        assert_eq!(rels, vec![("rel1", "increases")]);
    }

    #[test]
    fn test_stoplist_is_case_insensitive() {
        let lexicon = Lexicon::new().with_stoplist(parse_stoplist("-\t3\tsystem\n"));
        assert!(lexicon.is_stopped("System"));
        assert!(!lexicon.is_stopped("laser"));
    }
}
