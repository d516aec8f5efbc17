//! Co-occurrence tables over mined relations
//!
//! Every accepted pair links two elements, and each pair kind feeds two
//! directed tables. A `REL-TRM` pair between `divides` and `beam splitter`
//! counts `beam splitter` as a partner of `divides` in `rel2term` and
//! `divides` as a partner of `beam splitter` in `term2rel`.
//!
//! Tables are written one row per element:
//!
//! ```text
//!    2	divides           	beam splitter polarized light
//! ```
//!
//! giving the element's pair count before it and its most frequent partners
//! after it.

use crate::error::Result;
use crate::processor::{DocumentRelations, PairReport};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use termgraph_core::PairKind;
use tracing::debug;

/// Elements with fewer pairs are left out of written tables by default
pub const DEFAULT_MIN_COUNT: usize = 10;

/// Partners listed per row
pub const TOP_PARTNERS: usize = 10;

/// A directed co-occurrence table
///
/// Variants are declared in writing order and index [`ContextTables`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContextKind {
    /// Terms paired with each relation verb
    RelationToTerm,
    /// Relation verbs paired with each term
    TermToRelation,
    /// States paired with each relation verb
    RelationToState,
    /// Relation verbs paired with each state
    StateToRelation,
    /// States paired with each term
    TermToState,
    /// Terms paired with each state
    StateToTerm,
}

impl ContextKind {
    /// Every table, in the order they are written
    pub const ALL: [ContextKind; 6] = [
        ContextKind::RelationToTerm,
        ContextKind::TermToRelation,
        ContextKind::RelationToState,
        ContextKind::StateToRelation,
        ContextKind::TermToState,
        ContextKind::StateToTerm,
    ];

    /// Table name used in headers and file names
    pub fn name(&self) -> &'static str {
        match self {
            ContextKind::RelationToTerm => "rel2term",
            ContextKind::TermToRelation => "term2rel",
            ContextKind::RelationToState => "rel2state",
            ContextKind::StateToRelation => "state2rel",
            ContextKind::TermToState => "term2state",
            ContextKind::StateToTerm => "state2term",
        }
    }

    /// Source-to-target and target-to-source tables of a pair kind
    pub fn for_pair(kind: PairKind) -> (ContextKind, ContextKind) {
        match kind {
            PairKind::RelationTerm => (ContextKind::RelationToTerm, ContextKind::TermToRelation),
            PairKind::RelationState => {
                (ContextKind::RelationToState, ContextKind::StateToRelation)
            }
            PairKind::TermState => (ContextKind::TermToState, ContextKind::StateToTerm),
        }
    }
}

/// Row order of a written table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextOrder {
    /// Elements alphabetically
    Alphabetical,
    /// Elements by descending pair count, ties alphabetical
    ByFrequency,
}

impl ContextOrder {
    /// File name suffix
    pub fn suffix(&self) -> &'static str {
        match self {
            ContextOrder::Alphabetical => "az",
            ContextOrder::ByFrequency => "nr",
        }
    }
}

/// One row of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextRow<'a> {
    /// The element
    pub element: &'a str,
    /// Number of pairs the element took part in
    pub total: usize,
    /// Most frequent partners, most frequent first
    pub partners: Vec<&'a str>,
}

/// Partner counts per element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextTable {
    entries: HashMap<String, HashMap<String, usize>>,
}

impl ContextTable {
    /// Count one pairing of `element` with `partner`
    pub fn add(&mut self, element: &str, partner: &str) {
        *self
            .entries
            .entry(element.to_string())
            .or_default()
            .entry(partner.to_string())
            .or_insert(0) += 1;
    }

    /// Number of distinct elements
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was counted
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs an element took part in
    pub fn total(&self, element: &str) -> usize {
        self.entries
            .get(element)
            .map_or(0, |partners| partners.values().sum())
    }

    /// Partners of an element by descending count, ties alphabetical
    pub fn partners(&self, element: &str) -> Vec<(&str, usize)> {
        let Some(partners) = self.entries.get(element) else {
            return Vec::new();
        };
        let mut ranked: Vec<(&str, usize)> =
            partners.iter().map(|(p, &c)| (p.as_str(), c)).collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        ranked
    }

    /// Rows of elements with at least `min_count` pairs
    pub fn rows(&self, order: ContextOrder, min_count: usize) -> Vec<ContextRow<'_>> {
        let mut rows: Vec<ContextRow<'_>> = self
            .entries
            .keys()
            .map(|element| ContextRow {
                element,
                total: self.total(element),
                partners: self
                    .partners(element)
                    .into_iter()
                    .take(TOP_PARTNERS)
                    .map(|(p, _)| p)
                    .collect(),
            })
            .filter(|row| row.total >= min_count)
            .collect();
        rows.sort_unstable_by(|a, b| a.element.cmp(b.element));
        if order == ContextOrder::ByFrequency {
            rows.sort_by(|a, b| b.total.cmp(&a.total));
        }
        rows
    }

    fn merge(&mut self, other: ContextTable) {
        for (element, partners) in other.entries {
            let mine = self.entries.entry(element).or_default();
            for (partner, count) in partners {
                *mine.entry(partner).or_insert(0) += count;
            }
        }
    }
}

/// The six co-occurrence tables of a corpus
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextTables {
    tables: [ContextTable; 6],
}

impl ContextTables {
    /// Create empty tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Count both directions of a pair, case-insensitively
    pub fn add_pair(&mut self, pair: &PairReport) {
        let source = pair.source_text.to_lowercase();
        let target = pair.target_text.to_lowercase();
        let (forward, backward) = ContextKind::for_pair(pair.kind);
        self.table_mut(forward).add(&source, &target);
        self.table_mut(backward).add(&target, &source);
    }

    /// Count every pair of a document
    pub fn add_document(&mut self, document: &DocumentRelations) {
        for pair in document.sentences.iter().flat_map(|s| &s.pairs) {
            self.add_pair(pair);
        }
    }

    /// Merge other tables into these
    pub fn merge(&mut self, other: ContextTables) {
        for (mine, theirs) in self.tables.iter_mut().zip(other.tables) {
            mine.merge(theirs);
        }
    }

    /// One table
    pub fn table(&self, kind: ContextKind) -> &ContextTable {
        &self.tables[kind as usize]
    }

    fn table_mut(&mut self, kind: ContextKind) -> &mut ContextTable {
        &mut self.tables[kind as usize]
    }

    /// Write one table with a `DICTIONARY` header
    pub fn write_table<W: Write>(
        &self,
        kind: ContextKind,
        order: ContextOrder,
        min_count: usize,
        out: &mut W,
    ) -> Result<()> {
        let table = self.table(kind);
        writeln!(out)?;
        writeln!(out, "DICTIONARY {} with {} elements", kind.name(), table.len())?;
        writeln!(out)?;
        for row in table.rows(order, min_count) {
            writeln!(
                out,
                "{:>4}\t{:<18}\t{}",
                row.total,
                row.element,
                row.partners.join(" ")
            )?;
        }
        Ok(())
    }

    /// Write all twelve `context-<table>-<az|nr>.txt` files into `dir`
    pub fn write_dir(&self, dir: &Path, min_count: usize) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(ContextKind::ALL.len() * 2);
        for kind in ContextKind::ALL {
            for order in [ContextOrder::Alphabetical, ContextOrder::ByFrequency] {
                let path = dir.join(format!("context-{}-{}.txt", kind.name(), order.suffix()));
                let mut out = BufWriter::new(File::create(&path)?);
                self.write_table(kind, order, min_count, &mut out)?;
                out.flush()?;
                written.push(path);
            }
        }
        debug!("wrote {} context tables to {}", written.len(), dir.display());
        Ok(written)
    }
}

impl<'a> FromIterator<&'a DocumentRelations> for ContextTables {
    fn from_iter<I: IntoIterator<Item = &'a DocumentRelations>>(iter: I) -> Self {
        let mut tables = ContextTables::new();
        for document in iter {
            tables.add_document(document);
        }
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(kind: PairKind, source: &str, target: &str) -> PairReport {
        PairReport {
            kind,
            source_id: "t1".to_string(),
            target_id: "t2".to_string(),
            source_text: source.to_string(),
            target_text: target.to_string(),
            labels: vec!["dobj".to_string()],
            path: String::new(),
        }
    }

    fn sample() -> ContextTables {
        let mut tables = ContextTables::new();
        for (source, target) in [
            ("emits", "Laser Beam"),
            ("emits", "laser beam"),
            ("emits", "photon"),
            ("absorbs", "photon"),
        ] {
            tables.add_pair(&pair(PairKind::RelationTerm, source, target));
        }
        tables.add_pair(&pair(PairKind::TermState, "photon", "polarized"));
        tables
    }

    #[test]
    fn test_pairs_fill_both_directions() {
        let tables = sample();
        let rel2term = tables.table(ContextKind::RelationToTerm);
        assert_eq!(rel2term.total("emits"), 3);
        assert_eq!(rel2term.partners("emits"), vec![("laser beam", 2), ("photon", 1)]);

        let term2rel = tables.table(ContextKind::TermToRelation);
        assert_eq!(term2rel.partners("photon"), vec![("absorbs", 1), ("emits", 1)]);
        assert_eq!(tables.table(ContextKind::StateToTerm).total("polarized"), 1);
        assert!(tables.table(ContextKind::RelationToState).is_empty());
    }

    #[test]
    fn test_row_orders_and_minimum() {
        let tables = sample();
        let term2rel = tables.table(ContextKind::TermToRelation);

        let az: Vec<&str> = term2rel
            .rows(ContextOrder::Alphabetical, 1)
            .iter()
            .map(|r| r.element)
            .collect();
        assert_eq!(az, vec!["laser beam", "photon"]);

        let nr = term2rel.rows(ContextOrder::ByFrequency, 1);
        assert_eq!(nr[0].element, "laser beam");
        assert_eq!(nr[0].total, 2);
        assert_eq!(nr[1].partners, vec!["absorbs", "emits"]);

        assert_eq!(term2rel.rows(ContextOrder::ByFrequency, 3).len(), 0);
    }

    #[test]
    fn test_partners_are_capped() {
        let mut table = ContextTable::default();
        for i in 0..(TOP_PARTNERS + 5) {
            table.add("light", &format!("term{i:02}"));
        }
        let rows = table.rows(ContextOrder::Alphabetical, 1);
        assert_eq!(rows[0].total, TOP_PARTNERS + 5);
        assert_eq!(rows[0].partners.len(), TOP_PARTNERS);
        assert_eq!(rows[0].partners[0], "term00");
    }

    #[test]
    fn test_write_table_format() {
        let mut out = Vec::new();
        sample()
            .write_table(ContextKind::RelationToTerm, ContextOrder::ByFrequency, 2, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "\nDICTIONARY rel2term with 2 elements\n\n   3\temits             \tlaser beam photon\n"
        );
    }

    #[test]
    fn test_merge_adds_counts() {
        let mut tables = sample();
        tables.merge(sample());
        assert_eq!(tables.table(ContextKind::RelationToTerm).total("emits"), 6);
        assert_eq!(
            tables.table(ContextKind::TermToState).partners("photon"),
            vec![("polarized", 2)]
        );
    }

    #[test]
    fn test_write_dir_creates_twelve_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let written = sample().write_dir(&dir.path().join("context"), 1).unwrap();
        assert_eq!(written.len(), 12);
        let state2term =
            fs::read_to_string(dir.path().join("context/context-state2term-nr.txt")).unwrap();
        assert!(state2term.contains("polarized"));
        assert!(state2term.ends_with("\tphoton\n"));
    }
}
