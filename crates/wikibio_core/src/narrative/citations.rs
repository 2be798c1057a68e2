//! Citation registry and sources-section rendering.
//!
//! # Responsibility
//! - Assign hierarchical citation labels (`<source ordinal><alpha>`).
//! - Keep the per-generation ledger of cited sources and citations.
//! - Render the sources section from that ledger.
//!
//! # Invariants
//! - Source ordinals are 1-based and follow first-encounter order.
//! - Re-registering a citation returns its original label.
//! - Alpha suffixes are bijective base-26: a..z, aa, ab, .., az, ba, ..
//! - One registry lives for exactly one biography generation.

use super::error::BioResult;
use super::markup::{note_paragraph, PRIVATE_PLACEHOLDER};
use crate::model::citation::Source;
use crate::model::date::DateDisplayer;
use crate::model::handle::Handle;
use crate::repo::tree_db::TreeDatabase;
use log::debug;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// Footnote label of one citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CitationLabel {
    /// 1-based source ordinal.
    pub source_ordinal: usize,
    /// 0-based position of the citation under its source.
    pub citation_index: usize,
}

impl CitationLabel {
    /// Superscript footnote marker, e.g. `<sup>[2b]</sup>`.
    pub fn marker(&self) -> String {
        format!("<sup>[{self}]</sup>")
    }
}

impl Display for CitationLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}",
            self.source_ordinal,
            alpha_suffix(self.citation_index)
        )
    }
}

/// Bijective base-26 lower-alpha numbering of a 0-based index.
pub fn alpha_suffix(index: usize) -> String {
    let mut remaining = index + 1;
    let mut letters = Vec::new();
    while remaining > 0 {
        remaining -= 1;
        letters.push(char::from(b'a' + (remaining % 26) as u8));
        remaining /= 26;
    }
    letters.iter().rev().collect()
}

/// Ledger entry for one cited source.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    pub ordinal: usize,
    pub source: Source,
    /// Distinct citation handles, in first-registration order.
    pub citations: Vec<Handle>,
}

#[derive(Debug, Default)]
pub struct CitationRegistry {
    entries: Vec<SourceEntry>,
    by_source: HashMap<Handle, usize>,
}

impl CitationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `citation` under `source` and returns its label.
    pub fn register(&mut self, citation: &Handle, source: &Source) -> CitationLabel {
        let slot = match self.by_source.get(&source.handle) {
            Some(slot) => *slot,
            None => {
                let slot = self.entries.len();
                self.entries.push(SourceEntry {
                    ordinal: slot + 1,
                    source: source.clone(),
                    citations: Vec::new(),
                });
                self.by_source.insert(source.handle.clone(), slot);
                slot
            }
        };

        let entry = &mut self.entries[slot];
        let citation_index = match entry.citations.iter().position(|known| known == citation) {
            Some(index) => index,
            None => {
                entry.citations.push(citation.clone());
                entry.citations.len() - 1
            }
        };

        CitationLabel {
            source_ordinal: entry.ordinal,
            citation_index,
        }
    }

    /// Resolves and registers every citation, returning the footnote markers.
    ///
    /// Returns `""` when nothing was cited, otherwise one leading space and
    /// the concatenated markers. Missing citations or sources are skipped.
    pub fn cite<D: TreeDatabase + ?Sized>(
        &mut self,
        db: &D,
        citations: &[Handle],
    ) -> BioResult<String> {
        let mut markers = String::new();
        for handle in citations {
            let Some(citation) = db.citation(handle)? else {
                debug!("event=missing_reference module=citations class=citation handle={handle}");
                continue;
            };
            let Some(source) = db.source(&citation.source)? else {
                debug!(
                    "event=missing_reference module=citations class=source handle={}",
                    citation.source
                );
                continue;
            };
            markers.push_str(&self.register(handle, &source).marker());
        }

        if markers.is_empty() {
            return Ok(markers);
        }
        Ok(format!(" {markers}"))
    }

    /// Ledger entries in source ordinal order.
    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    pub fn source_count(&self) -> usize {
        self.entries.len()
    }

    pub fn citation_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.citations.len()).sum()
    }

    /// Renders the sources section body from the ledger.
    ///
    /// Citation notes are listed only when `include_notes` is set.
    pub fn render_sources<D: TreeDatabase + ?Sized>(
        &self,
        db: &D,
        dates: &dyn DateDisplayer,
        include_notes: bool,
    ) -> BioResult<String> {
        let mut res = String::from("<ol style=\"list-style-type:decimal\">\n");
        for entry in &self.entries {
            res.push_str(&format!("<li>{}\n", entry.source.title));
            res.push_str("<ol style=\"list-style-type:lower-alpha\">\n");

            for handle in &entry.citations {
                let Some(citation) = db.citation(handle)? else {
                    continue;
                };

                res.push_str("<li>");
                if let Some(date) = dates.display(&citation.date) {
                    res.push_str(&format!("<b>Date:</b> {date}<br/>\n"));
                }
                if !citation.page.is_empty() {
                    res.push_str(&format!("<b>Page:</b> {}<br/>\n", citation.page));
                }
                if !citation.media.is_empty() {
                    res.push_str("<b>Media:</b><ul>\n");
                    for media_handle in &citation.media {
                        let Some(media) = db.media(media_handle)? else {
                            continue;
                        };
                        res.push_str(&format!(
                            "<li><b>Description:</b> {}<br/>\n",
                            media.description
                        ));
                        res.push_str(&format!("<b>Path:</b> {}</li>\n", media.path));
                    }
                    res.push_str("</ul>\n");
                }
                if include_notes && !citation.notes.is_empty() {
                    res.push_str("<b>Notes:</b><ul>\n");
                    for note_handle in &citation.notes {
                        let Some(note) = db.note(note_handle)? else {
                            continue;
                        };
                        res.push_str(&format!("<li>{}<br/>\n", note.note_type.label()));
                        if note.private {
                            res.push_str(PRIVATE_PLACEHOLDER);
                            res.push('\n');
                        } else {
                            res.push_str(&note_paragraph(&note.text));
                        }
                        res.push_str("</li>\n");
                    }
                    res.push_str("</ul>\n");
                }
                res.push_str("</li>\n");
            }
            res.push_str("</ol></li><br/>\n");
        }
        res.push_str("</ol>\n");
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::{alpha_suffix, CitationRegistry};
    use crate::model::citation::Source;
    use crate::model::handle::Handle;

    fn source(handle: &str, title: &str) -> Source {
        Source::new(Handle::from(handle), title)
    }

    #[test]
    fn alpha_suffix_is_bijective_base_26() {
        let expected = ["a", "b", "z", "aa", "ab", "az", "ba", "zz", "aaa"];
        let indexes = [0, 1, 25, 26, 27, 51, 52, 701, 702];
        for (index, want) in indexes.iter().zip(expected) {
            assert_eq!(alpha_suffix(*index), want, "index {index}");
        }
    }

    #[test]
    fn first_28_citations_under_one_source() {
        let mut registry = CitationRegistry::new();
        let src = source("s1", "Parish register");
        let labels: Vec<String> = (0..28)
            .map(|i| {
                registry
                    .register(&Handle::new(format!("c{i}")), &src)
                    .to_string()
            })
            .collect();
        assert_eq!(labels[0], "1a");
        assert_eq!(labels[25], "1z");
        assert_eq!(labels[26], "1aa");
        assert_eq!(labels[27], "1ab");
    }

    #[test]
    fn reregistering_returns_the_same_label() {
        let mut registry = CitationRegistry::new();
        let src = source("s1", "Census");
        let first = registry.register(&Handle::from("c1"), &src);
        registry.register(&Handle::from("c2"), &src);
        let again = registry.register(&Handle::from("c1"), &src);
        assert_eq!(first, again);
        assert_eq!(again.marker(), "<sup>[1a]</sup>");
        assert_eq!(registry.citation_count(), 2);
    }

    #[test]
    fn source_ordinals_follow_first_encounter_not_title() {
        let mut registry = CitationRegistry::new();
        let zeta = source("s-z", "Zeta records");
        let alpha = source("s-a", "Alpha records");
        assert_eq!(registry.register(&Handle::from("c1"), &zeta).to_string(), "1a");
        assert_eq!(registry.register(&Handle::from("c2"), &alpha).to_string(), "2a");
        assert_eq!(registry.register(&Handle::from("c3"), &zeta).to_string(), "1b");
        assert_eq!(registry.entries()[0].source.title, "Zeta records");
        assert_eq!(registry.source_count(), 2);
    }
}
