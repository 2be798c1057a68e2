//! Whole-tree JSON snapshots used to seed tree stores.

use crate::model::citation::{Citation, Media, Source};
use crate::model::event::Event;
use crate::model::family::Family;
use crate::model::note::Note;
use crate::model::person::Person;
use crate::model::place::Place;
use crate::repo::memory_tree::MemoryTree;
use crate::repo::sqlite_tree::SqliteTree;
use crate::repo::tree_db::RepoResult;
use log::info;
use serde::{Deserialize, Serialize};

/// Every record of a tree, one list per record class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSnapshot {
    pub persons: Vec<Person>,
    pub families: Vec<Family>,
    pub events: Vec<Event>,
    pub places: Vec<Place>,
    pub sources: Vec<Source>,
    pub citations: Vec<Citation>,
    pub media: Vec<Media>,
    pub notes: Vec<Note>,
}

/// Record counts written by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub persons: usize,
    pub families: usize,
    pub events: usize,
    pub places: usize,
    pub sources: usize,
    pub citations: usize,
    pub media: usize,
    pub notes: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.persons
            + self.families
            + self.events
            + self.places
            + self.sources
            + self.citations
            + self.media
            + self.notes
    }
}

impl TreeSnapshot {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn summary(&self) -> ImportSummary {
        ImportSummary {
            persons: self.persons.len(),
            families: self.families.len(),
            events: self.events.len(),
            places: self.places.len(),
            sources: self.sources.len(),
            citations: self.citations.len(),
            media: self.media.len(),
            notes: self.notes.len(),
        }
    }

    pub fn into_memory_tree(self) -> MemoryTree {
        let mut tree = MemoryTree::new();
        for person in self.persons {
            tree.insert_person(person);
        }
        for family in self.families {
            tree.insert_family(family);
        }
        for event in self.events {
            tree.insert_event(event);
        }
        for place in self.places {
            tree.insert_place(place);
        }
        for source in self.sources {
            tree.insert_source(source);
        }
        for citation in self.citations {
            tree.insert_citation(citation);
        }
        for media in self.media {
            tree.insert_media(media);
        }
        for note in self.notes {
            tree.insert_note(note);
        }
        tree
    }

    /// Upserts every record into `tree`.
    ///
    /// Each record is its own transaction; a failure leaves earlier records
    /// written.
    pub fn write_to(&self, tree: &SqliteTree<'_>) -> RepoResult<ImportSummary> {
        self.persons.iter().try_for_each(|r| tree.put_person(r))?;
        self.families.iter().try_for_each(|r| tree.put_family(r))?;
        self.events.iter().try_for_each(|r| tree.put_event(r))?;
        self.places.iter().try_for_each(|r| tree.put_place(r))?;
        self.sources.iter().try_for_each(|r| tree.put_source(r))?;
        self.citations.iter().try_for_each(|r| tree.put_citation(r))?;
        self.media.iter().try_for_each(|r| tree.put_media(r))?;
        self.notes.iter().try_for_each(|r| tree.put_note(r))?;

        let summary = self.summary();
        info!(
            "event=tree_import module=repo status=ok records={} persons={} families={} events={}",
            summary.total(),
            summary.persons,
            summary.families,
            summary.events
        );
        Ok(summary)
    }
}
