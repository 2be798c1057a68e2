//! SQLite-backed tree store.
//!
//! # Responsibility
//! - Persist genealogy records as JSON bodies keyed by handle.
//! - Maintain the `backlinks` table on every write.
//! - Implement the read-only `TreeDatabase` contract.
//!
//! # Invariants
//! - A record write and its backlink rows are replaced in one transaction.
//! - Read paths reject undecodable bodies instead of masking them.
//! - The connection must be migrated to the latest schema version.

use crate::db::migrations::latest_version;
use crate::model::citation::{Citation, Media, Source};
use crate::model::event::Event;
use crate::model::family::Family;
use crate::model::handle::{Handle, RecordClass};
use crate::model::note::Note;
use crate::model::person::Person;
use crate::model::place::Place;
use crate::model::References;
use crate::repo::tree_db::{Backlink, RepoError, RepoResult, TreeDatabase};
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// SQLite tree store over a migrated connection.
pub struct SqliteTree<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTree<'conn> {
    /// Constructs a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }

    pub fn put_person(&self, person: &Person) -> RepoResult<()> {
        self.put_record(
            RecordClass::Person,
            &person.handle,
            Some(person.gramps_id.as_str()),
            person,
        )
    }

    pub fn put_family(&self, family: &Family) -> RepoResult<()> {
        self.put_record(RecordClass::Family, &family.handle, None, family)
    }

    pub fn put_event(&self, event: &Event) -> RepoResult<()> {
        self.put_record(RecordClass::Event, &event.handle, None, event)
    }

    pub fn put_place(&self, place: &Place) -> RepoResult<()> {
        self.put_record(RecordClass::Place, &place.handle, None, place)
    }

    pub fn put_source(&self, source: &Source) -> RepoResult<()> {
        self.put_record(RecordClass::Source, &source.handle, None, source)
    }

    pub fn put_citation(&self, citation: &Citation) -> RepoResult<()> {
        self.put_record(RecordClass::Citation, &citation.handle, None, citation)
    }

    pub fn put_media(&self, media: &Media) -> RepoResult<()> {
        self.put_record(RecordClass::Media, &media.handle, None, media)
    }

    pub fn put_note(&self, note: &Note) -> RepoResult<()> {
        self.put_record(RecordClass::Note, &note.handle, None, note)
    }

    /// Writes or updates the person's external (WikiTree) identifier.
    ///
    /// # Errors
    /// - `NotFound` when the person does not exist.
    pub fn set_external_id(&self, person_handle: &Handle, external_id: &str) -> RepoResult<()> {
        let mut person = self
            .person(person_handle)?
            .ok_or_else(|| RepoError::NotFound(person_handle.clone()))?;
        person.set_external_id(external_id).map_err(|err| {
            RepoError::InvalidData(format!("cannot encode external identity: {err}"))
        })?;
        self.put_person(&person)?;
        info!("event=external_id_set module=repo status=ok person={person_handle}");
        Ok(())
    }

    fn put_record<T: Serialize + References>(
        &self,
        class: RecordClass,
        handle: &Handle,
        gramps_id: Option<&str>,
        record: &T,
    ) -> RepoResult<()> {
        let body = serde_json::to_string(record).map_err(|err| {
            RepoError::InvalidData(format!(
                "cannot encode {} `{handle}`: {err}",
                class.as_str()
            ))
        })?;
        let table = table_name(class);

        let tx = self.conn.unchecked_transaction()?;
        match gramps_id {
            Some(gramps_id) => tx.execute(
                &format!(
                    "INSERT INTO {table} (handle, gramps_id, body) VALUES (?1, ?2, ?3)
                     ON CONFLICT(handle) DO UPDATE SET
                        gramps_id = excluded.gramps_id,
                        body = excluded.body,
                        updated_at = (strftime('%s', 'now') * 1000);"
                ),
                params![handle.as_str(), gramps_id, body],
            )?,
            None => tx.execute(
                &format!(
                    "INSERT INTO {table} (handle, body) VALUES (?1, ?2)
                     ON CONFLICT(handle) DO UPDATE SET
                        body = excluded.body,
                        updated_at = (strftime('%s', 'now') * 1000);"
                ),
                params![handle.as_str(), body],
            )?,
        };

        tx.execute(
            "DELETE FROM backlinks WHERE source_class = ?1 AND source_handle = ?2;",
            params![class.as_str(), handle.as_str()],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO backlinks (source_class, source_handle, target_handle)
                 VALUES (?1, ?2, ?3);",
            )?;
            for target in record.referenced_handles() {
                stmt.execute(params![class.as_str(), handle.as_str(), target.as_str()])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load_record<T: DeserializeOwned>(
        &self,
        class: RecordClass,
        handle: &Handle,
    ) -> RepoResult<Option<T>> {
        let body: Option<String> = self
            .conn
            .query_row(
                &format!("SELECT body FROM {} WHERE handle = ?1;", table_name(class)),
                [handle.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        body.map(|body| decode_body(class, handle.as_str(), &body))
            .transpose()
    }
}

impl TreeDatabase for SqliteTree<'_> {
    fn person(&self, handle: &Handle) -> RepoResult<Option<Person>> {
        self.load_record(RecordClass::Person, handle)
    }

    fn person_by_gramps_id(&self, gramps_id: &str) -> RepoResult<Option<Person>> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT handle, body FROM persons
                 WHERE gramps_id = ?1
                 ORDER BY handle ASC
                 LIMIT 1;",
                [gramps_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        row.map(|(handle, body)| decode_body(RecordClass::Person, &handle, &body))
            .transpose()
    }

    fn family(&self, handle: &Handle) -> RepoResult<Option<Family>> {
        self.load_record(RecordClass::Family, handle)
    }

    fn event(&self, handle: &Handle) -> RepoResult<Option<Event>> {
        self.load_record(RecordClass::Event, handle)
    }

    fn place(&self, handle: &Handle) -> RepoResult<Option<Place>> {
        self.load_record(RecordClass::Place, handle)
    }

    fn note(&self, handle: &Handle) -> RepoResult<Option<Note>> {
        self.load_record(RecordClass::Note, handle)
    }

    fn source(&self, handle: &Handle) -> RepoResult<Option<Source>> {
        self.load_record(RecordClass::Source, handle)
    }

    fn citation(&self, handle: &Handle) -> RepoResult<Option<Citation>> {
        self.load_record(RecordClass::Citation, handle)
    }

    fn media(&self, handle: &Handle) -> RepoResult<Option<Media>> {
        self.load_record(RecordClass::Media, handle)
    }

    fn note_handles(&self) -> RepoResult<Vec<Handle>> {
        let mut stmt = self
            .conn
            .prepare("SELECT handle FROM notes ORDER BY rowid ASC;")?;
        let mut rows = stmt.query([])?;
        let mut handles = Vec::new();
        while let Some(row) = rows.next()? {
            handles.push(Handle::new(row.get::<_, String>(0)?));
        }
        Ok(handles)
    }

    fn backlinks(&self, target: &Handle, classes: &[RecordClass]) -> RepoResult<Vec<Backlink>> {
        let mut stmt = self.conn.prepare(
            "SELECT source_class, source_handle
             FROM backlinks
             WHERE target_handle = ?1;",
        )?;
        let mut rows = stmt.query([target.as_str()])?;
        let mut links = Vec::new();
        while let Some(row) = rows.next()? {
            let class_text: String = row.get(0)?;
            let class = RecordClass::parse(&class_text).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid record class `{class_text}` in backlinks.source_class"
                ))
            })?;
            if !classes.contains(&class) {
                continue;
            }
            links.push(Backlink {
                class,
                handle: Handle::new(row.get::<_, String>(1)?),
            });
        }
        links.sort();
        Ok(links)
    }
}

fn table_name(class: RecordClass) -> &'static str {
    match class {
        RecordClass::Person => "persons",
        RecordClass::Family => "families",
        RecordClass::Event => "events",
        RecordClass::Place => "places",
        RecordClass::Source => "sources",
        RecordClass::Citation => "citations",
        RecordClass::Media => "media",
        RecordClass::Note => "notes",
    }
}

fn decode_body<T: DeserializeOwned>(class: RecordClass, handle: &str, body: &str) -> RepoResult<T> {
    serde_json::from_str(body).map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid {} body for `{handle}` in {}: {err}",
            class.as_str(),
            table_name(class)
        ))
    })
}
