//! Biography assembly use-case.
//!
//! # Responsibility
//! - Resolve the subject and the template/header/footer notes.
//! - Compute the sections the template asks for, in a fixed order.
//! - Interpolate `%(name)s` placeholders into the final document.
//!
//! # Invariants
//! - One citation registry per generation; sources are rendered last so
//!   every citation of earlier sections is listed.
//! - A section absent from the template is never computed, so it cannot
//!   register citations.
//! - Placeholders without a computed value interpolate as empty text.

use crate::model::date::{DateDisplayer, IsoDateDisplayer};
use crate::model::handle::Handle;
use crate::model::note::{FOOTER_NOTE_TYPE, HEADER_NOTE_TYPE, TEMPLATE_NOTE_TYPE};
use crate::model::person::{Gender, Person};
use crate::narrative::citations::CitationRegistry;
use crate::narrative::collector::collect_events;
use crate::narrative::error::{BioError, BioResult};
use crate::narrative::markup::{note_paragraph, PRIVATE_PLACEHOLDER};
use crate::narrative::options::BiographyOptions;
use crate::narrative::relations::Relations;
use crate::narrative::render::NarrativeRenderer;
use crate::repo::tree_db::TreeDatabase;
use chrono::{Local, NaiveDateTime, TimeZone};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

/// Template used when the tree has no template note.
pub const DEFAULT_TEMPLATE: &str = "==Biography==

%(title)s

%(summary)s

%(names)s

%(events)s

%(notes)s

==Sources==

%(sources)s

Last update: %(lastupdate)s

Biography generated by wikibio at %(timestamp)s
";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%%|%\((\w+)\)s").expect("valid placeholder regex"));

/// Generated document plus ledger counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Biography {
    pub person: Handle,
    pub text: String,
    pub source_count: usize,
    pub citation_count: usize,
}

/// Template, header and footer as found in the tree's notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    pub template: String,
    pub header: String,
    pub footer: String,
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            header: String::new(),
            footer: String::new(),
        }
    }
}

/// Biography service facade over a tree database.
pub struct BiographyService<D: TreeDatabase> {
    db: D,
    dates: Box<dyn DateDisplayer>,
}

impl<D: TreeDatabase> BiographyService<D> {
    /// Creates a service using ISO-style date display.
    pub fn new(db: D) -> Self {
        Self::with_date_displayer(db, Box::new(IsoDateDisplayer))
    }

    pub fn with_date_displayer(db: D, dates: Box<dyn DateDisplayer>) -> Self {
        Self { db, dates }
    }

    /// Generates the biography of the person with `handle`.
    pub fn generate(&self, handle: &Handle, options: BiographyOptions) -> BioResult<Biography> {
        self.generate_at(handle, options, Local::now().naive_local())
    }

    /// Generates the biography of the person with Gramps id `gramps_id`.
    pub fn generate_for_gramps_id(
        &self,
        gramps_id: &str,
        options: BiographyOptions,
    ) -> BioResult<Biography> {
        let person = self
            .db
            .person_by_gramps_id(gramps_id)?
            .ok_or_else(|| BioError::PersonNotFound(gramps_id.to_string()))?;
        self.generate_logged(&person, options, Local::now().naive_local())
    }

    /// Like [`Self::generate`] with an explicit generation timestamp.
    pub fn generate_at(
        &self,
        handle: &Handle,
        options: BiographyOptions,
        now: NaiveDateTime,
    ) -> BioResult<Biography> {
        let person = self
            .db
            .person(handle)?
            .ok_or_else(|| BioError::PersonNotFound(handle.to_string()))?;
        self.generate_logged(&person, options, now)
    }

    /// Reads template/header/footer notes; the last note of each type wins.
    pub fn load_templates(&self) -> BioResult<TemplateSet> {
        let mut templates = TemplateSet::default();
        for note_handle in self.db.note_handles()? {
            let Some(note) = self.db.note(&note_handle)? else {
                continue;
            };
            match note.note_type.label() {
                TEMPLATE_NOTE_TYPE => templates.template = note.text,
                HEADER_NOTE_TYPE => templates.header = note.text,
                FOOTER_NOTE_TYPE => templates.footer = note.text,
                _ => {}
            }
        }
        Ok(templates)
    }

    fn generate_logged(
        &self,
        person: &Person,
        options: BiographyOptions,
        now: NaiveDateTime,
    ) -> BioResult<Biography> {
        match self.assemble(person, options, now) {
            Ok(biography) => {
                info!(
                    "event=bio_generate module=service status=ok person={} sources={} citations={} chars={}",
                    biography.person,
                    biography.source_count,
                    biography.citation_count,
                    biography.text.len()
                );
                Ok(biography)
            }
            Err(err) => {
                warn!(
                    "event=bio_generate module=service status=error person={}",
                    person.handle
                );
                Err(err)
            }
        }
    }

    fn assemble(
        &self,
        person: &Person,
        options: BiographyOptions,
        now: NaiveDateTime,
    ) -> BioResult<Biography> {
        let templates = self.load_templates()?;
        let template = templates.template.as_str();
        let relations = Relations::new(&self.db, self.dates.as_ref());
        let mut renderer = NarrativeRenderer::new(&relations, person, options);
        let mut citations = CitationRegistry::new();
        let mut values: HashMap<&'static str, String> = HashMap::new();

        if wants(template, "title") {
            values.insert("title", renderer.render_title(&mut citations)?);
        }
        if wants(template, "summary") {
            values.insert("summary", format_summary(&relations, person)?);
        }
        if wants(template, "names") {
            let mut res = String::from("===Names===\n\n<ul>\n");
            res.push_str(&renderer.render_name(&person.primary_name, &mut citations)?);
            for name in &person.alternate_names {
                res.push_str(&renderer.render_name(name, &mut citations)?);
            }
            res.push_str("</ul>");
            values.insert("names", res);
        }
        if wants(template, "events") {
            let mut res = String::from("===Events===\n\n<ul>\n");
            for bucket in collect_events(&relations, person, true)? {
                res.push_str(&renderer.render_bucket(&bucket, &mut citations)?);
            }
            res.push_str("</ul>\n");
            values.insert("events", res);
        }
        if options.include_notes && wants(template, "notes") {
            values.insert("notes", format_notes(&self.db, person)?);
        }

        values.insert(
            "sources",
            citations.render_sources(&self.db, self.dates.as_ref(), options.include_notes)?,
        );
        values.insert("lastupdate", format_change_time(person.change_time));
        values.insert("timestamp", now.format(TIMESTAMP_FORMAT).to_string());

        let mut text = String::new();
        if !templates.header.is_empty() {
            text.push_str(&templates.header);
            text.push('\n');
        }
        text.push('\n');
        text.push_str(&interpolate(template, &values));
        text.push('\n');
        if !templates.footer.is_empty() {
            text.push_str(&templates.footer);
            text.push('\n');
        }

        Ok(Biography {
            person: person.handle.clone(),
            text,
            source_count: citations.source_count(),
            citation_count: citations.citation_count(),
        })
    }
}

/// Generates one biography with ISO-style dates.
pub fn generate_biography<D: TreeDatabase>(
    db: D,
    person: &Handle,
    options: BiographyOptions,
) -> BioResult<Biography> {
    BiographyService::new(db).generate(person, options)
}

fn wants(template: &str, key: &str) -> bool {
    template.contains(&format!("%({key})s"))
}

/// Substitutes `%(key)s` placeholders and collapses `%%` to `%`.
pub fn interpolate(template: &str, values: &HashMap<&'static str, String>) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| match caps.get(1) {
            Some(key) => values.get(key.as_str()).cloned().unwrap_or_default(),
            None => "%".to_string(),
        })
        .into_owned()
}

fn format_change_time(change_time: i64) -> String {
    Local
        .timestamp_opt(change_time, 0)
        .single()
        .map(|time| time.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

fn format_summary<D: TreeDatabase + ?Sized>(
    relations: &Relations<'_, D>,
    person: &Person,
) -> BioResult<String> {
    let db = relations.db();
    let mut res = String::from("===Summary===\n\n<p>");

    if let Some(identity) = person.external_identity() {
        res.push_str(&format!("<b>WikiTree Id:</b> {}<br/>\n", identity.id));
    }

    let life_events = [
        relations.birth_or_fallback(person)?,
        relations.death_or_fallback(person)?,
    ];
    for event in life_events.into_iter().flatten() {
        let place = match &event.place {
            Some(place) => format!(", {}", relations.full_place_name(place)?),
            None => String::new(),
        };
        res.push_str(&format!(
            "<b>{}:</b> {}{place}<br/>\n",
            event.kind.label(),
            relations.event_date(&event).unwrap_or_default()
        ));
    }

    let (mother, father) = relations.birth_parents(person)?;
    if let Some(father) = &father {
        res.push_str(&format!(
            "<b>Father:</b> {}<br/>\n",
            relations.clickable_name(Some(father), true)?
        ));
    }
    if let Some(mother) = &mother {
        res.push_str(&format!(
            "<b>Mother:</b> {}<br/>\n",
            relations.clickable_name(Some(mother), true)?
        ));
    }

    for family_handle in &person.family_handles {
        let Some(family) = db.family(family_handle)? else {
            continue;
        };
        if person.gender == Gender::Male {
            res.push_str(&format!(
                "<b>Wife:</b> {}<br/>\n",
                relations.clickable_name(family.mother.as_ref(), true)?
            ));
        } else {
            res.push_str(&format!(
                "<b>Husband:</b> {}<br/>\n",
                relations.clickable_name(family.father.as_ref(), true)?
            ));
        }

        if !family.children.is_empty() {
            res.push_str("<b>Children:</b>\n<ol>\n");
            for child_ref in &family.children {
                res.push_str(&format!(
                    "<li>{}</li>\n",
                    relations.clickable_name(Some(&child_ref.child), true)?
                ));
            }
            res.push_str("</ol><br/>\n");
        }
    }

    res.push_str("</p>\n");
    Ok(res)
}

fn format_notes<D: TreeDatabase + ?Sized>(db: &D, person: &Person) -> BioResult<String> {
    let mut res = String::from("===Notes===\n");
    if person.note_handles.is_empty() {
        return Ok(res);
    }

    res.push_str("<ul>\n");
    for note_handle in &person.note_handles {
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
    Ok(res)
}
