//! Event, name and title rendering.
//!
//! # Responsibility
//! - Turn collector buckets into wikitext list items.
//! - Phrase each event by the subject's role in it.
//! - Register every rendered citation in the generation's registry.
//!
//! # Invariants
//! - The "to parents" clause is emitted at most once per renderer.
//! - A bucket with no surviving event renders as an empty string.
//! - Witness lists need at least two witnesses.

use super::citations::CitationRegistry;
use super::collector::{BucketRole, EventBucket};
use super::error::{BioError, BioResult};
use super::options::BiographyOptions;
use super::relations::{filter_participants, Participant, Relations};
use crate::model::event::{Event, EventRole, EventType};
use crate::model::family::Family;
use crate::model::handle::{Handle, RecordClass};
use crate::model::person::{Gender, Name, Person};
use crate::repo::tree_db::TreeDatabase;

const MIN_LISTED_WITNESSES: usize = 2;

/// Renders the narrative fragments of one subject.
///
/// Holds per-document state; use one renderer per generated biography.
pub struct NarrativeRenderer<'r, 'a, D: TreeDatabase + ?Sized> {
    relations: &'r Relations<'a, D>,
    subject: &'r Person,
    options: BiographyOptions,
    parents_listed: bool,
}

impl<'r, 'a, D: TreeDatabase + ?Sized> NarrativeRenderer<'r, 'a, D> {
    pub fn new(relations: &'r Relations<'a, D>, subject: &'r Person, options: BiographyOptions) -> Self {
        Self {
            relations,
            subject,
            options,
            parents_listed: false,
        }
    }

    /// `<b>First Surname</b> citations` line.
    pub fn render_title(&self, citations: &mut CitationRegistry) -> BioResult<String> {
        let cit_str = citations.cite(self.relations.db(), &self.subject.citations)?;
        Ok(format!(
            "<b>{}</b> {cit_str}\n",
            self.subject.primary_name.full_name()
        ))
    }

    /// One `<li>` for a name with its type, origin and citations.
    pub fn render_name(&self, name: &Name, citations: &mut CitationRegistry) -> BioResult<String> {
        let origin = match name.origin.label() {
            "" => String::new(),
            label => format!(" ({label})"),
        };
        let cit_str = citations.cite(self.relations.db(), &name.citations)?;
        Ok(format!(
            "<li><b>{}:</b> {}{origin}{cit_str}</li>\n",
            name.name_type.label(),
            name.full_name()
        ))
    }

    /// One dated `<li>` holding a nested list of the bucket's events.
    ///
    /// Witness and Informant entries are dropped unless witness events are
    /// enabled; returns `""` when nothing survives.
    pub fn render_bucket(
        &mut self,
        bucket: &EventBucket,
        citations: &mut CitationRegistry,
    ) -> BioResult<String> {
        let mut items = String::new();
        for entry in &bucket.entries {
            if entry.role.is_witness_like() && !self.options.include_witness_events {
                continue;
            }
            items.push_str("<li>");
            items.push_str(&self.render_event(&entry.event, entry.role, citations)?);
            items.push_str("</li>\n");
        }

        if items.is_empty() {
            return Ok(items);
        }
        Ok(format!(
            "<li><b>{}</b><br/>\n<ul>\n{items}</ul>\n</li>\n",
            bucket.date_text
        ))
    }

    /// Event line phrased by the subject's `role`, followed by the optional
    /// witness list and place lines.
    pub fn render_event(
        &mut self,
        event: &Event,
        role: BucketRole,
        citations: &mut CitationRegistry,
    ) -> BioResult<String> {
        let role_prefix = if role.is_witness_like() {
            format!("{} at ", role.label())
        } else {
            String::new()
        };
        let cit_str = citations.cite(self.relations.db(), &event.citations)?;
        let participants = self.relations.participants_of(event)?;
        let description = if event.description.is_empty() {
            String::new()
        } else {
            format!("{} ", event.description)
        };

        let mut witness_str = None;
        let participants_str = match role {
            BucketRole::Primary => {
                let mut clause = String::new();
                if matches!(event.kind, EventType::Birth | EventType::Baptism) {
                    if !self.parents_listed {
                        self.parents_listed = true;
                        let (mother, father) = self.relations.birth_parents(self.subject)?;
                        clause = format!(
                            "to parents: {}, {} ",
                            self.name(father.as_ref())?,
                            self.name(mother.as_ref())?
                        );
                    }
                    witness_str = self.witness_list(&participants)?;
                }
                clause
            }
            BucketRole::Family => {
                let mut clause = String::new();
                if event.kind == EventType::Marriage {
                    if let Some(family) = self.family_participant(&participants)? {
                        let spouse = if family.father.as_ref() == Some(&self.subject.handle) {
                            family.mother
                        } else {
                            family.father
                        };
                        clause = format!("to {} ", self.name(spouse.as_ref())?);
                    }
                    witness_str = self.witness_list(&participants)?;
                }
                clause
            }
            BucketRole::Parent => {
                let child = primary_participant(event, &participants)?;
                let noun = match self.gender_of(&child)? {
                    Some(Gender::Male) => "son ",
                    Some(Gender::Female) => "daughter ",
                    _ => "",
                };
                format!("of {noun}{}", self.name(Some(&child))?)
            }
            BucketRole::Spouse => {
                let spouse = primary_participant(event, &participants)?;
                let noun = match self.gender_of(&spouse)? {
                    Some(Gender::Male) => "husband ",
                    _ => "wife ",
                };
                format!("of {noun}{}", self.name(Some(&spouse))?)
            }
            BucketRole::Witness | BucketRole::Informant => {
                match self.family_participant(&participants)? {
                    Some(family) => format!(
                        "of {} and {} ",
                        self.name(family.father.as_ref())?,
                        self.name(family.mother.as_ref())?
                    ),
                    None => {
                        let primary = primary_participant(event, &participants)?;
                        format!("of {} ", self.name(Some(&primary))?)
                    }
                }
            }
        };

        let mut res = format!(
            "{role_prefix}<b>{}</b> {description}{participants_str} {cit_str}\n",
            event.kind.label()
        );
        if let Some(witness_str) = witness_str {
            res.push_str(&format!("<br/>{witness_str}\n"));
        }
        if let Some(place) = &event.place {
            res.push_str(&format!(
                "<br/>{}\n",
                self.relations.full_place_name(place)?
            ));
        }
        Ok(res)
    }

    fn name(&self, handle: Option<&Handle>) -> BioResult<String> {
        Ok(self.relations.clickable_name(handle, false)?)
    }

    fn gender_of(&self, handle: &Handle) -> BioResult<Option<Gender>> {
        Ok(self.relations.db().person(handle)?.map(|person| person.gender))
    }

    fn family_participant(&self, participants: &[Participant]) -> BioResult<Option<Family>> {
        let Some(participant) = participants
            .iter()
            .find(|participant| participant.class == RecordClass::Family)
        else {
            return Ok(None);
        };
        Ok(self.relations.db().family(&participant.handle)?)
    }

    fn witness_list(&self, participants: &[Participant]) -> BioResult<Option<String>> {
        if !self.options.include_witnesses {
            return Ok(None);
        }
        let witnesses = filter_participants(participants, EventRole::Witness);
        if witnesses.len() < MIN_LISTED_WITNESSES {
            return Ok(None);
        }

        let mut names = Vec::with_capacity(witnesses.len());
        for witness in witnesses {
            names.push(self.name(Some(&witness.handle))?);
        }
        Ok(Some(format!("<b>Witnesses:</b> {}", names.join(", "))))
    }
}

fn primary_participant(event: &Event, participants: &[Participant]) -> BioResult<Handle> {
    filter_participants(participants, EventRole::Primary)
        .first()
        .map(|participant| participant.handle.clone())
        .ok_or_else(|| BioError::AmbiguousRole {
            event: event.handle.clone(),
            expected: EventRole::Primary,
        })
}

#[cfg(test)]
mod tests {
    use super::NarrativeRenderer;
    use crate::model::citation::{Citation, Source};
    use crate::model::date::{GenDate, IsoDateDisplayer};
    use crate::model::event::{Event, EventRef, EventRole, EventType};
    use crate::model::family::{ChildRef, Family};
    use crate::model::handle::Handle;
    use crate::model::person::{Gender, Name, NameType, Person, SurnameOrigin};
    use crate::narrative::citations::CitationRegistry;
    use crate::narrative::collector::{BucketEntry, BucketRole, EventBucket};
    use crate::narrative::error::BioError;
    use crate::narrative::options::BiographyOptions;
    use crate::narrative::relations::Relations;
    use crate::repo::memory_tree::MemoryTree;

    fn person(handle: &str, gender: Gender, first: &str, last: &str) -> Person {
        Person::new(Handle::from(handle), gender, Name::new(first, last))
    }

    fn family_tree() -> MemoryTree {
        let mut tree = MemoryTree::new();
        let mut subject = person("kid", Gender::Female, "Ann", "Lee");
        subject
            .event_refs
            .push(EventRef::new(Handle::from("birth"), EventRole::Primary));
        subject.parent_family_handles.push(Handle::from("fam"));
        let mut father = person("dad", Gender::Male, "Tom", "Lee");
        father.family_handles.push(Handle::from("fam"));
        let mut mother = person("mum", Gender::Female, "May", "Lee");
        mother.family_handles.push(Handle::from("fam"));

        let mut family = Family::new(
            Handle::from("fam"),
            Some(Handle::from("dad")),
            Some(Handle::from("mum")),
        );
        family.children.push(ChildRef::birth(Handle::from("kid")));

        tree.insert_person(subject)
            .insert_person(father)
            .insert_person(mother)
            .insert_family(family)
            .insert_event(Event::new(
                Handle::from("birth"),
                EventType::Birth,
                GenDate::ymd(1850, 3, 7),
            ));
        tree
    }

    fn bucket(event: Event, role: BucketRole) -> EventBucket {
        EventBucket {
            date: event.date.clone(),
            date_text: "1850-03-07".to_string(),
            entries: vec![BucketEntry { event, role }],
        }
    }

    #[test]
    fn primary_birth_lists_parents_father_first_and_only_once() {
        let tree = family_tree();
        let relations = Relations::new(&tree, &IsoDateDisplayer);
        let subject = tree_person(&tree, "kid");
        let mut renderer = NarrativeRenderer::new(&relations, &subject, BiographyOptions::default());
        let mut registry = CitationRegistry::new();
        let birth = Event::new(Handle::from("birth"), EventType::Birth, GenDate::ymd(1850, 3, 7));

        let first = renderer
            .render_event(&birth, BucketRole::Primary, &mut registry)
            .unwrap();
        assert_eq!(first, "<b>Birth</b> to parents: Tom Lee, May Lee  \n");

        let second = renderer
            .render_event(&birth, BucketRole::Primary, &mut registry)
            .unwrap();
        assert_eq!(second, "<b>Birth</b>  \n");
    }

    #[test]
    fn child_event_names_the_child_with_gendered_noun() {
        let tree = family_tree();
        let relations = Relations::new(&tree, &IsoDateDisplayer);
        let father = tree_person(&tree, "dad");
        let mut renderer = NarrativeRenderer::new(&relations, &father, BiographyOptions::default());
        let mut registry = CitationRegistry::new();
        let birth = Event::new(Handle::from("birth"), EventType::Birth, GenDate::ymd(1850, 3, 7));

        let text = renderer
            .render_event(&birth, BucketRole::Parent, &mut registry)
            .unwrap();
        assert_eq!(text, "<b>Birth</b> of daughter Ann Lee \n");
    }

    #[test]
    fn parent_role_without_primary_participant_is_an_error() {
        let mut tree = family_tree();
        tree.insert_event(Event::new(Handle::from("orphan"), EventType::Death, GenDate::year(1900)));
        let relations = Relations::new(&tree, &IsoDateDisplayer);
        let father = tree_person(&tree, "dad");
        let mut renderer = NarrativeRenderer::new(&relations, &father, BiographyOptions::default());
        let orphan = Event::new(Handle::from("orphan"), EventType::Death, GenDate::year(1900));

        let err = renderer
            .render_event(&orphan, BucketRole::Parent, &mut CitationRegistry::new())
            .unwrap_err();
        assert!(matches!(err, BioError::AmbiguousRole { .. }));
    }

    #[test]
    fn witness_only_bucket_is_suppressed_by_default() {
        let tree = family_tree();
        let relations = Relations::new(&tree, &IsoDateDisplayer);
        let father = tree_person(&tree, "dad");
        let mut registry = CitationRegistry::new();
        let witnessed = bucket(
            Event::new(Handle::from("birth"), EventType::Birth, GenDate::ymd(1850, 3, 7)),
            BucketRole::Witness,
        );

        let mut quiet = NarrativeRenderer::new(&relations, &father, BiographyOptions::default());
        assert_eq!(quiet.render_bucket(&witnessed, &mut registry).unwrap(), "");

        let options = BiographyOptions {
            include_witness_events: true,
            ..BiographyOptions::default()
        };
        let mut verbose = NarrativeRenderer::new(&relations, &father, options);
        let text = verbose.render_bucket(&witnessed, &mut registry).unwrap();
        assert!(text.starts_with("<li><b>1850-03-07</b><br/>\n<ul>\n<li>Witness at <b>Birth</b> of Ann Lee "));
        assert!(text.ends_with("</li>\n</ul>\n</li>\n"));
    }

    #[test]
    fn name_line_carries_type_origin_and_citations() {
        let mut tree = family_tree();
        tree.insert_source(Source::new(Handle::from("src"), "Parish register"))
            .insert_citation(Citation::new(Handle::from("cit"), Handle::from("src")));
        let relations = Relations::new(&tree, &IsoDateDisplayer);
        let subject = tree_person(&tree, "kid");
        let renderer = NarrativeRenderer::new(&relations, &subject, BiographyOptions::default());
        let mut registry = CitationRegistry::new();

        let mut name = Name::new("Ann", "Lee");
        name.name_type = NameType::BirthName;
        name.origin = SurnameOrigin::Patrilineal;
        name.citations.push(Handle::from("cit"));

        assert_eq!(
            renderer.render_name(&name, &mut registry).unwrap(),
            "<li><b>Birth Name:</b> Ann Lee (Patrilineal) <sup>[1a]</sup></li>\n"
        );
    }

    fn tree_person(tree: &MemoryTree, handle: &str) -> Person {
        use crate::repo::tree_db::TreeDatabase;
        tree.person(&Handle::from(handle)).unwrap().unwrap()
    }
}
