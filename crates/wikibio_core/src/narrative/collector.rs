//! Event collection, same-date merging and truncation.
//!
//! # Responsibility
//! - Gather every event touching the subject: own events, family events,
//!   spouse deaths and (optionally) children's births and deaths.
//! - Merge co-dated events into buckets and sort them chronologically.
//! - Bound the narrative at the subject's terminal event.
//!
//! # Invariants
//! - `Parent` and `Spouse` roles are synthesized here and never persisted.
//! - Within a bucket a Primary Birth/Death/Marriage leads; other entries
//!   keep encounter order.
//! - Undated events sort after dated ones.

use super::error::BioResult;
use super::markup::UNDATED_PLACEHOLDER;
use super::relations::{spouse_of, Relations};
use crate::model::date::GenDate;
use crate::model::event::{Event, EventRole, EventType};
use crate::model::person::Person;
use crate::repo::tree_db::TreeDatabase;
use log::debug;

/// Role of an event within the subject's narrative.
///
/// Stored roles map one-to-one; `Parent` and `Spouse` are collector-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketRole {
    Primary,
    Family,
    Witness,
    Informant,
    /// Birth or death of one of the subject's children.
    Parent,
    /// Death of the subject's spouse.
    Spouse,
}

impl BucketRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Family => "Family",
            Self::Witness => "Witness",
            Self::Informant => "Informant",
            Self::Parent => "Parent",
            Self::Spouse => "Spouse",
        }
    }

    /// Witness and Informant entries are subject to the witness-event filter.
    pub fn is_witness_like(self) -> bool {
        matches!(self, Self::Witness | Self::Informant)
    }
}

impl From<EventRole> for BucketRole {
    fn from(value: EventRole) -> Self {
        match value {
            EventRole::Primary => Self::Primary,
            EventRole::Family => Self::Family,
            EventRole::Witness => Self::Witness,
            EventRole::Informant => Self::Informant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketEntry {
    pub event: Event,
    pub role: BucketRole,
}

impl BucketEntry {
    fn is_primary_headline(&self) -> bool {
        self.role == BucketRole::Primary && self.event.kind.is_headline()
    }

    fn is_primary_terminal(&self) -> bool {
        self.role == BucketRole::Primary
            && matches!(self.event.kind, EventType::Death | EventType::Burial)
    }
}

/// Events sharing one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBucket {
    pub date: GenDate,
    /// Display text of `date`, or a placeholder for undated buckets.
    pub date_text: String,
    pub entries: Vec<BucketEntry>,
}

struct Pending {
    date: GenDate,
    entry: BucketEntry,
}

/// Collects the subject's merged, sorted and truncated event buckets.
pub fn collect_events<D: TreeDatabase + ?Sized>(
    relations: &Relations<'_, D>,
    person: &Person,
    include_children: bool,
) -> BioResult<Vec<EventBucket>> {
    let pending = gather(relations, person, include_children)?;
    let merged = merge_same_dates(pending);

    let terminal = merged
        .iter()
        .rposition(|bucket| bucket.entries.iter().any(BucketEntry::is_primary_terminal));

    let mut ordered: Vec<(usize, EventBucket)> = merged.into_iter().enumerate().collect();
    ordered.sort_by(|(_, left), (_, right)| left.date.cmp(&right.date));

    if let Some(terminal) = terminal {
        if let Some(position) = ordered.iter().position(|(seq, _)| *seq == terminal) {
            ordered.truncate(position + 1);
        }
    }

    Ok(ordered
        .into_iter()
        .map(|(_, bucket)| {
            let date_text = relations
                .dates()
                .display(&bucket.date)
                .unwrap_or_else(|| UNDATED_PLACEHOLDER.to_string());
            EventBucket { date_text, ..bucket }
        })
        .collect())
}

fn gather<D: TreeDatabase + ?Sized>(
    relations: &Relations<'_, D>,
    person: &Person,
    include_children: bool,
) -> BioResult<Vec<Pending>> {
    let db = relations.db();
    let mut pending = Vec::new();

    for event_ref in &person.event_refs {
        let Some(event) = db.event(&event_ref.event)? else {
            debug!(
                "event=missing_reference module=collector class=event handle={}",
                event_ref.event
            );
            continue;
        };
        pending.push(Pending {
            date: event.date.clone(),
            entry: BucketEntry {
                event,
                role: event_ref.role.into(),
            },
        });
    }

    for family_handle in &person.family_handles {
        let Some(family) = db.family(family_handle)? else {
            debug!("event=missing_reference module=collector class=family handle={family_handle}");
            continue;
        };

        for event_ref in &family.event_refs {
            if let Some(event) = db.event(&event_ref.event)? {
                insert_sorted(&mut pending, event, event_ref.role.into());
            }
        }

        // An unknown-gender subject in the father slot resolves to itself.
        let spouse_handle = spouse_of(person, &family).filter(|h| *h != person.handle);
        if let Some(spouse_handle) = spouse_handle {
            if let Some(spouse) = db.person(&spouse_handle)? {
                if let Some(death) = relations.death_or_fallback(&spouse)? {
                    insert_sorted(&mut pending, death, BucketRole::Spouse);
                }
            }
        }

        if include_children {
            for child_ref in &family.children {
                let Some(child) = db.person(&child_ref.child)? else {
                    continue;
                };
                if let Some(birth) = relations.birth_or_fallback(&child)? {
                    insert_sorted(&mut pending, birth, BucketRole::Parent);
                }
                if let Some(death) = relations.death_or_fallback(&child)? {
                    insert_sorted(&mut pending, death, BucketRole::Parent);
                }
            }
        }
    }

    Ok(pending)
}

/// Inserts before the first entry dated after `event`, else appends.
fn insert_sorted(pending: &mut Vec<Pending>, event: Event, role: BucketRole) {
    let date = event.date.clone();
    let entry = Pending {
        date,
        entry: BucketEntry { event, role },
    };
    let later = pending
        .iter()
        .position(|existing| existing.date > entry.date);
    match later {
        Some(index) => pending.insert(index, entry),
        None => pending.push(entry),
    }
}

fn merge_same_dates(pending: Vec<Pending>) -> Vec<EventBucket> {
    let mut merged: Vec<EventBucket> = Vec::new();
    for Pending { date, entry } in pending {
        match merged.last_mut() {
            Some(last) if last.date == date => {
                if entry.is_primary_headline() {
                    last.entries.insert(0, entry);
                } else {
                    last.entries.push(entry);
                }
            }
            _ => merged.push(EventBucket {
                date,
                date_text: String::new(),
                entries: vec![entry],
            }),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::{insert_sorted, merge_same_dates, BucketEntry, BucketRole, Pending};
    use crate::model::date::GenDate;
    use crate::model::event::{Event, EventType};
    use crate::model::handle::Handle;

    fn pending(handle: &str, kind: EventType, date: GenDate, role: BucketRole) -> Pending {
        Pending {
            date: date.clone(),
            entry: BucketEntry {
                event: Event::new(Handle::from(handle), kind, date),
                role,
            },
        }
    }

    #[test]
    fn insert_sorted_places_before_first_later_date_and_after_equal_ones() {
        let mut list = vec![
            pending("a", EventType::Birth, GenDate::year(1850), BucketRole::Primary),
            pending("b", EventType::Death, GenDate::year(1900), BucketRole::Primary),
        ];
        insert_sorted(
            &mut list,
            Event::new(Handle::from("c"), EventType::Marriage, GenDate::year(1850)),
            BucketRole::Family,
        );
        insert_sorted(
            &mut list,
            Event::new(Handle::from("d"), EventType::Census, GenDate::empty()),
            BucketRole::Primary,
        );
        let order: Vec<&str> = list.iter().map(|p| p.entry.event.handle.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn dated_events_insert_before_undated_ones() {
        let mut list = vec![pending(
            "u",
            EventType::Residence,
            GenDate::empty(),
            BucketRole::Primary,
        )];
        insert_sorted(
            &mut list,
            Event::new(Handle::from("m"), EventType::Marriage, GenDate::year(1870)),
            BucketRole::Family,
        );
        assert_eq!(list[0].entry.event.handle.as_str(), "m");
    }

    #[test]
    fn merge_puts_primary_headline_first() {
        let day = GenDate::ymd(1850, 5, 1);
        let merged = merge_same_dates(vec![
            pending("bap", EventType::Baptism, day.clone(), BucketRole::Primary),
            pending("sib", EventType::Birth, day.clone(), BucketRole::Parent),
            pending("own", EventType::Birth, day.clone(), BucketRole::Primary),
        ]);
        assert_eq!(merged.len(), 1);
        let order: Vec<&str> = merged[0]
            .entries
            .iter()
            .map(|e| e.event.handle.as_str())
            .collect();
        assert_eq!(order, vec!["own", "bap", "sib"]);
    }

    #[test]
    fn merge_only_joins_adjacent_equal_dates() {
        let merged = merge_same_dates(vec![
            pending("a", EventType::Census, GenDate::year(1851), BucketRole::Primary),
            pending("b", EventType::Census, GenDate::year(1861), BucketRole::Primary),
            pending("c", EventType::Residence, GenDate::year(1851), BucketRole::Primary),
        ]);
        assert_eq!(merged.len(), 3);
    }
}
