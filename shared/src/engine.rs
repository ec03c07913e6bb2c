//! Filter/sort pipeline over the baseline catalog.
//!
//! Everything here is a pure function of its inputs. The app re-runs
//! [`derive`] after every control change that affects the lists, and the
//! view calls [`partition`] on every render.

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::model::ControlState;
use crate::records::{Location, Monster, MonsterKind, Named};
use crate::ALL_CATEGORIES;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedState {
    pub filtered_monsters: Vec<Monster>,
    pub filtered_locations: Vec<Location>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MonsterGroups {
    pub small: Vec<Monster>,
    pub large: Vec<Monster>,
}

/// Runs category filter, then search filter, then the optional sort.
///
/// Both filters must pass for a record to survive. Without sorting the
/// output keeps baseline order.
#[must_use]
pub fn derive(monsters: &[Monster], locations: &[Location], controls: &ControlState) -> DerivedState {
    let category = category_filter(&controls.applied_category);
    let needle = search_needle(&controls.search_term);

    let mut filtered_monsters: Vec<Monster> = monsters
        .iter()
        .filter(|m| category.map_or(true, |c| m.inhabits(c)))
        .filter(|m| matches_search(*m, needle.as_deref()))
        .cloned()
        .collect();

    let mut filtered_locations: Vec<Location> = locations
        .iter()
        .filter(|l| category.map_or(true, |c| l.name == c))
        .filter(|l| matches_search(*l, needle.as_deref()))
        .cloned()
        .collect();

    if controls.sort_enabled {
        sort_by_name(&mut filtered_monsters);
        sort_by_name(&mut filtered_locations);
    }

    DerivedState {
        filtered_monsters,
        filtered_locations,
    }
}

/// Splits monsters by kind, preserving relative order. Monsters of an
/// unrecognized kind land in neither group.
#[must_use]
pub fn partition(monsters: &[Monster]) -> MonsterGroups {
    let mut groups = MonsterGroups::default();
    for monster in monsters {
        match monster.kind {
            MonsterKind::Small => groups.small.push(monster.clone()),
            MonsterKind::Large => groups.large.push(monster.clone()),
            MonsterKind::Unrecognized => {}
        }
    }
    groups
}

/// Case- and accent-insensitive sort key: NFD, combining marks removed,
/// lower-cased.
///
/// Names that differ only by accents ("Écailles", "Ecailles") get equal
/// keys, so they keep their filtered order under the stable sort.
#[must_use]
pub fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Stable ascending sort on [`collation_key`].
pub fn sort_by_name<T: Named>(records: &mut [T]) {
    records.sort_by_cached_key(|r| collation_key(r.name()));
}

fn category_filter(applied: &str) -> Option<&str> {
    (applied != ALL_CATEGORIES).then_some(applied)
}

fn search_needle(term: &str) -> Option<String> {
    (!term.is_empty()).then(|| term.to_lowercase())
}

fn matches_search<T: Named>(record: &T, needle: Option<&str>) -> bool {
    needle.map_or(true, |n| record.name().to_lowercase().contains(n))
}
