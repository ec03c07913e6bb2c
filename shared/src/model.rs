use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::capabilities::{ApiConfig, FetchError};
use crate::engine::{self, DerivedState};
use crate::records::{Location, Monster, RecordId};
use crate::{AppError, ErrorKind, ALL_CATEGORIES};

#[derive(Default, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

impl LoadStatus {
    /// The load has finished one way or the other.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Loaded | Self::Failed)
    }
}

/// Whether a control change requires the derived lists to be rebuilt.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Derivation {
    Required,
    Unchanged,
}

/// Search, category and sort controls.
///
/// `selected_category` is what the selector currently shows.
/// `applied_category` is what the lists are filtered by, and only moves
/// when [`ControlState::apply_category_filter`] is called.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ControlState {
    pub search_term: String,
    pub selected_category: String,
    pub applied_category: String,
    pub sort_enabled: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            selected_category: ALL_CATEGORIES.to_string(),
            applied_category: ALL_CATEGORIES.to_string(),
            sort_enabled: false,
        }
    }
}

impl ControlState {
    pub fn set_search_term(&mut self, term: impl Into<String>) -> Derivation {
        self.search_term = term.into();
        Derivation::Required
    }

    pub fn set_selected_category(&mut self, name: impl Into<String>) -> Derivation {
        self.selected_category = name.into();
        Derivation::Unchanged
    }

    pub fn apply_category_filter(&mut self) -> Derivation {
        self.applied_category.clone_from(&self.selected_category);
        Derivation::Required
    }

    pub fn toggle_sort(&mut self) -> Derivation {
        self.sort_enabled = !self.sort_enabled;
        Derivation::Required
    }

    #[must_use]
    pub fn is_category_applied(&self) -> bool {
        self.applied_category != ALL_CATEGORIES
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MonsterGroup {
    Small,
    Large,
}

impl MonsterGroup {
    pub const ALL: [Self; 2] = [Self::Small, Self::Large];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for MonsterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupExpansion {
    pub small: bool,
    pub large: bool,
}

/// Expand/collapse flags for the rendered panels. Independent of
/// filtering: ids that are filtered out keep their flag.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    expanded_locations: HashMap<RecordId, bool>,
    expanded_groups: GroupExpansion,
}

impl ViewState {
    /// Ids never toggled read as collapsed.
    #[must_use]
    pub fn is_location_expanded(&self, id: RecordId) -> bool {
        self.expanded_locations.get(&id).copied().unwrap_or(false)
    }

    pub fn toggle_location_panel(&mut self, id: RecordId) -> bool {
        let expanded = !self.is_location_expanded(id);
        self.expanded_locations.insert(id, expanded);
        expanded
    }

    #[must_use]
    pub const fn is_group_expanded(&self, group: MonsterGroup) -> bool {
        match group {
            MonsterGroup::Small => self.expanded_groups.small,
            MonsterGroup::Large => self.expanded_groups.large,
        }
    }

    pub fn toggle_monster_group_panel(&mut self, group: MonsterGroup) -> bool {
        let flag = match group {
            MonsterGroup::Small => &mut self.expanded_groups.small,
            MonsterGroup::Large => &mut self.expanded_groups.large,
        };
        *flag = !*flag;
        *flag
    }
}

/// Completions of the two startup fetches, parked until both arrive.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PendingLoad {
    monsters: Option<Vec<Monster>>,
    locations: Option<Vec<Location>>,
}

/// One completed startup fetch.
pub enum FetchedHalf {
    Monsters(Vec<Monster>),
    Locations(Vec<Location>),
}

pub enum LoadProgress {
    Waiting,
    Complete {
        monsters: Vec<Monster>,
        locations: Vec<Location>,
    },
}

impl PendingLoad {
    pub fn put(&mut self, half: FetchedHalf) {
        match half {
            FetchedHalf::Monsters(monsters) => self.monsters = Some(monsters),
            FetchedHalf::Locations(locations) => self.locations = Some(locations),
        }
    }

    /// Hands both lists over once they have arrived.
    pub fn take_if_complete(&mut self) -> LoadProgress {
        if self.monsters.is_none() || self.locations.is_none() {
            return LoadProgress::Waiting;
        }
        match (self.monsters.take(), self.locations.take()) {
            (Some(monsters), Some(locations)) => LoadProgress::Complete { monsters, locations },
            _ => LoadProgress::Waiting,
        }
    }

    pub fn clear(&mut self) {
        self.monsters = None;
        self.locations = None;
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Model {
    pub api: ApiConfig,
    pub load_status: LoadStatus,
    pub pending: PendingLoad,

    baseline_monsters: Vec<Monster>,
    baseline_locations: Vec<Location>,
    baseline_published: bool,

    pub controls: ControlState,
    derived: DerivedState,
    pub view: ViewState,

    pub active_error: Option<AppError>,
}

impl Model {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn baseline_monsters(&self) -> &[Monster] {
        &self.baseline_monsters
    }

    #[must_use]
    pub fn baseline_locations(&self) -> &[Location] {
        &self.baseline_locations
    }

    #[must_use]
    pub fn filtered_monsters(&self) -> &[Monster] {
        &self.derived.filtered_monsters
    }

    #[must_use]
    pub fn filtered_locations(&self) -> &[Location] {
        &self.derived.filtered_locations
    }

    #[must_use]
    pub fn derived(&self) -> &DerivedState {
        &self.derived
    }

    /// Installs the baseline and derives the initial lists from it. The
    /// baseline can only be installed once.
    pub fn publish_baseline(
        &mut self,
        monsters: Vec<Monster>,
        locations: Vec<Location>,
    ) -> Result<(), AppError> {
        if self.baseline_published {
            return Err(AppError::new(ErrorKind::InvalidState, "catalog already loaded"));
        }
        self.baseline_monsters = monsters;
        self.baseline_locations = locations;
        self.baseline_published = true;
        self.rederive();
        Ok(())
    }

    pub fn apply(&mut self, derivation: Derivation) {
        if derivation == Derivation::Required {
            self.rederive();
        }
    }

    pub fn rederive(&mut self) {
        self.derived = engine::derive(
            &self.baseline_monsters,
            &self.baseline_locations,
            &self.controls,
        );
    }

    pub fn fail_load(&mut self, error: &FetchError) {
        self.load_status = LoadStatus::Failed;
        self.pending.clear();
        self.set_error(AppError::from(error.clone()));
    }

    pub fn set_error(&mut self, error: AppError) {
        self.active_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.active_error = None;
    }
}
