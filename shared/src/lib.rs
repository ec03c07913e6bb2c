// lib.rs - Monster and location catalog core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod capabilities;
pub mod engine;
pub mod event;
pub mod model;
pub mod records;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use crux_core::{render::Render, App as CruxApp};
pub use engine::{derive, partition, DerivedState, MonsterGroups};
pub use event::Event;
pub use model::{ControlState, LoadStatus, Model, MonsterGroup, ViewState};
pub use records::{Camp, Habitat, Location, Monster, MonsterKind, RecordId};

use capabilities::{ConfigError, FetchError};

pub const DEFAULT_API_BASE_URL: &str = "https://mhw-db.com";
/// Category value that disables the location filter.
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    Server,
    Deserialization,
    Configuration,
    InvalidState,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Server => "SERVER_ERROR",
            Self::Deserialization => "DESERIALIZATION_ERROR",
            Self::Configuration => "CONFIGURATION_ERROR",
            Self::InvalidState => "INVALID_STATE",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Network => {
                "Unable to reach the monster database. Please check your connection.".into()
            }
            ErrorKind::Server => "The monster database is unavailable right now.".into(),
            ErrorKind::Deserialization => {
                "The monster database sent data that could not be read.".into()
            }
            ErrorKind::Configuration => self.message.clone(),
            ErrorKind::InvalidState => "Something went wrong. Please reload the page.".into(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        let kind = match &e {
            FetchError::Transport { .. } => ErrorKind::Network,
            FetchError::Status { .. } => ErrorKind::Server,
            FetchError::EmptyBody { .. } | FetchError::Decode { .. } => {
                ErrorKind::Deserialization
            }
            FetchError::Endpoint { .. } => ErrorKind::Configuration,
        };
        AppError::new(kind, e.to_string()).with_context("resource", e.resource().to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::new(ErrorKind::Configuration, e.to_string())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserFacingError {
    pub message: String,
    pub error_code: String,
}

impl From<&AppError> for UserFacingError {
    fn from(e: &AppError) -> Self {
        Self {
            message: e.user_facing_message(),
            error_code: e.code().to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ControlsView {
    pub search_term: String,
    pub selected_category: String,
    pub applied_category: String,
    pub sort_enabled: bool,
    /// `"All"` followed by every loaded location name.
    pub category_options: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CampView {
    pub id: RecordId,
    pub name: String,
    pub zone: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationPanel {
    pub id: RecordId,
    pub name: String,
    pub zone_count: u32,
    pub camps: Vec<CampView>,
    pub expanded: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationSection {
    pub heading: String,
    pub panels: Vec<LocationPanel>,
    pub empty_message: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonsterCard {
    pub id: RecordId,
    pub name: String,
    pub species: String,
    pub description: String,
    pub elements: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonsterGroupView {
    pub group: MonsterGroup,
    pub title: String,
    pub count: usize,
    pub expanded: bool,
    pub cards: Vec<MonsterCard>,
    pub empty_message: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub status: LoadStatus,
    pub error: Option<UserFacingError>,
    pub controls: ControlsView,
    pub location_section: LocationSection,
    pub monster_groups: Vec<MonsterGroupView>,
}

pub mod app {
    use super::*;
    use crate::capabilities::{into_records, ApiConfig, Resource};
    use crate::model::{FetchedHalf, LoadProgress};

    #[derive(Default)]
    pub struct App;

    impl App {
        fn start_load(model: &mut Model, caps: &Capabilities) {
            if model.load_status != LoadStatus::Idle {
                tracing::warn!(status = ?model.load_status, "catalog load already started, ignoring");
                return;
            }
            model.load_status = LoadStatus::Loading;

            let monsters_url = match model.api.endpoint(Resource::Monsters) {
                Ok(url) => url,
                Err(e) => return Self::endpoint_failed(model, Resource::Monsters, &e),
            };
            let locations_url = match model.api.endpoint(Resource::Locations) {
                Ok(url) => url,
                Err(e) => return Self::endpoint_failed(model, Resource::Locations, &e),
            };

            tracing::info!(
                monsters = %monsters_url,
                locations = %locations_url,
                "loading catalog"
            );

            caps.http
                .get(monsters_url.as_str())
                .send(|result| {
                    Event::MonstersFetched(Box::new(into_records(Resource::Monsters, result)))
                });

            caps.http
                .get(locations_url.as_str())
                .send(|result| {
                    Event::LocationsFetched(Box::new(into_records(Resource::Locations, result)))
                });
        }

        fn endpoint_failed(model: &mut Model, resource: Resource, error: &ConfigError) {
            let error = FetchError::Endpoint {
                resource,
                reason: error.to_string(),
            };
            tracing::error!(%error, "catalog load failed");
            model.fail_load(&error);
        }

        /// Parks one half of the load and publishes the baseline once both
        /// halves are in. The first failure fails the whole load.
        fn settle_load(model: &mut Model, outcome: Result<FetchedHalf, FetchError>) {
            if model.load_status != LoadStatus::Loading {
                tracing::debug!(
                    status = ?model.load_status,
                    "dropping fetch result outside of an active load"
                );
                return;
            }

            match outcome {
                Ok(half) => model.pending.put(half),
                Err(error) => {
                    tracing::error!(%error, resource = %error.resource(), "catalog load failed");
                    model.fail_load(&error);
                    return;
                }
            }

            if let LoadProgress::Complete { monsters, locations } =
                model.pending.take_if_complete()
            {
                let (monster_count, location_count) = (monsters.len(), locations.len());
                match model.publish_baseline(monsters, locations) {
                    Ok(()) => {
                        model.load_status = LoadStatus::Loaded;
                        tracing::info!(
                            monsters = monster_count,
                            locations = location_count,
                            "catalog loaded"
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "could not publish catalog");
                        model.set_error(e);
                    }
                }
            }
        }

        fn configure_api(model: &mut Model, base_url: &str) {
            if model.load_status != LoadStatus::Idle {
                tracing::warn!(%base_url, "API base URL changed after load start, ignoring");
                model.set_error(AppError::new(
                    ErrorKind::InvalidState,
                    "The catalog source cannot change once loading has started",
                ));
                return;
            }
            match ApiConfig::new(base_url) {
                Ok(api) => {
                    tracing::info!(base_url = api.base_url(), "API base URL configured");
                    model.api = api;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "rejected API base URL");
                    model.set_error(e.into());
                }
            }
        }

        fn build_controls(model: &Model) -> ControlsView {
            let mut category_options = Vec::with_capacity(model.baseline_locations().len() + 1);
            category_options.push(ALL_CATEGORIES.to_string());
            category_options.extend(model.baseline_locations().iter().map(|l| l.name.clone()));

            ControlsView {
                search_term: model.controls.search_term.clone(),
                selected_category: model.controls.selected_category.clone(),
                applied_category: model.controls.applied_category.clone(),
                sort_enabled: model.controls.sort_enabled,
                category_options,
            }
        }

        fn build_location_section(model: &Model) -> LocationSection {
            let applied = &model.controls.applied_category;
            let panels: Vec<LocationPanel> = model
                .filtered_locations()
                .iter()
                .map(|location| LocationPanel {
                    id: location.id,
                    name: location.name.clone(),
                    zone_count: location.zone_count,
                    camps: location
                        .camps
                        .iter()
                        .map(|camp| CampView {
                            id: camp.id,
                            name: camp.name.clone(),
                            zone: camp.zone,
                        })
                        .collect(),
                    expanded: model.view.is_location_expanded(location.id),
                })
                .collect();

            let empty_message = (panels.is_empty() && model.load_status.is_settled()).then(|| {
                if model.controls.is_category_applied() {
                    format!("No locations found for category {applied}.")
                } else {
                    "No locations found.".to_string()
                }
            });

            LocationSection {
                heading: format!("Location: {applied}"),
                panels,
                empty_message,
            }
        }

        fn build_monster_groups(model: &Model) -> Vec<MonsterGroupView> {
            let groups = partition(model.filtered_monsters());
            let settled = model.load_status.is_settled();

            MonsterGroup::ALL
                .into_iter()
                .map(|group| {
                    let (members, title) = match group {
                        MonsterGroup::Small => (&groups.small, "Small Monsters"),
                        MonsterGroup::Large => (&groups.large, "Large Monsters"),
                    };
                    let cards: Vec<MonsterCard> = members
                        .iter()
                        .map(|m| MonsterCard {
                            id: m.id,
                            name: m.name.clone(),
                            species: m.species.clone(),
                            description: m.description.clone(),
                            elements: m.elements.clone(),
                        })
                        .collect();

                    MonsterGroupView {
                        group,
                        title: title.to_string(),
                        count: cards.len(),
                        expanded: model.view.is_group_expanded(group),
                        empty_message: (cards.is_empty() && settled)
                            .then(|| format!("No {group} monsters found.")),
                        cards,
                    }
                })
                .collect()
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            let event_name = event.name();
            if event.is_user_initiated() {
                tracing::debug!(event = event_name, "user action");
            } else {
                tracing::debug!(event = event_name, "event");
            }

            match event {
                Event::Noop => return,

                Event::ApiConfigured { base_url } => Self::configure_api(model, &base_url),

                Event::AppStarted => Self::start_load(model, caps),

                Event::MonstersFetched(result) => {
                    Self::settle_load(model, (*result).map(FetchedHalf::Monsters));
                }

                Event::LocationsFetched(result) => {
                    Self::settle_load(model, (*result).map(FetchedHalf::Locations));
                }

                Event::SearchTermChanged { term } => {
                    let derivation = model.controls.set_search_term(term);
                    model.apply(derivation);
                }

                Event::CategorySelected { name } => {
                    let derivation = model.controls.set_selected_category(name);
                    model.apply(derivation);
                }

                Event::CategoryFilterApplied => {
                    let derivation = model.controls.apply_category_filter();
                    model.apply(derivation);
                }

                Event::SortToggled => {
                    let derivation = model.controls.toggle_sort();
                    model.apply(derivation);
                }

                Event::LocationPanelToggled { id } => {
                    let expanded = model.view.toggle_location_panel(id);
                    tracing::trace!(id, expanded, "location panel toggled");
                }

                Event::MonsterGroupToggled { group } => {
                    let expanded = model.view.toggle_monster_group_panel(group);
                    tracing::trace!(%group, expanded, "monster group toggled");
                }

                Event::DismissError => model.clear_error(),
            }

            caps.render.render();
        }

        fn view(&self, model: &Model) -> ViewModel {
            ViewModel {
                status: model.load_status,
                error: model.active_error.as_ref().map(UserFacingError::from),
                controls: Self::build_controls(model),
                location_section: Self::build_location_section(model),
                monster_groups: Self::build_monster_groups(model),
            }
        }
    }
}
