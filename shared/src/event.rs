use serde::{Deserialize, Serialize};

use crate::capabilities::FetchError;
use crate::model::MonsterGroup;
use crate::records::{Location, Monster, RecordId};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub enum Event {
    #[default]
    Noop,

    /// Points the core at a different catalog host. Only honored before
    /// the load starts.
    ApiConfigured {
        base_url: String,
    },
    AppStarted,

    MonstersFetched(Box<Result<Vec<Monster>, FetchError>>),
    LocationsFetched(Box<Result<Vec<Location>, FetchError>>),

    SearchTermChanged {
        term: String,
    },
    CategorySelected {
        name: String,
    },
    CategoryFilterApplied,
    SortToggled,

    LocationPanelToggled {
        id: RecordId,
    },
    MonsterGroupToggled {
        group: MonsterGroup,
    },

    DismissError,
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::ApiConfigured { .. } => "api_configured",
            Self::AppStarted => "app_started",
            Self::MonstersFetched(_) => "monsters_fetched",
            Self::LocationsFetched(_) => "locations_fetched",
            Self::SearchTermChanged { .. } => "search_term_changed",
            Self::CategorySelected { .. } => "category_selected",
            Self::CategoryFilterApplied => "category_filter_applied",
            Self::SortToggled => "sort_toggled",
            Self::LocationPanelToggled { .. } => "location_panel_toggled",
            Self::MonsterGroupToggled { .. } => "monster_group_toggled",
            Self::DismissError => "dismiss_error",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::SearchTermChanged { .. }
                | Self::CategorySelected { .. }
                | Self::CategoryFilterApplied
                | Self::SortToggled
                | Self::LocationPanelToggled { .. }
                | Self::MonsterGroupToggled { .. }
                | Self::DismissError
        )
    }
}
