mod http;

pub use self::http::{into_records, ApiConfig, ConfigError, FetchError, Resource};

// Crux's built-in Render capability covers view updates as-is.
pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::event::Event;
// The Effect derive wires the capabilities to the app type named `App`.
#[allow(unused_imports)]
use crate::App;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub http: Http<Event>,
    pub render: Render<Event>,
}
