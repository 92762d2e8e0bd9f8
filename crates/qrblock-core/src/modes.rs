//! Payload builders, one per display mode.
//!
//! Builders are independent of each other. Each takes only the inputs and
//! collaborators it needs and always returns a [`DisplayPayload`]; entities
//! that cannot be shown yield an "unavailable" payload, never an error.
//!
//! [`DisplayPayload`]: crate::payload::DisplayPayload

pub mod course_url;
pub mod current_url;
pub mod event;
pub mod geolocation;
pub mod module;
pub mod own_content;
pub mod section;
pub mod wifi;

pub use course_url::CourseUrl;
pub use current_url::CurrentUrl;
pub use event::CalendarEvent;
pub use geolocation::{Geolocation, LinkMode};
pub use module::CourseModule;
pub use own_content::OwnContent;
pub use section::CourseSection;
pub use wifi::WifiNetwork;
