//! Server side of the [Select2](https://select2.github.io/) dropdown widget.
//!
//! A [`Choice`] pairs the widget [`Settings`] with a [`ChoiceProvider`].
//! [`choice::router`] mounts it on an axum router: the widget queries the
//! mounted path with `term` and a 1-based `page` and gets back
//!
//! ```json
//! { "results": [{ "id": 1, "text": "Some Text" }], "more": true }
//! ```

pub mod choice;
mod error;
pub mod grouped;
mod provider;
mod response;
pub mod script;
mod settings;

pub use choice::{Choice, QueryParams, Select2Choice, Select2MultiChoice};
pub use error::Error;
pub use grouped::{GroupedTextChoiceProvider, GroupedValue, Select2GroupedMultiChoice};
pub use provider::{ChoiceProvider, Item, ListChoiceProvider, TextChoiceProvider, TextChoices};
pub use response::Response;
pub use settings::{AjaxSettings, Settings};
