//! Binds a sectioned data source to a list view.
//!
//! The [`ListAdapter`] receives mutation notifications from the data source one at a time. Outside
//! of a batch, every mutation goes to the view right away. Inside a batch, the mutations are
//! reduced into one changeset that is issued as a single batch update when the outermost batch
//! ends.
mod configuration;
mod events;
mod list_adapter;
mod list_view;
mod notification;
mod settings;

pub use configuration::{
    GroupConfiguration, KindEntry, KindHandle, KindRegistry, KindRole, KindTag,
};
pub use events::{EventResponse, ViewEvent, ViewEventHandler};
pub use list_adapter::ListAdapter;
pub use list_view::{ListView, ViewOperation};
pub use notification::{GroupSource, Mutation, Notification};
pub use settings::AdapterSettings;

pub use sectioned_changes::{Changeset, Move, Position};
