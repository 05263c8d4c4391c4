use std::{
    mem,
    thread::{self, ThreadId},
};

use anyhow::Result;
use log::{debug, error, warn};
use sectioned_changes::{ChangeReducer, Changeset};

use crate::{
    AdapterSettings, EventResponse, GroupConfiguration, GroupSource, KindRole, ListView,
    Notification, ViewEvent, ViewEventHandler, ViewOperation,
};

/// Connects one data source to one list view.
///
/// Must be used from the thread that created it, which is usually the thread that owns the view.
#[derive(Debug)]
pub struct ListAdapter<V, H = ()> {
    view: V,
    /// Receives every view event the adapter does not answer itself.
    delegate: H,
    settings: AdapterSettings,
    reducer: ChangeReducer,
    configurations: Vec<GroupConfiguration>,
    /// The data source was invalidated while a batch was open.
    invalidated: bool,
    owner: ThreadId,
}

impl<V: ListView> ListAdapter<V> {
    pub fn new(view: V, settings: AdapterSettings) -> Self {
        Self::with_delegate(view, (), settings)
    }
}

impl<V: ListView, H: ViewEventHandler> ListAdapter<V, H> {
    pub fn with_delegate(view: V, delegate: H, settings: AdapterSettings) -> Self {
        Self {
            view,
            delegate,
            settings,
            reducer: ChangeReducer::new(),
            configurations: Vec::new(),
            invalidated: false,
            owner: thread::current().id(),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn delegate(&self) -> &H {
        &self.delegate
    }

    pub fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    pub fn is_batching(&self) -> bool {
        self.reducer.is_batching()
    }

    /// The cached configuration of `group` as of the last update issued to the view.
    pub fn configuration(&self, group: usize) -> Option<&GroupConfiguration> {
        self.configurations.get(group)
    }

    /// Processes a notification from the data source.
    ///
    /// `source` must already reflect the notified change. Fails on an `EndBatch` without a
    /// matching `BeginBatch`.
    pub fn notify(
        &mut self,
        notification: impl Into<Notification>,
        source: &impl GroupSource,
    ) -> Result<()> {
        self.assert_owner();
        match notification.into() {
            Notification::BeginBatch => self.reducer.begin_batch(),
            Notification::EndBatch => {
                if let Some(changeset) = self.reducer.end_batch()? {
                    self.refresh_configurations(source);
                    if mem::take(&mut self.invalidated) {
                        debug!("Data source was invalidated during the batch, reloading");
                        self.view.reload_data();
                    } else {
                        self.commit(changeset);
                    }
                }
            }
            Notification::Mutation(mutation) if self.reducer.is_batching() => {
                // After an invalidation, the batch ends in a reload anyway.
                if !self.invalidated {
                    mutation.fold_into(&mut self.reducer);
                }
            }
            Notification::Mutation(mutation) => {
                self.refresh_configurations(source);
                self.commit(mutation.into_changeset());
            }
            Notification::Invalidate => self.reload(source),
        }
        Ok(())
    }

    /// Reloads the view from scratch.
    ///
    /// Inside a batch, the reload is deferred to the end of the outermost batch.
    pub fn reload(&mut self, source: &impl GroupSource) {
        self.assert_owner();
        if self.reducer.is_batching() {
            self.invalidated = true;
            return;
        }
        self.refresh_configurations(source);
        self.view.reload_data();
    }

    /// Answers the view's configuration requests from the cached group configurations and
    /// forwards everything else to the delegate.
    pub fn handle_event(&mut self, event: ViewEvent) -> EventResponse {
        self.assert_owner();
        match event {
            ViewEvent::ElementKind(position) => {
                self.kind_response(position.group, KindRole::Element)
            }
            ViewEvent::HeaderKind(group) => self.kind_response(group, KindRole::Header),
            ViewEvent::FooterKind(group) => self.kind_response(group, KindRole::Footer),
            ViewEvent::WillDisplay(_)
            | ViewEvent::Selected(_)
            | ViewEvent::Deselected(_)
            | ViewEvent::ContextMenu(_) => self.delegate.handle_event(&event),
        }
    }

    fn kind_response(&self, group: usize, role: KindRole) -> EventResponse {
        let Some(configuration) = self.configurations.get(group) else {
            warn!("View asked for the {role:?} kind of unknown group {group}");
            return EventResponse::Unhandled;
        };
        configuration
            .kind(role)
            .map_or(EventResponse::Unhandled, EventResponse::Kind)
    }

    fn refresh_configurations(&mut self, source: &impl GroupSource) {
        self.configurations = (0..source.group_count())
            .map(|group| source.configuration(group))
            .collect();
    }

    fn commit(&mut self, changeset: Changeset) {
        if changeset.is_empty() {
            return;
        }

        if let Some(threshold) = self.settings.full_reload_threshold
            && changeset.operation_count() > threshold
        {
            debug!(
                "{} operations exceed the threshold of {threshold}, reloading",
                changeset.operation_count()
            );
            self.view.reload_data();
            return;
        }

        let changeset = if self.settings.reloads_as_replacements {
            changeset.into_replacements()
        } else {
            changeset
        };

        debug!("Applying batch update: {changeset}");
        let operations = ViewOperation::sequence(changeset);
        if let Err(e) = self
            .view
            .perform_batch_updates(&operations, self.settings.animated)
        {
            error!("View rejected batch update {operations:?}: {e:?}");
            self.view.reload_data();
        }
    }

    fn assert_owner(&self) {
        debug_assert_eq!(
            thread::current().id(),
            self.owner,
            "ListAdapter used outside of its owning thread"
        );
    }
}
