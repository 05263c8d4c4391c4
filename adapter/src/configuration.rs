//! View kinds and per-group configuration.
//!
//! A kind is registered once under a stable tag and referred to by a [`KindHandle`] from then on.
//! Groups store handles only, the registry owns the kinds.
use std::collections::HashMap;

use anyhow::{Result, bail};
use derive_more::{Deref, Display, From};

/// The stable identifier of a view kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, From, Display)]
pub struct KindTag(String);

impl From<&str> for KindTag {
    fn from(tag: &str) -> Self {
        Self(tag.into())
    }
}

/// Where a kind of view is used.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum KindRole {
    Element,
    Header,
    Footer,
}

/// An index into the [`KindRegistry`] that issued it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deref)]
pub struct KindHandle(u32);

impl From<KindHandle> for usize {
    fn from(value: KindHandle) -> Self {
        *value as _
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindEntry {
    pub tag: KindTag,
    pub role: KindRole,
}

#[derive(Debug, Default)]
pub struct KindRegistry {
    kinds: Vec<KindEntry>,
    by_tag: HashMap<KindTag, KindHandle>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a kind, or returns the handle of the kind already registered under `tag`.
    ///
    /// Fails if the tag is already registered for a different role.
    pub fn register(&mut self, tag: impl Into<KindTag>, role: KindRole) -> Result<KindHandle> {
        let tag = tag.into();
        if let Some(&handle) = self.by_tag.get(&tag) {
            let registered = self.kinds[usize::from(handle)].role;
            if registered != role {
                bail!("Kind `{tag}` is already registered as {registered:?}, not {role:?}");
            }
            return Ok(handle);
        }

        let handle = KindHandle(self.kinds.len() as u32);
        self.kinds.push(KindEntry {
            tag: tag.clone(),
            role,
        });
        self.by_tag.insert(tag, handle);
        Ok(handle)
    }

    pub fn handle(&self, tag: &KindTag) -> Option<KindHandle> {
        self.by_tag.get(tag).copied()
    }

    pub fn get(&self, handle: KindHandle) -> Option<&KindEntry> {
        self.kinds.get(usize::from(handle))
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// How the view presents one group.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GroupConfiguration {
    pub element: KindHandle,
    pub header: Option<KindHandle>,
    pub footer: Option<KindHandle>,
}

impl GroupConfiguration {
    pub fn new(element: KindHandle) -> Self {
        Self {
            element,
            header: None,
            footer: None,
        }
    }

    pub fn with_header(mut self, header: KindHandle) -> Self {
        self.header = Some(header);
        self
    }

    pub fn with_footer(mut self, footer: KindHandle) -> Self {
        self.footer = Some(footer);
        self
    }

    /// The kind to use for `role`, if the group presents one.
    pub fn kind(&self, role: KindRole) -> Option<KindHandle> {
        match role {
            KindRole::Element => Some(self.element),
            KindRole::Header => self.header,
            KindRole::Footer => self.footer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registering_twice_returns_the_same_handle() {
        let mut registry = KindRegistry::new();
        let row = registry.register("row", KindRole::Element).unwrap();
        let title = registry.register("title", KindRole::Header).unwrap();

        assert_ne!(row, title);
        assert_eq!(registry.register("row", KindRole::Element).unwrap(), row);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.handle(&"title".into()), Some(title));
        assert_eq!(registry.get(title).unwrap().role, KindRole::Header);
    }

    #[test]
    fn conflicting_role_is_rejected() {
        let mut registry = KindRegistry::new();
        registry.register("row", KindRole::Element).unwrap();
        assert!(registry.register("row", KindRole::Footer).is_err());
    }

    #[test]
    fn configuration_kinds_by_role() {
        let mut registry = KindRegistry::new();
        let row = registry.register("row", KindRole::Element).unwrap();
        let title = registry.register("title", KindRole::Header).unwrap();

        let configuration = GroupConfiguration::new(row).with_header(title);
        assert_eq!(configuration.kind(KindRole::Element), Some(row));
        assert_eq!(configuration.kind(KindRole::Header), Some(title));
        assert_eq!(configuration.kind(KindRole::Footer), None);
    }
}
