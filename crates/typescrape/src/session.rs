// Copyright 2026 typescrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-scrape resolution context.
//!
//! A [`Session`] belongs to exactly one top-level page scrape. It records
//! every nested type name the moment its resolution begins (`resolved`) and
//! the finished schema once the nested page has been scraped (`types`).
//! A name is fetched at most once per session; later references reuse it.
//!
//! ## Cycles
//!
//! `resolved` is written before the nested page is scraped and `types` only
//! after. A page that references a type whose resolution is still in flight
//! gets a `Ref` without waiting for it. If that resolution never completes
//! the `Ref` dangles; [`Session::into_resource`] reports such names instead
//! of hiding them.

use crate::schema::{MapSchema, Resource};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::{debug, warn};
use url::Url;

/// Mutable bookkeeping shared by every recursive call of one scrape.
#[derive(Debug)]
pub struct Session {
    /// Entry page of this session.
    root: Url,
    /// Display name -> absolute link, in first-discovery order.
    resolved: IndexMap<String, Url>,
    /// Display name -> completed schema.
    types: HashMap<String, MapSchema>,
}

impl Session {
    pub fn new(root: Url) -> Self {
        Self {
            root,
            resolved: IndexMap::new(),
            types: HashMap::new(),
        }
    }

    /// Whether resolution of `name` has already begun in this session.
    pub fn is_resolved(&self, name: &str) -> bool {
        self.resolved.contains_key(name)
    }

    /// Record that resolution of `name` begins. Returns `false` (and leaves
    /// the first link in place) if the name was already recorded.
    pub fn mark_resolved(&mut self, name: &str, link: Url) -> bool {
        if self.resolved.contains_key(name) {
            return false;
        }
        debug!(name, link = %link, "resolving nested type");
        self.resolved.insert(name.to_string(), link);
        true
    }

    /// Store the completed schema for `name`.
    pub fn store(&mut self, name: &str, schema: MapSchema) {
        self.types.insert(name.to_string(), schema);
    }

    pub fn get(&self, name: &str) -> Option<&MapSchema> {
        self.types.get(name)
    }

    pub fn link_of(&self, name: &str) -> Option<&Url> {
        self.resolved.get(name)
    }

    /// Number of nested types whose resolution has begun.
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    /// Close the session, pairing the root schema with every nested type in
    /// first-discovery order.
    pub fn into_resource(mut self, schema: MapSchema) -> Resource {
        let mut types = Vec::with_capacity(self.resolved.len());
        for (name, link) in &self.resolved {
            match self.types.remove(name) {
                Some(nested) => types.push(nested),
                None => warn!(
                    root = %self.root,
                    name = name.as_str(),
                    link = %link,
                    "nested type was marked resolved but never stored"
                ),
            }
        }

        let resource = Resource { schema, types };
        for name in resource.dangling_refs() {
            warn!(root = %self.root, name = %name, "reference to a type missing from the session");
        }
        resource
    }
}
