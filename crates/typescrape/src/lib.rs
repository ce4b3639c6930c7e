// Copyright 2026 typescrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! typescrape: scrape resource reference pages into a typed schema graph
//! and emit TypeScript declarations for it.
//!
//! The pipeline runs in three stages. [`scrape`] reads a page and its
//! property list, [`classify`] turns each `Type:` line into a
//! [`schema::TypeDescriptor`] (scraping linked type pages on first sight),
//! and [`emit`] renders the finished [`schema::Resource`]. [`pipeline`]
//! ties them together per page and across a batch.

pub mod classify;
pub mod cli;
pub mod config;
pub mod emit;
pub mod error;
pub mod fetch;
pub mod markup;
pub mod pipeline;
pub mod schema;
pub mod scrape;
pub mod session;

pub use config::Config;
pub use emit::EmitOptions;
pub use fetch::{DiskCache, HttpSource, MemorySource, PageSource};
pub use pipeline::{generate, generate_many, scrape_resource, Generated, PageOutcome};
pub use schema::{MapSchema, Property, Resource, ScalarKind, TypeDescriptor};
