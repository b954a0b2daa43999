//! # Marquee Core
//!
//! Data coordination for a catalog browsing screen that shows three
//! independently fetched collections: a "now playing" carousel, a
//! "trending" rail and an "upcoming" list.
//!
//! ## Overview
//!
//! - **Query cache**: [`query::QueryCoordinator`] owns one entry per
//!   [`query::SourceDescriptor`], deduplicates concurrent fetches of the same
//!   key, and keeps previous data visible while a refresh runs.
//! - **Aggregate view model**: [`view_model::AggregateViewModel`] reduces the
//!   watched entries to one loading flag, one refreshing flag and per-section
//!   data, recomputed on every entry mutation.
//! - **Feed assembly**: [`feed::assemble_feed`] turns section data into the
//!   ordered row list a renderer walks.
//! - **Movies screen**: [`screen::MoviesScreen`] wires the three sections of
//!   a [`screen::MovieCatalog`] through all of the above.
//!
//! ## Examples
//!
//! ```no_run
//! use marquee_core::query::{QueryCoordinator, QueryKey, SourceDescriptor};
//!
//! async fn load() -> Result<(), marquee_core::error::QueryError> {
//!     let coordinator = QueryCoordinator::<Vec<String>>::new();
//!     let key = QueryKey::from(["movies", "upcoming"]);
//!     coordinator.register(SourceDescriptor::new(key.clone(), || async {
//!         Ok(vec!["Dune: Part Two".to_string()])
//!     }));
//!
//!     // Both calls share a single fetch.
//!     let first = coordinator.ensure_fetched(&key);
//!     let second = coordinator.ensure_fetched(&key);
//!     let (a, b) = futures::join!(first, second);
//!     assert_eq!(a?, b?);
//!     Ok(())
//! }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Presentation helpers: truncation, date and rating formatting
pub mod display;
/// Error taxonomy shared by every fetch
pub mod error;
/// Ordered row assembly for the renderer
pub mod feed;
/// Query cache entries and the coordinator that drives them
pub mod query;
/// Movies screen wiring
pub mod screen;
/// Reactive aggregate over several query entries
pub mod view_model;

pub use error::{QueryError, Result, TransportError};
pub use feed::{FeedRow, RowKind, assemble_feed};
pub use query::{QueryCoordinator, QueryKey, QueryState, QueryStatus, SourceDescriptor};
pub use screen::{MovieCatalog, MoviesScreen, ScreenView, Section};
pub use view_model::{AggregateSnapshot, AggregateViewModel};
