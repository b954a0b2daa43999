//! The movies catalog screen: three independently fetched sections wired
//! through the query coordinator, the aggregate view model and the feed
//! assembler.

mod catalog;
mod movies;

pub use catalog::{MovieCatalog, Section};
pub use movies::{MoviesScreen, ScreenView};
