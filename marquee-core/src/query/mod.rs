//! Query cache: source descriptors, per-key entry state, and the
//! coordinator that owns every in-flight and cached fetch.

mod coordinator;
mod events;
mod key;
mod source;
mod state;

pub use coordinator::{QueryCoordinator, QueryFuture, RefetchFuture, RefetchReport};
pub use events::{ChangeType, QueryEvent, Subscription};
pub use key::QueryKey;
pub use source::{FetchFuture, SourceDescriptor};
pub use state::{QueryState, QueryStatus};
