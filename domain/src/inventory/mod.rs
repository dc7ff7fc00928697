//! Inventory domain module
//!
//! Types for draining a paginated listing into a complete set of resource
//! ids: the paging contract ([`ListPage`]), the filter applied to each listed
//! resource ([`ResourcePredicate`]) and the deduplicated, capped result
//! ([`InventorySnapshot`]).

pub mod predicate;
pub mod resource;
pub mod snapshot;

pub use predicate::ResourcePredicate;
pub use resource::{ListPage, ListedResource};
pub use snapshot::{InsertOutcome, InventorySnapshot};
