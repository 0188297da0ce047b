//! Comb cut representation.
//!
//! A cut is an ordered list of cliques: the handle first, then the teeth.
//! Each clique is a union of closed vertex intervals.

mod clique;
mod store;

pub use clique::{intervals_from_vertices, CliqueRef, Interval};
pub use store::{CutIter, CutRef, CutStore, CutStoreBuilder};
