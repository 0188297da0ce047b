//! Cut storage for a single oracle call.
//!
//! All cuts returned by one oracle invocation live in one arena:
//! - a flat interval buffer
//! - clique records pointing into the interval buffer
//! - cut records pointing into the clique records
//!
//! The store is written once by the oracle through [`CutStoreBuilder`] and is
//! read-only afterwards. Releasing consumes it, so a store can never be
//! released twice or read after release.

use super::clique::{intervals_from_vertices, CliqueRef, Interval};
use crate::error::SepResult;

/// Contiguous range into one of the arena buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    len: usize,
}

impl Span {
    fn range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len
    }
}

#[derive(Debug, Clone)]
struct CutRecord {
    cliques: Span,
    oracle_slack: Option<f64>,
}

/// Cuts produced by one oracle call, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct CutStore {
    /// Name of the oracle that produced the cuts.
    source: &'static str,

    intervals: Vec<Interval>,
    cliques: Vec<Span>,
    cuts: Vec<CutRecord>,
}

impl CutStore {
    /// Create an empty store.
    pub fn empty(source: &'static str) -> Self {
        Self {
            source,
            ..Default::default()
        }
    }

    /// Oracle that produced this store.
    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Number of cuts.
    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    /// Check if the store holds no cuts.
    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    /// Get a cut by insertion index.
    pub fn get(&self, index: usize) -> Option<CutRef<'_>> {
        self.cuts.get(index).map(|record| CutRef {
            store: self,
            record,
            index,
        })
    }

    /// Iterate over cuts in insertion order.
    ///
    /// The iterator borrows the store, so the traversal can be restarted as
    /// often as needed.
    pub fn iter(&self) -> CutIter<'_> {
        CutIter {
            store: self,
            next: 0,
        }
    }

    /// Visit every cut in insertion order.
    pub fn for_each<F: FnMut(CutRef<'_>)>(&self, f: F) {
        self.iter().for_each(f)
    }

    /// Free every cut, clique, and interval.
    ///
    /// Returns the number of cuts released. An empty store releases nothing.
    pub fn release(self) -> usize {
        let count = self.cuts.len();
        if count > 0 {
            log::trace!(
                "Releasing {} cuts ({} cliques, {} intervals) from {}",
                count,
                self.cliques.len(),
                self.intervals.len(),
                self.source
            );
        }
        drop(self);
        count
    }

    fn clique(&self, idx: usize) -> CliqueRef<'_> {
        CliqueRef::new(&self.intervals[self.cliques[idx].range()])
    }
}

impl<'a> IntoIterator for &'a CutStore {
    type Item = CutRef<'a>;
    type IntoIter = CutIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the cuts of a [`CutStore`].
pub struct CutIter<'a> {
    store: &'a CutStore,
    next: usize,
}

impl<'a> Iterator for CutIter<'a> {
    type Item = CutRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let cut = self.store.get(self.next)?;
        self.next += 1;
        Some(cut)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.store.len() - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for CutIter<'_> {}

/// Borrowed view of one cut: clique 0 is the handle, the rest are teeth.
#[derive(Clone, Copy)]
pub struct CutRef<'a> {
    store: &'a CutStore,
    record: &'a CutRecord,
    index: usize,
}

impl<'a> CutRef<'a> {
    /// Insertion index within the store.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of cliques, handle included.
    pub fn clique_count(&self) -> usize {
        self.record.cliques.len
    }

    /// Number of teeth (zero for a cut without cliques).
    pub fn tooth_count(&self) -> usize {
        self.clique_count().saturating_sub(1)
    }

    /// Clique `i` (0 is the handle).
    pub fn clique(&self, i: usize) -> CliqueRef<'a> {
        assert!(i < self.clique_count(), "clique index out of range");
        self.store.clique(self.record.cliques.start + i)
    }

    /// All cliques in order.
    pub fn cliques(&self) -> impl Iterator<Item = CliqueRef<'a>> + 'a {
        let store = self.store;
        self.record.cliques.range().map(move |c| store.clique(c))
    }

    /// The handle, if the cut has any cliques.
    pub fn handle(&self) -> Option<CliqueRef<'a>> {
        (self.clique_count() > 0).then(|| self.clique(0))
    }

    /// The teeth in order.
    pub fn teeth(&self) -> impl Iterator<Item = CliqueRef<'a>> + 'a {
        self.cliques().skip(1)
    }

    /// Blossom slack reported by the oracle, if any.
    ///
    /// Informational only; the verifier recomputes everything.
    pub fn oracle_slack(&self) -> Option<f64> {
        self.record.oracle_slack
    }
}

impl std::fmt::Debug for CutRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CutRef")
            .field("index", &self.index)
            .field("cliques", &self.cliques().map(|c| c.intervals()).collect::<Vec<_>>())
            .finish()
    }
}

/// Single writer for a [`CutStore`].
#[derive(Debug)]
pub struct CutStoreBuilder {
    store: CutStore,
    /// First clique record of the cut being built.
    open: Option<usize>,
}

impl CutStoreBuilder {
    /// Start an empty store.
    pub fn new(source: &'static str) -> Self {
        Self {
            store: CutStore::empty(source),
            open: None,
        }
    }

    /// Number of finished cuts.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if no cut has been finished.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Open a new cut. An already open cut is finished first.
    pub fn begin_cut(&mut self) -> &mut Self {
        if self.open.is_some() {
            self.finish_cut(None);
        }
        self.open = Some(self.store.cliques.len());
        self
    }

    /// Append a clique to the open cut, opening one if needed.
    pub fn push_clique(&mut self, intervals: &[Interval]) -> &mut Self {
        if self.open.is_none() {
            self.open = Some(self.store.cliques.len());
        }
        let start = self.store.intervals.len();
        self.store.intervals.extend_from_slice(intervals);
        self.store.cliques.push(Span {
            start,
            len: intervals.len(),
        });
        self
    }

    /// Append a clique given as a vertex set.
    pub fn push_clique_vertices(&mut self, vertices: &[usize]) -> SepResult<&mut Self> {
        let intervals = intervals_from_vertices(vertices)?;
        Ok(self.push_clique(&intervals))
    }

    /// Close the open cut. Without an open cut this records a cut with no
    /// cliques.
    pub fn finish_cut(&mut self, oracle_slack: Option<f64>) -> &mut Self {
        let end = self.store.cliques.len();
        let start = self.open.take().unwrap_or(end);
        self.store.cuts.push(CutRecord {
            cliques: Span {
                start,
                len: end - start,
            },
            oracle_slack,
        });
        self
    }

    /// Append a complete cut.
    pub fn push_cut(&mut self, cliques: &[Vec<Interval>], oracle_slack: Option<f64>) -> &mut Self {
        self.begin_cut();
        for clique in cliques {
            self.push_clique(clique);
        }
        self.finish_cut(oracle_slack)
    }

    /// Finish building. An open cut is closed first.
    pub fn build(mut self) -> CutStore {
        if self.open.is_some() {
            self.finish_cut(None);
        }
        self.store
    }
}
