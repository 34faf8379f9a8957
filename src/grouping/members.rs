//! Member grouping: assigning hit ranges to their enclosing symbols.
//!
//! Given the ranges found in one file and that file's symbol outline, every
//! range is placed either in the bucket of the deepest enclosing symbol whose
//! kind is not excluded, or in the uncategorized bucket. The partition is
//! exact: no range is dropped or placed twice.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::symbols::{DocumentSymbol, SymbolKind};
use crate::base::Span;

/// A symbol flattened out of an outline, without its children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberSymbol {
    pub name: SmolStr,
    pub kind: SymbolKind,
    pub span: Span,
}

impl From<&DocumentSymbol> for MemberSymbol {
    fn from(symbol: &DocumentSymbol) -> Self {
        Self {
            name: symbol.name.clone(),
            kind: symbol.kind,
            span: symbol.span,
        }
    }
}

/// The ranges assigned to one symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberBucket {
    pub symbol: MemberSymbol,
    pub ranges: Vec<Span>,
}

/// Result of [`assign_members`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemberAssignment {
    /// Buckets ordered by symbol start position
    pub members: Vec<MemberBucket>,
    /// Ranges not enclosed by any eligible symbol, in input order
    pub uncategorized: Vec<Span>,
}

impl MemberAssignment {
    /// Put every range into the uncategorized bucket.
    pub fn all_uncategorized(ranges: &[Span]) -> Self {
        Self {
            members: Vec::new(),
            uncategorized: ranges.to_vec(),
        }
    }

    /// Total number of assigned ranges across all buckets.
    pub fn range_count(&self) -> usize {
        self.members.iter().map(|m| m.ranges.len()).sum::<usize>() + self.uncategorized.len()
    }
}

/// Assign each range to the deepest enclosing symbol not in `excluded`.
///
/// The outline is flattened in pre-order and stably sorted by start position,
/// so an enclosing symbol always comes before the symbols nested inside it.
/// Scanning that order and keeping the last symbol that contains the range
/// therefore yields the narrowest one. Excluded kinds are never chosen, but
/// their descendants stay eligible.
///
/// Runs in `O(ranges × symbols)`.
pub fn assign_members(
    ranges: &[Span],
    symbols: &[DocumentSymbol],
    excluded: &FxHashSet<SymbolKind>,
) -> MemberAssignment {
    if symbols.is_empty() {
        return MemberAssignment::all_uncategorized(ranges);
    }

    let mut flat: Vec<&DocumentSymbol> = Vec::new();
    flatten_pre_order(symbols, &mut flat);
    flat.sort_by_key(|symbol| symbol.span.start);

    // bucket index per flattened symbol, assigned on first use
    let mut slots: Vec<Option<usize>> = vec![None; flat.len()];
    let mut buckets: Vec<(usize, Vec<Span>)> = Vec::new();
    let mut uncategorized = Vec::new();

    for &range in ranges {
        let best = flat
            .iter()
            .enumerate()
            .filter(|(_, symbol)| !excluded.contains(&symbol.kind))
            .filter(|(_, symbol)| symbol.span.contains(&range))
            .map(|(i, _)| i)
            .last();

        match best {
            Some(i) => {
                let slot = *slots[i].get_or_insert_with(|| {
                    buckets.push((i, Vec::new()));
                    buckets.len() - 1
                });
                buckets[slot].1.push(range);
            }
            None => uncategorized.push(range),
        }
    }

    // flattened order is start order, so sorting by index orders by start
    buckets.sort_by_key(|(i, _)| *i);

    MemberAssignment {
        members: buckets
            .into_iter()
            .map(|(i, ranges)| MemberBucket {
                symbol: MemberSymbol::from(flat[i]),
                ranges,
            })
            .collect(),
        uncategorized,
    }
}

fn flatten_pre_order<'a>(symbols: &'a [DocumentSymbol], out: &mut Vec<&'a DocumentSymbol>) {
    for symbol in symbols {
        out.push(symbol);
        flatten_pre_order(&symbol.children, out);
    }
}
