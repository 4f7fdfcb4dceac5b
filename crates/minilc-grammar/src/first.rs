//! FIRST-set computation over the fixed grammar.

use std::collections::{BTreeMap, BTreeSet};

use crate::grammar::{NONTERMINALS, PRODUCTIONS, TERMINALS};

/// Empty string marker used inside FIRST sets to mean "this symbol is nullable".
pub const EPSILON: &str = "";

pub type FirstSets = BTreeMap<&'static str, BTreeSet<&'static str>>;

/// Computes FIRST(X) for every terminal and nonterminal via the standard
/// fixpoint iteration over all productions.
pub fn compute_first_sets() -> FirstSets {
    let mut first: FirstSets = BTreeMap::new();
    for &t in TERMINALS {
        first.insert(t, BTreeSet::from([t]));
    }
    for &nt in NONTERMINALS {
        first.insert(nt, BTreeSet::new());
    }

    let mut changed = true;
    while changed {
        changed = false;
        for prod in PRODUCTIONS {
            let before = first[prod.lhs].len();
            if prod.rhs.is_empty() {
                first.get_mut(prod.lhs).unwrap().insert(EPSILON);
            } else {
                let mut all_nullable = true;
                for &sym in prod.rhs {
                    let sym_first = first[sym].clone();
                    let lhs_first = first.get_mut(prod.lhs).unwrap();
                    lhs_first.extend(sym_first.iter().copied().filter(|&s| s != EPSILON));
                    if !sym_first.contains(EPSILON) {
                        all_nullable = false;
                        break;
                    }
                }
                if all_nullable {
                    first.get_mut(prod.lhs).unwrap().insert(EPSILON);
                }
            }
            if first[prod.lhs].len() != before {
                changed = true;
            }
        }
    }
    first
}

/// FIRST of a symbol sequence followed by a single lookahead terminal,
/// returning whether the whole sequence (sans the trailing lookahead) is nullable.
pub fn first_of_sequence(
    first: &FirstSets,
    symbols: &[&'static str],
    lookahead: &'static str,
) -> BTreeSet<&'static str> {
    let mut result = BTreeSet::new();
    let mut nullable = true;
    for &sym in symbols {
        let sym_first = &first[sym];
        result.extend(sym_first.iter().copied().filter(|&s| s != EPSILON));
        if !sym_first.contains(EPSILON) {
            nullable = false;
            break;
        }
    }
    if nullable {
        result.insert(lookahead);
    }
    result
}
