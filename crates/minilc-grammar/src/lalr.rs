//! LR(1) state construction, LALR(1) core-merging, and ACTION/GOTO table
//! construction with conflict diagnostics on both the canonical and merged
//! automata.

use std::collections::{BTreeMap, BTreeSet};

use minilc_util::CompileError;

use crate::first::{compute_first_sets, first_of_sequence, FirstSets};
use crate::grammar::{production, productions_for, AUGMENTED_START, EOF, NONTERMINALS, TERMINALS};

/// An LR(1) item: a production, a dot position, and a lookahead set.
/// Two items share a *core* iff `(prod_id, dot)` match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Lr1Item {
    pub prod_id: u32,
    pub dot: usize,
    pub lookahead: BTreeSet<&'static str>,
}

impl Lr1Item {
    pub fn core(&self) -> (u32, usize) {
        (self.prod_id, self.dot)
    }
}

/// An LR(1) item set indexed by core, used as both the working
/// representation during closure/goto and the frozen state identity.
pub type ItemMap = BTreeMap<(u32, usize), BTreeSet<&'static str>>;

pub struct LrState {
    pub id: usize,
    pub items: ItemMap,
    pub transitions: BTreeMap<&'static str, usize>,
}

/// Computes the LR(1) closure of a seed item set, merging lookaheads by
/// core and iterating a FIFO worklist to a fixpoint — mirrors the
/// reference implementation's sorted-worklist closure so results are
/// deterministic regardless of caller iteration order.
pub fn closure(seed: ItemMap, first: &FirstSets) -> ItemMap {
    let mut item_map = seed;
    let mut queue: Vec<(u32, usize)> = item_map.keys().copied().collect();
    queue.sort();

    let mut cursor = 0;
    while cursor < queue.len() {
        let core = queue[cursor];
        cursor += 1;
        let lookaheads = item_map[&core].clone();
        let prod = production(core.0);
        let dot = core.1;
        if dot >= prod.rhs.len() {
            continue;
        }
        let symbol = prod.rhs[dot];
        if TERMINALS.contains(&symbol) {
            continue;
        }
        let beta = &prod.rhs[dot + 1..];

        let mut needed: BTreeSet<&'static str> = BTreeSet::new();
        for &la in &lookaheads {
            needed.extend(first_of_sequence(first, beta, la));
        }

        let mut prods: Vec<_> = productions_for(symbol).collect();
        prods.sort_by_key(|p| p.id);
        for p in prods {
            let key = (p.id, 0);
            match item_map.get_mut(&key) {
                None => {
                    item_map.insert(key, needed.clone());
                    queue.push(key);
                }
                Some(existing) => {
                    let before = existing.len();
                    existing.extend(needed.iter().copied());
                    if existing.len() != before {
                        queue.push(key);
                    }
                }
            }
        }
    }
    item_map
}

fn start_seed() -> ItemMap {
    let mut seed = ItemMap::new();
    seed.insert((1, 0), BTreeSet::from([EOF]));
    seed
}

/// GOTO(I, X): shift the dot over X in every item whose next symbol is X,
/// then close the result.
pub fn goto(items: &ItemMap, symbol: &str, first: &FirstSets) -> ItemMap {
    let mut moved = ItemMap::new();
    for (&(prod_id, dot), lookaheads) in items {
        let prod = production(prod_id);
        if dot < prod.rhs.len() && prod.rhs[dot] == symbol {
            let key = (prod_id, dot + 1);
            moved.entry(key).or_default().extend(lookaheads.iter().copied());
        }
    }
    if moved.is_empty() {
        return moved;
    }
    closure(moved, first)
}

fn ordered_symbols() -> Vec<&'static str> {
    let mut terminals: Vec<&'static str> = TERMINALS.iter().copied().filter(|&t| t != EOF).collect();
    terminals.sort();
    terminals.push(EOF);
    let mut nonterminals: Vec<&'static str> = NONTERMINALS.to_vec();
    nonterminals.sort();
    let mut symbols = terminals;
    symbols.extend(nonterminals);
    symbols
}

/// Builds the canonical LR(1) collection via BFS over grammar symbols in a
/// fixed order, using the frozen item set as state identity.
pub fn canonical_collection() -> Vec<LrState> {
    let first = compute_first_sets();
    let start_items = closure(start_seed(), &first);

    let mut states = vec![LrState {
        id: 0,
        items: start_items.clone(),
        transitions: BTreeMap::new(),
    }];
    let mut index: BTreeMap<ItemMap, usize> = BTreeMap::new();
    index.insert(start_items, 0);

    let symbols = ordered_symbols();
    let mut i = 0;
    while i < states.len() {
        let current_items = states[i].items.clone();
        let mut transitions = BTreeMap::new();
        for &sym in &symbols {
            let next_items = goto(&current_items, sym, &first);
            if next_items.is_empty() {
                continue;
            }
            let idx = match index.get(&next_items) {
                Some(&idx) => idx,
                None => {
                    let idx = states.len();
                    index.insert(next_items.clone(), idx);
                    states.push(LrState {
                        id: idx,
                        items: next_items,
                        transitions: BTreeMap::new(),
                    });
                    idx
                }
            };
            transitions.insert(sym, idx);
        }
        states[i].transitions = transitions;
        i += 1;
    }
    states
}

pub struct LalrState {
    pub id: usize,
    pub items: ItemMap,
    pub transitions: BTreeMap<&'static str, usize>,
    pub sources: Vec<usize>,
}

fn core_of(items: &ItemMap) -> BTreeSet<(u32, usize)> {
    items.keys().copied().collect()
}

/// Merges canonical LR(1) states that share a core into LALR(1) states,
/// unioning lookaheads and transitions. A transition-target mismatch
/// between merged sources is a structural grammar bug, not a conflict.
pub fn merge_to_lalr(lr_states: &[LrState]) -> Result<Vec<LalrState>, CompileError> {
    let mut core_to_id: BTreeMap<BTreeSet<(u32, usize)>, usize> = BTreeMap::new();
    let mut state_core = Vec::with_capacity(lr_states.len());
    for st in lr_states {
        let core = core_of(&st.items);
        let next_id = core_to_id.len();
        let cid = *core_to_id.entry(core).or_insert(next_id);
        state_core.push(cid);
    }

    let n = core_to_id.len();
    let mut merged_items: Vec<ItemMap> = vec![ItemMap::new(); n];
    let mut merged_trans: Vec<BTreeMap<&'static str, usize>> = vec![BTreeMap::new(); n];
    let mut core_sources: Vec<Vec<usize>> = vec![Vec::new(); n];

    for (idx, st) in lr_states.iter().enumerate() {
        let cid = state_core[idx];
        core_sources[cid].push(idx);
        for (&key, las) in &st.items {
            merged_items[cid].entry(key).or_default().extend(las.iter().copied());
        }
        for (&sym, &tgt) in &st.transitions {
            let tid = state_core[tgt];
            match merged_trans[cid].get(sym) {
                Some(&prev) if prev != tid => {
                    return Err(CompileError::internal(format!(
                        "Transition merge conflict: core {cid} on symbol {sym} maps to {prev} vs {tid}; LR states {:?}",
                        core_sources[cid]
                    )));
                }
                _ => {
                    merged_trans[cid].insert(sym, tid);
                }
            }
        }
    }

    let mut lalr_states = Vec::with_capacity(n);
    for cid in 0..n {
        let mut sources = core_sources[cid].clone();
        sources.sort();
        lalr_states.push(LalrState {
            id: cid,
            items: std::mem::take(&mut merged_items[cid]),
            transitions: std::mem::take(&mut merged_trans[cid]),
            sources,
        });
    }
    Ok(lalr_states)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(u32),
    Accept,
}

impl Action {
    pub fn encode(&self) -> String {
        match self {
            Action::Shift(n) => format!("s{n}"),
            Action::Reduce(n) => format!("r{n}"),
            Action::Accept => "acc".to_string(),
        }
    }
}

pub struct Tables {
    pub action: BTreeMap<usize, BTreeMap<&'static str, Action>>,
    pub goto: BTreeMap<usize, BTreeMap<&'static str, usize>>,
}

trait StateLike {
    fn id(&self) -> usize;
    fn items(&self) -> &ItemMap;
    fn transitions(&self) -> &BTreeMap<&'static str, usize>;
    fn sources(&self) -> Vec<usize>;
}

impl StateLike for LrState {
    fn id(&self) -> usize {
        self.id
    }
    fn items(&self) -> &ItemMap {
        &self.items
    }
    fn transitions(&self) -> &BTreeMap<&'static str, usize> {
        &self.transitions
    }
    fn sources(&self) -> Vec<usize> {
        vec![self.id]
    }
}

impl StateLike for LalrState {
    fn id(&self) -> usize {
        self.id
    }
    fn items(&self) -> &ItemMap {
        &self.items
    }
    fn transitions(&self) -> &BTreeMap<&'static str, usize> {
        &self.transitions
    }
    fn sources(&self) -> Vec<usize> {
        self.sources.clone()
    }
}

/// Builds ACTION/GOTO, collecting (rather than failing fast on) conflicts,
/// for diagnostic purposes against either the canonical or merged automaton.
fn detect_conflicts<S: StateLike>(states: &[S], label: &str) -> Vec<String> {
    let mut action: BTreeMap<usize, BTreeMap<&'static str, Action>> = BTreeMap::new();
    let mut conflicts = Vec::new();

    for st in states {
        action.insert(st.id(), BTreeMap::new());
    }

    for st in states {
        let cur_id = st.id();
        for (&sym, &tgt) in st.transitions() {
            if TERMINALS.contains(&sym) {
                record(&mut action, cur_id, sym, Action::Shift(tgt), st, None, &mut conflicts, label);
            }
        }
        for (&(prod_id, dot), lookaheads) in st.items() {
            let prod = production(prod_id);
            if dot != prod.rhs.len() {
                continue;
            }
            for &la in lookaheads {
                if prod.lhs == AUGMENTED_START {
                    if la == EOF {
                        record(&mut action, cur_id, EOF, Action::Accept, st, Some((prod_id, dot, lookaheads)), &mut conflicts, label);
                    }
                    continue;
                }
                record(&mut action, cur_id, la, Action::Reduce(prod_id), st, Some((prod_id, dot, lookaheads)), &mut conflicts, label);
            }
        }
    }
    conflicts
}

fn record<S: StateLike>(
    table: &mut BTreeMap<usize, BTreeMap<&'static str, Action>>,
    state_id: usize,
    terminal: &'static str,
    value: Action,
    state: &S,
    item: Option<(u32, usize, &BTreeSet<&'static str>)>,
    conflicts: &mut Vec<String>,
    label: &str,
) {
    let entry = table.get_mut(&state_id).unwrap();
    match entry.get(terminal) {
        Some(existing) if *existing != value => {
            conflicts.push(format!("[{label}] {}", describe_conflict(state, terminal, existing, &value, item)));
        }
        _ => {
            entry.insert(terminal, value);
        }
    }
}

fn describe_conflict<S: StateLike>(
    state: &S,
    terminal: &str,
    existing: &Action,
    new: &Action,
    item: Option<(u32, usize, &BTreeSet<&'static str>)>,
) -> String {
    let mut parts = vec![
        format!(
            "Conflict at state {} on terminal {}: {} vs {}",
            state.id(),
            terminal,
            existing.encode(),
            new.encode()
        ),
        format!("  sources (LR states): {:?}", state.sources()),
    ];
    if let Some((prod_id, dot, la)) = item {
        parts.push(format!("  item: [{}, {:?}]", item_text(prod_id, dot), la));
    }
    parts.push("  all items:".to_string());
    let mut items: Vec<_> = state.items().iter().collect();
    items.sort_by_key(|(&(pid, dot), las)| (pid, dot, (*las).clone()));
    for (&(pid, dot), las) in items {
        parts.push(format!("    [{pid}] {}, {:?}]", item_text(pid, dot), las));
    }
    parts.join("\n")
}

fn item_text(prod_id: u32, dot: usize) -> String {
    let prod = production(prod_id);
    let mut rhs: Vec<&str> = prod.rhs.to_vec();
    rhs.insert(dot.min(rhs.len()), "\u{b7}");
    format!("{} -> {}", prod.lhs, rhs.join(" "))
}

/// Builds the final ACTION/GOTO tables, failing fast on the first conflict.
fn build_action_goto<S: StateLike>(states: &[S]) -> Result<Tables, CompileError> {
    let mut action: BTreeMap<usize, BTreeMap<&'static str, Action>> = BTreeMap::new();
    let mut goto_table: BTreeMap<usize, BTreeMap<&'static str, usize>> = BTreeMap::new();

    for st in states {
        action.insert(st.id(), BTreeMap::new());
        goto_table.insert(st.id(), BTreeMap::new());
    }

    for st in states {
        let cur_id = st.id();
        for (&sym, &tgt) in st.transitions() {
            if TERMINALS.contains(&sym) {
                set_action(&mut action, cur_id, sym, Action::Shift(tgt), st, None)?;
            } else {
                goto_table.get_mut(&cur_id).unwrap().insert(sym, tgt);
            }
        }
        for (&(prod_id, dot), lookaheads) in st.items() {
            let prod = production(prod_id);
            if dot != prod.rhs.len() {
                continue;
            }
            for &la in lookaheads {
                if prod.lhs == AUGMENTED_START {
                    if la == EOF {
                        set_action(&mut action, cur_id, EOF, Action::Accept, st, Some((prod_id, dot, lookaheads)))?;
                    }
                    continue;
                }
                set_action(&mut action, cur_id, la, Action::Reduce(prod_id), st, Some((prod_id, dot, lookaheads)))?;
            }
        }
    }

    Ok(Tables {
        action,
        goto: goto_table,
    })
}

fn set_action<S: StateLike>(
    table: &mut BTreeMap<usize, BTreeMap<&'static str, Action>>,
    state_id: usize,
    terminal: &'static str,
    value: Action,
    state: &S,
    item: Option<(u32, usize, &BTreeSet<&'static str>)>,
) -> Result<(), CompileError> {
    let entry = table.get_mut(&state_id).unwrap();
    if let Some(existing) = entry.get(terminal) {
        if *existing != value {
            return Err(CompileError::GrammarConflict {
                report: describe_conflict(state, terminal, existing, &value, item),
            });
        }
    }
    entry.insert(terminal, value);
    Ok(())
}

/// Top-level entry point: build canonical LR(1), diagnose conflicts on it,
/// merge to LALR(1), diagnose conflicts on the merged automaton too, then
/// build the final tables (failing fast if any conflict survived the merge).
pub fn generate_tables() -> Result<(Vec<LalrState>, Tables), CompileError> {
    let lr_states = canonical_collection();
    let lr_conflicts = detect_conflicts(&lr_states, "LR(1)");

    let lalr_states = merge_to_lalr(&lr_states)?;
    let lalr_conflicts = detect_conflicts(&lalr_states, "LALR(1)");

    if !lalr_conflicts.is_empty() {
        let mut report = lalr_conflicts.join("\n\n");
        if lr_conflicts.is_empty() {
            report.push_str(
                "\n\nCanonical LR(1) table had no conflicts; conflict introduced during LALR merge.",
            );
        } else {
            report.push_str(&format!(
                "\n\nCanonical LR(1) table also had {} conflict(s).",
                lr_conflicts.len()
            ));
        }
        return Err(CompileError::GrammarConflict { report });
    }

    let tables = build_action_goto(&lalr_states)?;
    Ok((lalr_states, tables))
}
