//! Block-local optimization passes: constant folding, constant and copy
//! propagation, and dead-code elimination of unused temporaries.
//!
//! Each pass resets its working environment at block boundaries and at
//! labels/branches within a block, since those are the only points another
//! block's control flow can join in — propagating a binding across one
//! would require proper dataflow analysis, which this optimizer does not
//! attempt.

use std::collections::{HashMap, HashSet};

use minilc_ir::Quad;

#[derive(Debug, Default)]
pub struct PassStats {
    pub removed: Vec<usize>,
    pub replaced: Vec<(usize, String, String)>,
    pub notes: Vec<String>,
}

#[derive(Debug, Default)]
pub struct Stats {
    pub folding: PassStats,
    pub const_prop: PassStats,
    pub copy_prop: PassStats,
    pub dce: PassStats,
}

const ARITH_OPS: [&str; 4] = ["ADD", "SUB", "MUL", "DIV"];

fn is_join_point(op: &str) -> bool {
    op == "LABEL" || op == "GOTO" || op.starts_with("IF_")
}

fn is_const(val: &str) -> bool {
    let v = val.strip_prefix('-').unwrap_or(val);
    !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit())
}

fn is_var(val: &str) -> bool {
    val != "-" && !val.is_empty() && !is_const(val)
}

fn fmt_quad(q: &Quad) -> String {
    format!("({}, {}, {}, {})", q.op, q.arg1, q.arg2, q.res)
}

/// Folds binary arithmetic on two literal operands into an `ASSIGN`.
/// Division by the literal `0` is left alone — dividing by zero is a
/// runtime error, not something the optimizer should silently resolve.
fn calc(op: &str, a: i64, b: i64) -> i64 {
    match op {
        "ADD" => a + b,
        "SUB" => a - b,
        "MUL" => a * b,
        "DIV" => a / b,
        _ => unreachable!("calc called with non-arithmetic op {op}"),
    }
}

fn fold_pass(quads: &mut [Quad], stats: &mut PassStats) -> bool {
    let mut changed = false;
    for (i, q) in quads.iter_mut().enumerate() {
        if !ARITH_OPS.contains(&q.op.as_str()) || !is_const(&q.arg1) || !is_const(&q.arg2) {
            continue;
        }
        if q.op == "DIV" && q.arg2 == "0" {
            stats.notes.push(format!("Skip div-by-zero folding at {i}"));
            continue;
        }
        let a: i64 = q.arg1.parse().expect("checked by is_const");
        let b: i64 = q.arg2.parse().expect("checked by is_const");
        let new_q = Quad::new("ASSIGN", calc(&q.op, a, b).to_string(), "-", q.res.clone());
        if new_q != *q {
            stats.replaced.push((i, fmt_quad(q), fmt_quad(&new_q)));
            *q = new_q;
            changed = true;
        }
    }
    changed
}

fn const_prop_pass(quads: &mut [Quad], stats: &mut PassStats) -> bool {
    let mut changed = false;
    let mut env: HashMap<String, String> = HashMap::new();
    for (i, q) in quads.iter_mut().enumerate() {
        if is_join_point(&q.op) {
            env.clear();
            continue;
        }
        let a1 = env.get(q.arg1.as_str()).cloned().unwrap_or_else(|| q.arg1.clone());
        let a2 = env.get(q.arg2.as_str()).cloned().unwrap_or_else(|| q.arg2.clone());
        let new_q = Quad::new(q.op.clone(), a1, a2, q.res.clone());
        if new_q != *q {
            stats.replaced.push((i, fmt_quad(q), fmt_quad(&new_q)));
            *q = new_q;
            changed = true;
        }
        if q.res != "-" {
            if q.op == "ASSIGN" && is_const(&q.arg1) {
                env.insert(q.res.clone(), q.arg1.clone());
            } else {
                env.remove(q.res.as_str());
                env.retain(|_, v| v != &q.res);
            }
        }
    }
    changed
}

fn resolve_copy(name: &str, env: &HashMap<String, String>) -> String {
    let mut seen = HashSet::new();
    let mut cur = name;
    while let Some(next) = env.get(cur) {
        if !seen.insert(cur.to_string()) {
            break;
        }
        cur = next.as_str();
    }
    cur.to_string()
}

fn copy_prop_pass(quads: &mut [Quad], stats: &mut PassStats) -> bool {
    let mut changed = false;
    let mut env: HashMap<String, String> = HashMap::new();
    for (i, q) in quads.iter_mut().enumerate() {
        if is_join_point(&q.op) {
            env.clear();
            continue;
        }
        let a1 = resolve_copy(&q.arg1, &env);
        let a2 = resolve_copy(&q.arg2, &env);
        let new_q = Quad::new(q.op.clone(), a1, a2, q.res.clone());
        if new_q != *q {
            stats.replaced.push((i, fmt_quad(q), fmt_quad(&new_q)));
            *q = new_q;
            changed = true;
        }
        if q.op == "ASSIGN" && is_var(&q.arg1) && is_var(&q.res) {
            let resolved = resolve_copy(&q.arg1, &env);
            env.insert(q.res.clone(), resolved);
        }
        if q.res != "-" {
            env.remove(q.res.as_str());
            env.retain(|_, v| v != &q.res);
        }
    }
    changed
}

fn dce_pass(quads: &[Quad], stats: &mut PassStats) -> (Vec<Quad>, bool) {
    let mut changed = false;
    let mut live: HashSet<String> = HashSet::new();
    let mut keep: Vec<Quad> = Vec::with_capacity(quads.len());
    for (i, q) in quads.iter().enumerate().rev() {
        if q.is_label() || q.is_branch() {
            if is_var(&q.arg1) {
                live.insert(q.arg1.clone());
            }
            if is_var(&q.arg2) {
                live.insert(q.arg2.clone());
            }
            keep.push(q.clone());
            continue;
        }
        let removable = q.res.starts_with('t');
        if removable && !live.contains(&q.res) {
            stats.removed.push(i);
            changed = true;
            continue;
        }
        if is_var(&q.res) {
            live.remove(&q.res);
        }
        if is_var(&q.arg1) {
            live.insert(q.arg1.clone());
        }
        if is_var(&q.arg2) {
            live.insert(q.arg2.clone());
        }
        keep.push(q.clone());
    }
    keep.reverse();
    (keep, changed)
}

/// Runs the fold/const-prop/copy-prop/DCE pipeline once over a single
/// block's quads, returning the rewritten quads and whether anything
/// changed.
pub fn optimize_block(quads: &[Quad], stats: &mut Stats) -> (Vec<Quad>, bool) {
    let mut block = quads.to_vec();
    let mut changed = false;
    changed |= fold_pass(&mut block, &mut stats.folding);
    changed |= const_prop_pass(&mut block, &mut stats.const_prop);
    changed |= copy_prop_pass(&mut block, &mut stats.copy_prop);
    let (block, dce_changed) = dce_pass(&block, &mut stats.dce);
    changed |= dce_changed;
    (block, changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_constant_arithmetic() {
        let quads = vec![Quad::new("ADD", "2", "3", "t1")];
        let mut stats = Stats::default();
        let (out, changed) = optimize_block(&quads, &mut stats);
        assert!(changed);
        // t1 is unused afterwards, so DCE removes the fold's own result too.
        assert!(out.is_empty());
        assert_eq!(stats.folding.replaced.len(), 1);
        assert_eq!(stats.dce.removed.len(), 1);
    }

    #[test]
    fn division_by_literal_zero_is_not_folded() {
        let quads = vec![Quad::new("DIV", "4", "0", "t1"), Quad::new("ASSIGN", "t1", "-", "x")];
        let mut stats = Stats::default();
        let (_out, _changed) = optimize_block(&quads, &mut stats);
        assert_eq!(stats.folding.replaced.len(), 0);
        assert_eq!(stats.folding.notes.len(), 1);
    }

    #[test]
    fn copy_propagation_follows_chains() {
        let quads = vec![
            Quad::new("ASSIGN", "5", "-", "a"),
            Quad::new("ASSIGN", "a", "-", "b"),
            Quad::new("ADD", "b", "1", "t1"),
            Quad::new("ASSIGN", "t1", "-", "x"),
        ];
        let mut stats = Stats::default();
        let (out, _changed) = optimize_block(&quads, &mut stats);
        let final_assign = out.iter().find(|q| q.res == "x").unwrap();
        assert_eq!(final_assign.op, "ASSIGN");
    }

    #[test]
    fn dce_never_removes_a_named_variable() {
        let quads = vec![Quad::new("ASSIGN", "1", "-", "x")];
        let mut stats = Stats::default();
        let (out, _changed) = optimize_block(&quads, &mut stats);
        assert_eq!(out.len(), 1);
    }
}
