//! Leader-based basic block construction over a flat quad stream.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use minilc_ir::Quad;
use minilc_util::CompileError;

#[derive(Debug, Clone)]
pub struct BasicBlock {
    pub id: usize,
    pub start: usize,
    pub end: usize,
    pub succs: Vec<usize>,
    pub quads: Vec<Quad>,
}

/// Splits `quads` into maximal straight-line blocks. A leader is quad 0,
/// any `LABEL`, or the quad right after a branch; a block's successors
/// come from its last quad's branch target(s) or fallthrough.
pub fn build_cfg(quads: &[Quad]) -> Result<Vec<BasicBlock>, CompileError> {
    if quads.is_empty() {
        return Ok(Vec::new());
    }

    let mut label_to_idx: BTreeMap<&str, usize> = BTreeMap::new();
    for (idx, q) in quads.iter().enumerate() {
        if q.is_label() {
            label_to_idx.insert(q.res.as_str(), idx);
        }
    }

    let mut leaders: BTreeSet<usize> = BTreeSet::new();
    leaders.insert(0);
    for (idx, q) in quads.iter().enumerate() {
        if q.is_label() {
            leaders.insert(idx);
        }
        if q.is_branch() {
            if idx + 1 < quads.len() {
                leaders.insert(idx + 1);
            }
            if q.res != "-" {
                let target = *label_to_idx
                    .get(q.res.as_str())
                    .ok_or_else(|| CompileError::internal(format!("label {} not found", q.res)))?;
                leaders.insert(target);
            }
        }
    }

    let leader_list: Vec<usize> = leaders.into_iter().collect();
    let mut quad_to_block: HashMap<usize, usize> = HashMap::new();
    let mut blocks = Vec::with_capacity(leader_list.len());
    for (bid, &start) in leader_list.iter().enumerate() {
        let end = if bid + 1 < leader_list.len() {
            leader_list[bid + 1] - 1
        } else {
            quads.len() - 1
        };
        for idx in start..=end {
            quad_to_block.insert(idx, bid);
        }
        blocks.push(BasicBlock {
            id: bid,
            start,
            end,
            succs: Vec::new(),
            quads: quads[start..=end].to_vec(),
        });
    }

    let block_count = blocks.len();
    for blk in &mut blocks {
        let last = blk.quads.last().expect("a block always has at least one quad");
        if last.op.starts_with("IF_") {
            let target_idx = *label_to_idx
                .get(last.res.as_str())
                .ok_or_else(|| CompileError::internal(format!("label {} not found", last.res)))?;
            let mut succs = vec![quad_to_block[&target_idx]];
            let fall = blk.id + 1;
            if fall < block_count {
                succs.push(fall);
            }
            succs.sort_unstable();
            succs.dedup();
            blk.succs = succs;
        } else if last.op == "GOTO" {
            let target_idx = *label_to_idx
                .get(last.res.as_str())
                .ok_or_else(|| CompileError::internal(format!("label {} not found", last.res)))?;
            blk.succs = vec![quad_to_block[&target_idx]];
        } else {
            let fall = blk.id + 1;
            blk.succs = if fall < block_count { vec![fall] } else { vec![] };
        }
    }

    Ok(blocks)
}

/// Renders the `cfg.txt`-style block listing used in the optimizer report.
pub fn render_cfg(blocks: &[BasicBlock]) -> String {
    let mut out = String::new();
    for blk in blocks {
        let succs = blk.succs.iter().map(|s| format!("B{s}")).collect::<Vec<_>>().join(",");
        out.push_str(&format!("B{}: {}..{} succs=[{}]\n", blk.id, blk.start, blk.end, succs));
        for (offset, q) in blk.quads.iter().enumerate() {
            out.push_str(&format!("  {}\n", q.render(blk.start + offset)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use minilc_ir::Quad;

    fn q(op: &str, a1: &str, a2: &str, res: &str) -> Quad {
        Quad::new(op, a1, a2, res)
    }

    #[test]
    fn straight_line_code_is_a_single_block() {
        let quads = vec![q("ADD", "1", "2", "t1"), q("ASSIGN", "t1", "-", "x")];
        let blocks = build_cfg(&quads).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].succs, Vec::<usize>::new());
    }

    #[test]
    fn a_label_starts_a_new_block() {
        let quads = vec![q("GOTO", "-", "-", "L1"), q("LABEL", "-", "-", "L1"), q("ASSIGN", "1", "-", "x")];
        let blocks = build_cfg(&quads).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].succs, vec![1]);
    }

    #[test]
    fn a_conditional_branch_has_two_successors() {
        let quads = vec![
            q("IF_LT", "a", "b", "L1"),
            q("ASSIGN", "0", "-", "x"),
            q("GOTO", "-", "-", "L2"),
            q("LABEL", "-", "-", "L1"),
            q("ASSIGN", "1", "-", "x"),
            q("LABEL", "-", "-", "L2"),
        ];
        let blocks = build_cfg(&quads).unwrap();
        assert_eq!(blocks[0].succs, vec![1, 2]);
    }

    #[test]
    fn a_goto_to_a_missing_label_is_an_internal_error() {
        let quads = vec![q("GOTO", "-", "-", "Lmissing")];
        let err = build_cfg(&quads).unwrap_err();
        assert!(matches!(err, CompileError::Internal { .. }));
    }
}
