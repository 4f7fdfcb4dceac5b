//! Drives the block-local pass pipeline to a fixed point across the whole
//! quad stream and renders the `opt_report.txt` artifact.

use minilc_ir::Quad;
use minilc_util::CompileError;

use crate::cfg::{build_cfg, render_cfg, BasicBlock};
use crate::passes::{optimize_block, Stats};

const PIPELINE: [&str; 4] = ["Folding", "ConstProp", "CopyProp", "DCE"];
const MAX_ROUNDS: usize = 3;

pub struct OptimizeResult {
    pub quads: Vec<Quad>,
    pub blocks: Vec<BasicBlock>,
    pub report: String,
}

pub fn optimize(quads: Vec<Quad>) -> Result<OptimizeResult, CompileError> {
    let before = quads.len();
    let mut current = quads;
    let mut stats = Stats::default();

    for _ in 0..MAX_ROUNDS {
        let blocks = build_cfg(&current)?;
        let mut changed = false;
        let mut rewritten = Vec::with_capacity(current.len());
        for blk in &blocks {
            let (optimized, blk_changed) = optimize_block(&blk.quads, &mut stats);
            changed |= blk_changed;
            rewritten.extend(optimized);
        }
        current = rewritten;
        if !changed {
            break;
        }
    }

    let blocks = build_cfg(&current)?;
    let report = render_report(&stats, before, current.len(), &blocks);
    Ok(OptimizeResult { quads: current, blocks, report })
}

fn render_report(stats: &Stats, before: usize, after: usize, blocks: &[BasicBlock]) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Pass pipeline: {}", PIPELINE.join(" -> ")));
    lines.push(format!("Stats: quads_before={before}, quads_after={after}"));

    let per_pass = [&stats.folding, &stats.const_prop, &stats.copy_prop, &stats.dce];
    let removed_count: usize = per_pass.iter().map(|p| p.removed.len()).sum();
    let replaced_count: usize = per_pass.iter().map(|p| p.replaced.len()).sum();
    lines.push(format!("removed_count={removed_count}, replaced_count={replaced_count}"));
    lines.push(String::new());

    lines.push("Basic blocks:".to_string());
    for line in render_cfg(blocks).lines() {
        lines.push(format!("  {line}"));
    }
    lines.push(String::new());

    lines.push("Changes:".to_string());
    for (name, ps) in PIPELINE.iter().zip(per_pass.iter()) {
        for (orig, old, new) in &ps.replaced {
            lines.push(format!("[{name}] replaced: {orig} {old} -> {new}"));
        }
        for orig in &ps.removed {
            lines.push(format!("[{name}] removed: {orig}"));
        }
        for note in &ps.notes {
            lines.push(format!("[{name}] note: {note}"));
        }
    }

    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_program_optimizes_to_nothing() {
        let result = optimize(Vec::new()).unwrap();
        assert!(result.quads.is_empty());
        assert!(result.report.contains("quads_before=0, quads_after=0"));
    }

    #[test]
    fn dead_temporary_is_removed_and_reported() {
        let quads = vec![
            Quad::new("ADD", "1", "2", "t1"),
            Quad::new("ASSIGN", "5", "-", "x"),
        ];
        let result = optimize(quads).unwrap();
        assert!(result.quads.iter().all(|q| q.res != "t1"));
        assert!(result.report.contains("[DCE] removed:"));
    }

    #[test]
    fn report_lists_every_pass_in_order() {
        let result = optimize(vec![Quad::new("ASSIGN", "1", "-", "x")]).unwrap();
        let header = result.report.lines().next().unwrap();
        assert_eq!(header, "Pass pipeline: Folding -> ConstProp -> CopyProp -> DCE");
    }

    #[test]
    fn fixed_point_is_reached_within_the_round_budget() {
        // a chain of copies collapses over multiple rounds of copy-prop + DCE
        let quads = vec![
            Quad::new("ASSIGN", "1", "-", "a"),
            Quad::new("ASSIGN", "a", "-", "b"),
            Quad::new("ASSIGN", "b", "-", "c"),
            Quad::new("ASSIGN", "c", "-", "d"),
        ];
        let result = optimize(quads).unwrap();
        let final_assign = result.quads.iter().find(|q| q.res == "d").unwrap();
        assert_eq!(final_assign.arg1, "1");
    }
}
