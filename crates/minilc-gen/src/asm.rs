//! Stack-machine assembly emission.
//!
//! Each quad lowers to a short instruction sequence operating on an
//! implicit value stack: operands are pushed (`PUSH` for literals, `LOAD`
//! for named locations), the operator consumes them, and the result is
//! stored back by name.

use std::collections::HashSet;

use minilc_ir::Quad;
use minilc_util::CompileError;

/// Checks that every label a `GOTO`/`IF_*` targets is defined somewhere
/// in the stream. Codegen runs on quads that may have been hand-edited
/// or re-parsed from a text artifact, so this isn't guaranteed by
/// construction the way it is right after IR generation.
pub fn validate_labels(quads: &[Quad]) -> Result<(), CompileError> {
    let defined: HashSet<&str> = quads.iter().filter(|q| q.is_label()).map(|q| q.res.as_str()).collect();
    let mut missing: Vec<&str> =
        quads.iter().filter(|q| q.is_branch()).map(|q| q.res.as_str()).filter(|r| !defined.contains(r)).collect();
    missing.sort_unstable();
    missing.dedup();
    if let Some(&name) = missing.first() {
        return Err(CompileError::UndefinedLabel { name: name.to_string() });
    }
    Ok(())
}

fn emit_load(val: &str, out: &mut Vec<String>) {
    if val == "-" || val.is_empty() {
        return;
    }
    let is_literal = val.strip_prefix('-').unwrap_or(val).bytes().all(|b| b.is_ascii_digit())
        && !val.strip_prefix('-').unwrap_or(val).is_empty();
    if is_literal {
        out.push(format!("PUSH {val}"));
    } else {
        out.push(format!("LOAD {val}"));
    }
}

fn cmp_mnemonic(op: &str) -> &'static str {
    match op {
        "IF_GT" => "GT",
        "IF_LT" => "LT",
        "IF_EQ" => "EQ",
        "IF_NE" => "NE",
        other => unreachable!("cmp_mnemonic called with non-comparison op {other}"),
    }
}

/// Translates a validated quad stream into assembly text, one instruction
/// per line, terminated by `HALT`.
pub fn generate(quads: &[Quad]) -> Result<String, CompileError> {
    validate_labels(quads)?;
    let mut lines = Vec::new();
    for q in quads {
        match q.op.as_str() {
            "LABEL" => lines.push(format!("{}:", q.res)),
            "GOTO" => lines.push(format!("JMP {}", q.res)),
            "ASSIGN" => {
                emit_load(&q.arg1, &mut lines);
                lines.push(format!("STORE {}", q.res));
            }
            "ADD" | "SUB" | "MUL" | "DIV" => {
                emit_load(&q.arg1, &mut lines);
                emit_load(&q.arg2, &mut lines);
                lines.push(q.op.clone());
                lines.push(format!("STORE {}", q.res));
            }
            "IF_GT" | "IF_LT" | "IF_EQ" | "IF_NE" => {
                emit_load(&q.arg1, &mut lines);
                emit_load(&q.arg2, &mut lines);
                lines.push(cmp_mnemonic(&q.op).to_string());
                lines.push(format!("JNZ {}", q.res));
            }
            other => {
                return Err(CompileError::internal(format!("unsupported quad op {other}")));
            }
        }
    }
    lines.push("HALT".to_string());
    Ok(lines.join("\n") + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_loads_a_literal_and_stores() {
        let quads = vec![Quad::new("ASSIGN", "1", "-", "x")];
        let asm = generate(&quads).unwrap();
        assert_eq!(asm, "PUSH 1\nSTORE x\nHALT\n");
    }

    #[test]
    fn arithmetic_pushes_both_operands_before_the_op() {
        let quads = vec![Quad::new("ADD", "x", "1", "t1")];
        let asm = generate(&quads).unwrap();
        assert_eq!(asm, "LOAD x\nPUSH 1\nADD\nSTORE t1\nHALT\n");
    }

    #[test]
    fn comparison_lowers_to_a_conditional_jump() {
        let quads = vec![Quad::new("IF_LT", "a", "b", "L1"), Quad::new("LABEL", "-", "-", "L1")];
        let asm = generate(&quads).unwrap();
        assert_eq!(asm, "LOAD a\nLOAD b\nLT\nJNZ L1\nL1:\nHALT\n");
    }

    #[test]
    fn a_branch_to_an_undefined_label_is_rejected() {
        let quads = vec![Quad::new("GOTO", "-", "-", "Lmissing")];
        assert!(generate(&quads).is_err());
    }

    #[test]
    fn a_negative_literal_is_pushed_not_loaded() {
        let quads = vec![Quad::new("ASSIGN", "-5", "-", "x")];
        let asm = generate(&quads).unwrap();
        assert_eq!(asm, "PUSH -5\nSTORE x\nHALT\n");
    }
}
