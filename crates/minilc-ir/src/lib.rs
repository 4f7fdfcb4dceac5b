//! Lowers the parser's AST to three-address quadruples with backpatched
//! control flow.

pub mod builder;
pub mod lower;
pub mod quad;

pub use lower::generate;
pub use quad::{parse_quads, render_quads, Quad};

#[cfg(test)]
mod tests {
    use super::*;
    use minilc_lex::Lexer;
    use minilc_parse::parse;

    fn ir_for(src: &str) -> Vec<Quad> {
        let tokens = Lexer::tokenize(src).unwrap();
        let program = parse(&tokens).unwrap().program;
        generate(&program)
    }

    #[test]
    fn minimal_assignment_ir() {
        let quads = ir_for("x = 1 + 2;");
        assert_eq!(quads, vec![
            Quad::new("ADD", "1", "2", "t1"),
            Quad::new("ASSIGN", "t1", "-", "x"),
        ]);
    }

    #[test]
    fn if_else_emits_matching_labels() {
        let quads = ir_for("if (a < b) x = 1; else x = 2;");
        let cond = quads.iter().find(|q| q.op == "IF_LT").unwrap();
        let goto_count = quads.iter().filter(|q| q.op == "GOTO").count();
        assert_eq!(goto_count, 1);
        assert_ne!(cond.res, "-");
        // every branch target exists as a LABEL
        for q in &quads {
            if q.is_branch() {
                assert!(quads.iter().any(|l| l.is_label() && l.res == q.res));
            }
        }
    }

    #[test]
    fn short_circuit_or_merges_true_lists() {
        let quads = ir_for("if (a<b or c<d) x=1;");
        let cond_quads: Vec<_> = quads.iter().filter(|q| q.op == "IF_LT").collect();
        assert_eq!(cond_quads.len(), 2);
        // both conditions' true branches land on the same then-label
        assert_eq!(cond_quads[0].res, cond_quads[1].res);
    }

    #[test]
    fn while_loop_jumps_back_to_condition() {
        let quads = ir_for("while (i < 10) { i = i + 1; }");
        let start_label = quads.iter().find(|q| q.is_label()).unwrap().res.clone();
        let back_edge = quads.iter().rev().find(|q| q.op == "GOTO").unwrap();
        assert_eq!(back_edge.res, start_label);
    }

    #[test]
    fn no_quad_is_left_unpatched() {
        let quads = ir_for("if (a<b) if (c<d) x=1; else x=2;");
        for q in &quads {
            if q.is_branch() {
                assert_ne!(q.res, "-");
            }
        }
    }

    #[test]
    fn render_and_parse_round_trip() {
        let quads = ir_for("x = 1 + 2;");
        let text = render_quads(&quads);
        let parsed = parse_quads(&text).unwrap();
        assert_eq!(parsed, quads);
    }
}
