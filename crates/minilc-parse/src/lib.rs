//! Table-driven shift/reduce parser: consumes a token stream against the
//! LALR(1) tables from `minilc-grammar` and builds a typed AST, emitting a
//! parse trace as a side effect.

pub mod ast;
pub mod driver;
pub mod trace;
pub mod value;

pub use ast::{ArithOp, BoolExpr, Expr, LogicOp, Program, RelOp, Stmt};
pub use driver::{parse, ParseResult};

#[cfg(test)]
mod tests {
    use super::*;
    use minilc_lex::Lexer;

    fn parse_src(src: &str) -> Program {
        let tokens = Lexer::tokenize(src).unwrap();
        parse(&tokens).unwrap().program
    }

    #[test]
    fn minimal_assignment() {
        let program = parse_src("x = 1 + 2;");
        assert_eq!(program.stmts.len(), 1);
        match &program.stmts[0] {
            Stmt::Assign { name, expr } => {
                assert_eq!(name, "x");
                assert_eq!(
                    *expr,
                    Expr::BinOp {
                        op: ArithOp::Add,
                        left: Box::new(Expr::Num("1".to_string())),
                        right: Box::new(Expr::Num("2".to_string())),
                    }
                );
            }
            other => panic!("expected Assign, got {other:?}"),
        }
    }

    #[test]
    fn if_else_without_braces() {
        let program = parse_src("if (a < b) x = 1; else x = 2;");
        match &program.stmts[0] {
            Stmt::If { then_branch, else_branch, .. } => {
                assert!(matches!(**then_branch, Stmt::Assign { .. }));
                assert!(else_branch.is_some());
            }
            other => panic!("expected If, got {other:?}"),
        }
    }

    #[test]
    fn dangling_else_binds_to_inner_if() {
        let program = parse_src("if (a<b) if (c<d) x=1; else x=2;");
        match &program.stmts[0] {
            Stmt::If { then_branch, else_branch, .. } => {
                assert!(else_branch.is_none());
                match &**then_branch {
                    Stmt::If { else_branch: inner_else, .. } => assert!(inner_else.is_some()),
                    other => panic!("expected nested If, got {other:?}"),
                }
            }
            other => panic!("expected If, got {other:?}"),
        }
    }

    #[test]
    fn short_circuit_or_builds_logic_op() {
        let program = parse_src("if (a<b or c<d) x=1;");
        match &program.stmts[0] {
            Stmt::If { cond, .. } => assert!(matches!(cond, BoolExpr::LogicOp { op: LogicOp::Or, .. })),
            other => panic!("expected If, got {other:?}"),
        }
    }

    #[test]
    fn while_loop_with_block_body() {
        let program = parse_src("while (i < 10) { i = i + 1; }");
        match &program.stmts[0] {
            Stmt::While { body, .. } => assert!(matches!(**body, Stmt::Block(_))),
            other => panic!("expected While, got {other:?}"),
        }
    }

    #[test]
    fn trace_has_header_and_one_line_per_step() {
        let tokens = Lexer::tokenize("x = 1;").unwrap();
        let result = parse(&tokens).unwrap();
        let mut lines = result.trace.lines();
        assert_eq!(lines.next().unwrap(), trace::TRACE_HEADER);
        assert!(lines.count() > 0);
    }

    #[test]
    fn unexpected_token_is_a_parse_error() {
        let tokens = Lexer::tokenize("x = ;").unwrap();
        let err = parse(&tokens).unwrap_err();
        assert!(matches!(err, minilc_util::CompileError::Parse { .. }));
    }

    #[test]
    fn empty_program_is_accepted() {
        let program = parse_src("");
        assert!(program.stmts.is_empty());
    }
}
