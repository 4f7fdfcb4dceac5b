//! The parser's value stack mixes raw tokens (terminal shifts) and AST
//! fragments (nonterminal reductions); `ParseValue` is the tagged union
//! that lets each reduction match exhaustively on what it expects to find.

use minilc_lex::Token;

use crate::ast::{BoolExpr, Expr, Program, Stmt};

#[derive(Debug, Clone)]
pub enum ParseValue {
    Token(Token),
    Expr(Expr),
    Bool(BoolExpr),
    Stmt(Stmt),
    StmtList(Vec<Stmt>),
    Program(Program),
}

impl ParseValue {
    pub fn into_token(self) -> Token {
        match self {
            ParseValue::Token(t) => t,
            other => unreachable!("expected Token value, got {other:?}"),
        }
    }

    pub fn into_expr(self) -> Expr {
        match self {
            ParseValue::Expr(e) => e,
            other => unreachable!("expected Expr value, got {other:?}"),
        }
    }

    pub fn into_bool(self) -> BoolExpr {
        match self {
            ParseValue::Bool(b) => b,
            other => unreachable!("expected BoolExpr value, got {other:?}"),
        }
    }

    pub fn into_stmt(self) -> Stmt {
        match self {
            ParseValue::Stmt(s) => s,
            other => unreachable!("expected Stmt value, got {other:?}"),
        }
    }

    pub fn into_stmt_list(self) -> Vec<Stmt> {
        match self {
            ParseValue::StmtList(s) => s,
            other => unreachable!("expected StmtList value, got {other:?}"),
        }
    }

    pub fn into_program(self) -> Program {
        match self {
            ParseValue::Program(p) => p,
            other => unreachable!("expected Program value, got {other:?}"),
        }
    }
}
