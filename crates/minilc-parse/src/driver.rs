//! The three-stack shift/reduce engine and per-production AST construction.

use minilc_grammar::{production, tables, Action};
use minilc_lex::{Token, TokenType};
use minilc_util::{CompileError, CompileResult};

use crate::ast::{ArithOp, BoolExpr, Expr, LogicOp, Program, RelOp, Stmt};
use crate::trace::{display_remaining, ParseStep, TRACE_HEADER};
use crate::value::ParseValue;

#[derive(Debug)]
pub struct ParseResult {
    pub trace: String,
    pub program: Program,
}

/// Appends the synthetic EOF sentinel the grammar's augmented start
/// production requires; its line/col sit just past the last real token.
fn append_eof(tokens: &[Token]) -> Vec<Token> {
    let (line, col) = match tokens.last() {
        Some(last) => (last.line, last.col + last.lexeme.len() as u32),
        None => (1, 1),
    };
    let mut out = tokens.to_vec();
    out.push(Token::new(tokens.len(), TokenType::Eof, "", line, col));
    out
}

/// Parses a token stream (without EOF) into an AST, emitting a parse trace
/// as a side effect.
pub fn parse(tokens: &[Token]) -> CompileResult<ParseResult> {
    let grammar_tables = tables()?;
    let tokens = append_eof(tokens);

    let mut state_stack: Vec<usize> = vec![0];
    let mut symbol_stack: Vec<&'static str> = Vec::new();
    let mut value_stack: Vec<ParseValue> = Vec::new();
    let mut steps: Vec<ParseStep> = Vec::new();
    let mut pos = 0usize;

    loop {
        let state = *state_stack.last().unwrap();
        let lookahead = &tokens[pos];
        let la_type = token_type_name(lookahead.ty);
        let action = grammar_tables.action.get(&state).and_then(|row| row.get(la_type));

        let remaining = display_remaining(&tokens[pos..]);
        steps.push(ParseStep {
            step: steps.len(),
            state_stack: state_stack.clone(),
            symbol_stack: symbol_stack.iter().map(|s| s.to_string()).collect(),
            remaining,
            action: action.map(|a| a.encode()).unwrap_or_else(|| "error".to_string()),
        });

        let action = match action {
            Some(a) => a.clone(),
            None => {
                let mut expected: Vec<&str> = grammar_tables
                    .action
                    .get(&state)
                    .map(|row| row.keys().copied().collect())
                    .unwrap_or_default();
                expected.sort();
                let expected_str = if expected.is_empty() {
                    "<none>".to_string()
                } else {
                    expected.join(", ")
                };
                return Err(CompileError::Parse {
                    line: lookahead.line,
                    col: lookahead.col,
                    expected: expected_str,
                    found: lookahead.display(),
                });
            }
        };

        match action {
            Action::Accept => break,
            Action::Shift(next_state) => {
                symbol_stack.push(la_type);
                value_stack.push(ParseValue::Token(lookahead.clone()));
                state_stack.push(next_state);
                if lookahead.ty != TokenType::Eof {
                    pos += 1;
                }
            }
            Action::Reduce(prod_id) => {
                let prod = production(prod_id);
                let rhs_len = prod.rhs.len();
                let rhs_vals: Vec<ParseValue> = if rhs_len > 0 {
                    let split_at = value_stack.len() - rhs_len;
                    let drained: Vec<_> = value_stack.split_off(split_at);
                    state_stack.truncate(state_stack.len() - rhs_len);
                    symbol_stack.truncate(symbol_stack.len() - rhs_len);
                    drained
                } else {
                    Vec::new()
                };
                let goto_state = grammar_tables
                    .goto
                    .get(state_stack.last().unwrap())
                    .and_then(|row| row.get(prod.lhs))
                    .copied()
                    .ok_or_else(|| {
                        CompileError::internal(format!(
                            "goto missing for state {} on {}",
                            state_stack.last().unwrap(),
                            prod.lhs
                        ))
                    })?;
                symbol_stack.push(prod.lhs);
                state_stack.push(goto_state);
                value_stack.push(build_node(prod_id, rhs_vals));
            }
        }
    }

    let program = value_stack
        .pop()
        .ok_or_else(|| CompileError::internal("parser accepted without producing a Program"))?
        .into_program();

    let mut lines = vec![TRACE_HEADER.to_string()];
    lines.extend(steps.iter().map(|s| s.format()));
    lines.push(String::new());

    Ok(ParseResult {
        trace: lines.join("\n"),
        program,
    })
}

fn token_type_name(ty: TokenType) -> &'static str {
    match ty {
        TokenType::Id => "ID",
        TokenType::Num => "NUM",
        TokenType::If => "IF",
        TokenType::Else => "ELSE",
        TokenType::While => "WHILE",
        TokenType::And => "AND",
        TokenType::Or => "OR",
        TokenType::Not => "NOT",
        TokenType::Assign => "ASSIGN",
        TokenType::Plus => "PLUS",
        TokenType::Minus => "MINUS",
        TokenType::Mul => "MUL",
        TokenType::Div => "DIV",
        TokenType::Eq => "EQ",
        TokenType::Ne => "NE",
        TokenType::Lt => "LT",
        TokenType::Gt => "GT",
        TokenType::LParen => "LPAREN",
        TokenType::RParen => "RPAREN",
        TokenType::LBrace => "LBRACE",
        TokenType::RBrace => "RBRACE",
        TokenType::Semi => "SEMI",
        TokenType::Eof => "EOF",
    }
}

/// Exhaustive production -> AST-node mapping. Productions with no AST
/// payload of their own (pure forwarding rules) return whatever their
/// single child built.
fn build_node(prod_id: u32, mut vals: Vec<ParseValue>) -> ParseValue {
    match prod_id {
        1 => take(&mut vals, 0), // S' -> Program EOF: EOF carries no payload, Program is vals[0]
        2 => ParseValue::Program(Program {
            stmts: take(&mut vals, 0).into_stmt_list(),
        }),
        3 => {
            let mut rest = take(&mut vals, 1).into_stmt_list();
            let stmt = take(&mut vals, 0).into_stmt();
            rest.insert(0, stmt);
            ParseValue::StmtList(rest)
        }
        4 => ParseValue::StmtList(Vec::new()),
        5 | 6 => ParseValue::Stmt(take(&mut vals, 0).into_stmt()),
        7 => ParseValue::Stmt(take(&mut vals, 0).into_stmt()),
        8 => {
            let cond = take(&mut vals, 2).into_bool();
            let body = take(&mut vals, 4).into_stmt();
            ParseValue::Stmt(Stmt::While { cond, body: Box::new(body) })
        }
        9 => ParseValue::Stmt(take(&mut vals, 0).into_stmt()),
        10 => {
            let cond = take(&mut vals, 2).into_bool();
            let then_branch = take(&mut vals, 4).into_stmt();
            let else_branch = take(&mut vals, 6).into_stmt();
            ParseValue::Stmt(Stmt::If {
                cond,
                then_branch: Box::new(then_branch),
                else_branch: Some(Box::new(else_branch)),
            })
        }
        11 => {
            let cond = take(&mut vals, 2).into_bool();
            let then_branch = take(&mut vals, 4).into_stmt();
            ParseValue::Stmt(Stmt::If {
                cond,
                then_branch: Box::new(then_branch),
                else_branch: None,
            })
        }
        12 => {
            let cond = take(&mut vals, 2).into_bool();
            let then_branch = take(&mut vals, 4).into_stmt();
            let else_branch = take(&mut vals, 6).into_stmt();
            ParseValue::Stmt(Stmt::If {
                cond,
                then_branch: Box::new(then_branch),
                else_branch: Some(Box::new(else_branch)),
            })
        }
        13 => {
            let cond = take(&mut vals, 2).into_bool();
            let body = take(&mut vals, 4).into_stmt();
            ParseValue::Stmt(Stmt::While { cond, body: Box::new(body) })
        }
        14 => {
            let name = take(&mut vals, 0).into_token().lexeme;
            let expr = take(&mut vals, 2).into_expr();
            ParseValue::Stmt(Stmt::Assign { name, expr })
        }
        15 => ParseValue::Stmt(Stmt::Block(take(&mut vals, 1).into_stmt_list())),
        16 | 17 => {
            let op = if prod_id == 16 { ArithOp::Add } else { ArithOp::Sub };
            let left = take(&mut vals, 0).into_expr();
            let right = take(&mut vals, 2).into_expr();
            ParseValue::Expr(Expr::BinOp { op, left: Box::new(left), right: Box::new(right) })
        }
        18 => ParseValue::Expr(take(&mut vals, 0).into_expr()),
        19 | 20 => {
            let op = if prod_id == 19 { ArithOp::Mul } else { ArithOp::Div };
            let left = take(&mut vals, 0).into_expr();
            let right = take(&mut vals, 2).into_expr();
            ParseValue::Expr(Expr::BinOp { op, left: Box::new(left), right: Box::new(right) })
        }
        21 => ParseValue::Expr(take(&mut vals, 0).into_expr()),
        22 => ParseValue::Expr(Expr::Id(take(&mut vals, 0).into_token().lexeme)),
        23 => ParseValue::Expr(Expr::Num(take(&mut vals, 0).into_token().lexeme)),
        24 => ParseValue::Expr(take(&mut vals, 1).into_expr()),
        25 => ParseValue::Bool(take(&mut vals, 0).into_bool()),
        26 => {
            let left = take(&mut vals, 0).into_bool();
            let right = take(&mut vals, 2).into_bool();
            ParseValue::Bool(BoolExpr::LogicOp { op: LogicOp::Or, left: Box::new(left), right: Box::new(right) })
        }
        27 => ParseValue::Bool(take(&mut vals, 0).into_bool()),
        28 => {
            let left = take(&mut vals, 0).into_bool();
            let right = take(&mut vals, 2).into_bool();
            ParseValue::Bool(BoolExpr::LogicOp { op: LogicOp::And, left: Box::new(left), right: Box::new(right) })
        }
        29 => ParseValue::Bool(take(&mut vals, 0).into_bool()),
        30 => ParseValue::Bool(BoolExpr::Not(Box::new(take(&mut vals, 1).into_bool()))),
        31 => ParseValue::Bool(take(&mut vals, 1).into_bool()),
        32 => ParseValue::Bool(take(&mut vals, 0).into_bool()),
        33..=36 => {
            let op = match prod_id {
                33 => RelOp::Eq,
                34 => RelOp::Ne,
                35 => RelOp::Lt,
                _ => RelOp::Gt,
            };
            let left = take(&mut vals, 0).into_expr();
            let right = take(&mut vals, 2).into_expr();
            ParseValue::Bool(BoolExpr::RelOp { op, left, right })
        }
        other => unreachable!("production {other} has no AST construction rule"),
    }
}

/// Takes ownership of `vals[index]`, replacing it with a dummy placeholder.
/// Every index is read exactly once per call by construction of the table
/// above, so the placeholder is never observed.
fn take(vals: &mut [ParseValue], index: usize) -> ParseValue {
    std::mem::replace(&mut vals[index], ParseValue::StmtList(Vec::new()))
}
