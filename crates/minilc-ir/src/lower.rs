//! Lowers the AST to quads using the classic Dragon-Book backpatching
//! scheme for control flow and short-circuit boolean evaluation.

use minilc_parse::{ArithOp, BoolExpr, Expr, LogicOp, Program, RelOp, Stmt};

use crate::builder::IrBuilder;
use crate::quad::{Quad, BLANK};

/// The two backpatch lists a boolean expression leaves behind: quad
/// indices whose `res` field still needs the "branch taken" and
/// "fall through" targets respectively.
struct BoolCode {
    true_list: Vec<usize>,
    false_list: Vec<usize>,
}

pub fn generate(program: &Program) -> Vec<Quad> {
    let mut b = IrBuilder::new();
    for stmt in &program.stmts {
        gen_stmt(stmt, &mut b);
    }
    b.into_quads()
}

fn gen_stmt(stmt: &Stmt, b: &mut IrBuilder) {
    match stmt {
        Stmt::Assign { name, expr } => {
            let place = gen_expr(expr, b);
            b.emit("ASSIGN", &place, BLANK, name);
        }
        Stmt::Block(stmts) => {
            for s in stmts {
                gen_stmt(s, b);
            }
        }
        Stmt::If { cond, then_branch, else_branch } => {
            let cond_code = gen_bool(cond, b);
            let then_label = b.new_label();
            b.backpatch(&cond_code.true_list, &then_label);
            b.emit_label(&then_label);
            gen_stmt(then_branch, b);
            match else_branch {
                Some(else_stmt) => {
                    let end_label = b.new_label();
                    b.emit("GOTO", BLANK, BLANK, &end_label);
                    let else_label = b.new_label();
                    b.backpatch(&cond_code.false_list, &else_label);
                    b.emit_label(&else_label);
                    gen_stmt(else_stmt, b);
                    b.emit_label(&end_label);
                }
                None => {
                    let end_label = b.new_label();
                    b.backpatch(&cond_code.false_list, &end_label);
                    b.emit_label(&end_label);
                }
            }
        }
        Stmt::While { cond, body } => {
            let start_label = b.new_label();
            b.emit_label(&start_label);
            let cond_code = gen_bool(cond, b);
            let body_label = b.new_label();
            b.backpatch(&cond_code.true_list, &body_label);
            b.emit_label(&body_label);
            gen_stmt(body, b);
            b.emit("GOTO", BLANK, BLANK, &start_label);
            let end_label = b.new_label();
            b.backpatch(&cond_code.false_list, &end_label);
            b.emit_label(&end_label);
        }
    }
}

/// Computes an expression into a "place": a variable name, a numeric
/// literal, or a fresh temporary holding the result of a binary op.
fn gen_expr(expr: &Expr, b: &mut IrBuilder) -> String {
    match expr {
        Expr::Id(name) => name.clone(),
        Expr::Num(value) => value.clone(),
        Expr::BinOp { op, left, right } => {
            let l = gen_expr(left, b);
            let r = gen_expr(right, b);
            let res = b.new_temp();
            b.emit(arith_quad_op(*op), &l, &r, &res);
            res
        }
    }
}

fn arith_quad_op(op: ArithOp) -> &'static str {
    op.quad_op()
}

fn gen_bool(node: &BoolExpr, b: &mut IrBuilder) -> BoolCode {
    match node {
        BoolExpr::RelOp { op, left, right } => {
            let l = gen_expr(left, b);
            let r = gen_expr(right, b);
            let idx_true = b.emit(rel_quad_op(*op), &l, &r, BLANK);
            let idx_false = b.emit("GOTO", BLANK, BLANK, BLANK);
            BoolCode {
                true_list: IrBuilder::makelist(idx_true),
                false_list: IrBuilder::makelist(idx_false),
            }
        }
        BoolExpr::LogicOp { op: LogicOp::Or, left, right } => {
            let left_code = gen_bool(left, b);
            let join_label = b.new_label();
            b.backpatch(&left_code.false_list, &join_label);
            b.emit_label(&join_label);
            let right_code = gen_bool(right, b);
            BoolCode {
                true_list: IrBuilder::merge(left_code.true_list, right_code.true_list),
                false_list: right_code.false_list,
            }
        }
        BoolExpr::LogicOp { op: LogicOp::And, left, right } => {
            let left_code = gen_bool(left, b);
            let join_label = b.new_label();
            b.backpatch(&left_code.true_list, &join_label);
            b.emit_label(&join_label);
            let right_code = gen_bool(right, b);
            BoolCode {
                true_list: right_code.true_list,
                false_list: IrBuilder::merge(left_code.false_list, right_code.false_list),
            }
        }
        BoolExpr::Not(inner) => {
            let inner_code = gen_bool(inner, b);
            BoolCode {
                true_list: inner_code.false_list,
                false_list: inner_code.true_list,
            }
        }
    }
}

fn rel_quad_op(op: RelOp) -> &'static str {
    op.quad_op()
}
