//! The fixed MiniLang grammar: terminals, nonterminals, and productions.

/// One grammar rule, `lhs -> rhs` (an empty `rhs` is an epsilon production).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub id: u32,
    pub lhs: &'static str,
    pub rhs: &'static [&'static str],
}

pub const AUGMENTED_START: &str = "S'";
pub const EOF: &str = "EOF";

pub const TERMINALS: &[&str] = &[
    "IF", "ELSE", "WHILE", "AND", "OR", "NOT", "ID", "NUM", "ASSIGN", "PLUS", "MINUS", "MUL",
    "DIV", "EQ", "NE", "LT", "GT", "LPAREN", "RPAREN", "LBRACE", "RBRACE", "SEMI", "EOF",
];

pub const NONTERMINALS: &[&str] = &[
    "S'", "Program", "StmtList", "Stmt", "Matched", "Unmatched", "AssignStmt", "Block", "Expr",
    "Term", "Factor", "Bool", "OrExpr", "AndExpr", "NotExpr", "RelExpr",
];

macro_rules! prod {
    ($id:expr, $lhs:expr $(, $rhs:expr)* $(,)?) => {
        Production { id: $id, lhs: $lhs, rhs: &[$($rhs),*] }
    };
}

pub const PRODUCTIONS: &[Production] = &[
    prod!(1, "S'", "Program", "EOF"),
    prod!(2, "Program", "StmtList"),
    prod!(3, "StmtList", "Stmt", "StmtList"),
    prod!(4, "StmtList"),
    prod!(5, "Stmt", "Matched"),
    prod!(6, "Stmt", "Unmatched"),
    prod!(7, "Matched", "AssignStmt"),
    prod!(8, "Matched", "WHILE", "LPAREN", "Bool", "RPAREN", "Matched"),
    prod!(9, "Matched", "Block"),
    prod!(
        10, "Matched", "IF", "LPAREN", "Bool", "RPAREN", "Matched", "ELSE", "Matched"
    ),
    prod!(11, "Unmatched", "IF", "LPAREN", "Bool", "RPAREN", "Stmt"),
    prod!(
        12, "Unmatched", "IF", "LPAREN", "Bool", "RPAREN", "Matched", "ELSE", "Unmatched"
    ),
    prod!(13, "Unmatched", "WHILE", "LPAREN", "Bool", "RPAREN", "Unmatched"),
    prod!(14, "AssignStmt", "ID", "ASSIGN", "Expr", "SEMI"),
    prod!(15, "Block", "LBRACE", "StmtList", "RBRACE"),
    prod!(16, "Expr", "Expr", "PLUS", "Term"),
    prod!(17, "Expr", "Expr", "MINUS", "Term"),
    prod!(18, "Expr", "Term"),
    prod!(19, "Term", "Term", "MUL", "Factor"),
    prod!(20, "Term", "Term", "DIV", "Factor"),
    prod!(21, "Term", "Factor"),
    prod!(22, "Factor", "ID"),
    prod!(23, "Factor", "NUM"),
    prod!(24, "Factor", "LPAREN", "Expr", "RPAREN"),
    prod!(25, "Bool", "OrExpr"),
    prod!(26, "OrExpr", "OrExpr", "OR", "AndExpr"),
    prod!(27, "OrExpr", "AndExpr"),
    prod!(28, "AndExpr", "AndExpr", "AND", "NotExpr"),
    prod!(29, "AndExpr", "NotExpr"),
    prod!(30, "NotExpr", "NOT", "NotExpr"),
    prod!(31, "NotExpr", "LPAREN", "Bool", "RPAREN"),
    prod!(32, "NotExpr", "RelExpr"),
    prod!(33, "RelExpr", "Expr", "EQ", "Expr"),
    prod!(34, "RelExpr", "Expr", "NE", "Expr"),
    prod!(35, "RelExpr", "Expr", "LT", "Expr"),
    prod!(36, "RelExpr", "Expr", "GT", "Expr"),
];

pub fn production(id: u32) -> &'static Production {
    &PRODUCTIONS[(id - 1) as usize]
}

pub fn productions_for(lhs: &str) -> impl Iterator<Item = &'static Production> + use<'_> {
    PRODUCTIONS.iter().filter(move |p| p.lhs == lhs)
}

/// Renders `id: LHS -> RHS1 RHS2 | ε` for the `productions.txt` artifact.
pub fn format_production(p: &Production) -> String {
    if p.rhs.is_empty() {
        format!("{}: {} -> ε", p.id, p.lhs)
    } else {
        format!("{}: {} -> {}", p.id, p.lhs, p.rhs.join(" "))
    }
}
