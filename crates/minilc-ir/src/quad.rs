//! The quadruple: the four-field intermediate instruction everything
//! downstream of the AST operates on.

/// One IR instruction, `(op, arg1, arg2, res)`. Every field is stored as
/// text — literals, variable names, temporaries, and label names all share
/// the same representation, matching the quad format the optimizer and
/// codegen round-trip through `ir.quad`/`ir_opt.quad`.
///
/// # Example
///
/// ```
/// use minilc_ir::Quad;
///
/// let q = Quad::new("ADD", "a", "1", "t1");
/// assert_eq!(q.render(0), "0: (ADD, a, 1, t1)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quad {
    /// The opcode: an arithmetic op, `ASSIGN`, `LABEL`, `GOTO`, an `IF_*`
    /// comparison, or a no-op marker.
    pub op: String,
    /// First operand, or [`BLANK`] when unused.
    pub arg1: String,
    /// Second operand, or [`BLANK`] when unused.
    pub arg2: String,
    /// Destination variable/temporary, or a label name for `LABEL`/branch
    /// quads, or [`BLANK`] when the quad has no result.
    pub res: String,
}

/// The placeholder used in an unused quad field, matching the reference
/// IR's `-` convention.
pub const BLANK: &str = "-";

impl Quad {
    /// Builds a quad from any four string-like values.
    pub fn new(op: impl Into<String>, arg1: impl Into<String>, arg2: impl Into<String>, res: impl Into<String>) -> Self {
        Quad {
            op: op.into(),
            arg1: arg1.into(),
            arg2: arg2.into(),
            res: res.into(),
        }
    }

    /// True for `GOTO` and every `IF_*` comparison — the quads that can
    /// end a basic block with a jump.
    ///
    /// # Example
    ///
    /// ```
    /// use minilc_ir::Quad;
    ///
    /// assert!(Quad::new("IF_LT", "a", "b", "L1").is_branch());
    /// assert!(!Quad::new("ASSIGN", "1", "-", "x").is_branch());
    /// ```
    pub fn is_branch(&self) -> bool {
        self.op == "GOTO" || self.op.starts_with("IF_")
    }

    /// True for `LABEL` quads — jump targets and basic-block leaders.
    pub fn is_label(&self) -> bool {
        self.op == "LABEL"
    }

    /// Renders `i: (op, arg1, arg2, res)` for the `ir.quad`/`ir_opt.quad` artifacts.
    pub fn render(&self, index: usize) -> String {
        format!("{}: ({}, {}, {}, {})", index, self.op, self.arg1, self.arg2, self.res)
    }
}

/// Renders a whole quad list as newline-separated `render()` lines, one per
/// index, for the `ir.quad`/`ir_opt.quad` artifacts.
pub fn render_quads(quads: &[Quad]) -> String {
    let mut out = String::new();
    for (i, q) in quads.iter().enumerate() {
        out.push_str(&q.render(i));
        out.push('\n');
    }
    out
}

/// Parses the `i: (op, arg1, arg2, res)` text format back into quads — the
/// documented re-entry surface codegen reads from.
///
/// # Example
///
/// ```
/// use minilc_ir::parse_quads;
///
/// let quads = parse_quads("0: (ASSIGN, 1, -, x)\n").unwrap();
/// assert_eq!(quads[0].res, "x");
/// ```
pub fn parse_quads(text: &str) -> Option<Vec<Quad>> {
    let mut quads = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (_, rest) = line.split_once(':')?;
        let rest = rest.trim().strip_prefix('(')?.strip_suffix(')')?;
        let fields: Vec<&str> = rest.splitn(4, ", ").collect();
        if fields.len() != 4 {
            return None;
        }
        quads.push(Quad::new(fields[0], fields[1], fields[2], fields[3]));
    }
    Some(quads)
}
