//! Backpatch-list bookkeeping plus the quad-emitting primitives every
//! lowering rule is built from.
//!
//! A backpatch list is a `Vec<usize>` of quad indices whose `res` field (a
//! jump target) is not yet known — typically the index of a branch whose
//! target label hasn't been emitted. [`IrBuilder::backpatch`] fills every
//! index in such a list in with the label once it is finally emitted.

use crate::quad::{Quad, BLANK};

/// Accumulates quads for one lowering pass and hands out fresh
/// temporary/label names.
///
/// # Example
///
/// ```
/// use minilc_ir::builder::IrBuilder;
///
/// let mut b = IrBuilder::new();
/// let t = b.new_temp();
/// let idx = b.emit("ADD", "1", "2", &t);
/// let label = b.new_label();
/// b.backpatch(&[idx], &label);
/// assert_eq!(b.into_quads()[0].res, label);
/// ```
pub struct IrBuilder {
    quads: Vec<Quad>,
    temp_counter: u32,
    label_counter: u32,
}

impl Default for IrBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IrBuilder {
    /// Starts an empty builder with fresh temp/label counters.
    pub fn new() -> Self {
        IrBuilder {
            quads: Vec::new(),
            temp_counter: 0,
            label_counter: 0,
        }
    }

    /// Returns the next `t1`, `t2`, ... name, never reused.
    pub fn new_temp(&mut self) -> String {
        self.temp_counter += 1;
        format!("t{}", self.temp_counter)
    }

    /// Returns the next `L1`, `L2`, ... name, never reused.
    pub fn new_label(&mut self) -> String {
        self.label_counter += 1;
        format!("L{}", self.label_counter)
    }

    /// Appends a quad and returns its index, for later backpatching.
    pub fn emit(&mut self, op: &str, arg1: &str, arg2: &str, res: &str) -> usize {
        let idx = self.quads.len();
        self.quads.push(Quad::new(op, arg1, arg2, res));
        idx
    }

    /// Emits a `LABEL` quad naming `label` as a jump target.
    pub fn emit_label(&mut self, label: &str) -> usize {
        self.emit("LABEL", BLANK, BLANK, label)
    }

    /// Starts a fresh backpatch list containing a single quad index.
    pub fn makelist(idx: usize) -> Vec<usize> {
        vec![idx]
    }

    /// Concatenates two backpatch lists into one.
    pub fn merge(a: Vec<usize>, b: Vec<usize>) -> Vec<usize> {
        let mut out = a;
        out.extend(b);
        out
    }

    /// Fills in the `res` field of every quad in `list` with `label`.
    /// Every index handed to this comes from `makelist`/`merge` on indices
    /// this same builder produced, so an out-of-range index is a bug in
    /// the caller, not a user-triggerable error.
    pub fn backpatch(&mut self, list: &[usize], label: &str) {
        for &idx in list {
            self.quads[idx].res = label.to_string();
        }
    }

    /// Consumes the builder, returning the finished quad list.
    pub fn into_quads(self) -> Vec<Quad> {
        self.quads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_and_label_names_are_distinct_and_sequential() {
        let mut b = IrBuilder::new();
        assert_eq!(b.new_temp(), "t1");
        assert_eq!(b.new_temp(), "t2");
        assert_eq!(b.new_label(), "L1");
        assert_eq!(b.new_label(), "L2");
    }

    #[test]
    fn backpatch_fills_in_every_listed_index() {
        let mut b = IrBuilder::new();
        let i1 = b.emit("GOTO", BLANK, BLANK, BLANK);
        let i2 = b.emit("IF_LT", "a", "b", BLANK);
        let list = IrBuilder::merge(IrBuilder::makelist(i1), IrBuilder::makelist(i2));
        b.backpatch(&list, "L1");
        let quads = b.into_quads();
        assert_eq!(quads[0].res, "L1");
        assert_eq!(quads[1].res, "L1");
    }
}
