//! Parse trace formatting: one line per step, emitted before the step's
//! action is applied.

use minilc_lex::Token;

pub struct ParseStep {
    pub step: usize,
    pub state_stack: Vec<usize>,
    pub symbol_stack: Vec<String>,
    pub remaining: Vec<String>,
    pub action: String,
}

impl ParseStep {
    pub fn format(&self) -> String {
        let states = format!("[{}]", join(&self.state_stack.iter().map(|s| s.to_string()).collect::<Vec<_>>()));
        let symbols = format!("[{}]", join(&self.symbol_stack));
        let input = format!("[{}]", join(&self.remaining));
        format!("{}\t{}\t{}\t{}\t{}", self.step, states, symbols, input, self.action)
    }
}

fn join(items: &[String]) -> String {
    items.join(" ")
}

/// Renders the remaining input the way the trace wants it: `TYPE(lexeme)`
/// for tokens with a lexeme, bare `TYPE` (or `EOF`) otherwise.
pub fn display_remaining(tokens: &[Token]) -> Vec<String> {
    tokens.iter().map(|t| t.display()).collect()
}

pub const TRACE_HEADER: &str = "step\tstates\tsymbols\tinput\taction";
