//! The fixed MiniLang grammar and its LALR(1) parsing tables.
//!
//! [`tables()`] is the only entry point most callers need: it builds the
//! canonical LR(1) automaton, merges it to LALR(1), diagnoses conflicts on
//! both, and memoizes the result for the lifetime of the process.

pub mod first;
pub mod grammar;
pub mod lalr;
pub mod tables;

pub use grammar::{format_production, production, Production, NONTERMINALS, PRODUCTIONS, TERMINALS};
pub use lalr::Action;
pub use tables::{tables, GrammarTables};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_without_conflicts() {
        let t = tables().expect("grammar must be conflict-free");
        assert!(t.state_count() > 0);
    }

    #[test]
    fn start_state_shifts_on_every_statement_starter() {
        let t = tables().unwrap();
        let start = &t.action[&0];
        assert!(start.contains_key("ID"));
        assert!(start.contains_key("IF"));
        assert!(start.contains_key("WHILE"));
        assert!(start.contains_key("LBRACE"));
        // StmtList -> ε is valid here too: an empty program is accepted.
        assert!(start.contains_key("EOF"));
    }

    #[test]
    fn exactly_one_accept_action_exists() {
        let t = tables().unwrap();
        let accepting: Vec<_> = t
            .action
            .values()
            .filter(|row| row.values().any(|a| *a == Action::Accept))
            .collect();
        assert_eq!(accepting.len(), 1);
    }

    #[test]
    fn state_ids_are_dense() {
        let t = tables().unwrap();
        for (i, st) in t.states.iter().enumerate() {
            assert_eq!(st.id, i);
        }
    }
}
