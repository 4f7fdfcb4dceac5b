//! Writers for the fixed set of output artifacts under `out/<input-stem>/`.

use std::path::{Path, PathBuf};

use minilc_grammar::{format_production, tables, Action, PRODUCTIONS};
use minilc_ir::Quad;
use minilc_lex::Token;
use minilc_util::CompileError;

fn write(dir: &Path, name: &str, contents: &str) -> Result<PathBuf, CompileError> {
    std::fs::create_dir_all(dir).map_err(|source| CompileError::Io { source, path: dir.to_path_buf() })?;
    let path = dir.join(name);
    std::fs::write(&path, contents).map_err(|source| CompileError::Io { source, path: path.clone() })?;
    Ok(path)
}

fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub fn write_tokens_csv(dir: &Path, tokens: &[Token]) -> Result<PathBuf, CompileError> {
    let mut out = String::from("index,type,lexeme,line,col\n");
    for t in tokens {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            t.index,
            csv_field(&t.ty.to_string()),
            csv_field(&t.lexeme),
            t.line,
            t.col
        ));
    }
    write(dir, "tokens.csv", &out)
}

pub fn write_table_artifacts(dir: &Path) -> Result<Vec<PathBuf>, CompileError> {
    let productions = PRODUCTIONS
        .iter()
        .map(format_production)
        .collect::<Vec<_>>()
        .join("\n")
        + "\n";
    let productions_path = write(dir, "productions.txt", &productions)?;

    let built = tables()?;
    let terminals = minilc_grammar::GrammarTables::terminals_ordered();
    let nonterminals = minilc_grammar::GrammarTables::nonterminals_ordered();

    // symbols.txt lists the full alphabet alphabetically, independent of the
    // table layout order above (which forces EOF last and drops S').
    let mut sorted_terminals: Vec<&str> = minilc_grammar::TERMINALS.to_vec();
    sorted_terminals.sort_unstable();
    let mut sorted_nonterminals: Vec<&str> = minilc_grammar::NONTERMINALS.to_vec();
    sorted_nonterminals.sort_unstable();
    let symbols = format!(
        "Terminals: {}\nNonterminals: {}\n",
        sorted_terminals.join(", "),
        sorted_nonterminals.join(", ")
    );
    let symbols_path = write(dir, "symbols.txt", &symbols)?;

    let mut header = vec!["state".to_string()];
    header.extend(terminals.iter().map(|t| t.to_string()));
    header.extend(nonterminals.iter().map(|n| n.to_string()));
    let mut rows = vec![header.join(",")];
    for state in 0..built.state_count() {
        let mut row = vec![state.to_string()];
        for t in &terminals {
            let cell = built.action.get(&state).and_then(|r| r.get(t)).map(Action::encode).unwrap_or_default();
            row.push(csv_field(&cell));
        }
        for n in &nonterminals {
            let cell = built.goto.get(&state).and_then(|r| r.get(n)).map(|s| s.to_string()).unwrap_or_default();
            row.push(csv_field(&cell));
        }
        rows.push(row.join(","));
    }
    let action_goto_path = write(dir, "action_goto.csv", &(rows.join("\n") + "\n"))?;

    Ok(vec![productions_path, symbols_path, action_goto_path])
}

pub fn write_parse_trace(dir: &Path, trace: &str) -> Result<PathBuf, CompileError> {
    write(dir, "parse_trace.tsv", trace)
}

pub fn write_ir_quad(dir: &Path, quads: &[Quad]) -> Result<PathBuf, CompileError> {
    write(dir, "ir.quad", &minilc_ir::render_quads(quads))
}

pub fn write_opt_artifacts(
    dir: &Path,
    quads: &[Quad],
    report: &str,
) -> Result<Vec<PathBuf>, CompileError> {
    let ir_opt_path = write(dir, "ir_opt.quad", &minilc_ir::render_quads(quads))?;
    let report_path = write(dir, "opt_report.txt", report)?;
    Ok(vec![ir_opt_path, report_path])
}

pub fn write_target_asm(dir: &Path, asm: &str) -> Result<PathBuf, CompileError> {
    write(dir, "target.asm", asm)
}
