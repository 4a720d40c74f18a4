//! Shared language fixtures for the integration tests.
#![allow(dead_code)]

use opine::grammar::{bnf_to_prec2, prec2_to_levels, precs_to_prec2, PrecGroup, Production};
use opine::{IndentOptions, IndentRules, Language};

/// Arithmetic with separators: `;` `,` `+` `*`, all associative, loosest
/// first.
pub fn arith() -> Language {
    let table = precs_to_prec2(&[
        PrecGroup::assoc(&[";"]),
        PrecGroup::assoc(&[","]),
        PrecGroup::assoc(&["+"]),
        PrecGroup::assoc(&["*"]),
    ]);
    let levels = prec2_to_levels(&table).unwrap();
    Language::new(levels, IndentRules::new())
}

/// Right-associative arrow chains.
pub fn arrows() -> Language {
    let table = precs_to_prec2(&[PrecGroup::right(&["->"])]);
    let levels = prec2_to_levels(&table).unwrap();
    Language::new(levels, IndentRules::new().with_within_any("->", 0))
}

/// Block language: `if`/`then`/`else`, `begin`/`end`, `;`-sequences and
/// arithmetic, with a 2-column step.
pub fn blocks() -> Language {
    let bnf = vec![
        Production::new(
            "inst",
            &[
                &["if", "exp", "then", "inst", "else", "inst"],
                &["begin", "insts", "end"],
                &["exp"],
            ],
        ),
        Production::new("insts", &[&["insts", ";", "insts"], &["inst"]]),
        Production::new(
            "exp",
            &[&["exp", "+", "exp"], &["exp", "*", "exp"], &["id"]],
        ),
    ];
    let table = bnf_to_prec2(
        &bnf,
        &[vec![
            PrecGroup::assoc(&[";"]),
            PrecGroup::assoc(&["+"]),
            PrecGroup::assoc(&["*"]),
        ]],
    );
    let levels = prec2_to_levels(&table).unwrap();
    let rules = IndentRules::new()
        .with_after("begin", 2)
        .with_after("then", 2)
        .with_after("else", 2);
    Language::new(levels, rules).with_options(IndentOptions { basic: 2 })
}

/// The bracket language with call-style juxtaposition rules: `begin`
/// introduces an expression sequence rather than a call, and call
/// arguments step in by 3 columns (distinct from the 2-column basic
/// step).
pub fn calls() -> Language {
    let bnf = vec![
        Production::new("block", &[&["begin", "stmts", "end"]]),
        Production::new("stmts", &[&["stmts", ";", "stmts"], &["unit"]]),
    ];
    let table = bnf_to_prec2(&bnf, &[vec![PrecGroup::assoc(&[";"])]]);
    let levels = prec2_to_levels(&table).unwrap();
    let rules = IndentRules::new().with_list_intro(&["begin"]).with_args(3);
    Language::new(levels, rules).with_options(IndentOptions { basic: 2 })
}

/// A lone bracket construct whose boundary tokens are true opener and
/// closer (nothing in the grammar precedes `begin` or follows `end`).
pub fn brackets() -> Language {
    let bnf = vec![
        Production::new("block", &[&["begin", "stmts", "end"]]),
        Production::new("stmts", &[&["stmts", ";", "stmts"], &["unit"]]),
    ];
    let table = bnf_to_prec2(&bnf, &[vec![PrecGroup::assoc(&[";"])]]);
    let levels = prec2_to_levels(&table).unwrap();
    Language::new(levels, IndentRules::new()).with_options(IndentOptions { basic: 2 })
}
