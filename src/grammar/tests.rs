//! Grammar compilation tests.

use super::*;

fn arith_bnf() -> Vec<Production> {
    vec![Production::new(
        "exp",
        &[&["exp", "+", "exp"], &["exp", "*", "exp"], &["id"]],
    )]
}

fn arith_resolvers() -> Vec<Vec<PrecGroup>> {
    vec![vec![PrecGroup::left(&["+"]), PrecGroup::left(&["*"])]]
}

/// Check that solved levels satisfy every declared relation.
fn assert_levels_consistent(table: &Prec2, levels: &LevelTable) {
    for (l, r, rel) in table.iter() {
        let lv = levels.get(l.as_str()).unwrap();
        let rv = levels.get(r.as_str()).unwrap();
        match rel {
            Relation::Eq => assert_eq!(lv.right, rv.left, "{l} = {r}"),
            Relation::Lt => assert!(lv.right.unwrap() < rv.left.unwrap(), "{l} < {r}"),
            Relation::Gt => assert!(rv.left.unwrap() < lv.right.unwrap(), "{l} > {r}"),
        }
    }
}

#[test]
fn precs_intra_group_relations() {
    let table = precs_to_prec2(&[PrecGroup::left(&["+", "-"])]);
    assert_eq!(table.get("+", "+"), Some(Relation::Gt));
    assert_eq!(table.get("+", "-"), Some(Relation::Gt));
    assert_eq!(table.get("-", "+"), Some(Relation::Gt));

    let table = precs_to_prec2(&[PrecGroup::right(&["->"])]);
    assert_eq!(table.get("->", "->"), Some(Relation::Lt));

    let table = precs_to_prec2(&[PrecGroup::assoc(&[";"])]);
    assert_eq!(table.get(";", ";"), Some(Relation::Eq));

    let table = precs_to_prec2(&[PrecGroup::non_assoc(&["=="])]);
    assert_eq!(table.get("==", "=="), None);
}

#[test]
fn precs_inter_group_relations() {
    let table = precs_to_prec2(&[PrecGroup::left(&["+"]), PrecGroup::left(&["*"])]);
    // "+" is declared looser than "*"
    assert_eq!(table.get("+", "*"), Some(Relation::Lt));
    assert_eq!(table.get("*", "+"), Some(Relation::Gt));
}

#[test]
fn precs_solve_to_consistent_levels() {
    let table = precs_to_prec2(&[
        PrecGroup::assoc(&[";"]),
        PrecGroup::left(&["+"]),
        PrecGroup::left(&["*"]),
    ]);
    let levels = prec2_to_levels(&table).unwrap();
    assert_levels_consistent(&table, &levels);

    // associative tokens get one shared level on both sides
    let semi = levels.get(";").unwrap();
    assert_eq!(semi.left, semi.right);

    // left-assoc tokens bind tighter on the right
    let plus = levels.get("+").unwrap();
    assert!(plus.left.unwrap() < plus.right.unwrap());
    assert!(plus.right.unwrap() < levels.get("*").unwrap().left.unwrap());
}

#[test]
fn bnf_with_override_resolves_ambiguity() {
    let table = bnf_to_prec2(&arith_bnf(), &arith_resolvers());
    // `exp + exp` alone would write both (+, +) = Gt and (+, +) = Lt;
    // the resolver decides for left associativity
    assert_eq!(table.get("+", "+"), Some(Relation::Gt));
    assert_eq!(table.get("+", "*"), Some(Relation::Lt));
    assert_eq!(table.get("*", "+"), Some(Relation::Gt));
    assert!(!table.conflicts().is_empty());
    assert!(table.conflicts().iter().all(|c| c.overridden));

    let levels = prec2_to_levels(&table).unwrap();
    assert_levels_consistent(&table, &levels);
    let plus = levels.get("+").unwrap();
    let star = levels.get("*").unwrap();
    assert!(plus.right.unwrap() < star.left.unwrap());
}

#[test]
fn bnf_without_override_keeps_first_writer() {
    let table = bnf_to_prec2(&arith_bnf(), &[]);
    let conflicts = table.conflicts();
    assert!(!conflicts.is_empty());
    assert!(conflicts.iter().all(|c| !c.overridden));
    // the cell still holds a definite value
    assert!(table.get("+", "+").is_some());
}

#[test]
fn bnf_bracket_equality() {
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
        Production::new("exp", &[&["exp", "+", "exp"], &["id"]]),
    ];
    let table = bnf_to_prec2(&bnf, &[vec![PrecGroup::assoc(&[";"]), PrecGroup::left(&["+"])]]);
    assert_eq!(table.get("if", "then"), Some(Relation::Eq));
    assert_eq!(table.get("then", "else"), Some(Relation::Eq));
    assert_eq!(table.get("begin", "end"), Some(Relation::Eq));

    let levels = prec2_to_levels(&table).unwrap();
    assert_levels_consistent(&table, &levels);
    // bracket pairs share the junction level
    assert_eq!(
        levels.get("if").unwrap().right,
        levels.get("then").unwrap().left
    );
    assert_eq!(
        levels.get("then").unwrap().right,
        levels.get("else").unwrap().left
    );
}

#[test]
fn bnf_openers_and_closers_lack_outer_levels() {
    let bnf = vec![
        Production::new("block", &[&["begin", "insts", "end"]]),
        Production::new("insts", &[&["insts", ";", "insts"], &["id"]]),
    ];
    let table = bnf_to_prec2(&bnf, &[vec![PrecGroup::assoc(&[";"])]]);
    let levels = prec2_to_levels(&table).unwrap();
    let begin = levels.get("begin").unwrap();
    let end = levels.get("end").unwrap();
    assert!(begin.is_opener());
    assert!(!begin.is_closer());
    assert!(end.is_closer());
    assert!(!end.is_opener());
}

#[test]
fn conflicting_writes_keep_first_value() {
    let mut table = Prec2::new();
    table.set("a", "b", Relation::Lt);
    table.set("a", "b", Relation::Gt);
    assert_eq!(table.get("a", "b"), Some(Relation::Lt));
    assert_eq!(table.conflicts().len(), 1);
    let conflict = &table.conflicts()[0];
    assert_eq!(conflict.kept, Relation::Lt);
    assert_eq!(conflict.rejected, Relation::Gt);
    assert!(!conflict.overridden);
}

#[test]
fn merge_prefers_first_table() {
    let mut a = Prec2::new();
    a.set("x", "y", Relation::Lt);
    let mut b = Prec2::new();
    b.set("x", "y", Relation::Gt);
    b.set("y", "z", Relation::Eq);
    let merged = merge_prec2s([a, b]);
    assert_eq!(merged.get("x", "y"), Some(Relation::Lt));
    assert_eq!(merged.get("y", "z"), Some(Relation::Eq));
    assert_eq!(merged.conflicts().len(), 1);
}

#[test]
fn cyclic_constraints_fail_to_solve() {
    // six cells whose orderings chain back onto themselves
    let mut table = Prec2::new();
    table.set("a", "b", Relation::Lt);
    table.set("c", "b", Relation::Gt);
    table.set("c", "a", Relation::Lt);
    table.set("b", "a", Relation::Gt);
    table.set("b", "c", Relation::Lt);
    table.set("a", "c", Relation::Gt);
    let err = prec2_to_levels(&table).unwrap_err();
    assert!(matches!(err, GrammarError::Cycle { .. }));
}

#[test]
fn equality_and_ordering_on_same_slots_is_a_cycle() {
    // equalities alias R(a), L(b), R(c) and L(d) into one variable,
    // then (a, d) < orders that variable against itself
    let mut table = Prec2::new();
    table.set("a", "b", Relation::Eq);
    table.set("c", "b", Relation::Eq);
    table.set("c", "d", Relation::Eq);
    table.set("a", "d", Relation::Lt);
    let err = prec2_to_levels(&table).unwrap_err();
    assert!(matches!(err, GrammarError::Cycle { .. }));
}

#[test]
fn unconstrained_tokens_are_absent_from_the_table() {
    let table = precs_to_prec2(&[PrecGroup::assoc(&[";"])]);
    let levels = prec2_to_levels(&table).unwrap();
    assert!(levels.get("unrelated").is_none());
}
