mod common;

use common::{init_tracing, raws, scenario, sequence};
use rawquery::prelude::*;

#[test]
fn removals_apply_after_the_scan() {
    init_tracing();
    let mut seq = scenario();
    let edits: Vec<Edit> = seq
        .all("B")
        .expect("valid")
        .iter()
        .map(|t| t.edit(Mutation::Remove))
        .collect();
    assert_eq!(seq.apply(&edits).expect("applies"), 2);
    assert_eq!(seq.to_string(), "[A][A][C]");
}

#[test]
fn argument_mutations() {
    let mut seq = sequence("mutations", &["TILE:'d'", "COLOR:6:0:0", "PET"]);
    let edits = vec![
        seq.at(0).expect("tile").edit(Mutation::SetArgument {
            position: 0,
            value: String::from("'D'"),
        }),
        seq.at(1).expect("color").edit(Mutation::RemoveArgument(2)),
        seq.at(2).expect("pet").edit(Mutation::AppendArgument(String::from("CAT"))),
    ];
    seq.apply(&edits).expect("applies");
    assert_eq!(seq.to_string(), "[TILE:'D'][COLOR:6:0][PET:CAT]");
}

#[test]
fn edits_on_one_token_compose_in_order() {
    let mut seq = sequence("mutations", &["NAME:dog"]);
    let name = seq.at(0).expect("name").location();
    let edits = [
        Edit::new(name.clone(), Mutation::AppendArgument(String::from("dogs"))),
        Edit::new(name, Mutation::SetArgument { position: 1, value: String::from("hounds") }),
    ];
    seq.apply(&edits).expect("applies");
    assert_eq!(seq.to_string(), "[NAME:dog:hounds]");
}

#[test]
fn failing_batch_leaves_the_sequence_untouched() {
    let mut seq = scenario();
    let edits = vec![
        seq.at(1).expect("B").edit(Mutation::SetArgument { position: 0, value: String::from("9") }),
        seq.at(2).expect("B").edit(Mutation::Remove),
        seq.at(0).expect("A").edit(Mutation::RemoveArgument(0)),
    ];
    assert!(matches!(seq.apply(&edits), Err(QueryError::Edit(_))));
    assert_eq!(seq.to_string(), "[A][B:1][B:2][A][C]");
}

#[test]
fn edits_are_bound_to_their_source() {
    let mut seq = scenario();
    let other = sequence("other", &["A"]);
    let foreign = other.at(0).expect("A").edit(Mutation::Remove);
    assert!(matches!(seq.apply([&foreign]), Err(QueryError::Edit(_))));
    let beyond = Edit::new(TokenLocation::new("scenario", 5), Mutation::Remove);
    assert!(matches!(seq.apply([&beyond]), Err(QueryError::Edit(_))));
    assert_eq!(seq.len(), 5);
}

#[test]
fn dataset_edits_span_sources() {
    let mut data = raws();
    let edits: Vec<Edit> = data
        .all(Criteria::new().name("MATERIAL_VALUE"))
        .expect("valid")
        .iter()
        .map(|t| t.edit(Mutation::SetArgument { position: 0, value: String::from("1") }))
        .chain(
            data.all_obj("INORGANIC:MICROCLINE")
                .expect("valid")
                .iter()
                .map(|t| t.edit(Mutation::Remove)),
        )
        .collect();
    assert_eq!(data.apply(&edits).expect("applies"), 4);
    let values = data.all("MATERIAL_VALUE:1").expect("valid");
    assert_eq!(values.len(), 3);
    assert!(data.get_obj("INORGANIC:MICROCLINE").expect("valid").is_none());
}

#[test]
fn failing_dataset_batch_changes_no_source() {
    let mut data = raws();
    let iron = data.get_obj("INORGANIC:IRON").expect("valid").expect("iron").edit(Mutation::Remove);
    let missing = Edit::new(TokenLocation::new("inorganic_stone", 99), Mutation::Remove);
    let unknown = Edit::new(TokenLocation::new("reaction_smelter", 0), Mutation::Remove);
    assert!(matches!(data.apply(&[iron.clone(), missing]), Err(QueryError::Edit(_))));
    assert!(matches!(data.apply(&[iron, unknown]), Err(QueryError::Edit(_))));
    assert!(data.get_obj("INORGANIC:IRON").expect("valid").is_some(), "iron survived");
}
