mod common;

use common::{indexes, init_tracing, raws};
use rawquery::prelude::*;

#[test]
fn record_properties_stop_at_the_next_record() {
    init_tracing();
    let data = raws();
    let dog = data.get_obj("CREATURE:DOG").expect("valid").expect("dog");
    let tile = dog.get_prop("TILE").expect("valid").expect("tile");
    assert_eq!(tile.arg(0), Some("'d'"));
    assert_eq!(dog.all_props("TILE").expect("valid").len(), 1, "the cat's tile is not the dog's");
    assert_eq!(dog.props().tokens().expect("valid").len(), 5);
    // an item token inside a creature is an ordinary property
    assert!(dog.get_prop("ITEM_PANTS").expect("valid").is_some());
}

#[test]
fn last_record_runs_to_the_end_of_its_source() {
    let data = raws();
    let cat = data.get_obj("CREATURE:CAT").expect("valid").expect("cat");
    let props = cat.props().tokens().expect("valid");
    assert_eq!(indexes(&props), vec![8, 9, 10]);
}

#[test]
fn items_stop_at_any_item_record() {
    let data = raws();
    let pants = data.get_obj("ITEM_PANTS:ITEM_PANTS_PANTS").expect("valid").expect("pants");
    let names = pants.all_props("NAME").expect("valid");
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].arg(0), Some("trousers"));
    let greaves = data.get_obj("ITEM_PANTS:ITEM_PANTS_GREAVES").expect("valid").expect("greaves");
    let layers = greaves.all_props("LAYER").expect("valid");
    assert_eq!(layers.len(), 1);
    assert_eq!(greaves.props().tokens().expect("valid").len(), 2, "stops at ITEM_SHOES");
}

#[test]
fn words_stop_at_symbols() {
    let data = raws();
    let ace = data.get_obj("WORD:ACE").expect("valid").expect("ace");
    let props = ace.props().tokens().expect("valid");
    let names: Vec<&str> = props.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["NOUN", "ADJ"]);
}

#[test]
fn standard_boundaries() {
    let rules = ScopeRules::standard();
    let word = rules.boundary(&Token::new("WORD", ["ACE"])).compile().expect("valid");
    assert!(word.matches(&Token::bare("SYMBOL")));
    assert!(!word.matches(&Token::bare("NOUN")));
    let item = rules.boundary(&Token::new("ITEM_PANTS", ["X"])).compile().expect("valid");
    assert!(item.matches(&Token::bare("ITEM_SHOES")));
    assert!(!item.matches(&Token::bare("ITEM_")), "a bare prefix is not a record");
    let creature = rules.boundary(&Token::new("CREATURE", ["DOG"])).compile().expect("valid");
    assert!(creature.matches(&Token::new("CREATURE", ["CAT"])));
    assert!(!creature.matches(&Token::bare("CREATURE_TILE")));
}

#[test]
fn custom_scope_rules() {
    let data = raws();
    let ace = data.get_obj("WORD:ACE").expect("valid").expect("ace");
    let rules = ScopeRules::new("ITEM_", vec![String::from("WORD")]);
    let props = rules.props(ace).tokens().expect("valid");
    assert_eq!(props.len(), 4, "symbols no longer end a word");
}

#[test]
fn reversed_properties() {
    let data = raws();
    let cat = data.get_obj("CREATURE:CAT").expect("valid").expect("cat");
    let before = cat.props().with_traversal(Traversal::reversed());
    let tile = before.get("TILE").expect("valid").expect("tile");
    assert_eq!(tile.arg(0), Some("'d'"));
    assert_eq!(before.tokens().expect("valid").len(), 5);
}

#[test]
fn property_dictionary() {
    let data = raws();
    let iron = data.get_obj("INORGANIC:IRON").expect("valid").expect("iron");
    let dict = iron.prop_dict(PropDictOptions::default()).expect("valid");
    assert_eq!(dict["MATERIAL_VALUE"].first().and_then(|t| t.token().arg(0)), Some("10"));
    assert!(dict.contains_key("MATERIAL_VALUE:10"));
    assert!(dict.contains_key("STATE_NAME_ADJ:ALL_SOLID:iron"));
    assert!(matches!(dict["ITEMS_WEAPON"], PropValue::Many(_)), "always a list by default");
}

#[test]
fn equal_properties_stay_distinct() {
    let data = raws();
    let adamantine = data.get_obj("INORGANIC:ADAMANTINE").expect("valid").expect("adamantine");
    let dict = adamantine.prop_dict(PropDictOptions::default()).expect("valid");
    // name and signature coincide for bare tokens, each token is listed once
    let weapons = &dict["ITEMS_WEAPON"];
    assert_eq!(weapons.len(), 2);
    assert_eq!(indexes(weapons.tokens()), vec![10, 12]);
    assert!(weapons.contains(&weapons.tokens()[1]));
}

#[test]
fn property_dictionary_options() {
    let data = raws();
    let adamantine = data.get_obj("INORGANIC:ADAMANTINE").expect("valid").expect("adamantine");
    let options = PropDictOptions {
        always_list: false,
        ..PropDictOptions::default()
    };
    let dict = adamantine.prop_dict(options).expect("valid");
    assert!(matches!(dict["MATERIAL_VALUE"], PropValue::One(_)));
    assert!(matches!(dict["ITEMS_WEAPON"], PropValue::Many(_)), "repeated names turn into lists");
    assert_eq!(indexes(dict["ITEMS_WEAPON"].tokens()), vec![10, 12], "in scan order");

    let full_only = PropDictOptions {
        name_keys: false,
        ..PropDictOptions::default()
    };
    let dict = adamantine.prop_dict(full_only).expect("valid");
    assert!(!dict.contains_key("MATERIAL_VALUE"));
    assert!(dict.contains_key("MATERIAL_VALUE:300"));
}
