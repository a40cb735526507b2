use super::*;
use rules::{Predicate, Rule, RuleTable, Vocabulary};

fn table() -> RuleTable {
    RuleTable::new(
        Vocabulary::new(["X", "Y", "Z", "W"]).expect("vocabulary"),
        [
            Rule::new("Z", Predicate::any(["X", "Y"])),
            Rule::new("W", Predicate::all(["X", "Y"])),
        ],
    )
    .expect("table")
}

#[test]
fn resolver_types_are_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resolver<'static>>();
    assert_send_sync::<Resolution>();
    assert_send_sync::<FlagSet>();
}

#[test]
fn into_flags_keeps_state() {
    let table = table();
    let resolution = Resolver::new(&table)
        .resolve_enabled(["X"])
        .expect("resolves");
    let expected = resolution.flags().clone();
    assert_eq!(resolution.into_flags(), expected);
}

#[test]
fn resolve_set_reuses_previous_output() {
    let table = table();
    let resolver = Resolver::new(&table);
    let first = resolver.resolve_enabled(["X", "Y"]).expect("resolves");
    let second = resolver.resolve_set(first.flags()).expect("resolves");

    assert_eq!(first.flags(), second.flags());
    assert_eq!(second.passes(), 1);
    assert_eq!(second.derived().count(), 0);
}

#[test]
fn resolver_exposes_table_and_config() {
    let table = table();
    let resolver = Resolver::new(&table);
    assert_eq!(resolver.table().len(), 2);
    assert_eq!(resolver.config(), ResolverConfig::default());
}

#[cfg(feature = "serde")]
#[test]
fn resolution_serializes_flags_and_provenance() {
    let table = table();
    let resolution = Resolver::new(&table)
        .resolve_enabled(["Y"])
        .expect("resolves");
    let value = serde_json::to_value(&resolution).expect("serializes");

    assert_eq!(value["flags"]["Z"], serde_json::Value::Bool(true));
    assert_eq!(value["flags"]["W"], serde_json::Value::Bool(false));
    assert_eq!(value["explicit"], serde_json::json!(["Y"]));
    assert_eq!(value["derived_by"], serde_json::json!({ "Z": 0 }));
    assert_eq!(value["passes"], serde_json::json!(2));
}
