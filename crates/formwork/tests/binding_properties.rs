#![forbid(unsafe_code)]

//! Property tests for the binding's pure contracts: initial-value
//! precedence, snapshot filtering and the change round trip.

use std::rc::Rc;

use proptest::prelude::*;
use serde_json::{Value, json};

use formwork::{BindingOptions, FieldBinding, FieldEvent};
use formwork_core::set_at;
use formwork_harness::TestStore;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
    ]
}

fn field_name() -> impl Strategy<Value = String> {
    "[a-z]{1,5}"
}

proptest! {
    #[test]
    fn initial_value_precedence(
        store_value in proptest::option::of(scalar()),
        default_value in proptest::option::of(scalar()),
        caller_default in proptest::option::of(scalar()),
    ) {
        let mut values = json!({});
        if let Some(v) = &store_value {
            set_at(&mut values, "field", v.clone());
        }
        let mut defaults = json!({});
        if let Some(v) = &default_value {
            set_at(&mut defaults, "field", v.clone());
        }

        let store = TestStore::with_values(values);
        store.set_defaults(defaults);

        let mut options = BindingOptions::new("field");
        if let Some(v) = &caller_default {
            options = options.default_value(v.clone());
        }
        let binding = FieldBinding::bind(Rc::new(store.clone()), options);

        let expected = store_value
            .or(default_value)
            .or(caller_default)
            .unwrap_or(Value::Null);
        prop_assert_eq!(binding.value(), expected);
    }

    #[test]
    fn snapshot_updates_iff_name_matches(
        bound in field_name(),
        published in field_name(),
        v in scalar(),
    ) {
        let store = TestStore::new();
        let binding = FieldBinding::bind(
            Rc::new(store.clone()),
            BindingOptions::new(bound.clone()).default_value(json!("sentinel")),
        );
        let before = binding.value();

        store.set_value(&published, v.clone());
        if published == bound {
            prop_assert_eq!(binding.value(), v);
        } else {
            prop_assert_eq!(binding.value(), before);
        }
    }

    #[test]
    fn bulk_snapshot_always_rederives(bound in field_name(), v in scalar()) {
        let store = TestStore::new();
        let binding = FieldBinding::bind(
            Rc::new(store.clone()),
            BindingOptions::new(bound.clone()),
        );

        let mut tree = json!({});
        set_at(&mut tree, &bound, v.clone());
        store.set_values(tree);
        prop_assert_eq!(binding.value(), v);
    }

    #[test]
    fn change_round_trip(bound in field_name(), v in scalar()) {
        let store = TestStore::new();
        let binding = FieldBinding::bind(
            Rc::new(store.clone()),
            BindingOptions::new(bound.clone()),
        );

        binding.on_change(v.clone());
        prop_assert_eq!(binding.value(), v.clone());
        prop_assert_eq!(
            store.last_event(),
            Some(FieldEvent::change(bound, v))
        );
    }
}
