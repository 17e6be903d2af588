use annotab_expr::paths::{is_editable, number_of_selected_contexts};
use annotab_expr::{
    Expression, and, compile, constant, equal, format_result, greater_or_equal, if_else, not, or,
    path,
};
use proptest::prelude::*;

const FIELDS: [&str; 4] = ["A", "B", "C", "D"];

fn arb_leaf() -> impl Strategy<Value = Expression> {
    prop_oneof![
        Just(constant(true)),
        Just(constant(false)),
        prop::sample::select(FIELDS.to_vec()).prop_map(path),
        prop::sample::select(FIELDS.to_vec()).prop_map(|field| equal(path(field), constant(true))),
    ]
}

fn arb_expression() -> impl Strategy<Value = Expression> {
    arb_leaf().prop_recursive(4, 24, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(not),
            prop::collection::vec(inner.clone(), 0..4).prop_map(and),
            prop::collection::vec(inner, 0..4).prop_map(or),
        ]
    })
}

proptest! {
    #[test]
    fn true_is_neutral_for_and(expression in arb_expression()) {
        prop_assert_eq!(and([expression.clone(), constant(true)]), expression);
    }

    #[test]
    fn false_is_neutral_for_or(expression in arb_expression()) {
        prop_assert_eq!(or([constant(false), expression.clone()]), expression);
    }

    #[test]
    fn double_negation_cancels(expression in arb_expression()) {
        prop_assert_eq!(not(not(expression.clone())), expression);
    }

    #[test]
    fn compiled_booleans_are_literals_or_bindings(expression in arb_expression()) {
        let compiled = compile(&expression);
        prop_assert!(
            compiled == "true" || compiled == "false" || compiled.starts_with('{'),
            "unexpected output {}",
            compiled
        );
    }
}

#[test]
fn selection_mode_expression() {
    let expression = if_else(
        and([is_editable(), or([path("DeleteVisible"), path("MassEditVisible")])]),
        constant("Multi"),
        constant("None"),
    );
    insta::assert_snapshot!(
        compile(&expression),
        @"{= (%{ui>/isEditable} && (%{DeleteVisible} || %{MassEditVisible})) ? 'Multi' : 'None'}"
    );
}

#[test]
fn copy_enablement_expression() {
    let expression = equal(number_of_selected_contexts(), constant(1.0));
    insta::assert_snapshot!(
        compile(&expression),
        @"{= %{internal>numberOfSelectedContexts} === 1}"
    );
    let at_least_one = greater_or_equal(number_of_selected_contexts(), constant(1.0));
    insta::assert_snapshot!(
        compile(&at_least_one),
        @"{= %{internal>numberOfSelectedContexts} >= 1}"
    );
}

#[test]
fn format_result_binding() {
    let expression = format_result([path("Price"), path("Currency")], "formatPrice");
    insta::assert_snapshot!(
        compile(&expression),
        @"{parts:[{path:'Price'},{path:'Currency'}],formatter:'formatPrice'}"
    );
}
