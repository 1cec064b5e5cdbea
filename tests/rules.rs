//! Conditional rule tests: parsing, evaluation, and flag computation.
mod common;

use common::{field, field_record, grouped_field};
use kumiko::error::RuleParseError;
use kumiko::layout::compose;
use kumiko::metadata::FieldDefinition;
use kumiko::rule::{evaluate, parse_rule, Channel, FieldFlags, RuleExpr, RuleKind, Value};
use kumiko::state::DynamicFormState;

#[test]
fn parses_comparison_with_boolean_combinators() {
    let expr = parse_rule("lcAmount > 1000 AND currency = 'USD'").expect("valid rule");
    assert_eq!(
        expr,
        RuleExpr::And(
            Box::new(RuleExpr::GreaterThan(
                Box::new(RuleExpr::Field("lcAmount".to_string())),
                Box::new(RuleExpr::Literal(Value::Number(1000.0))),
            )),
            Box::new(RuleExpr::Equal(
                Box::new(RuleExpr::Field("currency".to_string())),
                Box::new(RuleExpr::Literal(Value::Text("USD".to_string()))),
            )),
        )
    );
}

#[test]
fn parses_keyword_boolean_combinators() {
    let expr = parse_rule("NOT confirmed OR amount <= 50").expect("valid rule");
    let RuleExpr::Or(left, _) = expr else {
        panic!("expected OR at the root");
    };
    assert!(matches!(*left, RuleExpr::Not(_)));
}

#[test]
fn parser_rejects_alternate_operator_spellings() {
    // One spelling per operator; C-style forms are not part of the grammar.
    for bad in ["a == 1", "a <> 1", "a && b", "a || b", "!a"] {
        assert!(
            matches!(parse_rule(bad), Err(RuleParseError::Syntax { .. })),
            "{bad:?} should not parse"
        );
    }
}

#[test]
fn parser_respects_parentheses() {
    let expr = parse_rule("a = 1 AND (b = 2 OR c = 3)").expect("valid rule");
    let RuleExpr::And(_, right) = expr else {
        panic!("expected AND at the root");
    };
    assert!(matches!(*right, RuleExpr::Or(_, _)));
}

#[test]
fn keyword_prefixed_identifiers_are_fields_not_keywords() {
    // "ORDER" starts with "OR" but must parse as a field reference.
    let expr = parse_rule("ORDERREF = 'X'").expect("valid rule");
    assert!(matches!(
        expr,
        RuleExpr::Equal(ref l, _) if **l == RuleExpr::Field("ORDERREF".to_string())
    ));
}

#[test]
fn empty_and_malformed_rules_fail_to_parse() {
    assert_eq!(parse_rule("   "), Err(RuleParseError::Empty));
    assert!(matches!(
        parse_rule("amount >"),
        Err(RuleParseError::Syntax { .. })
    ));
    assert!(matches!(
        parse_rule("(a = 1"),
        Err(RuleParseError::Syntax { .. })
    ));
}

#[test]
fn evaluation_is_deterministic_and_coerces_text_numbers() {
    let expr = parse_rule("lcAmount > 1000").expect("valid rule");
    // Form values arrive as text; numeric comparison still applies.
    let lookup = |code: &str| match code {
        "lcAmount" => Some(Value::from("5000")),
        _ => None,
    };

    assert_eq!(evaluate(&expr, &lookup), Ok(true));
    assert_eq!(evaluate(&expr, &lookup), Ok(true));
}

#[test]
fn unknown_field_reference_is_an_evaluation_error() {
    let expr = parse_rule("missingField = 'X'").expect("valid rule");
    let lookup = |_: &str| None;
    assert!(evaluate(&expr, &lookup).is_err());
}

#[test]
fn rule_kind_defaults_show_and_dont_require() {
    assert!(RuleKind::Visibility.default_outcome());
    assert!(!RuleKind::Mandatory.default_outcome());
}

#[test]
fn malformed_record_expression_compiles_to_no_rule() {
    let mut record = field_record("main", "amounts", "lcAmount");
    record.conditional_visibility_expr = Some("currency ==".to_string());
    record.conditional_mandatory_expr = Some("currency = 'USD'".to_string());

    let definition = FieldDefinition::from_record(record);
    assert_eq!(definition.visibility_rule, None);
    assert!(definition.mandatory_rule.is_some());
}

#[test]
fn flags_default_without_rules() {
    let panes = compose(&[field("main", "amounts", "lcAmount")]);
    let state = DynamicFormState::new();

    let flags = FieldFlags::evaluate(&panes, &state, Channel::Portal);
    assert!(flags.is_visible("lcAmount"));
    assert!(!flags.is_mandatory("lcAmount"));
    assert!(flags.failures.is_empty());
}

#[test]
fn channel_selects_the_static_mandatory_flag() {
    let mut record = field_record("main", "amounts", "lcAmount");
    record.maker_mandatory = true;
    let panes = compose(&[FieldDefinition::from_record(record)]);
    let state = DynamicFormState::new();

    assert!(FieldFlags::evaluate(&panes, &state, Channel::Maker).is_mandatory("lcAmount"));
    assert!(!FieldFlags::evaluate(&panes, &state, Channel::Portal).is_mandatory("lcAmount"));
}

#[test]
fn visibility_rule_follows_form_state() {
    let mut record = field_record("main", "amounts", "tolerance");
    record.conditional_visibility_expr = Some("lcType = 'TRANSFERABLE'".to_string());
    let panes = compose(&[FieldDefinition::from_record(record)]);

    let hidden = DynamicFormState::new().set_field("lcType", Value::from("SIGHT"));
    assert!(!FieldFlags::evaluate(&panes, &hidden, Channel::Portal).is_visible("tolerance"));

    let shown = hidden.set_field("lcType", Value::from("TRANSFERABLE"));
    assert!(FieldFlags::evaluate(&panes, &shown, Channel::Portal).is_visible("tolerance"));
}

#[test]
fn failing_mandatory_rule_fails_closed_and_is_recorded() {
    // The mandatory rule references a field absent from state; the field
    // stays optional, one failure is recorded, and the rest of the pane is
    // still evaluated.
    let mut broken = field_record("main", "amounts", "tolerance");
    broken.conditional_mandatory_expr = Some("notInState = 'X'".to_string());
    let panes = compose(&[
        FieldDefinition::from_record(broken),
        field("main", "amounts", "lcAmount"),
    ]);
    let state = DynamicFormState::new();

    let flags = FieldFlags::evaluate(&panes, &state, Channel::Portal);
    assert!(!flags.is_mandatory("tolerance"));
    assert_eq!(flags.failures.len(), 1);
    assert_eq!(flags.failures[0].field_code, "tolerance");
    assert_eq!(flags.failures[0].kind, RuleKind::Mandatory);
    assert_eq!(flags.failures[0].instance, None);
    assert!(flags.visible.contains_key("lcAmount"));
}

#[test]
fn repeatable_group_rules_evaluate_per_instance() {
    // goodsQty is mandatory only in rows whose own goodsUnit says so.
    let mut qty = field_record("main", "goods", "goodsQty");
    qty.group_id = Some("G1".to_string());
    qty.group_is_repeatable = true;
    qty.conditional_mandatory_expr = Some("goodsUnit = 'KG'".to_string());
    let panes = compose(&[
        FieldDefinition::from_record(qty),
        grouped_field("main", "goods", "goodsUnit", "G1", true),
    ]);

    let state = DynamicFormState::for_layout(&panes);
    let (state, first) = state.add_group_instance("G1");
    let first = first.expect("instance added");
    let (state, second) = state.add_group_instance("G1");
    let second = second.expect("instance added");
    let state = state
        .set_instance_field("G1", first, "goodsUnit", Value::from("KG"))
        .set_instance_field("G1", second, "goodsUnit", Value::from("MT"));

    let flags = FieldFlags::evaluate(&panes, &state, Channel::Portal);
    assert!(flags.is_instance_mandatory(first, "goodsQty"));
    assert!(!flags.is_instance_mandatory(second, "goodsQty"));
    assert!(flags.failures.is_empty());
}

#[test]
fn instance_rules_fall_back_to_singleton_state() {
    let mut qty = field_record("main", "goods", "goodsQty");
    qty.group_id = Some("G1".to_string());
    qty.group_is_repeatable = true;
    qty.conditional_visibility_expr = Some("lcType = 'TRANSFERABLE'".to_string());
    let panes = compose(&[FieldDefinition::from_record(qty)]);

    let state = DynamicFormState::for_layout(&panes).set_field("lcType", Value::from("SIGHT"));
    let (state, instance) = state.add_group_instance("G1");
    let instance = instance.expect("instance added");

    let hidden = FieldFlags::evaluate(&panes, &state, Channel::Portal);
    assert!(!hidden.is_instance_visible(instance, "goodsQty"));

    let state = state.set_field("lcType", Value::from("TRANSFERABLE"));
    let shown = FieldFlags::evaluate(&panes, &state, Channel::Portal);
    assert!(shown.is_instance_visible(instance, "goodsQty"));
    assert!(shown.failures.is_empty());
}

#[test]
fn failing_visibility_rule_defaults_to_shown() {
    let mut broken = field_record("main", "amounts", "tolerance");
    broken.conditional_visibility_expr = Some("notInState = 'X'".to_string());
    let panes = compose(&[FieldDefinition::from_record(broken)]);

    let flags = FieldFlags::evaluate(&panes, &DynamicFormState::new(), Channel::Portal);
    assert!(flags.is_visible("tolerance"));
    assert_eq!(flags.failures.len(), 1);
}
