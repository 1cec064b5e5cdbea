use super::{RuleExpr, Value};
use crate::error::EvaluationError;

/// Which conditional rule is being evaluated; fixes the fail-closed default.
///
/// A field is shown unless told otherwise and optional unless told otherwise,
/// so visibility defaults to `true` and mandatory to `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Visibility,
    Mandatory,
}

impl RuleKind {
    pub fn default_outcome(self) -> bool {
        matches!(self, RuleKind::Visibility)
    }
}

/// Resolves a field code to its current value during evaluation.
pub trait StateLookup {
    fn value_of(&self, field_code: &str) -> Option<Value>;
}

impl<F> StateLookup for F
where
    F: Fn(&str) -> Option<Value>,
{
    fn value_of(&self, field_code: &str) -> Option<Value> {
        self(field_code)
    }
}

/// Evaluates a compiled rule against the current form state.
///
/// Deterministic for a given expression and state snapshot. A reference to a
/// field absent from state is an error, which callers convert to the rule
/// kind's default outcome.
pub fn evaluate(expr: &RuleExpr, lookup: &impl StateLookup) -> Result<bool, EvaluationError> {
    match evaluate_value(expr, lookup)? {
        Value::Bool(b) => Ok(b),
        other => Err(type_mismatch("rule", "Bool", other)),
    }
}

fn evaluate_value(expr: &RuleExpr, lookup: &impl StateLookup) -> Result<Value, EvaluationError> {
    match expr {
        RuleExpr::Literal(v) => Ok(v.clone()),
        RuleExpr::Field(code) => lookup
            .value_of(code)
            .ok_or_else(|| EvaluationError::FieldNotFound(code.clone())),

        RuleExpr::Not(v) => {
            let val = evaluate_value(v, lookup)?;
            match val.as_bool() {
                Some(b) => Ok(Value::Bool(!b)),
                None => Err(type_mismatch("NOT", "Bool", val)),
            }
        }
        RuleExpr::And(l, r) => {
            // Short-circuit: the right side is not evaluated when the left is false.
            let left = require_bool("AND", evaluate_value(l, lookup)?)?;
            if !left {
                return Ok(Value::Bool(false));
            }
            let right = require_bool("AND", evaluate_value(r, lookup)?)?;
            Ok(Value::Bool(right))
        }
        RuleExpr::Or(l, r) => {
            let left = require_bool("OR", evaluate_value(l, lookup)?)?;
            if left {
                return Ok(Value::Bool(true));
            }
            let right = require_bool("OR", evaluate_value(r, lookup)?)?;
            Ok(Value::Bool(right))
        }

        RuleExpr::Equal(l, r) => Ok(Value::Bool(values_equal(
            &evaluate_value(l, lookup)?,
            &evaluate_value(r, lookup)?,
        ))),
        RuleExpr::NotEqual(l, r) => Ok(Value::Bool(!values_equal(
            &evaluate_value(l, lookup)?,
            &evaluate_value(r, lookup)?,
        ))),

        RuleExpr::GreaterThan(l, r) => eval_ordering(l, r, lookup, ">", |a, b| a > b),
        RuleExpr::GreaterThanOrEqual(l, r) => eval_ordering(l, r, lookup, ">=", |a, b| a >= b),
        RuleExpr::SmallerThan(l, r) => eval_ordering(l, r, lookup, "<", |a, b| a < b),
        RuleExpr::SmallerThanOrEqual(l, r) => eval_ordering(l, r, lookup, "<=", |a, b| a <= b),
    }
}

/// Equality is numeric when both sides coerce to numbers, textual otherwise.
/// Form values arrive as text, so `amount = 5000` must match `Text("5000")`.
fn values_equal(l: &Value, r: &Value) -> bool {
    match (l.as_number(), r.as_number()) {
        (Some(a), Some(b)) => a == b,
        _ => l.to_string() == r.to_string(),
    }
}

fn eval_ordering<F>(
    l: &RuleExpr,
    r: &RuleExpr,
    lookup: &impl StateLookup,
    op: &'static str,
    f: F,
) -> Result<Value, EvaluationError>
where
    F: Fn(f64, f64) -> bool,
{
    let left = evaluate_value(l, lookup)?;
    let right = evaluate_value(r, lookup)?;
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => Ok(Value::Bool(f(a, b))),
        (None, _) => Err(type_mismatch(op, "Number", left)),
        (_, None) => Err(type_mismatch(op, "Number", right)),
    }
}

fn require_bool(op: &str, val: Value) -> Result<bool, EvaluationError> {
    val.as_bool()
        .ok_or_else(|| type_mismatch(op, "Bool", val.clone()))
}

fn type_mismatch(op: &str, expected: &str, found: Value) -> EvaluationError {
    EvaluationError::TypeMismatch {
        operation: op.to_string(),
        expected: expected.to_string(),
        found,
    }
}
