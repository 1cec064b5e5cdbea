use super::Value;

/// The compiled AST of a conditional visibility or mandatory expression.
///
/// Expressions are compiled once, when a field definition is converted from its
/// store record, and evaluated many times against live form state.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleExpr {
    // Logical
    And(Box<RuleExpr>, Box<RuleExpr>),
    Or(Box<RuleExpr>, Box<RuleExpr>),
    Not(Box<RuleExpr>),

    // Comparison
    Equal(Box<RuleExpr>, Box<RuleExpr>),
    NotEqual(Box<RuleExpr>, Box<RuleExpr>),
    GreaterThan(Box<RuleExpr>, Box<RuleExpr>),
    GreaterThanOrEqual(Box<RuleExpr>, Box<RuleExpr>),
    SmallerThan(Box<RuleExpr>, Box<RuleExpr>),
    SmallerThanOrEqual(Box<RuleExpr>, Box<RuleExpr>),

    // Leaf nodes
    Literal(Value),
    Field(String),
}
