//! Expression tree and the folding constructors that build it.
//!
//! Constructors simplify as they go: constants short-circuit boolean
//! operators, nested `and`/`or` are flattened, double negation cancels and
//! negated comparisons flip their operator. Callers therefore never see
//! `true && x` or `!!x` in compiled output.

use std::fmt;

/// A literal operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    String(String),
    Number(f64),
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(f64::from(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl ComparisonOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "===",
            ComparisonOperator::NotEqual => "!==",
            ComparisonOperator::Greater => ">",
            ComparisonOperator::GreaterOrEqual => ">=",
            ComparisonOperator::Less => "<",
            ComparisonOperator::LessOrEqual => "<=",
        }
    }

    /// Operator of the negated comparison.
    pub fn inverse(&self) -> Self {
        match self {
            ComparisonOperator::Equal => ComparisonOperator::NotEqual,
            ComparisonOperator::NotEqual => ComparisonOperator::Equal,
            ComparisonOperator::Greater => ComparisonOperator::LessOrEqual,
            ComparisonOperator::GreaterOrEqual => ComparisonOperator::Less,
            ComparisonOperator::Less => ComparisonOperator::GreaterOrEqual,
            ComparisonOperator::LessOrEqual => ComparisonOperator::Greater,
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant(Value),
    /// Binding path, optionally in a named model (`ui>/isEditable`).
    Path {
        model: Option<String>,
        path: String,
    },
    Not(Box<Expression>),
    And(Vec<Expression>),
    Or(Vec<Expression>),
    Comparison {
        operator: ComparisonOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    IfElse {
        condition: Box<Expression>,
        on_true: Box<Expression>,
        on_false: Box<Expression>,
    },
    /// Multi-part binding passed through a named formatter.
    FormatResult {
        parts: Vec<Expression>,
        formatter: String,
    },
    /// Body of an expression binding written by hand, e.g. in a manifest.
    Embedded(String),
}

impl Expression {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Expression::Constant(Value::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Expression::Constant(_))
    }

    pub fn is_true(&self) -> bool {
        self.as_bool() == Some(true)
    }

    pub fn is_false(&self) -> bool {
        self.as_bool() == Some(false)
    }

    /// True for expressions that always evaluate to a boolean.
    pub fn is_boolean(&self) -> bool {
        match self {
            Expression::Constant(value) => matches!(value, Value::Bool(_)),
            Expression::Not(_)
            | Expression::And(_)
            | Expression::Or(_)
            | Expression::Comparison { .. } => true,
            Expression::IfElse {
                on_true, on_false, ..
            } => on_true.is_boolean() && on_false.is_boolean(),
            Expression::Path { .. }
            | Expression::FormatResult { .. }
            | Expression::Embedded(_) => false,
        }
    }
}

pub fn constant(value: impl Into<Value>) -> Expression {
    Expression::Constant(value.into())
}

pub fn path_in_model(path: impl Into<String>, model: Option<&str>) -> Expression {
    Expression::Path {
        model: model.map(str::to_string),
        path: path.into(),
    }
}

/// Path in the default model.
pub fn path(path: impl Into<String>) -> Expression {
    path_in_model(path, None)
}

pub fn not(expression: Expression) -> Expression {
    match expression {
        Expression::Constant(Value::Bool(value)) => constant(!value),
        Expression::Not(inner) => *inner,
        Expression::Comparison {
            operator,
            left,
            right,
        } => Expression::Comparison {
            operator: operator.inverse(),
            left,
            right,
        },
        other => Expression::Not(Box::new(other)),
    }
}

pub fn and(operands: impl IntoIterator<Item = Expression>) -> Expression {
    let mut flat: Vec<Expression> = Vec::new();
    for operand in operands {
        let nested = match operand {
            Expression::And(nested) => nested,
            other => vec![other],
        };
        for expression in nested {
            if expression.is_false() {
                return constant(false);
            }
            if expression.is_true() || flat.contains(&expression) {
                continue;
            }
            flat.push(expression);
        }
    }
    match flat.len() {
        0 => constant(true),
        1 => flat.remove(0),
        _ => Expression::And(flat),
    }
}

pub fn or(operands: impl IntoIterator<Item = Expression>) -> Expression {
    let mut flat: Vec<Expression> = Vec::new();
    for operand in operands {
        let nested = match operand {
            Expression::Or(nested) => nested,
            other => vec![other],
        };
        for expression in nested {
            if expression.is_true() {
                return constant(true);
            }
            if expression.is_false() || flat.contains(&expression) {
                continue;
            }
            flat.push(expression);
        }
    }
    match flat.len() {
        0 => constant(false),
        1 => flat.remove(0),
        _ => Expression::Or(flat),
    }
}

pub fn compare(operator: ComparisonOperator, left: Expression, right: Expression) -> Expression {
    if let (Expression::Constant(a), Expression::Constant(b)) = (&left, &right) {
        let folded = match operator {
            ComparisonOperator::Equal => Some(a == b),
            ComparisonOperator::NotEqual => Some(a != b),
            _ => match (a, b) {
                (Value::Number(a), Value::Number(b)) => Some(match operator {
                    ComparisonOperator::Greater => a > b,
                    ComparisonOperator::GreaterOrEqual => a >= b,
                    ComparisonOperator::Less => a < b,
                    _ => a <= b,
                }),
                _ => None,
            },
        };
        if let Some(result) = folded {
            return constant(result);
        }
    }
    Expression::Comparison {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// Equality; comparing a boolean expression with a boolean constant collapses
/// to the expression or its negation.
pub fn equal(left: Expression, right: Expression) -> Expression {
    match (left.as_bool(), right.as_bool()) {
        (None, Some(flag)) if left.is_boolean() => {
            if flag {
                left
            } else {
                not(left)
            }
        }
        (Some(flag), None) if right.is_boolean() => {
            if flag {
                right
            } else {
                not(right)
            }
        }
        _ => compare(ComparisonOperator::Equal, left, right),
    }
}

pub fn not_equal(left: Expression, right: Expression) -> Expression {
    not(equal(left, right))
}

pub fn greater_or_equal(left: Expression, right: Expression) -> Expression {
    compare(ComparisonOperator::GreaterOrEqual, left, right)
}

pub fn if_else(condition: Expression, on_true: Expression, on_false: Expression) -> Expression {
    if let Some(flag) = condition.as_bool() {
        return if flag { on_true } else { on_false };
    }
    if on_true == on_false {
        return on_true;
    }
    if let Expression::Not(inner) = condition {
        return Expression::IfElse {
            condition: inner,
            on_true: Box::new(on_false),
            on_false: Box::new(on_true),
        };
    }
    Expression::IfElse {
        condition: Box::new(condition),
        on_true: Box::new(on_true),
        on_false: Box::new(on_false),
    }
}

/// Reads a binding string back into an expression.
///
/// Accepts `true`/`false`, simple bindings (`{path}`, `{model>path}`) and
/// expression bindings (`{= ...}`); anything else is a string constant.
pub fn binding(text: &str) -> Expression {
    let trimmed = text.trim();
    match trimmed {
        "true" => return constant(true),
        "false" => return constant(false),
        _ => {}
    }
    let Some(inner) = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
    else {
        return constant(trimmed);
    };
    if let Some(body) = inner.strip_prefix('=') {
        return Expression::Embedded(body.trim().to_string());
    }
    if inner.contains([':', '{', '}', ',']) {
        return constant(trimmed);
    }
    match inner.split_once('>') {
        Some((model, path)) => path_in_model(path, Some(model)),
        None => self::path(inner),
    }
}

pub fn format_result(
    parts: impl IntoIterator<Item = Expression>,
    formatter: impl Into<String>,
) -> Expression {
    Expression::FormatResult {
        parts: parts.into_iter().collect(),
        formatter: formatter.into(),
    }
}
