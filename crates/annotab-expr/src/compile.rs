//! Compilation of expressions into binding strings.
//!
//! | expression              | compiled                                 |
//! |-------------------------|------------------------------------------|
//! | boolean constant        | `true` / `false`                         |
//! | string constant         | the string itself                        |
//! | lone path               | `{model>path}`                           |
//! | format result           | `{parts:[{path:'a'}],formatter:'f'}`     |
//! | anything else           | `{= ...}` expression binding             |

use crate::expression::{Expression, Value};

pub fn compile(expression: &Expression) -> String {
    match expression {
        Expression::Constant(value) => compile_constant(value),
        Expression::Path { model, path } => format!("{{{}}}", binding_path(model.as_deref(), path)),
        Expression::FormatResult { parts, formatter } => format_result_binding(parts, formatter),
        composite => format!("{{= {}}}", body(composite)),
    }
}

fn compile_constant(value: &Value) -> String {
    match value {
        Value::Bool(flag) => flag.to_string(),
        Value::String(text) => text.clone(),
        Value::Number(number) => format_number(*number),
    }
}

fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{number:.0}")
    } else {
        number.to_string()
    }
}

fn binding_path(model: Option<&str>, path: &str) -> String {
    match model {
        Some(model) => format!("{model}>{path}"),
        None => path.to_string(),
    }
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn format_result_binding(parts: &[Expression], formatter: &str) -> String {
    let parts: Vec<String> = parts
        .iter()
        .map(|part| match part {
            Expression::Path {
                model: Some(model),
                path,
            } => format!("{{path:{},model:{}}}", quote(path), quote(model)),
            Expression::Path { model: None, path } => format!("{{path:{}}}", quote(path)),
            Expression::Constant(value) => format!("{{value:{}}}", operand_constant(value)),
            other => format!("{{value:{}}}", quote(&compile(other))),
        })
        .collect();
    format!("{{parts:[{}],formatter:{}}}", parts.join(","), quote(formatter))
}

fn operand_constant(value: &Value) -> String {
    match value {
        Value::Bool(flag) => flag.to_string(),
        Value::String(text) => quote(text),
        Value::Number(number) => format_number(*number),
    }
}

/// Expression body without surrounding parentheses.
fn body(expression: &Expression) -> String {
    match expression {
        Expression::Constant(value) => operand_constant(value),
        Expression::Path { model, path } => format!("%{{{}}}", binding_path(model.as_deref(), path)),
        Expression::Not(inner) => format!("!{}", operand(inner)),
        Expression::And(operands) => join(operands, " && "),
        Expression::Or(operands) => join(operands, " || "),
        Expression::Comparison {
            operator,
            left,
            right,
        } => format!("{} {operator} {}", operand(left), operand(right)),
        Expression::IfElse {
            condition,
            on_true,
            on_false,
        } => format!(
            "{} ? {} : {}",
            operand(condition),
            operand(on_true),
            operand(on_false)
        ),
        Expression::FormatResult { parts, formatter } => {
            format!("${}", format_result_binding(parts, formatter))
        }
        Expression::Embedded(body) => body.clone(),
    }
}

fn join(operands: &[Expression], separator: &str) -> String {
    operands
        .iter()
        .map(operand)
        .collect::<Vec<_>>()
        .join(separator)
}

fn operand(expression: &Expression) -> String {
    match expression {
        Expression::And(_)
        | Expression::Or(_)
        | Expression::Comparison { .. }
        | Expression::IfElse { .. }
        | Expression::Embedded(_) => format!("({})", body(expression)),
        other => body(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{and, constant, equal, not, path, path_in_model};

    #[test]
    fn constants_compile_to_plain_strings() {
        assert_eq!(compile(&constant(true)), "true");
        assert_eq!(compile(&constant("Multi")), "Multi");
        assert_eq!(compile(&constant(1.0)), "1");
    }

    #[test]
    fn lone_path_is_a_property_binding() {
        assert_eq!(
            compile(&path_in_model("/isEditable", Some("ui"))),
            "{ui>/isEditable}"
        );
    }

    #[test]
    fn negated_path_is_an_expression_binding() {
        assert_eq!(compile(&not(path("IsActive"))), "{= !%{IsActive}}");
    }

    #[test]
    fn nested_operands_are_parenthesized() {
        let expression = and([
            not(equal(path("Hidden"), constant(true))),
            path_in_model("/isEditable", Some("ui")),
        ]);
        assert_eq!(
            compile(&expression),
            "{= (%{Hidden} !== true) && %{ui>/isEditable}}"
        );
    }

    #[test]
    fn strings_are_quoted_inside_expressions() {
        let expression = equal(path("Status"), constant("it's"));
        assert_eq!(compile(&expression), "{= %{Status} === 'it\\'s'}");
    }
}
