//! Annotation path expressions and dynamic (path-or-literal) values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// A `$Path` expression relative to the annotated entity type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathExpression {
    #[serde(rename = "$Path")]
    pub path: String,
}

impl PathExpression {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }
}

/// A `$AnnotationPath` expression, e.g. `@UI.FieldGroup#Prices`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationPathExpression {
    #[serde(rename = "$AnnotationPath")]
    pub value: String,
}

impl AnnotationPathExpression {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn parse(&self) -> Result<AnnotationPath, ModelError> {
        self.value.parse()
    }
}

/// Either a `$Path` to a property or a literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dynamic<T> {
    Path(PathExpression),
    Static(T),
}

pub type DynamicBool = Dynamic<bool>;

impl<T> Dynamic<T> {
    pub fn path(&self) -> Option<&str> {
        match self {
            Dynamic::Path(expr) => Some(expr.as_str()),
            Dynamic::Static(_) => None,
        }
    }

    pub fn static_value(&self) -> Option<&T> {
        match self {
            Dynamic::Static(value) => Some(value),
            Dynamic::Path(_) => None,
        }
    }
}

impl Dynamic<bool> {
    pub fn is_static_true(&self) -> bool {
        matches!(self, Dynamic::Static(true))
    }

    pub fn is_static_false(&self) -> bool {
        matches!(self, Dynamic::Static(false))
    }
}

/// Annotation terms the compiler understands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    LineItem,
    FieldGroup,
    DataPoint,
    PresentationVariant,
    /// Any other term (Chart, Contact, ...). Kept so callers can skip it.
    Other(String),
}

impl Term {
    pub fn as_str(&self) -> &str {
        match self {
            Term::LineItem => "LineItem",
            Term::FieldGroup => "FieldGroup",
            Term::DataPoint => "DataPoint",
            Term::PresentationVariant => "PresentationVariant",
            Term::Other(name) => name,
        }
    }
}

const UI_NAMESPACE: &str = "com.sap.vocabularies.UI.v1.";
const UI_ALIAS: &str = "UI.";

/// Parsed form of an annotation path such as `_Supplier/@UI.DataPoint#Rating`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotationPath {
    /// Navigation segments leading to the annotated entity type.
    pub navigation: Vec<String>,
    pub term: Term,
    pub qualifier: Option<String>,
}

impl AnnotationPath {
    pub fn new(term: Term, qualifier: Option<&str>) -> Self {
        Self {
            navigation: Vec::new(),
            term,
            qualifier: qualifier.map(str::to_string),
        }
    }

    /// Qualifier used as map key; the unqualified annotation is stored under `""`.
    pub fn qualifier_key(&self) -> &str {
        self.qualifier.as_deref().unwrap_or("")
    }

    /// Navigation prefix including the trailing slash, or empty.
    pub fn navigation_prefix(&self) -> String {
        if self.navigation.is_empty() {
            String::new()
        } else {
            format!("{}/", self.navigation.join("/"))
        }
    }
}

impl fmt::Display for AnnotationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@UI.{}", self.navigation_prefix(), self.term.as_str())?;
        if let Some(qualifier) = &self.qualifier {
            write!(f, "#{qualifier}")?;
        }
        Ok(())
    }
}

impl FromStr for AnnotationPath {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| ModelError::InvalidAnnotationPath {
            path: s.to_string(),
            message: message.to_string(),
        };
        let trimmed = s.trim();
        let at = trimmed.find('@').ok_or_else(|| invalid("missing '@'"))?;
        let (navigation_part, term_part) = trimmed.split_at(at);
        let navigation: Vec<String> = navigation_part
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        let term_part = &term_part[1..];
        let (term_name, qualifier) = match term_part.split_once('#') {
            Some((term, qualifier)) if !qualifier.is_empty() => (term, Some(qualifier.to_string())),
            Some(_) => return Err(invalid("empty qualifier")),
            None => (term_part, None),
        };
        let term_name = term_name
            .strip_prefix(UI_NAMESPACE)
            .or_else(|| term_name.strip_prefix(UI_ALIAS))
            .unwrap_or(term_name);
        if term_name.is_empty() {
            return Err(invalid("empty term"));
        }
        let term = match term_name {
            "LineItem" => Term::LineItem,
            "FieldGroup" => Term::FieldGroup,
            "DataPoint" => Term::DataPoint,
            "PresentationVariant" => Term::PresentationVariant,
            other => Term::Other(other.to_string()),
        };
        Ok(Self {
            navigation,
            term,
            qualifier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_alias_and_namespace_forms() {
        let short: AnnotationPath = "@UI.LineItem#Orders".parse().unwrap();
        let long: AnnotationPath = "@com.sap.vocabularies.UI.v1.LineItem#Orders"
            .parse()
            .unwrap();
        assert_eq!(short, long);
        assert_eq!(short.term, Term::LineItem);
        assert_eq!(short.qualifier_key(), "Orders");
    }

    #[test]
    fn parses_navigation_prefix() {
        let path: AnnotationPath = "_Supplier/@UI.DataPoint#Rating".parse().unwrap();
        assert_eq!(path.navigation, vec!["_Supplier".to_string()]);
        assert_eq!(path.navigation_prefix(), "_Supplier/");
        assert_eq!(path.to_string(), "_Supplier/@UI.DataPoint#Rating");
    }

    #[test]
    fn unknown_terms_are_kept() {
        let path: AnnotationPath = "@UI.Chart".parse().unwrap();
        assert_eq!(path.term, Term::Other("Chart".to_string()));
    }

    #[test]
    fn rejects_missing_marker() {
        assert!("UI.LineItem".parse::<AnnotationPath>().is_err());
        assert!("@UI.LineItem#".parse::<AnnotationPath>().is_err());
    }
}
