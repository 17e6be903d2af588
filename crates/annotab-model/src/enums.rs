//! Type-safe enumerations for annotation and manifest values.
//!
//! Annotation vocabularies spell enum members as `UI.ImportanceType/High`
//! or `#TextOnly`; manifests use the bare member name. The `FromStr`
//! implementations accept all three spellings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Strips a vocabulary type prefix (`UI.ImportanceType/`) or a `#` marker.
fn member_name(s: &str) -> &str {
    let trimmed = s.trim();
    let trimmed = trimmed.rsplit('/').next().unwrap_or(trimmed);
    trimmed.trim_start_matches('#')
}

/// `UI.Importance` of a field or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Importance {
    High,
    Medium,
    Low,
    None,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::High => "High",
            Importance::Medium => "Medium",
            Importance::Low => "Low",
            Importance::None => "None",
        }
    }

    /// Ranking used when a field group inherits the importance of its members.
    pub fn weight(&self) -> u8 {
        match self {
            Importance::High => 3,
            Importance::Medium => 2,
            Importance::Low => 1,
            Importance::None => 0,
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Importance {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match member_name(s) {
            "High" => Ok(Importance::High),
            "Medium" => Ok(Importance::Medium),
            "Low" => Ok(Importance::Low),
            "None" => Ok(Importance::None),
            _ => Err(ModelError::unknown("importance", s)),
        }
    }
}

/// `UI.TextArrangement` of a property with a `Common.Text` partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextArrangement {
    TextFirst,
    TextLast,
    TextOnly,
    TextSeparate,
}

impl TextArrangement {
    /// Export template combining value `{0}` and text `{1}`.
    pub fn export_template(&self) -> &'static str {
        match self {
            TextArrangement::TextFirst => "{1} ({0})",
            TextArrangement::TextLast => "{0} ({1})",
            TextArrangement::TextOnly => "{1}",
            TextArrangement::TextSeparate => "{0}",
        }
    }
}

impl FromStr for TextArrangement {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match member_name(s) {
            "TextFirst" => Ok(TextArrangement::TextFirst),
            "TextLast" => Ok(TextArrangement::TextLast),
            "TextOnly" => Ok(TextArrangement::TextOnly),
            "TextSeparate" => Ok(TextArrangement::TextSeparate),
            _ => Err(ModelError::unknown("text arrangement", s)),
        }
    }
}

/// Table control type requested in the manifest.
///
/// `AnalyticalTable` is a compile-time request only; the assembler always
/// hands a `GridTable` to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TableType {
    #[default]
    ResponsiveTable,
    GridTable,
    AnalyticalTable,
    TreeTable,
}

impl TableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableType::ResponsiveTable => "ResponsiveTable",
            TableType::GridTable => "GridTable",
            TableType::AnalyticalTable => "AnalyticalTable",
            TableType::TreeTable => "TreeTable",
        }
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match member_name(s) {
            "ResponsiveTable" => Ok(TableType::ResponsiveTable),
            "GridTable" => Ok(TableType::GridTable),
            "AnalyticalTable" => Ok(TableType::AnalyticalTable),
            "TreeTable" => Ok(TableType::TreeTable),
            _ => Err(ModelError::unknown("table type", s)),
        }
    }
}

/// Selection mode as written in the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SelectionModeSetting {
    None,
    Single,
    Multi,
    #[default]
    Auto,
}

/// Creation mode of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CreationMode {
    #[default]
    NewPage,
    Inline,
    CreationRow,
    InlineCreationRows,
    External,
}

impl CreationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreationMode::NewPage => "NewPage",
            CreationMode::Inline => "Inline",
            CreationMode::CreationRow => "CreationRow",
            CreationMode::InlineCreationRows => "InlineCreationRows",
            CreationMode::External => "External",
        }
    }
}

impl fmt::Display for CreationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page template hosting the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TemplateType {
    #[default]
    ListReport,
    ObjectPage,
    AnalyticalListPage,
}

/// Variant management level configured for the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VariantManagementType {
    None,
    #[default]
    Page,
    Control,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HorizontalAlign {
    Begin,
    Center,
    End,
}

/// Placement of a custom element relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Placement {
    Before,
    #[default]
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowCountMode {
    Auto,
    Fixed,
    Interactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnableOnSelect {
    Single,
    Multi,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn importance_accepts_vocabulary_spelling() {
        assert_eq!(
            "UI.ImportanceType/High".parse::<Importance>().unwrap(),
            Importance::High
        );
        assert_eq!("Low".parse::<Importance>().unwrap(), Importance::Low);
        assert!("Highest".parse::<Importance>().is_err());
    }

    #[test]
    fn text_arrangement_accepts_hash_marker() {
        assert_eq!(
            "#TextOnly".parse::<TextArrangement>().unwrap(),
            TextArrangement::TextOnly
        );
        assert_eq!(
            "UI.TextArrangementType/TextFirst"
                .parse::<TextArrangement>()
                .unwrap(),
            TextArrangement::TextFirst
        );
    }

    #[test]
    fn importance_weight_orders_levels() {
        assert!(Importance::High.weight() > Importance::Medium.weight());
        assert!(Importance::Low.weight() > Importance::None.weight());
    }
}
