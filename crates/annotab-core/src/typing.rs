//! EDM primitive types mapped to UI model types and export types.

use annotab_model::{ExportType, Property, TypeConfig, TypeConstraints};

const UI_TYPE_NAMESPACE: &str = "sap.ui.model.odata.type.";

/// Export type of an EDM primitive; unmapped types export as `String`.
pub fn export_type(type_name: &str) -> ExportType {
    match type_name {
        "Edm.Decimal" | "Edm.Int16" | "Edm.Int32" | "Edm.Int64" | "Edm.Double" | "Edm.Single"
        | "Edm.Byte" | "Edm.SByte" => ExportType::Number,
        "Edm.Date" | "Edm.DateOfTime" => ExportType::Date,
        "Edm.DateTimeOffset" => ExportType::DateTime,
        "Edm.TimeOfDay" => ExportType::Time,
        "Edm.Boolean" => ExportType::Boolean,
        _ => ExportType::String,
    }
}

/// Types the backend cannot order by.
pub fn is_sortable_type(type_name: &str) -> bool {
    !(type_name == "Edm.Stream"
        || type_name.starts_with("Edm.Geography")
        || type_name.starts_with("Edm.Geometry"))
}

fn ui_type_suffix(type_name: &str) -> Option<&'static str> {
    let suffix = match type_name {
        "Edm.Boolean" => "Boolean",
        "Edm.Byte" => "Byte",
        "Edm.Date" => "Date",
        "Edm.DateTimeOffset" => "DateTimeOffset",
        "Edm.Decimal" => "Decimal",
        "Edm.Double" => "Double",
        "Edm.Guid" => "Guid",
        "Edm.Int16" => "Int16",
        "Edm.Int32" => "Int32",
        "Edm.Int64" => "Int64",
        "Edm.SByte" => "SByte",
        "Edm.Single" => "Single",
        "Edm.Stream" => "Stream",
        "Edm.String" => "String",
        "Edm.TimeOfDay" => "TimeOfDay",
        _ => return None,
    };
    Some(suffix)
}

/// UI model type and constraints for a primitive property.
pub fn type_config(property: &Property) -> Option<TypeConfig> {
    let suffix = ui_type_suffix(&property.type_name)?;
    let mut constraints = TypeConstraints::default();
    match suffix {
        "Decimal" => {
            constraints.precision = property.precision;
            constraints.scale = property.scale;
        }
        "DateTimeOffset" | "TimeOfDay" => constraints.precision = property.precision,
        "String" => {
            constraints.max_length = property.max_length;
            if property.annotations.is_digit_sequence {
                constraints.is_digit_sequence = Some(true);
            }
        }
        _ => {}
    }
    if !property.nullable {
        constraints.nullable = Some(false);
    }
    Some(TypeConfig {
        class_name: format!("{UI_TYPE_NAMESPACE}{suffix}"),
        constraints,
    })
}
