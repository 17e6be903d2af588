//! Spreadsheet export settings for columns.

use annotab_model::{Dynamic, ExportSettings, ExportType, PropertyTarget, TextArrangement};

use crate::typing::export_type;

const DATE_INPUT_FORMAT: &str = "YYYY-MM-DD";

/// Export settings for a column rendering one property.
pub fn property_export(target: &PropertyTarget<'_>, label: Option<&str>) -> ExportSettings {
    let property = target.property;
    let prefix = target.navigation_prefix();
    let mut settings = ExportSettings::new(export_type(&property.type_name));
    settings.label = label.map(str::to_string);

    match property.type_name.as_str() {
        "Edm.Date" => settings.input_format = Some(DATE_INPUT_FORMAT.to_string()),
        "Edm.Decimal" => {
            settings.scale = property.scale;
            settings.delimiter = Some(true);
        }
        "Edm.Int64" => settings.delimiter = Some(true),
        _ => {}
    }

    match &property.annotations.iso_currency {
        Some(Dynamic::Path(currency)) => {
            settings.export_type = ExportType::Currency;
            settings.unit_property = Some(format!("{prefix}{}", currency.as_str()));
        }
        Some(Dynamic::Static(code)) => {
            settings.export_type = ExportType::Currency;
            settings.unit = Some(code.clone());
        }
        None => match &property.annotations.unit {
            Some(Dynamic::Path(unit)) => {
                settings.unit_property = Some(format!("{prefix}{}", unit.as_str()));
            }
            Some(Dynamic::Static(unit)) => settings.unit = Some(unit.clone()),
            None => {}
        },
    }

    match &property.annotations.timezone {
        Some(Dynamic::Path(timezone)) => {
            settings.export_type = ExportType::DateTime;
            settings.timezone_property = Some(format!("{prefix}{}", timezone.as_str()));
            settings.utc = Some(false);
        }
        Some(Dynamic::Static(timezone)) => {
            settings.export_type = ExportType::DateTime;
            settings.timezone = Some(timezone.clone());
            settings.utc = Some(false);
        }
        None => {}
    }

    if let Some(arrangement) = property.text_arrangement()
        && arrangement != TextArrangement::TextSeparate
    {
        settings.export_type = ExportType::String;
        settings.template = Some(arrangement.export_template().to_string());
    }
    settings
}

/// Export settings for a column rendering several properties, one per line.
pub fn composite_export(label: Option<&str>, parts: usize) -> ExportSettings {
    let mut settings = ExportSettings::new(ExportType::String);
    settings.label = label.map(str::to_string);
    let template: Vec<String> = (0..parts).map(|index| format!("{{{index}}}")).collect();
    settings.template = Some(template.join("\n"));
    settings.wrap = Some(true);
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_template_lists_every_part() {
        let settings = composite_export(Some("Amounts"), 3);
        assert_eq!(settings.export_type, ExportType::String);
        assert_eq!(settings.template.as_deref(), Some("{0}\n{1}\n{2}"));
        assert_eq!(settings.wrap, Some(true));
        assert_eq!(settings.label.as_deref(), Some("Amounts"));
    }
}
