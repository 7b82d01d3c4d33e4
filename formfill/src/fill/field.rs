//! Tagged form-field model and fill planning.

use crate::candidate::RowData;

/// Cell values that check a checkbox. Everything else unchecks it.
const CHECKED_VALUES: [&str; 4] = ["true", "1", "yes", "是"];

/// Prefix marking a signature cell as an image file reference.
const IMAGE_PREFIX: &str = "file://";

/// The kind of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Signature,
    Checkbox,
    Button,
    Dropdown,
    Radio,
    OptionList,
}

/// A named field in a form template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub kind: FieldKind,
}

/// The operation a filler should perform on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAction {
    /// Set the field's text content.
    SetText(String),
    /// Draw the cell text into the field's widget area.
    DrawText(String),
    /// Draw the referenced image into the field's widget area.
    DrawImage { file: String },
    /// Check the checkbox.
    Check,
    /// Uncheck the checkbox.
    Uncheck,
    /// The field kind has no fill support; callers decide whether that is
    /// an error or a no-op.
    Unsupported { kind: FieldKind },
}

/// Plans the fill operation for one field from its raw cell text.
///
/// Returns `None` for an empty cell: the field is left untouched, matching
/// how blank spreadsheet cells behave. Signature cells prefixed with
/// `file://` reference an image by file name; any other signature text is
/// drawn as text.
pub fn plan_field(kind: FieldKind, raw: &str) -> Option<FieldAction> {
    if raw.is_empty() {
        return None;
    }
    Some(match kind {
        FieldKind::Text => FieldAction::SetText(raw.to_string()),
        FieldKind::Signature => match raw.strip_prefix(IMAGE_PREFIX) {
            Some(file) => FieldAction::DrawImage {
                file: file.to_string(),
            },
            None => FieldAction::DrawText(raw.to_string()),
        },
        FieldKind::Checkbox => {
            if CHECKED_VALUES.contains(&raw) {
                FieldAction::Check
            } else {
                FieldAction::Uncheck
            }
        }
        kind @ (FieldKind::Button
        | FieldKind::Dropdown
        | FieldKind::Radio
        | FieldKind::OptionList) => FieldAction::Unsupported { kind },
    })
}

/// Plans fill operations for every field of a form against one row.
///
/// Fields whose column is absent or empty are omitted from the plan.
pub fn plan_fields(fields: &[FormField], row: &RowData) -> Vec<(String, FieldAction)> {
    fields
        .iter()
        .filter_map(|field| {
            let raw = row.get(&field.name).map(String::as_str).unwrap_or("");
            plan_field(field.kind, raw).map(|action| (field.name.clone(), action))
        })
        .collect()
}
