//! The document filler contract and the text-template reference filler.

use std::future::Future;

use thiserror::Error;

use crate::candidate::RowData;
use crate::fill::FieldKind;

/// Fills one template with one row of data, producing the output bytes.
///
/// Implementations wrap whatever document engine the application uses; the
/// pipeline only cares that a failure is reported per item. Fillers are
/// shared across concurrent invocations and must not mutate the template.
pub trait DocumentFiller: Send + Sync + 'static {
    /// Produces the filled document for `row`.
    fn fill(
        &self,
        template: &[u8],
        row: &RowData,
    ) -> impl Future<Output = Result<Vec<u8>, FillError>> + Send;
}

impl<T: DocumentFiller> DocumentFiller for std::sync::Arc<T> {
    async fn fill(&self, template: &[u8], row: &RowData) -> Result<Vec<u8>, FillError> {
        (**self).fill(template, row).await
    }
}

/// Errors from filling a single document.
#[derive(Debug, Error)]
pub enum FillError {
    /// Template bytes are not valid UTF-8 (text-template filler only).
    #[error("template is not valid UTF-8: {0}")]
    TemplateEncoding(#[from] std::str::Utf8Error),

    /// A `{{...}}` placeholder is never closed.
    #[error("unterminated placeholder at byte {offset}")]
    UnterminatedPlaceholder { offset: usize },

    /// The row has no value for a column the template references.
    #[error("row has no value for column {column:?}")]
    MissingColumn { column: String },

    /// The template contains a field kind the filler cannot fill.
    #[error("unsupported field kind {kind:?} for field {name:?}")]
    UnsupportedField { name: String, kind: FieldKind },

    /// Failure reported by an external document engine.
    #[error("document engine error: {0}")]
    Engine(String),
}

/// Reference [`DocumentFiller`] for UTF-8 templates with `{{column}}`
/// placeholders.
///
/// Placeholder names are trimmed, so `{{ name }}` and `{{name}}` are
/// equivalent. A placeholder whose column is absent from the row is an
/// error; an empty cell substitutes the empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextTemplateFiller;

impl TextTemplateFiller {
    pub fn new() -> Self {
        Self
    }

    fn render(template: &str, row: &RowData) -> Result<String, FillError> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or(FillError::UnterminatedPlaceholder {
                offset: template.len() - rest.len() + start,
            })?;
            let column = after[..end].trim();
            let value = row.get(column).ok_or_else(|| FillError::MissingColumn {
                column: column.to_string(),
            })?;
            out.push_str(value);
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

impl DocumentFiller for TextTemplateFiller {
    async fn fill(&self, template: &[u8], row: &RowData) -> Result<Vec<u8>, FillError> {
        let text = std::str::from_utf8(template)?;
        Ok(Self::render(text, row)?.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RowData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_substitutes_placeholders() {
        let filler = TextTemplateFiller::new();
        let out = filler
            .fill(
                b"Dear {{ name }}, your id is {{id}}.",
                &row(&[("name", "Ada"), ("id", "7")]),
            )
            .await
            .unwrap();
        assert_eq!(out, b"Dear Ada, your id is 7.");
    }

    #[tokio::test]
    async fn test_empty_cell_substitutes_empty_string() {
        let filler = TextTemplateFiller::new();
        let out = filler
            .fill(b"[{{note}}]", &row(&[("note", "")]))
            .await
            .unwrap();
        assert_eq!(out, b"[]");
    }

    #[tokio::test]
    async fn test_missing_column_is_an_error() {
        let filler = TextTemplateFiller::new();
        let err = filler.fill(b"{{absent}}", &row(&[])).await.unwrap_err();
        assert!(matches!(err, FillError::MissingColumn { column } if column == "absent"));
    }

    #[tokio::test]
    async fn test_unterminated_placeholder_is_an_error() {
        let filler = TextTemplateFiller::new();
        let err = filler
            .fill(b"abc {{oops", &row(&[("oops", "x")]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FillError::UnterminatedPlaceholder { offset: 4 }
        ));
    }

    #[tokio::test]
    async fn test_invalid_utf8_template_is_an_error() {
        let filler = TextTemplateFiller::new();
        let err = filler.fill(&[0xFF, 0xFE], &row(&[])).await.unwrap_err();
        assert!(matches!(err, FillError::TemplateEncoding(_)));
    }

    #[tokio::test]
    async fn test_template_without_placeholders_passes_through() {
        let filler = TextTemplateFiller::new();
        let out = filler.fill(b"static content", &row(&[])).await.unwrap();
        assert_eq!(out, b"static content");
    }
}
