//! Candidate enumeration - the source end of the pipeline.
//!
//! A candidate is one spreadsheet row paired with the file name its output
//! will be written under. Names are computed up front, before the row
//! enters the pipeline, so every later stage can log and report per item
//! without re-deriving them.

use std::collections::HashMap;

use async_stream::stream;
use tokio_util::sync::CancellationToken;

use crate::pipeline::ItemStream;

/// One spreadsheet row: column header to cell text.
///
/// Rows are immutable once enumerated; stages move them by value.
pub type RowData = HashMap<String, String>;

/// One unit of work: a row and the output file name it will produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Output file name, computed by the [`NamingRule`] at enumeration time.
    pub name: String,
    /// The row data used to fill the template.
    pub row: RowData,
}

/// How output file names are derived from rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NamingRule {
    /// `1.pdf`, `2.pdf`, ... from the 1-based position within the run.
    #[default]
    RowIndex,
    /// `<value>.pdf` from the named column. Rows where the column is
    /// missing or empty fall back to the index form.
    Column(String),
}

impl NamingRule {
    /// Computes the output file name for the row at `index` (0-based).
    ///
    /// Pure function, no I/O.
    pub fn file_name(&self, index: usize, row: &RowData) -> String {
        match self {
            NamingRule::RowIndex => format!("{}.pdf", index + 1),
            NamingRule::Column(column) => match row.get(column).map(String::as_str) {
                Some(value) if !value.is_empty() => format!("{value}.pdf"),
                _ => format!("{}.pdf", index + 1),
            },
        }
    }
}

/// Enumerates rows as an ordered, lazy [`ItemStream`] of work items.
///
/// The source has no concurrency of its own; items are produced one at a
/// time as the downstream stage pulls. When `cancel` is tripped the stream
/// ends before yielding the next item, so a cancelled run stops initiating
/// new work while whatever is already in flight winds down.
pub fn candidates<E>(
    rows: Vec<RowData>,
    naming: NamingRule,
    cancel: CancellationToken,
) -> ItemStream<WorkItem, E>
where
    E: Send + 'static,
{
    Box::pin(stream! {
        for (index, row) in rows.into_iter().enumerate() {
            if cancel.is_cancelled() {
                return;
            }
            let name = naming.file_name(index, &row);
            yield Ok(WorkItem { name, row });
        }
    })
}
