//! Document generation: the filler contract and field planning.
//!
//! The pipeline treats the actual document engine as an external
//! collaborator behind the [`DocumentFiller`] trait; any failure it reports
//! is a per-item failure subject to the run's error policy. What the crate
//! does own is the *planning* layer: deciding, from a field's kind and a
//! row's cell text, what operation a filler should perform. That dispatch
//! is a single exhaustive match over [`FieldKind`] - unsupported kinds
//! produce an explicit [`FieldAction::Unsupported`] result instead of
//! falling through silently.

mod field;
mod filler;

pub use field::{plan_field, plan_fields, FieldAction, FieldKind, FormField};
pub use filler::{DocumentFiller, FillError, TextTemplateFiller};
