//! # Pipit Fields
//!
//! The field type registry: a closed set of field kinds with, for each kind,
//! how a client-submitted value is coerced and validated ("cleaned") into a
//! typed [`FieldValue`], how that value is stored in a semi-structured
//! document, and how it renders as a display string in list views.
//!
//! The set of kinds is a sum type rather than open registration, so every
//! match over it is exhaustively checked.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod choice;
pub mod clean;
pub mod display;
pub mod kind;
pub mod value;

pub use choice::FieldChoice;
pub use clean::{FieldError, FieldResult, clean_document, clean_value};
pub use display::{NoRelatedItems, RelatedItemResolver, display_value};
pub use kind::FieldKind;
pub use value::{Document, FieldDefinition, FieldValue, RawDocument};
