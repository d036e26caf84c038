//! Identifier aliases for engine entities
//!
//! Every entity is keyed by a v4 UUID. Aliases keep signatures readable
//! without the ceremony of newtype wrappers.

use uuid::Uuid;

/// Identifier of a content type.
pub type ContentTypeId = Uuid;

/// Identifier of a content type field.
pub type FieldId = Uuid;

/// Identifier of a content item.
pub type ContentItemId = Uuid;

/// Identifier of a revision record.
pub type RevisionId = Uuid;

/// Identifier of a saved view.
pub type ViewId = Uuid;

/// Identifier of a web or email template.
pub type TemplateId = Uuid;

/// Identifier of a navigation menu.
pub type MenuId = Uuid;

/// Identifier of a user-defined function.
pub type FunctionId = Uuid;

/// Identifier of a navigation menu item.
pub type MenuItemId = Uuid;

/// Identifier of an administrator or end user.
pub type UserId = Uuid;
