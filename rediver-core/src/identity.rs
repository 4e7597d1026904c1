//! Identity types for platform entities

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Entity identifier as issued by the platform API.
pub type EntityId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

pub type AgentId = EntityId;
pub type JobId = EntityId;
pub type TenantId = EntityId;
pub type TokenId = EntityId;
pub type AdminId = EntityId;
pub type AuditLogId = EntityId;
pub type MappingId = EntityId;

/// Anything the console lists and selects by id.
pub trait Entity {
    fn entity_id(&self) -> EntityId;
}

/// Implement [`Entity`] for a DTO with an id field.
///
/// # Example
/// ```ignore
/// impl_entity!(Agent, id);
/// // Expands to:
/// impl rediver_core::Entity for Agent {
///     fn entity_id(&self) -> rediver_core::EntityId {
///         self.id
///     }
/// }
/// ```
#[macro_export]
macro_rules! impl_entity {
    ($type:ty, $id_field:ident) => {
        impl $crate::identity::Entity for $type {
            fn entity_id(&self) -> $crate::identity::EntityId {
                self.$id_field
            }
        }
    };
}
