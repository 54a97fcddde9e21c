pub mod action_kind;
pub mod cache_key;
pub mod entity_kind;
pub mod photo_id;
pub mod photo_kind;

pub use action_kind::ActionKind;
pub use cache_key::CacheKey;
pub use entity_kind::EntityKind;
pub use photo_id::PhotoId;
pub use photo_kind::PhotoKind;
