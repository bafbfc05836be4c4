// Record identity

use uuid::Uuid;

/// A domain item carrying a stable identifier.
///
/// Rows are matched by value equality; the identifier is only needed by
/// adapters that look records up by key (`get_by_id`, storage by id).
pub trait Record {
    fn id(&self) -> Uuid;
}
