// ID Provider Port (for deterministic testing)

use uuid::Uuid;

/// ID provider interface (allows deterministic IDs in tests)
pub trait IdProvider: Send + Sync {
    /// Generate a new unique record ID
    fn generate_id(&self) -> Uuid;
}

/// UUID v4 provider (production)
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn generate_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Sequential provider: 00000000-0000-0000-0000-000000000001, ...
#[derive(Default)]
pub struct SequentialIdProvider {
    next: std::sync::atomic::AtomicU64,
}

impl SequentialIdProvider {
    /// First generated id is `Uuid::from_u128(first)`
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: std::sync::atomic::AtomicU64::new(first.saturating_sub(1)),
        }
    }
}

impl IdProvider for SequentialIdProvider {
    fn generate_id(&self) -> Uuid {
        let n = self
            .next
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
            + 1;
        Uuid::from_u128(n as u128)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIdProvider::default();
        assert_eq!(ids.generate_id(), Uuid::from_u128(1));
        assert_eq!(ids.generate_id(), Uuid::from_u128(2));
    }

    #[test]
    fn test_sequential_ids_starting_at() {
        let ids = SequentialIdProvider::starting_at(1000);
        assert_eq!(ids.generate_id(), Uuid::from_u128(1000));
        assert_eq!(ids.generate_id(), Uuid::from_u128(1001));
    }

    #[test]
    fn test_uuid_provider_is_unique() {
        assert_ne!(UuidProvider.generate_id(), UuidProvider.generate_id());
    }
}
