use uuid::Uuid;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Position of the entity with the given id inside an ordered collection.
pub fn position_of<T: Identifiable>(items: &[T], id: Uuid) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

impl Identifiable for super::flight::Flight {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Identifiable for super::campaign::Campaign {
    fn id(&self) -> Uuid {
        self.id
    }
}
