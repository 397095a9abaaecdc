/// A write collided with a unique constraint on `field`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{field} already exists")]
pub struct DuplicateKey {
    pub field: &'static str,
}
