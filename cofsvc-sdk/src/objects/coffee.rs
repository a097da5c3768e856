use serde::{Deserialize, Serialize};

/// A catalog entry as it appears on the wire.
///
/// ```json
/// {"id":"5f0c...","name":"A"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coffee {
    /// Opaque unique identifier.
    pub id: String,
    pub name: String,
}

impl Coffee {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
