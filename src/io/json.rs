//! JSON import / export.
//!
//! Round-trip serialization of [`Diagram`] and [`Classification`], suitable
//! for saving sessions and for handing layouts to a renderer in another
//! process.

use crate::error::Result;
use crate::layout::Classification;
use crate::model::Diagram;
use std::path::Path;

/// Serialize a [`Diagram`] to a pretty-printed JSON string.
pub fn diagram_to_json(diagram: &Diagram) -> Result<String> {
    Ok(serde_json::to_string_pretty(diagram)?)
}

/// Deserialize a [`Diagram`] from a JSON string.
pub fn diagram_from_json(json: &str) -> Result<Diagram> {
    Ok(serde_json::from_str(json)?)
}

/// Write a [`Diagram`] to a JSON file on disk.
pub fn write_diagram(diagram: &Diagram, path: &Path) -> Result<()> {
    let json = diagram_to_json(diagram)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Read a [`Diagram`] from a JSON file.
pub fn read_diagram(path: &Path) -> Result<Diagram> {
    let contents = std::fs::read_to_string(path)?;
    diagram_from_json(&contents)
}

/// Serialize a [`Classification`] to a pretty-printed JSON string.
pub fn classification_to_json(classification: &Classification) -> Result<String> {
    Ok(serde_json::to_string_pretty(classification)?)
}

/// Deserialize a [`Classification`] from a JSON string.
pub fn classification_from_json(json: &str) -> Result<Classification> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Entity, Relationship};

    fn sample_diagram() -> Diagram {
        let mut diagram = Diagram::new();
        let mut users = Entity::new("users");
        users.set_attribute("color", "blue");
        diagram.add_entity(users);
        diagram.add_relationship(Relationship::with_label("users", "orders", "1:n"));
        diagram.add_relationship(Relationship::new("orders", "line_items"));
        diagram
    }

    #[test]
    fn test_diagram_round_trip() {
        let diagram = sample_diagram();
        let json = diagram_to_json(&diagram).unwrap();
        let restored = diagram_from_json(&json).unwrap();

        assert_eq!(restored.entity_count(), diagram.entity_count());
        assert_eq!(restored.relationship_count(), diagram.relationship_count());
        assert_eq!(
            restored
                .get_entity(&"users".into())
                .and_then(|entity| entity.attribute("color")),
            Some("blue")
        );
    }

    #[test]
    fn test_classification_round_trip() {
        let classification = sample_diagram().classify();
        let json = classification_to_json(&classification).unwrap();
        let restored = classification_from_json(&json).unwrap();

        assert_eq!(restored, classification);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagram.json");

        let diagram = sample_diagram();
        write_diagram(&diagram, &path).unwrap();
        let restored = read_diagram(&path).unwrap();

        assert_eq!(restored.entity_count(), diagram.entity_count());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(diagram_from_json("not json").is_err());
    }
}
