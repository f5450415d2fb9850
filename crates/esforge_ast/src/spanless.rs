//! Structural comparison of trees without positions.
//!
//! Two parses of equivalent text produce trees that differ only in ranges,
//! identifier ids, raw literal spellings and bookkeeping flags. [`spanless`]
//! serializes a program and strips those keys so the results compare equal.

use crate::node::Program;
use serde_json::Value;

/// Keys removed from every object in the serialized tree.
const ERASED_KEYS: &[&str] = &["id", "comments"];

/// Serialize `program` with position-dependent data erased.
pub fn spanless(program: &Program) -> serde_json::Result<Value> {
    let mut value = serde_json::to_value(program)?;
    erase(&mut value);
    Ok(value)
}

fn erase(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ERASED_KEYS {
                map.remove(*key);
            }
            // Node data: `{ kind, range, flags?, modifierFlags? }`.
            if map.contains_key("kind") && map.contains_key("range") {
                map.remove("range");
                map.remove("flags");
            }
            // A literal's spelling only matters when it is the sole value.
            if map.contains_key("value") {
                map.remove("raw");
            }
            map.values_mut().for_each(erase);
        }
        Value::Array(items) => items.iter_mut().for_each(erase),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory;
    use crate::types::{SourceType, VariableKind};
    use crate::NodeData;
    use crate::SyntaxKind;

    fn program(statements: Vec<crate::Statement>) -> Program {
        Program {
            data: NodeData::new(SyntaxKind::Program, 0, 10),
            source_type: SourceType::Module,
            statements,
            shebang: None,
            comments: Vec::new(),
            file_name: "a.ts".to_string(),
        }
    }

    #[test]
    fn test_ranges_do_not_affect_comparison() {
        let a = program(vec![factory::declare(VariableKind::Let, "x", Some(factory::number(1.0)))]);
        let mut b = a.clone();
        b.data = NodeData::new(SyntaxKind::Program, 5, 40);
        assert_eq!(spanless(&a).unwrap(), spanless(&b).unwrap());
    }

    #[test]
    fn test_structure_still_differs() {
        let a = program(vec![factory::declare(VariableKind::Let, "x", None)]);
        let b = program(vec![factory::declare(VariableKind::Const, "x", None)]);
        assert_ne!(spanless(&a).unwrap(), spanless(&b).unwrap());
    }
}
