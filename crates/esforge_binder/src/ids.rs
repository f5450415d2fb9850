//! Identity for identifiers created by transforms.

use esforge_ast::visitor::AstVisitor;
use esforge_ast::visitor_mut::AstVisitorMut;
use esforge_ast::{ExportClause, ExportDeclaration, Identifier, ModuleExportName, NodeId, Program};

/// Give every binding or reference identifier that still has
/// [`NodeId::INVALID`] a fresh id above the largest one in the tree, so a
/// transformed program can be bound again.
pub fn assign_missing_ids(program: &mut Program) -> usize {
    let mut max = MaxId(0);
    max.visit_program(program);
    let mut assigner = Assigner {
        next: max.0 + 1,
        assigned: 0,
    };
    assigner.visit_program(program);
    assigner.assigned
}

struct MaxId(u32);

impl MaxId {
    fn see(&mut self, id: &Identifier) {
        self.0 = self.0.max(id.id.0);
    }
}

impl AstVisitor for MaxId {
    fn visit_binding_identifier(&mut self, node: &Identifier) {
        self.see(node);
    }

    fn visit_identifier_reference(&mut self, node: &Identifier) {
        self.see(node);
    }

    fn visit_export_declaration(&mut self, node: &ExportDeclaration) {
        if let Some(ExportClause::Named(specifiers)) = &node.export_clause {
            for specifier in specifiers {
                for name in [specifier.property_name.as_ref(), Some(&specifier.name)].into_iter().flatten() {
                    if let ModuleExportName::Identifier(id) = name {
                        self.see(id);
                    }
                }
            }
        }
    }
}

struct Assigner {
    next: u32,
    assigned: usize,
}

impl Assigner {
    fn fill(&mut self, id: &mut Identifier) {
        if !id.id.is_valid() {
            id.id = NodeId(self.next);
            self.next += 1;
            self.assigned += 1;
        }
    }
}

impl AstVisitorMut for Assigner {
    fn visit_binding_identifier(&mut self, node: &mut Identifier) {
        self.fill(node);
    }

    fn visit_identifier_reference(&mut self, node: &mut Identifier) {
        self.fill(node);
    }

    fn visit_export_declaration(&mut self, node: &mut ExportDeclaration) {
        if let Some(ExportClause::Named(specifiers)) = &mut node.export_clause {
            for specifier in specifiers {
                if let Some(ModuleExportName::Identifier(id)) = &mut specifier.property_name {
                    self.fill(id);
                }
                if let ModuleExportName::Identifier(id) = &mut specifier.name {
                    self.fill(id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esforge_ast::{factory, NodeData, SourceType, SyntaxKind, VariableKind};

    #[test]
    fn test_synthesized_identifiers_get_fresh_ids() {
        let mut program = Program {
            data: NodeData::synthesized(SyntaxKind::Program),
            source_type: SourceType::Module,
            statements: vec![factory::declare(VariableKind::Const, "a", Some(factory::ident("b")))],
            shebang: None,
            comments: Vec::new(),
            file_name: String::new(),
        };
        assert_eq!(assign_missing_ids(&mut program), 2);
        assert_eq!(assign_missing_ids(&mut program), 0);
    }
}
