use esforge_ast::Program;

use crate::context::PassContext;

/// An AST-to-AST transformation.
///
/// A pass mutates the program in place and reports anything it could not
/// handle through the context; it never drops code it does not understand.
pub trait Pass: Send + Sync {
    /// Registered name, as used in a pipeline configuration.
    fn name(&self) -> &'static str;

    /// Whether [`PassContext::scopes`] must hold a binding of the program
    /// as it is when the pass starts.
    fn needs_scopes(&self) -> bool {
        false
    }

    /// Names the pass's output refers to that have no reference in the
    /// source, such as the root of the JSX factory. Earlier passes must not
    /// treat imports of these names as unused.
    fn implicit_references(&self) -> Vec<String> {
        Vec::new()
    }

    fn apply(&self, program: &mut Program, ctx: &mut PassContext);
}
