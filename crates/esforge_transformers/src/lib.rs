//! esforge_transformers: AST transformations.
//!
//! Transforms the AST in place through an ordered [`Pipeline`] of passes:
//! - TypeScript erasure (`strip_types`)
//! - Legacy decorator lowering (`decorators`)
//! - JSX to factory calls (`jsx`)
//! - Syntax downleveling, one pass per language level (`es2022` .. `es2015`)
//! - Constant folding and dead-branch removal (`simplify`)
//!
//! Every pass implements [`Pass`]. A construct a pass cannot handle is left
//! unchanged and reported as a Transform diagnostic.

mod context;
mod decorators;
mod downlevel;
mod helpers;
mod jsx;
mod pass;
mod pipeline;
mod simplify;
mod strip_types;
mod util;

pub use context::PassContext;
pub use decorators::{Decorators, DecoratorsOptions};
pub use downlevel::{
    Es2015, Es2016, Es2017, Es2018, Es2019, Es2020, Es2021, Es2022, LooseOptions, NoOptions,
};
pub use jsx::{Jsx, JsxOptions};
pub use pass::Pass;
pub use pipeline::{default_passes, descriptor, Pipeline, PipelineError, PassDescriptor, PASS_ORDER};
pub use simplify::{Simplify, SimplifyOptions};
pub use strip_types::{StripTypes, StripTypesOptions};
