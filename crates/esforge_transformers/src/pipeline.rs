//! Pipeline construction and the declared pass order.

use esforge_ast::Program;
use esforge_binder::{assign_missing_ids, bind_program, BindOptions};
use esforge_diagnostics::Diagnostic;
use esforge_options::{EsTarget, ParseOptions, PassConfig, PipelineConfig};
use serde::de::DeserializeOwned;

use crate::context::PassContext;
use crate::decorators::Decorators;
use crate::downlevel::{Es2015, Es2016, Es2017, Es2018, Es2019, Es2020, Es2021, Es2022};
use crate::jsx::Jsx;
use crate::pass::Pass;
use crate::simplify::Simplify;
use crate::strip_types::StripTypes;

/// Errors detected while building a pipeline from its configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("unknown pass '{0}'")]
    UnknownPass(String),
    #[error("unknown option '{option}' for pass '{pass}'")]
    UnknownOption { pass: String, option: String },
    #[error("invalid options for pass '{pass}': {message}")]
    InvalidOption { pass: String, message: String },
    #[error("pass '{pass}' must run before '{before}'")]
    OrderingViolation { pass: String, before: String },
    #[error("pass '{0}' is listed more than once")]
    DuplicatePass(String),
}

type Builder = fn(&str, Option<&serde_json::Value>) -> Result<Box<dyn Pass>, PipelineError>;

/// A built-in pass and its place in the declared order.
pub struct PassDescriptor {
    pub name: &'static str,
    /// For downlevel passes, the language level whose syntax the pass
    /// removes. The default pipeline includes it when the target is older.
    pub lowers: Option<EsTarget>,
    build: Builder,
}

/// Every built-in pass, in the only order they may run.
///
/// Type erasure comes first so later passes never see type syntax.
/// Decorators are lowered before JSX and downleveling because the helper
/// calls they produce are plain ES5. JSX output uses object spread, so it
/// precedes `es2018`. Downlevel passes run from the newest level to the
/// oldest: each may emit syntax that an older level's pass then lowers
/// (`a ??= b` becomes `a ?? (a = b)`, which `es2020` lowers again).
/// `simplify` runs last to fold what the others produced.
pub const PASS_ORDER: &[PassDescriptor] = &[
    PassDescriptor { name: "strip_types", lowers: None, build: build::<StripTypes> },
    PassDescriptor { name: "decorators", lowers: None, build: build::<Decorators> },
    PassDescriptor { name: "jsx", lowers: None, build: build::<Jsx> },
    PassDescriptor { name: "es2022", lowers: Some(EsTarget::Es2022), build: build::<Es2022> },
    PassDescriptor { name: "es2021", lowers: Some(EsTarget::Es2021), build: build::<Es2021> },
    PassDescriptor { name: "es2020", lowers: Some(EsTarget::Es2020), build: build::<Es2020> },
    PassDescriptor { name: "es2019", lowers: Some(EsTarget::Es2019), build: build::<Es2019> },
    PassDescriptor { name: "es2018", lowers: Some(EsTarget::Es2018), build: build::<Es2018> },
    PassDescriptor { name: "es2017", lowers: Some(EsTarget::Es2017), build: build::<Es2017> },
    PassDescriptor { name: "es2016", lowers: Some(EsTarget::Es2016), build: build::<Es2016> },
    PassDescriptor { name: "es2015", lowers: Some(EsTarget::Es2015), build: build::<Es2015> },
    PassDescriptor { name: "simplify", lowers: None, build: build::<Simplify> },
];

/// Look up a built-in pass by name, with its rank in [`PASS_ORDER`].
pub fn descriptor(name: &str) -> Option<(usize, &'static PassDescriptor)> {
    PASS_ORDER.iter().enumerate().find(|(_, d)| d.name == name)
}

/// A pass that can be built from its deserialized options.
pub(crate) trait Configurable: Pass + Sized + 'static {
    type Options: DeserializeOwned;

    fn from_options(options: Self::Options) -> Result<Self, String>;
}

fn build<P: Configurable>(name: &str, options: Option<&serde_json::Value>) -> Result<Box<dyn Pass>, PipelineError> {
    let value = options.cloned().unwrap_or_else(|| serde_json::Value::Object(Default::default()));
    let options: P::Options = serde_json::from_value(value).map_err(|err| option_error(name, &err))?;
    let pass = P::from_options(options).map_err(|message| PipelineError::InvalidOption {
        pass: name.to_string(),
        message,
    })?;
    Ok(Box::new(pass))
}

fn option_error(pass: &str, err: &serde_json::Error) -> PipelineError {
    let message = err.to_string();
    // serde reports "unknown field `x`, expected ..."
    if let Some(rest) = message.strip_prefix("unknown field `") {
        if let Some(end) = rest.find('`') {
            return PipelineError::UnknownOption {
                pass: pass.to_string(),
                option: rest[..end].to_string(),
            };
        }
    }
    PipelineError::InvalidOption {
        pass: pass.to_string(),
        message,
    }
}

/// Passes used when a configuration lists none: erasure for TypeScript,
/// decorators when enabled, JSX when enabled, the downlevel passes `target`
/// needs and `simplify`.
pub fn default_passes(target: EsTarget, parse: &ParseOptions) -> Vec<PassConfig> {
    PASS_ORDER
        .iter()
        .filter(|d| match d.name {
            "strip_types" => parse.is_typescript(),
            "decorators" => parse.decorators,
            "jsx" => parse.jsx,
            _ => d.lowers.map_or(true, |level| !target.supports(level)),
        })
        .map(|d| PassConfig::new(d.name))
        .collect()
}

/// An ordered list of configured passes.
pub struct Pipeline {
    target: EsTarget,
    passes: Vec<Box<dyn Pass>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("target", &self.target)
            .field("passes", &self.pass_names())
            .finish()
    }
}

impl Pipeline {
    /// Build the pipeline a configuration describes, rejecting unknown
    /// passes and options, repeated passes and passes out of order.
    pub fn from_config(config: &PipelineConfig, parse: &ParseOptions) -> Result<Self, PipelineError> {
        let entries = match &config.passes {
            Some(passes) => passes.clone(),
            None => default_passes(config.target, parse),
        };
        let mut passes: Vec<Box<dyn Pass>> = Vec::with_capacity(entries.len());
        let mut last: Option<(usize, &'static str)> = None;
        for entry in &entries {
            let (rank, descriptor) =
                descriptor(&entry.name).ok_or_else(|| PipelineError::UnknownPass(entry.name.clone()))?;
            if let Some((last_rank, last_name)) = last {
                if rank == last_rank {
                    return Err(PipelineError::DuplicatePass(entry.name.clone()));
                }
                if rank < last_rank {
                    return Err(PipelineError::OrderingViolation {
                        pass: entry.name.clone(),
                        before: last_name.to_string(),
                    });
                }
            }
            last = Some((rank, descriptor.name));
            passes.push((descriptor.build)(descriptor.name, entry.options.as_ref())?);
        }
        tracing::debug!(target_level = %config.target, passes = passes.len(), "built pipeline");
        Ok(Self {
            target: config.target,
            passes,
        })
    }

    pub fn target(&self) -> EsTarget {
        self.target
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Run every pass over `program` in order and return what they reported.
    pub fn run(&self, program: &mut Program) -> Vec<Diagnostic> {
        let _span = tracing::debug_span!("pipeline", file = %program.file_name).entered();
        let mut ctx = PassContext::for_program(program, self.target);
        for pass in &self.passes {
            for name in pass.implicit_references() {
                ctx.add_implicit_reference(name);
            }
        }
        for pass in &self.passes {
            let name = pass.name();
            if pass.needs_scopes() {
                assign_missing_ids(program);
                let bound = bind_program(program, &BindOptions::default());
                ctx.set_scopes(bound.scopes);
            }
            let before = ctx.diagnostics().len();
            pass.apply(program, &mut ctx);
            ctx.clear_scopes();
            tracing::debug!(pass = name, diagnostics = ctx.diagnostics().len() - before, "applied pass");
        }
        ctx.into_diagnostics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(passes: Vec<PassConfig>) -> PipelineConfig {
        PipelineConfig {
            target: EsTarget::Es5,
            passes: Some(passes),
        }
    }

    fn build_err(passes: Vec<PassConfig>) -> PipelineError {
        Pipeline::from_config(&config(passes), &ParseOptions::default()).unwrap_err()
    }

    #[test]
    fn test_default_pipeline_for_es5_typescript_jsx() {
        let parse = ParseOptions {
            jsx: true,
            ..ParseOptions::for_file("a.ts")
        };
        let names: Vec<String> = default_passes(EsTarget::Es5, &parse).into_iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec![
                "strip_types", "jsx", "es2022", "es2021", "es2020", "es2019", "es2018", "es2017", "es2016", "es2015",
                "simplify"
            ]
        );
    }

    #[test]
    fn test_default_pipeline_for_esnext_javascript() {
        let names: Vec<String> =
            default_passes(EsTarget::EsNext, &ParseOptions::default()).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["simplify"]);
    }

    #[test]
    fn test_default_pipeline_for_es2019() {
        let names: Vec<String> =
            default_passes(EsTarget::Es2019, &ParseOptions::default()).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["es2022", "es2021", "es2020", "simplify"]);
    }

    #[test]
    fn test_unknown_pass() {
        assert_eq!(build_err(vec![PassConfig::new("minify")]), PipelineError::UnknownPass("minify".into()));
    }

    #[test]
    fn test_unknown_option() {
        let err = build_err(vec![PassConfig::with_options("jsx", json!({ "pragma": "h", "runtime": "automatic" }))]);
        assert_eq!(
            err,
            PipelineError::UnknownOption {
                pass: "jsx".into(),
                option: "runtime".into()
            }
        );
    }

    #[test]
    fn test_invalid_option_value() {
        let err = build_err(vec![PassConfig::with_options("jsx", json!({ "pragma": "not a path" }))]);
        assert!(matches!(err, PipelineError::InvalidOption { ref pass, .. } if pass == "jsx"));
        let err = build_err(vec![PassConfig::with_options("simplify", json!({ "foldConstants": "yes" }))]);
        assert!(matches!(err, PipelineError::InvalidOption { .. }));
    }

    #[test]
    fn test_ordering_violation() {
        let err = build_err(vec![PassConfig::new("es2015"), PassConfig::new("strip_types")]);
        assert_eq!(
            err,
            PipelineError::OrderingViolation {
                pass: "strip_types".into(),
                before: "es2015".into()
            }
        );
    }

    #[test]
    fn test_duplicate_pass() {
        let err = build_err(vec![PassConfig::new("jsx"), PassConfig::new("jsx")]);
        assert_eq!(err, PipelineError::DuplicatePass("jsx".into()));
    }

    #[test]
    fn test_explicit_subset_keeps_order() {
        let pipeline = Pipeline::from_config(
            &config(vec![PassConfig::new("strip_types"), PassConfig::new("es2016"), PassConfig::new("simplify")]),
            &ParseOptions::default(),
        )
        .unwrap();
        assert_eq!(pipeline.pass_names(), vec!["strip_types", "es2016", "simplify"]);
    }
}
