//! Syntax downleveling, one pass per language level.
//!
//! Each pass removes the syntax its level introduced. Passes run newest
//! first, so a pass may emit syntax of an older level and rely on that
//! level's pass to lower it again. What a pass cannot express in older
//! syntax it leaves alone and reports with
//! [`PassContext::cannot_lower`](crate::PassContext::cannot_lower).

mod es2015;
mod es2016;
mod es2017;
mod es2018;
mod es2019;
mod es2020;
mod es2021;
mod es2022;

pub use es2015::Es2015;
pub use es2016::Es2016;
pub use es2017::Es2017;
pub use es2018::Es2018;
pub use es2019::Es2019;
pub use es2020::Es2020;
pub use es2021::Es2021;
pub use es2022::Es2022;

use serde::Deserialize;

/// Options of a pass that takes none; any key is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoOptions {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct LooseOptions {
    /// Test for nullish values with `== null` instead of comparing against
    /// both `null` and `undefined`. Wrong only for `document.all`.
    pub loose: bool,
}

/// Implements [`Configurable`](crate::pipeline::Configurable) for a unit-like
/// pass without options.
macro_rules! no_options {
    ($pass:ident) => {
        impl crate::pipeline::Configurable for $pass {
            type Options = crate::downlevel::NoOptions;

            fn from_options(_options: Self::Options) -> Result<Self, String> {
                Ok($pass)
            }
        }
    };
}

pub(crate) use no_options;
