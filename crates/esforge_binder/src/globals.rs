//! Names provided by the host environment.

use lazy_static::lazy_static;
use rustc_hash::FxHashSet;

const GLOBALS: &[&str] = &[
    "AggregateError", "Array", "ArrayBuffer", "Atomics", "BigInt", "BigInt64Array",
    "BigUint64Array", "Boolean", "DataView", "Date", "Error", "EvalError", "FinalizationRegistry",
    "Float32Array", "Float64Array", "Function", "Infinity", "Int16Array", "Int32Array",
    "Int8Array", "Intl", "JSON", "Map", "Math", "NaN", "Number", "Object", "Promise", "Proxy",
    "RangeError", "ReferenceError", "Reflect", "RegExp", "Set", "SharedArrayBuffer", "String",
    "Symbol", "SyntaxError", "TypeError", "URIError", "Uint16Array", "Uint32Array", "Uint8Array",
    "Uint8ClampedArray", "WeakMap", "WeakRef", "WeakSet", "arguments", "decodeURI",
    "decodeURIComponent", "encodeURI", "encodeURIComponent", "escape", "eval", "globalThis",
    "isFinite", "isNaN", "parseFloat", "parseInt", "undefined", "unescape",
    // Hosts
    "AbortController", "Blob", "Buffer", "URL", "URLSearchParams", "TextDecoder", "TextEncoder",
    "__dirname", "__filename", "alert", "clearInterval", "clearTimeout", "console", "crypto",
    "document", "exports", "fetch", "global", "localStorage", "location", "module", "navigator",
    "performance", "process", "queueMicrotask", "require", "self", "setInterval", "setTimeout",
    "structuredClone", "window",
];

lazy_static! {
    static ref GLOBAL_SET: FxHashSet<&'static str> = GLOBALS.iter().copied().collect();
}

/// Whether `name` is a standard or common host global.
pub fn is_known_global(name: &str) -> bool {
    GLOBAL_SET.contains(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_globals() {
        assert!(is_known_global("console"));
        assert!(is_known_global("undefined"));
        assert!(!is_known_global("consol"));
    }
}
