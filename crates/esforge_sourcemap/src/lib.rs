//! esforge_sourcemap: Source map generation.
//!
//! Turns the printer's [`Mapping`]s (generated line/column to source byte
//! offset) into a Source Map v3 document for one original source.

use esforge_core::text::LineMap;
use esforge_printer::Mapping;
use sourcemap::{SourceMap, SourceMapBuilder as RawBuilder};

#[derive(Debug, thiserror::Error)]
pub enum SourceMapError {
    #[error("failed to encode source map: {0}")]
    Encode(#[from] sourcemap::Error),
    #[error("encoded source map is not UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Accumulates mappings against a single original source.
pub struct SourceMapBuilder {
    raw: RawBuilder,
    line_map: LineMap,
    source_id: u32,
    last_generated: Option<(u32, u32)>,
    count: usize,
}

impl SourceMapBuilder {
    /// `file` names the generated output; `source_name` is recorded in
    /// `sources`. With `include_content` the original text is embedded.
    pub fn new(file: Option<&str>, source_name: &str, source: &str, include_content: bool) -> Self {
        let mut raw = RawBuilder::new(file);
        let source_id = raw.add_source(source_name);
        if include_content {
            raw.set_source_contents(source_id, Some(source));
        }
        Self {
            raw,
            line_map: LineMap::new(source),
            source_id,
            last_generated: None,
            count: 0,
        }
    }

    /// Add one mapping. Mappings must arrive in generated order; a second
    /// mapping for the same generated position is ignored.
    pub fn add_mapping(&mut self, mapping: &Mapping) {
        let generated = (mapping.generated_line, mapping.generated_column);
        if self.last_generated == Some(generated) {
            return;
        }
        if mapping.original as usize > self.line_map.text().len() {
            tracing::warn!(original = mapping.original, "mapping points past the end of the source");
            return;
        }
        self.last_generated = Some(generated);
        let original = self.line_map.line_and_column_of(mapping.original);
        let name_id = mapping.name.as_deref().map(|name| self.raw.add_name(name));
        self.raw.add_raw(
            mapping.generated_line,
            mapping.generated_column,
            original.line,
            original.character,
            Some(self.source_id),
            name_id,
            false,
        );
        self.count += 1;
    }

    pub fn into_source_map(self) -> SourceMap {
        tracing::debug!(mappings = self.count, "built source map");
        self.raw.into_sourcemap()
    }

    /// Encode the source map as a JSON string.
    pub fn to_json(self) -> Result<String, SourceMapError> {
        encode(&self.into_source_map())
    }
}

pub fn encode(map: &SourceMap) -> Result<String, SourceMapError> {
    let mut out = Vec::new();
    map.to_writer(&mut out)?;
    Ok(String::from_utf8(out)?)
}

/// Build and encode a source map for printed output in one step.
pub fn generate(
    mappings: &[Mapping],
    source: &str,
    source_name: &str,
    file: Option<&str>,
) -> Result<String, SourceMapError> {
    let mut builder = SourceMapBuilder::new(file, source_name, source, true);
    for mapping in mappings {
        builder.add_mapping(mapping);
    }
    builder.to_json()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(line: u32, column: u32, original: u32, name: Option<&str>) -> Mapping {
        Mapping {
            generated_line: line,
            generated_column: column,
            original,
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_duplicate_generated_positions_are_dropped() {
        let mut builder = SourceMapBuilder::new(None, "a.js", "let a;", false);
        builder.add_mapping(&mapping(0, 0, 0, None));
        builder.add_mapping(&mapping(0, 0, 4, Some("a")));
        builder.add_mapping(&mapping(0, 4, 4, Some("a")));
        let map = builder.into_source_map();
        assert_eq!(map.get_token_count(), 2);
    }

    #[test]
    fn test_out_of_range_mapping_is_skipped() {
        let mut builder = SourceMapBuilder::new(None, "a.js", "x", false);
        builder.add_mapping(&mapping(0, 0, 99, None));
        assert_eq!(builder.into_source_map().get_token_count(), 0);
    }

    #[test]
    fn test_encode_contains_sources() {
        let json = generate(&[mapping(0, 0, 0, None)], "x;", "input.js", Some("out.js")).expect("encodes");
        assert!(json.contains("\"sources\":[\"input.js\"]"));
        assert!(json.contains("\"version\":3"));
    }
}
