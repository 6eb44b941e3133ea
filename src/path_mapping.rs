//! Input-to-output path map
//!
//! One build invocation owns one `PathMapper`; it is discarded with the
//! invocation so repeated builds in a long-lived process never see stale
//! mappings. Recording the same input twice overwrites (last write wins);
//! the reverse lookup returns the first recorded input for an output.

use indexmap::IndexMap;

/// Bidirectional map from source-input path to compiled output path
#[derive(Debug, Clone, Default)]
pub struct PathMapper {
    entries: IndexMap<String, String>,
}

impl PathMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mapping, overwriting any prior output for `input`
    pub fn record(&mut self, input: impl Into<String>, output: impl Into<String>) {
        self.entries.insert(input.into(), output.into());
    }

    /// Compiled output path for a source input
    pub fn output(&self, input: &str) -> Option<&str> {
        self.entries.get(input).map(String::as_str)
    }

    /// First recorded source input mapped to `output`
    pub fn input(&self, output: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, out)| out.as_str() == output)
            .map(|(input, _)| input.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
