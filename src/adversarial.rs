/// Character the adversarial value is built from. Every occurrence is an empty
/// list element to a comma-splitting parser.
pub const DELIMITER: char = ',';

/// An `Access-Control-Request-Headers` value list sized to a header budget.
///
/// With `n = floor(sqrt(max_header_bytes))` it holds `n` lines of `n`
/// delimiters each, so `n * n <= max_header_bytes` bytes are spent maximizing
/// both the per-line splitting work and the number of lines a CORS middleware
/// iterates over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdversarialHeader {
    values: Vec<String>,
    side: usize,
}

impl AdversarialHeader {
    pub fn generate(max_header_bytes: usize) -> Self {
        let side = max_header_bytes.isqrt();
        let line: String = std::iter::repeat_n(DELIMITER, side).collect();

        Self {
            values: vec![line; side],
            side,
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn line_count(&self) -> usize {
        self.values.len()
    }

    pub fn line_len(&self) -> usize {
        self.side
    }

    pub fn total_bytes(&self) -> usize {
        self.values.iter().map(String::len).sum()
    }
}

#[cfg(test)]
#[path = "adversarial_test.rs"]
mod adversarial_test;
