//! Query fragment collection
//!
//! Lines that call into a model manager (`Book.objects.filter(...)`) are
//! copied verbatim into the query artifact as SQL comments, tagged with the
//! file they came from. No translation to SQL is attempted.

/// Manager attribute a query line must contain
pub const MANAGER_MARKER: &str = ".objects.";

/// Operations that make a manager line a query
pub const QUERY_OPERATIONS: &[&str] = &["filter(", "get(", "create("];

/// Line-based collector of ORM query fragments
#[derive(Debug, Clone)]
pub struct QueryCollector {
    marker: String,
    operations: Vec<String>,
}

impl Default for QueryCollector {
    fn default() -> Self {
        Self {
            marker: MANAGER_MARKER.to_string(),
            operations: QUERY_OPERATIONS.iter().map(|op| op.to_string()).collect(),
        }
    }
}

impl QueryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a raw source line is a query line
    pub fn is_query_line(&self, line: &str) -> bool {
        line.contains(&self.marker) && self.operations.iter().any(|op| line.contains(op.as_str()))
    }

    /// Every query fragment in `source`, in line order. `provenance` names
    /// the file in the fragment header.
    pub fn collect(&self, provenance: &str, source: &str) -> Vec<String> {
        source
            .lines()
            .filter(|line| self.is_query_line(line))
            .map(|line| fragment(provenance, line))
            .collect()
    }
}

/// Format one fragment: a provenance comment then the trimmed line
pub fn fragment(provenance: &str, line: &str) -> String {
    format!("-- from: {}\n-- {}", provenance, line.trim())
}
