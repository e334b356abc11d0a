//! Test-case file loading.

use std::path::Path;

use afeval_harness::TestCaseSpec;
use anyhow::{Context, Result};

/// Load the test-case file. This is the only error allowed to abort the
/// whole run; everything later is folded into per-case traces.
pub fn load_test_cases(path: &Path) -> Result<Vec<TestCaseSpec>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read test cases from {}", path.display()))?;
    let specs: Vec<TestCaseSpec> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid test case file {}", path.display()))?;
    Ok(specs)
}
