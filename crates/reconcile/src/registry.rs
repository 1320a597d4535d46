use crate::Result;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Deduplication registry shared by the certified and Red Hat combination
/// passes.
///
/// In exclusive mode a name claimed by an earlier `combine` call never appears
/// in a later call's result, even when it legitimately belongs to both lists.
/// `independent()` opts out of the cross-call claim and lets every call keep
/// its full set; the registry still records every name it has seen.
pub struct OperatorRegistry {
    exclusive: bool,
    seen: HashSet<String>,
}

impl OperatorRegistry {
    /// First caller wins across combination calls.
    pub fn exclusive() -> Self {
        Self {
            exclusive: true,
            seen: HashSet::new(),
        }
    }

    /// Every combination call keeps its full deduplicated set.
    pub fn independent() -> Self {
        Self {
            exclusive: false,
            seen: HashSet::new(),
        }
    }

    /// Merge the given line-delimited lists into one deduplicated name set.
    ///
    /// Lines are trimmed of surrounding whitespace; empty lines are dropped.
    /// Quote stripping is the caller's concern, see [`normalize_reference_name`].
    pub fn combine<P: AsRef<Path>>(&mut self, lists: &[P]) -> Result<HashSet<String>> {
        let mut combined = HashSet::new();
        for list in lists {
            let contents = fs::read_to_string(list.as_ref())?;
            for line in contents.lines() {
                let name = line.trim();
                if name.is_empty() {
                    continue;
                }
                let fresh = self.seen.insert(name.to_string());
                if fresh || !self.exclusive {
                    combined.insert(name.to_string());
                }
            }
        }
        Ok(combined)
    }

    /// Total distinct names observed across all combination calls.
    pub fn registered(&self) -> usize {
        self.seen.len()
    }
}

/// Normalize a reference-list entry before classification: surrounding
/// whitespace and double quotes carry no meaning.
#[must_use]
pub fn normalize_reference_name(raw: &str) -> String {
    raw.trim().trim_matches('"').to_string()
}

/// Reduce a cluster-reported operator name (`name.version`) to the bare,
/// lower-cased segment used for reference-set membership.
#[must_use]
pub fn bare_operator_name(reported: &str) -> String {
    reported
        .split('.')
        .next()
        .unwrap_or(reported)
        .to_lowercase()
}
