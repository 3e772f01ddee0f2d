use serde_json::{Map, Value};

/// Nested message catalog for one locale; leaves are strings
pub type MessageTree = Map<String, Value>;

/// What a merge changed, as dotted key paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Keys copied from the canonical tree
    pub added: Vec<String>,
    /// Keys where the canonical tree has a subtree but the target holds a
    /// plain value; the target value was kept
    pub conflicts: Vec<String>,
}

impl MergeReport {
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty()
    }
}

/// Merge `canonical` into `target`, additive only.
///
/// Missing keys are copied verbatim (appended after the target's existing
/// keys), existing values are never replaced, and keys unknown to the
/// canonical tree are left alone. Running it twice changes nothing the
/// second time.
pub fn merge(canonical: &MessageTree, target: &mut MessageTree) -> MergeReport {
    let mut report = MergeReport::default();
    merge_at(canonical, target, "", &mut report);
    report
}

/// Keys of `canonical` the target lacks, without modifying anything
pub fn missing_keys(canonical: &MessageTree, target: &MessageTree) -> Vec<String> {
    let mut scratch = target.clone();
    merge(canonical, &mut scratch).added
}

fn merge_at(canonical: &MessageTree, target: &mut MessageTree, prefix: &str, report: &mut MergeReport) {
    for (key, value) in canonical {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match target.get_mut(key) {
            None => {
                target.insert(key.clone(), value.clone());
                report.added.push(path);
            }
            Some(existing) => match (value, existing) {
                (Value::Object(sub_canonical), Value::Object(sub_target)) => {
                    merge_at(sub_canonical, sub_target, &path, report);
                }
                (Value::Object(_), _) => {
                    report.conflicts.push(path);
                }
                _ => {}
            },
        }
    }
}
