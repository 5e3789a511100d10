use canonlock_canonical::{PartitionName, ValidationError};
use regex::Regex;
use serde::Serialize;

/// Partition names counted by default, in receipt order.
pub const DEFAULT_PARTITIONS: [&str; 6] = [
    "schools",
    "foundations",
    "parameters",
    "syntax_variants",
    "operators",
    "grammar",
];

/// Ordered set of partition names to count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PartitionSet(Vec<PartitionName>);

impl Default for PartitionSet {
    fn default() -> Self {
        Self(
            DEFAULT_PARTITIONS
                .iter()
                .map(|name| PartitionName::new((*name).to_string()))
                .collect(),
        )
    }
}

impl PartitionSet {
    /// Builds a set from caller-supplied names, validating each one.
    pub fn parse<I, S>(names: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names
            .into_iter()
            .map(|name| PartitionName::parse(name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(names))
    }

    /// Partition names in order.
    pub fn names(&self) -> &[PartitionName] {
        &self.0
    }
}

/// How partition counts were derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CountMethod {
    /// The lock file parsed as a YAML mapping.
    Structured,
    /// The structured parse failed; dash-bullets were counted per section.
    Heuristic,
}

/// Entry count for one partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionCount {
    /// Partition name.
    pub name: PartitionName,
    /// Number of list items or mapping entries found.
    pub count: u64,
}

/// Counts for every configured partition, in configuration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionCounts {
    /// Method used to derive the counts.
    pub method: CountMethod,
    /// One entry per configured partition.
    pub entries: Vec<PartitionCount>,
}

impl PartitionCounts {
    /// Count for `name`, or `None` if the partition is not configured.
    pub fn get(&self, name: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|entry| entry.name.as_ref() == name)
            .map(|entry| entry.count)
    }
}

/// Counts partition entries, preferring a structured YAML parse.
pub fn count_partitions(text: &str, partitions: &PartitionSet) -> PartitionCounts {
    match count_structured(text, partitions) {
        Some(entries) => PartitionCounts {
            method: CountMethod::Structured,
            entries,
        },
        None => {
            tracing::debug!("lock file is not a YAML mapping; counting partitions heuristically");
            PartitionCounts {
                method: CountMethod::Heuristic,
                entries: count_heuristic(text, partitions),
            }
        }
    }
}

fn count_structured(text: &str, partitions: &PartitionSet) -> Option<Vec<PartitionCount>> {
    let doc: serde_yaml::Value = serde_yaml::from_str(text).ok()?;
    if !doc.is_mapping() {
        return None;
    }
    let entries = partitions
        .names()
        .iter()
        .map(|name| {
            let count = match doc.get(name.as_ref()) {
                Some(serde_yaml::Value::Sequence(items)) => items.len() as u64,
                Some(serde_yaml::Value::Mapping(map)) => map.len() as u64,
                _ => 0,
            };
            PartitionCount {
                name: name.clone(),
                count,
            }
        })
        .collect();
    Some(entries)
}

fn count_heuristic(text: &str, partitions: &PartitionSet) -> Vec<PartitionCount> {
    let next_top_level = Regex::new(r"(?m)^\w+[ \t]*:[ \t]*$").expect("invalid regex");
    let bullet = Regex::new(r"(?m)^[ \t]*-\s").expect("invalid regex");

    partitions
        .names()
        .iter()
        .map(|name| {
            let header = Regex::new(&format!(
                r"(?m)^[ \t]*{}[ \t]*:[ \t]*$",
                regex::escape(name.as_ref())
            ))
            .expect("invalid regex");
            let count = header.find(text).map_or(0, |found| {
                let rest = &text[found.end()..];
                let section = next_top_level
                    .find(rest)
                    .map_or(rest, |next| &rest[..next.start()]);
                bullet.find_iter(section).count() as u64
            });
            PartitionCount {
                name: name.clone(),
                count,
            }
        })
        .collect()
}
