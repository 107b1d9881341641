use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{AttributeValue, Attributes};

/// A synthetic identity that flags are evaluated against.
///
/// Targets are immutable after construction: the registry is built once at
/// startup and lives for the process lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Attributes consumed by the client's targeting rules.
    pub attributes: Attributes,
}

impl Target {
    /// Create a target with no attributes.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Target {
        Target {
            id: id.into(),
            name: name.into(),
            attributes: Attributes::new(),
        }
    }

    /// Add an attribute, consuming and returning the target.
    ///
    /// ```
    /// # use flagwatch::Target;
    /// let target = Target::new("1", "southerton").attribute("location", "emea");
    /// ```
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Target {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

const ADJECTIVES: &[&str] = &[
    "amber", "brisk", "cedar", "dapper", "ember", "frosty", "gilded", "hollow", "ivory", "jovial",
];

const DISTRICTS: &[&str] = &[
    "harbor", "meadow", "orchard", "quarry", "ridge", "springs", "terrace", "vale", "wharf", "yard",
];

const REGIONS: &[&str] = &["emea", "asia", "amer"];

/// Generate a deterministic registry of `count` synthetic targets.
///
/// The same seed always produces the same identifiers, names and attributes,
/// so repeated runs are directly comparable.
pub fn synthetic_targets(seed: u64, count: usize) -> Vec<Target> {
    let mut rng = StdRng::seed_from_u64(seed);
    (1..=count)
        .map(|i| {
            let name = format!(
                "{}-{}",
                ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())],
                DISTRICTS[rng.gen_range(0..DISTRICTS.len())]
            );
            Target::new(i.to_string(), name)
                .attribute("location", REGIONS[rng.gen_range(0..REGIONS.len())])
                .attribute("beta_opt_in", rng.gen_bool(0.5))
                .attribute("seats", rng.gen_range(1..=500i64))
        })
        .collect()
}
