//! Parametrized test matrices.
//!
//! [`MatrixGenerator`] turns a pool of [`ConfigEntry`] candidates into a
//! [`Matrix`]: the argument names, one value tuple per surviving candidate
//! and one id per tuple. Candidates are kept in declaration order. An entry
//! failing any requirement is dropped silently (logged at debug level); an
//! empty result is a valid matrix that a runner reports as skipped.

use crate::entry::{ConfigEntry, ProviderClass};
use crate::path::Path;
use crate::requirement::FieldRequirement;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Default name of the argument carrying the entry itself
pub const DEFAULT_ARGNAME: &str = "provider";

/// One value of a parameter tuple
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// The candidate entry
    Entry(ConfigEntry),
    /// A value extracted from the candidate's data
    Field(Value),
}

impl ArgValue {
    pub fn as_entry(&self) -> Option<&ConfigEntry> {
        match self {
            ArgValue::Entry(entry) => Some(entry),
            ArgValue::Field(_) => None,
        }
    }

    pub fn as_field(&self) -> Option<&Value> {
        match self {
            ArgValue::Field(value) => Some(value),
            ArgValue::Entry(_) => None,
        }
    }
}

/// Values for one test invocation, parallel to the matrix argument names
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    id: String,
    values: Vec<ArgValue>,
}

impl ParameterSet {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn values(&self) -> &[ArgValue] {
        &self.values
    }

    /// View this set as a name-to-value mapping
    pub fn args<'a>(&'a self, argnames: &'a [String]) -> Args<'a> {
        Args {
            id: &self.id,
            names: argnames,
            values: &self.values,
        }
    }
}

/// Argument mapping of one parameter set, as seen by filters and test bodies
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    id: &'a str,
    names: &'a [String],
    values: &'a [ArgValue],
}

impl<'a> Args<'a> {
    pub fn id(&self) -> &'a str {
        self.id
    }

    pub fn get(&self, name: &str) -> Option<&'a ArgValue> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.values.get(i))
    }

    /// The entry bound to `name`, if that argument carries one
    pub fn entry(&self, name: &str) -> Option<&'a ConfigEntry> {
        self.get(name).and_then(ArgValue::as_entry)
    }

    /// The extracted field bound to `name`, if that argument carries one
    pub fn field(&self, name: &str) -> Option<&'a Value> {
        self.get(name).and_then(ArgValue::as_field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a ArgValue)> + 'a {
        self.names.iter().map(String::as_str).zip(self.values.iter())
    }
}

/// Argument names plus the parameter sets to run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix {
    argnames: Vec<String>,
    sets: Vec<ParameterSet>,
}

impl Matrix {
    /// An empty matrix over the given argument names
    pub fn empty(argnames: Vec<String>) -> Self {
        Self {
            argnames,
            sets: Vec::new(),
        }
    }

    pub fn argnames(&self) -> &[String] {
        &self.argnames
    }

    pub fn sets(&self) -> &[ParameterSet] {
        &self.sets
    }

    pub fn ids(&self) -> Vec<&str> {
        self.sets.iter().map(ParameterSet::id).collect()
    }

    pub fn argvalues(&self) -> Vec<&[ArgValue]> {
        self.sets.iter().map(ParameterSet::values).collect()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// True when no candidate is applicable; runners skip rather than fail
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Args<'_>> {
        self.sets.iter().map(move |set| set.args(&self.argnames))
    }

    /// Drop every parameter set for which `keep` returns false.
    ///
    /// This is the post-hoc secondary filter: it can only narrow what the
    /// requirements already let through.
    pub fn retain(mut self, mut keep: impl FnMut(&Args<'_>) -> bool) -> Self {
        let argnames = std::mem::take(&mut self.argnames);
        self.sets.retain(|set| {
            let keep_it = keep(&set.args(&argnames));
            if !keep_it {
                debug!(id = %set.id, "Excluded by secondary filter");
            }
            keep_it
        });
        self.argnames = argnames;
        self
    }

    /// Split into argument names, value tuples and ids
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<ArgValue>>, Vec<String>) {
        let mut argvalues = Vec::with_capacity(self.sets.len());
        let mut ids = Vec::with_capacity(self.sets.len());
        for set in self.sets {
            argvalues.push(set.values);
            ids.push(set.id);
        }
        (self.argnames, argvalues, ids)
    }
}

/// How many of the eligible candidates to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selector {
    /// Every eligible candidate
    #[default]
    All,
    /// Only the first eligible candidate
    First,
    /// The first candidate of each provider type
    OnePerType,
    /// The first candidate of each provider type and version
    OnePerVersion,
}

impl Selector {
    fn group_key(self, entry: &ConfigEntry) -> Option<(Option<String>, Option<String>)> {
        match self {
            Selector::All => None,
            Selector::First => Some((None, None)),
            Selector::OnePerType => Some((entry.provider_type().map(str::to_string), None)),
            Selector::OnePerVersion => Some((
                entry.provider_type().map(str::to_string),
                entry.version(),
            )),
        }
    }
}

/// Builds a [`Matrix`] from candidate entries
#[derive(Debug, Clone)]
pub struct MatrixGenerator {
    argname: String,
    field_args: Vec<(String, Path)>,
    requirements: Vec<FieldRequirement>,
    classes: Option<Vec<ProviderClass>>,
    selector: Selector,
}

impl Default for MatrixGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixGenerator {
    pub fn new() -> Self {
        Self {
            argname: DEFAULT_ARGNAME.to_string(),
            field_args: Vec::new(),
            requirements: Vec::new(),
            classes: None,
            selector: Selector::All,
        }
    }

    /// Name of the argument carrying the entry (`provider` by default)
    pub fn argname(mut self, name: impl Into<String>) -> Self {
        self.argname = name.into();
        self
    }

    pub fn require(mut self, requirement: FieldRequirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    pub fn requirements(mut self, requirements: impl IntoIterator<Item = FieldRequirement>) -> Self {
        self.requirements.extend(requirements);
        self
    }

    /// Add an argument holding the top-level field `name` of each entry.
    ///
    /// Entries without the field are excluded.
    pub fn field_arg(self, name: impl Into<String>) -> Self {
        let name = name.into();
        let path = Path::from([name.as_str()]);
        self.field_arg_at(name, path)
    }

    /// Add an argument holding the value found at `path` in each entry
    pub fn field_arg_at(mut self, name: impl Into<String>, path: impl Into<Path>) -> Self {
        self.field_args.push((name.into(), path.into()));
        self
    }

    /// Only consider entries of these provider classes
    pub fn classes(mut self, classes: impl IntoIterator<Item = ProviderClass>) -> Self {
        self.classes = Some(classes.into_iter().collect());
        self
    }

    pub fn selector(mut self, selector: Selector) -> Self {
        self.selector = selector;
        self
    }

    /// Argument names of every matrix this generator produces
    pub fn argnames(&self) -> Vec<String> {
        std::iter::once(self.argname.clone())
            .chain(self.field_args.iter().map(|(name, _)| name.clone()))
            .collect()
    }

    pub fn generate(&self, candidates: &[ConfigEntry]) -> Matrix {
        self.generate_filtered(candidates, |_| true)
    }

    /// Generate, dropping sets rejected by `extra_filter`.
    ///
    /// The filter runs after the requirements and before the selector, so a
    /// selector picks among candidates the filter accepted.
    pub fn generate_filtered(
        &self,
        candidates: &[ConfigEntry],
        mut extra_filter: impl FnMut(&Args<'_>) -> bool,
    ) -> Matrix {
        let argnames = self.argnames();
        let mut seen_ids = HashSet::new();
        let mut seen_groups = HashSet::new();
        let mut sets = Vec::new();

        for entry in candidates {
            let Some(values) = self.extract(entry) else {
                continue;
            };
            let set = ParameterSet {
                id: entry.name().to_string(),
                values,
            };

            if !seen_ids.insert(set.id.clone()) {
                warn!(id = %set.id, "Duplicate candidate id, keeping the first one");
                continue;
            }
            if !extra_filter(&set.args(&argnames)) {
                debug!(id = %set.id, "Excluded by secondary filter");
                continue;
            }
            if let Some(key) = self.selector.group_key(entry) {
                if !seen_groups.insert(key) {
                    debug!(id = %set.id, selector = ?self.selector, "Not selected");
                    continue;
                }
            }
            sets.push(set);
        }

        info!(
            selected = sets.len(),
            candidates = candidates.len(),
            "Generated matrix over {}",
            argnames.join(", ")
        );
        Matrix { argnames, sets }
    }

    fn extract(&self, entry: &ConfigEntry) -> Option<Vec<ArgValue>> {
        if let Some(classes) = &self.classes {
            match entry.class() {
                Some(class) if classes.contains(&class) => {}
                class => {
                    debug!(id = %entry.name(), class = ?class, "Excluded by provider class");
                    return None;
                }
            }
        }

        for requirement in &self.requirements {
            if let Err(unmet) = requirement.check(entry.data()) {
                debug!(
                    id = %entry.name(),
                    requirement = %requirement,
                    "Excluded: {}", unmet
                );
                return None;
            }
        }

        let mut values = Vec::with_capacity(1 + self.field_args.len());
        values.push(ArgValue::Entry(entry.clone()));
        for (name, path) in &self.field_args {
            match entry.get(path) {
                Some(value) => values.push(ArgValue::Field(value.clone())),
                None => {
                    debug!(id = %entry.name(), argument = %name, path = %path, "Excluded: argument field missing");
                    return None;
                }
            }
        }
        Some(values)
    }
}

/// Filter `candidates` by `requirements` and an optional secondary filter.
///
/// Returns argument names (just `provider`), one single-value tuple per
/// surviving candidate, and the candidates' names as ids.
pub fn generate(
    candidates: &[ConfigEntry],
    requirements: &[FieldRequirement],
    extra_filter: Option<&dyn Fn(&Args<'_>) -> bool>,
) -> (Vec<String>, Vec<Vec<ArgValue>>, Vec<String>) {
    let generator = MatrixGenerator::new().requirements(requirements.iter().cloned());
    let matrix = match extra_filter {
        Some(filter) => generator.generate_filtered(candidates, filter),
        None => generator.generate(candidates),
    };
    matrix.into_parts()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn candidates() -> Vec<ConfigEntry> {
        vec![
            ConfigEntry::new(
                "vsphere65",
                json!({
                    "type": "virtualcenter", "class": "infra", "version": "6.5",
                    "iso_datastore": true,
                    "provisioning": {"host": "esx-01", "datastore": "iso-ds", "iso_kickstart": "rhel7"}
                }),
            ),
            ConfigEntry::new(
                "rhv43",
                json!({
                    "type": "rhevm", "class": "infra", "version": "4.3",
                    "iso_datastore": false,
                    "provisioning": {"host": "rhv-host", "datastore": "data"}
                }),
            ),
            ConfigEntry::new(
                "vsphere67",
                json!({
                    "type": "virtualcenter", "class": "infra", "version": "6.7",
                    "iso_datastore": true,
                    "provisioning": {"host": "esx-11", "datastore": "iso-ds", "iso_kickstart": "rhel8"}
                }),
            ),
            ConfigEntry::new(
                "ec2west",
                json!({"type": "ec2", "class": "cloud", "version": "1"}),
            ),
        ]
    }

    #[test]
    fn test_keeps_only_candidates_with_required_field() {
        let pool = vec![
            ConfigEntry::new("A", json!({"provisioning": {"host": "h1"}})),
            ConfigEntry::new("B", json!({"provisioning": {}})),
        ];
        let (names, values, ids) = generate(
            &pool,
            &[FieldRequirement::exists(["provisioning", "host"])],
            None,
        );

        assert_eq!(names, vec!["provider".to_string()]);
        assert_eq!(ids, vec!["A".to_string()]);
        assert_eq!(values, vec![vec![ArgValue::Entry(pool[0].clone())]]);
    }

    #[test]
    fn test_requirements_are_anded() {
        let matrix = MatrixGenerator::new()
            .require(FieldRequirement::equals(["iso_datastore"], true))
            .require(FieldRequirement::exists(["provisioning", "iso_kickstart"]))
            .generate(&candidates());
        assert_eq!(matrix.ids(), vec!["vsphere65", "vsphere67"]);
    }

    #[test]
    fn test_missing_everywhere_gives_empty_matrix() {
        let matrix = MatrixGenerator::new()
            .require(FieldRequirement::exists(["provisioning", "pxe_server"]))
            .generate(&candidates());
        assert!(matrix.is_empty());
        assert_eq!(matrix.argnames(), &["provider".to_string()]);
    }

    #[test]
    fn test_empty_pool_gives_empty_matrix() {
        let (names, values, ids) = generate(&[], &[], None);
        assert_eq!(names.len(), 1);
        assert!(values.is_empty());
        assert!(ids.is_empty());
    }

    #[test]
    fn test_outputs_are_parallel_and_deterministic() {
        let pool = candidates();
        let reqs = [FieldRequirement::exists(["provisioning", "host"])];
        let first = generate(&pool, &reqs, None);
        let second = generate(&pool, &reqs, None);
        assert_eq!(first.1.len(), first.2.len());
        assert_eq!(first, second);
    }

    #[test]
    fn test_secondary_filter_narrows_result() {
        let not_rhevm = |args: &Args<'_>| {
            args.entry("provider")
                .and_then(ConfigEntry::provider_type)
                != Some("rhevm")
        };
        let (_, _, ids) = generate(
            &candidates(),
            &[FieldRequirement::exists(["provisioning"])],
            Some(&not_rhevm),
        );
        assert_eq!(ids, vec!["vsphere65".to_string(), "vsphere67".to_string()]);
    }

    #[test]
    fn test_secondary_filter_cannot_readmit() {
        let (_, _, ids) = generate(
            &candidates(),
            &[FieldRequirement::equals(["type"], "rhevm")],
            Some(&|_: &Args<'_>| true),
        );
        assert_eq!(ids, vec!["rhv43".to_string()]);
    }

    #[test]
    fn test_field_args_extract_values() {
        let matrix = MatrixGenerator::new()
            .field_arg("provisioning")
            .field_arg_at("kickstart", ["provisioning", "iso_kickstart"])
            .generate(&candidates());

        assert_eq!(
            matrix.argnames(),
            &["provider".to_string(), "provisioning".to_string(), "kickstart".to_string()]
        );
        // rhv43 lacks a kickstart, ec2west lacks provisioning
        assert_eq!(matrix.ids(), vec!["vsphere65", "vsphere67"]);

        let args = matrix.iter().next().unwrap();
        assert_eq!(args.id(), "vsphere65");
        assert_eq!(args.field("kickstart"), Some(&json!("rhel7")));
        assert_eq!(args.field("provisioning").and_then(|p| p.get("host")), Some(&json!("esx-01")));
        assert_eq!(args.entry("provider").map(ConfigEntry::name), Some("vsphere65"));
        assert_eq!(args.entry("kickstart"), None);
        assert_eq!(args.iter().count(), 3);
    }

    #[test]
    fn test_class_filter() {
        let matrix = MatrixGenerator::new()
            .classes([ProviderClass::Cloud])
            .generate(&candidates());
        assert_eq!(matrix.ids(), vec!["ec2west"]);

        let unclassified = vec![ConfigEntry::new("bare", json!({}))];
        assert!(MatrixGenerator::new()
            .classes([ProviderClass::Infra])
            .generate(&unclassified)
            .is_empty());
    }

    #[test]
    fn test_selectors() {
        let pool = candidates();
        let ids = |selector| {
            MatrixGenerator::new()
                .selector(selector)
                .generate(&pool)
                .ids()
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>()
        };

        assert_eq!(ids(Selector::All), vec!["vsphere65", "rhv43", "vsphere67", "ec2west"]);
        assert_eq!(ids(Selector::First), vec!["vsphere65"]);
        assert_eq!(ids(Selector::OnePerType), vec!["vsphere65", "rhv43", "ec2west"]);
        assert_eq!(
            ids(Selector::OnePerVersion),
            vec!["vsphere65", "rhv43", "vsphere67", "ec2west"]
        );
    }

    #[test]
    fn test_selector_picks_among_filtered_candidates() {
        let matrix = MatrixGenerator::new()
            .selector(Selector::First)
            .generate_filtered(&candidates(), |args| args.id() != "vsphere65");
        assert_eq!(matrix.ids(), vec!["rhv43"]);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let pool = vec![
            ConfigEntry::new("dup", json!({"n": 1})),
            ConfigEntry::new("other", json!({"n": 2})),
            ConfigEntry::new("dup", json!({"n": 3})),
        ];
        let matrix = MatrixGenerator::new().generate(&pool);
        assert_eq!(matrix.ids(), vec!["dup", "other"]);
        assert_eq!(
            matrix.sets()[0].values()[0].as_entry().unwrap().data(),
            &json!({"n": 1})
        );
    }

    #[test]
    fn test_retain_is_post_hoc_filter() {
        let matrix = MatrixGenerator::new()
            .generate(&candidates())
            .retain(|args| args.id().starts_with("vsphere"));
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.argnames(), &["provider".to_string()]);
        assert_eq!(matrix.argvalues().len(), 2);
    }
}
