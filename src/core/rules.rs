use crate::models::Direction;

/// Health condition to nutrient preference table
const HEALTH_RULES: &[(&str, &[(&str, Direction)])] = &[
    ("고혈압", &[("나트륨", Direction::Low)]),
    ("당뇨", &[("당류", Direction::Low)]),
    ("감량", &[("칼로리", Direction::Low)]),
    (
        "고지혈증",
        &[("지방", Direction::Low), ("포화지방", Direction::Low), ("트랜스지방", Direction::Low)],
    ),
    (
        "심혈관질환",
        &[("나트륨", Direction::Low), ("포화지방", Direction::Low), ("콜레스테롤", Direction::Low)],
    ),
    ("신장질환", &[("나트륨", Direction::Low), ("단백질", Direction::Low)]),
    ("간질환", &[("당류", Direction::Low), ("지방", Direction::Low)]),
    ("골다공증", &[("칼슘", Direction::High), ("나트륨", Direction::Low)]),
    ("고콜레스테롤혈증", &[("콜레스테롤", Direction::Low), ("포화지방", Direction::Low)]),
    ("통풍", &[("단백질", Direction::Low)]),
];

/// Nutrient evaluated when no condition matches
pub const DEFAULT_RULE: (&str, Direction) = ("칼로리", Direction::Low);

/// Rules for a single health condition, if the table knows it
pub fn rules_for(condition: &str) -> Option<&'static [(&'static str, Direction)]> {
    HEALTH_RULES
        .iter()
        .find(|(name, _)| *name == condition)
        .map(|(_, rules)| *rules)
}

/// Ordered nutrient -> direction mapping without duplicate nutrients
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    entries: Vec<(String, Direction)>,
}

impl RuleSet {
    /// Insert or overwrite; an existing nutrient keeps its position
    pub fn insert(&mut self, nutrient: &str, direction: Direction) {
        match self.entries.iter_mut().find(|(name, _)| name == nutrient) {
            Some(entry) => entry.1 = direction,
            None => self.entries.push((nutrient.to_string(), direction)),
        }
    }

    pub fn get(&self, nutrient: &str) -> Option<Direction> {
        self.entries
            .iter()
            .find(|(name, _)| name == nutrient)
            .map(|(_, direction)| *direction)
    }

    pub fn nutrients(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Direction)> {
        self.entries.iter().map(|(name, direction)| (name.as_str(), *direction))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Merge the rules of every known condition, in condition order
///
/// The last applied rule wins when two conditions name the same nutrient.
/// Falls back to [`DEFAULT_RULE`] when nothing matches.
pub fn resolve_rules(conditions: &[String]) -> RuleSet {
    let mut merged = RuleSet::default();

    for condition in conditions {
        if let Some(rules) = rules_for(condition) {
            for (nutrient, direction) in rules {
                merged.insert(nutrient, *direction);
            }
        }
    }

    if merged.is_empty() {
        merged.insert(DEFAULT_RULE.0, DEFAULT_RULE.1);
    }

    merged
}
