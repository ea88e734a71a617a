//! Abbreviation expansion ("vn" → "Việt Nam").

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::modes::InputMethod;

/// Longest replacement that fits in one key result.
pub const MAX_REPLACEMENT: usize = 240;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCondition {
    /// Expands as soon as the trigger is typed.
    Immediate,
    #[default]
    OnWordBoundary,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasePolicy {
    /// Replacement is inserted exactly as stored.
    Exact,
    /// Replacement follows the case of the typed trigger.
    #[default]
    MatchCase,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodFilter {
    #[default]
    All,
    Telex,
    Vni,
}

impl MethodFilter {
    pub fn allows(self, method: InputMethod) -> bool {
        match self {
            MethodFilter::All => true,
            MethodFilter::Telex => method == InputMethod::Telex,
            MethodFilter::Vni => method == InputMethod::Vni,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub trigger: String,
    pub replacement: String,
    #[serde(default)]
    pub condition: TriggerCondition,
    #[serde(default)]
    pub case: CasePolicy,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub method: MethodFilter,
}

fn default_true() -> bool {
    true
}

impl Shortcut {
    pub fn new(trigger: &str, replacement: &str) -> Self {
        Self {
            trigger: trigger.to_owned(),
            replacement: replacement.to_owned(),
            condition: TriggerCondition::OnWordBoundary,
            case: CasePolicy::MatchCase,
            enabled: true,
            method: MethodFilter::All,
        }
    }

    pub fn immediate(trigger: &str, replacement: &str) -> Self {
        Self {
            condition: TriggerCondition::Immediate,
            ..Self::new(trigger, replacement)
        }
    }

    pub fn exact(mut self) -> Self {
        self.case = CasePolicy::Exact;
        self
    }

    pub fn for_method(mut self, method: MethodFilter) -> Self {
        self.method = method;
        self
    }
}

/// Expanded text ready to be sent.
pub type Expansion = heapless::Vec<char, MAX_REPLACEMENT>;

#[derive(Clone, Debug, Default)]
pub struct ShortcutTable {
    entries: HashMap<String, Shortcut>,
}

impl ShortcutTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a shortcut. Empty triggers or replacements, and
    /// replacements too long to send, are ignored.
    pub fn add(&mut self, shortcut: Shortcut) -> bool {
        if shortcut.trigger.is_empty()
            || shortcut.replacement.is_empty()
            || shortcut.replacement.chars().count() > MAX_REPLACEMENT
        {
            debug!("ignoring shortcut {:?}", shortcut.trigger);
            return false;
        }
        debug!("shortcut {:?} -> {:?}", shortcut.trigger, shortcut.replacement);
        self.entries.insert(shortcut.trigger.clone(), shortcut);
        true
    }

    pub fn remove(&mut self, trigger: &str) -> Option<Shortcut> {
        self.entries.remove(trigger)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, trigger: &str) -> Option<&Shortcut> {
        self.entries.get(trigger)
    }

    /// Loads a JSON array of shortcuts, skipping invalid entries.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let list: Vec<Shortcut> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for s in list {
            table.add(s);
        }
        Ok(table)
    }

    /// Looks `typed` up, exact spelling first, then case-insensitively.
    pub fn lookup(
        &self,
        typed: &str,
        method: InputMethod,
        condition: TriggerCondition,
    ) -> Option<Expansion> {
        if self.entries.is_empty() || typed.is_empty() {
            return None;
        }
        let usable = |s: &&Shortcut| s.enabled && s.condition == condition && s.method.allows(method);
        if let Some(s) = self.entries.get(typed).filter(usable) {
            return Some(expand(s, typed));
        }
        let mut lower: heapless::String<64> = heapless::String::new();
        for c in typed.chars().flat_map(char::to_lowercase) {
            lower.push(c).ok()?;
        }
        let s = self
            .entries
            .get(lower.as_str())
            .filter(usable)?;
        Some(expand(s, typed))
    }
}

fn expand(s: &Shortcut, typed: &str) -> Expansion {
    let mut out = Expansion::new();
    let letters = || typed.chars().filter(|c| c.is_alphabetic());
    let all_caps = s.case == CasePolicy::MatchCase
        && letters().count() >= 2
        && letters().all(char::is_uppercase);
    let capitalized = s.case == CasePolicy::MatchCase
        && letters().next().is_some_and(char::is_uppercase);

    for (i, c) in s.replacement.chars().enumerate() {
        if all_caps || (capitalized && i == 0) {
            for u in c.to_uppercase() {
                let _ = out.push(u);
            }
        } else {
            let _ = out.push(c);
        }
    }
    out
}
