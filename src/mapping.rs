//! Stable-name allocation and the mapping export.
//!
//! One `Mapping` lives for one submission: every file of the submission is
//! normalized against it so an identifier reused across files keeps one
//! stable token. Numbering is first-encounter order within a category, which
//! is why the walk must stay strictly sequential.

use indexmap::IndexMap;
use std::collections::BTreeMap;

use crate::builtins;

/// Identifier namespaces. Each category numbers independently and carries its
/// own prefix, so a stable name alone reveals what it names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Variable,
    Function,
    Class,
    Method,
}

impl Category {
    fn prefix(self) -> &'static str {
        match self {
            Category::Variable => "v",
            Category::Function => "fn",
            Category::Class => "C",
            Category::Method => "m",
        }
    }

    /// Variables are the only case-sensitive namespace.
    fn folds_case(self) -> bool {
        !matches!(self, Category::Variable)
    }
}

/// Case folding for case-insensitive identifiers: per-character Unicode
/// lowercase. Deliberately not `str::to_lowercase`, whose final-sigma rule
/// would split `ΜΕΘΟΔΟΣ` from `μεθοδοσ`.
pub fn fold_name(name: &str) -> String {
    name.chars().flat_map(char::to_lowercase).collect()
}

#[derive(Clone, Debug)]
struct SpellingCount {
    spelling: String,
    count: usize,
}

#[derive(Clone, Debug)]
struct NameEntry {
    stable_name: String,
    /// In first-seen order; ties on count resolve to the earliest index.
    spellings: Vec<SpellingCount>,
}

impl NameEntry {
    fn new(stable_name: String) -> NameEntry {
        NameEntry {
            stable_name,
            spellings: Vec::new(),
        }
    }

    fn record(&mut self, spelling: &str) {
        if let Some(seen) = self
            .spellings
            .iter_mut()
            .find(|seen| seen.spelling == spelling)
        {
            seen.count += 1;
        } else {
            self.spellings.push(SpellingCount {
                spelling: spelling.to_string(),
                count: 1,
            });
        }
    }

    /// Highest count wins; ties go to the spelling seen first.
    fn most_common_spelling(&self) -> &str {
        let mut best: Option<&SpellingCount> = None;
        for seen in &self.spellings {
            if best.is_none_or(|b| seen.count > b.count) {
                best = Some(seen);
            }
        }
        best.map(|seen| seen.spelling.as_str())
            .expect("entry has at least one recorded spelling")
    }
}

/// Per-submission symbol tables for all four categories.
#[derive(Clone, Debug, Default)]
pub struct Mapping {
    variables: IndexMap<String, NameEntry>,
    functions: IndexMap<String, NameEntry>,
    classes: IndexMap<String, NameEntry>,
    methods: IndexMap<String, NameEntry>,
    /// Builtin alias targets hit via a deprecated spelling. Kept outside the
    /// numbered tables so alias traffic never shifts `fnN` numbering.
    alias_targets: IndexMap<String, NameEntry>,
}

impl Mapping {
    pub fn new() -> Mapping {
        Mapping::default()
    }

    /// Allocate (or look up) the stable name for one identifier occurrence.
    pub fn allocate(&mut self, category: Category, raw_name: &str) -> String {
        let key = if category.folds_case() {
            fold_name(raw_name)
        } else {
            raw_name.to_string()
        };

        if category == Category::Function {
            if let Some(target) = builtins::resolve_alias(&key) {
                let entry = self
                    .alias_targets
                    .entry(target.to_string())
                    .or_insert_with(|| NameEntry::new(target.to_string()));
                entry.record(&key);
                return target.to_string();
            }
            if builtins::is_builtin_function(&key) {
                return key;
            }
        }

        let table = self.table_mut(category);
        if !table.contains_key(&key) {
            let stable_name = format!("{}{}", category.prefix(), table.len());
            table.insert(key.clone(), NameEntry::new(stable_name));
        }
        let entry = table.get_mut(&key).expect("entry inserted above");
        // Function exports surface the folded spelling; the other categories
        // keep the raw one (most frequent wins).
        if category == Category::Function {
            entry.record(&key);
        } else {
            entry.record(raw_name);
        }
        entry.stable_name.clone()
    }

    fn table_mut(&mut self, category: Category) -> &mut IndexMap<String, NameEntry> {
        match category {
            Category::Variable => &mut self.variables,
            Category::Function => &mut self.functions,
            Category::Class => &mut self.classes,
            Category::Method => &mut self.methods,
        }
    }

    /// Key-sorted merge of every category: `stableName -> mostCommonSpelling`.
    ///
    /// Pure: repeated calls return the same value for the same accumulated
    /// state, independent of any hash-map iteration order.
    pub fn export(&self) -> BTreeMap<String, String> {
        let mut merged = BTreeMap::new();
        for table in [
            &self.functions,
            &self.variables,
            &self.classes,
            &self.methods,
            &self.alias_targets,
        ] {
            for entry in table.values() {
                let previous = merged.insert(
                    entry.stable_name.clone(),
                    entry.most_common_spelling().to_string(),
                );
                assert!(
                    previous.is_none(),
                    "stable name `{}` allocated twice",
                    entry.stable_name
                );
            }
        }
        merged
    }

    /// The export as a compact JSON object, byte-stable for a given sequence
    /// of `allocate` calls. `{}` when nothing was allocated.
    pub fn to_export_string(&self) -> String {
        serde_json::to_string(&self.export()).expect("string map serializes")
    }
}
