//! The list of canonical titles, with their aliases and rollover points.
//!
//! Every surface form of a title (the title itself, its aliases, the variants
//! without a trailing `!`, `?` or `.`, and the variant without a leading
//! "The ") is folded with [`norm_key`] and mapped to the canonical title.
//! The first title to claim a key keeps it.

use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::config::RegistryError;
use crate::normalize::{norm_key, normalize_unicode};

pub const TITLE_COLUMN: &str = "game";
pub const ALIAS_PREFIX: &str = "alias";
pub const ROLLOVER_COLUMNS: [&str; 3] = ["roll_over_points", "rollover_points", "roll-over-points"];

const COMMENT_MARKER: char = '#';
const TRAILING_PUNCTUATION: [char; 3] = ['!', '?', '.'];
const LEADING_ARTICLE: &str = "the ";

/// A key claimed by two different titles. The existing title kept it.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct KeyCollision {
    pub key: String,
    pub existing: String,
    pub incoming: String,
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    allowed: BTreeSet<String>,
    lookup: HashMap<String, String>,
    seeds: BTreeMap<String, u64>,
    collisions: Vec<KeyCollision>,
}

impl Registry {
    /// Builds the registry from a header and the rows below it.
    ///
    /// Headers are matched case-insensitively: `game` is required, every
    /// column starting with `alias` is an alias and the rollover column is
    /// optional.
    pub fn from_rows(
        header: &[String],
        rows: &[Vec<String>],
        debug: bool,
    ) -> Result<Registry, RegistryError> {
        let columns = RegistryColumns::from_header(header)?;
        debug!("Registry::from_rows: columns: {:?}", columns);
        let mut builder = RegistryBuilder::new(debug);
        for row in rows.iter() {
            let title = match row.get(columns.title) {
                Some(t) => t,
                None => continue,
            };
            let aliases: Vec<&str> = columns
                .aliases
                .iter()
                .filter_map(|idx| row.get(*idx))
                .map(|s| s.as_str())
                .collect();
            let rollover = columns
                .rollover
                .and_then(|idx| row.get(idx))
                .map(|s| s.as_str());
            builder.add_title(title, &aliases, rollover);
        }
        Ok(builder.build())
    }

    /// Looks up the canonical title for some text written by a voter.
    pub fn resolve(&self, raw_title: &str) -> Option<&str> {
        self.lookup.get(&norm_key(raw_title)).map(|s| s.as_str())
    }

    pub fn allowed_titles(&self) -> &BTreeSet<String> {
        &self.allowed
    }

    pub fn lookup(&self) -> &HashMap<String, String> {
        &self.lookup
    }

    /// The rollover points, only for the titles that have some.
    pub fn seeds(&self) -> &BTreeMap<String, u64> {
        &self.seeds
    }

    pub fn collisions(&self) -> &[KeyCollision] {
        &self.collisions
    }

    pub fn rollover_total(&self) -> u64 {
        self.seeds.values().fold(0, |acc, p| acc.saturating_add(*p))
    }

    /// Number of keys that are not the key of a canonical title.
    pub fn alias_key_count(&self) -> usize {
        let canonical_keys: HashSet<String> = self.allowed.iter().map(|t| norm_key(t)).collect();
        self.lookup
            .keys()
            .filter(|k| !canonical_keys.contains(*k))
            .count()
    }
}

/// The positions of the meaningful columns in the header.
#[derive(Eq, PartialEq, Debug, Clone)]
struct RegistryColumns {
    title: usize,
    aliases: Vec<usize>,
    rollover: Option<usize>,
}

impl RegistryColumns {
    fn from_header(header: &[String]) -> Result<RegistryColumns, RegistryError> {
        if header.is_empty() {
            return Err(RegistryError::EmptyHeader);
        }
        let mut title: Option<usize> = None;
        let mut aliases: Vec<usize> = Vec::new();
        let mut rollover: Option<usize> = None;
        for (idx, h) in header.iter().enumerate() {
            let h_low = h.trim_start_matches('\u{feff}').trim().to_lowercase();
            if h_low == TITLE_COLUMN {
                title = Some(idx);
            } else if h_low.starts_with(ALIAS_PREFIX) {
                aliases.push(idx);
            } else if ROLLOVER_COLUMNS.contains(&h_low.as_str()) {
                rollover = Some(idx);
            }
        }
        match title {
            Some(title) => Ok(RegistryColumns {
                title,
                aliases,
                rollover,
            }),
            None => Err(RegistryError::MissingTitleColumn {
                column: TITLE_COLUMN.to_string(),
            }),
        }
    }
}

/// Adds titles one by one. All the input formats end up here.
pub struct RegistryBuilder {
    debug: bool,
    registry: Registry,
    warned: HashSet<KeyCollision>,
}

impl RegistryBuilder {
    /// With `debug`, key collisions and unreadable rollover values are logged.
    pub fn new(debug: bool) -> RegistryBuilder {
        RegistryBuilder {
            debug,
            registry: Registry::default(),
            warned: HashSet::new(),
        }
    }

    /// Registers a canonical title.
    ///
    /// Empty titles and titles starting with `#` are skipped, and so are
    /// such aliases. The rollover value accumulates over the rows of the
    /// same title.
    pub fn add_title(&mut self, title: &str, aliases: &[&str], rollover: Option<&str>) {
        let canonical = normalize_unicode(title);
        if canonical.is_empty() || canonical.starts_with(COMMENT_MARKER) {
            return;
        }
        self.registry.allowed.insert(canonical.clone());

        let canonical_key = norm_key(&canonical);
        self.add_key_with_variants(&canonical_key, &canonical);

        for alias in aliases.iter() {
            let alias = normalize_unicode(alias);
            if !alias.is_empty() && !alias.starts_with(COMMENT_MARKER) {
                self.add_key_with_variants(&norm_key(&alias), &canonical);
            }
        }

        if let Some(rest) = canonical_key.strip_prefix(LEADING_ARTICLE) {
            let rest = rest.trim();
            if !rest.is_empty() {
                self.add_key_with_variants(rest, &canonical);
            }
        }

        let points = self.parse_rollover(&canonical, rollover);
        if points > 0 {
            let seed = self.registry.seeds.entry(canonical).or_insert(0);
            *seed = seed.saturating_add(points);
        }
    }

    pub fn build(self) -> Registry {
        if self.debug {
            debug!(
                "Registry: canonical: {} total match-keys: {} (~{} aliases)",
                self.registry.allowed.len(),
                self.registry.lookup.len(),
                self.registry.alias_key_count()
            );
            debug!(
                "Registry: rollover points: {} across {} games",
                self.registry.rollover_total(),
                self.registry.seeds.len()
            );
        }
        self.registry
    }

    fn parse_rollover(&self, canonical: &str, rollover: Option<&str>) -> u64 {
        let raw = match rollover.map(|s| s.trim()) {
            Some(s) if !s.is_empty() => s,
            _ => return 0,
        };
        match raw.parse::<u64>() {
            Ok(p) => p,
            Err(_) => {
                if self.debug {
                    warn!(
                        "Non-integer rollover points {:?} for {:?}: treating as 0",
                        raw, canonical
                    );
                }
                0
            }
        }
    }

    fn add_key_with_variants(&mut self, key: &str, canonical: &str) {
        self.add_key(key, canonical);
        if let Some(stripped) = key.strip_suffix(&TRAILING_PUNCTUATION[..]) {
            self.add_key(stripped, canonical);
        }
    }

    fn add_key(&mut self, key: &str, canonical: &str) {
        if key.is_empty() {
            return;
        }
        match self.registry.lookup.get(key) {
            Some(existing) if existing == canonical => {}
            Some(existing) => {
                let collision = KeyCollision {
                    key: key.to_string(),
                    existing: existing.clone(),
                    incoming: canonical.to_string(),
                };
                if !self.warned.contains(&collision) {
                    if self.debug {
                        warn!(
                            "Key collision: {:?} -> {:?} vs {:?} (keeping first)",
                            collision.key, collision.existing, collision.incoming
                        );
                    }
                    self.registry.collisions.push(collision.clone());
                    self.warned.insert(collision);
                }
            }
            None => {
                self.registry
                    .lookup
                    .insert(key.to_string(), canonical.to_string());
            }
        }
    }
}
