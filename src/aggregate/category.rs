//! Display metadata for category keys

use std::collections::HashMap;

use crate::models::{ActivityCategory, Bilingual, ContentKind, Language};

/// Key of the bucket holding records without a category
pub const OTHER_KEY: &str = "__other__";

/// Trimmed key, or `None` when the record belongs in "Other".
///
/// A blank key and a literal [`OTHER_KEY`] both count as uncategorised.
pub fn usable_key(key: &str) -> Option<&str> {
    let key = key.trim();
    if key.is_empty() || key.eq_ignore_ascii_case(OTHER_KEY) {
        None
    } else {
        Some(key)
    }
}

/// How a category is presented: title, colour token and icon token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInfo {
    pub key: String,
    pub title: Bilingual,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl CategoryInfo {
    pub fn new(key: &str, fr: &str, en: &str) -> Self {
        Self {
            key: key.to_string(),
            title: Bilingual::new(fr, Some(en.to_string())),
            color: None,
            icon: None,
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    /// Category whose title is just its key
    pub fn untitled(key: &str) -> Self {
        Self {
            key: key.to_string(),
            title: Bilingual::new(key, None),
            color: None,
            icon: None,
        }
    }

    /// Sentinel for records without a category
    pub fn other() -> Self {
        CategoryInfo::new(OTHER_KEY, "Autre", "Other").with_color("gray")
    }

    pub fn is_other(&self) -> bool {
        self.key == OTHER_KEY
    }

    pub fn display_title(&self, lang: Language) -> &str {
        self.title.get(lang)
    }
}

impl From<&ActivityCategory> for CategoryInfo {
    fn from(category: &ActivityCategory) -> Self {
        Self {
            key: category.id.to_string(),
            title: category.title.clone(),
            color: category.color.clone(),
            icon: category.icon.clone(),
        }
    }
}

/// Ordered list of known categories for one content type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCatalog {
    entries: Vec<CategoryInfo>,
    index: HashMap<String, usize>,
    /// Subcategory key to the position of its parent entry
    subcategories: HashMap<String, usize>,
}

fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}

impl CategoryCatalog {
    pub fn new(entries: Vec<CategoryInfo>) -> Self {
        let mut catalog = Self::default();
        for entry in entries {
            catalog.push(entry);
        }
        catalog
    }

    /// Later duplicates of a key are ignored
    pub fn push(&mut self, entry: CategoryInfo) {
        let key = normalize(&entry.key);
        if self.index.contains_key(&key) {
            return;
        }
        self.index.insert(key, self.entries.len());
        self.entries.push(entry);
    }

    /// Make records filed under `subcategory` count for the entry `parent`.
    ///
    /// Ignored when `parent` is unknown; the first parent registered wins.
    pub fn push_subcategory(&mut self, subcategory: &str, parent: &str) {
        if let Some(position) = self.position(parent) {
            self.subcategories
                .entry(normalize(subcategory))
                .or_insert(position);
        }
    }

    /// Built-in catalog for a flat content type
    pub fn for_kind(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Project => Self::projects(),
            ContentKind::Partner => Self::partners(),
            ContentKind::BlogPost => Self::blog(),
            _ => Self::default(),
        }
    }

    pub fn projects() -> Self {
        Self::new(vec![
            CategoryInfo::new("AEP", "Alimentation en eau potable", "Drinking water supply")
                .with_color("blue")
                .with_icon("droplet"),
            CategoryInfo::new("Assainissement", "Assainissement", "Sanitation")
                .with_color("green")
                .with_icon("recycle"),
            CategoryInfo::new("Irrigation", "Irrigation", "Irrigation")
                .with_color("emerald")
                .with_icon("sprout"),
            CategoryInfo::new(
                "Hydrologie",
                "Hydrologie et ressources en eau",
                "Hydrology and water resources",
            )
                .with_color("cyan")
                .with_icon("waves"),
            CategoryInfo::new(
                "Barrages",
                "Barrages et ouvrages hydrauliques",
                "Dams and hydraulic structures",
            )
                .with_color("indigo")
                .with_icon("landmark"),
            CategoryInfo::new("Environnement", "Environnement", "Environment")
                .with_color("lime")
                .with_icon("leaf"),
        ])
    }

    pub fn partners() -> Self {
        Self::new(vec![
            CategoryInfo::new("Institutionnel", "Institutionnels", "Public institutions")
                .with_color("blue")
                .with_icon("building"),
            CategoryInfo::new("Privé", "Secteur privé", "Private sector")
                .with_color("orange")
                .with_icon("briefcase"),
            CategoryInfo::new("International", "Bailleurs internationaux", "International donors")
                .with_color("purple")
                .with_icon("globe"),
            CategoryInfo::new("Collectivités", "Collectivités territoriales", "Local authorities")
                .with_color("teal")
                .with_icon("map"),
        ])
    }

    pub fn blog() -> Self {
        Self::new(vec![
            CategoryInfo::new("Actualités", "Actualités", "News").with_color("blue"),
            CategoryInfo::new("Projets", "Projets", "Projects").with_color("green"),
            CategoryInfo::new("Expertise", "Expertise", "Expertise").with_color("cyan"),
            CategoryInfo::new("Événements", "Événements", "Events").with_color("amber"),
        ])
    }

    /// Catalog built from the activity category tree, in backend order.
    ///
    /// Subcategory ids resolve to their parent category.
    pub fn from_activity_categories(categories: &[ActivityCategory]) -> Self {
        let mut sorted: Vec<&ActivityCategory> = categories.iter().collect();
        sorted.sort_by_key(|c| c.order);
        let mut catalog = Self::new(sorted.iter().map(|c| CategoryInfo::from(*c)).collect());
        for category in sorted {
            let parent = category.id.to_string();
            for subcategory in &category.subcategories {
                catalog.push_subcategory(&subcategory.id.to_string(), &parent);
            }
        }
        catalog
    }

    /// Known category for `key`, compared case-insensitively
    pub fn get(&self, key: &str) -> Option<&CategoryInfo> {
        self.position(key).map(|i| &self.entries[i])
    }

    pub(crate) fn position(&self, key: &str) -> Option<usize> {
        self.index.get(&normalize(key)).copied()
    }

    pub(crate) fn locate_position(
        &self,
        category: Option<&str>,
        subcategory: Option<&str>,
    ) -> Option<usize> {
        subcategory
            .and_then(usable_key)
            .and_then(|key| self.subcategories.get(&normalize(key)).copied())
            .or_else(|| category.and_then(usable_key).and_then(|key| self.position(key)))
    }

    /// Entry a record is counted under; `None` means "Other".
    ///
    /// A known subcategory wins over the record's own category key.
    pub fn locate(
        &self,
        category: Option<&str>,
        subcategory: Option<&str>,
    ) -> Option<&CategoryInfo> {
        self.locate_position(category, subcategory)
            .map(|i| &self.entries[i])
    }

    /// Known category, or one titled after the key itself
    pub fn resolve(&self, key: &str) -> CategoryInfo {
        self.get(key)
            .cloned()
            .unwrap_or_else(|| CategoryInfo::untitled(key.trim()))
    }

    pub fn entries(&self) -> &[CategoryInfo] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
