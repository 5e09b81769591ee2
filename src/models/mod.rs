//! Typed content records and their wire shapes
//!
//! Every record arrives as loosely-typed JSON. Each type pairs a `*Data`
//! wire struct (all fields optional, also used as a create/update payload)
//! with a validated record produced by [`Record::from_wire`].

mod activity;
mod blog;
mod contact;
mod partner;
mod project;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::aggregate::FieldSelector;
use crate::error::{Error, Result};

pub use activity::*;
pub use blog::*;
pub use contact::*;
pub use partner::*;
pub use project::*;

/// Display language of the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" | "fr-fr" | "fr-ma" => Ok(Language::Fr),
            "en" | "en-us" | "en-gb" => Ok(Language::En),
            other => Err(Error::validation(format!("unsupported language {:?}", other))),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// French text with an optional English translation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bilingual {
    pub fr: String,
    pub en: Option<String>,
}

impl Bilingual {
    /// Blank translations are stored as absent
    pub fn new(fr: impl Into<String>, en: Option<String>) -> Self {
        Self {
            fr: fr.into(),
            en: en.filter(|text| !text.trim().is_empty()),
        }
    }

    /// Text in `lang`, falling back to French
    pub fn get(&self, lang: Language) -> &str {
        match (lang, self.en.as_deref()) {
            (Language::En, Some(en)) => en,
            _ => &self.fr,
        }
    }

    /// True when neither language carries any text
    pub fn is_empty(&self) -> bool {
        self.fr.trim().is_empty() && self.en.is_none()
    }
}

/// The content collections exposed by the admin API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Activity,
    ActivityCategory,
    Project,
    Partner,
    BlogPost,
    Contact,
}

impl ContentKind {
    pub const ALL: [ContentKind; 6] = [
        ContentKind::Activity,
        ContentKind::ActivityCategory,
        ContentKind::Project,
        ContentKind::Partner,
        ContentKind::BlogPost,
        ContentKind::Contact,
    ];

    /// Path segment under the admin prefix
    pub fn endpoint(&self) -> &'static str {
        match self {
            ContentKind::Activity => "activities",
            ContentKind::ActivityCategory => "activity-categories",
            ContentKind::Project => "projects",
            ContentKind::Partner => "partners",
            ContentKind::BlogPost => "blog_posts",
            ContentKind::Contact => "contacts",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentKind::Activity => "activity",
            ContentKind::ActivityCategory => "activity category",
            ContentKind::Project => "project",
            ContentKind::Partner => "partner",
            ContentKind::BlogPost => "blog post",
            ContentKind::Contact => "contact message",
        };
        f.write_str(name)
    }
}

/// A record managed through the CRUD gateway
pub trait Record: Clone + Send + Sync + Sized + 'static {
    /// Wire shape accepted and produced by the backend
    type Data: DeserializeOwned + Serialize + Send;

    const KIND: ContentKind;

    /// Validate a wire record into its typed form
    fn from_wire(data: Self::Data) -> Result<Self>;

    fn id(&self) -> i64;
}

/// Behaviour shared by activities, projects, partners and blog posts
pub trait ContentRecord: Record {
    fn title(&self) -> &Bilingual;

    /// Title in `lang`, falling back to French
    fn display_title(&self, lang: Language) -> &str {
        self.title().get(lang)
    }

    /// Visible on the public site (`active`, `isActive` or `published`)
    fn is_visible(&self) -> bool;

    fn is_featured(&self) -> bool {
        false
    }

    /// Key of the category the record belongs to, if any
    fn category_key(&self) -> Option<Cow<'_, str>>;

    /// Key of the subcategory, for types filed in a category tree
    fn subcategory_key(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// Free-form workflow status (projects only)
    fn status_label(&self) -> Option<&str> {
        None
    }

    fn created_at(&self) -> Option<DateTime<Utc>>;

    /// Fields matched by the default text search
    fn search_fields() -> &'static [FieldSelector<Self>];
}

pub(crate) fn required_id(id: Option<i64>, kind: ContentKind) -> Result<i64> {
    match id {
        Some(id) if id > 0 => Ok(id),
        Some(id) => Err(Error::validation(format!("{} has invalid id {}", kind, id))),
        None => Err(Error::validation(format!("{} is missing an id", kind))),
    }
}

pub(crate) fn required_text(
    value: Option<String>,
    kind: ContentKind,
    id: i64,
    field: &str,
) -> Result<String> {
    match optional_text(value) {
        Some(text) => Ok(text),
        None => Err(Error::validation(format!("{} #{} is missing {}", kind, id, field))),
    }
}

/// Blank strings count as absent
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bilingual_falls_back_to_french() {
        let title = Bilingual::new("Assainissement liquide", None);
        assert_eq!(title.get(Language::En), "Assainissement liquide");

        let blank = Bilingual::new("Hydraulique urbaine", Some("  ".to_string()));
        assert_eq!(blank.en, None);
        assert_eq!(blank.get(Language::En), "Hydraulique urbaine");

        let both = Bilingual::new("Eau potable", Some("Drinking water".to_string()));
        assert_eq!(both.get(Language::En), "Drinking water");
        assert_eq!(both.get(Language::Fr), "Eau potable");
    }

    #[test]
    fn language_parses_locale_tags() {
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert_eq!("fr-MA".parse::<Language>().unwrap(), Language::Fr);
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn endpoints_match_admin_routes() {
        assert_eq!(ContentKind::BlogPost.endpoint(), "blog_posts");
        assert_eq!(ContentKind::ActivityCategory.endpoint(), "activity-categories");
    }

    #[test]
    fn ids_must_be_positive() {
        assert!(required_id(None, ContentKind::Project).is_err());
        assert!(required_id(Some(0), ContentKind::Project).is_err());
        assert_eq!(required_id(Some(7), ContentKind::Project).unwrap(), 7);
    }
}
