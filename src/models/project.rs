//! Portfolio projects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::{
    optional_text, required_id, required_text, Bilingual, ContentKind, ContentRecord, Record,
};
use crate::aggregate::FieldSelector;
use crate::error::Result;

/// Project as sent and received by `/api/admin/projects`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_fr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_fr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: i64,
    pub title: Bilingual,
    pub description: Bilingual,
    pub client: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    /// e.g. "Terminé", "En cours"
    pub status: Option<String>,
    pub year: Option<i32>,
    pub image_url: Option<String>,
    pub featured: bool,
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Project {
    type Data = ProjectData;

    const KIND: ContentKind = ContentKind::Project;

    fn from_wire(data: ProjectData) -> Result<Self> {
        let id = required_id(data.id, Self::KIND)?;
        let title_fr = required_text(data.title_fr, Self::KIND, id, "titleFr")?;

        Ok(Self {
            id,
            title: Bilingual::new(title_fr, optional_text(data.title_en)),
            description: Bilingual::new(
                optional_text(data.description_fr).unwrap_or_default(),
                optional_text(data.description_en),
            ),
            client: optional_text(data.client),
            location: optional_text(data.location),
            category: optional_text(data.category),
            status: optional_text(data.status),
            year: data.year,
            image_url: optional_text(data.image_url),
            featured: data.featured.unwrap_or(false),
            active: data.active.unwrap_or(true),
            created_at: data.created_at,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}

fn title_fr(p: &Project) -> Option<&str> {
    Some(&p.title.fr)
}

fn title_en(p: &Project) -> Option<&str> {
    p.title.en.as_deref()
}

fn client(p: &Project) -> Option<&str> {
    p.client.as_deref()
}

fn location(p: &Project) -> Option<&str> {
    p.location.as_deref()
}

fn description_fr(p: &Project) -> Option<&str> {
    Some(&p.description.fr)
}

fn description_en(p: &Project) -> Option<&str> {
    p.description.en.as_deref()
}

const SEARCH_FIELDS: &[FieldSelector<Project>] =
    &[title_fr, title_en, client, location, description_fr, description_en];

impl ContentRecord for Project {
    fn title(&self) -> &Bilingual {
        &self.title
    }

    fn is_visible(&self) -> bool {
        self.active
    }

    fn is_featured(&self) -> bool {
        self.featured
    }

    fn category_key(&self) -> Option<Cow<'_, str>> {
        self.category.as_deref().map(Cow::Borrowed)
    }

    fn status_label(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn search_fields() -> &'static [FieldSelector<Self>] {
        SEARCH_FIELDS
    }
}
