//! Partners and clients shown on the references page

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::{
    optional_text, required_id, required_text, Bilingual, ContentKind, ContentRecord, Record,
};
use crate::aggregate::FieldSelector;
use crate::error::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_fr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Partner {
    pub id: i64,
    /// Organisation name; identical in both languages
    pub name: Bilingual,
    pub description: Bilingual,
    pub category: Option<String>,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub featured: bool,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Partner {
    type Data = PartnerData;

    const KIND: ContentKind = ContentKind::Partner;

    fn from_wire(data: PartnerData) -> Result<Self> {
        let id = required_id(data.id, Self::KIND)?;
        let name = required_text(data.name, Self::KIND, id, "name")?;

        Ok(Self {
            id,
            name: Bilingual::new(name, None),
            description: Bilingual::new(
                optional_text(data.description_fr).unwrap_or_default(),
                optional_text(data.description_en),
            ),
            category: optional_text(data.category),
            logo_url: optional_text(data.logo_url),
            website: optional_text(data.website),
            featured: data.featured.unwrap_or(false),
            is_active: data.is_active.unwrap_or(true),
            created_at: data.created_at,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}

fn name(p: &Partner) -> Option<&str> {
    Some(&p.name.fr)
}

fn category(p: &Partner) -> Option<&str> {
    p.category.as_deref()
}

fn description_fr(p: &Partner) -> Option<&str> {
    Some(&p.description.fr)
}

fn description_en(p: &Partner) -> Option<&str> {
    p.description.en.as_deref()
}

const SEARCH_FIELDS: &[FieldSelector<Partner>] = &[name, category, description_fr, description_en];

impl ContentRecord for Partner {
    fn title(&self) -> &Bilingual {
        &self.name
    }

    fn is_visible(&self) -> bool {
        self.is_active
    }

    fn is_featured(&self) -> bool {
        self.featured
    }

    fn category_key(&self) -> Option<Cow<'_, str>> {
        self.category.as_deref().map(Cow::Borrowed)
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn search_fields() -> &'static [FieldSelector<Self>] {
        SEARCH_FIELDS
    }
}
