//! Activities and their two-level category tree

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::{
    optional_text, required_id, required_text, Bilingual, ContentKind, ContentRecord, Record,
};
use crate::aggregate::FieldSelector;
use crate::error::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityData {
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
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: i64,
    pub title: Bilingual,
    pub description: Bilingual,
    pub icon: Option<String>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub order: i32,
    pub featured: bool,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Activity {
    type Data = ActivityData;

    const KIND: ContentKind = ContentKind::Activity;

    fn from_wire(data: ActivityData) -> Result<Self> {
        let id = required_id(data.id, Self::KIND)?;
        let title_fr = required_text(data.title_fr, Self::KIND, id, "titleFr")?;

        Ok(Self {
            id,
            title: Bilingual::new(title_fr, optional_text(data.title_en)),
            description: Bilingual::new(
                optional_text(data.description_fr).unwrap_or_default(),
                optional_text(data.description_en),
            ),
            icon: optional_text(data.icon),
            category_id: data.category_id,
            subcategory_id: data.subcategory_id,
            order: data.order.unwrap_or(0),
            featured: data.featured.unwrap_or(false),
            is_active: data.is_active.unwrap_or(true),
            created_at: data.created_at,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}

fn title_fr(a: &Activity) -> Option<&str> {
    Some(&a.title.fr)
}

fn title_en(a: &Activity) -> Option<&str> {
    a.title.en.as_deref()
}

fn description_fr(a: &Activity) -> Option<&str> {
    Some(&a.description.fr)
}

fn description_en(a: &Activity) -> Option<&str> {
    a.description.en.as_deref()
}

const SEARCH_FIELDS: &[FieldSelector<Activity>] =
    &[title_fr, title_en, description_fr, description_en];

impl ContentRecord for Activity {
    fn title(&self) -> &Bilingual {
        &self.title
    }

    fn is_visible(&self) -> bool {
        self.is_active
    }

    fn is_featured(&self) -> bool {
        self.featured
    }

    fn category_key(&self) -> Option<Cow<'_, str>> {
        self.category_id.map(|id| Cow::Owned(id.to_string()))
    }

    fn subcategory_key(&self) -> Option<Cow<'_, str>> {
        self.subcategory_id.map(|id| Cow::Owned(id.to_string()))
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn search_fields() -> &'static [FieldSelector<Self>] {
        SEARCH_FIELDS
    }
}

/// Prisma-style relation counters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RelationCount {
    #[serde(default)]
    pub activities: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySubcategoryData {
    pub id: Option<i64>,
    pub category_id: Option<i64>,
    pub title_fr: Option<String>,
    pub title_en: Option<String>,
    #[serde(default)]
    pub activities: Vec<ActivityData>,
    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<RelationCount>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityCategoryData {
    pub id: Option<i64>,
    pub slug: Option<String>,
    pub title_fr: Option<String>,
    pub title_en: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub order: Option<i32>,
    #[serde(default)]
    pub subcategories: Vec<ActivitySubcategoryData>,
    #[serde(default)]
    pub activities: Vec<ActivityData>,
    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<RelationCount>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivitySubcategory {
    pub id: i64,
    pub category_id: i64,
    pub title: Bilingual,
    pub activities: Vec<Activity>,
    /// `_count.activities` as reported by the backend; informational only
    pub reported_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityCategory {
    pub id: i64,
    pub slug: Option<String>,
    pub title: Bilingual,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub order: i32,
    pub subcategories: Vec<ActivitySubcategory>,
    /// Activities attached to the category itself
    pub activities: Vec<Activity>,
    pub reported_count: Option<u32>,
}

impl ActivityCategory {
    /// Slug when present, numeric id otherwise
    pub fn key(&self) -> Cow<'_, str> {
        match &self.slug {
            Some(slug) => Cow::Borrowed(slug),
            None => Cow::Owned(self.id.to_string()),
        }
    }

    /// Every activity nested in the tree under this category
    pub fn nested_activities(&self) -> impl Iterator<Item = &Activity> {
        self.activities
            .iter()
            .chain(self.subcategories.iter().flat_map(|sub| sub.activities.iter()))
    }
}

/// Nested rows are best effort: one malformed activity must not drop its category
fn nested(rows: Vec<ActivityData>) -> Vec<Activity> {
    rows.into_iter()
        .filter_map(|row| match Activity::from_wire(row) {
            Ok(activity) => Some(activity),
            Err(err) => {
                warn!("skipping nested activity: {}", err);
                None
            }
        })
        .collect()
}

impl Record for ActivityCategory {
    type Data = ActivityCategoryData;

    const KIND: ContentKind = ContentKind::ActivityCategory;

    fn from_wire(data: ActivityCategoryData) -> Result<Self> {
        let id = required_id(data.id, Self::KIND)?;
        let title_fr = required_text(data.title_fr, Self::KIND, id, "titleFr")?;

        let mut subcategories = Vec::with_capacity(data.subcategories.len());
        for sub in data.subcategories {
            let sub_id = required_id(sub.id, Self::KIND)?;
            let sub_title = required_text(sub.title_fr, Self::KIND, sub_id, "titleFr")?;
            subcategories.push(ActivitySubcategory {
                id: sub_id,
                category_id: sub.category_id.unwrap_or(id),
                title: Bilingual::new(sub_title, optional_text(sub.title_en)),
                activities: nested(sub.activities),
                reported_count: sub.count.map(|c| c.activities),
            });
        }

        Ok(Self {
            id,
            slug: optional_text(data.slug),
            title: Bilingual::new(title_fr, optional_text(data.title_en)),
            color: optional_text(data.color),
            icon: optional_text(data.icon),
            order: data.order.unwrap_or(0),
            subcategories,
            activities: nested(data.activities),
            reported_count: data.count.map(|c| c.activities),
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}
