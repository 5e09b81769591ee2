//! Blog posts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::{optional_text, required_id, Bilingual, ContentKind, ContentRecord, Record};
use crate::aggregate::FieldSelector;
use crate::error::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_fr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt_fr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_fr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A blog post; drafts may lack a French title
#[derive(Debug, Clone, PartialEq)]
pub struct BlogPost {
    pub id: i64,
    pub slug: Option<String>,
    pub title: Bilingual,
    pub excerpt: Bilingual,
    pub content: Bilingual,
    pub category: Option<String>,
    pub author: Option<String>,
    pub image_url: Option<String>,
    /// Absent on the wire means published
    pub published: bool,
    pub featured: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl BlogPost {
    pub fn has_title(&self) -> bool {
        !self.title.fr.is_empty()
    }

    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }

    /// Eligible for the public blog listing
    pub fn is_publicly_listed(&self) -> bool {
        self.published && self.has_title() && self.has_content()
    }
}

impl Record for BlogPost {
    type Data = BlogPostData;

    const KIND: ContentKind = ContentKind::BlogPost;

    fn from_wire(data: BlogPostData) -> Result<Self> {
        let id = required_id(data.id, Self::KIND)?;

        Ok(Self {
            id,
            slug: optional_text(data.slug),
            title: Bilingual::new(
                optional_text(data.title_fr).unwrap_or_default(),
                optional_text(data.title_en),
            ),
            excerpt: Bilingual::new(
                optional_text(data.excerpt_fr).unwrap_or_default(),
                optional_text(data.excerpt_en),
            ),
            content: Bilingual::new(
                optional_text(data.content_fr).unwrap_or_default(),
                optional_text(data.content_en),
            ),
            category: optional_text(data.category),
            author: optional_text(data.author),
            image_url: optional_text(data.image_url),
            published: data.published != Some(false),
            featured: data.featured.unwrap_or(false),
            created_at: data.created_at,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}

fn title_fr(p: &BlogPost) -> Option<&str> {
    Some(&p.title.fr)
}

fn title_en(p: &BlogPost) -> Option<&str> {
    p.title.en.as_deref()
}

fn excerpt_fr(p: &BlogPost) -> Option<&str> {
    Some(&p.excerpt.fr)
}

fn excerpt_en(p: &BlogPost) -> Option<&str> {
    p.excerpt.en.as_deref()
}

fn category(p: &BlogPost) -> Option<&str> {
    p.category.as_deref()
}

fn author(p: &BlogPost) -> Option<&str> {
    p.author.as_deref()
}

const SEARCH_FIELDS: &[FieldSelector<BlogPost>] =
    &[title_fr, title_en, excerpt_fr, excerpt_en, category, author];

impl ContentRecord for BlogPost {
    fn title(&self) -> &Bilingual {
        &self.title
    }

    fn is_visible(&self) -> bool {
        self.published
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> BlogPost {
        BlogPost::from_wire(serde_json::from_value(value).unwrap()).unwrap()
    }

    #[test]
    fn missing_published_flag_means_published() {
        let post = parse(json!({ "id": 1, "titleFr": "Bilan hydrique", "contentFr": "..." }));
        assert!(post.published);
        assert!(post.is_publicly_listed());
    }

    #[test]
    fn untitled_draft_still_parses() {
        let post = parse(json!({ "id": 2, "published": false, "contentFr": "brouillon" }));
        assert!(!post.has_title());
        assert!(!post.is_publicly_listed());
    }

    #[test]
    fn empty_content_is_not_listed() {
        let post = parse(json!({ "id": 3, "titleFr": "Annonce", "contentFr": "  " }));
        assert!(!post.has_content());
        assert!(!post.is_publicly_listed());
    }
}
