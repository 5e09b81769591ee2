//! Combined search/category/status filters and public visibility rules

use std::cmp::Reverse;

use super::category::{usable_key, CategoryCatalog};
use super::search::SearchQuery;
use crate::models::{BlogPost, ContentRecord};

/// Filters chained with AND, as driven by a list page's filter bar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFilter {
    pub search: String,
    /// Category key; [`OTHER_KEY`](super::OTHER_KEY) selects the "Other" group
    pub category: Option<String>,
    pub status: Option<String>,
    pub visible_only: bool,
    pub featured_only: bool,
    /// Catalog the category groups were built with, if any
    pub catalog: Option<CategoryCatalog>,
}

fn same_key(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn is_other(key: &str) -> bool {
    usable_key(key).is_none()
}

impl ContentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = search.to_string();
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }

    pub fn visible_only(mut self) -> Self {
        self.visible_only = true;
        self
    }

    pub fn featured_only(mut self) -> Self {
        self.featured_only = true;
        self
    }

    /// Select categories the way [`group_records`](super::group_records)
    /// groups them with `catalog`: unknown keys belong to "Other"
    pub fn with_catalog(mut self, catalog: CategoryCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// True when at least one criterion narrows the list
    pub fn is_active(&self) -> bool {
        !SearchQuery::new(&self.search).is_blank()
            || self.category.is_some()
            || self.status.is_some()
            || self.visible_only
            || self.featured_only
    }

    /// The "reset filters" action; the catalog is kept
    pub fn reset(&mut self) {
        *self = Self {
            catalog: self.catalog.take(),
            ..Self::default()
        };
    }

    fn in_category<T: ContentRecord>(&self, wanted: &str, record: &T) -> bool {
        let category = record.category_key();
        let subcategory = record.subcategory_key();
        let found = match &self.catalog {
            Some(catalog) => catalog
                .locate(category.as_deref(), subcategory.as_deref())
                .map(|info| info.key.as_str()),
            None => category.as_deref().and_then(usable_key),
        };
        match found {
            Some(key) => same_key(key, wanted),
            None => is_other(wanted),
        }
    }

    fn matches_with<T: ContentRecord>(&self, query: &SearchQuery, record: &T) -> bool {
        if self.visible_only && !record.is_visible() {
            return false;
        }
        if self.featured_only && !record.is_featured() {
            return false;
        }
        if let Some(wanted) = &self.category {
            if !self.in_category(wanted, record) {
                return false;
            }
        }
        if let Some(wanted) = &self.status {
            match record.status_label() {
                Some(status) if same_key(status, wanted) => {}
                _ => return false,
            }
        }
        query.matches(record, T::search_fields())
    }

    pub fn matches<T: ContentRecord>(&self, record: &T) -> bool {
        self.matches_with(&SearchQuery::new(&self.search), record)
    }

    /// Matching records, in input order
    pub fn apply<'a, T, I>(&self, records: I) -> Vec<&'a T>
    where
        T: ContentRecord,
        I: IntoIterator<Item = &'a T>,
    {
        let query = SearchQuery::new(&self.search);
        records
            .into_iter()
            .filter(|record| self.matches_with(&query, *record))
            .collect()
    }
}

/// Records shown on the public site, in input order
pub fn public_records<'a, T, I>(records: I) -> Vec<&'a T>
where
    T: ContentRecord,
    I: IntoIterator<Item = &'a T>,
{
    records.into_iter().filter(|record| record.is_visible()).collect()
}

/// Visible and featured records, for home-page highlights
pub fn featured_records<'a, T, I>(records: I) -> Vec<&'a T>
where
    T: ContentRecord,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .filter(|record| record.is_visible() && record.is_featured())
        .collect()
}

/// Posts for the public blog: titled, with content, not unpublished
pub fn public_blog_posts<'a, I>(posts: I) -> Vec<&'a BlogPost>
where
    I: IntoIterator<Item = &'a BlogPost>,
{
    posts.into_iter().filter(|post| post.is_publicly_listed()).collect()
}

/// Sort newest first; undated records go last, ties keep input order
pub fn newest_first<T: ContentRecord>(records: &mut [&T]) {
    records.sort_by_key(|record| Reverse(record.created_at()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{group_activities, group_records, OTHER_KEY};
    use crate::models::{Activity, ActivityCategory, Project, Record};
    use serde_json::{json, Value};

    fn parse<T: Record>(value: Value) -> T {
        T::from_wire(serde_json::from_value(value).unwrap()).unwrap()
    }

    fn projects() -> Vec<Project> {
        [
            json!({
                "id": 1,
                "titleFr": "Renforcement AEP",
                "client": "LYDEC",
                "status": "Terminé",
                "category": "AEP"
            }),
            json!({
                "id": 2,
                "titleFr": "Réseau d'égouts",
                "client": "ONEE",
                "status": "En cours",
                "category": "Assainissement"
            }),
        ]
        .into_iter()
        .map(|value| Project::from_wire(serde_json::from_value(value).unwrap()).unwrap())
        .collect()
    }

    fn ids(found: &[&Project]) -> Vec<i64> {
        found.iter().map(|p| p.id).collect()
    }

    #[test]
    fn search_matches_client_name() {
        let projects = projects();
        let found = ContentFilter::new().with_search("lydec").apply(&projects);
        assert_eq!(ids(&found), vec![1]);
    }

    #[test]
    fn category_filter_selects_one_record() {
        let projects = projects();
        let found = ContentFilter::new().with_category("AEP").apply(&projects);
        assert_eq!(ids(&found), vec![1]);
    }

    #[test]
    fn unmatched_search_with_matched_category_yields_nothing() {
        let projects = projects();
        let filter = ContentFilter::new().with_search("casablanca").with_category("AEP");
        assert!(filter.apply(&projects).is_empty());
    }

    #[test]
    fn status_filter_ignores_case() {
        let projects = projects();
        let found = ContentFilter::new().with_status("en cours").apply(&projects);
        assert_eq!(ids(&found), vec![2]);
    }

    #[test]
    fn reset_clears_every_criterion() {
        let mut filter = ContentFilter::new().with_search("x").with_category("AEP").visible_only();
        assert!(filter.is_active());
        filter.reset();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&projects()).len(), 2);
    }

    #[test]
    fn blog_listing_hides_drafts_and_untitled_posts() {
        let posts: Vec<BlogPost> = [
            json!({ "id": 1, "titleFr": "Publié", "contentFr": "Texte" }),
            json!({ "id": 2, "published": false, "contentFr": "Sans titre" }),
            json!({ "id": 3, "contentFr": "Sans titre mais publié" }),
            json!({ "id": 4, "titleFr": "Brouillon", "contentFr": "Texte", "published": false }),
            json!({ "id": 5, "titleFr": "Vide", "published": true }),
        ]
        .into_iter()
        .map(|value| BlogPost::from_wire(serde_json::from_value(value).unwrap()).unwrap())
        .collect();

        let listed: Vec<i64> = public_blog_posts(&posts).iter().map(|p| p.id).collect();
        assert_eq!(listed, vec![1]);
    }

    #[test]
    fn newest_first_puts_undated_last() {
        let posts: Vec<Project> = [
            json!({ "id": 1, "titleFr": "A" }),
            json!({ "id": 2, "titleFr": "B", "createdAt": "2023-01-01T00:00:00Z" }),
            json!({ "id": 3, "titleFr": "C", "createdAt": "2024-01-01T00:00:00Z" }),
        ]
        .into_iter()
        .map(|value| Project::from_wire(serde_json::from_value(value).unwrap()).unwrap())
        .collect();

        let mut refs: Vec<&Project> = posts.iter().collect();
        newest_first(&mut refs);
        assert_eq!(ids(&refs), vec![3, 2, 1]);
    }

    #[test]
    fn other_filter_matches_other_group_with_catalog() {
        let projects: Vec<Project> = [
            json!({ "id": 1, "titleFr": "Adduction Oujda", "category": "AEP" }),
            json!({ "id": 2, "titleFr": "Usine de Chtouka", "category": "Dessalement" }),
            json!({ "id": 3, "titleFr": "Étude sans catégorie" }),
        ]
        .into_iter()
        .map(parse::<Project>)
        .collect();
        let catalog = CategoryCatalog::projects();
        let grouping = group_records(&projects, Some(&catalog));

        let filter = ContentFilter::new().with_catalog(catalog.clone());
        for group in grouping.iter() {
            let shown = filter.clone().with_category(&group.category.key).apply(&projects);
            assert_eq!(shown.len(), group.count(), "group {}", group.category.key);
        }
        let other = filter.with_category(OTHER_KEY).apply(&projects);
        assert_eq!(ids(&other), vec![2, 3]);
        assert_eq!(grouping.other().map(|g| g.count()), Some(other.len()));
    }

    #[test]
    fn without_catalog_unknown_keys_keep_their_own_group() {
        let projects: Vec<Project> = [
            json!({ "id": 1, "titleFr": "Usine de Chtouka", "category": "Dessalement" }),
            json!({ "id": 2, "titleFr": "Étude", "category": OTHER_KEY }),
            json!({ "id": 3, "titleFr": "Sans catégorie" }),
        ]
        .into_iter()
        .map(parse::<Project>)
        .collect();

        let other = ContentFilter::new().with_category(OTHER_KEY).apply(&projects);
        assert_eq!(ids(&other), vec![2, 3]);
        let grouping = group_records(&projects, None);
        assert_eq!(grouping.other().map(|g| g.count()), Some(other.len()));
    }

    #[test]
    fn activity_filter_counts_match_category_tree() {
        let categories: Vec<ActivityCategory> = vec![parse(json!({
            "id": 1,
            "titleFr": "Eau potable",
            "subcategories": [{ "id": 10, "titleFr": "Adduction" }]
        }))];
        let activities: Vec<Activity> = [
            json!({ "id": 1, "titleFr": "Études AEP", "categoryId": 1 }),
            json!({ "id": 2, "titleFr": "Conduites", "subcategoryId": 10 }),
            json!({ "id": 3, "titleFr": "Réservoirs", "categoryId": 2, "subcategoryId": 10 }),
            json!({ "id": 4, "titleFr": "Orpheline", "categoryId": 7 }),
        ]
        .into_iter()
        .map(parse::<Activity>)
        .collect();

        let tree = group_activities(&categories, &activities);
        let catalog = CategoryCatalog::from_activity_categories(&categories);
        let filter = ContentFilter::new().with_catalog(catalog.clone());

        let shown = filter.clone().with_category("1").apply(&activities);
        assert_eq!(tree.get(1).map(|t| t.total_count()), Some(shown.len()));
        assert_eq!(shown.len(), 3);

        let grouping = group_records(&activities, Some(&catalog));
        assert_eq!(grouping.get("1").map(|g| g.count()), Some(3));
        let other = filter.with_category(OTHER_KEY).apply(&activities);
        assert_eq!(other.len(), tree.unassigned.len());
        assert_eq!(grouping.other().map(|g| g.count()), Some(other.len()));
    }

    #[test]
    fn reset_keeps_catalog() {
        let mut filter = ContentFilter::new()
            .with_catalog(CategoryCatalog::projects())
            .with_category(OTHER_KEY);
        filter.reset();
        assert!(!filter.is_active());
        assert_eq!(filter.catalog, Some(CategoryCatalog::projects()));
    }
}
