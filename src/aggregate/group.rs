//! Single-pass grouping of records by category

use std::borrow::Cow;
use std::collections::HashMap;

use super::category::{usable_key, CategoryCatalog, CategoryInfo};
use crate::models::{Activity, ActivityCategory, ActivitySubcategory, ContentRecord, Language};

/// Records sharing one category
#[derive(Debug, Clone)]
pub struct Group<'a, T> {
    pub category: CategoryInfo,
    pub records: Vec<&'a T>,
}

impl<'a, T> Group<'a, T> {
    /// Live record count
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn display_title(&self, lang: Language) -> &str {
        self.category.display_title(lang)
    }
}

/// Ordered category groups; every input record sits in exactly one group
#[derive(Debug, Clone)]
pub struct Grouping<'a, T> {
    groups: Vec<Group<'a, T>>,
}

impl<'a, T> Grouping<'a, T> {
    pub fn groups(&self) -> &[Group<'a, T>] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<Group<'a, T>> {
        self.groups
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group<'a, T>> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group by category key, compared case-insensitively
    pub fn get(&self, key: &str) -> Option<&Group<'a, T>> {
        let key = key.trim().to_lowercase();
        self.groups
            .iter()
            .find(|group| group.category.key.to_lowercase() == key)
    }

    pub fn other(&self) -> Option<&Group<'a, T>> {
        self.groups.iter().find(|group| group.category.is_other())
    }

    /// Number of grouped records
    pub fn total(&self) -> usize {
        self.groups.iter().map(Group::count).sum()
    }

    /// `(key, count)` pairs in group order
    pub fn counts(&self) -> Vec<(&str, usize)> {
        self.groups
            .iter()
            .map(|group| (group.category.key.as_str(), group.count()))
            .collect()
    }
}

/// Partition `records` by `key_of`.
///
/// Without a catalog, groups appear in first-encounter order and are titled
/// after their key. With a catalog, its entries come first and in catalog
/// order (empty ones included) and keys it does not know go to "Other".
/// Records without a usable key always go to "Other", which is appended last
/// and only when non-empty.
pub fn group_by<'a, T, I, F>(
    records: I,
    key_of: F,
    catalog: Option<&CategoryCatalog>,
) -> Grouping<'a, T>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&'a T) -> Option<Cow<'a, str>>,
{
    group_located(records, |record| (key_of(record), None), catalog)
}

/// [`group_by`] using each record's own category key.
///
/// With a catalog, a record's known subcategory decides its group, the same
/// way [`ContentFilter`](super::ContentFilter) selects it.
pub fn group_records<'a, T, I>(records: I, catalog: Option<&CategoryCatalog>) -> Grouping<'a, T>
where
    T: ContentRecord,
    I: IntoIterator<Item = &'a T>,
{
    group_located(
        records,
        |record: &'a T| (record.category_key(), record.subcategory_key()),
        catalog,
    )
}

fn group_located<'a, T, I, F>(
    records: I,
    keys_of: F,
    catalog: Option<&CategoryCatalog>,
) -> Grouping<'a, T>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&'a T) -> (Option<Cow<'a, str>>, Option<Cow<'a, str>>),
{
    let mut groups: Vec<Group<'a, T>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut other: Vec<&'a T> = Vec::new();

    if let Some(catalog) = catalog {
        groups.extend(catalog.entries().iter().map(|info| Group {
            category: info.clone(),
            records: Vec::new(),
        }));
    }

    for record in records {
        let (category, subcategory) = keys_of(record);

        let slot = match catalog {
            Some(catalog) => catalog.locate_position(category.as_deref(), subcategory.as_deref()),
            None => category.as_deref().and_then(usable_key).map(|key| {
                let next = groups.len();
                let slot = *index.entry(key.to_lowercase()).or_insert(next);
                if slot == next {
                    groups.push(Group {
                        category: CategoryInfo::untitled(key),
                        records: Vec::new(),
                    });
                }
                slot
            }),
        };

        match slot {
            Some(slot) => groups[slot].records.push(record),
            None => other.push(record),
        }
    }

    if !other.is_empty() {
        groups.push(Group {
            category: CategoryInfo::other(),
            records: other,
        });
    }

    Grouping { groups }
}

/// Activities attached to one subcategory
#[derive(Debug, Clone)]
pub struct SubcategoryGroup<'a> {
    pub subcategory: &'a ActivitySubcategory,
    pub activities: Vec<&'a Activity>,
}

impl SubcategoryGroup<'_> {
    pub fn count(&self) -> usize {
        self.activities.len()
    }
}

/// One top-level activity category with its live counts
#[derive(Debug, Clone)]
pub struct CategoryTree<'a> {
    pub category: &'a ActivityCategory,
    /// Activities attached to the category but to none of its subcategories
    pub direct: Vec<&'a Activity>,
    pub subcategories: Vec<SubcategoryGroup<'a>>,
}

impl CategoryTree<'_> {
    pub fn direct_count(&self) -> usize {
        self.direct.len()
    }

    pub fn subcategory_count(&self) -> usize {
        self.subcategories.iter().map(SubcategoryGroup::count).sum()
    }

    /// Count displayed next to the category
    pub fn total_count(&self) -> usize {
        self.direct_count() + self.subcategory_count()
    }
}

#[derive(Debug, Clone)]
pub struct ActivityTree<'a> {
    pub categories: Vec<CategoryTree<'a>>,
    /// Activities pointing at no known category or subcategory
    pub unassigned: Vec<&'a Activity>,
}

impl<'a> ActivityTree<'a> {
    pub fn get(&self, category_id: i64) -> Option<&CategoryTree<'a>> {
        self.categories.iter().find(|tree| tree.category.id == category_id)
    }

    pub fn total(&self) -> usize {
        self.categories.iter().map(CategoryTree::total_count).sum::<usize>() + self.unassigned.len()
    }
}

/// Attach activities to the category tree in one pass.
///
/// A known `subcategory_id` wins over `category_id`, so an activity is
/// counted under the subcategory's parent even if its own category id
/// disagrees. Counts reported by the backend are ignored.
pub fn group_activities<'a, I>(
    categories: &'a [ActivityCategory],
    activities: I,
) -> ActivityTree<'a>
where
    I: IntoIterator<Item = &'a Activity>,
{
    let mut ordered: Vec<&'a ActivityCategory> = categories.iter().collect();
    ordered.sort_by_key(|category| category.order);

    let mut by_category: HashMap<i64, usize> = HashMap::new();
    let mut by_subcategory: HashMap<i64, (usize, usize)> = HashMap::new();
    let mut trees: Vec<CategoryTree<'a>> = Vec::with_capacity(ordered.len());

    for (ci, category) in ordered.into_iter().enumerate() {
        by_category.entry(category.id).or_insert(ci);
        for (si, sub) in category.subcategories.iter().enumerate() {
            by_subcategory.entry(sub.id).or_insert((ci, si));
        }
        trees.push(CategoryTree {
            category,
            direct: Vec::new(),
            subcategories: category
                .subcategories
                .iter()
                .map(|subcategory| SubcategoryGroup {
                    subcategory,
                    activities: Vec::new(),
                })
                .collect(),
        });
    }

    let mut unassigned = Vec::new();
    for activity in activities {
        if let Some(&(ci, si)) = activity.subcategory_id.and_then(|id| by_subcategory.get(&id)) {
            trees[ci].subcategories[si].activities.push(activity);
        } else if let Some(&ci) = activity.category_id.and_then(|id| by_category.get(&id)) {
            trees[ci].direct.push(activity);
        } else {
            unassigned.push(activity);
        }
    }

    ActivityTree {
        categories: trees,
        unassigned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bilingual, Project, Record};
    use serde_json::json;

    fn project(id: i64, category: Option<&str>) -> Project {
        Project::from_wire(
            serde_json::from_value(json!({
                "id": id,
                "titleFr": format!("Projet {}", id),
                "category": category,
            }))
            .unwrap(),
        )
        .unwrap()
    }

    fn activity(id: i64, category_id: Option<i64>, subcategory_id: Option<i64>) -> Activity {
        Activity {
            id,
            title: Bilingual::new(format!("Activité {}", id), None),
            description: Bilingual::default(),
            icon: None,
            category_id,
            subcategory_id,
            order: 0,
            featured: false,
            is_active: true,
            created_at: None,
        }
    }

    fn category(id: i64, order: i32, subcategory_ids: &[i64]) -> ActivityCategory {
        ActivityCategory {
            id,
            slug: None,
            title: Bilingual::new(format!("Catégorie {}", id), None),
            color: None,
            icon: None,
            order,
            subcategories: subcategory_ids
                .iter()
                .map(|&sid| ActivitySubcategory {
                    id: sid,
                    category_id: id,
                    title: Bilingual::new(format!("Sous-catégorie {}", sid), None),
                    activities: Vec::new(),
                    reported_count: Some(99),
                })
                .collect(),
            activities: Vec::new(),
            reported_count: Some(99),
        }
    }

    #[test]
    fn first_encounter_order_without_catalog() {
        let projects = vec![
            project(1, Some("Irrigation")),
            project(2, Some("AEP")),
            project(3, Some("irrigation ")),
            project(4, None),
        ];
        let grouping = group_records(&projects, None);

        assert_eq!(
            grouping.counts(),
            vec![("Irrigation", 2), ("AEP", 1), (super::super::OTHER_KEY, 1)]
        );
        assert_eq!(grouping.total(), projects.len());
    }

    #[test]
    fn other_bucket_only_when_needed() {
        let projects = vec![project(1, Some("AEP")), project(2, Some("AEP"))];
        let grouping = group_records(&projects, None);
        assert!(grouping.other().is_none());
        assert_eq!(grouping.len(), 1);

        let blank = vec![project(3, Some("   "))];
        let grouping = group_records(&blank, None);
        assert_eq!(grouping.other().map(Group::count), Some(1));
    }

    #[test]
    fn literal_other_key_joins_the_single_other_group() {
        let projects = vec![
            project(1, Some("__other__")),
            project(2, None),
            project(3, Some("AEP")),
        ];
        let grouping = group_records(&projects, None);

        assert_eq!(grouping.len(), 2);
        assert_eq!(grouping.iter().filter(|g| g.category.is_other()).count(), 1);
        let other = grouping.other().unwrap();
        assert_eq!(other.count(), 2);
        assert_eq!(other.display_title(Language::Fr), "Autre");
    }

    #[test]
    fn catalog_order_comes_first_and_unknown_keys_fall_to_other() {
        let catalog = CategoryCatalog::projects();
        let projects = vec![
            project(1, Some("Environnement")),
            project(2, Some("aep")),
            project(3, Some("Dessalement")),
        ];
        let grouping = group_records(&projects, Some(&catalog));

        assert_eq!(grouping.len(), catalog.len() + 1);
        assert_eq!(grouping.groups()[0].category.key, "AEP");
        assert_eq!(grouping.groups()[0].count(), 1);
        assert_eq!(grouping.get("Assainissement").map(Group::count), Some(0));
        assert_eq!(grouping.other().map(|g| g.records[0].id), Some(3));
        assert_eq!(grouping.total(), projects.len());
    }

    #[test]
    fn group_counts_always_sum_to_record_count() {
        let keys = [Some("AEP"), None, Some("Barrages"), Some("x"), Some(""), Some("aep"), None];
        let projects: Vec<Project> = keys
            .iter()
            .enumerate()
            .map(|(i, key)| project(i as i64 + 1, *key))
            .collect();
        let catalog = CategoryCatalog::projects();

        for n in 0..=projects.len() {
            let slice = &projects[..n];
            assert_eq!(group_records(slice, None).total(), n);
            assert_eq!(group_records(slice, Some(&catalog)).total(), n);
        }
    }

    #[test]
    fn activity_tree_counts_direct_and_subcategory_records() {
        let categories = vec![category(2, 1, &[20]), category(1, 0, &[10, 11])];
        let activities = vec![
            activity(1, Some(1), None),
            activity(2, Some(1), Some(10)),
            activity(3, Some(1), Some(11)),
            activity(4, Some(2), Some(11)),
            activity(5, Some(2), None),
            activity(6, Some(9), None),
            activity(7, None, Some(99)),
        ];

        let tree = group_activities(&categories, &activities);

        assert_eq!(tree.categories[0].category.id, 1);
        let first = tree.get(1).unwrap();
        assert_eq!(first.direct_count(), 1);
        assert_eq!(first.subcategory_count(), 3);
        assert_eq!(first.total_count(), 4);

        let second = tree.get(2).unwrap();
        assert_eq!(second.direct_count(), 1);
        assert_eq!(second.subcategory_count(), 0);

        assert_eq!(tree.unassigned.len(), 2);
        assert_eq!(tree.total(), activities.len());
    }
}
