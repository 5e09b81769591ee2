//! Summary counters for dashboards and section headers

use std::collections::HashMap;
use std::hash::Hash;

use crate::models::{ContactMessage, ContactStatus, ContentRecord, Language};

/// Visibility and featured counts for one collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentStats {
    pub total: usize,
    pub visible: usize,
    pub hidden: usize,
    pub featured: usize,
}

impl ContentStats {
    pub fn from_records<'a, T, I>(records: I) -> Self
    where
        T: ContentRecord,
        I: IntoIterator<Item = &'a T>,
    {
        records.into_iter().fold(Self::default(), |mut stats, record| {
            stats.total += 1;
            if record.is_visible() {
                stats.visible += 1;
            } else {
                stats.hidden += 1;
            }
            if record.is_featured() {
                stats.featured += 1;
            }
            stats
        })
    }

    /// e.g. "3 publiés / 1 brouillon"
    pub fn summary(&self, lang: Language) -> String {
        match lang {
            Language::Fr => format!(
                "{} publié{} / {} brouillon{}",
                self.visible,
                plural(self.visible),
                self.hidden,
                plural(self.hidden)
            ),
            Language::En => format!(
                "{} published / {} draft{}",
                self.visible,
                self.hidden,
                plural(self.hidden)
            ),
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n > 1 {
        "s"
    } else {
        ""
    }
}

/// Contact inbox counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InboxStats {
    pub total: usize,
    pub new: usize,
    pub read: usize,
    pub handled: usize,
}

impl InboxStats {
    pub fn from_messages<'a, I>(messages: I) -> Self
    where
        I: IntoIterator<Item = &'a ContactMessage>,
    {
        messages.into_iter().fold(Self::default(), |mut stats, message| {
            stats.total += 1;
            match message.status {
                ContactStatus::New => stats.new += 1,
                ContactStatus::Read => stats.read += 1,
                ContactStatus::Handled => stats.handled += 1,
            }
            stats
        })
    }

    /// Messages still waiting for a reply
    pub fn pending(&self) -> usize {
        self.new + self.read
    }
}

/// Count records per derived key, in first-encounter order
pub fn count_by<'a, T, K, I, F>(records: I, key_of: F) -> Vec<(K, usize)>
where
    T: 'a,
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&'a T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();
    for record in records {
        let key = key_of(record);
        match index.get(&key) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }
    counts
}
