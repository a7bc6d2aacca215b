//! crates/storyteller_core/src/library.rs
//!
//! Search and ordering for the story library listing.

use crate::domain::Story;
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    Rating,
}

/// How the library list is filtered and ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryQuery {
    pub search: String,
    pub sort: SortKey,
    pub ascending: bool,
}

impl Default for LibraryQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: SortKey::Date,
            ascending: true,
        }
    }
}

impl LibraryQuery {
    /// Re-selecting the active key flips the direction; a new key starts ascending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.sort == key {
            self.ascending = !self.ascending;
        } else {
            self.sort = key;
            self.ascending = true;
        }
    }

    /// Case-insensitive title match. A blank search matches everything.
    pub fn matches(&self, story: &Story) -> bool {
        title_matches(&story.title, &self.search)
    }

    /// Filters and sorts. Stories with equal keys keep their incoming order.
    pub fn apply<'a>(&self, stories: &'a [Story]) -> Vec<&'a Story> {
        let mut selected: Vec<&Story> = stories.iter().filter(|s| self.matches(s)).collect();
        selected.sort_by(|a, b| {
            let ordering = self.compare(a, b);
            if self.ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
        selected
    }

    // Missing values order before present ones.
    fn compare(&self, a: &Story, b: &Story) -> Ordering {
        match self.sort {
            SortKey::Date => a.date_published.cmp(&b.date_published),
            SortKey::Rating => match (a.rating, b.rating) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

fn title_matches(title: &str, search: &str) -> bool {
    let needle = search.trim();
    needle.is_empty() || title.to_lowercase().contains(&needle.to_lowercase())
}

/// Keeps the entries of a listing whose `title` (or `name`) contains `search`,
/// ignoring case. A body that is not an array is returned unchanged.
pub fn filter_titled(listing: Value, search: &str) -> Value {
    match listing {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|item| {
                    let title = item
                        .get("title")
                        .or_else(|| item.get("name"))
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    title_matches(title, search)
                })
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResourceId;
    use chrono::{TimeZone, Utc};

    fn story(id: i64, title: &str, day: Option<u32>, rating: Option<f64>) -> Story {
        Story {
            id: ResourceId::Number(id),
            title: title.to_string(),
            description: String::new(),
            pages: Vec::new(),
            date_published: day.map(|d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()),
            rating,
        }
    }

    fn ids(stories: &[&Story]) -> Vec<String> {
        stories.iter().map(|s| s.id.to_string()).collect()
    }

    #[test]
    fn search_is_case_insensitive_on_title() {
        let stories = vec![
            story(1, "The Magic Forest", None, None),
            story(2, "The Friendly Dragon", None, None),
            story(3, "Forest Friends", None, None),
        ];
        let query = LibraryQuery {
            search: "  forest ".to_string(),
            ..LibraryQuery::default()
        };

        assert_eq!(ids(&query.apply(&stories)), vec!["1", "3"]);
        assert_eq!(LibraryQuery::default().apply(&stories).len(), 3);
    }

    #[test]
    fn sorts_by_date_in_both_directions() {
        let stories = vec![
            story(1, "b", Some(20), None),
            story(2, "a", Some(5), None),
            story(3, "c", None, None),
        ];
        let mut query = LibraryQuery::default();
        assert_eq!(ids(&query.apply(&stories)), vec!["3", "2", "1"]);

        query.toggle(SortKey::Date);
        assert!(!query.ascending);
        assert_eq!(ids(&query.apply(&stories)), vec!["1", "2", "3"]);
    }

    #[test]
    fn switching_key_resets_to_ascending() {
        let stories = vec![
            story(1, "a", None, Some(4.0)),
            story(2, "b", None, Some(2.5)),
            story(3, "c", None, Some(4.0)),
        ];
        let mut query = LibraryQuery {
            ascending: false,
            ..LibraryQuery::default()
        };

        query.toggle(SortKey::Rating);
        assert_eq!(query.sort, SortKey::Rating);
        assert!(query.ascending);
        assert_eq!(ids(&query.apply(&stories)), vec!["2", "1", "3"]);
    }

    #[test]
    fn equal_keys_keep_input_order_when_descending() {
        let stories = vec![
            story(1, "a", Some(3), None),
            story(2, "b", Some(3), None),
            story(3, "c", Some(9), None),
        ];
        let query = LibraryQuery {
            ascending: false,
            ..LibraryQuery::default()
        };

        assert_eq!(ids(&query.apply(&stories)), vec!["3", "1", "2"]);
    }

    #[test]
    fn playlist_listing_filters_by_title_or_name() {
        let listing = serde_json::json!([
            { "id": 1, "title": "Bedtime Stories" },
            { "id": 2, "name": "BEDTIME favourites" },
            { "id": 3, "title": "Road Trip" },
            { "id": 4 }
        ]);

        let ids: Vec<Value> = filter_titled(listing.clone(), " bedtime ")
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].clone())
            .collect();
        assert_eq!(ids, vec![serde_json::json!(1), serde_json::json!(2)]);

        assert_eq!(filter_titled(listing.clone(), ""), listing);
        assert_eq!(filter_titled(Value::from("plain"), "x"), Value::from("plain"));
    }
}
