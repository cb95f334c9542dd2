use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::records::{Category, Record};

pub const DEFAULT_PER_PAGE: usize = 9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    fn accepts(self, record: &Record) -> bool {
        match self {
            Self::All => true,
            Self::Active => record.status,
            Self::Inactive => !record.status,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum DateSort {
    #[default]
    Newest,
    Oldest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub query: String,
    pub status: StatusFilter,
    pub sort: DateSort,
    /// Inclusive `created_at` bounds, whole UTC days.
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: usize,
    pub per_page: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            status: StatusFilter::All,
            sort: DateSort::Newest,
            from: None,
            to: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items: Vec<T>,
}

fn created_at(record: &Record) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(record.created_at.trim())
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// With a bound set, records without a parseable `created_at` never match.
fn within_dates(record: &Record, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    if from.is_none() && to.is_none() {
        return true;
    }
    let Some(created) = created_at(record) else {
        return false;
    };
    let day = created.date_naive();
    from.is_none_or(|from| day >= from) && to.is_none_or(|to| day <= to)
}

/// Orders by `created_at`; unparseable timestamps go last, stable.
fn compare_created(a: &Record, b: &Record, sort: DateSort) -> Ordering {
    match (created_at(a), created_at(b)) {
        (Some(a), Some(b)) => match sort {
            DateSort::Newest => b.cmp(&a),
            DateSort::Oldest => a.cmp(&b),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn sort_by_created(records: &mut [(Option<Category>, Record)], sort: DateSort) {
    records.sort_by(|(_, a), (_, b)| compare_created(a, b, sort));
}

/// Filters, sorts and slices one page out of `records`.
pub fn apply(
    records: Vec<(Option<Category>, Record)>,
    query: &ListQuery,
) -> Page<(Option<Category>, Record)> {
    let needle = query.query.to_lowercase();
    let mut filtered: Vec<_> = records
        .into_iter()
        .filter(|(_, record)| needle.is_empty() || record.title.to_lowercase().contains(&needle))
        .filter(|(_, record)| query.status.accepts(record))
        .filter(|(_, record)| within_dates(record, query.from, query.to))
        .collect();
    sort_by_created(&mut filtered, query.sort);

    let per_page = query.per_page.max(1);
    let page = query.page.max(1);
    let total_items = filtered.len();
    let items = filtered
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    Page {
        page,
        total_pages: total_items.div_ceil(per_page),
        total_items,
        items,
    }
}

/// Concatenates several categories into one newest-first feed.
pub fn merge_feeds(
    feeds: impl IntoIterator<Item = (Category, Vec<Record>)>,
) -> Vec<(Option<Category>, Record)> {
    let mut merged: Vec<_> = feeds
        .into_iter()
        .flat_map(|(category, records)| records.into_iter().map(move |r| (Some(category), r)))
        .collect();
    sort_by_created(&mut merged, DateSort::Newest);
    merged
}

/// `YYYY-MM-DD` for a date input; today (UTC) when `ts` does not parse.
pub fn format_date_for_input(ts: &str) -> String {
    let ts = ts.trim();
    let date = DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .or_else(|_| ts.parse::<NaiveDate>())
        .unwrap_or_else(|_| Utc::now().date_naive());
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str, status: bool, created_at: &str) -> (Option<Category>, Record) {
        (
            None,
            Record {
                id: id.to_owned(),
                title: title.to_owned(),
                status,
                created_at: created_at.to_owned(),
                ..Record::default()
            },
        )
    }

    fn ids<T>(page: &[(T, Record)]) -> Vec<&str> {
        page.iter().map(|(_, r)| r.id.as_str()).collect()
    }

    fn sample() -> Vec<(Option<Category>, Record)> {
        vec![
            record("a", "Spring Festival", true, "2024-03-01T10:00:00Z"),
            record("b", "Research grant", false, "2024-05-01T10:00:00Z"),
            record("c", "festival recap", true, "2024-04-01T10:00:00+08:00"),
            record("d", "Broken date", true, "yesterday"),
        ]
    }

    #[test]
    fn default_query_sorts_newest_first_with_bad_dates_last() {
        let page = apply(sample(), &ListQuery::default());
        assert_eq!(ids(&page.items), vec!["b", "c", "a", "d"]);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_items, 4);
    }

    #[test]
    fn oldest_first_keeps_bad_dates_last() {
        let query = ListQuery {
            sort: DateSort::Oldest,
            ..ListQuery::default()
        };
        assert_eq!(ids(&apply(sample(), &query).items), vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn title_query_is_case_insensitive() {
        let query = ListQuery {
            query: "FESTIVAL".to_owned(),
            ..ListQuery::default()
        };
        assert_eq!(ids(&apply(sample(), &query).items), vec!["c", "a"]);
    }

    #[test]
    fn status_filter() {
        let inactive = ListQuery {
            status: StatusFilter::Inactive,
            ..ListQuery::default()
        };
        assert_eq!(ids(&apply(sample(), &inactive).items), vec!["b"]);

        let active = ListQuery {
            status: StatusFilter::Active,
            ..ListQuery::default()
        };
        assert_eq!(apply(sample(), &active).total_items, 3);
    }

    #[test]
    fn date_range_is_inclusive_by_day() {
        let query = ListQuery {
            from: NaiveDate::from_ymd_opt(2024, 3, 1),
            to: NaiveDate::from_ymd_opt(2024, 4, 1),
            ..ListQuery::default()
        };
        // "c" is 2024-04-01T10:00+08:00, i.e. 02:00 UTC on the last day.
        assert_eq!(ids(&apply(sample(), &query).items), vec!["c", "a"]);
    }

    #[test]
    fn open_ended_date_ranges() {
        let from_only = ListQuery {
            from: NaiveDate::from_ymd_opt(2024, 4, 2),
            ..ListQuery::default()
        };
        assert_eq!(ids(&apply(sample(), &from_only).items), vec!["b"]);

        let to_only = ListQuery {
            to: NaiveDate::from_ymd_opt(2024, 3, 31),
            ..ListQuery::default()
        };
        assert_eq!(ids(&apply(sample(), &to_only).items), vec!["a"]);
    }

    #[test]
    fn unparseable_dates_drop_out_once_a_bound_is_set() {
        let query = ListQuery {
            from: NaiveDate::from_ymd_opt(2000, 1, 1),
            ..ListQuery::default()
        };
        let page = apply(sample(), &query);
        assert_eq!(page.total_items, 3);
        assert!(!ids(&page.items).contains(&"d"));
    }

    #[test]
    fn pagination_slices_and_counts_pages() {
        let records: Vec<_> = (0..20)
            .map(|i| record(&i.to_string(), "t", true, &format!("2024-01-{:02}T00:00:00Z", i + 1)))
            .collect();

        let page = apply(
            records.clone(),
            &ListQuery {
                page: 3,
                ..ListQuery::default()
            },
        );
        assert_eq!(page.total_pages, 3);
        assert_eq!(ids(&page.items), vec!["1", "0"]);

        let beyond = apply(
            records,
            &ListQuery {
                page: 4,
                ..ListQuery::default()
            },
        );
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_pages, 3);
    }

    #[test]
    fn empty_list_has_zero_pages() {
        let page = apply(Vec::new(), &ListQuery::default());
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn merged_feed_tags_categories_newest_first() {
        let news = vec![sample().remove(0).1];
        let nature = vec![sample().remove(1).1];
        let merged = merge_feeds([(Category::News, news), (Category::Nature, nature)]);
        assert_eq!(ids(&merged), vec!["b", "a"]);
        assert_eq!(merged[0].0, Some(Category::Nature));
        assert_eq!(merged[1].0, Some(Category::News));
    }

    #[test]
    fn date_input_format() {
        assert_eq!(format_date_for_input("2024-05-17T23:30:00Z"), "2024-05-17");
        assert_eq!(format_date_for_input("2024-05-17T01:30:00+09:00"), "2024-05-16");
        assert_eq!(format_date_for_input("2024-05-17"), "2024-05-17");
        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(format_date_for_input("not a date"), today);
    }
}
