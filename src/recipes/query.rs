use crate::recipes::dto::ListParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    NewestFirst,
    MostLiked,
}

/// Listing criteria assembled from the raw query string. Building the
/// filter is pure; `repo::list` turns it into SQL.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeFilter {
    pub categories: Vec<String>,
    pub search: Option<String>,
    pub ingredients: Vec<String>,
    pub sort: SortOrder,
    pub page: i64,
    pub limit: i64,
}

fn csv_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl RecipeFilter {
    pub fn from_params(p: &ListParams) -> Self {
        let categories = p.category.as_deref().map(csv_list).unwrap_or_default();
        let ingredients = p.ingredients.as_deref().map(csv_list).unwrap_or_default();
        let search = p
            .search
            .clone()
            .filter(|s| !s.trim().is_empty());
        let sort = if p.popular.as_deref() == Some("true") {
            SortOrder::MostLiked
        } else {
            SortOrder::NewestFirst
        };
        // page and limit pass through as given, no clamping
        Self {
            categories,
            search,
            ingredients,
            sort,
            page: p.page,
            limit: p.limit,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// Ceiling of total / limit. A non-positive limit yields zero
    /// pages rather than dividing by zero.
    pub fn total_pages(total: i64, limit: i64) -> i64 {
        if limit <= 0 {
            return 0;
        }
        (total + limit - 1) / limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ListParams {
        ListParams {
            category: None,
            search: None,
            ingredients: None,
            popular: None,
            page: 1,
            limit: 20,
        }
    }

    #[test]
    fn defaults_to_newest_first_with_no_filters() {
        let filter = RecipeFilter::from_params(&params());
        assert!(filter.categories.is_empty());
        assert!(filter.ingredients.is_empty());
        assert_eq!(filter.search, None);
        assert_eq!(filter.sort, SortOrder::NewestFirst);
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn category_csv_and_search_combine() {
        let mut p = params();
        p.category = Some("a,b".into());
        p.search = Some("soup".into());
        let filter = RecipeFilter::from_params(&p);
        assert_eq!(filter.categories, vec!["a", "b"]);
        assert_eq!(filter.search.as_deref(), Some("soup"));
        assert_eq!(filter.sort, SortOrder::NewestFirst);
    }

    #[test]
    fn popular_flag_switches_sort() {
        let mut p = params();
        p.popular = Some("true".into());
        assert_eq!(RecipeFilter::from_params(&p).sort, SortOrder::MostLiked);

        p.popular = Some("yes".into());
        assert_eq!(RecipeFilter::from_params(&p).sort, SortOrder::NewestFirst);
    }

    #[test]
    fn csv_skips_blank_entries() {
        let mut p = params();
        p.ingredients = Some(" egg, ,rice,".into());
        let filter = RecipeFilter::from_params(&p);
        assert_eq!(filter.ingredients, vec!["egg", "rice"]);
    }

    #[test]
    fn blank_search_is_dropped() {
        let mut p = params();
        p.search = Some("   ".into());
        assert_eq!(RecipeFilter::from_params(&p).search, None);
    }

    #[test]
    fn page_and_limit_pass_through_unclamped() {
        let mut p = params();
        p.page = -3;
        p.limit = 1000;
        let filter = RecipeFilter::from_params(&p);
        assert_eq!(filter.page, -3);
        assert_eq!(filter.limit, 1000);
        assert_eq!(filter.offset(), -4000);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(RecipeFilter::total_pages(0, 20), 0);
        assert_eq!(RecipeFilter::total_pages(1, 20), 1);
        assert_eq!(RecipeFilter::total_pages(20, 20), 1);
        assert_eq!(RecipeFilter::total_pages(21, 20), 2);
    }

    #[test]
    fn total_pages_with_zero_limit_is_zero() {
        assert_eq!(RecipeFilter::total_pages(50, 0), 0);
    }
}
