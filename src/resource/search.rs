//! Search query and filter criteria
//!
//! Searches are plain GETs on a collection with `search=<term>` and one
//! repeated parameter per filter value.

/// Free-text search term
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(term: &str) -> Self {
        Self(term.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for SearchQuery {
    fn from(term: &str) -> Self {
        Self::new(term)
    }
}

/// Filter criteria: filter name to acceptable values, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    entries: Vec<(String, Vec<String>)>,
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`SearchFilter::add`] for a whole value list
    pub fn with(mut self, name: &str, values: &[&str]) -> Self {
        for value in values {
            self.add(name, value);
        }
        self
    }

    /// Append a value to `name`, creating the filter on first use
    pub fn add(&mut self, name: &str, value: &str) {
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some((_, values)) => values.push(value.to_string()),
            None => self
                .entries
                .push((name.to_string(), vec![value.to_string()])),
        }
    }

    /// Parse a `name=value` pair as typed on the command line
    pub fn add_pair(&mut self, pair: &str) -> Option<()> {
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.add(name, value.trim());
        Some(())
    }

    /// True when no filter carries a value
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, values)| values.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for SearchFilter {
    fn from_iter<I: IntoIterator<Item = (K, Vec<String>)>>(iter: I) -> Self {
        let mut filter = SearchFilter::new();
        for (name, values) in iter {
            let name = name.into();
            for value in values {
                filter.add(&name, &value);
            }
        }
        filter
    }
}

/// Build the query string for a search, without the leading `?`.
/// Returns an empty string when there is nothing to search on.
pub fn build_query(query: Option<&SearchQuery>, filter: Option<&SearchFilter>) -> String {
    let mut query_parts: Vec<String> = Vec::new();

    if let Some(query) = query.filter(|q| !q.is_empty()) {
        query_parts.push(format!("search={}", urlencoding::encode(query.as_str())));
    }

    if let Some(filter) = filter {
        for (name, values) in filter.iter() {
            for value in values {
                query_parts.push(format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode(value)
                ));
            }
        }
    }

    query_parts.join("&")
}

/// Collection path with the search query appended, if any
pub fn search_path(
    prefix: &str,
    query: Option<&SearchQuery>,
    filter: Option<&SearchFilter>,
) -> String {
    let query = build_query(query, filter);
    if query.is_empty() {
        prefix.to_string()
    } else {
        format!("{}?{}", prefix, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_search_is_bare_prefix() {
        assert_eq!(search_path("/annotation", None, None), "/annotation");
        assert_eq!(
            search_path("/annotation", Some(&SearchQuery::new("")), Some(&SearchFilter::new())),
            "/annotation"
        );
    }

    #[test]
    fn test_search_term_is_encoded() {
        assert_eq!(
            search_path("/annotation", Some(&"deploy web".into()), None),
            "/annotation?search=deploy%20web"
        );
    }

    #[test]
    fn test_filters_repeat_in_insertion_order() {
        let filter = SearchFilter::new()
            .with("f_category", &["deploy", "release"])
            .with("f_title_wildcard", &["*api*"]);

        assert_eq!(
            build_query(Some(&"db".into()), Some(&filter)),
            "search=db&f_category=deploy&f_category=release&f_title_wildcard=%2Aapi%2A"
        );
    }

    #[test]
    fn test_add_appends_to_existing_filter() {
        let mut filter = SearchFilter::new();
        filter.add("f_type", "a");
        filter.add("f_item", "b");
        filter.add("f_type", "c");

        let collected: Vec<(&str, Vec<&str>)> = filter
            .iter()
            .map(|(k, v)| (k, v.iter().map(String::as_str).collect()))
            .collect();
        assert_eq!(collected, vec![("f_type", vec!["a", "c"]), ("f_item", vec!["b"])]);
    }

    #[test]
    fn test_add_pair() {
        let mut filter = SearchFilter::new();
        assert!(filter.add_pair("email=ops@example.com").is_some());
        assert!(filter.add_pair("no-equals").is_none());
        assert!(filter.add_pair("=value").is_none());
        assert_eq!(build_query(None, Some(&filter)), "email=ops%40example.com");
    }

    #[test]
    fn test_from_iterator() {
        let filter: SearchFilter = vec![("f_tags", vec!["env:prod".to_string()])]
            .into_iter()
            .collect();
        assert!(!filter.is_empty());
        assert_eq!(build_query(None, Some(&filter)), "f_tags=env%3Aprod");
    }
}
