//! Page cursors over listing and search results.

use std::ops::{Index, IndexMut};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::filters::Filters;
use crate::resource::Resource;

/// The listing call a cursor replays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListVerb {
    /// [`Resource::all`].
    All,
    /// [`Resource::search`] with the original search string.
    Search { query: String },
}

/// One page of results plus what it takes to fetch the neighbours.
///
/// Navigating is a fresh request: [`Pagination::next_page`] and
/// [`Pagination::prev_page`] replay the original call with the page number
/// moved by one and every other filter unchanged. Nothing is cached between
/// pages.
///
/// # Example
///
/// ```no_run
/// use zammad::{Filters, ZammadClient};
///
/// # async fn example(client: ZammadClient) -> zammad::Result<()> {
/// let users = client.user();
/// let mut page = users.all(1, Some(&Filters::new().with("per_page", 50))).await?;
/// loop {
///     for user in &page {
///         println!("{}", user["login"]);
///     }
///     if page.is_last_page() {
///         break;
///     }
///     page = page.next_page().await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Pagination<'r> {
    items: Vec<Value>,
    resource: &'r Resource,
    verb: ListVerb,
    filters: Filters,
    page: i64,
}

impl<'r> Pagination<'r> {
    /// Capture a page. `filters` is copied without its page number.
    pub(crate) fn new(
        items: Vec<Value>,
        resource: &'r Resource,
        verb: ListVerb,
        filters: &Filters,
        page: i64,
    ) -> Self {
        Self {
            items,
            resource,
            verb,
            filters: filters.without_page(),
            page,
        }
    }

    /// Page number this cursor points at.
    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn verb(&self) -> &ListVerb {
        &self.verb
    }

    /// Filters replayed on navigation (never contains `page`).
    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn resource(&self) -> &'r Resource {
        self.resource
    }

    /// Whether this page is shorter than the resource's page size.
    ///
    /// A final page that is exactly full is not detected; the following
    /// `next_page` returns an empty page instead.
    pub fn is_last_page(&self) -> bool {
        self.items.len() < self.resource.per_page() as usize
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Deserialize the items of this page into typed records.
    pub fn deserialize_items<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.items
            .iter()
            .map(|item| Ok(serde_json::from_value(item.clone())?))
            .collect()
    }

    /// Fetch the following page.
    ///
    /// Advances this cursor's page counter before issuing the request.
    pub async fn next_page(&mut self) -> Result<Pagination<'r>> {
        self.page += 1;
        self.fetch().await
    }

    /// Fetch the preceding page.
    ///
    /// Page numbers are not clamped: on page 1 this requests page 0 and
    /// returns whatever the server makes of it.
    pub async fn prev_page(&mut self) -> Result<Pagination<'r>> {
        self.page -= 1;
        self.fetch().await
    }

    async fn fetch(&self) -> Result<Pagination<'r>> {
        tracing::debug!(
            resource = self.resource.kind().name(),
            page = self.page,
            "fetching page"
        );
        match &self.verb {
            ListVerb::All => self.resource.all(self.page, Some(&self.filters)).await,
            ListVerb::Search { query } => {
                self.resource
                    .search(query, self.page, Some(&self.filters))
                    .await
            }
        }
    }
}

impl Index<usize> for Pagination<'_> {
    type Output = Value;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl IndexMut<usize> for Pagination<'_> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.items[index]
    }
}

impl<'a> IntoIterator for &'a Pagination<'_> {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for Pagination<'_> {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceKind;
    use crate::ZammadClient;
    use serde_json::json;

    fn resource() -> Resource {
        let client = ZammadClient::builder("https://zammad.example.com")
            .http_token("t")
            .build()
            .unwrap();
        client.resource(ResourceKind::User).with_per_page(2)
    }

    #[test]
    fn test_short_page_is_last() {
        let users = resource();
        let page = Pagination::new(vec![json!(1)], &users, ListVerb::All, &Filters::new(), 1);
        assert!(page.is_last_page());
    }

    #[test]
    fn test_full_page_is_not_last() {
        let users = resource();
        let page = Pagination::new(
            vec![json!(1), json!(2)],
            &users,
            ListVerb::All,
            &Filters::new(),
            1,
        );
        assert!(!page.is_last_page());
    }

    #[test]
    fn test_construction_strips_page() {
        let users = resource();
        let filters = Filters::new()
            .with("page", 2)
            .with("per_page", 2)
            .with("filters", json!({"page": 9}));
        let page = Pagination::new(vec![], &users, ListVerb::All, &filters, 2);

        assert!(!page.filters().contains_key("page"));
        assert_eq!(page.filters().get("filters"), Some(&json!({})));
        assert_eq!(page.filters().get("per_page"), Some(&json!(2)));
        assert_eq!(page.page(), 2);
    }

    #[test]
    fn test_sequence_access() {
        let users = resource();
        let mut page = Pagination::new(
            vec![json!({"id": 1}), json!({"id": 2})],
            &users,
            ListVerb::All,
            &Filters::new(),
            1,
        );

        assert_eq!(page.len(), 2);
        assert_eq!(page[1]["id"], 2);

        page[0] = json!({"id": 10});
        assert_eq!(page.get(0), Some(&json!({"id": 10})));

        let first: Vec<_> = page.iter().cloned().collect();
        let second: Vec<_> = (&page).into_iter().cloned().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_deserialize_items() {
        #[derive(serde::Deserialize)]
        struct User {
            id: u64,
        }

        let users = resource();
        let page = Pagination::new(
            vec![json!({"id": 1, "login": "a"}), json!({"id": 2})],
            &users,
            ListVerb::All,
            &Filters::new(),
            1,
        );
        let typed: Vec<User> = page.deserialize_items().unwrap();
        assert_eq!(typed.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 2]);
    }
}
