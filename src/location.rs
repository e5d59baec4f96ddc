//! The viewer's address: a path plus query string such as
//! `/pokemon/25?page=3&perPage=24`.
//!
//! The list position lives in the `page` and `perPage` query parameters.
//! Reading goes through `PageState::derive_initial`, writing through
//! `with_page_state`, so whatever the list view writes parses back to the
//! same state.

use std::fmt;

use url::form_urlencoded;
use url::Url;

use crate::error::{DexError, Result};
use crate::pagination::{PageState, DEFAULT_PAGE, DEFAULT_PER_PAGE};

pub const PAGE_PARAM: &str = "page";
pub const PER_PAGE_PARAM: &str = "perPage";

/// Locations are resolved against this base so relative input
/// (`/pokemon/25`, `?page=2`) and full web URLs both parse.
const BASE_URL: &str = "dex://catalog/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    List,
    Detail(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    route: Route,
    query: Vec<(String, String)>,
}

impl Location {
    /// The bare list view, `/`
    pub fn list() -> Self {
        Self {
            route: Route::List,
            query: Vec::new(),
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || DexError::Location(input.to_string());

        let base = Url::parse(BASE_URL).map_err(|_| invalid())?;
        let url = base.join(input.trim()).map_err(|_| invalid())?;

        let segments: Vec<&str> = url
            .path()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        let route = match segments.as_slice() {
            [] => Route::List,
            ["pokemon", id] => match id.parse::<u32>() {
                Ok(id) if id > 0 => Route::Detail(id),
                _ => return Err(invalid()),
            },
            _ => return Err(invalid()),
        };

        Ok(Self {
            route,
            query: url.query_pairs().into_owned().collect(),
        })
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn path(&self) -> String {
        match self.route {
            Route::List => "/".to_string(),
            Route::Detail(id) => format!("/pokemon/{}", id),
        }
    }

    /// First value of a query parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a query parameter. An existing key keeps its position and any
    /// duplicates are dropped; a new key is appended.
    pub fn set_param(&mut self, key: &str, value: &str) {
        match self.query.iter().position(|(k, _)| k == key) {
            Some(pos) => {
                self.query[pos].1 = value.to_string();
                let mut index = 0;
                self.query.retain(|(k, _)| {
                    let keep = index <= pos || k != key;
                    index += 1;
                    keep
                });
            }
            None => self.query.push((key.to_string(), value.to_string())),
        }
    }

    /// List position encoded in this location, defaulted and validated.
    pub fn page_state(&self, allowed: &[u32]) -> PageState {
        PageState::derive_initial(self.param(PAGE_PARAM), self.param(PER_PAGE_PARAM), allowed)
    }

    /// Copy of this location with `page`/`perPage` rewritten to `state`.
    /// All other query parameters are left as they are.
    pub fn with_page_state(&self, state: PageState) -> Self {
        let mut location = self.clone();
        location.set_param(PAGE_PARAM, &state.page.to_string());
        location.set_param(PER_PAGE_PARAM, &state.page_size.to_string());
        location
    }

    /// Raw `page`/`perPage` values to carry into links, defaulted when
    /// absent or empty but otherwise passed through untouched.
    fn carried(&self) -> (String, String) {
        let page = self
            .param(PAGE_PARAM)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_PAGE.to_string());
        let per_page = self
            .param(PER_PAGE_PARAM)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_PER_PAGE.to_string());
        (page, per_page)
    }

    fn linked(&self, route: Route) -> Self {
        let (page, per_page) = self.carried();
        Self {
            route,
            query: vec![
                (PAGE_PARAM.to_string(), page),
                (PER_PAGE_PARAM.to_string(), per_page),
            ],
        }
    }

    /// Link to a detail record that remembers the list position
    pub fn detail_link(&self, id: u32) -> Self {
        self.linked(Route::Detail(id))
    }

    /// "Back to Pokédex" link restoring the list position
    pub fn back_link(&self) -> Self {
        self.linked(Route::List)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::list()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())?;
        if !self.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.query.iter())
                .finish();
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{total_pages, PER_PAGE_OPTIONS};

    fn loc(input: &str) -> Location {
        Location::parse(input).unwrap()
    }

    #[test]
    fn parse_list_and_detail_routes() {
        assert_eq!(loc("/").route(), Route::List);
        assert_eq!(loc("").route(), Route::List);
        assert_eq!(loc("?page=2").route(), Route::List);
        assert_eq!(loc("/pokemon/25").route(), Route::Detail(25));
        assert_eq!(loc("/pokemon/25/?page=2").route(), Route::Detail(25));
    }

    #[test]
    fn parse_full_web_url() {
        let location = loc("https://pokedex.example.com/pokemon/6?page=3&perPage=24");
        assert_eq!(location.route(), Route::Detail(6));
        assert_eq!(location.to_string(), "/pokemon/6?page=3&perPage=24");
    }

    #[test]
    fn parse_rejects_unknown_paths() {
        assert!(Location::parse("/pokemon/pikachu").is_err());
        assert!(Location::parse("/pokemon/0").is_err());
        assert!(Location::parse("/berries").is_err());
    }

    #[test]
    fn page_state_from_query() {
        let state = loc("/?page=abc&perPage=24").page_state(&PER_PAGE_OPTIONS);
        assert_eq!(
            state,
            PageState {
                page: 1,
                page_size: 24
            }
        );
    }

    #[test]
    fn with_page_state_keeps_other_params() {
        let location = loc("/?sort=name&page=2&perPage=12&theme=dark");
        let synced = location.with_page_state(PageState {
            page: 7,
            page_size: 48,
        });
        assert_eq!(synced.to_string(), "/?sort=name&page=7&perPage=48&theme=dark");
    }

    #[test]
    fn with_page_state_appends_missing_params() {
        let synced = loc("/?sort=name").with_page_state(PageState::default());
        assert_eq!(synced.to_string(), "/?sort=name&page=1&perPage=12");
    }

    #[test]
    fn set_param_collapses_duplicates() {
        let mut location = loc("/?page=1&x=y&page=9");
        location.set_param("page", "4");
        assert_eq!(location.to_string(), "/?page=4&x=y");
    }

    #[test]
    fn round_trip_after_transitions() {
        let start = loc("/?page=5&perPage=12&q=pika");
        let total = total_pages(1281, 12);

        let states = {
            let s0 = start.page_state(&PER_PAGE_OPTIONS);
            let s1 = s0.next(total);
            let s2 = s1.go_to(999, total);
            let s3 = s2.change_page_size(96);
            let s4 = s3.last(total_pages(1281, 96));
            let s5 = s4.previous(total_pages(1281, 96));
            vec![s0, s1, s2, s3, s4, s5]
        };

        let mut location = start;
        for state in states {
            location = location.with_page_state(state);
            let reparsed = Location::parse(&location.to_string()).unwrap();
            assert_eq!(reparsed.page_state(&PER_PAGE_OPTIONS), state);
            assert_eq!(reparsed.param("q"), Some("pika"));
        }
    }

    #[test]
    fn detail_link_carries_raw_position() {
        let location = loc("/?page=3&perPage=24");
        assert_eq!(
            location.detail_link(25).to_string(),
            "/pokemon/25?page=3&perPage=24"
        );
    }

    #[test]
    fn links_default_missing_position() {
        let location = loc("/pokemon/25");
        assert_eq!(location.back_link().to_string(), "/?page=1&perPage=12");
        assert_eq!(
            location.detail_link(10194).to_string(),
            "/pokemon/10194?page=1&perPage=12"
        );
    }

    #[test]
    fn back_link_restores_list_position() {
        let list = loc("/?page=5&perPage=48");
        let detail = list.detail_link(133);
        let back = detail.back_link();
        assert_eq!(back.route(), Route::List);
        assert_eq!(
            back.page_state(&PER_PAGE_OPTIONS),
            list.page_state(&PER_PAGE_OPTIONS)
        );
    }

    #[test]
    fn query_values_are_encoded() {
        let mut location = Location::list();
        location.set_param("q", "mr mime&co");
        let text = location.to_string();
        assert_eq!(text, "/?q=mr+mime%26co");
        assert_eq!(loc(&text).param("q"), Some("mr mime&co"));
    }
}
