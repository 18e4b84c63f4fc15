//! Result cursor over an HTML buffer
//!
//! The reader holds the buffer, the result of the latest navigation step and
//! a map of named pins. Every navigation call returns the reader itself so
//! steps chain:
//!
//! ```
//! use tagreader::HtmlReader;
//!
//! let html = r#"<table><tr class="row"><td>a</td></tr><tr class="row"><td>b</td></tr></table>"#;
//! let mut reader = HtmlReader::from(html);
//!
//! let second = reader
//!     .find_all("tr")
//!     .pin("rows")
//!     .item(1)
//!     .find_one("td")
//!     .inner_data(None);
//! assert_eq!(second, "b");
//! ```

use super::{
    scanner::{search, Found, Scanner},
    selector::SelectorTarget,
};
use indexmap::IndexMap;
use std::fmt;
use tracing::{debug, instrument};

pub struct HtmlReader<'a> {
    html: &'a str,
    storage: IndexMap<String, Found>,
    results: Option<Found>,
    last_saved_pin: Option<String>,
    last_given_pin: Option<String>,
    last_given_item: Option<usize>,
}

impl<'a> From<&'a str> for HtmlReader<'a> {
    fn from(html: &'a str) -> Self {
        Self::new(html)
    }
}

impl<'a> HtmlReader<'a> {
    pub fn new(html: &'a str) -> Self {
        Self {
            html,
            storage: IndexMap::new(),
            results: None,
            last_saved_pin: None,
            last_given_pin: None,
            last_given_item: None,
        }
    }

    pub fn html(&self) -> &'a str {
        self.html
    }

    /// Result of the latest navigation step
    pub fn results(&self) -> Option<&Found> {
        self.results.as_ref()
    }

    pub fn pinned(&self, name: &str) -> Option<&Found> {
        self.storage.get(name)
    }

    pub fn pin_names(&self) -> impl Iterator<Item = &str> {
        self.storage.keys().map(String::as_str)
    }

    pub fn last_saved_pin(&self) -> Option<&str> {
        self.last_saved_pin.as_deref()
    }

    pub fn last_given_pin(&self) -> Option<&str> {
        self.last_given_pin.as_deref()
    }

    pub fn last_given_item(&self) -> Option<usize> {
        self.last_given_item
    }

    /// Searches for the first tag on a path such as `div#box1 a img`
    ///
    /// The search starts inside whatever the reader currently points at.
    pub fn find_one(&mut self, path: &str) -> &mut Self {
        self.find(path, true)
    }

    /// Searches for every tag on a path such as `div.box a img[src|width]`
    ///
    /// Every segment but the last narrows the scope to its first match.
    pub fn find_all(&mut self, path: &str) -> &mut Self {
        self.find(path, false)
    }

    #[instrument(level = "debug", skip(self))]
    fn find(&mut self, path: &str, first_only: bool) -> &mut Self {
        let mut scope = self.current(None);
        self.clear_markers();

        let mut segments: Vec<&str> = path.split(' ').filter(|s| !s.is_empty()).collect();
        let last = segments.pop().unwrap_or_default();

        for segment in segments {
            scope = search(segment, self.html, scope.as_ref(), true);
            if scope.as_ref().and_then(Found::scope).is_none() {
                debug!(segment, "path segment matched nothing");
                let target = SelectorTarget::parse(last);
                self.results = (!first_only).then(|| Scanner::new(&target, self.html).empty());
                return self;
            }
        }

        self.results = search(last, self.html, scope.as_ref(), first_only);
        debug!(found = self.results.as_ref().map_or(0, Found::len), "search finished");
        self
    }

    /// Stores the current result under `name`
    pub fn pin(&mut self, name: &str) -> &mut Self {
        let value = self.results.clone();
        self.store(name, value)
    }

    /// Stores element `index` of the current result under `name`
    pub fn pin_at(&mut self, name: &str, index: usize) -> &mut Self {
        let value = self.results.as_ref().and_then(|results| results.get(index));
        self.store(name, value)
    }

    /// Stores the listed elements of the current result under `name`, or the
    /// whole result when `indices` is empty
    pub fn pin_items(&mut self, name: &str, indices: &[usize]) -> &mut Self {
        let value = if indices.is_empty() {
            self.results.clone()
        } else {
            self.results.as_ref().map(|results| results.select(indices))
        };
        self.store(name, value)
    }

    fn store(&mut self, name: &str, value: Option<Found>) -> &mut Self {
        match value {
            Some(value) => {
                self.storage.insert(name.to_string(), value);
            }
            None => {
                // A pin of nothing reads back as nothing
                self.storage.shift_remove(name);
            }
        }
        self.last_saved_pin = Some(name.to_string());
        self
    }

    pub fn unpin(&mut self, name: &str) -> &mut Self {
        let Some(removed) = self.storage.shift_remove(name) else {
            return self;
        };

        if self.last_saved_pin.as_deref() == Some(name) {
            self.last_saved_pin = None;
        }

        if self.last_given_pin.as_deref() == Some(name) {
            self.last_given_pin = None;
            if removed.is_list() {
                self.last_given_item = None;
            }
        }

        self
    }

    /// Makes `name` the pin the following steps read from
    pub fn from_pin(&mut self, name: &str) -> &mut Self {
        self.last_given_pin = Some(name.to_string());

        if self.last_saved_pin.as_deref() != Some(name) || self.results.is_none() {
            self.results = self.current(None);
        }

        self
    }

    /// Narrows the current data to element `index`; single values stay as
    /// they are
    pub fn item(&mut self, index: usize) -> &mut Self {
        self.last_given_item = Some(index);
        self.results = self.current(Some(index));
        self
    }

    /// Buffer text between the opening and the closing tag of the current
    /// result; empty when it is not a located paired tag
    pub fn inner_data(&mut self, from: Option<&str>) -> &'a str {
        if let Some(name) = from {
            self.from_pin(name);
        }

        let range = self
            .current(None)
            .as_ref()
            .and_then(Found::as_tag)
            .and_then(|tag| tag.positions.content());

        range
            .and_then(|range| self.html.get(range))
            .unwrap_or_default()
    }

    /// Buffer text of the current result including its tags
    pub fn outer_data(&mut self, from: Option<&str>) -> &'a str {
        if let Some(name) = from {
            self.from_pin(name);
        }

        let range = self
            .current(None)
            .as_ref()
            .and_then(Found::as_tag)
            .map(|tag| tag.positions.outer());

        range
            .and_then(|range| self.html.get(range))
            .unwrap_or_default()
    }

    /// A copy of the pin `from` (or of the active pin), falling back to the
    /// current result
    pub fn data(&self, from: Option<&str>) -> Option<Found> {
        let entry = from.or_else(|| self.active_pin());

        entry
            .and_then(|name| self.storage.get(name))
            .or(self.results.as_ref())
            .cloned()
    }

    pub fn clear_markers(&mut self) -> &mut Self {
        self.last_saved_pin = None;
        self.last_given_pin = None;
        self.last_given_item = None;
        self
    }

    /// Drops every pin and result; the buffer stays
    pub fn flush_results(&mut self) -> &mut Self {
        self.storage.clear();
        self.results = None;
        self.clear_markers()
    }

    /// Logs the reader state, everything but the buffer
    pub fn dump(&mut self) -> &mut Self {
        debug!(reader = ?self, "reader state");
        self
    }

    fn active_pin(&self) -> Option<&str> {
        self.last_given_pin
            .as_deref()
            .or(self.last_saved_pin.as_deref())
    }

    /// What the next step works on: the recalled pin, else the saved pin,
    /// else the raw result; lists resolve to the marked item
    fn current(&self, index: Option<usize>) -> Option<Found> {
        let source = match self.active_pin() {
            Some(name) => self.storage.get(name),
            None => self.results.as_ref(),
        }?;

        if source.is_list() {
            index
                .or(self.last_given_item)
                .and_then(|index| source.get(index))
        } else {
            Some(source.clone())
        }
    }
}

impl fmt::Debug for HtmlReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlReader")
            .field("storage", &self.storage)
            .field("results", &self.results)
            .field("last_saved_pin", &self.last_saved_pin)
            .field("last_given_pin", &self.last_given_pin)
            .field("last_given_item", &self.last_given_item)
            .finish_non_exhaustive()
    }
}
