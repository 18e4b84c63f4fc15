//! Tag scanner
//!
//! One forward pass over the buffer with a single tag pattern that matches
//! both opening and closing tags. Every open paired tag seen by the pattern
//! gets a frame on a stack; frames of tags that satisfied the target carry
//! the index of their record so the closing tag can complete it.

use super::{
    selector::SelectorTarget,
    tag::{self, Attributes, TagMatch, TAG_RE},
};
use serde::Serialize;
use std::ops::Range;
use tracing::{instrument, trace};

/// Outcome of a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Found {
    Tag(TagMatch),
    Tags(Vec<TagMatch>),
    /// Requested attributes of the first matching tag
    Attributes(Attributes),
    /// Requested attributes of every matching tag
    AttributeList(Vec<Attributes>),
}

impl Found {
    pub fn is_list(&self) -> bool {
        matches!(self, Self::Tags(_) | Self::AttributeList(_))
    }

    /// Number of items for lists, one for single values
    pub fn len(&self) -> usize {
        match self {
            Self::Tags(tags) => tags.len(),
            Self::AttributeList(list) => list.len(),
            Self::Tag(_) | Self::Attributes(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element `index` of a list; single values are not indexable
    pub fn get(&self, index: usize) -> Option<Self> {
        match self {
            Self::Tags(tags) => tags.get(index).cloned().map(Self::Tag),
            Self::AttributeList(list) => list.get(index).cloned().map(Self::Attributes),
            Self::Tag(_) | Self::Attributes(_) => None,
        }
    }

    /// The listed elements of a list, in the order given; out of range
    /// indices are skipped and single values are returned unchanged
    pub fn select(&self, indices: &[usize]) -> Self {
        match self {
            Self::Tags(tags) => Self::Tags(
                indices
                    .iter()
                    .filter_map(|&i| tags.get(i).cloned())
                    .collect(),
            ),
            Self::AttributeList(list) => Self::AttributeList(
                indices
                    .iter()
                    .filter_map(|&i| list.get(i).cloned())
                    .collect(),
            ),
            Self::Tag(_) | Self::Attributes(_) => self.clone(),
        }
    }

    pub fn as_tag(&self) -> Option<&TagMatch> {
        match self {
            Self::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn as_tags(&self) -> Option<&[TagMatch]> {
        match self {
            Self::Tags(tags) => Some(tags),
            _ => None,
        }
    }

    pub fn as_attributes(&self) -> Option<&Attributes> {
        match self {
            Self::Attributes(attrs) => Some(attrs),
            _ => None,
        }
    }

    pub fn as_attribute_list(&self) -> Option<&[Attributes]> {
        match self {
            Self::AttributeList(list) => Some(list),
            _ => None,
        }
    }

    /// Range a nested search is confined to; only a located tag narrows it
    pub fn scope(&self) -> Option<Range<usize>> {
        self.as_tag().map(|tag| tag.positions.scope())
    }
}

struct OpenFrame<'t> {
    name: &'t str,
    /// Index into the record list when this tag satisfied the target
    record: Option<usize>,
}

/// Scans a region of a buffer for one selector segment
pub struct Scanner<'a> {
    target: &'a SelectorTarget,
    html: &'a str,
    region: Range<usize>,
}

impl<'a> Scanner<'a> {
    pub fn new(target: &'a SelectorTarget, html: &'a str) -> Self {
        Self {
            target,
            html,
            region: 0..html.len(),
        }
    }

    /// Confines the scan to `region`; out of bounds ends are clamped
    pub fn within(mut self, region: Range<usize>) -> Self {
        let end = region.end.min(self.html.len());
        self.region = region.start.min(end)..end;
        self
    }

    /// First match in document order, or the outermost of nested matches
    pub fn first(&self) -> Option<Found> {
        self.scan(true)
    }

    /// Every match in document order; an empty list when nothing matched
    pub fn all(&self) -> Found {
        self.scan(false).unwrap_or_else(|| self.empty())
    }

    /// The empty list of the kind `all` returns
    pub fn empty(&self) -> Found {
        if self.target.wanted_attributes.is_some() {
            Found::AttributeList(Vec::new())
        } else {
            Found::Tags(Vec::new())
        }
    }

    fn scan(&self, first_only: bool) -> Option<Found> {
        if self.target.is_empty() {
            trace!("empty selector target matches nothing");
            return (!first_only).then(|| self.empty());
        }

        let text = self
            .html
            .get(self.region.clone())
            .unwrap_or_default();
        let offset = self.region.start;

        let mut records: Vec<TagMatch> = Vec::new();
        let mut picked: Vec<Attributes> = Vec::new();
        let mut stack: Vec<OpenFrame<'_>> = Vec::new();
        let mut open_records = 0usize;

        for caps in TAG_RE.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let name = caps.get(2).map_or("", |m| m.as_str());
            if !self.target.accepts_name(name) {
                continue;
            }

            let span = offset + whole.start()..offset + whole.end();
            let is_closing = caps.get(1).is_some_and(|m| !m.is_empty());
            let is_single = tag::is_single(name);

            if is_closing {
                if is_single {
                    trace!(name, "ignoring closing tag of a void element");
                    continue;
                }

                let Some(position) = stack
                    .iter()
                    .rposition(|frame| frame.name.eq_ignore_ascii_case(name))
                else {
                    trace!(name, at = span.start, "skipping unbalanced closing tag");
                    continue;
                };

                // Tags left open inside this one end where its closing tag starts
                for frame in stack.drain(position + 1..) {
                    if let Some(record) = frame.record.and_then(|i| records.get_mut(i)) {
                        trace!(name = %record.name, "closing tag implicitly");
                        record.close(span.start..span.start);
                        open_records = open_records.saturating_sub(1);
                    }
                }

                let Some(frame) = stack.pop() else { continue };
                let Some(index) = frame.record else {
                    if first_only && open_records == 0 && !records.is_empty() {
                        return records.into_iter().next().map(Found::Tag);
                    }
                    continue;
                };

                open_records = open_records.saturating_sub(1);
                if let Some(record) = records.get_mut(index) {
                    record.close(span);
                }

                // The outermost record was pushed first
                if first_only && open_records == 0 {
                    return records.into_iter().next().map(Found::Tag);
                }
                continue;
            }

            let raw_attributes = caps.get(3).map_or("", |m| m.as_str());
            let attributes = tag::parse_attributes(raw_attributes);
            // `<path/>` closes itself even though `path` is not a void element
            let is_single = is_single || raw_attributes.trim_end().ends_with('/');

            if !self.target.matches(&attributes) {
                trace!(name, at = span.start, "tag rejected by selector");
                if !is_single {
                    stack.push(OpenFrame { name, record: None });
                }
                continue;
            }

            if self.target.wanted_attributes.is_some() {
                let attributes = self.target.pick(&attributes);
                if first_only {
                    return Some(Found::Attributes(attributes));
                }
                picked.push(attributes);
                if !is_single {
                    stack.push(OpenFrame { name, record: None });
                }
                continue;
            }

            if is_single {
                let record = TagMatch::single(name, attributes, span);
                if first_only && (self.target.is_single_tag || open_records == 0) {
                    return Some(Found::Tag(record));
                }
                records.push(record);
                continue;
            }

            records.push(TagMatch::opened(name, attributes, span));
            stack.push(OpenFrame {
                name,
                record: Some(records.len() - 1),
            });
            open_records += 1;
        }

        // Tags still open at the end of the region extend up to its end
        for frame in stack {
            if let Some(record) = frame.record.and_then(|i| records.get_mut(i)) {
                trace!(name = %record.name, "closing tag implicitly at end of region");
                record.close(self.region.end..self.region.end);
            }
        }

        if first_only {
            return records.into_iter().next().map(Found::Tag);
        }

        if self.target.wanted_attributes.is_some() {
            Some(Found::AttributeList(picked))
        } else {
            Some(Found::Tags(records))
        }
    }
}

/// Searches `html` for one selector segment
///
/// With a `scope` holding a located tag, only the content of that tag (or
/// the tag itself for void elements) is scanned. With `first_only` the
/// result is `None` when nothing matched; otherwise it is always a list,
/// possibly empty.
#[instrument(level = "debug", skip(html, scope), fields(len = html.len()))]
pub fn search(
    selector: &str,
    html: &str,
    scope: Option<&Found>,
    first_only: bool,
) -> Option<Found> {
    let target = SelectorTarget::parse(selector);
    let mut scanner = Scanner::new(&target, html);
    if let Some(region) = scope.and_then(Found::scope) {
        scanner = scanner.within(region);
    }

    if first_only {
        scanner.first()
    } else {
        Some(scanner.all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice<'a>(html: &'a str, range: Range<usize>) -> &'a str {
        html.get(range).unwrap_or_default()
    }

    #[test]
    fn test_find_first_paired_tag() {
        let html = r#"<table><tr><td data-item="1">text1</td><td>text2</td></tr></table>"#;
        let found = search("td", html, None, true);
        let tag = found.as_ref().and_then(Found::as_tag).cloned();
        let tag = tag.unwrap_or_else(|| panic!("no td found"));

        assert_eq!(tag.attribute("data-item"), Some("1"));
        assert_eq!(tag.positions.to_vec().len(), 4);
        assert_eq!(slice(html, tag.positions.scope()), "text1");
        assert_eq!(
            slice(html, tag.positions.outer()),
            r#"<td data-item="1">text1</td>"#
        );
    }

    #[test]
    fn test_find_all_in_document_order() {
        let html = "<ul><li>a</li><li>b</li><li>c</li></ul>";
        let found = search("li", html, None, false);
        let tags = found.as_ref().and_then(Found::as_tags).unwrap_or_default();
        let texts: Vec<&str> = tags
            .iter()
            .filter_map(|t| t.positions.content())
            .map(|r| slice(html, r))
            .collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_nested_same_name_outermost_wins() {
        let html = "<div id=\"outer\"><div id=\"inner\">x</div></div>";
        let found = search("div", html, None, true);
        let tag = found.as_ref().and_then(Found::as_tag);
        assert_eq!(tag.and_then(|t| t.attribute("id")), Some("outer"));
        assert_eq!(tag.map(|t| t.positions.outer()), Some(0..html.len()));
    }

    #[test]
    fn test_nested_all_matches_close_correctly() {
        let html = "<div><div>x</div>y</div>";
        let found = search("div", html, None, false);
        let tags = found.as_ref().and_then(Found::as_tags).unwrap_or_default();
        assert_eq!(tags.len(), 2);
        let contents: Vec<&str> = tags
            .iter()
            .map(|t| slice(html, t.positions.scope()))
            .collect();
        assert_eq!(contents, vec!["<div>x</div>y", "x"]);
    }

    #[test]
    fn test_id_selector_without_tag_name() {
        let html = r#"<p id="a">1</p><span id="b">2</span><i id="b">3</i>"#;
        let found = search("#b", html, None, true);
        let tag = found.as_ref().and_then(Found::as_tag);
        assert_eq!(tag.map(|t| t.name.as_str()), Some("span"));
    }

    #[test]
    fn test_void_tag_inside_open_match_is_deferred() {
        let html = r#"<div class="x"><img class="x" src="a.png"></div>"#;
        let found = search(".x", html, None, true);
        let tag = found.as_ref().and_then(Found::as_tag);
        assert_eq!(tag.map(|t| t.name.as_str()), Some("div"));

        let found = search("img.x", html, None, true);
        let tag = found.as_ref().and_then(Found::as_tag);
        assert_eq!(tag.map(|t| t.positions.to_vec().len()), Some(2));
    }

    #[test]
    fn test_wanted_attributes() {
        let html = r#"<img src="a.png" alt="a"><img src="b.png">"#;
        let first = search("img[src|alt]", html, None, true);
        let attrs = first.as_ref().and_then(Found::as_attributes);
        assert_eq!(attrs.map(|a| a.len()), Some(2));

        let all = search("img[src]", html, None, false);
        let list = all.as_ref().and_then(Found::as_attribute_list).unwrap_or_default();
        let srcs: Vec<&str> = list
            .iter()
            .filter_map(|a| a.get("src").map(String::as_str))
            .collect();
        assert_eq!(srcs, vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_no_match() {
        let html = "<p>text</p>";
        assert_eq!(search("table", html, None, true), None);
        assert_eq!(
            search("table", html, None, false),
            Some(Found::Tags(Vec::new()))
        );
        assert_eq!(
            search("table[src]", html, None, false),
            Some(Found::AttributeList(Vec::new()))
        );
    }

    #[test]
    fn test_empty_target_matches_nothing() {
        let html = "<p>text</p>";
        assert_eq!(search("!!", html, None, true), None);
        assert_eq!(search("", html, None, false), Some(Found::Tags(Vec::new())));
    }

    #[test]
    fn test_stray_closing_tags_are_skipped() {
        let html = "</p></p><p>ok</p>";
        let found = search("p", html, None, true);
        let tag = found.as_ref().and_then(Found::as_tag);
        assert_eq!(tag.map(|t| slice(html, t.positions.scope())), Some("ok"));
    }

    #[test]
    fn test_scoped_search() {
        let html = "<a>1</a><div><a>2</a></div>";
        let div = search("div", html, None, true);
        let found = search("a", html, div.as_ref(), true);
        let tag = found.as_ref().and_then(Found::as_tag);
        assert_eq!(tag.map(|t| slice(html, t.positions.scope())), Some("2"));
    }

    #[test]
    fn test_unclosed_tag_extends_to_region_end() {
        let html = "<p>one<p>two";
        let found = search("p", html, None, false);
        let tags = found.as_ref().and_then(Found::as_tags).unwrap_or_default();
        assert_eq!(tags.len(), 2);
        assert!(tags.iter().all(|t| t.positions.outer().end == html.len()));
    }

    #[test]
    fn test_self_closing_tag_does_not_consume_a_closing_tag() {
        let html = r#"<span class="icon"><svg><path d="M0"/></svg></span><b>after</b>"#;
        let found = search(".icon", html, None, true);
        let tag = found.as_ref().and_then(Found::as_tag);
        assert_eq!(
            tag.map(|t| slice(html, t.positions.outer())),
            Some(r#"<span class="icon"><svg><path d="M0"/></svg></span>"#)
        );

        let found = search("path", html, None, true);
        let tag = found.as_ref().and_then(Found::as_tag);
        assert_eq!(tag.map(|t| t.positions.to_vec().len()), Some(2));
    }

    #[test]
    fn test_closing_tag_closes_unclosed_inner_tags() {
        let html = r#"<div id="x"><p>para</div><span>after</span>"#;
        let found = search("#x", html, None, true);
        let tag = found.as_ref().and_then(Found::as_tag);
        assert_eq!(
            tag.map(|t| slice(html, t.positions.outer())),
            Some(r#"<div id="x"><p>para</div>"#)
        );

        let found = search("p", html, None, false);
        let tags = found.as_ref().and_then(Found::as_tags).unwrap_or_default();
        assert_eq!(tags.len(), 1);
        assert!(tags.iter().all(|t| t.positions.outer().end == html.len()));
    }

    #[test]
    fn test_inner_unclosed_match_ends_at_outer_closing_tag() {
        let html = r#"<div><p class="x">para</div>tail"#;
        let found = search(".x", html, None, false);
        let tags = found.as_ref().and_then(Found::as_tags).unwrap_or_default();
        let contents: Vec<&str> = tags
            .iter()
            .map(|t| slice(html, t.positions.scope()))
            .collect();
        assert_eq!(contents, vec!["para"]);
    }

    #[test]
    fn test_tag_name_prefix_is_not_a_match() {
        let html = "<abbr>x</abbr><a>y</a>";
        let found = search("a", html, None, false);
        assert_eq!(found.map(|f| f.len()), Some(1));
    }

    #[test]
    fn test_found_select_and_get() {
        let html = "<b>1</b><b>2</b><b>3</b>";
        let all = search("b", html, None, false).unwrap_or_else(|| Found::Tags(Vec::new()));
        assert!(all.is_list());
        assert_eq!(all.select(&[2, 0, 9]).len(), 2);
        assert!(all.get(1).is_some_and(|f| f.as_tag().is_some()));
        assert_eq!(all.get(5), None);
    }
}
