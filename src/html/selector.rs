//! Selector parser
//!
//! Translates one segment of a path such as `div.box a img[src|alt]` into a
//! [`SelectorTarget`]. Segments never contain spaces; the reader splits the
//! path before calling in here.
//!
//! Grammar of a segment:
//! - an optional leading bare word, the tag name
//! - `#id`, the last one wins
//! - `.class`, repeatable, all listed classes are required
//! - `[attr|attr2]`, repeatable, names of the attributes to return

use super::tag::{self, Attributes};

/// What a single path segment matches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorTarget {
    pub tag_name: Option<String>,
    pub is_single_tag: bool,
    pub id: Option<String>,
    pub class_list: Vec<String>,
    /// When present, the scanner returns these attributes instead of tag records
    pub wanted_attributes: Option<Vec<String>>,
    /// `tag#id.class1.class2`, kept for diagnostics
    pub combined_key: Option<String>,
}

impl SelectorTarget {
    pub fn parse(segment: &str) -> Self {
        SelectorParser::new(segment).parse()
    }

    /// A segment without a single recognizable token; it matches nothing
    pub fn is_empty(&self) -> bool {
        self.tag_name.is_none()
            && self.id.is_none()
            && self.class_list.is_empty()
            && self.wanted_attributes.is_none()
    }

    /// Tag names compare case-insensitively; no tag name accepts every tag
    pub fn accepts_name(&self, name: &str) -> bool {
        self.tag_name
            .as_deref()
            .map_or(true, |wanted| wanted.eq_ignore_ascii_case(name))
    }

    /// Exact `id`, and every listed class present in the `class` attribute
    pub fn matches(&self, attributes: &Attributes) -> bool {
        if let Some(id) = &self.id {
            if attributes.get("id") != Some(id) {
                return false;
            }
        }

        if self.class_list.is_empty() {
            return true;
        }

        let Some(class_attr) = attributes.get("class") else {
            return false;
        };
        self.class_list
            .iter()
            .all(|class| class_attr.split_whitespace().any(|c| c == class))
    }

    /// Keeps only the requested attributes, in request order
    pub fn pick(&self, attributes: &Attributes) -> Attributes {
        self.wanted_attributes
            .iter()
            .flatten()
            .filter_map(|name| {
                attributes
                    .get(name)
                    .map(|value| (name.clone(), value.clone()))
            })
            .collect()
    }
}

struct SelectorParser {
    input: Vec<char>,
    position: usize,
    current_char: Option<char>,
}

impl SelectorParser {
    fn new(segment: &str) -> Self {
        let input: Vec<char> = segment.trim().chars().collect();
        let current_char = input.first().copied();
        Self {
            input,
            position: 0,
            current_char,
        }
    }

    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.input.get(self.position).copied();
    }

    fn is_word_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':')
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.current_char {
            if !Self::is_word_char(c) {
                break;
            }
            word.push(c);
            self.advance();
        }
        word
    }

    fn read_bracket_group(&mut self) -> Vec<String> {
        let mut raw = String::new();
        // Skip the opening bracket
        self.advance();

        while let Some(c) = self.current_char {
            self.advance();
            if c == ']' {
                break;
            }
            raw.push(c);
        }

        raw.split('|')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn parse(mut self) -> SelectorTarget {
        let mut target = SelectorTarget::default();

        if self.current_char.is_some_and(|c| c.is_ascii_alphabetic()) {
            let name = self.read_word();
            target.is_single_tag = tag::is_single(&name);
            target.tag_name = Some(name);
        }

        while let Some(c) = self.current_char {
            match c {
                '#' => {
                    self.advance();
                    let id = self.read_word();
                    if !id.is_empty() {
                        target.id = Some(id);
                    }
                }
                '.' => {
                    self.advance();
                    let class = self.read_word();
                    if !class.is_empty() {
                        target.class_list.push(class);
                    }
                }
                '[' => {
                    let names = self.read_bracket_group();
                    target
                        .wanted_attributes
                        .get_or_insert_with(Vec::new)
                        .extend(names);
                }
                // Anything else carries no meaning in a segment
                _ => self.advance(),
            }
        }

        target.combined_key = combined_key(&target);
        target
    }
}

fn combined_key(target: &SelectorTarget) -> Option<String> {
    let mut key = target.tag_name.clone().unwrap_or_default();
    if let Some(id) = &target.id {
        key.push('#');
        key.push_str(id);
    }
    for class in &target.class_list {
        key.push('.');
        key.push_str(class);
    }
    (!key.is_empty()).then_some(key)
}
