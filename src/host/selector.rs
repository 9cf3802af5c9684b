//! Simple selector matching for site policy rules and composer patterns
//!
//! Supports the subset real rule files use: a tag name, `#id`, `.class`,
//! `[attr]` / `[attr=value]`, and compounds of those (`div.editor`,
//! `textarea[data-chat]`). No combinators: "element or ancestor matches" is a
//! separate walk at the call site, not part of the selector itself.

use serde::Deserialize;

use super::document::Document;
use super::node::NodeId;

/// A parsed compound selector
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Selector {
    /// Parse a compound selector like `div.msg-editor[contenteditable]`
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err("empty selector".to_string());
        }
        if input.contains(char::is_whitespace) || input.contains('>') {
            return Err(format!("combinators not supported: {:?}", input));
        }

        let mut selector = Selector::default();
        let mut rest = input;

        // Leading tag name
        let tag_end = rest
            .find(|c| c == '.' || c == '#' || c == '[')
            .unwrap_or(rest.len());
        if tag_end > 0 {
            selector.tag = Some(rest[..tag_end].to_ascii_lowercase());
            rest = &rest[tag_end..];
        }

        while !rest.is_empty() {
            let (head, tail) = rest.split_at(1);
            match head {
                "." => {
                    let end = tail
                        .find(|c| c == '.' || c == '#' || c == '[')
                        .unwrap_or(tail.len());
                    if end == 0 {
                        return Err(format!("empty class in selector: {:?}", input));
                    }
                    selector.classes.push(tail[..end].to_string());
                    rest = &tail[end..];
                }
                "#" => {
                    let end = tail
                        .find(|c| c == '.' || c == '#' || c == '[')
                        .unwrap_or(tail.len());
                    if end == 0 {
                        return Err(format!("empty id in selector: {:?}", input));
                    }
                    selector.id = Some(tail[..end].to_string());
                    rest = &tail[end..];
                }
                "[" => {
                    let end = tail
                        .find(']')
                        .ok_or_else(|| format!("unclosed attribute in selector: {:?}", input))?;
                    let body = &tail[..end];
                    match body.split_once('=') {
                        Some((name, value)) => selector.attrs.push((
                            name.trim().to_string(),
                            Some(value.trim().trim_matches('"').to_string()),
                        )),
                        None => selector.attrs.push((body.trim().to_string(), None)),
                    }
                    rest = &tail[end + 1..];
                }
                other => return Err(format!("unexpected {:?} in selector: {:?}", other, input)),
            }
        }

        Ok(selector)
    }

    /// Does `id` itself match this selector?
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some(node) = doc.node(id) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if !node.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(want) = &self.id {
            if node.attr("id") != Some(want.as_str()) {
                return false;
            }
        }
        for class in &self.classes {
            if !node.has_class(class) {
                return false;
            }
        }
        for (name, value) in &self.attrs {
            match (node.attr(name), value) {
                (None, _) => return false,
                (Some(_), None) => {}
                (Some(actual), Some(want)) => {
                    if actual != want {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Does `id` or any of its ancestors match?
    pub fn matches_with_ancestors(&self, doc: &Document, id: NodeId) -> bool {
        doc.self_and_ancestors(id).any(|n| self.matches(doc, n))
    }
}

impl TryFrom<String> for Selector {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Selector::parse(&value)
    }
}

impl std::str::FromStr for Selector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_div() -> (Document, NodeId) {
        let mut doc = Document::new("example.com");
        let div = doc.create_element("div");
        doc.node_mut(div)
            .unwrap()
            .attrs
            .insert("class".to_string(), "editor rich".to_string());
        doc.node_mut(div)
            .unwrap()
            .attrs
            .insert("id".to_string(), "composer".to_string());
        doc.node_mut(div)
            .unwrap()
            .attrs
            .insert("role".to_string(), "textbox".to_string());
        doc.append(doc.root(), div);
        (doc, div)
    }

    #[test]
    fn parses_and_matches_compound() {
        let (doc, div) = doc_with_div();
        assert!(Selector::parse("div").unwrap().matches(&doc, div));
        assert!(Selector::parse(".editor").unwrap().matches(&doc, div));
        assert!(Selector::parse("#composer").unwrap().matches(&doc, div));
        assert!(Selector::parse("div.editor.rich").unwrap().matches(&doc, div));
        assert!(Selector::parse("[role=textbox]").unwrap().matches(&doc, div));
        assert!(Selector::parse("[role]").unwrap().matches(&doc, div));
        assert!(!Selector::parse("span.editor").unwrap().matches(&doc, div));
        assert!(!Selector::parse(".absent").unwrap().matches(&doc, div));
        assert!(!Selector::parse("[role=button]").unwrap().matches(&doc, div));
    }

    #[test]
    fn ancestor_matching_walks_up() {
        let (mut doc, div) = doc_with_div();
        let leaf = doc.create_text("hi");
        doc.append(div, leaf);
        let sel = Selector::parse(".editor").unwrap();
        assert!(!sel.matches(&doc, leaf));
        assert!(sel.matches_with_ancestors(&doc, leaf));
    }

    #[test]
    fn rejects_combinators_and_empty() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("div p").is_err());
        assert!(Selector::parse("div > p").is_err());
        assert!(Selector::parse("div.").is_err());
        assert!(Selector::parse("[open").is_err());
    }
}
