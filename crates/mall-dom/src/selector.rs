//! CSS selector subset
//!
//! Enough of Selectors Level 3 for page scripts: type, universal, id, class
//! and attribute selectors (`=`, `^=`, `$=`, `*=`, `~=`), compounded and
//! chained with descendant or child combinators, in comma-separated groups.

use crate::{DomError, DomTree, ElementData, NodeId, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    StartsWith { key: String, value: String },
    EndsWith { key: String, value: String },
    Contains { key: String, value: String },
    Includes { key: String, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Part {
    compound: Compound,
    /// Relation to the part on the left
    combinator: Option<Combinator>,
}

/// A parsed, comma-separated selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    groups: Vec<Vec<Part>>,
}

impl SelectorList {
    pub fn parse(selector: &str) -> Result<Self> {
        let groups = split_top_level(selector, ',')
            .into_iter()
            .map(|group| parse_chain(&group, selector))
            .collect::<Result<Vec<_>>>()?;
        if groups.is_empty() {
            return Err(DomError::UnsupportedSelector(selector.into()));
        }
        Ok(Self { groups })
    }

    /// Whether the element `node` matches any group
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.groups.iter().any(|chain| matches_chain(tree, node, chain))
    }
}

fn matches_chain(tree: &DomTree, node: NodeId, chain: &[Part]) -> bool {
    let Some((last, rest)) = chain.split_last() else {
        return false;
    };
    if !matches_compound(tree, node, &last.compound) {
        return false;
    }
    match last.combinator {
        None => true,
        Some(Combinator::Child) => tree
            .parent(node)
            .is_some_and(|parent| matches_chain(tree, parent, rest)),
        Some(Combinator::Descendant) => tree
            .ancestors(node)
            .any(|ancestor| matches_chain(tree, ancestor, rest)),
    }
}

fn matches_compound(tree: &DomTree, node: NodeId, compound: &Compound) -> bool {
    let Some(element) = tree.element(node) else {
        return false;
    };

    if let Some(tag) = &compound.tag {
        if !element.tag.eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if element.id.as_deref() != Some(id.as_str()) {
            return false;
        }
    }
    if compound.classes.iter().any(|c| !element.classes.contains(c)) {
        return false;
    }
    compound.attrs.iter().all(|cond| matches_attr(element, cond))
}

fn matches_attr(element: &ElementData, cond: &AttrCondition) -> bool {
    match cond {
        AttrCondition::Exists { key } => element.has_attr(key),
        AttrCondition::Eq { key, value } => element.get_attr(key).as_ref() == Some(value),
        AttrCondition::StartsWith { key, value } => element
            .get_attr(key)
            .is_some_and(|attr| attr.starts_with(value.as_str())),
        AttrCondition::EndsWith { key, value } => element
            .get_attr(key)
            .is_some_and(|attr| attr.ends_with(value.as_str())),
        AttrCondition::Contains { key, value } => element
            .get_attr(key)
            .is_some_and(|attr| attr.contains(value.as_str())),
        AttrCondition::Includes { key, value } => element
            .get_attr(key)
            .is_some_and(|attr| attr.split_whitespace().any(|t| t == value)),
    }
}

/// Split on `sep` outside brackets and quotes; whitespace-only pieces are kept
/// out so callers see trimmed tokens
fn split_top_level(src: &str, sep: char) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0usize;
    let mut quote: Option<char> = None;

    for ch in src.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(ch);
            }
            (Some(_), _) => current.push(ch),
            (None, '"' | '\'') => {
                quote = Some(ch);
                current.push(ch);
            }
            (None, '[') => {
                bracket_depth += 1;
                current.push(ch);
            }
            (None, ']') => {
                bracket_depth = bracket_depth.saturating_sub(1);
                current.push(ch);
            }
            (None, c) if bracket_depth == 0 && (c == sep || (sep == ' ' && c.is_whitespace())) => {
                if !current.trim().is_empty() {
                    out.push(current.trim().to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        out.push(current.trim().to_string());
    }
    out
}

fn parse_chain(group: &str, full: &str) -> Result<Vec<Part>> {
    let spaced = space_child_combinators(group);
    let mut parts = Vec::new();
    let mut pending: Option<Combinator> = None;

    for token in split_top_level(&spaced, ' ') {
        if token == ">" {
            if pending.is_some() || parts.is_empty() {
                return Err(DomError::UnsupportedSelector(full.into()));
            }
            pending = Some(Combinator::Child);
            continue;
        }
        let compound = parse_compound(&token, full)?;
        let combinator = if parts.is_empty() {
            None
        } else {
            Some(pending.take().unwrap_or(Combinator::Descendant))
        };
        parts.push(Part { compound, combinator });
    }

    if parts.is_empty() || pending.is_some() {
        return Err(DomError::UnsupportedSelector(full.into()));
    }
    Ok(parts)
}

/// Pad `>` with spaces so it tokenizes on its own; quoted spans and
/// bracketed attribute conditions are copied through untouched
fn space_child_combinators(group: &str) -> String {
    let mut out = String::with_capacity(group.len() + 4);
    let mut bracket_depth = 0usize;
    let mut quote: Option<char> = None;

    for ch in group.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '[') => bracket_depth += 1,
            (None, ']') => bracket_depth = bracket_depth.saturating_sub(1),
            (None, '>') if bracket_depth == 0 => {
                out.push_str(" > ");
                continue;
            }
            _ => {}
        }
        out.push(ch);
    }
    out
}

/// Byte offset of the `]` closing an attribute condition, skipping quoted values
fn closing_bracket(src: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, ch) in src.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, ']') => return Some(i),
            _ => {}
        }
    }
    None
}

fn parse_compound(src: &str, full: &str) -> Result<Compound> {
    let unsupported = || DomError::UnsupportedSelector(full.into());
    let mut compound = Compound::default();
    let mut rest = src;
    let mut universal = false;

    while let Some(ch) = rest.chars().next() {
        match ch {
            '*' => {
                universal = true;
                rest = &rest[1..];
            }
            '#' => {
                let (ident, next) = take_ident(&rest[1..]).ok_or_else(unsupported)?;
                compound.id = Some(ident.to_string());
                rest = next;
            }
            '.' => {
                let (ident, next) = take_ident(&rest[1..]).ok_or_else(unsupported)?;
                compound.classes.push(ident.to_string());
                rest = next;
            }
            '[' => {
                let end = closing_bracket(rest).ok_or_else(unsupported)?;
                compound.attrs.push(parse_attr(&rest[1..end]).ok_or_else(unsupported)?);
                rest = &rest[end + 1..];
            }
            _ if compound.tag.is_none() && !universal && rest.len() == src.len() => {
                let (ident, next) = take_ident(rest).ok_or_else(unsupported)?;
                compound.tag = Some(ident.to_ascii_lowercase());
                rest = next;
            }
            _ => return Err(unsupported()),
        }
    }

    Ok(compound)
}

fn take_ident(src: &str) -> Option<(&str, &str)> {
    let end = src
        .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(src.len());
    (end > 0).then(|| src.split_at(end))
}

fn parse_attr(inner: &str) -> Option<AttrCondition> {
    let inner = inner.trim();
    let Some(eq) = inner.find('=') else {
        let (key, rest) = take_ident(inner)?;
        return rest.is_empty().then(|| AttrCondition::Exists { key: key.into() });
    };

    let (lhs, value) = (&inner[..eq], &inner[eq + 1..]);
    let value = unquote(value.trim()).to_string();
    let (key, op) = match lhs.chars().last()? {
        c @ ('^' | '$' | '*' | '~') => (lhs[..lhs.len() - 1].trim(), Some(c)),
        _ => (lhs.trim(), None),
    };
    let (key, rest) = take_ident(key)?;
    if !rest.is_empty() {
        return None;
    }
    let key = key.to_string();

    Some(match op {
        None => AttrCondition::Eq { key, value },
        Some('^') => AttrCondition::StartsWith { key, value },
        Some('$') => AttrCondition::EndsWith { key, value },
        Some('*') => AttrCondition::Contains { key, value },
        Some(_) => AttrCondition::Includes { key, value },
    })
}

fn unquote(value: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(q).and_then(|v| v.strip_suffix(q)) {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let video = tree.create_element("video");
        let source = tree.create_element("source");
        let link = tree.create_element("a");
        tree.append_child(tree.root(), video);
        tree.append_child(video, source);
        tree.append_child(tree.root(), link);
        if let Some(e) = tree.element_mut(video) {
            e.set_attr("data-lazy-video", "");
            e.set_attr("class", "showcase-video muted");
        }
        if let Some(e) = tree.element_mut(source) {
            e.set_attr("src", "assets/hero bg.mp4");
        }
        if let Some(e) = tree.element_mut(link) {
            e.set_attr("href", "#about");
            e.set_attr("class", "nav-link");
        }
        (tree, video, source, link)
    }

    #[test]
    fn test_compound_and_attribute_selectors() {
        let (tree, video, source, link) = sample();

        let lazy = SelectorList::parse("video[data-lazy-video]").unwrap();
        assert!(lazy.matches(&tree, video));
        assert!(!lazy.matches(&tree, source));

        let anchors = SelectorList::parse(r##"a[href^="#"]"##).unwrap();
        assert!(anchors.matches(&tree, link));

        let class = SelectorList::parse("video.showcase-video.muted").unwrap();
        assert!(class.matches(&tree, video));
    }

    #[test]
    fn test_quoted_value_with_space() {
        let (tree, _, source, _) = sample();
        let sel = SelectorList::parse(r#"video source[src="assets/hero bg.mp4"]"#).unwrap();
        assert!(sel.matches(&tree, source));

        let child = SelectorList::parse("video > source").unwrap();
        assert!(child.matches(&tree, source));
    }

    #[test]
    fn test_quoted_values_with_delimiters() {
        let mut tree = DomTree::new();
        let nav = tree.create_element("nav");
        let link = tree.create_element("a");
        tree.append_child(tree.root(), nav);
        tree.append_child(nav, link);
        if let Some(e) = tree.element_mut(link) {
            e.set_attr("title", "Mode > Femme");
            e.set_attr("data-x", "a]b");
        }

        let sel = SelectorList::parse(r#"nav > a[title="Mode > Femme"]"#).unwrap();
        assert!(sel.matches(&tree, link));

        let sel = SelectorList::parse(r#"[data-x="a]b"]"#).unwrap();
        assert!(sel.matches(&tree, link));

        let sel = SelectorList::parse(r#"a[title='Mode > Homme']"#).unwrap();
        assert!(!sel.matches(&tree, link));
    }

    #[test]
    fn test_groups() {
        let (tree, video, _, link) = sample();
        let sel = SelectorList::parse(".nav-link, .showcase-video").unwrap();
        assert!(sel.matches(&tree, video));
        assert!(sel.matches(&tree, link));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(SelectorList::parse("").is_err());
        assert!(SelectorList::parse("> a").is_err());
        assert!(SelectorList::parse("a >").is_err());
        assert!(SelectorList::parse("a:hover").is_err());
        assert!(SelectorList::parse("div#").is_err());
    }
}
