#![forbid(unsafe_code)]

//! In-memory host for tests.
//!
//! [`VirtualHost`] implements every capability in [`crate::host`] over a
//! small element tree with a [`DeterministicClock`]. Selector support covers
//! what page markup needs: type, `#id`, `.class`, `[attr]`, `[attr="v"]`,
//! descendant combinators and comma-separated groups.
//!
//! ```ignore
//! use folio_core::host::Dom;
//! use folio_core::testing::{VirtualHost, el};
//!
//! let mut host = VirtualHost::new();
//! let body = host.root();
//! let nav = host.append(body, el("ul").class("nav"));
//! host.append(nav, el("a").attr("href", "#home"));
//! assert_eq!(host.query_all(".nav a").len(), 1);
//! ```

use core::time::Duration;
use std::collections::{BTreeMap, BTreeSet};

use crate::clock::{Clock, DeterministicClock};
use crate::host::{Dom, ElementId, Location, Viewport, ViewportObserver};

/// Declarative description of an element to append.
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
}

/// Start an [`ElementSpec`] for `tag`.
#[must_use]
pub fn el(tag: &str) -> ElementSpec {
    ElementSpec {
        tag: tag.to_ascii_lowercase(),
        ..ElementSpec::default()
    }
}

impl ElementSpec {
    /// Set the `id` attribute.
    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Add a class.
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Set an attribute.
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
}

/// Deterministic in-memory host.
#[derive(Debug, Clone)]
pub struct VirtualHost {
    nodes: Vec<Node>,
    focused: Option<ElementId>,
    hash: String,
    replaced_hashes: Vec<String>,
    width: u32,
    reduced_motion: bool,
    hidden: bool,
    observed: BTreeSet<ElementId>,
    scrolled: Vec<(ElementId, bool)>,
    reflows: Vec<ElementId>,
    clock: DeterministicClock,
}

impl Default for VirtualHost {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualHost {
    /// A host holding only `<body>`, 1440 px wide, motion allowed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                tag: "body".to_string(),
                parent: None,
                children: Vec::new(),
                classes: Vec::new(),
                attrs: BTreeMap::new(),
                styles: BTreeMap::new(),
            }],
            focused: None,
            hash: String::new(),
            replaced_hashes: Vec::new(),
            width: 1440,
            reduced_motion: false,
            hidden: false,
            observed: BTreeSet::new(),
            scrolled: Vec::new(),
            reflows: Vec::new(),
            clock: DeterministicClock::new(),
        }
    }

    /// The `<body>` element.
    #[must_use]
    pub fn root(&self) -> ElementId {
        ElementId::new(0)
    }

    /// Append a child built from `node` under `parent`.
    pub fn append(&mut self, parent: ElementId, node: ElementSpec) -> ElementId {
        let id = ElementId::new(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Node {
            tag: node.tag,
            parent: Some(parent),
            children: Vec::new(),
            classes: node.classes,
            attrs: node.attrs,
            styles: BTreeMap::new(),
        });
        self.nodes[parent.get() as usize].children.push(id);
        id
    }

    /// Set the URL fragment as if the user typed it (no `hashchange` fired).
    pub fn set_hash(&mut self, hash: &str) {
        self.hash = hash.to_string();
    }

    /// Fragments written through [`Location::replace_hash`], oldest first.
    #[must_use]
    pub fn replaced_hashes(&self) -> &[String] {
        &self.replaced_hashes
    }

    /// Change the viewport width.
    pub fn set_width(&mut self, width: u32) {
        self.width = width;
    }

    /// Change the reduced-motion preference.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// Change document visibility.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// Elements currently observed for intersection.
    #[must_use]
    pub fn observed(&self) -> Vec<ElementId> {
        self.observed.iter().copied().collect()
    }

    /// Every `scroll_into_view` call as `(element, smooth)`.
    #[must_use]
    pub fn scrolled(&self) -> &[(ElementId, bool)] {
        &self.scrolled
    }

    /// Every forced reflow, oldest first.
    #[must_use]
    pub fn reflows(&self) -> &[ElementId] {
        &self.reflows
    }

    /// Class list of `el`.
    #[must_use]
    pub fn classes(&self, el: ElementId) -> Vec<String> {
        self.node(el).map(|n| n.classes.clone()).unwrap_or_default()
    }

    /// Advance the clock by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    fn node(&self, el: ElementId) -> Option<&Node> {
        self.nodes.get(el.get() as usize)
    }

    fn node_mut(&mut self, el: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(el.get() as usize)
    }

    fn document_order(&self) -> Vec<ElementId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.node(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }

    fn matches_compound(&self, el: ElementId, compound: &Compound) -> bool {
        let Some(node) = self.node(el) else {
            return false;
        };
        if let Some(tag) = &compound.tag
            && *tag != node.tag
        {
            return false;
        }
        if let Some(id) = &compound.id
            && node.attrs.get("id") != Some(id)
        {
            return false;
        }
        if !compound.classes.iter().all(|c| node.classes.contains(c)) {
            return false;
        }
        compound.attrs.iter().all(|(name, value)| match value {
            None => node.attrs.contains_key(name),
            Some(v) => node.attrs.get(name) == Some(v),
        })
    }

    fn matches_chain(&self, el: ElementId, chain: &[Compound]) -> bool {
        let Some((last, ancestors)) = chain.split_last() else {
            return false;
        };
        if !self.matches_compound(el, last) {
            return false;
        }
        let mut remaining = ancestors;
        let mut cursor = self.node(el).and_then(|n| n.parent);
        while let Some((want, rest)) = remaining.split_last() {
            loop {
                let Some(candidate) = cursor else {
                    return false;
                };
                cursor = self.node(candidate).and_then(|n| n.parent);
                if self.matches_compound(candidate, want) {
                    break;
                }
            }
            remaining = rest;
        }
        true
    }
}

impl Dom for VirtualHost {
    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        let groups: Vec<Vec<Compound>> = selector
            .split(',')
            .map(parse_chain)
            .filter(|chain| !chain.is_empty())
            .collect();
        self.document_order()
            .into_iter()
            .filter(|&id| groups.iter().any(|chain| self.matches_chain(id, chain)))
            .collect()
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        let node = self.node(el)?;
        if name == "class" {
            return Some(node.classes.join(" "));
        }
        node.attrs.get(name).cloned()
    }

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        let Some(node) = self.node_mut(el) else {
            return;
        };
        if name == "class" {
            node.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            node.attrs.insert(name.to_string(), value.to_string());
        }
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.node(el)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn set_class(&mut self, el: ElementId, class: &str, on: bool) {
        let Some(node) = self.node_mut(el) else {
            return;
        };
        let present = node.classes.iter().any(|c| c == class);
        if on && !present {
            node.classes.push(class.to_string());
        } else if !on {
            node.classes.retain(|c| c != class);
        }
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        let Some(node) = self.node_mut(el) else {
            return;
        };
        if value.is_empty() {
            node.styles.remove(property);
        } else {
            node.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn style(&self, el: ElementId, property: &str) -> Option<String> {
        self.node(el)?.styles.get(property).cloned()
    }

    fn focus(&mut self, el: ElementId) {
        if self.node(el).is_some() {
            self.focused = Some(el);
        }
    }

    fn active_element(&self) -> Option<ElementId> {
        self.focused
    }

    fn scroll_into_view(&mut self, el: ElementId, smooth: bool) {
        self.scrolled.push((el, smooth));
    }

    fn force_reflow(&mut self, el: ElementId) {
        self.reflows.push(el);
    }
}

impl Location for VirtualHost {
    fn hash(&self) -> String {
        self.hash.clone()
    }

    fn replace_hash(&mut self, hash: &str) {
        self.hash = hash.to_string();
        self.replaced_hashes.push(hash.to_string());
    }
}

impl Viewport for VirtualHost {
    fn width(&self) -> u32 {
        self.width
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }
}

impl ViewportObserver for VirtualHost {
    fn observe(&mut self, el: ElementId) {
        self.observed.insert(el);
    }

    fn unobserve(&mut self, el: ElementId) {
        self.observed.remove(&el);
    }
}

impl Clock for VirtualHost {
    fn now_mono(&self) -> Duration {
        self.clock.now_mono()
    }
}

// ---------------------------------------------------------------------------
// Selector parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

fn parse_chain(selector: &str) -> Vec<Compound> {
    split_compounds(selector)
        .iter()
        .map(|part| parse_compound(part))
        .collect()
}

/// Split on whitespace outside of `[...]`.
fn split_compounds(selector: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for ch in selector.chars() {
        match ch {
            '[' => {
                depth += 1;
                current.push(ch);
            }
            ']' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

fn parse_compound(part: &str) -> Compound {
    let mut compound = Compound::default();
    let mut rest = part;

    let tag_end = rest.find(['#', '.', '[']).unwrap_or(rest.len());
    if tag_end > 0 && &rest[..tag_end] != "*" {
        compound.tag = Some(rest[..tag_end].to_ascii_lowercase());
    }
    rest = &rest[tag_end..];

    while let Some(first) = rest.chars().next() {
        match first {
            '[' => {
                let end = rest.find(']').unwrap_or(rest.len());
                let inner = &rest[1..end];
                let attr = match inner.split_once('=') {
                    Some((name, value)) => (
                        name.trim().to_string(),
                        Some(value.trim().trim_matches(['"', '\'']).to_string()),
                    ),
                    None => (inner.trim().to_string(), None),
                };
                compound.attrs.push(attr);
                rest = rest.get(end + 1..).unwrap_or("");
            }
            '#' | '.' => {
                let body = &rest[1..];
                let end = body.find(['#', '.', '[']).unwrap_or(body.len());
                let name = body[..end].to_string();
                if first == '#' {
                    compound.id = Some(name);
                } else {
                    compound.classes.push(name);
                }
                rest = &body[end..];
            }
            _ => break,
        }
    }
    compound
}
