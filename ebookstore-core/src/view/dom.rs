//! src/view/dom.rs
//! ============================================================================
//! # Headless document model
//!
//! The controllers bind to the page through a fixed set of element ids and
//! class hooks. [`Document`] holds those addressable elements; each element
//! may own a subtree of anonymous [`Node`]s (rendered cards, star icons).
//!
//! Lookups of missing ids return `None` and every `update` on a missing id is
//! a logged no-op, so markup that omits an element simply skips the
//! corresponding behavior.

use compact_str::CompactString;
use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::trace;

pub type ElementId = CompactString;

type ClassList = SmallVec<[CompactString; 4]>;

/// CSS class meaning "not displayed".
pub const HIDDEN: &str = "hidden";

/// Attribute naming the element an element is laid out inside.
pub const REGION_ATTR: &str = "data-region";

fn push_classes(list: &mut ClassList, classes: &str) {
    for class in classes.split_whitespace() {
        if !list.iter().any(|c| c == class) {
            list.push(CompactString::from(class));
        }
    }
}

/* ============================== Node =============================== */

/// Anonymous element in a rendered subtree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub tag: CompactString,
    pub classes: ClassList,
    pub attrs: IndexMap<CompactString, String>,
    pub text: String,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: CompactString::from(tag),
            ..Self::default()
        }
    }

    /// Adds one or more whitespace-separated classes.
    #[must_use]
    pub fn class(mut self, classes: &str) -> Self {
        push_classes(&mut self.classes, classes);
        self
    }

    #[must_use]
    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(CompactString::from(key), value.into());
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn child(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }

    #[must_use]
    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Depth-first search (self included) for the first node with `class`.
    pub fn find_class(&self, class: &str) -> Option<&Node> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_class(class))
    }

    /// Number of nodes in this subtree carrying `class`.
    pub fn count_class(&self, class: &str) -> usize {
        usize::from(self.has_class(class))
            + self.children.iter().map(|c| c.count_class(class)).sum::<usize>()
    }

    /// Concatenated text of this subtree, in document order.
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }
}

/* ============================ Fragment ============================= */

/// Off-tree batch of nodes, attached to an element in one operation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Fragment {
    nodes: Vec<Node>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

impl FromIterator<Node> for Fragment {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

/* ============================= Element ============================= */

/// Inline `display` override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Block,
    Grid,
    None,
}

/// Addressable element of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: ElementId,
    tag: CompactString,
    classes: ClassList,
    attrs: IndexMap<CompactString, String>,
    text: String,
    value: String,
    disabled: bool,
    display: Option<Display>,
    children: Vec<Node>,
    attach_count: u32,
}

impl Element {
    pub fn new(id: &str, tag: &str) -> Self {
        Self {
            id: ElementId::from(id),
            tag: CompactString::from(tag),
            classes: ClassList::new(),
            attrs: IndexMap::new(),
            text: String::new(),
            value: String::new(),
            disabled: false,
            display: None,
            children: Vec::new(),
            attach_count: 0,
        }
    }

    #[must_use]
    pub fn class(mut self, classes: &str) -> Self {
        push_classes(&mut self.classes, classes);
        self
    }

    #[must_use]
    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(CompactString::from(key), value.into());
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn hidden(self) -> Self {
        self.class(HIDDEN)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(CompactString::as_str)
    }

    pub fn add_class(&mut self, classes: &str) {
        push_classes(&mut self.classes, classes);
    }

    pub fn remove_class(&mut self, classes: &str) {
        for class in classes.split_whitespace() {
            self.classes.retain(|c| c != class);
        }
    }

    pub fn show(&mut self) {
        self.remove_class(HIDDEN);
    }

    pub fn hide(&mut self) {
        self.add_class(HIDDEN);
    }

    /// Hidden through the `hidden` class or an inline `display: none`.
    pub fn is_hidden(&self) -> bool {
        self.has_class(HIDDEN) || self.display == Some(Display::None)
    }

    pub fn attr_value(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        self.attrs.insert(CompactString::from(key), value.into());
    }

    pub fn text_value(&self) -> &str {
        &self.text
    }

    /// `textContent =` : replaces text and drops children.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.children.clear();
    }

    /// Current value of an input control.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn display(&self) -> Option<Display> {
        self.display
    }

    pub fn set_display(&mut self, display: Display) {
        self.display = Some(display);
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// `innerHTML = ''` followed by a single fragment attachment.
    pub fn replace_children(&mut self, fragment: Fragment) {
        self.text.clear();
        self.children = fragment.nodes;
        self.attach_count += 1;
    }

    /// `innerHTML = ''`.
    pub fn clear_children(&mut self) {
        self.text.clear();
        self.children.clear();
    }

    /// Number of fragment attachments performed on this element.
    pub fn attach_count(&self) -> u32 {
        self.attach_count
    }

    /// Visible text of the element including its subtree.
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }
}

/* ============================= Document ============================ */

/// Handle of a node appended to the document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u64);

#[derive(Debug, Clone, Default)]
pub struct Document {
    title: String,
    elements: IndexMap<ElementId, Element>,
    body: Vec<(BodyHandle, Node)>,
    next_handle: u64,
    scroll_y: u32,
    scroll_locked: bool,
    scrolled_into_view: Option<ElementId>,
    revision: u64,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Builder-style insert, used by page markup.
    #[must_use]
    pub fn with(mut self, element: Element) -> Self {
        self.insert(element);
        self
    }

    pub fn insert(&mut self, element: Element) {
        self.elements.insert(element.id.clone(), element);
        self.revision += 1;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.revision += 1;
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        let element = self.elements.get_mut(id)?;
        self.revision += 1;
        Some(element)
    }

    /// Applies `f` to the element if present. Returns false, and does
    /// nothing, when the markup lacks the element.
    pub fn update<F: FnOnce(&mut Element)>(&mut self, id: &str, f: F) -> bool {
        match self.get_mut(id) {
            Some(element) => {
                f(element);
                true
            }
            None => {
                trace!(id, "element not present, update skipped");
                false
            }
        }
    }

    /// Whether `id` is on screen: present, not hidden itself, and not inside
    /// a hidden region (`data-region` names the enclosing element).
    pub fn is_displayed(&self, id: &str) -> bool {
        let Some(el) = self.elements.get(id) else {
            return false;
        };
        if el.is_hidden() {
            return false;
        }
        match el.attr_value(REGION_ATTR) {
            Some(region) if region != id => self.is_displayed(region),
            _ => true,
        }
    }

    /// Ids of elements carrying `class`, in document order.
    pub fn ids_with_class(&self, class: &str) -> Vec<ElementId> {
        self.elements
            .values()
            .filter(|e| e.has_class(class))
            .map(|e| e.id.clone())
            .collect()
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Appends a transient node (banner) to the body.
    pub fn append_to_body(&mut self, node: Node) -> BodyHandle {
        self.next_handle += 1;
        let handle = BodyHandle(self.next_handle);
        self.body.push((handle, node));
        self.revision += 1;
        handle
    }

    pub fn remove_from_body(&mut self, handle: BodyHandle) -> bool {
        let before = self.body.len();
        self.body.retain(|(h, _)| *h != handle);
        let removed = self.body.len() != before;
        if removed {
            self.revision += 1;
        }
        removed
    }

    pub fn body_nodes(&self) -> impl Iterator<Item = &Node> {
        self.body.iter().map(|(_, n)| n)
    }

    pub fn scroll_y(&self) -> u32 {
        self.scroll_y
    }

    pub fn scroll_to(&mut self, y: u32) {
        self.scroll_y = y;
        self.revision += 1;
    }

    /// Records `id` as the last element scrolled into view; false if absent.
    pub fn scroll_into_view(&mut self, id: &str) -> bool {
        if !self.elements.contains_key(id) {
            return false;
        }
        self.scrolled_into_view = Some(ElementId::from(id));
        self.revision += 1;
        true
    }

    pub fn last_scrolled_into_view(&self) -> Option<&str> {
        self.scrolled_into_view.as_deref()
    }

    /// `document.body.style.overflow`: hidden while an overlay is open.
    pub fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
        self.revision += 1;
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// Bumped on every mutation; renderers compare it to skip idle frames.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::new("Test")
            .with(Element::new("grid", "div").class("grid gap-8"))
            .with(Element::new("empty", "div").hidden())
            .with(Element::new("f1", "button").class("category-filter"))
            .with(Element::new("f2", "button").class("category-filter active"))
    }

    #[test]
    fn missing_elements_are_skipped() {
        let mut doc = doc();
        let rev = doc.revision();

        assert!(!doc.update("nope", |e| e.hide()));
        assert_eq!(doc.revision(), rev);
        assert!(doc.update("empty", Element::show));
        assert!(!doc.get("empty").expect("present").is_hidden());
    }

    #[test]
    fn class_hooks_in_document_order() {
        let doc = doc();
        assert_eq!(doc.ids_with_class("category-filter"), vec!["f1", "f2"]);
    }

    #[test]
    fn class_lists_deduplicate() {
        let mut el = Element::new("x", "div").class("a b");
        el.add_class("b c");
        el.remove_class("a");
        assert_eq!(el.classes().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn fragment_attaches_once() {
        let mut doc = doc();
        let fragment: Fragment = (0..10).map(|i| Node::new("div").text(i.to_string())).collect();

        doc.update("grid", |e| e.replace_children(fragment));

        let grid = doc.get("grid").expect("grid");
        assert_eq!(grid.children().len(), 10);
        assert_eq!(grid.attach_count(), 1);
    }

    #[test]
    fn inline_display_none_hides() {
        let mut el = Element::new("g", "div");
        el.set_display(Display::None);
        assert!(el.is_hidden());
        el.set_display(Display::Grid);
        assert!(!el.is_hidden());
    }

    #[test]
    fn regions_hide_their_members() {
        let mut doc = Document::new("T")
            .with(Element::new("panel", "div").hidden())
            .with(Element::new("link", "a").attr(REGION_ATTR, "panel"))
            .with(Element::new("loose", "a").attr(REGION_ATTR, "gone"));

        assert!(!doc.is_displayed("link"));
        doc.update("panel", Element::show);
        assert!(doc.is_displayed("link"));
        assert!(!doc.is_displayed("loose"));
        assert!(!doc.is_displayed("missing"));
    }

    #[test]
    fn body_nodes_come_and_go() {
        let mut doc = doc();
        let h = doc.append_to_body(Node::new("div").text("Oops"));
        assert_eq!(doc.body_nodes().count(), 1);
        assert!(doc.remove_from_body(h));
        assert!(!doc.remove_from_body(h));
    }

    #[test]
    fn node_queries() {
        let node = Node::new("div")
            .class("card")
            .child(Node::new("h3").class("title").text("Dune"))
            .child(Node::new("p").text(" by Herbert"));

        assert_eq!(node.find_class("title").map(|n| n.text.as_str()), Some("Dune"));
        assert_eq!(node.text_content(), "Dune by Herbert");
        assert_eq!(node.count_class("title"), 1);
    }
}
