// src/dom/memory.rs
//! In-memory document: arena tree with an html/head/body skeleton.
//! Backs the probe binary and the test-suite.

use std::sync::Mutex;

use tokio::sync::watch;

use super::{Document, Fragment, Matcher, NodeId};

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attrs: Vec<(String, String)>,
    style: Vec<(String, String)>,
    text: Option<String>,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            style: Vec::new(),
            text: None,
            parent: None,
            children: Vec::new(),
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn matches(&self, m: &Matcher) -> bool {
        m.matches(&self.tag, self.attr("class"), |a| self.attr(a).is_some())
    }
}

#[derive(Debug)]
struct Tree {
    nodes: Vec<Node>,
    head: usize,
    body: usize,
}

const ROOT: usize = 0;

impl Tree {
    fn new() -> Self {
        let mut tree = Self {
            nodes: vec![Node::new("html")],
            head: 0,
            body: 0,
        };
        tree.head = tree.insert(ROOT, &Fragment::element("head"));
        tree.body = tree.insert(ROOT, &Fragment::element("body"));
        tree
    }

    fn insert(&mut self, parent: usize, frag: &Fragment) -> usize {
        let idx = self.nodes.len();
        let mut node = Node::new(&frag.tag);
        node.attrs = frag.attrs.clone();
        node.text = frag.text.clone();
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent].children.push(idx);
        for child in &frag.children {
            self.insert(idx, child);
        }
        idx
    }

    fn is_within(&self, mut idx: usize, ancestor: usize) -> bool {
        loop {
            if idx == ancestor {
                return true;
            }
            match self.nodes[idx].parent {
                Some(p) => idx = p,
                None => return false,
            }
        }
    }

    /// Pre-order descendants of `root`, excluding `root`.
    fn descendants(&self, root: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.nodes[root].children.iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            out.push(idx);
            stack.extend(self.nodes[idx].children.iter().rev().copied());
        }
        out
    }

    fn write_html(&self, idx: usize, out: &mut String) {
        let node = &self.nodes[idx];
        out.push('<');
        out.push_str(&node.tag);
        for (k, v) in &node.attrs {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(v));
            out.push('"');
        }
        if !node.style.is_empty() {
            let style = node
                .style
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join("; ");
            out.push_str(" style=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(&style));
            out.push('"');
        }
        out.push('>');
        if let Some(text) = &node.text {
            out.push_str(&html_escape::encode_text(text));
        }
        for &child in &node.children {
            self.write_html(child, out);
        }
        out.push_str("</");
        out.push_str(&node.tag);
        out.push('>');
    }
}

pub struct MemoryDocument {
    tree: Mutex<Tree>,
    generation: watch::Sender<u64>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        let (generation, _rx) = watch::channel(0u64);
        Self {
            tree: Mutex::new(Tree::new()),
            generation,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tree> {
        self.tree.lock().expect("document mutex poisoned")
    }

    fn bump(&self) {
        self.generation.send_modify(|g| *g += 1);
    }

    pub fn head(&self) -> NodeId {
        NodeId(self.lock().head)
    }

    pub fn body(&self) -> NodeId {
        NodeId(self.lock().body)
    }

    /// Attach `fragment` under `parent` (host-side helper; same as
    /// [`Document::append_fragment`]).
    pub fn append(&self, parent: NodeId, fragment: Fragment) -> NodeId {
        self.append_fragment(parent, fragment)
    }

    pub fn text(&self, el: NodeId) -> Option<String> {
        self.lock().nodes[el.0].text.clone()
    }

    pub fn children(&self, el: NodeId) -> Vec<NodeId> {
        self.lock().nodes[el.0]
            .children
            .iter()
            .map(|&i| NodeId(i))
            .collect()
    }

    pub fn parent(&self, el: NodeId) -> Option<NodeId> {
        self.lock().nodes[el.0].parent.map(NodeId)
    }

    pub fn style(&self, el: NodeId, property: &str) -> Option<String> {
        self.lock().nodes[el.0]
            .style
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.clone())
    }

    /// Whether `el` is still connected to the document root.
    pub fn is_attached(&self, el: NodeId) -> bool {
        self.lock().is_within(el.0, ROOT)
    }

    /// Current child-list mutation generation.
    pub fn mutation_generation(&self) -> u64 {
        *self.generation.borrow()
    }

    pub fn outer_html(&self, el: NodeId) -> String {
        let mut out = String::new();
        self.lock().write_html(el.0, &mut out);
        out
    }
}

impl Document for MemoryDocument {
    fn query_all(&self, m: &Matcher) -> Vec<NodeId> {
        let tree = self.lock();
        tree.descendants(tree.body)
            .into_iter()
            .filter(|&i| tree.nodes[i].matches(m))
            .map(NodeId)
            .collect()
    }

    fn query_within(&self, root: NodeId, m: &Matcher) -> Option<NodeId> {
        let tree = self.lock();
        tree.descendants(root.0)
            .into_iter()
            .find(|&i| tree.nodes[i].matches(m))
            .map(NodeId)
    }

    fn closest(&self, el: NodeId, m: &Matcher) -> Option<NodeId> {
        let tree = self.lock();
        let mut cur = Some(el.0);
        while let Some(i) = cur {
            if tree.nodes[i].matches(m) {
                return Some(NodeId(i));
            }
            cur = tree.nodes[i].parent;
        }
        None
    }

    fn attribute(&self, el: NodeId, name: &str) -> Option<String> {
        self.lock().nodes[el.0].attr(name).map(str::to_string)
    }

    fn set_attribute(&self, el: NodeId, name: &str, value: &str) {
        let mut tree = self.lock();
        let node = &mut tree.nodes[el.0];
        match node.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => node.attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn set_style(&self, el: NodeId, property: &str, value: &str) {
        let mut tree = self.lock();
        let node = &mut tree.nodes[el.0];
        match node.style.iter_mut().find(|(k, _)| k == property) {
            Some((_, v)) => *v = value.to_string(),
            None => node.style.push((property.to_string(), value.to_string())),
        }
    }

    fn append_fragment(&self, parent: NodeId, fragment: Fragment) -> NodeId {
        let (idx, observed) = {
            let mut tree = self.lock();
            let idx = tree.insert(parent.0, &fragment);
            let body = tree.body;
            (idx, tree.is_within(parent.0, body))
        };
        if observed {
            self.bump();
        }
        NodeId(idx)
    }

    fn remove(&self, el: NodeId) {
        let observed = {
            let mut tree = self.lock();
            let Some(parent) = tree.nodes[el.0].parent else {
                return;
            };
            tree.nodes[parent].children.retain(|&c| c != el.0);
            tree.nodes[el.0].parent = None;
            let body = tree.body;
            tree.is_within(parent, body)
        };
        if observed {
            self.bump();
        }
    }

    fn inject_style(&self, id: &str, css: &str) -> bool {
        let mut tree = self.lock();
        let exists = tree
            .descendants(ROOT)
            .into_iter()
            .any(|i| tree.nodes[i].attr("id") == Some(id));
        if exists {
            return false;
        }
        let head = tree.head;
        tree.insert(head, &Fragment::element("style").attr("id", id).text(css));
        true
    }

    fn mutations(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }
}
