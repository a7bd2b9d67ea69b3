// src/dom/mod.rs
//! Narrow view of the host page the injector reads from and augments.
//!
//! The host owns the tree. We only query it, set attributes/inline styles,
//! attach our own overlay subtrees and remove the ones we attached earlier.

pub mod memory;

pub use memory::MemoryDocument;

use tokio::sync::watch;

/// Opaque handle to an element. Stays valid for the document's lifetime,
/// also after the element has been detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Minimal element matcher: `tag.class[attr]`, every part optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matcher {
    pub tag: Option<&'static str>,
    pub class: Option<&'static str>,
    pub attr: Option<&'static str>,
}

impl Matcher {
    pub const fn class(class: &'static str) -> Self {
        Self {
            tag: None,
            class: Some(class),
            attr: None,
        }
    }

    pub const fn with_tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    pub const fn with_attr(mut self, attr: &'static str) -> Self {
        self.attr = Some(attr);
        self
    }

    /// Check an element given its tag, class attribute and attribute lookup.
    pub fn matches(
        &self,
        tag: &str,
        class_attr: Option<&str>,
        has_attr: impl Fn(&str) -> bool,
    ) -> bool {
        if let Some(t) = self.tag {
            if !t.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(c) = self.class {
            let found = class_attr
                .map(|v| v.split_ascii_whitespace().any(|tok| tok == c))
                .unwrap_or(false);
            if !found {
                return false;
            }
        }
        match self.attr {
            Some(a) => has_attr(a),
            None => true,
        }
    }
}

/// Detached element subtree to be attached with [`Document::append_fragment`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Fragment>,
}

impl Fragment {
    pub fn element(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: Fragment) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Host document seam. Implementations use interior mutability; every call
/// runs to completion without suspending.
pub trait Document: Send + Sync {
    /// All attached elements under `<body>` matching `m`, in tree order.
    fn query_all(&self, m: &Matcher) -> Vec<NodeId>;

    /// First descendant of `root` (excluding `root`) matching `m`.
    fn query_within(&self, root: NodeId, m: &Matcher) -> Option<NodeId>;

    /// `el` itself or its nearest ancestor matching `m`.
    fn closest(&self, el: NodeId, m: &Matcher) -> Option<NodeId>;

    fn attribute(&self, el: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&self, el: NodeId, name: &str, value: &str);

    fn set_style(&self, el: NodeId, property: &str, value: &str);

    fn append_fragment(&self, parent: NodeId, fragment: Fragment) -> NodeId;

    fn remove(&self, el: NodeId);

    /// Add a global style sheet once. Returns `false` if `id` already exists.
    fn inject_style(&self, id: &str, css: &str) -> bool;

    /// Child-list mutation generation. Bumped on every append/remove.
    fn mutations(&self) -> watch::Receiver<u64>;
}
