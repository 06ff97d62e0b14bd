//! HTML document tree built with html5ever
//!
//! Provides utilities for:
//! - Parsing an HTML document into a small reference-counted tree
//! - Finding elements by local name
//! - Serializing an element's children back to HTML
//! - Collecting visible text

use std::borrow::Cow;
use std::cell::RefCell;
use std::io;
use std::rc::{Rc, Weak};

use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, ParseOpts, QualName, parse_document};

/// Elements whose text runs into the surrounding text without a break
const PHRASING_ELEMENTS: [&str; 16] = [
    "a", "abbr", "b", "bdi", "cite", "code", "em", "i", "kbd", "mark", "s", "small", "span",
    "strong", "sub", "sup",
];

/// Elements whose text is never shown
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "template", "noscript"];

pub type Handle = Rc<Node>;

#[derive(Debug)]
pub enum NodeData {
    Document,
    Doctype,
    Text { contents: RefCell<String> },
    Comment { contents: String },
    Element {
        name: QualName,
        attrs: RefCell<Vec<Attribute>>,
    },
}

#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    parent: RefCell<Option<Weak<Node>>>,
    pub children: RefCell<Vec<Handle>>,
}

impl Node {
    fn new(data: NodeData) -> Handle {
        Rc::new(Node {
            data,
            parent: RefCell::new(None),
            children: RefCell::new(Vec::new()),
        })
    }

    /// Local name of an element node
    pub fn local_name(&self) -> Option<&str> {
        match &self.data {
            NodeData::Element { name, .. } => Some(name.local.as_ref()),
            _ => None,
        }
    }

    fn parent(&self) -> Option<Handle> {
        self.parent.borrow().as_ref().and_then(Weak::upgrade)
    }
}

/// Parse a complete HTML document, the way a browser would
pub fn parse_html(html: &str) -> Handle {
    parse_document(DomSink::default(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
}

/// Get the first element with the given local name, in document order
pub fn find_first_element(handle: &Handle, name: &str) -> Option<Handle> {
    if handle.local_name() == Some(name) {
        return Some(handle.clone());
    }

    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_first_element(child, name))
}

/// Serialize the children of a node to HTML
pub fn inner_html(handle: &Handle) -> String {
    let mut bytes = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };

    // Writing into a Vec cannot fail
    if serialize(&mut bytes, &SerializableNode(handle.clone()), opts).is_err() {
        return String::new();
    }
    String::from_utf8(bytes).unwrap_or_default()
}

/// Visible text of a node with whitespace collapsed
///
/// Block-level elements count as word breaks; scripts, styles and comments
/// contribute nothing.
pub fn text_content(handle: &Handle) -> String {
    let mut text = String::new();
    collect_text(handle, &mut text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(handle: &Handle, text: &mut String) {
    match &handle.data {
        NodeData::Text { contents } => text.push_str(&contents.borrow()),
        NodeData::Element { name, .. } => {
            let local = name.local.as_ref();
            if HIDDEN_ELEMENTS.contains(&local) {
                return;
            }
            let breaks = !PHRASING_ELEMENTS.contains(&local);
            if breaks {
                text.push(' ');
            }
            for child in handle.children.borrow().iter() {
                collect_text(child, text);
            }
            if breaks {
                text.push(' ');
            }
        }
        NodeData::Document => {
            for child in handle.children.borrow().iter() {
                collect_text(child, text);
            }
        }
        NodeData::Doctype | NodeData::Comment { .. } => {}
    }
}

/// TreeSink that builds the reference-counted tree
struct DomSink {
    document: Handle,
}

impl Default for DomSink {
    fn default() -> Self {
        DomSink {
            document: Node::new(NodeData::Document),
        }
    }
}

fn append_child(parent: &Handle, child: Handle) {
    *child.parent.borrow_mut() = Some(Rc::downgrade(parent));
    parent.children.borrow_mut().push(child);
}

/// Append text, merging it into a preceding text node
fn append_text(parent: &Handle, text: &str) {
    if let Some(last) = parent.children.borrow().last()
        && let NodeData::Text { contents } = &last.data
    {
        contents.borrow_mut().push_str(text);
        return;
    }
    append_child(
        parent,
        Node::new(NodeData::Text {
            contents: RefCell::new(text.to_string()),
        }),
    );
}

fn detach(target: &Handle) {
    if let Some(parent) = target.parent.borrow_mut().take().and_then(|p| p.upgrade()) {
        parent
            .children
            .borrow_mut()
            .retain(|child| !Rc::ptr_eq(child, target));
    }
}

impl TreeSink for DomSink {
    type Handle = Handle;
    type Output = Handle;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self.document
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        tracing::trace!(%msg, "HTML parse error");
    }

    fn get_document(&self) -> Self::Handle {
        self.document.clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        static EMPTY: QualName = QualName {
            prefix: None,
            ns: html5ever::ns!(),
            local: html5ever::local_name!(""),
        };

        match &target.data {
            NodeData::Element { name, .. } => name,
            _ => &EMPTY,
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        Node::new(NodeData::Element {
            name,
            attrs: RefCell::new(attrs),
        })
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        Node::new(NodeData::Comment {
            contents: text.to_string(),
        })
    }

    fn create_pi(&self, _target: StrTendril, data: StrTendril) -> Self::Handle {
        // Processing instructions only occur in XML; keep them as comments
        Node::new(NodeData::Comment {
            contents: data.to_string(),
        })
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(node) => append_child(parent, node),
            NodeOrText::AppendText(text) => append_text(parent, &text),
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if element.parent().is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        append_child(&self.document, Node::new(NodeData::Doctype));
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let Some(parent) = sibling.parent() else {
            return;
        };
        let node = match new_node {
            NodeOrText::AppendNode(node) => {
                detach(&node);
                node
            }
            NodeOrText::AppendText(text) => Node::new(NodeData::Text {
                contents: RefCell::new(text.to_string()),
            }),
        };

        *node.parent.borrow_mut() = Some(Rc::downgrade(&parent));
        let mut children = parent.children.borrow_mut();
        let index = children
            .iter()
            .position(|child| Rc::ptr_eq(child, sibling))
            .unwrap_or(children.len());
        children.insert(index, node);
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        if let NodeData::Element {
            attrs: existing, ..
        } = &target.data
        {
            let mut existing = existing.borrow_mut();
            for attr in attrs {
                if !existing.iter().any(|a| a.name == attr.name) {
                    existing.push(attr);
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        detach(target);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let children = std::mem::take(&mut *node.children.borrow_mut());
        for child in children {
            append_child(new_parent, child);
        }
    }
}

/// Adapter handing a node to the html5ever serializer
struct SerializableNode(Handle);

impl Serialize for SerializableNode {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        if let TraversalScope::IncludeNode = traversal_scope {
            serialize_node(&self.0, serializer)
        } else {
            serialize_children(&self.0, serializer)
        }
    }
}

fn serialize_children<S: Serializer>(handle: &Handle, serializer: &mut S) -> io::Result<()> {
    for child in handle.children.borrow().iter() {
        serialize_node(child, serializer)?;
    }
    Ok(())
}

fn serialize_node<S: Serializer>(handle: &Handle, serializer: &mut S) -> io::Result<()> {
    match &handle.data {
        NodeData::Element { name, attrs } => {
            {
                let attrs = attrs.borrow();
                serializer.start_elem(
                    name.clone(),
                    attrs.iter().map(|attr| (&attr.name, &*attr.value)),
                )?;
            }
            serialize_children(handle, serializer)?;
            serializer.end_elem(name.clone())
        }
        NodeData::Text { contents } => serializer.write_text(&contents.borrow()),
        NodeData::Comment { contents } => serializer.write_comment(contents),
        NodeData::Document => serialize_children(handle, serializer),
        NodeData::Doctype => Ok(()),
    }
}
