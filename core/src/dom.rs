use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub tag_name: String,
    pub attributes: AttrMap,
    pub children: Vec<Node>,
}

pub type AttrMap = HashMap<String, String>;

pub fn text(data: String) -> Node {
    Node::Text(data)
}

pub fn elem(name: String, attrs: AttrMap, children: Vec<Node>) -> Node {
    Node::Element(ElementData {
        tag_name: name,
        attributes: attrs,
        children,
    })
}

impl Node {
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(elem) => &elem.children,
            Node::Text(_) => &[],
        }
    }

    pub fn as_element(&self) -> Option<&ElementData> {
        match self {
            Node::Element(elem) => Some(elem),
            Node::Text(_) => None,
        }
    }
}

impl ElementData {
    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id").map(String::as_str)
    }

    pub fn classes(&self) -> HashSet<&str> {
        match self.attributes.get("class") {
            Some(list) => list.split_whitespace().collect(),
            None => HashSet::new(),
        }
    }

    pub fn inline_style(&self) -> Option<&str> {
        self.attributes.get("styles").map(String::as_str)
    }
}

// NOTE: ルートが一つならRoot、0個か複数ならForest
#[derive(Debug, Clone, PartialEq)]
pub enum Tree<T> {
    Root(T),
    Forest(Vec<T>),
}

impl<T> Tree<T> {
    pub fn from_nodes(mut nodes: Vec<T>) -> Self {
        if nodes.len() == 1 {
            Tree::Root(nodes.swap_remove(0))
        } else {
            Tree::Forest(nodes)
        }
    }

    pub fn roots(&self) -> &[T] {
        match self {
            Tree::Root(root) => std::slice::from_ref(root),
            Tree::Forest(roots) => roots,
        }
    }

    pub fn into_roots(self) -> Vec<T> {
        match self {
            Tree::Root(root) => vec![root],
            Tree::Forest(roots) => roots,
        }
    }

    pub fn map<'a, U, F>(&'a self, mut f: F) -> Tree<U>
    where
        F: FnMut(&'a T) -> U,
    {
        match self {
            Tree::Root(root) => Tree::Root(f(root)),
            Tree::Forest(roots) => Tree::Forest(roots.iter().map(f).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{elem, text, AttrMap, Node, Tree};

    #[test]
    fn classes_split_on_whitespace() {
        let mut attrs = AttrMap::new();
        attrs.insert("class".to_string(), " warn  urgent ".to_string());
        let node = elem("p".to_string(), attrs, vec![]);
        let classes = node.as_element().map(|e| e.classes()).unwrap_or_default();
        assert_eq!(classes.len(), 2);
        assert!(classes.contains("warn"));
        assert!(classes.contains("urgent"));
    }

    #[test]
    fn text_nodes_have_no_children() {
        assert!(text("x".to_string()).children().is_empty());
        assert!(text("x".to_string()).as_element().is_none());
    }

    #[test]
    fn tree_from_single_node_is_root() {
        let tree = Tree::from_nodes(vec![text("a".to_string())]);
        assert_eq!(tree, Tree::Root(Node::Text("a".to_string())));
        assert_eq!(tree.roots().len(), 1);
    }

    #[test]
    fn tree_from_many_or_none_is_forest() {
        let tree = Tree::from_nodes(vec![text("a".to_string()), text("b".to_string())]);
        assert_eq!(tree.roots().len(), 2);
        assert_eq!(Tree::<Node>::from_nodes(vec![]), Tree::Forest(vec![]));
    }

    #[test]
    fn map_keeps_shape() {
        let tree = Tree::Forest(vec![1, 2]);
        assert_eq!(tree.map(|n| n * 10), Tree::Forest(vec![10, 20]));
        assert_eq!(Tree::Root(3).map(|n| n + 1).into_roots(), vec![4]);
    }
}
