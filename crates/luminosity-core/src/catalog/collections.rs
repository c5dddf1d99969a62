use ahash::AHashMap;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

pub const SMART_COLLECTION_CREATION_ID: &str = "com.adobe.ag.library.smart_collection";
pub const GROUP_CREATION_ID: &str = "com.adobe.ag.library.group";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Standard,
    Smart,
    Group,
}

impl CollectionKind {
    /// Decodes a collection's `creationId`. Anything unrecognized is treated
    /// as a standard collection.
    pub fn from_creation_id(creation_id: &str) -> Self {
        match creation_id {
            SMART_COLLECTION_CREATION_ID => CollectionKind::Smart,
            GROUP_CREATION_ID => CollectionKind::Group,
            _ => CollectionKind::Standard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection {
    pub id: i64,
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: CollectionKind,
}

/// Collections that hold photos, i.e. everything but groups, ordered by kind
/// then name.
pub fn photo_collections(collections: &[Collection]) -> Vec<Collection> {
    let mut flat: Vec<Collection> = collections
        .iter()
        .filter(|c| c.kind != CollectionKind::Group)
        .cloned()
        .collect();
    flat.sort_by(|a, b| (a.kind, &a.name, a.parent_id).cmp(&(b.kind, &b.name, b.parent_id)));
    flat
}

#[derive(Debug, Clone)]
struct Node {
    collection: Collection,
    children: Vec<i64>,
}

/// The collection hierarchy, stored flat and keyed by id. A catalog can have
/// several top-level collections, so they hang off a synthetic root.
/// Collections whose parent is unknown are treated as top-level.
#[derive(Debug, Clone, Default)]
pub struct CollectionTree {
    nodes: AHashMap<i64, Node>,
    roots: Vec<i64>,
}

impl CollectionTree {
    pub const ROOT_NAME: &'static str = "Root";

    /// Builds the tree. Children keep the order of `collections`.
    pub fn build(collections: Vec<Collection>) -> Self {
        let order: Vec<(i64, Option<i64>)> = collections.iter().map(|c| (c.id, c.parent_id)).collect();
        let mut nodes: AHashMap<i64, Node> = collections
            .into_iter()
            .map(|collection| {
                (
                    collection.id,
                    Node {
                        collection,
                        children: Vec::new(),
                    },
                )
            })
            .collect();

        let mut roots = Vec::new();
        for (id, parent_id) in order {
            match parent_id.filter(|p| *p != id && nodes.contains_key(p)) {
                Some(parent) => {
                    if let Some(node) = nodes.get_mut(&parent) {
                        node.children.push(id);
                    }
                }
                None => roots.push(id),
            }
        }

        CollectionTree { nodes, roots }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[i64] {
        &self.roots
    }

    pub fn get(&self, id: i64) -> Option<&Collection> {
        self.nodes.get(&id).map(|n| &n.collection)
    }

    pub fn children(&self, id: i64) -> &[i64] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, id: i64) -> Option<&Collection> {
        let parent_id = self.nodes.get(&id)?.collection.parent_id?;
        self.get(parent_id)
    }
}

impl Serialize for CollectionTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let children: Vec<NodeView<'_>> = self
            .roots
            .iter()
            .map(|&id| NodeView { tree: self, id })
            .collect();
        let mut root = serializer.serialize_struct("Collection", 3)?;
        root.serialize_field("name", Self::ROOT_NAME)?;
        root.serialize_field("type", &CollectionKind::Group)?;
        root.serialize_field("children", &children)?;
        root.end()
    }
}

struct NodeView<'a> {
    tree: &'a CollectionTree,
    id: i64,
}

impl Serialize for NodeView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = &self.tree.nodes[&self.id];
        let children: Vec<NodeView<'_>> = node
            .children
            .iter()
            .map(|&id| NodeView { tree: self.tree, id })
            .collect();

        let mut s = serializer.serialize_struct("Collection", 4)?;
        s.serialize_field("id", &node.collection.id)?;
        s.serialize_field("name", &node.collection.name)?;
        s.serialize_field("type", &node.collection.kind)?;
        if children.is_empty() {
            s.skip_field("children")?;
        } else {
            s.serialize_field("children", &children)?;
        }
        s.end()
    }
}
