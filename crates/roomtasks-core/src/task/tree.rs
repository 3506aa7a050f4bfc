//! Task tree assembly from an unordered stream of records.
//!
//! The backend hands out a flat list where a child may arrive before its
//! parent. Records are stored in an arena and linked by [`NodeId`]; a record
//! whose parent is not (yet) a root waits in the orphan list.
//!
//! Only one level of deferred resolution is supported: orphans are adopted
//! when a *root* arrives. A record whose parent is itself a child, or an
//! orphan, stays an orphan for the rest of the pass.

use indexmap::IndexMap;

use super::TaskRecord;

/// Handle to a record stored in a [`TaskTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    record: TaskRecord,
    children: Vec<NodeId>,
}

/// One task list assembled into roots, subtasks and orphans.
#[derive(Debug, Clone)]
pub struct TaskTree {
    id: String,
    name: String,
    nodes: Vec<Node>,
    /// Root task id -> node, in insertion order
    roots: IndexMap<String, NodeId>,
    /// Records whose parent is not a root, in arrival order
    orphans: Vec<NodeId>,
}

impl TaskTree {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            nodes: Vec::new(),
            roots: IndexMap::new(),
            orphans: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add one record, linking it to its parent or holding it as an orphan.
    pub fn append(&mut self, task: TaskRecord) {
        let node = NodeId(self.nodes.len());
        let parent_id = task.parent_id.clone();
        let task_id = task.task_id.clone();
        self.nodes.push(Node {
            record: task,
            children: Vec::new(),
        });

        match parent_id {
            None => {
                if self.roots.insert(task_id.clone(), node).is_some() {
                    tracing::warn!(task_id = %task_id, tasklist = %self.name, "duplicate root task replaced");
                }

                let (adopted, waiting): (Vec<NodeId>, Vec<NodeId>) = std::mem::take(&mut self.orphans)
                    .into_iter()
                    .partition(|orphan| {
                        self.nodes[orphan.0].record.parent_id.as_deref() == Some(task_id.as_str())
                    });
                self.orphans = waiting;
                self.nodes[node.0].children.extend(adopted);
            }
            Some(parent_id) => match self.roots.get(&parent_id) {
                Some(parent) => self.nodes[parent.0].children.push(node),
                None => self.orphans.push(node),
            },
        }
    }

    /// Root nodes in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.roots.values().copied()
    }

    /// Records still waiting for their parent, in arrival order.
    pub fn orphans(&self) -> &[NodeId] {
        &self.orphans
    }

    /// Rendering order: roots first, then orphans as pseudo-roots.
    pub fn top_level(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.roots().chain(self.orphans.iter().copied())
    }

    /// Look up a root by task id.
    pub fn root(&self, task_id: &str) -> Option<NodeId> {
        self.roots.get(task_id).copied()
    }

    pub fn record(&self, node: NodeId) -> &TaskRecord {
        &self.nodes[node.0].record
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Number of records reachable from the roots or held as orphans.
    ///
    /// Completed and open records count the same.
    pub fn get_open_tasks(&self) -> usize {
        self.orphans.len() + self.roots().map(|root| self.subtree_len(root)).sum::<usize>()
    }

    fn subtree_len(&self, node: NodeId) -> usize {
        1 + self
            .children(node)
            .iter()
            .map(|child| self.subtree_len(*child))
            .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty() && self.orphans.is_empty()
    }
}
