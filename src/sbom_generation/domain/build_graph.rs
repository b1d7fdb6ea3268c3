use super::{CmdRecord, FileNode, NodeId, TreeLocation};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// How an edge was discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Declared in the artifact's `.cmd` file
    Declared,
    /// Not recorded by kbuild (`.incbin` directive or known Kbuild internals)
    Implicit,
}

/// Directed edge from an artifact to one of its inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyEdge {
    pub artifact: NodeId,
    pub input: NodeId,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    Unvisited,
    InProgress,
    Done,
}

struct Frame {
    id: NodeId,
    successors: Vec<NodeId>,
    next: usize,
}

/// BuildGraph aggregate: the cmd graph reachable from the roots
///
/// Nodes live in an insertion-ordered arena keyed by canonical path, so
/// each path maps to exactly one NodeId and iteration order is the
/// discovery order.
#[derive(Debug, Clone, Default)]
pub struct BuildGraph {
    nodes: IndexMap<PathBuf, FileNode>,
    roots: Vec<NodeId>,
}

impl BuildGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node for `path`, creating it if needed.
    /// The flag is true when the node was newly created.
    pub fn intern(&mut self, path: PathBuf, location: TreeLocation) -> (NodeId, bool) {
        if let Some(index) = self.nodes.get_index_of(&path) {
            return (NodeId::new(index), false);
        }
        let (index, _) = self
            .nodes
            .insert_full(path.clone(), FileNode::new(path, location));
        (NodeId::new(index), true)
    }

    pub fn add_root(&mut self, id: NodeId) {
        if !self.roots.contains(&id) {
            self.roots.push(id);
        }
    }

    pub fn record_metadata(&mut self, id: NodeId, exists: bool, cmd: Option<CmdRecord>) {
        if let Some((_, node)) = self.nodes.get_index_mut(id.index()) {
            node.set_metadata(exists, cmd);
        }
    }

    /// Adds a declared edge; self edges are ignored
    pub fn add_input(&mut self, artifact: NodeId, input: NodeId) -> bool {
        if artifact == input {
            return false;
        }
        match self.nodes.get_index_mut(artifact.index()) {
            Some((_, node)) => node.inputs_mut().insert(input),
            None => false,
        }
    }

    /// Adds an implicit edge; self edges are ignored
    pub fn add_implicit_dependency(&mut self, artifact: NodeId, dependency: NodeId) -> bool {
        if artifact == dependency {
            return false;
        }
        match self.nodes.get_index_mut(artifact.index()) {
            Some((_, node)) => node.implicit_dependencies_mut().insert(dependency),
            None => false,
        }
    }

    /// Adds an implicit edge found in an `.incbin` directive; statements
    /// naming the same file are joined line by line
    pub fn add_incbin_dependency(
        &mut self,
        artifact: NodeId,
        dependency: NodeId,
        statement: String,
    ) -> bool {
        if artifact == dependency {
            return false;
        }
        let Some((_, node)) = self.nodes.get_index_mut(artifact.index()) else {
            return false;
        };
        node.incbin_statements_mut()
            .entry(dependency)
            .and_modify(|existing| {
                existing.push('\n');
                existing.push_str(&statement);
            })
            .or_insert_with(|| statement.clone());
        node.implicit_dependencies_mut().insert(dependency)
    }

    /// # Panics
    /// Panics if `id` was not produced by this graph.
    pub fn node(&self, id: NodeId) -> &FileNode {
        &self.nodes[id.index()]
    }

    pub fn id_of(&self, path: &Path) -> Option<NodeId> {
        self.nodes.get_index_of(path).map(NodeId::new)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &FileNode)> {
        self.nodes
            .values()
            .enumerate()
            .map(|(index, node)| (NodeId::new(index), node))
    }

    pub fn edges(&self) -> impl Iterator<Item = DependencyEdge> + '_ {
        self.iter().flat_map(|(artifact, node)| {
            let declared = node.inputs().iter().map(move |&input| DependencyEdge {
                artifact,
                input,
                kind: EdgeKind::Declared,
            });
            let implicit = node
                .implicit_dependencies()
                .iter()
                .map(move |&input| DependencyEdge {
                    artifact,
                    input,
                    kind: EdgeKind::Implicit,
                });
            declared.chain(implicit)
        })
    }

    pub fn edge_count(&self) -> usize {
        self.nodes
            .values()
            .map(|node| node.inputs().len() + node.implicit_dependencies().len())
            .sum()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.values().filter(|node| node.is_leaf()).count()
    }

    /// Declared inputs followed by implicit dependencies
    pub fn successors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let node = self.node(id);
        node.inputs()
            .iter()
            .chain(node.implicit_dependencies().iter())
            .copied()
    }

    /// Searches for a cycle with an iterative depth-first walk.
    ///
    /// Returns the offending chain, starting and ending with the same node.
    pub fn find_cycle(&self) -> Option<Vec<NodeId>> {
        let mut state = vec![NodeState::Unvisited; self.nodes.len()];

        let starts = self
            .roots
            .iter()
            .copied()
            .chain((0..self.nodes.len()).map(NodeId::new));

        for start in starts {
            if state[start.index()] != NodeState::Unvisited {
                continue;
            }
            state[start.index()] = NodeState::InProgress;
            let mut stack = vec![Frame {
                id: start,
                successors: self.successors(start).collect(),
                next: 0,
            }];

            while let Some(frame) = stack.last_mut() {
                let Some(&child) = frame.successors.get(frame.next) else {
                    state[frame.id.index()] = NodeState::Done;
                    stack.pop();
                    continue;
                };
                frame.next += 1;

                match state[child.index()] {
                    NodeState::Unvisited => {
                        state[child.index()] = NodeState::InProgress;
                        stack.push(Frame {
                            id: child,
                            successors: self.successors(child).collect(),
                            next: 0,
                        });
                    }
                    NodeState::InProgress => {
                        let start_index = stack
                            .iter()
                            .position(|frame| frame.id == child)
                            .unwrap_or(0);
                        let mut chain: Vec<NodeId> =
                            stack[start_index..].iter().map(|frame| frame.id).collect();
                        chain.push(child);
                        return Some(chain);
                    }
                    NodeState::Done => {}
                }
            }
        }

        None
    }

    /// Renders a chain of nodes as `a -> b -> a`
    pub fn format_chain(&self, chain: &[NodeId]) -> String {
        chain
            .iter()
            .map(|&id| self.node(id).path().display().to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(paths: &[&str]) -> (BuildGraph, Vec<NodeId>) {
        let mut graph = BuildGraph::new();
        let ids = paths
            .iter()
            .map(|p| graph.intern(PathBuf::from(p), TreeLocation::Output).0)
            .collect();
        (graph, ids)
    }

    #[test]
    fn test_intern_deduplicates_by_path() {
        let mut graph = BuildGraph::new();
        let (first, created) = graph.intern(PathBuf::from("/out/b.o"), TreeLocation::Output);
        assert!(created);
        let (second, created) = graph.intern(PathBuf::from("/out/b.o"), TreeLocation::Output);
        assert!(!created);
        assert_eq!(first, second);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.id_of(Path::new("/out/b.o")), Some(first));
    }

    #[test]
    fn test_edges_are_deduplicated_and_self_edges_ignored() {
        let (mut graph, ids) = graph_with(&["/out/a.out", "/out/b.o"]);
        assert!(graph.add_input(ids[0], ids[1]));
        assert!(!graph.add_input(ids[0], ids[1]));
        assert!(!graph.add_input(ids[0], ids[0]));
        assert_eq!(graph.edge_count(), 1);

        let edges: Vec<DependencyEdge> = graph.edges().collect();
        assert_eq!(
            edges,
            vec![DependencyEdge {
                artifact: ids[0],
                input: ids[1],
                kind: EdgeKind::Declared
            }]
        );
    }

    #[test]
    fn test_incbin_and_hardcoded_dependencies_are_told_apart() {
        let (mut graph, ids) = graph_with(&["/src/configs.S", "/out/config_data.gz", "/out/bounds.s"]);
        assert!(graph.add_incbin_dependency(
            ids[0],
            ids[1],
            ".incbin \"kernel/config_data.gz\"".to_string()
        ));
        assert!(graph.add_implicit_dependency(ids[0], ids[2]));
        assert!(!graph.add_incbin_dependency(ids[0], ids[0], ".incbin \"x\"".to_string()));

        let node = graph.node(ids[0]);
        assert_eq!(
            node.incbin_dependencies().get(&ids[1]).map(String::as_str),
            Some(".incbin \"kernel/config_data.gz\"")
        );
        assert_eq!(node.hardcoded_dependencies().collect::<Vec<_>>(), vec![ids[2]]);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.edges().all(|edge| edge.kind == EdgeKind::Implicit));
    }

    #[test]
    fn test_find_cycle_on_dag_with_diamond() {
        let (mut graph, ids) = graph_with(&["/out/a", "/out/b", "/out/c", "/out/d"]);
        graph.add_root(ids[0]);
        graph.add_input(ids[0], ids[1]);
        graph.add_input(ids[0], ids[2]);
        graph.add_input(ids[1], ids[3]);
        graph.add_input(ids[2], ids[3]);

        assert!(graph.find_cycle().is_none());
    }

    #[test]
    fn test_find_cycle_reports_chain() {
        let (mut graph, ids) = graph_with(&["/out/a", "/out/b", "/out/c"]);
        graph.add_root(ids[0]);
        graph.add_input(ids[0], ids[1]);
        graph.add_input(ids[1], ids[2]);
        graph.add_implicit_dependency(ids[2], ids[1]);

        let chain = graph.find_cycle().unwrap();
        assert_eq!(chain, vec![ids[1], ids[2], ids[1]]);
        assert_eq!(graph.format_chain(&chain), "/out/b -> /out/c -> /out/b");
    }

    #[test]
    fn test_leaf_count_and_roots() {
        let (mut graph, ids) = graph_with(&["/out/a", "/out/b"]);
        graph.add_root(ids[0]);
        graph.add_root(ids[0]);
        graph.record_metadata(
            ids[0],
            true,
            Some(CmdRecord::new(
                PathBuf::from("/out/a"),
                "ld -o a b".to_string(),
                vec![PathBuf::from("/out/b")],
                Some("ld".to_string()),
            )),
        );

        assert_eq!(graph.roots(), &[ids[0]]);
        assert_eq!(graph.leaf_count(), 1);
        assert!(graph.node(ids[0]).exists());
    }
}
