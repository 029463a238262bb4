//! Caller-closure impact analysis over a finished call graph

use crate::graph::{CallGraph, CallGraphNode, NodeId};
use crate::parser::entity_key;
use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::path::{Component, PathBuf};
use std::str::FromStr;

/// Default caller expansion depth
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// A changed function handed in by the diff stage
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangedEntity {
    pub file: PathBuf,
    pub name: String,
}

impl ChangedEntity {
    /// `./src/api.ts` and `src/api.ts` name the same entity
    pub fn new(file: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        let file: PathBuf = file.into();
        Self {
            file: file
                .components()
                .filter(|c| !matches!(c, Component::CurDir))
                .collect(),
            name: name.into(),
        }
    }

    pub fn key(&self) -> String {
        entity_key(&self.file, &self.name)
    }
}

impl FromStr for ChangedEntity {
    type Err = String;

    /// Parse `file:name`, splitting at the last `:`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once(':') {
            Some((file, name)) if !file.is_empty() && !name.is_empty() => {
                Ok(Self::new(file, name))
            }
            _ => Err(format!("expected <file>:<function>, got {:?}", s)),
        }
    }
}

/// Summary of one caller, as consumed by downstream formatting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallerInfo {
    pub file: PathBuf,
    pub line: usize,
    pub end_line: usize,
    pub name: String,
    pub code: String,
}

impl From<&CallGraphNode> for CallerInfo {
    fn from(node: &CallGraphNode) -> Self {
        Self {
            file: node.file().to_path_buf(),
            line: node.line(),
            end_line: node.end_line(),
            name: node.name().to_string(),
            code: node.code().to_string(),
        }
    }
}

/// What a change to one entity can reach through its callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityImpact {
    pub entity_name: String,
    pub file: PathBuf,
    /// Immediate callers of the entity
    pub direct_callers: Vec<CallerInfo>,
    /// Every caller within the depth bound, in first-discovery order
    pub all_callers: Vec<CallerInfo>,
    /// Distinct files of `all_callers`, in first-discovery order
    pub affected_files: Vec<PathBuf>,
}

impl EntityImpact {
    /// An impact with no callers
    pub fn empty(file: impl Into<PathBuf>, entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            file: file.into(),
            direct_callers: Vec::new(),
            all_callers: Vec::new(),
            affected_files: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.all_callers.is_empty()
    }
}

/// Read-only impact queries against a built [`CallGraph`]
pub struct ImpactAnalyzer<'g> {
    graph: &'g CallGraph,
    max_depth: usize,
}

impl<'g> ImpactAnalyzer<'g> {
    pub fn new(graph: &'g CallGraph) -> Self {
        Self::with_max_depth(graph, DEFAULT_MAX_DEPTH)
    }

    /// `max_depth = 0` reports direct callers only
    pub fn with_max_depth(graph: &'g CallGraph, max_depth: usize) -> Self {
        Self { graph, max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Impact of the entity `(file, name)`
    pub fn impact_of(&self, entity: &ChangedEntity) -> EntityImpact {
        let mut impact = EntityImpact::empty(entity.file.clone(), entity.name.clone());

        let Some(root) = self.graph.index_of(&entity.key()) else {
            return impact;
        };

        let (direct, all) = self.collect_callers(root);

        let mut files: IndexSet<PathBuf> = IndexSet::new();
        for &id in &all {
            if let Some(node) = self.graph.node_by_id(id) {
                files.insert(node.file().to_path_buf());
            }
        }

        impact.direct_callers = self.caller_infos(&direct);
        impact.all_callers = self.caller_infos(&all);
        impact.affected_files = files.into_iter().collect();
        impact
    }

    /// Impact of a `file:name` key; an unparsable key yields an empty impact
    pub fn impact_of_key(&self, key: &str) -> EntityImpact {
        match key.parse::<ChangedEntity>() {
            Ok(entity) => self.impact_of(&entity),
            Err(_) => EntityImpact::empty(PathBuf::new(), key),
        }
    }

    /// Run [`Self::impact_of`] for every changed entity, in parallel.
    ///
    /// Results come back in input order.
    pub fn analyze_changes(&self, changes: &[ChangedEntity]) -> Vec<EntityImpact> {
        changes
            .par_iter()
            .map(|entity| self.impact_of(entity))
            .collect()
    }

    /// Breadth-first walk over caller edges.
    ///
    /// A node dequeued at depth `d <= max_depth` has its callers discovered;
    /// each caller is reported once, at first discovery. The root is not
    /// pre-marked, so a genuine cycle back to it reports it exactly once.
    fn collect_callers(&self, root: NodeId) -> (Vec<NodeId>, Vec<NodeId>) {
        let mut direct = Vec::new();
        let mut all = Vec::new();
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<(NodeId, usize)> = VecDeque::new();

        queue.push_back((root, 0));

        while let Some((current, depth)) = queue.pop_front() {
            if depth > self.max_depth {
                continue;
            }

            for caller in self.graph.caller_ids(current) {
                if !visited.insert(caller) {
                    continue;
                }
                if depth == 0 {
                    direct.push(caller);
                }
                all.push(caller);
                queue.push_back((caller, depth + 1));
            }
        }

        (direct, all)
    }

    fn caller_infos(&self, ids: &[NodeId]) -> Vec<CallerInfo> {
        ids.iter()
            .filter_map(|&id| self.graph.node_by_id(id))
            .map(CallerInfo::from)
            .collect()
    }
}

/// Group impacts by the file of the changed entity. Files keep the order of
/// their first impact.
pub fn group_by_file(impacts: Vec<EntityImpact>) -> IndexMap<PathBuf, Vec<EntityImpact>> {
    let mut grouped: IndexMap<PathBuf, Vec<EntityImpact>> = IndexMap::new();
    for impact in impacts {
        grouped.entry(impact.file.clone()).or_default().push(impact);
    }
    grouped
}
