// src/tasks/graph.rs

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::config::ConfigFile;
use crate::errors::{Result, SitepipeError};
use crate::types::AssetClass;

use super::BuildTask;

/// Built-in build tasks plus the `[alias]` composites over them.
///
/// Edge direction: alias -> member.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl TaskGraph {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self::from_aliases(cfg.aliases().iter())
    }

    pub fn from_aliases<'a, I>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a Vec<String>)>,
    {
        let mut tg = Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
        };

        for class in AssetClass::ALL {
            tg.node(class.task_name());
        }

        for (name, members) in aliases {
            let from = tg.node(name);
            for member in members {
                let to = tg.node(member);
                tg.graph.add_edge(from, to, ());
            }
        }

        tg
    }

    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(idx) = self.index.get(name) {
            return *idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Direct members of an alias in declared order; empty for built-ins.
    pub fn members_of(&self, name: &str) -> Vec<&str> {
        let Some(idx) = self.index.get(name) else {
            return Vec::new();
        };
        // petgraph yields the most recently added edge first.
        let mut members: Vec<&str> = self
            .graph
            .neighbors_directed(*idx, Direction::Outgoing)
            .map(|n| self.graph[n].as_str())
            .collect();
        members.reverse();
        members
    }

    /// Expand `name` into the build tasks it runs, depth-first in declared
    /// order. A task reachable twice runs once, at its first position.
    pub fn resolve(&self, name: &str) -> Result<Vec<BuildTask>> {
        if !self.contains(name) {
            return Err(SitepipeError::TaskNotFound(name.to_string()));
        }

        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut visiting = HashSet::new();
        self.expand(name, &mut out, &mut seen, &mut visiting)?;
        Ok(out)
    }

    fn expand<'a>(
        &'a self,
        name: &'a str,
        out: &mut Vec<BuildTask>,
        seen: &mut HashSet<AssetClass>,
        visiting: &mut HashSet<&'a str>,
    ) -> Result<()> {
        if let Some(class) = AssetClass::from_task_name(name) {
            if seen.insert(class) {
                out.push(BuildTask::new(class));
            }
            return Ok(());
        }

        if !visiting.insert(name) {
            return Err(SitepipeError::TaskCycle(format!(
                "cycle detected in [alias] involving '{}'",
                name
            )));
        }
        for member in self.members_of(name) {
            self.expand(member, out, seen, visiting)?;
        }
        visiting.remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn graph(entries: &[(&str, &[&str])]) -> TaskGraph {
        let aliases: BTreeMap<String, Vec<String>> = entries
            .iter()
            .map(|(n, m)| (n.to_string(), m.iter().map(|s| s.to_string()).collect()))
            .collect();
        TaskGraph::from_aliases(aliases.iter())
    }

    fn classes(tasks: &[BuildTask]) -> Vec<AssetClass> {
        tasks.iter().map(|t| t.class).collect()
    }

    #[test]
    fn builtin_resolves_to_itself() {
        let g = graph(&[]);
        assert_eq!(classes(&g.resolve("images").unwrap()), vec![AssetClass::Image]);
    }

    #[test]
    fn nested_aliases_keep_order_and_dedupe() {
        let g = graph(&[
            ("assets", &["images", "styles"]),
            ("default", &["styles", "scripts", "assets", "templates"]),
        ]);
        assert_eq!(
            classes(&g.resolve("default").unwrap()),
            vec![
                AssetClass::Style,
                AssetClass::Script,
                AssetClass::Image,
                AssetClass::Template
            ]
        );
        assert_eq!(g.members_of("assets"), vec!["images", "styles"]);
    }

    #[test]
    fn unknown_task() {
        let g = graph(&[]);
        assert!(matches!(g.resolve("deploy"), Err(SitepipeError::TaskNotFound(_))));
    }

    #[test]
    fn cycle_is_reported() {
        let g = graph(&[("a", &["b"]), ("b", &["a"])]);
        assert!(matches!(g.resolve("a"), Err(SitepipeError::TaskCycle(_))));
    }
}
