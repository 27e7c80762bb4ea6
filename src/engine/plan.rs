// src/engine/plan.rs

//! Execution planning.
//!
//! Builds the union dependency graph over every graph handed to the engine,
//! rejects cycles before anything executes, resolves run targets, and orders
//! the target closure so each task appears after all tasks it references.
//! Ties between independent tasks are broken by registration order (graph
//! order first, then order within each graph), which keeps runs reproducible.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::engine::RunSpec;
use crate::errors::{Result, StagedagError};
use crate::graph::reference::TaskKey;
use crate::graph::{Graph, Input, Task};

/// One task in the union of all graphs handed to the engine.
#[derive(Debug)]
pub(crate) struct PlanNode<'a> {
    pub graph: &'a Graph,
    pub task: &'a Task,
    pub key: TaskKey,
    /// Global indices of direct dependencies.
    pub deps: Vec<usize>,
    /// Global indices of direct dependents.
    pub dependents: Vec<usize>,
}

/// A validated, ordered execution plan for one run.
#[derive(Debug)]
pub(crate) struct ExecutionPlan<'a> {
    pub nodes: Vec<PlanNode<'a>>,
    /// Indices of the target closure, in execution order.
    pub order: Vec<usize>,
}

impl<'a> ExecutionPlan<'a> {
    pub fn build(graphs: &[&'a Graph], spec: &RunSpec) -> Result<Self> {
        let mut nodes: Vec<PlanNode<'a>> = Vec::new();
        let mut by_key: HashMap<TaskKey, usize> = HashMap::new();

        for &graph in graphs {
            for task in graph.tasks() {
                let key = graph.key_for(task.name());
                if by_key.insert(key.clone(), nodes.len()).is_some() {
                    // Same graph handed to the engine twice.
                    return Err(StagedagError::DuplicateTask {
                        graph: graph.name().to_string(),
                        task: task.name().to_string(),
                    });
                }
                nodes.push(PlanNode {
                    graph,
                    task,
                    key,
                    deps: Vec::new(),
                    dependents: Vec::new(),
                });
            }
        }

        link_edges(&mut nodes, &by_key)?;
        reject_cycles(&nodes)?;

        let roots = resolve_targets(graphs, &nodes, &by_key, spec)?;
        let closure = dependency_closure(&nodes, &roots);
        let order = topological_order(&nodes, &closure);

        debug!(
            tasks = nodes.len(),
            targets = roots.len(),
            closure = order.len(),
            "execution plan built"
        );

        Ok(Self { nodes, order })
    }
}

/// Wire dependency edges from every upstream input.
///
/// A reference whose target is not part of this run (a name that was never
/// registered, or a handle into a graph that was not handed to the engine)
/// fails here, before anything executes.
fn link_edges(nodes: &mut [PlanNode<'_>], by_key: &HashMap<TaskKey, usize>) -> Result<()> {
    let mut edges: Vec<(usize, usize)> = Vec::new();

    for (idx, node) in nodes.iter().enumerate() {
        for (_, input) in node.task.inputs().iter() {
            let (key, graph_name, task_name) = match input {
                Input::Upstream(dep) => (
                    dep.key(),
                    dep.graph_name().to_string(),
                    dep.task_name().to_string(),
                ),
                Input::UpstreamNamed(name) => (
                    node.graph.key_for(name),
                    node.graph.name().to_string(),
                    name.clone(),
                ),
                Input::Literal(_) | Input::List(_) => continue,
            };

            match by_key.get(&key) {
                Some(&dep_idx) => edges.push((idx, dep_idx)),
                None => {
                    return Err(StagedagError::TaskNotFound {
                        graph: graph_name,
                        task: task_name,
                    });
                }
            }
        }
    }

    for (idx, dep_idx) in edges {
        if !nodes[idx].deps.contains(&dep_idx) {
            nodes[idx].deps.push(dep_idx);
            nodes[dep_idx].dependents.push(idx);
        }
    }

    Ok(())
}

/// Reject cyclic dependency structures before any task runs.
///
/// A valid run order exists iff every strongly connected component is a
/// single task without a self-edge; the error names the offending tasks.
fn reject_cycles(nodes: &[PlanNode<'_>]) -> Result<()> {
    let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();

    for idx in 0..nodes.len() {
        graph.add_node(idx);
    }
    for (idx, node) in nodes.iter().enumerate() {
        if node.deps.contains(&idx) {
            let name = display_name(&nodes[idx]);
            return Err(StagedagError::CycleDetected(format!("{name} -> {name}")));
        }
        for &dep in &node.deps {
            graph.add_edge(dep, idx, ());
        }
    }

    for component in tarjan_scc(&graph) {
        if component.len() > 1 {
            let mut names: Vec<String> = component
                .iter()
                .map(|&idx| display_name(&nodes[idx]))
                .collect();
            names.sort();
            return Err(StagedagError::CycleDetected(names.join(" -> ")));
        }
    }

    Ok(())
}

/// Resolve the run spec into a set of root task indices.
fn resolve_targets(
    graphs: &[&Graph],
    nodes: &[PlanNode<'_>],
    by_key: &HashMap<TaskKey, usize>,
    spec: &RunSpec,
) -> Result<Vec<usize>> {
    if spec.everything {
        return Ok((0..nodes.len()).collect());
    }

    if spec.targets.is_empty() {
        return Ok(default_targets(graphs, nodes, by_key));
    }

    let mut roots = Vec::new();
    for target in &spec.targets {
        let mut matches: Vec<usize> = Vec::new();
        for graph in graphs {
            // Within a graph, a declared output wins over a task that
            // happens to share its name.
            if let Some(task) = graph.outputs().get(target) {
                matches.push(by_key[&graph.key_for(task)]);
            } else if graph.task_index(target).is_some() {
                matches.push(by_key[&graph.key_for(target)]);
            }
        }
        matches.sort_unstable();
        matches.dedup();

        match matches.len() {
            0 => return Err(StagedagError::UnknownTarget(target.clone())),
            1 => roots.push(matches[0]),
            _ => {
                return Err(StagedagError::AmbiguousTarget {
                    target: target.clone(),
                    matches: matches
                        .iter()
                        .map(|&idx| display_name(&nodes[idx]))
                        .collect(),
                });
            }
        }
    }

    roots.sort_unstable();
    roots.dedup();
    Ok(roots)
}

/// Default target set: every terminal task plus every declared output.
fn default_targets(
    graphs: &[&Graph],
    nodes: &[PlanNode<'_>],
    by_key: &HashMap<TaskKey, usize>,
) -> Vec<usize> {
    let mut roots: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.dependents.is_empty())
        .map(|(idx, _)| idx)
        .collect();

    for graph in graphs {
        for task in graph.outputs().values() {
            roots.push(by_key[&graph.key_for(task)]);
        }
    }

    roots.sort_unstable();
    roots.dedup();
    roots
}

/// All tasks transitively required to build the roots.
fn dependency_closure(nodes: &[PlanNode<'_>], roots: &[usize]) -> HashSet<usize> {
    let mut closure: HashSet<usize> = HashSet::new();
    let mut stack: Vec<usize> = roots.to_vec();

    while let Some(idx) = stack.pop() {
        if closure.insert(idx) {
            stack.extend(nodes[idx].deps.iter().copied());
        }
    }

    closure
}

/// Kahn's algorithm over the closure, always picking the smallest global
/// index among the ready tasks.
///
/// Dependencies of a closure member are themselves closure members, so the
/// full dependency count is the correct in-degree; dependents outside the
/// closure are simply not tracked.
fn topological_order(nodes: &[PlanNode<'_>], closure: &HashSet<usize>) -> Vec<usize> {
    let mut indegree: HashMap<usize, usize> = closure
        .iter()
        .map(|&idx| (idx, nodes[idx].deps.len()))
        .collect();

    let mut ready: BinaryHeap<Reverse<usize>> = BinaryHeap::new();
    for (&idx, &count) in &indegree {
        if count == 0 {
            ready.push(Reverse(idx));
        }
    }

    let mut order = Vec::with_capacity(closure.len());
    while let Some(Reverse(idx)) = ready.pop() {
        order.push(idx);
        for &dependent in &nodes[idx].dependents {
            if let Some(count) = indegree.get_mut(&dependent) {
                *count -= 1;
                if *count == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }
    }

    order
}

fn display_name(node: &PlanNode<'_>) -> String {
    format!("{}:{}", node.graph.name(), node.task.name())
}
