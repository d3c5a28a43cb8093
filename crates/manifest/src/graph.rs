//! Generic dependency-ordered topological sort.
//!
//! Shared by manifest validation (which only needs to know the graph is
//! acyclic and fully resolved) and the orchestrator's lifecycle driver
//! (which needs the concrete visit order). Kept as a free function over
//! `(name, deps)` pairs rather than tied to `Node` so both call sites share
//! one cycle-detection implementation.

use crate::ManifestError;
use std::collections::HashMap;

/// Depth-first post-order traversal: every node appears after all of its
/// dependencies. Tie-breaking among independent nodes follows `nodes`'
/// iteration order, not insertion into any map.
pub fn topo_order(nodes: &[(String, Vec<String>)]) -> Result<Vec<String>, ManifestError> {
    let deps_by_name: HashMap<&str, &[String]> = nodes
        .iter()
        .map(|(name, deps)| (name.as_str(), deps.as_slice()))
        .collect();

    let mut sorted = Vec::with_capacity(nodes.len());
    let mut visited: HashMap<&str, bool> = HashMap::new();
    let mut on_stack: HashMap<&str, bool> = HashMap::new();

    fn visit<'a>(
        name: &'a str,
        deps_by_name: &HashMap<&'a str, &'a [String]>,
        visited: &mut HashMap<&'a str, bool>,
        on_stack: &mut HashMap<&'a str, bool>,
        sorted: &mut Vec<String>,
    ) -> Result<(), ManifestError> {
        let deps = *deps_by_name
            .get(name)
            .ok_or_else(|| ManifestError::UndefinedDependency(name.to_string(), name.to_string()))?;

        if *on_stack.get(name).unwrap_or(&false) {
            return Err(ManifestError::DependencyCycle(name.to_string()));
        }
        if *visited.get(name).unwrap_or(&false) {
            return Ok(());
        }

        visited.insert(name, true);
        on_stack.insert(name, true);

        for dep in deps {
            if !deps_by_name.contains_key(dep.as_str()) {
                return Err(ManifestError::UndefinedDependency(name.to_string(), dep.clone()));
            }
            visit(dep, deps_by_name, visited, on_stack, sorted)?;
        }

        on_stack.insert(name, false);
        sorted.push(name.to_string());
        Ok(())
    }

    for (name, _) in nodes {
        visit(name, &deps_by_name, &mut visited, &mut on_stack, &mut sorted)?;
    }

    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(name: &str, deps: &[&str]) -> (String, Vec<String>) {
        (name.to_string(), deps.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn linear_chain_sorts_dependencies_first() {
        let nodes = vec![pair("api", &["db"]), pair("db", &[])];
        let order = topo_order(&nodes).unwrap();
        assert_eq!(order, vec!["db".to_string(), "api".to_string()]);
    }

    #[test]
    fn independent_nodes_keep_input_order() {
        let nodes = vec![pair("a", &[]), pair("b", &[]), pair("c", &[])];
        let order = topo_order(&nodes).unwrap();
        assert_eq!(order, vec!["a".to_string(), "b".to_string(), "c".to_string()]);
    }

    #[test]
    fn cycle_is_reported_by_name() {
        let nodes = vec![pair("a", &["b"]), pair("b", &["a"])];
        let err = topo_order(&nodes).unwrap_err();
        match err {
            ManifestError::DependencyCycle(name) => assert!(name == "a" || name == "b"),
            other => panic!("expected DependencyCycle, got {other:?}"),
        }
    }

    #[test]
    fn missing_dependency_is_named() {
        let nodes = vec![pair("api", &["ghost"])];
        let err = topo_order(&nodes).unwrap_err();
        assert_eq!(err, ManifestError::UndefinedDependency("api".into(), "ghost".into()));
    }

    #[test]
    fn diamond_dependency_sorts_once() {
        // a depends on b and c; b and c both depend on d.
        let nodes = vec![
            pair("a", &["b", "c"]),
            pair("b", &["d"]),
            pair("c", &["d"]),
            pair("d", &[]),
        ];
        let order = topo_order(&nodes).unwrap();
        assert_eq!(order.len(), 4);
        let pos = |n: &str| order.iter().position(|x| x == n).unwrap();
        assert!(pos("d") < pos("b"));
        assert!(pos("d") < pos("c"));
        assert!(pos("b") < pos("a"));
        assert!(pos("c") < pos("a"));
    }
}
