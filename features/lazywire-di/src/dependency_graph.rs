use std::{
    any::TypeId,
    collections::{BTreeMap, HashSet},
};

use thiserror::Error;

use crate::{
    registry::Binding,
    types::{DependencyInfo, TypeInfo},
};

/// Graph of all registered types and what they depend on
///
/// Used to check missing and circular dependencies up front, without
/// constructing anything, and enables visualization of the container.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    map: BTreeMap<TypeInfo, DependencyGraphEntry>,
}
impl DependencyGraph {
    pub(crate) fn from_bindings<'a>(bindings: impl Iterator<Item = &'a Binding>) -> Self {
        let mut graph = Self::default();
        for binding in bindings {
            graph.map.insert(
                binding.info,
                DependencyGraphEntry {
                    info: binding.info,
                    dependencies: binding.dependencies.clone(),
                },
            );
        }
        graph
    }

    /// Declared dependencies of `info`, `None` if the type is not registered
    pub fn dependencies_of(&self, info: TypeInfo) -> Option<&[DependencyInfo]> {
        self.map
            .get(&info)
            .map(|entry| entry.dependencies.as_slice())
    }

    /// All registered types
    pub fn types(&self) -> impl Iterator<Item = TypeInfo> + '_ {
        self.map.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Validate the graph
    ///
    /// Returns a list of all issues
    pub fn check(&self) -> Result<(), DependencyGraphErrors> {
        let mut checked = HashSet::new();
        let mut errors = Vec::new();
        for entry in self.map.values() {
            let mut dependency_chain = Vec::new();
            check_recurse(
                self,
                &mut checked,
                &mut errors,
                &mut dependency_chain,
                entry,
            );
        }

        if !errors.is_empty() {
            return Err(DependencyGraphErrors { errors });
        }

        return Ok(());

        fn check_recurse(
            graph: &DependencyGraph,
            checked: &mut HashSet<TypeId>,
            errors: &mut Vec<DependencyGraphError>,
            dependency_chain: &mut Vec<TypeInfo>,
            entry: &DependencyGraphEntry,
        ) {
            // Circular Dependency Check
            if let Some(start) = dependency_chain.iter().position(|info| *info == entry.info) {
                let mut chain = dependency_chain[start..].to_vec();
                chain.push(entry.info); // Add current so chain is complete

                errors.push(DependencyGraphError::CircularDependency {
                    from: entry.info,
                    to: dependency_chain[dependency_chain.len() - 1],
                    chain,
                });
                return;
            }

            // Skip other checks if already checked
            if !checked.insert(entry.info.type_id) {
                return;
            };

            dependency_chain.push(entry.info);

            for dependency in &entry.dependencies {
                let Some(next_entry) = graph.map.get(&dependency.type_info) else {
                    if !dependency.optional {
                        errors.push(DependencyGraphError::MissingDependency {
                            dependency: dependency.type_info,
                            required_by: entry.info,
                        });
                    }

                    continue;
                };

                if dependency.lazy {
                    // Don't recurse, this will be checked by itself
                    continue;
                }

                check_recurse(graph, checked, errors, dependency_chain, next_entry);
            }

            dependency_chain.pop();
        }
    }
}

impl std::fmt::Display for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for entry in self.map.values() {
            write!(f, "{}", entry.info)?;
            let mut separator = " <- ";
            for dependency in &entry.dependencies {
                f.write_str(separator)?;
                separator = ", ";
                write!(f, "{}", dependency.type_info)?;
                match (dependency.optional, dependency.lazy) {
                    (true, true) => f.write_str(" (optional, lazy)")?,
                    (true, false) => f.write_str(" (optional)")?,
                    (false, true) => f.write_str(" (lazy)")?,
                    (false, false) => {}
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct DependencyGraphEntry {
    info: TypeInfo,
    dependencies: Vec<DependencyInfo>,
}

#[derive(Error, Debug, Clone)]
pub enum DependencyGraphError {
    #[error("'{required_by}' needs '{dependency}' but it is missing")]
    MissingDependency {
        dependency: TypeInfo,
        required_by: TypeInfo,
    },
    #[error("A Circular Dependency exists between '{from}' and '{to}' through {chain:?} - Consider using `Lazy`")]
    CircularDependency {
        from: TypeInfo,
        to: TypeInfo,
        chain: Vec<TypeInfo>,
    },
}
impl std::fmt::Display for DependencyGraphErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut display = Vec::new();
        display.push("The dependency graph had one or more errors:".to_string());
        for error in &self.errors {
            display.push(format!("- {}", error));
        }
        f.write_str(&display.join("\n"))
    }
}

#[derive(Error, Debug, Clone)]
pub struct DependencyGraphErrors {
    pub errors: Vec<DependencyGraphError>,
}
