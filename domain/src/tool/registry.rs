//! Tool registry: the immutable catalog of every tool.
//!
//! The catalog is assembled once at start-up from per-domain descriptor
//! sets through a [`ToolRegistryBuilder`], then frozen with
//! [`ToolRegistryBuilder::build`]. After that it is read-only and can be
//! shared across tasks behind an `Arc` without any locking.
//!
//! # Name uniqueness
//!
//! Names are unique across the whole catalog, not per domain. Registering a
//! name twice fails with [`DomainError::DuplicateToolName`] whichever domain
//! the second descriptor comes from, so two domains can never silently
//! shadow each other. Because nothing is ever overwritten, the resulting map
//! does not depend on the order the domains were merged in.

use std::collections::{BTreeMap, HashMap};

use super::entities::ToolDescriptor;
use crate::core::error::DomainError;

/// Mutable accumulator for a [`ToolRegistry`].
#[derive(Debug, Default)]
pub struct ToolRegistryBuilder {
    tools: HashMap<String, ToolDescriptor>,
}

impl ToolRegistryBuilder {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register one descriptor.
    ///
    /// Fails on a duplicate name (against everything registered so far) or
    /// on a schema that violates its own invariants. On failure the builder
    /// is consumed: a catalog with an ambiguous namespace is never built.
    pub fn register(mut self, descriptor: ToolDescriptor) -> Result<Self, DomainError> {
        descriptor.schema().check(descriptor.name())?;

        if let Some(existing) = self.tools.get(descriptor.name()) {
            return Err(DomainError::DuplicateToolName {
                name: descriptor.name().to_string(),
                existing_domain: existing.domain().to_string(),
                rejected_domain: descriptor.domain().to_string(),
            });
        }

        self.tools
            .insert(descriptor.name().to_string(), descriptor);
        Ok(self)
    }

    /// Register a whole descriptor set (typically one domain's catalog)
    pub fn register_all(
        self,
        descriptors: impl IntoIterator<Item = ToolDescriptor>,
    ) -> Result<Self, DomainError> {
        descriptors
            .into_iter()
            .try_fold(self, |builder, descriptor| builder.register(descriptor))
    }

    /// Freeze the catalog
    pub fn build(self) -> ToolRegistry {
        ToolRegistry { tools: self.tools }
    }
}

/// Read-only catalog of tools, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolDescriptor>,
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::new()
    }

    /// Look up a tool by exact name; `None` means "tool not found"
    pub fn lookup(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values()
    }

    /// Tool names in lexical order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Tools of one domain, sorted by name
    pub fn by_domain(&self, domain: &str) -> Vec<&ToolDescriptor> {
        let mut tools: Vec<&ToolDescriptor> =
            self.tools.values().filter(|t| t.domain() == domain).collect();
        tools.sort_by(|a, b| a.name().cmp(b.name()));
        tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get statistics about registered tools
    pub fn stats(&self) -> RegistryStats {
        let mut tools_per_domain = BTreeMap::new();
        for tool in self.tools.values() {
            *tools_per_domain.entry(tool.domain().to_string()).or_insert(0) += 1;
        }

        RegistryStats {
            total_tools: self.tools.len(),
            mutating_tools: self
                .tools
                .values()
                .filter(|t| t.definition().is_mutating())
                .count(),
            tools_per_domain,
        }
    }
}

/// Statistics about the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    pub total_tools: usize,
    pub mutating_tools: usize,
    pub tools_per_domain: BTreeMap<String, usize>,
}
