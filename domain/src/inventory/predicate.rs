//! Resource predicates used to filter a listing.

use serde::{Deserialize, Serialize};

use super::resource::ListedResource;

/// Declarative filter over [`ListedResource`]s
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "match", rename_all = "snake_case")]
pub enum ResourcePredicate {
    /// The resource carries a tag with this key (any value)
    HasTag { key: String },
    /// The resource carries `key = value`
    TagEquals { key: String, value: String },
    /// The resource's state is one of these
    StateIn { states: Vec<String> },
    /// The resource's state is none of these (a missing state passes)
    StateNotIn { states: Vec<String> },
    /// Every inner predicate holds
    All { predicates: Vec<ResourcePredicate> },
}

impl ResourcePredicate {
    pub fn has_tag(key: impl Into<String>) -> Self {
        ResourcePredicate::HasTag { key: key.into() }
    }

    /// Resources that still exist (not terminated or deleted)
    pub fn active() -> Self {
        ResourcePredicate::StateNotIn {
            states: vec!["terminated".to_string(), "deleted".to_string()],
        }
    }

    pub fn and(self, other: ResourcePredicate) -> Self {
        match self {
            ResourcePredicate::All { mut predicates } => {
                predicates.push(other);
                ResourcePredicate::All { predicates }
            }
            first => ResourcePredicate::All {
                predicates: vec![first, other],
            },
        }
    }

    pub fn matches(&self, resource: &ListedResource) -> bool {
        match self {
            ResourcePredicate::HasTag { key } => resource.tags.contains_key(key),
            ResourcePredicate::TagEquals { key, value } => {
                resource.tags.get(key).is_some_and(|v| v == value)
            }
            ResourcePredicate::StateIn { states } => resource
                .state
                .as_ref()
                .is_some_and(|s| states.iter().any(|x| x == s)),
            ResourcePredicate::StateNotIn { states } => resource
                .state
                .as_ref()
                .is_none_or(|s| !states.iter().any(|x| x == s)),
            ResourcePredicate::All { predicates } => predicates.iter().all(|p| p.matches(resource)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_tag_ignores_value() {
        let tagged = ListedResource::new("i-1").with_tag("Environment", "");
        let untagged = ListedResource::new("i-2").with_tag("Name", "web");

        let predicate = ResourcePredicate::has_tag("Environment");
        assert!(predicate.matches(&tagged));
        assert!(!predicate.matches(&untagged));
    }

    #[test]
    fn test_tag_equals() {
        let prod = ListedResource::new("i-1").with_tag("Environment", "prod");
        let predicate = ResourcePredicate::TagEquals {
            key: "Environment".to_string(),
            value: "dev".to_string(),
        };
        assert!(!predicate.matches(&prod));
    }

    #[test]
    fn test_active_excludes_terminated() {
        let active = ResourcePredicate::active();
        assert!(active.matches(&ListedResource::new("i-1").with_state("running")));
        assert!(active.matches(&ListedResource::new("t-1")));
        assert!(!active.matches(&ListedResource::new("i-2").with_state("terminated")));
    }

    #[test]
    fn test_and_combines() {
        let predicate = ResourcePredicate::active().and(ResourcePredicate::has_tag("Environment"));
        let resource = ListedResource::new("i-1")
            .with_state("terminated")
            .with_tag("Environment", "prod");
        assert!(!predicate.matches(&resource));

        let three = predicate.and(ResourcePredicate::has_tag("Owner"));
        assert!(matches!(three, ResourcePredicate::All { ref predicates } if predicates.len() == 3));
    }

    #[test]
    fn test_state_in() {
        let predicate = ResourcePredicate::StateIn {
            states: vec!["running".to_string(), "stopped".to_string()],
        };
        assert!(predicate.matches(&ListedResource::new("i-1").with_state("stopped")));
        assert!(!predicate.matches(&ListedResource::new("i-2")));
    }
}
