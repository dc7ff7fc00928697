//! Declarative parameter normalization.
//!
//! A [`ParameterMapping`] turns the generic, flat field names a caller sends
//! into the shape a domain adapter expects. Rules are data, applied in
//! declaration order to an already validated bag; fields no rule names pass
//! through unchanged.
//!
//! ```text
//! {billing_mode: PROVISIONED, read_capacity_units: 5, write_capacity_units: 5}
//!   ── Group{target: provisioned_throughput, gate: billing_mode == PROVISIONED} ──▶
//! {billing_mode: PROVISIONED, provisioned_throughput: {read: 5, write: 5}}
//! ```
//!
//! When a group's gate does not hold, its members are removed entirely
//! rather than forwarded as null or empty values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Condition that opens a [`MappingRule::Group`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub field: String,
    pub equals: Value,
}

impl Gate {
    pub fn new(field: impl Into<String>, equals: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            equals: equals.into(),
        }
    }

    fn holds(&self, params: &Map<String, Value>) -> bool {
        params.get(&self.field) == Some(&self.equals)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRename {
    pub from: String,
    pub to: String,
}

/// One normalization step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum MappingRule {
    Rename {
        from: String,
        to: String,
    },
    /// Gather flat fields into one nested object under `target`
    Group {
        target: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gate: Option<Gate>,
        members: Vec<FieldRename>,
    },
    /// Remove a caller-side field before the call
    Drop {
        field: String,
    },
}

/// Ordered normalization rules owned by one tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterMapping {
    rules: Vec<MappingRule>,
}

impl ParameterMapping {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.rules.push(MappingRule::Rename {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    pub fn group<I, F, T>(mut self, target: impl Into<String>, gate: Option<Gate>, members: I) -> Self
    where
        I: IntoIterator<Item = (F, T)>,
        F: Into<String>,
        T: Into<String>,
    {
        self.rules.push(MappingRule::Group {
            target: target.into(),
            gate,
            members: members
                .into_iter()
                .map(|(from, to)| FieldRename {
                    from: from.into(),
                    to: to.into(),
                })
                .collect(),
        });
        self
    }

    pub fn drop_field(mut self, field: impl Into<String>) -> Self {
        self.rules.push(MappingRule::Drop {
            field: field.into(),
        });
        self
    }

    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }

    pub fn is_identity(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule in order and return the normalized bag
    pub fn apply(&self, mut params: Map<String, Value>) -> Map<String, Value> {
        for rule in &self.rules {
            match rule {
                MappingRule::Rename { from, to } => {
                    if let Some(value) = params.remove(from) {
                        params.insert(to.clone(), value);
                    }
                }
                MappingRule::Group {
                    target,
                    gate,
                    members,
                } => {
                    let open = gate.as_ref().is_none_or(|g| g.holds(&params));
                    let mut nested = Map::new();
                    for member in members {
                        if let Some(value) = params.remove(&member.from)
                            && open
                            && !value.is_null()
                        {
                            nested.insert(member.to.clone(), value);
                        }
                    }
                    if open && !nested.is_empty() {
                        params.insert(target.clone(), Value::Object(nested));
                    }
                }
                MappingRule::Drop { field } => {
                    params.remove(field);
                }
            }
        }
        params
    }
}
