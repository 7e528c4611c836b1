//! The solved results of an energy system optimisation.
//!
//! Results are keyed by an edge of the energy system graph (a source node and, optionally, a
//! target node) together with the name of the solved quantity. Time-varying quantities (e.g. the
//! flow along an edge) are stored as sequences, while single values (e.g. the capacity chosen by
//! the optimiser) are stored as scalars.
use crate::id::NodeID;
use crate::time_series::TimeSeries;
use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde_string_enum::DeserializeLabeledStringEnum;
use std::fmt::Display;

/// The quantity which a result refers to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, DeserializeLabeledStringEnum, strum::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    /// Energy flow along an edge
    #[string = "flow"]
    Flow,
    /// Energy held by a storage component
    #[string = "capacity"]
    Capacity,
    /// Capacity chosen by the optimiser
    #[string = "invest"]
    Invest,
}

/// Identifies a single result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultKey {
    /// The node at which the edge starts
    pub source: NodeID,
    /// The node at which the edge ends, if any (storage levels have no target)
    pub target: Option<NodeID>,
    /// The quantity
    pub field: Field,
}

impl ResultKey {
    /// Create a new [`ResultKey`]
    pub fn new(source: &str, target: Option<&str>, field: Field) -> Self {
        Self {
            source: source.into(),
            target: target.map(NodeID::from),
            field,
        }
    }

    /// Key for the flow from `source` to `target`
    pub fn flow(source: &str, target: &str) -> Self {
        Self::new(source, Some(target), Field::Flow)
    }

    /// Key for the optimised capacity of the edge from `source` to `target`
    pub fn invest(source: &str, target: &str) -> Self {
        Self::new(source, Some(target), Field::Invest)
    }

    /// Key for the energy held by the storage component `node`
    pub fn capacity(node: &str) -> Self {
        Self::new(node, None, Field::Capacity)
    }

    /// Whether the edge starts or ends at `node`
    pub fn involves(&self, node: &NodeID) -> bool {
        self.source == *node || self.target.as_ref() == Some(node)
    }
}

impl Display for ResultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.target {
            Some(target) => write!(f, "(({}, {}), {})", self.source, target, self.field),
            None => write!(f, "(({}, None), {})", self.source, self.field),
        }
    }
}

/// The results of a solved energy system model
#[derive(Debug, Default, PartialEq)]
pub struct Results {
    sequences: IndexMap<ResultKey, TimeSeries>,
    scalars: IndexMap<ResultKey, f64>,
}

impl Results {
    /// Add a sequence, failing if there is already one with the same key
    pub fn insert_sequence(&mut self, key: ResultKey, series: TimeSeries) -> Result<()> {
        if self.sequences.contains_key(&key) {
            bail!("Duplicate sequence for {key}");
        }

        self.sequences.insert(key, series);
        Ok(())
    }

    /// Add a scalar, failing if there is already one with the same key
    pub fn insert_scalar(&mut self, key: ResultKey, value: f64) -> Result<()> {
        if self.scalars.contains_key(&key) {
            bail!("Duplicate scalar for {key}");
        }

        self.scalars.insert(key, value);
        Ok(())
    }

    /// The number of sequences
    pub fn num_sequences(&self) -> usize {
        self.sequences.len()
    }

    /// The number of scalars
    pub fn num_scalars(&self) -> usize {
        self.scalars.len()
    }

    /// Get a view of the results relating to a single node.
    ///
    /// # Returns
    ///
    /// A [`NodeView`] or an error if no result involves the node.
    pub fn node(&self, node: &str) -> Result<NodeView<'_>> {
        let node = NodeID::new(node);
        let found = self
            .sequences
            .keys()
            .chain(self.scalars.keys())
            .any(|key| key.involves(&node));
        if !found {
            bail!("No results found for node {node}");
        }

        Ok(NodeView {
            results: self,
            node,
        })
    }
}

/// The results for the edges starting or ending at a particular node
#[derive(Debug)]
pub struct NodeView<'a> {
    results: &'a Results,
    node: NodeID,
}

impl NodeView<'_> {
    /// Look up a sequence belonging to this node
    pub fn sequence(&self, key: &ResultKey) -> Result<&TimeSeries> {
        self.check_key(key)?;
        self.results
            .sequences
            .get(key)
            .with_context(|| format!("No sequence {key} found for node {}", self.node))
    }

    /// Look up a scalar belonging to this node
    pub fn scalar(&self, key: &ResultKey) -> Result<f64> {
        self.check_key(key)?;
        self.results
            .scalars
            .get(key)
            .copied()
            .with_context(|| format!("No scalar {key} found for node {}", self.node))
    }

    fn check_key(&self, key: &ResultKey) -> Result<()> {
        if !key.involves(&self.node) {
            bail!("Result {key} does not belong to node {}", self.node);
        }

        Ok(())
    }
}
