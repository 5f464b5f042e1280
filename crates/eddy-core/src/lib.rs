use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod error;
pub mod geometry;

pub use error::DiagramError;
pub use geometry::Pos;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub i64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Item-level handle used by diagram notifications, where nodes and edges
/// are addressed uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemId {
    Node(NodeId),
    Edge(EdgeId),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Node(id) => write!(f, "{id}"),
            ItemId::Edge(id) => write!(f, "{id}"),
        }
    }
}

impl From<NodeId> for ItemId {
    fn from(id: NodeId) -> Self {
        ItemId::Node(id)
    }
}

impl From<EdgeId> for ItemId {
    fn from(id: EdgeId) -> Self {
        ItemId::Edge(id)
    }
}

/// Graphol construct drawn on a diagram. Predicate kinds carry a static
/// identity; constructor kinds are identified from their connected inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
#[repr(i32)]
pub enum NodeKind {
    // Predicates
    CONCEPT,
    ROLE,
    ATTRIBUTE,
    INDIVIDUAL,
    VALUE_DOMAIN,
    FACET,

    // Restrictions
    DOMAIN_RESTRICTION,
    RANGE_RESTRICTION,

    // Operators
    COMPLEMENT,
    DATATYPE_RESTRICTION,
    DISJOINT_UNION,
    ENUMERATION,
    INTERSECTION,
    PROPERTY_ASSERTION,
    ROLE_CHAIN,
    ROLE_INVERSE,
    UNION,
}

/// Error type for enum conversion failures
#[derive(Error, Debug, Clone)]
pub enum KindConversionError {
    #[error("Invalid NodeKind value: {0}")]
    InvalidNodeKind(i32),
    #[error("Invalid EdgeKind value: {0}")]
    InvalidEdgeKind(i32),
}

impl TryFrom<i32> for NodeKind {
    type Error = KindConversionError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(NodeKind::CONCEPT),
            1 => Ok(NodeKind::ROLE),
            2 => Ok(NodeKind::ATTRIBUTE),
            3 => Ok(NodeKind::INDIVIDUAL),
            4 => Ok(NodeKind::VALUE_DOMAIN),
            5 => Ok(NodeKind::FACET),
            6 => Ok(NodeKind::DOMAIN_RESTRICTION),
            7 => Ok(NodeKind::RANGE_RESTRICTION),
            8 => Ok(NodeKind::COMPLEMENT),
            9 => Ok(NodeKind::DATATYPE_RESTRICTION),
            10 => Ok(NodeKind::DISJOINT_UNION),
            11 => Ok(NodeKind::ENUMERATION),
            12 => Ok(NodeKind::INTERSECTION),
            13 => Ok(NodeKind::PROPERTY_ASSERTION),
            14 => Ok(NodeKind::ROLE_CHAIN),
            15 => Ok(NodeKind::ROLE_INVERSE),
            16 => Ok(NodeKind::UNION),
            _ => Err(KindConversionError::InvalidNodeKind(value)),
        }
    }
}

impl NodeKind {
    /// Kinds whose incoming input edges form an ordered argument list.
    pub fn has_ordered_inputs(self) -> bool {
        matches!(self, NodeKind::ROLE_CHAIN | NodeKind::PROPERTY_ASSERTION)
    }

    /// Restriction and operator kinds, i.e. everything that is not a
    /// predicate and therefore needs identity inference.
    pub fn is_constructor(self) -> bool {
        !matches!(
            self,
            NodeKind::CONCEPT
                | NodeKind::ROLE
                | NodeKind::ATTRIBUTE
                | NodeKind::INDIVIDUAL
                | NodeKind::VALUE_DOMAIN
                | NodeKind::FACET
        )
    }

    /// Static identity of the kind. Constructor kinds start out Neutral and
    /// are refined by identity resolution.
    pub fn identity(self) -> Identity {
        match self {
            NodeKind::CONCEPT => Identity::Concept,
            NodeKind::ROLE => Identity::Role,
            NodeKind::ATTRIBUTE => Identity::Attribute,
            NodeKind::INDIVIDUAL => Identity::Individual,
            NodeKind::VALUE_DOMAIN | NodeKind::FACET => Identity::ValueDomain,
            NodeKind::ROLE_CHAIN | NodeKind::ROLE_INVERSE => Identity::Role,
            _ => Identity::Neutral,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NodeKind::CONCEPT => "concept node",
            NodeKind::ROLE => "role node",
            NodeKind::ATTRIBUTE => "attribute node",
            NodeKind::INDIVIDUAL => "individual node",
            NodeKind::VALUE_DOMAIN => "value domain node",
            NodeKind::FACET => "facet node",
            NodeKind::DOMAIN_RESTRICTION => "domain restriction node",
            NodeKind::RANGE_RESTRICTION => "range restriction node",
            NodeKind::COMPLEMENT => "complement node",
            NodeKind::DATATYPE_RESTRICTION => "datatype restriction node",
            NodeKind::DISJOINT_UNION => "disjoint union node",
            NodeKind::ENUMERATION => "enumeration node",
            NodeKind::INTERSECTION => "intersection node",
            NodeKind::PROPERTY_ASSERTION => "property assertion node",
            NodeKind::ROLE_CHAIN => "role chain node",
            NodeKind::ROLE_INVERSE => "role inverse node",
            NodeKind::UNION => "union node",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
#[repr(i32)]
pub enum EdgeKind {
    INCLUSION,
    EQUIVALENCE,
    INPUT,
    MEMBERSHIP,
}

impl TryFrom<i32> for EdgeKind {
    type Error = KindConversionError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EdgeKind::INCLUSION),
            1 => Ok(EdgeKind::EQUIVALENCE),
            2 => Ok(EdgeKind::INPUT),
            3 => Ok(EdgeKind::MEMBERSHIP),
            _ => Err(KindConversionError::InvalidEdgeKind(value)),
        }
    }
}

impl EdgeKind {
    pub fn label(self) -> &'static str {
        match self {
            EdgeKind::INCLUSION => "inclusion edge",
            EdgeKind::EQUIVALENCE => "equivalence edge",
            EdgeKind::INPUT => "input edge",
            EdgeKind::MEMBERSHIP => "membership edge",
        }
    }
}

/// Semantic identity inferred for a node. Drives which axioms a node can
/// participate in; recomputed whenever edge topology around a constructor
/// node changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Identity {
    #[default]
    Neutral,
    Concept,
    Role,
    Attribute,
    ValueDomain,
    Individual,
    Unknown,
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Identity::Neutral => "neutral",
            Identity::Concept => "concept",
            Identity::Role => "role",
            Identity::Attribute => "attribute",
            Identity::ValueDomain => "value domain",
            Identity::Individual => "individual",
            Identity::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}
