//! Commands and types used throughout edgevol.
//!
//! This module defines the vocabulary that all components share:
//! [`Command`] describes every request the coordinator can handle,
//! [`ConfigUpdate`] is the partial configuration pushed by a settings
//! front-end, and [`Edge`] / [`EdgeSet`] / [`PointerEvent`] provide the
//! supporting data types.
//!
//! Edge names are parsed leniently ("left", "Right", " LEFT "), and an
//! edge set may be written either as a list (`["left", "right"]`) or as a
//! single word (`"left"`, `"right"`, `"both"`, `"none"`).

use crate::config::ConfigError;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A screen side a strip can be anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Right,
}

impl Edge {
    /// Every edge, in a stable order.
    pub const ALL: [Edge; 2] = [Edge::Left, Edge::Right];
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Left => write!(f, "left"),
            Edge::Right => write!(f, "right"),
        }
    }
}

impl FromStr for Edge {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" | "start" => Ok(Edge::Left),
            "right" | "end" => Ok(Edge::Right),
            _ => Err(ConfigError::UnknownEdge(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Edge {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// The set of edges that should carry a strip.
///
/// Empty, one edge, or both edges are all valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeSet(BTreeSet<Edge>);

impl EdgeSet {
    /// No edges.
    pub fn none() -> Self {
        Self::default()
    }

    /// Both edges.
    pub fn both() -> Self {
        Edge::ALL.into_iter().collect()
    }

    /// Exactly one edge.
    pub fn single(edge: Edge) -> Self {
        std::iter::once(edge).collect()
    }

    pub fn contains(&self, edge: Edge) -> bool {
        self.0.contains(&edge)
    }

    pub fn insert(&mut self, edge: Edge) -> bool {
        self.0.insert(edge)
    }

    pub fn remove(&mut self, edge: Edge) -> bool {
        self.0.remove(&edge)
    }

    pub fn iter(&self) -> impl Iterator<Item = Edge> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Edges present in either set.
    pub fn union(&self, other: &EdgeSet) -> EdgeSet {
        self.0.union(&other.0).copied().collect()
    }
}

impl FromIterator<Edge> for EdgeSet {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for EdgeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<String> = self.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", names.join("+"))
    }
}

impl Serialize for EdgeSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de> Deserialize<'de> for EdgeSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = EdgeSet;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "list of edges or one of \"left\", \"right\", \"both\", \"none\"")
            }
            fn visit_seq<A>(self, mut seq: A) -> Result<EdgeSet, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut set = EdgeSet::none();
                while let Some(edge) = seq.next_element::<Edge>()? {
                    set.insert(edge);
                }
                Ok(set)
            }
            fn visit_str<E>(self, s: &str) -> Result<EdgeSet, E>
            where
                E: DeError,
            {
                match s.trim().to_lowercase().as_str() {
                    "both" => Ok(EdgeSet::both()),
                    "none" | "" => Ok(EdgeSet::none()),
                    other => other.parse().map(EdgeSet::single).map_err(E::custom),
                }
            }
        }
        deserializer.deserialize_any(V)
    }
}

/// A partial configuration update.
///
/// Fields left as `None` keep their previous value.
///
/// ```json
/// {"sensitivity": 80, "active_edges": ["left", "right"], "enabled": true}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigUpdate {
    /// Percent of full range per strip height travelled.  Must be `> 0`.
    pub sensitivity: Option<f64>,
    /// Edges that should carry a strip.
    pub active_edges: Option<EdgeSet>,
    /// Master switch; when `false` no strip is attached.
    pub enabled: Option<bool>,
}

impl ConfigUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = Some(sensitivity);
        self
    }

    pub fn with_edges(mut self, edges: EdgeSet) -> Self {
        self.active_edges = Some(edges);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Reject values that can never be applied.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(s) = self.sensitivity {
            validate_sensitivity(s)?;
        }
        Ok(())
    }
}

/// Sensitivity must be a finite, strictly positive number.
pub(crate) fn validate_sensitivity(sensitivity: f64) -> Result<(), ConfigError> {
    if sensitivity.is_finite() && sensitivity > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSensitivity(sensitivity))
    }
}

/// One pointer sample, in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// A finger went down.
    Down { x: f64, y: f64 },
    /// The finger moved.
    Move { x: f64, y: f64 },
    /// The finger lifted.
    Up { x: f64, y: f64 },
    /// The host took the gesture away (e.g. a system gesture won).
    Cancel,
}

/// Every request the [`OverlayCoordinator`](crate::coordinator::OverlayCoordinator)
/// can handle.
///
/// Commands are produced by [`CommandSource`](crate::traits::CommandSource)
/// implementations and by surface hosts that forward pointer input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Apply a (partial) configuration update.
    Configure(ConfigUpdate),

    /// Pointer input on the strip anchored to `edge`.
    Pointer { edge: Edge, event: PointerEvent },

    /// The output level was changed elsewhere; show `value` (0–100) on
    /// every strip without forwarding it back to the output.
    SyncValue(f64),

    /// Detach every strip and stop.
    ///
    /// On the wire this is encoded as the JSON string `"Shutdown"`.
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_display() {
        assert_eq!(Edge::Left.to_string(), "left");
        assert_eq!(Edge::Right.to_string(), "right");
    }

    #[test]
    fn edge_parse_is_lenient() {
        assert_eq!(" LEFT ".parse::<Edge>().unwrap(), Edge::Left);
        assert_eq!("Right".parse::<Edge>().unwrap(), Edge::Right);
        assert_eq!("end".parse::<Edge>().unwrap(), Edge::Right);
    }

    #[test]
    fn unknown_edge_is_rejected() {
        let err = "top".parse::<Edge>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownEdge(ref s) if s == "top"));
    }

    #[test]
    fn edge_set_accepts_list_and_words() {
        let list: EdgeSet = serde_json::from_str(r#"["right", "left", "left"]"#).unwrap();
        assert_eq!(list, EdgeSet::both());
        let single: EdgeSet = serde_json::from_str(r#""left""#).unwrap();
        assert_eq!(single, EdgeSet::single(Edge::Left));
        let both: EdgeSet = serde_json::from_str(r#""both""#).unwrap();
        assert_eq!(both.len(), 2);
        let none: EdgeSet = serde_json::from_str(r#""none""#).unwrap();
        assert!(none.is_empty());
        let empty: EdgeSet = serde_json::from_str("[]").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn edge_set_rejects_unknown_names() {
        assert!(serde_json::from_str::<EdgeSet>(r#"["left", "top"]"#).is_err());
        assert!(serde_json::from_str::<EdgeSet>(r#""middle""#).is_err());
    }

    #[test]
    fn edge_set_display_and_union() {
        assert_eq!(EdgeSet::none().to_string(), "none");
        assert_eq!(EdgeSet::both().to_string(), "left+right");
        let u = EdgeSet::single(Edge::Right).union(&EdgeSet::single(Edge::Left));
        assert_eq!(u, EdgeSet::both());
    }

    #[test]
    fn edge_set_serializes_as_list() {
        let json = serde_json::to_string(&EdgeSet::both()).unwrap();
        assert_eq!(json, r#"["left","right"]"#);
    }

    #[test]
    fn partial_config_update_decodes() {
        let u: ConfigUpdate = serde_json::from_str(r#"{"enabled": false}"#).unwrap();
        assert_eq!(u.enabled, Some(false));
        assert_eq!(u.sensitivity, None);
        assert_eq!(u.active_edges, None);
    }

    #[test]
    fn config_update_validation() {
        assert!(ConfigUpdate::new().with_sensitivity(80.0).validate().is_ok());
        assert!(ConfigUpdate::new().validate().is_ok());
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                ConfigUpdate::new().with_sensitivity(bad).validate(),
                Err(ConfigError::InvalidSensitivity(_))
            ));
        }
    }

    #[test]
    fn commands_decode_from_wire_format() {
        let c: Command = serde_json::from_str(
            r#"{"Configure":{"sensitivity":80,"active_edges":"both"}}"#,
        )
        .unwrap();
        assert_eq!(
            c,
            Command::Configure(
                ConfigUpdate::new()
                    .with_sensitivity(80.0)
                    .with_edges(EdgeSet::both())
            )
        );

        let c: Command = serde_json::from_str(
            r#"{"Pointer":{"edge":"left","event":{"Move":{"x":18,"y":120.5}}}}"#,
        )
        .unwrap();
        assert_eq!(
            c,
            Command::Pointer {
                edge: Edge::Left,
                event: PointerEvent::Move { x: 18.0, y: 120.5 },
            }
        );

        let c: Command =
            serde_json::from_str(r#"{"Pointer":{"edge":"right","event":"Cancel"}}"#).unwrap();
        assert_eq!(
            c,
            Command::Pointer {
                edge: Edge::Right,
                event: PointerEvent::Cancel,
            }
        );

        assert_eq!(
            serde_json::from_str::<Command>(r#"{"SyncValue":40}"#).unwrap(),
            Command::SyncValue(40.0)
        );
        assert_eq!(
            serde_json::from_str::<Command>(r#""Shutdown""#).unwrap(),
            Command::Shutdown
        );
    }
}
