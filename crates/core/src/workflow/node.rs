//! Process-node data structures and their wire representation.
//!
//! The JSON shape matches what the web client submits: camelCase field
//! names, `type` for the node kind, and an `expireTime` that is either the
//! literal string `"unlimited"` or an RFC 3339 timestamp.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{DbId, Timestamp};

/// Kind of a workflow node. Exactly one `Start` and one `End` per workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    #[serde(rename = "start")]
    Start,
    /// An intermediate approval step (serialized as `"node"`).
    #[serde(rename = "node")]
    Step,
    #[serde(rename = "end")]
    End,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Start => "start",
            NodeType::Step => "node",
            NodeType::End => "end",
        }
    }

    pub fn parse(s: &str) -> Option<NodeType> {
        match s {
            "start" => Some(NodeType::Start),
            "node" => Some(NodeType::Step),
            "end" => Some(NodeType::End),
            _ => None,
        }
    }
}

/// Task expiry: unlimited, or overdue after an explicit UTC instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    Unlimited,
    At(Timestamp),
}

impl Serialize for Expiry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Expiry::Unlimited => serializer.serialize_str("unlimited"),
            Expiry::At(ts) => serializer.serialize_str(&ts.to_rfc3339()),
        }
    }
}

impl<'de> Deserialize<'de> for Expiry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == "unlimited" {
            return Ok(Expiry::Unlimited);
        }
        let ts = chrono::DateTime::parse_from_rfc3339(&raw)
            .map_err(|e| D::Error::custom(format!("invalid expireTime '{raw}': {e}")))?;
        Ok(Expiry::At(ts.with_timezone(&chrono::Utc)))
    }
}

/// A user referenced from a node's CC list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CcRecipient {
    pub id: DbId,
    pub name: String,
}

/// One step of an approval chain as composed by the editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessNode {
    /// Unique within one workflow, e.g. `start`, `node1`, `end`.
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub name: String,
    /// Display name of the responsible user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor_id: Option<DbId>,
    /// `None` means "never set"; submission packaging defaults it to `[]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc_recipients: Option<Vec<CcRecipient>>,
    /// `None` is treated as `true` at submission time. Ignored for
    /// `Start`/`End` nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_access: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_time: Option<Expiry>,
    /// Legacy hour-count expiry; mutually exclusive with `expire_time`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_duration: Option<i64>,
    /// Open per-node configuration bag. Carried verbatim, read by nothing.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub settings: serde_json::Map<String, serde_json::Value>,
}

impl ProcessNode {
    /// The fixed entry node of every workflow.
    pub fn start() -> Self {
        Self::with_type("start", NodeType::Start, "Start")
    }

    /// The fixed terminal node of every workflow.
    pub fn end() -> Self {
        Self::with_type("end", NodeType::End, "End")
    }

    /// A fresh intermediate step with editor defaults applied.
    pub fn step(id: impl Into<String>, name: impl Into<String>) -> Self {
        let mut node = Self::with_type(id, NodeType::Step, name);
        node.edit_access = Some(true);
        node
    }

    fn with_type(
        id: impl Into<String>,
        node_type: NodeType,
        name: impl Into<String>,
    ) -> Self {
        ProcessNode {
            id: id.into(),
            node_type,
            name: name.into(),
            executor: None,
            executor_id: None,
            cc_recipients: None,
            edit_access: None,
            expire_time: None,
            expire_duration: None,
            settings: serde_json::Map::new(),
        }
    }

    /// Whether `user_id` appears in this node's CC list.
    pub fn has_cc(&self, user_id: DbId) -> bool {
        self.cc_recipients
            .as_ref()
            .is_some_and(|ccs| ccs.iter().any(|cc| cc.id == user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_node_type_round_trips_through_strings() {
        for ty in [NodeType::Start, NodeType::Step, NodeType::End] {
            assert_eq!(NodeType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(NodeType::parse("loop"), None);
    }

    #[test]
    fn test_expiry_serializes_unlimited_as_literal() {
        let json = serde_json::to_string(&Expiry::Unlimited).unwrap();
        assert_eq!(json, "\"unlimited\"");
    }

    #[test]
    fn test_expiry_round_trips_timestamp() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let json = serde_json::to_string(&Expiry::At(ts)).unwrap();
        let back: Expiry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Expiry::At(ts));
    }

    #[test]
    fn test_expiry_rejects_garbage() {
        let result: Result<Expiry, _> = serde_json::from_str("\"tomorrow\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_node_json_uses_client_field_names() {
        let mut node = ProcessNode::step("node1", "Site review");
        node.executor = Some("Alice".into());
        node.executor_id = Some(7);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "node");
        assert_eq!(json["executorId"], 7);
        assert_eq!(json["editAccess"], true);
        assert!(json.get("ccRecipients").is_none(), "unset CC list is omitted");
    }

    #[test]
    fn test_has_cc_on_empty_node() {
        let node = ProcessNode::step("node1", "Review");
        assert!(!node.has_cc(1));
    }
}
