//! Container and engine descriptors
//!
//! Both types mirror the subset of the engine's inspection output the filter
//! reads. They deserialize straight from that JSON (PascalCase keys), and any
//! field the engine leaves out or sets to `null` comes back empty.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Treat an explicit JSON `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single container as reported by the engine
///
/// # Example
///
/// ```
/// use qmetric_core::ContainerDescriptor;
///
/// let cnt = ContainerDescriptor::new("c1", "/web1", "nginx")
///     .with_label("com.docker.swarm.task.name", "web.0.abc");
/// assert_eq!(cnt.label("com.docker.swarm.task.name"), Some("web.0.abc"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerDescriptor {
    /// Container identifier
    #[serde(rename = "Id", default, deserialize_with = "null_as_default")]
    pub id: String,

    /// Display name, usually with a leading `/`
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Image reference
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,

    /// Creation timestamp exactly as the engine formats it
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: String,

    /// Runtime configuration (command and labels)
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: ContainerConfig,
}

/// The part of a container's configuration the filter cares about
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerConfig {
    /// Command argument list
    #[serde(default, deserialize_with = "null_as_default")]
    pub cmd: Vec<String>,

    /// Container labels
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: HashMap<String, String>,
}

impl ContainerDescriptor {
    /// Create a descriptor with identity fields set and an empty config
    pub fn new(id: impl Into<String>, name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: image.into(),
            ..Self::default()
        }
    }

    /// Add a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.labels.insert(key.into(), value.into());
        self
    }

    /// Set the command argument list
    pub fn with_cmd<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.cmd = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the creation timestamp
    pub fn with_created(mut self, created: impl Into<String>) -> Self {
        self.created = created.into();
        self
    }

    /// Look up a label
    pub fn label(&self, key: &str) -> Option<&str> {
        self.config.labels.get(key).map(String::as_str)
    }
}

/// The engine (daemon) a container runs on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EngineDescriptor {
    /// Engine host name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Kernel version of the engine host
    #[serde(default, deserialize_with = "null_as_default")]
    pub kernel_version: String,

    /// Engine server version
    #[serde(default, deserialize_with = "null_as_default")]
    pub server_version: String,

    /// Cluster membership of the engine
    #[serde(default, deserialize_with = "null_as_default")]
    pub swarm: SwarmInfo,
}

/// Cluster membership details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SwarmInfo {
    /// Address this node advertises to the cluster
    #[serde(default, deserialize_with = "null_as_default")]
    pub node_addr: String,
}

impl EngineDescriptor {
    /// Create a descriptor with just the engine name set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the kernel version
    pub fn with_kernel_version(mut self, version: impl Into<String>) -> Self {
        self.kernel_version = version.into();
        self
    }

    /// Set the server version
    pub fn with_server_version(mut self, version: impl Into<String>) -> Self {
        self.server_version = version.into();
        self
    }

    /// Set the cluster node address
    pub fn with_node_addr(mut self, addr: impl Into<String>) -> Self {
        self.swarm.node_addr = addr.into();
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_container_from_inspect_json() {
        let json = r#"{
            "Id": "4f66ad9a0b2e",
            "Name": "/web1",
            "Image": "nginx:1.25",
            "Created": "2024-01-01T00:00:00Z",
            "Config": {
                "Cmd": ["nginx", "-g", "daemon off;"],
                "Labels": {"com.docker.stack.namespace": "shop"}
            },
            "State": {"Running": true}
        }"#;

        let cnt: ContainerDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(cnt.id, "4f66ad9a0b2e");
        assert_eq!(cnt.name, "/web1");
        assert_eq!(cnt.image, "nginx:1.25");
        assert_eq!(cnt.config.cmd.len(), 3);
        assert_eq!(cnt.label("com.docker.stack.namespace"), Some("shop"));
    }

    #[test]
    fn test_container_null_fields_become_empty() {
        let json = r#"{"Id": "c1", "Config": {"Cmd": null, "Labels": null}}"#;

        let cnt: ContainerDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(cnt.id, "c1");
        assert!(cnt.name.is_empty());
        assert!(cnt.config.cmd.is_empty());
        assert!(cnt.config.labels.is_empty());
    }

    #[test]
    fn test_engine_from_info_json() {
        let json = r#"{
            "Name": "swarm1",
            "KernelVersion": "6.1.0",
            "ServerVersion": "24.0.7",
            "Swarm": {"NodeAddr": "10.0.0.5", "LocalNodeState": "active"}
        }"#;

        let eng: EngineDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(eng.name, "swarm1");
        assert_eq!(eng.kernel_version, "6.1.0");
        assert_eq!(eng.server_version, "24.0.7");
        assert_eq!(eng.swarm.node_addr, "10.0.0.5");
    }

    #[test]
    fn test_builders() {
        let cnt = ContainerDescriptor::new("c1", "/web1", "nginx")
            .with_cmd(["nginx", "-g"])
            .with_created("yesterday");
        assert_eq!(cnt.config.cmd, vec!["nginx".to_string(), "-g".to_string()]);
        assert_eq!(cnt.created, "yesterday");
        assert!(cnt.label("missing").is_none());

        let eng = EngineDescriptor::new("e1")
            .with_kernel_version("6.1")
            .with_server_version("24.0")
            .with_node_addr("10.0.0.1");
        assert_eq!(eng.swarm.node_addr, "10.0.0.1");
    }
}
