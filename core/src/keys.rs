//! Well-known label keys and dimension names
//!
//! Container labels are written by the engine's orchestrator; dimension names
//! are what the filter puts on emitted metrics.

/// Stack namespace label set on every container of a deployed stack
pub const LABEL_STACK_NAMESPACE: &str = "com.docker.stack.namespace";

/// Swarm task name label: `serviceName.slot.taskId`
pub const LABEL_SWARM_TASK_NAME: &str = "com.docker.swarm.task.name";

/// Placeholder for a dimension that could not be derived
pub const NIL: &str = "<nil>";

/// Tag holding the metric name
pub const TAG_NAME: &str = "name";

/// Tag holding the epoch-seconds timestamp
pub const TAG_TIME: &str = "time";

/// Tag holding the numeric value
pub const TAG_VALUE: &str = "value";

/// Tag holding inline `key=value` dimensions
pub const TAG_INLINE: &str = "tags";

/// Dimension carrying the message provenance
pub const DIM_SOURCE: &str = "source";

/// Stack namespace of the container
pub const DIM_SERVICE_NAMESPACE: &str = "service_namespace";
/// Container identifier
pub const DIM_CONTAINER_ID: &str = "container_id";
/// Container name without separators
pub const DIM_CONTAINER_NAME: &str = "container_name";
/// Image reference the container runs
pub const DIM_IMAGE_NAME: &str = "image_name";
/// `serviceName.slot` derived from the swarm task name
pub const DIM_SERVICE_SLOT: &str = "service_slot";
/// Slot number derived from the swarm task name
pub const DIM_TASK_SLOT: &str = "task_slot";
/// Command line with spaces folded to `#`
pub const DIM_COMMAND: &str = "command";
/// Container creation timestamp as reported by the engine
pub const DIM_CREATED: &str = "created";

/// Engine host name
pub const DIM_ENGINE_NAME: &str = "engine_name";
/// Engine kernel version
pub const DIM_ENGINE_KERNEL: &str = "engine_kernel";
/// Cluster node address of the engine
pub const DIM_ENGINE_ADDRESS: &str = "engine_address";
/// Engine server version
pub const DIM_ENGINE_VERSION: &str = "engine_version";
