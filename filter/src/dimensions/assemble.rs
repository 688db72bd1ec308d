//! Base dimensions derived from container and engine descriptors

use qmetric_core::keys::{
    DIM_COMMAND, DIM_CONTAINER_ID, DIM_CONTAINER_NAME, DIM_CREATED, DIM_ENGINE_ADDRESS,
    DIM_ENGINE_KERNEL, DIM_ENGINE_NAME, DIM_ENGINE_VERSION, DIM_IMAGE_NAME, DIM_SERVICE_NAMESPACE,
    DIM_SERVICE_SLOT, DIM_TASK_SLOT, LABEL_STACK_NAMESPACE, LABEL_SWARM_TASK_NAME, NIL,
};
use qmetric_core::{ContainerDescriptor, Dimensions, EngineDescriptor};

/// Split the swarm task name into `[service, slot, task]`
///
/// `None` when the label is missing or does not have exactly three parts.
fn task_name_parts(cnt: &ContainerDescriptor) -> Option<[&str; 3]> {
    let task_name = cnt.label(LABEL_SWARM_TASK_NAME)?;
    let mut parts = task_name.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(service), Some(slot), Some(task), None) => Some([service, slot, task]),
        _ => None,
    }
}

/// `{service}.{slot}` from the swarm task name, or `<nil>`
pub fn service_slot(cnt: &ContainerDescriptor) -> String {
    match task_name_parts(cnt) {
        Some([service, slot, _]) => format!("{service}.{slot}"),
        None => NIL.to_string(),
    }
}

/// `{slot}` from the swarm task name, or `<nil>`
pub fn task_slot(cnt: &ContainerDescriptor) -> String {
    match task_name_parts(cnt) {
        Some([_, slot, _]) => slot.to_string(),
        None => NIL.to_string(),
    }
}

/// Derive the fixed container dimension set
pub fn container_dimensions(cnt: &ContainerDescriptor) -> Dimensions {
    let namespace = cnt.label(LABEL_STACK_NAMESPACE).unwrap_or_default();
    let command = cnt.config.cmd.join("#").replace(' ', "#");

    Dimensions::from([
        (DIM_SERVICE_NAMESPACE.to_string(), namespace.to_string()),
        (DIM_CONTAINER_ID.to_string(), cnt.id.clone()),
        (
            DIM_CONTAINER_NAME.to_string(),
            cnt.name.trim_matches('/').to_string(),
        ),
        (DIM_IMAGE_NAME.to_string(), cnt.image.clone()),
        (DIM_SERVICE_SLOT.to_string(), service_slot(cnt)),
        (DIM_TASK_SLOT.to_string(), task_slot(cnt)),
        (DIM_COMMAND.to_string(), command),
        (DIM_CREATED.to_string(), cnt.created.clone()),
    ])
}

/// Start from the engine dimensions and overlay `dims` on top
///
/// Keys present in both keep the value from `dims`.
pub fn with_engine_dimensions(dims: Dimensions, eng: &EngineDescriptor) -> Dimensions {
    let mut res = Dimensions::from([
        (DIM_ENGINE_NAME.to_string(), eng.name.clone()),
        (DIM_ENGINE_KERNEL.to_string(), eng.kernel_version.clone()),
        (DIM_ENGINE_ADDRESS.to_string(), eng.swarm.node_addr.clone()),
        (DIM_ENGINE_VERSION.to_string(), eng.server_version.clone()),
    ]);
    res.extend(dims);
    res
}

/// Container dimensions merged over engine dimensions
pub fn assemble(cnt: &ContainerDescriptor, eng: &EngineDescriptor) -> Dimensions {
    with_engine_dimensions(container_dimensions(cnt), eng)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn with_task_name(task_name: &str) -> ContainerDescriptor {
        ContainerDescriptor::new("c1", "/web1", "nginx").with_label(LABEL_SWARM_TASK_NAME, task_name)
    }

    #[test]
    fn test_slots_from_valid_task_name() {
        let cnt = with_task_name("web.2.xk3f9");
        assert_eq!(service_slot(&cnt), "web.2");
        assert_eq!(task_slot(&cnt), "2");
    }

    #[test]
    fn test_slots_from_short_task_name() {
        let cnt = with_task_name("web.2");
        assert_eq!(service_slot(&cnt), NIL);
        assert_eq!(task_slot(&cnt), NIL);
    }

    #[test]
    fn test_slots_from_long_task_name() {
        let cnt = with_task_name("web.2.xk3f9.extra");
        assert_eq!(service_slot(&cnt), NIL);
        assert_eq!(task_slot(&cnt), NIL);
    }

    #[test]
    fn test_slots_without_label() {
        let cnt = ContainerDescriptor::new("c1", "/web1", "nginx");
        assert_eq!(service_slot(&cnt), NIL);
        assert_eq!(task_slot(&cnt), NIL);
    }

    #[test]
    fn test_container_dimensions() {
        let cnt = with_task_name("web.0.abc")
            .with_label(LABEL_STACK_NAMESPACE, "shop")
            .with_cmd(["nginx", "-g", "daemon off;"])
            .with_created("2024-01-01T00:00:00Z");

        let dims = container_dimensions(&cnt);
        assert_eq!(dims.len(), 8);
        assert_eq!(dims[DIM_SERVICE_NAMESPACE], "shop");
        assert_eq!(dims[DIM_CONTAINER_ID], "c1");
        assert_eq!(dims[DIM_CONTAINER_NAME], "web1");
        assert_eq!(dims[DIM_IMAGE_NAME], "nginx");
        assert_eq!(dims[DIM_SERVICE_SLOT], "web.0");
        assert_eq!(dims[DIM_TASK_SLOT], "0");
        assert_eq!(dims[DIM_COMMAND], "nginx#-g#daemon#off;");
        assert_eq!(dims[DIM_CREATED], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_container_dimensions_defaults() {
        let dims = container_dimensions(&ContainerDescriptor::default());
        assert_eq!(dims[DIM_SERVICE_NAMESPACE], "");
        assert_eq!(dims[DIM_CONTAINER_NAME], "");
        assert_eq!(dims[DIM_COMMAND], "");
    }

    #[test]
    fn test_container_name_without_separator() {
        let cnt = ContainerDescriptor::new("c1", "web1", "nginx");
        assert_eq!(container_dimensions(&cnt)[DIM_CONTAINER_NAME], "web1");
    }

    #[test]
    fn test_engine_dimensions() {
        let eng = EngineDescriptor::new("swarm1")
            .with_kernel_version("6.1.0")
            .with_server_version("24.0.7")
            .with_node_addr("10.0.0.5");

        let dims = with_engine_dimensions(Dimensions::new(), &eng);
        assert_eq!(dims.len(), 4);
        assert_eq!(dims[DIM_ENGINE_NAME], "swarm1");
        assert_eq!(dims[DIM_ENGINE_KERNEL], "6.1.0");
        assert_eq!(dims[DIM_ENGINE_ADDRESS], "10.0.0.5");
        assert_eq!(dims[DIM_ENGINE_VERSION], "24.0.7");
    }

    #[test]
    fn test_container_keys_win_over_engine() {
        let eng = EngineDescriptor::new("swarm1");
        let dims = Dimensions::from([(DIM_ENGINE_NAME.to_string(), "override".to_string())]);

        let merged = with_engine_dimensions(dims, &eng);
        assert_eq!(merged[DIM_ENGINE_NAME], "override");
    }

    #[test]
    fn test_assemble_has_all_keys() {
        let dims = assemble(&with_task_name("web.0.abc"), &EngineDescriptor::new("swarm1"));
        assert_eq!(dims.len(), 12);
        assert_eq!(dims[DIM_ENGINE_NAME], "swarm1");
        assert_eq!(dims[DIM_CONTAINER_NAME], "web1");
    }
}
