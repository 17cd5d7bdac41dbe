use backstage_model::constants::{
    DEFAULT_MOUNT_PATH_ANNOTATION, DYNAMIC_PLUGINS_FILE, DYNAMIC_PLUGINS_INIT_CONTAINER,
};
use backstage_model::{Application, Backstage, BackstageSpec, ExternalConfig, ExtraFiles, PvcRef};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    ConfigMap, Container, PersistentVolumeClaim, PodSpec, PodTemplateSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use maplit::btreemap;

pub const INSTANCE: &str = "my-backstage";
pub const PLUGINS_CONFIG_MAP: &str = "my-dynamic-plugins";

/// A deployment with a Backstage container and, optionally, the dynamic plugins init container.
pub fn deployment(with_init_container: bool) -> Deployment {
    let init_containers = if with_init_container {
        vec![Container {
            name: DYNAMIC_PLUGINS_INIT_CONTAINER.to_string(),
            image: Some("quay.io/backstage:default".to_string()),
            working_dir: Some("/opt/app-root/src".to_string()),
            ..Container::default()
        }]
    } else {
        Vec::new()
    };
    Deployment {
        metadata: ObjectMeta {
            name: Some("backstage".to_string()),
            ..ObjectMeta::default()
        },
        spec: Some(DeploymentSpec {
            template: PodTemplateSpec {
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: "backstage-backend".to_string(),
                        image: Some("quay.io/backstage:default".to_string()),
                        ..Container::default()
                    }],
                    init_containers: Some(init_containers),
                    ..PodSpec::default()
                }),
                ..PodTemplateSpec::default()
            },
            ..DeploymentSpec::default()
        }),
        ..Deployment::default()
    }
}

/// An instance with the given dynamic plugins source and PVC requests.
pub fn backstage(dynamic_plugins: Option<&str>, pvcs: Vec<PvcRef>) -> Backstage {
    let mut backstage = Backstage::new(
        INSTANCE,
        BackstageSpec {
            application: Some(Application {
                dynamic_plugins_config_map_name: dynamic_plugins.map(str::to_string),
                extra_files: Some(ExtraFiles {
                    mount_path: None,
                    pvcs: Some(pvcs),
                }),
            }),
            raw_runtime_config: None,
        },
    );
    backstage.metadata.namespace = Some("backstage-ns".to_string());
    backstage.metadata.uid = Some("5d3c0a3e-uid".to_string());
    backstage
}

pub fn pvc_ref(name: &str, mount_path: Option<&str>) -> PvcRef {
    PvcRef {
        name: name.to_string(),
        mount_path: mount_path.map(str::to_string),
    }
}

pub fn plugins_config_map() -> ConfigMap {
    ConfigMap {
        metadata: ObjectMeta {
            name: Some(PLUGINS_CONFIG_MAP.to_string()),
            ..ObjectMeta::default()
        },
        data: Some(btreemap! {
            DYNAMIC_PLUGINS_FILE.to_string() => "includes:\n  - dynamic-plugins.default.yaml\n".to_string(),
        }),
        ..ConfigMap::default()
    }
}

pub fn pvc(name: &str, default_mount_path: Option<&str>) -> PersistentVolumeClaim {
    PersistentVolumeClaim {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            annotations: default_mount_path.map(|path| {
                btreemap! { DEFAULT_MOUNT_PATH_ANNOTATION.to_string() => path.to_string() }
            }),
            ..ObjectMeta::default()
        },
        ..PersistentVolumeClaim::default()
    }
}

/// External configuration holding the dynamic plugins ConfigMap and the given PVC templates.
pub fn external_config(pvcs: Vec<PersistentVolumeClaim>) -> ExternalConfig {
    ExternalConfig {
        dynamic_plugins: Some(plugins_config_map()),
        extra_pvcs: pvcs
            .into_iter()
            .map(|pvc| (pvc.metadata.name.clone().unwrap_or_default(), pvc))
            .collect(),
        ..ExternalConfig::default()
    }
}
