use crate::constants::{
    DEFAULT_MOUNT_DIR, DYNAMIC_PLUGINS_FILE, DYNAMIC_PLUGINS_INIT_CONTAINER,
    DYNAMIC_PLUGINS_OBJECT,
};
use crate::error::{self, Result};
use crate::mount::join_path;
use crate::multiobject::from_dynamic_object;
use crate::utils::{generate_runtime_object_name, set_meta_info, to_rfc1123_label};
use crate::{Backstage, BackstageModel, Manifest, RuntimeObject};
use k8s_openapi::api::core::v1::{ConfigMap, ConfigMapVolumeSource, Volume, VolumeMount};
use kube::core::DynamicObject;
use kube::ResourceExt;
use log::debug;
use snafu::{ensure, OptionExt};

/// Provides the `dynamic-plugins.yaml` ConfigMap consumed by the dynamic plugins init container.
///
/// The init container reads the ConfigMap from its working directory and writes a composed
/// app-config into a volume it shares with the Backstage container, which reads it at start-up.
#[derive(Debug, Default)]
pub struct DynamicPlugins {
    config_map: Option<ConfigMap>,
}

/// The name of the ConfigMap the operator keeps for instance `backstage_name`.
pub fn dynamic_plugins_default_name(backstage_name: &str) -> String {
    generate_runtime_object_name(backstage_name, DYNAMIC_PLUGINS_OBJECT)
}

impl DynamicPlugins {
    pub fn factory() -> Box<dyn RuntimeObject> {
        Box::new(Self::default())
    }

    pub fn config_map(&self) -> Option<&ConfigMap> {
        self.config_map.as_ref()
    }
}

/// Checks that `config_map` holds exactly one, non-empty, `dynamic-plugins.yaml` entry.
fn validate_config_map(config_map: &ConfigMap) -> Result<()> {
    let data = config_map.data.clone().unwrap_or_default();
    let valid = data.len() == 1
        && data
            .get(DYNAMIC_PLUGINS_FILE)
            .map(|content| !content.is_empty())
            .unwrap_or(false);
    ensure!(
        valid,
        error::DynamicPluginsKeySnafu {
            name: config_map.name_any(),
            expected: DYNAMIC_PLUGINS_FILE,
            actual: data.keys().cloned().collect::<Vec<_>>(),
        }
    );
    Ok(())
}

impl RuntimeObject for DynamicPlugins {
    fn key(&self) -> &'static str {
        DYNAMIC_PLUGINS_FILE
    }

    fn empty_object(&self) -> Manifest {
        Manifest::ConfigMap(ConfigMap::default())
    }

    fn object(&self) -> Vec<Manifest> {
        self.config_map
            .iter()
            .cloned()
            .map(Manifest::ConfigMap)
            .collect()
    }

    fn set_object(&mut self, objects: Vec<DynamicObject>) -> Result<()> {
        ensure!(
            objects.len() <= 1,
            error::TooManyObjectsSnafu {
                key: DYNAMIC_PLUGINS_FILE,
                count: objects.len(),
            }
        );
        self.config_map = objects
            .into_iter()
            .next()
            .map(from_dynamic_object::<ConfigMap>)
            .transpose()?;
        Ok(())
    }

    fn add_to_model(&mut self, model: &BackstageModel, backstage: &Backstage) -> Result<bool> {
        let source = match backstage.dynamic_plugins_source() {
            Some(source) => source,
            None => return Ok(false),
        };
        ensure!(
            model
                .deployment()
                .init_container(DYNAMIC_PLUGINS_INIT_CONTAINER)
                .is_some(),
            error::MissingInitContainerSnafu {
                name: DYNAMIC_PLUGINS_INIT_CONTAINER,
            }
        );
        let config_map = model
            .external_config()
            .dynamic_plugins
            .as_ref()
            .filter(|cm| cm.metadata.name.as_deref() == Some(source))
            .context(error::DynamicPluginsNotFoundSnafu { name: source })?;
        validate_config_map(config_map)?;
        self.config_map = Some(config_map.clone());
        Ok(true)
    }

    fn update_and_validate(
        &mut self,
        model: &mut BackstageModel,
        backstage: &Backstage,
    ) -> Result<()> {
        let config_map = self.config_map.as_ref().context(error::DynamicPluginsNotFoundSnafu {
            name: backstage.dynamic_plugins_source().unwrap_or_default(),
        })?;
        validate_config_map(config_map)?;

        let image = model.settings().image_override().map(str::to_string);
        let deployment = model.deployment_mut();
        let init_container = deployment.init_container_mut(DYNAMIC_PLUGINS_INIT_CONTAINER)?;
        if let Some(image) = image {
            debug!(
                "Overriding image of init container '{}' with '{}'",
                DYNAMIC_PLUGINS_INIT_CONTAINER, image
            );
            init_container.image = Some(image);
        }
        let working_dir = init_container
            .working_dir
            .clone()
            .filter(|dir| !dir.is_empty())
            .unwrap_or_else(|| DEFAULT_MOUNT_DIR.to_string());

        // The volume refers to the operator-owned copy, which `set_meta_info` names.
        let config_map_name = dynamic_plugins_default_name(&backstage.name_any());
        let volume_name = to_rfc1123_label(&config_map_name);
        deployment.add_volume(Volume {
            name: volume_name.clone(),
            config_map: Some(ConfigMapVolumeSource {
                name: Some(config_map_name),
                default_mode: Some(0o644),
                ..ConfigMapVolumeSource::default()
            }),
            ..Volume::default()
        })?;
        deployment.mount_init(
            DYNAMIC_PLUGINS_INIT_CONTAINER,
            VolumeMount {
                name: volume_name,
                mount_path: join_path(&working_dir, DYNAMIC_PLUGINS_FILE),
                sub_path: Some(DYNAMIC_PLUGINS_FILE.to_string()),
                read_only: Some(true),
                ..VolumeMount::default()
            },
        )
    }

    fn set_meta_info(&mut self, backstage: &Backstage) {
        if let Some(config_map) = self.config_map.as_mut() {
            config_map.metadata.name = Some(dynamic_plugins_default_name(&backstage.name_any()));
            set_meta_info(&mut config_map.metadata, backstage);
        }
    }
}
