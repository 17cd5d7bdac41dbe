/// Resource providers. Each one owns the payload for one configuration file and contributes it to
/// the deployment descriptor. New kinds follow the same pattern and are added to
/// `Registry::initialize`.
mod dynamic_plugins;
mod pvcs;

pub use dynamic_plugins::{dynamic_plugins_default_name, DynamicPlugins};
pub use pvcs::{pvcs_name, BackstagePvcs};
