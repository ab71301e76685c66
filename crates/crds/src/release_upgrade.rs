//! ReleaseUpgrade CRD
//!
//! Requests that a release upgrade artifact be staged onto every node.
//!
//! Every field is optional and nothing is validated here: an empty image
//! or host path is passed through to the generated workload and surfaces
//! as a runtime failure inside the cluster.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "relup.lrascao.github.io",
    version = "v1alpha1",
    kind = "ReleaseUpgrade",
    namespaced,
    status = "ReleaseUpgradeStatus",
    shortname = "relup",
    printcolumn = r#"{"name":"Image","type":"string","jsonPath":".spec.relup.image"}"#,
    printcolumn = r#"{"name":"From","type":"string","jsonPath":".spec.relup.sourceVersion"}"#,
    printcolumn = r#"{"name":"To","type":"string","jsonPath":".spec.relup.targetVersion"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseUpgradeSpec {
    /// Upgrade image identity
    #[serde(default)]
    pub relup: ReleaseUpgradeImageSpec,

    /// Host path binding on each node
    #[serde(default)]
    pub volume: ReleaseUpgradeVolumeSpec,

    /// Deployment being upgraded
    #[serde(default)]
    pub deployment: ReleaseUpgradeDeploymentSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseUpgradeImageSpec {
    /// Logical name, used as the container name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Container image holding the upgrade tarball
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Path of the tarball inside the image filesystem
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tarball: Option<String>,

    /// Release version currently running
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_version: Option<String>,

    /// Release version to upgrade to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseUpgradeVolumeSpec {
    /// Host directory bind-mounted on every node (created if missing)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseUpgradeDeploymentSpec {
    /// Name of the deployment running the release
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Observed state. No fields are published yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReleaseUpgradeStatus {}
