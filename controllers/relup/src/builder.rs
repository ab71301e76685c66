//! DaemonSet construction for a `ReleaseUpgrade`.
//!
//! Pure functions only: no I/O and no error conditions. Missing or empty
//! spec fields are copied through verbatim and fail inside the cluster, not
//! here.

use crds::ReleaseUpgrade;
use k8s_openapi::api::apps::v1::{DaemonSet, DaemonSetSpec};
use k8s_openapi::api::core::v1::{
    Container, HostPathVolumeSource, PodSpec, PodTemplateSpec, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta, OwnerReference};
use kube::{Resource, ResourceExt};
use std::collections::BTreeMap;
use std::path::Path;

/// Base directory under which each upgrade gets its own staging directory.
pub const STAGING_ROOT: &str = "/tmp";

/// Label key and value shared by every staging workload.
pub const ROLE_LABEL: &str = "role";
pub const ROLE_VALUE: &str = "relup";

/// Label key carrying the owning upgrade's name.
pub const UPGRADE_LABEL: &str = "upgrade";

/// How long the staging container idles after copying the tarball.
pub const IDLE_SECONDS: u64 = 3600;

const HOST_PATH_TYPE: &str = "DirectoryOrCreate";

/// Selector labels for the workload of the upgrade named `name`.
pub fn selector_labels(name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (ROLE_LABEL.to_string(), ROLE_VALUE.to_string()),
        (UPGRADE_LABEL.to_string(), name.to_string()),
    ])
}

/// Per-upgrade directory inside the staging container.
pub fn staging_path(name: &str) -> String {
    Path::new(STAGING_ROOT).join(name).to_string_lossy().into_owned()
}

/// Shell line run by the staging container: copy, then idle.
pub fn staging_command(tarball: &str, mount_path: &str) -> String {
    format!("cp {tarball} {mount_path}; sleep {IDLE_SECONDS}")
}

/// Controller owner reference pointing back at `upgrade`.
///
/// The API server uses it to garbage-collect the DaemonSet once the
/// upgrade is deleted.
pub fn owner_reference(upgrade: &ReleaseUpgrade) -> OwnerReference {
    OwnerReference {
        api_version: ReleaseUpgrade::api_version(&()).into_owned(),
        kind: ReleaseUpgrade::kind(&()).into_owned(),
        name: upgrade.name_any(),
        uid: upgrade.uid().unwrap_or_default(),
        controller: Some(true),
        block_owner_deletion: Some(true),
    }
}

/// Builds the DaemonSet that stages `upgrade`'s tarball onto every node.
///
/// The DaemonSet shares the upgrade's namespace and name.
pub fn daemonset_for_release_upgrade(upgrade: &ReleaseUpgrade) -> DaemonSet {
    let name = upgrade.name_any();
    let labels = selector_labels(&name);
    let mount_path = staging_path(&name);
    let relup = &upgrade.spec.relup;

    let container = Container {
        name: relup.name.clone().unwrap_or_default(),
        image: relup.image.clone(),
        command: Some(vec!["/bin/sh".to_string(), "-c".to_string()]),
        args: Some(vec![staging_command(
            relup.tarball.as_deref().unwrap_or_default(),
            &mount_path,
        )]),
        volume_mounts: Some(vec![VolumeMount {
            name: name.clone(),
            mount_path,
            ..Default::default()
        }]),
        ..Default::default()
    };

    let volume = Volume {
        name: name.clone(),
        host_path: Some(HostPathVolumeSource {
            path: upgrade.spec.volume.host_path.clone().unwrap_or_default(),
            type_: Some(HOST_PATH_TYPE.to_string()),
        }),
        ..Default::default()
    };

    DaemonSet {
        metadata: ObjectMeta {
            name: Some(name),
            namespace: upgrade.namespace(),
            owner_references: Some(vec![owner_reference(upgrade)]),
            ..Default::default()
        },
        spec: Some(DaemonSetSpec {
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![container],
                    volumes: Some(vec![volume]),
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}
