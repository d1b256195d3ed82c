use k8s_openapi::api::core::v1::{PodSpec, Volume};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::serde_json::{self, Map, Value};

use crate::errors::ProjectionError;
use crate::projection::json::render_value;
use crate::projection::{Leaf, Union, Visitor};
use crate::record;
use crate::structs::SqlKind;

const DISCRIMINATOR: &str = "volume_type";

/// One recognised volume source: its column tag, the key the API uses for
/// it, and the leaves projected from it.
#[derive(Debug, PartialEq, Eq)]
pub struct VolumeVariant {
    pub tag: &'static str,
    key: &'static str,
    fields: &'static [VariantField],
}

#[derive(Debug, PartialEq, Eq)]
struct VariantField {
    column: &'static str,
    key: &'static str,
    kind: SqlKind,
    encoding: Encoding,
}

/// How a variant field's raw JSON becomes a column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Scalar,
    Quantity,
}

impl VariantField {
    fn render(&self, value: &Value) -> Result<Option<String>, serde_json::Error> {
        match self.encoding {
            Encoding::Scalar => render_value(value),
            Encoding::Quantity => {
                match serde_json::from_value::<Option<Quantity>>(value.clone())? {
                    Some(quantity) => quantity.render(),
                    None => Ok(None),
                }
            }
        }
    }
}

const fn text(column: &'static str, key: &'static str) -> VariantField {
    VariantField {
        column,
        key,
        kind: SqlKind::Text,
        encoding: Encoding::Scalar,
    }
}

const fn int(column: &'static str, key: &'static str) -> VariantField {
    VariantField {
        column,
        key,
        kind: SqlKind::Integer,
        encoding: Encoding::Scalar,
    }
}

const fn quantity(column: &'static str, key: &'static str) -> VariantField {
    VariantField {
        column,
        key,
        kind: <Quantity as Leaf>::KIND,
        encoding: Encoding::Quantity,
    }
}

macro_rules! variant {
    ($tag:literal, $key:literal, [$($field:expr),* $(,)?]) => {
        VolumeVariant {
            tag: $tag,
            key: $key,
            fields: &[$($field),*],
        }
    };
}

static VARIANTS: &[VolumeVariant] = &[
    variant!("host_path", "hostPath", [text("path", "path"), text("type", "type")]),
    variant!("empty_dir", "emptyDir", [text("medium", "medium"), quantity("size_limit", "sizeLimit")]),
    variant!(
        "config_map",
        "configMap",
        [
            text("name", "name"),
            text("items", "items"),
            int("default_mode", "defaultMode"),
            int("optional", "optional"),
        ]
    ),
    variant!(
        "secret",
        "secret",
        [
            text("secret_name", "secretName"),
            text("items", "items"),
            int("default_mode", "defaultMode"),
            int("optional", "optional"),
        ]
    ),
    variant!(
        "persistent_volume_claim",
        "persistentVolumeClaim",
        [text("claim_name", "claimName"), int("read_only", "readOnly")]
    ),
    variant!(
        "aws_elastic_block_store",
        "awsElasticBlockStore",
        [
            text("volume_id", "volumeID"),
            text("fs_type", "fsType"),
            int("partition", "partition"),
            int("read_only", "readOnly"),
        ]
    ),
    variant!(
        "gce_persistent_disk",
        "gcePersistentDisk",
        [
            text("pd_name", "pdName"),
            text("fs_type", "fsType"),
            int("partition", "partition"),
            int("read_only", "readOnly"),
        ]
    ),
    variant!(
        "azure_disk",
        "azureDisk",
        [
            text("disk_name", "diskName"),
            text("disk_uri", "diskURI"),
            text("caching_mode", "cachingMode"),
            text("fs_type", "fsType"),
            text("kind", "kind"),
            int("read_only", "readOnly"),
        ]
    ),
    variant!(
        "azure_file",
        "azureFile",
        [
            text("secret_name", "secretName"),
            text("share_name", "shareName"),
            int("read_only", "readOnly"),
        ]
    ),
    variant!(
        "cephfs",
        "cephfs",
        [
            text("monitors", "monitors"),
            text("path", "path"),
            text("user", "user"),
            text("secret_file", "secretFile"),
            text("secret_ref", "secretRef"),
            int("read_only", "readOnly"),
        ]
    ),
    variant!(
        "cinder",
        "cinder",
        [
            text("volume_id", "volumeID"),
            text("fs_type", "fsType"),
            text("secret_ref", "secretRef"),
            int("read_only", "readOnly"),
        ]
    ),
    variant!(
        "csi",
        "csi",
        [
            text("driver", "driver"),
            text("fs_type", "fsType"),
            int("read_only", "readOnly"),
            text("volume_attributes", "volumeAttributes"),
            text("node_publish_secret_ref", "nodePublishSecretRef"),
        ]
    ),
    variant!(
        "downward_api",
        "downwardAPI",
        [text("items", "items"), int("default_mode", "defaultMode")]
    ),
    variant!("ephemeral", "ephemeral", [text("volume_claim_template", "volumeClaimTemplate")]),
    variant!(
        "fc",
        "fc",
        [
            text("target_wwns", "targetWWNs"),
            int("lun", "lun"),
            text("wwids", "wwids"),
            text("fs_type", "fsType"),
            int("read_only", "readOnly"),
        ]
    ),
    variant!(
        "flex_volume",
        "flexVolume",
        [
            text("driver", "driver"),
            text("fs_type", "fsType"),
            text("secret_ref", "secretRef"),
            int("read_only", "readOnly"),
            text("options", "options"),
        ]
    ),
    variant!(
        "flocker",
        "flocker",
        [text("dataset_name", "datasetName"), text("dataset_uuid", "datasetUUID")]
    ),
    variant!(
        "git_repo",
        "gitRepo",
        [
            text("repository", "repository"),
            text("revision", "revision"),
            text("directory", "directory"),
        ]
    ),
    variant!(
        "glusterfs",
        "glusterfs",
        [
            text("endpoints", "endpoints"),
            text("path", "path"),
            int("read_only", "readOnly"),
        ]
    ),
    variant!("image", "image", [text("reference", "reference"), text("pull_policy", "pullPolicy")]),
    variant!(
        "iscsi",
        "iscsi",
        [
            text("target_portal", "targetPortal"),
            text("iqn", "iqn"),
            int("lun", "lun"),
            text("iscsi_interface", "iscsiInterface"),
            text("fs_type", "fsType"),
            int("read_only", "readOnly"),
            text("portals", "portals"),
            int("discovery_chap_auth", "chapAuthDiscovery"),
            int("session_chap_auth", "chapAuthSession"),
            text("secret_ref", "secretRef"),
            text("initiator_name", "initiatorName"),
        ]
    ),
    variant!(
        "nfs",
        "nfs",
        [text("server", "server"), text("path", "path"), int("read_only", "readOnly")]
    ),
    variant!(
        "photon_persistent_disk",
        "photonPersistentDisk",
        [text("pd_id", "pdID"), text("fs_type", "fsType")]
    ),
    variant!(
        "portworx_volume",
        "portworxVolume",
        [
            text("volume_id", "volumeID"),
            text("fs_type", "fsType"),
            int("read_only", "readOnly"),
        ]
    ),
    variant!(
        "projected",
        "projected",
        [text("sources", "sources"), int("default_mode", "defaultMode")]
    ),
    variant!(
        "quobyte",
        "quobyte",
        [
            text("registry", "registry"),
            text("volume", "volume"),
            text("user", "user"),
            text("group", "group"),
            text("tenant", "tenant"),
            int("read_only", "readOnly"),
        ]
    ),
    variant!(
        "rbd",
        "rbd",
        [
            text("monitors", "monitors"),
            text("image", "image"),
            text("pool", "pool"),
            text("user", "user"),
            text("keyring", "keyring"),
            text("fs_type", "fsType"),
            text("secret_ref", "secretRef"),
            int("read_only", "readOnly"),
        ]
    ),
    variant!(
        "scale_io",
        "scaleIO",
        [
            text("gateway", "gateway"),
            text("system", "system"),
            text("secret_ref", "secretRef"),
            int("ssl_enabled", "sslEnabled"),
            text("protection_domain", "protectionDomain"),
            text("storage_pool", "storagePool"),
            text("storage_mode", "storageMode"),
            text("volume_name", "volumeName"),
            text("fs_type", "fsType"),
            int("read_only", "readOnly"),
        ]
    ),
    variant!(
        "storageos",
        "storageos",
        [
            text("volume_name", "volumeName"),
            text("volume_namespace", "volumeNamespace"),
            text("fs_type", "fsType"),
            text("secret_ref", "secretRef"),
            int("read_only", "readOnly"),
        ]
    ),
    variant!(
        "vsphere_volume",
        "vsphereVolume",
        [
            text("volume_path", "volumePath"),
            text("fs_type", "fsType"),
            text("storage_policy_name", "storagePolicyName"),
            text("storage_policy_id", "storagePolicyID"),
        ]
    ),
];

/// The active source of a volume, kept as the API encoded it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeSource {
    variant: Option<&'static VolumeVariant>,
    fields: Map<String, Value>,
}

fn column_name(variant: &VolumeVariant, field: &VariantField) -> String {
    format!("{}_{}", variant.tag, field.column)
}

impl Union for VolumeSource {
    fn describe<V: Visitor>(visitor: &mut V) -> Result<(), ProjectionError> {
        visitor.column(DISCRIMINATOR, SqlKind::Text, || Ok(None))?;
        for variant in VARIANTS {
            for field in variant.fields {
                visitor.column(&column_name(variant, field), field.kind, || Ok(None))?;
            }
        }
        Ok(())
    }

    fn project<V: Visitor>(&self, visitor: &mut V) -> Result<(), ProjectionError> {
        let Some(variant) = self.variant else {
            return visitor.column(DISCRIMINATOR, SqlKind::Text, || Ok(None));
        };
        visitor.column(DISCRIMINATOR, SqlKind::Text, || Ok(Some(variant.tag.to_string())))?;
        for field in variant.fields {
            let value = self.fields.get(field.key).unwrap_or(&Value::Null);
            visitor.column(&column_name(variant, field), field.kind, || field.render(value))?;
        }
        Ok(())
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct VolumeSummary {
        pub name: String,
        #[union]
        pub source: VolumeSource,
    }
}

pub fn volume_summary(volume: &Volume) -> Result<VolumeSummary, ProjectionError> {
    let encoded = serde_json::to_value(volume).map_err(|source| ProjectionError {
        column: DISCRIMINATOR.to_string(),
        source,
    })?;
    let mut source = VolumeSource::default();
    if let Value::Object(mut object) = encoded {
        if let Some(variant) = VARIANTS.iter().find(|v| object.contains_key(v.key)) {
            source.variant = Some(variant);
            if let Some(Value::Object(fields)) = object.remove(variant.key) {
                source.fields = fields;
            }
        }
    }
    Ok(VolumeSummary {
        name: volume.name.clone(),
        source,
    })
}

/// Volumes of a pod spec in spec order.
pub fn pod_volumes(spec: Option<&PodSpec>) -> Result<Vec<VolumeSummary>, ProjectionError> {
    spec.and_then(|s| s.volumes.as_ref())
        .into_iter()
        .flatten()
        .map(volume_summary)
        .collect()
}
