use std::collections::BTreeMap;
use std::time::Duration;

use chrono::DateTime;
use k8s_openapi::api::apps::v1::{
    DaemonSetUpdateStrategy, DeploymentStrategy, StatefulSetPersistentVolumeClaimRetentionPolicy,
    StatefulSetUpdateStrategy,
};
use k8s_openapi::api::core::v1::{Probe, ResourceRequirements};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, Time};
use k8s_openapi::serde_json::{self, Value};
use k8s_openapi::ByteString;
use serde::ser::Error as _;
use serde::Serialize;

use super::json;
use crate::structs::SqlKind;

/// A value that occupies exactly one column.
pub trait Leaf {
    const KIND: SqlKind;

    /// The column's string form, or `None` when the key is omitted.
    fn render(&self) -> Result<Option<String>, serde_json::Error>;
}

impl Leaf for String {
    const KIND: SqlKind = SqlKind::Text;

    fn render(&self) -> Result<Option<String>, serde_json::Error> {
        Ok((!self.is_empty()).then(|| self.clone()))
    }
}

impl Leaf for bool {
    const KIND: SqlKind = SqlKind::Integer;

    fn render(&self) -> Result<Option<String>, serde_json::Error> {
        Ok(Some(if *self { "1" } else { "0" }.to_string()))
    }
}

impl Leaf for i32 {
    const KIND: SqlKind = SqlKind::Integer;

    fn render(&self) -> Result<Option<String>, serde_json::Error> {
        Ok(Some(self.to_string()))
    }
}

impl Leaf for i64 {
    const KIND: SqlKind = SqlKind::BigInt;

    fn render(&self) -> Result<Option<String>, serde_json::Error> {
        Ok(Some(self.to_string()))
    }
}

impl<T: Leaf> Leaf for Option<T> {
    const KIND: SqlKind = T::KIND;

    fn render(&self) -> Result<Option<String>, serde_json::Error> {
        match self {
            Some(value) => value.render(),
            None => Ok(None),
        }
    }
}

impl<T: Serialize> Leaf for Vec<T> {
    const KIND: SqlKind = SqlKind::Text;

    fn render(&self) -> Result<Option<String>, serde_json::Error> {
        if self.is_empty() {
            return Ok(None);
        }
        json::to_canonical_string(self)
    }
}

impl<V: Serialize> Leaf for BTreeMap<String, V> {
    const KIND: SqlKind = SqlKind::Text;

    fn render(&self) -> Result<Option<String>, serde_json::Error> {
        if self.is_empty() {
            return Ok(None);
        }
        json::to_canonical_string(self)
    }
}

/// Seconds since the epoch.
impl Leaf for Time {
    const KIND: SqlKind = SqlKind::BigInt;

    fn render(&self) -> Result<Option<String>, serde_json::Error> {
        let seconds = match serde_json::to_value(self)? {
            Value::String(s) => DateTime::parse_from_rfc3339(&s)
                .map_err(serde_json::Error::custom)?
                .timestamp(),
            other => {
                return Err(serde_json::Error::custom(format!(
                    "unexpected time encoding: {other}"
                )))
            }
        };
        Ok((seconds != 0).then(|| seconds.to_string()))
    }
}

/// Whole seconds.
impl Leaf for Duration {
    const KIND: SqlKind = SqlKind::Text;

    fn render(&self) -> Result<Option<String>, serde_json::Error> {
        let seconds = self.as_secs();
        Ok((seconds != 0).then(|| seconds.to_string()))
    }
}

impl Leaf for Quantity {
    const KIND: SqlKind = SqlKind::Text;

    fn render(&self) -> Result<Option<String>, serde_json::Error> {
        let canonical: String = self.0.split_whitespace().collect();
        let number: String = canonical
            .chars()
            .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-'))
            .collect();
        let is_zero = number.parse::<f64>().map(|n| n == 0.0).unwrap_or(false);
        Ok((!canonical.is_empty() && !is_zero).then_some(canonical))
    }
}

/// Base64, the API's own encoding.
impl Leaf for ByteString {
    const KIND: SqlKind = SqlKind::Text;

    fn render(&self) -> Result<Option<String>, serde_json::Error> {
        if self.0.is_empty() {
            return Ok(None);
        }
        match serde_json::to_value(self)? {
            Value::String(s) => Ok(Some(s)),
            other => json::to_canonical_string(&other),
        }
    }
}

/// Named nested composites: one TEXT column of canonical JSON, omitted when
/// the composite encodes to `{}`.
macro_rules! composite_leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Leaf for $ty {
                const KIND: SqlKind = SqlKind::Text;

                fn render(&self) -> Result<Option<String>, serde_json::Error> {
                    json::to_canonical_string(self)
                }
            }
        )*
    };
}

composite_leaf!(
    LabelSelector,
    ResourceRequirements,
    Probe,
    DaemonSetUpdateStrategy,
    DeploymentStrategy,
    StatefulSetUpdateStrategy,
    StatefulSetPersistentVolumeClaimRetentionPolicy,
);

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
    use k8s_openapi::api::apps::v1::RollingUpdateDaemonSet;

    #[test]
    fn test_string_empty_is_omitted() {
        assert_eq!(String::new().render().unwrap(), None);
        assert_eq!("x".to_string().render().unwrap(), Some("x".into()));
    }

    #[test]
    fn test_bool_renders_digits() {
        assert_eq!(true.render().unwrap().as_deref(), Some("1"));
        assert_eq!(false.render().unwrap().as_deref(), Some("0"));
    }

    #[test]
    fn test_optional_present_zero_is_emitted() {
        assert_eq!(Some(0i32).render().unwrap().as_deref(), Some("0"));
        assert_eq!(None::<i32>.render().unwrap(), None);
    }

    #[test]
    fn test_time_renders_epoch_seconds() {
        let time: Time = serde_json::from_value(Value::String("2021-01-12T18:30:16Z".into())).unwrap();
        assert_eq!(time.render().unwrap().as_deref(), Some("1610476216"));
    }

    #[test]
    fn test_duration_whole_seconds() {
        assert_eq!(Duration::from_millis(90_500).render().unwrap().as_deref(), Some("90"));
        assert_eq!(Duration::ZERO.render().unwrap(), None);
    }

    #[test]
    fn test_quantity_canonical_and_zero() {
        assert_eq!(Quantity("250m".into()).render().unwrap().as_deref(), Some("250m"));
        assert_eq!(Quantity(" 1 Gi".into()).render().unwrap().as_deref(), Some("1Gi"));
        assert_eq!(Quantity("0".into()).render().unwrap(), None);
        assert_eq!(Quantity("0Mi".into()).render().unwrap(), None);
    }

    #[test]
    fn test_byte_string_base64() {
        assert_eq!(ByteString(b"hi".to_vec()).render().unwrap().as_deref(), Some("aGk="));
        assert_eq!(ByteString(Vec::new()).render().unwrap(), None);
    }

    #[test]
    fn test_empty_vec_and_map_omitted() {
        assert_eq!(Vec::<String>::new().render().unwrap(), None);
        assert_eq!(BTreeMap::<String, String>::new().render().unwrap(), None);
    }

    #[test]
    fn test_composite_sorted_keys() {
        let strategy = DaemonSetUpdateStrategy {
            type_: Some("RollingUpdate".into()),
            rolling_update: Some(RollingUpdateDaemonSet {
                max_unavailable: Some(IntOrString::Int(1)),
                ..Default::default()
            }),
        };
        assert_eq!(
            strategy.render().unwrap().as_deref(),
            Some(r#"{"rollingUpdate":{"maxUnavailable":1},"type":"RollingUpdate"}"#)
        );
        assert_eq!(ResourceRequirements::default().render().unwrap(), None);
    }
}
