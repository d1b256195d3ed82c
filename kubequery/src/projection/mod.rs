//! Schema reflection and row projection.
//!
//! A row type describes itself once, through [`Record::visit`]. Walking that
//! description with a [`SchemaBuilder`] yields the table's ordered column list;
//! walking it with a [`RowBuilder`] yields one row. Because both walks share a
//! single description, every key a row can carry is a column of its schema.
//!
//! Row types are normally declared with the [`record!`](crate::record) macro.

pub mod json;
mod leaf;
mod macros;

use k8s_openapi::serde_json;

pub use leaf::Leaf;

use crate::errors::ProjectionError;
use crate::structs::{Column, Row, SqlKind};

/// A type that can be flattened into columns.
pub trait Record {
    fn visit<V: Visitor>(&self, visitor: &mut V) -> Result<(), ProjectionError>;
}

/// A closed set of variants projected as a discriminator column plus the
/// flattened leaves of the active variant.
pub trait Union {
    /// Visits the discriminator and every variant's columns.
    fn describe<V: Visitor>(visitor: &mut V) -> Result<(), ProjectionError>;

    /// Visits the discriminator and the active variant's columns only.
    fn project<V: Visitor>(&self, visitor: &mut V) -> Result<(), ProjectionError>;
}

pub trait Visitor {
    /// Declares a column. `render` produces its value, `None` meaning the key
    /// is omitted from the row; schema walks never call it.
    fn column<F>(&mut self, name: &str, kind: SqlKind, render: F) -> Result<(), ProjectionError>
    where
        F: FnOnce() -> Result<Option<String>, serde_json::Error>;

    fn union<U: Union>(&mut self, value: &U) -> Result<(), ProjectionError>;

    fn leaf<L: Leaf>(&mut self, name: &str, value: &L) -> Result<(), ProjectionError> {
        self.column(name, L::KIND, || value.render())
    }

    /// Inlines an embedded composite: its columns join the parent's without
    /// a prefix.
    fn embed<R: Record>(&mut self, value: &R) -> Result<(), ProjectionError>
    where
        Self: Sized,
    {
        value.visit(self)
    }
}

/// Collects the ordered column list of a record.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    columns: Vec<Column>,
}

impl SchemaBuilder {
    pub fn finish(self) -> Vec<Column> {
        self.columns
    }
}

impl Visitor for SchemaBuilder {
    fn column<F>(&mut self, name: &str, kind: SqlKind, _render: F) -> Result<(), ProjectionError>
    where
        F: FnOnce() -> Result<Option<String>, serde_json::Error>,
    {
        // Bundles may share a column (meta and container both carry `name`);
        // the first declaration fixes its position.
        match self.columns.iter().find(|c| c.name == name) {
            Some(existing) => assert_eq!(
                existing.kind, kind,
                "column `{name}` declared with conflicting sql kinds"
            ),
            None => self.columns.push(Column::new(name, kind)),
        }
        Ok(())
    }

    fn union<U: Union>(&mut self, _value: &U) -> Result<(), ProjectionError> {
        U::describe(self)
    }
}

/// Collects the values of one record instance.
#[derive(Debug, Default)]
pub struct RowBuilder {
    row: Row,
}

impl RowBuilder {
    pub fn finish(self) -> Row {
        self.row
    }
}

impl Visitor for RowBuilder {
    fn column<F>(&mut self, name: &str, _kind: SqlKind, render: F) -> Result<(), ProjectionError>
    where
        F: FnOnce() -> Result<Option<String>, serde_json::Error>,
    {
        let value = render().map_err(|source| ProjectionError {
            column: name.to_string(),
            source,
        })?;
        if let Some(value) = value {
            self.row.insert(name.to_string(), value);
        }
        Ok(())
    }

    fn union<U: Union>(&mut self, value: &U) -> Result<(), ProjectionError> {
        value.project(self)
    }
}

/// Ordered columns of `R`, reflected from its default instance.
pub fn schema_of<R: Record + Default>() -> Vec<Column> {
    let mut builder = SchemaBuilder::default();
    R::default()
        .visit(&mut builder)
        .expect("schema walks never render values");
    builder.finish()
}

pub fn project<R: Record>(record: &R) -> Result<Row, ProjectionError> {
    let mut builder = RowBuilder::default();
    record.visit(&mut builder)?;
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;

    use super::*;

    crate::record! {
        #[derive(Debug, Default)]
        struct Inner {
            uid: String,
            ready: bool,
        }
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct Outer {
            #[embed]
            inner: Inner,
            count: i32,
            generation: i64,
            limit: Option<i32>,
            labels: BTreeMap<String, String>,
            args: Option<Vec<String>>,
            selector: Option<LabelSelector>,
            uid: String,
        }
    }

    #[derive(Debug, Default)]
    struct Shape {
        circle: Option<u8>,
    }

    impl Union for Shape {
        fn describe<V: Visitor>(visitor: &mut V) -> Result<(), ProjectionError> {
            visitor.column("shape_type", SqlKind::Text, || Ok(None))?;
            visitor.column("circle_radius", SqlKind::Integer, || Ok(None))?;
            visitor.column("square_side", SqlKind::Integer, || Ok(None))
        }

        fn project<V: Visitor>(&self, visitor: &mut V) -> Result<(), ProjectionError> {
            match self.circle {
                Some(r) => {
                    visitor.column("shape_type", SqlKind::Text, || Ok(Some("circle".into())))?;
                    visitor.column("circle_radius", SqlKind::Integer, || Ok(Some(r.to_string())))
                }
                None => visitor.column("shape_type", SqlKind::Text, || Ok(None)),
            }
        }
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct Drawing {
            name: String,
            #[union]
            shape: Shape,
        }
    }

    fn names(columns: &[Column]) -> Vec<&str> {
        columns.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_schema_inlines_embedded_and_keeps_declaration_order() {
        let columns = schema_of::<Outer>();
        assert_eq!(
            names(&columns),
            vec!["uid", "ready", "count", "generation", "limit", "labels", "args", "selector"]
        );
        let kinds: Vec<SqlKind> = columns.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SqlKind::Text,
                SqlKind::Integer,
                SqlKind::Integer,
                SqlKind::BigInt,
                SqlKind::Integer,
                SqlKind::Text,
                SqlKind::Text,
                SqlKind::Text,
            ]
        );
    }

    #[test]
    fn test_schema_is_stable() {
        assert_eq!(schema_of::<Outer>(), schema_of::<Outer>());
    }

    #[test]
    fn test_project_zero_record() {
        let row = project(&Outer::default()).unwrap();
        let expected: Row = [("ready", "0"), ("count", "0"), ("generation", "0")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(row, expected);
    }

    #[test]
    fn test_project_populated_record() {
        let record = Outer {
            inner: Inner {
                uid: "abc".into(),
                ready: true,
            },
            count: 3,
            generation: 1 << 40,
            limit: Some(0),
            labels: [("b".to_string(), "2".to_string()), ("a".to_string(), "1".to_string())]
                .into_iter()
                .collect(),
            args: Some(vec!["start".into(), "--v=2".into()]),
            selector: Some(LabelSelector::default()),
            uid: "abc".into(),
        };
        let row = project(&record).unwrap();
        assert_eq!(row["uid"], "abc");
        assert_eq!(row["ready"], "1");
        assert_eq!(row["count"], "3");
        assert_eq!(row["generation"], "1099511627776");
        assert_eq!(row["limit"], "0");
        assert_eq!(row["labels"], r#"{"a":"1","b":"2"}"#);
        assert_eq!(row["args"], r#"["start","--v=2"]"#);
        // An empty selector serialises to `{}` and is elided.
        assert!(!row.contains_key("selector"));

        let schema = schema_of::<Outer>();
        assert!(row.keys().all(|k| schema.iter().any(|c| &c.name == k)));
    }

    #[test]
    fn test_union_describes_all_variants_projects_one() {
        assert_eq!(
            names(&schema_of::<Drawing>()),
            vec!["name", "shape_type", "circle_radius", "square_side"]
        );

        let row = project(&Drawing {
            name: "sun".into(),
            shape: Shape { circle: Some(7) },
        })
        .unwrap();
        assert_eq!(row.get("shape_type").map(String::as_str), Some("circle"));
        assert_eq!(row.get("circle_radius").map(String::as_str), Some("7"));
        assert!(!row.contains_key("square_side"));

        let row = project(&Drawing::default()).unwrap();
        assert!(row.is_empty());
    }
}
