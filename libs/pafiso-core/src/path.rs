//! Field path resolution.

use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::schema::{FieldDef, FieldType, Queryable, Schema};
use crate::settings::PafisoSettings;
use crate::value::FieldKind;

/// A dotted field path resolved against an entity schema.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<&'static str>,
    kind: FieldKind,
    nullable: bool,
}

impl FieldPath {
    /// The path as the caller supplied it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Declared field names from the root entity to the leaf.
    pub fn segments(&self) -> &[&'static str] {
        &self.segments
    }

    /// Declared names joined with `.`.
    pub fn declared(&self) -> String {
        self.segments.join(".")
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// `true` when any segment along the path may be absent.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

type CacheKey = (TypeId, String, PafisoSettings);

static PATH_CACHE: Lazy<DashMap<CacheKey, Arc<FieldPath>>> = Lazy::new(DashMap::new);

/// Resolves `field_path` on `T`, memoized per type, path and settings.
pub fn resolve<T: Queryable + 'static>(
    field_path: &str,
    settings: &PafisoSettings,
) -> Result<Arc<FieldPath>> {
    let key = (TypeId::of::<T>(), field_path.to_string(), settings.clone());
    if let Some(hit) = PATH_CACHE.get(&key) {
        return Ok(Arc::clone(hit.value()));
    }

    let resolved = Arc::new(resolve_in(T::schema(), field_path, settings)?);
    tracing::trace!(
        entity = T::schema().name(),
        field = field_path,
        declared = %resolved.declared(),
        kind = %resolved.kind(),
        "resolved field path"
    );
    PATH_CACHE.insert(key, Arc::clone(&resolved));
    Ok(resolved)
}

/// Uncached resolution against an explicit schema.
pub fn resolve_in(
    root: &'static Schema,
    field_path: &str,
    settings: &PafisoSettings,
) -> Result<FieldPath> {
    let unknown = || Error::UnknownField {
        entity: root.name(),
        field: field_path.to_string(),
    };

    let parts: Vec<&str> = field_path.split('.').collect();
    let mut schema = root;
    let mut segments = Vec::with_capacity(parts.len());
    let mut nullable = false;
    let mut kind = None;

    for (i, part) in parts.iter().enumerate() {
        let last = i + 1 == parts.len();
        let def = match_segment(schema, part, settings).ok_or_else(unknown)?;
        segments.push(def.name);
        nullable |= def.nullable;

        match def.ty {
            FieldType::Nested(next) if !last => schema = next(),
            FieldType::Nested(_) => kind = Some(FieldKind::Object),
            FieldType::Leaf(k) if last => kind = Some(k),
            // cannot descend into a leaf
            FieldType::Leaf(_) => return Err(unknown()),
        }
    }

    Ok(FieldPath {
        raw: field_path.to_string(),
        segments,
        kind: kind.ok_or_else(unknown)?,
        nullable,
    })
}

fn match_segment<'s>(
    schema: &'s Schema,
    segment: &str,
    settings: &PafisoSettings,
) -> Option<&'s FieldDef> {
    if segment.is_empty() {
        return None;
    }
    let fields = schema.fields();

    if settings.use_field_name_overrides {
        if let Some(f) = fields.iter().find(|f| f.rename == Some(segment)) {
            return Some(f);
        }
    }
    if let Some(policy) = settings.naming_policy {
        if let Some(f) = fields.iter().find(|f| policy.apply(f.name) == segment) {
            return Some(f);
        }
    }
    fields.iter().find(|f| f.name == segment)
}
