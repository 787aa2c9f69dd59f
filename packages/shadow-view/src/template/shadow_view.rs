//! Compiled Shadow View
//!
//! The immutable artifact produced by the compiler: a placeholder-free
//! skeleton, the bound locations of every property recorded as structural
//! paths, and the nested views of iteration regions.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use super::expression::ReconstructionExpression;
use super::path::StructuralPath;
use crate::dom::{Document, NodeId};

/// One location a property writes to, recorded against the skeleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingRecord {
    pub path: StructuralPath,
    /// Shared between every property of a multi-placeholder attribute.
    pub expression: Arc<ReconstructionExpression>,
}

/// A repeated sub-template excised from its parent.
#[derive(Debug, Clone)]
pub struct IterationRegion {
    /// Path of the node generated children are appended to.
    pub anchor: StructuralPath,
    pub view: Arc<ShadowView>,
}

#[derive(Debug, Clone)]
pub struct ShadowView {
    pub(crate) skeleton: Document,
    pub(crate) root: NodeId,
    pub(crate) property_names: Vec<String>,
    pub(crate) bound_locations: Vec<Vec<BindingRecord>>,
    pub(crate) iteration_regions: IndexMap<String, IterationRegion>,
    pub(crate) target_class: String,
}

/// How one property of a view is wired into an instance.
#[derive(Debug, Clone, Copy)]
pub enum ViewBinding<'a> {
    Leaf {
        name: &'a str,
        locations: &'a [BindingRecord],
    },
    Iterating {
        name: &'a str,
        region: &'a IterationRegion,
    },
}

impl<'a> ViewBinding<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            ViewBinding::Leaf { name, .. } | ViewBinding::Iterating { name, .. } => name,
        }
    }
}

impl ShadowView {
    pub fn skeleton(&self) -> &Document {
        &self.skeleton
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn property_names(&self) -> &[String] {
        &self.property_names
    }

    pub fn target_class(&self) -> &str {
        &self.target_class
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.property_names.iter().position(|p| p == name)
    }

    /// Locations recorded for the property at `index`.
    pub fn bound_locations(&self, index: usize) -> &[BindingRecord] {
        self.bound_locations
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn locations_of(&self, name: &str) -> &[BindingRecord] {
        self.index_of(name)
            .map(|index| self.bound_locations(index))
            .unwrap_or_default()
    }

    pub fn iteration_regions(&self) -> &IndexMap<String, IterationRegion> {
        &self.iteration_regions
    }

    pub fn iteration_region(&self, name: &str) -> Option<&IterationRegion> {
        self.iteration_regions.get(name)
    }

    /// Every property an instance of this view exposes: bound properties with
    /// at least one location, in index order, then iteration properties. A
    /// name that drives a region is only reported as iterating.
    pub fn bindings(&self) -> impl Iterator<Item = ViewBinding<'_>> + '_ {
        let leaves = self
            .property_names
            .iter()
            .zip(&self.bound_locations)
            .filter(move |(name, locations)| {
                !locations.is_empty() && !self.iteration_regions.contains_key(name.as_str())
            })
            .map(|(name, locations)| ViewBinding::Leaf {
                name,
                locations,
            });
        let regions = self
            .iteration_regions
            .iter()
            .map(|(name, region)| ViewBinding::Iterating { name, region });
        leaves.chain(regions)
    }

    /// Markup of the placeholder-free skeleton.
    pub fn skeleton_html(&self) -> String {
        self.skeleton.to_html(self.root)
    }

    pub fn summary(&self) -> ViewSummary {
        ViewSummary {
            target_class: self.target_class.clone(),
            skeleton: self.skeleton_html(),
            properties: self
                .property_names
                .iter()
                .zip(&self.bound_locations)
                .map(|(name, locations)| PropertySummary {
                    name: name.clone(),
                    bindings: locations.len(),
                    paths: locations.iter().map(|r| r.path.to_string()).collect(),
                })
                .collect(),
            regions: self
                .iteration_regions
                .iter()
                .map(|(name, region)| {
                    (
                        name.clone(),
                        RegionSummary {
                            anchor: region.anchor.to_string(),
                            view: region.view.summary(),
                        },
                    )
                })
                .collect(),
        }
    }
}

/// Serializable description of a compiled view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSummary {
    pub target_class: String,
    pub skeleton: String,
    pub properties: Vec<PropertySummary>,
    pub regions: IndexMap<String, RegionSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertySummary {
    pub name: String,
    pub bindings: usize,
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionSummary {
    pub anchor: String,
    pub view: ViewSummary,
}
