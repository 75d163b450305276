use std::collections::HashMap;

use serde::Deserialize;

use crate::foundation::core::{RasterImage, Rgb8, Vec3};
use crate::foundation::error::{FlavorError, FlavorResult};
use crate::scene::view::ModelFit;

/// Index of a node inside a [`SceneGraph`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Node kind. Meshes and skinned meshes are drawable.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Transform-only grouping node.
    Group,
    /// Static mesh.
    Mesh,
    /// Mesh deformed by a skeleton.
    SkinnedMesh {
        /// Bone names in skin-joint order.
        skeleton: Vec<String>,
        /// Bone nodes of the owning graph the skeleton is bound to, parallel to `skeleton`.
        bones: Vec<NodeId>,
    },
    /// Skeleton joint.
    Bone,
}

impl NodeKind {
    /// `true` for meshes and skinned meshes.
    pub fn is_drawable(&self) -> bool {
        matches!(self, Self::Mesh | Self::SkinnedMesh { .. })
    }
}

/// Shading model of a material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shading {
    /// Lit, metallic/rough material.
    Standard {
        /// Metalness in `0..=1`.
        metalness: f32,
        /// Roughness in `0..=1`.
        roughness: f32,
    },
    /// Unlit material; texels are shown as-is.
    Basic {
        /// Whether renderer tone mapping applies.
        tone_mapped: bool,
    },
}

/// Surface material of a drawable node.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Shading model.
    pub shading: Shading,
    /// Base color (multiplied with `map` when present).
    pub color: Rgb8,
    /// Opacity in `0..=1`; only honoured when `transparent`.
    pub opacity: f32,
    /// Whether the material is alpha-blended.
    pub transparent: bool,
    /// Color texture.
    pub map: Option<RasterImage>,
}

impl Material {
    /// Opaque standard material of `color`.
    pub fn standard(color: Rgb8, metalness: f32, roughness: f32) -> Self {
        Self {
            shading: Shading::Standard {
                metalness,
                roughness,
            },
            color,
            opacity: 1.0,
            transparent: false,
            map: None,
        }
    }

    /// Effective opacity: `opacity` when transparent, else 1.
    pub fn effective_opacity(&self) -> f32 {
        if self.transparent {
            self.opacity.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// `true` when nothing of this material reaches the screen.
    pub fn is_invisible(&self) -> bool {
        self.effective_opacity() <= 0.0
    }
}

/// One node of the scene graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Node name from the asset (may be empty).
    pub name: String,
    /// Node kind.
    pub kind: NodeKind,
    /// Material of drawable nodes.
    pub material: Option<Material>,
    /// Parent node, `None` for roots.
    pub parent: Option<NodeId>,
    /// Children in document order.
    pub children: Vec<NodeId>,
}

/// Axis-aligned bounds of the model in asset units.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Bounds {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Bounds {
    /// Box center.
    pub fn center(&self) -> Vec3 {
        Vec3::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    /// Box extent per axis.
    pub fn size(&self) -> Vec3 {
        Vec3::new(
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        )
    }
}

/// Model scene graph stored as a pre-order arena: node `i` precedes all of its descendants and
/// arena order equals document traversal order.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    bounds: Option<Bounds>,
}

#[derive(Deserialize)]
struct ManifestDoc {
    #[serde(default)]
    bounds: Option<Bounds>,
    nodes: Vec<ManifestNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum ManifestKind {
    Group,
    Mesh,
    SkinnedMesh,
    Bone,
}

#[derive(Deserialize)]
struct ManifestNode {
    #[serde(default)]
    name: String,
    kind: ManifestKind,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    skeleton: Vec<String>,
    #[serde(default)]
    children: Vec<ManifestNode>,
}

/// Neutral gray used for drawables whose manifest gives no color.
const DEFAULT_MESH_COLOR: Rgb8 = Rgb8::new(0xcc, 0xcc, 0xcc);

impl SceneGraph {
    /// Parse a JSON model manifest.
    ///
    /// ```json
    /// { "bounds": { "min": {"x":-1,"y":-1,"z":-0.2}, "max": {"x":1,"y":1,"z":0.2} },
    ///   "nodes": [ { "name": "Bag", "kind": "mesh", "children": [] } ] }
    /// ```
    ///
    /// Skinned meshes list bone names under `skeleton`; every name must match a bone node.
    pub fn from_manifest_json(bytes: &[u8]) -> FlavorResult<Self> {
        let doc: ManifestDoc = serde_json::from_slice(bytes)
            .map_err(|e| FlavorError::validation(format!("model manifest: {e}")))?;

        let mut graph = Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            bounds: doc.bounds,
        };
        for n in &doc.nodes {
            let id = graph.push_manifest_node(n, None)?;
            graph.roots.push(id);
        }
        graph.bind_skeletons()?;
        Ok(graph)
    }

    fn push_manifest_node(&mut self, n: &ManifestNode, parent: Option<NodeId>) -> FlavorResult<NodeId> {
        let kind = match n.kind {
            ManifestKind::Group => NodeKind::Group,
            ManifestKind::Mesh => NodeKind::Mesh,
            ManifestKind::SkinnedMesh => NodeKind::SkinnedMesh {
                skeleton: n.skeleton.clone(),
                bones: Vec::new(),
            },
            ManifestKind::Bone => NodeKind::Bone,
        };
        let material = if kind.is_drawable() {
            let color = match n.color.as_deref() {
                None => DEFAULT_MESH_COLOR,
                Some(s) => Rgb8::parse_hex(s).ok_or_else(|| {
                    FlavorError::validation(format!("node '{}' has invalid color '{s}'", n.name))
                })?,
            };
            Some(Material::standard(color, 0.0, 1.0))
        } else {
            None
        };

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: n.name.clone(),
            kind,
            material,
            parent,
            children: Vec::new(),
        });
        for child in &n.children {
            let cid = self.push_manifest_node(child, Some(id))?;
            self.nodes[id.0].children.push(cid);
        }
        Ok(id)
    }

    /// Resolve every skinned mesh's bone names against this graph's own bone nodes.
    fn bind_skeletons(&mut self) -> FlavorResult<()> {
        let bones_by_name: HashMap<String, NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| matches!(n.kind, NodeKind::Bone))
            .map(|(i, n)| (n.name.clone(), NodeId(i)))
            .collect();

        for node in &mut self.nodes {
            let NodeKind::SkinnedMesh { skeleton, bones } = &mut node.kind else {
                continue;
            };
            let mut bound = Vec::with_capacity(skeleton.len());
            for bone in skeleton.iter() {
                let id = bones_by_name.get(bone).copied().ok_or_else(|| {
                    FlavorError::validation(format!(
                        "skinned mesh '{}' references unknown bone '{bone}'",
                        node.name
                    ))
                })?;
                bound.push(id);
            }
            *bones = bound;
        }
        Ok(())
    }

    /// All nodes in traversal order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Root nodes in document order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Model bounds, if the manifest provides them.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Mutably borrow a node.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Drawable nodes in traversal order.
    pub fn drawables(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind.is_drawable())
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    /// Create an independent, mutable copy for one rendered bag.
    ///
    /// Node ids are arena indices, so skinned meshes in the copy reference the copy's own
    /// bones; nothing in the instance aliases this graph.
    pub fn instantiate(&self) -> ModelInstance {
        ModelInstance {
            graph: self.clone(),
            transform: ModelTransform::default(),
        }
    }
}

/// Placement of a model instance in view space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelTransform {
    /// Translation.
    pub position: Vec3,
    /// Euler rotation in radians (XYZ).
    pub rotation: Vec3,
    /// Uniform scale.
    pub scale: f64,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self {
            position: Vec3::default(),
            rotation: Vec3::default(),
            scale: 1.0,
        }
    }
}

/// One bag's private copy of the model.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelInstance {
    /// Owned scene graph.
    pub graph: SceneGraph,
    /// Placement in view space.
    pub transform: ModelTransform,
}

impl ModelInstance {
    /// Normalize and place the model: scale so the largest bounds extent equals
    /// `fit.scale_factor` (unit extent when bounds are missing or degenerate), then apply the
    /// fit's position and rotation.
    pub fn fit_to_view(&mut self, fit: &ModelFit) {
        let (center, max_dim) = match self.graph.bounds() {
            Some(b) => (b.center(), b.size().max_component()),
            None => (Vec3::default(), 1.0),
        };
        let max_dim = if max_dim.is_finite() && max_dim > 0.0 {
            max_dim
        } else {
            1.0
        };

        let axis = |recenter: bool, offset: f64, c: f64| if recenter { offset - c } else { offset };
        self.transform = ModelTransform {
            position: Vec3::new(
                axis(fit.recenter[0], fit.offset.x, center.x),
                axis(fit.recenter[1], fit.offset.y, center.y),
                axis(fit.recenter[2], fit.offset.z, center.z),
            ),
            rotation: fit.rotation,
            scale: fit.scale_factor / max_dim,
        };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
