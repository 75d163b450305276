use serde::{Deserialize, Serialize};

use crate::appearance::resolve::ResolvedAppearance;
use crate::foundation::core::{RasterImage, Rgb8};
use crate::scene::graph::{Material, ModelInstance, NodeId, Shading};

/// Role a drawable node plays on the bag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotRole {
    /// Bag body; tinted with the body color.
    Body,
    /// Brand logo; left as authored.
    Logo,
    /// Printed flavor name.
    Text,
    /// Printed picture.
    Image,
}

impl SlotRole {
    /// Roles in positional order.
    pub const ALL: [SlotRole; 4] = [Self::Body, Self::Logo, Self::Text, Self::Image];
}

/// Node names that identify each role in a model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotNames {
    /// Body node name.
    pub body: String,
    /// Logo node name.
    pub logo: String,
    /// Text node name.
    pub text: String,
    /// Image node name.
    pub image: String,
}

impl Default for SlotNames {
    fn default() -> Self {
        Self {
            body: "body".to_owned(),
            logo: "logo".to_owned(),
            text: "text".to_owned(),
            image: "image".to_owned(),
        }
    }
}

impl SlotNames {
    /// Name configured for `role`.
    pub fn name_for(&self, role: SlotRole) -> &str {
        match role {
            SlotRole::Body => &self.body,
            SlotRole::Logo => &self.logo,
            SlotRole::Text => &self.text,
            SlotRole::Image => &self.image,
        }
    }
}

/// How the slots of an instance were found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotLookup {
    /// At least one configured name matched a drawable.
    Named,
    /// Drawables bound by traversal position.
    Positional,
}

/// Drawable nodes bound to each role; unbound roles are `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundSlots {
    /// Body node.
    pub body: Option<NodeId>,
    /// Logo node.
    pub logo: Option<NodeId>,
    /// Text node.
    pub text: Option<NodeId>,
    /// Image node.
    pub image: Option<NodeId>,
    /// Lookup strategy that produced the binding.
    pub lookup: SlotLookup,
}

impl BoundSlots {
    /// Node bound to `role`.
    pub fn get(&self, role: SlotRole) -> Option<NodeId> {
        match role {
            SlotRole::Body => self.body,
            SlotRole::Logo => self.logo,
            SlotRole::Text => self.text,
            SlotRole::Image => self.image,
        }
    }

    fn set(&mut self, role: SlotRole, id: NodeId) {
        match role {
            SlotRole::Body => self.body = Some(id),
            SlotRole::Logo => self.logo = Some(id),
            SlotRole::Text => self.text = Some(id),
            SlotRole::Image => self.image = Some(id),
        }
    }
}

const SLOT_METALNESS: f32 = 0.1;
const SLOT_ROUGHNESS: f32 = 0.3;

/// Find role nodes among the instance's drawables.
///
/// Named lookup wins whenever any configured name matches a drawable (case-insensitively);
/// in that case roles without a matching node stay unbound. Otherwise drawables are taken by
/// position: body, logo, text, image.
pub fn locate_slots(instance: &ModelInstance, names: &SlotNames) -> BoundSlots {
    let drawables = instance.graph.drawables();
    let mut slots = BoundSlots {
        body: None,
        logo: None,
        text: None,
        image: None,
        lookup: SlotLookup::Positional,
    };

    for role in SlotRole::ALL {
        let wanted = names.name_for(role);
        if wanted.is_empty() {
            continue;
        }
        let hit = drawables.iter().copied().find(|&id| {
            instance
                .graph
                .node(id)
                .is_some_and(|n| n.name.eq_ignore_ascii_case(wanted))
        });
        if let Some(id) = hit {
            slots.set(role, id);
            slots.lookup = SlotLookup::Named;
        }
    }
    if slots.lookup == SlotLookup::Named {
        return slots;
    }

    for (role, id) in SlotRole::ALL.into_iter().zip(drawables) {
        slots.set(role, id);
    }
    slots
}

/// Bind an appearance onto a model instance and return the located slots.
///
/// Body gets an opaque lit material in the body color; text gets a transparent lit material
/// carrying `text_texture` (opacity 1); image gets an unlit transparent material at opacity 0
/// until [`apply_image_texture`] runs. Logo and missing roles are left untouched.
#[tracing::instrument(skip_all, fields(label = %appearance.label))]
pub fn bind_appearance(
    instance: &mut ModelInstance,
    appearance: &ResolvedAppearance,
    text_texture: RasterImage,
    names: &SlotNames,
) -> BoundSlots {
    let slots = locate_slots(instance, names);
    tracing::debug!(?slots, "slots located");

    set_material(
        instance,
        slots.body,
        Material::standard(appearance.body_color, SLOT_METALNESS, SLOT_ROUGHNESS),
    );
    set_material(
        instance,
        slots.text,
        Material {
            shading: Shading::Standard {
                metalness: SLOT_METALNESS,
                roughness: SLOT_ROUGHNESS,
            },
            color: Rgb8::new(0xff, 0xff, 0xff),
            opacity: 1.0,
            transparent: true,
            map: Some(text_texture),
        },
    );
    set_material(
        instance,
        slots.image,
        Material {
            shading: Shading::Basic { tone_mapped: false },
            color: Rgb8::new(0xff, 0xff, 0xff),
            opacity: 0.0,
            transparent: true,
            map: None,
        },
    );
    slots
}

/// Put the composited image on the image slot and make it fully opaque.
///
/// Returns `false` (and changes nothing) when the model has no image slot.
pub fn apply_image_texture(instance: &mut ModelInstance, slots: &BoundSlots, texture: RasterImage) -> bool {
    let Some(node) = slots.image.and_then(|id| instance.graph.node_mut(id)) else {
        return false;
    };
    let material = node.material.get_or_insert_with(|| Material {
        shading: Shading::Basic { tone_mapped: false },
        color: Rgb8::new(0xff, 0xff, 0xff),
        opacity: 0.0,
        transparent: true,
        map: None,
    });
    material.map = Some(texture);
    material.opacity = 1.0;
    true
}

fn set_material(instance: &mut ModelInstance, slot: Option<NodeId>, material: Material) {
    if let Some(node) = slot.and_then(|id| instance.graph.node_mut(id)) {
        node.material = Some(material);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/binder.rs"]
mod tests;
