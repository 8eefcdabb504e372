//! Structure Assembler
//!
//! Turns a [`LayoutPlan`] into bodies inside a [`PhysicsWorld`]. Requests are
//! created in plan order; the world sees exactly the same sequence of calls
//! for the same plan.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info};

use super::layout::{GROUND_NAME, LayoutPlan, TABLE_NAME};
use crate::geometry::{ElementRole, GeometryError, SolidRequest, SolidShape};
use crate::physics::{BodyHandle, MaterialProperties, PhysicsWorld, Vec3, WorldError};

#[derive(Debug, Error, PartialEq)]
pub enum AssemblyError {
    #[error("element name {0:?} used twice")]
    DuplicateName(String),
    #[error("layout has no {0:?} element")]
    MissingElement(ElementRole),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("world rejected {name:?}: {source}")]
    World {
        name: String,
        #[source]
        source: WorldError,
    },
}

/// Bodies created for one plan, by element name.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledStructure {
    pub bodies: BTreeMap<String, BodyHandle>,
    pub ground: BodyHandle,
    pub table: BodyHandle,
}

impl AssembledStructure {
    pub fn get(&self, name: &str) -> Option<BodyHandle> {
        self.bodies.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

/// Create every solid of `plan` in `world`.
///
/// Box solids are created around their center. Column point clouds are
/// shifted so the body frame sits at the segment centroid, then posed there.
pub fn assemble<W: PhysicsWorld + ?Sized>(
    world: &mut W,
    plan: &LayoutPlan,
    material: &MaterialProperties,
) -> Result<AssembledStructure, AssemblyError> {
    let mut bodies = BTreeMap::new();
    let mut ground = None;
    let mut table = None;

    for request in &plan.requests {
        if bodies.contains_key(&request.name) {
            return Err(AssemblyError::DuplicateName(request.name.clone()));
        }
        let handle =
            create_solid(world, request, material).map_err(|source| AssemblyError::World {
                name: request.name.clone(),
                source,
            })?;
        debug!(name = %request.name, %handle, role = ?request.role, "solid created");

        match request.role {
            ElementRole::Ground if request.name == GROUND_NAME => ground = Some(handle),
            ElementRole::ShakeTable if request.name == TABLE_NAME => table = Some(handle),
            _ => {}
        }
        bodies.insert(request.name.clone(), handle);
    }

    let ground = ground.ok_or(AssemblyError::MissingElement(ElementRole::Ground))?;
    let table = table.ok_or(AssemblyError::MissingElement(ElementRole::ShakeTable))?;
    info!(variant = %plan.variant, solids = bodies.len(), "structure assembled");

    Ok(AssembledStructure {
        bodies,
        ground,
        table,
    })
}

fn create_solid<W: PhysicsWorld + ?Sized>(
    world: &mut W,
    request: &SolidRequest,
    material: &MaterialProperties,
) -> Result<BodyHandle, WorldError> {
    let handle = match &request.shape {
        SolidShape::Box { size, density } => {
            world.create_box_solid(*size, *density, material, request.collide, request.visible)?
        }
        SolidShape::Column(spec) => {
            let centroid = Vec3::new(0.0, spec.height() / 2.0, 0.0);
            let points = spec.point_cloud().relative_to(centroid);
            world.create_convex_solid(
                &points,
                spec.density(),
                material,
                request.collide,
                request.visible,
            )?
        }
    };
    world.set_pose(handle, request.pose)?;
    if request.fixed {
        world.set_body_fixed(handle, true)?;
    }
    Ok(handle)
}
