//! The collision boundary between the engine and the registry
//!
//! Once per tick every candidate geom pair from the engine is routed here.
//! Rays record hits without generating force. Solid pairs pass through the
//! collision policy; accepted pairs become contact constraints and land in
//! the contact ledger.

use crate::collision::Verdict;
use crate::core::error::Result;
use crate::core::types::Handle;
use crate::physics::{GeomId, PhysicsEngine, SurfaceParams};
use crate::simulation::context::{GeomOwner, GeomTag};
use crate::simulation::environment::Environment;

/// What one collision pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactStats {
    pub candidates: usize,
    pub ray_hits: usize,
    pub connected: usize,
    pub rejected: usize,
    pub accepted: usize,
    /// Contact constraints handed to the engine
    pub contacts: usize,
}

/// Run one collision pass over the engine's candidate pairs
pub fn resolve_contacts(
    env: &mut Environment,
    engine: &mut dyn PhysicsEngine,
    contacts_per_pair: usize,
    surface: SurfaceParams,
) -> Result<ContactStats> {
    let mut stats = ContactStats::default();
    for (a, b) in engine.candidate_pairs() {
        stats.candidates += 1;
        let (Some(tag_a), Some(tag_b)) = (env.geom_tag(a).cloned(), env.geom_tag(b).cloned())
        else {
            tracing::trace!(%a, %b, "Skipping untagged geom pair");
            continue;
        };

        match (tag_a.owner, tag_b.owner) {
            (GeomOwner::Ray(_), GeomOwner::Ray(_)) => {}
            (GeomOwner::Ray(ray), _) => {
                if cast_ray(env, engine, ray, a, b, &tag_b)? {
                    stats.ray_hits += 1;
                }
            }
            (_, GeomOwner::Ray(ray)) => {
                if cast_ray(env, engine, ray, b, a, &tag_a)? {
                    stats.ray_hits += 1;
                }
            }
            _ => {
                let verdict = env.policy().judge(
                    tag_a.group.as_deref(),
                    tag_b.group.as_deref(),
                    || match (engine.geom_body(a), engine.geom_body(b)) {
                        (Some(first), Some(second)) => engine.are_connected(first, second),
                        _ => false,
                    },
                );
                match verdict {
                    Verdict::Connected => stats.connected += 1,
                    Verdict::Rejected => stats.rejected += 1,
                    Verdict::Accepted => {
                        let contacts = engine.collide(a, b, contacts_per_pair);
                        if contacts.is_empty() {
                            continue;
                        }
                        stats.accepted += 1;
                        stats.contacts += contacts.len();
                        for contact in contacts {
                            engine.add_contact(contact, surface);
                        }
                        env.record_contact(tag_a.owner.handle(), tag_b.owner.handle());
                    }
                }
            }
        }
    }
    Ok(stats)
}

/// Record the nearest hit of `ray` against `other`; rays see bodies
fn cast_ray(
    env: &mut Environment,
    engine: &dyn PhysicsEngine,
    ray: Handle,
    ray_geom: GeomId,
    other: GeomId,
    other_tag: &GeomTag,
) -> Result<bool> {
    let Some(hit) = engine.collide(ray_geom, other, 1).into_iter().next() else {
        return Ok(false);
    };
    if let Some(ray) = env.resolve_mut(ray)?.as_ray_mut() {
        ray.record_hit(hit.depth, other_tag.color);
    }
    if let GeomOwner::Body(body) = other_tag.owner {
        if let Some(body) = env.resolve_mut(body)?.as_body_mut() {
            body.mark_seen();
        }
    }
    Ok(true)
}
