//! Deterministic reference engine
//!
//! Semi-implicit Euler on point masses, bounding-volume contact geometry and
//! joints reduced to a single internal coordinate each. It is enough to run
//! and test the pipeline headless; it is not a constraint solver, so jointed
//! bodies only follow their joint's coordinate, not its full constraint.

use crate::core::types::{DQuat, DVec3};
use crate::physics::{
    BodyId, ContactPoint, GeomId, JointId, JointKind, JointReading, JointSpec, PhysicsEngine,
    Shape, SpaceId, SurfaceParams,
};

/// Ray-terrain marching resolution
const RAY_MARCH_STEPS: usize = 64;
/// Penetration left uncorrected so resting contacts persist between ticks
const PENETRATION_SLOP: f64 = 1e-3;

#[derive(Debug, Clone)]
struct BodyState {
    position: DVec3,
    orientation: DQuat,
    velocity: DVec3,
    mass: f64,
    force: DVec3,
}

impl BodyState {
    fn inverse_mass(&self) -> f64 {
        if self.mass > 0.0 {
            1.0 / self.mass
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone)]
struct GeomState {
    space: SpaceId,
    shape: Shape,
    body: Option<BodyId>,
    /// World pose for static geoms, body-local offset otherwise
    position: DVec3,
    orientation: DQuat,
}

#[derive(Debug, Clone)]
struct JointState {
    spec: JointSpec,
    /// Anchor relative to the first body (or world) at creation
    anchor_offset: DVec3,
    position: f64,
    rate: f64,
    position2: f64,
    rate2: f64,
    motor_velocity: f64,
    max_force: Option<f64>,
    force: f64,
    torque2: f64,
}

impl JointState {
    fn motor_enabled(&self) -> bool {
        self.max_force.map_or(true, |limit| limit > 0.0)
    }
}

/// Headless physics world
#[derive(Debug, Clone)]
pub struct SandboxWorld {
    gravity: DVec3,
    space_parents: Vec<Option<SpaceId>>,
    bodies: Vec<BodyState>,
    geoms: Vec<GeomState>,
    joints: Vec<JointState>,
    contacts: Vec<(ContactPoint, SurfaceParams)>,
}

impl Default for SandboxWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SandboxWorld {
    pub fn new() -> Self {
        Self {
            gravity: DVec3::ZERO,
            // index 0 is the top-level space
            space_parents: vec![None],
            bodies: Vec::new(),
            geoms: Vec::new(),
            joints: Vec::new(),
            contacts: Vec::new(),
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn geom_count(&self) -> usize {
        self.geoms.len()
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn space_count(&self) -> usize {
        self.space_parents.len()
    }

    pub fn geoms_in_space(&self, space: SpaceId) -> usize {
        self.geoms.iter().filter(|geom| geom.space == space).count()
    }

    /// Contacts queued since the last advance
    pub fn pending_contacts(&self) -> usize {
        self.contacts.len()
    }

    fn body(&self, body: BodyId) -> &BodyState {
        &self.bodies[body.0 as usize]
    }

    fn body_mut(&mut self, body: BodyId) -> &mut BodyState {
        &mut self.bodies[body.0 as usize]
    }

    fn geom(&self, geom: GeomId) -> &GeomState {
        &self.geoms[geom.0 as usize]
    }

    /// World pose of a geom
    fn geom_pose(&self, geom: GeomId) -> (DVec3, DQuat) {
        let state = self.geom(geom);
        match state.body {
            Some(body) => {
                let body = self.body(body);
                (
                    body.position + body.orientation * state.position,
                    body.orientation * state.orientation,
                )
            }
            None => (state.position, state.orientation),
        }
    }

    fn inverse_mass_of(&self, geom: GeomId) -> f64 {
        self.geom(geom)
            .body
            .map_or(0.0, |body| self.body(body).inverse_mass())
    }

    fn velocity_of(&self, geom: GeomId) -> DVec3 {
        self.geom(geom)
            .body
            .map_or(DVec3::ZERO, |body| self.body(body).velocity)
    }

    fn joint_anchor(&self, joint: &JointState) -> DVec3 {
        match joint.spec.first {
            Some(body) => self.body(body).position + joint.anchor_offset,
            None => joint.anchor_offset,
        }
    }

    fn ray_hit(&self, ray: GeomId, length: f64, other: GeomId) -> Option<ContactPoint> {
        let (origin, orientation) = self.geom_pose(ray);
        let direction = orientation * DVec3::Z;
        let (center, other_orientation) = self.geom_pose(other);

        let distance = match &self.geom(other).shape {
            Shape::Ray { .. } => return None,
            Shape::Plane { normal, offset } => {
                let denom = normal.dot(direction);
                if denom.abs() < 1e-12 {
                    return None;
                }
                let t = (offset - normal.dot(origin)) / denom;
                (0.0..=length).contains(&t).then_some(t)?
            }
            Shape::HeightField(field) => {
                let step = length / RAY_MARCH_STEPS as f64;
                (0..=RAY_MARCH_STEPS).map(|i| i as f64 * step).find(|t| {
                    let local = other_orientation.inverse() * (origin + direction * *t - center);
                    field
                        .height_at(local.x, local.y)
                        .map_or(false, |h| local.z <= h)
                })?
            }
            shape => {
                let radius = shape.bounding_radius();
                let to_center = center - origin;
                let along = to_center.dot(direction);
                let miss_sq = to_center.length_squared() - along * along;
                if miss_sq > radius * radius {
                    return None;
                }
                let half_chord = (radius * radius - miss_sq).sqrt();
                let entry = along - half_chord;
                let t = if entry >= 0.0 { entry } else { along + half_chord };
                (0.0..=length).contains(&t).then_some(t)?
            }
        };

        Some(ContactPoint {
            first: ray,
            second: other,
            position: origin + direction * distance,
            normal: -direction,
            depth: distance,
        })
    }

    /// Contacts of a finite solid `a` against a static half-space or terrain `b`
    fn solid_against_static(&self, a: GeomId, b: GeomId, max: usize) -> Vec<ContactPoint> {
        let (center, orientation) = self.geom_pose(a);
        let (origin, static_orientation) = self.geom_pose(b);
        let shape = &self.geom(a).shape;

        let probes: Vec<DVec3> = match shape {
            Shape::Box { sides } => {
                let half = *sides * 0.5;
                let mut corners = Vec::with_capacity(8);
                for sx in [-1.0, 1.0] {
                    for sy in [-1.0, 1.0] {
                        for sz in [-1.0, 1.0] {
                            corners.push(center + orientation * (half * DVec3::new(sx, sy, sz)));
                        }
                    }
                }
                corners
            }
            _ => {
                let radius = shape.bounding_radius();
                match &self.geom(b).shape {
                    Shape::Plane { normal, .. } => vec![center - *normal * radius],
                    _ => vec![center - DVec3::Z * radius],
                }
            }
        };

        let mut contacts: Vec<ContactPoint> = probes
            .into_iter()
            .filter_map(|point| match &self.geom(b).shape {
                Shape::Plane { normal, offset } => {
                    let depth = offset - normal.dot(point);
                    (depth > 0.0).then_some(ContactPoint {
                        first: a,
                        second: b,
                        position: point,
                        normal: *normal,
                        depth,
                    })
                }
                Shape::HeightField(field) => {
                    let local = static_orientation.inverse() * (point - origin);
                    let height = field.height_at(local.x, local.y)?;
                    let depth = height - local.z;
                    (depth > 0.0).then_some(
                        ContactPoint {
                            first: a,
                            second: b,
                            position: point,
                            normal: static_orientation * DVec3::Z,
                            depth,
                        },
                    )
                }
                _ => None,
            })
            .collect();
        contacts.truncate(max);
        contacts
    }

    fn solid_against_solid(&self, a: GeomId, b: GeomId) -> Option<ContactPoint> {
        let (ca, _) = self.geom_pose(a);
        let (cb, _) = self.geom_pose(b);
        let ra = self.geom(a).shape.bounding_radius();
        let rb = self.geom(b).shape.bounding_radius();
        let between = ca - cb;
        let distance = between.length();
        let depth = ra + rb - distance;
        if depth <= 0.0 {
            return None;
        }
        let normal = between.try_normalize().unwrap_or(DVec3::Z);
        Some(ContactPoint {
            first: a,
            second: b,
            position: cb + normal * (rb - depth * 0.5),
            normal,
            depth,
        })
    }

    fn resolve_contact(&mut self, contact: &ContactPoint, surface: &SurfaceParams) {
        let inv_a = self.inverse_mass_of(contact.first);
        let inv_b = self.inverse_mass_of(contact.second);
        let inv_sum = inv_a + inv_b;
        if inv_sum <= 0.0 {
            return;
        }
        let normal = contact.normal;
        let relative = self.velocity_of(contact.first) - self.velocity_of(contact.second);
        let approach = relative.dot(normal);

        let mut impulse = DVec3::ZERO;
        let mut normal_impulse = 0.0;
        if approach < 0.0 {
            normal_impulse = -approach / inv_sum;
            impulse += normal * normal_impulse;
        }

        let tangential = relative - normal * approach;
        let tangential_speed = tangential.length();
        if tangential_speed > 1e-12 {
            let needed = tangential_speed / inv_sum;
            let allowed = surface
                .friction
                .map_or(needed, |mu| (mu * normal_impulse).min(needed));
            // slip leaves a small residual sliding velocity
            let applied = (allowed - surface.slip * needed.min(allowed)).max(0.0);
            impulse -= tangential / tangential_speed * applied;
        }

        let correction = normal * (contact.depth - PENETRATION_SLOP).max(0.0) / inv_sum;
        if let Some(body) = self.geom(contact.first).body {
            let state = self.body_mut(body);
            state.velocity += impulse * inv_a;
            state.position += correction * inv_a;
        }
        if let Some(body) = self.geom(contact.second).body {
            let state = self.body_mut(body);
            state.velocity -= impulse * inv_b;
            state.position -= correction * inv_b;
        }
    }

    fn advance_joint(&mut self, index: usize, dt: f64) {
        let joint = self.joints[index].clone();
        let inertia: f64 = [joint.spec.first, joint.spec.second]
            .iter()
            .flatten()
            .map(|body| self.body(*body).mass)
            .sum::<f64>()
            .max(1e-9);

        let mut rate = if joint.motor_enabled() {
            joint.motor_velocity
        } else {
            joint.rate + joint.force / inertia * dt
        };
        let mut position = joint.position + rate * dt;
        if position < joint.spec.low_stop {
            position = joint.spec.low_stop;
            rate = 0.0;
        } else if position > joint.spec.high_stop {
            position = joint.spec.high_stop;
            rate = 0.0;
        }
        let delta = position - joint.position;

        let anchor = self.joint_anchor(&joint);
        let (moved, sign) = match (joint.spec.second, joint.spec.first) {
            (Some(second), _) => (Some(second), 1.0),
            (None, Some(first)) => (Some(first), -1.0),
            (None, None) => (None, 0.0),
        };
        if let Some(body) = moved {
            match joint.spec.kind {
                JointKind::Slider { axis } => {
                    let axis = axis.try_normalize().unwrap_or(DVec3::Z);
                    self.body_mut(body).position += axis * delta * sign;
                }
                JointKind::Hinge { axis, .. } => {
                    let axis = axis.try_normalize().unwrap_or(DVec3::Z);
                    let turn = DQuat::from_axis_angle(axis, delta * sign);
                    let state = self.body_mut(body);
                    state.position = anchor + turn * (state.position - anchor);
                    state.orientation = (turn * state.orientation).normalize();
                }
                JointKind::Ball { .. } | JointKind::Universal { .. } => {}
            }
        }

        let (position2, rate2) = match joint.spec.kind {
            JointKind::Universal { .. } => {
                let rate2 = joint.rate2 + joint.torque2 / inertia * dt;
                (joint.position2 + rate2 * dt, rate2)
            }
            _ => (0.0, 0.0),
        };

        let state = &mut self.joints[index];
        state.position = position;
        state.rate = rate;
        state.position2 = position2;
        state.rate2 = rate2;
        state.force = 0.0;
        state.torque2 = 0.0;
    }
}

impl PhysicsEngine for SandboxWorld {
    fn top_space(&self) -> SpaceId {
        SpaceId(0)
    }

    fn create_space(&mut self, parent: SpaceId) -> SpaceId {
        self.space_parents.push(Some(parent));
        SpaceId((self.space_parents.len() - 1) as u32)
    }

    fn set_gravity(&mut self, gravity: DVec3) {
        self.gravity = gravity;
    }

    fn create_body(&mut self, position: DVec3, orientation: DQuat) -> BodyId {
        self.bodies.push(BodyState {
            position,
            orientation,
            velocity: DVec3::ZERO,
            mass: 1.0,
            force: DVec3::ZERO,
        });
        BodyId((self.bodies.len() - 1) as u32)
    }

    fn set_body_pose(&mut self, body: BodyId, position: DVec3, orientation: DQuat) {
        let state = self.body_mut(body);
        state.position = position;
        state.orientation = orientation;
    }

    fn set_body_mass(&mut self, body: BodyId, mass: f64) {
        self.body_mut(body).mass = mass;
    }

    fn body_mass(&self, body: BodyId) -> f64 {
        self.body(body).mass
    }

    fn body_position(&self, body: BodyId) -> DVec3 {
        self.body(body).position
    }

    fn body_orientation(&self, body: BodyId) -> DQuat {
        self.body(body).orientation
    }

    fn body_velocity(&self, body: BodyId) -> DVec3 {
        self.body(body).velocity
    }

    fn add_force(&mut self, body: BodyId, force: DVec3) {
        self.body_mut(body).force += force;
    }

    fn create_geom(&mut self, space: SpaceId, shape: Shape) -> GeomId {
        self.geoms.push(GeomState {
            space,
            shape,
            body: None,
            position: DVec3::ZERO,
            orientation: DQuat::IDENTITY,
        });
        GeomId((self.geoms.len() - 1) as u32)
    }

    fn place_geom(&mut self, geom: GeomId, position: DVec3, orientation: DQuat) {
        let state = &mut self.geoms[geom.0 as usize];
        state.body = None;
        state.position = position;
        state.orientation = orientation;
    }

    fn attach_geom(&mut self, geom: GeomId, body: BodyId, position: DVec3, orientation: DQuat) {
        let (body_position, body_orientation) = {
            let state = self.body(body);
            (state.position, state.orientation)
        };
        let inverse = body_orientation.inverse();
        let state = &mut self.geoms[geom.0 as usize];
        state.body = Some(body);
        state.position = inverse * (position - body_position);
        state.orientation = inverse * orientation;
    }

    fn geom_body(&self, geom: GeomId) -> Option<BodyId> {
        self.geom(geom).body
    }

    fn create_joint(&mut self, spec: JointSpec) -> JointId {
        let anchor = match spec.kind {
            JointKind::Hinge { anchor, .. }
            | JointKind::Ball { anchor }
            | JointKind::Universal { anchor, .. } => anchor,
            JointKind::Slider { .. } => DVec3::ZERO,
        };
        let anchor_offset = match spec.first {
            Some(body) => anchor - self.body(body).position,
            None => anchor,
        };
        self.joints.push(JointState {
            spec,
            anchor_offset,
            position: 0.0,
            rate: 0.0,
            position2: 0.0,
            rate2: 0.0,
            motor_velocity: 0.0,
            max_force: Some(0.0),
            force: 0.0,
            torque2: 0.0,
        });
        JointId((self.joints.len() - 1) as u32)
    }

    fn set_joint_motor(&mut self, joint: JointId, velocity: f64) {
        self.joints[joint.0 as usize].motor_velocity = velocity;
    }

    fn set_joint_max_force(&mut self, joint: JointId, max_force: Option<f64>) {
        self.joints[joint.0 as usize].max_force = max_force;
    }

    fn add_joint_force(&mut self, joint: JointId, force: f64) {
        self.joints[joint.0 as usize].force += force;
    }

    fn add_joint_torques(&mut self, joint: JointId, first: f64, second: f64) {
        let state = &mut self.joints[joint.0 as usize];
        state.force += first;
        state.torque2 += second;
    }

    fn joint_reading(&self, joint: JointId) -> JointReading {
        let state = &self.joints[joint.0 as usize];
        JointReading {
            position: state.position,
            rate: state.rate,
            position2: state.position2,
            rate2: state.rate2,
            low_stop: state.spec.low_stop,
            high_stop: state.spec.high_stop,
            first_is_world: state.spec.first.is_none(),
        }
    }

    fn are_connected(&self, a: BodyId, b: BodyId) -> bool {
        self.joints.iter().any(|joint| {
            let pair = (joint.spec.first, joint.spec.second);
            pair == (Some(a), Some(b)) || pair == (Some(b), Some(a))
        })
    }

    fn candidate_pairs(&self) -> Vec<(GeomId, GeomId)> {
        let mut pairs = Vec::new();
        for i in 0..self.geoms.len() {
            for j in (i + 1)..self.geoms.len() {
                let (a, b) = (&self.geoms[i], &self.geoms[j]);
                if a.body.is_none() && b.body.is_none() {
                    continue;
                }
                if a.body.is_some() && a.body == b.body {
                    continue;
                }
                let (ga, gb) = (GeomId(i as u32), GeomId(j as u32));
                let reach = a.shape.bounding_radius() + b.shape.bounding_radius();
                if reach.is_finite() {
                    let (ca, _) = self.geom_pose(ga);
                    let (cb, _) = self.geom_pose(gb);
                    if ca.distance(cb) > reach {
                        continue;
                    }
                }
                pairs.push((ga, gb));
            }
        }
        pairs
    }

    fn collide(&self, a: GeomId, b: GeomId, max_contacts: usize) -> Vec<ContactPoint> {
        if max_contacts == 0 {
            return Vec::new();
        }
        let is_static = |shape: &Shape| matches!(shape, Shape::Plane { .. } | Shape::HeightField(_));
        let (shape_a, shape_b) = (&self.geom(a).shape, &self.geom(b).shape);

        match (shape_a, shape_b) {
            (Shape::Ray { length }, _) => self.ray_hit(a, *length, b).into_iter().collect(),
            (_, Shape::Ray { length }) => self.ray_hit(b, *length, a).into_iter().collect(),
            (sa, sb) if is_static(sa) && is_static(sb) => Vec::new(),
            (_, sb) if is_static(sb) => self.solid_against_static(a, b, max_contacts),
            (sa, _) if is_static(sa) => self
                .solid_against_static(b, a, max_contacts)
                .into_iter()
                .map(|c| ContactPoint {
                    first: a,
                    second: b,
                    normal: -c.normal,
                    ..c
                })
                .collect(),
            _ => self.solid_against_solid(a, b).into_iter().collect(),
        }
    }

    fn add_contact(&mut self, contact: ContactPoint, surface: SurfaceParams) {
        self.contacts.push((contact, surface));
    }

    fn advance(&mut self, dt: f64) {
        let gravity = self.gravity;
        for body in &mut self.bodies {
            let acceleration = gravity + body.force * body.inverse_mass();
            body.velocity += acceleration * dt;
            body.force = DVec3::ZERO;
        }

        for index in 0..self.joints.len() {
            self.advance_joint(index, dt);
        }

        let contacts = std::mem::take(&mut self.contacts);
        for (contact, surface) in &contacts {
            self.resolve_contact(contact, surface);
        }

        for body in &mut self.bodies {
            body.position += body.velocity * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground(world: &mut SandboxWorld) -> GeomId {
        let space = world.top_space();
        world.create_geom(
            space,
            Shape::Plane {
                normal: DVec3::Z,
                offset: 0.0,
            },
        )
    }

    fn sphere_body(world: &mut SandboxWorld, position: DVec3, radius: f64) -> (BodyId, GeomId) {
        let body = world.create_body(position, DQuat::IDENTITY);
        let space = world.top_space();
        let geom = world.create_geom(space, Shape::Sphere { radius });
        world.attach_geom(geom, body, position, DQuat::IDENTITY);
        (body, geom)
    }

    #[test]
    fn test_free_fall_under_gravity() {
        let mut world = SandboxWorld::new();
        world.set_gravity(DVec3::new(0.0, 0.0, -10.0));
        let body = world.create_body(DVec3::new(0.0, 0.0, 100.0), DQuat::IDENTITY);
        world.advance(0.1);
        assert!((world.body_velocity(body).z + 1.0).abs() < 1e-12);
        assert!((world.body_position(body).z - 99.9).abs() < 1e-12);
    }

    #[test]
    fn test_force_is_cleared_after_advance() {
        let mut world = SandboxWorld::new();
        let body = world.create_body(DVec3::ZERO, DQuat::IDENTITY);
        world.set_body_mass(body, 2.0);
        world.add_force(body, DVec3::new(4.0, 0.0, 0.0));
        world.advance(1.0);
        assert!((world.body_velocity(body).x - 2.0).abs() < 1e-12);
        world.advance(1.0);
        assert!((world.body_velocity(body).x - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_sphere_touching_ground_generates_contact() {
        let mut world = SandboxWorld::new();
        let plane = ground(&mut world);
        let (_, geom) = sphere_body(&mut world, DVec3::new(0.0, 0.0, 0.4), 0.5);
        let pairs = world.candidate_pairs();
        assert_eq!(pairs, vec![(plane, geom)]);
        let contacts = world.collide(plane, geom, 4);
        assert_eq!(contacts.len(), 1);
        assert!((contacts[0].depth - 0.1).abs() < 1e-12);
        // normal points toward the first geom, the plane
        assert!((contacts[0].normal + DVec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_box_on_plane_bounded_by_max_contacts() {
        let mut world = SandboxWorld::new();
        let plane = ground(&mut world);
        let body = world.create_body(DVec3::new(0.0, 0.0, 0.4), DQuat::IDENTITY);
        let space = world.top_space();
        let geom = world.create_geom(
            space,
            Shape::Box {
                sides: DVec3::ONE,
            },
        );
        world.attach_geom(geom, body, DVec3::new(0.0, 0.0, 0.4), DQuat::IDENTITY);
        assert_eq!(world.collide(geom, plane, 10).len(), 4);
        assert_eq!(world.collide(geom, plane, 2).len(), 2);
    }

    #[test]
    fn test_contact_stops_approach() {
        let mut world = SandboxWorld::new();
        world.set_gravity(DVec3::new(0.0, 0.0, -9.8));
        let plane = ground(&mut world);
        let (body, geom) = sphere_body(&mut world, DVec3::new(0.0, 0.0, 0.49), 0.5);
        for contact in world.collide(geom, plane, 1) {
            world.add_contact(
                contact,
                SurfaceParams {
                    friction: None,
                    slip: 0.01,
                },
            );
        }
        world.advance(0.01);
        assert!(world.body_velocity(body).z >= 0.0);
        assert!(world.body_position(body).z >= 0.49);
        assert_eq!(world.pending_contacts(), 0);
    }

    #[test]
    fn test_ray_hits_nearest_surface() {
        let mut world = SandboxWorld::new();
        let (_, target) = sphere_body(&mut world, DVec3::new(0.0, 0.0, 5.0), 1.0);
        let space = world.top_space();
        let ray = world.create_geom(space, Shape::Ray { length: 10.0 });
        world.place_geom(ray, DVec3::ZERO, DQuat::IDENTITY);
        let hits = world.collide(ray, target, 1);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].depth - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_slider_motor_respects_stops() {
        let mut world = SandboxWorld::new();
        let body = world.create_body(DVec3::ZERO, DQuat::IDENTITY);
        let joint = world.create_joint(JointSpec {
            first: None,
            second: Some(body),
            kind: JointKind::Slider { axis: DVec3::X },
            low_stop: -0.5,
            high_stop: 0.5,
        });
        world.set_joint_max_force(joint, None);
        world.set_joint_motor(joint, 1.0);
        for _ in 0..100 {
            world.advance(0.01);
        }
        let reading = world.joint_reading(joint);
        assert!((reading.position - 0.5).abs() < 1e-9);
        assert!(reading.first_is_world);
        assert!((world.body_position(body).x - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_are_connected() {
        let mut world = SandboxWorld::new();
        let a = world.create_body(DVec3::ZERO, DQuat::IDENTITY);
        let b = world.create_body(DVec3::X, DQuat::IDENTITY);
        let c = world.create_body(DVec3::Y, DQuat::IDENTITY);
        world.create_joint(JointSpec {
            first: Some(a),
            second: Some(b),
            kind: JointKind::Ball { anchor: DVec3::ZERO },
            low_stop: f64::NEG_INFINITY,
            high_stop: f64::INFINITY,
        });
        assert!(world.are_connected(b, a));
        assert!(!world.are_connected(a, c));
    }
}
