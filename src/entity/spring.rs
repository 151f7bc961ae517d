//! Passive springs between two bodies
//!
//! Springs are joint-kind entities: they push their forces during the joint
//! phase, after actuators and before bodies.

use crate::core::error::{Result, SimError};
use crate::core::types::{DVec3, Handle};
use crate::entity::joint::axis_or_z;
use crate::input::FieldSource;
use crate::physics::{BodyId, JointId, JointKind, JointSpec};
use crate::simulation::context::{BindContext, StepContext};

#[derive(Debug, Clone, PartialEq)]
pub enum SpringLaw {
    /// Hooke force along the line between the two centers
    PointMass { resting_length: f64 },
    /// Slider along the initial center line, pulled back to the resting length
    Linear {
        resting_length: f64,
        /// Slider position that corresponds to the resting length
        slider_offset: f64,
    },
    /// Universal joint at the midpoint, pulled back to zero on both axes
    Hinge { axis1: DVec3, axis2: DVec3 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    pub first: Handle,
    pub second: Handle,
    pub stiffness: f64,
    pub damping: f64,
    pub law: SpringLaw,
    bodies: Option<(BodyId, BodyId)>,
    joint: Option<JointId>,
}

impl Spring {
    pub fn new(first: Handle, second: Handle, stiffness: f64, damping: f64, law: SpringLaw) -> Self {
        Self {
            first,
            second,
            stiffness,
            damping,
            law,
            bodies: None,
            joint: None,
        }
    }

    /// `PointMassSpringJoint`, `LinearSpringJoint`, `HingeSpringJoint`
    pub fn declare(type_name: &str, src: &mut dyn FieldSource) -> Result<Self> {
        let first = src.handle("Body 1 ID")?;
        let second = src.handle("Body 2 ID")?;
        match type_name {
            "PointMassSpringJoint" | "LinearSpringJoint" => {
                let resting_length = src.float("Resting Length")?;
                let stiffness = src.float("Stiffness")?;
                let damping = src.float("Damping")?;
                let law = if type_name == "LinearSpringJoint" {
                    SpringLaw::Linear {
                        resting_length,
                        slider_offset: 0.0,
                    }
                } else {
                    SpringLaw::PointMass { resting_length }
                };
                Ok(Self::new(first, second, stiffness, damping, law))
            }
            "HingeSpringJoint" => {
                let stiffness = src.float("Rotational Stiffness")?;
                let axis1 = src.vec3("Axis 1")?;
                let axis2 = src.vec3("Axis 2")?;
                let damping = src.float("Damping")?;
                Ok(Self::new(
                    first,
                    second,
                    stiffness,
                    damping,
                    SpringLaw::Hinge { axis1, axis2 },
                ))
            }
            other => Err(SimError::UnknownEntityType(other.to_string())),
        }
    }

    pub fn joint_id(&self) -> Option<JointId> {
        self.joint
    }

    pub fn bind(&mut self, handle: Handle, ctx: &mut BindContext) -> Result<()> {
        let first = ctx.body_id(self.first)?;
        let second = ctx.body_id(self.second)?;
        self.bodies = Some((first, second));

        let p1 = ctx.engine.body_position(first);
        let p2 = ctx.engine.body_position(second);

        match &mut self.law {
            SpringLaw::PointMass { .. } => {}
            SpringLaw::Linear {
                resting_length,
                slider_offset,
            } => {
                let separation = p2 - p1;
                let length = separation.length();
                let axis = if length > 0.0 {
                    separation / length
                } else {
                    tracing::warn!(%handle, "Linear spring bodies coincide, sliding along Z");
                    axis_or_z(separation)
                };
                *slider_offset = *resting_length - length;
                self.joint = Some(ctx.engine.create_joint(JointSpec {
                    first: Some(first),
                    second: Some(second),
                    kind: JointKind::Slider { axis },
                    low_stop: -length,
                    high_stop: f64::INFINITY,
                }));
            }
            SpringLaw::Hinge { axis1, axis2 } => {
                self.joint = Some(ctx.engine.create_joint(JointSpec {
                    first: Some(first),
                    second: Some(second),
                    kind: JointKind::Universal {
                        anchor: (p1 + p2) * 0.5,
                        axis1: *axis1,
                        axis2: *axis2,
                    },
                    low_stop: f64::NEG_INFINITY,
                    high_stop: f64::INFINITY,
                }));
            }
        }
        tracing::debug!(%handle, "Bound spring");
        Ok(())
    }

    pub fn step(&mut self, handle: Handle, ctx: &mut StepContext) -> Result<()> {
        let (first, second) = self.bodies.ok_or(SimError::Unbound(handle))?;
        match &self.law {
            SpringLaw::PointMass { resting_length } => {
                let separation = ctx.engine.body_position(second) - ctx.engine.body_position(first);
                let length = separation.length();
                if length <= 0.0 {
                    tracing::warn!(%handle, tick = ctx.tick, "Spring bodies coincide, no force this tick");
                    return Ok(());
                }
                let direction = separation / length;
                let closing = (ctx.engine.body_velocity(second) - ctx.engine.body_velocity(first))
                    .dot(direction);
                let magnitude =
                    (length - resting_length) * self.stiffness + closing * self.damping;
                ctx.engine.add_force(first, direction * magnitude);
                ctx.engine.add_force(second, -direction * magnitude);
            }
            SpringLaw::Linear { slider_offset, .. } => {
                let joint = self.joint.ok_or(SimError::Unbound(handle))?;
                let reading = ctx.engine.joint_reading(joint);
                let extension = reading.position - slider_offset;
                let force = -self.stiffness * extension - self.damping * reading.rate;
                ctx.engine.add_joint_force(joint, force);
            }
            SpringLaw::Hinge { .. } => {
                let joint = self.joint.ok_or(SimError::Unbound(handle))?;
                let reading = ctx.engine.joint_reading(joint);
                ctx.engine.add_joint_torques(
                    joint,
                    -self.stiffness * reading.position - self.damping * reading.rate,
                    -self.stiffness * reading.position2 - self.damping * reading.rate2,
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::entity::{Entity, GeomDecl, RigidBody};
    use crate::input::TokenReader;
    use crate::physics::{PhysicsEngine, Shape};
    use crate::simulation::{Environment, Simulation};

    fn ball(x: f64) -> RigidBody {
        RigidBody::with_geom(
            GeomDecl {
                shape: Shape::Sphere { radius: 0.25 },
                position: DVec3::new(x, 0.0, 10.0),
                orientation: DVec3::Z,
                density: 1.0,
                color: [1.0, 1.0, 1.0],
            },
            "None",
            "A",
        )
    }

    /// Two balls at the given x positions joined by `law`, gravity off
    fn pair(x1: f64, x2: f64, stiffness: f64, law: SpringLaw) -> Simulation {
        let mut env = Environment::new();
        let first = env.register(ball(x1));
        let second = env.register(ball(x2));
        env.register(Spring::new(first, second, stiffness, 0.0, law));
        let config = SimulationConfig {
            gravity: [0.0, 0.0, 0.0],
            eval_steps: 3,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::with_sandbox(config, env).unwrap();
        sim.bind().unwrap();
        sim
    }

    fn position(sim: &Simulation, handle: Handle) -> DVec3 {
        let body = sim
            .environment
            .resolve(handle)
            .unwrap()
            .as_body()
            .unwrap()
            .body_id()
            .unwrap();
        sim.engine.body_position(body)
    }

    fn spring_joint(sim: &Simulation) -> JointId {
        match sim.environment.resolve(Handle(2)).unwrap() {
            Entity::Spring(spring) => spring.joint_id().unwrap(),
            other => panic!("expected a spring, found {}", other.type_name()),
        }
    }

    #[test]
    fn test_coincident_point_masses_stay_put() {
        let mut sim = pair(0.0, 0.0, 10.0, SpringLaw::PointMass { resting_length: 1.0 });
        let start = position(&sim, Handle(0));
        assert_eq!(start, position(&sim, Handle(1)));
        sim.run().unwrap();
        assert_eq!(sim.tick(), 3);
        assert_eq!(position(&sim, Handle(0)), start);
        assert_eq!(position(&sim, Handle(1)), start);
    }

    #[test]
    fn test_stretched_point_mass_pulls_together() {
        let mut sim = pair(0.0, 3.0, 10.0, SpringLaw::PointMass { resting_length: 1.0 });
        let height = position(&sim, Handle(0)).z;
        sim.run().unwrap();
        let first = position(&sim, Handle(0));
        let second = position(&sim, Handle(1));
        assert!(first.x > 0.0);
        assert!(second.x < 3.0);
        // equal masses move equal distances
        assert!((first.x + second.x - 3.0).abs() < 1e-9);
        assert_eq!(first.z, height);
    }

    #[test]
    fn test_stretched_linear_spring_pulls_back() {
        let law = SpringLaw::Linear {
            resting_length: 1.0,
            slider_offset: 0.0,
        };
        let mut sim = pair(0.0, 2.0, 10.0, law);
        assert!(matches!(
            sim.environment.resolve(Handle(2)).unwrap(),
            Entity::Spring(Spring {
                law: SpringLaw::Linear { slider_offset, .. },
                ..
            }) if (*slider_offset + 1.0).abs() < 1e-9
        ));
        sim.run().unwrap();
        let joint = spring_joint(&sim);
        assert!(sim.engine.joint_reading(joint).position < 0.0);
        let distance = position(&sim, Handle(0)).distance(position(&sim, Handle(1)));
        assert!(distance < 2.0);
    }

    #[test]
    fn test_compressed_linear_spring_pushes_apart() {
        let law = SpringLaw::Linear {
            resting_length: 3.0,
            slider_offset: 0.0,
        };
        let mut sim = pair(0.0, 2.0, 10.0, law);
        sim.run().unwrap();
        let distance = position(&sim, Handle(0)).distance(position(&sim, Handle(1)));
        assert!(distance > 2.0);
    }

    #[test]
    fn test_hinge_spring_resists_deflection() {
        let law = SpringLaw::Hinge {
            axis1: DVec3::Y,
            axis2: DVec3::Z,
        };
        let mut sim = pair(0.0, 1.0, 10.0, law);
        let joint = spring_joint(&sim);

        sim.engine.add_joint_torques(joint, 5.0, -5.0);
        sim.advance().unwrap();
        let kicked = sim.engine.joint_reading(joint);
        assert!(kicked.position > 0.0 && kicked.position2 < 0.0);

        for _ in 0..5 {
            sim.advance().unwrap();
        }
        let later = sim.engine.joint_reading(joint);
        assert!(later.rate < kicked.rate);
        assert!(later.rate2 > kicked.rate2);
    }

    #[test]
    fn test_declare_hinge_spring_field_order() {
        let text = "0\n1\n2.5\n1 0 0\n0 1 0\n0.1\n";
        let mut src = TokenReader::new(text.as_bytes());
        let spring = Spring::declare("HingeSpringJoint", &mut src).unwrap();
        assert_eq!(spring.stiffness, 2.5);
        assert_eq!(spring.damping, 0.1);
        assert_eq!(
            spring.law,
            SpringLaw::Hinge {
                axis1: DVec3::X,
                axis2: DVec3::Y
            }
        );
    }

    #[test]
    fn test_declare_point_mass() {
        let text = "0 1 1.0 10.0 0.5\n";
        let mut src = TokenReader::new(text.as_bytes());
        let spring = Spring::declare("PointMassSpringJoint", &mut src).unwrap();
        assert_eq!(spring.law, SpringLaw::PointMass { resting_length: 1.0 });
        assert_eq!(spring.stiffness, 10.0);
    }
}
