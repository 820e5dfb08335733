use nalgebra::{Point3, Vector3};

/// Motion state of a particle.
///
/// Fixed particles carry no velocity or acceleration at all, so integration and
/// boundary code can match on the variant instead of checking optional fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kinematics {
    Fixed,
    Movable {
        velocity: Vector3<f64>,
        /// Acceleration from the most recent force evaluation.
        acceleration: Vector3<f64>,
        /// Acceleration of the previous step; `None` until one step has completed.
        previous_acceleration: Option<Vector3<f64>>,
    },
}

/// A point mass in the simulation arena.
///
/// Particles are owned by the integrator in a flat array; force terms refer to
/// them by index and never hold references across steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Point3<f64>,
    pub mass: f64,
    /// Lennard-Jones size parameter; half of it is the collision radius at walls.
    pub sigma: f64,
    /// Lennard-Jones well depth.
    pub epsilon: f64,
    pub kinematics: Kinematics,
}

impl Particle {
    pub fn movable(
        position: Point3<f64>,
        velocity: Vector3<f64>,
        mass: f64,
        sigma: f64,
        epsilon: f64,
    ) -> Self {
        Self {
            position,
            mass,
            sigma,
            epsilon,
            kinematics: Kinematics::Movable {
                velocity,
                acceleration: Vector3::zeros(),
                previous_acceleration: None,
            },
        }
    }

    pub fn fixed(position: Point3<f64>, mass: f64, sigma: f64, epsilon: f64) -> Self {
        Self {
            position,
            mass,
            sigma,
            epsilon,
            kinematics: Kinematics::Fixed,
        }
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        matches!(self.kinematics, Kinematics::Fixed)
    }

    pub fn velocity(&self) -> Option<&Vector3<f64>> {
        match &self.kinematics {
            Kinematics::Movable { velocity, .. } => Some(velocity),
            Kinematics::Fixed => None,
        }
    }

    pub fn velocity_mut(&mut self) -> Option<&mut Vector3<f64>> {
        match &mut self.kinematics {
            Kinematics::Movable { velocity, .. } => Some(velocity),
            Kinematics::Fixed => None,
        }
    }

    pub fn acceleration(&self) -> Option<&Vector3<f64>> {
        match &self.kinematics {
            Kinematics::Movable { acceleration, .. } => Some(acceleration),
            Kinematics::Fixed => None,
        }
    }

    /// Stores `force / mass` as the current acceleration.
    pub fn apply_force(&mut self, force: &Vector3<f64>) {
        let inv_mass = 1.0 / self.mass;
        if let Kinematics::Movable { acceleration, .. } = &mut self.kinematics {
            *acceleration = force * inv_mass;
        }
    }

    /// Predictor half of the step: moves the particle using the current
    /// acceleration and the acceleration of the previous step.
    ///
    /// `dt2` is `dt * dt`, computed once per step by the caller.
    pub fn predict(&mut self, dt: f64, dt2: f64) {
        if let Kinematics::Movable {
            velocity,
            acceleration,
            previous_acceleration,
        } = &self.kinematics
        {
            // The stored velocity still lacks the second half-kick of the last
            // step, which is folded into the position update here.
            let curvature = match previous_acceleration {
                Some(previous) => (previous + acceleration * 2.0) * 0.5,
                None => acceleration * 0.5,
            };
            self.position += velocity * dt + curvature * dt2;
        }
    }

    /// Corrector half of the step: completes the velocity with the average of
    /// the previous and current accelerations, then rolls the history forward.
    pub fn correct(&mut self, half_dt: f64) {
        if let Kinematics::Movable {
            velocity,
            acceleration,
            previous_acceleration,
        } = &mut self.kinematics
        {
            if let Some(previous) = previous_acceleration {
                *velocity += (*previous + *acceleration) * half_dt;
            }
            *previous_acceleration = Some(*acceleration);
        }
    }

    /// `0.5 * m * |v|^2`; zero for fixed particles.
    pub fn kinetic_energy(&self) -> f64 {
        self.velocity()
            .map_or(0.0, |v| 0.5 * self.mass * v.norm_squared())
    }
}
