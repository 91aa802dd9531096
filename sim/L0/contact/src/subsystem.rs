//! The compliant contact force subsystem.
//!
//! Ties the pieces together: for each active contact reported by the
//! tracker it picks a generator from the registry, asks it for a force, and
//! caches the results in the caller's [`ContactState`]. During dynamics
//! realization the cached forces are applied to the bodies; during
//! acceleration realization the total power loss is published as the rate
//! of change of the dissipated energy.

use sim_types::{BodyForces, Stage};
use tracing::{debug, trace};

use crate::config::check_transition_velocity;
use crate::{
    BodyKinematics, CompliantContactConfig, ContactError, ContactForce, ContactForceGenerator,
    ContactId, ContactPatch, ContactState, ContactSurfaceIndex, ContactTracker, ContactTypeId,
    DoNothing, FrictionCurve, GeneratorContext, GeneratorRegistry, HertzCircular, Result,
    SurfaceVelocity,
};

/// The external collaborators the subsystem reads for one state.
#[derive(Clone, Copy)]
pub struct SystemView<'a> {
    /// Source of active contacts and surface data.
    pub tracker: &'a dyn ContactTracker,
    /// Source of body poses and velocities.
    pub matter: &'a dyn BodyKinematics,
}

impl std::fmt::Debug for SystemView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemView")
            .field("active_contacts", &self.tracker.active_contacts().len())
            .finish_non_exhaustive()
    }
}

impl<'a> SystemView<'a> {
    /// Bundle a tracker and a kinematics provider.
    #[must_use]
    pub fn new(tracker: &'a dyn ContactTracker, matter: &'a dyn BodyKinematics) -> Self {
        Self { tracker, matter }
    }

    /// Ground-frame position and spatial velocity of a surface frame.
    pub fn surface_velocity(&self, surface: ContactSurfaceIndex) -> Result<SurfaceVelocity> {
        let s = self.tracker.surface(surface)?;
        Ok(self.matter.frame_velocity_in_ground(s.body, &s.transform)?)
    }

    /// Like [`SystemView::surface_velocity`] but with the surface held still.
    pub fn surface_at_rest(&self, surface: ContactSurfaceIndex) -> Result<SurfaceVelocity> {
        let s = self.tracker.surface(surface)?;
        let pose = self.matter.body_state(s.body)?.pose;
        Ok(SurfaceVelocity::at_rest(
            pose.transform_point(&s.transform.position),
        ))
    }
}

/// Penalty-based contact forces between tracked surfaces.
///
/// Owns the configuration and the generator registry. All per-state data
/// lives in [`ContactState`], which the subsystem creates in
/// [`CompliantContactSubsystem::realize_topology`] and the caller keeps.
///
/// # Example
///
/// ```
/// use nalgebra::{Point3, Vector3};
/// use sim_contact::{
///     BodySet, CircularPointContact, CompliantContactConfig, CompliantContactSubsystem,
///     ContactId, ContactMaterial, ContactSurface, ManualContactTracker, SystemView,
/// };
/// use sim_types::{BodyForces, BodyId, Pose, RigidBodyState, Stage};
///
/// let mut tracker = ManualContactTracker::new();
/// let floor = tracker.add_surface(ContactSurface::new(BodyId::GROUND, ContactMaterial::steel()));
/// let ball = tracker.add_surface(ContactSurface::new(BodyId::new(1), ContactMaterial::rubber()));
/// tracker.set_contacts([CircularPointContact::new(
///     ContactId::new(0), floor, ball, 0.05, 1e-4, Point3::origin(), Vector3::z_axis(),
/// )
/// .into()])
/// .unwrap();
///
/// let bodies = BodySet::new().with_body(
///     BodyId::new(1),
///     RigidBodyState::at_rest(Pose::from_position(Point3::new(0.0, 0.0, 0.05))),
/// );
///
/// let contacts = CompliantContactSubsystem::new(CompliantContactConfig::default()).unwrap();
/// let view = SystemView::new(&tracker, &bodies);
/// let mut state = contacts.realize_topology();
/// let mut forces = BodyForces::new();
/// contacts.realize_to(Stage::Dynamics, &mut state, &view, &mut forces).unwrap();
///
/// assert!(forces.get(BodyId::new(1)).force.z > 0.0);
/// assert!(contacts.potential_energy(&mut state, &view).unwrap() > 0.0);
/// ```
#[derive(Debug)]
pub struct CompliantContactSubsystem {
    config: CompliantContactConfig,
    registry: GeneratorRegistry,
    topology_version: u64,
    configuration_version: u64,
}

impl Default for CompliantContactSubsystem {
    fn default() -> Self {
        Self::with_registry(CompliantContactConfig::default(), Self::builtin_registry())
    }
}

impl CompliantContactSubsystem {
    /// Subsystem name used in diagnostics.
    pub const NAME: &'static str = "CompliantContactSubsystem";
    /// Subsystem version.
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    /// A subsystem with [`HertzCircular`] registered for circular point
    /// contacts and [`DoNothing`] as the default for everything else.
    pub fn new(config: CompliantContactConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_registry(config, Self::builtin_registry()))
    }

    /// A subsystem using the given generators.
    ///
    /// The configuration is not validated here; call
    /// [`CompliantContactConfig::validate`] first if it came from outside.
    #[must_use]
    pub fn with_registry(config: CompliantContactConfig, registry: GeneratorRegistry) -> Self {
        Self {
            config,
            registry,
            topology_version: 0,
            configuration_version: 0,
        }
    }

    /// A subsystem with no generators at all, not even a default.
    pub fn empty(config: CompliantContactConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_registry(config, GeneratorRegistry::new()))
    }

    fn builtin_registry() -> GeneratorRegistry {
        GeneratorRegistry::new()
            .with(Box::new(HertzCircular))
            .with_default(Box::new(DoNothing::new()))
    }

    /// Current settings.
    #[must_use]
    pub fn config(&self) -> &CompliantContactConfig {
        &self.config
    }

    /// Topology version; bumped by every change that requires states to be
    /// realized again from [`Stage::Topology`].
    #[must_use]
    pub fn topology_version(&self) -> u64 {
        self.topology_version
    }

    fn invalidate_topology(&mut self) {
        self.topology_version += 1;
    }

    /// Configuration version; bumped by the configuration setters. States
    /// pick it up on their next evaluation and recompute their caches.
    #[must_use]
    pub fn configuration_version(&self) -> u64 {
        self.configuration_version
    }

    fn invalidate_configuration(&mut self) {
        self.configuration_version += 1;
    }

    // ==================== Configuration ====================

    /// Friction transition velocity (m/s).
    #[must_use]
    pub fn transition_velocity(&self) -> f64 {
        self.config.transition_velocity
    }

    /// `1 / transition_velocity`.
    #[must_use]
    pub fn inv_transition_velocity(&self) -> f64 {
        self.config.transition_velocity.recip()
    }

    /// Change the friction transition velocity. Must be positive.
    ///
    /// Existing states stay usable; their cached forces and energies are
    /// recomputed on next use.
    pub fn set_transition_velocity(&mut self, vt: f64) -> Result<()> {
        check_transition_velocity(vt)?;
        self.config.transition_velocity = vt;
        self.invalidate_configuration();
        Ok(())
    }

    /// Friction curve used by the built-in generators.
    #[must_use]
    pub fn friction_curve(&self) -> FrictionCurve {
        self.config.friction_curve
    }

    /// Change the friction curve.
    pub fn set_friction_curve(&mut self, curve: FrictionCurve) {
        self.config.friction_curve = curve;
        self.invalidate_configuration();
    }

    // ==================== Generators ====================

    /// The generator registry.
    #[must_use]
    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    /// Take ownership of a generator, replacing and dropping any generator
    /// already registered for the same contact type.
    ///
    /// Returns `true` if one was replaced.
    pub fn adopt_force_generator(&mut self, generator: Box<dyn ContactForceGenerator>) -> bool {
        self.invalidate_topology();
        self.registry.adopt(generator)
    }

    /// Replace the fallback generator; `None` removes it.
    pub fn adopt_default_force_generator(
        &mut self,
        generator: Option<Box<dyn ContactForceGenerator>>,
    ) -> bool {
        self.invalidate_topology();
        self.registry.adopt_default(generator)
    }

    /// Whether a generator is registered specifically for `type_id`.
    #[must_use]
    pub fn has_force_generator(&self, type_id: ContactTypeId) -> bool {
        self.registry.has_specific(type_id)
    }

    /// Whether a fallback generator is installed.
    #[must_use]
    pub fn has_default_force_generator(&self) -> bool {
        self.registry.has_default()
    }

    /// Generator that will handle contacts of `type_id`, specific or default.
    pub fn force_generator(&self, type_id: ContactTypeId) -> Result<&dyn ContactForceGenerator> {
        self.registry.resolve(type_id)
    }

    /// The fallback generator.
    #[must_use]
    pub fn default_force_generator(&self) -> Option<&dyn ContactForceGenerator> {
        self.registry.default_generator()
    }

    // ==================== Realization ====================

    fn check_topology(&self, state: &ContactState) -> Result<()> {
        if state.topology() == self.topology_version {
            Ok(())
        } else {
            Err(ContactError::StaleTopology {
                state: state.topology(),
                subsystem: self.topology_version,
            })
        }
    }

    fn refresh(&self, state: &mut ContactState) -> Result<()> {
        self.check_topology(state)?;
        if state.sync_configuration(self.configuration_version) {
            debug!(
                configuration = self.configuration_version,
                "contact configuration changed; dropped cached results"
            );
        }
        Ok(())
    }

    fn context<'a>(&self, view: &SystemView<'a>, stage: Stage) -> GeneratorContext<'a> {
        GeneratorContext::new(
            view.tracker,
            view.matter,
            stage,
            self.config.transition_velocity,
            self.config.friction_curve,
        )
    }

    /// Allocate fresh per-state storage: empty caches and zero dissipated
    /// energy.
    #[must_use]
    pub fn realize_topology(&self) -> ContactState {
        debug!(
            topology = self.topology_version,
            generators = self.registry.len(),
            "realized contact subsystem topology"
        );
        ContactState::new(self.topology_version, self.configuration_version)
    }

    /// Nothing to do at model stage.
    pub fn realize_model(&self, state: &ContactState) -> Result<()> {
        self.check_topology(state)
    }

    /// Nothing to do at instance stage.
    pub fn realize_instance(&self, state: &ContactState) -> Result<()> {
        self.check_topology(state)
    }

    /// Nothing to do at time stage.
    pub fn realize_time(&self, state: &ContactState) -> Result<()> {
        self.check_topology(state)
    }

    /// Nothing to do at position stage; potential energy is evaluated on
    /// demand.
    pub fn realize_position(&self, state: &ContactState) -> Result<()> {
        self.check_topology(state)
    }

    /// Nothing to do at velocity stage; forces are evaluated on demand.
    pub fn realize_velocity(&self, state: &ContactState) -> Result<()> {
        self.check_topology(state)
    }

    /// Apply every cached contact force to the bodies involved.
    ///
    /// Each force is shifted from the center of pressure to the body
    /// origins and added to `forces`; existing entries are accumulated, not
    /// overwritten.
    pub fn realize_dynamics(
        &self,
        state: &mut ContactState,
        view: &SystemView<'_>,
        forces: &mut BodyForces,
    ) -> Result<()> {
        let records = self.ensure_force_cache_valid(state, view)?;
        let active = view.tracker.active_contacts();

        for record in records {
            let contact = active
                .contact_by_id(record.contact)
                .ok_or(ContactError::UnknownContact(record.contact))?;
            let (s1, s2) = contact.surfaces();
            let body1 = view.tracker.body_for(s1)?;
            let body2 = view.tracker.body_for(s2)?;
            let origin1 = view.matter.body_origin(body1)?;
            let origin2 = view.matter.body_origin(body2)?;

            let (on1, on2) = record.body_forces(&origin1, &origin2);
            forces.apply(body1, on1);
            forces.apply(body2, on2);
        }

        trace!(contacts = records.len(), "applied contact forces");
        Ok(())
    }

    /// Publish the total contact power loss as the derivative of the
    /// dissipated energy.
    pub fn realize_acceleration(&self, state: &mut ContactState, view: &SystemView<'_>) -> Result<()> {
        self.refresh(state)?;
        let stage = state.stage();
        state.dissipation_rate.check_stage(stage)?;

        let power_loss: f64 = self
            .ensure_force_cache_valid(state, view)?
            .iter()
            .map(|f| f.power_loss)
            .sum();
        let version = state.version(Stage::Dynamics);
        state
            .dissipation_rate
            .ensure_valid(stage, version, || Ok(power_loss))?;
        Ok(())
    }

    /// Nothing to do at report stage.
    pub fn realize_report(&self, state: &ContactState) -> Result<()> {
        self.check_topology(state)
    }

    /// Run the callback for `stage` and record it as realized.
    ///
    /// The state must already be realized through the stage before
    /// `stage`. Realizing [`Stage::Topology`] replaces `state` with a fresh
    /// one.
    pub fn realize(
        &self,
        stage: Stage,
        state: &mut ContactState,
        view: &SystemView<'_>,
        forces: &mut BodyForces,
    ) -> Result<()> {
        if let Some(required) = stage.prev() {
            if state.stage() < required {
                return Err(ContactError::StageViolation {
                    operation: "realize",
                    required,
                    current: state.stage(),
                });
            }
        }

        if stage != Stage::Topology {
            self.refresh(state)?;
        }

        match stage {
            Stage::Topology => *state = self.realize_topology(),
            Stage::Model => self.realize_model(state)?,
            Stage::Instance => self.realize_instance(state)?,
            Stage::Time => self.realize_time(state)?,
            Stage::Position => self.realize_position(state)?,
            Stage::Velocity => self.realize_velocity(state)?,
            Stage::Dynamics => self.realize_dynamics(state, view, forces)?,
            Stage::Acceleration => self.realize_acceleration(state, view)?,
            Stage::Report => self.realize_report(state)?,
        }
        state.advance_to(stage);
        Ok(())
    }

    /// Realize every stage after the state's current one, up to and
    /// including `target`.
    pub fn realize_to(
        &self,
        target: Stage,
        state: &mut ContactState,
        view: &SystemView<'_>,
        forces: &mut BodyForces,
    ) -> Result<()> {
        while state.stage() < target {
            let Some(next) = state.stage().next() else {
                break;
            };
            self.realize(next, state, view, forces)?;
        }
        Ok(())
    }

    // ==================== Caches ====================

    fn compute_forces(&self, view: &SystemView<'_>, stage: Stage) -> Result<Vec<ContactForce>> {
        let ctx = self.context(view, stage);
        let active = view.tracker.active_contacts();
        let mut forces = Vec::with_capacity(active.len());

        for contact in active {
            let v1 = view.surface_velocity(contact.surface1())?;
            let v2 = view.surface_velocity(contact.surface2())?;
            let generator = self.registry.resolve(contact.type_id())?;
            match generator.calc_contact_force(&ctx, contact, &v1, &v2)? {
                Some(force) => forces.push(force),
                None => trace!(
                    contact = %contact.id(),
                    generator = generator.name(),
                    "no force record"
                ),
            }
        }

        debug!(
            active = active.len(),
            forces = forces.len(),
            "filled contact force cache"
        );
        Ok(forces)
    }

    fn potential_energy_at_rest(&self, view: &SystemView<'_>, stage: Stage) -> Result<f64> {
        let ctx = self.context(view, stage);
        let mut pe = 0.0;
        for contact in view.tracker.active_contacts() {
            let v1 = view.surface_at_rest(contact.surface1())?;
            let v2 = view.surface_at_rest(contact.surface2())?;
            let generator = self.registry.resolve(contact.type_id())?;
            if let Some(force) = generator.calc_contact_force(&ctx, contact, &v1, &v2)? {
                pe += force.potential_energy;
            }
        }
        Ok(pe)
    }

    /// Make sure the state's force cache is current and return it.
    ///
    /// Requires the state to be realized through [`Stage::Velocity`].
    /// Contacts whose generator produces no record are left out, so the
    /// result may be shorter than the tracker's active contact list.
    pub fn ensure_force_cache_valid<'s>(
        &self,
        state: &'s mut ContactState,
        view: &SystemView<'_>,
    ) -> Result<&'s [ContactForce]> {
        self.refresh(state)?;
        let stage = state.stage();
        let version = state.version(Stage::Velocity);
        state
            .forces
            .ensure_valid(stage, version, || self.compute_forces(view, stage))
            .map(Vec::as_slice)
    }

    /// Make sure the state's potential energy cache is current and return it.
    ///
    /// Requires [`Stage::Position`]. From [`Stage::Velocity`] on the energy
    /// is summed from the force cache; at position stage every contact is
    /// evaluated with both surfaces at rest and only the energy is kept.
    pub fn ensure_potential_energy_cache_valid(
        &self,
        state: &mut ContactState,
        view: &SystemView<'_>,
    ) -> Result<f64> {
        self.refresh(state)?;
        let stage = state.stage();
        let version = state.version(Stage::Position);
        if let Some(pe) = state.potential_energy.get(version) {
            return Ok(*pe);
        }
        state.potential_energy.check_stage(stage)?;

        let pe = if stage >= Stage::Velocity {
            self.ensure_force_cache_valid(state, view)?
                .iter()
                .map(|f| f.potential_energy)
                .sum()
        } else {
            self.potential_energy_at_rest(view, stage)?
        };
        state.potential_energy.ensure_valid(stage, version, || Ok(pe)).copied()
    }

    /// Total elastic energy stored in all active contacts (J).
    pub fn potential_energy(&self, state: &mut ContactState, view: &SystemView<'_>) -> Result<f64> {
        self.ensure_potential_energy_cache_valid(state, view)
    }

    /// Energy lost to dissipation and friction so far (J).
    pub fn dissipated_energy(&self, state: &ContactState) -> Result<f64> {
        self.check_topology(state)?;
        Ok(state.dissipated_energy())
    }

    /// Reset the dissipated energy total, e.g. to zero at the start of an
    /// energy audit.
    pub fn set_dissipated_energy(&self, state: &mut ContactState, energy: f64) -> Result<()> {
        self.check_topology(state)?;
        if energy.is_nan() || energy < 0.0 {
            return Err(ContactError::NegativeDissipatedEnergy(energy));
        }
        state.set_dissipated_energy(energy);
        Ok(())
    }

    /// The force cache as last filled for this state.
    ///
    /// Needs [`Stage::Velocity`] and a force cache evaluated for the current
    /// velocities and configuration, which [`Self::realize_dynamics`] and
    /// [`Self::ensure_force_cache_valid`] both provide.
    pub fn contact_forces<'s>(&self, state: &'s ContactState) -> Result<&'s [ContactForce]> {
        self.check_topology(state)?;
        if state.stage() < Stage::Velocity {
            return Err(ContactError::StageViolation {
                operation: "contact forces",
                required: Stage::Velocity,
                current: state.stage(),
            });
        }
        if state.configuration() != self.configuration_version {
            return Err(ContactError::ForcesNotEvaluated);
        }
        state.cached_forces().ok_or(ContactError::ForcesNotEvaluated)
    }

    /// Detailed patch analysis of one active contact.
    ///
    /// None of the built-in generators support this and all of them fail
    /// with [`ContactError::PatchNotImplemented`].
    pub fn calc_contact_patch(
        &self,
        view: &SystemView<'_>,
        state: &ContactState,
        contact: ContactId,
    ) -> Result<ContactPatch> {
        self.check_topology(state)?;
        if state.stage() < Stage::Velocity {
            return Err(ContactError::StageViolation {
                operation: "contact patch",
                required: Stage::Velocity,
                current: state.stage(),
            });
        }
        let contact = view
            .tracker
            .active_contacts()
            .contact_by_id(contact)
            .ok_or(ContactError::UnknownContact(contact))?;
        let v1 = view.surface_velocity(contact.surface1())?;
        let v2 = view.surface_velocity(contact.surface2())?;
        let generator = self.registry.resolve(contact.type_id())?;
        generator.calc_contact_patch(&self.context(view, state.stage()), contact, &v1, &v2)
    }
}
