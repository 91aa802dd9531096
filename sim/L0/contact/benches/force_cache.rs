//! Benchmarks for contact force evaluation.
//!
//! Run with: cargo bench -p sim-contact

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use nalgebra::{Point3, Vector3};
use sim_contact::{
    BodySet, CircularPointContact, CompliantContactSubsystem, Contact, ContactId, ContactMaterial,
    ContactSurface, FrictionCurve, ManualContactTracker, SystemView, friction,
};
use sim_types::{BodyForces, BodyId, Pose, RigidBodyState, Stage, Twist};

/// `n` balls resting on the floor, each sliding in a different direction.
fn ball_pit(n: usize) -> (ManualContactTracker, BodySet) {
    let mut tracker = ManualContactTracker::new();
    let mut bodies = BodySet::new();
    let floor = tracker.add_surface(ContactSurface::new(BodyId::GROUND, ContactMaterial::steel()));

    let contacts: Vec<Contact> = (0..n)
        .map(|i| {
            let body = BodyId::new(i as u64 + 1);
            let x = i as f64 * 0.25;
            let angle = i as f64 * 0.7;
            bodies.insert(
                body,
                RigidBodyState::new(
                    Pose::from_position(Point3::new(x, 0.0, 0.1)),
                    Twist::new(
                        Vector3::new(angle.cos(), angle.sin(), -0.01) * 0.3,
                        Vector3::new(0.0, 1.0, 0.0),
                    ),
                ),
            );
            let ball = tracker.add_surface(ContactSurface::new(body, ContactMaterial::rubber()));
            CircularPointContact::new(
                ContactId::new(i as u64),
                floor,
                ball,
                0.1,
                1e-4,
                Point3::new(x, 0.0, 0.0),
                Vector3::z_axis(),
            )
            .into()
        })
        .collect();
    tracker.set_contacts(contacts).unwrap();
    (tracker, bodies)
}

fn bench_realize_dynamics(c: &mut Criterion) {
    let mut group = c.benchmark_group("realize_dynamics");
    let contacts = CompliantContactSubsystem::default();

    for n in [1, 16, 256, 1024] {
        let (tracker, bodies) = ball_pit(n);
        let view = SystemView::new(&tracker, &bodies);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::from_parameter(n), &view, |b, view| {
            b.iter(|| {
                let mut state = contacts.realize_topology();
                let mut forces = BodyForces::new();
                contacts
                    .realize_to(Stage::Dynamics, &mut state, view, &mut forces)
                    .unwrap();
                black_box(forces.len())
            });
        });
    }

    group.finish();
}

fn bench_potential_energy(c: &mut Criterion) {
    let mut group = c.benchmark_group("potential_energy");
    let contacts = CompliantContactSubsystem::default();
    let (tracker, bodies) = ball_pit(256);
    let view = SystemView::new(&tracker, &bodies);

    for stage in [Stage::Position, Stage::Velocity] {
        group.bench_function(stage.name(), |b| {
            b.iter(|| {
                let mut state = contacts.realize_topology();
                contacts
                    .realize_to(stage, &mut state, &view, &mut BodyForces::new())
                    .unwrap();
                black_box(contacts.potential_energy(&mut state, &view).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_friction_curves(c: &mut Criterion) {
    let mut group = c.benchmark_group("friction_curve");
    let speeds: Vec<f64> = (0..1000).map(|i| f64::from(i) * 0.006).collect();

    for curve in [FrictionCurve::Stribeck, FrictionCurve::Hollars] {
        group.bench_function(format!("{curve:?}"), |b| {
            b.iter(|| {
                speeds
                    .iter()
                    .map(|&v| curve.coefficient(0.8, 0.6, 0.01, black_box(v)))
                    .sum::<f64>()
            });
        });
    }
    group.bench_function("step5", |b| {
        b.iter(|| {
            speeds
                .iter()
                .map(|&v| friction::step5(black_box(v / 6.0)))
                .sum::<f64>()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_realize_dynamics,
    bench_potential_energy,
    bench_friction_curves
);
criterion_main!(benches);
