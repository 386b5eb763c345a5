// Host-side tests for particle integration: morphing, spin and the finale.

use glam::Vec3;
use morph_core::shapes;
use morph_core::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const N: usize = 500;
const DT: f32 = 1.0 / 60.0;

fn cloud(n: usize, seed: u64) -> Vec<Vec3> {
    shapes::cloud(n, CLOUD_HALF_WIDTH, Vec3::ZERO, &mut StdRng::seed_from_u64(seed))
}

fn launch_pad(n: usize) -> Vec<Vec3> {
    shapes::cloud(
        n,
        LAUNCH_PAD_HALF_WIDTH,
        Vec3::new(0.0, LAUNCH_PAD_Y, 0.0),
        &mut StdRng::seed_from_u64(3),
    )
}

fn max_distance(field: &ParticleField) -> f32 {
    field
        .current()
        .iter()
        .zip(field.target())
        .map(|(c, t)| c.distance(*t))
        .fold(0.0, f32::max)
}

fn input(stage: Stage, gesture: Gesture) -> FrameInput {
    FrameInput {
        stage,
        gesture,
        dt: DT,
    }
}

#[test]
fn empty_field_is_rejected() {
    assert_eq!(
        ParticleField::from_target(Vec::new()).err(),
        Some(MorphError::EmptyField)
    );
    assert!(Animator::new(Vec::new(), AnimatorParams::default(), 1).is_err());
}

#[test]
fn retarget_requires_matching_length() {
    let mut a = Animator::new(cloud(N, 1), AnimatorParams::default(), 1).unwrap();
    assert_eq!(
        a.retarget(&cloud(N + 1, 2)),
        Err(MorphError::LengthMismatch {
            expected: N,
            actual: N + 1
        })
    );
    assert!(a.retarget(&cloud(N, 2)).is_ok());
    assert_eq!(a.field().target(), cloud(N, 2).as_slice());
}

#[test]
fn write_positions_is_flat_xyz() {
    let field = ParticleField::from_target(vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]).unwrap();
    let mut out = [0.0f32; 6];
    assert!(field.write_positions(&mut out));
    assert_eq!(out, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let mut short = [0.0f32; 5];
    assert!(!field.write_positions(&mut short));
}

#[test]
fn motion_selection_table() {
    assert_eq!(Motion::select(Stage::Earth, Gesture::Closed), Motion::Converging);
    assert_eq!(Motion::select(Stage::Fireworks, Gesture::Closed), Motion::Converging);
    assert_eq!(Motion::select(Stage::Fireworks, Gesture::Open), Motion::Finale);
    assert_eq!(Motion::select(Stage::Fireworks, Gesture::None), Motion::Diverging);
    assert_eq!(Motion::select(Stage::Heart, Gesture::Open), Motion::Diverging);
    assert_eq!(Motion::select(Stage::Intro, Gesture::None), Motion::Diverging);
}

#[test]
fn step_without_buffer_is_a_no_op() {
    let mut a = Animator::new(cloud(N, 1), AnimatorParams::default(), 1).unwrap();
    a.retarget(&shapes::sphere(N, SPHERE_RADIUS, 0.0)).unwrap();
    let before = a.field().current().to_vec();
    assert_eq!(a.step(input(Stage::Earth, Gesture::Closed), None), None);
    let mut wrong = vec![0.0; N * 3 - 1];
    assert_eq!(a.step(input(Stage::Earth, Gesture::Closed), Some(&mut wrong)), None);
    assert_eq!(a.field().current(), before.as_slice());
    assert_eq!(a.clock(), 0.0);
}

#[test]
fn converge_shrinks_distance_every_frame_and_settles() {
    let mut a = Animator::new(cloud(N, 1), AnimatorParams::default(), 1).unwrap();
    a.retarget(&shapes::sphere(N, SPHERE_RADIUS, SPHERE_TERRAIN_AMPLITUDE)).unwrap();
    let mut buf = vec![0.0; N * 3];
    let mut prev = max_distance(a.field());
    let mut settled_at = None;
    for frame in 0..90 {
        let report = a.step(input(Stage::Heart, Gesture::Closed), Some(&mut buf)).unwrap();
        assert_eq!(report.motion, Motion::Converging);
        let d = max_distance(a.field());
        assert!(d < prev, "frame {frame}: {d} !< {prev}");
        prev = d;
        if d < 0.05 && settled_at.is_none() {
            settled_at = Some(frame);
        }
    }
    assert!(settled_at.is_some(), "still {prev} away after 90 frames");
}

#[test]
fn converge_writes_buffer() {
    let mut a = Animator::new(cloud(N, 1), AnimatorParams::default(), 1).unwrap();
    let mut buf = vec![f32::NAN; N * 3];
    a.step(input(Stage::Heart, Gesture::Closed), Some(&mut buf)).unwrap();
    let flat: Vec<f32> = a.field().current().iter().flat_map(|p| p.to_array()).collect();
    assert_eq!(buf, flat);
}

#[test]
fn earth_spins_while_converging_other_stages_do_not() {
    let mut buf = vec![0.0; N * 3];
    let mut earth = Animator::new(cloud(N, 1), AnimatorParams::default(), 1).unwrap();
    let mut heart = Animator::new(cloud(N, 1), AnimatorParams::default(), 1).unwrap();
    for _ in 0..30 {
        earth.step(input(Stage::Earth, Gesture::Closed), Some(&mut buf));
        heart.step(input(Stage::Heart, Gesture::Closed), Some(&mut buf));
    }
    let expected = PLANET_SPIN_PER_SEC * DT * 30.0;
    assert!((earth.rotation() - expected).abs() < 1e-4);
    assert_eq!(heart.rotation(), 0.0);
}

#[test]
fn diverge_expands_away_from_target() {
    let target = shapes::sphere(N, SPHERE_RADIUS, 0.0);
    let mut a = Animator::new(target.clone(), AnimatorParams::default(), 1).unwrap();
    let mut buf = vec![0.0; N * 3];
    for _ in 0..120 {
        a.step(input(Stage::Earth, Gesture::Open), Some(&mut buf));
    }
    let expansion = AnimatorParams::default().diverge_expansion;
    for (cur, tgt) in a.field().current().iter().zip(&target) {
        assert!(cur.length() > tgt.length());
        assert!(cur.length() <= tgt.length() * expansion + 1e-3);
    }
    assert!(a.rotation() > 0.0);
}

#[test]
fn intro_drift_hovers_around_cloud() {
    let target = cloud(N, 1);
    let mut a = Animator::new(target.clone(), AnimatorParams::default(), 9).unwrap();
    let mut buf = vec![0.0; N * 3];
    // ten seconds of idle intro: jitter is anchored to the target, so no drift accumulates
    for _ in 0..600 {
        a.step(input(Stage::Intro, Gesture::None), Some(&mut buf));
    }
    for (cur, tgt) in a.field().current().iter().zip(&target) {
        let d = (*cur - *tgt).abs();
        assert!(d.max_element() <= INTRO_JITTER + 1e-5, "drifted {d:?}");
    }
}

#[test]
fn dt_is_clamped_and_sanitized() {
    let mut a = Animator::new(cloud(N, 1), AnimatorParams::default(), 1).unwrap();
    a.retarget(&cloud(N, 2)).unwrap();
    let mut buf = vec![0.0; N * 3];
    let before = a.field().current().to_vec();
    let frame = |dt| FrameInput {
        stage: Stage::Heart,
        gesture: Gesture::Closed,
        dt,
    };
    a.step(frame(f32::NAN), Some(&mut buf)).unwrap();
    a.step(frame(-1.0), Some(&mut buf)).unwrap();
    assert_eq!(a.field().current(), before.as_slice());
    assert_eq!(a.clock(), 0.0);

    a.step(frame(5.0), Some(&mut buf)).unwrap();
    assert!((a.clock() - MAX_FRAME_DT).abs() < 1e-6);
}

#[test]
fn finale_launches_upward() {
    let mut a = Animator::new(launch_pad(N), AnimatorParams::default(), 5).unwrap();
    let mut buf = vec![0.0; N * 3];
    let report = a.step(input(Stage::Fireworks, Gesture::Open), Some(&mut buf)).unwrap();
    assert_eq!(report.motion, Motion::Finale);
    assert!(report.launched);
    assert!(!report.burst);
    assert!(a.in_finale());
    for v in a.field().velocity() {
        assert!(v.y >= LAUNCH_SPEED_MIN && v.y <= LAUNCH_SPEED_MAX);
    }
    let next = a.step(input(Stage::Fireworks, Gesture::Open), Some(&mut buf)).unwrap();
    assert!(!next.launched);
}

#[test]
fn finale_falls_monotonically_and_respects_floor() {
    let params = AnimatorParams::default();
    let floor = params.finale.floor_y;
    let mut a = Animator::new(launch_pad(N), params, 5).unwrap();
    let mut buf = vec![0.0; N * 3];

    let mut bursts = 0;
    let mut prev_vy: Option<Vec<f32>> = None;
    let mut landed = vec![false; N];
    for _ in 0..600 {
        let report = a.step(input(Stage::Fireworks, Gesture::Open), Some(&mut buf)).unwrap();
        if report.burst {
            bursts += 1;
        }
        let field = a.field();
        for (i, p) in field.current().iter().enumerate() {
            assert!(p.y >= floor, "particle {i} at {} below floor", p.y);
            if p.y <= floor {
                landed[i] = true;
            }
        }
        let vy: Vec<f32> = field.velocity().iter().map(|v| v.y).collect();
        if bursts > 0 {
            if let Some(prev) = &prev_vy {
                for i in 0..N {
                    if !landed[i] {
                        assert!(vy[i] < prev[i], "particle {i}: vy {} !< {}", vy[i], prev[i]);
                    }
                }
            }
            prev_vy = Some(vy);
        }
    }
    assert_eq!(bursts, 1);
    assert!(landed.iter().all(|l| *l), "10s is enough for every particle to land");
    // buffer mirrors the clamped field
    for chunk in buf.chunks_exact(3) {
        assert!(chunk[1] >= floor);
    }
}

#[test]
fn finale_after_hand_lost_starts_above_floor() {
    let params = AnimatorParams::default();
    let floor = params.finale.floor_y;
    let mut a = Animator::new(launch_pad(N), params, 5).unwrap();
    let mut buf = vec![0.0; N * 3];
    // hand out of view: the field eases toward the expanded pad, partly under the floor
    for _ in 0..120 {
        a.step(input(Stage::Fireworks, Gesture::None), Some(&mut buf));
    }
    for _ in 0..120 {
        a.step(input(Stage::Fireworks, Gesture::Open), Some(&mut buf)).unwrap();
        for p in a.field().current() {
            assert!(p.y >= floor, "{} below floor {}", p.y, floor);
        }
        for chunk in buf.chunks_exact(3) {
            assert!(chunk[1] >= floor);
        }
    }
}

#[test]
fn invalid_params_are_rejected() {
    let negative_dt = AnimatorParams {
        max_dt: -1.0,
        ..Default::default()
    };
    assert_eq!(
        Animator::new(cloud(N, 1), negative_dt, 1).err(),
        Some(MorphError::InvalidParameter("max_dt"))
    );

    let jitter = AnimatorParams {
        intro_jitter: -0.1,
        ..Default::default()
    };
    assert!(Animator::new(cloud(N, 1), jitter, 1).is_err());

    let drift = AnimatorParams {
        finale: FinaleParams {
            launch_drift: f32::NAN,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(Animator::new(cloud(N, 1), drift, 1).is_err());

    let speeds = AnimatorParams {
        finale: FinaleParams {
            launch_speed_min: 12.0,
            launch_speed_max: 3.0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(Animator::new(cloud(N, 1), speeds, 1).is_err());
}

#[test]
fn params_edited_after_construction_never_panic() {
    let mut a = Animator::new(launch_pad(N), AnimatorParams::default(), 5).unwrap();
    a.params.max_dt = -1.0;
    a.params.intro_jitter = -0.5;
    a.params.finale.launch_drift = -1.0;
    a.params.finale.launch_speed_min = 10.0;
    a.params.finale.launch_speed_max = 2.0;
    let mut buf = vec![0.0; N * 3];
    a.step(input(Stage::Intro, Gesture::None), Some(&mut buf)).unwrap();
    assert_eq!(a.clock(), 0.0);

    a.params.max_dt = MAX_FRAME_DT;
    a.step(input(Stage::Fireworks, Gesture::Open), Some(&mut buf)).unwrap();
    for v in a.field().velocity() {
        assert!(v.y >= 2.0 && v.y <= 10.0);
        assert!(v.x.abs() <= 1.0 && v.z.abs() <= 1.0);
    }
}

#[test]
fn leaving_finale_resets_velocity() {
    let mut a = Animator::new(launch_pad(N), AnimatorParams::default(), 5).unwrap();
    let mut buf = vec![0.0; N * 3];
    for _ in 0..10 {
        a.step(input(Stage::Fireworks, Gesture::Open), Some(&mut buf));
    }
    let report = a.step(input(Stage::Fireworks, Gesture::Closed), Some(&mut buf)).unwrap();
    assert_eq!(report.motion, Motion::Converging);
    assert!(!a.in_finale());
    assert!(a.field().velocity().iter().all(|v| *v == Vec3::ZERO));

    // re-opening launches again
    let again = a.step(input(Stage::Fireworks, Gesture::Open), Some(&mut buf)).unwrap();
    assert!(again.launched);
}
