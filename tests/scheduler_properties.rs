use std::time::{Duration, Instant};

use practice_companion::{
    clock::{ManualBackend, ManualClock},
    Beat, LookaheadScheduler, SchedulerConfig, SchedulerState, Tempo,
};

const LOOKAHEAD: f64 = 0.1;
const EPS: f64 = 1e-9;

fn scheduler() -> (LookaheadScheduler<ManualBackend>, ManualClock) {
    let clock = ManualClock::new();
    let scheduler =
        LookaheadScheduler::new(ManualBackend::new(clock.clone()), SchedulerConfig::default());
    (scheduler, clock)
}

/// Advance the clock by `dt`, pump, and return what was emitted.
fn step(
    scheduler: &mut LookaheadScheduler<ManualBackend>,
    clock: &ManualClock,
    dt: f64,
) -> Vec<Beat> {
    clock.advance(dt);
    let mut beats = Vec::new();
    scheduler.pump(|beat| beats.push(beat));
    beats
}

fn times(beats: &[Beat]) -> Vec<f64> {
    beats.iter().map(|b| b.time).collect()
}

fn assert_times(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < EPS, "{actual:?} vs {expected:?}");
    }
}

#[test]
fn spacing_is_exact_for_every_tempo_despite_jitter() {
    // Irregular polling: on time, late, very late
    let jitter = [0.025, 0.038, 0.066, 0.027, 0.225, 0.025, 0.031];

    for bpm in Tempo::MIN.bpm()..=Tempo::MAX.bpm() {
        let (mut scheduler, clock) = scheduler();
        let t0 = 1.234;
        clock.set_time(t0);
        scheduler.start(bpm).unwrap();

        let mut beats = step(&mut scheduler, &clock, 0.0);
        let mut i = 0;
        while beats.len() < 40 {
            beats.extend(step(&mut scheduler, &clock, jitter[i % jitter.len()]));
            i += 1;
        }

        let spb = 60.0 / bpm as f64;
        for (k, beat) in beats.iter().enumerate() {
            assert_eq!(beat.index, k as u64);
            assert!(
                (beat.time - (t0 + k as f64 * spb)).abs() < EPS,
                "bpm {bpm}, beat {k}: {}",
                beat.time
            );
        }
    }
}

#[test]
fn stop_is_idempotent() {
    let (mut scheduler, clock) = scheduler();
    scheduler.start(120).unwrap();
    step(&mut scheduler, &clock, 0.0);

    scheduler.stop();
    let once = (scheduler.state(), scheduler.next_beat_time(), clock.is_leased());
    scheduler.stop();
    let twice = (scheduler.state(), scheduler.next_beat_time(), clock.is_leased());

    assert_eq!(once, twice);
    assert_eq!(twice.0, SchedulerState::Stopped);
}

#[test]
fn start_while_running_keeps_cursor() {
    let (mut scheduler, clock) = scheduler();
    scheduler.start(120).unwrap();
    step(&mut scheduler, &clock, 0.0);
    step(&mut scheduler, &clock, 0.45);
    assert!((scheduler.next_beat_time() - 1.0).abs() < EPS);

    clock.advance(0.2);
    scheduler.start(90).unwrap();
    assert!((scheduler.next_beat_time() - 1.0).abs() < EPS);
    assert_eq!(scheduler.tempo().bpm(), 120);
    assert_eq!(scheduler.backend().acquisitions(), 1);
}

#[test]
fn no_beat_is_queued_beyond_the_lookahead_window() {
    let (mut scheduler, clock) = scheduler();
    scheduler.start(220).unwrap();

    let watcher = clock.clone();
    for i in 0..400 {
        clock.advance(if i % 17 == 0 { 0.3 } else { 0.025 });
        scheduler.pump(|beat| {
            assert!(beat.time < watcher.now() + LOOKAHEAD);
        });
        // The window is full after every pump
        assert!(scheduler.next_beat_time() >= clock.now() + LOOKAHEAD - EPS);
    }
}

#[test]
fn nothing_is_emitted_after_stop() {
    let (mut scheduler, clock) = scheduler();
    let t0 = Instant::now();
    scheduler.start(120).unwrap();
    assert_eq!(scheduler.poll(t0, |_| {}), 1);

    // Pump re-armed and beats pending in the window when stop lands
    clock.advance(0.45);
    scheduler.stop();

    let mut late = 0;
    scheduler.poll(t0 + Duration::from_millis(25), |_| late += 1);
    scheduler.poll(t0 + Duration::from_secs(5), |_| late += 1);
    scheduler.pump(|_| late += 1);
    assert_eq!(late, 0);
    assert_eq!(clock.scheduled().len(), 1);
}

#[test]
fn tempo_120_from_zero() {
    let (mut scheduler, clock) = scheduler();
    scheduler.start(120).unwrap();

    let mut emitted = step(&mut scheduler, &clock, 0.0);
    while clock.now() < 1.6 {
        emitted.extend(step(&mut scheduler, &clock, 0.025));
    }

    assert_times(&times(&emitted), &[0.0, 0.5, 1.0, 1.5]);
}

#[test]
fn tempo_change_applies_after_the_next_beat() {
    let (mut scheduler, clock) = scheduler();
    scheduler.start(120).unwrap();

    let mut emitted = step(&mut scheduler, &clock, 0.0);
    while emitted.last().map_or(true, |b| b.time < 1.0 - EPS) {
        emitted.extend(step(&mut scheduler, &clock, 0.025));
    }
    assert_times(&times(&emitted), &[0.0, 0.5, 1.0]);

    scheduler.set_tempo(60).unwrap();
    assert!((scheduler.next_beat_time() - 1.5).abs() < EPS);

    let mut after = Vec::new();
    while after.len() < 3 {
        after.extend(step(&mut scheduler, &clock, 0.025));
    }
    assert_times(&times(&after), &[1.5, 2.5, 3.5]);
}

#[test]
fn delayed_pump_catches_up_in_order() {
    let (mut scheduler, clock) = scheduler();
    scheduler.start(120).unwrap();

    let mut all = step(&mut scheduler, &clock, 0.0);
    all.extend(step(&mut scheduler, &clock, 0.45)); // now 0.45
    all.extend(step(&mut scheduler, &clock, 0.45)); // now 0.90
    assert_times(&times(&all), &[0.0, 0.5]);

    // 0.3s stall: window now reaches 1.3, only 1.0 is due
    let caught = step(&mut scheduler, &clock, 0.3);
    assert_times(&times(&caught), &[1.0]);
    all.extend(caught);

    // Long stall: window reaches 3.25, four beats owed
    let caught = step(&mut scheduler, &clock, 1.95);
    assert_times(&times(&caught), &[1.5, 2.0, 2.5, 3.0]);
    all.extend(caught);

    let indices: Vec<u64> = all.iter().map(|b| b.index).collect();
    assert_eq!(indices, (0..all.len() as u64).collect::<Vec<_>>());
    assert_times(&times(&all), &[0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0]);
}

#[test]
fn every_beat_queues_one_click_at_its_time() {
    let (mut scheduler, clock) = scheduler();
    scheduler.start(150).unwrap();

    let mut emitted = step(&mut scheduler, &clock, 0.0);
    for _ in 0..100 {
        emitted.extend(step(&mut scheduler, &clock, 0.025));
    }

    let tones = clock.scheduled();
    assert_eq!(tones.len(), emitted.len());
    for (tone, beat) in tones.iter().zip(&emitted) {
        assert_eq!(tone.start, beat.time);
        assert_eq!(tone.spec, scheduler.config().click);
    }
}

#[test]
fn first_beat_keeps_start_time_when_first_poll_is_late() {
    let (mut scheduler, clock) = scheduler();
    let t0 = Instant::now();
    clock.set_time(2.0);
    scheduler.start(120).unwrap();

    // Nothing is queued until the host polls
    assert!(clock.scheduled().is_empty());
    assert_eq!(scheduler.time_until_pump(t0), Some(Duration::ZERO));

    // Host loop stalls for 0.3s before its first poll
    clock.advance(0.3);
    let mut beats = Vec::new();
    assert_eq!(scheduler.poll(t0 + Duration::from_millis(300), |b| beats.push(b)), 1);

    assert_eq!(beats[0].index, 0);
    assert_eq!(beats[0].time, 2.0);
    assert_eq!(clock.scheduled()[0].start, 2.0);
    assert!((scheduler.next_beat_time() - 2.5).abs() < EPS);
}
