// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use nurse_roster_model::prelude::{Instance, InstanceBuilder, Schedule, ShiftType, Staff};
use nurse_roster_solver::prelude::{ConstraintEvaluator, IncrementalEvaluator, Move};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn benchmark_instance() -> Instance {
    let mut b = InstanceBuilder::new();
    b.horizon(28)
        .add_shift(ShiftType::new("E", 480))
        .add_shift(ShiftType::new("D", 480))
        .add_shift(ShiftType::new("L", 480).with_forbidden_successor("E"))
        .add_shift(
            ShiftType::new("N", 600)
                .with_forbidden_successor("E")
                .with_forbidden_successor("D"),
        );
    for i in 0..20 {
        b.add_staff(
            Staff::new(format!("S{i}"))
                .with_total_minutes(4320, 10_080)
                .with_consecutive_shifts(2, 5)
                .with_min_consecutive_days_off(2)
                .with_max_weekends(2),
        );
    }
    for day in 0..28 {
        b.add_cover(day, "E", 3, 100, 1);
        b.add_cover(day, "D", 4, 100, 1);
        b.add_cover(day, "L", 3, 100, 1);
        b.add_cover(day, "N", 2, 100, 1);
    }
    b.build().unwrap()
}

fn random_schedule(instance: &Instance, rng: &mut ChaCha8Rng) -> Schedule {
    let mut schedule = Schedule::new(
        instance.num_employees(),
        instance.horizon(),
        instance.num_shift_types(),
    );
    schedule.randomise(rng);
    schedule
}

fn bench_change_delta(c: &mut Criterion) {
    let instance = benchmark_instance();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let schedule = random_schedule(&instance, &mut rng);

    let mut group = c.benchmark_group("change_delta");

    group.bench_function("incremental", |b| {
        let mut inc =
            IncrementalEvaluator::new(ConstraintEvaluator::new(&instance), schedule.clone());
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        b.iter(|| {
            let mv = Move::Change {
                employee: rng.random_range(0..instance.num_employees()),
                day: rng.random_range(0..instance.horizon()),
                new_shift: rng.random_range(0..=instance.num_shift_types()),
            };
            black_box(inc.quote(&mv));
        });
    });

    group.bench_function("full_reevaluation", |b| {
        let evaluator = ConstraintEvaluator::new(&instance);
        let mut scratch = schedule.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        b.iter(|| {
            let employee = rng.random_range(0..instance.num_employees());
            let day = rng.random_range(0..instance.horizon());
            let new_shift = rng.random_range(0..=instance.num_shift_types());
            let old_shift = scratch.get(employee, day);
            let before = evaluator.hard_score(&scratch) + evaluator.soft_score(&scratch);
            scratch.set(employee, day, new_shift);
            let after = evaluator.hard_score(&scratch) + evaluator.soft_score(&scratch);
            scratch.set(employee, day, old_shift);
            black_box(after - before);
        });
    });

    group.finish();
}

fn bench_apply_loop(c: &mut Criterion) {
    let instance = benchmark_instance();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let schedule = random_schedule(&instance, &mut rng);

    c.bench_function("apply_accepted_changes", |b| {
        let mut inc =
            IncrementalEvaluator::new(ConstraintEvaluator::new(&instance), schedule.clone());
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        b.iter(|| {
            let mv = Move::Change {
                employee: rng.random_range(0..instance.num_employees()),
                day: rng.random_range(0..instance.horizon()),
                new_shift: rng.random_range(0..=instance.num_shift_types()),
            };
            black_box(inc.apply(&mv));
        });
    });
}

criterion_group!(benches, bench_change_delta, bench_apply_loop);
criterion_main!(benches);
