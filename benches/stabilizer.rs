//! スタビライザーのベンチマーク
//!
//! ティックごとに呼ばれるhot pathの処理時間を計測する。

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use handmouse::application::stabilizer::MotionStabilizer;
use handmouse::domain::{FrameContext, NormalizedPoint, TrackingConfig};

fn bench_stabilizer_update(c: &mut Criterion) {
    let ctx = FrameContext::new(640, 480, 1920, 1080);
    let cfg = TrackingConfig::default();

    // 疑似的な手の軌跡（小刻みな揺れを含む）
    let trajectory: Vec<NormalizedPoint> = (0..256)
        .map(|i| {
            let t = i as f64 / 256.0;
            NormalizedPoint::new(
                0.5 + 0.3 * (t * 6.28).cos() + 0.002 * (i % 7) as f64,
                0.5 + 0.3 * (t * 6.28).sin() - 0.002 * (i % 5) as f64,
            )
        })
        .collect();

    c.bench_function("stabilizer_update", |b| {
        let mut stabilizer = MotionStabilizer::new();
        let mut i = 0;
        b.iter(|| {
            let point = trajectory[i % trajectory.len()];
            i += 1;
            black_box(stabilizer.update(Some(point), &ctx, &cfg))
        });
    });

    c.bench_function("stabilizer_update_hand_lost", |b| {
        let mut stabilizer = MotionStabilizer::new();
        let mut i = 0;
        b.iter(|| {
            // 手の検出とロストを交互に繰り返す（リセット経路を含む）
            let input = if i % 2 == 0 {
                Some(trajectory[i % trajectory.len()])
            } else {
                None
            };
            i += 1;
            black_box(stabilizer.update(input, &ctx, &cfg))
        });
    });
}

criterion_group!(benches, bench_stabilizer_update);
criterion_main!(benches);
