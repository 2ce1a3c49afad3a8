use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strum::IntoEnumIterator;

use super::*;
use crate::error::BlurError;
use crate::picture::Pixel;

fn random_picture(width: usize, height: usize, seed: u64) -> Picture {
    let mut rng = StdRng::seed_from_u64(seed);
    Picture::from_fn(width, height, |_, _| {
        Pixel::new(rng.random(), rng.random(), rng.random())
    })
    .unwrap()
}

/// Straightforward blur written independently of the engine.
fn reference_blur(picture: &Picture) -> Picture {
    let (width, height) = (picture.width(), picture.height());
    Picture::from_fn(width, height, |i, j| {
        if picture.is_border(i, j) {
            return picture.get(i, j);
        }
        let mut sums = [0u32; 3];
        for y in j - 1..=j + 1 {
            for x in i - 1..=i + 1 {
                let px = picture.get(x, y);
                sums[0] += px.red as u32;
                sums[1] += px.green as u32;
                sums[2] += px.blue as u32;
            }
        }
        Pixel::new((sums[0] / 9) as u8, (sums[1] / 9) as u8, (sums[2] / 9) as u8)
    })
    .unwrap()
}

fn all_params(width: usize, height: usize) -> Vec<BlurParams> {
    let mut params = Vec::new();
    for partition in PartitionKind::iter() {
        let base = BlurParams::new(partition).with_sectors(9);
        let region_count = base.plan(width, height).len().max(1);
        for pool_size in [1, 4, region_count] {
            params.push(base.with_pool_size(pool_size));
        }
    }
    params
}

#[test]
fn test_sequential_matches_reference() {
    let engine = BlurEngine::new();
    let input = random_picture(23, 17, 1);
    let output = engine
        .run(StrategyKind::Sequential, input.clone(), &BlurParams::default())
        .unwrap();
    assert_eq!(output, reference_blur(&input));
}

#[test]
fn test_every_strategy_matches_baseline() {
    let engine = BlurEngine::new();

    for (width, height, seed) in [(19, 13, 7), (32, 9, 8), (5, 41, 9)] {
        let input = random_picture(width, height, seed);
        let baseline = engine
            .run(StrategyKind::Sequential, input.clone(), &BlurParams::default())
            .unwrap();

        for kind in StrategyKind::iter() {
            for params in all_params(width, height) {
                let output = engine.run(kind, input.clone(), &params).unwrap();
                assert_eq!(
                    output.diff_count(&baseline),
                    0,
                    "{kind} with {params:?} differs from baseline on {width}x{height}"
                );
            }
        }
    }
}

#[test]
fn test_border_is_never_written() {
    let engine = BlurEngine::new();
    let input = random_picture(11, 8, 3);

    for kind in StrategyKind::iter() {
        for params in all_params(11, 8) {
            let output = engine.run(kind, input.clone(), &params).unwrap();
            for j in 0..8 {
                for i in 0..11 {
                    if input.is_border(i, j) {
                        assert_eq!(output.get(i, j), input.get(i, j), "{kind} touched ({i}, {j})");
                    }
                }
            }
        }
    }
}

#[test]
fn test_degenerate_pictures_unchanged() {
    let engine = BlurEngine::new();

    for (width, height) in [(1, 1), (1, 7), (7, 1), (2, 9), (9, 2), (2, 2)] {
        let input = random_picture(width, height, 11);
        for kind in StrategyKind::iter() {
            for params in all_params(width, height) {
                let output = engine.run(kind, input.clone(), &params).unwrap();
                assert_eq!(output, input, "{kind} changed a {width}x{height} picture");
            }
        }
    }
}

#[test]
fn test_uniform_5x5_unchanged() {
    let engine = BlurEngine::new();
    let color = Pixel::new(10, 20, 30);
    let input = Picture::new_filled(5, 5, color).unwrap();

    for kind in StrategyKind::iter() {
        for params in all_params(5, 5) {
            let output = engine.run(kind, input.clone(), &params).unwrap();
            assert!(output.pixels().iter().all(|&px| px == color), "{kind} {params:?}");
        }
    }
}

#[test]
fn test_4x4_center_block_row_and_sector_agree() {
    // Every interior pixel's 3x3 window holds the four 90s: 360 / 9 = 40.
    let input = Picture::from_fn(4, 4, |i, j| {
        if (1..=2).contains(&i) && (1..=2).contains(&j) {
            Pixel::gray(90)
        } else {
            Pixel::BLACK
        }
    })
    .unwrap();
    let engine = BlurEngine::new();

    for partition in [PartitionKind::Row, PartitionKind::Sector] {
        let params = BlurParams::new(partition).with_sectors(4).with_pool_size(2);
        for kind in StrategyKind::iter() {
            let output = engine.run(kind, input.clone(), &params).unwrap();
            for (i, j) in [(1, 1), (2, 1), (1, 2), (2, 2)] {
                assert_eq!(output.get(i, j), Pixel::gray(40), "{kind} {partition} at ({i}, {j})");
            }
            for (i, j) in [(0, 0), (3, 0), (0, 3), (3, 3), (1, 0), (0, 2)] {
                assert_eq!(output.get(i, j), Pixel::BLACK);
            }
        }
    }
}

#[test]
fn test_passes_do_not_compound_within_one_run() {
    // A single bright pixel must spread to exactly its 3x3 neighborhood; reading
    // already-blurred neighbors would smear it further.
    let mut input = Picture::new_filled(9, 9, Pixel::BLACK).unwrap();
    input.set(4, 4, Pixel::gray(255));
    let engine = BlurEngine::new();

    for kind in StrategyKind::iter() {
        let params = BlurParams::new(PartitionKind::Pixel).with_pool_size(3);
        let output = engine.run(kind, input.clone(), &params).unwrap();
        for j in 1..8usize {
            for i in 1..8usize {
                let expected = if i.abs_diff(4) <= 1 && j.abs_diff(4) <= 1 {
                    Pixel::gray(28)
                } else {
                    Pixel::BLACK
                };
                assert_eq!(output.get(i, j), expected, "{kind} at ({i}, {j})");
            }
        }
    }
}

#[test]
fn test_repeated_passes_are_deterministic() {
    let engine = BlurEngine::new();
    let input = random_picture(16, 16, 21);
    let params = BlurParams::new(PartitionKind::Sector)
        .with_sectors(16)
        .with_pool_size(4);

    let first = engine.run(StrategyKind::TaskStack, input.clone(), &params).unwrap();
    for _ in 0..5 {
        let again = engine.run(StrategyKind::TaskStack, input.clone(), &params).unwrap();
        assert_eq!(again, first);
    }
}

#[test]
fn test_chained_passes_match_reference() {
    let engine = BlurEngine::new();
    let input = random_picture(14, 10, 5);
    let params = BlurParams::new(PartitionKind::Column).with_pool_size(3);

    let once = engine.run(StrategyKind::ManagedPool, input.clone(), &params).unwrap();
    let twice = engine.run(StrategyKind::ManagedPool, once.clone(), &params).unwrap();

    assert_eq!(once, reference_blur(&input));
    assert_eq!(twice, reference_blur(&once));
}

#[test]
fn test_managed_pool_is_reused_across_passes() {
    let engine = BlurEngine::new();
    let input = random_picture(10, 10, 2);
    let pool = engine.managed_pool();
    assert_eq!(pool.pool_threads(), None);

    let params = BlurParams::new(PartitionKind::Row).with_pool_size(3);
    for _ in 0..4 {
        engine.run(StrategyKind::ManagedPool, input.clone(), &params).unwrap();
    }
    assert_eq!(pool.build_count(), 1);
    assert_eq!(pool.pool_threads(), Some(3));

    let resized = params.with_pool_size(2);
    engine.run(StrategyKind::ManagedPool, input.clone(), &resized).unwrap();
    assert_eq!(pool.build_count(), 2);
    assert_eq!(pool.pool_threads(), Some(2));
}

#[test]
fn test_managed_pool_not_built_for_empty_plan() {
    let engine = BlurEngine::new();
    let input = random_picture(2, 30, 4);
    engine
        .run(StrategyKind::ManagedPool, input, &BlurParams::default())
        .unwrap();
    assert_eq!(engine.managed_pool().build_count(), 0);
}

#[test]
fn test_zero_pool_size_uses_one_worker() {
    let engine = BlurEngine::new();
    let input = random_picture(8, 8, 6);
    let params = BlurParams::new(PartitionKind::Row).with_pool_size(0);

    for kind in [StrategyKind::TaskStack, StrategyKind::ManagedPool] {
        let output = engine.run(kind, input.clone(), &params).unwrap();
        assert_eq!(output, reference_blur(&input));
    }
    assert_eq!(engine.managed_pool().pool_threads(), Some(1));
}

#[test]
fn test_sequential_plans_whole_interior() {
    let params = BlurParams::new(PartitionKind::Pixel);
    assert_eq!(
        Sequential.plan(&params, 6, 5),
        vec![Region::new(1, 4, 1, 3)]
    );
    assert!(Sequential.plan(&params, 2, 5).is_empty());
    assert_eq!(ThreadPerRegion.plan(&params, 6, 5).len(), 12);
}

#[test]
fn test_strategy_lookup_matches_kind() {
    let engine = BlurEngine::new();
    for kind in StrategyKind::iter() {
        assert_eq!(engine.strategy(kind).kind(), kind);
    }
    assert_eq!(StrategyKind::ThreadPerRegion.to_string(), "thread_per_region");
    assert_eq!(
        "managed_pool".parse::<StrategyKind>().unwrap(),
        StrategyKind::ManagedPool
    );
}

#[test]
fn test_failed_pass_restores_picture() {
    let input = random_picture(12, 9, 31);
    let mut picture = input.clone();
    let params = BlurParams::new(PartitionKind::Row);

    let err = testing::FailingAfterFirstRegion
        .run_in_place(&mut picture, &params)
        .unwrap_err();

    assert!(matches!(err, BlurError::ThreadSpawn { .. }), "{err}");
    assert_eq!(picture, input);
}

#[test]
fn test_successful_in_place_pass_matches_owned_run() {
    let engine = BlurEngine::new();
    let input = random_picture(11, 8, 32);
    let params = BlurParams::new(PartitionKind::Sector).with_pool_size(2);

    for kind in StrategyKind::iter() {
        let mut picture = input.clone();
        engine.run_in_place(kind, &mut picture, &params).unwrap();
        assert_eq!(picture, reference_blur(&input), "{kind}");
    }
}

#[test]
fn test_failed_owned_run_returns_error() {
    let err = testing::FailingAfterFirstRegion
        .run(random_picture(6, 6, 33), &BlurParams::new(PartitionKind::Pixel))
        .unwrap_err();
    assert!(matches!(err, BlurError::ThreadSpawn { .. }), "{err}");
}
