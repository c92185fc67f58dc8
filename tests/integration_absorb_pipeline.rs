//! Integration tests for the within-transformation (absorption) pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end absorption flow: from validated panel data and
//!   encoded effect columns, through single- and multi-effect demeaning, to
//!   convergence metadata, absorbed degrees of freedom, and recovered
//!   levels.
//! - Exercise realistic panel regimes (unbalanced groups, non-uniform
//!   weights, nested effects) rather than toy edge cases only.
//!
//! Coverage
//! --------
//! - `absorb::core`:
//!   - `PanelData` construction with and without weights.
//!   - `encode_groups` / `encode_groups_checked` over mixed key types.
//! - `absorb::models::Absorber`:
//!   - K = 1 exactness, K = 2 balanced convergence in two cycles,
//!     weighted within-group zero sums, idempotence, degenerate groups,
//!     iteration-cap behavior, nesting-aware degrees of freedom, and
//!     order-independence of the converged fixed point.
//!
//! Exclusions
//! ----------
//! - Fine-grained validation of low-level building blocks (dimension
//!   checks, encoder range validation) — covered by unit tests.
//! - Python bindings — exercised at the Python package level.
use approx::assert_abs_diff_eq;
use ndarray::{Array1, Array2, array};
use rust_panel::absorb::{
    AbsorbOptions, Absorber, GroupIndex, PanelData, TransformResult, encode_groups,
};

/// Build an unbalanced two-effect panel with deterministic pseudo-random
/// structure: entity sizes differ, the time dimension is incomplete, and
/// values carry additive entity and time components plus a residual.
///
/// Returns the panel, the entity index, and the time index.
fn make_unbalanced_panel() -> (PanelData, GroupIndex, GroupIndex) {
    // 10 observations, 3 entities (sizes 4, 3, 3), 4 time periods with gaps.
    let entities = [0_i64, 0, 0, 0, 1, 1, 1, 2, 2, 2];
    let times = [0_i64, 1, 2, 3, 0, 2, 3, 1, 2, 3];
    let entity_fx = [2.0, -1.0, 0.5];
    let time_fx = [0.3, -0.7, 1.1, -0.4];

    let n = entities.len();
    let mut features = Array2::<f64>::zeros((n, 2));
    for i in 0..n {
        let e = entities[i] as usize;
        let t = times[i] as usize;
        // Residuals chosen irrational-ish so nothing cancels by accident.
        let r = ((i as f64) * 0.37).sin();
        features[[i, 0]] = entity_fx[e] + time_fx[t] + r;
        features[[i, 1]] = 3.0 * entity_fx[e] - time_fx[t] + 0.5 * r;
    }
    let weights = Array1::from(vec![1.0, 2.0, 1.0, 0.5, 1.5, 1.0, 2.0, 1.0, 0.5, 1.0]);

    let panel = PanelData::new(features, weights).expect("valid panel");
    let entity_index = encode_groups(&entities).expect("entity encoding");
    let time_index = encode_groups(&times).expect("time encoding");
    (panel, entity_index, time_index)
}

/// Weighted sum of one output column within one group of an effect.
fn weighted_group_sum(
    result: &TransformResult, panel: &PanelData, index: &GroupIndex, group: usize, col: usize,
) -> f64 {
    index
        .ids
        .iter()
        .enumerate()
        .filter(|(_, &g)| g == group)
        .map(|(i, _)| panel.weights[i] * result.demeaned()[[i, col]])
        .sum()
}

#[test]
// The canonical worked example end to end: entities [A,A,A,B,B,B], times
// [1,2,3,1,2,3], values 1..6, unit weights. Absorbing entity only yields
// [-1, 0, 1, -1, 0, 1] with absorbed_df = 1 in a single exact pass.
fn single_effect_worked_example() {
    let panel =
        PanelData::unweighted(array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0]]).unwrap();
    let entity = encode_groups(&["A", "A", "A", "B", "B", "B"]).unwrap();

    let result = Absorber::default().absorb(&panel, &[entity]).unwrap();

    let expected = array![[-1.0], [0.0], [1.0], [-1.0], [0.0], [1.0]];
    assert_abs_diff_eq!(*result.demeaned(), expected, epsilon = 1e-12);
    assert_eq!(result.absorbed_df(), 1);
    assert_eq!(result.iterations(), 1);
    assert!(result.converged());
}

#[test]
// After convergence on an unbalanced weighted two-effect panel, the
// weighted sum of the demeaned output within every group of every effect is
// numerically zero.
fn converged_output_has_zero_weighted_group_sums() {
    let (panel, entity, time) = make_unbalanced_panel();
    let options = AbsorbOptions::new(Some(1e-12), None, None).unwrap();

    let result =
        Absorber::new(options).absorb(&panel, &[entity.clone(), time.clone()]).unwrap();

    assert!(result.converged());
    for col in 0..2 {
        for g in 0..entity.n_groups {
            assert_abs_diff_eq!(
                weighted_group_sum(&result, &panel, &entity, g, col),
                0.0,
                epsilon = 1e-7
            );
        }
        for g in 0..time.n_groups {
            assert_abs_diff_eq!(
                weighted_group_sum(&result, &panel, &time, g, col),
                0.0,
                epsilon = 1e-7
            );
        }
    }
}

#[test]
// Absorbing an already-absorbed panel is a fixed point: the second pass
// converges immediately and changes nothing.
fn absorption_is_idempotent() {
    let (panel, entity, time) = make_unbalanced_panel();
    let options = AbsorbOptions::new(Some(1e-12), None, None).unwrap();
    let absorber = Absorber::new(options);

    let first = absorber.absorb(&panel, &[entity.clone(), time.clone()]).unwrap();
    let repanel = PanelData::new(first.demeaned().clone(), panel.weights.clone()).unwrap();
    let second = absorber.absorb(&repanel, &[entity, time]).unwrap();

    assert!(second.converged());
    assert_abs_diff_eq!(*second.demeaned(), *first.demeaned(), epsilon = 1e-8);
}

#[test]
// A balanced panel with crossed entity and time effects converges in
// exactly 2 cycles, and absorbed_df = G1 + G2 - 1.
fn balanced_crossed_panel_converges_in_two_cycles() {
    // 4 entities × 5 periods, fully balanced, value = entity + time + noise.
    let n_entities = 4_usize;
    let n_times = 5_usize;
    let mut entities = Vec::new();
    let mut times = Vec::new();
    let mut values = Vec::new();
    for e in 0..n_entities {
        for t in 0..n_times {
            entities.push(e as i64);
            times.push(t as i64);
            values.push((e as f64) * 1.5 - (t as f64) * 0.25 + ((e * n_times + t) as f64).cos());
        }
    }
    let features =
        Array2::from_shape_vec((n_entities * n_times, 1), values).expect("shape agrees");
    let panel = PanelData::unweighted(features).unwrap();
    let entity = encode_groups(&entities).unwrap();
    let time = encode_groups(&times).unwrap();

    let result = Absorber::default().absorb(&panel, &[entity, time]).unwrap();

    assert!(result.converged());
    assert_eq!(result.iterations(), 2);
    assert_eq!(result.absorbed_df(), n_entities + n_times - 1);
}

#[test]
// Effect order does not change the converged fixed point (alternating
// projection is commutative at convergence, not per iteration).
fn effect_order_does_not_change_fixed_point() {
    let (panel, entity, time) = make_unbalanced_panel();
    let options = AbsorbOptions::new(Some(1e-12), None, None).unwrap();
    let absorber = Absorber::new(options);

    let forward = absorber.absorb(&panel, &[entity.clone(), time.clone()]).unwrap();
    let reversed = absorber.absorb(&panel, &[time, entity]).unwrap();

    assert_abs_diff_eq!(*forward.demeaned(), *reversed.demeaned(), epsilon = 1e-6);
}

#[test]
// A group whose members all carry zero weight is reported degenerate and
// its rows come through the transform unchanged.
fn degenerate_group_rows_pass_through() {
    let features = array![[10.0], [20.0], [1.0], [3.0]];
    let weights = array![0.0, 0.0, 1.0, 1.0];
    let panel = PanelData::new(features, weights).unwrap();
    let effect = encode_groups(&[0_i64, 0, 1, 1]).unwrap();

    let result = Absorber::default().absorb(&panel, &[effect]).unwrap();

    assert!(result.has_degenerate_groups());
    assert_eq!(result.degenerate()[0], vec![0]);
    assert_abs_diff_eq!(result.demeaned()[[0, 0]], 10.0);
    assert_abs_diff_eq!(result.demeaned()[[1, 0]], 20.0);
    assert_abs_diff_eq!(result.demeaned()[[2, 0]], -1.0);
    assert_abs_diff_eq!(result.demeaned()[[3, 0]], 1.0);
}

#[test]
// Forcing max_iterations = 1 on a pathological unbalanced two-effect panel
// yields converged = false with a still-finite, usable matrix, and the
// result improves monotonically when the cap is lifted.
fn iteration_cap_returns_usable_partial_result() {
    let (panel, entity, time) = make_unbalanced_panel();
    let capped = AbsorbOptions::new(Some(1e-12), Some(1), None).unwrap();
    let free = AbsorbOptions::new(Some(1e-12), Some(500), None).unwrap();

    let partial = Absorber::new(capped).absorb(&panel, &[entity.clone(), time.clone()]).unwrap();
    let full = Absorber::new(free).absorb(&panel, &[entity.clone(), time.clone()]).unwrap();

    assert!(!partial.converged());
    assert_eq!(partial.iterations(), 1);
    assert!(partial.demeaned().iter().all(|v| v.is_finite()));
    assert!(full.converged());
    // One capped cycle already moves the whole matrix closer to the fixed
    // point than the raw input (alternating projection is non-expansive).
    let distance = |a: &Array2<f64>, b: &Array2<f64>| -> f64 {
        a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt()
    };
    let raw_gap = distance(&panel.features, full.demeaned());
    let capped_gap = distance(partial.demeaned(), full.demeaned());
    assert!(capped_gap < raw_gap);
}

#[test]
// Nested effects reduce absorbed degrees of freedom: a strict refinement
// contributes only its extra groups, collapsing df to G_fine - 1.
fn nested_effects_reduce_absorbed_df() {
    let features = Array2::from_shape_fn((12, 1), |(i, _)| (i as f64) * 1.1 - 3.0);
    let panel = PanelData::unweighted(features).unwrap();
    // Region (3 groups of 4) refined by district (6 groups of 2).
    let region = encode_groups(&[0_i64, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2]).unwrap();
    let district = encode_groups(&[0_i64, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5]).unwrap();

    let result = Absorber::default().absorb(&panel, &[region, district]).unwrap();

    // G1 + (G2 - G1) - 1 = 3 + (6 - 3) - 1 = 5.
    assert_eq!(result.absorbed_df(), 5);
}

#[test]
// Level recovery: exact group means for a single effect; for two effects
// the recovered levels reproduce the removed component within a loose
// tolerance (documented best-effort).
fn level_recovery_single_and_multi_effect() {
    let options = AbsorbOptions::new(None, None, Some(true)).unwrap();
    let absorber = Absorber::new(options);

    // K = 1 exact.
    let panel =
        PanelData::unweighted(array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0]]).unwrap();
    let entity = encode_groups(&["A", "A", "A", "B", "B", "B"]).unwrap();
    let single = absorber.absorb(&panel, &[entity.clone()]).unwrap();
    let levels = single.effect_levels().unwrap();
    assert_abs_diff_eq!(levels[0][[0, 0]], 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(levels[0][[1, 0]], 5.0, epsilon = 1e-12);

    // K = 2 best effort: subtracted levels plus the residual reconstruct
    // the original values.
    let (panel2, entity2, time2) = make_unbalanced_panel();
    let multi = absorber.absorb(&panel2, &[entity2.clone(), time2.clone()]).unwrap();
    let levels2 = multi.effect_levels().unwrap();
    for i in 0..panel2.n_obs() {
        for col in 0..panel2.n_features() {
            let reconstructed = multi.demeaned()[[i, col]]
                + levels2[0][[entity2.ids[i], col]]
                + levels2[1][[time2.ids[i], col]];
            assert_abs_diff_eq!(reconstructed, panel2.features[[i, col]], epsilon = 1e-6);
        }
    }
}
