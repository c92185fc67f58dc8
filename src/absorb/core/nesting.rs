//! Nesting detection between effect dimensions.
//!
//! An effect B is *nested* within an effect A when every group of B lies
//! entirely inside a single group of A, i.e. the observation-level mapping
//! `group_B → group_A` is a function. When that holds, absorbing B (the
//! finer partition) already spans A's group intercepts, so A contributes no
//! additional absorbed degrees of freedom. Each pairwise check is O(N).
use crate::absorb::core::encoder::GroupIndex;

/// True when `fine` refines `coarse`: every group of `fine` maps to exactly
/// one group of `coarse`.
///
/// Both indices must cover the same observations; the absorption driver
/// guarantees this before calling. Returns `false` on a length mismatch
/// rather than guessing.
pub fn is_refinement(fine: &GroupIndex, coarse: &GroupIndex) -> bool {
    if fine.len() != coarse.len() {
        return false;
    }
    // target[g] = coarse group seen for fine group g, or usize::MAX if unseen.
    let mut target = vec![usize::MAX; fine.n_groups];
    for (&fg, &cg) in fine.ids.iter().zip(coarse.ids.iter()) {
        let seen = target[fg];
        if seen == usize::MAX {
            target[fg] = cg;
        } else if seen != cg {
            return false;
        }
    }
    true
}

/// Mark effects whose group intercepts are already spanned by a finer
/// effect.
///
/// Effect `j` is redundant when some other effect `k` refines it. When two
/// effects induce the identical partition, each refines the other; the
/// later index is marked redundant so exactly one survives (deterministic
/// tie-break).
///
/// The K = 2 behavior is authoritative; K > 2 generalizes via these pairwise
/// checks, so chains of nested effects collapse to their finest partition.
pub fn redundant_effects(effects: &[&GroupIndex]) -> Vec<bool> {
    let k = effects.len();
    let mut redundant = vec![false; k];
    for j in 0..k {
        for i in 0..k {
            if i == j {
                continue;
            }
            if !is_refinement(effects[i], effects[j]) {
                continue;
            }
            let mutual = is_refinement(effects[j], effects[i]);
            // Strict refinement always wins; identical partitions keep the
            // earlier effect.
            if !mutual || i < j {
                redundant[j] = true;
                break;
            }
        }
    }
    redundant
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::absorb::core::encoder::encode_groups;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover refinement detection for nested, crossed, and
    // identical partitions, and the redundancy marking used by the absorbed
    // degrees-of-freedom computation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A strict refinement (sub-groups within each parent group) is detected
    // in one direction only.
    fn is_refinement_detects_strict_nesting() {
        let coarse = encode_groups(&[0_i64, 0, 0, 1, 1, 1]).unwrap();
        let fine = encode_groups(&[0_i64, 0, 1, 2, 2, 3]).unwrap();

        assert!(is_refinement(&fine, &coarse));
        assert!(!is_refinement(&coarse, &fine));
    }

    #[test]
    // Purpose
    // -------
    // Crossed (non-nested) effects refine in neither direction.
    fn is_refinement_rejects_crossed_effects() {
        let entity = encode_groups(&[0_i64, 0, 1, 1]).unwrap();
        let time = encode_groups(&[0_i64, 1, 0, 1]).unwrap();

        assert!(!is_refinement(&entity, &time));
        assert!(!is_refinement(&time, &entity));
    }

    #[test]
    // Purpose
    // -------
    // For identical partitions exactly one effect survives, and it is the
    // earlier one.
    fn redundant_effects_breaks_ties_by_position() {
        let a = encode_groups(&[0_i64, 1, 0, 1]).unwrap();
        let b = encode_groups(&[5_i64, 9, 5, 9]).unwrap();

        let flags = redundant_effects(&[&a, &b]);

        assert_eq!(flags, vec![false, true]);
    }

    #[test]
    // Purpose
    // -------
    // In a coarse ⊃ fine pair, only the coarse effect is redundant; crossed
    // effects are never marked.
    fn redundant_effects_marks_only_spanned_effects() {
        let coarse = encode_groups(&[0_i64, 0, 1, 1]).unwrap();
        let fine = encode_groups(&[0_i64, 1, 2, 3]).unwrap();
        let crossed = encode_groups(&[0_i64, 1, 0, 1]).unwrap();

        assert_eq!(redundant_effects(&[&coarse, &fine]), vec![true, false]);
        assert_eq!(redundant_effects(&[&coarse, &crossed]), vec![false, false]);
    }
}
