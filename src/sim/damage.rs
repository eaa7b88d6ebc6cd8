//! Block damage and the win condition

use super::state::Block;

/// Subtract `damage` from the block with `target_id` and drop any block left at zero.
///
/// Returns a new collection; other blocks pass through unchanged and in order.
pub fn apply_damage(blocks: &[Block], target_id: &str, damage: u32) -> Vec<Block> {
    blocks
        .iter()
        .map(|b| {
            if b.id != target_id {
                return b.clone();
            }
            Block {
                hp: b.hp.saturating_sub(damage),
                ..b.clone()
            }
        })
        .filter(|b| b.hp > 0)
        .collect()
}

/// A stage is won once no blocks remain
#[inline]
pub fn has_won(blocks: &[Block]) -> bool {
    blocks.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::stage::generate_stage;
    use glam::Vec2;
    use proptest::prelude::*;

    fn block(id: &str, hp: u32) -> Block {
        Block {
            id: id.to_string(),
            pos: Vec2::new(10.0, 10.0),
            size: Vec2::new(40.0, 20.0),
            hp,
            max_hp: hp,
            is_boss: false,
        }
    }

    #[test]
    fn test_two_hits_destroy_stage_one_block() {
        let blocks = generate_stage(1).blocks;
        let target = blocks[0].id.clone();
        assert_eq!(blocks[0].hp, 2);

        let once = apply_damage(&blocks, &target, 1);
        assert_eq!(once.len(), 16);
        assert_eq!(once[0].hp, 1);
        assert_eq!(once[0].max_hp, 2);

        let twice = apply_damage(&once, &target, 1);
        assert_eq!(twice.len(), 15);
        assert!(twice.iter().all(|b| b.id != target));
    }

    #[test]
    fn test_overkill_floors_and_removes() {
        let blocks = vec![block("a", 3), block("b", 2), block("c", 1)];
        let out = apply_damage(&blocks, "b", 5);
        let ids: Vec<_> = out.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        // Input untouched
        assert_eq!(blocks[1].hp, 2);
    }

    #[test]
    fn test_unknown_target_is_noop() {
        let blocks = vec![block("a", 3)];
        assert_eq!(apply_damage(&blocks, "zzz", 1), blocks);
    }

    #[test]
    fn test_has_won() {
        assert!(has_won(&[]));
        assert!(!has_won(&[block("a", 1)]));
    }

    proptest! {
        #[test]
        fn prop_damage_never_heals_or_leaves_dead_blocks(
            hps in proptest::collection::vec(1u32..20, 1..16),
            target in 0usize..16,
            damage in 0u32..30,
        ) {
            let blocks: Vec<Block> = hps
                .iter()
                .enumerate()
                .map(|(i, hp)| block(&format!("b{i}"), *hp))
                .collect();
            let target_id = format!("b{}", target % blocks.len());
            let out = apply_damage(&blocks, &target_id, damage);

            prop_assert!(out.iter().all(|b| b.hp > 0));
            for b in &out {
                let before = blocks.iter().find(|o| o.id == b.id).unwrap();
                prop_assert!(b.hp <= before.hp);
            }
            prop_assert!(out.len() == blocks.len() || out.len() + 1 == blocks.len());
        }
    }
}
