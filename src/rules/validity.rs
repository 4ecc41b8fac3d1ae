//! Validity checker: meld shapes, joker resolution, and whole-board checks.
//!
//! Nothing here fails loudly. Meld checks return a `MeldCheck`, board checks
//! return a `bool` (or a `BoardRejection` naming the reason), and the turn
//! engine decides what to do with a "no".
//!
//! ## Joker resolution
//!
//! A joker has no face of its own inside a meld; it stands for whatever its
//! neighbours imply:
//! - in a run, a joker continues from its left neighbour (color, number + 1);
//!   a joker with nothing resolved to its left counts back from the nearest
//!   real tile on its right
//! - in a group, a joker takes the group's number and the first suit color
//!   the real tiles leave free
//!
//! Resolution is a pure function of the tile sequence, so resolving the same
//! meld twice yields the same faces.
//!
//! ## Provisional melds
//!
//! A meld assembled this turn is classified by its first three tiles: two
//! real tiles sharing a number make it a group candidate, two real tiles
//! whose numbers differ by their distance make it a run candidate. A meld
//! that is both, or neither, is rejected. The heuristic decides the rules of
//! the game, so insertion order matters: `[5, 5, 6]` is never a run.

use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

use crate::core::entity::{MeldId, TileId};
use crate::core::player::Player;
use crate::tiles::{Color, Face, TileCatalog};
use crate::zones::{Board, LocationTable, MeldKind};

/// Resolved faces of a meld, one per tile.
pub type Faces = SmallVec<[Face; 16]>;

/// Outcome of a meld-shape check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeldCheck {
    pub valid: bool,
    /// Sum of resolved numbers. Zero when invalid.
    pub total: u32,
}

impl MeldCheck {
    pub const INVALID: Self = Self { valid: false, total: 0 };

    const fn valid(total: u32) -> Self {
        Self { valid: true, total }
    }
}

/// Shape guessed for a provisional meld.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Group,
    Run,
    /// The first three tiles hint at both shapes.
    Ambiguous,
    /// The first three tiles hint at neither shape.
    Unclassified,
}

/// Why a board failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BoardRejection {
    #[error("{meld} has {len} tiles, melds need at least 3")]
    TooSmall { meld: MeldId, len: usize },

    #[error("{meld} is not a valid {kind:?}")]
    ShapeViolation { meld: MeldId, kind: MeldKind },

    #[error("{meld} cannot be classified as a group or a run")]
    Unclassified { meld: MeldId },

    #[error("initial meld worth {total} points, {threshold} required")]
    QuarantineUnmet { total: u32, threshold: u32 },
}

/// Minimum tiles in any meld on a valid board.
pub const MIN_MELD_SIZE: usize = 3;

// =============================================================================
// Joker resolution
// =============================================================================

/// Resolve every tile of a run to the face it stands for.
///
/// Jokers with no real tile to anchor on keep their printed face, which
/// then fails the run check.
#[must_use]
pub fn resolve_run(tiles: &[TileId], catalog: &TileCatalog) -> Faces {
    let mut faces = Faces::with_capacity(tiles.len());

    for (i, &id) in tiles.iter().enumerate() {
        let tile = &catalog[id];
        if !tile.is_joker {
            faces.push(tile.face);
            continue;
        }

        let resolved = match faces.last() {
            Some(prev) if prev.color != Color::Joker => {
                Some(Face::new(prev.color, prev.number.saturating_add(1)))
            }
            _ => anchor_right(tiles, i, catalog),
        };
        faces.push(resolved.unwrap_or(tile.face));
    }

    faces
}

/// Face a run joker at `i` takes from the nearest real tile on its right.
fn anchor_right(tiles: &[TileId], i: usize, catalog: &TileCatalog) -> Option<Face> {
    let (offset, anchor) = tiles[i + 1..]
        .iter()
        .enumerate()
        .map(|(k, &id)| (k + 1, &catalog[id]))
        .find(|(_, t)| !t.is_joker)?;

    // Out of range numbers become 0, which no run accepts
    let number = i64::from(anchor.face.number) - offset as i64;
    Some(Face::new(anchor.face.color, u8::try_from(number).unwrap_or(0)))
}

/// Resolve every tile of a group to the face it stands for.
#[must_use]
pub fn resolve_group(tiles: &[TileId], catalog: &TileCatalog) -> Faces {
    let printed: Faces = tiles.iter().map(|&id| catalog.face(id)).collect();

    let Some(number) = tiles
        .iter()
        .find(|&&id| !catalog.is_joker(id))
        .map(|&id| catalog.face(id).number)
    else {
        return printed;
    };

    let mut used: SmallVec<[Color; 8]> = tiles
        .iter()
        .filter(|&&id| !catalog.is_joker(id))
        .map(|&id| catalog.face(id).color)
        .collect();

    tiles
        .iter()
        .map(|&id| {
            if !catalog.is_joker(id) {
                return catalog.face(id);
            }
            let color = catalog
                .colors()
                .iter()
                .copied()
                .find(|c| !used.contains(c))
                .unwrap_or(Color::Joker);
            used.push(color);
            Face::new(color, number)
        })
        .collect()
}

fn in_range(face: &Face, catalog: &TileCatalog) -> bool {
    face.color != Color::Joker && (1..=catalog.max_number()).contains(&face.number)
}

// =============================================================================
// Meld checks
// =============================================================================

/// Check a run: one color, strictly consecutive numbers.
///
/// Size is not checked here; the board check enforces the minimum.
#[must_use]
pub fn check_run(tiles: &[TileId], catalog: &TileCatalog) -> MeldCheck {
    let faces = resolve_run(tiles, catalog);

    if !faces.iter().all(|f| in_range(f, catalog)) {
        return MeldCheck::INVALID;
    }

    let consecutive = faces
        .windows(2)
        .all(|w| w[0].color == w[1].color && w[1].number == w[0].number + 1);
    if !consecutive {
        return MeldCheck::INVALID;
    }

    MeldCheck::valid(faces.iter().map(|f| u32::from(f.number)).sum())
}

/// Check a group: one number, no repeated color, at most one tile per suit.
#[must_use]
pub fn check_group(tiles: &[TileId], catalog: &TileCatalog) -> MeldCheck {
    if tiles.len() > catalog.colors().len() {
        return MeldCheck::INVALID;
    }

    // Two real tiles with the same face means a repeated color
    let mut real: SmallVec<[Face; 8]> = tiles
        .iter()
        .filter(|&&id| !catalog.is_joker(id))
        .map(|&id| catalog.face(id))
        .collect();
    real.sort_unstable();
    if real.windows(2).any(|w| w[0] == w[1]) {
        return MeldCheck::INVALID;
    }

    let faces = resolve_group(tiles, catalog);
    if !faces.iter().all(|f| in_range(f, catalog)) {
        return MeldCheck::INVALID;
    }
    if faces.windows(2).any(|w| w[0].number != w[1].number) {
        return MeldCheck::INVALID;
    }

    MeldCheck::valid(faces.iter().map(|f| u32::from(f.number)).sum())
}

/// Guess the shape of a provisional meld from its first three tiles.
#[must_use]
pub fn classify(tiles: &[TileId], catalog: &TileCatalog) -> Classification {
    let head: SmallVec<[(usize, Face); 3]> = tiles
        .iter()
        .take(3)
        .enumerate()
        .filter(|&(_, &id)| !catalog.is_joker(id))
        .map(|(i, &id)| (i, catalog.face(id)))
        .collect();

    let mut group_hint = false;
    let mut run_hint = false;
    for (a, &(i, fi)) in head.iter().enumerate() {
        for &(j, fj) in &head[a + 1..] {
            let gap = i64::from(fj.number) - i64::from(fi.number);
            if gap == 0 {
                group_hint = true;
            }
            if gap == (j - i) as i64 {
                run_hint = true;
            }
        }
    }

    match (group_hint, run_hint) {
        (true, false) => Classification::Group,
        (false, true) => Classification::Run,
        (true, true) => Classification::Ambiguous,
        (false, false) => Classification::Unclassified,
    }
}

// =============================================================================
// Board checks
// =============================================================================

/// Validate the whole board for the acting player.
///
/// On success returns the point total of the provisional melds.
pub fn board_verdict(
    board: &Board,
    catalog: &TileCatalog,
    in_quarantine: bool,
    threshold: u32,
) -> Result<u32, BoardRejection> {
    let mut provisional_total = 0;

    for meld in board.melds() {
        if meld.len() < MIN_MELD_SIZE {
            return Err(BoardRejection::TooSmall { meld: meld.id, len: meld.len() });
        }

        let check = match meld.kind {
            MeldKind::Group => check_group(&meld.tiles, catalog),
            MeldKind::Run => check_run(&meld.tiles, catalog),
            MeldKind::Provisional => {
                let check = match classify(&meld.tiles, catalog) {
                    Classification::Group => check_group(&meld.tiles, catalog),
                    Classification::Run => check_run(&meld.tiles, catalog),
                    Classification::Ambiguous | Classification::Unclassified => {
                        return Err(BoardRejection::Unclassified { meld: meld.id });
                    }
                };
                provisional_total += check.total;
                check
            }
        };

        if !check.valid {
            return Err(BoardRejection::ShapeViolation { meld: meld.id, kind: meld.kind });
        }
    }

    if in_quarantine && provisional_total < threshold {
        return Err(BoardRejection::QuarantineUnmet {
            total: provisional_total,
            threshold,
        });
    }

    Ok(provisional_total)
}

/// True if every meld is legal and, for a quarantined player, the new melds
/// reach `threshold` points.
#[must_use]
pub fn check_board(board: &Board, catalog: &TileCatalog, player: &Player, threshold: u32) -> bool {
    match board_verdict(board, catalog, player.in_quarantine, threshold) {
        Ok(_) => true,
        Err(reason) => {
            debug!(%reason, "board rejected");
            false
        }
    }
}

/// Commit the board: lock every tile in place, promote provisional melds to
/// their classified shape, and record what each joker stands for.
///
/// Calling `fix` on a board with no provisional melds changes nothing.
pub fn fix(board: &mut Board, catalog: &TileCatalog, locations: &mut LocationTable) {
    let tiles: Vec<TileId> = board.tiles().collect();
    for tile in tiles {
        locations.commit(tile);
    }

    let promotions: Vec<(usize, MeldKind)> = board
        .melds()
        .enumerate()
        .filter(|(_, m)| m.kind == MeldKind::Provisional)
        .filter_map(|(i, m)| match classify(&m.tiles, catalog) {
            Classification::Group => Some((i, MeldKind::Group)),
            Classification::Run => Some((i, MeldKind::Run)),
            Classification::Ambiguous | Classification::Unclassified => None,
        })
        .collect();
    for (index, kind) in promotions {
        board.set_kind(index, kind);
    }

    let mut joker_faces = Vec::new();
    for meld in board.melds() {
        let faces = match meld.kind {
            MeldKind::Group => resolve_group(&meld.tiles, catalog),
            MeldKind::Run => resolve_run(&meld.tiles, catalog),
            MeldKind::Provisional => continue,
        };
        for (&id, &face) in meld.tiles.iter().zip(faces.iter()) {
            if catalog.is_joker(id) {
                joker_faces.push((id, face));
            }
        }
    }
    for (joker, face) in joker_faces {
        board.set_joker_face(joker, face);
    }
    board.prune_joker_faces();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::zones::Location;

    // Standard layout: red 0..12, blue 13..25, orange 26..38, black 39..51,
    // second copy +52, jokers 104 and 105.
    const RED: u16 = 0;
    const BLUE: u16 = 13;
    const ORANGE: u16 = 26;
    const BLACK: u16 = 39;
    const JOKER: TileId = TileId(104);
    const JOKER2: TileId = TileId(105);

    fn t(color_base: u16, number: u16) -> TileId {
        TileId(color_base + number - 1)
    }

    fn catalog() -> TileCatalog {
        TileCatalog::build(&GameConfig::default())
    }

    #[test]
    fn test_group_of_three() {
        let c = catalog();
        let check = check_group(&[t(RED, 7), t(BLUE, 7), t(BLACK, 7)], &c);
        assert_eq!(check, MeldCheck { valid: true, total: 21 });
    }

    #[test]
    fn test_group_rejects_repeated_color() {
        let c = catalog();
        // Second copy of red 7
        let tiles = [t(RED, 7), t(BLUE, 7), TileId(52 + 6)];
        assert!(!check_group(&tiles, &c).valid);
    }

    #[test]
    fn test_group_rejects_mixed_numbers_and_oversize() {
        let c = catalog();
        assert!(!check_group(&[t(RED, 7), t(BLUE, 8), t(BLACK, 7)], &c).valid);

        let five = [t(RED, 7), t(BLUE, 7), t(BLACK, 7), t(ORANGE, 7), JOKER];
        assert!(!check_group(&five, &c).valid);
    }

    #[test]
    fn test_group_joker_takes_number_and_free_color() {
        let c = catalog();
        let tiles = [JOKER, t(BLUE, 9), t(BLACK, 9)];

        let check = check_group(&tiles, &c);
        assert_eq!(check, MeldCheck { valid: true, total: 27 });

        let faces = resolve_group(&tiles, &c);
        assert_eq!(faces[0], Face::new(Color::Red, 9));
    }

    #[test]
    fn test_group_with_two_jokers() {
        let c = catalog();
        let tiles = [t(RED, 11), JOKER, JOKER2];
        assert_eq!(check_group(&tiles, &c), MeldCheck { valid: true, total: 33 });
    }

    #[test]
    fn test_group_of_only_jokers_is_invalid() {
        let c = catalog();
        assert!(!check_group(&[JOKER, JOKER2], &c).valid);
    }

    #[test]
    fn test_run_of_three() {
        let c = catalog();
        let check = check_run(&[t(RED, 1), t(RED, 2), t(RED, 3)], &c);
        assert_eq!(check, MeldCheck { valid: true, total: 6 });
    }

    #[test]
    fn test_run_rejects_gaps_colors_and_descending() {
        let c = catalog();
        assert!(!check_run(&[t(RED, 1), t(RED, 3), t(RED, 4)], &c).valid);
        assert!(!check_run(&[t(RED, 1), t(BLUE, 2), t(RED, 3)], &c).valid);
        assert!(!check_run(&[t(RED, 3), t(RED, 2), t(RED, 1)], &c).valid);
    }

    #[test]
    fn test_run_jokers_at_each_position() {
        let c = catalog();

        // Leading joker counts back from its right neighbour
        let lead = [JOKER, t(BLUE, 5), t(BLUE, 6)];
        assert_eq!(check_run(&lead, &c), MeldCheck { valid: true, total: 15 });
        assert_eq!(resolve_run(&lead, &c)[0], Face::new(Color::Blue, 4));

        // Interior joker continues from the left
        let mid = [t(BLUE, 5), JOKER, t(BLUE, 7)];
        assert_eq!(check_run(&mid, &c), MeldCheck { valid: true, total: 18 });

        // Trailing joker continues from the left
        let tail = [t(BLUE, 5), t(BLUE, 6), JOKER];
        assert_eq!(check_run(&tail, &c), MeldCheck { valid: true, total: 18 });

        // Two leading jokers both anchor on the first real tile
        let two = [JOKER, JOKER2, t(ORANGE, 10)];
        assert_eq!(check_run(&two, &c), MeldCheck { valid: true, total: 27 });
    }

    #[test]
    fn test_run_joker_out_of_range() {
        let c = catalog();
        assert!(!check_run(&[JOKER, t(RED, 1), t(RED, 2)], &c).valid);
        assert!(!check_run(&[t(RED, 12), t(RED, 13), JOKER], &c).valid);
        assert!(!check_run(&[JOKER, JOKER2], &c).valid);
    }

    #[test]
    fn test_joker_resolution_is_idempotent() {
        let c = catalog();
        let tiles = [t(BLACK, 2), JOKER, t(BLACK, 4)];
        assert_eq!(resolve_run(&tiles, &c), resolve_run(&tiles, &c));
        assert_eq!(resolve_group(&tiles, &c), resolve_group(&tiles, &c));
    }

    #[test]
    fn test_classify() {
        let c = catalog();
        assert_eq!(classify(&[t(RED, 7), t(BLUE, 7), t(BLACK, 7)], &c), Classification::Group);
        assert_eq!(classify(&[t(RED, 1), t(RED, 2), t(RED, 3)], &c), Classification::Run);
        assert_eq!(classify(&[t(RED, 5), t(BLUE, 5), t(RED, 6)], &c), Classification::Ambiguous);
        assert_eq!(classify(&[t(RED, 1), t(RED, 5), t(RED, 9)], &c), Classification::Unclassified);
        // Gap of two across a joker still hints at a run
        assert_eq!(classify(&[t(RED, 5), JOKER, t(RED, 7)], &c), Classification::Run);
        assert_eq!(classify(&[JOKER, t(RED, 9), t(BLUE, 9)], &c), Classification::Group);
        // Only one real tile in the first three
        assert_eq!(classify(&[JOKER, JOKER2, t(RED, 9)], &c), Classification::Unclassified);
    }

    fn board_with(kind: MeldKind, melds: &[&[TileId]]) -> Board {
        let mut board = Board::new();
        for tiles in melds {
            board.push_meld(kind, tiles.to_vec());
        }
        board
    }

    #[test]
    fn test_board_rejects_small_melds() {
        let c = catalog();
        let board = board_with(MeldKind::Provisional, &[&[t(RED, 1), t(RED, 2)]]);
        assert!(matches!(
            board_verdict(&board, &c, false, 30),
            Err(BoardRejection::TooSmall { len: 2, .. })
        ));
    }

    #[test]
    fn test_board_revalidates_committed_melds() {
        let c = catalog();
        let board = board_with(MeldKind::Run, &[&[t(RED, 1), t(RED, 2), t(BLUE, 3)]]);
        assert!(matches!(
            board_verdict(&board, &c, false, 30),
            Err(BoardRejection::ShapeViolation { kind: MeldKind::Run, .. })
        ));
    }

    #[test]
    fn test_board_quarantine_threshold() {
        let c = catalog();

        // 1 + 2 + 3 + 4 and 5 + 5 + 5
        let twenty_five = board_with(
            MeldKind::Provisional,
            &[&[t(BLUE, 1), t(BLUE, 2), t(BLUE, 3), t(BLUE, 4)], &[t(RED, 5), t(ORANGE, 5), t(BLACK, 5)]],
        );
        assert_eq!(
            board_verdict(&twenty_five, &c, true, 30),
            Err(BoardRejection::QuarantineUnmet { total: 25, threshold: 30 })
        );
        assert_eq!(board_verdict(&twenty_five, &c, false, 30), Ok(25));

        // 2 + 3 + 4 + 5 and 5 + 6 + 7
        let thirty_two = board_with(
            MeldKind::Provisional,
            &[&[t(RED, 2), t(RED, 3), t(RED, 4), t(RED, 5)], &[t(BLUE, 5), t(BLUE, 6), t(BLUE, 7)]],
        );
        assert_eq!(board_verdict(&thirty_two, &c, true, 30), Ok(32));
    }

    #[test]
    fn test_quarantine_counts_only_provisional_melds() {
        let c = catalog();
        let mut board = board_with(MeldKind::Run, &[&[t(RED, 11), t(RED, 12), t(RED, 13)]]);
        board.push_meld(MeldKind::Provisional, vec![t(BLUE, 2), t(BLUE, 3), t(BLUE, 4)]);

        assert_eq!(
            board_verdict(&board, &c, true, 30),
            Err(BoardRejection::QuarantineUnmet { total: 9, threshold: 30 })
        );
    }

    #[test]
    fn test_fix_promotes_and_commits() {
        let c = catalog();
        let mut board = Board::new();
        let group = board.push_meld(MeldKind::Provisional, vec![t(RED, 7), t(BLUE, 7), JOKER]);
        let run = board.push_meld(MeldKind::Provisional, vec![t(RED, 1), t(RED, 2), t(RED, 3)]);

        let mut locations = LocationTable::new();
        for tile in board.tiles() {
            locations.place(tile, Location::Board { committed: false });
        }

        fix(&mut board, &c, &mut locations);

        assert_eq!(board.get(group).unwrap().kind, MeldKind::Group);
        assert_eq!(board.get(run).unwrap().kind, MeldKind::Run);
        assert_eq!(board.position(group), Some(0));
        assert!(board.tiles().all(|tile| locations.is_on_board(tile)));
        assert_eq!(board.joker_face(JOKER), Some(Face::new(Color::Orange, 7)));
        assert_eq!(
            board.describe_meld(group, &c).unwrap(),
            "[(red, 7), (blue, 7), (JOKER) as (orange, 7)]"
        );
    }

    #[test]
    fn test_fix_is_idempotent() {
        let c = catalog();
        let mut board = board_with(MeldKind::Provisional, &[&[t(RED, 4), t(RED, 5), JOKER]]);
        let mut locations = LocationTable::new();
        for tile in board.tiles() {
            locations.place(tile, Location::Board { committed: false });
        }

        fix(&mut board, &c, &mut locations);
        let once = (board.clone(), locations.clone());
        fix(&mut board, &c, &mut locations);

        assert_eq!((board, locations), once);
    }
}
