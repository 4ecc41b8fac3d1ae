//! Move generator: the ordered list of actions open to the acting player.
//!
//! Shape legality is not filtered here. Any tile may be offered at either
//! end of any meld; the board check at the end of the turn decides.
//!
//! ## Order
//!
//! 1. `DrawTile`, while nothing has come off the rack this turn
//! 2. every split, melds in board order, boundaries left to right
//! 3. every rack tile at the front and back of every meld
//! 4. every lone board tile at the front and back of every other meld
//! 5. every rack tile as a new meld
//!
//! The shell shows the list by index, so the order is part of the contract.

use rustc_hash::FxHashSet;

use crate::core::action::{Action, End, Target};
use crate::core::player::Player;
use crate::tiles::{Face, TileCatalog};
use crate::zones::Board;

/// Enumerate the legal actions for `player` against `board`.
#[must_use]
pub fn legal_actions(board: &Board, player: &Player, catalog: &TileCatalog) -> Vec<Action> {
    let mut actions = Vec::new();

    if player.first_move {
        actions.push(Action::DrawTile);
    }

    push_splits(board, catalog, &mut actions);

    for tile in player.rack.iter() {
        for meld in board.melds() {
            for end in [End::Front, End::Back] {
                actions.push(Action::AddFromRack {
                    tile,
                    target: Target::Meld(meld.id),
                    end,
                });
            }
        }
    }

    let singles: Vec<_> = board
        .melds()
        .filter_map(|m| m.single_tile().map(|tile| (tile, m.id)))
        .collect();
    for (tile, source) in singles {
        // Moving a tile onto its own meld would drop it
        for meld in board.melds().filter(|m| m.id != source) {
            for end in [End::Front, End::Back] {
                actions.push(Action::AddFromBoard {
                    tile,
                    source,
                    target: meld.id,
                    end,
                });
            }
        }
    }

    for tile in player.rack.iter() {
        actions.push(Action::AddFromRack {
            tile,
            target: Target::NewMeld,
            end: End::Back,
        });
    }

    actions
}

/// Splits at every inner boundary. Two melds showing the same faces offer
/// their splits once, under the first of them.
fn push_splits(board: &Board, catalog: &TileCatalog, actions: &mut Vec<Action>) {
    let mut seen: FxHashSet<(Vec<Face>, usize)> = FxHashSet::default();

    for meld in board.melds() {
        let faces = meld.faces(catalog);
        for at in 1..meld.len() {
            if seen.insert((faces.clone(), at)) {
                actions.push(Action::Split { meld: meld.id, at });
            }
        }
    }
}
