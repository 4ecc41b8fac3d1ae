//! Move applier: carry out one action against the game state.
//!
//! The applier trusts its caller. Actions come from the move generator, so a
//! missing meld or a tile that is not where the action says is a stale action
//! and is ignored with a warning rather than an error. Whether the resulting
//! board is legal is decided later by the validity checker.
//!
//! Every tile move goes through the location table as well as the container,
//! so the two never disagree.

use tracing::{debug, warn};

use crate::core::action::{Action, ActionRecord, End, Target};
use crate::core::entity::{MeldId, TileId};
use crate::core::player::PlayerId;
use crate::core::state::GameState;
use crate::zones::{Location, MeldKind};

/// Apply `action` for `player` and record it in the action history.
pub fn apply_action(state: &mut GameState, player: PlayerId, action: &Action) {
    let applied = match *action {
        Action::DrawTile => draw_tile(state, player).is_some(),
        Action::Split { meld, at } => split(state, meld, at),
        Action::AddFromRack { tile, target, end } => add_from_rack(state, player, tile, target, end),
        Action::AddFromBoard {
            tile,
            source,
            target,
            end,
        } => add_from_board(state, tile, source, target, end),
    };

    if !applied {
        return;
    }

    let sequence = state.next_sequence();
    let record = ActionRecord::new(player, *action, state.turn_number, sequence);
    debug!(player = %player, sequence, action = ?action, "applied action");
    state.record_action(record);
}

/// Move one random pouch tile to the player's rack.
///
/// Clears the player's first-move flag even when the pouch is empty.
pub fn draw_tile(state: &mut GameState, player: PlayerId) -> Option<TileId> {
    state.players[player].first_move = false;

    let Some(tile) = state.pouch.draw(&mut state.rng) else {
        warn!(player = %player, "pouch is empty, nothing drawn");
        return None;
    };

    state.players[player].rack.push(tile);
    state.locations.move_to(tile, Location::Rack(player));
    Some(tile)
}

fn split(state: &mut GameState, meld: MeldId, at: usize) -> bool {
    let len = state.board.get(meld).map_or(0, |m| m.len());
    if at == 0 || at >= len {
        warn!(%meld, at, len, "split point outside meld, ignored");
        return false;
    }

    let Some(removed) = state.board.remove_meld(meld) else {
        return false;
    };
    let (left, right) = removed.tiles.split_at(at);
    state.board.push_meld(MeldKind::Provisional, left.to_vec());
    state.board.push_meld(MeldKind::Provisional, right.to_vec());
    true
}

fn add_from_rack(
    state: &mut GameState,
    player: PlayerId,
    tile: TileId,
    target: Target,
    end: End,
) -> bool {
    if let Target::Meld(id) = target {
        if state.board.get(id).is_none() {
            warn!(meld = %id, "target meld not on board, ignored");
            return false;
        }
    }

    if !state.players[player].rack.remove(tile) {
        warn!(player = %player, %tile, "tile not in rack, ignored");
        return false;
    }
    state.players[player].first_move = false;
    state.locations.move_to(tile, Location::Board { committed: false });

    match target {
        Target::NewMeld => {
            state.board.push_meld(MeldKind::Provisional, vec![tile]);
        }
        Target::Meld(id) => {
            state.board.insert_tile(id, tile, end);
        }
    }
    true
}

fn add_from_board(
    state: &mut GameState,
    tile: TileId,
    source: MeldId,
    target: MeldId,
    end: End,
) -> bool {
    let lone = state.board.get(source).and_then(|m| m.single_tile());
    if lone != Some(tile) || source == target || state.board.get(target).is_none() {
        warn!(%tile, %source, %target, "board move no longer possible, ignored");
        return false;
    }

    state.board.remove_meld(source);
    state.board.insert_tile(target, tile, end)
}
