//! Matcher - formation feasibility search
//!
//! Decides whether every selected player can take a distinct slot whose
//! accepted roles intersect the player's roles. Leftover slots stay vacant.
//!
//! ## Algorithm
//!
//! Backtracking with a hardest-first ordering:
//! 1. Players are stably sorted by role count, fewest first (ties keep input order)
//! 2. The next player tries each free slot in slot order
//! 3. A compatible slot is marked used and the search recurses
//! 4. The first complete placement wins; otherwise the slot is released
//!
//! Slots are excluded by index (a used-flag per position), so the caller's
//! slot list is never rebuilt or mutated and can be reused across formations.

use serde::Serialize;

use crate::catalog::Slot;
use crate::player::Player;
use crate::roles::RoleSet;

/// Anything that can be placed into a slot
pub trait Candidate {
    fn roles(&self) -> RoleSet;
}

impl Candidate for Player {
    fn roles(&self) -> RoleSet {
        Player::roles(self)
    }
}

impl Candidate for RoleSet {
    fn roles(&self) -> RoleSet {
        *self
    }
}

impl<T: Candidate + ?Sized> Candidate for &T {
    fn roles(&self) -> RoleSet {
        (**self).roles()
    }
}

/// Witness placement: slot index for each player, indexed like the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    slot_of_player: Vec<usize>,
}

impl Assignment {
    pub fn slot_for(&self, player_index: usize) -> Option<usize> {
        self.slot_of_player.get(player_index).copied()
    }

    /// `(player_index, slot_index)` pairs in input order
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.slot_of_player.iter().copied().enumerate()
    }

    pub fn len(&self) -> usize {
        self.slot_of_player.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slot_of_player.is_empty()
    }
}

/// True when all `players` fit into distinct compatible `slots`.
///
/// More players than slots is a plain `false`. A player with an empty role
/// set matches nothing, so any selection containing one is infeasible.
pub fn is_feasible<P: Candidate>(players: &[P], slots: &[Slot]) -> bool {
    find_assignment(players, slots).is_some()
}

/// Like [`is_feasible`], but returns the placement found.
///
/// The search order is fully determined by the input order, so the same
/// arguments always produce the same witness.
pub fn find_assignment<P: Candidate>(players: &[P], slots: &[Slot]) -> Option<Assignment> {
    if players.len() > slots.len() {
        return None;
    }

    // hardest first; sort_by_key is stable
    let mut order: Vec<usize> = (0..players.len()).collect();
    order.sort_by_key(|&i| players[i].roles().len());

    let mut search = SlotSearch {
        roles: order.iter().map(|&i| players[i].roles()).collect(),
        slots,
        used: vec![false; slots.len()],
        placed: vec![0; players.len()],
    };

    if !search.place(0) {
        return None;
    }

    let mut slot_of_player = vec![0; players.len()];
    for (depth, &player_index) in order.iter().enumerate() {
        slot_of_player[player_index] = search.placed[depth];
    }
    Some(Assignment { slot_of_player })
}

struct SlotSearch<'a> {
    /// Player role sets in placement order
    roles: Vec<RoleSet>,
    slots: &'a [Slot],
    used: Vec<bool>,
    /// Slot chosen at each depth
    placed: Vec<usize>,
}

impl SlotSearch<'_> {
    fn place(&mut self, depth: usize) -> bool {
        let Some(&player) = self.roles.get(depth) else {
            return true;
        };

        for index in 0..self.slots.len() {
            if self.used[index] || !player.intersects(self.slots[index]) {
                continue;
            }

            self.used[index] = true;
            self.placed[depth] = index;
            if self.place(depth + 1) {
                return true;
            }
            self.used[index] = false;
        }

        false
    }
}
