use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use log::debug;

use crate::RBTree;

/// One row of the leaderboard.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Player {
    pub name: String,
    pub score: i64,
}

/// Where a player currently stands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RankInfo {
    /// The player's current score.
    pub score: i64,
    /// One-based rank; 1 is the highest score. Tied players share a rank.
    pub rank: usize,
    /// Players holding exactly this score, the player included.
    pub same_score_count: usize,
    /// Players currently on the board.
    pub total_players: usize,
}

/// Player names mapped to their current scores.
///
/// The scores are mirrored into an [`RBTree`] so that the tree always holds
/// the multiset of *current* scores: a score change removes one occurrence of
/// the old score and inserts the new one. Rank queries are answered by the
/// tree.
///
/// # Examples
///
/// ```
/// use rbt_leaderboard::Leaderboard;
///
/// let mut board = Leaderboard::new();
/// board.add_or_update("alice", 120);
/// board.add_or_update("bob", 80);
/// board.add_or_update("carl", 150);
/// board.add_or_update("bob", 140);
///
/// let info = board.rank_of("bob").unwrap();
/// assert_eq!(info.rank, 2);
/// assert_eq!(info.total_players, 3);
/// assert!(board.validate_tree());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Leaderboard {
    players: BTreeMap<String, i64>,
    scores: RBTree,
}

impl Leaderboard {
    /// Makes a new, empty `Leaderboard`.
    #[must_use]
    pub const fn new() -> Leaderboard {
        Leaderboard {
            players: BTreeMap::new(),
            scores: RBTree::new(),
        }
    }

    /// Adds a new player, or moves an existing player to `score`.
    ///
    /// Setting a player's score to the value it already has changes nothing.
    pub fn add_or_update(&mut self, name: &str, score: i64) {
        match self.players.get_mut(name) {
            Some(current) if *current == score => {}
            Some(current) => {
                debug!("{name}: {current} -> {score}");
                self.scores.remove(current);
                self.scores.insert(score);
                *current = score;
            }
            None => {
                debug!("{name}: new player at {score}");
                self.players.insert(String::from(name), score);
                self.scores.insert(score);
            }
        }
    }

    /// Takes a player off the board, returning their last score.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_leaderboard::Leaderboard;
    ///
    /// let mut board = Leaderboard::new();
    /// board.add_or_update("dina", 80);
    /// assert_eq!(board.remove("dina"), Some(80));
    /// assert_eq!(board.remove("dina"), None);
    /// assert!(board.is_empty());
    /// ```
    pub fn remove(&mut self, name: &str) -> Option<i64> {
        let score = self.players.remove(name)?;
        debug!("{name}: removed at {score}");
        self.scores.remove(&score);
        Some(score)
    }

    /// Returns a player's current score.
    #[must_use]
    pub fn score_of(&self, name: &str) -> Option<i64> {
        self.players.get(name).copied()
    }

    /// Computes a player's rank, or `None` if the name is not on the board.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_leaderboard::{Leaderboard, RankInfo};
    ///
    /// let mut board = Leaderboard::new();
    /// board.add_or_update("bob", 80);
    /// board.add_or_update("dina", 80);
    /// board.add_or_update("carl", 150);
    ///
    /// assert_eq!(
    ///     board.rank_of("dina"),
    ///     Some(RankInfo { score: 80, rank: 2, same_score_count: 2, total_players: 3 })
    /// );
    /// assert_eq!(board.rank_of("erin"), None);
    /// ```
    #[must_use]
    pub fn rank_of(&self, name: &str) -> Option<RankInfo> {
        let score = self.score_of(name)?;
        Some(RankInfo {
            score,
            rank: self.scores.count_greater(&score) + 1,
            same_score_count: self.scores.count_equal(&score),
            total_players: self.players.len(),
        })
    }

    /// Returns every player, highest score first. Tied players are listed in
    /// name order.
    #[must_use]
    pub fn standings(&self) -> Vec<Player> {
        let mut rows: Vec<Player> = self
            .players
            .iter()
            .map(|(name, &score)| Player {
                name: name.clone(),
                score,
            })
            .collect();
        // The map iterates in name order and the sort is stable.
        rows.sort_by(|a, b| b.score.cmp(&a.score));
        rows
    }

    /// Returns the rows of the standings from `half_window` places above
    /// `name` to `half_window` places below it, clipped to the board.
    ///
    /// Returns an empty list if `name` is not on the board.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_leaderboard::Leaderboard;
    ///
    /// let mut board = Leaderboard::new();
    /// for (name, score) in [("a", 50), ("b", 40), ("c", 30), ("d", 20)] {
    ///     board.add_or_update(name, score);
    /// }
    ///
    /// let names: Vec<String> = board.neighbors_around("a", 1).into_iter().map(|p| p.name).collect();
    /// assert_eq!(names, ["a", "b"]);
    /// ```
    #[must_use]
    pub fn neighbors_around(&self, name: &str, half_window: usize) -> Vec<Player> {
        let mut rows = self.standings();
        let Some(position) = rows.iter().position(|p| p.name == name) else {
            return Vec::new();
        };

        let start = position.saturating_sub(half_window);
        let end = position.saturating_add(half_window).min(rows.len() - 1);
        rows.truncate(end + 1);
        rows.drain(..start);
        rows
    }

    /// Runs the score tree's invariant check.
    #[must_use]
    pub fn validate_tree(&self) -> bool {
        self.scores.validate()
    }

    /// The multiset of current scores.
    #[must_use]
    pub fn scores(&self) -> &RBTree {
        &self.scores
    }

    /// Returns the number of players on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns `true` if nobody is on the board.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec;

    fn names(rows: &[Player]) -> Vec<&str> {
        rows.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn update_replaces_old_score_in_tree() {
        let mut board = Leaderboard::new();
        board.add_or_update("bob", 80);
        board.add_or_update("dina", 80);
        board.add_or_update("bob", 140);

        assert_eq!(board.scores().to_vec(), [80, 140]);
        assert_eq!(board.score_of("bob"), Some(140));
        assert_eq!(board.score_of("dina"), Some(80));
    }

    #[test]
    fn same_score_update_is_a_no_op() {
        let mut board = Leaderboard::new();
        board.add_or_update("alice", 120);
        board.add_or_update("alice", 120);
        assert_eq!(board.scores().len(), 1);
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn standings_break_ties_by_name() {
        let mut board = Leaderboard::new();
        board.add_or_update("zed", 10);
        board.add_or_update("amy", 10);
        board.add_or_update("max", 30);
        assert_eq!(names(&board.standings()), ["max", "amy", "zed"]);
    }

    #[test]
    fn neighbors_clip_to_board() {
        let mut board = Leaderboard::new();
        for (name, score) in [("a", 50), ("b", 40), ("c", 30), ("d", 20), ("e", 10)] {
            board.add_or_update(name, score);
        }
        assert_eq!(names(&board.neighbors_around("c", 1)), ["b", "c", "d"]);
        assert_eq!(names(&board.neighbors_around("c", 2)), ["a", "b", "c", "d", "e"]);
        assert_eq!(names(&board.neighbors_around("e", 2)), ["c", "d", "e"]);
        assert_eq!(names(&board.neighbors_around("a", 0)), ["a"]);
        assert_eq!(names(&board.neighbors_around("a", usize::MAX)), ["a", "b", "c", "d", "e"]);
        assert!(board.neighbors_around("nobody", 2).is_empty());
    }

    #[test]
    fn ties_share_a_rank() {
        let mut board = Leaderboard::new();
        board.add_or_update("a", 100);
        board.add_or_update("b", 90);
        board.add_or_update("c", 90);
        board.add_or_update("d", 50);

        let c = board.rank_of("c").unwrap();
        assert_eq!((c.rank, c.same_score_count, c.total_players), (2, 2, 4));
        let d = board.rank_of("d").unwrap();
        assert_eq!((d.rank, d.same_score_count), (4, 1));
    }

    #[test]
    fn remove_drops_one_occurrence() {
        let mut board = Leaderboard::new();
        board.add_or_update("bob", 80);
        board.add_or_update("dina", 80);
        assert_eq!(board.remove("bob"), Some(80));
        assert_eq!(board.scores().to_vec(), vec![80]);
        assert_eq!(board.rank_of("dina").unwrap().same_score_count, 1);
        assert!(board.validate_tree());
    }
}
