//! Roster members and standings.

use scrawl_protocol::{ClientId, PlayerData};

use tokio::sync::mpsc;

/// Channel end that delivers serialized frames to one player's
/// connection. The websocket layer drains the other end into the socket;
/// a send to a gone connection fails and the frame is simply skipped.
pub type PlayerSender = mpsc::UnboundedSender<String>;

/// One member of a room's roster.
///
/// The connection handle is replaceable: a player reconnecting inside
/// the grace window keeps this record and only `sender` changes.
#[derive(Debug, Clone)]
pub(crate) struct Player {
    pub(crate) username: String,
    pub(crate) client_id: ClientId,
    pub(crate) sender: PlayerSender,
    pub(crate) is_drawing: bool,
    pub(crate) score: i32,
}

impl Player {
    pub(crate) fn new(username: String, client_id: ClientId, sender: PlayerSender) -> Self {
        Self {
            username,
            client_id,
            sender,
            is_drawing: false,
            score: 0,
        }
    }
}

/// Standings for a broadcast: sorted by descending score, ranks assigned
/// 1-based in that order. Rank is derived here every time, never stored.
pub(crate) fn standings(players: &[Player]) -> Vec<PlayerData> {
    let mut by_score: Vec<&Player> = players.iter().collect();
    by_score.sort_by(|a, b| b.score.cmp(&a.score));
    by_score
        .into_iter()
        .enumerate()
        .map(|(i, p)| PlayerData {
            username: p.username.clone(),
            is_drawing: p.is_drawing,
            score: p.score,
            rank: (i + 1) as u32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(username: &str, score: i32) -> Player {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut p = Player::new(username.into(), ClientId::from(username), tx);
        p.score = score;
        p
    }

    #[test]
    fn test_standings_sorts_by_descending_score() {
        let roster = vec![player("low", 10), player("high", 90), player("mid", 40)];

        let list = standings(&roster);

        let names: Vec<&str> = list.iter().map(|p| p.username.as_str()).collect();
        assert_eq!(names, ["high", "mid", "low"]);
    }

    #[test]
    fn test_standings_ranks_are_one_based_and_sequential() {
        let roster = vec![player("a", 5), player("b", 15), player("c", -20)];

        let list = standings(&roster);

        let ranks: Vec<u32> = list.iter().map(|p| p.rank).collect();
        assert_eq!(ranks, [1, 2, 3]);
    }

    #[test]
    fn test_standings_allows_negative_scores() {
        let roster = vec![player("penalized", -50)];

        let list = standings(&roster);

        assert_eq!(list[0].score, -50);
        assert_eq!(list[0].rank, 1);
    }

    #[test]
    fn test_standings_of_empty_roster_is_empty() {
        assert!(standings(&[]).is_empty());
    }
}
