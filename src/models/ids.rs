//! Integer identifiers shared by the store, the importer and the API.
//!
//! Match, team and league ids come from the upstream fixture provider and are
//! kept verbatim. Bet ids are allocated locally by the store.

/// Team identifier (provider id).
pub type TeamId = i64;

/// League identifier (provider id).
pub type LeagueId = i64;

/// Fixture identifier (provider id).
pub type MatchId = i64;

/// Locally allocated bet identifier.
pub type BetId = i64;

/// Next free id given the ids already in use.
///
/// Ids start at 1 and are never reused while a larger id exists.
pub fn next_id<I>(existing: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    existing.into_iter().max().map_or(1, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_empty() {
        assert_eq!(next_id(Vec::new()), 1);
    }

    #[test]
    fn test_next_id_after_max() {
        assert_eq!(next_id(vec![3, 1, 7, 2]), 8);
    }

    #[test]
    fn test_next_id_with_gap() {
        // A deleted bet in the middle does not free its id for reuse
        assert_eq!(next_id(vec![1, 3]), 4);
    }
}
