//! Trending score for the feed ranking.
//!
//! The SQL in `db::posts::trending` computes the same expression so ordering
//! stays in the database; this function exists for the rest of the code (and
//! tests) to agree on the formula.

pub const TRENDING_WINDOW_DAYS: i64 = 7;
pub const TRENDING_LIMIT: i64 = 15;

/// `likes + 2 * comments + views / 10`, integer arithmetic throughout, so
/// views only count in full blocks of ten.
pub fn trending_score(like_count: i64, comment_count: i64, view_count: i64) -> i64 {
    like_count + 2 * comment_count + view_count / 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_weigh_double() {
        assert_eq!(trending_score(2, 0, 0), trending_score(0, 1, 0));
    }

    #[test]
    fn test_views_weigh_a_tenth() {
        assert_eq!(trending_score(1, 0, 0), trending_score(0, 0, 10));
    }

    #[test]
    fn test_partial_view_blocks_truncate() {
        assert_eq!(trending_score(0, 0, 9), 0);
        assert_eq!(trending_score(0, 0, 15), 1);
        assert_eq!(trending_score(0, 0, 20), 2);
    }

    #[test]
    fn test_combined() {
        // 5 likes + 2*3 comments + 40/10 views
        assert_eq!(trending_score(5, 3, 40), 15);
    }

    #[test]
    fn test_zero_engagement() {
        assert_eq!(trending_score(0, 0, 0), 0);
    }
}
