//! Unit tests for configuration

#[cfg(test)]
mod tests {
    use crate::config::{Args, Config};

    fn args(subreddits: &str) -> Args {
        Args {
            subreddits: subreddits.to_string(),
            reddit_client_id: "id".to_string(),
            reddit_client_secret: "secret".to_string(),
            reddit_username: "cardbot".to_string(),
            reddit_password: "hunter2".to_string(),
            api_url: "https://api.example.com/".to_string(),
            revision: "abc123".to_string(),
            master_duel_vector_url: "https://example.com/md.json".to_string(),
            rush_vector_url: "https://example.com/rush.json".to_string(),
            health_port: 3000,
        }
    }

    #[test]
    fn test_subreddits_split_and_lowercased() {
        let config = Config::from_args(args("YuGiOh+masterduel+ Rush ")).unwrap();
        assert_eq!(config.subreddits, vec!["yugioh", "masterduel", "rush"]);
        assert_eq!(config.subreddit_path(), "yugioh+masterduel+rush");
    }

    #[test]
    fn test_empty_subreddits_rejected() {
        assert!(Config::from_args(args("")).is_err());
        assert!(Config::from_args(args("+")).is_err());
    }

    #[test]
    fn test_is_watched_case_insensitive() {
        let config = Config::from_args(args("yugioh")).unwrap();
        assert!(config.is_watched("yugioh"));
        assert!(config.is_watched("YuGiOh"));
        assert!(!config.is_watched("pokemon"));
    }

    #[test]
    fn test_api_url_trailing_slash_trimmed() {
        let config = Config::from_args(args("yugioh")).unwrap();
        assert_eq!(config.api_url, "https://api.example.com");
    }

    #[test]
    fn test_user_agent_names_revision_and_account() {
        let config = Config::from_args(args("yugioh")).unwrap();
        let ua = config.user_agent();
        assert!(ua.contains("abc123"));
        assert!(ua.contains("/u/cardbot"));
    }
}
