//! CLI Command Tests
//!
//! Argument parsing, JSON output format, exit codes, and command handlers
//! run against a mocked TMDB and a temporary data directory.

// =============================================================================
// CLI Argument Parsing Tests
// =============================================================================

mod cli_parsing {
    use cinegrid::cli::{Cli, Command, ExitCode as CliExitCode};
    use cinegrid::models::SortKey;
    use clap::Parser;

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from(["cinegrid"]);
        assert!(!cli.is_cli_mode());
    }

    #[test]
    fn test_discover_defaults() {
        let cli = Cli::parse_from(["cinegrid", "discover"]);
        match cli.command {
            Some(Command::Discover(cmd)) => {
                assert_eq!(cmd.page, 1);
                assert!(cmd.genres.is_empty());
                assert!(cmd.year.is_none());
                assert!(cmd.sort.is_none());
                assert_eq!(cmd.limit, 20);
            }
            _ => panic!("Expected Discover command"),
        }
    }

    #[test]
    fn test_discover_with_filters() {
        let cli = Cli::parse_from([
            "cinegrid",
            "discover",
            "-g",
            "18",
            "-g",
            "10749",
            "-y",
            "1997",
            "-s",
            "revenue.desc",
            "-l",
            "5",
        ]);
        match cli.command {
            Some(Command::Discover(cmd)) => {
                assert_eq!(cmd.genres, vec![18, 10749]);
                assert_eq!(cmd.year, Some(1997));
                assert_eq!(cmd.sort, Some(SortKey::RevenueDesc));
                assert_eq!(cmd.limit, 5);
            }
            _ => panic!("Expected Discover command"),
        }
    }

    #[test]
    fn test_search_command() {
        let cli = Cli::parse_from(["cinegrid", "search", "blade runner", "--page", "2"]);
        match cli.command {
            Some(Command::Search(cmd)) => {
                assert_eq!(cmd.query, "blade runner");
                assert_eq!(cmd.page, 2);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from(["cinegrid", "search"]).is_err());
    }

    #[test]
    fn test_recent_and_filters_commands() {
        let cli = Cli::parse_from(["cinegrid", "recent", "--limit", "3"]);
        assert!(matches!(cli.command, Some(Command::Recent(ref c)) if c.limit == 3));

        let cli = Cli::parse_from(["cinegrid", "filters", "--clear"]);
        assert!(matches!(cli.command, Some(Command::Filters(ref c)) if c.clear));
    }

    #[test]
    fn test_command_aliases() {
        let aliases = [
            ("d", "discover"),
            ("s", "search"),
            ("i", "info"),
            ("g", "genres"),
            ("r", "recent"),
            ("f", "filters"),
        ];
        for (alias, name) in aliases {
            let mut args = vec!["cinegrid", alias];
            match name {
                "search" => args.push("x"),
                "info" => args.push("1"),
                _ => {}
            }
            let cli = Cli::try_parse_from(args)
                .unwrap_or_else(|e| panic!("alias {} for {} failed: {}", alias, name, e));
            assert!(cli.is_cli_mode());
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "cinegrid",
            "--json",
            "--quiet",
            "--config",
            "/tmp/cinegrid.toml",
            "genres",
        ]);
        assert!(cli.json);
        assert!(cli.quiet);
        assert!(cli.should_json());
        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("/tmp/cinegrid.toml"))
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(CliExitCode::Success), 0);
        assert_eq!(i32::from(CliExitCode::NetworkError), 3);
        assert_eq!(i32::from(CliExitCode::NotFound), 4);
        assert_eq!(i32::from(CliExitCode::ConfigError), 5);
    }
}

// =============================================================================
// JSON Output Tests
// =============================================================================

mod json_output {
    use cinegrid::cli::{ExitCode, JsonOutput};

    #[test]
    fn test_json_output_success() {
        let output = JsonOutput::success("test data");
        let json = serde_json::to_string(&output).unwrap();

        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"data\":\"test data\""));
        assert!(!json.contains("error"));
        assert!(!json.contains("exit_code")); // Should be omitted when 0
    }

    #[test]
    fn test_json_output_error() {
        let output = JsonOutput::failure("Something went wrong", ExitCode::NetworkError);
        let json = serde_json::to_string(&output).unwrap();

        assert!(json.contains("\"success\":false"));
        assert!(json.contains("\"error\":\"Something went wrong\""));
        assert!(json.contains("\"exit_code\":3"));
        assert!(!json.contains("\"data\""));
    }
}

// =============================================================================
// Command Handler Tests
// =============================================================================

mod handlers {
    use cinegrid::cli::{DiscoverCmd, ExitCode, FiltersCmd, InfoCmd, Output, SearchCmd};
    use cinegrid::commands;
    use cinegrid::config::Config;
    use cinegrid::models::{Filters, SortKey};
    use cinegrid::storage::FileStorage;
    use cinegrid::store::MoviesStore;
    use mockito::{Matcher, Server};
    use tempfile::TempDir;

    fn output() -> Output {
        Output {
            json: true,
            quiet: true,
        }
    }

    fn config(base_url: &str, dir: &TempDir) -> Config {
        Config {
            tmdb_api_key: Some("test_key".into()),
            api_base_url: Some(base_url.to_string()),
            data_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        }
    }

    fn reopen(dir: &TempDir) -> MoviesStore {
        MoviesStore::new(Box::new(FileStorage::new(dir.path()).unwrap()))
    }

    #[tokio::test]
    async fn test_info_records_recently_viewed() {
        let mut server = Server::new_async().await;
        let dir = TempDir::new().unwrap();

        let mock = server
            .mock("GET", "/movie/949")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"id": 949, "title": "Heat", "release_date": "1995-12-15", "vote_average": 7.9}"#)
            .create_async()
            .await;

        let code = commands::info_cmd(
            InfoCmd { id: 949 },
            &config(&server.url(), &dir),
            &output(),
        )
        .await;

        mock.assert_async().await;
        assert_eq!(code, ExitCode::Success);

        let store = reopen(&dir);
        assert_eq!(store.recently_viewed().len(), 1);
        assert_eq!(store.recently_viewed()[0].title, "Heat");
    }

    #[tokio::test]
    async fn test_info_not_found_exit_code() {
        let mut server = Server::new_async().await;
        let dir = TempDir::new().unwrap();

        server
            .mock("GET", "/movie/404")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let code = commands::info_cmd(
            InfoCmd { id: 404 },
            &config(&server.url(), &dir),
            &output(),
        )
        .await;

        assert_eq!(code, ExitCode::NotFound);
        assert!(reopen(&dir).recently_viewed().is_empty());
    }

    #[tokio::test]
    async fn test_discover_server_error_is_network_error() {
        let mut server = Server::new_async().await;
        let dir = TempDir::new().unwrap();

        server
            .mock("GET", "/discover/movie")
            .match_query(Matcher::Any)
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let cmd = DiscoverCmd {
            page: 1,
            genres: vec![28],
            year: None,
            sort: Some(SortKey::RatingDesc),
            limit: 20,
        };
        let code = commands::discover_cmd(cmd, &config(&server.url(), &dir), &output()).await;
        assert_eq!(code, ExitCode::NetworkError);
    }

    #[tokio::test]
    async fn test_invalid_arguments() {
        let dir = TempDir::new().unwrap();
        let config = config("http://127.0.0.1:9", &dir);

        let cmd = DiscoverCmd {
            page: 0,
            genres: vec![],
            year: None,
            sort: None,
            limit: 20,
        };
        assert_eq!(
            commands::discover_cmd(cmd, &config, &output()).await,
            ExitCode::InvalidArgs
        );

        let cmd = SearchCmd {
            query: "   ".into(),
            page: 1,
            limit: 20,
        };
        assert_eq!(
            commands::search_cmd(cmd, &config, &output()).await,
            ExitCode::InvalidArgs
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_is_config_error() {
        if std::env::var("TMDB_API_KEY").is_ok() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };

        let code = commands::info_cmd(InfoCmd { id: 1 }, &config, &output()).await;
        assert_eq!(code, ExitCode::ConfigError);
    }

    #[tokio::test]
    async fn test_filters_clear() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = reopen(&dir);
            store.set_filters(Filters {
                release_year: Some(2001),
                ..Filters::default()
            });
        }

        let code = commands::filters_cmd(
            FiltersCmd { clear: true },
            &config("http://127.0.0.1:9", &dir),
            &output(),
        )
        .await;

        assert_eq!(code, ExitCode::Success);
        assert_eq!(reopen(&dir).filters(), &Filters::default());
    }
}
