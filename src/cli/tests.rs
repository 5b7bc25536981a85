use super::*;

fn parse_args(argv: &[&str]) -> Args {
    Args::try_parse_from(argv)
        .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
}

#[test]
fn no_subcommand_means_chat() {
    let args = parse_args(&["matetutor"]);
    assert!(args.command.is_none());
    assert!(args.model.is_none());
    assert!(args.log.is_none());
}

#[test]
fn global_flags_work_before_and_after_subcommands() {
    let cases: [&[&str]; 3] = [
        &["matetutor", "-m", "gemini-2.5-pro", "chat"],
        &["matetutor", "chat", "--model", "gemini-2.5-pro"],
        &["matetutor", "say", "-m", "gemini-2.5-pro", "hola"],
    ];

    for argv in cases {
        let args = parse_args(argv);
        assert_eq!(
            args.model.as_deref(),
            Some("gemini-2.5-pro"),
            "unexpected model for argv={argv:?}"
        );
    }
}

#[test]
fn log_flag_takes_a_path() {
    let args = parse_args(&["matetutor", "--log", "/tmp/mt.log"]);
    assert_eq!(args.log, Some(PathBuf::from("/tmp/mt.log")));
}

#[test]
fn say_collects_prompt_words_and_image() {
    let args = parse_args(&["matetutor", "say", "-i", "q.png", "¿cuánto", "es", "-2+2?"]);
    match args.command {
        Some(Commands::Say { image, prompt }) => {
            assert_eq!(image, Some(PathBuf::from("q.png")));
            assert_eq!(prompt, vec!["¿cuánto", "es", "-2+2?"]);
        }
        _ => panic!("expected say subcommand"),
    }
}

#[test]
fn say_allows_image_without_prompt() {
    let args = parse_args(&["matetutor", "say", "--image", "q.png"]);
    match args.command {
        Some(Commands::Say { image, prompt }) => {
            assert!(image.is_some());
            assert!(prompt.is_empty());
        }
        _ => panic!("expected say subcommand"),
    }
}

#[test]
fn set_joins_multi_word_values() {
    let args = parse_args(&["matetutor", "set", "model", "gemini", "2.5"]);
    match args.command {
        Some(Commands::Set { key, value }) => {
            assert_eq!(key, "model");
            assert_eq!(value.join(" "), "gemini 2.5");
        }
        _ => panic!("expected set subcommand"),
    }
}

#[test]
fn unset_requires_a_key() {
    assert!(Args::try_parse_from(["matetutor", "unset"]).is_err());
    let args = parse_args(&["matetutor", "unset", "theme"]);
    assert!(matches!(args.command, Some(Commands::Unset { key }) if key == "theme"));
}

#[test]
fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    Args::command().debug_assert();
}
