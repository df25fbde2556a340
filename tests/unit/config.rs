use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("ogcard").chain(args.iter().copied())).unwrap()
}

#[test]
fn serve_defaults() {
    let cli = parse(&["serve"]);
    assert_eq!(cli.log_format, LogFormat::Compact);
    let Command::Serve(args) = cli.command else {
        panic!("expected serve");
    };
    let server = args.server_settings();
    assert_eq!(server.bind, "0.0.0.0:3000".parse().unwrap());
    assert_eq!(server.cache_max_age, 31_536_000);

    let engine = args.engine.engine_settings();
    assert_eq!(engine.logo_timeout, Duration::from_secs(3));
    assert_eq!(engine.max_dimension, 4096);
    assert!(engine.font_path.is_none());
}

#[test]
fn serve_flags_override_defaults() {
    let cli = parse(&[
        "serve",
        "--bind",
        "127.0.0.1:8080",
        "--logo-timeout-ms",
        "500",
        "--max-dimension",
        "2048",
        "--cache-max-age",
        "60",
        "--log-format",
        "json",
    ]);
    assert_eq!(cli.log_format, LogFormat::Json);
    let Command::Serve(args) = cli.command else {
        panic!("expected serve");
    };
    assert_eq!(args.server_settings().cache_max_age, 60);
    let engine = args.engine.engine_settings();
    assert_eq!(engine.logo_timeout, Duration::from_millis(500));
    assert_eq!(engine.max_dimension, 2048);
}

#[test]
fn url_applies_preset_then_explicit_colors() {
    let cli = parse(&[
        "url",
        "--preset",
        "dark-purple",
        "--accent",
        "#ff0000",
        "--title",
        "Hi there",
        "--width",
        "800",
    ]);
    let Command::Url(args) = cli.command else {
        panic!("expected url");
    };
    let spec = args.to_spec().unwrap();
    assert_eq!(spec.background_color, "#1e1b4b");
    assert_eq!(spec.accent_color, "#ff0000");
    assert_eq!(spec.title, "Hi there");
    assert_eq!(spec.width, 800);

    let url = args.to_url().unwrap();
    assert_eq!(url.path(), "/api/og");
    assert_eq!(url.host_str(), Some("localhost"));
    assert_eq!(RenderSpec::from_query(url.query().unwrap_or("")), spec);
}

#[test]
fn url_rejects_unknown_preset() {
    let cli = parse(&["url", "--preset", "neon"]);
    let Command::Url(args) = cli.command else {
        panic!("expected url");
    };
    assert!(args.to_spec().is_err());
}

#[test]
fn render_requires_out() {
    assert!(Cli::try_parse_from(["ogcard", "render", "--query", "title=x"]).is_err());
    let cli = parse(&["render", "--query", "title=x", "--out", "card.png"]);
    assert!(matches!(cli.command, Command::Render(_)));
}
